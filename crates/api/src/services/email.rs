//! Email service for sending verification codes.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use grindtrack_core::OtpCode;

use crate::config::EmailConfig;

/// HTML template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.html")]
struct VerificationCodeEmailHtml<'a> {
    code: &'a str,
    minutes: i64,
}

/// Plain text template for verification code email.
#[derive(Template)]
#[template(path = "email/verification_code.txt")]
struct VerificationCodeEmailText<'a> {
    code: &'a str,
    minutes: i64,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the signup verification code.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_verification_code(&self, to: &str, code: &OtpCode) -> Result<(), EmailError> {
        let html = VerificationCodeEmailHtml {
            code: code.as_str(),
            minutes: OtpCode::VALIDITY_MINUTES,
        }
        .render()?;
        let text = VerificationCodeEmailText {
            code: code.as_str(),
            minutes: OtpCode::VALIDITY_MINUTES,
        }
        .render()?;

        self.send_multipart_email(to, "Your Grindtrack verification code", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

/// Generate a 6-digit verification code.
#[must_use]
pub fn generate_otp_code() -> OtpCode {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    OtpCode::from_number(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_code_format() {
        let code = generate_otp_code();
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_otp_code_range() {
        for _ in 0..100 {
            let code: u32 = generate_otp_code()
                .as_str()
                .parse()
                .expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }

    #[test]
    fn test_verification_templates_render() {
        let code = OtpCode::from_number(123_456);
        let html = VerificationCodeEmailHtml {
            code: code.as_str(),
            minutes: OtpCode::VALIDITY_MINUTES,
        }
        .render()
        .expect("html renders");
        let text = VerificationCodeEmailText {
            code: code.as_str(),
            minutes: OtpCode::VALIDITY_MINUTES,
        }
        .render()
        .expect("text renders");

        assert!(html.contains("123456"));
        assert!(text.contains("123456"));
        assert!(text.contains("10 minutes"));
    }
}
