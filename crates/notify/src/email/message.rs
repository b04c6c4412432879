//! Message assembly (PRD-18).
//!
//! Wraps the generated HTML documents in RFC 5322 messages via `lettre`'s
//! builder. There is deliberately no transport here; a delivery worker
//! owns SMTP credentials and retry policy.

use lettre::message::header::ContentType;
use lettre::Message;

use super::templates::{receipt_email, verification_email, Receipt};

/// Sender address used when `FLOWMART_EMAIL_FROM` is unset.
const DEFAULT_FROM_ADDRESS: &str = "noreply@flowmart.local";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The sender or recipient address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Outbound message configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// RFC 5322 `From` mailbox, e.g. `"Flowmart <noreply@flowmart.local>"`.
    pub from_address: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable              | Required | Default                  |
    /// |-----------------------|----------|--------------------------|
    /// | `FLOWMART_EMAIL_FROM` | no       | `noreply@flowmart.local` |
    pub fn from_env() -> Self {
        Self {
            from_address: std::env::var("FLOWMART_EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: DEFAULT_FROM_ADDRESS.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Assemble the verification-code message for `to_email`.
pub fn verification_message(
    config: &EmailConfig,
    to_email: &str,
    name: &str,
    code: &str,
    expires_minutes: u32,
) -> Result<Message, EmailError> {
    let body = verification_email(name, to_email, code, expires_minutes);
    Message::builder()
        .from(config.from_address.parse()?)
        .to(to_email.parse()?)
        .subject("Your Flowmart verification code")
        .header(ContentType::TEXT_HTML)
        .body(body)
        .map_err(|e| EmailError::Build(e.to_string()))
}

/// Assemble the payment-receipt message for `to_email`.
pub fn receipt_message(
    config: &EmailConfig,
    to_email: &str,
    receipt: &Receipt,
) -> Result<Message, EmailError> {
    let body = receipt_email(receipt);
    Message::builder()
        .from(config.from_address.parse()?)
        .to(to_email.parse()?)
        .subject(format!("Your Flowmart receipt for the {} plan", receipt.plan_name))
        .header(ContentType::TEXT_HTML)
        .body(body)
        .map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
