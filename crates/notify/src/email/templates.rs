//! Transactional HTML documents (PRD-18).
//!
//! Each generator returns a complete, self-contained HTML string with
//! inline styles only, so the documents render the same in clients that
//! strip `<style>` blocks. Every caller-supplied field goes through
//! [`escape_html`] before interpolation; user-controlled text cannot
//! break out of the markup.

use chrono::{DateTime, Utc};

/// Date format used in receipt bodies, e.g. `Jun 01, 2025`.
const RECEIPT_DATE_FORMAT: &str = "%b %d, %Y";

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escape a string for interpolation into HTML text or attribute
/// positions.
///
/// # Examples
///
/// ```
/// use flowmart_notify::email::templates::escape_html;
///
/// assert_eq!(escape_html("Fish & Chips"), "Fish &amp; Chips");
/// assert_eq!(escape_html("<b>"), "&lt;b&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Verification code
// ---------------------------------------------------------------------------

/// Render the email-verification document.
///
/// `email` is the address being confirmed and is echoed in the body so
/// the recipient can spot a mix-up; `expires_minutes` is how long the
/// code stays valid.
pub fn verification_email(name: &str, email: &str, code: &str, expires_minutes: u32) -> String {
    let name = escape_html(name);
    let email = escape_html(email);
    let code = escape_html(code);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background-color:#f4f5f7;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:480px;margin:32px auto;background-color:#ffffff;border-radius:8px;padding:32px;">
      <h1 style="margin:0 0 16px;font-size:20px;color:#111827;">Verify your email</h1>
      <p style="margin:0 0 12px;font-size:14px;color:#374151;">Hi {name},</p>
      <p style="margin:0 0 20px;font-size:14px;color:#374151;">
        Enter this code to confirm <strong>{email}</strong> on your Flowmart account:
      </p>
      <div style="text-align:center;margin:0 0 20px;">
        <span style="display:inline-block;padding:12px 24px;background-color:#eef2ff;border-radius:6px;font-size:28px;letter-spacing:6px;font-weight:bold;color:#4338ca;">{code}</span>
      </div>
      <p style="margin:0 0 4px;font-size:13px;color:#6b7280;">The code expires in {expires_minutes} minutes.</p>
      <p style="margin:0;font-size:13px;color:#6b7280;">If you did not request it, you can safely ignore this email.</p>
    </div>
  </body>
</html>"#
    )
}

// ---------------------------------------------------------------------------
// Payment receipt
// ---------------------------------------------------------------------------

/// Input for the payment-confirmation receipt.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub customer_name: String,
    pub plan_name: String,
    /// Already-formatted price line, e.g. `"$29.00"`.
    pub price: String,
    /// Workflow-run tokens included in the billing period.
    pub token_count: u64,
    /// `"monthly"` or `"yearly"`.
    pub billing_period: String,
    pub transaction_id: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Render the payment-confirmation receipt document.
pub fn receipt_email(receipt: &Receipt) -> String {
    let customer_name = escape_html(&receipt.customer_name);
    let plan_name = escape_html(&receipt.plan_name);
    let price = escape_html(&receipt.price);
    let billing_period = escape_html(&receipt.billing_period);
    let transaction_id = escape_html(&receipt.transaction_id);
    let token_count = receipt.token_count;
    let period_start = receipt.period_start.format(RECEIPT_DATE_FORMAT);
    let period_end = receipt.period_end.format(RECEIPT_DATE_FORMAT);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background-color:#f4f5f7;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:520px;margin:32px auto;background-color:#ffffff;border-radius:8px;padding:32px;">
      <h1 style="margin:0 0 16px;font-size:20px;color:#111827;">Payment received</h1>
      <p style="margin:0 0 20px;font-size:14px;color:#374151;">
        Thanks, {customer_name}. Your subscription is active and this is your receipt.
      </p>
      <table style="width:100%;border-collapse:collapse;font-size:14px;color:#374151;">
        <tr>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;color:#6b7280;">Plan</td>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;text-align:right;">{plan_name}</td>
        </tr>
        <tr>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;color:#6b7280;">Amount</td>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;text-align:right;font-weight:bold;">{price}</td>
        </tr>
        <tr>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;color:#6b7280;">Tokens included</td>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;text-align:right;">{token_count}</td>
        </tr>
        <tr>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;color:#6b7280;">Billing period</td>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;text-align:right;">{billing_period}</td>
        </tr>
        <tr>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;color:#6b7280;">Active period</td>
          <td style="padding:8px 0;border-bottom:1px solid #e5e7eb;text-align:right;">{period_start} &ndash; {period_end}</td>
        </tr>
        <tr>
          <td style="padding:8px 0;color:#6b7280;">Transaction</td>
          <td style="padding:8px 0;text-align:right;font-family:monospace;">{transaction_id}</td>
        </tr>
      </table>
      <p style="margin:20px 0 0;font-size:13px;color:#6b7280;">
        Questions about this charge? Reply to this email and we will sort it out.
      </p>
    </div>
  </body>
</html>"#
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_receipt() -> Receipt {
        Receipt {
            customer_name: "Maya Chen".to_string(),
            plan_name: "Pro".to_string(),
            price: "$29.00".to_string(),
            token_count: 50_000,
            billing_period: "monthly".to_string(),
            transaction_id: "txn_9f3b1c".to_string(),
            period_start: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().unwrap(),
            period_end: Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).single().unwrap(),
        }
    }

    // -- escaping --

    #[test]
    fn escape_html_covers_the_five_special_characters() {
        assert_eq!(escape_html(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#39;");
    }

    #[test]
    fn escape_html_leaves_plain_text_alone() {
        assert_eq!(escape_html("Maya Chen"), "Maya Chen");
    }

    #[test]
    fn escape_html_handles_the_empty_string() {
        assert_eq!(escape_html(""), "");
    }

    // -- verification document --

    #[test]
    fn verification_email_interpolates_every_field() {
        let html = verification_email("Maya", "maya@example.com", "481203", 15);
        assert!(html.contains("Hi Maya,"));
        assert!(html.contains("maya@example.com"));
        assert!(html.contains("481203"));
        assert!(html.contains("expires in 15 minutes"));
    }

    #[test]
    fn verification_email_is_a_complete_document() {
        let html = verification_email("Maya", "maya@example.com", "481203", 15);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
        assert!(!html.contains("<style"));
    }

    #[test]
    fn verification_email_escapes_a_hostile_name() {
        let html = verification_email("<script>alert(1)</script>", "a@b.c", "000000", 5);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn verification_email_escapes_the_code_too() {
        let html = verification_email("Maya", "a@b.c", "12<34", 5);
        assert!(html.contains("12&lt;34"));
    }

    // -- receipt document --

    #[test]
    fn receipt_email_interpolates_every_field() {
        let html = receipt_email(&sample_receipt());
        assert!(html.contains("Maya Chen"));
        assert!(html.contains("Pro"));
        assert!(html.contains("$29.00"));
        assert!(html.contains("50000"));
        assert!(html.contains("monthly"));
        assert!(html.contains("txn_9f3b1c"));
    }

    #[test]
    fn receipt_email_formats_the_active_period() {
        let html = receipt_email(&sample_receipt());
        assert!(html.contains("Jun 01, 2025"));
        assert!(html.contains("Jul 01, 2025"));
    }

    #[test]
    fn receipt_email_escapes_a_hostile_plan_name() {
        let mut receipt = sample_receipt();
        receipt.plan_name = "\"Pro\" & <Friends>".to_string();
        let html = receipt_email(&receipt);
        assert!(!html.contains("<Friends>"));
        assert!(html.contains("&quot;Pro&quot; &amp; &lt;Friends&gt;"));
    }

    #[test]
    fn receipt_email_is_a_complete_document() {
        let html = receipt_email(&sample_receipt());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
    }
}
