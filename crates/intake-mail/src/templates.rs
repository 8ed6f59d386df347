//! Mail templates.
//!
//! Both messages are rendered from the same [`Submission`]. The internal one
//! uses `N/A` for empty optional fields; the customer one leaves them blank
//! and omits phone, company, description and comments.

use intake_core::{Customization, Submission};
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

/// Renders the internal notification and the customer confirmation.
#[derive(Debug, Clone)]
pub struct Templates {
    brand: String,
    store_name: String,
}

impl Templates {
    /// `brand` signs the customer mail; `store_name` is pointed to from the
    /// internal mail's footer.
    pub fn new(brand: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            store_name: store_name.into(),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn internal_subject(&self, submission: &Submission) -> String {
        format!(
            "New Customer Request: {}",
            or(&submission.subject, "No Subject")
        )
    }

    pub fn internal_body(&self, submission: &Submission) -> String {
        let s = submission;
        let mut body = String::from("A new customer request has been submitted.\n\n");

        let _ = writeln!(body, "From: {} ({})", s.full_name, s.email);
        let _ = writeln!(body, "Phone: {}", or(&s.phone, NOT_AVAILABLE));
        let _ = writeln!(body, "Company: {}", or(&s.company, NOT_AVAILABLE));
        let _ = writeln!(body, "Request Type: {}", s.request_type);
        write_customization(&mut body, &s.customization, NOT_AVAILABLE);
        let _ = writeln!(body, "Preferred Contact: {}", s.contact_method_or_default());
        body.push('\n');
        let _ = writeln!(body, "Subject: {}", s.subject);
        let _ = writeln!(body, "Description:\n{}", s.description);
        if !s.comments.is_empty() {
            let _ = writeln!(body, "\nAdditional Comments:\n{}", s.comments);
        }
        let _ = write!(body, "\n---\nView all requests in {}", self.store_name);
        body
    }

    pub fn customer_subject(&self, submission: &Submission) -> String {
        format!(
            "{} — We Received Your Request: {}",
            self.brand, submission.subject
        )
    }

    pub fn customer_body(&self, submission: &Submission) -> String {
        let s = submission;
        let mut body = String::new();

        let _ = writeln!(body, "Hi {},\n", s.full_name);
        let _ = writeln!(
            body,
            "Thank you for reaching out to {}! We've received your request and our team will review it shortly.\n",
            self.brand
        );
        body.push_str("Here's a summary of what you submitted:\n\n");
        let _ = writeln!(body, "Request Type: {}", s.request_type);
        write_customization(&mut body, &s.customization, "");
        let _ = writeln!(body, "Subject: {}\n", s.subject);
        let _ = writeln!(
            body,
            "We'll be in touch via your preferred contact method ({}).\n",
            s.contact_method_or_default()
        );
        body.push_str(
            "If you have any urgent questions in the meantime, feel free to contact us directly.\n\n",
        );
        let _ = write!(body, "Thank you,\nThe {} Team", self.brand);
        body
    }
}

/// `Customization:` line (only when a type was given) and the variant's
/// detail lines, with `placeholder` standing in for empty details.
fn write_customization(body: &mut String, customization: &Customization, placeholder: &str) {
    let label = customization.label();
    if label.is_empty() {
        return;
    }
    let _ = writeln!(body, "Customization: {label}");
    for (column, value) in customization.details() {
        let _ = writeln!(body, "{}: {}", column.header(), or(value, placeholder));
    }
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
