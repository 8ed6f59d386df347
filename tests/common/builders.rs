//! Test builders — ergonomic constructors for request payloads.
//!
//! These are designed for readability in test assertions, not for production
//! use. They panic on invalid input rather than returning `Result`.

use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// PayloadBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for JSON submission bodies.
///
/// # Example
///
/// ```rust
/// let body = PayloadBuilder::new()
///     .field("fullName", "Jane Doe")
///     .field("email", "jane@x.com")
///     .cerakote("AR-15", "Slide", "Black/FDE")
///     .body();
/// ```
#[derive(Default)]
pub struct PayloadBuilder {
    fields: Map<String, Value>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn custom_build(self, build_type: &str, style: &str, caliber: &str, budget: &str) -> Self {
        self.field("customizationType", "Custom Build")
            .field("buildType", build_type)
            .field("buildStyle", style)
            .field("caliber", caliber)
            .field("budget", budget)
    }

    pub fn cerakote(self, firearm: &str, location: &str, colors: &str) -> Self {
        self.field("customizationType", "Cerakote")
            .field("firearmType", firearm)
            .field("location", location)
            .field("colors", colors)
    }

    pub fn engraving(self, firearm: &str, location: &str, kind: &str) -> Self {
        self.field("customizationType", "Engraving")
            .field("firearmType", firearm)
            .field("location", location)
            .field("engravingType", kind)
    }

    pub fn value(self) -> Value {
        Value::Object(self.fields)
    }

    pub fn body(self) -> Vec<u8> {
        serde_json::to_vec(&self.value()).expect("payload serializes")
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// The Cerakote walkthrough submission used across harnesses.
pub fn jane_cerakote() -> PayloadBuilder {
    PayloadBuilder::new()
        .field("fullName", "Jane Doe")
        .field("email", "jane@x.com")
        .field("requestType", "Customization")
        .cerakote("AR-15", "Slide", "Black/FDE")
        .field("subject", "Cerakote quote")
        .field("description", "Want two-tone")
}

/// A general enquiry with no customization and no email address.
pub fn anonymous_enquiry() -> PayloadBuilder {
    PayloadBuilder::new()
        .field("requestType", "General Question")
        .field("subject", "Store hours")
        .field("description", "Are you open Saturdays?")
}
