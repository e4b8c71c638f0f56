// Field-level input validation feeding 422 failure signals
use std::collections::BTreeMap;

use serde_json::Value;

use crate::signal::FailureSignal;

/// Ordered `field -> message` map. The first message recorded for a field wins,
/// so rules should be applied most-fundamental first (required before format).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record "required" when the value is missing or blank
    pub fn require(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.add(field, "required");
        }
        self
    }

    /// Length in characters, measured on the trimmed value that gets stored
    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            if v.trim().chars().count() > max {
                self.add(field, format!("must be at most {} characters", max));
            }
        }
        self
    }

    /// Loose structural check: one `@`, non-empty local part, dotted domain
    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if !is_plausible_email(v.trim()) {
                self.add(field, "must be a valid email address");
            }
        }
        self
    }

    pub fn to_value(&self) -> Value {
        // BTreeMap<String, String> always serializes to an object
        Value::Object(
            self.errors
                .iter()
                .map(|(field, message)| (field.clone(), Value::String(message.clone())))
                .collect(),
        )
    }

    /// `Ok(())` when nothing was recorded, otherwise a 422 validation signal
    pub fn into_result(self, message: impl Into<String>) -> Result<(), FailureSignal> {
        if self.is_empty() {
            return Ok(());
        }

        tracing::debug!("Validation failed for fields: {:?}", self.errors.keys().collect::<Vec<_>>());
        Err(FailureSignal::validation(message, self.to_value()))
    }
}

fn is_plausible_email(value: &str) -> bool {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        _ => false,
    }
}
