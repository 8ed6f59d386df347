//! Normalizer — collapses a typed [`Submission`] into a fixed-width [`Record`].
//!
//! The mapping is total: every column gets a cell, absent data is `""`, the
//! internal columns stay empty apart from `Status = "New"`, and only the
//! detail columns of the submission's own [`Customization`] variant are
//! filled.

use crate::types::{Column, Record, Submission};
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of record timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock that never repeats or goes backwards within a process.
///
/// If the wall clock has not advanced past the previously issued instant, the
/// next instant is the previous one plus a microsecond (the resolution of a
/// persisted timestamp).
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now();
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = match *last {
            Some(prev) if wall <= prev => prev + Duration::microseconds(1),
            _ => wall,
        };
        *last = Some(next);
        next
    }
}

/// Clock pinned to one instant. Used by tests and benchmarks.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Build the record for `submission`, stamped at `timestamp`.
pub fn normalize(submission: &Submission, timestamp: DateTime<Utc>) -> Record {
    let mut record = Record::new(timestamp);

    record.set(Column::FullName, submission.full_name.as_str());
    record.set(Column::Email, submission.email.as_str());
    record.set(Column::Phone, submission.phone.as_str());
    record.set(Column::Company, submission.company.as_str());
    record.set(Column::RequestType, submission.request_type.as_str());
    record.set(Column::CustomizationType, submission.customization.label());

    for (column, value) in submission.customization.details() {
        record.set(column, value);
    }

    record.set(Column::Subject, submission.subject.as_str());
    record.set(Column::Description, submission.description.as_str());
    // Stored as given; the "Email" fallback is a template concern only.
    record.set(Column::ContactMethod, submission.contact_method.as_str());
    record.set(Column::Comments, submission.comments.as_str());

    record
}

/// Normalize using `clock` for the timestamp.
pub fn normalize_now(submission: &Submission, clock: &dyn Clock) -> Record {
    normalize(submission, clock.now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
