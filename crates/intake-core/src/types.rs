//! Core types for intake-core.
//!
//! This module defines the data structures shared across every layer: the
//! typed [`Submission`] decoded from a request, its [`Customization`] variant,
//! the fixed [`Column`] schema, and the persisted [`Record`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// One column of the request table, in persisted order.
///
/// The order of the variants is the order of the cells in a [`Record`] and of
/// the header row in the table. It must never change once a table exists:
/// appends are positional, so a reordering silently shifts data into the
/// wrong columns of an existing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Timestamp,
    FullName,
    Email,
    Phone,
    Company,
    RequestType,
    CustomizationType,
    // Custom Build
    BuildType,
    BuildStyle,
    Caliber,
    Budget,
    // Cerakote / Engraving
    FirearmType,
    Location,
    Colors,
    EngravingType,
    // Common
    Subject,
    Description,
    ContactMethod,
    Comments,
    // Internal, edited by staff after intake
    Priority,
    Department,
    Status,
    AssignedTo,
    InternalNotes,
}

impl Column {
    /// Number of columns in a record.
    pub const COUNT: usize = 24;

    /// Every column, in persisted order.
    pub const ALL: [Column; Column::COUNT] = [
        Column::Timestamp,
        Column::FullName,
        Column::Email,
        Column::Phone,
        Column::Company,
        Column::RequestType,
        Column::CustomizationType,
        Column::BuildType,
        Column::BuildStyle,
        Column::Caliber,
        Column::Budget,
        Column::FirearmType,
        Column::Location,
        Column::Colors,
        Column::EngravingType,
        Column::Subject,
        Column::Description,
        Column::ContactMethod,
        Column::Comments,
        Column::Priority,
        Column::Department,
        Column::Status,
        Column::AssignedTo,
        Column::InternalNotes,
    ];

    /// Columns owned by staff. Never populated from a submission.
    pub const INTERNAL: [Column; 5] = [
        Column::Priority,
        Column::Department,
        Column::Status,
        Column::AssignedTo,
        Column::InternalNotes,
    ];

    /// Zero-based position of this column in a record.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key of this column in the inbound JSON payload.
    pub fn key(self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::FullName => "fullName",
            Column::Email => "email",
            Column::Phone => "phone",
            Column::Company => "company",
            Column::RequestType => "requestType",
            Column::CustomizationType => "customizationType",
            Column::BuildType => "buildType",
            Column::BuildStyle => "buildStyle",
            Column::Caliber => "caliber",
            Column::Budget => "budget",
            Column::FirearmType => "firearmType",
            Column::Location => "location",
            Column::Colors => "colors",
            Column::EngravingType => "engravingType",
            Column::Subject => "subject",
            Column::Description => "description",
            Column::ContactMethod => "contactMethod",
            Column::Comments => "comments",
            Column::Priority => "priority",
            Column::Department => "department",
            Column::Status => "status",
            Column::AssignedTo => "assignedTo",
            Column::InternalNotes => "internalNotes",
        }
    }

    /// Title written to the header row of the table.
    pub fn header(self) -> &'static str {
        match self {
            Column::Timestamp => "Timestamp",
            Column::FullName => "Full Name",
            Column::Email => "Email",
            Column::Phone => "Phone",
            Column::Company => "Company",
            Column::RequestType => "Request Type",
            Column::CustomizationType => "Customization Type",
            Column::BuildType => "Build Type",
            Column::BuildStyle => "Style",
            Column::Caliber => "Caliber",
            Column::Budget => "Budget",
            Column::FirearmType => "Firearm Type",
            Column::Location => "Location",
            Column::Colors => "Color(s)",
            Column::EngravingType => "Type",
            Column::Subject => "Subject",
            Column::Description => "Description",
            Column::ContactMethod => "Preferred Contact",
            Column::Comments => "Additional Comments",
            Column::Priority => "Priority",
            Column::Department => "Department",
            Column::Status => "Status",
            Column::AssignedTo => "Assigned To",
            Column::InternalNotes => "Internal Notes",
        }
    }

    pub fn is_internal(self) -> bool {
        Column::INTERNAL.contains(&self)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Literal status given to every newly appended record.
pub const INITIAL_STATUS: &str = "New";

/// Contact method assumed by the mail templates when none was given.
pub const DEFAULT_CONTACT_METHOD: &str = "Email";

/// A decoded form submission.
///
/// Every field is a plain string; absent payload keys decode to `""`. The
/// customization details live in [`Customization`] so that only the fields
/// relevant to the chosen variant are ever carried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub request_type: String,
    pub customization: Customization,
    pub subject: String,
    pub description: String,
    pub contact_method: String,
    pub comments: String,
}

impl Submission {
    /// Contact method for display, falling back to [`DEFAULT_CONTACT_METHOD`].
    pub fn contact_method_or_default(&self) -> &str {
        if self.contact_method.is_empty() {
            DEFAULT_CONTACT_METHOD
        } else {
            &self.contact_method
        }
    }
}

/// Variant-specific details, keyed by the payload's `customizationType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customization {
    CustomBuild {
        build_type: String,
        build_style: String,
        caliber: String,
        budget: String,
    },
    Cerakote {
        firearm_type: String,
        location: String,
        colors: String,
    },
    Engraving {
        firearm_type: String,
        location: String,
        engraving_type: String,
    },
    /// Any other `customizationType`, including none. Carries the raw label
    /// and no detail fields.
    Other(String),
}

impl Default for Customization {
    fn default() -> Self {
        Customization::Other(String::new())
    }
}

impl Customization {
    pub const CUSTOM_BUILD: &'static str = "Custom Build";
    pub const CERAKOTE: &'static str = "Cerakote";
    pub const ENGRAVING: &'static str = "Engraving";

    /// The `customizationType` label this variant was decoded from.
    pub fn label(&self) -> &str {
        match self {
            Customization::CustomBuild { .. } => Self::CUSTOM_BUILD,
            Customization::Cerakote { .. } => Self::CERAKOTE,
            Customization::Engraving { .. } => Self::ENGRAVING,
            Customization::Other(label) => label,
        }
    }

    /// Detail cells carried by this variant, in column order.
    pub fn details(&self) -> Vec<(Column, &str)> {
        match self {
            Customization::CustomBuild {
                build_type,
                build_style,
                caliber,
                budget,
            } => vec![
                (Column::BuildType, build_type.as_str()),
                (Column::BuildStyle, build_style.as_str()),
                (Column::Caliber, caliber.as_str()),
                (Column::Budget, budget.as_str()),
            ],
            Customization::Cerakote {
                firearm_type,
                location,
                colors,
            } => vec![
                (Column::FirearmType, firearm_type.as_str()),
                (Column::Location, location.as_str()),
                (Column::Colors, colors.as_str()),
            ],
            Customization::Engraving {
                firearm_type,
                location,
                engraving_type,
            } => vec![
                (Column::FirearmType, firearm_type.as_str()),
                (Column::Location, location.as_str()),
                (Column::EngravingType, engraving_type.as_str()),
            ],
            Customization::Other(_) => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One persisted row: exactly [`Column::COUNT`] string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    timestamp: DateTime<Utc>,
    cells: [String; Column::COUNT],
}

impl Record {
    /// An otherwise empty record stamped with `timestamp` and the initial
    /// status.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        let mut record = Self {
            timestamp,
            cells: std::array::from_fn(|_| String::new()),
        };
        record.cells[Column::Timestamp.index()] = format_timestamp(timestamp);
        record.cells[Column::Status.index()] = INITIAL_STATUS.to_string();
        record
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn get(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    /// Overwrite a cell. The timestamp cell is owned by [`Record::new`].
    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        if column != Column::Timestamp {
            self.cells[column.index()] = value.into();
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<String> {
        self.cells.into()
    }
}

/// Canonical text form of a record timestamp (RFC 3339, UTC, microseconds).
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
