//! intake-core — shared types and the pure layers of the intake pipeline.
//!
//! # Architecture
//!
//! ```text
//! body ──► payload::decode ──► Submission ──► normalizer ──► Record
//!                                   │                           │
//!                                   └──► mail templates         └──► store (TableLayout)
//! ```
//!
//! Nothing in this crate performs I/O apart from [`config::Config::load`].

pub mod config;
pub mod normalizer;
pub mod payload;
pub mod schema;
pub mod types;

pub use normalizer::{normalize, Clock, FixedClock, SystemClock};
pub use payload::{decode, DecodeError};
pub use schema::TableLayout;
pub use types::{Column, Customization, Record, Submission};
