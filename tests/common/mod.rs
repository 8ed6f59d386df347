//! Shared test utilities for intake integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Everything runs in process: stores are in memory or in
//! a temp directory, and mail goes to a recording fake or a local relay.

pub mod assertions;
pub mod builders;
pub mod fake_mail_relay;
pub mod fakes;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fakes::*;
pub use fixtures::*;
