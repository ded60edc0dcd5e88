//! Famiglia protocol - core identifiers and roster documents
//!
//! Shared vocabulary between the hierarchy engine and its callers:
//! member identifiers, the roster document used to seed an organization,
//! and the constants both sides agree on.

pub mod constants;
pub mod error;
pub mod identity;
pub mod roster;

pub use constants::*;
pub use error::*;
pub use identity::*;
pub use roster::*;
