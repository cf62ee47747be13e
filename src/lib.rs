//! lmbackup: inventory and back up a developer workstation.
//!
//! This crate provides the units that describe or archive parts of the
//! machine, the dispatcher that runs them for a chosen action, and the
//! configuration and path helpers they share.

pub mod application;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod file_util;
pub mod logger;
pub mod path;
pub mod result;
pub mod secrets;
pub mod sysexits;
pub mod unit;

pub use error::{Error, Result};
