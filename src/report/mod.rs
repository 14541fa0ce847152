//! Reporting utilities: formatted terminal output for a fit run.
//!
//! Formatting lives here so the fitting code stays free of presentation
//! concerns and output changes stay localized.

pub mod format;

pub use format::*;
