//! `seebeck-fit` library crate.
//!
//! Fits measured (conductivity, Seebeck) pairs against single-band
//! scattering models and renders the theoretical curves next to the data.
//!
//! The binary (`sfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the TUI and the plain CLI share one pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
