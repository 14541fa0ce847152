//! Single-band transport expressions for the scattering mechanisms.
//!
//! Models are implemented as small, pure functions so that the fitting code can
//! stay generic over `ScatteringMechanism`.

pub mod transport;

pub use transport::*;
