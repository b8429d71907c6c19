//! Utility modules for signal processing
//!
//! Low-level helpers used by the spectrum computation.

pub mod fft;

pub use fft::Fft;
