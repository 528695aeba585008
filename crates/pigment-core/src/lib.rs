//! Core utilities for the pigment family of crates.
//!
//! Contains the positioned byte source decoders read from and the
//! options decoders are configured with, put here to minimize code reuse.
pub mod bytesource;
pub mod options;
