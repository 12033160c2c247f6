//! Button-link firmware library.
//!
//! Shared by the `transmitter` and `receiver` binaries and exposed for
//! host integration testing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod pins;
pub mod protocol;

// Hardware-facing modules carry host simulation stubs behind cfg
// attributes, so they build on every target.
pub mod adapters;
pub mod drivers;
