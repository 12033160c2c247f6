//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one end of the link
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware required.

mod link_tests;
mod receiver_tests;
