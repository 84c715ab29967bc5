//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises a subsystem against mock
//! adapters. Everything runs on the host with no sensor hardware.

mod control_loop_tests;
mod mock_hw;
