//! Ventilation unit controller library.
//!
//! Exposes the control core, the shared-state discipline, and the adapters
//! so that integration tests and the binary build on the same pieces.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod sensors;
