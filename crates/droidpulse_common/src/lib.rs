//! DroidPulse Common - shared types, parsers, and clients.
//!
//! Collection and analysis live here so the CLI stays a thin presentation
//! layer: the ADB runner, the typed device record, one parser per command
//! output format, the LLM client, and the health analysis engine.

pub mod adb;
pub mod analysis;
pub mod collector;
pub mod error;
pub mod llm;
pub mod netdiag;
pub mod parsers;
pub mod record;

pub use error::PulseError;
pub use record::*;
