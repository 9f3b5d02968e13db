//! djset: a small language for scripting DJ sets.
//!
//! Programs declare songs, search and organize the catalog, scratch tracks,
//! compute values with variables and loops, and ask the audio analyzer for
//! BPM and mix points. The [`engine`] runs a [`dsl::Program`] against a
//! [`engine::Context`]; [`analysis`] holds the WAV analysis backend.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod dsl;
pub mod engine;
