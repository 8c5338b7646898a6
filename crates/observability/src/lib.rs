//! Tracing/logging setup shared by every binary and test harness.

pub mod tracing;

pub use self::tracing::{LogFormat, UnknownLogFormat, init, init_with};
