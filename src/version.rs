//! Version information for smswatch.

/// Compile-time version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
