pub mod config;
#[cfg(unix)]
pub mod host;
pub mod ring;
pub mod serial;
