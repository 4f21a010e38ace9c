pub mod domain;
pub mod error;
pub mod protocol;

/// Port the receiver listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 50555;
