//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// File-system or I/O operation failure.
    Io(String),
    /// No availability window of the trainer covers the requested interval.
    NotAvailable(String),
    /// The trainer already has a scheduled session overlapping the interval.
    Conflict(String),
    /// Every eligible room is booked for an overlapping interval.
    NoRoomAvailable(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Entity with the same unique key already exists.
    AlreadyExists(String),
    /// Caller supplied malformed or out-of-range input.
    InvalidInput(String),
}

impl AppError {
    /// Whether the error is one of the three booking rejections.
    #[must_use]
    pub fn is_booking_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotAvailable(_) | Self::Conflict(_) | Self::NoRoomAvailable(_)
        )
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::NotAvailable(msg) => write!(f, "not available: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::NoRoomAvailable(msg) => write!(f, "no room available: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::AlreadyExists(msg) => write!(f, "already exists: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
