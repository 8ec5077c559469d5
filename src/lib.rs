//! dialsvc - installer and service manager for the dial-up helper.
//!
//! This library backs the `dialsvc` CLI. It keeps the dialer DLL registered
//! in the RasMan `CustomDLL` multi-string value and manages the two
//! background services that run the product daemon.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod dialer;
pub mod service;
pub mod store;

/// Library-level error type for dialsvc operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not open the dialer value store: {0}")]
    StoreOpen(std::io::Error),

    #[error("could not read the dialer list: {0}")]
    StoreRead(std::io::Error),

    #[error("could not write the dialer list back: {0}")]
    StoreWrite(std::io::Error),

    #[error("could not delete the dialer list value: {0}")]
    StoreDelete(std::io::Error),

    #[error("dialer list would grow to {required} UTF-16 units; the value holds at most {max}")]
    ValueFull { required: usize, max: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("this command edits the Windows registry and services and is unavailable on this platform")]
    WindowsOnly,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Service(#[from] crate::service::ServiceError),
}

/// Result type alias for dialsvc operations.
pub type Result<T> = std::result::Result<T, Error>;
