//! Rail error types

use crate::state::ItemId;
use thiserror::Error;

/// Errors surfaced by rail collaborators and configuration
///
/// None of these are fatal: the scheduler degrades to "the rail does not
/// move this tick" and keeps running.
#[derive(Error, Debug)]
pub enum RailError {
    /// The geometry provider has no record of the item
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// The style sink failed to apply an emitted style
    #[error("Style sink failed: {0}")]
    Sink(String),

    /// Invalid or unparsable configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O failure while loading configuration or writing styles
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for rail operations
pub type Result<T> = std::result::Result<T, RailError>;
