//! Error types for the bridge crate.

use thiserror::Error;

use crate::handles::ObjectKind;

/// Bridge error type
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A guest offset/length pair falls outside linear memory
    #[error("guest memory access out of bounds: offset {offset:#x}, length {len}")]
    OutOfBounds {
        /// Byte offset requested by the guest
        offset: usize,
        /// Number of bytes requested
        len: usize,
    },

    /// No NUL terminator before the end of linear memory
    #[error("unterminated string at guest offset {0:#x}")]
    UnterminatedString(u32),

    /// Storage-type tag without an element width
    #[error("unsupported element type {0:#06x}")]
    UnsupportedElementType(u32),

    /// Pixel format without a component count
    #[error("unsupported pixel format {0:#06x}")]
    UnsupportedPixelFormat(u32),

    /// Handle is unknown or refers to another kind of object (strict mode only)
    #[error("handle {handle} does not refer to a live {expected}")]
    InvalidHandle {
        /// Raw guest handle
        handle: u32,
        /// Kind the entry point expected
        expected: ObjectKind,
    },

    /// The monotonic handle counter ran out of ids
    #[error("handle space exhausted")]
    HandlesExhausted,

    /// WebAssembly runtime error
    #[error("WASM runtime error: {0}")]
    Wasm(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
