//! # HyperGL Bridge
//!
//! Host-side bridge that lets sandboxed WebAssembly guests issue OpenGL
//! ES 3.x style calls against a host graphics context.
//!
//! A guest only speaks in fixed-width integers and floats: object names are
//! integer handles, arrays and strings are byte offsets into its linear
//! memory. The bridge translates each call into the host's object-oriented,
//! WebGL2-shaped API ([`GlContext`]).
//!
//! ## Layers
//!
//! | Layer | Module | Role |
//! |-------|--------|------|
//! | Handles | [`handles`] | guest integer <-> host object, monotonic ids |
//! | Memory | [`memory`] | bounds-checked typed views over guest memory |
//! | Formats | [`formats`] | element widths and pixel component counts |
//! | Dispatch | [`dispatch`] | one method per entry point |
//! | Runtime | [`wasm`] | wasmtime linker registration and sandbox |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hypergl_bridge::{Bridge, GuestMemory, RecordingContext};
//!
//! let mut bridge = Bridge::new(RecordingContext::new());
//! let mut bytes = vec![0u8; 64];
//! let mut mem = GuestMemory::new(&mut bytes);
//!
//! // glGenBuffers(1, &ids[0]) writes the fresh handle at offset 0
//! bridge.gen_buffers(&mut mem, 1, 0)?;
//! let buffer = mem.read_u32(0)?;
//! bridge.bind_buffer(hypergl_bridge::gl::ARRAY_BUFFER, buffer)?;
//! ```
//!
//! ## Features
//!
//! - `wasm` (default) - wasmtime host functions, sandbox and instances

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod entry_points;
pub mod error;
pub mod formats;
pub mod gl;
pub mod handles;
pub mod memory;
pub mod recording;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export main types
pub use config::BridgeConfig;
pub use context::{ActiveInfo, GlContext, MatrixShape};
pub use dispatch::Bridge;
pub use entry_points::{import_name, lookup_import, ENTRY_POINTS};
pub use error::{BridgeError, Result};
pub use formats::ElementType;
pub use handles::{Handle, HandleTable, ObjectKind, ObjectRef, ObjectTable};
pub use memory::{GuestMemory, TypedView, TypedViewMut};
pub use recording::{HostObject, RecordedCall, RecordingContext, UniformValue};
