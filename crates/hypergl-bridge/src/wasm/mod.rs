//! wasmtime host glue for GL guests.
//!
//! This module links guest modules against the bridge: every entry point is
//! registered as a host function, guest linear memory is handed to the
//! dispatcher for the duration of each call, and WASI preview1 is provided so
//! guests compiled for `wasm32-wasip1` link unchanged.
//!
//! ## Isolation Model
//!
//! - **Memory isolation**: the host only touches guest memory through
//!   bounds-checked views, one call at a time
//! - **Deny-by-default WASI**: only stdout/stderr are granted unless
//!   configured otherwise
//! - **Traps, not corruption**: a bad guest pointer or string traps the call
//!   instead of reaching the host context
//! - **Fuel metering**: optional, for bounding runaway guests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hypergl_bridge::wasm::{GlSandbox, WasmConfig};
//! use hypergl_bridge::{BridgeConfig, RecordingContext};
//!
//! let sandbox = GlSandbox::new(WasmConfig::default())?;
//! let module = sandbox.load_module("guest.wasm")?;
//! let mut instance = sandbox.instantiate(&module, RecordingContext::new(), BridgeConfig::default())?;
//!
//! instance.call_void("_start")?;
//! let ctx = instance.into_bridge().into_context();
//! ```

mod config;
mod host_functions;
mod runtime;

pub use config::{WasiCapabilities, WasmConfig};
pub use host_functions::GlHostFunctions;
pub use runtime::{CallTimings, GlHostState, GlInstance, GlModule, GlSandbox, WasmCallResult};

#[cfg(test)]
mod tests;
