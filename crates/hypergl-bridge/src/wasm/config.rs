//! Configuration for the guest runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// WASI capability grants for guest modules.
///
/// Everything starts disabled; a rendering guest normally needs at most
/// stdout/stderr for its own diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WasiCapabilities {
    /// Allow access to stdin
    pub stdin: bool,

    /// Allow access to stdout
    pub stdout: bool,

    /// Allow access to stderr
    pub stderr: bool,

    /// Environment variables to expose
    pub env_vars: Vec<(String, String)>,

    /// Command-line arguments to pass
    pub args: Vec<String>,
}

impl WasiCapabilities {
    /// Nothing allowed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Output streams only, for guests that print diagnostics.
    pub fn guest() -> Self {
        Self {
            stdout: true,
            stderr: true,
            ..Default::default()
        }
    }

    /// All three stdio streams.
    pub fn with_stdio() -> Self {
        Self {
            stdin: true,
            stdout: true,
            stderr: true,
            ..Default::default()
        }
    }

    /// Builder: enable stdin
    pub fn stdin(mut self, allow: bool) -> Self {
        self.stdin = allow;
        self
    }

    /// Builder: enable stdout
    pub fn stdout(mut self, allow: bool) -> Self {
        self.stdout = allow;
        self
    }

    /// Builder: enable stderr
    pub fn stderr(mut self, allow: bool) -> Self {
        self.stderr = allow;
        self
    }

    /// Builder: add environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Builder: add command-line argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// Configuration for the guest runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WasmConfig {
    /// WASI capability configuration
    pub capabilities: WasiCapabilities,

    /// Maximum guest memory in bytes (default = 256MB)
    pub max_memory: usize,

    /// Enable fuel-based execution limiting
    pub fuel_limit: Option<u64>,

    /// Cranelift optimization level (0-2)
    pub optimization_level: u8,

    /// Enable SIMD support
    pub enable_simd: bool,

    /// wasmtime cache configuration file
    pub cache_path: Option<PathBuf>,

    /// Import module the entry points are registered under
    pub import_module: String,

    /// Guest exports tried, in order, when the host must allocate guest memory
    pub allocator_exports: Vec<String>,
}

impl Default for WasmConfig {
    fn default() -> Self {
        Self {
            capabilities: WasiCapabilities::guest(),
            max_memory: 256 * 1024 * 1024,
            fuel_limit: None,
            optimization_level: 2,
            enable_simd: true,
            cache_path: None,
            import_module: "env".to_string(),
            allocator_exports: vec!["malloc".to_string(), "alloc".to_string()],
        }
    }
}

impl WasmConfig {
    /// Minimal config: no WASI access, 64 MB, fuel metered.
    pub fn minimal() -> Self {
        Self {
            capabilities: WasiCapabilities::none(),
            max_memory: 64 * 1024 * 1024,
            fuel_limit: Some(1_000_000_000),
            ..Default::default()
        }
    }

    /// Config for development/debugging
    pub fn development() -> Self {
        Self {
            capabilities: WasiCapabilities::with_stdio(),
            optimization_level: 0,
            ..Default::default()
        }
    }

    /// Builder: set capabilities
    pub fn capabilities(mut self, caps: WasiCapabilities) -> Self {
        self.capabilities = caps;
        self
    }

    /// Builder: set max memory
    pub fn max_memory(mut self, bytes: usize) -> Self {
        self.max_memory = bytes;
        self
    }

    /// Builder: set fuel limit
    pub fn fuel_limit(mut self, fuel: u64) -> Self {
        self.fuel_limit = Some(fuel);
        self
    }

    /// Builder: enable SIMD
    pub fn simd(mut self, enable: bool) -> Self {
        self.enable_simd = enable;
        self
    }

    /// Builder: set optimization level
    pub fn optimize(mut self, level: u8) -> Self {
        self.optimization_level = level.min(2);
        self
    }

    /// Builder: set cache path
    pub fn cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Builder: set the import module name
    pub fn import_module(mut self, module: impl Into<String>) -> Self {
        self.import_module = module.into();
        self
    }

    /// Builder: set the allocator exports, in lookup order
    pub fn allocators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allocator_exports = names.into_iter().map(Into::into).collect();
        self
    }
}
