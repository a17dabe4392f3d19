//! Guest runtime using wasmtime.
//!
//! Uses wasmtime-wasi preview1 so guests built for `wasm32-wasip1` link
//! without extra shims.

use super::config::{WasiCapabilities, WasmConfig};
use super::host_functions::GlHostFunctions;
use crate::config::BridgeConfig;
use crate::context::GlContext;
use crate::dispatch::Bridge;
use crate::error::{BridgeError, Result};

use std::path::Path;
use std::time::Instant;

use wasmtime::*;

/// Store state: the bridge plus the WASI context and resource limits.
pub struct GlHostState<C: GlContext> {
    pub(crate) bridge: Bridge<C>,
    pub(crate) allocators: Vec<String>,
    preview1: wasmtime_wasi::preview1::WasiP1Ctx,
    limits: StoreLimits,
}

/// Engine and runtime configuration shared by every guest it loads.
pub struct GlSandbox {
    engine: Engine,
    config: WasmConfig,
}

/// A compiled guest module.
pub struct GlModule {
    module: Module,
    name: String,
}

/// An instantiated guest, bound to one host context.
pub struct GlInstance<C: GlContext> {
    store: Store<GlHostState<C>>,
    instance: Instance,
}

/// Result of a guest call with timing information.
#[derive(Debug, Clone)]
pub struct WasmCallResult<T> {
    /// The return value
    pub value: T,
    /// Execution time in microseconds
    pub execution_time_us: u64,
    /// Fuel consumed (if fuel metering enabled)
    pub fuel_consumed: Option<u64>,
}

impl GlSandbox {
    /// Build the engine for `config`.
    pub fn new(config: WasmConfig) -> Result<Self> {
        let mut engine_config = Config::new();

        engine_config.cranelift_opt_level(match config.optimization_level {
            0 => OptLevel::None,
            1 => OptLevel::Speed,
            _ => OptLevel::SpeedAndSize,
        });
        engine_config.wasm_simd(config.enable_simd);

        if config.fuel_limit.is_some() {
            engine_config.consume_fuel(true);
        }

        if let Some(ref cache_path) = config.cache_path {
            if let Err(e) = engine_config.cache_config_load(cache_path) {
                tracing::warn!("Failed to load cache config: {}", e);
            }
        }

        let engine = Engine::new(&engine_config)
            .map_err(|e| BridgeError::Wasm(format!("engine creation failed: {}", e)))?;

        Ok(Self { engine, config })
    }

    /// Load a guest module from a `.wasm` or `.wat` file.
    pub fn load_module(&self, path: impl AsRef<Path>) -> Result<GlModule> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let module = Module::from_file(&self.engine, path)
            .map_err(|e| BridgeError::Wasm(format!("module load failed: {}", e)))?;
        tracing::info!(module = %name, "loaded guest module");

        Ok(GlModule { module, name })
    }

    /// Load a guest module from binary or text bytes.
    pub fn load_module_bytes(&self, name: &str, bytes: impl AsRef<[u8]>) -> Result<GlModule> {
        let module = Module::new(&self.engine, bytes)
            .map_err(|e| BridgeError::Wasm(format!("module creation failed: {}", e)))?;
        tracing::info!(module = %name, "loaded guest module");

        Ok(GlModule {
            module,
            name: name.to_string(),
        })
    }

    /// Instantiate `module` with its GL imports served by `ctx`.
    pub fn instantiate<C>(
        &self,
        module: &GlModule,
        ctx: C,
        bridge_config: BridgeConfig,
    ) -> Result<GlInstance<C>>
    where
        C: GlContext + Send + 'static,
    {
        bridge_config.validate()?;
        let mut store = self.new_store(Bridge::with_config(ctx, bridge_config))?;
        let linker = self.linker::<C>()?;

        let instance = linker
            .instantiate(&mut store, &module.module)
            .map_err(|e| BridgeError::Wasm(format!("instantiation failed: {}", e)))?;
        tracing::info!(module = %module.name, import_module = %self.config.import_module, "instantiated guest");

        Ok(GlInstance { store, instance })
    }

    /// Store holding `bridge`, with memory limits and fuel applied.
    pub(crate) fn new_store<C>(&self, bridge: Bridge<C>) -> Result<Store<GlHostState<C>>>
    where
        C: GlContext + Send + 'static,
    {
        let host_state = self.build_host_state(&self.config.capabilities, bridge);
        let mut store = Store::new(&self.engine, host_state);

        store.limiter(|state| &mut state.limits);

        if let Some(fuel) = self.config.fuel_limit {
            store
                .set_fuel(fuel)
                .map_err(|e| BridgeError::Wasm(format!("fuel setup failed: {}", e)))?;
        }
        Ok(store)
    }

    /// Linker with WASI preview1 and every GL entry point defined.
    pub(crate) fn linker<C>(&self) -> Result<Linker<GlHostState<C>>>
    where
        C: GlContext + Send + 'static,
    {
        let mut linker: Linker<GlHostState<C>> = Linker::new(&self.engine);
        wasmtime_wasi::preview1::add_to_linker_sync(&mut linker, |state| &mut state.preview1)
            .map_err(|e| BridgeError::Wasm(format!("WASI link failed: {}", e)))?;

        GlHostFunctions::register(&mut linker, &self.config.import_module)?;
        Ok(linker)
    }

    fn build_host_state<C: GlContext>(&self, caps: &WasiCapabilities, bridge: Bridge<C>) -> GlHostState<C> {
        let mut builder = wasmtime_wasi::WasiCtxBuilder::new();

        if caps.stdin {
            builder.inherit_stdin();
        }
        if caps.stdout {
            builder.inherit_stdout();
        }
        if caps.stderr {
            builder.inherit_stderr();
        }
        for (key, value) in &caps.env_vars {
            builder.env(key, value);
        }
        builder.args(&caps.args);

        let preview1 = builder.build_p1();
        let limits = StoreLimitsBuilder::new()
            .memory_size(self.config.max_memory)
            .build();

        GlHostState {
            bridge,
            allocators: self.config.allocator_exports.clone(),
            preview1,
            limits,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &WasmConfig {
        &self.config
    }

    /// The underlying engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl GlModule {
    /// Get the module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exported function names.
    pub fn exports(&self) -> impl Iterator<Item = &str> {
        self.module.exports().filter_map(|e| {
            if matches!(e.ty(), ExternType::Func(_)) {
                Some(e.name())
            } else {
                None
            }
        })
    }

    /// `(module, name)` of every import.
    pub fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.module.imports().map(|i| (i.module(), i.name()))
    }
}

impl<C: GlContext> GlInstance<C> {
    fn timed_call<P, R>(&mut self, name: &str, params: P) -> Result<WasmCallResult<R>>
    where
        P: WasmParams,
        R: WasmResults,
    {
        let func = self
            .instance
            .get_typed_func::<P, R>(&mut self.store, name)
            .map_err(|e| BridgeError::Wasm(format!("function '{}' not found: {}", name, e)))?;
        let start = Instant::now();
        let fuel_before = self.store.get_fuel().ok();

        let value = func
            .call(&mut self.store, params)
            .map_err(|e| BridgeError::Wasm(format!("call failed: {:#}", e)))?;

        let fuel_after = self.store.get_fuel().ok();
        let fuel_consumed = fuel_before.zip(fuel_after).map(|(b, a)| b - a);

        Ok(WasmCallResult {
            value,
            execution_time_us: start.elapsed().as_micros() as u64,
            fuel_consumed,
        })
    }

    /// Call a function that takes no arguments and returns nothing.
    pub fn call_void(&mut self, name: &str) -> Result<WasmCallResult<()>> {
        self.timed_call(name, ())
    }

    /// Call a function that takes no arguments and returns an i32.
    pub fn call_i32(&mut self, name: &str) -> Result<WasmCallResult<i32>> {
        self.timed_call(name, ())
    }

    /// Call a function that takes an i32 and returns an i32.
    pub fn call_i32_i32(&mut self, name: &str, arg: i32) -> Result<WasmCallResult<i32>> {
        self.timed_call(name, arg)
    }

    /// Whether the guest exports a function called `name`.
    pub fn has_function(&mut self, name: &str) -> bool {
        self.instance.get_func(&mut self.store, name).is_some()
    }

    /// Write bytes to guest memory at the given offset.
    pub fn write_memory(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let memory = self.get_memory()?;
        let mem_data = memory.data_mut(&mut self.store);
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= mem_data.len())
            .ok_or(BridgeError::OutOfBounds { offset, len: data.len() })?;
        mem_data[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Read bytes from guest memory at the given offset.
    pub fn read_memory(&mut self, offset: usize, len: usize) -> Result<Vec<u8>> {
        let memory = self.get_memory()?;
        let mem_data = memory.data(&self.store);
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= mem_data.len())
            .ok_or(BridgeError::OutOfBounds { offset, len })?;
        Ok(mem_data[offset..end].to_vec())
    }

    fn get_memory(&mut self) -> Result<Memory> {
        self.instance
            .get_memory(&mut self.store, "memory")
            .ok_or_else(|| BridgeError::Wasm("no memory export found".to_string()))
    }

    /// The bridge serving this guest.
    pub fn bridge(&self) -> &Bridge<C> {
        &self.store.data().bridge
    }

    /// Mutable access to the bridge serving this guest.
    pub fn bridge_mut(&mut self) -> &mut Bridge<C> {
        &mut self.store.data_mut().bridge
    }

    /// Tear down the guest and hand back the bridge.
    pub fn into_bridge(self) -> Bridge<C> {
        self.store.into_data().bridge
    }

    /// Get remaining fuel (if fuel metering enabled).
    pub fn remaining_fuel(&self) -> Option<u64> {
        self.store.get_fuel().ok()
    }
}

/// Per-call timing samples with a percentile summary.
#[derive(Debug, Clone, Default)]
pub struct CallTimings {
    samples: Vec<u64>,
}

impl CallTimings {
    /// Empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timing sample in microseconds.
    pub fn record(&mut self, us: u64) {
        self.samples.push(us);
    }

    /// Number of samples.
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Mean in microseconds.
    pub fn mean_us(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<u64>() as f64 / self.samples.len() as f64
    }

    /// Median in microseconds.
    pub fn p50_us(&self) -> u64 {
        self.percentile(50)
    }

    /// 99th percentile in microseconds.
    pub fn p99_us(&self) -> u64 {
        self.percentile(99)
    }

    /// Nearest-rank percentile.
    pub fn percentile(&self, p: usize) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        let idx = (p * sorted.len() / 100).min(sorted.len() - 1);
        sorted[idx]
    }

    /// Fastest sample.
    pub fn min_us(&self) -> u64 {
        self.samples.iter().copied().min().unwrap_or(0)
    }

    /// Slowest sample.
    pub fn max_us(&self) -> u64 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "n={} min={}us mean={:.1}us p50={}us p99={}us max={}us",
            self.count(),
            self.min_us(),
            self.mean_us(),
            self.p50_us(),
            self.p99_us(),
            self.max_us()
        )
    }
}
