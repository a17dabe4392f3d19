//! HyperGL Command-Line Interface
//!
//! This CLI provides tools for:
//! - Running a guest module against the recording host context
//! - Checking which GL imports a guest module needs
//! - Listing the entry points the bridge provides
//!
//! Guests see no real GPU here; every call lands in a `RecordingContext`
//! whose call log can be written out as a JSON trace.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hypergl_bridge::wasm::{CallTimings, GlSandbox, WasmConfig};
use hypergl_bridge::{
    gl, import_name, lookup_import, BridgeConfig, RecordedCall, RecordingContext, ENTRY_POINTS,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "hypergl")]
#[command(author, version, about = "HyperGL guest bridge CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a guest module against the recording context
    Run {
        /// Guest module (.wasm or .wat)
        module: PathBuf,

        /// Exported function to call (default: _start, else main)
        #[arg(short, long)]
        entry: Option<String>,

        /// Number of times to call the entry point
        #[arg(short, long, default_value = "1")]
        frames: u32,

        /// JSON config file with optional "bridge" and "wasm" sections
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the recorded call trace to this JSON file
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Fuel limit for the guest (enables metering)
        #[arg(long)]
        fuel: Option<u64>,
    },

    /// List a module's GL imports and whether the bridge provides them
    Imports {
        /// Guest module (.wasm or .wat)
        module: PathBuf,

        /// Import module the entry points are expected under
        #[arg(long, default_value = "env")]
        import_module: String,
    },

    /// Print every import name the bridge provides
    EntryPoints,
}

/// Layout of the `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    bridge: BridgeConfig,
    wasm: WasmConfig,
}

impl RunConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.bridge.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            module,
            entry,
            frames,
            config,
            trace,
            fuel,
        } => cmd_run(module, entry, frames, config, trace, fuel),

        Commands::Imports {
            module,
            import_module,
        } => cmd_imports(module, import_module),

        Commands::EntryPoints => cmd_entry_points(),
    }
}

fn cmd_run(
    module_path: PathBuf,
    entry: Option<String>,
    frames: u32,
    config: Option<PathBuf>,
    trace: Option<PathBuf>,
    fuel: Option<u64>,
) -> Result<()> {
    let RunConfig {
        bridge: bridge_config,
        wasm: mut wasm_config,
    } = match config {
        Some(path) => RunConfig::load(&path)?,
        None => RunConfig::default(),
    };
    if let Some(fuel) = fuel {
        wasm_config = wasm_config.fuel_limit(fuel);
    }

    let sandbox = GlSandbox::new(wasm_config).context("Failed to create sandbox")?;
    let module = sandbox
        .load_module(&module_path)
        .with_context(|| format!("Failed to load {}", module_path.display()))?;
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), bridge_config)
        .with_context(|| format!("Failed to instantiate {}", module.name()))?;

    let entry = match entry {
        Some(name) => name,
        None if instance.has_function("_start") => "_start".to_string(),
        None if instance.has_function("main") => "main".to_string(),
        None => bail!("{} exports neither _start nor main; pass --entry", module.name()),
    };
    info!(module = %module.name(), %entry, frames, "running guest");

    let mut timings = CallTimings::new();
    let mut recorded: Vec<RecordedCall> = Vec::new();
    let mut total_calls = 0usize;
    for frame in 0..frames {
        let result = instance
            .call_void(&entry)
            .with_context(|| format!("{} failed on frame {}", entry, frame))?;
        timings.record(result.execution_time_us);

        let calls = instance.bridge_mut().context_mut().take_calls();
        total_calls += calls.len();
        if trace.is_some() {
            recorded.extend(calls);
        }
    }

    let bridge = instance.bridge();
    let pending = bridge.context().pending_error();
    println!("Module:        {}", module.name());
    println!("Entry:         {} x {}", entry, frames);
    println!("GL calls:      {}", total_calls);
    println!("Live handles:  {}", bridge.live_handles());
    println!("Host objects:  {}", bridge.context().live_objects());
    println!("Pending error: {}", error_name(pending));
    println!("Timing:        {}", timings.summary());
    if let Some(remaining) = instance.remaining_fuel() {
        println!("Fuel left:     {}", remaining);
    }
    if pending != gl::NO_ERROR {
        warn!(code = %error_name(pending), "guest left a GL error pending");
    }

    if let Some(path) = trace {
        let file = File::create(&path).context("Failed to create trace file")?;
        serde_json::to_writer_pretty(BufWriter::new(file), &recorded)
            .context("Failed to write trace file")?;
        println!("Trace:         {} ({} calls)", path.display(), recorded.len());
    }

    Ok(())
}

fn cmd_imports(module_path: PathBuf, import_module: String) -> Result<()> {
    let sandbox = GlSandbox::new(WasmConfig::default().import_module(&import_module))
        .context("Failed to create sandbox")?;
    let module = sandbox
        .load_module(&module_path)
        .with_context(|| format!("Failed to load {}", module_path.display()))?;

    let mut supported = 0;
    let mut missing = Vec::new();
    for (from, name) in module.imports() {
        if from != import_module {
            continue;
        }
        match lookup_import(name) {
            Some(gl_name) => {
                supported += 1;
                println!("  ok       {:<40} {}", name, gl_name);
            }
            None => {
                missing.push(name.to_string());
                println!("  MISSING  {}", name);
            }
        }
    }

    println!();
    println!(
        "{}: {} supported, {} missing (import module \"{}\")",
        module.name(),
        supported,
        missing.len(),
        import_module
    );
    if !missing.is_empty() {
        bail!("{} imports are not provided by the bridge", missing.len());
    }
    Ok(())
}

fn cmd_entry_points() -> Result<()> {
    for name in ENTRY_POINTS {
        println!("{}", import_name(name));
    }
    println!();
    println!("{} entry points", ENTRY_POINTS.len());
    Ok(())
}

fn error_name(code: u32) -> String {
    match code {
        gl::NO_ERROR => "NO_ERROR".to_string(),
        gl::INVALID_ENUM => "INVALID_ENUM".to_string(),
        gl::INVALID_VALUE => "INVALID_VALUE".to_string(),
        gl::INVALID_OPERATION => "INVALID_OPERATION".to_string(),
        other => format!("{other:#06x}"),
    }
}
