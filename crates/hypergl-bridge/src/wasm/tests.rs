//! Tests for the guest runtime.

use super::*;
use crate::dispatch::Bridge;
use crate::entry_points::{import_name, ENTRY_POINTS};
use crate::recording::RecordingContext;

#[test]
fn test_wasm_config_default() {
    let config = WasmConfig::default();
    assert_eq!(config.max_memory, 256 * 1024 * 1024);
    assert!(config.enable_simd);
    assert_eq!(config.import_module, "env");
    assert_eq!(config.allocator_exports, vec!["malloc", "alloc"]);
}

#[test]
fn test_wasm_config_minimal() {
    let config = WasmConfig::minimal();
    assert_eq!(config.max_memory, 64 * 1024 * 1024);
    assert!(config.fuel_limit.is_some());
    assert!(!config.capabilities.stdout);
}

#[test]
fn test_wasm_config_development() {
    let config = WasmConfig::development();
    assert_eq!(config.optimization_level, 0);
    assert!(config.capabilities.stdin);
}

#[test]
fn test_wasm_config_from_json() {
    let config: WasmConfig =
        serde_json::from_str(r#"{ "import_module": "gl", "fuel_limit": 1000 }"#).unwrap();
    assert_eq!(config.import_module, "gl");
    assert_eq!(config.fuel_limit, Some(1000));
    assert_eq!(config.max_memory, 256 * 1024 * 1024);
}

#[test]
fn test_wasi_capabilities_none() {
    let caps = WasiCapabilities::none();
    assert!(!caps.stdin);
    assert!(!caps.stdout);
    assert!(!caps.stderr);
    assert!(caps.env_vars.is_empty());
}

#[test]
fn test_wasi_capabilities_builder() {
    let caps = WasiCapabilities::none()
        .stdout(true)
        .env("HYPERGL_DEBUG", "1")
        .arg("--frames");

    assert!(!caps.stdin);
    assert!(caps.stdout);
    assert_eq!(caps.env_vars.len(), 1);
    assert_eq!(caps.args.len(), 1);
}

#[test]
fn test_wasm_config_builder_chain() {
    let config = WasmConfig::default()
        .max_memory(128 * 1024 * 1024)
        .fuel_limit(500_000_000)
        .import_module("gl")
        .allocators(["hypergl_alloc"])
        .optimize(3);

    assert_eq!(config.max_memory, 128 * 1024 * 1024);
    assert_eq!(config.fuel_limit, Some(500_000_000));
    assert_eq!(config.import_module, "gl");
    assert_eq!(config.allocator_exports, vec!["hypergl_alloc"]);
    assert_eq!(config.optimization_level, 2);
}

#[test]
fn test_sandbox_creation() {
    let sandbox = GlSandbox::new(WasmConfig::default());
    assert!(sandbox.is_ok());
}

#[test]
fn test_every_entry_point_is_linked() {
    let sandbox = GlSandbox::new(WasmConfig::minimal()).unwrap();
    let linker = sandbox.linker::<RecordingContext>().unwrap();
    let mut store = sandbox.new_store(Bridge::new(RecordingContext::new())).unwrap();

    for name in ENTRY_POINTS {
        assert!(
            linker.get(&mut store, "env", &import_name(name)).is_some(),
            "{name} is not linked"
        );
    }
    assert!(linker.get(&mut store, "env", "hypergl_glBegin").is_none());
}

#[test]
fn test_custom_import_module() {
    let sandbox = GlSandbox::new(WasmConfig::minimal().import_module("gl")).unwrap();
    let linker = sandbox.linker::<RecordingContext>().unwrap();
    let mut store = sandbox.new_store(Bridge::new(RecordingContext::new())).unwrap();

    assert!(linker.get(&mut store, "gl", "hypergl_glFlush").is_some());
    assert!(linker.get(&mut store, "env", "hypergl_glFlush").is_none());
}

#[test]
fn test_timings_empty() {
    let timings = CallTimings::new();
    assert_eq!(timings.count(), 0);
    assert_eq!(timings.mean_us(), 0.0);
    assert_eq!(timings.p50_us(), 0);
    assert_eq!(timings.p99_us(), 0);
}

#[test]
fn test_timings_percentiles() {
    let mut timings = CallTimings::new();
    for i in 1..=100 {
        timings.record(i);
    }

    assert_eq!(timings.count(), 100);
    assert_eq!(timings.min_us(), 1);
    assert_eq!(timings.max_us(), 100);
    // nearest rank: index 50 holds 51
    assert_eq!(timings.p50_us(), 51);
    assert_eq!(timings.p99_us(), 100);
}

#[test]
fn test_timings_summary() {
    let mut timings = CallTimings::new();
    timings.record(10);
    timings.record(20);

    let summary = timings.summary();
    assert!(summary.contains("n=2"));
    assert!(summary.contains("min=10us"));
    assert!(summary.contains("max=20us"));
}
