//! GL Bridge Dispatch Benchmarks
//!
//! Run with: cargo run -p hypergl-bridge --example dispatch_benchmark --release

use hypergl_bridge::gl;
use hypergl_bridge::wasm::{CallTimings, GlSandbox, WasmConfig};
use hypergl_bridge::{Bridge, BridgeConfig, GuestMemory, RecordingContext};
use std::time::Instant;

/// A guest frame: clear, upload 256 bytes of vertices and one mat4, draw,
/// and check errors.
const FRAME_GUEST: &str = r#"
(module
  (import "env" "hypergl_glGenBuffers" (func $gen_buffers (param i32 i32)))
  (import "env" "hypergl_glBindBuffer" (func $bind_buffer (param i32 i32)))
  (import "env" "hypergl_glBufferData" (func $buffer_data (param i32 i32 i32 i32)))
  (import "env" "hypergl_glClear" (func $clear (param i32)))
  (import "env" "hypergl_glUniformMatrix4fv" (func $uniform_mat4 (param i32 i32 i32 i32)))
  (import "env" "hypergl_glDrawArraysInstanced" (func $draw (param i32 i32 i32 i32)))
  (import "env" "hypergl_glGetError" (func $get_error (result i32)))
  (memory (export "memory") 1)
  (func (export "setup")
    (call $gen_buffers (i32.const 1) (i32.const 16))
    (call $bind_buffer (i32.const 0x8892) (i32.load (i32.const 16))))
  (func (export "frame") (result i32)
    (call $clear (i32.const 0x4100))
    (call $buffer_data (i32.const 0x8892) (i32.const 256) (i32.const 1024) (i32.const 0x88E8))
    (call $uniform_mat4 (i32.const -1) (i32.const 1) (i32.const 0) (i32.const 2048))
    (call $draw (i32.const 4) (i32.const 0) (i32.const 3) (i32.const 1))
    (call $get_error))
)
"#;

fn main() {
    println!("=== GL Bridge Dispatch Benchmarks ===\n");

    bench_direct_dispatch();
    bench_instantiation();
    bench_guest_frames();
    bench_with_fuel_metering();

    println!("\n=== Benchmark Complete ===");
}

fn bench_direct_dispatch() {
    println!("## Direct Dispatch (no wasm)");

    let mut bytes = vec![0u8; 64 * 1024];
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = Bridge::new(RecordingContext::new());
    bridge.gen_buffers(&mut mem, 1, 16).unwrap();
    let buffer = mem.read_u32(16).unwrap();
    bridge.bind_buffer(gl::ARRAY_BUFFER, buffer).unwrap();

    let iterations = 10_000;
    for size in [64, 1024, 16384] {
        let start = Instant::now();
        for _ in 0..iterations {
            bridge
                .buffer_data(&mem, gl::ARRAY_BUFFER, size, 1024, gl::DYNAMIC_DRAW)
                .unwrap();
        }
        let per_call = start.elapsed().as_nanos() as f64 / f64::from(iterations);
        println!("  glBufferData({:>5} bytes): {:.0}ns/call", size, per_call);
        bridge.context_mut().take_calls();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        bridge.gen_textures(&mut mem, 1, 32).unwrap();
        bridge.delete_textures(&mem, 1, 32).unwrap();
    }
    let per_pair = start.elapsed().as_nanos() as f64 / f64::from(iterations);
    println!("  glGenTextures+glDeleteTextures: {:.0}ns/pair", per_pair);
    println!("  next handle after churn: {}", bridge.next_handle());
    println!();
}

fn bench_instantiation() {
    println!("## Instantiation");

    let sandbox = GlSandbox::new(WasmConfig::default()).unwrap();
    let module = sandbox.load_module_bytes("frame_guest", FRAME_GUEST).unwrap();

    // Warm up
    for _ in 0..5 {
        let _ = sandbox
            .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
            .unwrap();
    }

    let mut timings = CallTimings::new();
    for _ in 0..100 {
        let start = Instant::now();
        let _ = sandbox
            .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
            .unwrap();
        timings.record(start.elapsed().as_micros() as u64);
    }
    println!("  instantiate: {}", timings.summary());
    println!();
}

fn bench_guest_frames() {
    println!("## Guest Frames");

    let sandbox = GlSandbox::new(WasmConfig::default()).unwrap();
    let module = sandbox.load_module_bytes("frame_guest", FRAME_GUEST).unwrap();
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .unwrap();
    instance.call_void("setup").unwrap();

    // Warm up
    for _ in 0..100 {
        let _ = instance.call_i32("frame");
    }

    let mut timings = CallTimings::new();
    for _ in 0..10_000 {
        let result = instance.call_i32("frame").unwrap();
        assert_eq!(result.value as u32, gl::NO_ERROR);
        timings.record(result.execution_time_us);
        instance.bridge_mut().context_mut().take_calls();
    }
    println!("  frame (5 GL calls): {}", timings.summary());
    println!();
}

fn bench_with_fuel_metering() {
    println!("## Fuel Metering");

    let sandbox = GlSandbox::new(WasmConfig::minimal()).unwrap();
    let module = sandbox.load_module_bytes("frame_guest", FRAME_GUEST).unwrap();
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .unwrap();
    instance.call_void("setup").unwrap();

    let mut timings = CallTimings::new();
    let mut fuel = 0u64;
    for _ in 0..1_000 {
        let result = instance.call_i32("frame").unwrap();
        timings.record(result.execution_time_us);
        fuel += result.fuel_consumed.unwrap_or(0);
        instance.bridge_mut().context_mut().take_calls();
    }
    println!("  frame (metered):    {}", timings.summary());
    println!("  fuel per frame:     {:.1}", fuel as f64 / 1_000.0);
    println!("  fuel remaining:     {:?}", instance.remaining_fuel());
}
