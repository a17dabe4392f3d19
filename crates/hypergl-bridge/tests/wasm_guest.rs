//! Integration tests running small WAT guests through the sandbox.
//!
//! Each guest imports a handful of `env.hypergl_*` entry points and drives
//! them the way a compiled GL application would.

#![cfg(feature = "wasm")]

use hypergl_bridge::gl;
use hypergl_bridge::wasm::{GlSandbox, WasmConfig};
use hypergl_bridge::{BridgeConfig, RecordingContext, UniformValue};

const BUFFER_GUEST: &str = r#"
(module
  (import "env" "hypergl_glGenBuffers" (func $gen_buffers (param i32 i32)))
  (import "env" "hypergl_glBindBuffer" (func $bind_buffer (param i32 i32)))
  (import "env" "hypergl_glBufferData" (func $buffer_data (param i32 i32 i32 i32)))
  (import "env" "hypergl_glGetError" (func $get_error (result i32)))
  (memory (export "memory") 1)
  ;; two little-endian f32s: 0.0, 0.5
  (data (i32.const 256) "\00\00\00\00\00\00\00\3f")
  (func (export "upload") (result i32)
    (call $gen_buffers (i32.const 1) (i32.const 16))
    (call $bind_buffer (i32.const 0x8892) (i32.load (i32.const 16)))
    (call $buffer_data (i32.const 0x8892) (i32.const 8) (i32.const 256) (i32.const 0x88E4))
    (call $get_error))
  (func (export "handle") (result i32)
    (i32.load (i32.const 16)))
  (func (export "bad_pointer")
    (call $gen_buffers (i32.const 1) (i32.const 0xFFFFFFF0)))
)
"#;

const STRING_GUEST: &str = r#"
(module
  (import "env" "hypergl_glGetString" (func $get_string (param i32) (result i32)))
  (memory (export "memory") 1)
  (global $next (mut i32) (i32.const 4096))
  (func (export "malloc") (param $size i32) (result i32)
    (local $ptr i32)
    (local.set $ptr (global.get $next))
    (global.set $next (i32.add (global.get $next) (local.get $size)))
    (local.get $ptr))
  (func (export "vendor") (result i32)
    (call $get_string (i32.const 0x1F00)))
  (func (export "unknown") (result i32)
    (call $get_string (i32.const 0xDEAD)))
  (func (export "heap_top") (result i32)
    (global.get $next))
)
"#;

const NO_ALLOCATOR_GUEST: &str = r#"
(module
  (import "env" "hypergl_glGetString" (func $get_string (param i32) (result i32)))
  (memory (export "memory") 1)
  (func (export "vendor") (result i32)
    (call $get_string (i32.const 0x1F00)))
)
"#;

const UNIFORM_GUEST: &str = r#"
(module
  (import "env" "hypergl_glUniform4fv" (func $uniform4fv (param i32 i32 i32)))
  (import "env" "hypergl_glUniformMatrix3x2fv" (func $uniform_mat3x2 (param i32 i32 i32 i32)))
  (import "env" "hypergl_glEnable" (func $enable (param i32)))
  (import "env" "hypergl_glDispatchCompute" (func $dispatch (param i32 i32 i32)))
  (memory (export "memory") 1)
  (func (export "_start")
    (call $enable (i32.const 0x0B71))
    (call $uniform4fv (i32.const -1) (i32.const 1) (i32.const 0))
    (call $uniform_mat3x2 (i32.const -1) (i32.const 1) (i32.const 0) (i32.const 0))
    (call $dispatch (i32.const 8) (i32.const 8) (i32.const 1)))
)
"#;

const UNKNOWN_IMPORT_GUEST: &str = r#"
(module
  (import "env" "hypergl_glBegin" (func $begin (param i32)))
  (memory (export "memory") 1)
)
"#;

fn sandbox() -> GlSandbox {
    GlSandbox::new(WasmConfig::minimal()).expect("failed to create sandbox")
}

#[test]
fn test_guest_buffer_upload() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("buffer_guest", BUFFER_GUEST)
        .expect("failed to load module");

    let imports: Vec<_> = module.imports().map(|(_, name)| name.to_string()).collect();
    assert!(imports.contains(&"hypergl_glBufferData".to_string()));

    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .expect("failed to instantiate");

    let result = instance.call_i32("upload").expect("upload call failed");
    assert_eq!(result.value as u32, gl::NO_ERROR);
    println!("upload() ({}us, fuel {:?})", result.execution_time_us, result.fuel_consumed);

    let handle = instance.call_i32("handle").expect("handle call failed").value;
    assert_eq!(handle, 1);

    let ctx = instance.bridge().context();
    let host = ctx.bound_buffer(gl::ARRAY_BUFFER).expect("buffer should be bound");
    let contents = ctx.buffer_contents(host).expect("buffer should exist");
    assert_eq!(contents, &[0, 0, 0, 0, 0, 0, 0, 0x3f][..]);
}

#[test]
fn test_guest_bad_pointer_traps() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("buffer_guest", BUFFER_GUEST)
        .expect("failed to load module");
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .expect("failed to instantiate");

    let err = instance.call_void("bad_pointer").expect_err("call should trap");
    println!("bad_pointer trapped: {err}");
    assert!(err.to_string().contains("out of bounds"));

    // Nothing was created on the host.
    assert_eq!(instance.bridge().live_handles(), 0);
    assert_eq!(instance.bridge().context().live_objects(), 0);
}

#[test]
fn test_guest_get_string_uses_guest_allocator() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("string_guest", STRING_GUEST)
        .expect("failed to load module");
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .expect("failed to instantiate");

    let first = instance.call_i32("vendor").expect("vendor call failed").value;
    assert_eq!(first, 4096);
    let bytes = instance.read_memory(first as usize, 8).expect("read_memory failed");
    assert_eq!(&bytes, b"HyperGL\0");

    // Cached: the second query returns the same pointer without allocating.
    let second = instance.call_i32("vendor").expect("vendor call failed").value;
    assert_eq!(second, first);
    assert_eq!(instance.bridge().cached_string(gl::VENDOR), Some(4096));

    // The bridge owns the string: the guest allocator ran exactly once.
    let heap_top = instance.call_i32("heap_top").expect("heap_top call failed").value;
    assert_eq!(heap_top, 4096 + 8);

    let unknown = instance.call_i32("unknown").expect("unknown call failed").value;
    assert_eq!(unknown, 0);
}

#[test]
fn test_guest_get_string_without_allocator() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("no_alloc_guest", NO_ALLOCATOR_GUEST)
        .expect("failed to load module");
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .expect("failed to instantiate");

    let ptr = instance.call_i32("vendor").expect("vendor call failed").value;
    assert_eq!(ptr, 0);
    assert_eq!(instance.bridge().cached_string(gl::VENDOR), None);
}

#[test]
fn test_guest_uniform_and_placeholder_calls() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("uniform_guest", UNIFORM_GUEST)
        .expect("failed to load module");
    let mut instance = sandbox
        .instantiate(&module, RecordingContext::new(), BridgeConfig::default())
        .expect("failed to instantiate");

    assert!(instance.has_function("_start"));
    instance.call_void("_start").expect("_start failed");

    let ctx = instance.into_bridge().into_context();
    assert!(ctx.is_enabled(gl::DEPTH_TEST));
    assert_eq!(ctx.call_count("uniform4fv"), 1);
    assert_eq!(ctx.last_call("uniformMatrix3x2fv").unwrap().payload_len, 24);
    assert_eq!(ctx.uniform_value("anything"), None::<&UniformValue>);
    assert_eq!(ctx.pending_error(), gl::NO_ERROR);
}

#[test]
fn test_unknown_import_fails_to_link() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("unknown_guest", UNKNOWN_IMPORT_GUEST)
        .expect("failed to load module");

    let result = sandbox.instantiate(&module, RecordingContext::new(), BridgeConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_invalid_bridge_config_rejected() {
    let sandbox = sandbox();
    let module = sandbox
        .load_module_bytes("uniform_guest", UNIFORM_GUEST)
        .expect("failed to load module");

    let config = BridgeConfig::default().integer_query_clamp(-1);
    let result = sandbox.instantiate(&module, RecordingContext::new(), config);
    assert!(result.is_err());
}
