//! Minimal GL application for exercising the HyperGL bridge.
//!
//! Builds for `wasm32-unknown-unknown` or `wasm32-wasip1`:
//!
//! ```text
//! cargo build --release --target wasm32-wasip1
//! hypergl run target/wasm32-wasip1/release/hypergl_test_guest.wasm --entry frame --frames 60
//! ```
//!
//! `_start` compiles a program and uploads a triangle. `frame` clears, updates
//! a uniform and draws. Both return nothing; `last_error` reports the last
//! `glGetError` result.

use std::alloc::{alloc as std_alloc, dealloc as std_dealloc, Layout};

// =============================================================================
// GL Imports
// =============================================================================

#[link(wasm_import_module = "env")]
extern "C" {
    fn hypergl_glGetError() -> u32;
    fn hypergl_glGetString(name: u32) -> *const u8;
    fn hypergl_glGetIntegerv(pname: u32, data: *mut i32);
    fn hypergl_glEnable(cap: u32);
    fn hypergl_glViewport(x: i32, y: i32, width: i32, height: i32);
    fn hypergl_glClear(mask: u32);

    fn hypergl_glCreateShader(ty: u32) -> u32;
    fn hypergl_glShaderSource(shader: u32, count: i32, strings: *const *const u8, lengths: *const i32);
    fn hypergl_glCompileShader(shader: u32);
    fn hypergl_glGetShaderiv(shader: u32, pname: u32, params: *mut i32);
    fn hypergl_glCreateProgram() -> u32;
    fn hypergl_glAttachShader(program: u32, shader: u32);
    fn hypergl_glLinkProgram(program: u32);
    fn hypergl_glGetProgramiv(program: u32, pname: u32, params: *mut i32);
    fn hypergl_glUseProgram(program: u32);
    fn hypergl_glDeleteShader(shader: u32);
    fn hypergl_glGetUniformLocation(program: u32, name: *const u8) -> i32;
    fn hypergl_glGetAttribLocation(program: u32, name: *const u8) -> i32;
    fn hypergl_glUniform4fv(location: i32, count: i32, value: *const f32);
    fn hypergl_glUniformMatrix4fv(location: i32, count: i32, transpose: u32, value: *const f32);

    fn hypergl_glGenBuffers(n: i32, buffers: *mut u32);
    fn hypergl_glBindBuffer(target: u32, buffer: u32);
    fn hypergl_glBufferData(target: u32, size: i32, data: *const u8, usage: u32);
    fn hypergl_glGenVertexArrays(n: i32, arrays: *mut u32);
    fn hypergl_glBindVertexArray(array: u32);
    fn hypergl_glEnableVertexAttribArray(index: u32);
    fn hypergl_glVertexAttribPointer(index: u32, size: i32, ty: u32, normalized: u32, stride: i32, pointer: u32);
    fn hypergl_glDrawArraysInstanced(mode: u32, first: i32, count: i32, instance_count: i32);
}

const COLOR_BUFFER_BIT: u32 = 0x4000;
const DEPTH_BUFFER_BIT: u32 = 0x0100;
const DEPTH_TEST: u32 = 0x0B71;
const VENDOR: u32 = 0x1F00;
const MAX_TEXTURE_SIZE: u32 = 0x0D33;
const VERTEX_SHADER: u32 = 0x8B31;
const FRAGMENT_SHADER: u32 = 0x8B30;
const COMPILE_STATUS: u32 = 0x8B81;
const LINK_STATUS: u32 = 0x8B82;
const ARRAY_BUFFER: u32 = 0x8892;
const STATIC_DRAW: u32 = 0x88E4;
const FLOAT: u32 = 0x1406;
const TRIANGLES: u32 = 0x0004;

const VERTEX_SRC: &str = "#version 300 es
in vec2 a_position;
uniform mat4 u_transform;
void main() { gl_Position = u_transform * vec4(a_position, 0.0, 1.0); }
";

const FRAGMENT_SRC: &str = "#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 frag_color;
void main() { frag_color = u_color; }
";

static TRIANGLE: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];

struct State {
    program: u32,
    color_location: i32,
    transform_location: i32,
    frame: u32,
    last_error: u32,
}

static mut STATE: State = State {
    program: 0,
    color_location: -1,
    transform_location: -1,
    frame: 0,
    last_error: 0,
};

// =============================================================================
// Allocator Exports
// =============================================================================

/// Allocate memory for the host to write into (used by `glGetString`).
#[no_mangle]
pub extern "C" fn malloc(size: i32) -> i32 {
    match Layout::from_size_align(size.max(1) as usize, 8) {
        Ok(layout) => unsafe { std_alloc(layout) as i32 },
        Err(_) => 0,
    }
}

/// Free memory returned by [`malloc`].
#[no_mangle]
pub extern "C" fn free(ptr: i32, size: i32) {
    if let Ok(layout) = Layout::from_size_align(size.max(1) as usize, 8) {
        unsafe { std_dealloc(ptr as *mut u8, layout) };
    }
}

// =============================================================================
// Entry Points
// =============================================================================

fn compile(ty: u32, source: &str) -> u32 {
    unsafe {
        let shader = hypergl_glCreateShader(ty);
        let strings = [source.as_ptr()];
        let lengths = [source.len() as i32];
        hypergl_glShaderSource(shader, 1, strings.as_ptr(), lengths.as_ptr());
        hypergl_glCompileShader(shader);
        let mut status = 0;
        hypergl_glGetShaderiv(shader, COMPILE_STATUS, &mut status);
        shader
    }
}

/// One-time setup: query the context, build the program, upload geometry.
#[no_mangle]
pub extern "C" fn _start() {
    unsafe {
        let vendor = hypergl_glGetString(VENDOR);
        let mut max_texture = 0;
        hypergl_glGetIntegerv(MAX_TEXTURE_SIZE, &mut max_texture);
        let _ = (vendor, max_texture);

        hypergl_glViewport(0, 0, 640, 480);
        hypergl_glEnable(DEPTH_TEST);

        let vs = compile(VERTEX_SHADER, VERTEX_SRC);
        let fs = compile(FRAGMENT_SHADER, FRAGMENT_SRC);
        let program = hypergl_glCreateProgram();
        hypergl_glAttachShader(program, vs);
        hypergl_glAttachShader(program, fs);
        hypergl_glLinkProgram(program);
        let mut linked = 0;
        hypergl_glGetProgramiv(program, LINK_STATUS, &mut linked);
        hypergl_glDeleteShader(vs);
        hypergl_glDeleteShader(fs);
        hypergl_glUseProgram(program);

        let mut vao = 0;
        hypergl_glGenVertexArrays(1, &mut vao);
        hypergl_glBindVertexArray(vao);
        let mut vbo = 0;
        hypergl_glGenBuffers(1, &mut vbo);
        hypergl_glBindBuffer(ARRAY_BUFFER, vbo);
        hypergl_glBufferData(
            ARRAY_BUFFER,
            std::mem::size_of_val(&TRIANGLE) as i32,
            TRIANGLE.as_ptr() as *const u8,
            STATIC_DRAW,
        );

        let position = hypergl_glGetAttribLocation(program, b"a_position\0".as_ptr());
        if position >= 0 {
            hypergl_glEnableVertexAttribArray(position as u32);
            hypergl_glVertexAttribPointer(position as u32, 2, FLOAT, 0, 8, 0);
        }

        let state = &mut *std::ptr::addr_of_mut!(STATE);
        state.program = program;
        state.color_location = hypergl_glGetUniformLocation(program, b"u_color\0".as_ptr());
        state.transform_location = hypergl_glGetUniformLocation(program, b"u_transform\0".as_ptr());
        state.last_error = hypergl_glGetError();
    }
}

/// Render one frame.
#[no_mangle]
pub extern "C" fn frame() {
    unsafe {
        let state = &mut *std::ptr::addr_of_mut!(STATE);
        state.frame = state.frame.wrapping_add(1);
        let t = (state.frame % 60) as f32 / 60.0;

        hypergl_glClear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
        hypergl_glUseProgram(state.program);

        let color = [t, 1.0 - t, 0.5, 1.0];
        hypergl_glUniform4fv(state.color_location, 1, color.as_ptr());

        #[rustfmt::skip]
        let transform = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            t - 0.5, 0.0, 0.0, 1.0,
        ];
        hypergl_glUniformMatrix4fv(state.transform_location, 1, 0, transform.as_ptr());

        hypergl_glDrawArraysInstanced(TRIANGLES, 0, 3, 1);
        state.last_error = hypergl_glGetError();
    }
}

/// Result of the most recent `glGetError` call.
#[no_mangle]
pub extern "C" fn last_error() -> u32 {
    unsafe { (*std::ptr::addr_of!(STATE)).last_error }
}

/// Frames rendered so far.
#[no_mangle]
pub extern "C" fn frame_count() -> u32 {
    unsafe { (*std::ptr::addr_of!(STATE)).frame }
}
