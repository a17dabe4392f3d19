//! Integration tests driving the dispatcher directly against the recording
//! context, with a plain byte vector standing in for guest memory.

use hypergl_bridge::gl;
use hypergl_bridge::{
    Bridge, BridgeConfig, BridgeError, GuestMemory, Handle, MatrixShape, ObjectKind,
    RecordingContext, UniformValue,
};
use rand::Rng;

const MEMORY_SIZE: usize = 64 * 1024;

const VERTEX_SRC: &str = "#version 300 es
layout(location = 0) in vec3 a_position;
in vec2 a_uv;
uniform mat4 u_mvp;
uniform Lights {
    vec4 direction;
    vec4 color;
};
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
";

const FRAGMENT_SRC: &str = "#version 300 es
precision highp float;
uniform vec4 u_tint;
uniform sampler2D u_albedo;
in vec2 v_uv;
out vec4 frag_color;
void main() {
    frag_color = texture(u_albedo, v_uv) * u_tint;
}
";

fn guest_memory() -> Vec<u8> {
    vec![0u8; MEMORY_SIZE]
}

fn bridge() -> Bridge<RecordingContext> {
    Bridge::new(RecordingContext::new())
}

/// Compile and link `VERTEX_SRC` + `FRAGMENT_SRC`, returning the program
/// handle.
fn build_program(bridge: &mut Bridge<RecordingContext>, mem: &mut GuestMemory<'_>) -> u32 {
    let vs = bridge.create_shader(gl::VERTEX_SHADER).expect("create vertex shader");
    let fs = bridge.create_shader(gl::FRAGMENT_SHADER).expect("create fragment shader");

    for (shader, src) in [(vs, VERTEX_SRC), (fs, FRAGMENT_SRC)] {
        mem.write_cstring(0x2000, src).expect("write source");
        mem.write_u32(0x100, 0x2000).expect("write string pointer");
        bridge.shader_source(mem, shader, 1, 0x100, 0).expect("glShaderSource");
        bridge.compile_shader(shader).expect("glCompileShader");
    }

    let program = bridge.create_program().expect("create program");
    bridge.attach_shader(program, vs).expect("attach vs");
    bridge.attach_shader(program, fs).expect("attach fs");
    bridge.link_program(program).expect("glLinkProgram");
    program
}

// ============================================================================
// Handles
// ============================================================================

#[test]
fn test_handles_start_at_one_and_increase() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    assert_eq!(bridge.next_handle(), Handle::from_raw(1));
    bridge.gen_buffers(&mut mem, 1, 0x10).expect("glGenBuffers");
    bridge.gen_textures(&mut mem, 1, 0x14).expect("glGenTextures");
    let shader = bridge.create_shader(gl::VERTEX_SHADER).expect("glCreateShader");

    assert_eq!(mem.read_u32(0x10).unwrap(), 1);
    assert_eq!(mem.read_u32(0x14).unwrap(), 2);
    assert_eq!(shader, 3);
    assert_eq!(bridge.live_handles(), 3);
}

#[test]
fn test_deleted_handles_are_not_reused() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = Bridge::with_config(RecordingContext::new(), BridgeConfig::strict());

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    let first = mem.read_u32(0x10).unwrap();
    assert_eq!(first, 1);
    bridge.bind_buffer(gl::ARRAY_BUFFER, first).expect("live handle binds");

    bridge.delete_buffers(&mem, 1, 0x10).unwrap();
    assert_eq!(bridge.live_handles(), 0);
    assert_eq!(bridge.context().live_objects(), 0);

    let err = bridge
        .bind_buffer(gl::ARRAY_BUFFER, first)
        .expect_err("deleted handle must not resolve");
    assert!(matches!(err, BridgeError::InvalidHandle { handle: 1, .. }), "{err}");

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    let second = mem.read_u32(0x10).unwrap();
    assert_eq!(second, 2);
    bridge.bind_buffer(gl::ARRAY_BUFFER, second).expect("new handle binds");
}

#[test]
fn test_gen_with_non_positive_count_is_noop() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_textures(&mut mem, 0, 0x10).unwrap();
    bridge.gen_samplers(&mut mem, -3, 0x10).unwrap();
    assert_eq!(bridge.live_handles(), 0);
    assert_eq!(mem.read_u32(0x10).unwrap(), 0);
    assert_eq!(bridge.context().call_count("createTexture"), 0);
}

#[test]
fn test_plural_gen_creates_single_object() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_framebuffers(&mut mem, 4, 0x10).unwrap();
    assert_eq!(bridge.live_handles(), 1);
    assert_eq!(mem.read_u32(0x10).unwrap(), 1);
    assert_eq!(mem.read_u32(0x14).unwrap(), 0);
}

#[test]
fn test_gen_into_bad_slot_creates_nothing() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    let err = bridge
        .gen_vertex_arrays(&mut mem, 1, (MEMORY_SIZE - 2) as u32)
        .unwrap_err();
    assert!(matches!(err, BridgeError::OutOfBounds { .. }));
    assert_eq!(bridge.live_handles(), 0);
    assert_eq!(bridge.context().live_objects(), 0);
}

#[test]
fn test_zero_handle_binds_null() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    let buffer = mem.read_u32(0x10).unwrap();
    bridge.bind_buffer(gl::ARRAY_BUFFER, buffer).unwrap();
    assert!(bridge.context().bound_buffer(gl::ARRAY_BUFFER).is_some());

    bridge.bind_buffer(gl::ARRAY_BUFFER, 0).unwrap();
    assert!(bridge.context().bound_buffer(gl::ARRAY_BUFFER).is_none());
    assert_eq!(bridge.context().last_call("bindBuffer").unwrap().args[1], 0.0);
}

#[test]
fn test_unknown_handle_is_null_in_lenient_mode() {
    let mut bridge = bridge();

    bridge.bind_texture(gl::TEXTURE_2D, 77).expect("lenient bind");
    let call = bridge.context().last_call("bindTexture").unwrap();
    assert_eq!(call.args, vec![f64::from(gl::TEXTURE_2D), 0.0]);
}

#[test]
fn test_wrong_kind_rejected_in_strict_mode() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = Bridge::with_config(RecordingContext::new(), BridgeConfig::strict());

    bridge.gen_textures(&mut mem, 1, 0x10).unwrap();
    let texture = mem.read_u32(0x10).unwrap();

    let err = bridge.bind_buffer(gl::ARRAY_BUFFER, texture).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::InvalidHandle { handle, expected: ObjectKind::Buffer } if handle == texture
    ));
    assert_eq!(bridge.context().call_count("bindBuffer"), 0);

    // The texture survives a mismatched delete.
    mem.write_u32(0x20, texture).unwrap();
    assert!(bridge.delete_buffers(&mem, 1, 0x20).is_err());
    assert_eq!(bridge.live_handles(), 1);
}

#[test]
fn test_random_gen_delete_sequence_stays_monotonic() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let mut rng = rand::thread_rng();

    let mut live: Vec<u32> = Vec::new();
    let mut last = 0u32;
    for _ in 0..500 {
        if live.is_empty() || rng.gen_bool(0.6) {
            match rng.gen_range(0..4) {
                0 => bridge.gen_textures(&mut mem, 1, 0x10).unwrap(),
                1 => bridge.gen_buffers(&mut mem, 1, 0x10).unwrap(),
                2 => bridge.gen_renderbuffers(&mut mem, 1, 0x10).unwrap(),
                _ => bridge.gen_samplers(&mut mem, 1, 0x10).unwrap(),
            }
            let handle = mem.read_u32(0x10).unwrap();
            assert!(handle > last, "handle {handle} after {last}");
            last = handle;
            live.push(handle);
        } else {
            let victim = live.swap_remove(rng.gen_range(0..live.len()));
            mem.write_u32(0x20, victim).unwrap();
            // Kind is unknown here; try each until one releases it.
            bridge.delete_textures(&mem, 1, 0x20).unwrap();
            bridge.delete_buffers(&mem, 1, 0x20).unwrap();
            bridge.delete_renderbuffers(&mem, 1, 0x20).unwrap();
            bridge.delete_samplers(&mem, 1, 0x20).unwrap();
        }
        assert_eq!(bridge.live_handles(), live.len());
    }
}

// ============================================================================
// Buffers
// ============================================================================

#[test]
fn test_buffer_upload_and_readback() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    let buffer = mem.read_u32(0x10).unwrap();
    bridge.bind_buffer(gl::ARRAY_BUFFER, buffer).unwrap();

    let vertices: [f32; 4] = [0.0, 0.5, -0.5, 1.0];
    for (i, v) in vertices.iter().enumerate() {
        mem.bytes_mut(0x100 + 4 * i as u32, 4)
            .unwrap()
            .copy_from_slice(&v.to_le_bytes());
    }
    bridge
        .buffer_data(&mem, gl::ARRAY_BUFFER, 16, 0x100, gl::STATIC_DRAW)
        .expect("glBufferData");

    // Overwrite the second float.
    mem.bytes_mut(0x200, 4).unwrap().copy_from_slice(&2.0f32.to_le_bytes());
    bridge
        .buffer_sub_data(&mem, gl::ARRAY_BUFFER, 4, 4, 0x200)
        .expect("glBufferSubData");

    bridge
        .get_buffer_sub_data(&mut mem, gl::ARRAY_BUFFER, 0, 16, 0x300)
        .expect("glGetBufferSubData");
    let floats = mem.f32_slice(0x300, 4).unwrap();
    assert_eq!(&floats[..], &[0.0, 2.0, -0.5, 1.0]);

    let host = bridge.context().bound_buffer(gl::ARRAY_BUFFER).unwrap();
    assert_eq!(bridge.context().buffer_contents(host).unwrap().len(), 16);
    assert_eq!(bridge.get_error(), gl::NO_ERROR);
}

#[test]
fn test_buffer_data_null_pointer_reserves() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    bridge.bind_buffer(gl::UNIFORM_BUFFER, mem.read_u32(0x10).unwrap()).unwrap();
    bridge
        .buffer_data(&mem, gl::UNIFORM_BUFFER, 256, 0, gl::DYNAMIC_DRAW)
        .unwrap();

    let call = bridge.context().last_call("bufferData").unwrap();
    assert_eq!(call.payload_len, 0);
    assert_eq!(call.args[1], 256.0);
    let host = bridge.context().bound_buffer(gl::UNIFORM_BUFFER).unwrap();
    assert_eq!(bridge.context().buffer_contents(host).unwrap(), &[0u8; 256][..]);
}

#[test]
fn test_buffer_data_out_of_bounds_traps() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    bridge.bind_buffer(gl::ARRAY_BUFFER, mem.read_u32(0x10).unwrap()).unwrap();
    let err = bridge
        .buffer_data(&mem, gl::ARRAY_BUFFER, 64, (MEMORY_SIZE - 16) as u32, gl::STATIC_DRAW)
        .unwrap_err();
    assert!(matches!(err, BridgeError::OutOfBounds { .. }));
    assert_eq!(bridge.context().call_count("bufferData"), 0);
}

#[test]
fn test_buffer_storage_usage_from_flags() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    bridge.bind_buffer(gl::ARRAY_BUFFER, mem.read_u32(0x10).unwrap()).unwrap();

    bridge.buffer_storage(&mem, gl::ARRAY_BUFFER, 32, 0, 0).unwrap();
    assert_eq!(
        bridge.context().last_call("bufferData").unwrap().args[2],
        f64::from(gl::STATIC_DRAW)
    );

    bridge
        .buffer_storage(&mem, gl::ARRAY_BUFFER, 32, 0, gl::DYNAMIC_STORAGE_BIT)
        .unwrap();
    assert_eq!(
        bridge.context().last_call("bufferData").unwrap().args[2],
        f64::from(gl::DYNAMIC_DRAW)
    );
}

#[test]
fn test_copy_buffer_sub_data() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.gen_buffers(&mut mem, 1, 0x10).unwrap();
    bridge.gen_buffers(&mut mem, 1, 0x14).unwrap();
    let (src, dst) = (mem.read_u32(0x10).unwrap(), mem.read_u32(0x14).unwrap());

    mem.bytes_mut(0x100, 8).unwrap().copy_from_slice(b"abcdefgh");
    bridge.bind_buffer(gl::COPY_READ_BUFFER, src).unwrap();
    bridge.buffer_data(&mem, gl::COPY_READ_BUFFER, 8, 0x100, gl::STATIC_DRAW).unwrap();
    bridge.bind_buffer(gl::COPY_WRITE_BUFFER, dst).unwrap();
    bridge.buffer_data(&mem, gl::COPY_WRITE_BUFFER, 8, 0, gl::STATIC_DRAW).unwrap();

    bridge.copy_buffer_sub_data(gl::COPY_READ_BUFFER, gl::COPY_WRITE_BUFFER, 2, 4, 4);

    let host = bridge.context().bound_buffer(gl::COPY_WRITE_BUFFER).unwrap();
    assert_eq!(bridge.context().buffer_contents(host).unwrap(), b"\0\0\0\0cdef");
}

#[test]
fn test_map_buffer_range_is_unavailable() {
    let mut bridge = bridge();
    assert_eq!(bridge.map_buffer_range(gl::ARRAY_BUFFER, 0, 16, gl::MAP_WRITE_BIT), 0);
    assert_eq!(bridge.unmap_buffer(gl::ARRAY_BUFFER), gl::TRUE);
    assert!(bridge.context().calls().is_empty());
}

// ============================================================================
// State and queries
// ============================================================================

#[test]
fn test_suppressed_capabilities_are_dropped() {
    let mut bridge = bridge();

    let suppressed = [
        gl::PRIMITIVE_RESTART_FIXED_INDEX,
        gl::PROGRAM_POINT_SIZE,
        gl::TEXTURE_CUBE_MAP_SEAMLESS,
        gl::FRAMEBUFFER_SRGB,
    ];
    for cap in suppressed {
        bridge.enable(cap);
        assert!(!bridge.context().is_enabled(cap), "{cap:#x} reached the host");
        bridge.disable(cap);
    }
    assert_eq!(bridge.context().call_count("enable"), 0);
    assert_eq!(bridge.context().call_count("disable"), 0);

    bridge.enable(gl::DEPTH_TEST);
    assert!(bridge.context().is_enabled(gl::DEPTH_TEST));
    bridge.disable(gl::DEPTH_TEST);
    assert!(!bridge.context().is_enabled(gl::DEPTH_TEST));
    assert_eq!(bridge.context().call_count("enable"), 1);
    assert_eq!(bridge.context().call_count("disable"), 1);
}

#[test]
fn test_get_integerv_clamps() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let ctx = RecordingContext::new().with_parameter(0x8A2B, 1 << 40);
    let mut bridge = Bridge::new(ctx);

    bridge.get_integerv(&mut mem, gl::MAX_TEXTURE_SIZE, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 16384);

    bridge.get_integerv(&mut mem, 0x8A2B, 0x14).unwrap();
    assert_eq!(mem.read_i32(0x14).unwrap(), 0x07FF_FFFF);
}

#[test]
fn test_get_integerv_clamps_negative_values() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let ctx = RecordingContext::new()
        .with_parameter(0x8A2B, -(1 << 40))
        .with_parameter(0x8A2C, -5);
    let mut bridge = Bridge::new(ctx);

    bridge.get_integerv(&mut mem, 0x8A2B, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), i32::MIN);

    bridge.get_integerv(&mut mem, 0x8A2C, 0x14).unwrap();
    assert_eq!(mem.read_i32(0x14).unwrap(), -5);
}

#[test]
fn test_get_error_is_host_code() {
    let mut bridge = bridge();

    bridge.bind_texture(gl::TEXTURE_2D, 0).unwrap();
    assert_eq!(bridge.get_error(), gl::NO_ERROR);

    bridge.create_shader(0x1234).unwrap();
    assert_eq!(bridge.get_error(), gl::INVALID_ENUM);
    assert_eq!(bridge.get_error(), gl::NO_ERROR);
}

#[test]
fn test_get_string_passes_through() {
    let mut bridge = bridge();
    assert_eq!(bridge.get_string(gl::VENDOR).as_deref(), Some("HyperGL"));
    assert_eq!(bridge.get_string(0xDEAD), None);
}

#[test]
fn test_draw_buffers_and_clear_buffer() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    mem.write_u32(0x10, gl::COLOR_ATTACHMENT0).unwrap();
    mem.write_u32(0x14, gl::COLOR_ATTACHMENT0 + 1).unwrap();
    bridge.draw_buffers(&mem, 2, 0x10).unwrap();
    let call = bridge.context().last_call("drawBuffers").unwrap();
    assert_eq!(call.payload_len, 8);

    for (i, v) in [0.25f32, 0.5, 0.75, 1.0].iter().enumerate() {
        mem.bytes_mut(0x40 + 4 * i as u32, 4)
            .unwrap()
            .copy_from_slice(&v.to_le_bytes());
    }
    bridge.clear_bufferfv(&mem, 0x1800, 0, 0x40).unwrap();
    let call = bridge.context().last_call("clearBufferfv").unwrap();
    assert_eq!(call.payload_len, 16);
}

// ============================================================================
// Textures and pixels
// ============================================================================

#[test]
fn test_tex_image_ignores_pixels_by_default() {
    let bytes_needed = 4 * 4 * 4;
    let mut bytes = guest_memory();
    let mem = GuestMemory::new(&mut bytes);

    let mut bridge = bridge();
    bridge
        .tex_image_2d(&mem, gl::TEXTURE_2D, 0, gl::RGBA as i32, 4, 4, 0, gl::RGBA, gl::UNSIGNED_BYTE, 0x100)
        .unwrap();
    assert_eq!(bridge.context().last_call("texImage2D").unwrap().payload_len, 0);

    let config = BridgeConfig::default().upload_initial_pixels(true);
    let mut uploading = Bridge::with_config(RecordingContext::new(), config);
    uploading
        .tex_image_2d(&mem, gl::TEXTURE_2D, 0, gl::RGBA as i32, 4, 4, 0, gl::RGBA, gl::UNSIGNED_BYTE, 0x100)
        .unwrap();
    assert_eq!(
        uploading.context().last_call("texImage2D").unwrap().payload_len,
        bytes_needed
    );

    // A null pointer still reserves only.
    uploading
        .tex_image_3d(&mem, gl::TEXTURE_2D_ARRAY, 0, gl::RGBA as i32, 4, 4, 2, 0, gl::RGBA, gl::FLOAT, 0)
        .unwrap();
    assert_eq!(uploading.context().last_call("texImage3D").unwrap().payload_len, 0);
}

#[test]
fn test_tex_sub_image_sizes_from_format_and_type() {
    let mut bytes = guest_memory();
    let mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge
        .tex_sub_image_2d(&mem, gl::TEXTURE_2D, 0, 0, 0, 8, 2, gl::RGB, gl::FLOAT, 0x100)
        .unwrap();
    assert_eq!(bridge.context().last_call("texSubImage2D").unwrap().payload_len, 8 * 2 * 3 * 4);

    bridge
        .tex_sub_image_3d(&mem, gl::TEXTURE_2D_ARRAY, 0, 0, 0, 1, 2, 2, 3, gl::RG_INTEGER, gl::UNSIGNED_SHORT, 0x100)
        .unwrap();
    assert_eq!(bridge.context().last_call("texSubImage3D").unwrap().payload_len, 2 * 2 * 3 * 2 * 2);
}

#[test]
fn test_tex_sub_image_rejects_bad_inputs() {
    let mut bytes = guest_memory();
    let mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    let err = bridge
        .tex_sub_image_2d(&mem, gl::TEXTURE_2D, 0, 0, 0, 256, 256, gl::RGBA, gl::UNSIGNED_BYTE, 0x100)
        .unwrap_err();
    assert!(matches!(err, BridgeError::OutOfBounds { .. }));

    let err = bridge
        .tex_sub_image_2d(&mem, gl::TEXTURE_2D, 0, 0, 0, 1, 1, gl::RGBA, 0x9999, 0x100)
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedElementType(0x9999)));

    let err = bridge
        .tex_sub_image_2d(&mem, gl::TEXTURE_2D, 0, 0, 0, 1, 1, 0x7777, gl::UNSIGNED_BYTE, 0x100)
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedPixelFormat(0x7777)));
    assert_eq!(bridge.context().call_count("texSubImage2D"), 0);
}

#[test]
fn test_huge_pixel_extents_fail_without_panicking() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    let err = bridge
        .tex_sub_image_3d(
            &mem,
            gl::TEXTURE_2D_ARRAY,
            0,
            0,
            0,
            0,
            i32::MAX,
            i32::MAX,
            i32::MAX,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            16,
        )
        .expect_err("extents overflow the element count");
    assert!(matches!(err, BridgeError::OutOfBounds { .. }));

    let err = bridge
        .read_pixels(&mut mem, 0, 0, i32::MAX, i32::MAX, gl::RGBA, gl::FLOAT, 16)
        .expect_err("extents exceed guest memory");
    assert!(matches!(err, BridgeError::OutOfBounds { .. }));
    assert_eq!(bridge.context().call_count("texSubImage3D"), 0);
    assert_eq!(bridge.context().call_count("readPixels"), 0);

    // The bridge stays usable afterwards.
    bridge
        .tex_sub_image_3d(
            &mem,
            gl::TEXTURE_2D_ARRAY,
            0,
            0,
            0,
            0,
            1,
            1,
            1,
            gl::RGBA,
            gl::UNSIGNED_BYTE,
            16,
        )
        .expect("small upload");
    assert_eq!(bridge.context().call_count("texSubImage3D"), 1);
}

#[test]
fn test_read_pixels_writes_guest_memory() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = Bridge::new(RecordingContext::new().with_read_fill(0xAB));

    bridge
        .read_pixels(&mut mem, 0, 0, 2, 2, gl::RGBA, gl::UNSIGNED_BYTE, 0x400)
        .unwrap();
    assert_eq!(mem.bytes(0x400, 16).unwrap(), &[0xAB; 16][..]);
    assert_eq!(mem.bytes(0x410, 1).unwrap(), &[0][..]);
}

// ============================================================================
// Shaders, programs, uniforms
// ============================================================================

#[test]
fn test_shader_source_fragments_and_lengths() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let shader = bridge.create_shader(gl::FRAGMENT_SHADER).unwrap();

    // Fragment 0 is length-bounded (no terminator needed), fragment 1 is
    // NUL-terminated through a negative length.
    mem.bytes_mut(0x1000, 12).unwrap().copy_from_slice(b"void main() ");
    mem.write_cstring(0x1100, "{}").unwrap();
    mem.write_u32(0x100, 0x1000).unwrap();
    mem.write_u32(0x104, 0x1100).unwrap();
    mem.write_i32(0x200, 12).unwrap();
    mem.write_i32(0x204, -1).unwrap();

    bridge.shader_source(&mem, shader, 2, 0x100, 0x200).unwrap();
    let host = bridge.context().last_call("createShader").unwrap().args[1] as u32;
    assert_eq!(
        bridge.context().source_of(hypergl_bridge::HostObject(host)),
        Some("void main() {}")
    );
}

#[test]
fn test_shader_info_log_and_length() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let shader = bridge.create_shader(gl::VERTEX_SHADER).unwrap();

    mem.write_cstring(0x1000, "void nothing() {}").unwrap();
    mem.write_u32(0x100, 0x1000).unwrap();
    bridge.shader_source(&mem, shader, 1, 0x100, 0).unwrap();
    bridge.compile_shader(shader).unwrap();

    bridge.get_shaderiv(&mut mem, shader, gl::COMPILE_STATUS, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 0);

    bridge.get_shaderiv(&mut mem, shader, gl::INFO_LOG_LENGTH, 0x14).unwrap();
    let reported = mem.read_i32(0x14).unwrap();

    bridge.get_shader_info_log(&mut mem, shader, reported, 0x18, 0x2000).unwrap();
    let written = mem.read_i32(0x18).unwrap();
    let log = mem.read_cstring(0x2000).unwrap();
    assert!(log.contains("main"));
    assert_eq!(written as usize, log.len());
    assert_eq!(reported, written + 1);
}

#[test]
fn test_program_link_and_introspection() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);

    bridge.get_programiv(&mut mem, program, gl::LINK_STATUS, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 1);
    bridge.get_programiv(&mut mem, program, gl::ACTIVE_ATTRIBUTES, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 2);
    bridge.get_programiv(&mut mem, program, gl::ACTIVE_UNIFORMS, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 3);
    bridge.get_programiv(&mut mem, program, gl::INFO_LOG_LENGTH, 0x10).unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 1);

    bridge
        .get_active_attrib(&mut mem, program, 1, 64, 0x20, 0x24, 0x28, 0x3000)
        .unwrap();
    assert_eq!(mem.read_cstring(0x3000).unwrap(), "a_uv");
    assert_eq!(mem.read_i32(0x20).unwrap(), 4);
    assert_eq!(mem.read_i32(0x24).unwrap(), 1);
    assert_eq!(mem.read_u32(0x28).unwrap(), 0x8B50);

    mem.write_cstring(0x3100, "a_position").unwrap();
    assert_eq!(bridge.get_attrib_location(&mem, program, 0x3100).unwrap(), 0);
}

#[test]
fn test_active_info_out_of_range_leaves_outputs() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);

    mem.write_i32(0x20, 99).unwrap();
    bridge
        .get_active_uniform(&mut mem, program, 42, 64, 0x20, 0x24, 0x28, 0x3000)
        .unwrap();
    assert_eq!(mem.read_i32(0x20).unwrap(), 99);
    assert_eq!(bridge.get_error(), gl::INVALID_VALUE);
}

#[test]
fn test_uniform_locations_are_fresh_handles() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);

    mem.write_cstring(0x3000, "u_tint").unwrap();
    let first = bridge.get_uniform_location(&mem, program, 0x3000).unwrap();
    let second = bridge.get_uniform_location(&mem, program, 0x3000).unwrap();
    assert!(first > 0);
    assert!(second > first);

    let next = bridge.next_handle();
    let live = bridge.live_handles();
    mem.write_cstring(0x3100, "u_missing").unwrap();
    assert_eq!(bridge.get_uniform_location(&mem, program, 0x3100).unwrap(), -1);
    assert_eq!(bridge.next_handle(), next);
    assert_eq!(bridge.live_handles(), live);
}

#[test]
fn test_uniform_uploads_reach_host() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);
    bridge.use_program(program).unwrap();

    mem.write_cstring(0x3000, "u_tint").unwrap();
    let tint = bridge.get_uniform_location(&mem, program, 0x3000).unwrap();
    for (i, v) in [1.0f32, 0.5, 0.25, 1.0].iter().enumerate() {
        mem.bytes_mut(0x400 + 4 * i as u32, 4)
            .unwrap()
            .copy_from_slice(&v.to_le_bytes());
    }
    bridge.uniform_fv(&mem, 4, tint, 1, 0x400).unwrap();
    assert_eq!(
        bridge.context().uniform_value("u_tint"),
        Some(&UniformValue::Float(vec![1.0, 0.5, 0.25, 1.0]))
    );

    mem.write_cstring(0x3000, "u_albedo").unwrap();
    let albedo = bridge.get_uniform_location(&mem, program, 0x3000).unwrap();
    bridge.uniform1i(albedo, 3).unwrap();
    assert_eq!(bridge.context().uniform_value("u_albedo"), Some(&UniformValue::Int(vec![3])));

    mem.write_cstring(0x3000, "u_mvp").unwrap();
    let mvp = bridge.get_uniform_location(&mem, program, 0x3000).unwrap();
    bridge
        .uniform_matrix_fv(&mem, MatrixShape::Mat4, mvp, 1, 0, 0x400)
        .unwrap();
    let call = bridge.context().last_call("uniformMatrix4fv").unwrap();
    assert_eq!(call.payload_len, 64);
}

#[test]
fn test_uniform_minus_one_is_ignored() {
    let mut bytes = guest_memory();
    let mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();

    bridge.uniform_fv(&mem, 2, -1, 1, 0x400).unwrap();
    bridge.uniform1i(-1, 7).unwrap();
    assert_eq!(bridge.context().pending_error(), gl::NO_ERROR);
    assert_eq!(bridge.context().last_call("uniform2fv").unwrap().args[0], 0.0);
}

#[test]
fn test_uniform_blocks() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);

    mem.write_cstring(0x3000, "Lights").unwrap();
    let index = bridge.get_uniform_block_index(&mem, program, 0x3000).unwrap();
    assert_eq!(index, 0);

    bridge.uniform_block_binding(program, index, 2).unwrap();
    bridge
        .get_active_uniform_blockiv(&mut mem, program, index, gl::UNIFORM_BLOCK_BINDING, 0x10)
        .unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 2);
    bridge
        .get_active_uniform_blockiv(&mut mem, program, index, gl::UNIFORM_BLOCK_DATA_SIZE, 0x10)
        .unwrap();
    assert_eq!(mem.read_i32(0x10).unwrap(), 32);

    bridge
        .get_active_uniform_block_name(&mut mem, program, index, 32, 0x14, 0x3100)
        .unwrap();
    assert_eq!(mem.read_cstring(0x3100).unwrap(), "Lights");
    assert_eq!(mem.read_i32(0x14).unwrap(), 6);

    mem.write_cstring(0x3000, "Shadows").unwrap();
    assert_eq!(
        bridge.get_uniform_block_index(&mem, program, 0x3000).unwrap(),
        gl::INVALID_INDEX
    );
}

#[test]
fn test_delete_program_releases_handle() {
    let mut bytes = guest_memory();
    let mut mem = GuestMemory::new(&mut bytes);
    let mut bridge = bridge();
    let program = build_program(&mut bridge, &mut mem);

    let before = bridge.live_handles();
    bridge.delete_program(program).unwrap();
    assert_eq!(bridge.live_handles(), before - 1);
    assert!(bridge.objects().program(program).unwrap().is_none());
}
