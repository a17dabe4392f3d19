//! GL entry points exposed to guest modules.
//!
//! Every name in [`ENTRY_POINTS`] is registered under the configured import
//! module as `hypergl_<glName>`:
//! ```wat
//! (import "env" "hypergl_glBindBuffer" (func $bind_buffer (param i32 i32)))
//! ```
//!
//! ## Argument Convention
//!
//! - Enums, bitmasks, handles and pointers are `u32`
//! - Signed integers (`GLint`, `GLsizei`, `GLintptr`, `GLsizeiptr`) are `i32`
//! - Floats are `f32`
//! - Booleans are `u32`, non-zero meaning true
//!
//! `glGetString` is the one entry point that allocates in the guest. Its
//! result is owned by the bridge and stays valid for the instance's
//! lifetime; guests must not free it.
//!
//! Guest memory is borrowed for the duration of one call only. A guest
//! contract violation (out-of-range pointer, unterminated string, unknown
//! type tag) traps the call.

use wasmtime::{Caller, Extern, Linker};

use super::runtime::GlHostState;
use crate::context::{GlContext, MatrixShape};
use crate::dispatch::Bridge;
use crate::entry_points::{import_name, ENTRY_POINTS};
use crate::error::{BridgeError, Result};
use crate::memory::GuestMemory;

/// Register an entry point that needs neither guest memory nor fallible
/// handle resolution.
macro_rules! host_fn {
    ($linker:ident, $module:ident, $state:ty, $name:literal, |$gl:ident $(, $arg:ident: $ty:ty)*| $body:expr) => {
        $linker
            .func_wrap(
                $module,
                &import_name($name),
                |mut caller: Caller<'_, $state> $(, $arg: $ty)*| -> wasmtime::Result<_> {
                    let $gl = &mut caller.data_mut().bridge;
                    Ok($body)
                },
            )
            .map_err(|e| BridgeError::Wasm(format!("failed to register {}: {}", $name, e)))?;
    };
}

/// Register an entry point whose body returns a bridge `Result`.
macro_rules! host_try_fn {
    ($linker:ident, $module:ident, $state:ty, $name:literal, |$gl:ident $(, $arg:ident: $ty:ty)*| $body:expr) => {
        $linker
            .func_wrap(
                $module,
                &import_name($name),
                |mut caller: Caller<'_, $state> $(, $arg: $ty)*| -> wasmtime::Result<_> {
                    let $gl = &mut caller.data_mut().bridge;
                    Ok($body?)
                },
            )
            .map_err(|e| BridgeError::Wasm(format!("failed to register {}: {}", $name, e)))?;
    };
}

/// Register an entry point that reads or writes guest memory.
macro_rules! host_mem_fn {
    ($linker:ident, $module:ident, $state:ty, $name:literal, |$gl:ident, $mem:ident $(, $arg:ident: $ty:ty)*| $body:expr) => {
        $linker
            .func_wrap(
                $module,
                &import_name($name),
                |mut caller: Caller<'_, $state> $(, $arg: $ty)*| -> wasmtime::Result<_> {
                    #[allow(unused_mut)]
                    let (mut $mem, $gl) = guest_call(&mut caller)?;
                    Ok($body?)
                },
            )
            .map_err(|e| BridgeError::Wasm(format!("failed to register {}: {}", $name, e)))?;
    };
}

/// Split the caller into guest memory and the bridge.
fn guest_call<'a, C: GlContext + 'static>(
    caller: &'a mut Caller<'_, GlHostState<C>>,
) -> Result<(GuestMemory<'a>, &'a mut Bridge<C>)> {
    let memory = caller
        .get_export("memory")
        .and_then(Extern::into_memory)
        .ok_or_else(|| BridgeError::Wasm("guest exports no memory".to_string()))?;
    let (bytes, state) = memory.data_and_store_mut(caller);
    Ok((GuestMemory::new(bytes), &mut state.bridge))
}

/// `glGetString`: copy the host string into memory obtained from the guest's
/// own allocator, once per `pname`.
///
/// The returned string belongs to the bridge for the lifetime of the
/// instance. Every later query for the same `pname` returns the cached
/// pointer, so the guest must not free it.
fn get_string<C: GlContext + 'static>(
    caller: &mut Caller<'_, GlHostState<C>>,
    pname: u32,
) -> wasmtime::Result<u32> {
    if let Some(ptr) = caller.data().bridge.cached_string(pname) {
        return Ok(ptr);
    }
    let Some(text) = caller.data_mut().bridge.get_string(pname) else {
        return Ok(0);
    };

    let names = caller.data().allocators.clone();
    let Some(alloc) = names
        .iter()
        .find_map(|name| caller.get_export(name).and_then(Extern::into_func))
    else {
        tracing::warn!(pname, allocators = ?names, "guest exports no allocator; glGetString returns null");
        return Ok(0);
    };
    let alloc = alloc.typed::<u32, u32>(&*caller)?;
    let len = u32::try_from(text.len() + 1)
        .map_err(|_| BridgeError::OutOfBounds { offset: 0, len: text.len() + 1 })?;
    let ptr = alloc.call(&mut *caller, len)?;
    if ptr == 0 {
        tracing::warn!(pname, len, "guest allocator returned null");
        return Ok(0);
    }

    let (mut mem, bridge) = guest_call(caller)?;
    mem.write_cstring(ptr, &text)?;
    bridge.remember_string(pname, ptr);
    tracing::debug!(pname, ptr, "materialized glGetString result");
    Ok(ptr)
}

/// GL host functions exposed to guest modules.
pub struct GlHostFunctions;

impl GlHostFunctions {
    /// Register every entry point with the linker under `module`.
    pub fn register<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        Self::register_state(linker, module)?;
        Self::register_textures(linker, module)?;
        Self::register_buffers(linker, module)?;
        Self::register_programs(linker, module)?;
        Self::register_uniforms(linker, module)?;
        Self::register_vertex_input(linker, module)?;
        Self::register_framebuffers(linker, module)?;
        Self::register_samplers(linker, module)?;
        Self::register_compute(linker, module)?;
        tracing::debug!(module, count = ENTRY_POINTS.len(), "registered GL entry points");
        Ok(())
    }

    // ========================================================================
    // State, queries
    // ========================================================================

    fn register_state<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_fn!(linker, module, GlHostState<C>, "glCullFace", |gl, mode: u32| gl.cull_face(mode));
        host_fn!(linker, module, GlHostState<C>, "glClear", |gl, mask: u32| gl.clear(mask));
        host_fn!(linker, module, GlHostState<C>, "glDepthMask", |gl, flag: u32| gl.depth_mask(flag));
        host_fn!(linker, module, GlHostState<C>, "glEnable", |gl, cap: u32| gl.enable(cap));
        host_fn!(linker, module, GlHostState<C>, "glDisable", |gl, cap: u32| gl.disable(cap));
        host_fn!(linker, module, GlHostState<C>, "glFlush", |gl| gl.flush());
        host_fn!(linker, module, GlHostState<C>, "glDepthFunc", |gl, func: u32| gl.depth_func(func));
        host_fn!(linker, module, GlHostState<C>, "glReadBuffer", |gl, src: u32| gl.read_buffer(src));
        host_fn!(linker, module, GlHostState<C>, "glViewport", |gl, x: i32, y: i32, width: i32, height: i32| {
            gl.viewport(x, y, width, height)
        });
        host_fn!(linker, module, GlHostState<C>, "glActiveTexture", |gl, texture: u32| gl.active_texture(texture));
        host_fn!(linker, module, GlHostState<C>, "glBlendFuncSeparate", |gl, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32| {
            gl.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha)
        });
        host_fn!(linker, module, GlHostState<C>, "glBlendEquationSeparate", |gl, mode_rgb: u32, mode_alpha: u32| {
            gl.blend_equation_separate(mode_rgb, mode_alpha)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDrawBuffers", |gl, mem, n: i32, bufs: u32| {
            gl.draw_buffers(&mem, n, bufs)
        });
        host_fn!(linker, module, GlHostState<C>, "glStencilOpSeparate", |gl, face: u32, sfail: u32, dpfail: u32, dppass: u32| {
            gl.stencil_op_separate(face, sfail, dpfail, dppass)
        });
        host_fn!(linker, module, GlHostState<C>, "glStencilFuncSeparate", |gl, face: u32, func: u32, reference: i32, mask: u32| {
            gl.stencil_func_separate(face, func, reference, mask)
        });
        host_fn!(linker, module, GlHostState<C>, "glStencilMaskSeparate", |gl, face: u32, mask: u32| {
            gl.stencil_mask_separate(face, mask)
        });
        host_fn!(linker, module, GlHostState<C>, "glPixelStorei", |gl, pname: u32, param: i32| {
            gl.pixel_storei(pname, param)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glClearBufferiv", |gl, mem, buffer: u32, draw_buffer: i32, value: u32| {
            gl.clear_bufferiv(&mem, buffer, draw_buffer, value)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glClearBufferuiv", |gl, mem, buffer: u32, draw_buffer: i32, value: u32| {
            gl.clear_bufferuiv(&mem, buffer, draw_buffer, value)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glClearBufferfv", |gl, mem, buffer: u32, draw_buffer: i32, value: u32| {
            gl.clear_bufferfv(&mem, buffer, draw_buffer, value)
        });
        host_fn!(linker, module, GlHostState<C>, "glClearBufferfi", |gl, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32| {
            gl.clear_bufferfi(buffer, draw_buffer, depth, stencil)
        });

        host_fn!(linker, module, GlHostState<C>, "glGetError", |gl| gl.get_error());
        host_mem_fn!(linker, module, GlHostState<C>, "glGetIntegerv", |gl, mem, pname: u32, data: u32| {
            gl.get_integerv(&mut mem, pname, data)
        });
        linker
            .func_wrap(
                module,
                &import_name("glGetString"),
                |mut caller: Caller<'_, GlHostState<C>>, pname: u32| get_string(&mut caller, pname),
            )
            .map_err(|e| BridgeError::Wasm(format!("failed to register glGetString: {}", e)))?;
        Ok(())
    }

    // ========================================================================
    // Textures and pixel transfer
    // ========================================================================

    fn register_textures<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_mem_fn!(linker, module, GlHostState<C>, "glGenTextures", |gl, mem, n: i32, textures: u32| {
            gl.gen_textures(&mut mem, n, textures)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteTextures", |gl, mem, n: i32, textures: u32| {
            gl.delete_textures(&mem, n, textures)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindTexture", |gl, target: u32, texture: u32| {
            gl.bind_texture(target, texture)
        });
        host_fn!(linker, module, GlHostState<C>, "glTexParameteri", |gl, target: u32, pname: u32, param: i32| {
            gl.tex_parameteri(target, pname, param)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glTexImage2D", |gl, mem, target: u32, level: i32, internal_format: i32, width: i32, height: i32, border: i32, format: u32, ty: u32, pixels: u32| {
            gl.tex_image_2d(&mem, target, level, internal_format, width, height, border, format, ty, pixels)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glTexSubImage2D", |gl, mem, target: u32, level: i32, x_offset: i32, y_offset: i32, width: i32, height: i32, format: u32, ty: u32, pixels: u32| {
            gl.tex_sub_image_2d(&mem, target, level, x_offset, y_offset, width, height, format, ty, pixels)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glTexImage3D", |gl, mem, target: u32, level: i32, internal_format: i32, width: i32, height: i32, depth: i32, border: i32, format: u32, ty: u32, pixels: u32| {
            gl.tex_image_3d(&mem, target, level, internal_format, width, height, depth, border, format, ty, pixels)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glTexSubImage3D", |gl, mem, target: u32, level: i32, x_offset: i32, y_offset: i32, z_offset: i32, width: i32, height: i32, depth: i32, format: u32, ty: u32, pixels: u32| {
            gl.tex_sub_image_3d(&mem, target, level, x_offset, y_offset, z_offset, width, height, depth, format, ty, pixels)
        });
        host_fn!(linker, module, GlHostState<C>, "glGenerateMipmap", |gl, target: u32| gl.generate_mipmap(target));
        host_mem_fn!(linker, module, GlHostState<C>, "glReadPixels", |gl, mem, x: i32, y: i32, width: i32, height: i32, format: u32, ty: u32, pixels: u32| {
            gl.read_pixels(&mut mem, x, y, width, height, format, ty, pixels)
        });
        Ok(())
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    fn register_buffers<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_mem_fn!(linker, module, GlHostState<C>, "glGenBuffers", |gl, mem, n: i32, buffers: u32| {
            gl.gen_buffers(&mut mem, n, buffers)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteBuffers", |gl, mem, n: i32, buffers: u32| {
            gl.delete_buffers(&mem, n, buffers)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindBuffer", |gl, target: u32, buffer: u32| {
            gl.bind_buffer(target, buffer)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindBufferBase", |gl, target: u32, index: u32, buffer: u32| {
            gl.bind_buffer_base(target, index, buffer)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindBufferRange", |gl, target: u32, index: u32, buffer: u32, offset: i32, size: i32| {
            gl.bind_buffer_range(target, index, buffer, offset, size)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glBufferData", |gl, mem, target: u32, size: i32, data: u32, usage: u32| {
            gl.buffer_data(&mem, target, size, data, usage)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glBufferSubData", |gl, mem, target: u32, offset: i32, size: i32, data: u32| {
            gl.buffer_sub_data(&mem, target, offset, size, data)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetBufferSubData", |gl, mem, target: u32, offset: i32, size: i32, data: u32| {
            gl.get_buffer_sub_data(&mut mem, target, offset, size, data)
        });
        host_fn!(linker, module, GlHostState<C>, "glCopyBufferSubData", |gl, read_target: u32, write_target: u32, read_offset: i32, write_offset: i32, size: i32| {
            gl.copy_buffer_sub_data(read_target, write_target, read_offset, write_offset, size)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glBufferStorage", |gl, mem, target: u32, size: i32, data: u32, flags: u32| {
            gl.buffer_storage(&mem, target, size, data, flags)
        });
        host_fn!(linker, module, GlHostState<C>, "glMapBufferRange", |gl, target: u32, offset: i32, length: i32, access: u32| {
            gl.map_buffer_range(target, offset, length, access)
        });
        host_fn!(linker, module, GlHostState<C>, "glUnmapBuffer", |gl, target: u32| gl.unmap_buffer(target));
        Ok(())
    }

    // ========================================================================
    // Shaders and programs
    // ========================================================================

    fn register_programs<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_try_fn!(linker, module, GlHostState<C>, "glCreateShader", |gl, ty: u32| gl.create_shader(ty));
        host_try_fn!(linker, module, GlHostState<C>, "glDeleteShader", |gl, shader: u32| gl.delete_shader(shader));
        host_mem_fn!(linker, module, GlHostState<C>, "glShaderSource", |gl, mem, shader: u32, count: i32, strings: u32, lengths: u32| {
            gl.shader_source(&mem, shader, count, strings, lengths)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glCompileShader", |gl, shader: u32| gl.compile_shader(shader));
        host_mem_fn!(linker, module, GlHostState<C>, "glGetShaderiv", |gl, mem, shader: u32, pname: u32, params: u32| {
            gl.get_shaderiv(&mut mem, shader, pname, params)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetShaderInfoLog", |gl, mem, shader: u32, buf_size: i32, length: u32, info_log: u32| {
            gl.get_shader_info_log(&mut mem, shader, buf_size, length, info_log)
        });

        host_try_fn!(linker, module, GlHostState<C>, "glCreateProgram", |gl| gl.create_program());
        host_try_fn!(linker, module, GlHostState<C>, "glDeleteProgram", |gl, program: u32| gl.delete_program(program));
        host_try_fn!(linker, module, GlHostState<C>, "glAttachShader", |gl, program: u32, shader: u32| {
            gl.attach_shader(program, shader)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glDetachShader", |gl, program: u32, shader: u32| {
            gl.detach_shader(program, shader)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glLinkProgram", |gl, program: u32| gl.link_program(program));
        host_try_fn!(linker, module, GlHostState<C>, "glUseProgram", |gl, program: u32| gl.use_program(program));
        host_mem_fn!(linker, module, GlHostState<C>, "glGetProgramiv", |gl, mem, program: u32, pname: u32, params: u32| {
            gl.get_programiv(&mut mem, program, pname, params)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetProgramInfoLog", |gl, mem, program: u32, buf_size: i32, length: u32, info_log: u32| {
            gl.get_program_info_log(&mut mem, program, buf_size, length, info_log)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetActiveAttrib", |gl, mem, program: u32, index: u32, buf_size: i32, length: u32, size: u32, ty: u32, name: u32| {
            gl.get_active_attrib(&mut mem, program, index, buf_size, length, size, ty, name)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetActiveUniform", |gl, mem, program: u32, index: u32, buf_size: i32, length: u32, size: u32, ty: u32, name: u32| {
            gl.get_active_uniform(&mut mem, program, index, buf_size, length, size, ty, name)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetAttribLocation", |gl, mem, program: u32, name: u32| {
            gl.get_attrib_location(&mem, program, name)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetUniformLocation", |gl, mem, program: u32, name: u32| {
            gl.get_uniform_location(&mem, program, name)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetUniformBlockIndex", |gl, mem, program: u32, name: u32| {
            gl.get_uniform_block_index(&mem, program, name)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetActiveUniformBlockiv", |gl, mem, program: u32, block_index: u32, pname: u32, params: u32| {
            gl.get_active_uniform_blockiv(&mut mem, program, block_index, pname, params)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGetActiveUniformBlockName", |gl, mem, program: u32, block_index: u32, buf_size: i32, length: u32, name: u32| {
            gl.get_active_uniform_block_name(&mut mem, program, block_index, buf_size, length, name)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glUniformBlockBinding", |gl, program: u32, block_index: u32, binding: u32| {
            gl.uniform_block_binding(program, block_index, binding)
        });
        Ok(())
    }

    // ========================================================================
    // Uniforms
    // ========================================================================

    fn register_uniforms<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_try_fn!(linker, module, GlHostState<C>, "glUniform1i", |gl, location: i32, v0: i32| {
            gl.uniform1i(location, v0)
        });

        for components in 1..=4usize {
            linker
                .func_wrap(
                    module,
                    &import_name(&format!("glUniform{components}fv")),
                    move |mut caller: Caller<'_, GlHostState<C>>, location: i32, count: i32, value: u32| -> wasmtime::Result<()> {
                        let (mem, gl) = guest_call(&mut caller)?;
                        Ok(gl.uniform_fv(&mem, components, location, count, value)?)
                    },
                )
                .map_err(|e| BridgeError::Wasm(format!("failed to register glUniform{}fv: {}", components, e)))?;
            linker
                .func_wrap(
                    module,
                    &import_name(&format!("glUniform{components}iv")),
                    move |mut caller: Caller<'_, GlHostState<C>>, location: i32, count: i32, value: u32| -> wasmtime::Result<()> {
                        let (mem, gl) = guest_call(&mut caller)?;
                        Ok(gl.uniform_iv(&mem, components, location, count, value)?)
                    },
                )
                .map_err(|e| BridgeError::Wasm(format!("failed to register glUniform{}iv: {}", components, e)))?;
            linker
                .func_wrap(
                    module,
                    &import_name(&format!("glUniform{components}uiv")),
                    move |mut caller: Caller<'_, GlHostState<C>>, location: i32, count: i32, value: u32| -> wasmtime::Result<()> {
                        let (mem, gl) = guest_call(&mut caller)?;
                        Ok(gl.uniform_uiv(&mem, components, location, count, value)?)
                    },
                )
                .map_err(|e| BridgeError::Wasm(format!("failed to register glUniform{}uiv: {}", components, e)))?;
        }

        for shape in [
            MatrixShape::Mat2,
            MatrixShape::Mat3,
            MatrixShape::Mat4,
            MatrixShape::Mat2x3,
            MatrixShape::Mat3x2,
            MatrixShape::Mat2x4,
            MatrixShape::Mat4x2,
            MatrixShape::Mat3x4,
            MatrixShape::Mat4x3,
        ] {
            let name = format!("glUniformMatrix{}fv", shape.suffix());
            linker
                .func_wrap(
                    module,
                    &import_name(&name),
                    move |mut caller: Caller<'_, GlHostState<C>>, location: i32, count: i32, transpose: u32, value: u32| -> wasmtime::Result<()> {
                        let (mem, gl) = guest_call(&mut caller)?;
                        Ok(gl.uniform_matrix_fv(&mem, shape, location, count, transpose, value)?)
                    },
                )
                .map_err(|e| BridgeError::Wasm(format!("failed to register {}: {}", name, e)))?;
        }
        Ok(())
    }

    // ========================================================================
    // Vertex input and draws
    // ========================================================================

    fn register_vertex_input<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_mem_fn!(linker, module, GlHostState<C>, "glGenVertexArrays", |gl, mem, n: i32, arrays: u32| {
            gl.gen_vertex_arrays(&mut mem, n, arrays)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteVertexArrays", |gl, mem, n: i32, arrays: u32| {
            gl.delete_vertex_arrays(&mem, n, arrays)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindVertexArray", |gl, array: u32| gl.bind_vertex_array(array));
        host_fn!(linker, module, GlHostState<C>, "glEnableVertexAttribArray", |gl, index: u32| {
            gl.enable_vertex_attrib_array(index)
        });
        host_fn!(linker, module, GlHostState<C>, "glVertexAttribPointer", |gl, index: u32, size: i32, ty: u32, normalized: u32, stride: i32, pointer: u32| {
            gl.vertex_attrib_pointer(index, size, ty, normalized, stride, pointer)
        });
        host_fn!(linker, module, GlHostState<C>, "glVertexAttribIPointer", |gl, index: u32, size: i32, ty: u32, stride: i32, pointer: u32| {
            gl.vertex_attrib_ipointer(index, size, ty, stride, pointer)
        });
        host_fn!(linker, module, GlHostState<C>, "glVertexAttribDivisor", |gl, index: u32, divisor: u32| {
            gl.vertex_attrib_divisor(index, divisor)
        });
        host_fn!(linker, module, GlHostState<C>, "glDrawArraysInstanced", |gl, mode: u32, first: i32, count: i32, instance_count: i32| {
            gl.draw_arrays_instanced(mode, first, count, instance_count)
        });
        host_fn!(linker, module, GlHostState<C>, "glDrawElementsInstanced", |gl, mode: u32, count: i32, ty: u32, indices: u32, instance_count: i32| {
            gl.draw_elements_instanced(mode, count, ty, indices, instance_count)
        });
        Ok(())
    }

    // ========================================================================
    // Framebuffers and renderbuffers
    // ========================================================================

    fn register_framebuffers<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_mem_fn!(linker, module, GlHostState<C>, "glGenFramebuffers", |gl, mem, n: i32, framebuffers: u32| {
            gl.gen_framebuffers(&mut mem, n, framebuffers)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteFramebuffers", |gl, mem, n: i32, framebuffers: u32| {
            gl.delete_framebuffers(&mem, n, framebuffers)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindFramebuffer", |gl, target: u32, framebuffer: u32| {
            gl.bind_framebuffer(target, framebuffer)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glFramebufferTexture2D", |gl, target: u32, attachment: u32, tex_target: u32, texture: u32, level: i32| {
            gl.framebuffer_texture_2d(target, attachment, tex_target, texture, level)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glFramebufferRenderbuffer", |gl, target: u32, attachment: u32, renderbuffer_target: u32, renderbuffer: u32| {
            gl.framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glFramebufferTextureLayer", |gl, target: u32, attachment: u32, texture: u32, level: i32, layer: i32| {
            gl.framebuffer_texture_layer(target, attachment, texture, level, layer)
        });
        host_fn!(linker, module, GlHostState<C>, "glBlitFramebuffer", |gl, src_x0: i32, src_y0: i32, src_x1: i32, src_y1: i32, dst_x0: i32, dst_y0: i32, dst_x1: i32, dst_y1: i32, mask: u32, filter: u32| {
            gl.blit_framebuffer(src_x0, src_y0, src_x1, src_y1, dst_x0, dst_y0, dst_x1, dst_y1, mask, filter)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glGenRenderbuffers", |gl, mem, n: i32, renderbuffers: u32| {
            gl.gen_renderbuffers(&mut mem, n, renderbuffers)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteRenderbuffers", |gl, mem, n: i32, renderbuffers: u32| {
            gl.delete_renderbuffers(&mem, n, renderbuffers)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindRenderbuffer", |gl, target: u32, renderbuffer: u32| {
            gl.bind_renderbuffer(target, renderbuffer)
        });
        host_fn!(linker, module, GlHostState<C>, "glRenderbufferStorageMultisample", |gl, target: u32, samples: i32, internal_format: u32, width: i32, height: i32| {
            gl.renderbuffer_storage_multisample(target, samples, internal_format, width, height)
        });
        Ok(())
    }

    // ========================================================================
    // Samplers
    // ========================================================================

    fn register_samplers<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_mem_fn!(linker, module, GlHostState<C>, "glGenSamplers", |gl, mem, n: i32, samplers: u32| {
            gl.gen_samplers(&mut mem, n, samplers)
        });
        host_mem_fn!(linker, module, GlHostState<C>, "glDeleteSamplers", |gl, mem, n: i32, samplers: u32| {
            gl.delete_samplers(&mem, n, samplers)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glBindSampler", |gl, unit: u32, sampler: u32| {
            gl.bind_sampler(unit, sampler)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glSamplerParameteri", |gl, sampler: u32, pname: u32, param: i32| {
            gl.sampler_parameteri(sampler, pname, param)
        });
        host_try_fn!(linker, module, GlHostState<C>, "glSamplerParameterf", |gl, sampler: u32, pname: u32, param: f32| {
            gl.sampler_parameterf(sampler, pname, param)
        });
        Ok(())
    }

    // ========================================================================
    // Compute (no host equivalent)
    // ========================================================================

    fn register_compute<C>(linker: &mut Linker<GlHostState<C>>, module: &str) -> Result<()>
    where
        C: GlContext + Send + 'static,
    {
        host_fn!(linker, module, GlHostState<C>, "glDispatchCompute", |gl, x: u32, y: u32, z: u32| {
            gl.dispatch_compute(x, y, z)
        });
        host_fn!(linker, module, GlHostState<C>, "glMemoryBarrier", |gl, barriers: u32| gl.memory_barrier(barriers));
        host_fn!(linker, module, GlHostState<C>, "glBindImageTexture", |gl, unit: u32, texture: u32, level: i32, layered: u32, layer: i32, access: u32, format: u32| {
            gl.bind_image_texture(unit, texture, level, layered, layer, access, format)
        });
        Ok(())
    }
}
