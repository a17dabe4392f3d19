//! Shaders, programs, introspection and uniform uploads.

use super::Bridge;
use crate::context::{ActiveInfo, GlContext, MatrixShape};
use crate::error::{BridgeError, Result};
use crate::gl;
use crate::handles::{ObjectKind, ObjectRef};
use crate::memory::GuestMemory;

/// Guest offset of element `index` in an array of 4-byte slots at `base`.
fn slot(base: u32, index: usize) -> Result<u32> {
    u32::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(4))
        .and_then(|step| base.checked_add(step))
        .ok_or(BridgeError::OutOfBounds { offset: base as usize, len: index.saturating_mul(4) })
}

/// Element count for a uniform array upload of `count` elements of `width`
/// scalars each.
fn uniform_len(count: i32, width: usize) -> usize {
    usize::try_from(count).unwrap_or(0).saturating_mul(width)
}

/// Write a log or name string plus its optional length out-parameter.
///
/// The destination size argument is not enforced; guests size their buffers
/// from a preceding length query.
fn write_text(mem: &mut GuestMemory<'_>, text: &str, length: u32, dst: u32) -> Result<()> {
    let written = mem.write_cstring(dst, text)?;
    if length != 0 {
        mem.write_i32(length, written as i32)?;
    }
    Ok(())
}

/// `INFO_LOG_LENGTH` as guests expect it: bytes including the terminator.
fn info_log_length(log: &str) -> i32 {
    (log.len() + 1) as i32
}

#[allow(clippy::too_many_arguments)]
impl<C: GlContext> Bridge<C> {
    // ---- shaders --------------------------------------------------------

    /// `glCreateShader(type)`: returns the new handle.
    pub fn create_shader(&mut self, ty: u32) -> Result<u32> {
        let shader = self.ctx.create_shader(ty);
        Ok(self.objects.insert(ObjectRef::Shader(shader))?.get())
    }

    /// `glDeleteShader`; releases the guest handle along with the host shader.
    pub fn delete_shader(&mut self, shader: u32) -> Result<()> {
        if let Some(s) = self
            .objects
            .remove(shader, ObjectKind::Shader)?
            .and_then(ObjectRef::into_shader)
        {
            self.ctx.delete_shader(s);
        }
        Ok(())
    }

    /// `glShaderSource(shader, count, string, length)`.
    ///
    /// The `count` fragments are concatenated in order. A zero `length`
    /// pointer, or a negative entry in it, means the fragment is
    /// NUL-terminated.
    pub fn shader_source(
        &mut self,
        mem: &GuestMemory<'_>,
        shader: u32,
        count: i32,
        strings: u32,
        lengths: u32,
    ) -> Result<()> {
        let fragments = usize::try_from(count).unwrap_or(0);
        let mut source = String::new();
        for i in 0..fragments {
            let ptr = mem.read_u32(slot(strings, i)?)?;
            let len = if lengths == 0 {
                -1
            } else {
                mem.read_i32(slot(lengths, i)?)?
            };
            let fragment = match usize::try_from(len) {
                Ok(len) => mem.read_string_bounded(ptr, len)?,
                Err(_) => mem.read_cstring(ptr)?,
            };
            source.push_str(&fragment);
        }
        tracing::trace!(shader, bytes = source.len(), "glShaderSource");
        let s = self.objects.shader(shader)?;
        self.ctx.shader_source(s, &source);
        Ok(())
    }

    /// `glCompileShader`.
    pub fn compile_shader(&mut self, shader: u32) -> Result<()> {
        let s = self.objects.shader(shader)?;
        self.ctx.compile_shader(s);
        Ok(())
    }

    /// `glGetShaderiv(shader, pname, params)`.
    pub fn get_shaderiv(
        &mut self,
        mem: &mut GuestMemory<'_>,
        shader: u32,
        pname: u32,
        params: u32,
    ) -> Result<()> {
        let s = self.objects.shader(shader)?;
        let value = if pname == gl::INFO_LOG_LENGTH {
            info_log_length(&self.ctx.get_shader_info_log(s))
        } else {
            self.ctx.get_shader_parameter(s, pname)
        };
        mem.write_i32(params, value)
    }

    /// `glGetShaderInfoLog(shader, bufSize, length, infoLog)`.
    pub fn get_shader_info_log(
        &mut self,
        mem: &mut GuestMemory<'_>,
        shader: u32,
        _buf_size: i32,
        length: u32,
        info_log: u32,
    ) -> Result<()> {
        let s = self.objects.shader(shader)?;
        let log = self.ctx.get_shader_info_log(s);
        write_text(mem, &log, length, info_log)
    }

    // ---- programs -------------------------------------------------------

    /// `glCreateProgram()`: returns the new handle.
    pub fn create_program(&mut self) -> Result<u32> {
        let program = self.ctx.create_program();
        Ok(self.objects.insert(ObjectRef::Program(program))?.get())
    }

    /// `glDeleteProgram`; releases the guest handle along with the host program.
    pub fn delete_program(&mut self, program: u32) -> Result<()> {
        if let Some(p) = self
            .objects
            .remove(program, ObjectKind::Program)?
            .and_then(ObjectRef::into_program)
        {
            self.ctx.delete_program(p);
        }
        Ok(())
    }

    /// `glAttachShader`.
    pub fn attach_shader(&mut self, program: u32, shader: u32) -> Result<()> {
        let p = self.objects.program(program)?;
        let s = self.objects.shader(shader)?;
        self.ctx.attach_shader(p, s);
        Ok(())
    }

    /// `glDetachShader`.
    pub fn detach_shader(&mut self, program: u32, shader: u32) -> Result<()> {
        let p = self.objects.program(program)?;
        let s = self.objects.shader(shader)?;
        self.ctx.detach_shader(p, s);
        Ok(())
    }

    /// `glLinkProgram`. Introspection results are only meaningful afterwards.
    pub fn link_program(&mut self, program: u32) -> Result<()> {
        let p = self.objects.program(program)?;
        self.ctx.link_program(p);
        Ok(())
    }

    /// `glUseProgram`; handle 0 unbinds.
    pub fn use_program(&mut self, program: u32) -> Result<()> {
        let p = self.objects.program(program)?;
        self.ctx.use_program(p);
        Ok(())
    }

    /// `glGetProgramiv(program, pname, params)`.
    pub fn get_programiv(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        pname: u32,
        params: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        let value = if pname == gl::INFO_LOG_LENGTH {
            info_log_length(&self.ctx.get_program_info_log(p))
        } else {
            self.ctx.get_program_parameter(p, pname)
        };
        mem.write_i32(params, value)
    }

    /// `glGetProgramInfoLog(program, bufSize, length, infoLog)`.
    pub fn get_program_info_log(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        _buf_size: i32,
        length: u32,
        info_log: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        let log = self.ctx.get_program_info_log(p);
        write_text(mem, &log, length, info_log)
    }

    /// `glGetActiveAttrib(program, index, bufSize, length, size, type, name)`.
    pub fn get_active_attrib(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        index: u32,
        buf_size: i32,
        length: u32,
        size: u32,
        ty: u32,
        name: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        let info = self.ctx.get_active_attrib(p, index);
        write_active_info(mem, info, "attribute", index, buf_size, length, size, ty, name)
    }

    /// `glGetActiveUniform(program, index, bufSize, length, size, type, name)`.
    pub fn get_active_uniform(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        index: u32,
        buf_size: i32,
        length: u32,
        size: u32,
        ty: u32,
        name: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        let info = self.ctx.get_active_uniform(p, index);
        write_active_info(mem, info, "uniform", index, buf_size, length, size, ty, name)
    }

    /// `glGetAttribLocation(program, name)`.
    pub fn get_attrib_location(
        &mut self,
        mem: &GuestMemory<'_>,
        program: u32,
        name: u32,
    ) -> Result<i32> {
        let name = mem.read_cstring(name)?;
        let p = self.objects.program(program)?;
        Ok(self.ctx.get_attrib_location(p, &name))
    }

    /// `glGetUniformLocation(program, name)`.
    ///
    /// Every successful lookup registers a fresh location handle; unknown
    /// names return `-1`.
    pub fn get_uniform_location(
        &mut self,
        mem: &GuestMemory<'_>,
        program: u32,
        name: u32,
    ) -> Result<i32> {
        let name = mem.read_cstring(name)?;
        let p = self.objects.program(program)?;
        match self.ctx.get_uniform_location(p, &name) {
            Some(location) => {
                let handle = self.objects.insert(ObjectRef::UniformLocation(location))?;
                Ok(handle.get() as i32)
            }
            None => {
                tracing::trace!(program, %name, "uniform not found");
                Ok(-1)
            }
        }
    }

    // ---- uniform blocks -------------------------------------------------

    /// `glGetUniformBlockIndex(program, name)`.
    pub fn get_uniform_block_index(
        &mut self,
        mem: &GuestMemory<'_>,
        program: u32,
        name: u32,
    ) -> Result<u32> {
        let name = mem.read_cstring(name)?;
        let p = self.objects.program(program)?;
        Ok(self.ctx.get_uniform_block_index(p, &name))
    }

    /// `glGetActiveUniformBlockiv(program, index, pname, params)`: one value.
    pub fn get_active_uniform_blockiv(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        block_index: u32,
        pname: u32,
        params: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        let value = self
            .ctx
            .get_active_uniform_block_parameter(p, block_index, pname);
        mem.write_i32(params, value)
    }

    /// `glGetActiveUniformBlockName(program, index, bufSize, length, name)`.
    pub fn get_active_uniform_block_name(
        &mut self,
        mem: &mut GuestMemory<'_>,
        program: u32,
        block_index: u32,
        _buf_size: i32,
        length: u32,
        name: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        match self.ctx.get_active_uniform_block_name(p, block_index) {
            Some(block) => write_text(mem, &block, length, name),
            None => {
                tracing::debug!(program, block_index, "no active uniform block");
                Ok(())
            }
        }
    }

    /// `glUniformBlockBinding`.
    pub fn uniform_block_binding(
        &mut self,
        program: u32,
        block_index: u32,
        binding: u32,
    ) -> Result<()> {
        let p = self.objects.program(program)?;
        self.ctx.uniform_block_binding(p, block_index, binding);
        Ok(())
    }

    // ---- uniforms -------------------------------------------------------

    /// `glUniform1i`, typically a sampler unit.
    pub fn uniform1i(&mut self, location: i32, v0: i32) -> Result<()> {
        let loc = self.objects.uniform_location(location)?;
        self.ctx.uniform_1_i32(loc, v0);
        Ok(())
    }

    /// `glUniform{N}fv(location, count, value)` with `components` = N.
    pub fn uniform_fv(
        &mut self,
        mem: &GuestMemory<'_>,
        components: usize,
        location: i32,
        count: i32,
        value: u32,
    ) -> Result<()> {
        let data = mem.f32_slice(value, uniform_len(count, components))?;
        let loc = self.objects.uniform_location(location)?;
        self.ctx.uniform_fv(loc, components, &data);
        Ok(())
    }

    /// `glUniform{N}iv(location, count, value)` with `components` = N.
    pub fn uniform_iv(
        &mut self,
        mem: &GuestMemory<'_>,
        components: usize,
        location: i32,
        count: i32,
        value: u32,
    ) -> Result<()> {
        let data = mem.i32_slice(value, uniform_len(count, components))?;
        let loc = self.objects.uniform_location(location)?;
        self.ctx.uniform_iv(loc, components, &data);
        Ok(())
    }

    /// `glUniform{N}uiv(location, count, value)` with `components` = N.
    pub fn uniform_uiv(
        &mut self,
        mem: &GuestMemory<'_>,
        components: usize,
        location: i32,
        count: i32,
        value: u32,
    ) -> Result<()> {
        let data = mem.u32_slice(value, uniform_len(count, components))?;
        let loc = self.objects.uniform_location(location)?;
        self.ctx.uniform_uiv(loc, components, &data);
        Ok(())
    }

    /// `glUniformMatrix{shape}fv(location, count, transpose, value)`.
    pub fn uniform_matrix_fv(
        &mut self,
        mem: &GuestMemory<'_>,
        shape: MatrixShape,
        location: i32,
        count: i32,
        transpose: u32,
        value: u32,
    ) -> Result<()> {
        let data = mem.f32_slice(value, uniform_len(count, shape.element_count()))?;
        let loc = self.objects.uniform_location(location)?;
        self.ctx.uniform_matrix_fv(loc, shape, transpose != 0, &data);
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn write_active_info(
    mem: &mut GuestMemory<'_>,
    info: Option<ActiveInfo>,
    what: &str,
    index: u32,
    _buf_size: i32,
    length: u32,
    size: u32,
    ty: u32,
    name: u32,
) -> Result<()> {
    let Some(info) = info else {
        tracing::debug!(index, "no active {what}");
        return Ok(());
    };
    mem.write_i32(size, info.size)?;
    mem.write_u32(ty, info.ty)?;
    write_text(mem, &info.name, length, name)
}
