//! Object lifetime and binding: textures, buffers, framebuffers,
//! renderbuffers, vertex arrays and samplers.

use super::Bridge;
use crate::context::GlContext;
use crate::error::Result;
use crate::handles::{ObjectKind, ObjectRef};
use crate::memory::GuestMemory;

#[allow(clippy::too_many_arguments)]
impl<C: GlContext> Bridge<C> {
    // ---- textures -------------------------------------------------------

    /// `glGenTextures(n, textures)`.
    pub fn gen_textures(&mut self, mem: &mut GuestMemory<'_>, n: i32, textures: u32) -> Result<()> {
        self.gen_one(mem, n, textures, ObjectKind::Texture, |ctx| {
            ObjectRef::Texture(ctx.create_texture())
        })
    }

    /// `glDeleteTextures(n, textures)`.
    pub fn delete_textures(&mut self, mem: &GuestMemory<'_>, n: i32, textures: u32) -> Result<()> {
        if let Some(tex) = self
            .delete_one(mem, n, textures, ObjectKind::Texture)?
            .and_then(ObjectRef::into_texture)
        {
            self.ctx.delete_texture(tex);
        }
        Ok(())
    }

    /// `glBindTexture`; handle 0 unbinds.
    pub fn bind_texture(&mut self, target: u32, texture: u32) -> Result<()> {
        let tex = self.objects.texture(texture)?;
        self.ctx.bind_texture(target, tex);
        Ok(())
    }

    // ---- buffers --------------------------------------------------------

    /// `glGenBuffers(n, buffers)`.
    pub fn gen_buffers(&mut self, mem: &mut GuestMemory<'_>, n: i32, buffers: u32) -> Result<()> {
        self.gen_one(mem, n, buffers, ObjectKind::Buffer, |ctx| {
            ObjectRef::Buffer(ctx.create_buffer())
        })
    }

    /// `glDeleteBuffers(n, buffers)`.
    pub fn delete_buffers(&mut self, mem: &GuestMemory<'_>, n: i32, buffers: u32) -> Result<()> {
        if let Some(buf) = self
            .delete_one(mem, n, buffers, ObjectKind::Buffer)?
            .and_then(ObjectRef::into_buffer)
        {
            self.ctx.delete_buffer(buf);
        }
        Ok(())
    }

    /// `glBindBuffer`; handle 0 unbinds the target.
    pub fn bind_buffer(&mut self, target: u32, buffer: u32) -> Result<()> {
        let buf = self.objects.buffer(buffer)?;
        self.ctx.bind_buffer(target, buf);
        Ok(())
    }

    /// `glBindBufferBase` for indexed targets such as `UNIFORM_BUFFER`.
    pub fn bind_buffer_base(&mut self, target: u32, index: u32, buffer: u32) -> Result<()> {
        let buf = self.objects.buffer(buffer)?;
        self.ctx.bind_buffer_base(target, index, buf);
        Ok(())
    }

    /// `glBindBufferRange`; offset and size are 32-bit on the guest.
    pub fn bind_buffer_range(
        &mut self,
        target: u32,
        index: u32,
        buffer: u32,
        offset: i32,
        size: i32,
    ) -> Result<()> {
        let buf = self.objects.buffer(buffer)?;
        self.ctx.bind_buffer_range(target, index, buf, i64::from(offset), i64::from(size));
        Ok(())
    }

    // ---- framebuffers ---------------------------------------------------

    /// `glGenFramebuffers`.
    pub fn gen_framebuffers(
        &mut self,
        mem: &mut GuestMemory<'_>,
        n: i32,
        framebuffers: u32,
    ) -> Result<()> {
        self.gen_one(mem, n, framebuffers, ObjectKind::Framebuffer, |ctx| {
            ObjectRef::Framebuffer(ctx.create_framebuffer())
        })
    }

    /// `glDeleteFramebuffers`.
    pub fn delete_framebuffers(
        &mut self,
        mem: &GuestMemory<'_>,
        n: i32,
        framebuffers: u32,
    ) -> Result<()> {
        if let Some(fb) = self
            .delete_one(mem, n, framebuffers, ObjectKind::Framebuffer)?
            .and_then(ObjectRef::into_framebuffer)
        {
            self.ctx.delete_framebuffer(fb);
        }
        Ok(())
    }

    /// `glBindFramebuffer`; handle 0 restores the default framebuffer.
    pub fn bind_framebuffer(&mut self, target: u32, framebuffer: u32) -> Result<()> {
        let fb = self.objects.framebuffer(framebuffer)?;
        self.ctx.bind_framebuffer(target, fb);
        Ok(())
    }

    /// `glFramebufferTexture2D`.
    pub fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: u32,
        level: i32,
    ) -> Result<()> {
        let tex = self.objects.texture(texture)?;
        self.ctx.framebuffer_texture_2d(target, attachment, tex_target, tex, level);
        Ok(())
    }

    /// `glFramebufferRenderbuffer`.
    pub fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: u32,
    ) -> Result<()> {
        let rb = self.objects.renderbuffer(renderbuffer)?;
        self.ctx.framebuffer_renderbuffer(target, attachment, renderbuffer_target, rb);
        Ok(())
    }

    /// `glFramebufferTextureLayer`.
    pub fn framebuffer_texture_layer(
        &mut self,
        target: u32,
        attachment: u32,
        texture: u32,
        level: i32,
        layer: i32,
    ) -> Result<()> {
        let tex = self.objects.texture(texture)?;
        self.ctx.framebuffer_texture_layer(target, attachment, tex, level, layer);
        Ok(())
    }

    /// `glBlitFramebuffer`.
    pub fn blit_framebuffer(
        &mut self,
        src_x0: i32,
        src_y0: i32,
        src_x1: i32,
        src_y1: i32,
        dst_x0: i32,
        dst_y0: i32,
        dst_x1: i32,
        dst_y1: i32,
        mask: u32,
        filter: u32,
    ) {
        self.ctx.blit_framebuffer(
            [src_x0, src_y0, src_x1, src_y1],
            [dst_x0, dst_y0, dst_x1, dst_y1],
            mask,
            filter,
        );
    }

    // ---- renderbuffers --------------------------------------------------

    /// `glGenRenderbuffers`.
    pub fn gen_renderbuffers(
        &mut self,
        mem: &mut GuestMemory<'_>,
        n: i32,
        renderbuffers: u32,
    ) -> Result<()> {
        self.gen_one(mem, n, renderbuffers, ObjectKind::Renderbuffer, |ctx| {
            ObjectRef::Renderbuffer(ctx.create_renderbuffer())
        })
    }

    /// `glDeleteRenderbuffers`.
    pub fn delete_renderbuffers(
        &mut self,
        mem: &GuestMemory<'_>,
        n: i32,
        renderbuffers: u32,
    ) -> Result<()> {
        if let Some(rb) = self
            .delete_one(mem, n, renderbuffers, ObjectKind::Renderbuffer)?
            .and_then(ObjectRef::into_renderbuffer)
        {
            self.ctx.delete_renderbuffer(rb);
        }
        Ok(())
    }

    /// `glBindRenderbuffer`.
    pub fn bind_renderbuffer(&mut self, target: u32, renderbuffer: u32) -> Result<()> {
        let rb = self.objects.renderbuffer(renderbuffer)?;
        self.ctx.bind_renderbuffer(target, rb);
        Ok(())
    }

    /// `glRenderbufferStorageMultisample`.
    pub fn renderbuffer_storage_multisample(
        &mut self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.ctx.renderbuffer_storage_multisample(target, samples, internal_format, width, height);
    }

    // ---- vertex arrays --------------------------------------------------

    /// `glGenVertexArrays`.
    pub fn gen_vertex_arrays(
        &mut self,
        mem: &mut GuestMemory<'_>,
        n: i32,
        arrays: u32,
    ) -> Result<()> {
        self.gen_one(mem, n, arrays, ObjectKind::VertexArray, |ctx| {
            ObjectRef::VertexArray(ctx.create_vertex_array())
        })
    }

    /// `glDeleteVertexArrays`.
    pub fn delete_vertex_arrays(
        &mut self,
        mem: &GuestMemory<'_>,
        n: i32,
        arrays: u32,
    ) -> Result<()> {
        if let Some(vao) = self
            .delete_one(mem, n, arrays, ObjectKind::VertexArray)?
            .and_then(ObjectRef::into_vertex_array)
        {
            self.ctx.delete_vertex_array(vao);
        }
        Ok(())
    }

    /// `glBindVertexArray`.
    pub fn bind_vertex_array(&mut self, array: u32) -> Result<()> {
        let vao = self.objects.vertex_array(array)?;
        self.ctx.bind_vertex_array(vao);
        Ok(())
    }

    // ---- samplers -------------------------------------------------------

    /// `glGenSamplers`.
    pub fn gen_samplers(&mut self, mem: &mut GuestMemory<'_>, n: i32, samplers: u32) -> Result<()> {
        self.gen_one(mem, n, samplers, ObjectKind::Sampler, |ctx| {
            ObjectRef::Sampler(ctx.create_sampler())
        })
    }

    /// `glDeleteSamplers`.
    pub fn delete_samplers(&mut self, mem: &GuestMemory<'_>, n: i32, samplers: u32) -> Result<()> {
        if let Some(sampler) = self
            .delete_one(mem, n, samplers, ObjectKind::Sampler)?
            .and_then(ObjectRef::into_sampler)
        {
            self.ctx.delete_sampler(sampler);
        }
        Ok(())
    }

    /// `glBindSampler`.
    pub fn bind_sampler(&mut self, unit: u32, sampler: u32) -> Result<()> {
        let s = self.objects.sampler(sampler)?;
        self.ctx.bind_sampler(unit, s);
        Ok(())
    }

    /// `glSamplerParameteri`.
    pub fn sampler_parameteri(&mut self, sampler: u32, pname: u32, param: i32) -> Result<()> {
        let s = self.objects.sampler(sampler)?;
        self.ctx.sampler_parameter_i32(s, pname, param);
        Ok(())
    }

    /// `glSamplerParameterf`.
    pub fn sampler_parameterf(&mut self, sampler: u32, pname: u32, param: f32) -> Result<()> {
        let s = self.objects.sampler(sampler)?;
        self.ctx.sampler_parameter_f32(s, pname, param);
        Ok(())
    }
}
