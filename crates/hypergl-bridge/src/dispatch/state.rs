//! Pass-through state, capability gating, queries and draws.

use super::Bridge;
use crate::context::GlContext;
use crate::error::Result;
use crate::memory::GuestMemory;

#[allow(clippy::too_many_arguments)]
impl<C: GlContext> Bridge<C> {
    /// `glCullFace`.
    pub fn cull_face(&mut self, mode: u32) {
        self.ctx.cull_face(mode);
    }

    /// `glClear(mask)`.
    pub fn clear(&mut self, mask: u32) {
        self.ctx.clear(mask);
    }

    /// `glDepthMask`.
    pub fn depth_mask(&mut self, flag: u32) {
        self.ctx.depth_mask(flag != 0);
    }

    /// `glEnable`; capabilities the host manages itself are dropped.
    pub fn enable(&mut self, cap: u32) {
        if self.config.is_suppressed(cap) {
            tracing::trace!(cap = format_args!("{cap:#06x}"), "suppressed glEnable");
            return;
        }
        self.ctx.enable(cap);
    }

    /// `glDisable`; capabilities the host manages itself are dropped.
    pub fn disable(&mut self, cap: u32) {
        if self.config.is_suppressed(cap) {
            tracing::trace!(cap = format_args!("{cap:#06x}"), "suppressed glDisable");
            return;
        }
        self.ctx.disable(cap);
    }

    /// `glFlush`.
    pub fn flush(&mut self) {
        self.ctx.flush();
    }

    /// `glDepthFunc`.
    pub fn depth_func(&mut self, func: u32) {
        self.ctx.depth_func(func);
    }

    /// `glReadBuffer`.
    pub fn read_buffer(&mut self, src: u32) {
        self.ctx.read_buffer(src);
    }

    /// `glViewport`.
    pub fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.ctx.viewport(x, y, width, height);
    }

    /// `glActiveTexture`.
    pub fn active_texture(&mut self, texture: u32) {
        self.ctx.active_texture(texture);
    }

    /// `glBlendFuncSeparate`.
    pub fn blend_func_separate(
        &mut self,
        src_rgb: u32,
        dst_rgb: u32,
        src_alpha: u32,
        dst_alpha: u32,
    ) {
        self.ctx.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
    }

    /// `glBlendEquationSeparate`.
    pub fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.ctx.blend_equation_separate(mode_rgb, mode_alpha);
    }

    /// `glDrawBuffers(n, bufs)`: `n` enums read from guest memory.
    pub fn draw_buffers(&mut self, mem: &GuestMemory<'_>, n: i32, bufs: u32) -> Result<()> {
        let count = usize::try_from(n).unwrap_or(0);
        let buffers = mem.u32_slice(bufs, count)?;
        self.ctx.draw_buffers(&buffers);
        Ok(())
    }

    /// `glStencilOpSeparate`.
    pub fn stencil_op_separate(&mut self, face: u32, sfail: u32, dpfail: u32, dppass: u32) {
        self.ctx.stencil_op_separate(face, sfail, dpfail, dppass);
    }

    /// `glStencilFuncSeparate`.
    pub fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32) {
        self.ctx.stencil_func_separate(face, func, reference, mask);
    }

    /// `glStencilMaskSeparate`.
    pub fn stencil_mask_separate(&mut self, face: u32, mask: u32) {
        self.ctx.stencil_mask_separate(face, mask);
    }

    /// `glPixelStorei`.
    pub fn pixel_storei(&mut self, pname: u32, param: i32) {
        self.ctx.pixel_store_i32(pname, param);
    }

    /// `glClearBufferiv`: always four components, as for a color buffer.
    pub fn clear_bufferiv(
        &mut self,
        mem: &GuestMemory<'_>,
        buffer: u32,
        draw_buffer: i32,
        value: u32,
    ) -> Result<()> {
        let values = mem.i32_slice(value, 4)?;
        self.ctx.clear_buffer_iv(buffer, draw_buffer, &values);
        Ok(())
    }

    /// `glClearBufferuiv`.
    pub fn clear_bufferuiv(
        &mut self,
        mem: &GuestMemory<'_>,
        buffer: u32,
        draw_buffer: i32,
        value: u32,
    ) -> Result<()> {
        let values = mem.u32_slice(value, 4)?;
        self.ctx.clear_buffer_uiv(buffer, draw_buffer, &values);
        Ok(())
    }

    /// `glClearBufferfv`.
    pub fn clear_bufferfv(
        &mut self,
        mem: &GuestMemory<'_>,
        buffer: u32,
        draw_buffer: i32,
        value: u32,
    ) -> Result<()> {
        let values = mem.f32_slice(value, 4)?;
        self.ctx.clear_buffer_fv(buffer, draw_buffer, &values);
        Ok(())
    }

    /// `glClearBufferfi`.
    pub fn clear_bufferfi(&mut self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32) {
        self.ctx.clear_buffer_fi(buffer, draw_buffer, depth, stencil);
    }

    /// `glGetError`: the host's code, untranslated.
    pub fn get_error(&mut self) -> u32 {
        self.ctx.get_error()
    }

    /// `glGetIntegerv(pname, data)`: one value, clamped to fit the slot.
    pub fn get_integerv(&mut self, mem: &mut GuestMemory<'_>, pname: u32, data: u32) -> Result<()> {
        let value = self.ctx.get_parameter_i64(pname);
        let upper = self.config.integer_query_clamp;
        let lower = i64::from(i32::MIN).min(upper);
        let clamped = i32::try_from(value.clamp(lower, upper)).unwrap_or(i32::MAX);
        mem.write_i32(data, clamped)
    }

    /// Text for `glGetString(pname)`.
    ///
    /// Copying it into guest memory needs the guest's allocator, so that part
    /// lives with the runtime glue.
    pub fn get_string(&mut self, pname: u32) -> Option<String> {
        self.ctx.get_parameter_string(pname)
    }

    /// `glEnableVertexAttribArray`.
    pub fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.ctx.enable_vertex_attrib_array(index);
    }

    /// `glVertexAttribPointer`; `pointer` is an offset into the bound array
    /// buffer, not guest memory.
    pub fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: u32,
        stride: i32,
        pointer: u32,
    ) {
        self.ctx
            .vertex_attrib_pointer(index, size, ty, normalized != 0, stride, i64::from(pointer));
    }

    /// `glVertexAttribIPointer`; `pointer` is a buffer offset, not guest memory.
    pub fn vertex_attrib_ipointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        stride: i32,
        pointer: u32,
    ) {
        self.ctx.vertex_attrib_i_pointer(index, size, ty, stride, i64::from(pointer));
    }

    /// `glVertexAttribDivisor`.
    pub fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) {
        self.ctx.vertex_attrib_divisor(index, divisor);
    }

    /// `glDrawArraysInstanced`.
    pub fn draw_arrays_instanced(
        &mut self,
        mode: u32,
        first: i32,
        count: i32,
        instance_count: i32,
    ) {
        self.ctx.draw_arrays_instanced(mode, first, count, instance_count);
    }

    /// `glDrawElementsInstanced`; `indices` is an offset into the bound
    /// element buffer.
    pub fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        ty: u32,
        indices: u32,
        instance_count: i32,
    ) {
        self.ctx.draw_elements_instanced(mode, count, ty, i64::from(indices), instance_count);
    }

    /// `glDispatchCompute`: no host compute, nothing happens.
    pub fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        tracing::warn!(x, y, z, "glDispatchCompute has no host equivalent; ignored");
    }

    /// `glMemoryBarrier`: no host compute, nothing happens.
    pub fn memory_barrier(&mut self, barriers: u32) {
        tracing::warn!(
            barriers = format_args!("{barriers:#x}"),
            "glMemoryBarrier has no host equivalent; ignored"
        );
    }

    /// `glBindImageTexture`: no host image units, nothing happens.
    pub fn bind_image_texture(
        &mut self,
        unit: u32,
        texture: u32,
        level: i32,
        layered: u32,
        layer: i32,
        access: u32,
        format: u32,
    ) {
        tracing::warn!(
            unit,
            texture,
            level,
            layered,
            layer,
            access = format_args!("{access:#x}"),
            format = format_args!("{format:#x}"),
            "glBindImageTexture has no host equivalent; ignored"
        );
    }

    /// Whether `cap` reaches the host.
    pub fn forwards_capability(&self, cap: u32) -> bool {
        !self.config.is_suppressed(cap)
    }
}
