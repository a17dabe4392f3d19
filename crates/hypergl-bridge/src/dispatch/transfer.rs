//! Buffer and pixel transfers between guest memory and the host.

use super::Bridge;
use crate::context::GlContext;
use crate::error::Result;
use crate::formats::{pixel_element_count, ElementType};
use crate::gl;
use crate::memory::{GuestMemory, TypedView};

/// Byte length of a guest `GLsizeiptr`, negative sizes counting as zero.
fn guest_len(size: i32) -> usize {
    usize::try_from(size).unwrap_or(0)
}

fn pixel_view<'m>(
    mem: &'m GuestMemory<'_>,
    format: u32,
    ty: u32,
    width: i32,
    height: i32,
    depth: i32,
    pixels: u32,
) -> Result<TypedView<'m>> {
    let element = ElementType::from_gl(ty)?;
    let count = pixel_element_count(format, width, height, depth)?;
    mem.typed_view(element, pixels, count)
}

#[allow(clippy::too_many_arguments)]
impl<C: GlContext> Bridge<C> {
    // ---- buffers --------------------------------------------------------

    /// `glBufferData(target, size, data, usage)`.
    ///
    /// A zero `data` pointer reserves `size` bytes; anything else uploads
    /// `size` bytes from guest memory.
    pub fn buffer_data(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        size: i32,
        data: u32,
        usage: u32,
    ) -> Result<()> {
        if data == 0 || size < 0 {
            self.ctx.buffer_data_size(target, i64::from(size), usage);
            return Ok(());
        }
        let bytes = mem.bytes(data, guest_len(size))?;
        self.ctx.buffer_data(target, bytes, usage);
        Ok(())
    }

    /// `glBufferStorage`, emulated with `glBufferData`.
    ///
    /// Storage the guest intends to write again gets `DYNAMIC_DRAW`; all
    /// other flag combinations get `STATIC_DRAW`.
    pub fn buffer_storage(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        size: i32,
        data: u32,
        flags: u32,
    ) -> Result<()> {
        let usage = if flags & (gl::MAP_WRITE_BIT | gl::DYNAMIC_STORAGE_BIT) != 0 {
            gl::DYNAMIC_DRAW
        } else {
            gl::STATIC_DRAW
        };
        self.buffer_data(mem, target, size, data, usage)
    }

    /// `glBufferSubData(target, offset, size, data)`.
    pub fn buffer_sub_data(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        offset: i32,
        size: i32,
        data: u32,
    ) -> Result<()> {
        let bytes = mem.bytes(data, guest_len(size))?;
        self.ctx.buffer_sub_data(target, i64::from(offset), bytes);
        Ok(())
    }

    /// `glGetBufferSubData(target, offset, size, data)`: host bytes land in
    /// guest memory at `data`.
    pub fn get_buffer_sub_data(
        &mut self,
        mem: &mut GuestMemory<'_>,
        target: u32,
        offset: i32,
        size: i32,
        data: u32,
    ) -> Result<()> {
        let dst = mem.bytes_mut(data, guest_len(size))?;
        self.ctx.get_buffer_sub_data(target, i64::from(offset), dst);
        Ok(())
    }

    /// `glCopyBufferSubData` between the buffers bound to two targets.
    pub fn copy_buffer_sub_data(
        &mut self,
        read_target: u32,
        write_target: u32,
        read_offset: i32,
        write_offset: i32,
        size: i32,
    ) {
        self.ctx.copy_buffer_sub_data(
            read_target,
            write_target,
            i64::from(read_offset),
            i64::from(write_offset),
            i64::from(size),
        );
    }

    /// `glMapBufferRange`: mapping is not available, the guest gets a null
    /// pointer.
    pub fn map_buffer_range(&mut self, target: u32, offset: i32, length: i32, access: u32) -> u32 {
        tracing::warn!(
            target = format_args!("{target:#06x}"),
            offset,
            length,
            access = format_args!("{access:#x}"),
            "glMapBufferRange is not supported; returning null"
        );
        0
    }

    /// `glUnmapBuffer`: nothing is ever mapped, so it always succeeds.
    pub fn unmap_buffer(&mut self, target: u32) -> u32 {
        tracing::trace!(target = format_args!("{target:#06x}"), "glUnmapBuffer");
        gl::TRUE
    }

    // ---- textures -------------------------------------------------------

    /// `glTexParameteri`.
    pub fn tex_parameteri(&mut self, target: u32, pname: u32, param: i32) {
        self.ctx.tex_parameter_i32(target, pname, param);
    }

    /// `glGenerateMipmap`.
    pub fn generate_mipmap(&mut self, target: u32) {
        self.ctx.generate_mipmap(target);
    }

    /// `glTexImage2D`; reserves storage only unless initial pixel upload is
    /// enabled.
    pub fn tex_image_2d(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: u32,
    ) -> Result<()> {
        let view = if self.config.upload_initial_pixels && pixels != 0 {
            Some(pixel_view(mem, format, ty, width, height, 1, pixels)?)
        } else {
            None
        };
        self.ctx.tex_image_2d(
            target,
            level,
            internal_format,
            width,
            height,
            border,
            format,
            ty,
            view,
        );
        Ok(())
    }

    /// `glTexSubImage2D`: pixels are sized from format, type and extent.
    pub fn tex_sub_image_2d(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: u32,
    ) -> Result<()> {
        let view = pixel_view(mem, format, ty, width, height, 1, pixels)?;
        self.ctx.tex_sub_image_2d(
            target, level, x_offset, y_offset, width, height, format, ty, view,
        );
        Ok(())
    }

    /// `glTexImage3D`; reserves storage only unless initial pixel upload is
    /// enabled.
    pub fn tex_image_3d(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        depth: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: u32,
    ) -> Result<()> {
        let view = if self.config.upload_initial_pixels && pixels != 0 {
            Some(pixel_view(mem, format, ty, width, height, depth, pixels)?)
        } else {
            None
        };
        self.ctx.tex_image_3d(
            target,
            level,
            internal_format,
            width,
            height,
            depth,
            border,
            format,
            ty,
            view,
        );
        Ok(())
    }

    /// `glTexSubImage3D`; reads `width * height * depth` pixels from guest memory.
    pub fn tex_sub_image_3d(
        &mut self,
        mem: &GuestMemory<'_>,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        z_offset: i32,
        width: i32,
        height: i32,
        depth: i32,
        format: u32,
        ty: u32,
        pixels: u32,
    ) -> Result<()> {
        let view = pixel_view(mem, format, ty, width, height, depth, pixels)?;
        self.ctx.tex_sub_image_3d(
            target, level, x_offset, y_offset, z_offset, width, height, depth, format, ty, view,
        );
        Ok(())
    }

    /// `glReadPixels`: the host writes straight into guest memory at
    /// `pixels`.
    pub fn read_pixels(
        &mut self,
        mem: &mut GuestMemory<'_>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: u32,
    ) -> Result<()> {
        let element = ElementType::from_gl(ty)?;
        let count = pixel_element_count(format, width, height, 1)?;
        let dst = mem.typed_view_mut(element, pixels, count)?;
        self.ctx.read_pixels(x, y, width, height, format, ty, dst);
        Ok(())
    }
}
