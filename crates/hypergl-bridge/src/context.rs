//! Host-facing graphics context.
//!
//! [`GlContext`] is the surface the bridge consumes: a WebGL2-shaped API that
//! works with host-native objects and slices instead of guest ids and guest
//! offsets. Objects are passed as `Option<&T>`; `None` is the host's null
//! object, and the host is expected to reject it through its own error code
//! rather than panic.

use serde::{Deserialize, Serialize};

use crate::memory::{TypedView, TypedViewMut};

/// Name, array size and type of an active attribute or uniform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveInfo {
    /// Variable name as reported by the host (arrays end in `[0]`)
    pub name: String,
    /// Array length, 1 for non-arrays
    pub size: i32,
    /// GL type enum
    pub ty: u32,
}

/// Shape of a matrix uniform upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixShape {
    /// 2x2
    Mat2,
    /// 3x3
    Mat3,
    /// 4x4
    Mat4,
    /// 2 columns, 3 rows
    Mat2x3,
    /// 3 columns, 2 rows
    Mat3x2,
    /// 2 columns, 4 rows
    Mat2x4,
    /// 4 columns, 2 rows
    Mat4x2,
    /// 3 columns, 4 rows
    Mat3x4,
    /// 4 columns, 3 rows
    Mat4x3,
}

impl MatrixShape {
    /// Floats per matrix.
    pub const fn element_count(self) -> usize {
        match self {
            Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
            Self::Mat2x3 | Self::Mat3x2 => 6,
            Self::Mat2x4 | Self::Mat4x2 => 8,
            Self::Mat3x4 | Self::Mat4x3 => 12,
        }
    }

    /// WebGL method suffix, e.g. `4x3` for `uniformMatrix4x3fv`.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Mat2 => "2",
            Self::Mat3 => "3",
            Self::Mat4 => "4",
            Self::Mat2x3 => "2x3",
            Self::Mat3x2 => "3x2",
            Self::Mat2x4 => "2x4",
            Self::Mat4x2 => "4x2",
            Self::Mat3x4 => "3x4",
            Self::Mat4x3 => "4x3",
        }
    }
}

/// Host graphics context consumed by the bridge.
///
/// Method names and argument order follow WebGL2. Integer enums are passed
/// through untouched; only object references, pixel/array payloads and
/// strings are translated by the bridge. Host objects must be `Send` so a
/// bridge can live inside a wasmtime store.
#[allow(clippy::too_many_arguments, missing_docs)]
pub trait GlContext {
    /// Host texture object
    type Texture: Send;
    /// Host buffer object
    type Buffer: Send;
    /// Host shader object
    type Shader: Send;
    /// Host program object
    type Program: Send;
    /// Host framebuffer object
    type Framebuffer: Send;
    /// Host renderbuffer object
    type Renderbuffer: Send;
    /// Host vertex array object
    type VertexArray: Send;
    /// Host sampler object
    type Sampler: Send;
    /// Host uniform location reference
    type UniformLocation: Send;

    // ---- state ----------------------------------------------------------

    fn cull_face(&mut self, mode: u32);
    fn clear(&mut self, mask: u32);
    fn depth_mask(&mut self, flag: bool);
    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn flush(&mut self);
    fn depth_func(&mut self, func: u32);
    fn read_buffer(&mut self, src: u32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn active_texture(&mut self, texture: u32);
    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32);
    fn draw_buffers(&mut self, buffers: &[u32]);
    fn stencil_op_separate(&mut self, face: u32, sfail: u32, dpfail: u32, dppass: u32);
    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32);
    fn stencil_mask_separate(&mut self, face: u32, mask: u32);
    fn pixel_store_i32(&mut self, pname: u32, param: i32);
    fn clear_buffer_iv(&mut self, buffer: u32, draw_buffer: i32, values: &[i32]);
    fn clear_buffer_uiv(&mut self, buffer: u32, draw_buffer: i32, values: &[u32]);
    fn clear_buffer_fv(&mut self, buffer: u32, draw_buffer: i32, values: &[f32]);
    fn clear_buffer_fi(&mut self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32);

    // ---- queries --------------------------------------------------------

    /// Pop the oldest pending error, `GL_NO_ERROR` when none.
    fn get_error(&mut self) -> u32;
    /// Integer-valued parameter; wider than the guest's 32-bit slot.
    fn get_parameter_i64(&mut self, pname: u32) -> i64;
    /// String-valued parameter, `None` when the host has none.
    fn get_parameter_string(&mut self, pname: u32) -> Option<String>;

    // ---- textures -------------------------------------------------------

    fn create_texture(&mut self) -> Self::Texture;
    fn delete_texture(&mut self, texture: Self::Texture);
    fn bind_texture(&mut self, target: u32, texture: Option<&Self::Texture>);
    fn tex_parameter_i32(&mut self, target: u32, pname: u32, param: i32);
    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: Option<TypedView<'_>>,
    );
    fn tex_sub_image_2d(
        &mut self,
        target: u32,
        level: i32,
        x_offset: i32,
        y_offset: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: TypedView<'_>,
    );
    fn tex_image_3d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        depth: i32,
        border: i32,
        format: u32,
        ty: u32,
        pixels: Option<TypedView<'_>>,
    );
    fn tex_sub_image_3d(
        &mut self,
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
        pixels: TypedView<'_>,
    );
    fn generate_mipmap(&mut self, target: u32);
    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        dst: TypedViewMut<'_>,
    );

    // ---- buffers --------------------------------------------------------

    fn create_buffer(&mut self) -> Self::Buffer;
    fn delete_buffer(&mut self, buffer: Self::Buffer);
    fn bind_buffer(&mut self, target: u32, buffer: Option<&Self::Buffer>);
    fn bind_buffer_base(&mut self, target: u32, index: u32, buffer: Option<&Self::Buffer>);
    fn bind_buffer_range(
        &mut self,
        target: u32,
        index: u32,
        buffer: Option<&Self::Buffer>,
        offset: i64,
        size: i64,
    );
    /// Allocate `size` zeroed bytes for the buffer bound to `target`.
    fn buffer_data_size(&mut self, target: u32, size: i64, usage: u32);
    /// Allocate and fill the buffer bound to `target`.
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn buffer_sub_data(&mut self, target: u32, offset: i64, data: &[u8]);
    fn get_buffer_sub_data(&mut self, target: u32, offset: i64, dst: &mut [u8]);
    fn copy_buffer_sub_data(
        &mut self,
        read_target: u32,
        write_target: u32,
        read_offset: i64,
        write_offset: i64,
        size: i64,
    );

    // ---- shaders & programs ---------------------------------------------

    fn create_shader(&mut self, ty: u32) -> Self::Shader;
    fn delete_shader(&mut self, shader: Self::Shader);
    fn shader_source(&mut self, shader: Option<&Self::Shader>, source: &str);
    fn compile_shader(&mut self, shader: Option<&Self::Shader>);
    fn get_shader_parameter(&mut self, shader: Option<&Self::Shader>, pname: u32) -> i32;
    fn get_shader_info_log(&mut self, shader: Option<&Self::Shader>) -> String;

    fn create_program(&mut self) -> Self::Program;
    fn delete_program(&mut self, program: Self::Program);
    fn attach_shader(&mut self, program: Option<&Self::Program>, shader: Option<&Self::Shader>);
    fn detach_shader(&mut self, program: Option<&Self::Program>, shader: Option<&Self::Shader>);
    fn link_program(&mut self, program: Option<&Self::Program>);
    fn use_program(&mut self, program: Option<&Self::Program>);
    fn get_program_parameter(&mut self, program: Option<&Self::Program>, pname: u32) -> i32;
    fn get_program_info_log(&mut self, program: Option<&Self::Program>) -> String;
    fn get_active_attrib(
        &mut self,
        program: Option<&Self::Program>,
        index: u32,
    ) -> Option<ActiveInfo>;
    fn get_active_uniform(
        &mut self,
        program: Option<&Self::Program>,
        index: u32,
    ) -> Option<ActiveInfo>;
    fn get_attrib_location(&mut self, program: Option<&Self::Program>, name: &str) -> i32;
    fn get_uniform_location(
        &mut self,
        program: Option<&Self::Program>,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn get_uniform_block_index(&mut self, program: Option<&Self::Program>, name: &str) -> u32;
    fn get_active_uniform_block_parameter(
        &mut self,
        program: Option<&Self::Program>,
        block_index: u32,
        pname: u32,
    ) -> i32;
    fn get_active_uniform_block_name(
        &mut self,
        program: Option<&Self::Program>,
        block_index: u32,
    ) -> Option<String>;
    fn uniform_block_binding(
        &mut self,
        program: Option<&Self::Program>,
        block_index: u32,
        binding: u32,
    );

    // ---- uniforms -------------------------------------------------------

    fn uniform_1_i32(&mut self, location: Option<&Self::UniformLocation>, v0: i32);
    /// `uniform{N}fv` with `components` = N.
    fn uniform_fv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        components: usize,
        data: &[f32],
    );
    /// `uniform{N}iv` with `components` = N.
    fn uniform_iv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        components: usize,
        data: &[i32],
    );
    /// `uniform{N}uiv` with `components` = N.
    fn uniform_uiv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        components: usize,
        data: &[u32],
    );
    fn uniform_matrix_fv(
        &mut self,
        location: Option<&Self::UniformLocation>,
        shape: MatrixShape,
        transpose: bool,
        data: &[f32],
    );

    // ---- vertex input & draws -------------------------------------------

    fn create_vertex_array(&mut self) -> Self::VertexArray;
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);
    fn bind_vertex_array(&mut self, vertex_array: Option<&Self::VertexArray>);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i64,
    );
    fn vertex_attrib_i_pointer(&mut self, index: u32, size: i32, ty: u32, stride: i32, offset: i64);
    fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32);
    fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instance_count: i32);
    fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        ty: u32,
        offset: i64,
        instance_count: i32,
    );

    // ---- framebuffers & renderbuffers -----------------------------------

    fn create_framebuffer(&mut self) -> Self::Framebuffer;
    fn delete_framebuffer(&mut self, framebuffer: Self::Framebuffer);
    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&Self::Framebuffer>);
    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: Option<&Self::Texture>,
        level: i32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&Self::Renderbuffer>,
    );
    fn framebuffer_texture_layer(
        &mut self,
        target: u32,
        attachment: u32,
        texture: Option<&Self::Texture>,
        level: i32,
        layer: i32,
    );
    fn blit_framebuffer(
        &mut self,
        src: [i32; 4],
        dst: [i32; 4],
        mask: u32,
        filter: u32,
    );
    fn create_renderbuffer(&mut self) -> Self::Renderbuffer;
    fn delete_renderbuffer(&mut self, renderbuffer: Self::Renderbuffer);
    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&Self::Renderbuffer>);
    fn renderbuffer_storage_multisample(
        &mut self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    );

    // ---- samplers -------------------------------------------------------

    fn create_sampler(&mut self) -> Self::Sampler;
    fn delete_sampler(&mut self, sampler: Self::Sampler);
    fn bind_sampler(&mut self, unit: u32, sampler: Option<&Self::Sampler>);
    fn sampler_parameter_i32(&mut self, sampler: Option<&Self::Sampler>, pname: u32, param: i32);
    fn sampler_parameter_f32(&mut self, sampler: Option<&Self::Sampler>, pname: u32, param: f32);
}
