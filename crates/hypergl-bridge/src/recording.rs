//! In-memory reference host context.
//!
//! [`RecordingContext`] implements [`GlContext`] without a GPU. It logs every
//! call it receives and models just enough state (capabilities, buffer
//! contents, shader and program status, uniforms, a sticky error code) for the
//! bridge's behavior to be observed from tests and from the CLI.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::context::{ActiveInfo, GlContext, MatrixShape};
use crate::gl;
use crate::memory::{TypedView, TypedViewMut};

/// Host object id, from the context's own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostObject(pub u32);

/// One call received by the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCall {
    /// WebGL-style method name, e.g. `bindBuffer`
    pub name: String,
    /// Scalar arguments; objects appear as their host id, `0` for none
    pub args: Vec<f64>,
    /// Bytes of array or pixel payload that came with the call
    pub payload_len: usize,
}

/// Last value uploaded to a uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UniformValue {
    /// `uniform*fv` and `uniformMatrix*fv`
    Float(Vec<f32>),
    /// `uniform1i` and `uniform*iv`
    Int(Vec<i32>),
    /// `uniform*uiv`
    Uint(Vec<u32>),
}

#[derive(Debug, Default)]
struct ShaderState {
    ty: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Clone)]
struct UniformBlock {
    name: String,
    members: usize,
    binding: u32,
}

#[derive(Debug, Default)]
struct ProgramState {
    shaders: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<ActiveInfo>,
    uniforms: Vec<ActiveInfo>,
    blocks: Vec<UniformBlock>,
}

/// Reference [`GlContext`] that records calls instead of rendering.
#[derive(Debug)]
pub struct RecordingContext {
    next_id: u32,
    calls: Vec<RecordedCall>,
    error: u32,
    enabled: HashSet<u32>,
    textures: HashSet<u32>,
    buffers: HashMap<u32, Vec<u8>>,
    buffer_bindings: HashMap<u32, u32>,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,
    current_program: Option<u32>,
    /// Location id → uniform name (array suffix stripped).
    locations: HashMap<u32, String>,
    uniform_values: HashMap<String, UniformValue>,
    other_objects: HashSet<u32>,
    parameters: HashMap<u32, i64>,
    strings: HashMap<u32, String>,
    read_fill: u8,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    /// Context with a small set of default parameters and strings.
    pub fn new() -> Self {
        let parameters = HashMap::from([(gl::MAX_TEXTURE_SIZE, 16384)]);
        let strings = HashMap::from([
            (gl::VENDOR, "HyperGL".to_string()),
            (gl::RENDERER, "HyperGL RecordingContext".to_string()),
            (gl::VERSION, "WebGL 2.0 (HyperGL)".to_string()),
            (gl::SHADING_LANGUAGE_VERSION, "WebGL GLSL ES 3.00".to_string()),
        ]);
        Self {
            next_id: 1,
            calls: Vec::new(),
            error: gl::NO_ERROR,
            enabled: HashSet::new(),
            textures: HashSet::new(),
            buffers: HashMap::new(),
            buffer_bindings: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            current_program: None,
            locations: HashMap::new(),
            uniform_values: HashMap::new(),
            other_objects: HashSet::new(),
            parameters,
            strings,
            read_fill: 0,
        }
    }

    /// Builder: value returned for an integer query.
    pub fn with_parameter(mut self, pname: u32, value: i64) -> Self {
        self.parameters.insert(pname, value);
        self
    }

    /// Builder: value returned for a string query.
    pub fn with_string(mut self, pname: u32, value: impl Into<String>) -> Self {
        self.strings.insert(pname, value.into());
        self
    }

    /// Builder: byte written by `readPixels`.
    pub fn with_read_fill(mut self, fill: u8) -> Self {
        self.read_fill = fill;
        self
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<RecordedCall> {
        std::mem::take(&mut self.calls)
    }

    /// Most recent call named `name`.
    pub fn last_call(&self, name: &str) -> Option<&RecordedCall> {
        self.calls.iter().rev().find(|c| c.name == name)
    }

    /// How many calls named `name` were received.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.name == name).count()
    }

    /// Error code `get_error` would return, without clearing it.
    pub fn pending_error(&self) -> u32 {
        self.error
    }

    /// Whether a capability is currently enabled.
    pub fn is_enabled(&self, cap: u32) -> bool {
        self.enabled.contains(&cap)
    }

    /// Buffer bound to `target`.
    pub fn bound_buffer(&self, target: u32) -> Option<HostObject> {
        self.buffer_bindings.get(&target).copied().map(HostObject)
    }

    /// Contents of a buffer.
    pub fn buffer_contents(&self, buffer: HostObject) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(Vec::as_slice)
    }

    /// Source last given to a shader.
    pub fn source_of(&self, shader: HostObject) -> Option<&str> {
        self.shaders.get(&shader.0).map(|s| s.source.as_str())
    }

    /// Program currently in use.
    pub fn current_program(&self) -> Option<HostObject> {
        self.current_program.map(HostObject)
    }

    /// Last value uploaded to the uniform called `name`.
    pub fn uniform_value(&self, name: &str) -> Option<&UniformValue> {
        self.uniform_values.get(name)
    }

    /// Number of host objects currently alive.
    pub fn live_objects(&self) -> usize {
        self.textures.len()
            + self.buffers.len()
            + self.shaders.len()
            + self.programs.len()
            + self.other_objects.len()
    }

    fn alloc(&mut self) -> HostObject {
        let id = self.next_id;
        self.next_id += 1;
        HostObject(id)
    }

    fn record(&mut self, name: &str, args: &[f64], payload_len: usize) {
        self.calls.push(RecordedCall {
            name: name.to_string(),
            args: args.to_vec(),
            payload_len,
        });
    }

    /// First error wins until `get_error` clears it.
    fn fail(&mut self, code: u32) {
        if self.error == gl::NO_ERROR {
            self.error = code;
        }
    }

    fn bound(&mut self, target: u32) -> Option<&mut Vec<u8>> {
        let id = self
            .buffer_bindings
            .get(&target)
            .copied()
            .filter(|id| self.buffers.contains_key(id));
        match id {
            Some(id) => self.buffers.get_mut(&id),
            None => {
                self.fail(gl::INVALID_OPERATION);
                None
            }
        }
    }

    fn program_mut(&mut self, program: Option<&HostObject>) -> Option<&mut ProgramState> {
        let id = program.map(|p| p.0).filter(|id| self.programs.contains_key(id));
        match id {
            Some(id) => self.programs.get_mut(&id),
            None => {
                self.fail(gl::INVALID_VALUE);
                None
            }
        }
    }

    fn linked_program(&mut self, program: Option<&HostObject>) -> Option<&ProgramState> {
        let id = program.map(|p| p.0);
        match id.and_then(|id| self.programs.get(&id)).map(|state| state.linked) {
            Some(true) => id.and_then(|id| self.programs.get(&id)),
            Some(false) => {
                self.fail(gl::INVALID_OPERATION);
                None
            }
            None => {
                self.fail(gl::INVALID_VALUE);
                None
            }
        }
    }

    fn set_uniform(&mut self, location: Option<&HostObject>, value: UniformValue) {
        // A null location is silently ignored.
        let Some(location) = location else { return };
        if self.current_program.is_none() {
            self.fail(gl::INVALID_OPERATION);
            return;
        }
        match self.locations.get(&location.0) {
            Some(name) => {
                self.uniform_values.insert(name.clone(), value);
            }
            None => self.fail(gl::INVALID_OPERATION),
        }
    }

    fn link(&mut self, id: u32) {
        let Some(program) = self.programs.get(&id) else {
            self.fail(gl::INVALID_VALUE);
            return;
        };
        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        let mut blocks = Vec::new();
        let mut log = String::new();
        let mut stages = HashSet::new();
        for shader_id in &program.shaders {
            let Some(shader) = self.shaders.get(shader_id) else { continue };
            if !shader.compiled {
                log = format!("shader {shader_id} is not compiled");
                break;
            }
            stages.insert(shader.ty);
            let decls = parse_declarations(&shader.source);
            if shader.ty == gl::VERTEX_SHADER {
                attributes.extend(decls.inputs);
            }
            for uniform in decls.uniforms {
                if !uniforms.iter().any(|u: &ActiveInfo| u.name == uniform.name) {
                    uniforms.push(uniform);
                }
            }
            for block in decls.blocks {
                if !blocks.iter().any(|b: &UniformBlock| b.name == block.name) {
                    blocks.push(block);
                }
            }
        }
        if log.is_empty()
            && !(stages.contains(&gl::VERTEX_SHADER) && stages.contains(&gl::FRAGMENT_SHADER))
        {
            log = "program needs a vertex and a fragment shader".to_string();
        }

        if let Some(program) = self.programs.get_mut(&id) {
            program.linked = log.is_empty();
            if program.linked {
                program.attributes = attributes;
                program.uniforms = uniforms;
                program.blocks = blocks;
            }
            program.log = log;
        }
    }
}

fn id(obj: Option<&HostObject>) -> f64 {
    obj.map_or(0.0, |o| f64::from(o.0))
}

fn flag(b: bool) -> f64 {
    f64::from(u8::from(b))
}

struct Declarations {
    inputs: Vec<ActiveInfo>,
    uniforms: Vec<ActiveInfo>,
    blocks: Vec<UniformBlock>,
}

const QUALIFIERS: &[&str] = &[
    "highp", "mediump", "lowp", "flat", "smooth", "centroid", "invariant",
];

fn glsl_type(name: &str) -> u32 {
    match name {
        "float" => 0x1406,
        "int" => 0x1404,
        "uint" => 0x1405,
        "bool" => 0x8B56,
        "vec2" => 0x8B50,
        "vec3" => 0x8B51,
        "vec4" => 0x8B52,
        "ivec2" => 0x8B53,
        "ivec3" => 0x8B54,
        "ivec4" => 0x8B55,
        "uvec2" => 0x8DC6,
        "uvec3" => 0x8DC7,
        "uvec4" => 0x8DC8,
        "mat2" => 0x8B5A,
        "mat3" => 0x8B5B,
        "mat4" => 0x8B5C,
        "mat2x3" => 0x8B65,
        "mat2x4" => 0x8B66,
        "mat3x2" => 0x8B67,
        "mat3x4" => 0x8B68,
        "mat4x2" => 0x8B69,
        "mat4x3" => 0x8B6A,
        "sampler2D" => 0x8B5E,
        "sampler3D" => 0x8B5F,
        "samplerCube" => 0x8B60,
        "sampler2DArray" => 0x8DC1,
        _ => 0,
    }
}

/// `name` or `name[N]` → reported name and array size.
fn declared_name(word: &str) -> (String, i32) {
    match word.split_once('[') {
        Some((base, rest)) => {
            let size = rest.trim_end_matches(']').trim().parse().unwrap_or(1);
            (format!("{base}[0]"), size)
        }
        None => (word.to_string(), 1),
    }
}

/// Pull `in`, `uniform` and uniform-block declarations out of GLSL source.
fn parse_declarations(source: &str) -> Declarations {
    let mut decls = Declarations {
        inputs: Vec::new(),
        uniforms: Vec::new(),
        blocks: Vec::new(),
    };
    let stripped: String = source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let mut in_block = false;
    for statement in stripped.split(';') {
        let mut text = statement.trim();
        if in_block {
            if let Some(pos) = text.find('}') {
                in_block = false;
                text = text[pos + 1..].trim();
            } else {
                if let Some(block) = decls.blocks.last_mut() {
                    block.members += 1;
                }
                continue;
            }
        }
        if let Some(pos) = text.rfind(')').filter(|_| text.starts_with("layout")) {
            text = text[pos + 1..].trim();
        }
        if let Some((head, member)) = text.split_once('{') {
            let words: Vec<&str> = head.split_whitespace().collect();
            if words.first() == Some(&"uniform") {
                if let Some(name) = words.last() {
                    decls.blocks.push(UniformBlock {
                        name: name.to_string(),
                        members: usize::from(!member.trim().is_empty()),
                        binding: 0,
                    });
                }
                in_block = true;
            }
            continue;
        }
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| !QUALIFIERS.contains(w))
            .collect();
        let (storage, ty, name) = match words.as_slice() {
            [storage, ty, name] => (*storage, *ty, *name),
            _ => continue,
        };
        let (name, size) = declared_name(name);
        let info = ActiveInfo {
            name,
            size,
            ty: glsl_type(ty),
        };
        match storage {
            "in" | "attribute" => decls.inputs.push(info),
            "uniform" => decls.uniforms.push(info),
            _ => {}
        }
    }
    decls
}

fn base_name(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

impl GlContext for RecordingContext {
    type Texture = HostObject;
    type Buffer = HostObject;
    type Shader = HostObject;
    type Program = HostObject;
    type Framebuffer = HostObject;
    type Renderbuffer = HostObject;
    type VertexArray = HostObject;
    type Sampler = HostObject;
    type UniformLocation = HostObject;

    fn cull_face(&mut self, mode: u32) {
        self.record("cullFace", &[mode.into()], 0);
    }

    fn clear(&mut self, mask: u32) {
        self.record("clear", &[mask.into()], 0);
    }

    fn depth_mask(&mut self, flag_value: bool) {
        self.record("depthMask", &[flag(flag_value)], 0);
    }

    fn enable(&mut self, cap: u32) {
        self.record("enable", &[cap.into()], 0);
        self.enabled.insert(cap);
    }

    fn disable(&mut self, cap: u32) {
        self.record("disable", &[cap.into()], 0);
        self.enabled.remove(&cap);
    }

    fn flush(&mut self) {
        self.record("flush", &[], 0);
    }

    fn depth_func(&mut self, func: u32) {
        self.record("depthFunc", &[func.into()], 0);
    }

    fn read_buffer(&mut self, src: u32) {
        self.record("readBuffer", &[src.into()], 0);
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.record("viewport", &[x.into(), y.into(), width.into(), height.into()], 0);
        if width < 0 || height < 0 {
            self.fail(gl::INVALID_VALUE);
        }
    }

    fn active_texture(&mut self, texture: u32) {
        self.record("activeTexture", &[texture.into()], 0);
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.record(
            "blendFuncSeparate",
            &[src_rgb.into(), dst_rgb.into(), src_alpha.into(), dst_alpha.into()],
            0,
        );
    }

    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.record("blendEquationSeparate", &[mode_rgb.into(), mode_alpha.into()], 0);
    }

    fn draw_buffers(&mut self, buffers: &[u32]) {
        let args: Vec<f64> = buffers.iter().map(|&b| b.into()).collect();
        self.record("drawBuffers", &args, buffers.len() * 4);
    }

    fn stencil_op_separate(&mut self, face: u32, sfail: u32, dpfail: u32, dppass: u32) {
        self.record(
            "stencilOpSeparate",
            &[face.into(), sfail.into(), dpfail.into(), dppass.into()],
            0,
        );
    }

    fn stencil_func_separate(&mut self, face: u32, func: u32, reference: i32, mask: u32) {
        self.record(
            "stencilFuncSeparate",
            &[face.into(), func.into(), reference.into(), mask.into()],
            0,
        );
    }

    fn stencil_mask_separate(&mut self, face: u32, mask: u32) {
        self.record("stencilMaskSeparate", &[face.into(), mask.into()], 0);
    }

    fn pixel_store_i32(&mut self, pname: u32, param: i32) {
        self.record("pixelStorei", &[pname.into(), param.into()], 0);
    }

    fn clear_buffer_iv(&mut self, buffer: u32, draw_buffer: i32, values: &[i32]) {
        let mut args = vec![buffer.into(), draw_buffer.into()];
        args.extend(values.iter().map(|&v| f64::from(v)));
        self.record("clearBufferiv", &args, values.len() * 4);
    }

    fn clear_buffer_uiv(&mut self, buffer: u32, draw_buffer: i32, values: &[u32]) {
        let mut args = vec![buffer.into(), draw_buffer.into()];
        args.extend(values.iter().map(|&v| f64::from(v)));
        self.record("clearBufferuiv", &args, values.len() * 4);
    }

    fn clear_buffer_fv(&mut self, buffer: u32, draw_buffer: i32, values: &[f32]) {
        let mut args = vec![buffer.into(), draw_buffer.into()];
        args.extend(values.iter().map(|&v| f64::from(v)));
        self.record("clearBufferfv", &args, values.len() * 4);
    }

    fn clear_buffer_fi(&mut self, buffer: u32, draw_buffer: i32, depth: f32, stencil: i32) {
        self.record(
            "clearBufferfi",
            &[buffer.into(), draw_buffer.into(), depth.into(), stencil.into()],
            0,
        );
    }

    fn get_error(&mut self) -> u32 {
        self.record("getError", &[], 0);
        std::mem::replace(&mut self.error, gl::NO_ERROR)
    }

    fn get_parameter_i64(&mut self, pname: u32) -> i64 {
        self.record("getParameter", &[pname.into()], 0);
        match self.parameters.get(&pname) {
            Some(&value) => value,
            None => {
                self.fail(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_parameter_string(&mut self, pname: u32) -> Option<String> {
        self.record("getParameter", &[pname.into()], 0);
        let value = self.strings.get(&pname).cloned();
        if value.is_none() {
            self.fail(gl::INVALID_ENUM);
        }
        value
    }

    // ---- textures -------------------------------------------------------

    fn create_texture(&mut self) -> HostObject {
        let tex = self.alloc();
        self.record("createTexture", &[tex.0.into()], 0);
        self.textures.insert(tex.0);
        tex
    }

    fn delete_texture(&mut self, texture: HostObject) {
        self.record("deleteTexture", &[texture.0.into()], 0);
        self.textures.remove(&texture.0);
    }

    fn bind_texture(&mut self, target: u32, texture: Option<&HostObject>) {
        self.record("bindTexture", &[target.into(), id(texture)], 0);
        if texture.is_some_and(|t| !self.textures.contains(&t.0)) {
            self.fail(gl::INVALID_OPERATION);
        }
    }

    fn tex_parameter_i32(&mut self, target: u32, pname: u32, param: i32) {
        self.record("texParameteri", &[target.into(), pname.into(), param.into()], 0);
    }

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
    ) {
        self.record(
            "texImage2D",
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                border.into(),
                format.into(),
                ty.into(),
            ],
            pixels.map_or(0, |p| p.byte_len()),
        );
        if width < 0 || height < 0 {
            self.fail(gl::INVALID_VALUE);
        }
    }

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
    ) {
        self.record(
            "texSubImage2D",
            &[
                target.into(),
                level.into(),
                x_offset.into(),
                y_offset.into(),
                width.into(),
                height.into(),
                format.into(),
                ty.into(),
            ],
            pixels.byte_len(),
        );
    }

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
    ) {
        self.record(
            "texImage3D",
            &[
                target.into(),
                level.into(),
                internal_format.into(),
                width.into(),
                height.into(),
                depth.into(),
                border.into(),
                format.into(),
                ty.into(),
            ],
            pixels.map_or(0, |p| p.byte_len()),
        );
    }

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
    ) {
        self.record(
            "texSubImage3D",
            &[
                target.into(),
                level.into(),
                x_offset.into(),
                y_offset.into(),
                z_offset.into(),
                width.into(),
                height.into(),
                depth.into(),
                format.into(),
                ty.into(),
            ],
            pixels.byte_len(),
        );
    }

    fn generate_mipmap(&mut self, target: u32) {
        self.record("generateMipmap", &[target.into()], 0);
    }

    fn read_pixels(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        mut dst: TypedViewMut<'_>,
    ) {
        let len = dst.byte_len();
        dst.as_bytes_mut().fill(self.read_fill);
        self.record(
            "readPixels",
            &[x.into(), y.into(), width.into(), height.into(), format.into(), ty.into()],
            len,
        );
    }

    // ---- buffers --------------------------------------------------------

    fn create_buffer(&mut self) -> HostObject {
        let buf = self.alloc();
        self.record("createBuffer", &[buf.0.into()], 0);
        self.buffers.insert(buf.0, Vec::new());
        buf
    }

    fn delete_buffer(&mut self, buffer: HostObject) {
        self.record("deleteBuffer", &[buffer.0.into()], 0);
        self.buffers.remove(&buffer.0);
        self.buffer_bindings.retain(|_, bound| *bound != buffer.0);
    }

    fn bind_buffer(&mut self, target: u32, buffer: Option<&HostObject>) {
        self.record("bindBuffer", &[target.into(), id(buffer)], 0);
        match buffer {
            Some(b) if self.buffers.contains_key(&b.0) => {
                self.buffer_bindings.insert(target, b.0);
            }
            Some(_) => self.fail(gl::INVALID_OPERATION),
            None => {
                self.buffer_bindings.remove(&target);
            }
        }
    }

    fn bind_buffer_base(&mut self, target: u32, index: u32, buffer: Option<&HostObject>) {
        self.record("bindBufferBase", &[target.into(), index.into(), id(buffer)], 0);
        if let Some(b) = buffer {
            self.buffer_bindings.insert(target, b.0);
        }
    }

    fn bind_buffer_range(
        &mut self,
        target: u32,
        index: u32,
        buffer: Option<&HostObject>,
        offset: i64,
        size: i64,
    ) {
        self.record(
            "bindBufferRange",
            &[target.into(), index.into(), id(buffer), offset as f64, size as f64],
            0,
        );
        if let Some(b) = buffer {
            self.buffer_bindings.insert(target, b.0);
        }
    }

    fn buffer_data_size(&mut self, target: u32, size: i64, usage: u32) {
        self.record("bufferData", &[target.into(), size as f64, usage.into()], 0);
        let Ok(size) = usize::try_from(size) else {
            self.fail(gl::INVALID_VALUE);
            return;
        };
        if let Some(buf) = self.bound(target) {
            *buf = vec![0; size];
        }
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.record(
            "bufferData",
            &[target.into(), data.len() as f64, usage.into()],
            data.len(),
        );
        if let Some(buf) = self.bound(target) {
            *buf = data.to_vec();
        }
    }

    fn buffer_sub_data(&mut self, target: u32, offset: i64, data: &[u8]) {
        self.record("bufferSubData", &[target.into(), offset as f64], data.len());
        let Some(buf) = self.bound(target) else { return };
        let range = usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(data.len())?))
            .filter(|r| r.end <= buf.len());
        match range {
            Some(range) => buf[range].copy_from_slice(data),
            None => self.fail(gl::INVALID_VALUE),
        }
    }

    fn get_buffer_sub_data(&mut self, target: u32, offset: i64, dst: &mut [u8]) {
        self.record("getBufferSubData", &[target.into(), offset as f64], dst.len());
        let Some(buf) = self.bound(target) else { return };
        let range = usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(dst.len())?))
            .filter(|r| r.end <= buf.len());
        match range {
            Some(range) => dst.copy_from_slice(&buf[range]),
            None => self.fail(gl::INVALID_VALUE),
        }
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: u32,
        write_target: u32,
        read_offset: i64,
        write_offset: i64,
        size: i64,
    ) {
        self.record(
            "copyBufferSubData",
            &[
                read_target.into(),
                write_target.into(),
                read_offset as f64,
                write_offset as f64,
                size as f64,
            ],
            0,
        );
        let (Some(&src), Some(&dst)) = (
            self.buffer_bindings.get(&read_target),
            self.buffer_bindings.get(&write_target),
        ) else {
            self.fail(gl::INVALID_OPERATION);
            return;
        };
        let (Ok(read_offset), Ok(write_offset), Ok(size)) = (
            usize::try_from(read_offset),
            usize::try_from(write_offset),
            usize::try_from(size),
        ) else {
            self.fail(gl::INVALID_VALUE);
            return;
        };
        let chunk = self
            .buffers
            .get(&src)
            .and_then(|b| b.get(read_offset..read_offset.checked_add(size)?))
            .map(<[u8]>::to_vec);
        let target = self
            .buffers
            .get_mut(&dst)
            .and_then(|b| b.get_mut(write_offset..write_offset.checked_add(size)?));
        match (chunk, target) {
            (Some(chunk), Some(target)) => target.copy_from_slice(&chunk),
            _ => self.fail(gl::INVALID_VALUE),
        }
    }

    // ---- shaders & programs ---------------------------------------------

    fn create_shader(&mut self, ty: u32) -> HostObject {
        let shader = self.alloc();
        self.record("createShader", &[ty.into(), shader.0.into()], 0);
        if ty != gl::VERTEX_SHADER && ty != gl::FRAGMENT_SHADER {
            self.fail(gl::INVALID_ENUM);
        }
        self.shaders.insert(
            shader.0,
            ShaderState {
                ty,
                ..Default::default()
            },
        );
        shader
    }

    fn delete_shader(&mut self, shader: HostObject) {
        self.record("deleteShader", &[shader.0.into()], 0);
        self.shaders.remove(&shader.0);
    }

    fn shader_source(&mut self, shader: Option<&HostObject>, source: &str) {
        self.record("shaderSource", &[id(shader)], source.len());
        match shader.and_then(|s| self.shaders.get_mut(&s.0)) {
            Some(state) => state.source = source.to_string(),
            None => self.fail(gl::INVALID_VALUE),
        }
    }

    fn compile_shader(&mut self, shader: Option<&HostObject>) {
        self.record("compileShader", &[id(shader)], 0);
        let Some(state) = shader.and_then(|s| self.shaders.get_mut(&s.0)) else {
            self.fail(gl::INVALID_VALUE);
            return;
        };
        state.compiled = state.source.contains("main");
        state.log = if state.compiled {
            String::new()
        } else {
            "ERROR: 0:1: 'main' : missing entry point".to_string()
        };
    }

    fn get_shader_parameter(&mut self, shader: Option<&HostObject>, pname: u32) -> i32 {
        self.record("getShaderParameter", &[id(shader), pname.into()], 0);
        let Some(state) = shader.and_then(|s| self.shaders.get(&s.0)) else {
            self.fail(gl::INVALID_VALUE);
            return 0;
        };
        match pname {
            gl::SHADER_TYPE => state.ty as i32,
            gl::COMPILE_STATUS => i32::from(state.compiled),
            gl::DELETE_STATUS => 0,
            _ => {
                self.fail(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_shader_info_log(&mut self, shader: Option<&HostObject>) -> String {
        self.record("getShaderInfoLog", &[id(shader)], 0);
        match shader.and_then(|s| self.shaders.get(&s.0)) {
            Some(state) => state.log.clone(),
            None => {
                self.fail(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    fn create_program(&mut self) -> HostObject {
        let program = self.alloc();
        self.record("createProgram", &[program.0.into()], 0);
        self.programs.insert(program.0, ProgramState::default());
        program
    }

    fn delete_program(&mut self, program: HostObject) {
        self.record("deleteProgram", &[program.0.into()], 0);
        self.programs.remove(&program.0);
        if self.current_program == Some(program.0) {
            self.current_program = None;
        }
    }

    fn attach_shader(&mut self, program: Option<&HostObject>, shader: Option<&HostObject>) {
        self.record("attachShader", &[id(program), id(shader)], 0);
        let Some(shader) = shader.filter(|s| self.shaders.contains_key(&s.0)) else {
            self.fail(gl::INVALID_VALUE);
            return;
        };
        let shader_id = shader.0;
        let Some(state) = self.program_mut(program) else { return };
        if state.shaders.contains(&shader_id) {
            self.fail(gl::INVALID_OPERATION);
        } else {
            state.shaders.push(shader_id);
        }
    }

    fn detach_shader(&mut self, program: Option<&HostObject>, shader: Option<&HostObject>) {
        self.record("detachShader", &[id(program), id(shader)], 0);
        let shader_id = shader.map(|s| s.0);
        let Some(state) = self.program_mut(program) else { return };
        let before = state.shaders.len();
        state.shaders.retain(|s| Some(*s) != shader_id);
        if state.shaders.len() == before {
            self.fail(gl::INVALID_OPERATION);
        }
    }

    fn link_program(&mut self, program: Option<&HostObject>) {
        self.record("linkProgram", &[id(program)], 0);
        match program {
            Some(p) => self.link(p.0),
            None => self.fail(gl::INVALID_VALUE),
        }
    }

    fn use_program(&mut self, program: Option<&HostObject>) {
        self.record("useProgram", &[id(program)], 0);
        match program {
            None => self.current_program = None,
            Some(p) => match self.programs.get(&p.0) {
                Some(state) if state.linked => self.current_program = Some(p.0),
                Some(_) => self.fail(gl::INVALID_OPERATION),
                None => self.fail(gl::INVALID_VALUE),
            },
        }
    }

    fn get_program_parameter(&mut self, program: Option<&HostObject>, pname: u32) -> i32 {
        self.record("getProgramParameter", &[id(program), pname.into()], 0);
        let Some(state) = program.and_then(|p| self.programs.get(&p.0)) else {
            self.fail(gl::INVALID_VALUE);
            return 0;
        };
        match pname {
            gl::LINK_STATUS => i32::from(state.linked),
            gl::DELETE_STATUS => 0,
            gl::ATTACHED_SHADERS => state.shaders.len() as i32,
            gl::ACTIVE_ATTRIBUTES => state.attributes.len() as i32,
            gl::ACTIVE_UNIFORMS => state.uniforms.len() as i32,
            gl::ACTIVE_UNIFORM_BLOCKS => state.blocks.len() as i32,
            _ => {
                self.fail(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_program_info_log(&mut self, program: Option<&HostObject>) -> String {
        self.record("getProgramInfoLog", &[id(program)], 0);
        match program.and_then(|p| self.programs.get(&p.0)) {
            Some(state) => state.log.clone(),
            None => {
                self.fail(gl::INVALID_VALUE);
                String::new()
            }
        }
    }

    fn get_active_attrib(
        &mut self,
        program: Option<&HostObject>,
        index: u32,
    ) -> Option<ActiveInfo> {
        self.record("getActiveAttrib", &[id(program), index.into()], 0);
        let found = self
            .linked_program(program)?
            .attributes
            .get(index as usize)
            .cloned();
        if found.is_none() {
            self.fail(gl::INVALID_VALUE);
        }
        found
    }

    fn get_active_uniform(
        &mut self,
        program: Option<&HostObject>,
        index: u32,
    ) -> Option<ActiveInfo> {
        self.record("getActiveUniform", &[id(program), index.into()], 0);
        let found = self
            .linked_program(program)?
            .uniforms
            .get(index as usize)
            .cloned();
        if found.is_none() {
            self.fail(gl::INVALID_VALUE);
        }
        found
    }

    fn get_attrib_location(&mut self, program: Option<&HostObject>, name: &str) -> i32 {
        self.record("getAttribLocation", &[id(program)], name.len());
        let Some(state) = self.linked_program(program) else { return -1 };
        state
            .attributes
            .iter()
            .position(|a| base_name(&a.name) == base_name(name))
            .map_or(-1, |i| i as i32)
    }

    fn get_uniform_location(
        &mut self,
        program: Option<&HostObject>,
        name: &str,
    ) -> Option<HostObject> {
        self.record("getUniformLocation", &[id(program)], name.len());
        let wanted = base_name(name).to_string();
        let known = self
            .linked_program(program)?
            .uniforms
            .iter()
            .any(|u| base_name(&u.name) == wanted);
        if !known {
            return None;
        }
        let location = self.alloc();
        self.locations.insert(location.0, wanted);
        self.other_objects.insert(location.0);
        Some(location)
    }

    fn get_uniform_block_index(&mut self, program: Option<&HostObject>, name: &str) -> u32 {
        self.record("getUniformBlockIndex", &[id(program)], name.len());
        let Some(state) = self.linked_program(program) else { return gl::INVALID_INDEX };
        state
            .blocks
            .iter()
            .position(|b| b.name == name)
            .map_or(gl::INVALID_INDEX, |i| i as u32)
    }

    fn get_active_uniform_block_parameter(
        &mut self,
        program: Option<&HostObject>,
        block_index: u32,
        pname: u32,
    ) -> i32 {
        self.record(
            "getActiveUniformBlockParameter",
            &[id(program), block_index.into(), pname.into()],
            0,
        );
        let block = self
            .linked_program(program)
            .and_then(|state| state.blocks.get(block_index as usize))
            .cloned();
        let Some(block) = block else {
            self.fail(gl::INVALID_VALUE);
            return 0;
        };
        match pname {
            gl::UNIFORM_BLOCK_BINDING => block.binding as i32,
            // std140 with one vec4 slot per member.
            gl::UNIFORM_BLOCK_DATA_SIZE => (block.members * 16) as i32,
            _ => {
                self.fail(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_active_uniform_block_name(
        &mut self,
        program: Option<&HostObject>,
        block_index: u32,
    ) -> Option<String> {
        self.record("getActiveUniformBlockName", &[id(program), block_index.into()], 0);
        let name = self
            .linked_program(program)?
            .blocks
            .get(block_index as usize)
            .map(|b| b.name.clone());
        if name.is_none() {
            self.fail(gl::INVALID_VALUE);
        }
        name
    }

    fn uniform_block_binding(
        &mut self,
        program: Option<&HostObject>,
        block_index: u32,
        binding: u32,
    ) {
        self.record(
            "uniformBlockBinding",
            &[id(program), block_index.into(), binding.into()],
            0,
        );
        let Some(state) = self.program_mut(program) else { return };
        match state.blocks.get_mut(block_index as usize) {
            Some(block) => block.binding = binding,
            None => self.fail(gl::INVALID_VALUE),
        }
    }

    // ---- uniforms -------------------------------------------------------

    fn uniform_1_i32(&mut self, location: Option<&HostObject>, v0: i32) {
        self.record("uniform1i", &[id(location), v0.into()], 0);
        self.set_uniform(location, UniformValue::Int(vec![v0]));
    }

    fn uniform_fv(&mut self, location: Option<&HostObject>, components: usize, data: &[f32]) {
        self.record(&format!("uniform{components}fv"), &[id(location)], data.len() * 4);
        self.set_uniform(location, UniformValue::Float(data.to_vec()));
    }

    fn uniform_iv(&mut self, location: Option<&HostObject>, components: usize, data: &[i32]) {
        self.record(&format!("uniform{components}iv"), &[id(location)], data.len() * 4);
        self.set_uniform(location, UniformValue::Int(data.to_vec()));
    }

    fn uniform_uiv(&mut self, location: Option<&HostObject>, components: usize, data: &[u32]) {
        self.record(&format!("uniform{components}uiv"), &[id(location)], data.len() * 4);
        self.set_uniform(location, UniformValue::Uint(data.to_vec()));
    }

    fn uniform_matrix_fv(
        &mut self,
        location: Option<&HostObject>,
        shape: MatrixShape,
        transpose: bool,
        data: &[f32],
    ) {
        self.record(
            &format!("uniformMatrix{}fv", shape.suffix()),
            &[id(location), flag(transpose)],
            data.len() * 4,
        );
        self.set_uniform(location, UniformValue::Float(data.to_vec()));
    }

    // ---- vertex input & draws -------------------------------------------

    fn create_vertex_array(&mut self) -> HostObject {
        let vao = self.alloc();
        self.record("createVertexArray", &[vao.0.into()], 0);
        self.other_objects.insert(vao.0);
        vao
    }

    fn delete_vertex_array(&mut self, vertex_array: HostObject) {
        self.record("deleteVertexArray", &[vertex_array.0.into()], 0);
        self.other_objects.remove(&vertex_array.0);
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<&HostObject>) {
        self.record("bindVertexArray", &[id(vertex_array)], 0);
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.record("enableVertexAttribArray", &[index.into()], 0);
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i64,
    ) {
        self.record(
            "vertexAttribPointer",
            &[
                index.into(),
                size.into(),
                ty.into(),
                flag(normalized),
                stride.into(),
                offset as f64,
            ],
            0,
        );
    }

    fn vertex_attrib_i_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        stride: i32,
        offset: i64,
    ) {
        self.record(
            "vertexAttribIPointer",
            &[index.into(), size.into(), ty.into(), stride.into(), offset as f64],
            0,
        );
    }

    fn vertex_attrib_divisor(&mut self, index: u32, divisor: u32) {
        self.record("vertexAttribDivisor", &[index.into(), divisor.into()], 0);
    }

    fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instance_count: i32) {
        self.record(
            "drawArraysInstanced",
            &[mode.into(), first.into(), count.into(), instance_count.into()],
            0,
        );
    }

    fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        ty: u32,
        offset: i64,
        instance_count: i32,
    ) {
        self.record(
            "drawElementsInstanced",
            &[mode.into(), count.into(), ty.into(), offset as f64, instance_count.into()],
            0,
        );
    }

    // ---- framebuffers & renderbuffers -----------------------------------

    fn create_framebuffer(&mut self) -> HostObject {
        let fb = self.alloc();
        self.record("createFramebuffer", &[fb.0.into()], 0);
        self.other_objects.insert(fb.0);
        fb
    }

    fn delete_framebuffer(&mut self, framebuffer: HostObject) {
        self.record("deleteFramebuffer", &[framebuffer.0.into()], 0);
        self.other_objects.remove(&framebuffer.0);
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<&HostObject>) {
        self.record("bindFramebuffer", &[target.into(), id(framebuffer)], 0);
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: u32,
        attachment: u32,
        tex_target: u32,
        texture: Option<&HostObject>,
        level: i32,
    ) {
        self.record(
            "framebufferTexture2D",
            &[target.into(), attachment.into(), tex_target.into(), id(texture), level.into()],
            0,
        );
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: u32,
        attachment: u32,
        renderbuffer_target: u32,
        renderbuffer: Option<&HostObject>,
    ) {
        self.record(
            "framebufferRenderbuffer",
            &[target.into(), attachment.into(), renderbuffer_target.into(), id(renderbuffer)],
            0,
        );
    }

    fn framebuffer_texture_layer(
        &mut self,
        target: u32,
        attachment: u32,
        texture: Option<&HostObject>,
        level: i32,
        layer: i32,
    ) {
        self.record(
            "framebufferTextureLayer",
            &[target.into(), attachment.into(), id(texture), level.into(), layer.into()],
            0,
        );
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        let mut args: Vec<f64> = src.iter().chain(dst.iter()).map(|&v| v.into()).collect();
        args.push(mask.into());
        args.push(filter.into());
        self.record("blitFramebuffer", &args, 0);
    }

    fn create_renderbuffer(&mut self) -> HostObject {
        let rb = self.alloc();
        self.record("createRenderbuffer", &[rb.0.into()], 0);
        self.other_objects.insert(rb.0);
        rb
    }

    fn delete_renderbuffer(&mut self, renderbuffer: HostObject) {
        self.record("deleteRenderbuffer", &[renderbuffer.0.into()], 0);
        self.other_objects.remove(&renderbuffer.0);
    }

    fn bind_renderbuffer(&mut self, target: u32, renderbuffer: Option<&HostObject>) {
        self.record("bindRenderbuffer", &[target.into(), id(renderbuffer)], 0);
    }

    fn renderbuffer_storage_multisample(
        &mut self,
        target: u32,
        samples: i32,
        internal_format: u32,
        width: i32,
        height: i32,
    ) {
        self.record(
            "renderbufferStorageMultisample",
            &[target.into(), samples.into(), internal_format.into(), width.into(), height.into()],
            0,
        );
    }

    // ---- samplers -------------------------------------------------------

    fn create_sampler(&mut self) -> HostObject {
        let sampler = self.alloc();
        self.record("createSampler", &[sampler.0.into()], 0);
        self.other_objects.insert(sampler.0);
        sampler
    }

    fn delete_sampler(&mut self, sampler: HostObject) {
        self.record("deleteSampler", &[sampler.0.into()], 0);
        self.other_objects.remove(&sampler.0);
    }

    fn bind_sampler(&mut self, unit: u32, sampler: Option<&HostObject>) {
        self.record("bindSampler", &[unit.into(), id(sampler)], 0);
    }

    fn sampler_parameter_i32(&mut self, sampler: Option<&HostObject>, pname: u32, param: i32) {
        self.record("samplerParameteri", &[id(sampler), pname.into(), param.into()], 0);
        if sampler.is_none() {
            self.fail(gl::INVALID_VALUE);
        }
    }

    fn sampler_parameter_f32(&mut self, sampler: Option<&HostObject>, pname: u32, param: f32) {
        self.record("samplerParameterf", &[id(sampler), pname.into(), param.into()], 0);
        if sampler.is_none() {
            self.fail(gl::INVALID_VALUE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = "#version 300 es
layout(location = 0) in vec3 position;
in highp vec2 uv;
uniform mat4 mvp;
uniform Globals {
    vec4 tint;
    float time;
};
void main() { gl_Position = mvp * vec4(position, 1.0); }
";

    const FRAGMENT: &str = "#version 300 es
precision mediump float;
uniform sampler2D albedo;
uniform float weights[4];
out vec4 color;
void main() { color = vec4(1.0); }
";

    fn linked(ctx: &mut RecordingContext) -> HostObject {
        let vs = ctx.create_shader(gl::VERTEX_SHADER);
        ctx.shader_source(Some(&vs), VERTEX);
        ctx.compile_shader(Some(&vs));
        let fs = ctx.create_shader(gl::FRAGMENT_SHADER);
        ctx.shader_source(Some(&fs), FRAGMENT);
        ctx.compile_shader(Some(&fs));
        let program = ctx.create_program();
        ctx.attach_shader(Some(&program), Some(&vs));
        ctx.attach_shader(Some(&program), Some(&fs));
        ctx.link_program(Some(&program));
        program
    }

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations(VERTEX);
        let inputs: Vec<_> = decls.inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(inputs, ["position", "uv"]);
        assert_eq!(decls.inputs[0].ty, 0x8B51);
        assert_eq!(decls.uniforms.len(), 1);
        assert_eq!(decls.uniforms[0].name, "mvp");
        assert_eq!(decls.blocks.len(), 1);
        assert_eq!(decls.blocks[0].name, "Globals");
        assert_eq!(decls.blocks[0].members, 2);
    }

    #[test]
    fn test_array_uniform_name() {
        let decls = parse_declarations(FRAGMENT);
        let weights = decls.uniforms.iter().find(|u| u.size == 4).unwrap();
        assert_eq!(weights.name, "weights[0]");
        assert_eq!(weights.ty, 0x1406);
    }

    #[test]
    fn test_link_and_introspect() {
        let mut ctx = RecordingContext::new();
        let program = linked(&mut ctx);
        assert_eq!(ctx.get_program_parameter(Some(&program), gl::LINK_STATUS), 1);
        assert_eq!(ctx.get_program_parameter(Some(&program), gl::ACTIVE_ATTRIBUTES), 2);
        assert_eq!(ctx.get_program_parameter(Some(&program), gl::ACTIVE_UNIFORMS), 3);
        assert_eq!(ctx.get_attrib_location(Some(&program), "uv"), 1);
        assert!(ctx.get_uniform_location(Some(&program), "weights").is_some());
        assert!(ctx.get_uniform_location(Some(&program), "missing").is_none());
        assert_eq!(ctx.get_uniform_block_index(Some(&program), "Globals"), 0);
        assert_eq!(ctx.pending_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_compile_failure_blocks_link() {
        let mut ctx = RecordingContext::new();
        let vs = ctx.create_shader(gl::VERTEX_SHADER);
        ctx.shader_source(Some(&vs), "garbage");
        ctx.compile_shader(Some(&vs));
        assert_eq!(ctx.get_shader_parameter(Some(&vs), gl::COMPILE_STATUS), 0);
        assert!(!ctx.get_shader_info_log(Some(&vs)).is_empty());

        let program = ctx.create_program();
        ctx.attach_shader(Some(&program), Some(&vs));
        ctx.link_program(Some(&program));
        assert_eq!(ctx.get_program_parameter(Some(&program), gl::LINK_STATUS), 0);
    }

    #[test]
    fn test_sticky_error() {
        let mut ctx = RecordingContext::new();
        ctx.compile_shader(None);
        ctx.get_parameter_i64(0xDEAD);
        assert_eq!(ctx.get_error(), gl::INVALID_VALUE);
        assert_eq!(ctx.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_buffer_contents() {
        let mut ctx = RecordingContext::new();
        let buf = ctx.create_buffer();
        ctx.bind_buffer(gl::ARRAY_BUFFER, Some(&buf));
        ctx.buffer_data_size(gl::ARRAY_BUFFER, 8, gl::STATIC_DRAW);
        ctx.buffer_sub_data(gl::ARRAY_BUFFER, 4, &[1, 2, 3, 4]);
        assert_eq!(ctx.buffer_contents(buf), Some(&[0, 0, 0, 0, 1, 2, 3, 4][..]));

        ctx.buffer_sub_data(gl::ARRAY_BUFFER, 6, &[9, 9, 9, 9]);
        assert_eq!(ctx.get_error(), gl::INVALID_VALUE);
    }

    #[test]
    fn test_unbound_upload_is_invalid_operation() {
        let mut ctx = RecordingContext::new();
        ctx.buffer_data(gl::ARRAY_BUFFER, &[1, 2], gl::STATIC_DRAW);
        assert_eq!(ctx.get_error(), gl::INVALID_OPERATION);
    }
}
