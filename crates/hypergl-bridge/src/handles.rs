//! Guest handle table.
//!
//! Guests only ever see small integers. Every host object the bridge creates
//! (textures, buffers, programs, shaders, framebuffers, renderbuffers, vertex
//! arrays, samplers and uniform locations) shares one id space, assigned by a
//! single monotonic counter starting at 1. Ids are never recycled, so a stale
//! handle can never alias a newer object. Handle `0` is the "no object"
//! sentinel and is never allocated.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::GlContext;
use crate::error::{BridgeError, Result};

/// Opaque guest-visible object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// The "no object" / default-object sentinel.
    pub const NONE: Handle = Handle(0);

    /// Wrap a raw guest id.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id as seen by the guest.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the sentinel.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id → object map.
#[derive(Debug)]
pub struct HandleTable<T> {
    entries: HashMap<u32, T>,
    next: u32,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    /// Empty table; the first allocation returns handle 1.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next: 1,
        }
    }

    /// Register `object` under a fresh handle.
    pub fn allocate(&mut self, object: T) -> Result<Handle> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(BridgeError::HandlesExhausted)?;
        self.entries.insert(id, object);
        Ok(Handle(id))
    }

    /// Object registered under `handle`; `None` for the sentinel and for
    /// unknown or released handles.
    pub fn resolve(&self, handle: Handle) -> Option<&T> {
        if handle.is_none() {
            return None;
        }
        self.entries.get(&handle.0)
    }

    /// Remove the mapping, handing the object back.
    pub fn release(&mut self, handle: Handle) -> Option<T> {
        self.entries.remove(&handle.0)
    }

    /// Whether `handle` is live.
    pub fn contains(&self, handle: Handle) -> bool {
        !handle.is_none() && self.entries.contains_key(&handle.0)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handle is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next allocation will return.
    pub fn next_handle(&self) -> Handle {
        Handle(self.next)
    }

    /// Iterate over live handles and their objects, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.entries.iter().map(|(&id, obj)| (Handle(id), obj))
    }
}

/// Kind of host object a handle was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Texture object
    Texture,
    /// Buffer object
    Buffer,
    /// Shader object
    Shader,
    /// Program object
    Program,
    /// Framebuffer object
    Framebuffer,
    /// Renderbuffer object
    Renderbuffer,
    /// Vertex array object
    VertexArray,
    /// Sampler object
    Sampler,
    /// Uniform location reference
    UniformLocation,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Buffer => "buffer",
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Framebuffer => "framebuffer",
            Self::Renderbuffer => "renderbuffer",
            Self::VertexArray => "vertex array",
            Self::Sampler => "sampler",
            Self::UniformLocation => "uniform location",
        };
        f.write_str(name)
    }
}

/// A host object tagged with its kind.
pub enum ObjectRef<C: GlContext> {
    /// Texture
    Texture(C::Texture),
    /// Buffer
    Buffer(C::Buffer),
    /// Shader
    Shader(C::Shader),
    /// Program
    Program(C::Program),
    /// Framebuffer
    Framebuffer(C::Framebuffer),
    /// Renderbuffer
    Renderbuffer(C::Renderbuffer),
    /// Vertex array
    VertexArray(C::VertexArray),
    /// Sampler
    Sampler(C::Sampler),
    /// Uniform location
    UniformLocation(C::UniformLocation),
}

macro_rules! object_accessors {
    ($($variant:ident => $as_ref:ident, $into:ident, $ty:ident;)*) => {
        impl<C: GlContext> ObjectRef<C> {
            /// Kind of the wrapped object.
            pub fn kind(&self) -> ObjectKind {
                match self {
                    $(Self::$variant(_) => ObjectKind::$variant,)*
                }
            }

            $(
                #[doc = concat!("Borrow the object if it is a `", stringify!($variant), "`.")]
                pub fn $as_ref(&self) -> Option<&C::$ty> {
                    match self {
                        Self::$variant(obj) => Some(obj),
                        _ => None,
                    }
                }

                #[doc = concat!("Take the object if it is a `", stringify!($variant), "`.")]
                pub fn $into(self) -> Option<C::$ty> {
                    match self {
                        Self::$variant(obj) => Some(obj),
                        _ => None,
                    }
                }
            )*
        }
    };
}

object_accessors! {
    Texture => as_texture, into_texture, Texture;
    Buffer => as_buffer, into_buffer, Buffer;
    Shader => as_shader, into_shader, Shader;
    Program => as_program, into_program, Program;
    Framebuffer => as_framebuffer, into_framebuffer, Framebuffer;
    Renderbuffer => as_renderbuffer, into_renderbuffer, Renderbuffer;
    VertexArray => as_vertex_array, into_vertex_array, VertexArray;
    Sampler => as_sampler, into_sampler, Sampler;
    UniformLocation => as_uniform_location, into_uniform_location, UniformLocation;
}

/// The bridge's object table: a [`HandleTable`] of tagged host objects with
/// kind-checked lookups.
///
/// Lookups of unknown or wrong-kind handles either degrade to "no object"
/// (the default, so the host reports the problem through its own error code)
/// or fail with [`BridgeError::InvalidHandle`] when `strict` is set.
pub struct ObjectTable<C: GlContext> {
    table: HandleTable<ObjectRef<C>>,
    strict: bool,
}

impl<C: GlContext> ObjectTable<C> {
    /// Empty table.
    pub fn new(strict: bool) -> Self {
        Self {
            table: HandleTable::new(),
            strict,
        }
    }

    /// Underlying handle table.
    pub fn table(&self) -> &HandleTable<ObjectRef<C>> {
        &self.table
    }

    /// Register a host object.
    pub fn insert(&mut self, object: ObjectRef<C>) -> Result<Handle> {
        let kind = object.kind();
        let handle = self.table.allocate(object)?;
        tracing::debug!(%handle, %kind, "allocated handle");
        Ok(handle)
    }

    fn lookup<'a, T>(
        &'a self,
        raw: u32,
        expected: ObjectKind,
        pick: impl FnOnce(&'a ObjectRef<C>) -> Option<&'a T>,
    ) -> Result<Option<&'a T>> {
        if raw == 0 {
            return Ok(None);
        }
        match self.table.resolve(Handle(raw)) {
            Some(obj) => match pick(obj) {
                Some(found) => Ok(Some(found)),
                None => self.reject(raw, expected, Some(obj.kind())).map(|_| None),
            },
            None => self.reject(raw, expected, None).map(|_| None),
        }
    }

    fn reject(&self, handle: u32, expected: ObjectKind, found: Option<ObjectKind>) -> Result<()> {
        if self.strict {
            return Err(BridgeError::InvalidHandle { handle, expected });
        }
        match found {
            Some(found) => tracing::warn!(handle, %expected, %found, "handle used as wrong kind"),
            None => tracing::warn!(handle, %expected, "unknown handle"),
        }
        Ok(())
    }

    /// Remove `raw` if it is a live object of `expected` kind.
    pub fn remove(&mut self, raw: u32, expected: ObjectKind) -> Result<Option<ObjectRef<C>>> {
        if raw == 0 {
            return Ok(None);
        }
        let found = self.table.resolve(Handle(raw)).map(ObjectRef::kind);
        if found == Some(expected) {
            tracing::debug!(handle = raw, kind = %expected, "released handle");
            return Ok(self.table.release(Handle(raw)));
        }
        self.reject(raw, expected, found)?;
        Ok(None)
    }

    /// Resolve a texture handle.
    pub fn texture(&self, raw: u32) -> Result<Option<&C::Texture>> {
        self.lookup(raw, ObjectKind::Texture, ObjectRef::as_texture)
    }

    /// Resolve a buffer handle.
    pub fn buffer(&self, raw: u32) -> Result<Option<&C::Buffer>> {
        self.lookup(raw, ObjectKind::Buffer, ObjectRef::as_buffer)
    }

    /// Resolve a shader handle.
    pub fn shader(&self, raw: u32) -> Result<Option<&C::Shader>> {
        self.lookup(raw, ObjectKind::Shader, ObjectRef::as_shader)
    }

    /// Resolve a program handle.
    pub fn program(&self, raw: u32) -> Result<Option<&C::Program>> {
        self.lookup(raw, ObjectKind::Program, ObjectRef::as_program)
    }

    /// Resolve a framebuffer handle.
    pub fn framebuffer(&self, raw: u32) -> Result<Option<&C::Framebuffer>> {
        self.lookup(raw, ObjectKind::Framebuffer, ObjectRef::as_framebuffer)
    }

    /// Resolve a renderbuffer handle.
    pub fn renderbuffer(&self, raw: u32) -> Result<Option<&C::Renderbuffer>> {
        self.lookup(raw, ObjectKind::Renderbuffer, ObjectRef::as_renderbuffer)
    }

    /// Resolve a vertex array handle.
    pub fn vertex_array(&self, raw: u32) -> Result<Option<&C::VertexArray>> {
        self.lookup(raw, ObjectKind::VertexArray, ObjectRef::as_vertex_array)
    }

    /// Resolve a sampler handle.
    pub fn sampler(&self, raw: u32) -> Result<Option<&C::Sampler>> {
        self.lookup(raw, ObjectKind::Sampler, ObjectRef::as_sampler)
    }

    /// Resolve a uniform location handle.
    ///
    /// Guests pass locations as `GLint`; `-1` and every other negative value
    /// mean "no location", which the host silently ignores.
    pub fn uniform_location(&self, raw: i32) -> Result<Option<&C::UniformLocation>> {
        if raw < 0 {
            return Ok(None);
        }
        self.lookup(raw as u32, ObjectKind::UniformLocation, ObjectRef::as_uniform_location)
    }
}
