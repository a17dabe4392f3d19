//! Entry-point dispatcher.
//!
//! [`Bridge`] owns the host context and the handle table and exposes one
//! method per guest entry point. Each method marshals its fixed-width
//! arguments (handles, guest offsets, enums) into host-native values, calls
//! the host, and writes any results back into guest memory.
//!
//! The bridge keeps no rendering state of its own: bound objects, the
//! current program and error codes all live in the host context.
//!
//! Methods are grouped by category:
//! - `state`: pass-through state, capability gating, queries, draws
//! - `objects`: gen/delete/bind of textures, buffers, framebuffers,
//!   renderbuffers, vertex arrays and samplers
//! - `transfer`: buffer and pixel uploads/readback, mapping placeholders
//! - `program`: shaders, programs, introspection and uniforms

mod objects;
mod program;
mod state;
mod transfer;

use std::collections::HashMap;

use crate::config::BridgeConfig;
use crate::context::GlContext;
use crate::error::Result;
use crate::handles::{Handle, ObjectKind, ObjectRef, ObjectTable};
use crate::memory::GuestMemory;

/// Translation layer between one guest and one host context.
pub struct Bridge<C: GlContext> {
    ctx: C,
    objects: ObjectTable<C>,
    config: BridgeConfig,
    /// `glGetString` results already copied into guest memory, by `pname`.
    strings: HashMap<u32, u32>,
}

impl<C: GlContext> Bridge<C> {
    /// Bridge with the default configuration.
    pub fn new(ctx: C) -> Self {
        Self::with_config(ctx, BridgeConfig::default())
    }

    /// Bridge with an explicit configuration.
    pub fn with_config(ctx: C, config: BridgeConfig) -> Self {
        Self {
            ctx,
            objects: ObjectTable::new(config.strict_handles),
            config,
            strings: HashMap::new(),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Host context.
    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Mutable host context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Consume the bridge, returning the host context.
    pub fn into_context(self) -> C {
        self.ctx
    }

    /// Object table, for inspection.
    pub fn objects(&self) -> &ObjectTable<C> {
        &self.objects
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.objects.table().len()
    }

    /// Handle the next object creation will return.
    pub fn next_handle(&self) -> Handle {
        self.objects.table().next_handle()
    }

    /// Guest pointer of a previously materialized `glGetString` result.
    pub fn cached_string(&self, pname: u32) -> Option<u32> {
        self.strings.get(&pname).copied()
    }

    /// Remember where a `glGetString` result was written in guest memory.
    pub fn remember_string(&mut self, pname: u32, ptr: u32) {
        self.strings.insert(pname, ptr);
    }

    /// Create one object for a plural `glGen*` call and write its handle into
    /// the first output slot.
    ///
    /// Only one object is ever created, whatever `n` says; a non-positive `n`
    /// creates nothing.
    fn gen_one(
        &mut self,
        mem: &mut GuestMemory<'_>,
        n: i32,
        out: u32,
        kind: ObjectKind,
        create: impl FnOnce(&mut C) -> ObjectRef<C>,
    ) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        if n > 1 {
            tracing::debug!(n, %kind, "plural gen creates a single object");
        }
        // Validate the output slot before creating anything on the host.
        mem.bytes(out, 4)?;
        let handle = self.objects.insert(create(&mut self.ctx))?;
        mem.write_u32(out, handle.get())
    }

    /// Release the object named by the first slot of a plural `glDelete*`
    /// input array.
    fn delete_one(
        &mut self,
        mem: &GuestMemory<'_>,
        n: i32,
        input: u32,
        kind: ObjectKind,
    ) -> Result<Option<ObjectRef<C>>> {
        if n <= 0 {
            return Ok(None);
        }
        if n > 1 {
            tracing::debug!(n, %kind, "plural delete releases a single object");
        }
        let raw = mem.read_u32(input)?;
        self.objects.remove(raw, kind)
    }
}
