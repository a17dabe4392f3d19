//! Guest linear-memory accessor.
//!
//! The guest owns one flat byte buffer; the bridge borrows it for the length
//! of a single entry-point call. All typed access goes through explicit
//! reinterpretation of that one buffer, so a write through any view is visible
//! through every other view at the same byte offset.
//!
//! ## Memory Convention
//!
//! - Offsets are `u32` (WASM32 address space), measured in bytes
//! - Multi-byte values are little-endian, matching WASM
//! - Strings are UTF-8, NUL-terminated
//!
//! Offsets that fall outside the buffer surface as
//! [`BridgeError::OutOfBounds`]; inside a host function that traps the
//! guest call instead of touching host memory.

use std::borrow::Cow;

use bytemuck::Pod;

use crate::error::{BridgeError, Result};
use crate::formats::ElementType;

/// Borrowed view of the guest's linear memory for one call.
pub struct GuestMemory<'a> {
    bytes: &'a mut [u8],
}

impl<'a> GuestMemory<'a> {
    /// Wrap the guest's linear memory.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// Size of linear memory in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether linear memory is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn span(&self, offset: u32, len: usize) -> Result<std::ops::Range<usize>> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(BridgeError::OutOfBounds { offset: start, len }),
        }
    }

    /// Borrow `len` bytes at `offset`.
    pub fn bytes(&self, offset: u32, len: usize) -> Result<&[u8]> {
        let span = self.span(offset, len)?;
        Ok(&self.bytes[span])
    }

    /// Mutably borrow `len` bytes at `offset`.
    pub fn bytes_mut(&mut self, offset: u32, len: usize) -> Result<&mut [u8]> {
        let span = self.span(offset, len)?;
        Ok(&mut self.bytes[span])
    }

    /// Read a NUL-terminated UTF-8 string starting at `offset`.
    ///
    /// Invalid UTF-8 sequences are replaced, as a browser `TextDecoder` would.
    pub fn read_cstring(&self, offset: u32) -> Result<String> {
        let start = offset as usize;
        let tail = self
            .bytes
            .get(start..)
            .ok_or(BridgeError::OutOfBounds { offset: start, len: 1 })?;
        let len = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(BridgeError::UnterminatedString(offset))?;
        Ok(String::from_utf8_lossy(&tail[..len]).into_owned())
    }

    /// Read at most `len` bytes starting at `offset`, stopping early at a NUL.
    pub fn read_string_bounded(&self, offset: u32, len: usize) -> Result<String> {
        let raw = self.bytes(offset, len)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Write `text` at `offset` followed by a NUL byte.
    ///
    /// Returns the number of text bytes written, excluding the terminator.
    /// The caller is responsible for the destination being large enough.
    pub fn write_cstring(&mut self, offset: u32, text: &str) -> Result<usize> {
        let raw = text.as_bytes();
        let dest = self.bytes_mut(offset, raw.len() + 1)?;
        dest[..raw.len()].copy_from_slice(raw);
        dest[raw.len()] = 0;
        Ok(raw.len())
    }

    /// Read one little-endian `i32`.
    pub fn read_i32(&self, offset: u32) -> Result<i32> {
        let raw = self.bytes(offset, 4)?;
        Ok(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    /// Read one little-endian `u32`.
    pub fn read_u32(&self, offset: u32) -> Result<u32> {
        self.read_i32(offset).map(|v| v as u32)
    }

    /// Write one little-endian `i32`.
    pub fn write_i32(&mut self, offset: u32, value: i32) -> Result<()> {
        self.bytes_mut(offset, 4)?.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Write one little-endian `u32`.
    pub fn write_u32(&mut self, offset: u32, value: u32) -> Result<()> {
        self.write_i32(offset, value as i32)
    }

    /// `count` elements of `ty` starting at `offset`, without copying.
    pub fn typed_view(&self, ty: ElementType, offset: u32, count: usize) -> Result<TypedView<'_>> {
        let bytes = self.bytes(offset, byte_span(ty, offset, count)?)?;
        Ok(TypedView { ty, bytes })
    }

    /// Mutable counterpart of [`typed_view`](Self::typed_view), for readback.
    pub fn typed_view_mut(
        &mut self,
        ty: ElementType,
        offset: u32,
        count: usize,
    ) -> Result<TypedViewMut<'_>> {
        let span = byte_span(ty, offset, count)?;
        let bytes = self.bytes_mut(offset, span)?;
        Ok(TypedViewMut { ty, bytes })
    }

    /// `count` floats at `offset`.
    pub fn f32_slice(&self, offset: u32, count: usize) -> Result<Cow<'_, [f32]>> {
        self.pod_slice(offset, count)
    }

    /// `count` signed ints at `offset`.
    pub fn i32_slice(&self, offset: u32, count: usize) -> Result<Cow<'_, [i32]>> {
        self.pod_slice(offset, count)
    }

    /// `count` unsigned ints at `offset`.
    pub fn u32_slice(&self, offset: u32, count: usize) -> Result<Cow<'_, [u32]>> {
        self.pod_slice(offset, count)
    }

    /// Borrowed when `offset` is suitably aligned, copied otherwise.
    fn pod_slice<T: Pod>(&self, offset: u32, count: usize) -> Result<Cow<'_, [T]>> {
        let len = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(BridgeError::OutOfBounds { offset: offset as usize, len: usize::MAX })?;
        let raw = self.bytes(offset, len)?;
        Ok(match bytemuck::try_cast_slice(raw) {
            Ok(slice) => Cow::Borrowed(slice),
            Err(_) => Cow::Owned(bytemuck::pod_collect_to_vec(raw)),
        })
    }
}

fn byte_span(ty: ElementType, offset: u32, count: usize) -> Result<usize> {
    count
        .checked_mul(ty.byte_width())
        .ok_or(BridgeError::OutOfBounds { offset: offset as usize, len: usize::MAX })
}

/// Zero-copy, read-only typed window into guest memory.
#[derive(Debug, Clone, Copy)]
pub struct TypedView<'a> {
    ty: ElementType,
    bytes: &'a [u8],
}

impl<'a> TypedView<'a> {
    /// Element type of the view.
    pub fn element_type(&self) -> ElementType {
        self.ty
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.ty.byte_width()
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte span (`len * element width`).
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// The aliased guest bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Zero-copy, writable typed window into guest memory.
#[derive(Debug)]
pub struct TypedViewMut<'a> {
    ty: ElementType,
    bytes: &'a mut [u8],
}

impl TypedViewMut<'_> {
    /// Element type of the view.
    pub fn element_type(&self) -> ElementType {
        self.ty
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.ty.byte_width()
    }

    /// Whether the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte span (`len * element width`).
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// The aliased guest bytes, for the host to fill.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}
