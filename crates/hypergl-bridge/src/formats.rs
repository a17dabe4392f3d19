//! Pixel-format and storage-type metadata.
//!
//! Both tables are closed: an entry point that accepts a format or type must
//! find it here, otherwise its marshaling fails with
//! [`BridgeError::UnsupportedPixelFormat`] / [`BridgeError::UnsupportedElementType`].

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::gl;

/// Storage-type tag of a guest array, as passed in the `type` argument of
/// pixel transfer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// `GL_BYTE`
    I8,
    /// `GL_UNSIGNED_BYTE`
    U8,
    /// `GL_SHORT`
    I16,
    /// `GL_UNSIGNED_SHORT`
    U16,
    /// `GL_INT`
    I32,
    /// `GL_UNSIGNED_INT`
    U32,
    /// `GL_FLOAT`
    F32,
    /// `GL_HALF_FLOAT`, carried as raw 16-bit words
    F16,
    /// `GL_UNSIGNED_INT_24_8`, a packed 32-bit word
    Packed24_8,
}

impl ElementType {
    /// Look up the element type for a GL type tag.
    pub fn from_gl(tag: u32) -> Result<Self> {
        Ok(match tag {
            gl::BYTE => Self::I8,
            gl::UNSIGNED_BYTE => Self::U8,
            gl::SHORT => Self::I16,
            gl::UNSIGNED_SHORT => Self::U16,
            gl::INT => Self::I32,
            gl::UNSIGNED_INT => Self::U32,
            gl::FLOAT => Self::F32,
            gl::HALF_FLOAT => Self::F16,
            gl::UNSIGNED_INT_24_8 => Self::Packed24_8,
            other => return Err(BridgeError::UnsupportedElementType(other)),
        })
    }

    /// The GL tag this element type was decoded from.
    pub fn to_gl(self) -> u32 {
        match self {
            Self::I8 => gl::BYTE,
            Self::U8 => gl::UNSIGNED_BYTE,
            Self::I16 => gl::SHORT,
            Self::U16 => gl::UNSIGNED_SHORT,
            Self::I32 => gl::INT,
            Self::U32 => gl::UNSIGNED_INT,
            Self::F32 => gl::FLOAT,
            Self::F16 => gl::HALF_FLOAT,
            Self::Packed24_8 => gl::UNSIGNED_INT_24_8,
        }
    }

    /// Width of one element in bytes.
    pub const fn byte_width(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 | Self::F16 => 2,
            Self::I32 | Self::U32 | Self::F32 | Self::Packed24_8 => 4,
        }
    }
}

/// Number of components a pixel format carries per pixel.
pub fn component_count(format: u32) -> Result<usize> {
    Ok(match format {
        gl::RED | gl::RED_INTEGER | gl::DEPTH_COMPONENT | gl::DEPTH_STENCIL => 1,
        gl::RG | gl::RG_INTEGER => 2,
        gl::RGB | gl::RGB_INTEGER => 3,
        gl::RGBA | gl::RGBA_INTEGER => 4,
        other => return Err(BridgeError::UnsupportedPixelFormat(other)),
    })
}

/// Element count of a `width * height * depth` pixel rectangle in `format`.
///
/// Negative dimensions count as zero; the host reports them as
/// `GL_INVALID_VALUE` on its own. A rectangle too large to address is
/// reported as [`BridgeError::OutOfBounds`].
pub fn pixel_element_count(format: u32, width: i32, height: i32, depth: i32) -> Result<usize> {
    let components = component_count(format)?;
    let dim = |v: i32| usize::try_from(v).unwrap_or(0);
    dim(width)
        .checked_mul(dim(height))
        .and_then(|n| n.checked_mul(dim(depth)))
        .and_then(|n| n.checked_mul(components))
        .ok_or(BridgeError::OutOfBounds { offset: 0, len: usize::MAX })
}
