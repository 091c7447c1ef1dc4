//! GLB Container
//!
//! Splits a binary glTF container into its JSON document and a borrowed view
//! over the binary payload.
//!
//! ```text
//! u32 magic        = 0x46546C67
//! u32 version      = 2
//! u32 totalLength               (not validated)
//! u32 jsonLength
//! u32 jsonType     = 0x4E4F534A
//! [jsonLength] JSON text
//! -- padded to 4 bytes --
//! u32 binLength
//! u32 binType      = 0x004E4942
//! [binLength] payload
//! ```

use crate::assets::document::Document;
use crate::errors::{FormatError, Result};

pub const GLB_MAGIC: u32 = 0x4654_6C67;
pub const GLB_VERSION: u32 = 2;
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

const HEADER_LEN: usize = 20;
const CHUNK_HEADER_LEN: usize = 8;

/// A parsed GLB container.
///
/// Immutable once parsed. The JSON text and the binary payload both borrow
/// from the input bytes; nothing is copied.
#[derive(Debug)]
pub struct Glb<'a> {
    pub document: Document,
    json_text: &'a str,
    binary: &'a [u8],
}

impl<'a> Glb<'a> {
    /// Validates the header and both chunks, then deserializes the document.
    ///
    /// Never returns a partially constructed container.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self> {
        let magic = read_u32(bytes, 0)?;
        if magic != GLB_MAGIC {
            return Err(FormatError::BadMagic { found: magic }.into());
        }

        let version = read_u32(bytes, 4)?;
        if version != GLB_VERSION {
            return Err(FormatError::UnsupportedVersion { found: version }.into());
        }

        let (json_len, json_type) = match (read_u32(bytes, 12), read_u32(bytes, 16)) {
            (Ok(len), Ok(ty)) => (len as usize, ty),
            _ => return Err(FormatError::MissingJsonChunk.into()),
        };
        if json_type != CHUNK_TYPE_JSON {
            return Err(FormatError::MissingJsonChunk.into());
        }

        let json_bytes = slice(bytes, HEADER_LEN, json_len)?;
        let json_text = std::str::from_utf8(json_bytes).map_err(FormatError::from)?;

        let bin_header = align4(HEADER_LEN + json_len);
        let (bin_len, bin_type) = match (read_u32(bytes, bin_header), read_u32(bytes, bin_header + 4)) {
            (Ok(len), Ok(ty)) => (len as usize, ty),
            _ => return Err(FormatError::MissingBinaryChunk.into()),
        };
        if bin_type != CHUNK_TYPE_BIN {
            return Err(FormatError::MissingBinaryChunk.into());
        }
        let binary = slice(bytes, bin_header + CHUNK_HEADER_LEN, bin_len)?;

        let document: Document = serde_json::from_str(json_text).map_err(FormatError::from)?;

        log::debug!(
            "Parsed GLB: {} bytes JSON, {} bytes binary, {} nodes, {} meshes, {} accessors",
            json_len,
            bin_len,
            document.nodes.len(),
            document.meshes.len(),
            document.accessors.len()
        );

        Ok(Self {
            document,
            json_text,
            binary,
        })
    }

    /// The JSON chunk exactly as stored in the container.
    #[inline]
    #[must_use]
    pub fn json_text(&self) -> &'a str {
        self.json_text
    }

    /// The binary chunk payload.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> &'a [u8] {
        self.binary
    }
}

/// Rounds `n` up to the next multiple of four.
#[inline]
#[must_use]
pub const fn align4(n: usize) -> usize {
    (n + 3) & !3
}

fn read_u32(bytes: &[u8], offset: usize) -> std::result::Result<u32, FormatError> {
    let word = slice(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> std::result::Result<&[u8], FormatError> {
    let end = offset.checked_add(len).unwrap_or(usize::MAX);
    bytes.get(offset..end).ok_or(FormatError::Truncated {
        needed: end,
        available: bytes.len(),
    })
}
