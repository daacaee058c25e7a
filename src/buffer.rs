//! The wire buffer (§4.A): append-only writer with back-patchable array
//! counts, and a sticky-error reader built on top of the primitive
//! [`ReadType`]/[`WriteType`] impls in [`crate::protocol::primitives`].
//!
//! Request builders never know the final size of a nested array until they've
//! iterated it once (topics grouped by partition, for example), so
//! [`WireBuffer::write_array_count`] reserves four zero bytes and hands back
//! a [`PatchToken`]; the real count is filled in later with
//! [`WireBuffer::patch_count`]. Tokens stay valid across further writes — the
//! buffer only grows by appending, so earlier offsets never move.

use std::io::Cursor;

use thiserror::Error;

use crate::protocol::traits::{ReadError, ReadType, WriteError, WriteType};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BufferError {
    #[error("short read or malformed field: {0}")]
    Read(#[from] ReadError),

    #[error("failed to encode field: {0}")]
    Write(#[from] WriteError),

    #[error("{field} requires API version {min}+, negotiated {negotiated}")]
    UnsupportedVersion {
        field: &'static str,
        min: i16,
        negotiated: i16,
    },
}

/// Offset token returned by [`WireBuffer::write_array_count`]. Opaque outside
/// this module; the only valid use is passing it back to
/// [`WireBuffer::patch_count`] on the same buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchToken(usize);

/// Append-only, patchable byte buffer used by every request builder.
#[derive(Debug, Default)]
pub struct WireBuffer {
    data: Vec<u8>,
}

impl WireBuffer {
    pub fn with_capacity_hint(hint: usize) -> Self {
        Self {
            data: Vec::with_capacity(hint),
        }
    }

    pub fn write_i8(&mut self, v: i8) -> Result<(), BufferError> {
        Ok(v.write(&mut self.data)?)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<(), BufferError> {
        Ok(v.write(&mut self.data)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<(), BufferError> {
        Ok(v.write(&mut self.data)?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<(), BufferError> {
        Ok(v.write(&mut self.data)?)
    }

    pub fn write_bool(&mut self, v: bool) -> Result<(), BufferError> {
        Ok(v.write(&mut self.data)?)
    }

    /// i16-length-prefixed string; `None` encodes as length -1.
    pub fn write_str(&mut self, v: Option<&str>) -> Result<(), BufferError> {
        match v {
            Some(s) => Ok(s.to_string().write(&mut self.data)?),
            None => Ok((-1i16).write(&mut self.data)?),
        }
    }

    /// i32-length-prefixed byte string; `None` encodes as length -1.
    pub fn write_bytes(&mut self, v: Option<&[u8]>) -> Result<(), BufferError> {
        match v {
            Some(b) => Ok(Some(b.to_vec()).write(&mut self.data)?),
            None => Ok(None::<Vec<u8>>.write(&mut self.data)?),
        }
    }

    /// Reserves a 4-byte slot for an i32 array count, to be fixed up once the
    /// element count is known. Returns the patch token.
    pub fn write_array_count(&mut self) -> Result<PatchToken, BufferError> {
        let at = self.data.len();
        0i32.write(&mut self.data)?;
        Ok(PatchToken(at))
    }

    /// Overwrites the 4 bytes reserved by `write_array_count` with the real count.
    pub fn patch_count(&mut self, token: PatchToken, count: i32) {
        let bytes = count.to_be_bytes();
        self.data[token.0..token.0 + 4].copy_from_slice(&bytes);
    }

    /// Writes a sub-buffer's contents as a length-prefixed bytes field (used
    /// by SyncGroup to splice a per-member MemberState buffer, §4.B).
    pub fn splice_sub_buffer(&mut self, sub: WireBuffer) -> Result<(), BufferError> {
        self.write_bytes(Some(&sub.data))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Streaming reader over a response body with a sticky error: once a read
/// fails, every subsequent read returns the same error without touching the
/// cursor, so a parser can fall straight through to its parse-fail exit (§4.A).
pub struct ReadBuffer<'a> {
    cursor: Cursor<&'a [u8]>,
    sticky: Option<BufferError>,
}

impl<'a> ReadBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            sticky: None,
        }
    }

    pub fn is_err(&self) -> bool {
        self.sticky.is_some()
    }

    /// Consumes the buffer, returning the sticky error if one was set.
    pub fn finish(self) -> Result<(), BufferError> {
        match self.sticky {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Runs a primitive read unless a prior one already went sticky; records
    /// and re-reports the first failure, never touches the cursor afterward.
    fn read<T, E>(&mut self, f: impl FnOnce(&mut Cursor<&'a [u8]>) -> Result<T, E>) -> Result<T, BufferError>
    where
        BufferError: From<E>,
    {
        if let Some(e) = &self.sticky {
            return Err(clone_sticky(e));
        }
        match f(&mut self.cursor) {
            Ok(v) => Ok(v),
            Err(e) => {
                let err: BufferError = e.into();
                let reported = clone_sticky(&err);
                self.sticky = Some(err);
                Err(reported)
            }
        }
    }

    pub fn read_i8(&mut self) -> Result<i8, BufferError> {
        self.read(i8::read)
    }

    pub fn read_i16(&mut self) -> Result<i16, BufferError> {
        self.read(i16::read)
    }

    pub fn read_i32(&mut self) -> Result<i32, BufferError> {
        self.read(i32::read)
    }

    pub fn read_i64(&mut self) -> Result<i64, BufferError> {
        self.read(i64::read)
    }

    pub fn read_bool(&mut self) -> Result<bool, BufferError> {
        self.read(bool::read)
    }

    pub fn read_str(&mut self) -> Result<String, BufferError> {
        self.read(String::read)
    }

    pub fn read_nullable_str(&mut self) -> Result<Option<String>, BufferError> {
        self.read(Option::<String>::read)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, BufferError> {
        self.read(Vec::<u8>::read)
    }

    pub fn read_nullable_bytes(&mut self) -> Result<Option<Vec<u8>>, BufferError> {
        self.read(Option::<Vec<u8>>::read)
    }

    /// Reads an i32 array count, rejecting negative counts as malformed.
    pub fn read_array_count(&mut self) -> Result<usize, BufferError> {
        let n = self.read_i32()?;
        if n < 0 {
            let err = malformed(format!("negative array count: {n}"));
            let reported = clone_sticky(&err);
            self.sticky = Some(err);
            return Err(reported);
        }
        Ok(n as usize)
    }
}

fn malformed(msg: String) -> BufferError {
    BufferError::Read(ReadError::Malformed(msg.into()))
}

/// `BufferError` isn't `Clone` (its sources aren't), so the sticky slot and
/// the error handed back to the caller are built from the same textual
/// description rather than shared by reference.
fn clone_sticky(e: &BufferError) -> BufferError {
    malformed(e.to_string())
}
