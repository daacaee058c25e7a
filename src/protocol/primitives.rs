//! Primitive wire types for the classic (pre-KIP-482) Kafka protocol.
//!
//! Every API key in scope (§6 of the design) predates flexible/compact
//! encoding, so there is no varint, tagged-field, or compact-string
//! machinery here — only the fixed-width integers, length-prefixed strings,
//! and nullable byte arrays the classic protocol actually uses.
//!
//! # References
//! - <https://kafka.apache.org/protocol#protocol_types>

use std::io::{Read, Write};

use super::traits::{ReadError, ReadType, WriteError, WriteType};

impl<R: Read> ReadType<R> for bool {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0] != 0)
    }
}

impl<W: Write> WriteType<W> for bool {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        Ok(writer.write_all(&[*self as u8])?)
    }
}

impl<R: Read> ReadType<R> for i8 {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(i8::from_be_bytes(buf))
    }
}

impl<W: Write> WriteType<W> for i8 {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_all(&self.to_be_bytes())?;
        Ok(())
    }
}

impl<R: Read> ReadType<R> for i16 {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }
}

impl<W: Write> WriteType<W> for i16 {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_all(&self.to_be_bytes())?;
        Ok(())
    }
}

impl<R: Read> ReadType<R> for i32 {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }
}

impl<W: Write> WriteType<W> for i32 {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_all(&self.to_be_bytes())?;
        Ok(())
    }
}

impl<R: Read> ReadType<R> for i64 {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }
}

impl<W: Write> WriteType<W> for i64 {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        writer.write_all(&self.to_be_bytes())?;
        Ok(())
    }
}

/// A sequence of characters, i16-length-prefixed. Never null; callers that
/// need a nullable string use `Option<String>` instead.
impl<R: Read> ReadType<R> for String {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = i16::read(reader)?;
        let len = usize::try_from(len).map_err(|e| ReadError::Malformed(Box::new(e)))?;
        let mut buf = vec![0u8; len];
        reader.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| ReadError::Malformed(Box::new(e)))
    }
}

impl<W: Write> WriteType<W> for String {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        let len = i16::try_from(self.len()).map_err(WriteError::Overflow)?;
        len.write(writer)?;
        writer.write_all(self.as_bytes())?;
        Ok(())
    }
}

/// Nullable string: i16 length, -1 encodes null, otherwise UTF-8 bytes follow.
impl<R: Read> ReadType<R> for Option<String> {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = i16::read(reader)?;
        match len {
            l if l < -1 => Err(ReadError::Malformed(
                format!("invalid negative length for nullable string: {l}").into(),
            )),
            -1 => Ok(None),
            l => {
                let len = usize::try_from(l)?;
                let mut buf = vec![0u8; len];
                reader.read_exact(&mut buf)?;
                let s = String::from_utf8(buf).map_err(|e| ReadError::Malformed(Box::new(e)))?;
                Ok(Some(s))
            }
        }
    }
}

impl<W: Write> WriteType<W> for Option<String> {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        match self {
            Some(s) => s.write(writer),
            None => (-1i16).write(writer),
        }
    }
}

/// Nullable byte array: i32 length, -1 encodes null, otherwise raw bytes follow.
impl<R: Read> ReadType<R> for Option<Vec<u8>> {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = i32::read(reader)?;
        match len {
            l if l < -1 => Err(ReadError::Malformed(
                format!("invalid negative length for nullable bytes: {l}").into(),
            )),
            -1 => Ok(None),
            l => {
                let len = usize::try_from(l)?;
                let mut buf = vec![0u8; len];
                reader.read_exact(&mut buf)?;
                Ok(Some(buf))
            }
        }
    }
}

impl<W: Write> WriteType<W> for Option<Vec<u8>> {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        match self {
            Some(buf) => {
                let l = i32::try_from(buf.len()).map_err(|e| WriteError::Malformed(Box::new(e)))?;
                l.write(writer)?;
                writer.write_all(buf)?;
                Ok(())
            }
            None => (-1i32).write(writer),
        }
    }
}

/// Non-nullable byte array used for opaque payloads (assignment/metadata bytes).
impl<R: Read> ReadType<R> for Vec<u8> {
    fn read(reader: &mut R) -> Result<Self, ReadError> {
        let len = i32::read(reader)?;
        if len < 0 {
            return Err(ReadError::Malformed(
                format!("invalid length for bytes: {len}").into(),
            ));
        }
        let mut buf = vec![0u8; usize::try_from(len)?];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl<W: Write> WriteType<W> for Vec<u8> {
    fn write(&self, writer: &mut W) -> Result<(), WriteError> {
        let l = i32::try_from(self.len()).map_err(|e| WriteError::Malformed(Box::new(e)))?;
        l.write(writer)?;
        writer.write_all(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn string_roundtrip() {
        let mut buf = Vec::new();
        "hello".to_string().write(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x05, b'h', b'e', b'l', b'l', b'o']);

        let mut cur = Cursor::new(buf);
        assert_eq!(String::read(&mut cur).unwrap(), "hello");
    }

    #[test]
    fn nullable_string_null() {
        let mut buf = Vec::new();
        Option::<String>::None.write(&mut buf).unwrap();
        assert_eq!(buf, [0xff, 0xff]);

        let mut cur = Cursor::new(buf);
        assert_eq!(Option::<String>::read(&mut cur).unwrap(), None);
    }

    #[test]
    fn nullable_bytes_null() {
        let mut buf = Vec::new();
        Option::<Vec<u8>>::None.write(&mut buf).unwrap();
        assert_eq!(buf, [0xff, 0xff, 0xff, 0xff]);

        let mut cur = Cursor::new(buf);
        assert_eq!(Option::<Vec<u8>>::read(&mut cur).unwrap(), None);
    }

    #[test]
    fn bytes_roundtrip() {
        let mut buf = Vec::new();
        vec![1u8, 2, 3].write(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x00, 0x03, 1, 2, 3]);

        let mut cur = Cursor::new(buf);
        assert_eq!(Vec::<u8>::read(&mut cur).unwrap(), vec![1, 2, 3]);
    }
}
