//! Base (de)serialization traits shared by every primitive and message type.
//!
//! Every wire-level encode/decode in this crate goes through `ReadType`/
//! `WriteType` rather than `std::io::Read`/`Write` directly, so a short read
//! or an out-of-range length turns into a typed [`ReadError`]/[`WriteError`]
//! instead of a raw `io::Error`. [`crate::buffer::ReadBuffer`] wraps these
//! into the sticky-error behavior required by §4.A of the design.

use std::io::{Read, Write};

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReadError {
    #[error("cannot read data: {0}")]
    IO(#[from] std::io::Error),

    #[error("overflow converting integer: {0}")]
    Overflow(#[from] std::num::TryFromIntError),

    #[error("malformed data: {0}")]
    Malformed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub trait ReadType<R>: Sized
where
    R: Read,
{
    fn read(reader: &mut R) -> Result<Self, ReadError>;
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WriteError {
    #[error("cannot write data: {0}")]
    IO(#[from] std::io::Error),

    #[error("overflow converting integer: {0}")]
    Overflow(#[from] std::num::TryFromIntError),

    #[error("malformed data: {0}")]
    Malformed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub trait WriteType<W>: Sized
where
    W: Write,
{
    fn write(&self, writer: &mut W) -> Result<(), WriteError>;
}
