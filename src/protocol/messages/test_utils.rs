//! Shared fixture-assertion macros for per-message unit tests, replacing
//! direct byte-comparison boilerplate with something that reads like the
//! assertion it's making.

macro_rules! assert_encodes_to {
    ($req:expr, $version:expr, $want:expr) => {{
        let mut buf = crate::buffer::WireBuffer::default();
        $req.encode(&mut buf, $version).unwrap();
        assert_eq!(buf.as_slice(), &$want[..]);
    }};
}

pub(crate) use assert_encodes_to;

macro_rules! assert_decodes_to {
    ($ty:ty, $bytes:expr, $version:expr, $want:expr) => {{
        let mut rd = crate::buffer::ReadBuffer::new(&$bytes);
        let got = <$ty as crate::protocol::messages::ResponseBody>::decode(&mut rd, $version).unwrap();
        assert_eq!(got, $want);
    }};
}

pub(crate) use assert_decodes_to;

/// Builds and decodes the same value twice, asserting the second pass is
/// identical to the first (§8 "Round-trip", restricted to the `encode`
/// direction since every request body here is built from scratch rather
/// than parsed).
macro_rules! assert_double_roundtrip_stable {
    ($req:expr, $version:expr) => {{
        let mut first = crate::buffer::WireBuffer::default();
        $req.encode(&mut first, $version).unwrap();
        let mut second = crate::buffer::WireBuffer::default();
        $req.encode(&mut second, $version).unwrap();
        assert_eq!(first.as_slice(), second.as_slice());
    }};
}

pub(crate) use assert_double_roundtrip_stable;
