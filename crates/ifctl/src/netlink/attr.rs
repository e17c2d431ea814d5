//! `nlattr` type-length-value records.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Size of [`NlAttr`]; attribute payloads start here.
pub const NLA_HDRLEN: usize = 4;

const NLA_F_NESTED: u16 = 1 << 15;
const NLA_F_NET_BYTEORDER: u16 = 1 << 14;

/// Round `len` up to the 4-byte attribute boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + 3) & !3
}

/// `struct nlattr` (same layout as `struct rtattr`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    pub nla_len: u16,
    pub nla_type: u16,
}

impl NlAttr {
    /// Header for an attribute carrying `payload_len` bytes.
    pub fn new(kind: u16, payload_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + payload_len) as u16,
            nla_type: kind,
        }
    }

    /// The attribute type with the nested/byte-order flags masked off.
    pub fn kind(&self) -> u16 {
        self.nla_type & !(NLA_F_NESTED | NLA_F_NET_BYTEORDER)
    }
}

/// Yields `(kind, payload)` for each attribute; stops at the first
/// malformed one.
pub struct AttrIter<'a> {
    rest: &'a [u8],
}

impl<'a> AttrIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let (attr, _) = NlAttr::ref_from_prefix(self.rest).ok()?;
        let len = usize::from(attr.nla_len);

        let Some(payload) = self.rest.get(NLA_HDRLEN..len) else {
            self.rest = &[];
            return None;
        };
        self.rest = self.rest.get(nla_align(len)..).unwrap_or_default();
        Some((attr.kind(), payload))
    }
}
