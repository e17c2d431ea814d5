//! Request assembly.

use std::mem::offset_of;

use zerocopy::{Immutable, IntoBytes};

use super::attr::{NlAttr, nla_align};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Accumulates one netlink request: header, fixed body, then attributes.
///
/// The length field is filled in by [`finish`](Self::finish); sequence
/// number and port ID are stamped by the connection just before sending.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    pub fn new(msg_type: u16, flags: u16) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(NlMsgHdr::new(msg_type, flags).as_bytes());
        buf.resize(NLMSG_HDRLEN, 0);
        Self { buf }
    }

    /// Bytes written so far, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True while nothing follows the header.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == NLMSG_HDRLEN
    }

    /// Append a fixed-size wire struct, padded to the message boundary.
    pub fn append<T: IntoBytes + Immutable>(&mut self, body: &T) {
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.resize(nlmsg_align(self.buf.len()), 0);
    }

    /// Append one attribute, padded to the attribute boundary.
    pub fn append_attr(&mut self, kind: u16, payload: &[u8]) {
        self.buf
            .extend_from_slice(NlAttr::new(kind, payload.len()).as_bytes());
        self.buf.extend_from_slice(payload);
        self.buf.resize(nla_align(self.buf.len()), 0);
    }

    pub fn set_seq(&mut self, seq: u32) {
        self.put_header_u32(offset_of!(NlMsgHdr, nlmsg_seq), seq);
    }

    pub fn set_pid(&mut self, pid: u32) {
        self.put_header_u32(offset_of!(NlMsgHdr, nlmsg_pid), pid);
    }

    /// Fix up the length and hand out the wire bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let len = self.buf.len() as u32;
        self.put_header_u32(offset_of!(NlMsgHdr, nlmsg_len), len);
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    // The buffer always starts with a full header.
    fn put_header_u32(&mut self, offset: usize, value: u32) {
        self.buf[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
    }
}
