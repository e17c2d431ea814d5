//! `nlmsghdr` framing.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// Round `len` up to the 4-byte netlink boundary.
#[inline]
pub const fn nlmsg_align(len: usize) -> usize {
    (len + 3) & !3
}

/// Aligned size of [`NlMsgHdr`].
pub const NLMSG_HDRLEN: usize = nlmsg_align(std::mem::size_of::<NlMsgHdr>());

/// Control and rtnetlink message types.
pub struct NlMsgType;

impl NlMsgType {
    /// Status report; code 0 is an ACK.
    pub const ERROR: u16 = 2;
    pub const RTM_NEWADDR: u16 = 20;
    pub const RTM_DELADDR: u16 = 21;
}

pub const NLM_F_REQUEST: u16 = 0x01;
pub const NLM_F_ACK: u16 = 0x04;
pub const NLM_F_EXCL: u16 = 0x200;
pub const NLM_F_CREATE: u16 = 0x400;

/// `struct nlmsghdr`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgHdr {
    pub nlmsg_len: u32,
    pub nlmsg_type: u16,
    pub nlmsg_flags: u16,
    pub nlmsg_seq: u32,
    pub nlmsg_pid: u32,
}

impl NlMsgHdr {
    /// A header for an empty message.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self {
            nlmsg_len: NLMSG_HDRLEN as u32,
            nlmsg_type: msg_type,
            nlmsg_flags: flags,
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.nlmsg_type == NlMsgType::ERROR
    }

    /// Borrow the header at the start of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        let (hdr, _) = Self::ref_from_prefix(data).map_err(|_| Error::Truncated {
            expected: NLMSG_HDRLEN,
            actual: data.len(),
        })?;
        Ok(hdr)
    }

    /// Split the first message off `data`.
    ///
    /// Returns the header, its payload and whatever follows the (padded)
    /// message.
    pub fn split(data: &[u8]) -> Result<(&Self, &[u8], &[u8])> {
        let hdr = Self::from_bytes(data)?;
        let len = hdr.nlmsg_len as usize;
        if !(NLMSG_HDRLEN..=data.len()).contains(&len) {
            return Err(Error::InvalidMessage(format!(
                "message length {} outside {}..={}",
                len,
                NLMSG_HDRLEN,
                data.len()
            )));
        }
        let rest = data.get(nlmsg_align(len)..).unwrap_or_default();
        Ok((hdr, &data[NLMSG_HDRLEN..len], rest))
    }
}

/// Walks the messages packed into one datagram.
///
/// Yields one error and then stops if the framing is broken.
pub struct MessageIter<'a> {
    rest: &'a [u8],
}

impl<'a> MessageIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for MessageIter<'a> {
    type Item = Result<(&'a NlMsgHdr, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.len() < NLMSG_HDRLEN {
            return None;
        }
        match NlMsgHdr::split(self.rest) {
            Ok((hdr, payload, rest)) => {
                self.rest = rest;
                Some(Ok((hdr, payload)))
            }
            Err(e) => {
                self.rest = &[];
                Some(Err(e))
            }
        }
    }
}

/// `struct nlmsgerr`: the status the kernel sends back for a request.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlMsgError {
    /// 0 or a negative errno.
    pub error: i32,
    /// Header of the request being answered.
    pub msg: NlMsgHdr,
}

impl NlMsgError {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        let (err, _) = Self::ref_from_prefix(data).map_err(|_| Error::Truncated {
            expected: std::mem::size_of::<Self>(),
            actual: data.len(),
        })?;
        Ok(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(msg_type: u16, seq: u32, payload: &[u8]) -> Vec<u8> {
        let hdr = NlMsgHdr {
            nlmsg_len: (NLMSG_HDRLEN + payload.len()) as u32,
            nlmsg_seq: seq,
            ..NlMsgHdr::new(msg_type, 0)
        };
        let mut buf = hdr.as_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf.resize(nlmsg_align(buf.len()), 0);
        buf
    }

    #[test]
    fn test_iterates_multiple_messages() {
        let mut data = raw(NlMsgType::RTM_NEWADDR, 1, &[1, 2, 3]);
        data.extend(raw(NlMsgType::ERROR, 2, &[]));

        let msgs: Vec<_> = MessageIter::new(&data).map(|r| r.unwrap()).collect();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].0.nlmsg_seq, 1);
        assert_eq!(msgs[0].1, &[1, 2, 3]);
        assert!(msgs[1].0.is_error());
    }

    #[test]
    fn test_bad_length_stops_iteration() {
        let mut data = raw(NlMsgType::RTM_DELADDR, 1, &[]);
        data[0] = 0xff;
        let mut iter = MessageIter::new(&data);
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_error_payload() {
        let err = NlMsgError {
            error: -libc::EEXIST,
            msg: NlMsgHdr::new(NlMsgType::RTM_NEWADDR, 0),
        };
        let parsed = NlMsgError::from_bytes(err.as_bytes()).unwrap();
        assert_eq!(parsed.error, -17);
        assert!(NlMsgError::from_bytes(&[0u8; 4]).is_err());
    }
}
