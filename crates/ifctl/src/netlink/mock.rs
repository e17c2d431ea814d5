//! Scripted route-socket transport for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use zerocopy::IntoBytes;

use super::connection::Transport;
use super::message::{NLMSG_HDRLEN, NlMsgError, NlMsgHdr, NlMsgType};
use crate::error::Result;

/// Answers each received request with the next scripted status.
///
/// With nothing scripted, `recv_msg` never completes.
#[derive(Debug)]
pub struct MockTransport {
    seq: AtomicU32,
    sent: Mutex<Vec<Vec<u8>>>,
    /// (sequence offset from the last request, status code)
    replies: Mutex<VecDeque<(i64, i32)>>,
}

impl MockTransport {
    pub const PID: u32 = 4242;

    pub fn new() -> Self {
        Self {
            seq: AtomicU32::new(100),
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue an `NLMSG_ERROR` for the most recent request.
    pub fn reply_status(&self, code: i32) {
        self.reply_with_seq_offset(0, code);
    }

    /// Queue an `NLMSG_ERROR` whose sequence number is off by `offset`.
    pub fn reply_with_seq_offset(&self, offset: i64, code: i32) {
        self.replies.lock().push_back((offset, code));
    }

    /// Every message sent so far.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    fn status_message(&self, offset: i64, code: i32) -> Vec<u8> {
        let sent = self.sent.lock();
        let request = sent
            .last()
            .and_then(|m| NlMsgHdr::from_bytes(m).ok())
            .copied()
            .unwrap_or_default();

        let body = NlMsgError {
            error: code,
            msg: request,
        };
        let mut header = NlMsgHdr::new(NlMsgType::ERROR, 0);
        header.nlmsg_len = (NLMSG_HDRLEN + body.as_bytes().len()) as u32;
        header.nlmsg_seq = (i64::from(request.nlmsg_seq) + offset) as u32;
        header.nlmsg_pid = Self::PID;

        let mut buf = header.as_bytes().to_vec();
        buf.extend_from_slice(body.as_bytes());
        buf
    }
}

impl Transport for MockTransport {
    fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn pid(&self) -> u32 {
        Self::PID
    }

    async fn send(&self, msg: &[u8]) -> Result<()> {
        self.sent.lock().push(msg.to_vec());
        Ok(())
    }

    async fn recv_msg(&self) -> Result<Vec<u8>> {
        let next = self.replies.lock().pop_front();
        match next {
            Some((offset, code)) => Ok(self.status_message(offset, code)),
            None => std::future::pending().await,
        }
    }
}
