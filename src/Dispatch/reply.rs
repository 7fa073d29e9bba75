use crate::Message::LResult;
use std::mem::size_of;

/// Acknowledgement side of the inter-process transport.
///
/// A dispatched call answers through exactly one of the two methods.
pub trait ReplyChannel {
    /// Answer with the bare result.
    fn return_direct(&mut self, result: LResult);

    /// Answer with the result followed by the message buffer.
    fn return_via_channel(&mut self, reply: &[u8], is_final: bool);
}

/// What a call answered with, as recorded by [`RecordedReply`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Reply {
    #[default]
    Pending,
    Direct(LResult),
    Channel { bytes: Vec<u8>, is_final: bool },
}

impl Reply {
    /// Result carried by either form of reply.
    pub fn result(&self) -> Option<LResult> {
        match self {
            Reply::Pending => None,
            Reply::Direct(result) => Some(*result),
            Reply::Channel { bytes, .. } => {
                let head = bytes.get(..size_of::<LResult>())?;
                Some(LResult::from_ne_bytes(head.try_into().ok()?))
            }
        }
    }

    /// Message buffer of a channel reply.
    pub fn payload(&self) -> &[u8] {
        match self {
            Reply::Channel { bytes, .. } => bytes.get(size_of::<LResult>()..).unwrap_or(&[]),
            _ => &[],
        }
    }
}

/// Channel that keeps the reply in memory.
#[derive(Debug, Default)]
pub struct RecordedReply {
    pub reply: Reply,
    /// Number of replies received; anything but 1 after a call is a bug.
    pub count: usize,
}

impl ReplyChannel for RecordedReply {
    fn return_direct(&mut self, result: LResult) {
        self.count += 1;
        self.reply = Reply::Direct(result);
    }

    fn return_via_channel(&mut self, reply: &[u8], is_final: bool) {
        self.count += 1;
        self.reply = Reply::Channel {
            bytes: reply.to_vec(),
            is_final,
        };
    }
}
