// Central error type for the marshaling layer.
//
// Every failure is an explicit value consumed by the dispatch core; nothing
// here unwinds. Writeback truncation is not an error (it is clamped and
// counted in `Core::stats`).

use std::fmt;

/// Every error the marshaling layer can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    /// A scratch buffer of `requested` bytes could not be allocated.
    Allocation { requested: usize },

    /// The message has no policy for this direction or boundary.
    UnsupportedMessage { msg: u32, name: &'static str },

    /// The message carries data that only means something in the sender's
    /// address space.
    NotTransferable { msg: u32, name: &'static str },

    /// A received buffer is smaller than its message kind requires.
    SizeValidation {
        msg: u32,
        required: usize,
        actual: usize,
    },

    /// A null handle or pointer reached an entry point that needs one.
    InvalidArgument(&'static str),
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { requested } => {
                write!(f, "scratch allocation of {requested} bytes failed")
            }
            Self::UnsupportedMessage { msg, name } => {
                write!(f, "message {name} ({msg:#06x}) is not supported")
            }
            Self::NotTransferable { msg, name } => {
                write!(f, "message {name} ({msg:#06x}) cannot cross a process boundary")
            }
            Self::SizeValidation {
                msg,
                required,
                actual,
            } => write!(
                f,
                "buffer for message {msg:#06x} too small: {actual} < {required} bytes"
            ),
            Self::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
        }
    }
}

impl std::error::Error for MarshalError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MarshalError>;
