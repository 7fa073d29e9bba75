use super::buffer::MessageBuffer;
use std::fmt;

impl fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_message_buffer(self, f)
    }
}
