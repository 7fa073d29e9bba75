use super::{DispatchParams, Marshaler};
use std::fmt;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for DispatchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_dispatch_params(self, f)
    }
}

impl fmt::Debug for Marshaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_marshaler(self, f)
    }
}
