//! Library side of the `intake` binary: input decoding and logging setup.

pub mod input;
pub mod logging;
