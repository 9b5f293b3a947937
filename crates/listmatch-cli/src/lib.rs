//! Library half of the `listmatch` binary: logging setup and rendering.

pub mod logging;
pub mod render;
