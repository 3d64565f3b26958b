//! Filesystem and HTTP helpers shared by the pipeline stages.

pub mod fs;
pub mod http;
