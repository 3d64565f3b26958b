//! Configuration structures for bundling operations.
//!
//! This module provides the target platform types and the immutable
//! [`BuildConfig`] that is built once from the command line and passed by
//! reference to every pipeline stage.

mod arch;
mod builder;
mod core;
mod os;

// Re-export all public types
pub use arch::TargetArch;
pub use builder::BuildConfigBuilder;
pub use core::{
    ARCHIVE_PREFIX, BuildConfig, DEFAULT_API_URL, DEFAULT_ARCHIVE_DIR, DEFAULT_BUNDLE_DIR,
    DEFAULT_DOWNLOAD_HOST, DEFAULT_HTTP_TIMEOUT, DIST_SUBDIR, DOCKER_SUBDIR, MANIFEST_FILE,
};
pub use os::{ArchiveFormat, TargetOs};
