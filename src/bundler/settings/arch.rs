//! CPU architecture types and utilities.

use std::fmt;

/// CPU architecture of the bundled binaries.
///
/// Names follow the Go toolchain convention used in release asset names
/// (`daprd_linux_arm64.tar.gz`), not Rust target triples.
///
/// # Examples
///
/// ```
/// use daprbundle::TargetArch;
///
/// assert_eq!(TargetArch::Arm64.as_str(), "arm64");
/// ```
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    /// x86_64 / AMD64 (64-bit)
    Amd64,
    /// 32-bit ARM with hard-float (Raspberry Pi and embedded ARM)
    Arm,
    /// AArch64 / ARM64 (64-bit)
    Arm64,
}

impl TargetArch {
    /// Every supported architecture.
    pub const ALL: [TargetArch; 3] = [TargetArch::Amd64, TargetArch::Arm, TargetArch::Arm64];

    /// Name as it appears in release asset file names.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetArch::Amd64 => "amd64",
            TargetArch::Arm => "arm",
            TargetArch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
