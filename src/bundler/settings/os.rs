//! Target operating system and its archive format.

use std::fmt;

/// Operating system the bundle is built for.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// Windows; binaries ship as `.zip`
    Windows,
    /// Linux
    Linux,
    /// macOS; no container image is bundled
    Darwin,
}

impl TargetOs {
    /// Every supported operating system.
    pub const ALL: [TargetOs; 3] = [TargetOs::Windows, TargetOs::Linux, TargetOs::Darwin];

    /// Name as it appears in release asset file names.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetOs::Windows => "windows",
            TargetOs::Linux => "linux",
            TargetOs::Darwin => "darwin",
        }
    }

    /// Archive format used for both downloaded assets and the final bundle.
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            TargetOs::Windows => ArchiveFormat::Zip,
            _ => ArchiveFormat::TarGz,
        }
    }

    /// Whether the container image stage runs for this target.
    pub fn bundles_container_image(self) -> bool {
        self != TargetOs::Darwin
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compressed archive format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArchiveFormat {
    /// Deflate-compressed zip
    Zip,
    /// Gzip-compressed tar
    TarGz,
}

impl ArchiveFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn only_windows_packages_as_zip() {
        for os in TargetOs::ALL {
            let expected = if os == TargetOs::Windows {
                ArchiveFormat::Zip
            } else {
                ArchiveFormat::TarGz
            };
            assert_eq!(os.archive_format(), expected, "{os}");
        }
    }

    #[test]
    fn darwin_skips_container_image() {
        assert!(!TargetOs::Darwin.bundles_container_image());
        assert!(TargetOs::Linux.bundles_container_image());
        assert!(TargetOs::Windows.bundles_container_image());
    }

    #[test]
    fn rejects_unknown_os() {
        assert!(TargetOs::from_str("solaris", false).is_err());
        assert_eq!(TargetOs::from_str("darwin", false), Ok(TargetOs::Darwin));
    }
}
