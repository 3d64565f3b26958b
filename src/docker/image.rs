//! Image references and the image acquisition stage.

use crate::bundler::utils::fs;
use crate::cli::RuntimeConfig;
use crate::error::BundlerError;
use crate::source::LATEST;
use std::fmt;
use std::path::{Path, PathBuf};

use super::engine::ImageEngine;

/// Runtime container image bundled for linux and windows targets.
pub const DAPR_IMAGE_NAME: &str = "daprio/dapr";

/// A container image reference, `name[:tag]`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ImageRef {
    name: String,
    tag: Option<String>,
}

impl ImageRef {
    /// Builds a reference; a version of exactly `latest` leaves the tag
    /// off so the engine applies its own default.
    pub fn new(name: impl Into<String>, version: &str) -> Self {
        Self {
            name: name.into(),
            tag: (version != LATEST).then(|| version.to_string()),
        }
    }

    /// The `daprio/dapr` image at `version`.
    pub fn dapr(version: &str) -> Self {
        Self::new(DAPR_IMAGE_NAME, version)
    }

    /// Repository part of the reference.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Full reference as passed to the engine.
    pub fn reference(&self) -> String {
        match &self.tag {
            Some(tag) => format!("{}:{}", self.name, tag),
            None => self.name.clone(),
        }
    }

    /// Tarball name: `/` and `:` become `-`, plus `.tar.gz`.
    ///
    /// ```
    /// use daprbundle::docker::ImageRef;
    ///
    /// assert_eq!(ImageRef::dapr("1.7.0").file_name(), "daprio-dapr-1.7.0.tar.gz");
    /// ```
    pub fn file_name(&self) -> String {
        format!("{}.tar.gz", self.reference().replace(['/', ':'], "-"))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

/// Pulls `image` and saves it under `dest_dir`.
///
/// Returns the path of the saved tarball.
pub async fn fetch_image<E: ImageEngine>(
    engine: &E,
    image: &ImageRef,
    dest_dir: &Path,
    runtime_config: &RuntimeConfig,
) -> Result<PathBuf, BundlerError> {
    fs::create_dir_all(dest_dir, false).await?;
    engine.check_available().await?;

    runtime_config.progress(&format!("Pulling image {}", image))?;
    engine.pull(image).await?;

    let path = dest_dir.join(image.file_name());
    runtime_config.progress(&format!("Saving image to {}", path.display()))?;
    engine.save(image, &path).await?;

    runtime_config.success(&format!("Saved {}", image))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn latest_omits_tag() {
        let image = ImageRef::dapr("latest");
        assert_eq!(image.tag(), None);
        assert_eq!(image.reference(), "daprio/dapr");
        assert_eq!(image.file_name(), "daprio-dapr.tar.gz");
    }

    #[test]
    fn versioned_reference() {
        let image = ImageRef::dapr("1.7.0");
        assert_eq!(image.reference(), "daprio/dapr:1.7.0");
        assert_eq!(image.to_string(), "daprio/dapr:1.7.0");
        assert_eq!(image.file_name(), "daprio-dapr-1.7.0.tar.gz");
    }

    proptest! {
        #[test]
        fn file_name_has_no_separators(
            name in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,2}",
            version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}(-rc\\.[0-9])?",
        ) {
            let file = ImageRef::new(name, &version).file_name();
            prop_assert!(!file.contains('/'));
            prop_assert!(!file.contains(':'));
            prop_assert!(file.ends_with(".tar.gz"));
            let expected_suffix = format!("-{}.tar.gz", version);
            prop_assert!(file.ends_with(&expected_suffix));
        }
    }
}
