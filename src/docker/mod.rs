//! Container image acquisition.
//!
//! The runtime image is pulled and saved through an [`ImageEngine`], a
//! small port over the container engine. [`DockerEngine`] drives the
//! `docker` CLI; tests substitute a recording fake.
//!
//! # Module Structure
//!
//! - `availability` - docker binary lookup and daemon check
//! - `config` - timeouts and help text
//! - `engine` - the [`ImageEngine`] trait and [`DockerEngine`]
//! - `image` - [`ImageRef`] naming and [`fetch_image`]

mod availability;
mod config;
mod engine;
mod image;

pub use availability::{DOCKER_BINARY, check_docker_available};
pub use config::{DOCKER_INFO_TIMEOUT, DOCKER_PULL_TIMEOUT, DOCKER_SAVE_TIMEOUT};
pub use engine::{DockerEngine, ImageEngine};
pub use image::{DAPR_IMAGE_NAME, ImageRef, fetch_image};
