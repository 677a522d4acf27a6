//! Camera acquisition for the qrgate scanner.
//!
//! `CameraProvider` claims a device and returns a `Camera`, whose async
//! `recv` yields frames. Backends: `StillCamera` (replayed images, always
//! available) and `V4l2Camera` (feature `v4l2`).

pub mod config;
pub mod error;
pub mod still;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CameraConfig, Facing};
pub use error::CameraError;
pub use still::{StillCamera, StillProvider};
pub use traits::{Camera, CameraProvider};

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Camera, V4l2Provider};
