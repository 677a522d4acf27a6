use crate::{Camera, CameraConfig, CameraError, CameraProvider};
use qrgate_base::Tensor;
use std::path::PathBuf;
use std::time::Duration;

/// A camera that replays a fixed set of frames in a loop.
///
/// Frames are paced at the configured fps; an fps of 0 yields to the
/// scheduler between frames instead of sleeping.
#[derive(Debug)]
pub struct StillCamera {
    frames: Vec<Tensor<u8>>,
    next: usize,
    pace: Option<Duration>,
}

impl StillCamera {
    /// Frames must be HWC images with 1 to 4 channels.
    pub fn new(frames: Vec<Tensor<u8>>, fps: u32) -> Result<Self, CameraError> {
        if frames.is_empty() {
            return Err(CameraError::DeviceUnavailable("no frames to replay".to_string()));
        }
        // reject anything the scanner could not read as an image
        let frames = frames
            .into_iter()
            .map(|frame| Ok(qrgate_image::from_tensor(frame)?.into_tensor()))
            .collect::<Result<Vec<_>, CameraError>>()?;
        let pace = (fps > 0).then(|| Duration::from_secs(1) / fps);
        Ok(Self {
            frames,
            next: 0,
            pace,
        })
    }

    /// Number of frames handed out so far.
    pub fn delivered(&self) -> usize {
        self.next
    }
}

impl Camera for StillCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        match self.pace {
            Some(pace) => tokio::time::sleep(pace).await,
            None => tokio::task::yield_now().await,
        }
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next += 1;
        Ok(frame)
    }
}

/// Opens `StillCamera`s that replay image files.
///
/// Every open reloads the files, so edits between sessions are picked up.
#[derive(Clone, Debug)]
pub struct StillProvider {
    paths: Vec<PathBuf>,
}

impl StillProvider {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl CameraProvider for StillProvider {
    type Camera = StillCamera;

    async fn open(&self, config: &CameraConfig) -> Result<StillCamera, CameraError> {
        let mut frames = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let image = qrgate_image::load_image(path).map_err(|e| match e {
                qrgate_image::ImageError::Io(msg) => {
                    CameraError::DeviceUnavailable(format!("{}: {msg}", path.display()))
                }
                other => CameraError::Decode(other),
            })?;
            log::debug!("loaded still frame {} ({}x{})", path.display(), image.width(), image.height());
            frames.push(image.into_tensor());
        }
        StillCamera::new(frames, config.fps())
    }
}
