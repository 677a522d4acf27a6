use crate::{CameraConfig, CameraError, Facing};
use qrgate_base::Tensor;

/// Async camera trait for frame capture.
///
/// `recv` returns the next frame as a `Tensor<u8>` in HWC layout
/// `[height, width, channels]`. Awaiting it is the frame clock: it resolves
/// once per captured frame.
#[allow(async_fn_in_trait)]
pub trait Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError>;
}

/// Acquires exclusive access to a camera.
///
/// Dropping the returned camera releases the device.
#[allow(async_fn_in_trait)]
pub trait CameraProvider {
    type Camera: Camera;

    async fn open(&self, config: &CameraConfig) -> Result<Self::Camera, CameraError>;

    /// Open with the configured facing, falling back to any camera when no
    /// device faces that way.
    async fn open_preferred(&self, config: &CameraConfig) -> Result<Self::Camera, CameraError> {
        match self.open(config).await {
            Err(CameraError::DeviceUnavailable(msg)) if config.facing() != Facing::Any => {
                log::debug!("no {:?} camera ({msg}), trying any camera", config.facing());
                self.open(&config.clone().with_facing(Facing::Any)).await
            }
            other => other,
        }
    }
}
