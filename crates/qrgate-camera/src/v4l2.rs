use crate::{Camera, CameraConfig, CameraError, CameraProvider};
use qrgate_base::Tensor;
use qrgate_image::yuyv_to_rgb;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, oneshot};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<Tensor<u8>, CameraError>;

/// Pixel format negotiated when the device is opened.
#[derive(Debug, Clone, Copy)]
enum CaptureFormat {
    Mjpeg,
    Yuyv { width: u32, height: u32 },
}

/// V4L2 camera. Frames are read on a dedicated thread and handed over a bounded channel.
///
/// V4L2 has no notion of facing; `config.facing()` is ignored.
pub struct V4l2Camera {
    config: CameraConfig,
    format: CaptureFormat,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("streaming", &self.thread_handle.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("camera already released".to_string()))?;
        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("capture thread exited".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // closing the channel stops the capture thread after its current frame
        drop(self.receiver.take());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device at `config.device()` and start streaming.
    ///
    /// Tries MJPEG at the requested size first and falls back to YUYV.
    /// Resolves once the capture thread has its buffers mapped.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the device node cannot be opened for lack of rights
    /// - `DeviceUnavailable` if it does not exist or is busy
    /// - `Unsupported` if it offers neither MJPEG nor YUYV
    pub async fn open(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;
        let format = Self::negotiate(&device, &config)?;

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        let buffer_count = config.buffer_count().max(1);
        let (tx, rx) = mpsc::channel(buffer_count as usize);
        let (init_tx, init_rx) = oneshot::channel::<Result<(), CameraError>>();

        // the mmap stream is created on the capture thread and must stay there
        let handle = thread::spawn(move || {
            let stream = match MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count) {
                Ok(stream) => {
                    let _ = init_tx.send(Ok(()));
                    stream
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e.into()));
                    return;
                }
            };
            Self::capture_loop(stream, format, tx);
        });

        init_rx
            .await
            .map_err(|_| CameraError::Channel("capture thread died during init".to_string()))??;

        log::info!(
            "opened {} as {:?} at {}x{}",
            config.device(),
            format,
            config.width(),
            config.height()
        );

        Ok(Self {
            config,
            format,
            receiver: Some(rx),
            thread_handle: Some(handle),
        })
    }

    fn negotiate(device: &Device, config: &CameraConfig) -> Result<CaptureFormat, CameraError> {
        let mjpeg = FourCC::new(b"MJPG");
        let requested = Format::new(config.width(), config.height(), mjpeg);
        let actual = Capture::set_format(device, &requested)?;
        if actual.fourcc == mjpeg {
            return Ok(CaptureFormat::Mjpeg);
        }

        let yuyv = FourCC::new(b"YUYV");
        let requested = Format::new(config.width(), config.height(), yuyv);
        let actual = Capture::set_format(device, &requested)?;
        if actual.fourcc == yuyv {
            // the driver may have adjusted the size
            return Ok(CaptureFormat::Yuyv {
                width: actual.width,
                height: actual.height,
            });
        }

        Err(CameraError::Unsupported(format!(
            "{} supports neither MJPEG nor YUYV (got {})",
            config.device(),
            actual.fourcc
        )))
    }

    fn decode(format: CaptureFormat, data: &[u8]) -> FrameResult {
        match format {
            CaptureFormat::Mjpeg => Ok(qrgate_image::decode_image(data)?.into_tensor()),
            CaptureFormat::Yuyv { width, height } => {
                let rgb = yuyv_to_rgb(data, width, height).ok_or_else(|| {
                    CameraError::Stream(format!(
                        "YUYV frame too short: got {} bytes for {}x{}",
                        data.len(),
                        width,
                        height
                    ))
                })?;
                Tensor::image(height as usize, width as usize, 3, rgb)
                    .map_err(|e| CameraError::Stream(e.to_string()))
            }
        }
    }

    fn capture_loop(
        mut stream: MmapStream<'_>,
        format: CaptureFormat,
        tx: mpsc::Sender<FrameResult>,
    ) {
        loop {
            let frame = match CaptureStream::next(&mut stream) {
                Ok((data, _metadata)) => Self::decode(format, data),
                Err(e) => {
                    log::warn!("v4l2 capture failed: {e}");
                    let _ = tx.blocking_send(Err(e.into()));
                    return;
                }
            };
            if tx.blocking_send(frame).is_err() {
                // receiver dropped
                return;
            }
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}

/// Opens `V4l2Camera`s by device path.
#[derive(Clone, Copy, Debug, Default)]
pub struct V4l2Provider;

impl CameraProvider for V4l2Provider {
    type Camera = V4l2Camera;

    async fn open(&self, config: &CameraConfig) -> Result<V4l2Camera, CameraError> {
        V4l2Camera::open(config.clone()).await
    }
}
