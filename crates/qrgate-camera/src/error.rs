use std::fmt;
use std::io::ErrorKind;

#[derive(Debug)]
pub enum CameraError {
    /// The user or the OS refused access to the device.
    PermissionDenied(String),
    /// No such device, or it is already in use.
    DeviceUnavailable(String),
    /// No capture backend for this platform or device.
    Unsupported(String),
    /// A single frame could not be read.
    Stream(String),
    /// A single frame could not be decoded.
    Decode(qrgate_image::ImageError),
    /// The capture thread went away.
    Channel(String),
}

impl CameraError {
    /// Whether the camera is unusable after this error.
    ///
    /// `Stream` and `Decode` only cost one frame.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CameraError::Stream(_) | CameraError::Decode(_))
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied(msg) => write!(f, "permission denied: {msg}"),
            CameraError::DeviceUnavailable(msg) => write!(f, "device unavailable: {msg}"),
            CameraError::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            CameraError::Stream(msg) => write!(f, "stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::PermissionDenied => CameraError::PermissionDenied(err.to_string()),
            ErrorKind::Unsupported => CameraError::Unsupported(err.to_string()),
            _ => CameraError::DeviceUnavailable(err.to_string()),
        }
    }
}

impl From<qrgate_image::ImageError> for CameraError {
    fn from(err: qrgate_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
