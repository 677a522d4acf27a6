use qrgate_camera::CameraError;
use std::fmt;

/// Why a session ended without a result.
///
/// The host maps these to user-facing text; the scanner never formats them for users.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanErrorKind {
    PermissionDenied,
    DeviceUnavailable,
    UnsupportedEnvironment,
    TimedOut,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanErrorKind::PermissionDenied => "permission denied",
            ScanErrorKind::DeviceUnavailable => "device unavailable",
            ScanErrorKind::UnsupportedEnvironment => "unsupported environment",
            ScanErrorKind::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// A terminal session error: its kind plus a diagnostic message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub message: String,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ScanError {}

impl From<CameraError> for ScanError {
    fn from(err: CameraError) -> Self {
        let kind = match &err {
            CameraError::PermissionDenied(_) => ScanErrorKind::PermissionDenied,
            CameraError::Unsupported(_) => ScanErrorKind::UnsupportedEnvironment,
            // a closed capture channel means the device went away
            CameraError::DeviceUnavailable(_)
            | CameraError::Channel(_)
            | CameraError::Stream(_)
            | CameraError::Decode(_) => ScanErrorKind::DeviceUnavailable,
        };
        ScanError::new(kind, err.to_string())
    }
}
