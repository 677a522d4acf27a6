use qrgate_camera::CameraError;
use qrgate_image::ImageError;
use std::io;

#[test]
fn test_io_permission_denied() {
    let err: CameraError = io::Error::new(io::ErrorKind::PermissionDenied, "EACCES").into();
    assert!(matches!(err, CameraError::PermissionDenied(ref msg) if msg.contains("EACCES")));
}

#[test]
fn test_io_not_found_is_unavailable() {
    let err: CameraError = io::Error::new(io::ErrorKind::NotFound, "no /dev/video9").into();
    assert!(matches!(err, CameraError::DeviceUnavailable(_)));
}

#[test]
fn test_io_busy_is_unavailable() {
    let err: CameraError = io::Error::from_raw_os_error(16).into();
    assert!(matches!(err, CameraError::DeviceUnavailable(_)));
}

#[test]
fn test_io_unsupported() {
    let err: CameraError = io::Error::new(io::ErrorKind::Unsupported, "no capture api").into();
    assert!(matches!(err, CameraError::Unsupported(_)));
}

#[test]
fn test_from_image_error() {
    let err: CameraError = ImageError::Decode("truncated JPEG".to_string()).into();
    assert!(matches!(err, CameraError::Decode(_)));
    assert!(!err.is_terminal());
}

#[test]
fn test_terminal_classification() {
    assert!(CameraError::PermissionDenied(String::new()).is_terminal());
    assert!(CameraError::DeviceUnavailable(String::new()).is_terminal());
    assert!(CameraError::Unsupported(String::new()).is_terminal());
    assert!(CameraError::Channel(String::new()).is_terminal());
    assert!(!CameraError::Stream(String::new()).is_terminal());
}

#[test]
fn test_error_display() {
    assert_eq!(
        CameraError::DeviceUnavailable("in use".to_string()).to_string(),
        "device unavailable: in use"
    );
    assert!(CameraError::Stream("short frame".to_string()).to_string().contains("short frame"));
}
