use qrgate_camera::{CameraConfig, Facing};

#[test]
fn test_config_defaults() {
    let config = CameraConfig::default();

    assert_eq!(config.device(), "/dev/video0");
    assert_eq!(config.width(), 640);
    assert_eq!(config.height(), 480);
    assert_eq!(config.fps(), 30);
    assert_eq!(config.buffer_count(), 4);
    assert_eq!(config.facing(), Facing::Environment);
}

#[test]
fn test_config_builder() {
    let config = CameraConfig::default()
        .with_device("/dev/video2")
        .with_width(300)
        .with_height(300)
        .with_fps(15)
        .with_buffer_count(2)
        .with_facing(Facing::User);

    assert_eq!(config.device(), "/dev/video2");
    assert_eq!(config.width(), 300);
    assert_eq!(config.height(), 300);
    assert_eq!(config.fps(), 15);
    assert_eq!(config.buffer_count(), 2);
    assert_eq!(config.facing(), Facing::User);
}
