use qrgate_base::Tensor;
use qrgate_camera::{Camera, CameraConfig, CameraError, CameraProvider, Facing};
use std::cell::RefCell;

struct MockCamera {
    frame_count: usize,
}

impl Camera for MockCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        self.frame_count += 1;
        Tensor::image(2, 2, 3, vec![0u8; 12]).map_err(|e| CameraError::Stream(e.to_string()))
    }
}

/// Only has a front camera, and records every facing it was asked for.
struct FrontOnlyProvider {
    requests: RefCell<Vec<Facing>>,
}

impl CameraProvider for FrontOnlyProvider {
    type Camera = MockCamera;

    async fn open(&self, config: &CameraConfig) -> Result<MockCamera, CameraError> {
        self.requests.borrow_mut().push(config.facing());
        match config.facing() {
            Facing::Environment => Err(CameraError::DeviceUnavailable("no rear camera".to_string())),
            _ => Ok(MockCamera { frame_count: 0 }),
        }
    }
}

struct DeniedProvider;

impl CameraProvider for DeniedProvider {
    type Camera = MockCamera;

    async fn open(&self, _config: &CameraConfig) -> Result<MockCamera, CameraError> {
        Err(CameraError::PermissionDenied("user dismissed prompt".to_string()))
    }
}

#[tokio::test]
async fn test_camera_trait_mock_implementation() {
    let mut cam = MockCamera { frame_count: 0 };
    let frame = cam.recv().await.unwrap();
    assert_eq!(frame.shape, vec![2, 2, 3]);
    assert_eq!(cam.frame_count, 1);
}

#[tokio::test]
async fn test_open_preferred_falls_back_to_any() {
    let provider = FrontOnlyProvider {
        requests: RefCell::new(Vec::new()),
    };
    let camera = provider.open_preferred(&CameraConfig::default()).await;
    assert!(camera.is_ok());
    assert_eq!(*provider.requests.borrow(), vec![Facing::Environment, Facing::Any]);
}

#[tokio::test]
async fn test_open_preferred_does_not_retry_any() {
    let provider = FrontOnlyProvider {
        requests: RefCell::new(Vec::new()),
    };
    let config = CameraConfig::default().with_facing(Facing::Any);
    provider.open_preferred(&config).await.unwrap();
    assert_eq!(*provider.requests.borrow(), vec![Facing::Any]);
}

#[tokio::test]
async fn test_open_preferred_keeps_permission_denied() {
    let result = DeniedProvider.open_preferred(&CameraConfig::default()).await;
    assert!(matches!(result, Err(CameraError::PermissionDenied(_))));
}
