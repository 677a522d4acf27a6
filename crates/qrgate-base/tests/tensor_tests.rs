use qrgate_base::{Tensor, TensorError};

#[test]
fn test_image_tensor_dimensions() {
    let frame = Tensor::image(2, 3, 4, vec![0u8; 24]).unwrap();
    assert_eq!(frame.shape, vec![2, 3, 4]);
    assert_eq!(frame.hwc().unwrap(), (2, 3, 4));
}

#[test]
fn test_hwc_rejects_flat_tensor() {
    let flat = Tensor::new(vec![6], vec![0u8; 6]).unwrap();
    assert_eq!(flat.hwc(), Err(TensorError::NotAnImage { ndim: 1 }));
}

#[test]
fn test_shape_mismatch() {
    let result = Tensor::image(480, 640, 3, vec![0u8; 10]);
    assert_eq!(
        result,
        Err(TensorError::ShapeMismatch {
            expected: 480 * 640 * 3,
            got: 10
        })
    );
}

#[test]
fn test_shape_overflow() {
    let result = Tensor::<u8>::new(vec![usize::MAX, 2], vec![]);
    assert!(matches!(result, Err(TensorError::ShapeOverflow)));
}

#[test]
fn test_zeros_allocates_full_frame() {
    let frame = Tensor::<u8>::zeros(vec![480, 640, 1]).unwrap();
    assert_eq!(frame.len(), 480 * 640);
    assert!(frame.data.iter().all(|&v| v == 0));
}

#[test]
fn test_empty_frame() {
    let frame = Tensor::<u8>::image(0, 0, 3, vec![]).unwrap();
    assert!(frame.is_empty());
    assert_eq!(frame.ndim(), 3);
}

#[test]
fn test_debug_omits_pixels() {
    let frame = Tensor::image(1, 2, 1, vec![7u8, 9]).unwrap();
    let debug = format!("{frame:?}");
    assert!(debug.contains("shape"));
    assert!(debug.contains("len: 2"));
    assert!(!debug.contains("data"));
}
