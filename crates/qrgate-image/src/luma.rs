/// BT.601 luma of one RGB pixel, in integer arithmetic.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Luminance of the pixel starting at `px`, for 1 to 4 interleaved channels.
///
/// Alpha is ignored. Returns `None` for other channel counts.
#[inline]
pub fn pixel_luma(px: &[u8]) -> Option<u8> {
    match *px {
        [y] | [y, _] => Some(y),
        [r, g, b] | [r, g, b, _] => Some(luma(r, g, b)),
        _ => None,
    }
}

/// Converts YUYV (YUV 4:2:2) data to packed RGB using BT.601 coefficients.
///
/// Each 4-byte group `[Y0, U, Y1, V]` covers two pixels. Returns `None` if
/// `data` is shorter than `width * height * 2` bytes.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let pixel_count = (width as usize) * (height as usize);
    let expected = pixel_count * 2;
    if data.len() < expected {
        return None;
    }

    let convert = |y: f32, u: f32, v: f32| {
        [
            (y + 1.402 * (v - 128.0)).clamp(0.0, 255.0) as u8,
            (y - 0.344 * (u - 128.0) - 0.714 * (v - 128.0)).clamp(0.0, 255.0) as u8,
            (y + 1.772 * (u - 128.0)).clamp(0.0, 255.0) as u8,
        ]
    };

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data[..expected].chunks_exact(4) {
        let (u, v) = (chunk[1] as f32, chunk[3] as f32);
        rgb.extend_from_slice(&convert(chunk[0] as f32, u, v));
        rgb.extend_from_slice(&convert(chunk[2] as f32, u, v));
    }
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
    }

    #[test]
    fn test_pixel_luma_ignores_alpha() {
        assert_eq!(pixel_luma(&[10, 0]), Some(10));
        assert_eq!(pixel_luma(&[255, 255, 255, 0]), Some(255));
        assert_eq!(pixel_luma(&[1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn test_yuyv_neutral_chroma_is_grey() {
        let rgb = yuyv_to_rgb(&[100, 128, 200, 128], 2, 1).unwrap();
        assert_eq!(rgb, vec![100, 100, 100, 200, 200, 200]);
    }

    #[test]
    fn test_yuyv_short_buffer() {
        assert!(yuyv_to_rgb(&[0; 7], 2, 2).is_none());
    }
}
