//! Image decoding for camera frames and still images.
//!
//! Wraps the `image` crate and produces 8-bit `Tensor<u8>` frames from
//! `qrgate-base` in HWC layout: `[height, width, channels]`.

pub mod error;
pub mod luma;
pub mod types;

pub use error::ImageError;
pub use luma::{luma, pixel_luma, yuyv_to_rgb};
pub use types::{DecodedImage, PixelLayout};

use image::DynamicImage;
use qrgate_base::Tensor;
use std::path::Path;

/// Decodes an encoded image (JPEG, PNG, ...) from memory.
///
/// 8-bit grey, grey-alpha, RGB and RGBA keep their layout. Deeper or
/// floating-point images are reduced to 8-bit RGBA, which is all the QR
/// decoder needs.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_image(data: &[u8]) -> Result<DecodedImage, ImageError> {
    from_dynamic(image::load_from_memory(data)?)
}

/// Reads and decodes an image file.
pub fn load_image(path: impl AsRef<Path>) -> Result<DecodedImage, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}

fn from_dynamic(img: DynamicImage) -> Result<DecodedImage, ImageError> {
    let (layout, width, height, raw) = match img {
        DynamicImage::ImageLuma8(buf) => (PixelLayout::Luma, buf.width(), buf.height(), buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (PixelLayout::LumaAlpha, buf.width(), buf.height(), buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (PixelLayout::Rgb, buf.width(), buf.height(), buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (PixelLayout::Rgba, buf.width(), buf.height(), buf.into_raw()),
        other => {
            let rgba = other.to_rgba8();
            (PixelLayout::Rgba, rgba.width(), rgba.height(), rgba.into_raw())
        }
    };
    let pixels = Tensor::image(height as usize, width as usize, layout.channels(), raw)?;
    Ok(DecodedImage { layout, pixels })
}

/// Wraps an HWC tensor as a `DecodedImage`, validating its channel count.
pub fn from_tensor(pixels: Tensor<u8>) -> Result<DecodedImage, ImageError> {
    let (_, _, channels) = pixels.hwc()?;
    let layout = PixelLayout::from_channels(channels).ok_or(ImageError::UnsupportedChannels(channels))?;
    Ok(DecodedImage { layout, pixels })
}
