use qrgate_base::Tensor;

/// Pixel layout of a decoded 8-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Luma => 1,
            PixelLayout::LumaAlpha => 2,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(PixelLayout::Luma),
            2 => Some(PixelLayout::LumaAlpha),
            3 => Some(PixelLayout::Rgb),
            4 => Some(PixelLayout::Rgba),
            _ => None,
        }
    }
}

/// An 8-bit image in HWC layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub layout: PixelLayout,
    pub pixels: Tensor<u8>,
}

impl DecodedImage {
    pub fn height(&self) -> usize {
        self.pixels.shape[0]
    }

    pub fn width(&self) -> usize {
        self.pixels.shape[1]
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn into_tensor(self) -> Tensor<u8> {
        self.pixels
    }
}
