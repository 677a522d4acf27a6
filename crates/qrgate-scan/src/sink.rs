use qrgate_base::Tensor;
use qrgate_image::pixel_luma;

/// Borrowed luminance plane, row-major, one byte per pixel.
#[derive(Clone, Copy, Debug)]
pub struct LumaFrame<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl LumaFrame<'_> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}

/// Fixed-size snapshot buffer for one session.
///
/// Frames of any size are resampled (nearest neighbour) into the same
/// `width * height` luminance plane. Buffers are allocated once; only a
/// change of source width resizes the column map.
#[derive(Debug)]
pub struct FrameSink {
    width: usize,
    height: usize,
    luma: Vec<u8>,
    columns: Vec<usize>,
    source_width: usize,
    snapshots: u64,
}

impl FrameSink {
    pub fn new(width: u32, height: u32) -> Self {
        let width = (width as usize).max(1);
        let height = (height as usize).max(1);
        Self {
            width,
            height,
            luma: vec![0; width * height],
            columns: Vec::with_capacity(width),
            source_width: 0,
            snapshots: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames successfully snapshotted.
    pub fn snapshots(&self) -> u64 {
        self.snapshots
    }

    /// Copy `frame` into the buffer.
    ///
    /// Returns `false`, leaving the buffer untouched, when the frame has no
    /// pixels or is not an HWC image with 1 to 4 channels.
    pub fn snapshot(&mut self, frame: &Tensor<u8>) -> bool {
        let Ok((src_h, src_w, channels)) = frame.hwc() else {
            return false;
        };
        if src_h == 0 || src_w == 0 || !(1..=4).contains(&channels) {
            return false;
        }

        if src_w != self.source_width {
            self.columns.clear();
            self.columns
                .extend((0..self.width).map(|x| x * src_w / self.width * channels));
            self.source_width = src_w;
        }

        let row_stride = src_w * channels;
        for (y, row) in self.luma.chunks_exact_mut(self.width).enumerate() {
            let src_row = &frame.data[(y * src_h / self.height) * row_stride..][..row_stride];
            for (out, &offset) in row.iter_mut().zip(&self.columns) {
                *out = pixel_luma(&src_row[offset..offset + channels]).unwrap_or(0);
            }
        }
        self.snapshots += 1;
        true
    }

    pub fn view(&self) -> LumaFrame<'_> {
        LumaFrame {
            width: self.width,
            height: self.height,
            data: &self.luma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsamples_rgb() {
        // 2x4 RGB: left half white, right half black
        let mut data = Vec::new();
        for _ in 0..2 {
            data.extend_from_slice(&[255, 255, 255, 255, 255, 255, 0, 0, 0, 0, 0, 0]);
        }
        let frame = Tensor::image(2, 4, 3, data).unwrap();

        let mut sink = FrameSink::new(2, 1);
        assert!(sink.snapshot(&frame));
        assert_eq!(sink.view().data, &[255, 0]);
    }

    #[test]
    fn test_upsamples_luma() {
        let frame = Tensor::image(1, 2, 1, vec![10, 20]).unwrap();
        let mut sink = FrameSink::new(4, 2);
        assert!(sink.snapshot(&frame));
        assert_eq!(sink.view().data, &[10, 10, 20, 20, 10, 10, 20, 20]);
        assert_eq!(sink.view().get(3, 1), 20);
    }

    #[test]
    fn test_rejects_empty_and_odd_frames() {
        let mut sink = FrameSink::new(4, 4);
        assert!(!sink.snapshot(&Tensor::image(0, 0, 3, vec![]).unwrap()));
        assert!(!sink.snapshot(&Tensor::image(1, 1, 5, vec![0; 5]).unwrap()));
        assert!(!sink.snapshot(&Tensor::new(vec![4], vec![0; 4]).unwrap()));
        assert_eq!(sink.snapshots(), 0);
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut sink = FrameSink::new(8, 8);
        let ptr = sink.view().data.as_ptr();
        for value in [1u8, 2, 3] {
            let frame = Tensor::image(16, 16, 4, vec![value; 16 * 16 * 4]).unwrap();
            assert!(sink.snapshot(&frame));
        }
        assert_eq!(sink.view().data.as_ptr(), ptr);
        assert_eq!(sink.snapshots(), 3);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let sink = FrameSink::new(0, 0);
        assert_eq!((sink.width(), sink.height()), (1, 1));
    }
}
