use crate::LumaFrame;

/// Extracts the text of a 2D barcode from a luminance snapshot.
///
/// `None` means no code was found in this frame, which is the normal case
/// while the user is still aiming the camera.
pub trait Decoder {
    fn decode(&mut self, frame: &LumaFrame<'_>) -> Option<String>;
}

impl<F> Decoder for F
where
    F: FnMut(&LumaFrame<'_>) -> Option<String>,
{
    fn decode(&mut self, frame: &LumaFrame<'_>) -> Option<String> {
        self(frame)
    }
}

/// QR decoder backed by `rqrr`.
///
/// When a frame holds several codes, the first grid that decodes wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct RqrrDecoder;

impl Decoder for RqrrDecoder {
    fn decode(&mut self, frame: &LumaFrame<'_>) -> Option<String> {
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(frame.width, frame.height, |x, y| {
                frame.get(x, y)
            });
        prepared
            .detect_grids()
            .into_iter()
            .find_map(|grid| match grid.decode() {
                Ok((_meta, content)) => {
                    log::debug!("decoded QR code ({} bytes)", content.len());
                    Some(content)
                }
                Err(e) => {
                    log::trace!("grid found but not decodable: {e:?}");
                    None
                }
            })
    }
}
