use qrcode::{Color, QrCode};
use qrgate_base::Tensor;
use qrgate_camera::{CameraConfig, CameraError, CameraProvider, StillCamera};
use qrgate_scan::{
    Decoder, FrameSink, RqrrDecoder, ScanTarget, Scanner, SessionState, TicketVoucher, interpret,
};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::task::LocalSet;

const QUIET_ZONE: usize = 4;

/// Render `text` as a QR code centred on a white `height x width` RGB frame.
fn qr_frame(text: &str, height: usize, width: usize) -> Tensor<u8> {
    let code = QrCode::new(text.as_bytes()).unwrap();
    let modules = code.width();
    let colors = code.to_colors();
    let scale = height.min(width) / (modules + 2 * QUIET_ZONE);
    assert!(scale >= 2, "frame too small for the code");
    let left = (width - modules * scale) / 2;
    let top = (height - modules * scale) / 2;

    let mut data = vec![255u8; height * width * 3];
    for y in 0..modules * scale {
        for x in 0..modules * scale {
            if colors[(y / scale) * modules + x / scale] == Color::Dark {
                let offset = ((top + y) * width + left + x) * 3;
                data[offset..offset + 3].fill(0);
            }
        }
    }
    Tensor::image(height, width, 3, data).unwrap()
}

fn voucher_json() -> String {
    TicketVoucher::new("ABC123").to_json().unwrap()
}

#[test]
fn test_decodes_voucher_at_camera_resolutions() {
    let json = voucher_json();
    for (height, width) in [(480, 640), (720, 1280), (300, 300)] {
        let mut sink = FrameSink::new(640, 480);
        assert!(sink.snapshot(&qr_frame(&json, height, width)));

        let text = RqrrDecoder.decode(&sink.view());
        assert_eq!(text.as_deref(), Some(json.as_str()), "{width}x{height}");

        let payload = interpret(&text.unwrap());
        assert_eq!(payload.ticket_code(), Some("ABC123"));
        assert!(payload.structured().is_some_and(|doc| doc.is_ticket_voucher()));
    }
}

#[test]
fn test_decodes_plain_text_code() {
    let mut sink = FrameSink::new(640, 480);
    assert!(sink.snapshot(&qr_frame("https://example.com/t/42", 480, 640)));
    assert_eq!(
        RqrrDecoder.decode(&sink.view()).as_deref(),
        Some("https://example.com/t/42")
    );
}

/// Hands out a `StillCamera` replaying fixed frames.
struct FrameProvider {
    frames: Vec<Tensor<u8>>,
}

impl CameraProvider for FrameProvider {
    type Camera = StillCamera;

    async fn open(&self, _config: &CameraConfig) -> Result<StillCamera, CameraError> {
        StillCamera::new(self.frames.clone(), 0)
    }
}

#[tokio::test]
async fn test_scanner_decodes_real_code() {
    LocalSet::new()
        .run_until(async {
            let blank = Tensor::image(480, 640, 3, vec![255u8; 480 * 640 * 3]).unwrap();
            let provider = FrameProvider {
                frames: vec![blank, qr_frame(&voucher_json(), 480, 640)],
            };
            let scanner = Scanner::new(provider);
            let code = Rc::new(RefCell::new(None));
            let sink = Rc::clone(&code);

            let session = scanner.start(
                ScanTarget::new(CameraConfig::default()),
                move |payload| *sink.borrow_mut() = payload.ticket_code().map(str::to_string),
                |kind, message| panic!("unexpected {kind}: {message}"),
            );
            for _ in 0..16 {
                tokio::task::yield_now().await;
            }

            assert_eq!(code.borrow().as_deref(), Some("ABC123"));
            assert_eq!(session.state(), SessionState::Stopped);
            assert!(!scanner.is_claimed(CameraConfig::default().device()));
        })
        .await;
}
