use qrgate_base::log;
use qrgate_camera::{CameraConfig, CameraProvider, StillProvider};
use qrgate_scan::{
    DecodedPayload, Interpretation, ScanErrorKind, ScanTarget, Scanner, ScannerConfig,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::LocalSet;

const DEFAULT_DEVICE: &str = "/dev/video0";
const TIMEOUT_SECS: u64 = 60;

type Outcome = Result<DecodedPayload, (ScanErrorKind, String)>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    qrgate_base::init_stdout_logger();

    // Device path, or image files to replay
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ScannerConfig::default().with_timeout(Duration::from_secs(TIMEOUT_SECS));

    log::info!("Ticket Scanner");

    let outcome = if args.is_empty() || args[0].starts_with("/dev/") {
        let device = args.first().map(String::as_str).unwrap_or(DEFAULT_DEVICE);
        scan_device(device, config).await
    } else {
        log::info!("Replaying {} image(s)", args.len());
        let camera = CameraConfig::default().with_device("still").with_fps(10);
        scan(StillProvider::new(&args), camera, config).await
    };

    match outcome {
        Ok(payload) => {
            report(&payload);
            Ok(())
        }
        Err((kind, message)) => {
            log::error!("{kind}: {message}");
            Err(format!("scan failed: {kind}").into())
        }
    }
}

#[cfg(feature = "v4l2")]
async fn scan_device(device: &str, config: ScannerConfig) -> Outcome {
    log::info!("Opening {device}");
    let camera = CameraConfig::default().with_device(device);
    scan(qrgate_camera::V4l2Provider, camera, config).await
}

#[cfg(not(feature = "v4l2"))]
async fn scan_device(device: &str, _config: ScannerConfig) -> Outcome {
    Err((
        ScanErrorKind::UnsupportedEnvironment,
        format!("cannot open {device}: built without the v4l2 feature"),
    ))
}

/// Run one session to completion.
async fn scan<P>(provider: P, camera: CameraConfig, config: ScannerConfig) -> Outcome
where
    P: CameraProvider + 'static,
    P::Camera: 'static,
{
    let (tx, rx) = oneshot::channel::<Outcome>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let on_error_tx = Rc::clone(&tx);

    let local = LocalSet::new();
    local
        .run_until(async move {
            let scanner = Scanner::new(provider).with_config(config);
            let session = scanner.start(
                ScanTarget::new(camera),
                move |payload| {
                    if let Some(tx) = tx.borrow_mut().take() {
                        let _ = tx.send(Ok(payload));
                    }
                },
                move |kind, message| {
                    if let Some(tx) = on_error_tx.borrow_mut().take() {
                        let _ = tx.send(Err((kind, message)));
                    }
                },
            );
            log::info!("Session {} scanning {}", session.id(), session.device());

            rx.await.unwrap_or_else(|_| {
                Err((
                    ScanErrorKind::DeviceUnavailable,
                    "session ended without an outcome".to_string(),
                ))
            })
        })
        .await
}

fn report(payload: &DecodedPayload) {
    match payload.interpretation() {
        Interpretation::Structured(doc) => {
            println!("type: {}", doc.kind);
            if let Some(voucher) = doc.as_voucher() {
                println!("ticket_code: {}", voucher.ticket_code);
                println!("version: {}", voucher.version);
            }
            for (key, value) in &doc.fields {
                println!("{key}: {value}");
            }
        }
        Interpretation::Extracted { ticket_code } => println!("ticket_code: {ticket_code}"),
        Interpretation::Raw => println!("{}", payload.raw()),
    }
}
