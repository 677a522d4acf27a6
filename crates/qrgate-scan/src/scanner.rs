use crate::session::{Callbacks, SessionInner};
use crate::{
    Decoder, DecodedPayload, DeviceRegistry, FrameSink, RqrrDecoder, ScanError, ScanErrorKind,
    ScannerConfig, ScannerSession, SessionState, interpret,
};
use qrgate_base::Tensor;
use qrgate_camera::{Camera, CameraConfig, CameraProvider};
use std::cell::Cell;
use std::future::pending;
use std::rc::Rc;
use tokio::time::{Instant, sleep_until};

/// Receives every captured frame, for showing a live preview.
pub type PreviewSink = Box<dyn FnMut(&Tensor<u8>)>;

/// What to scan: the camera to claim and, optionally, where to show it.
pub struct ScanTarget {
    camera: CameraConfig,
    preview: Option<PreviewSink>,
}

impl ScanTarget {
    pub fn new(camera: CameraConfig) -> Self {
        Self {
            camera,
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: impl FnMut(&Tensor<u8>) + 'static) -> Self {
        self.preview = Some(Box::new(preview));
        self
    }

    pub fn device(&self) -> &str {
        self.camera.device()
    }
}

/// Starts scan sessions and arbitrates device access between them.
///
/// Runs on a single thread: sessions are driven by `tokio::task::spawn_local`,
/// so `start` must be called inside a `LocalSet`.
pub struct Scanner<P, D = RqrrDecoder> {
    provider: Rc<P>,
    decoder: D,
    config: ScannerConfig,
    registry: DeviceRegistry,
    next_id: Cell<u64>,
}

impl<P> Scanner<P, RqrrDecoder>
where
    P: CameraProvider + 'static,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider: Rc::new(provider),
            decoder: RqrrDecoder,
            config: ScannerConfig::default(),
            registry: DeviceRegistry::new(),
            next_id: Cell::new(1),
        }
    }
}

impl<P, D> Scanner<P, D>
where
    P: CameraProvider + 'static,
    P::Camera: 'static,
    D: Decoder + Clone + 'static,
{
    /// Replace the decoder. Each session gets its own clone.
    pub fn with_decoder<D2: Decoder + Clone + 'static>(self, decoder: D2) -> Scanner<P, D2> {
        Scanner {
            provider: self.provider,
            decoder,
            config: self.config,
            registry: self.registry,
            next_id: self.next_id,
        }
    }

    pub fn with_config(mut self, config: ScannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Whether a live session holds `device`.
    pub fn is_claimed(&self, device: &str) -> bool {
        self.registry.is_claimed(device)
    }

    /// Start scanning `target`.
    ///
    /// The returned session is `Starting`; it becomes `Scanning` on the first
    /// frame. Exactly one of the callbacks runs, at most once, unless the
    /// session is stopped first.
    ///
    /// If another session already holds the device, the new session fails
    /// immediately: `on_error(DeviceUnavailable, ..)` runs before `start`
    /// returns and the existing session is left alone.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub fn start(
        &self,
        target: ScanTarget,
        on_result: impl FnOnce(DecodedPayload) + 'static,
        on_error: impl FnOnce(ScanErrorKind, String) + 'static,
    ) -> ScannerSession {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let ScanTarget { camera, preview } = target;
        let device = camera.device().to_string();
        let callbacks = Callbacks {
            on_result: Box::new(on_result),
            on_error: Box::new(on_error),
        };

        let claim = self.registry.claim(&device);
        let claimed = claim.is_some();
        let inner = Rc::new(SessionInner::new(
            id,
            device.clone(),
            SessionState::Starting,
            claim,
            callbacks,
        ));

        if !claimed {
            inner.fail(ScanError::new(
                ScanErrorKind::DeviceUnavailable,
                format!("{device} is already claimed by another session"),
            ));
            return ScannerSession { inner };
        }

        log::info!("session {id} starting on {device}");
        tokio::task::spawn_local(run_session(
            Rc::clone(&inner),
            Rc::clone(&self.provider),
            self.decoder.clone(),
            camera,
            self.config.clone(),
            preview,
        ));

        ScannerSession { inner }
    }

    /// Same as `session.stop()`.
    pub fn stop(&self, session: &ScannerSession) {
        session.stop();
    }
}

/// The scan loop of one session.
///
/// Every await is raced against the session's wake signal, and the state is
/// re-checked after each one, so a stopped session never delivers.
async fn run_session<P, D>(
    inner: Rc<SessionInner>,
    provider: Rc<P>,
    mut decoder: D,
    camera_config: CameraConfig,
    config: ScannerConfig,
    mut preview: Option<PreviewSink>,
) where
    P: CameraProvider,
    D: Decoder,
{
    let deadline = config.timeout().map(|timeout| Instant::now() + timeout);
    let timeout = async move {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    };
    tokio::pin!(timeout);

    let opened = tokio::select! {
        biased;
        _ = inner.wake.notified() => return,
        _ = &mut timeout => {
            inner.fail(ScanError::new(ScanErrorKind::TimedOut, "camera did not open in time"));
            return;
        }
        opened = provider.open_preferred(&camera_config) => opened,
    };
    if !inner.state().is_active() {
        return;
    }
    let mut camera = match opened {
        Ok(camera) => camera,
        Err(e) => {
            inner.fail(e.into());
            return;
        }
    };

    let mut sink = FrameSink::new(config.width(), config.height());

    loop {
        let received = tokio::select! {
            biased;
            _ = inner.wake.notified() => return,
            _ = &mut timeout => {
                drop(camera);
                inner.fail(ScanError::new(ScanErrorKind::TimedOut, "no code decoded in time"));
                return;
            }
            received = camera.recv() => received,
        };
        if !inner.state().is_active() {
            return;
        }

        let frame = match received {
            Ok(frame) => frame,
            Err(e) if !e.is_terminal() => {
                log::debug!("session {}: dropped frame: {e}", inner.id());
                continue;
            }
            Err(e) => {
                drop(camera);
                inner.fail(e.into());
                return;
            }
        };

        inner.mark_scanning();
        if let Some(preview) = preview.as_mut() {
            preview(&frame);
            // the preview may have stopped the session
            if !inner.state().is_active() {
                return;
            }
        }

        if !sink.snapshot(&frame) {
            continue;
        }
        if let Some(text) = decoder.decode(&sink.view()) {
            drop(camera);
            inner.complete(interpret(&text));
            return;
        }
    }
}
