use crate::{DecodedPayload, DeviceClaim, ScanError, ScanErrorKind};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tokio::sync::Notify;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Never started.
    Idle,
    /// Waiting for the camera to open and deliver a first frame.
    Starting,
    Scanning,
    /// Ended by `stop` or by a successful decode.
    Stopped,
    Failed,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Scanning)
    }
}

pub(crate) type ResultCallback = Box<dyn FnOnce(DecodedPayload)>;
pub(crate) type ErrorCallback = Box<dyn FnOnce(ScanErrorKind, String)>;

/// Both callbacks live together so that taking them is the one-shot gate
/// for delivering any outcome.
pub(crate) struct Callbacks {
    pub on_result: ResultCallback,
    pub on_error: ErrorCallback,
}

pub(crate) struct SessionInner {
    id: u64,
    device: String,
    state: Cell<SessionState>,
    claim: RefCell<Option<DeviceClaim>>,
    callbacks: RefCell<Option<Callbacks>>,
    pub(crate) wake: Notify,
}

impl SessionInner {
    pub(crate) fn new(
        id: u64,
        device: String,
        state: SessionState,
        claim: Option<DeviceClaim>,
        callbacks: Callbacks,
    ) -> Self {
        Self {
            id,
            device,
            state: Cell::new(state),
            claim: RefCell::new(claim),
            callbacks: RefCell::new(Some(callbacks)),
            wake: Notify::new(),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state.get()
    }

    pub(crate) fn mark_scanning(&self) {
        if self.state.get() == SessionState::Starting {
            self.state.set(SessionState::Scanning);
            log::info!("session {} scanning on {}", self.id, self.device);
        }
    }

    /// Move to a terminal state and release the device.
    ///
    /// Returns the callbacks on the first call only; later calls are no-ops.
    fn finish(&self, state: SessionState) -> Option<Callbacks> {
        if !self.state.get().is_active() {
            return None;
        }
        self.state.set(state);
        drop(self.claim.borrow_mut().take());
        self.wake.notify_one();
        self.callbacks.borrow_mut().take()
    }

    pub(crate) fn stop(&self) {
        if self.finish(SessionState::Stopped).is_some() {
            log::info!("session {} stopped", self.id);
        }
    }

    pub(crate) fn complete(&self, payload: DecodedPayload) {
        if let Some(callbacks) = self.finish(SessionState::Stopped) {
            log::info!("session {} decoded a code on {}", self.id, self.device);
            (callbacks.on_result)(payload);
        }
    }

    pub(crate) fn fail(&self, error: ScanError) {
        if let Some(callbacks) = self.finish(SessionState::Failed) {
            log::warn!("session {} failed on {}: {}", self.id, self.device, error);
            (callbacks.on_error)(error.kind, error.message);
        }
    }
}

/// Handle to one scan attempt.
///
/// Cloning the handle does not start another scan; all clones refer to the
/// same session.
#[derive(Clone)]
pub struct ScannerSession {
    pub(crate) inner: Rc<SessionInner>,
}

impl ScannerSession {
    /// A session that was never started. Stopping it does nothing.
    pub fn idle(device: impl Into<String>) -> Self {
        let callbacks = Callbacks {
            on_result: Box::new(|_| {}),
            on_error: Box::new(|_, _| {}),
        };
        Self {
            inner: Rc::new(SessionInner::new(
                0,
                device.into(),
                SessionState::Idle,
                None,
                callbacks,
            )),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn device(&self) -> &str {
        &self.inner.device
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Stop scanning and release the device.
    ///
    /// Idempotent, and safe to call from inside `on_result`/`on_error`. No
    /// callback of this session runs after `stop` returns. The camera itself
    /// is closed when the scan task next wakes.
    pub fn stop(&self) {
        self.inner.stop();
    }
}

impl fmt::Debug for ScannerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerSession")
            .field("id", &self.inner.id)
            .field("device", &self.inner.device)
            .field("state", &self.inner.state())
            .finish()
    }
}
