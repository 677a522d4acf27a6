//! Continuous QR scanning over a live camera.
//!
//! A [`Scanner`] starts [`ScannerSession`]s. Each session claims one capture
//! device, pulls frames until a code decodes, then hands the
//! [`DecodedPayload`] to `on_result` and releases the device. Failures go to
//! `on_error` as a [`ScanErrorKind`] plus a diagnostic message.
//!
//! Sessions run on the current thread inside a `tokio::task::LocalSet`.

pub mod config;
pub mod decoder;
pub mod error;
pub mod payload;
pub mod registry;
pub mod scanner;
pub mod session;
pub mod sink;

pub use config::ScannerConfig;
pub use decoder::{Decoder, RqrrDecoder};
pub use error::{ScanError, ScanErrorKind};
pub use payload::{
    DecodedPayload, Interpretation, StructuredPayload, TICKET_VOUCHER, TicketVoucher,
    VOUCHER_VERSION, interpret,
};
pub use registry::{DeviceClaim, DeviceRegistry};
pub use scanner::{PreviewSink, ScanTarget, Scanner};
pub use session::{ScannerSession, SessionState};
pub use sink::{FrameSink, LumaFrame};
