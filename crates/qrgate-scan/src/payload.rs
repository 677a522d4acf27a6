//! Interpretation of decoded QR text.
//!
//! [`interpret`] never fails. Text that is not a recognised document comes
//! back as [`Interpretation::Raw`] and the caller decides what to do with it.

use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Discriminator of the ticket voucher document.
pub const TICKET_VOUCHER: &str = "ticket_voucher";

/// Current voucher document version.
pub const VOUCHER_VERSION: &str = "1.0";

static TICKET_CODE_FRAGMENT: OnceLock<Regex> = OnceLock::new();

fn ticket_code_fragment() -> &'static Regex {
    TICKET_CODE_FRAGMENT.get_or_init(|| {
        Regex::new(r#""ticket_code"\s*:\s*"([^"\\]+)""#).expect("ticket_code pattern is valid")
    })
}

/// Decoded text plus its best interpretation. The raw text is always kept.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPayload {
    raw: String,
    interpretation: Interpretation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Interpretation {
    /// A self-describing document with a `type` discriminator.
    Structured(StructuredPayload),
    /// Not a document, but a `"ticket_code":"..."` fragment was found.
    Extracted { ticket_code: String },
    /// Nothing recognisable.
    Raw,
}

/// A JSON object carrying a string `type` field.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredPayload {
    pub kind: String,
    pub ticket_code: Option<String>,
    pub version: Option<String>,
    /// Every other field of the document.
    pub fields: Map<String, Value>,
}

impl StructuredPayload {
    fn from_object(mut fields: Map<String, Value>) -> Option<Self> {
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(other) => {
                // put it back so the document is not silently altered
                fields.insert("type".to_string(), other);
                return None;
            }
            None => return None,
        };
        let ticket_code = fields.remove("ticket_code").and_then(scalar_text);
        let version = fields.remove("version").and_then(scalar_text);
        Some(Self {
            kind,
            ticket_code,
            version,
            fields,
        })
    }

    pub fn is_ticket_voucher(&self) -> bool {
        self.kind == TICKET_VOUCHER
    }

    /// The voucher, if this is a ticket voucher with a non-empty code.
    pub fn as_voucher(&self) -> Option<TicketVoucher> {
        let code = self.ticket_code.as_deref().filter(|code| !code.is_empty())?;
        self.is_ticket_voucher().then(|| TicketVoucher {
            ticket_code: code.to_string(),
            kind: self.kind.clone(),
            version: self.version.clone().unwrap_or_else(|| VOUCHER_VERSION.to_string()),
        })
    }
}

// codes are sometimes emitted as JSON numbers
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl DecodedPayload {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn interpretation(&self) -> &Interpretation {
        &self.interpretation
    }

    pub fn structured(&self) -> Option<&StructuredPayload> {
        match &self.interpretation {
            Interpretation::Structured(doc) => Some(doc),
            _ => None,
        }
    }

    /// The ticket code from either a structured document or an extracted fragment.
    pub fn ticket_code(&self) -> Option<&str> {
        match &self.interpretation {
            Interpretation::Structured(doc) => doc.ticket_code.as_deref(),
            Interpretation::Extracted { ticket_code } => Some(ticket_code),
            Interpretation::Raw => None,
        }
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}

/// Interpret decoded QR text.
///
/// In order:
/// 1. a JSON object with a string `type` field
/// 2. base64 of such an object
/// 3. a `"ticket_code":"..."` fragment anywhere in the text
/// 4. the raw text
pub fn interpret(raw: &str) -> DecodedPayload {
    let interpretation = parse_document(raw)
        .or_else(|| decode_base64_document(raw))
        .map(Interpretation::Structured)
        .or_else(|| {
            ticket_code_fragment()
                .captures(raw)
                .map(|caps| Interpretation::Extracted {
                    ticket_code: caps[1].to_string(),
                })
        })
        .unwrap_or(Interpretation::Raw);

    if matches!(interpretation, Interpretation::Raw) {
        log::debug!("payload not recognised, passing {} bytes through raw", raw.len());
    }

    DecodedPayload {
        raw: raw.to_string(),
        interpretation,
    }
}

fn parse_document(text: &str) -> Option<StructuredPayload> {
    match serde_json::from_str::<Value>(text.trim()).ok()? {
        Value::Object(fields) => StructuredPayload::from_object(fields),
        _ => None,
    }
}

fn decode_base64_document(text: &str) -> Option<StructuredPayload> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .ok()?;
    parse_document(std::str::from_utf8(&bytes).ok()?)
}

/// The document encoded into a ticket voucher's QR code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketVoucher {
    pub ticket_code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl TicketVoucher {
    pub fn new(ticket_code: impl Into<String>) -> Self {
        Self {
            ticket_code: ticket_code.into(),
            kind: TICKET_VOUCHER.to_string(),
            version: VOUCHER_VERSION.to_string(),
        }
    }

    /// JSON text to render into a QR code.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
