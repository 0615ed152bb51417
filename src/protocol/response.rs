//! Inbound response registry and decoding.
//!
//! Every response the terminal can produce is a closed enum variant carrying
//! its wire code, declared field names, and CRC flag. Decoding destructures a
//! raw frame into a [`ParsedResponse`]; a code missing from the registry is an
//! explicit error, never a panic.

use super::{ACK, CR, CRC_LEN, FIELD_SEP, NAK};
use crate::core::{Error, Result};

/// Responses the payment terminal can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Command acknowledged
    Ack,
    /// Command not acknowledged
    Nak,
    /// Nothing to report; idle with a network connection
    Idle,
    /// Terminal is processing a previous command
    Busy,
    /// Card authorization successful
    AuthApproved,
    /// Bank declined the authorization
    AuthDeclined,
    /// Session timed out
    SessionTimeout,
    /// Terminal is initializing its network connection
    Initializing,
    /// Terminal is in the disabled state
    Disabled,
    /// Terminal is waiting for a card swipe
    ExpectingSwipe,
    /// Terminal is authorizing the card
    Authorizing,
    /// Terminal is waiting for the kiosk's transaction result
    ExpectingResult,
    /// Terminal received a bad or out-of-sequence command
    InvalidCommand,
    /// A file is available on the server for download
    FileAvailable,
    /// Terminal is ready to receive a file record
    ExpectingRecordUpload,
    /// File transfer cancelled
    CancelFileTransfer,
    /// Modem signal quality report
    SignalQuality,
    /// Current GMT and local time
    TimeAndDate,
    /// Terminal configuration report
    TerminalConfig,
    /// Current credit transaction id
    TransactionId,
    /// Cardholder pressed the card reader button
    EndButtonPressed,
    /// Provider network error
    NetworkFailure,
    /// Terminal modem failure
    ModemFailure,
    /// Server failure
    ServerFailure,
    /// Terminal not time-synchronized with its server
    TimeRequestFailure,
}

impl ResponseKind {
    /// All responses, in registry order
    pub const ALL: [ResponseKind; 25] = [
        ResponseKind::Ack,
        ResponseKind::Nak,
        ResponseKind::Idle,
        ResponseKind::Busy,
        ResponseKind::AuthApproved,
        ResponseKind::AuthDeclined,
        ResponseKind::SessionTimeout,
        ResponseKind::Initializing,
        ResponseKind::Disabled,
        ResponseKind::ExpectingSwipe,
        ResponseKind::Authorizing,
        ResponseKind::ExpectingResult,
        ResponseKind::InvalidCommand,
        ResponseKind::FileAvailable,
        ResponseKind::ExpectingRecordUpload,
        ResponseKind::CancelFileTransfer,
        ResponseKind::SignalQuality,
        ResponseKind::TimeAndDate,
        ResponseKind::TerminalConfig,
        ResponseKind::TransactionId,
        ResponseKind::EndButtonPressed,
        ResponseKind::NetworkFailure,
        ResponseKind::ModemFailure,
        ResponseKind::ServerFailure,
        ResponseKind::TimeRequestFailure,
    ];

    /// Looks up a response by its wire code
    pub fn from_code(code: &str) -> Option<ResponseKind> {
        let kind = match code {
            "\x06" => ResponseKind::Ack,
            "\x15" => ResponseKind::Nak,
            "0" => ResponseKind::Idle,
            "1" => ResponseKind::Busy,
            "2" => ResponseKind::AuthApproved,
            "3" => ResponseKind::AuthDeclined,
            "4" => ResponseKind::SessionTimeout,
            "5" => ResponseKind::Initializing,
            "6" => ResponseKind::Disabled,
            "7" => ResponseKind::ExpectingSwipe,
            "8" => ResponseKind::Authorizing,
            "9" => ResponseKind::ExpectingResult,
            "10" => ResponseKind::InvalidCommand,
            "11" => ResponseKind::FileAvailable,
            "12" => ResponseKind::ExpectingRecordUpload,
            "13" => ResponseKind::CancelFileTransfer,
            "14" => ResponseKind::SignalQuality,
            "15" => ResponseKind::TimeAndDate,
            "16" => ResponseKind::TerminalConfig,
            "17" => ResponseKind::TransactionId,
            "18" => ResponseKind::EndButtonPressed,
            "30" => ResponseKind::NetworkFailure,
            "31" => ResponseKind::ModemFailure,
            "32" => ResponseKind::ServerFailure,
            "33" => ResponseKind::TimeRequestFailure,
            _ => return None,
        };
        Some(kind)
    }

    /// The wire code of this response
    pub fn code(&self) -> &'static str {
        match self {
            ResponseKind::Ack => "\x06",
            ResponseKind::Nak => "\x15",
            ResponseKind::Idle => "0",
            ResponseKind::Busy => "1",
            ResponseKind::AuthApproved => "2",
            ResponseKind::AuthDeclined => "3",
            ResponseKind::SessionTimeout => "4",
            ResponseKind::Initializing => "5",
            ResponseKind::Disabled => "6",
            ResponseKind::ExpectingSwipe => "7",
            ResponseKind::Authorizing => "8",
            ResponseKind::ExpectingResult => "9",
            ResponseKind::InvalidCommand => "10",
            ResponseKind::FileAvailable => "11",
            ResponseKind::ExpectingRecordUpload => "12",
            ResponseKind::CancelFileTransfer => "13",
            ResponseKind::SignalQuality => "14",
            ResponseKind::TimeAndDate => "15",
            ResponseKind::TerminalConfig => "16",
            ResponseKind::TransactionId => "17",
            ResponseKind::EndButtonPressed => "18",
            ResponseKind::NetworkFailure => "30",
            ResponseKind::ModemFailure => "31",
            ResponseKind::ServerFailure => "32",
            ResponseKind::TimeRequestFailure => "33",
        }
    }

    /// Short name of this response
    pub fn name(&self) -> &'static str {
        match self {
            ResponseKind::Ack => "ACK",
            ResponseKind::Nak => "NAK",
            ResponseKind::Idle => "OK",
            ResponseKind::Busy => "BUSY",
            ResponseKind::AuthApproved => "AUTH_OK",
            ResponseKind::AuthDeclined => "AUTH_DECL",
            ResponseKind::SessionTimeout => "SESSION_TO",
            ResponseKind::Initializing => "INITIALIZING",
            ResponseKind::Disabled => "DISABLED",
            ResponseKind::ExpectingSwipe => "XPCTNG_SWIPE",
            ResponseKind::Authorizing => "AUTHORIZING",
            ResponseKind::ExpectingResult => "XPCTNG_TRANS_RESULT",
            ResponseKind::InvalidCommand => "INVALID_CMD",
            ResponseKind::FileAvailable => "FILE_AVAILABLE",
            ResponseKind::ExpectingRecordUpload => "XPCTNG_RECORD_UPLOAD",
            ResponseKind::CancelFileTransfer => "CANCEL_FILE_XFER",
            ResponseKind::SignalQuality => "SIGNAL_QUALITY",
            ResponseKind::TimeAndDate => "TIME_DATE",
            ResponseKind::TerminalConfig => "TERMINAL_CONFIG",
            ResponseKind::TransactionId => "TRANSACTION_ID",
            ResponseKind::EndButtonPressed => "END_BUTTON_PRESSED",
            ResponseKind::NetworkFailure => "FAIL_NETWORK",
            ResponseKind::ModemFailure => "FAIL_MODEM",
            ResponseKind::ServerFailure => "FAIL_SERVER",
            ResponseKind::TimeRequestFailure => "FAIL_TIME_REQUEST",
        }
    }

    /// Long description of this response
    pub fn description(&self) -> &'static str {
        match self {
            ResponseKind::Ack => "Terminal has acknowledged a command",
            ResponseKind::Nak => "Command not acknowledged",
            ResponseKind::Idle => "Nothing to report; idle with a network connection",
            ResponseKind::Busy => "Terminal processing previous command",
            ResponseKind::AuthApproved => "Card authorization successful",
            ResponseKind::AuthDeclined => "Bank declined authorization; reason provided",
            ResponseKind::SessionTimeout => "Session timeout with a brief description",
            ResponseKind::Initializing => "Terminal establishing its network connection",
            ResponseKind::Disabled => "Terminal is in disabled state",
            ResponseKind::ExpectingSwipe => "Terminal waiting for card swipe",
            ResponseKind::Authorizing => "Terminal is authorizing the credit card",
            ResponseKind::ExpectingResult => "Terminal waiting on kiosk transaction result",
            ResponseKind::InvalidCommand => "Terminal received a bad or out-of-sequence command",
            ResponseKind::FileAvailable => "Attributes of a server file available for download",
            ResponseKind::ExpectingRecordUpload => "Terminal ready to receive file from kiosk",
            ResponseKind::CancelFileTransfer => "File upload or download cancelled",
            ResponseKind::SignalQuality => "Modem signal quality report",
            ResponseKind::TimeAndDate => "Current GMT and local time",
            ResponseKind::TerminalConfig => "Terminal configuration report",
            ResponseKind::TransactionId => "Current credit transaction id",
            ResponseKind::EndButtonPressed => "Cardholder pressed the card reader button",
            ResponseKind::NetworkFailure => "Provider network error",
            ResponseKind::ModemFailure => "Terminal modem failure",
            ResponseKind::ServerFailure => "Server failure",
            ResponseKind::TimeRequestFailure => "Terminal not synchronized with server",
        }
    }

    /// Ordered names of the data fields this response carries
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            ResponseKind::AuthApproved => &["amount", "masked_card"],
            ResponseKind::AuthDeclined => &["code", "message"],
            ResponseKind::SessionTimeout => &["message"],
            ResponseKind::InvalidCommand => &["command", "message"],
            ResponseKind::FileAvailable => &[
                "file_name",
                "file_type",
                "file_size",
                "records_total",
                "record_size",
            ],
            ResponseKind::SignalQuality => &["rssi", "ber"],
            ResponseKind::TimeAndDate => &[
                "gmt_time",
                "gmt_date",
                "gmt_offset",
                "local_time",
                "local_date",
            ],
            ResponseKind::TerminalConfig => &["serial_number", "software_revision"],
            ResponseKind::TransactionId => &["transaction_id"],
            _ => &[],
        }
    }

    /// Whether the frame carries two CRC bytes before the terminator
    pub fn crc_present(&self) -> bool {
        matches!(
            self,
            ResponseKind::AuthApproved
                | ResponseKind::AuthDeclined
                | ResponseKind::FileAvailable
        )
    }
}

/// A decoded response frame.
///
/// Owned by the caller that issued the command and discarded after use.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Which registry entry the frame matched
    pub kind: ResponseKind,
    /// Decoded (field name, field value) pairs, in wire order.
    ///
    /// Paired positionally with the registry's declared names; if the counts
    /// differ, the shorter of the two decides the pair count.
    pub fields: Vec<(&'static str, String)>,
    /// Raw CRC bytes from the frame, present iff the registry says so.
    /// Carried as received, not verified.
    pub crc: Option<[u8; 2]>,
}

impl ParsedResponse {
    /// Decodes a complete raw frame.
    ///
    /// The frame must be either a single ACK/NAK control byte or a
    /// carriage-return-terminated code + fields sequence.
    pub fn decode(frame: &[u8]) -> Result<ParsedResponse> {
        let first = *frame
            .first()
            .ok_or_else(|| Error::framing("empty frame"))?;
        if first == ACK {
            return Ok(ParsedResponse::control(ResponseKind::Ack));
        }
        if first == NAK {
            return Ok(ParsedResponse::control(ResponseKind::Nak));
        }
        if frame[frame.len() - 1] != CR {
            return Err(Error::framing(
                "response not terminated with carriage return",
            ));
        }

        let payload = &frame[..frame.len() - 1];
        let code_end = payload
            .iter()
            .position(|&b| b == FIELD_SEP)
            .unwrap_or(payload.len());
        let code = std::str::from_utf8(&payload[..code_end])
            .map_err(|_| Error::framing("response code is not valid text"))?;
        let kind = ResponseKind::from_code(code)
            .ok_or_else(|| Error::UnknownResponse(code.to_string()))?;

        // The checksum is stripped before field splitting and kept raw.
        let (payload, crc) = if kind.crc_present() {
            if payload.len() < code_end + CRC_LEN {
                return Err(Error::framing("frame too short for its checksum"));
            }
            let (rest, tail) = payload.split_at(payload.len() - CRC_LEN);
            (rest, Some([tail[0], tail[1]]))
        } else {
            (payload, None)
        };

        let text = std::str::from_utf8(payload)
            .map_err(|_| Error::framing("response payload is not valid text"))?;
        let fields = kind
            .field_names()
            .iter()
            .copied()
            .zip(text.split(FIELD_SEP as char).skip(1).map(String::from))
            .collect();

        Ok(ParsedResponse { kind, fields, crc })
    }

    /// A zero-field control response (ACK/NAK)
    fn control(kind: ResponseKind) -> ParsedResponse {
        ParsedResponse {
            kind,
            fields: Vec::new(),
            crc: None,
        }
    }

    /// Looks up a decoded field value by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}
