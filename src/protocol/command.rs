//! Outbound command registry.
//!
//! The terminal speaks a fixed set of commands, each a short ASCII identifier
//! with an optional CRC16 requirement. The registry is a closed enum so an
//! out-of-date match arm is a compile error rather than a runtime lookup miss.

/// Commands the kiosk can send to the payment terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Query terminal status and pending responses
    Status,
    /// Instructs the terminal to reboot
    Reboot,
    /// Instructs the terminal to reset
    Reset,
    /// Instructs the terminal to contact its server for updates
    RequestUpdate,
    /// Enables card acceptance
    Enable,
    /// Disables card acceptance
    Disable,
    /// Instructs the terminal to download a file from its server
    BeginFileDownload,
    /// Terminates any file transfer in progress
    CancelFileTransfer,
    /// Requests modem signal quality on the next status poll
    RequestSignalQuality,
    /// Requests time and date on the next status poll
    RequestTime,
    /// Internal event log control
    EventLog,
    /// Requests terminal configuration on the next status poll
    RequestConfig,
    /// Requests the current credit transaction id on the next status poll
    RequestTransactionId,
    /// Sends kiosk configuration to the terminal
    KioskConfig,
    /// Requests authorization for a set amount
    AuthorizationRequest,
    /// Reports the result of a sale
    TransactionResult,
    /// Reports a cash sale
    CashReport,
    /// Notifies the terminal that the kiosk is ready to send a file
    FileReady,
    /// Sends one file record to the terminal
    FileRecord,
    /// Shows a message on the card reader display
    DisplayMessage,
}

impl Command {
    /// All commands, in registry order
    pub const ALL: [Command; 20] = [
        Command::Status,
        Command::Reboot,
        Command::Reset,
        Command::RequestUpdate,
        Command::Enable,
        Command::Disable,
        Command::BeginFileDownload,
        Command::CancelFileTransfer,
        Command::RequestSignalQuality,
        Command::RequestTime,
        Command::EventLog,
        Command::RequestConfig,
        Command::RequestTransactionId,
        Command::KioskConfig,
        Command::AuthorizationRequest,
        Command::TransactionResult,
        Command::CashReport,
        Command::FileReady,
        Command::FileRecord,
        Command::DisplayMessage,
    ];

    /// The ASCII identifier placed at the start of the frame
    pub fn identifier(&self) -> &'static str {
        match self {
            Command::Status => "1",
            Command::Reboot => "2",
            Command::Reset => "3",
            Command::RequestUpdate => "4",
            Command::Enable => "5",
            Command::Disable => "6",
            Command::BeginFileDownload => "7",
            Command::CancelFileTransfer => "8",
            Command::RequestSignalQuality => "9",
            Command::RequestTime => "10",
            Command::EventLog => "11",
            Command::RequestConfig => "12",
            Command::RequestTransactionId => "13",
            Command::KioskConfig => "20",
            Command::AuthorizationRequest => "21",
            Command::TransactionResult => "22",
            Command::CashReport => "23",
            Command::FileReady => "24",
            Command::FileRecord => "25",
            Command::DisplayMessage => "26",
        }
    }

    /// Whether the encoded frame carries a CRC16 before the terminator
    pub fn requires_crc(&self) -> bool {
        matches!(
            self,
            Command::KioskConfig
                | Command::AuthorizationRequest
                | Command::TransactionResult
                | Command::CashReport
                | Command::FileReady
                | Command::FileRecord
                | Command::DisplayMessage
        )
    }

    /// Human description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Status => "Get terminal status and pending responses",
            Command::Reboot => "Instructs terminal to reboot",
            Command::Reset => "Instructs terminal to reset",
            Command::RequestUpdate => "Instructs terminal to contact server for updates",
            Command::Enable => "Enables terminal to accept credit cards",
            Command::Disable => "Disables terminal from accepting credit cards",
            Command::BeginFileDownload => "Instructs terminal to download file from server",
            Command::CancelFileTransfer => "Instructs terminal to terminate file transfers",
            Command::RequestSignalQuality => {
                "Returns modem signal quality on the next status request"
            }
            Command::RequestTime => "Returns terminal time and date on the next status request",
            Command::EventLog => "Internal event log control",
            Command::RequestConfig => {
                "Returns terminal configuration on the next status request"
            }
            Command::RequestTransactionId => {
                "Returns the current credit transaction id on the next status request"
            }
            Command::KioskConfig => "Sends kiosk configuration to the terminal",
            Command::AuthorizationRequest => "Sends authorization request for a set amount",
            Command::TransactionResult => "Sends sale result information to the terminal",
            Command::CashReport => "Sends cash sale result to the terminal",
            Command::FileReady => "Notifies terminal that the kiosk is ready to send a file",
            Command::FileRecord => "Sends file information to the terminal",
            Command::DisplayMessage => "Sends a message to show on the card reader",
        }
    }
}
