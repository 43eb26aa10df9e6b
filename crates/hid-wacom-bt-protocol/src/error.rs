//! Error types for the decode path, the control channel and session setup.
//!
//! Only [`SessionError`] is fatal. Everything else is reported to the caller
//! as a value and the session carries on.

use opentablet_hid_common::HidCommonError;
use std::fmt;
use thiserror::Error;

/// How loudly an error should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Expected noise on the link, no action required.
    Info = 0,
    /// Something was skipped; the session continues.
    Warning = 1,
    /// The operation could not be performed.
    Error = 2,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Decode-path failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Leading marker is not a status report, or the buffer is too short for
    /// its mandatory payload.
    #[error("Unrecognized report: marker {marker:#04x}, {len} bytes")]
    UnrecognizedReport { marker: u8, len: usize },

    /// An Intuos4 sub-report carried a type byte with no known layout.
    #[error("Unknown sub-report type {sub_type:#04x}")]
    UnknownSubReportType { sub_type: u8 },
}

impl ReportError {
    pub(crate) fn unrecognized(data: &[u8]) -> Self {
        Self::UnrecognizedReport {
            marker: data.first().copied().unwrap_or(0),
            len: data.len(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::UnrecognizedReport { .. } => ErrorSeverity::Info,
            ReportError::UnknownSubReportType { .. } => ErrorSeverity::Warning,
        }
    }
}

/// Control-channel failures.
#[derive(Debug, Error)]
pub enum ControlError {
    /// A feature report was still rejected after the retry budget ran out.
    #[error("Control write {command:02x?} failed after {attempts} attempts: {source}")]
    ControlWriteFailure {
        command: [u8; 2],
        attempts: u32,
        #[source]
        source: HidCommonError,
    },
}

impl ControlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ControlError::ControlWriteFailure { .. } => ErrorSeverity::Warning,
        }
    }

    pub fn command(&self) -> [u8; 2] {
        match self {
            ControlError::ControlWriteFailure { command, .. } => *command,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            ControlError::ControlWriteFailure { attempts, .. } => *attempts,
        }
    }
}

/// Operator speed-change failures.
#[derive(Debug, Error)]
pub enum SpeedError {
    /// Input was not `0` or `1`. Nothing was written to the device.
    #[error("Invalid speed value {input:?}: expected 0 or 1")]
    InvalidSpeedValue { input: String },

    /// The negotiation ran but the device never accepted it.
    #[error(transparent)]
    Control(#[from] ControlError),
}

impl SpeedError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SpeedError::InvalidSpeedValue { .. } => ErrorSeverity::Error,
            SpeedError::Control(err) => err.severity(),
        }
    }
}

/// Session setup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Unsupported device {vendor_id:04x}:{product_id:04x}")]
    UnsupportedDevice { vendor_id: u16, product_id: u16 },
}

impl SessionError {
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}
