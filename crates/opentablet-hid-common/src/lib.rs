//! Common HID utilities for tablet protocol implementations
//!
//! This crate provides the pieces shared by the vendor protocol crates:
//! device identity, the control-channel write capability handed to protocol
//! negotiators, and a scriptable mock of that capability for tests.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod device_info;
pub mod hid_traits;

pub use device_info::*;
pub use hid_traits::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
