//! Control-channel negotiation: tablet mode and reporting speed.
//!
//! Mirrors `wacom_set_features` and `wacom_poke` from the kernel driver.
//! Retries are immediate; nothing here sleeps.

use crate::error::ControlError;
use crate::ids::feature_reports;
use crate::state::DeviceState;
use crate::types::Speed;
use opentablet_hid_common::FeatureReportWriter;
use tracing::{debug, info, warn};

/// Default number of extra attempts after a rejected control write.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Speed command for a target speed.
pub const fn speed_command(speed: Speed) -> [u8; 2] {
    match speed {
        Speed::Low => feature_reports::SPEED_LOW,
        Speed::High => feature_reports::SPEED_HIGH,
    }
}

/// Sends feature reports with a bounded, counted retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeNegotiator {
    max_retries: u8,
}

impl Default for ModeNegotiator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl ModeNegotiator {
    pub fn new(max_retries: u8) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    /// Select tablet mode. Best effort: a single write whose outcome is only
    /// logged. Returns whether the device accepted it.
    pub fn set_tablet_mode(&self, writer: &mut dyn FeatureReportWriter) -> bool {
        let command = feature_reports::SET_TABLET_MODE;
        match writer.write_feature_report(&command) {
            Ok(_) => {
                debug!("Tablet mode feature {:02x?} accepted", command);
                true
            }
            Err(e) => {
                warn!("Tablet mode feature {:02x?} rejected: {}", command, e);
                false
            }
        }
    }

    /// Switch the reporting speed.
    ///
    /// Sends the prepare command and, only once that is accepted, the speed
    /// command. `state.high_speed` changes only when both were accepted. A
    /// failure is returned as a warning-level [`ControlError`]; the caller is
    /// expected to carry on.
    pub fn set_speed(
        &self,
        writer: &mut dyn FeatureReportWriter,
        state: &mut DeviceState,
        speed: Speed,
    ) -> Result<(), ControlError> {
        let result = self
            .write_with_retry(writer, feature_reports::SPEED_PREPARE)
            .and_then(|()| self.write_with_retry(writer, speed_command(speed)));

        match result {
            Ok(()) => {
                state.high_speed = speed.is_high();
                info!("Reporting speed set to {}", speed);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to set reporting speed to {}, keeping {}: {}",
                    speed,
                    Speed::from_high_speed(state.high_speed),
                    e
                );
                Err(e)
            }
        }
    }

    fn write_with_retry(
        &self,
        writer: &mut dyn FeatureReportWriter,
        command: [u8; 2],
    ) -> Result<(), ControlError> {
        let attempts = u32::from(self.max_retries) + 1;
        let mut attempt = 1;
        loop {
            match writer.write_feature_report(&command) {
                Ok(_) => return Ok(()),
                Err(source) if attempt >= attempts => {
                    return Err(ControlError::ControlWriteFailure {
                        command,
                        attempts,
                        source,
                    });
                }
                Err(e) => {
                    debug!(
                        "Control write {:02x?} attempt {}/{} failed: {}",
                        command, attempt, attempts, e
                    );
                    attempt += 1;
                }
            }
        }
    }
}
