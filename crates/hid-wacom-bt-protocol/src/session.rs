//! Per-device session: owns the decode state and applies the start sequence.

use crate::error::{ControlError, ReportError, SessionError, SpeedError};
use crate::event::EventSink;
use crate::negotiator::{DEFAULT_MAX_RETRIES, ModeNegotiator};
use crate::router::route_to_sink;
use crate::state::DeviceState;
use crate::types::{Speed, TabletVariant};
use opentablet_hid_common::{FeatureReportWriter, HidDeviceInfo};
use tracing::{debug, info};

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Extra attempts per control write.
    pub max_retries: u8,
    /// Speed requested at start on variants that negotiate speed (Graphire).
    pub start_speed: Speed,
    /// Send the tablet-mode feature at start on variants that need it (Intuos4).
    pub send_tablet_mode: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            start_speed: Speed::High,
            send_tablet_mode: true,
        }
    }
}

/// Running totals for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub reports_decoded: u64,
    pub reports_dropped: u64,
    pub events_emitted: u64,
    pub unknown_sub_reports: u64,
}

/// What happened to one delivered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDisposition {
    Decoded { events: usize, anomalies: usize },
    /// Not a status report; ignored without touching state.
    Dropped(ReportError),
}

/// One connected tablet.
#[derive(Debug, Clone)]
pub struct TabletSession {
    variant: TabletVariant,
    config: SessionConfig,
    negotiator: ModeNegotiator,
    state: DeviceState,
    stats: DecodeStats,
}

impl TabletSession {
    pub fn new(variant: TabletVariant, config: SessionConfig) -> Self {
        Self {
            variant,
            config,
            negotiator: ModeNegotiator::new(config.max_retries),
            state: DeviceState::new(),
            stats: DecodeStats::default(),
        }
    }

    /// Create a session for an enumerated device.
    ///
    /// # Errors
    ///
    /// `UnsupportedDevice` when the ids are not a supported Bluetooth tablet.
    pub fn for_device(info: &HidDeviceInfo, config: SessionConfig) -> Result<Self, SessionError> {
        let variant = TabletVariant::from_ids(info.vendor_id, info.product_id).ok_or(
            SessionError::UnsupportedDevice {
                vendor_id: info.vendor_id,
                product_id: info.product_id,
            },
        )?;
        debug!("Session created for {} ({})", info.display_name(), variant.name());
        Ok(Self::new(variant, config))
    }

    pub fn variant(&self) -> TabletVariant {
        self.variant
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Run the variant's start sequence.
    ///
    /// Graphire requests `config.start_speed`. Intuos4 zeroes the feature byte
    /// and selects tablet mode. A failed control write is returned but leaves
    /// the session fully usable.
    pub fn start(&mut self, writer: &mut dyn FeatureReportWriter) -> Result<(), ControlError> {
        info!("Starting {} session", self.variant.name());
        match self.variant {
            TabletVariant::Graphire => {
                self.negotiator
                    .set_speed(writer, &mut self.state, self.config.start_speed)
            }
            TabletVariant::Intuos4 => {
                self.state.feature_byte = 0;
                if self.config.send_tablet_mode {
                    self.negotiator.set_tablet_mode(writer);
                }
                Ok(())
            }
        }
    }

    /// Decode one buffer and deliver its events to `sink`.
    ///
    /// Never fails: unrecognized buffers are counted and dropped.
    pub fn handle_report(&mut self, data: &[u8], sink: &mut dyn EventSink) -> ReportDisposition {
        match route_to_sink(self.variant, data, &mut self.state, sink) {
            Ok(routed) => {
                let events = routed.events.len();
                let anomalies = routed.anomalies.len();
                self.stats.reports_decoded = self.stats.reports_decoded.saturating_add(1);
                self.stats.events_emitted = self.stats.events_emitted.saturating_add(events as u64);
                self.stats.unknown_sub_reports = self
                    .stats
                    .unknown_sub_reports
                    .saturating_add(anomalies as u64);
                ReportDisposition::Decoded { events, anomalies }
            }
            Err(err) => {
                debug!("Dropping buffer: {}", err);
                self.stats.reports_dropped = self.stats.reports_dropped.saturating_add(1);
                ReportDisposition::Dropped(err)
            }
        }
    }

    pub fn speed(&self) -> Speed {
        Speed::from_high_speed(self.state.high_speed)
    }

    /// Speed attribute text: `"0\n"` or `"1\n"`.
    pub fn show_speed(&self) -> String {
        format!("{}\n", self.speed().as_digit())
    }

    /// Apply an operator speed request.
    ///
    /// # Errors
    ///
    /// `InvalidSpeedValue` (nothing written) when `input` does not start with
    /// `0` or `1`; `Control` when the device kept rejecting the change.
    pub fn store_speed(
        &mut self,
        input: &str,
        writer: &mut dyn FeatureReportWriter,
    ) -> Result<Speed, SpeedError> {
        let speed = Speed::parse_attr(input)?;
        self.set_speed(speed, writer)?;
        Ok(speed)
    }

    pub fn set_speed(
        &mut self,
        speed: Speed,
        writer: &mut dyn FeatureReportWriter,
    ) -> Result<(), ControlError> {
        self.negotiator.set_speed(writer, &mut self.state, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::InputEvent;
    use crate::types::Tool;
    use opentablet_hid_common::mock::MockFeatureWriter;

    #[test]
    fn test_for_device_rejects_unknown() {
        let info = HidDeviceInfo::new(0x056A, 0x0300);
        assert_eq!(
            TabletSession::for_device(&info, SessionConfig::default()).err(),
            Some(SessionError::UnsupportedDevice {
                vendor_id: 0x056A,
                product_id: 0x0300
            })
        );
    }

    #[test]
    fn test_graphire_start_requests_high_speed() -> Result<(), Box<dyn std::error::Error>> {
        let info = HidDeviceInfo::new(0x056A, 0x0081);
        let mut session = TabletSession::for_device(&info, SessionConfig::default())?;
        let mut writer = MockFeatureWriter::new();

        session.start(&mut writer)?;

        assert_eq!(writer.accepted(), &[vec![0x03, 0x00], vec![0x06, 0x00]]);
        assert_eq!(session.show_speed(), "1\n");
        Ok(())
    }

    #[test]
    fn test_intuos4_start_sets_tablet_mode() -> Result<(), Box<dyn std::error::Error>> {
        let mut session = TabletSession::new(TabletVariant::Intuos4, SessionConfig::default());
        let mut writer = MockFeatureWriter::always_failing();

        session.start(&mut writer)?;

        assert_eq!(writer.attempts(), &[vec![0x03, 0x20]]);
        assert_eq!(session.state().feature_byte, 0);
        assert_eq!(session.show_speed(), "0\n");
        Ok(())
    }

    #[test]
    fn test_intuos4_start_can_skip_tablet_mode() -> Result<(), Box<dyn std::error::Error>> {
        let config = SessionConfig {
            send_tablet_mode: false,
            ..SessionConfig::default()
        };
        let mut session = TabletSession::new(TabletVariant::Intuos4, config);
        let mut writer = MockFeatureWriter::new();
        session.start(&mut writer)?;
        assert!(writer.attempts().is_empty());
        Ok(())
    }

    #[test]
    fn test_store_speed_rejects_without_io() {
        let mut session = TabletSession::new(TabletVariant::Graphire, SessionConfig::default());
        let mut writer = MockFeatureWriter::new();

        let result = session.store_speed("7", &mut writer);
        assert!(matches!(result, Err(SpeedError::InvalidSpeedValue { .. })));
        assert!(writer.attempts().is_empty());
    }

    #[test]
    fn test_store_speed_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let mut session = TabletSession::new(TabletVariant::Graphire, SessionConfig::default());
        let mut writer = MockFeatureWriter::new();

        assert_eq!(session.store_speed("1\n", &mut writer)?, Speed::High);
        assert_eq!(session.show_speed(), "1\n");
        assert_eq!(session.store_speed("0", &mut writer)?, Speed::Low);
        assert_eq!(session.show_speed(), "0\n");
        Ok(())
    }

    #[test]
    fn test_dropped_reports_are_counted() {
        let mut session = TabletSession::new(TabletVariant::Graphire, SessionConfig::default());
        let mut sink: Vec<InputEvent> = Vec::new();

        let disposition = session.handle_report(&[0x01, 0x02], &mut sink);
        assert!(matches!(disposition, ReportDisposition::Dropped(_)));

        let disposition = session.handle_report(&[0x03, 0x90, 0, 0, 0, 0, 0, 0], &mut sink);
        assert_eq!(
            disposition,
            ReportDisposition::Decoded {
                events: 4,
                anomalies: 0
            }
        );
        assert_eq!(sink.first(), Some(&InputEvent::ToolChanged { tool: Tool::Pen }));
        assert_eq!(
            *session.stats(),
            DecodeStats {
                reports_decoded: 1,
                reports_dropped: 1,
                events_emitted: 4,
                unknown_sub_reports: 0,
            }
        );
    }
}
