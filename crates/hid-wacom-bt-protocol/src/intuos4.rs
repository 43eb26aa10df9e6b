//! Intuos4 WL framer and sub-report decoder.
//!
//! One delivered buffer carries one to three 10-byte sub-reports after the
//! outer marker (`wacom_i4_parse_report` in the kernel driver):
//!
//! ```text
//! 0x03: [0x03, sub0 (10)]              + sub1 when len >= 21
//! 0x04: [0x04, sub0 (10), sub1 (10)]   + sub2 when len >= 31
//! ```
//!
//! Framing is validated before any sub-report is decoded, so a rejected
//! buffer leaves the device state untouched.

use crate::error::ReportError;
use crate::event::{EventBatch, InputEvent};
use crate::ids::intuos4::{self as layout, pen_codes, sub_types, tool_ids};
use crate::ids::report_ids;
use crate::state::{DeviceState, ToolButtons};
use crate::types::Tool;
use smallvec::SmallVec;
use tracing::{debug, warn};

/// One fixed-size sub-report: `[type, code, d2..d9]`.
pub type SubReport = [u8; layout::SUB_REPORT_LEN];

/// Sub-reports of one buffer, in wire order.
pub type SubReports<'a> = SmallVec<[&'a SubReport; 3]>;

/// Non-fatal problems found while decoding the sub-reports of one buffer.
pub type SubReportAnomalies = SmallVec<[ReportError; 3]>;

/// Split a buffer into its sub-reports.
pub fn frame(data: &[u8]) -> Result<SubReports<'_>, ReportError> {
    let (mandatory, max) = match data.first().copied() {
        Some(report_ids::STATUS) => (1, 2),
        Some(report_ids::STATUS_EXTENDED) => (2, 3),
        _ => return Err(ReportError::unrecognized(data)),
    };

    let mut subs = SubReports::new();
    for index in 0..max {
        let start = layout::FIRST_SUB_REPORT + index * layout::SUB_REPORT_LEN;
        match data
            .get(start..)
            .and_then(|rest| rest.first_chunk::<{ layout::SUB_REPORT_LEN }>())
        {
            Some(sub) => subs.push(sub),
            None if index < mandatory => return Err(ReportError::unrecognized(data)),
            None => break,
        }
    }
    Ok(subs)
}

/// Frame and decode one buffer.
///
/// Unknown sub-report types are collected and returned; they do not stop the
/// remaining sub-reports from decoding.
pub fn decode(
    data: &[u8],
    state: &mut DeviceState,
    out: &mut EventBatch,
) -> Result<SubReportAnomalies, ReportError> {
    let subs = frame(data)?;
    let mut anomalies = SubReportAnomalies::new();
    for sub in subs {
        if let Err(err) = decode_sub_report(sub, state, out) {
            warn!("Intuos4 sub-report skipped: {}", err);
            anomalies.push(err);
        }
    }
    Ok(anomalies)
}

/// Decode a single sub-report.
pub fn decode_sub_report(
    sub: &SubReport,
    state: &mut DeviceState,
    out: &mut EventBatch,
) -> Result<(), ReportError> {
    let &[sub_type, code, payload @ ..] = sub;
    match sub_type {
        sub_types::EMPTY => {}
        sub_types::PEN => decode_pen(code, &payload, state, out),
        sub_types::FEATURES => {
            let [feature, ..] = payload;
            state.feature_byte = feature;
        }
        sub_types::BUTTONS => decode_pad(&payload, state, out),
        other => return Err(ReportError::UnknownSubReportType { sub_type: other }),
    }
    Ok(())
}

/// `d2..d9` of a pen sub-report.
pub type PenPayload = [u8; 8];

fn decode_pen(code: u8, payload: &PenPayload, state: &mut DeviceState, out: &mut EventBatch) {
    match code {
        pen_codes::OUT_OF_PROXIMITY => out_of_proximity(state, out),
        pen_codes::TOOL_ID => identify_tool(payload, state, out),
        _ => position(code, payload, state, out),
    }
}

/// Composite tool id and serial from a tool-identification sub-report.
pub fn tool_identity(payload: &PenPayload) -> (u32, u32) {
    let &[d2, d3, d4, d5, d6, d7, d8, _] = payload;
    let [d2, d3, d4, d5, d6, d7, d8] = [d2, d3, d4, d5, d6, d7, d8].map(u32::from);

    let tool_id = (d2 << 4) | (d3 >> 4) | ((d7 & 0x0F) << 20) | ((d8 & 0xF0) << 12);
    let serial = ((d3 & 0x0F) << 28) | (d4 << 20) | (d5 << 12) | (d6 << 4) | (d7 >> 4);
    (tool_id, serial)
}

pub fn tool_from_id(tool_id: u32) -> Option<Tool> {
    match tool_id {
        tool_ids::PEN => Some(Tool::Pen),
        tool_ids::ERASER => Some(Tool::Eraser),
        _ => None,
    }
}

fn identify_tool(payload: &PenPayload, state: &mut DeviceState, out: &mut EventBatch) {
    let (tool_id, serial) = tool_identity(payload);

    match tool_from_id(tool_id) {
        Some(tool) if tool != state.tool => {
            // The announced tool leaves, with its own id and serial, before
            // the new one can be announced by its first position.
            if state.in_proximity {
                out_of_proximity(state, out);
            }
            state.tool = tool;
            state.in_proximity = false;
        }
        Some(_) => {}
        None => debug!("Intuos4 tool id {:#08x} not recognized", tool_id),
    }

    state.tool_id = tool_id;
    state.serial = serial;
}

fn out_of_proximity(state: &mut DeviceState, out: &mut EventBatch) {
    if !state.tool.is_present() {
        return;
    }
    if !state.in_proximity {
        // Identified but never announced: nothing to retract.
        state.tool = Tool::None;
        return;
    }

    state.release_tool_buttons(&ToolButtons::STYLUS_RELEASE_ORDER, out);
    out.push(InputEvent::PressureUpdate { value: 0 });
    state.leave_proximity(out);
    out.push(InputEvent::ToolIdUpdate { id: 0 });
    out.push(InputEvent::SerialUpdate {
        serial: state.serial,
    });
    out.push(InputEvent::SyncBarrier);
}

/// Fields of a position sub-report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenSample {
    pub x: u32,
    pub y: u32,
    /// Eleven-bit pressure.
    pub pressure: u16,
    /// Six-bit hover distance.
    pub distance: u8,
    pub stylus: bool,
    pub stylus2: bool,
}

impl PenSample {
    pub fn parse(code: u8, payload: &PenPayload) -> Self {
        let &[d2, d3, d4, d5, d6, d7, _, d9] = payload;
        let x = (u32::from(d2) << 9) | (u32::from(d3) << 1) | u32::from((d9 & 0x02) >> 1);
        let y = (u32::from(d4) << 9) | (u32::from(d5) << 1) | u32::from(d9 & 0x01);
        let pressure = (u16::from(d6) << 3)
            | u16::from((d7 & 0xC0) >> 5)
            | u16::from(code & pen_codes::PRESSURE_LSB);
        Self {
            x,
            y,
            pressure,
            distance: (d9 >> 2) & 0x3F,
            stylus: code & pen_codes::STYLUS != 0,
            stylus2: code & pen_codes::STYLUS2 != 0,
        }
    }

    pub fn touching(&self) -> bool {
        self.pressure > 1
    }
}

fn position(code: u8, payload: &PenPayload, state: &mut DeviceState, out: &mut EventBatch) {
    if !state.tool.is_present() {
        debug!("Intuos4 position sub-report before tool identification, skipped");
        return;
    }

    let sample = PenSample::parse(code, payload);
    state.enter_proximity(out);
    state.set_tool_button(ToolButtons::TOUCH, sample.touching(), out);
    state.set_tool_button(ToolButtons::STYLUS, sample.stylus, out);
    state.set_tool_button(ToolButtons::STYLUS2, sample.stylus2, out);
    out.push(InputEvent::PositionUpdate {
        x: sample.x,
        y: sample.y,
    });
    out.push(InputEvent::DistanceUpdate {
        value: sample.distance,
    });
    out.push(InputEvent::PressureUpdate {
        value: sample.pressure,
    });
    out.push(InputEvent::ToolIdUpdate { id: state.tool_id });
    out.push(InputEvent::SerialUpdate {
        serial: state.serial,
    });
    out.push(InputEvent::SyncBarrier);
}

/// Nine-key pad mask: key 0 from `d2` bit 0, keys 1-8 from `d3`.
pub fn pad_mask(d2: u8, d3: u8) -> u16 {
    (u16::from(d3) << 1) | u16::from(d2 & 0x01)
}

fn decode_pad(payload: &PenPayload, state: &mut DeviceState, out: &mut EventBatch) {
    let &[d2, d3, ..] = payload;
    if state.update_pad_mask(pad_mask(d2, d3), layout::PAD_BUTTON_COUNT, out) {
        out.push(InputEvent::PadActive);
        out.push(InputEvent::ToolIdUpdate {
            id: layout::PAD_DEVICE_ID,
        });
        out.push(InputEvent::SerialUpdate {
            serial: layout::PAD_SERIAL,
        });
        out.push(InputEvent::SyncBarrier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Button;

    /// Tool-id sub-report for the standard pen, serial 0x1234_5678.
    const PEN_ID: SubReport = [0x02, 0xC2, 0x80, 0x21, 0x23, 0x45, 0x67, 0x81, 0x00, 0x00];

    #[test]
    fn test_frame_normal_single() -> Result<(), Box<dyn std::error::Error>> {
        let mut buf = [0u8; 11];
        buf[0] = 0x03;
        assert_eq!(frame(&buf)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_frame_normal_chained() -> Result<(), Box<dyn std::error::Error>> {
        let mut buf = [0u8; 21];
        buf[0] = 0x03;
        buf[11] = 0x0C;
        let subs = frame(&buf)?;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs.get(1).map(|s| s[0]), Some(0x0C));
        Ok(())
    }

    #[test]
    fn test_frame_extended() -> Result<(), Box<dyn std::error::Error>> {
        let mut buf = [0u8; 31];
        buf[0] = 0x04;
        assert_eq!(frame(&buf)?.len(), 3);
        assert_eq!(frame(&buf[..30])?.len(), 2);
        assert!(frame(&buf[..20]).is_err());
        Ok(())
    }

    #[test]
    fn test_frame_rejects_short_and_foreign() {
        assert_eq!(
            frame(&[0x03; 10]),
            Err(ReportError::UnrecognizedReport {
                marker: 0x03,
                len: 10
            })
        );
        assert!(frame(&[]).is_err());
        assert!(frame(&[0x01; 21]).is_err());
    }

    #[test]
    fn test_tool_identity_fields() {
        let [_, _, payload @ ..] = PEN_ID;
        let (tool_id, serial) = tool_identity(&payload);
        assert_eq!(tool_id, 0x10_0802);
        assert_eq!(serial, 0x1234_5678);
        assert_eq!(tool_from_id(tool_id), Some(Tool::Pen));
        assert_eq!(tool_from_id(0x10_080A), Some(Tool::Eraser));
        assert_eq!(tool_from_id(0x80_0802), None);
    }

    #[test]
    fn test_identification_emits_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&PEN_ID, &mut state, &mut out)?;
        assert!(out.is_empty());
        assert_eq!(state.tool, Tool::Pen);
        assert!(!state.in_proximity);
        assert_eq!(state.serial, 0x1234_5678);
        Ok(())
    }

    #[test]
    fn test_unknown_tool_id_keeps_tool() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&[0x02, 0xC2, 0xFF, 0xF0, 0, 0, 0, 0, 0, 0], &mut state, &mut out)?;
        assert_eq!(state.tool, Tool::None);
        assert_eq!(state.tool_id, 0xFFF);
        Ok(())
    }

    #[test]
    fn test_pen_sample_bit_layout() {
        // x: 0x7F << 9 | 0xFF << 1 | 1, y: 0x01 << 9 | 0x02 << 1 | 0
        let sample = PenSample::parse(0x07, &[0x7F, 0xFF, 0x01, 0x02, 0xFF, 0xC0, 0x00, 0xFE]);
        assert_eq!(sample.x, (0x7F << 9) | (0xFF << 1) | 1);
        assert_eq!(sample.y, (0x01 << 9) | (0x02 << 1));
        assert_eq!(sample.pressure, 2047);
        assert_eq!(sample.distance, 0x3F);
        assert!(sample.stylus);
        assert!(sample.stylus2);
        assert!(sample.touching());

        let light = PenSample::parse(0x01, &[0; 8]);
        assert_eq!(light.pressure, 1);
        assert!(!light.touching());
    }

    #[test]
    fn test_position_before_identification_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&[0x02, 0xE0, 1, 2, 3, 4, 5, 6, 7, 8], &mut state, &mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_position_frame_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&PEN_ID, &mut state, &mut out)?;
        decode_sub_report(&[0x02, 0xE2, 0, 10, 0, 20, 0x10, 0, 0, 0x08], &mut state, &mut out)?;

        assert_eq!(
            out.as_slice(),
            &[
                InputEvent::ToolChanged { tool: Tool::Pen },
                InputEvent::ButtonChanged {
                    button: Button::Touch,
                    pressed: true
                },
                InputEvent::ButtonChanged {
                    button: Button::Stylus,
                    pressed: true
                },
                InputEvent::PositionUpdate { x: 20, y: 40 },
                InputEvent::DistanceUpdate { value: 2 },
                InputEvent::PressureUpdate { value: 0x80 },
                InputEvent::ToolIdUpdate { id: 0x10_0802 },
                InputEvent::SerialUpdate {
                    serial: 0x1234_5678
                },
                InputEvent::SyncBarrier,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_out_of_proximity_sequence() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&PEN_ID, &mut state, &mut out)?;
        decode_sub_report(&[0x02, 0xE0, 0, 10, 0, 20, 0x10, 0, 0, 0], &mut state, &mut out)?;
        out.clear();

        decode_sub_report(&[0x02, 0x80, 0, 0, 0, 0, 0, 0, 0, 0], &mut state, &mut out)?;
        assert_eq!(
            out.as_slice(),
            &[
                InputEvent::ButtonChanged {
                    button: Button::Touch,
                    pressed: false
                },
                InputEvent::PressureUpdate { value: 0 },
                InputEvent::ToolChanged { tool: Tool::None },
                InputEvent::ProximityLost,
                InputEvent::ToolIdUpdate { id: 0 },
                InputEvent::SerialUpdate {
                    serial: 0x1234_5678
                },
                InputEvent::SyncBarrier,
            ]
        );
        assert_eq!(state.tool, Tool::None);

        out.clear();
        decode_sub_report(&[0x02, 0x80, 0, 0, 0, 0, 0, 0, 0, 0], &mut state, &mut out)?;
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_feature_sub_report_stores_byte() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&[0x03, 0x00, 0x5A, 0, 0, 0, 0, 0, 0, 0], &mut state, &mut out)?;
        assert_eq!(state.feature_byte, 0x5A);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_pad_frame() -> Result<(), Box<dyn std::error::Error>> {
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();
        decode_sub_report(&[0x0C, 0x00, 0x01, 0x80, 0, 0, 0, 0, 0, 0], &mut state, &mut out)?;
        assert_eq!(state.button_mask, 0x101);
        assert_eq!(
            out.as_slice(),
            &[
                InputEvent::ButtonChanged {
                    button: Button::Pad(0),
                    pressed: true
                },
                InputEvent::ButtonChanged {
                    button: Button::Pad(8),
                    pressed: true
                },
                InputEvent::PadActive,
                InputEvent::ToolIdUpdate { id: 0x0F },
                InputEvent::SerialUpdate {
                    serial: 0xFFFF_FFFF
                },
                InputEvent::SyncBarrier,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_unknown_sub_type_does_not_stop_chain() -> Result<(), Box<dyn std::error::Error>> {
        let mut buf = [0u8; 21];
        buf[0] = 0x03;
        buf[1] = 0x7E;
        buf[11] = 0x0C;
        buf[13] = 0x01;
        let mut state = DeviceState::new();
        let mut out = EventBatch::new();

        let anomalies = decode(&buf, &mut state, &mut out)?;
        assert_eq!(
            anomalies.as_slice(),
            &[ReportError::UnknownSubReportType { sub_type: 0x7E }]
        );
        assert_eq!(state.button_mask, 0x001);
        assert_eq!(out.last(), Some(&InputEvent::SyncBarrier));
        Ok(())
    }
}
