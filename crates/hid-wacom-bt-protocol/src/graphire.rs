//! Graphire Bluetooth status report decoder.
//!
//! Layout (`wacom_gr_parse_report` in the kernel driver):
//!
//! ```text
//! [0x03, status, x_lo, x_hi, y_lo, y_hi, aux, pad]
//! ```
//!
//! `status` carries proximity (0x80), active area (0x10), the two-bit tool
//! code (bits 5-6), the ninth pressure bit (0x08) and three button bits.
//! `aux` is pressure for pens and wheel + height for mice.

use crate::error::ReportError;
use crate::event::{EventBatch, InputEvent};
use crate::ids::{graphire as layout, report_ids};
use crate::state::{DeviceState, ToolButtons};
use crate::types::{TabletVariant, Tool};
use layout::status;

/// Decoded fields of one status report, before any state is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphireReport {
    pub status: u8,
    pub x: u16,
    pub y: u16,
    pub aux: u8,
    pub pad: u8,
}

impl GraphireReport {
    pub fn parse(data: &[u8]) -> Result<Self, ReportError> {
        let Some(&[marker, status, x_lo, x_hi, y_lo, y_hi, aux, pad]) =
            data.first_chunk::<{ layout::REPORT_LEN }>()
        else {
            return Err(ReportError::unrecognized(data));
        };
        if marker != report_ids::STATUS {
            return Err(ReportError::unrecognized(data));
        }
        Ok(Self {
            status,
            x: u16::from_le_bytes([x_lo, x_hi]),
            y: u16::from_le_bytes([y_lo, y_hi]),
            aux,
            pad,
        })
    }

    /// Tool in proximity, `Tool::None` unless both proximity and active area
    /// bits are set.
    pub fn tool(&self) -> Tool {
        let present = status::PROXIMITY | status::ACTIVE_AREA;
        if self.status & present != present {
            return Tool::None;
        }
        Tool::from_graphire_code((self.status >> status::TOOL_SHIFT) & status::TOOL_MASK)
    }

    /// Nine-bit pen pressure.
    pub fn pressure(&self) -> u16 {
        u16::from(self.aux) | (u16::from(self.status & status::PRESSURE_HIGH) << 5)
    }

    /// Mouse height above the surface, `44 - (aux >> 2)` clamped to `0..=31`.
    pub fn mouse_distance(&self) -> u8 {
        mouse_distance(self.aux)
    }

    /// `-1` (down), `+1` (up) or `0`.
    pub fn wheel_delta(&self) -> i8 {
        if self.aux & layout::WHEEL_DOWN != 0 {
            -1
        } else if self.aux & layout::WHEEL_UP != 0 {
            1
        } else {
            0
        }
    }

    /// Pad mask in key order: key 0 is bit 1 of the pad byte, key 1 is bit 0.
    pub fn pad_mask(&self) -> u16 {
        let raw = self.pad & layout::PAD_MASK;
        u16::from((raw & 0x02) >> 1) | (u16::from(raw & 0x01) << 1)
    }

    fn pressed(&self, bit: u8) -> bool {
        self.status & bit != 0
    }
}

/// Height formula shared by both mouse kinds.
pub fn mouse_distance(aux: u8) -> u8 {
    let raw = layout::DISTANCE_BIAS - i32::from(aux >> 2);
    let clamped = raw.clamp(0, layout::DISTANCE_CEIL);
    u8::try_from(clamped).unwrap_or(0)
}

/// Decode one Graphire buffer, updating `state` and appending events.
///
/// Fails only when the buffer is not a status report; in that case neither
/// `state` nor `out` is touched.
pub fn decode(
    data: &[u8],
    state: &mut DeviceState,
    out: &mut EventBatch,
) -> Result<(), ReportError> {
    let report = GraphireReport::parse(data)?;
    let tool = report.tool();

    if tool != state.tool {
        if state.tool.is_present() {
            clear_tool(state, out);
            state.leave_proximity(out);
            out.push(InputEvent::SyncBarrier);
        }
        state.tool = tool;
        state.enter_proximity(out);
    }

    if tool.is_present() {
        out.push(InputEvent::PositionUpdate {
            x: u32::from(report.x),
            y: u32::from(report.y),
        });
        if tool.is_mouse() {
            decode_mouse(&report, tool, state, out);
        } else if tool.is_stylus() {
            decode_stylus(&report, tool, state, out);
        }
        out.push(InputEvent::SyncBarrier);
    }

    if state.update_pad_mask(report.pad_mask(), 2, out) {
        out.push(InputEvent::PadActive);
        out.push(InputEvent::SerialUpdate {
            serial: layout::PAD_SERIAL,
        });
        out.push(InputEvent::SyncBarrier);
    }

    Ok(())
}

/// Reset whatever the departing tool was holding.
fn clear_tool(state: &mut DeviceState, out: &mut EventBatch) {
    if state.tool.is_mouse() {
        state.release_tool_buttons(&ToolButtons::MOUSE_RELEASE_ORDER, out);
        out.push(InputEvent::DistanceUpdate {
            value: TabletVariant::Graphire.capabilities().axes.distance_max,
        });
    } else {
        state.release_tool_buttons(&ToolButtons::STYLUS_RELEASE_ORDER, out);
        out.push(InputEvent::PressureUpdate { value: 0 });
    }
}

fn decode_mouse(
    report: &GraphireReport,
    tool: Tool,
    state: &mut DeviceState,
    out: &mut EventBatch,
) {
    if tool == Tool::MouseWithWheel {
        state.set_tool_button(ToolButtons::MIDDLE, report.pressed(status::BUTTON_2), out);
        let delta = report.wheel_delta();
        if delta != 0 {
            out.push(InputEvent::WheelDelta { delta });
        }
    }
    state.set_tool_button(ToolButtons::LEFT, report.pressed(status::BUTTON_0), out);
    state.set_tool_button(ToolButtons::RIGHT, report.pressed(status::BUTTON_1), out);
    out.push(InputEvent::DistanceUpdate {
        value: report.mouse_distance(),
    });
}

fn decode_stylus(
    report: &GraphireReport,
    tool: Tool,
    state: &mut DeviceState,
    out: &mut EventBatch,
) {
    out.push(InputEvent::PressureUpdate {
        value: report.pressure(),
    });
    state.set_tool_button(ToolButtons::TOUCH, report.pressed(status::BUTTON_0), out);
    state.set_tool_button(ToolButtons::STYLUS, report.pressed(status::BUTTON_1), out);
    state.set_tool_button(
        ToolButtons::STYLUS2,
        tool == Tool::Pen && report.pressed(status::BUTTON_2),
        out,
    );
}
