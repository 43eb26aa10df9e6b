//! Per-device decode state and the edge-triggered diff helpers.
//!
//! Every button event leaving the decoders goes through this module so that
//! a `ButtonChanged` is produced exactly once per changed bit and never for a
//! bit that did not move.

use crate::event::{EventBatch, InputEvent};
use crate::types::{Button, Tool};
use bitflags::bitflags;

bitflags! {
    /// Buttons owned by the tool in proximity (as opposed to pad keys).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToolButtons: u8 {
        const TOUCH = 1 << 0;
        const STYLUS = 1 << 1;
        const STYLUS2 = 1 << 2;
        const LEFT = 1 << 3;
        const RIGHT = 1 << 4;
        const MIDDLE = 1 << 5;
    }
}

impl ToolButtons {
    /// Release order used when a stylus leaves: tip first.
    pub const STYLUS_RELEASE_ORDER: [ToolButtons; 3] =
        [ToolButtons::TOUCH, ToolButtons::STYLUS, ToolButtons::STYLUS2];

    /// Release order used when a mouse leaves.
    pub const MOUSE_RELEASE_ORDER: [ToolButtons; 3] =
        [ToolButtons::LEFT, ToolButtons::RIGHT, ToolButtons::MIDDLE];

    /// Logical button for a single flag. Multi-bit values have no mapping.
    pub fn button(self) -> Option<Button> {
        const MAP: [(ToolButtons, Button); 6] = [
            (ToolButtons::TOUCH, Button::Touch),
            (ToolButtons::STYLUS, Button::Stylus),
            (ToolButtons::STYLUS2, Button::Stylus2),
            (ToolButtons::LEFT, Button::Left),
            (ToolButtons::RIGHT, Button::Right),
            (ToolButtons::MIDDLE, Button::Middle),
        ];
        MAP.iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, button)| *button)
    }
}

/// Mutable per-device record, owned by exactly one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    /// Last reported tool.
    pub tool: Tool,
    /// Whether `ToolChanged { tool }` has been emitted for `tool`.
    pub in_proximity: bool,
    /// Pad keys, bit `n` is `Button::Pad(n)`.
    pub button_mask: u16,
    pub tool_buttons: ToolButtons,
    /// Composite pen identifier, `0` when unknown.
    pub tool_id: u32,
    pub serial: u32,
    /// Last feature-report payload. Opaque.
    pub feature_byte: u8,
    /// Last successfully negotiated speed.
    pub high_speed: bool,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one tool button and emit `ButtonChanged` if it moved.
    pub fn set_tool_button(&mut self, flag: ToolButtons, pressed: bool, out: &mut EventBatch) {
        if self.tool_buttons.contains(flag) == pressed {
            return;
        }
        self.tool_buttons.set(flag, pressed);
        if let Some(button) = flag.button() {
            out.push(InputEvent::ButtonChanged { button, pressed });
        }
    }

    /// Release the given buttons in order, emitting only for held ones.
    pub fn release_tool_buttons(&mut self, order: &[ToolButtons], out: &mut EventBatch) {
        for &flag in order {
            self.set_tool_button(flag, false, out);
        }
    }

    /// Replace the pad mask and emit one `ButtonChanged` per changed key,
    /// lowest key first. Returns whether anything changed.
    pub fn update_pad_mask(&mut self, next: u16, key_count: u8, out: &mut EventBatch) -> bool {
        let changed = self.button_mask ^ next;
        if changed == 0 {
            return false;
        }
        for key in 0..key_count.min(16) {
            let bit = 1u16 << key;
            if changed & bit != 0 {
                out.push(InputEvent::ButtonChanged {
                    button: Button::Pad(key),
                    pressed: next & bit != 0,
                });
            }
        }
        self.button_mask = next;
        true
    }

    /// Announce the stored tool if that has not happened yet.
    pub fn enter_proximity(&mut self, out: &mut EventBatch) {
        if self.in_proximity || !self.tool.is_present() {
            return;
        }
        self.in_proximity = true;
        out.push(InputEvent::ToolChanged { tool: self.tool });
    }

    /// Emit the leave pair and forget the tool.
    pub fn leave_proximity(&mut self, out: &mut EventBatch) {
        out.push(InputEvent::ToolChanged { tool: Tool::None });
        out.push(InputEvent::ProximityLost);
        self.tool = Tool::None;
        self.in_proximity = false;
    }
}
