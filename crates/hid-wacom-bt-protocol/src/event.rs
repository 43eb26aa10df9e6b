//! Normalized input events and the sink they are delivered to.

use crate::types::{Button, Tool};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One normalized input event.
///
/// Events for a report are produced in order and a non-empty sequence always
/// ends with [`InputEvent::SyncBarrier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// A tool entered proximity, or (with `Tool::None`) the current tool left.
    ToolChanged { tool: Tool },
    PositionUpdate { x: u32, y: u32 },
    PressureUpdate { value: u16 },
    /// Hover height above the surface.
    DistanceUpdate { value: u8 },
    ButtonChanged { button: Button, pressed: bool },
    WheelDelta { delta: i8 },
    ProximityLost,
    /// End of one logical input frame.
    SyncBarrier,
    /// Marks a pad frame; pad keys are reported as their own pseudo-tool.
    PadActive,
    /// Misc channel: composite tool id, `0` when leaving proximity.
    ToolIdUpdate { id: u32 },
    /// Serial channel: per-tool serial, or the pad marker.
    SerialUpdate { serial: u32 },
}

impl InputEvent {
    pub const fn is_sync(&self) -> bool {
        matches!(self, InputEvent::SyncBarrier)
    }
}

/// Inline capacity covers a full extended Intuos4 buffer of pad reports.
pub const EVENT_BATCH_INLINE: usize = 64;

/// Events produced by one delivered buffer.
pub type EventBatch = SmallVec<[InputEvent; EVENT_BATCH_INLINE]>;

/// Host-provided consumer of decoded events.
pub trait EventSink {
    fn emit(&mut self, event: InputEvent);
}

impl EventSink for Vec<InputEvent> {
    fn emit(&mut self, event: InputEvent) {
        self.push(event);
    }
}

impl EventSink for EventBatch {
    fn emit(&mut self, event: InputEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: InputEvent) {
        (**self).emit(event);
    }
}

/// Sink that only counts, for callers that care about state and not events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingSink {
    pub events: u64,
    pub frames: u64,
}

impl EventSink for CountingSink {
    fn emit(&mut self, event: InputEvent) {
        self.events = self.events.saturating_add(1);
        if event.is_sync() {
            self.frames = self.frames.saturating_add(1);
        }
    }
}
