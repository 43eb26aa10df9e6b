//! Tablet variants, tools, buttons and reporting speed.

use crate::error::SpeedError;
use crate::ids::{WACOM_VENDOR_ID, product_ids};
use serde::{Deserialize, Serialize};

/// Tool currently reported by the tablet. `None` means out of proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    None,
    Pen,
    Eraser,
    MouseWithWheel,
    MouseNoWheel,
}

impl Tool {
    /// Map the Graphire two-bit tool code (status bits 5-6).
    pub const fn from_graphire_code(code: u8) -> Self {
        match code & 0x03 {
            0 => Self::Pen,
            1 => Self::Eraser,
            2 => Self::MouseWithWheel,
            _ => Self::MouseNoWheel,
        }
    }

    pub const fn is_mouse(self) -> bool {
        matches!(self, Self::MouseWithWheel | Self::MouseNoWheel)
    }

    pub const fn is_stylus(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    pub const fn is_present(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Logical buttons reported through `ButtonChanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Left,
    Right,
    Middle,
    /// Tip contact.
    Touch,
    /// Lower barrel switch.
    Stylus,
    /// Upper barrel switch.
    Stylus2,
    /// Express key on the tablet pad, zero based.
    Pad(u8),
}

/// Reporting speed negotiated over the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    #[default]
    Low,
    High,
}

impl Speed {
    pub const fn from_high_speed(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }

    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// Attribute digit: `0` low, `1` high.
    pub const fn as_digit(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// Parse an operator-supplied speed value.
    ///
    /// Leading blanks are skipped and only the first character is read, so
    /// `"1\n"` and `" 0"` are accepted. Anything other than `0`/`1` fails.
    pub fn parse_attr(input: &str) -> Result<Self, SpeedError> {
        match input.trim_start().chars().next() {
            Some('0') => Ok(Self::Low),
            Some('1') => Ok(Self::High),
            _ => Err(SpeedError::InvalidSpeedValue {
                input: input.trim_end().to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::High => f.write_str("high"),
        }
    }
}

/// Absolute axis ranges advertised for a variant. Minimums are all zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLimits {
    pub x_max: u16,
    pub y_max: u16,
    pub pressure_max: u16,
    pub distance_max: u8,
}

/// What a variant can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletCapabilities {
    pub axes: AxisLimits,
    pub tools: &'static [Tool],
    pub buttons: &'static [Button],
    pub pad_buttons: u8,
    pub has_wheel: bool,
}

const GRAPHIRE_TOOLS: &[Tool] = &[
    Tool::Pen,
    Tool::Eraser,
    Tool::MouseWithWheel,
    Tool::MouseNoWheel,
];

const GRAPHIRE_BUTTONS: &[Button] = &[
    Button::Touch,
    Button::Stylus,
    Button::Stylus2,
    Button::Left,
    Button::Right,
    Button::Middle,
    Button::Pad(0),
    Button::Pad(1),
];

const INTUOS4_TOOLS: &[Tool] = &[Tool::Pen, Tool::Eraser];

const INTUOS4_BUTTONS: &[Button] = &[
    Button::Touch,
    Button::Stylus,
    Button::Stylus2,
    Button::Pad(0),
    Button::Pad(1),
    Button::Pad(2),
    Button::Pad(3),
    Button::Pad(4),
    Button::Pad(5),
    Button::Pad(6),
    Button::Pad(7),
    Button::Pad(8),
];

/// Supported tablet families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabletVariant {
    /// Graphire Bluetooth: single 8-byte status report.
    Graphire,
    /// Intuos4 WL: chained 10-byte sub-reports.
    Intuos4,
}

impl TabletVariant {
    pub fn from_product_id(product_id: u16) -> Option<Self> {
        match product_id {
            product_ids::GRAPHIRE_BLUETOOTH => Some(Self::Graphire),
            product_ids::INTUOS4_BLUETOOTH => Some(Self::Intuos4),
            _ => None,
        }
    }

    pub fn from_ids(vendor_id: u16, product_id: u16) -> Option<Self> {
        if vendor_id != WACOM_VENDOR_ID {
            return None;
        }
        Self::from_product_id(product_id)
    }

    pub const fn product_id(self) -> u16 {
        match self {
            Self::Graphire => product_ids::GRAPHIRE_BLUETOOTH,
            Self::Intuos4 => product_ids::INTUOS4_BLUETOOTH,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Graphire => "Wacom Graphire Bluetooth",
            Self::Intuos4 => "Wacom Intuos4 WL",
        }
    }

    pub const fn capabilities(self) -> TabletCapabilities {
        match self {
            Self::Graphire => TabletCapabilities {
                axes: AxisLimits {
                    x_max: 16704,
                    y_max: 12064,
                    pressure_max: 511,
                    distance_max: 32,
                },
                tools: GRAPHIRE_TOOLS,
                buttons: GRAPHIRE_BUTTONS,
                pad_buttons: 2,
                has_wheel: true,
            },
            Self::Intuos4 => TabletCapabilities {
                axes: AxisLimits {
                    x_max: 40640,
                    y_max: 25400,
                    pressure_max: 2047,
                    distance_max: 63,
                },
                tools: INTUOS4_TOOLS,
                buttons: INTUOS4_BUTTONS,
                pad_buttons: 9,
                has_wheel: false,
            },
        }
    }
}
