//! Wacom Bluetooth vendor, product, and report constants.
//!
//! Verified against the Linux kernel driver `drivers/hid/hid-wacom.c`
//! (Bluetooth Graphire / Intuos4 support) and `drivers/hid/hid-ids.h`.

/// Wacom USB/Bluetooth vendor ID.
pub const WACOM_VENDOR_ID: u16 = 0x056A;

/// Product IDs of the supported Bluetooth tablets.
pub mod product_ids {
    /// Graphire Bluetooth (`USB_DEVICE_ID_WACOM_GRAPHIRE_BLUETOOTH`).
    pub const GRAPHIRE_BLUETOOTH: u16 = 0x0081;
    /// Intuos4 WL (`USB_DEVICE_ID_WACOM_INTUOS4_BLUETOOTH`).
    pub const INTUOS4_BLUETOOTH: u16 = 0x00BD;
}

/// Leading marker bytes of delivered input buffers.
pub mod report_ids {
    /// Tablet status report. On the Intuos4 this is the "normal" framing.
    pub const STATUS: u8 = 0x03;
    /// Intuos4 "extended" framing: two or more chained sub-reports.
    pub const STATUS_EXTENDED: u8 = 0x04;
}

/// Byte layout of the Graphire status report.
pub mod graphire {
    /// Marker plus seven payload bytes.
    pub const REPORT_LEN: usize = 8;

    pub const STATUS: usize = 1;
    pub const X: usize = 2;
    pub const Y: usize = 4;
    /// Pressure low byte for pens; wheel bits and height for mice.
    pub const AUX: usize = 6;
    pub const PAD: usize = 7;

    /// Status byte bits.
    pub mod status {
        pub const BUTTON_0: u8 = 0x01;
        pub const BUTTON_1: u8 = 0x02;
        pub const BUTTON_2: u8 = 0x04;
        /// Ninth pressure bit; shifted left by 5 into bit 8.
        pub const PRESSURE_HIGH: u8 = 0x08;
        pub const ACTIVE_AREA: u8 = 0x10;
        pub const TOOL_SHIFT: u8 = 5;
        pub const TOOL_MASK: u8 = 0x03;
        pub const PROXIMITY: u8 = 0x80;
    }

    pub const WHEEL_DOWN: u8 = 0x01;
    pub const WHEEL_UP: u8 = 0x02;
    pub const PAD_MASK: u8 = 0x03;

    /// Serial reported alongside pad button changes.
    pub const PAD_SERIAL: u32 = 0xF0;

    /// Mouse height: `clamp(DISTANCE_BIAS - (aux >> 2), 0, DISTANCE_CEIL)`.
    pub const DISTANCE_BIAS: i32 = 44;
    pub const DISTANCE_CEIL: i32 = 31;
}

/// Byte layout of the Intuos4 framing and sub-reports.
pub mod intuos4 {
    pub const SUB_REPORT_LEN: usize = 10;
    /// Offset of the first sub-report (after the outer marker).
    pub const FIRST_SUB_REPORT: usize = 1;

    /// Sub-report type byte (`data[0]` of a sub-report).
    pub mod sub_types {
        pub const EMPTY: u8 = 0x00;
        pub const PEN: u8 = 0x02;
        pub const FEATURES: u8 = 0x03;
        pub const BUTTONS: u8 = 0x0C;
    }

    /// Pen sub-report code (`data[1]`) values with special meaning.
    pub mod pen_codes {
        pub const OUT_OF_PROXIMITY: u8 = 0x80;
        pub const TOOL_ID: u8 = 0xC2;

        pub const PRESSURE_LSB: u8 = 0x01;
        pub const STYLUS: u8 = 0x02;
        pub const STYLUS2: u8 = 0x04;
    }

    /// Composite tool identifiers from the tool-identification report.
    pub mod tool_ids {
        pub const PEN: u32 = 0x10_0802;
        pub const ERASER: u32 = 0x10_080A;
    }

    /// Device id reported on the misc channel with pad events.
    pub const PAD_DEVICE_ID: u32 = 0x0F;
    /// Serial reported alongside pad button changes.
    pub const PAD_SERIAL: u32 = 0xFFFF_FFFF;
    pub const PAD_BUTTON_COUNT: u8 = 9;
}

/// Two-byte feature reports written on the control channel.
pub mod feature_reports {
    /// Selects tablet mode with high-speed reporting (Intuos4).
    pub const SET_TABLET_MODE: [u8; 2] = [0x03, 0x20];
    /// Prepares the device for a speed change.
    pub const SPEED_PREPARE: [u8; 2] = [0x03, 0x00];
    pub const SPEED_LOW: [u8; 2] = [0x05, 0x00];
    pub const SPEED_HIGH: [u8; 2] = [0x06, 0x00];
}
