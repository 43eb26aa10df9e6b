//! Fuzzes single-report routing for both Bluetooth tablet variants.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_wacom_bt_report
#![no_main]
use libfuzzer_sys::fuzz_target;
use tablet_hid_wacom_bt_protocol::{DeviceState, TabletVariant, route};

fuzz_target!(|data: &[u8]| {
    for variant in [TabletVariant::Graphire, TabletVariant::Intuos4] {
        let mut state = DeviceState::new();
        let before = state;
        match route(variant, data, &mut state) {
            Ok(routed) => {
                if let Some(last) = routed.events.last() {
                    assert!(last.is_sync());
                }
            }
            Err(_) => assert_eq!(state, before),
        }
    }
});
