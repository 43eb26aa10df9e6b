//! Fuzzes a session fed with a stream of arbitrary reports.
//!
//! The first byte picks the variant; each following chunk of up to 31 bytes
//! is one report.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_wacom_bt_stream
#![no_main]
use libfuzzer_sys::fuzz_target;
use tablet_hid_wacom_bt_protocol::{CountingSink, SessionConfig, TabletSession, TabletVariant};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let variant = if selector & 1 == 0 {
        TabletVariant::Graphire
    } else {
        TabletVariant::Intuos4
    };
    let mut session = TabletSession::new(variant, SessionConfig::default());
    let mut sink = CountingSink::default();
    for report in rest.chunks(31) {
        // Must never panic on arbitrary bytes.
        session.handle_report(report, &mut sink);
    }
    assert_eq!(session.stats().events_emitted, sink.events);
});
