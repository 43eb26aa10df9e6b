use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tablet_hid_wacom_bt_protocol::{CountingSink, DeviceState, TabletVariant, route};

const GRAPHIRE_STROKE: [[u8; 8]; 4] = [
    [0x03, 0x90, 0x10, 0x20, 0x30, 0x10, 0x00, 0x00],
    [0x03, 0x91, 0x11, 0x20, 0x31, 0x10, 0x40, 0x00],
    [0x03, 0x99, 0x12, 0x20, 0x32, 0x10, 0xFF, 0x02],
    [0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
];

const INTUOS4_EXTENDED: [u8; 31] = [
    0x04, //
    0x02, 0xC2, 0x80, 0x21, 0x23, 0x45, 0x67, 0x81, 0x00, 0x00, //
    0x02, 0xE0, 0x12, 0x34, 0x0A, 0x0B, 0x40, 0x80, 0x00, 0x0D, //
    0x0C, 0x00, 0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("graphire_stroke", |b| {
        let mut state = DeviceState::new();
        b.iter(|| {
            for report in &GRAPHIRE_STROKE {
                let routed = route(TabletVariant::Graphire, black_box(report), &mut state);
                black_box(routed.is_ok());
            }
        });
    });

    group.bench_function("intuos4_extended", |b| {
        b.iter(|| {
            let mut state = DeviceState::new();
            black_box(route(
                TabletVariant::Intuos4,
                black_box(&INTUOS4_EXTENDED),
                &mut state,
            ))
        });
    });

    for len in [0usize, 8, 21, 31] {
        group.bench_with_input(BenchmarkId::new("rejected", len), &len, |b, &len| {
            let junk = vec![0xA5u8; len];
            let mut state = DeviceState::new();
            b.iter(|| black_box(route(TabletVariant::Intuos4, black_box(&junk), &mut state)));
        });
    }

    group.finish();
}

fn benchmark_session(c: &mut Criterion) {
    use tablet_hid_wacom_bt_protocol::{SessionConfig, TabletSession};

    c.bench_function("session_graphire_1k_reports", |b| {
        b.iter(|| {
            let mut session = TabletSession::new(TabletVariant::Graphire, SessionConfig::default());
            let mut sink = CountingSink::default();
            for i in 0..1000usize {
                let report = GRAPHIRE_STROKE.get(i % GRAPHIRE_STROKE.len()).copied().unwrap_or_default();
                session.handle_report(&report, &mut sink);
            }
            black_box(sink.events)
        });
    });
}

criterion_group!(benches, benchmark_decode, benchmark_session);
criterion_main!(benches);
