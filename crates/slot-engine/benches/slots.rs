//! Slot generation and daily resolution benchmarks.
//!
//! Run with: `cargo bench --bench slots -p slot-engine`

use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use slot_engine::{
    generate, resolve_day, AdHocSlot, AdHocSlotId, DailyView, DayOfWeek, RuleId, SlotWindow,
    Status, WallTime, WeeklyRule,
};

fn t(s: &str) -> WallTime {
    s.parse().expect("valid wall-clock time")
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for duration in [15u32, 30, 60, 180] {
        group.bench_with_input(
            BenchmarkId::new("full_day", duration),
            &duration,
            |b, &duration| {
                b.iter(|| generate(black_box(t("00:00")), black_box(t("24:00")), duration, 5))
            },
        );
    }

    group.finish();
}

fn bench_resolve_day(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).expect("valid date");
    let window = |start: &str, end: &str, duration| SlotWindow {
        start_time: t(start),
        end_time: t(end),
        duration_minutes: duration,
        buffer_minutes: 0,
    };
    let view = DailyView {
        date,
        rules: vec![WeeklyRule {
            id: RuleId::new(),
            weekday: DayOfWeek::MONDAY,
            window: window("08:00", "18:00", 15),
            status: Status::Active,
        }],
        exception: None,
        adhoc_slots: (18..23)
            .map(|hour| AdHocSlot {
                id: AdHocSlotId::new(),
                date,
                window: window(&format!("{hour}:00"), &format!("{hour}:45"), 20),
                status: Status::Active,
            })
            .collect(),
    };

    c.bench_function("resolve_day/rule_plus_adhoc", |b| {
        b.iter(|| resolve_day(black_box(&view)))
    });
}

criterion_group!(benches, bench_generate, bench_resolve_day);
criterion_main!(benches);
