use chrono::{DateTime, Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use kitloan_booking::{
    available_units, check_window_capacity, Period, Reservation, ReservationId,
    ScheduleReservation,
};
use kitloan_catalog::{Equipment, EquipmentId};
use kitloan_core::{AggregateId, MemberId};

fn bench_equipment(total_units: u32) -> Equipment {
    Equipment::new(
        EquipmentId::new(AggregateId::new()),
        "Volleyball",
        total_units,
        None,
    )
    .unwrap()
}

fn bench_period(t: DateTime<Utc>, start_min: i64, end_min: i64) -> Period {
    Period::new(
        t + Duration::minutes(start_min),
        t + Duration::minutes(end_min),
        t,
    )
    .unwrap()
}

/// Active reservations with two-hour windows spread over the 48h horizon.
fn reservation_fleet(equipment: &Equipment, count: usize, t: DateTime<Utc>) -> Vec<Reservation> {
    (0..count)
        .map(|i| {
            let start = ((i as i64) * 37) % 2_760;
            Reservation::schedule(ScheduleReservation {
                reservation_id: ReservationId::new(AggregateId::new()),
                equipment_id: equipment.id_typed(),
                member_id: MemberId::new(),
                period: bench_period(t, start, start + 120),
                quantity: 1,
                status: None,
                occurred_at: t,
            })
            .unwrap()
        })
        .collect()
}

fn bench_conflict_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("conflict_scan");

    for reservation_count in [10usize, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*reservation_count as u64));
        group.bench_with_input(
            BenchmarkId::new("check_window_capacity", reservation_count),
            reservation_count,
            |b, &count| {
                let t = Utc::now();
                let equipment = bench_equipment(count as u32 + 8);
                let existing = reservation_fleet(&equipment, count, t);
                let candidate = bench_period(t, 600, 720);

                b.iter(|| {
                    check_window_capacity(
                        black_box(&equipment),
                        black_box(&candidate),
                        black_box(4),
                        black_box(&existing),
                        None,
                    )
                    .unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_availability_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability_fold");

    for reservation_count in [10usize, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*reservation_count as u64));
        group.bench_with_input(
            BenchmarkId::new("available_units", reservation_count),
            reservation_count,
            |b, &count| {
                let t = Utc::now();
                let equipment = bench_equipment(count as u32 + 8);
                let reservations = reservation_fleet(&equipment, count, t);

                b.iter(|| {
                    black_box(available_units(
                        black_box(&equipment),
                        black_box(&reservations),
                    ));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_conflict_scan, bench_availability_fold);
criterion_main!(benches);
