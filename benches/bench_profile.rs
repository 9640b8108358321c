//! # Motion profile and odometry benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use motion_ctrl::loc::Odometry;
use motion_ctrl::profile::TrapezoidProfile;
use motion_ctrl::units::{
    degrees, meters, meters_per_second, meters_per_second_squared, seconds, Linear,
};

fn motion_benchmark(c: &mut Criterion) {
    // ---- Profile evaluation ----

    let profile = TrapezoidProfile::<Linear>::new(
        meters_per_second_squared(2.0),
        meters_per_second_squared(1.5),
        meters_per_second(1.2),
        meters(4.0),
    )
    .unwrap();
    let total_s = profile.get_total_time().get::<uom::si::time::second>();

    c.bench_function("profile_calculate", |b| {
        let mut t = 0.0;
        b.iter(|| {
            // Sweep the whole profile at the nominal 20 ms sample period
            t += 0.02;
            if t > total_s {
                t = 0.0;
            }
            black_box(profile.calculate(seconds(t)))
        })
    });

    // ---- Odometry update ----

    let odom = Odometry::new(meters(0.05));

    c.bench_function("odometry_update", |b| {
        let mut reading = 0.0;
        b.iter(|| {
            reading += 0.01;
            odom.update(
                meters(reading),
                meters(reading * 1.01),
                meters(0.0),
                degrees(reading),
            );
            black_box(odom.get_position())
        })
    });
}

criterion_group!(benches, motion_benchmark);
criterion_main!(benches);
