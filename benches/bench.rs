// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;

use eclipse_geometry::besselian;
use eclipse_geometry::ephemeris::LowPrecisionEphemeris;
use eclipse_geometry::rootfinder;
use eclipse_geometry::Ellipsoid;

const JD_NEAR_J2000: f64 = 2451545.0;

fn besselian_engine(c: &mut Criterion) {
    let mut eph = LowPrecisionEphemeris::new();

    c.bench_function("besselian::compute", |b| {
        b.iter(|| besselian::compute(&mut eph, black_box(JD_NEAR_J2000)).unwrap())
    });

    c.bench_function("besselian::compute_rates", |b| {
        b.iter(|| besselian::compute_rates(&mut eph, black_box(JD_NEAR_J2000), true).unwrap())
    });
}

fn shadow_limit_root_finder(c: &mut Criterion) {
    let mut eph = LowPrecisionEphemeris::new();
    let (_, f) = Ellipsoid::WGS84.get_params();
    let rates = besselian::compute_rates(&mut eph, JD_NEAR_J2000, true).unwrap();

    c.bench_function("rootfinder::find_roots (penumbra)", |b| {
        b.iter(|| rootfinder::find_roots(&rates.elements, &rates, black_box(f), true))
    });

    let umbra_rates = besselian::compute_rates(&mut eph, JD_NEAR_J2000, false).unwrap();
    c.bench_function("rootfinder::find_roots (umbra)", |b| {
        b.iter(|| rootfinder::find_roots(&umbra_rates.elements, &umbra_rates, black_box(f), false))
    });
}

fn full_map_assembly(c: &mut Criterion) {
    let (radius_m, f) = Ellipsoid::WGS84.get_params();
    let earth_radius_km = radius_m / 1000.0;

    // This JD is not near a real eclipse for the low-precision ephemeris, so
    // the benchmark measures whichever pipeline prefix runs before `BadJd`
    // is returned; it still exercises the Besselian engine, the classifier
    // and the minimum-distance solver on every iteration.
    c.bench_function("map::generate_eclipse_map", |b| {
        b.iter(|| {
            let mut eph = LowPrecisionEphemeris::new();
            let _ = eclipse_geometry::generate_eclipse_map(&mut eph, black_box(JD_NEAR_J2000), f, earth_radius_km);
        })
    });
}

criterion_group!(benches, besselian_engine, shadow_limit_root_finder, full_map_assembly);
criterion_main!(benches);
