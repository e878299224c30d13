// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Exercises `generate_eclipse_map` against `LowPrecisionEphemeris` for a
//! caller-given Julian Date, then writes a KML document and a PNG map. This
//! is a smoke test for the renderer contracts, not part of the crate's
//! specified interface.
//!
//! Usage: `cargo run --example eclipse_demo -- <julian-date>`

use std::env;
use std::fs::File;
use std::io::BufWriter;

use eclipse_geometry::ephemeris::LowPrecisionEphemeris;
use eclipse_geometry::render::{kml, png};
use eclipse_geometry::Ellipsoid;

fn main() {
    env_logger::init();

    let jd: f64 = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2451545.0);

    let mut eph = LowPrecisionEphemeris::new();
    let (radius_m, f) = Ellipsoid::WGS84.get_params();

    let data = match eclipse_geometry::generate_eclipse_map(&mut eph, jd, f, radius_m / 1000.0) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("no eclipse map for JD {jd}: {e}");
            std::process::exit(1);
        }
    };

    let kml_file = File::create("eclipse.kml").expect("create eclipse.kml");
    kml::write(&data, &mut BufWriter::new(kml_file)).expect("write eclipse.kml");

    let canvas = png::render(&data, 2048);
    canvas.save("eclipse.png").expect("write eclipse.png");

    println!("wrote eclipse.kml and eclipse.png for JD {jd} ({:?})", data.eclipse_type);
}
