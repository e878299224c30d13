// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Umbral outline sampling: closed polylines tracing the umbra's footprint
//! on the ground at a fixed cadence between the first and last umbral
//! contact.
//!
//! Grounded on the umbra-outline section of `generateEclipseMap`.

use crate::besselian;
use crate::circumstances;
use crate::config::{UMBRAL_OUTLINE_CADENCE_DAYS, UMBRAL_OUTLINE_SAMPLES};
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;
use crate::geometry::{shadow_outline_point, GeoPoint};

/// Whether the umbra footprint at this instant is one of total eclipse or
/// annular eclipse, from the diameter ratio sampled at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Total,
    Annular,
}

/// A single closed umbral outline at one instant.
#[derive(Debug, Clone)]
pub struct UmbraOutline {
    pub jd: f64,
    pub kind: OutlineKind,
    pub points: Vec<GeoPoint>,
}

fn next_cadence_boundary(jd: f64, cadence: f64) -> f64 {
    (jd / cadence).floor() * cadence + cadence
}

fn prev_cadence_boundary(jd: f64, cadence: f64) -> f64 {
    (jd / cadence).floor() * cadence
}

/// Sample closed umbral outlines at [`UMBRAL_OUTLINE_CADENCE_DAYS`]
/// intervals between `jd_u1` and `jd_u4`.
pub fn sample_umbral_outlines(provider: &mut dyn EphemerisProvider, jd_u1: f64, jd_u4: f64, f: f64) -> Result<Vec<UmbraOutline>> {
    let begin = next_cadence_boundary(jd_u1, UMBRAL_OUTLINE_CADENCE_DAYS);
    let end = prev_cadence_boundary(jd_u4, UMBRAL_OUTLINE_CADENCE_DAYS);

    let mut outlines = Vec::new();
    if begin > end {
        return Ok(outlines);
    }

    let steps = ((end - begin) / UMBRAL_OUTLINE_CADENCE_DAYS).round() as i64;
    for i in 0..=steps {
        let jd = begin + i as f64 * UMBRAL_OUTLINE_CADENCE_DAYS;

        let rates = besselian::compute_rates(provider, jd, false)?;
        let state = rates.elements;

        let mut points = Vec::with_capacity(UMBRAL_OUTLINE_SAMPLES + 1);
        for s in 0..UMBRAL_OUTLINE_SAMPLES {
            let alpha = s as f64 * std::f64::consts::TAU / UMBRAL_OUTLINE_SAMPLES as f64;
            if let Some(p) = shadow_outline_point(state.x, state.y, state.d, state.mu, f, state.l2, state.tan_f2, alpha) {
                points.push(p);
            }
        }
        if points.is_empty() {
            continue;
        }
        points.push(points[0]);

        let circ = circumstances::compute(provider, jd, f, 1.0)?;
        let kind = if circ.diameter_ratio >= 1.0 { OutlineKind::Total } else { OutlineKind::Annular };

        outlines.push(UmbraOutline { jd, kind, points });
    }

    Ok(outlines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn outlines_are_closed_rings() {
        let mut eph = LowPrecisionEphemeris::new();
        let outlines = sample_umbral_outlines(&mut eph, 2451545.0 - 0.01, 2451545.0 + 0.01, F).unwrap();
        for outline in &outlines {
            assert!(outline.points.len() >= 2);
            let first = outline.points.first().unwrap();
            let last = outline.points.last().unwrap();
            assert_eq!(first.longitude, last.longitude);
            assert_eq!(first.latitude, last.latitude);
        }
    }

    #[test]
    fn empty_window_yields_no_outlines() {
        let mut eph = LowPrecisionEphemeris::new();
        let outlines = sample_umbral_outlines(&mut eph, 2451545.0, 2451545.0 + 1e-6, F).unwrap();
        assert!(outlines.is_empty());
    }
}
