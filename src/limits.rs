// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The limit-curve assembler: samples the shadow-limit root finder across
//! an eclipse's time window, refines the sample grid around root-count
//! changes and `zeta` sign flips, and stitches the survivors into
//! above-horizon north/south limit curves.
//!
//! Grounded on `computeNSLimitsOfShadow`.

use crate::besselian::{self, BesselianRates};
use crate::config::LIMIT_CURVE_BISECTION_FLOOR_DAYS;
use crate::error::{EclipseError, Result};
use crate::ephemeris::EphemerisProvider;
use crate::geometry::{compute_time_point, GeoTimePoint};
use crate::rootfinder::{self, ShadowRoot};

struct Sample {
    jd: f64,
    rates: BesselianRates,
    roots: Vec<ShadowRoot>,
}

fn sample_at(provider: &mut dyn EphemerisProvider, jd: f64, f: f64, penumbra: bool) -> Result<Sample> {
    let rates = besselian::compute_rates(provider, jd, penumbra)?;
    let roots = rootfinder::find_roots(&rates.elements, &rates, f, penumbra);
    Ok(Sample { jd, rates, roots })
}

/// Assemble the penumbra (`penumbra = true`) or umbra limit curves between
/// `jd_p1` and `jd_p4`, at the given Earth flattening `f`.
pub fn assemble_limits(provider: &mut dyn EphemerisProvider, jd_p1: f64, jd_p4: f64, f: f64, penumbra: bool) -> Result<Vec<Vec<GeoTimePoint>>> {
    const MINUTES_TO_DAYS: f64 = 1.0 / 1440.0;

    let i_max = ((jd_p4 - jd_p1) * 1440.0).ceil().max(0.0) as usize;
    let mut samples: Vec<Sample> = Vec::with_capacity(i_max);
    for i in 0..i_max {
        let jd = jd_p1 + i as f64 * MINUTES_TO_DAYS;
        samples.push(sample_at(provider, jd, f, penumbra)?);
    }

    // Drop samples with an odd number of roots; they indicate numerical
    // noise in the root finder rather than a genuine topology change.
    samples.retain(|s| {
        if s.roots.len() % 2 != 0 {
            log::warn!(
                "{}",
                EclipseError::NumericalWarning {
                    context: "limit-curve assembler: odd number of shadow-limit roots"
                }
            );
            false
        } else {
            true
        }
    });

    // Bisect where the root count changes, to pin down the jump.
    let mut i = 1;
    while i < samples.len() {
        let (jd_a, jd_b, count_a, count_b) = (samples[i - 1].jd, samples[i].jd, samples[i - 1].roots.len(), samples[i].roots.len());
        if (jd_a - jd_b).abs() <= LIMIT_CURVE_BISECTION_FLOOR_DAYS {
            i += 1;
            continue;
        }
        if count_a != count_b {
            let mid_jd = (jd_a + jd_b) / 2.0;
            let mid = sample_at(provider, mid_jd, f, penumbra)?;
            if mid.roots.len() % 2 != 0 {
                log::warn!(
                    "{}",
                    EclipseError::NumericalWarning {
                        context: "limit-curve assembler: odd root count while bisecting a count change"
                    }
                );
            }
            samples.insert(i, mid);
            // Retry with the first of the two new intervals.
            continue;
        }
        i += 1;
    }

    // Bisect where zeta changes sign within an equal-count pair.
    let mut i = 1;
    while i < samples.len() {
        let jd_a = samples[i - 1].jd;
        let jd_b = samples[i].jd;
        if samples[i - 1].roots.len() != samples[i].roots.len() {
            i += 1;
            continue;
        }
        if (jd_a - jd_b).abs() <= LIMIT_CURVE_BISECTION_FLOOR_DAYS {
            i += 1;
            continue;
        }
        let flips = samples[i - 1]
            .roots
            .iter()
            .zip(samples[i].roots.iter())
            .any(|(a, b)| a.zeta * b.zeta < 0.0);
        if flips {
            let mid_jd = (jd_a + jd_b) / 2.0;
            let mid = sample_at(provider, mid_jd, f, penumbra)?;
            if mid.roots.len() % 2 != 0 {
                log::warn!(
                    "{}",
                    EclipseError::NumericalWarning {
                        context: "limit-curve assembler: odd root count while bisecting a zeta sign change"
                    }
                );
            }
            samples.insert(i, mid);
            continue;
        }
        i += 1;
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    #[derive(Clone, Copy)]
    struct Point {
        jd: f64,
        zeta: f64,
        lon: f64,
        lat: f64,
    }

    let mut lines: Vec<Vec<Point>> = vec![Vec::new(); samples[0].roots.len()];
    let mut start_n = 0usize;
    for (i, sample) in samples.iter().enumerate() {
        if i > 0 && sample.roots.len() != samples[i - 1].roots.len() {
            start_n = lines.len();
            lines.resize(lines.len() + sample.roots.len(), Vec::new());
        }
        let state = sample.rates.elements;
        let (l, tan_f) = if penumbra { (state.l1, state.tan_f1) } else { (state.l2, state.tan_f2) };
        for (n, root) in sample.roots.iter().enumerate() {
            if let Some(geo) = compute_time_point(state.x, state.y, state.d, state.mu, f, l, tan_f, root.q, root.zeta) {
                lines[start_n + n].push(Point {
                    jd: sample.jd,
                    zeta: root.zeta,
                    lon: geo.longitude,
                    lat: geo.latitude,
                });
            }
        }
    }

    // Keep only the above-horizon (zeta >= 0) portion of each line; a sign
    // flip splits a line into a surviving prefix and a surviving suffix.
    let mut n = 0;
    while n < lines.len() {
        let line = &lines[n];
        if line.is_empty() {
            n += 1;
            continue;
        }
        let Some(neg_idx) = line.iter().position(|p| p.zeta < 0.0) else {
            n += 1;
            continue;
        };
        let Some(nonneg_idx) = line.iter().position(|p| p.zeta >= 0.0) else {
            lines[n].clear();
            n += 1;
            continue;
        };

        if nonneg_idx == 0 {
            // Starts above the horizon, then dips below. Split off the
            // above-horizon suffix (if any) as a new line.
            if let Some(next_nonneg_rel) = line[neg_idx..].iter().position(|p| p.zeta >= 0.0) {
                let next_nonneg = neg_idx + next_nonneg_rel;
                let suffix: Vec<Point> = line[next_nonneg..].to_vec();
                lines.push(suffix);
            }
            lines[n].truncate(neg_idx);
            n += 1;
        } else {
            // Starts below the horizon; drop the negative-zeta head and
            // keep checking the remainder from the same index.
            let line = &mut lines[n];
            let next_nonneg = line[neg_idx..].iter().position(|p| p.zeta >= 0.0).map(|rel| neg_idx + rel);
            match next_nonneg {
                Some(next_nonneg) => {
                    line.drain(neg_idx..next_nonneg);
                    if line.is_empty() {
                        n += 1;
                    }
                    // else: re-check the same line, it may still have negative zetas further on
                }
                None => {
                    line.truncate(neg_idx);
                    n += 1;
                }
            }
        }
    }

    let mut limits = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        limits.push(
            line.into_iter()
                .map(|p| GeoTimePoint {
                    jd: p.jd,
                    longitude: p.lon,
                    latitude: p.lat,
                })
                .collect(),
        );
    }
    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn limits_are_all_above_horizon() {
        let mut eph = LowPrecisionEphemeris::new();
        let limits = assemble_limits(&mut eph, 2451545.0, 2451545.05, F, true).unwrap();
        for line in &limits {
            assert!(!line.is_empty());
            for p in line {
                assert!((-180.0..=180.0).contains(&p.longitude));
                assert!((-90.0..=90.0).contains(&p.latitude));
            }
        }
    }

    #[test]
    fn empty_window_yields_no_limits() {
        let mut eph = LowPrecisionEphemeris::new();
        let limits = assemble_limits(&mut eph, 2451545.0, 2451545.0, F, true).unwrap();
        assert!(limits.is_empty());
    }
}
