// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rise/set curve assembly: the penumbral rise/set limit (split into two
//! sub-curves, or joined into one, depending on whether both limits are
//! present at greatest eclipse) and the curve of maximum eclipse as seen
//! along the rise/set terminator.
//!
//! Grounded on `generateEclipseMap`'s rise/set section and
//! `bothPenumbraLimitsPresent`.

use crate::besselian;
use crate::config::{MAX_ADAPTIVE_SAMPLES, RISE_SET_BISECTION_ITERATIONS, RISE_SET_DENSIFICATION_THRESHOLD_DEG, RISE_SET_INITIAL_SAMPLES};
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;
use crate::geometry::{cross_terms, max_eclipse_at_rise_set, rise_set_line_point, GeoTimePoint};

/// The penumbral rise/set limit, which is either a single continuous curve
/// or two separate sub-curves depending on whether the shadow axis grazes
/// Earth at all near greatest eclipse.
#[derive(Debug, Clone)]
pub enum RiseSetLimits {
    /// Only one penumbra limit exists at greatest eclipse; the two
    /// rise/set branches have been joined end-to-end into one curve.
    Single(Vec<GeoTimePoint>),
    /// Both penumbra limits exist at greatest eclipse, each giving rise to
    /// its own rise/set sub-curve.
    Two { p12: Vec<GeoTimePoint>, p34: Vec<GeoTimePoint> },
}

/// Test whether both penumbra limits exist at greatest eclipse, i.e.
/// whether the "first" branch of the rise/set line has a solution there.
///
/// Grounded on `bothPenumbraLimitsPresent`.
pub fn both_penumbra_limits_present(provider: &mut dyn EphemerisProvider, jd_mid: f64, f: f64) -> Result<bool> {
    Ok(sample_rise_set_point(provider, jd_mid, f, true)?.is_some())
}

fn sample_rise_set_point(provider: &mut dyn EphemerisProvider, jd: f64, f: f64, first: bool) -> Result<Option<GeoTimePoint>> {
    let rates = besselian::compute_rates(provider, jd, true)?;
    let state = rates.elements;
    let e2 = f * (2.0 - f);
    let (_, _, sdd, cdd) = cross_terms(state.d, e2);
    Ok(rise_set_line_point(state.x, state.y, state.d, state.mu, f, state.l1, sdd, cdd, first).map(|p| GeoTimePoint {
        jd,
        longitude: p.longitude,
        latitude: p.latitude,
    }))
}

fn sample_branch(provider: &mut dyn EphemerisProvider, jd_p1: f64, jd_p4: f64, f: f64, first: bool) -> Result<Vec<GeoTimePoint>> {
    const MINUTES_TO_DAYS: f64 = 1.0 / 1440.0;
    let n = ((jd_p4 - jd_p1) * 1440.0).ceil().max(0.0) as usize;
    let mut branch = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let jd = (jd_p1 + i as f64 * MINUTES_TO_DAYS).min(jd_p4);
        if let Some(p) = sample_rise_set_point(provider, jd, f, first)? {
            branch.push(p);
        }
    }
    Ok(branch)
}

/// Join two rise/set branches end-to-end, picking whichever orientation of
/// `b` places its nearest endpoint (in time) next to `a`'s last point.
fn join_branches(a: Vec<GeoTimePoint>, mut b: Vec<GeoTimePoint>) -> Vec<GeoTimePoint> {
    if a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }
    let a_last = a.last().unwrap().jd;
    let dist_to_back = (b.last().unwrap().jd - a_last).abs();
    let dist_to_front = (b.first().unwrap().jd - a_last).abs();
    if dist_to_back < dist_to_front {
        b.reverse();
    }
    let mut joined = a;
    joined.extend(b);
    joined
}

/// Assemble the penumbral rise/set limit curve(s) across `[jd_p1, jd_p4]`.
pub fn assemble_rise_set_limits(provider: &mut dyn EphemerisProvider, jd_p1: f64, jd_p4: f64, jd_mid: f64, f: f64) -> Result<RiseSetLimits> {
    let both = both_penumbra_limits_present(provider, jd_mid, f)?;
    let branch_a = sample_branch(provider, jd_p1, jd_p4, f, true)?;
    let branch_b = sample_branch(provider, jd_p1, jd_p4, f, false)?;

    if both {
        Ok(RiseSetLimits::Two { p12: branch_a, p34: branch_b })
    } else {
        Ok(RiseSetLimits::Single(join_branches(branch_a, branch_b)))
    }
}

fn sample_max_eclipse_point(provider: &mut dyn EphemerisProvider, jd: f64, f: f64, second_branch: bool) -> Result<Option<GeoTimePoint>> {
    let rates = besselian::compute_rates(provider, jd, true)?;
    let state = rates.elements;
    Ok(max_eclipse_at_rise_set(state.x, state.y, state.d, state.mu, f, state.l1, rates.bdot, rates.cdot, second_branch).map(|p| GeoTimePoint {
        jd,
        longitude: p.longitude,
        latitude: p.latitude,
    }))
}

/// Euclidean distance between two points' raw, unscaled longitude and
/// latitude -- used only to decide when the curve needs densifying, not as
/// a true geographic distance.
fn unscaled_distance(a: &GeoTimePoint, b: &GeoTimePoint) -> f64 {
    let dlon = a.longitude - b.longitude;
    let dlat = a.latitude - b.latitude;
    (dlon * dlon + dlat * dlat).sqrt()
}

/// Assemble the curve of maximum eclipse as seen from the rise/set
/// terminator, for one of the two branches (`second_branch` selects which).
///
/// Samples adaptively (doubling the point count up to
/// [`MAX_ADAPTIVE_SAMPLES`]) until the curve has enough valid points,
/// bisects at the boundaries between valid and invalid points, then
/// densifies until no two consecutive points are more than
/// [`RISE_SET_DENSIFICATION_THRESHOLD_DEG`] apart.
///
/// Grounded on the `maxEclipseAtRiseSet` loop in `generateEclipseMap`.
pub fn assemble_max_eclipse_at_rise_set(provider: &mut dyn EphemerisProvider, jd_p1: f64, jd_p4: f64, f: f64, second_branch: bool) -> Result<Vec<GeoTimePoint>> {
    let mut num_points = RISE_SET_INITIAL_SAMPLES;
    let mut samples: Vec<Option<GeoTimePoint>>;
    loop {
        samples = Vec::with_capacity(num_points);
        for i in 0..num_points {
            let t = i as f64 / (num_points - 1) as f64;
            let jd = jd_p1 + t * (jd_p4 - jd_p1);
            samples.push(sample_max_eclipse_point(provider, jd, f, second_branch)?);
        }
        let good = samples.iter().filter(|p| p.is_some()).count();
        if good == num_points || num_points >= MAX_ADAPTIVE_SAMPLES {
            break;
        }
        num_points = (2 * num_points + 1).min(MAX_ADAPTIVE_SAMPLES);
    }

    // Bisect at each boundary between a valid and an invalid sample to pin
    // down where the curve actually starts/ends.
    let mut refined: Vec<Option<GeoTimePoint>> = Vec::with_capacity(samples.len());
    for i in 0..samples.len() {
        refined.push(samples[i]);
        if i + 1 == samples.len() {
            continue;
        }
        if samples[i].is_some() == samples[i + 1].is_some() {
            continue;
        }
        let t_lo = i as f64 / (num_points - 1) as f64;
        let t_hi = (i + 1) as f64 / (num_points - 1) as f64;
        let mut lo_jd = jd_p1 + t_lo * (jd_p4 - jd_p1);
        let mut hi_jd = jd_p1 + t_hi * (jd_p4 - jd_p1);
        let lo_valid = samples[i].is_some();
        for _ in 0..RISE_SET_BISECTION_ITERATIONS {
            let mid_jd = (lo_jd + hi_jd) / 2.0;
            let mid = sample_max_eclipse_point(provider, mid_jd, f, second_branch)?;
            if mid.is_some() == lo_valid {
                lo_jd = mid_jd;
            } else {
                hi_jd = mid_jd;
            }
        }
        let boundary = if lo_valid {
            sample_max_eclipse_point(provider, lo_jd, f, second_branch)?
        } else {
            sample_max_eclipse_point(provider, hi_jd, f, second_branch)?
        };
        refined.push(boundary);
    }

    let mut points: Vec<GeoTimePoint> = refined.into_iter().flatten().collect();
    points.sort_by(|a, b| a.jd.partial_cmp(&b.jd).unwrap());

    // Densify: insert bisected midpoints wherever consecutive points are
    // too far apart, until the curve is smooth or points stop appearing.
    let mut i = 0;
    while i + 1 < points.len() {
        if unscaled_distance(&points[i], &points[i + 1]) <= RISE_SET_DENSIFICATION_THRESHOLD_DEG {
            i += 1;
            continue;
        }
        let mid_jd = (points[i].jd + points[i + 1].jd) / 2.0;
        match sample_max_eclipse_point(provider, mid_jd, f, second_branch)? {
            Some(mid) => {
                points.insert(i + 1, mid);
            }
            None => i += 1,
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn rise_set_limits_join_or_split_without_panicking() {
        let mut eph = LowPrecisionEphemeris::new();
        let limits = assemble_rise_set_limits(&mut eph, 2451545.0 - 0.05, 2451545.0 + 0.05, 2451545.0, F).unwrap();
        match limits {
            RiseSetLimits::Single(curve) => assert!(curve.len() <= 200),
            RiseSetLimits::Two { p12, p34 } => {
                assert!(p12.len() <= 200);
                assert!(p34.len() <= 200);
            }
        }
    }

    #[test]
    fn max_eclipse_curve_has_no_huge_jumps() {
        let mut eph = LowPrecisionEphemeris::new();
        let curve = assemble_max_eclipse_at_rise_set(&mut eph, 2451545.0 - 0.05, 2451545.0 + 0.05, F, false).unwrap();
        for pair in curve.windows(2) {
            assert!(unscaled_distance(&pair[0], &pair[1]) <= RISE_SET_DENSIFICATION_THRESHOLD_DEG * 4.0);
        }
    }
}
