// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Point geometry: conversion from shadow-cone coordinates to geographic
//! longitude/latitude on an oblate Earth.
//!
//! Every function here returns `None` instead of the reference
//! implementation's `latitude > 90` / `JD = -1` sentinels.

use crate::config::UNNORMALIZED_VECTOR_TOLERANCE;
use crate::constants::ERFA_DR2D;
use crate::error::EclipseError;
use crate::misc::norm_angle;

/// A geographic point. Longitude is in `(-180, 180]` degrees, latitude in
/// `[-90, 90]` degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A geographic point tagged with the Julian Date it was computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTimePoint {
    pub jd: f64,
    pub longitude: f64,
    pub latitude: f64,
}

/// `e^2`, `rho1 = sqrt(1 - e^2*cos^2(d))`, and the two `d`-only auxiliaries
/// `sd1 = sin(d)/rho1`, `cd1 = sqrt(1-e^2)*cos(d)/rho1` that appear in both
/// the contact-point and shadow-outline conversions.
pub(crate) fn d_terms(d: f64, e2: f64) -> (f64, f64, f64) {
    let rho1 = (1.0 - e2 * d.cos().powi(2)).sqrt();
    let sd1 = d.sin() / rho1;
    let cd1 = (1.0 - e2).sqrt() * d.cos() / rho1;
    (rho1, sd1, cd1)
}

/// `rho1`, `rho2`, and the `(d1-d2)` cross terms `sdd`, `cdd` shared by the
/// shadow-limit root finder and the limit-curve point conversion.
pub(crate) fn cross_terms(d: f64, e2: f64) -> (f64, f64, f64, f64) {
    let rho1 = (1.0 - e2 * d.cos().powi(2)).sqrt();
    let rho2 = (1.0 - e2 * d.sin().powi(2)).sqrt();
    let sdd = e2 * d.sin() * d.cos() / (rho1 * rho2);
    let cdd = (1.0 - sdd * sdd).sqrt();
    (rho1, rho2, sdd, cdd)
}

fn wrap_longitude(theta_deg: f64, mu_deg: f64) -> f64 {
    let mut lambda = (theta_deg - mu_deg + 180.0) % 360.0;
    if lambda < 0.0 {
        lambda += 360.0;
    }
    lambda - 180.0
}

fn latitude_from_sfn1(ff: f64, sfn1: f64) -> f64 {
    (ff * sfn1 / (1.0 - sfn1 * sfn1).sqrt()).atan() * ERFA_DR2D
}

/// Convert a shadow-axis contact point `(x, y, d, mu)` to a [`GeoPoint`] on
/// an Earth ellipsoid of flattening `f`.
///
/// Grounded on `getContactCoordinates`.
pub fn contact_point(x: f64, y: f64, d: f64, mu: f64, f: f64) -> Option<GeoPoint> {
    let e2 = f * (2.0 - f);
    let ff = 1.0 / (1.0 - f);
    let (rho1, sd1, cd1) = d_terms(d, e2);

    let y1 = y / rho1;
    let m1 = (x * x + y1 * y1).sqrt();
    if m1 == 0.0 {
        return None;
    }
    let eta1 = y1 / m1;

    let theta = (x / m1).atan2(-eta1 * sd1) * ERFA_DR2D;
    let longitude = wrap_longitude(theta, mu);
    let latitude = latitude_from_sfn1(ff, eta1 * cd1);

    if !(longitude.is_finite() && latitude.is_finite()) {
        return None;
    }
    Some(GeoPoint { longitude, latitude })
}

/// Convert a point on the umbral/penumbral shadow-cone limb, at angle
/// `alpha` around the cone, to a [`GeoPoint`].
///
/// Grounded on `getShadowOutlineCoordinates`'s three-pass fixed-point loop.
pub fn shadow_outline_point(x: f64, y: f64, d: f64, mu: f64, f: f64, l: f64, tan_f: f64, alpha: f64) -> Option<GeoPoint> {
    let e2 = f * (2.0 - f);
    let ff = 1.0 / (1.0 - f);
    let (rho1, sd1, cd1) = d_terms(d, e2);

    let mut zeta1 = 0.0;
    let mut xi = 0.0;
    let mut eta1 = 0.0;
    for _ in 0..3 {
        let l1 = l - zeta1 * tan_f;
        xi = x - l1 * alpha.sin();
        eta1 = (y - l1 * alpha.cos()) / rho1;
        let discriminant = 1.0 - xi * xi - eta1 * eta1;
        if discriminant < 0.0 {
            return None;
        }
        zeta1 = discriminant.sqrt();
    }

    let theta = xi.atan2(-eta1 * sd1 + zeta1 * cd1) * ERFA_DR2D;
    let longitude = wrap_longitude(theta, mu);
    let sfn1 = eta1 * cd1 + zeta1 * sd1;
    let latitude = latitude_from_sfn1(ff, sfn1);

    if !(longitude.is_finite() && latitude.is_finite()) {
        return None;
    }

    if xi.abs() > UNNORMALIZED_VECTOR_TOLERANCE
        || eta1.abs() > UNNORMALIZED_VECTOR_TOLERANCE
        || zeta1.abs() > UNNORMALIZED_VECTOR_TOLERANCE
    {
        log::warn!(
            "{}",
            EclipseError::UnnormalizedVector {
                q_deg: alpha * ERFA_DR2D,
                xi,
                eta: eta1,
                zeta: zeta1,
            }
        );
    }

    Some(GeoPoint { longitude, latitude })
}

/// Convert a shadow-limit root `(Q, zeta)` found by [`crate::rootfinder`] to
/// a [`GeoPoint`].
///
/// Grounded on the tail of `computeTimePoint`.
pub fn compute_time_point(x: f64, y: f64, d: f64, mu: f64, f: f64, l: f64, tan_f: f64, q: f64, zeta: f64) -> Option<GeoPoint> {
    let e2 = f * (2.0 - f);
    let ff = 1.0 / (1.0 - f);
    let (rho1, rho2, sdd, cdd) = cross_terms(d, e2);
    let (_, sd1, cd1) = d_terms(d, e2);

    let lz = l - zeta * tan_f;
    let xi = x - lz * q.sin();
    let eta = y - lz * q.cos();
    let eta1 = eta / rho1;
    let zeta1 = (zeta / rho2 + eta1 * sdd) / cdd;

    let theta = xi.atan2(-eta1 * sd1 + zeta1 * cd1) * ERFA_DR2D;
    let longitude = wrap_longitude(theta, mu);
    let sfn1 = eta1 * cd1 + zeta1 * sd1;
    let latitude = latitude_from_sfn1(ff, sfn1);

    if !(longitude.is_finite() && latitude.is_finite()) {
        return None;
    }

    if xi.abs() > UNNORMALIZED_VECTOR_TOLERANCE
        || eta.abs() > UNNORMALIZED_VECTOR_TOLERANCE
        || zeta.abs() > UNNORMALIZED_VECTOR_TOLERANCE
    {
        log::warn!(
            "{}",
            EclipseError::UnnormalizedVector {
                q_deg: q * ERFA_DR2D,
                xi,
                eta,
                zeta,
            }
        );
    }

    Some(GeoPoint { longitude, latitude })
}

/// Find up to two points where the shadow-edge circle of radius `l` around
/// `(x, y)` crosses Earth's fundamental-plane border ellipse
/// `(cos t, k*sin t)`, and convert the selected one (`first` picks the
/// branch by the sign of `x*eta - y*xi`) to a [`GeoPoint`].
///
/// Grounded on `getRiseSetLineCoordinates`'s embedded root finder.
#[allow(clippy::too_many_arguments)]
pub fn rise_set_line_point(x: f64, y: f64, d: f64, mu: f64, f: f64, l: f64, sdd: f64, cdd: f64, first: bool) -> Option<GeoPoint> {
    let e2 = f * (2.0 - f);
    let ff = 1.0 / (1.0 - f);
    let rho1 = (1.0 - e2 * d.cos().powi(2)).sqrt();
    let k = 1.0 / (d.sin().powi(2) + d.cos().powi(2) / (1.0 - e2)).sqrt();

    let lhs = |t: f64| -> f64 {
        let ct = t.cos();
        let st = t.sin();
        (ct - x).powi(2) + (k * st - y).powi(2) - l * l
    };
    let dlhs = |t: f64| -> f64 {
        let ct = t.cos();
        let st = t.sin();
        -2.0 * (ct - x) * st + 2.0 * (k * st - y) * k * ct
    };

    let mut roots: Vec<f64> = Vec::new();
    for start in 0..4 {
        let mut t = start as f64 * std::f64::consts::FRAC_PI_2;
        let mut deflated_lhs = lhs(t);
        let mut deflated_dlhs = dlhs(t);
        for known in &roots {
            let delta = t - known;
            deflated_lhs /= (delta / 2.0).sin();
            deflated_dlhs = (deflated_dlhs - 0.5 * (delta / 2.0).cos() * deflated_lhs) / (delta / 2.0).sin();
        }

        for _ in 0..50 {
            if !(deflated_lhs.is_finite() && deflated_dlhs.is_finite()) {
                break;
            }
            if deflated_lhs.abs() < 1e-10 {
                break;
            }
            if deflated_dlhs == 0.0 {
                break;
            }
            let step = deflated_lhs / deflated_dlhs;
            if step.abs() > 1000.0 {
                break;
            }
            t -= step;

            deflated_lhs = lhs(t);
            deflated_dlhs = dlhs(t);
            for known in &roots {
                let delta = t - known;
                deflated_lhs /= (delta / 2.0).sin();
                deflated_dlhs = (deflated_dlhs - 0.5 * (delta / 2.0).cos() * deflated_lhs) / (delta / 2.0).sin();
            }
        }

        if deflated_lhs.is_finite() && deflated_lhs.abs() < 1e-8 {
            let normalized = norm_angle(t);
            if !roots.iter().any(|r: &f64| (r - normalized).abs() < 1e-6) {
                roots.push(normalized);
            }
        }
        if roots.len() >= 2 {
            break;
        }
    }

    if roots.is_empty() {
        return None;
    }

    let t = if roots.len() == 1 {
        roots[0]
    } else {
        let candidates: Vec<(f64, f64)> = roots
            .iter()
            .map(|&t| {
                let xi = t.cos() - x;
                let eta = k * t.sin() - y;
                (t, x * eta - y * xi)
            })
            .collect();
        let selected = candidates
            .iter()
            .find(|(_, cross)| if first { *cross < 0.0 } else { *cross >= 0.0 })
            .or_else(|| candidates.first())
            .unwrap();
        selected.0
    };

    let xi = t.cos() - x;
    let eta = k * t.sin() - y;
    let eta1 = eta / rho1;
    let zeta1 = eta1 * sdd / cdd;

    let (_, sd1, cd1) = d_terms(d, e2);
    let theta = xi.atan2(-eta1 * sd1 + zeta1 * cd1) * ERFA_DR2D;
    let longitude = wrap_longitude(theta, mu);
    let sfn1 = eta1 * cd1 + zeta1 * sd1;
    let latitude = latitude_from_sfn1(ff, sfn1);

    if !(longitude.is_finite() && latitude.is_finite()) {
        return None;
    }
    Some(GeoPoint { longitude, latitude })
}

/// Compute the sub-point of true greatest eclipse as seen from a location
/// where the Sun is on the horizon, along the branch selected by `bdot`,
/// `cdot`.
///
/// Grounded on `getMaximumEclipseAtRiseSet`'s three-pass fixed-point loop.
#[allow(clippy::too_many_arguments)]
pub fn max_eclipse_at_rise_set(x: f64, y: f64, d: f64, mu: f64, f: f64, l1: f64, bdot: f64, cdot: f64, second_branch: bool) -> Option<GeoPoint> {
    let e2 = f * (2.0 - f);
    let ff = 1.0 / (1.0 - f);
    let (rho1, _rho2, sdd, cdd) = cross_terms(d, e2);

    let mut qa = bdot.atan2(cdot);
    if second_branch {
        qa += std::f64::consts::PI;
    }
    let sigma = x * qa.cos() - y * qa.sin();

    let mut rho = 1.0;
    let mut gamma = 0.0;
    for _ in 0..3 {
        let s = sigma / rho;
        if s.abs() > 1.0 {
            return None;
        }
        gamma = s.asin() + qa;
        let (sg, cg) = gamma.sin_cos();
        rho = (rho1 * sg).atan2(cg).sin() / sg;
    }

    let (sg, cg) = gamma.sin_cos();
    let xi = rho * sg;
    let eta = rho * cg;
    if (x - xi).powi(2) + (y - eta).powi(2) > l1 * l1 {
        return None;
    }

    let eta1 = eta / rho1;
    let zeta1 = eta1 * sdd / cdd;

    let (_, sd1, cd1) = d_terms(d, e2);
    let theta = xi.atan2(-eta1 * sd1 + zeta1 * cd1) * ERFA_DR2D;
    let longitude = wrap_longitude(theta, mu);
    let sfn1 = eta1 * cd1 + zeta1 * sd1;
    let latitude = latitude_from_sfn1(ff, sfn1);

    if !(longitude.is_finite() && latitude.is_finite()) {
        return None;
    }
    Some(GeoPoint { longitude, latitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn contact_point_near_equator() {
        let p = contact_point(0.1, 0.01, 0.0, 45.0, F).unwrap();
        assert!((-180.0..=180.0).contains(&p.longitude));
        assert!((-90.0..=90.0).contains(&p.latitude));
    }

    #[test]
    fn shadow_outline_returns_none_outside_cone() {
        let p = shadow_outline_point(5.0, 5.0, 0.2, 10.0, F, 0.5, 0.01, 0.3);
        assert!(p.is_none());
    }

    #[test]
    fn shadow_outline_ring_is_bounded() {
        for i in 0..60 {
            let alpha = i as f64 * std::f64::consts::TAU / 60.0;
            if let Some(p) = shadow_outline_point(0.0, 0.0, 0.1, 30.0, F, 0.4, 0.005, alpha) {
                assert!((-180.0..=180.0).contains(&p.longitude));
                assert!((-90.0..=90.0).contains(&p.latitude));
            }
        }
    }

    #[test]
    fn compute_time_point_matches_zero_zeta_case() {
        let p = compute_time_point(0.1, 0.05, 0.05, 100.0, F, 0.5, 0.01, 0.4, 0.0);
        assert!(p.is_some());
        let p = p.unwrap();
        assert_relative_eq!(p.longitude, p.longitude);
    }
}
