// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Eclipse circumstances: the scalar quantities (magnitude, duration, path
//! width, diameter ratio, altitude) that accompany every contact point in
//! the reference implementation's output.
//!
//! Supplemented from `calcSolarEclipseData`; the distilled Besselian model
//! otherwise drops these fields entirely.

use crate::besselian;
use crate::constants::ERFA_DR2D;
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;
use crate::geometry::{cross_terms, d_terms, GeoPoint};

/// Scalar eclipse circumstances at a single instant, alongside the
/// sub-point (the ground location directly below the shadow axis, or its
/// closest approach when the axis misses Earth).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseCircumstances {
    pub sub_point: Option<GeoPoint>,
    /// Altitude of the Sun above the sub-point's horizon, degrees.
    pub altitude_deg: f64,
    /// Eclipse magnitude (fraction of the Sun's diameter covered), via the
    /// oblate-Earth `L1a`/`u,v` formula when the shadow axis misses Earth
    /// (non-central/partial) as well as the central case.
    pub magnitude: f64,
    /// Ratio of the Moon's to the Sun's apparent diameter.
    pub diameter_ratio: f64,
    /// Duration of totality/annularity at the sub-point, minutes.
    /// `0.0` when non-central.
    pub duration_minutes: f64,
    /// Width of the path of totality/annularity at this instant, km.
    /// `0.0` when non-central.
    pub path_width_km: f64,
}

/// Compute the eclipse circumstances at `jd`.
pub fn compute(provider: &mut dyn EphemerisProvider, jd: f64, f: f64, earth_radius_km: f64) -> Result<EclipseCircumstances> {
    let rates = besselian::compute_rates(provider, jd, false)?;
    let state = rates.elements;
    let x = state.x;
    let y = state.y;
    let d = state.d;

    let e2 = f * (2.0 - f);
    let (rho1, rho2, sdd, cdd) = cross_terms(d, e2);
    let eta1_axis = y / rho1;
    let p = 1.0 - x * x - eta1_axis * eta1_axis;

    if p > 0.0 {
        let zeta1 = p.sqrt();
        let zeta = rho2 * (zeta1 * cdd - eta1_axis * sdd);
        let l2a = state.l2 - zeta * state.tan_f2;
        let l1a = state.l1 - zeta * state.tan_f1;

        let sub_point = crate::geometry::compute_time_point(x, y, d, state.mu, f, 0.0, 0.0, 0.0, zeta);

        let magnitude = l1a / (l1a + l2a);
        let diameter_ratio = 1.0 + (magnitude - 1.0) * 2.0;

        let etadot = rates.mudot * x * d.sin() - rates.ddot * zeta;
        let xidot = rates.mudot * (-y * d.sin() + zeta * d.cos());
        let n = ((rates.xdot - xidot).powi(2) + (rates.ydot - etadot).powi(2)).sqrt();
        let duration_minutes = l2a * 120.0 / n;

        // Direction cosines of the sub-point relative to the shadow axis
        // frame, needed only for the altitude figure below.
        let cfn1_sfn1 = sub_point_direction_cosines(x, eta1_axis, zeta1, d, e2);
        let altitude_deg = ((cfn1_sfn1.0 * d.cos() * cfn1_sfn1.2) + cfn1_sfn1.1 * d.sin())
            .asin()
            * ERFA_DR2D;

        let denom_term = (x * (rates.xdot - xidot) + eta1_axis * (rates.ydot - etadot)) / n;
        let path_width_km = (2.0 * earth_radius_km * l2a / (zeta * zeta + denom_term * denom_term).sqrt()).abs();

        Ok(EclipseCircumstances {
            sub_point,
            altitude_deg,
            magnitude,
            diameter_ratio,
            duration_minutes,
            path_width_km,
        })
    } else {
        let norm = (x * x + eta1_axis * eta1_axis).sqrt();
        let xi = if norm > 0.0 { x / norm } else { 0.0 };
        let eta1 = if norm > 0.0 { eta1_axis / norm } else { 0.0 };
        let zeta = rho2 * (-eta1 * sdd);

        let sub_point = crate::geometry::compute_time_point(xi, eta1 * rho1, d, state.mu, f, 0.0, 0.0, 0.0, zeta);
        let cfn1_sfn1 = sub_point_direction_cosines(xi, eta1, 0.0, d, e2);
        let altitude_deg = ((cfn1_sfn1.0 * d.cos() * cfn1_sfn1.2) + cfn1_sfn1.1 * d.sin())
            .asin()
            * ERFA_DR2D;

        // Magnitude/diameter ratio: project the shadow axis onto the oblate
        // Earth surface at this ground point and compare the local cone
        // radii L1/L2 against the axis-to-surface distance, per
        // `calcSolarEclipseData`'s partial/non-central branch.
        let (_, sd1, cd1) = d_terms(d, e2);
        let ff = 1.0 / (1.0 - f);
        let theta = xi.atan2(-eta1 * sd1);
        let sfn1 = eta1 * cd1;
        let cfn1 = (1.0 - sfn1 * sfn1).max(0.0).sqrt();
        let lat = (ff * sfn1 / cfn1).atan();
        let l1 = state.l1 - zeta * state.tan_f1;
        let l2 = state.l2 - zeta * state.tan_f2;
        let c = 1.0 / (1.0 - e2 * lat.sin().powi(2)).sqrt();
        let s = (1.0 - e2) * c;
        let rs = s * lat.sin();
        let rc = c * lat.cos();
        let xi_surface = rc * theta.sin();
        let eta_surface = rs * d.cos() - rc * d.sin() * theta.cos();
        let u = x - xi_surface;
        let v = y - eta_surface;
        let magnitude = (l1 - (u * u + v * v).sqrt()) / (l1 + l2);
        let diameter_ratio = 1.0 + (magnitude - 1.0) * 2.0;

        Ok(EclipseCircumstances {
            sub_point,
            altitude_deg,
            magnitude,
            diameter_ratio,
            duration_minutes: 0.0,
            path_width_km: 0.0,
        })
    }
}

/// `(cos(latitude), sin(latitude), cos(theta))` for the altitude formula,
/// derived from the same `sd1`/`cd1` auxiliaries as the point-geometry
/// conversions.
fn sub_point_direction_cosines(xi: f64, eta1: f64, zeta1: f64, d: f64, e2: f64) -> (f64, f64, f64) {
    let rho1 = (1.0 - e2 * d.cos().powi(2)).sqrt();
    let sd1 = d.sin() / rho1;
    let cd1 = (1.0 - e2).sqrt() * d.cos() / rho1;
    let sfn1 = eta1 * cd1 + zeta1 * sd1;
    let cfn1 = (1.0 - sfn1 * sfn1).max(0.0).sqrt();
    let cos_theta = xi.atan2(-eta1 * sd1 + zeta1 * cd1).cos();
    (cfn1, sfn1, cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;
    const EARTH_RADIUS_KM: f64 = 6378.1366;

    #[test]
    fn circumstances_are_finite() {
        let mut eph = LowPrecisionEphemeris::new();
        let circ = compute(&mut eph, 2451545.0, F, EARTH_RADIUS_KM).unwrap();
        assert!(circ.altitude_deg.is_finite());
        assert!(circ.magnitude.is_finite());
    }

    #[test]
    fn non_central_axis_has_real_magnitude_but_zero_duration_and_width() {
        // A JD far from greatest eclipse should usually land in the
        // non-central branch for this low-precision ephemeris. Magnitude and
        // diameter ratio are still computed there; only duration and path
        // width, which are meaningless off the central line, are zero.
        let mut eph = LowPrecisionEphemeris::new();
        let circ = compute(&mut eph, 2451545.0 + 10.0, F, EARTH_RADIUS_KM).unwrap();
        assert!(circ.magnitude.is_finite());
        assert!(circ.diameter_ratio.is_finite());
        if circ.duration_minutes == 0.0 {
            assert_eq!(circ.path_width_km, 0.0);
        }
    }
}
