// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Besselian engine: instantaneous shadow-axis state and its time
//! derivatives.
//!
//! # References
//!
//! Explanatory Supplement to the Astronomical Ephemeris and the American
//! Ephemeris and Nautical Almanac (1961), and the 3rd edition (2013) for the
//! rate formulas.

use crate::config::{
    MOON_EARTH_RADII_RATIO_PENUMBRA, MOON_EARTH_RADII_RATIO_UMBRA, RATE_DIFFERENCING_HALF_WINDOW_DAYS,
    SUN_EARTH_RADII_RATIO,
};
use crate::constants::ERFA_DR2D;
use crate::ephemeris::EphemerisProvider;
use crate::error::{EclipseError, Result};
use crate::misc::norm_angle;

/// The eight Besselian elements of the Moon's shadow at an instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesselianState {
    /// x coordinate of the shadow axis in the fundamental plane (Earth
    /// equatorial radii).
    pub x: f64,
    /// y coordinate of the shadow axis in the fundamental plane (Earth
    /// equatorial radii).
    pub y: f64,
    /// Declination of the shadow axis direction (radians).
    pub d: f64,
    /// Greenwich hour angle of the shadow axis direction (degrees, `[0,360)`).
    pub mu: f64,
    /// Tangent of the penumbral cone half-angle.
    pub tan_f1: f64,
    /// Tangent of the umbral cone half-angle.
    pub tan_f2: f64,
    /// Radius of the penumbra on the fundamental plane (Earth radii).
    pub l1: f64,
    /// Radius of the umbra on the fundamental plane (Earth radii).
    pub l2: f64,
}

/// Time derivatives of the Besselian elements, plus the derived `bdot`/`cdot`
/// used by the contact solver and the shadow-limit root finder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BesselianRates {
    /// `dx/dt`, Earth radii per hour.
    pub xdot: f64,
    /// `dy/dt`, Earth radii per hour.
    pub ydot: f64,
    /// `dd/dt`, radians per hour.
    pub ddot: f64,
    /// `dmu/dt`, radians per hour.
    pub mudot: f64,
    /// `dL/dt` for whichever of L1/L2 this rate set was computed for, Earth
    /// radii per hour.
    pub ldot: f64,
    pub etadot: f64,
    pub bdot: f64,
    pub cdot: f64,
    /// The Besselian state at the instant these rates were evaluated.
    pub elements: BesselianState,
}

/// Compute the Besselian elements at `jd` from the ephemeris provider.
///
/// The provider must be configured with topocentric corrections disabled;
/// this function only reads geocentric Sun/Moon equatorial coordinates.
pub fn compute(provider: &mut dyn EphemerisProvider, jd: f64) -> Result<BesselianState> {
    provider.set_time(jd);

    let (ra_sun, dec_sun, sun_distance_au) = provider.sun_ra_dec_au();
    let (ra_moon, dec_moon, moon_distance_er) = provider.moon_ra_dec_earth_radii();
    let gast = provider.gast();

    // Distance ratio moon/sun, both expressed via Earth's equatorial radius.
    let rss = sun_distance_au * (149597870.8 / 6378.1366);
    let b = moon_distance_er / rss;

    let mut ra_diff = norm_angle(ra_moon - ra_sun);
    if ra_diff > std::f64::consts::PI {
        ra_diff -= 2.0 * std::f64::consts::PI;
    }

    let a = ra_sun - (b * dec_moon.cos() * ra_diff) / ((1.0 - b) * dec_sun.cos());
    let d = dec_sun - b * (dec_moon - dec_sun) / (1.0 - b);

    let mut x = dec_moon.cos() * (ra_moon - a).sin();
    x *= moon_distance_er;

    let mut y = d.cos() * dec_moon.sin();
    y -= dec_moon.cos() * d.sin() * (ra_moon - a).cos();
    y *= moon_distance_er;

    let mut z = dec_moon.sin() * d.sin();
    z += dec_moon.cos() * d.cos() * (ra_moon - a).cos();
    z *= moon_distance_er;

    let k = MOON_EARTH_RADII_RATIO_PENUMBRA;
    let s = MOON_EARTH_RADII_RATIO_UMBRA;

    let f1 = ((SUN_EARTH_RADII_RATIO + k) / (rss * (1.0 - b))).asin();
    let tan_f1 = f1.tan();
    let f2 = ((SUN_EARTH_RADII_RATIO - s) / (rss * (1.0 - b))).asin();
    let tan_f2 = f2.tan();

    let l1 = z * tan_f1 + k / f1.cos();
    let l2 = z * tan_f2 - s / f2.cos();

    let mut mu = gast * ERFA_DR2D - a * ERFA_DR2D;
    mu %= 360.0;
    if mu < 0.0 {
        mu += 360.0;
    }

    let state = BesselianState {
        x,
        y,
        d,
        mu,
        tan_f1,
        tan_f2,
        l1,
        l2,
    };

    if !(state.x.is_finite()
        && state.y.is_finite()
        && state.d.is_finite()
        && state.mu.is_finite()
        && state.tan_f1.is_finite()
        && state.tan_f2.is_finite()
        && state.l1.is_finite()
        && state.l2.is_finite())
    {
        return Err(EclipseError::EphemerisError {
            detail: format!("non-finite Besselian state at JD {jd}: {state:?}"),
        });
    }

    Ok(state)
}

/// Compute the Besselian rates at `jd`, by centered finite differences over
/// a +/-5-minute window, for either the penumbral (`penumbra = true`) or
/// umbral cone.
pub fn compute_rates(provider: &mut dyn EphemerisProvider, jd: f64, penumbra: bool) -> Result<BesselianRates> {
    let before = compute(provider, jd - RATE_DIFFERENCING_HALF_WINDOW_DAYS)?;
    let after = compute(provider, jd + RATE_DIFFERENCING_HALF_WINDOW_DAYS)?;
    let elements = compute(provider, jd)?;

    let xdot = (after.x - before.x) * 6.0;
    let ydot = (after.y - before.y) * 6.0;
    let ddot = (after.d - before.d) * 6.0;

    let mut mudot_deg = after.mu - before.mu;
    if mudot_deg < 0.0 {
        mudot_deg += 360.0;
    }
    let mudot = mudot_deg * 6.0 * std::f64::consts::PI / 180.0;

    let (l_before, l_after, l, tan_f) = if penumbra {
        (before.l1, after.l1, elements.l1, elements.tan_f1)
    } else {
        (before.l2, after.l2, elements.l2, elements.tan_f2)
    };
    let ldot = (l_after - l_before) * 6.0;

    let etadot = mudot * elements.x * elements.d.sin();
    let bdot = -(ydot - etadot);
    let cdot = xdot + mudot * elements.y * elements.d.sin() + mudot * l * tan_f * elements.d.cos();

    Ok(BesselianRates {
        xdot,
        ydot,
        ddot,
        mudot,
        ldot,
        etadot,
        bdot,
        cdot,
        elements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    #[test]
    fn state_is_finite_and_wrapped() {
        let mut eph = LowPrecisionEphemeris::new();
        let state = compute(&mut eph, 2451545.0).unwrap();
        assert!(state.x.is_finite());
        assert!(state.y.is_finite());
        assert!((0.0..360.0).contains(&state.mu));
        assert!(state.tan_f1 > state.tan_f2);
        assert!(state.l1 > state.l2);
    }

    #[test]
    fn rates_restore_state_at_jd() {
        let mut eph = LowPrecisionEphemeris::new();
        let jd = 2451545.3;
        let rates = compute_rates(&mut eph, jd, true).unwrap();
        let direct = compute(&mut eph, jd).unwrap();
        assert_eq!(rates.elements, direct);
    }

    #[test]
    fn rates_are_deterministic() {
        let mut eph1 = LowPrecisionEphemeris::new();
        let mut eph2 = LowPrecisionEphemeris::new();
        let r1 = compute_rates(&mut eph1, 2451580.1, false).unwrap();
        let r2 = compute_rates(&mut eph2, 2451580.1, false).unwrap();
        assert_eq!(r1, r2);
    }
}
