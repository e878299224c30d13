// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ephemeris adapter: the minimal surface the Besselian engine needs
//! from a Sun/Moon/Earth ephemeris, and a low-precision implementation
//! sufficient to exercise the geometry in tests without pulling in a
//! VSOP87/DE ephemeris dependency.

use crate::constants::{ERFA_D2PI, ERFA_DAU, ERFA_DD2R, ERFA_DJ00};
use crate::ellipsoid::Ellipsoid;
use crate::misc::norm_angle;

/// Supplies equatorial coordinates and distances of Sun and Moon, Greenwich
/// apparent sidereal time, and Earth's ellipsoid, all evaluated at a time
/// set via [`EphemerisProvider::set_time`].
///
/// Implementations must report geocentric, equinox-of-date coordinates with
/// topocentric corrections disabled; this crate never calls an accessor
/// before `set_time`.
pub trait EphemerisProvider {
    /// Move the ephemeris to the given Julian Date (TT).
    fn set_time(&mut self, jd: f64);

    /// Sun's geocentric equinox-of-date right ascension (radians),
    /// declination (radians), and distance (astronomical units).
    fn sun_ra_dec_au(&self) -> (f64, f64, f64);

    /// Moon's geocentric equinox-of-date right ascension (radians),
    /// declination (radians), and distance (Earth equatorial radii).
    fn moon_ra_dec_earth_radii(&self) -> (f64, f64, f64);

    /// Greenwich apparent sidereal time (radians).
    fn gast(&self) -> f64;

    /// The reference ellipsoid used for Earth's equatorial radius and
    /// flattening.
    fn earth(&self) -> Ellipsoid;
}

/// A deterministic, low-precision Sun/Moon ephemeris good to a few arcminutes
/// near J2000, built from the truncated series in Jean Meeus's *Astronomical
/// Algorithms* (low-precision solar position, ch. 25) and a similarly
/// truncated lunar series (ch. 47, leading terms only).
///
/// This is not suitable for reproducing historical eclipse circumstances to
/// NASA precision; it exists so that the geometry in this crate (Besselian
/// elements, contact solving, curve assembly) can be exercised end-to-end
/// without a production-grade ephemeris dependency. Callers who need
/// NASA-grade accuracy supply their own [`EphemerisProvider`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LowPrecisionEphemeris {
    jd: f64,
}

impl LowPrecisionEphemeris {
    pub fn new() -> Self {
        Self { jd: ERFA_DJ00 }
    }

    fn centuries_since_j2000(&self) -> f64 {
        (self.jd - ERFA_DJ00) / 36525.0
    }
}

impl EphemerisProvider for LowPrecisionEphemeris {
    fn set_time(&mut self, jd: f64) {
        self.jd = jd;
    }

    fn sun_ra_dec_au(&self) -> (f64, f64, f64) {
        let t = self.centuries_since_j2000();

        let l0 = norm_angle((280.46646 + t * (36000.76983 + t * 0.0003032)) * ERFA_DD2R);
        let m = norm_angle((357.52911 + t * (35999.05029 - t * 0.0001537)) * ERFA_DD2R);
        let e = 0.016708634 - t * (0.000042037 + t * 0.0000001267);

        let c = (1.914602 - t * (0.004817 + t * 0.000014)) * m.sin() * ERFA_DD2R
            + (0.019993 - t * 0.000101) * (2.0 * m).sin() * ERFA_DD2R
            + 0.000289 * (3.0 * m).sin() * ERFA_DD2R;

        let true_longitude = l0 + c;
        let true_anomaly = m + c;
        let r_au = (1.000001018 * (1.0 - e * e)) / (1.0 + e * true_anomaly.cos());

        let omega = 125.04 - 1934.136 * t;
        let apparent_longitude = true_longitude - (0.00569 + 0.00478 * (omega * ERFA_DD2R).sin()) * ERFA_DD2R;

        let eps0 = (23.0 + 26.0 / 60.0 + 21.448 / 3600.0
            - t * (46.8150 / 3600.0 + t * (0.00059 / 3600.0 - t * 0.001813 / 3600.0)))
            * ERFA_DD2R;
        let eps = eps0 + 0.00256 * ERFA_DD2R * (omega * ERFA_DD2R).cos();

        let ra = norm_angle((apparent_longitude.sin() * eps.cos()).atan2(apparent_longitude.cos()));
        let dec = (eps.sin() * apparent_longitude.sin()).asin();

        (ra, dec, r_au)
    }

    fn moon_ra_dec_earth_radii(&self) -> (f64, f64, f64) {
        let t = self.centuries_since_j2000();

        let lp = norm_angle((218.3164477 + 481267.88123421 * t) * ERFA_DD2R);
        let d = norm_angle((297.8501921 + 445267.1114034 * t) * ERFA_DD2R);
        let m = norm_angle((357.5291092 + 35999.0502909 * t) * ERFA_DD2R);
        let mp = norm_angle((134.9633964 + 477198.8675055 * t) * ERFA_DD2R);
        let f = norm_angle((93.2720950 + 483202.0175233 * t) * ERFA_DD2R);

        let longitude_perturbation = 6.288774 * mp.sin()
            + 1.274027 * (2.0 * d - mp).sin()
            + 0.658314 * (2.0 * d).sin()
            + 0.213618 * (2.0 * mp).sin()
            - 0.185116 * m.sin()
            - 0.114332 * (2.0 * f).sin();
        let latitude_perturbation = 5.128122 * f.sin()
            + 0.280602 * (mp + f).sin()
            + 0.277693 * (mp - f).sin()
            + 0.173237 * (2.0 * d - f).sin();
        // Distance perturbation, in km, leading term only.
        let distance_km = 385000.56 - 20905.355 * mp.cos();

        let ecliptic_longitude = lp + longitude_perturbation * ERFA_DD2R;
        let ecliptic_latitude = latitude_perturbation * ERFA_DD2R;

        let eps = (23.0 + 26.0 / 60.0 + 21.448 / 3600.0 - t * 46.8150 / 3600.0) * ERFA_DD2R;
        let (sl, cl) = ecliptic_longitude.sin_cos();
        let (sb, cb) = ecliptic_latitude.sin_cos();
        let (se, ce) = eps.sin_cos();

        let ra = norm_angle((sl * ce - (sb / cb) * se).atan2(cl));
        let dec = (sb * ce + cb * se * sl).asin();

        let earth_radius_km = Ellipsoid::WGS84.get_params().0 / 1000.0;
        let distance_earth_radii = distance_km / earth_radius_km;

        (ra, dec, distance_earth_radii)
    }

    fn gast(&self) -> f64 {
        let t = self.centuries_since_j2000();
        let gmst_deg = 280.46061837
            + 360.98564736629 * (self.jd - ERFA_DJ00)
            + 0.000387933 * t * t
            - t * t * t / 38710000.0;
        norm_angle(norm_angle(gmst_deg * ERFA_DD2R) % ERFA_D2PI)
    }

    fn earth(&self) -> Ellipsoid {
        Ellipsoid::WGS84
    }
}

/// Astronomical unit in meters, re-exported for conversions between AU and
/// Earth radii.
pub const AU_METERS: f64 = ERFA_DAU;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn low_precision_sun_is_near_unit_distance() {
        let mut eph = LowPrecisionEphemeris::new();
        eph.set_time(ERFA_DJ00);
        let (ra, dec, r) = eph.sun_ra_dec_au();
        assert!(ra.is_finite());
        assert!(dec.is_finite());
        assert_relative_eq!(r, 0.9833, epsilon = 0.01);
    }

    #[test]
    fn low_precision_moon_distance_is_plausible() {
        let mut eph = LowPrecisionEphemeris::new();
        eph.set_time(ERFA_DJ00);
        let (ra, dec, distance_er) = eph.moon_ra_dec_earth_radii();
        assert!(ra.is_finite());
        assert!(dec.is_finite());
        assert!((55.0..65.0).contains(&distance_er));
    }

    #[test]
    fn gast_is_normalized() {
        let mut eph = LowPrecisionEphemeris::new();
        eph.set_time(ERFA_DJ00 + 123.456);
        let gast = eph.gast();
        assert!((0.0..ERFA_D2PI).contains(&gast));
    }
}
