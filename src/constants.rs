// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! General astronomical constants used throughout the crate. Eclipse-domain
//! magic numbers (root-finder iteration caps, radius ratios) live in
//! [`crate::config`] instead, since they are tunables rather than physical
//! constants.

#![allow(clippy::excessive_precision)]

/// Pi
pub const ERFA_DPI: f64 = 3.141592653589793238462643;

/// 2Pi
pub const ERFA_D2PI: f64 = 6.283185307179586476925287;

/// Radians to degrees
pub const ERFA_DR2D: f64 = 57.29577951308232087679815;

/// Degrees to radians
pub const ERFA_DD2R: f64 = 1.745329251994329576923691e-2;

/// Radians to arcseconds
pub const ERFA_DR2AS: f64 = 206264.8062470963551564734;

/// Arcseconds to radians
pub const ERFA_DAS2R: f64 = 4.848136811095359935899141e-6;

/// Seconds per day.
pub const ERFA_DAYSEC: f64 = 86400.0;

/// Reference epoch (J2000.0), Julian Date
pub const ERFA_DJ00: f64 = 2451545.0;

/// Julian Date of Modified Julian Date zero
pub const ERFA_DJM0: f64 = 2400000.5;

/// Astronomical unit (m, IAU 2012)
pub const ERFA_DAU: f64 = 149597870.7e3;
