// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to transform between Cartesian direction vectors and spherical
//! (longitude, latitude) coordinates, used by the PNG renderer's
//! great-circle segment splitting.

/// P-vector to spherical coordinates. (`eraC2s`)
///
/// Given:
/// * `p`: p-vector
///
/// Returned:
/// * `theta`: longitude angle (radians)
/// * `phi`: latitude angle (radians)
///
/// # Notes:
///
/// 1) The vector `p` can have any magnitude; only its direction is used.
///
/// 2) At either pole, zero theta is returned.
///
pub fn cartesian_to_spherical(p: [f64; 3]) -> (f64, f64) {
    let x = p[0];
    let y = p[1];
    let z = p[2];
    let d2 = x * x + y * y;

    let theta = if d2 == 0.0 { 0.0 } else { y.atan2(x) };
    let phi = if z == 0.0 { 0.0 } else { z.atan2(d2.sqrt()) };

    (theta, phi)
}

/// Convert spherical coordinates to Cartesian. (`eraS2c`)
///
/// Given:
/// * `theta`: longitude angle (radians)
/// * `phi`: latitude angle (radians)
///
/// Returned:
/// * direction cosines
///
pub fn spherical_to_cartesian(theta: f64, phi: f64) -> [f64; 3] {
    let (sp, cp) = phi.sin_cos();
    let (st, ct) = theta.sin_cos();
    [ct * cp, st * cp, sp]
}
