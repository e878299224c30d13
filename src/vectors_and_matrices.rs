// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for vectors ("p-vectors"), used by the PNG renderer to find and
//! split great-circle segments that cross the antimeridian.

/// Multiply a p-vector by a scalar. (`eraSxp`)
///
/// Given:
/// * `s`: scalar
/// * `p`: p-vector
///
/// Returned:
/// * `s` * `p`
///
pub fn multiply(s: f64, p: [f64; 3]) -> [f64; 3] {
    [s * p[0], s * p[1], s * p[2]]
}

/// Modulus of p-vector. (`eraPm`)
///
/// Given:
/// * `p`: p-vector
///
/// Returned:
/// * modulus
///
pub fn modulus(p: [f64; 3]) -> f64 {
    (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
}

/// Convert a p-vector into modulus and unit vector. (`eraPn`)
///
/// Given:
/// * `p`: p-vector
///
/// Returned:
/// * `r`: modulus
/// * `u`: unit vector
pub fn modulus_and_unit_vector(p: [f64; 3]) -> (f64, [f64; 3]) {
    /* Obtain the modulus and test for zero. */
    let w = modulus(p);
    if w == 0.0 {
        /* Null vector. */
        (0.0, [0.0; 3])
    } else {
        /* Unit vector. */
        let u = multiply(1.0 / w, p);
        (w, u)
    }
}

/// p-vector outer (=vector=cross) product. (`eraPvxpv`)
///
/// Given:
/// * `a`: first p-vector
/// * `b`: second p-vector
///
/// Returned:
/// * `a x b`
///
pub fn outer_product(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// p-vector inner (=scalar=dot) product. (`eraPdp`)
///
/// Given:
/// * `a`: first p-vector
/// * `b`: second p-vector
///
/// Returned:
/// * `a . b`
///
pub fn inner_product(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
