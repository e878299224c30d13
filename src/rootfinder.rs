// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shadow-limit root finder: given the Besselian state and rates at a
//! fixed JD, find every point `Q` on `[0, 2*pi)` at which the shadow cone's
//! edge touches the ground, via a degree-4 trigonometric polynomial solved
//! by multi-start Newton iteration with deflation of already-found roots.
//!
//! This is transcribed verbatim from the reference derivation; none of the
//! fifteen coefficient expressions below are algebraically simplified, by
//! design (simplifying them tends to reintroduce the catastrophic
//! cancellation the deflation step exists to avoid).

use crate::besselian::{BesselianRates, BesselianState};
use crate::config::{
    ROOT_FINDER_CONVERGENCE, ROOT_FINDER_MAX_INNER_ITERATIONS, ROOT_FINDER_MAX_STEP,
    ROOT_FINDER_PERTURBATION, ROOT_FINDER_STARTS,
};
use crate::error::EclipseError;
use crate::geometry::cross_terms;

/// A single shadow-limit root: the angle `Q` (radians) and the `zeta`
/// (fundamental-plane height above the shadow axis) at that angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowRoot {
    pub q: f64,
    pub zeta: f64,
}

struct Coefficients {
    c0s0: f64,
    c1s0: f64,
    c2s0: f64,
    c3s0: f64,
    c4s0: f64,
    c0s1: f64,
    c0s2: f64,
    c0s3: f64,
    c0s4: f64,
    c1s1: f64,
    c2s2: f64,
    c1s2: f64,
    c2s1: f64,
    c3s1: f64,
    c1s3: f64,
    scale: f64,
}

fn compute_coefficients(state: &BesselianState, rates: &BesselianRates, f: f64, penumbra: bool) -> Coefficients {
    let (tf, l) = if penumbra {
        (state.tan_f1, state.l1)
    } else {
        (state.tan_f2, state.l2)
    };

    let x = state.x;
    let y = state.y;
    let d = state.d;
    let bdot = rates.bdot;
    let cdot = rates.cdot;
    let ddot = rates.ddot;
    let mudot = rates.mudot;
    let ldot = rates.ldot;

    let cosd = d.cos();
    let adot = -ldot - mudot * x * tf * cosd + y * ddot * tf;

    let e2 = f * (2.0 - f);
    let (rho1, rho2, sdd, cdd) = cross_terms(d, e2);
    let tfsp1 = 1.0 + tf * tf;

    let c0s0 = adot * adot * rho1 * rho1;

    let c1s0 = 2.0 * adot * rho1 * (-bdot * rho1 + rho2 * sdd * (adot * tf - ddot * tfsp1 * y));

    let c2s0 = bdot * bdot * rho1 * rho1
        + 2.0 * bdot * rho1 * rho2 * sdd * (-2.0 * adot * tf + ddot * tfsp1 * y)
        + rho2
            * (2.0 * adot * ddot * tfsp1 * (l * rho1 * sdd - rho2 * tf * y)
                + adot * adot * rho2 * tf * tf
                + cdd * cdd * rho1 * rho1 * rho2 * tfsp1 * tfsp1 * ddot * ddot * (-1.0 + x * x)
                + rho2 * tfsp1 * tfsp1 * ddot * ddot * y * y);

    let c3s0 = -2.0
        * rho2
        * (-bdot * tf + ddot * l * tfsp1)
        * (bdot * rho1 * sdd - adot * rho2 * tf + ddot * rho2 * tfsp1 * y);

    let c4s0 = rho2 * rho2 * (bdot * tf - ddot * l * tfsp1).powi(2);

    let c0s1 = 2.0 * adot * rho1 * (cdot * rho1 + cosd * mudot * rho2 * sdd * tfsp1 * y);

    let c0s2 = cdot * cdot * rho1 * rho1
        + 2.0 * cdot * cosd * mudot * rho1 * rho2 * sdd * tfsp1 * y
        + rho2 * rho2
            * (cdd * cdd
                * rho1
                * rho1
                * (adot * tf + cosd * mudot * tfsp1 * (x - 1.0))
                * (adot * tf + cosd * mudot * tfsp1 * (x + 1.0))
                + tfsp1 * tfsp1 * cosd * cosd * mudot * mudot * y * y);

    let c0s3 = -2.0
        * cdd
        * cdd
        * rho1
        * rho1
        * rho2
        * rho2
        * (-cdot * tf + cosd * l * mudot * tfsp1)
        * (adot * tf + cosd * mudot * tfsp1 * x);

    let c0s4 = cdd * cdd * rho1 * rho1 * rho2 * rho2 * (cdot * tf - cosd * l * mudot * tfsp1).powi(2);

    let c1s1 = -2.0 * bdot * rho1 * (cdot * rho1 + cosd * mudot * rho2 * sdd * tfsp1 * y)
        - 2.0
            * rho2
            * (ddot * tfsp1 * y * (cdot * rho1 * sdd + cosd * mudot * rho2 * tfsp1 * y)
                + adot
                    * (-2.0 * cdot * rho1 * sdd * tf
                        + cosd * mudot * tfsp1 * (l * rho1 * sdd - rho2 * tf * y))
                + cdd * cdd * ddot * rho1 * rho1 * rho2 * tfsp1 * (adot * tf * x + cosd * mudot * tfsp1 * (x * x - 1.0)));

    let c2s2 = rho2 * rho2
        * (-2.0 * cdot * cosd * l * mudot * tf * tfsp1
            + tfsp1 * tfsp1 * cosd * cosd * l * l * mudot * mudot
            + cdot * cdot * tf * tf
            + cdd * cdd * rho1 * rho1 * (bdot * tf - ddot * l * tfsp1).powi(2));

    let c1s2 = 2.0
        * rho2
        * (cdot * cdot * rho1 * sdd * tf
            + adot * cdd * cdd * rho1 * rho1 * rho2 * tf * (-bdot * tf + ddot * l * tfsp1)
            + cdot
                * tfsp1
                * (-rho1 * (cosd * l * mudot * sdd + cdd * cdd * ddot * rho1 * rho2 * tf * x)
                    + cosd * mudot * rho2 * tf * y)
            + cosd
                * mudot
                * rho2
                * tfsp1
                * (cdd * cdd * rho1 * rho1 * (-bdot * tf + 2.0 * ddot * l * tfsp1) * x
                    - cosd * l * mudot * tfsp1 * y));

    let c2s1 = 2.0
        * rho2
        * (tfsp1
            * (-adot * cosd * l * mudot * rho2 * tf
                + bdot * cdd * cdd * ddot * rho1 * rho1 * rho2 * tf * x
                + ddot * l * rho2 * tfsp1 * (-cdd * cdd * ddot * rho1 * rho1 * x + 2.0 * cosd * mudot * y)
                + bdot * cosd * mudot * (l * rho1 * sdd - rho2 * tf * y))
            + cdot * (tf * (-2.0 * bdot * rho1 * sdd + adot * rho2 * tf) + ddot * tfsp1 * (l * rho1 * sdd - rho2 * tf * y)));

    let c3s1 = -2.0
        * rho2
        * rho2
        * (-bdot * tf + ddot * l * tfsp1)
        * (-cdot * tf + cosd * l * mudot * tfsp1);

    let c1s3 = -2.0
        * cdd
        * cdd
        * rho1
        * rho1
        * rho2
        * rho2
        * (-bdot * tf + ddot * l * tfsp1)
        * (-cdot * tf + cosd * l * mudot * tfsp1);

    let scale = [
        c0s0, c1s0, c2s0, c3s0, c4s0, c0s1, c0s2, c0s3, c0s4, c1s1, c2s2, c1s2, c2s1, c3s1, c1s3,
    ]
    .iter()
    .fold(0.0_f64, |acc, v| acc.max(v.abs()));

    Coefficients {
        c0s0,
        c1s0,
        c2s0,
        c3s0,
        c4s0,
        c0s1,
        c0s2,
        c0s3,
        c0s4,
        c1s1,
        c2s2,
        c1s2,
        c2s1,
        c3s1,
        c1s3,
        scale,
    }
}

impl Coefficients {
    fn p(&self, q: f64) -> f64 {
        let (s, c) = q.sin_cos();
        self.c0s0
            + self.c1s0 * c
            + self.c2s0 * c * c
            + self.c3s0 * c.powi(3)
            + self.c4s0 * c.powi(4)
            + self.c0s1 * s
            + self.c0s2 * s * s
            + self.c0s3 * s.powi(3)
            + self.c0s4 * s.powi(4)
            + self.c1s1 * c * s
            + self.c1s2 * c * s * s
            + self.c1s3 * c * s.powi(3)
            + self.c2s1 * c * c * s
            + self.c2s2 * c * c * s * s
            + self.c3s1 * c.powi(3) * s
    }

    fn dp(&self, q: f64) -> f64 {
        let (s, c) = q.sin_cos();
        -self.c1s0 * s
            - 2.0 * self.c2s0 * c * s
            - 3.0 * self.c3s0 * c * c * s
            - 4.0 * self.c4s0 * c.powi(3) * s
            + self.c0s1 * c
            + 2.0 * self.c0s2 * s * c
            + 3.0 * self.c0s3 * s * s * c
            + 4.0 * self.c0s4 * s.powi(3) * c
            + self.c1s1 * (c * c - s * s)
            + self.c1s2 * (2.0 * c * c * s - s.powi(3))
            + self.c1s3 * (3.0 * c * c * s * s - s.powi(4))
            + self.c2s1 * (c.powi(3) - 2.0 * c * s * s)
            + self.c2s2 * (2.0 * c.powi(3) * s - 2.0 * c * s.powi(3))
            + self.c3s1 * (c.powi(4) - 3.0 * c * c * s * s)
    }
}

/// `zeta` at angle `Q`, from the shared substitution used to derive the
/// root-finder polynomial.
fn zeta_from_q(state: &BesselianState, rates: &BesselianRates, tf: f64, q: f64) -> f64 {
    let (s, c) = q.sin_cos();
    let adot = -rates.ldot - rates.mudot * state.x * tf * state.d.cos() + state.y * rates.ddot * tf;
    let num = -adot + rates.bdot * c - rates.cdot * s;
    let den = (1.0 + tf * tf) * (rates.ddot * c - rates.mudot * state.d.cos() * s);
    num / den
}

/// Evaluate the deflated polynomial and its derivative at `q`, given the
/// roots already accepted in this search.
fn deflated(coeffs: &Coefficients, q: f64, found: &[f64]) -> (f64, f64) {
    let mut p = coeffs.p(q);
    let mut dp = coeffs.dp(q);
    for &root in found {
        let delta = q - root;
        let (half_sin, half_cos) = (delta / 2.0).sin_cos();
        p /= half_sin;
        dp = (dp - 0.5 * half_cos * p) / half_sin;
    }
    (p, dp)
}

/// Find every shadow-limit root at the given Besselian state/rates.
///
/// `penumbra` selects the penumbral (`true`) or umbral (`false`) cone.
pub fn find_roots(state: &BesselianState, rates: &BesselianRates, f: f64, penumbra: bool) -> Vec<ShadowRoot> {
    let coeffs = compute_coefficients(state, rates, f, penumbra);
    let tf = if penumbra { state.tan_f1 } else { state.tan_f2 };

    let mut found: Vec<f64> = Vec::new();

    for start in 0..ROOT_FINDER_STARTS {
        let mut q = std::f64::consts::TAU * start as f64 / ROOT_FINDER_STARTS as f64;
        let mut final_iteration = false;

        for _ in 0..ROOT_FINDER_MAX_INNER_ITERATIONS {
            let (p, dp) = deflated(&coeffs, q, &found);

            if !(p.is_finite() && dp.is_finite()) {
                log::warn!(
                    "{}",
                    EclipseError::NumericalWarning {
                        context: "shadow-limit root finder: non-finite LHS"
                    }
                );
                break;
            }

            if final_iteration {
                found.push(norm_q(q));
                q = if found.last().unwrap().abs() > 0.5 {
                    0.0
                } else {
                    -std::f64::consts::FRAC_PI_2
                };
                break;
            }

            if p.abs() < ROOT_FINDER_CONVERGENCE * coeffs.scale.max(1e-300) {
                final_iteration = true;
                continue;
            }

            if dp == 0.0 {
                q += ROOT_FINDER_PERTURBATION;
                continue;
            }
            let step = p / dp;
            if step.abs() > ROOT_FINDER_MAX_STEP {
                q += ROOT_FINDER_PERTURBATION;
                continue;
            }
            q -= step;
        }
    }

    found.sort_by(|a, b| a.partial_cmp(b).unwrap());
    found
        .into_iter()
        .map(|q| ShadowRoot {
            q,
            zeta: zeta_from_q(state, rates, tf, q),
        })
        .collect()
}

fn norm_q(q: f64) -> f64 {
    let mut r = q % std::f64::consts::TAU;
    if r < 0.0 {
        r += std::f64::consts::TAU;
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::besselian;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn root_count_is_even_or_zero() {
        let mut eph = LowPrecisionEphemeris::new();
        let rates = besselian::compute_rates(&mut eph, 2451545.3, true).unwrap();
        let roots = find_roots(&rates.elements, &rates, F, true);
        assert_eq!(roots.len() % 2, 0);
    }

    #[test]
    fn roots_are_sorted_ascending() {
        let mut eph = LowPrecisionEphemeris::new();
        let rates = besselian::compute_rates(&mut eph, 2451545.3, false).unwrap();
        let roots = find_roots(&rates.elements, &rates, F, false);
        for pair in roots.windows(2) {
            assert!(pair[0].q <= pair[1].q);
        }
    }

    #[test]
    fn roots_are_deterministic() {
        let mut eph1 = LowPrecisionEphemeris::new();
        let mut eph2 = LowPrecisionEphemeris::new();
        let rates1 = besselian::compute_rates(&mut eph1, 2451600.2, true).unwrap();
        let rates2 = besselian::compute_rates(&mut eph2, 2451600.2, true).unwrap();
        let roots1 = find_roots(&rates1.elements, &rates1, F, true);
        let roots2 = find_roots(&rates2.elements, &rates2, F, true);
        assert_eq!(roots1, roots2);
    }
}
