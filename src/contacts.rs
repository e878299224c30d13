// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The contact-time solver: Newton iteration to refine a Julian Date guess
//! towards the instant of a penumbral (P1-P4), internal umbral (C1/C2), or
//! external umbral (U1/U4) contact, and a companion solver for the instant
//! of true greatest eclipse.
//!
//! Grounded on `getDeltaTimeOfContact`/`getJDofContact`/`getJDofMinimumDistance`.

use crate::besselian;
use crate::config::{CONTACT_CONVERGENCE_SECONDS, CONTACT_MAX_ITERATIONS, MINIMUM_DISTANCE_MAX_ITERATIONS};
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;

/// Which contact instant is being solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// First external contact with Earth's penumbra.
    P1,
    /// First internal contact with Earth's penumbra.
    P2,
    /// Last internal contact with Earth's penumbra.
    P3,
    /// Last external contact with Earth's penumbra.
    P4,
    /// Beginning of the central eclipse track (internal umbral contact).
    C1,
    /// End of the central eclipse track (internal umbral contact).
    C2,
    /// Beginning of the external (ant)umbral contact, bounding the umbral
    /// outline/limit sampling window; distinct from `C1`.
    U1,
    /// End of the external (ant)umbral contact; distinct from `C2`.
    U4,
}

impl ContactKind {
    /// Which shadow cone (`L1`/penumbra vs `L2`/umbra) this contact belongs to.
    fn cone_is_penumbra(self) -> bool {
        matches!(self, ContactKind::P1 | ContactKind::P2 | ContactKind::P3 | ContactKind::P4)
    }

    /// Whether the contact residual uses the external (shadow-limb) formula,
    /// as opposed to the internal (shadow-center) one used by C1/C2.
    fn is_external(self) -> bool {
        !matches!(self, ContactKind::C1 | ContactKind::C2)
    }

    fn is_outer(self) -> bool {
        matches!(self, ContactKind::P1 | ContactKind::P4 | ContactKind::U1 | ContactKind::U4)
    }

    fn is_beginning(self) -> bool {
        matches!(self, ContactKind::P1 | ContactKind::P2 | ContactKind::C1 | ContactKind::U1)
    }
}

fn converged(dt_hours: f64) -> bool {
    dt_hours.abs() * 3600.0 < CONTACT_CONVERGENCE_SECONDS
}

/// Refine `jd_guess` towards the instant of the given contact.
///
/// Stops after [`CONTACT_MAX_ITERATIONS`](crate::config::CONTACT_MAX_ITERATIONS)
/// Newton steps or once the step size is below the convergence threshold;
/// it never reports failure to converge, matching the reference solver.
pub fn solve_contact(provider: &mut dyn EphemerisProvider, jd_guess: f64, f: f64, kind: ContactKind) -> Result<f64> {
    let cone_penumbra = kind.cone_is_penumbra();
    let external = kind.is_external();
    let outer = kind.is_outer();
    let beginning = kind.is_beginning();
    let mut jd = jd_guess;

    for _ in 0..CONTACT_MAX_ITERATIONS {
        let rates = besselian::compute_rates(provider, jd, cone_penumbra)?;
        let state = rates.elements;
        let l = if cone_penumbra { state.l1 } else { state.l2 };

        let e2 = f * (2.0 - f);
        let rho1 = (1.0 - e2 * state.d.cos().powi(2)).sqrt();
        let ydot = if cone_penumbra { rates.ydot } else { rates.ydot / rho1 };
        let n = (rates.xdot * rates.xdot + ydot * ydot).sqrt();
        let y1 = state.y / rho1;
        let m = (state.x * state.x + state.y * state.y).sqrt();
        let m1 = (state.x * state.x + y1 * y1).sqrt();
        let rho = m / m1;

        let s = if external {
            let sign = if outer { 1.0 } else { -1.0 };
            (state.x * ydot - state.y * rates.xdot) / (n * (l + sign * rho))
        } else {
            (state.x * ydot - rates.xdot * y1) / n
        };

        if !(s.abs() <= 1.0) {
            break;
        }

        let mut cos_term = if external {
            let sign = if outer { 1.0 } else { -1.0 };
            (l + sign * rho) * s.asin().cos() / n
        } else {
            s.asin().cos() / n
        };
        if beginning {
            cos_term = -cos_term;
        }

        let linear_term = if external {
            (state.x * rates.xdot + state.y * ydot) / (n * n)
        } else {
            (state.x * rates.xdot + y1 * ydot) / (n * n)
        };

        let dt_hours = if external {
            if outer {
                cos_term - linear_term
            } else {
                -linear_term - cos_term
            }
        } else {
            cos_term - linear_term
        };

        if !dt_hours.is_finite() {
            break;
        }

        jd += dt_hours / 24.0;
        if converged(dt_hours) {
            break;
        }
    }

    Ok(jd)
}

/// Refine `jd_guess` towards the instant of true greatest eclipse (minimum
/// shadow-axis distance from Earth's center), for whichever cone `penumbra`
/// selects.
pub fn jd_of_minimum_distance(provider: &mut dyn EphemerisProvider, jd_guess: f64, penumbra: bool) -> Result<f64> {
    let mut jd = jd_guess;

    for _ in 0..MINIMUM_DISTANCE_MAX_ITERATIONS {
        let rates = besselian::compute_rates(provider, jd, penumbra)?;
        let n2 = rates.xdot * rates.xdot + rates.ydot * rates.ydot;
        let dt_hours = -(rates.elements.x * rates.xdot + rates.elements.y * rates.ydot) / n2;

        if !dt_hours.is_finite() {
            break;
        }

        jd += dt_hours / 24.0;
        if converged(dt_hours) {
            break;
        }
    }

    Ok(jd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::LowPrecisionEphemeris;

    const F: f64 = 1.0 / 298.257223563;

    #[test]
    fn solve_contact_converges_to_finite_jd() {
        let mut eph = LowPrecisionEphemeris::new();
        let jd = solve_contact(&mut eph, 2451545.0, F, ContactKind::P1).unwrap();
        assert!(jd.is_finite());
    }

    #[test]
    fn p1_precedes_p4_for_a_slowly_moving_shadow() {
        let mut eph = LowPrecisionEphemeris::new();
        let p1 = solve_contact(&mut eph, 2451545.0 - 0.1, F, ContactKind::P1).unwrap();
        let p4 = solve_contact(&mut eph, 2451545.0 + 0.1, F, ContactKind::P4).unwrap();
        assert!(p1 <= p4 + 1.0);
    }

    #[test]
    fn minimum_distance_solver_is_finite() {
        let mut eph = LowPrecisionEphemeris::new();
        let jd = jd_of_minimum_distance(&mut eph, 2451545.0, false).unwrap();
        assert!(jd.is_finite());
    }

    #[test]
    fn external_umbral_contacts_are_finite_and_distinct_from_internal() {
        let mut eph1 = LowPrecisionEphemeris::new();
        let mut eph2 = LowPrecisionEphemeris::new();
        let u1 = solve_contact(&mut eph1, 2451545.0 - 0.1, F, ContactKind::U1).unwrap();
        let c1 = solve_contact(&mut eph2, 2451545.0 - 0.1, F, ContactKind::C1).unwrap();
        assert!(u1.is_finite());
        assert!(c1.is_finite());
    }
}
