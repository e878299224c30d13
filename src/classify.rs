// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Eclipse classification from the shadow-axis distance `gamma`, and the
//! later Total/Annular/Hybrid split once the central line is known.

use crate::besselian::BesselianState;
use crate::config::GAMMA_CENTRAL_THRESHOLD;
use crate::error::{EclipseError, Result};

/// Coarse classification of a solar eclipse from the Besselian elements at
/// greatest eclipse, before the central line (if any) has been traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EclipseKind {
    /// The shadow axis intersects Earth (`gamma < 0.9972`): a central
    /// eclipse exists somewhere along the path. [`classify_central_type`]
    /// resolves it to Total/Annular/Hybrid once C1/C2 are known.
    Central,
    /// The axis misses Earth but the umbra still grazes the ground
    /// (`0.9972 <= gamma < 0.9972 + |L2|`): a non-central total or annular
    /// eclipse.
    NonCentral,
    /// Only the penumbra reaches the ground
    /// (`0.9972 + |L2| <= gamma < 1.5433 + L2`).
    Partial,
}

/// The kind of solar eclipse published in [`crate::map::EclipseMapData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EclipseType {
    /// Not a central eclipse (partial or non-central); also the default
    /// before a central eclipse's type has been resolved.
    Undefined,
    /// The diameter ratio stays `>= 1` throughout `[C1, C2]`: the Moon's
    /// disc is always large enough to cover the Sun's.
    Total,
    /// The diameter ratio stays `< 1` throughout `[C1, C2]`.
    Annular,
    /// The diameter ratio crosses `1` somewhere inside `[C1, C2]`.
    Hybrid,
}

/// Classify the eclipse at greatest eclipse from the shadow-axis distance
/// `gamma = sqrt(x^2 + y^2)`.
///
/// Returns [`EclipseError::BadJd`] if `gamma >= 1.5433 + L2`, i.e. the
/// supplied JD is not actually near a solar eclipse.
pub fn classify(jd: f64, state: &BesselianState) -> Result<EclipseKind> {
    let gamma = (state.x * state.x + state.y * state.y).sqrt();
    let l2_abs = state.l2.abs();
    let partial_limit = 1.5433 + state.l2;

    if gamma < GAMMA_CENTRAL_THRESHOLD {
        Ok(EclipseKind::Central)
    } else if gamma < GAMMA_CENTRAL_THRESHOLD + l2_abs {
        Ok(EclipseKind::NonCentral)
    } else if gamma < partial_limit {
        Ok(EclipseKind::Partial)
    } else {
        Err(EclipseError::BadJd { jd, gamma })
    }
}

/// Resolve a central eclipse to Total/Annular/Hybrid from the diameter
/// ratio (Moon's apparent diameter over the Sun's) sampled at C1, greatest
/// eclipse, and C2.
pub fn classify_central_type(dr_c1: f64, dr_mid: f64, dr_c2: f64) -> EclipseType {
    if dr_c1 >= 1.0 && dr_mid >= 1.0 && dr_c2 >= 1.0 {
        EclipseType::Total
    } else if dr_c1 < 1.0 && dr_mid < 1.0 && dr_c2 < 1.0 {
        EclipseType::Annular
    } else {
        EclipseType::Hybrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(x: f64, y: f64, l2: f64) -> BesselianState {
        BesselianState {
            x,
            y,
            d: 0.0,
            mu: 0.0,
            tan_f1: 0.01,
            tan_f2: 0.009,
            l1: 0.55,
            l2,
        }
    }

    #[test]
    fn far_gamma_is_bad_jd() {
        let state = state_with(3.0, 3.0, 0.01);
        let err = classify(2451545.0, &state).unwrap_err();
        assert!(matches!(err, EclipseError::BadJd { jd, .. } if jd == 2451545.0));
    }

    #[test]
    fn partial_when_gamma_above_non_central_band() {
        let state = state_with(1.0, 0.1, 0.01);
        let kind = classify(2451545.0, &state).unwrap();
        assert_eq!(kind, EclipseKind::Partial);
    }

    #[test]
    fn non_central_just_above_threshold() {
        let state = state_with(0.9972 + 0.005, 0.0, 0.01);
        let kind = classify(2451545.0, &state).unwrap();
        assert_eq!(kind, EclipseKind::NonCentral);
    }

    #[test]
    fn central_below_threshold() {
        let state = state_with(0.5, 0.1, 0.01);
        let kind = classify(2451545.0, &state).unwrap();
        assert_eq!(kind, EclipseKind::Central);
    }

    #[test]
    fn total_when_ratio_stays_above_one() {
        let kind = classify_central_type(1.01, 1.02, 1.03);
        assert_eq!(kind, EclipseType::Total);
    }

    #[test]
    fn annular_when_ratio_stays_below_one() {
        let kind = classify_central_type(0.99, 0.98, 0.97);
        assert_eq!(kind, EclipseType::Annular);
    }

    #[test]
    fn hybrid_when_ratio_crosses_one() {
        let kind = classify_central_type(0.99, 1.01, 0.99);
        assert_eq!(kind, EclipseType::Hybrid);
    }
}
