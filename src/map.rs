// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Map assembly: the top-level pipeline that turns a rough Julian Date
//! guess into the complete geographic geometry of a solar eclipse.
//!
//! Grounded on `generateEclipseMap` as a whole.

use crate::besselian::{self, BesselianRates};
use crate::circumstances::{self, EclipseCircumstances};
use crate::classify::{self, EclipseKind, EclipseType};
use crate::config::{CENTRAL_CONTACT_NUDGE_RETRIES, CENTRAL_CONTACT_NUDGE_STEP_DAYS};
use crate::contacts::{self, ContactKind};
use crate::ephemeris::EphemerisProvider;
use crate::error::{EclipseError, Result};
use crate::geometry::{self, GeoTimePoint};
use crate::limits;
use crate::outline::{self, UmbraOutline};
use crate::riseset::{self, RiseSetLimits};

/// A contact instant, paired with the eclipse circumstances computed
/// there. The reference implementation represents contacts as bare
/// points; here every contact carries its magnitude, duration and path
/// width alongside the ground location.
pub type ContactPoint = (GeoTimePoint, EclipseCircumstances);

/// The complete geographic geometry of a solar eclipse: every curve and
/// contact point [`generate_eclipse_map`] produces.
#[derive(Debug, Clone)]
pub struct EclipseMapData {
    pub eclipse_kind: EclipseKind,
    pub eclipse_type: EclipseType,
    pub greatest_eclipse: ContactPoint,
    pub p1: ContactPoint,
    pub p4: ContactPoint,
    pub c1: Option<ContactPoint>,
    pub c2: Option<ContactPoint>,
    /// North and south penumbra limit curves.
    pub penumbra_limits: Vec<Vec<GeoTimePoint>>,
    pub rise_set_limits: RiseSetLimits,
    /// Maximum-eclipse-at-rise/set curves, one per branch.
    pub max_eclipse_at_rise_set: Vec<Vec<GeoTimePoint>>,
    /// Central line, empty unless [`EclipseMapData::eclipse_kind`] is
    /// [`EclipseKind::Central`].
    pub center_line: Vec<GeoTimePoint>,
    /// North and south umbra limit curves, empty unless central.
    pub umbra_limits: Vec<Vec<GeoTimePoint>>,
    /// Umbral footprint outlines, empty unless central.
    pub umbra_outlines: Vec<UmbraOutline>,
}

fn contact_guess_offset_days(rates: &BesselianRates, l: f64) -> f64 {
    let n = (rates.xdot * rates.xdot + rates.ydot * rates.ydot).sqrt();
    if n > 0.0 {
        1.2 * (l.abs() / n) / 24.0
    } else {
        0.05
    }
}

fn contact_point_with_circumstances(provider: &mut dyn EphemerisProvider, jd: f64, f: f64, earth_radius_km: f64) -> Result<ContactPoint> {
    let circ = circumstances::compute(provider, jd, f, earth_radius_km)?;
    let sub = circ.sub_point.ok_or_else(|| EclipseError::EphemerisError {
        detail: format!("no sub-point at JD {jd}"),
    })?;
    Ok((
        GeoTimePoint {
            jd,
            longitude: sub.longitude,
            latitude: sub.latitude,
        },
        circ,
    ))
}

fn center_line(provider: &mut dyn EphemerisProvider, jd_c1: f64, jd_c2: f64, f: f64) -> Result<Vec<GeoTimePoint>> {
    const MINUTES_TO_DAYS: f64 = 1.0 / 1440.0;
    let n = ((jd_c2 - jd_c1) * 1440.0).ceil().max(0.0) as usize;
    let mut line = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let jd = (jd_c1 + i as f64 * MINUTES_TO_DAYS).min(jd_c2);
        let state = besselian::compute(provider, jd)?;
        if let Some(p) = geometry::contact_point(state.x, state.y, state.d, state.mu, f) {
            line.push(GeoTimePoint {
                jd,
                longitude: p.longitude,
                latitude: p.latitude,
            });
        }
    }
    Ok(line)
}

/// Nudge `jd` away from a degenerate (near-zero path-width) central
/// contact, stepping by [`CENTRAL_CONTACT_NUDGE_STEP_DAYS`] up to
/// [`CENTRAL_CONTACT_NUDGE_RETRIES`] times in the direction away from
/// greatest eclipse.
fn nudge_away_from_degeneracy(provider: &mut dyn EphemerisProvider, mut jd: f64, step: f64, f: f64, earth_radius_km: f64) -> Result<f64> {
    for _ in 0..CENTRAL_CONTACT_NUDGE_RETRIES {
        let circ = circumstances::compute(provider, jd, f, earth_radius_km)?;
        if circ.path_width_km.abs() >= 0.0001 {
            break;
        }
        jd += step;
    }
    Ok(jd)
}

/// Compute the complete geographic geometry of the solar eclipse nearest
/// `jd_guess`, at the given Earth flattening `f` and equatorial radius
/// `earth_radius_km`.
///
/// `jd_guess` need only be within a day or so of greatest eclipse; this
/// first refines it to the true instant of minimum shadow-axis distance.
pub fn generate_eclipse_map(provider: &mut dyn EphemerisProvider, jd_guess: f64, f: f64, earth_radius_km: f64) -> Result<EclipseMapData> {
    let jd_mid = contacts::jd_of_minimum_distance(provider, jd_guess, false)?;
    let state_mid = besselian::compute(provider, jd_mid)?;
    let kind = classify::classify(jd_mid, &state_mid)?;

    let rates_mid_penumbra = besselian::compute_rates(provider, jd_mid, true)?;
    let p_offset = contact_guess_offset_days(&rates_mid_penumbra, rates_mid_penumbra.elements.l1);
    let jd_p1 = contacts::solve_contact(provider, jd_mid - p_offset, f, ContactKind::P1)?;
    let jd_p4 = contacts::solve_contact(provider, jd_mid + p_offset, f, ContactKind::P4)?;

    let greatest_eclipse = contact_point_with_circumstances(provider, jd_mid, f, earth_radius_km)?;
    let p1 = contact_point_with_circumstances(provider, jd_p1, f, earth_radius_km)?;
    let p4 = contact_point_with_circumstances(provider, jd_p4, f, earth_radius_km)?;

    let penumbra_limits = limits::assemble_limits(provider, jd_p1, jd_p4, f, true)?;
    let rise_set_limits = riseset::assemble_rise_set_limits(provider, jd_p1, jd_p4, jd_mid, f)?;
    let max_eclipse_at_rise_set = vec![
        riseset::assemble_max_eclipse_at_rise_set(provider, jd_p1, jd_p4, f, false)?,
        riseset::assemble_max_eclipse_at_rise_set(provider, jd_p1, jd_p4, f, true)?,
    ];

    let (eclipse_type, c1, c2, center_line, umbra_limits, umbra_outlines) = if kind == EclipseKind::Central {
        let rates_mid_umbra = besselian::compute_rates(provider, jd_mid, false)?;
        let u_offset = contact_guess_offset_days(&rates_mid_umbra, rates_mid_umbra.elements.l2);

        let jd_c1_guess = contacts::solve_contact(provider, jd_mid - u_offset, f, ContactKind::C1)?;
        let jd_c2_guess = contacts::solve_contact(provider, jd_mid + u_offset, f, ContactKind::C2)?;
        let jd_c1 = nudge_away_from_degeneracy(provider, jd_c1_guess, -CENTRAL_CONTACT_NUDGE_STEP_DAYS, f, earth_radius_km)?;
        let jd_c2 = nudge_away_from_degeneracy(provider, jd_c2_guess, CENTRAL_CONTACT_NUDGE_STEP_DAYS, f, earth_radius_km)?;

        let jd_u1 = contacts::solve_contact(provider, jd_mid - u_offset, f, ContactKind::U1)?;
        let jd_u4 = contacts::solve_contact(provider, jd_mid + u_offset, f, ContactKind::U4)?;

        let c1 = contact_point_with_circumstances(provider, jd_c1, f, earth_radius_km)?;
        let c2 = contact_point_with_circumstances(provider, jd_c2, f, earth_radius_km)?;

        let dr_c1 = c1.1.diameter_ratio;
        let dr_mid = circumstances::compute(provider, jd_mid, f, earth_radius_km)?.diameter_ratio;
        let dr_c2 = c2.1.diameter_ratio;
        let eclipse_type = classify::classify_central_type(dr_c1, dr_mid, dr_c2);

        let center_line = center_line(provider, jd_c1, jd_c2, f)?;
        let umbra_limits = limits::assemble_limits(provider, jd_p1, jd_p4, f, false)?;
        let umbra_outlines = outline::sample_umbral_outlines(provider, jd_u1, jd_u4, f)?;

        (eclipse_type, Some(c1), Some(c2), center_line, umbra_limits, umbra_outlines)
    } else {
        (EclipseType::Undefined, None, None, Vec::new(), Vec::new(), Vec::new())
    };

    Ok(EclipseMapData {
        eclipse_kind: kind,
        eclipse_type,
        greatest_eclipse,
        p1,
        p4,
        c1,
        c2,
        penumbra_limits,
        rise_set_limits,
        max_eclipse_at_rise_set,
        center_line,
        umbra_limits,
        umbra_outlines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::Ellipsoid;
    use crate::ephemeris::LowPrecisionEphemeris;

    #[test]
    fn map_assembly_does_not_panic_near_j2000() {
        let mut eph = LowPrecisionEphemeris::new();
        let (radius_m, f) = Ellipsoid::WGS84.get_params();
        let result = generate_eclipse_map(&mut eph, 2451545.0, f, radius_m / 1000.0);
        match result {
            Ok(data) => {
                assert!(data.greatest_eclipse.0.jd.is_finite());
                if data.eclipse_kind == EclipseKind::Central {
                    assert!(!data.center_line.is_empty() || data.c1.is_some());
                }
            }
            Err(EclipseError::BadJd { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
