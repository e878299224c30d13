// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for eclipse geometry computation.
//!
//! Only [`EclipseError::EphemerisError`] and [`EclipseError::BadJd`] are ever
//! returned from a public function. The other two variants exist so that the
//! `log::warn!` call sites scattered through the root finder and the
//! point-geometry conversions share one `Display` format; they are
//! constructed, logged, and dropped without ever crossing a function
//! boundary as an `Err`.

/// Errors produced while computing the geometry of a solar eclipse.
#[derive(thiserror::Error, Debug)]
pub enum EclipseError {
    /// The ephemeris provider returned a non-finite value for some quantity
    /// needed to compute the Besselian elements.
    #[error("ephemeris provider returned a non-finite value: {detail}")]
    EphemerisError { detail: String },

    /// The supplied Julian Date does not correspond to an eclipse (the
    /// classifier's `gamma < 1.5433 + L2` precondition failed).
    #[error("JD {jd} is not near a solar eclipse (gamma = {gamma})")]
    BadJd { jd: f64, gamma: f64 },

    /// Logged and skipped: an odd number of shadow-limit roots was found, or
    /// a Newton iteration produced a non-finite residual or derivative.
    #[error("numerical warning in {context}: discarding this sample")]
    NumericalWarning { context: &'static str },

    /// Logged, not fatal: a converted point's direction cosines exceeded the
    /// unit sphere by more than the tolerance allowed for floating-point
    /// slop. The point is still emitted.
    #[error(
        "unnormalized vector (xi={xi}, eta={eta}, zeta={zeta}) at Q={q_deg} degrees"
    )]
    UnnormalizedVector {
        q_deg: f64,
        xi: f64,
        eta: f64,
        zeta: f64,
    },
}

pub type Result<T> = std::result::Result<T, EclipseError>;
