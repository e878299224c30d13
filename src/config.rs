// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tunable constants. These are magic numbers from the reference
//! derivation that must be preserved bit-for-bit (see the crate's design
//! notes); they are named here instead of inlined so an embedder can see,
//! and if truly necessary fork, every knob in one place.

/// Ratio of the Sun's radius to Earth's equatorial radius
/// (696000 km / 6378.1366 km), per IERS Conventions (2003).
pub const SUN_EARTH_RADII_RATIO: f64 = 109.12278;

/// IAU-recommended ratio of the Moon's radius to Earth's equatorial radius,
/// used for the penumbral cone.
pub const MOON_EARTH_RADII_RATIO_PENUMBRA: f64 = 0.2725076;

/// NASA/Espenak ratio of the Moon's radius to Earth's equatorial radius,
/// used for the umbral cone to avoid extreme cases when the Moon's apparent
/// diameter is very close to the Sun's but cannot completely cover it.
pub const MOON_EARTH_RADII_RATIO_UMBRA: f64 = 0.272281;

/// Half-width, in days, of the centered-difference window used to compute
/// Besselian rates (5 minutes).
pub const RATE_DIFFERENCING_HALF_WINDOW_DAYS: f64 = 5.0 / 1440.0;

/// Number of points swept around the umbral shadow-cone limb per outline.
pub const UMBRAL_OUTLINE_SAMPLES: usize = 60;

/// Cadence, in fractions of a day, at which umbral outlines are sampled
/// (10 minutes, i.e. 1/144 of a day).
pub const UMBRAL_OUTLINE_CADENCE_DAYS: f64 = 1.0 / 144.0;

/// Number of evenly distributed starting points for the shadow-limit
/// root finder's multi-start Newton search.
pub const ROOT_FINDER_STARTS: usize = 9;

/// Maximum inner Newton iterations per root-finder start.
pub const ROOT_FINDER_MAX_INNER_ITERATIONS: usize = 50;

/// Root-finder convergence threshold, relative to the coefficient scale `S`.
pub const ROOT_FINDER_CONVERGENCE: f64 = 1e-10;

/// Root-finder shoot-far safeguard: a Newton step larger than this in
/// magnitude is treated as probably divergent.
pub const ROOT_FINDER_MAX_STEP: f64 = 1000.0;

/// Root-finder perturbation applied to `Q` after a shoot-far safeguard trip.
pub const ROOT_FINDER_PERTURBATION: f64 = 0.01;

/// Contact-time Newton solver convergence threshold (seconds).
pub const CONTACT_CONVERGENCE_SECONDS: f64 = 0.1;

/// Maximum iterations for the contact-time solver.
pub const CONTACT_MAX_ITERATIONS: usize = 10;

/// Maximum iterations for the minimum-distance (true greatest eclipse)
/// solver.
pub const MINIMUM_DISTANCE_MAX_ITERATIONS: usize = 20;

/// Maximum retries nudging away from a degenerate (zero path-width) C1/C2
/// instant.
pub const CENTRAL_CONTACT_NUDGE_RETRIES: usize = 20;

/// Step size, in days, used for each nudge-forward/back retry around a
/// degenerate central-contact instant (0.1 seconds).
pub const CENTRAL_CONTACT_NUDGE_STEP_DAYS: f64 = 0.1 / 86400.0;

/// Time threshold, in days, below which root-count bisection stops
/// subdividing (0.001 seconds).
pub const LIMIT_CURVE_BISECTION_FLOOR_DAYS: f64 = 0.001 / 86400.0;

/// Sampling cadence, in days, for the limit-curve assembler (1 minute).
pub const LIMIT_CURVE_SAMPLE_CADENCE_DAYS: f64 = 1.0 / 1440.0;

/// Starting sample count for the rise/set curve assembler's adaptive search.
pub const RISE_SET_INITIAL_SAMPLES: usize = 5;

/// Upper bound for the rise/set curve assembler's adaptive sample doubling.
pub const MAX_ADAPTIVE_SAMPLES: usize = 500;

/// Bisection iterations used to refine rise/set curve endpoints.
pub const RISE_SET_BISECTION_ITERATIONS: usize = 15;

/// Admissible step, in degrees, between adjacent points of a refined
/// max-eclipse-at-rise/set curve before a midpoint is inserted.
pub const RISE_SET_DENSIFICATION_THRESHOLD_DEG: f64 = 5.0;

/// Lower bound of `gamma` (shadow-axis distance from Earth's center, in
/// Earth radii) below which the shadow axis intersects Earth.
pub const GAMMA_CENTRAL_THRESHOLD: f64 = 0.9972;

/// Direction-cosine magnitude above which a converted point is logged as
/// [`crate::error::EclipseError::UnnormalizedVector`].
pub const UNNORMALIZED_VECTOR_TOLERANCE: f64 = 1.0001;
