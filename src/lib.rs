// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The geographic geometry of a solar eclipse: Besselian elements, contact
//! times, shadow-limit curves, and the central line, computed from an
//! externally supplied ephemeris and handed to the `render` back-ends.

pub mod besselian;
pub mod circumstances;
pub mod classify;
pub mod config;
pub mod constants;
pub(crate) mod ellipsoid;
pub mod contacts;
pub mod ephemeris;
pub mod error;
pub mod geometry;
pub mod limits;
pub mod map;
pub mod misc;
pub mod outline;
pub mod render;
pub mod riseset;
pub mod rootfinder;
pub mod transform;
pub mod vectors_and_matrices;

pub use ellipsoid::Ellipsoid;
pub use error::{EclipseError, Result};
pub use map::{generate_eclipse_map, EclipseMapData};
