// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Rendering an [`crate::map::EclipseMapData`] to the two output formats
//! the reference implementation supports: KML and an equirectangular PNG.

pub mod kml;
pub mod png;

use chrono::{NaiveDate, NaiveDateTime};

/// Convert a Julian Date (UT) to a UTC calendar timestamp, via the
/// standard Fliegel & Van Flandern algorithm.
///
/// Neither the Besselian engine nor any example in this crate's lineage
/// carries a JD-to-calendar routine; this one is written from the
/// well-known closed-form algorithm rather than transcribed from
/// anywhere in particular.
pub(crate) fn jd_to_utc(jd: f64) -> NaiveDateTime {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let day_fraction = shifted - z;
    let z = z as i64;

    let a = if z < 2_299_161 {
        z
    } else {
        let alpha = ((z as f64 - 1_867_216.25) / 36_524.25).floor() as i64;
        z + 1 + alpha - alpha / 4
    };
    let b = a + 1524;
    let c = ((b as f64 - 122.1) / 365.25).floor() as i64;
    let d = (365.25 * c as f64).floor() as i64;
    let e = ((b - d) as f64 / 30.6001).floor() as i64;

    let day = b - d - (30.6001 * e as f64).floor() as i64;
    let month = if e < 14 { e - 1 } else { e - 13 };
    let year = if month > 2 { c - 4716 } else { c - 4715 };

    let day_seconds = (day_fraction * 86400.0).round();
    let hour = (day_seconds / 3600.0).floor() as u32;
    let minute = ((day_seconds - hour as f64 * 3600.0) / 60.0).floor() as u32;
    let second = (day_seconds - hour as f64 * 3600.0 - minute as f64 * 60.0) as u32;

    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .and_then(|date| date.and_hms_opt(hour.min(23), minute.min(59), second.min(59)))
        .expect("Julian Date within the range representable by chrono's NaiveDate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j2000_noon_round_trips() {
        let dt = jd_to_utc(2451545.0);
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2000-01-01 12:00:00");
    }
}
