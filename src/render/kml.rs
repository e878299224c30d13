// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! KML output: placemarks and styled `LineString`s for every curve and
//! contact point in an [`EclipseMapData`].
//!
//! Grounded on `generateKML`.

use std::io::{self, Write};

use crate::classify::EclipseType;
use crate::geometry::GeoTimePoint;
use crate::map::EclipseMapData;
use crate::outline::OutlineKind;
use crate::riseset::RiseSetLimits;

use super::jd_to_utc;

fn style_id(kind: EclipseType) -> &'static str {
    match kind {
        EclipseType::Total => "Total",
        EclipseType::Annular => "Annular",
        EclipseType::Hybrid => "Hybrid",
        EclipseType::Undefined => "PLimits",
    }
}

fn style_color(id: &str) -> &'static str {
    match id {
        "Hybrid" => "800080",
        "Total" => "ff0000",
        "Annular" => "0000ff",
        _ => "00ff00",
    }
}

/// Convert an `#RRGGBB` color to KML's `aabbggrr` order, fully opaque.
fn to_kml_color(rgb_hex: &str) -> String {
    let r = &rgb_hex[0..2];
    let g = &rgb_hex[2..4];
    let b = &rgb_hex[4..6];
    format!("ff{b}{g}{r}")
}

fn timestamp(jd: f64) -> String {
    jd_to_utc(jd).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn write_point_placemark(out: &mut impl Write, name: &str, jd: f64, longitude: f64, latitude: f64) -> io::Result<()> {
    writeln!(out, "  <Placemark>")?;
    writeln!(out, "    <name>{name} ({})</name>", timestamp(jd))?;
    writeln!(out, "    <Point><coordinates>{longitude},{latitude},0</coordinates></Point>")?;
    writeln!(out, "  </Placemark>")?;
    Ok(())
}

fn write_linestring(out: &mut impl Write, name: &str, style: &str, points: &[GeoTimePoint]) -> io::Result<()> {
    if points.is_empty() {
        return Ok(());
    }
    writeln!(out, "  <Placemark>")?;
    writeln!(out, "    <name>{name}</name>")?;
    writeln!(out, "    <styleUrl>#{style}</styleUrl>")?;
    writeln!(out, "    <LineString>")?;
    writeln!(out, "      <tessellate>1</tessellate>")?;
    writeln!(out, "      <altitudeMode>absoluto</altitudeMode>")?;
    write!(out, "      <coordinates>")?;
    for p in points {
        write!(out, "{},{},0 ", p.longitude, p.latitude)?;
    }
    writeln!(out, "</coordinates>")?;
    writeln!(out, "    </LineString>")?;
    writeln!(out, "  </Placemark>")?;
    Ok(())
}

/// Write `data` as a complete KML document to `out`.
pub fn write(data: &EclipseMapData, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<kml xmlns=\"http://www.opengis.net/kml/2.2\">")?;
    writeln!(out, "<Document>")?;

    for id in ["Hybrid", "Total", "Annular", "PLimits"] {
        writeln!(out, "  <Style id=\"{id}\">")?;
        writeln!(out, "    <LineStyle><color>{}</color><width>2</width></LineStyle>", to_kml_color(style_color(id)))?;
        writeln!(out, "  </Style>")?;
    }

    write_point_placemark(out, "Greatest eclipse", data.greatest_eclipse.0.jd, data.greatest_eclipse.0.longitude, data.greatest_eclipse.0.latitude)?;
    write_point_placemark(out, "P1", data.p1.0.jd, data.p1.0.longitude, data.p1.0.latitude)?;
    write_point_placemark(out, "P4", data.p4.0.jd, data.p4.0.longitude, data.p4.0.latitude)?;

    for (i, line) in data.penumbra_limits.iter().enumerate() {
        write_linestring(out, &format!("Penumbra limit {i}"), "PLimits", line)?;
    }

    match &data.rise_set_limits {
        RiseSetLimits::Single(curve) => write_linestring(out, "Rise/set limit", "PLimits", curve)?,
        RiseSetLimits::Two { p12, p34 } => {
            write_linestring(out, "Rise/set limit (P1-P2)", "PLimits", p12)?;
            write_linestring(out, "Rise/set limit (P3-P4)", "PLimits", p34)?;
        }
    }

    for (i, curve) in data.max_eclipse_at_rise_set.iter().enumerate() {
        write_linestring(out, &format!("Maximum eclipse at rise/set {i}"), "PLimits", curve)?;
    }

    if let Some(c1) = &data.c1 {
        write_point_placemark(out, "C1", c1.0.jd, c1.0.longitude, c1.0.latitude)?;
    }
    if let Some(c2) = &data.c2 {
        write_point_placemark(out, "C2", c2.0.jd, c2.0.longitude, c2.0.latitude)?;
    }

    write_linestring(out, "Center line", style_id(data.eclipse_type), &data.center_line)?;

    for outline in &data.umbra_outlines {
        let style = match outline.kind {
            OutlineKind::Total => "Total",
            OutlineKind::Annular => "Annular",
        };
        let points: Vec<GeoTimePoint> = outline
            .points
            .iter()
            .map(|p| GeoTimePoint {
                jd: outline.jd,
                longitude: p.longitude,
                latitude: p.latitude,
            })
            .collect();
        write_linestring(out, &timestamp(outline.jd), style, &points)?;
    }

    for (i, line) in data.umbra_limits.iter().enumerate() {
        write_linestring(out, &format!("Umbra limit {i}"), style_id(data.eclipse_type), line)?;
    }

    writeln!(out, "</Document>")?;
    writeln!(out, "</kml>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kml_color_conversion_reorders_channels() {
        assert_eq!(to_kml_color("ff0000"), "ff0000ff");
        assert_eq!(to_kml_color("0000ff"), "ffff0000");
    }
}
