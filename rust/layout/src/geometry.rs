// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon helpers shared by parsing, validation and reconciliation.

use std::fmt::Write as _;

use geo::algorithm::line_intersection::line_intersection;
use geo::{Centroid, Contains, Coord, InteriorPoint, Line, LineString, Point, Polygon};
use nalgebra::Vector2;

use crate::error::{Error, Result};

/// A point strictly inside `polygon`, used as a stable proxy for the
/// polygon's identity.
///
/// Tries the interior point first and the centroid second.
pub fn representative_point(polygon: &Polygon<f64>) -> Result<Point<f64>> {
    let candidates = [polygon.interior_point(), polygon.centroid()];
    candidates
        .into_iter()
        .flatten()
        .find(|p| polygon.contains(p))
        .ok_or_else(|| Error::InvalidShape {
            wkt: polygon_wkt(polygon),
        })
}

/// Position for a marker describing `polygon`: the representative point when
/// there is one, otherwise the centroid or the first vertex.
pub fn marker_position(polygon: &Polygon<f64>) -> Point<f64> {
    representative_point(polygon)
        .ok()
        .or_else(|| polygon.centroid())
        .or_else(|| polygon.exterior().points().next())
        .unwrap_or_else(|| Point::new(0.0, 0.0))
}

/// Well-known-text form of a polygon.
pub fn polygon_wkt(polygon: &Polygon<f64>) -> String {
    if polygon.exterior().0.is_empty() {
        return "POLYGON EMPTY".to_string();
    }
    let mut out = String::from("POLYGON (");
    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
    for (i, ring) in rings.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_ring(&mut out, ring);
    }
    out.push(')');
    out
}

fn write_ring(out: &mut String, ring: &LineString<f64>) {
    out.push('(');
    for (i, c) in ring.0.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{} {}", c.x, c.y);
    }
    out.push(')');
}

/// Total length along which the boundaries of `a` and `b` run on top of
/// each other, within `tolerance`.
pub fn shared_boundary_length(a: &Polygon<f64>, b: &Polygon<f64>, tolerance: f64) -> f64 {
    let mut total = 0.0;
    for la in ring_lines(a) {
        let start = Vector2::new(la.start.x, la.start.y);
        let dir = Vector2::new(la.end.x, la.end.y) - start;
        let len = dir.norm();
        if len <= f64::EPSILON {
            continue;
        }
        let unit = dir / len;

        for lb in ring_lines(b) {
            let p = Vector2::new(lb.start.x, lb.start.y) - start;
            let q = Vector2::new(lb.end.x, lb.end.y) - start;

            // Both endpoints of `lb` must lie on the carrier line of `la`.
            let off_p = unit.perp(&p).abs();
            let off_q = unit.perp(&q).abs();
            if off_p > tolerance || off_q > tolerance {
                continue;
            }

            let (t1, t2) = (unit.dot(&p), unit.dot(&q));
            let lo = t1.min(t2).max(0.0);
            let hi = t1.max(t2).min(len);
            if hi > lo {
                total += hi - lo;
            }
        }
    }
    total
}

fn ring_lines(polygon: &Polygon<f64>) -> impl Iterator<Item = Line<f64>> + '_ {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.lines())
}

/// Whether any two non-adjacent edges of the exterior ring touch or cross.
pub fn is_self_intersecting(polygon: &Polygon<f64>) -> bool {
    let lines: Vec<Line<f64>> = polygon
        .exterior()
        .lines()
        .filter(|l| l.start != l.end)
        .collect();
    let n = lines.len();
    if n < 3 {
        return false;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if line_intersection(lines[i], lines[j]).is_some() {
                return true;
            }
        }
    }
    false
}

/// Rectangle of `width` centered on the segment `start`-`end`. `None` for a
/// zero-length segment or non-positive width.
pub fn segment_rectangle(start: Coord<f64>, end: Coord<f64>, width: f64) -> Option<Polygon<f64>> {
    let a = Vector2::new(start.x, start.y);
    let b = Vector2::new(end.x, end.y);
    let dir = b - a;
    let len = dir.norm();
    if len <= f64::EPSILON || width <= 0.0 {
        return None;
    }
    let normal = Vector2::new(-dir.y, dir.x) / len * (width / 2.0);
    let corners = [a + normal, b + normal, b - normal, a - normal];
    Some(Polygon::new(
        LineString::from(
            corners
                .iter()
                .map(|v| Coord { x: v.x, y: v.y })
                .collect::<Vec<_>>(),
        ),
        vec![],
    ))
}

/// Rectangle of `width` × `length` centered on `center`, rotated
/// counter-clockwise by `rotation_deg`.
pub fn rotated_rectangle(center: Coord<f64>, width: f64, length: f64, rotation_deg: f64) -> Polygon<f64> {
    let rotation = nalgebra::Rotation2::new(rotation_deg.to_radians());
    let (hw, hl) = (width / 2.0, length / 2.0);
    let corners = [(-hw, -hl), (hw, -hl), (hw, hl), (-hw, hl)];
    let coords: Vec<Coord<f64>> = corners
        .iter()
        .map(|(x, y)| {
            let v = rotation * Vector2::new(*x, *y);
            Coord {
                x: center.x + v.x,
                y: center.y + v.y,
            }
        })
        .collect();
    Polygon::new(LineString::from(coords), vec![])
}
