// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine transformations on a whole layout.
//!
//! Every transform touches all geometries the layout owns: area, feature,
//! opening and separator footprints and the positions of violations. Keys are
//! untouched, so transformed copies stay comparable with their source.
//!
//! Two frames are in play. The *storage frame* is the editor's pixel frame in
//! which annotations and persisted `coord_x`/`coord_y` live. The *layout
//! frame* is metric. [`to_layout_frame`] and [`to_storage_frame`] convert a
//! single coordinate between the two.

use geo::{Coord, MapCoordsInPlace};
use nalgebra::{Point2, Rotation2, Vector2};

use crate::model::PlanLayout;

/// Converts a storage-frame coordinate into the layout frame.
///
/// `scale` is metres per pixel and must be positive.
pub fn to_layout_frame(c: Coord<f64>, scale: f64) -> Coord<f64> {
    Coord {
        x: c.x * scale,
        y: c.y * scale,
    }
}

/// Converts a layout-frame coordinate back into the storage frame.
pub fn to_storage_frame(c: Coord<f64>, scale: f64) -> Coord<f64> {
    Coord {
        x: c.x / scale,
        y: c.y / scale,
    }
}

impl PlanLayout {
    /// Applies `f` to every coordinate owned by the layout.
    pub fn map_coords_in_place(&mut self, f: impl Fn(Coord<f64>) -> Coord<f64> + Copy) {
        let polygons = self
            .areas
            .values_mut()
            .map(|a| &mut a.footprint)
            .chain(self.features.values_mut().map(|feat| &mut feat.footprint))
            .chain(self.openings.iter_mut().map(|o| &mut o.footprint))
            .chain(self.separators.iter_mut().map(|s| &mut s.footprint));
        for polygon in polygons {
            polygon.map_coords_in_place(f);
        }
        for violation in &mut self.violations {
            let moved = f(Coord {
                x: violation.x,
                y: violation.y,
            });
            violation.x = moved.x;
            violation.y = moved.y;
        }
    }

    /// Scales all geometry about the origin.
    pub fn apply_scaling(&mut self, factor: f64) {
        self.map_coords_in_place(|c| Coord {
            x: c.x * factor,
            y: c.y * factor,
        });
    }

    /// Rotates all geometry counter-clockwise by `angle_deg` around `pivot`.
    pub fn apply_rotation(&mut self, angle_deg: f64, pivot: Coord<f64>) {
        let rotation = Rotation2::new(angle_deg.to_radians());
        let origin = Point2::new(pivot.x, pivot.y);
        self.map_coords_in_place(move |c| {
            let p = Point2::new(c.x, c.y) - origin.coords;
            let rotated = rotation * p + origin.coords;
            Coord {
                x: rotated.x,
                y: rotated.y,
            }
        });
    }

    pub fn apply_translation(&mut self, dx: f64, dy: f64) {
        let offset = Vector2::new(dx, dy);
        self.map_coords_in_place(move |c| Coord {
            x: c.x + offset.x,
            y: c.y + offset.y,
        });
    }
}

/// Placement of a plan in the site's metric frame.
///
/// The layout is rotated around `pivot` (a point in the plan's own frame) and
/// then translated so that the pivot lands on `anchor`. The rotation has to
/// come first because the pivot is only meaningful before translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoReference {
    /// Counter-clockwise rotation in degrees.
    pub rotation_deg: f64,
    pub pivot: Coord<f64>,
    pub anchor: Coord<f64>,
}

impl Default for GeoReference {
    fn default() -> Self {
        Self {
            rotation_deg: 0.0,
            pivot: Coord { x: 0.0, y: 0.0 },
            anchor: Coord { x: 0.0, y: 0.0 },
        }
    }
}

impl GeoReference {
    /// True if applying this reference leaves every coordinate unchanged.
    pub fn is_identity(&self) -> bool {
        self.rotation_deg == 0.0 && self.pivot == self.anchor
    }

    /// Maps one plan-frame coordinate into the site frame.
    pub fn local_to_site(&self, c: Coord<f64>) -> Coord<f64> {
        let rotation = Rotation2::new(self.rotation_deg.to_radians());
        let pivot = Vector2::new(self.pivot.x, self.pivot.y);
        let v = rotation * (Vector2::new(c.x, c.y) - pivot);
        Coord {
            x: v.x + self.anchor.x,
            y: v.y + self.anchor.y,
        }
    }

    /// Inverse of [`GeoReference::local_to_site`].
    pub fn site_to_local(&self, c: Coord<f64>) -> Coord<f64> {
        let rotation = Rotation2::new(-self.rotation_deg.to_radians());
        let anchor = Vector2::new(self.anchor.x, self.anchor.y);
        let v = rotation * (Vector2::new(c.x, c.y) - anchor);
        Coord {
            x: v.x + self.pivot.x,
            y: v.y + self.pivot.y,
        }
    }

    pub fn apply(&self, layout: &mut PlanLayout) {
        if self.is_identity() {
            return;
        }
        layout.apply_rotation(self.rotation_deg, self.pivot);
        layout.apply_translation(self.anchor.x - self.pivot.x, self.anchor.y - self.pivot.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Area;
    use approx::assert_relative_eq;
    use floorplan_lite_classification::AreaType;
    use geo::polygon;

    fn unit_layout() -> PlanLayout {
        let mut layout = PlanLayout::new();
        layout.add_area(Area::new(
            polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 0.0, y: 1.0)],
            AreaType::Room,
        ));
        layout
    }

    fn first_coord(layout: &PlanLayout) -> Coord<f64> {
        let (_, area) = layout.areas().next().unwrap();
        area.footprint.exterior().0[1]
    }

    #[test]
    fn frame_conversion() {
        let c = to_layout_frame(Coord { x: 100.0, y: 50.0 }, 0.02);
        assert_relative_eq!(c.x, 2.0);
        assert_relative_eq!(c.y, 1.0);
        let back = to_storage_frame(c, 0.02);
        assert_relative_eq!(back.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(back.y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_about_pivot() {
        let mut layout = unit_layout();
        layout.apply_rotation(90.0, Coord { x: 0.0, y: 0.0 });
        let c = first_coord(&layout);
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn scaling_and_translation() {
        let mut layout = unit_layout();
        layout.apply_scaling(3.0);
        layout.apply_translation(1.0, -1.0);
        let c = first_coord(&layout);
        assert_relative_eq!(c.x, 7.0);
        assert_relative_eq!(c.y, -1.0);
    }

    #[test]
    fn identity_georeference_keeps_coordinates_exact() {
        let pivot = Coord { x: 0.1, y: 0.3 };
        let georef = GeoReference {
            rotation_deg: 0.0,
            pivot,
            anchor: pivot,
        };
        assert!(georef.is_identity());
        assert!(GeoReference::default().is_identity());

        let mut layout = unit_layout();
        layout.add_area(Area::new(
            polygon![(x: 0.7, y: 0.7), (x: 1.9, y: 0.7), (x: 1.9, y: 2.3)],
            AreaType::Kitchen,
        ));
        let before = layout.clone();
        georef.apply(&mut layout);
        let coords = |l: &PlanLayout| -> Vec<Coord<f64>> {
            l.areas()
                .flat_map(|(_, a)| a.footprint.exterior().0.clone())
                .collect()
        };
        assert_eq!(coords(&layout), coords(&before));

        let moved = GeoReference { anchor: Coord { x: 1.1, y: 0.3 }, ..georef };
        assert!(!moved.is_identity());
    }

    #[test]
    fn georeference_moves_pivot_onto_anchor() {
        let georef = GeoReference {
            rotation_deg: 30.0,
            pivot: Coord { x: 2.0, y: 0.0 },
            anchor: Coord { x: 100.0, y: 200.0 },
        };
        let mut layout = unit_layout();
        georef.apply(&mut layout);

        let c = first_coord(&layout);
        assert_relative_eq!(c.x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 200.0, epsilon = 1e-9);

        let site = georef.local_to_site(Coord { x: 0.0, y: 1.0 });
        let local = georef.site_to_local(site);
        assert_relative_eq!(local.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(local.y, 1.0, epsilon = 1e-9);
    }
}
