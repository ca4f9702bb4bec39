//! Axis-aligned boxes: level walls and actor colliders.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning two corners given in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Upright box standing on `feet` (a character collider).
    #[must_use]
    pub fn standing(feet: Vec3, half_width: f32, height: f32) -> Self {
        Self {
            min: feet - Vec3::new(half_width, 0.0, half_width),
            max: feet + Vec3::new(half_width, height, half_width),
        }
    }

    /// Whether `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether the box overlaps the vertical column at `point` (ignores Y).
    #[must_use]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Distance along a normalised ray to the first intersection, if it
    /// happens within `max_distance`. A ray starting inside hits at 0.
    #[must_use]
    pub fn ray_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Aabb {
        Aabb::new(Vec3::new(-2.0, 0.0, 4.0), Vec3::new(2.0, 3.0, 5.0))
    }

    #[test]
    fn ray_hits_wall_in_front() {
        let t = wall().ray_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 20.0);
        assert!((t.expect("hit") - 4.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_beside_wall() {
        assert!(wall().ray_hit(Vec3::new(3.0, 1.0, 0.0), Vec3::Z, 20.0).is_none());
    }

    #[test]
    fn ray_too_short_misses() {
        assert!(wall().ray_hit(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 3.0).is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        assert!(wall().ray_hit(Vec3::new(0.0, 1.0, 0.0), -Vec3::Z, 20.0).is_none());
    }

    #[test]
    fn standing_collider_covers_body() {
        let body = Aabb::standing(Vec3::new(1.0, 0.0, 1.0), 0.4, 1.8);
        assert!(body.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!body.contains(Vec3::new(1.0, 2.0, 1.0)));
        assert!(body.contains_xz(Vec3::new(1.3, 50.0, 0.7)));
    }
}
