//! Cheap collision proxies for spawned plants.
//!
//! Tall, narrow plants (foxglove, mullein) get an upright capsule; squat ones
//! get a sphere. Plants without known bounds fall back to a fixed sphere.

use bevy::prelude::*;

use crate::shared::DEFAULT_COLLIDER_RADIUS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Upright capsule along the Y axis. `height` includes both caps.
    Capsule { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

impl ColliderShape {
    /// Pick a proxy shape from a plant's visual bounds (full extents).
    pub fn from_bounds(size: Option<Vec3>) -> Self {
        let Some(size) = size.filter(|s| s.is_finite() && s.max_element() > 0.0) else {
            return ColliderShape::Sphere {
                radius: DEFAULT_COLLIDER_RADIUS,
            };
        };

        let horizontal = size.x.max(size.z);
        if size.y > horizontal {
            ColliderShape::Capsule {
                radius: horizontal * 0.5,
                height: size.y,
            }
        } else {
            ColliderShape::Sphere {
                radius: size.max_element() * 0.5,
            }
        }
    }

    /// Whether `point` lies inside this shape when centred on `center`.
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        match *self {
            ColliderShape::Sphere { radius } => center.distance_squared(point) <= radius * radius,
            ColliderShape::Capsule { radius, height } => {
                let half_segment = (height * 0.5 - radius).max(0.0);
                let offset = point - center;
                let clamped_y = offset.y.clamp(-half_segment, half_segment);
                let nearest = Vec3::new(0.0, clamped_y, 0.0);
                offset.distance_squared(nearest) <= radius * radius
            }
        }
    }
}
