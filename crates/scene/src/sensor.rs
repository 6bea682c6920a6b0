use glam::Vec3;
use std::collections::BTreeMap;

use orbchase_common::OrbId;

/// The host character's collision capsule, measured from its feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterCapsule {
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterCapsule {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 1.7,
        }
    }
}

impl CharacterCapsule {
    /// Shortest distance from `point` to the capsule's core segment.
    fn core_distance(&self, feet: Vec3, point: Vec3) -> f32 {
        let bottom = feet + Vec3::Y * self.radius;
        let top = feet + Vec3::Y * (self.height - self.radius).max(self.radius);
        let segment = top - bottom;
        let len_sq = segment.length_squared();
        let t = if len_sq > 0.0 {
            ((point - bottom).dot(segment) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        point.distance(bottom + segment * t)
    }

    pub fn touches_sphere(&self, feet: Vec3, center: Vec3, radius: f32) -> bool {
        self.core_distance(feet, center) < self.radius + radius
    }
}

#[derive(Debug, Clone, Copy)]
struct Sensor {
    center: Vec3,
    radius: f32,
    intersected: bool,
}

/// Spherical trigger volumes around orbs.
///
/// Reports an orb once when the character starts overlapping it, and again
/// only after the character has left and re-entered.
#[derive(Debug, Clone, Default)]
pub struct SensorSet {
    sensors: BTreeMap<OrbId, Sensor>,
    capsule: CharacterCapsule,
}

impl SensorSet {
    pub fn new(capsule: CharacterCapsule) -> Self {
        Self {
            sensors: BTreeMap::new(),
            capsule,
        }
    }

    /// Start watching an orb. Re-tracking an id resets its overlap state.
    pub fn track(&mut self, id: OrbId, center: Vec3, radius: f32) {
        self.sensors.insert(
            id,
            Sensor {
                center,
                radius,
                intersected: false,
            },
        );
    }

    pub fn untrack(&mut self, id: OrbId) -> bool {
        self.sensors.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Test every sensor against the character standing at `feet`.
    /// Returns the orbs whose overlap began this call, in id order.
    pub fn update(&mut self, feet: Vec3) -> Vec<OrbId> {
        let mut entered = Vec::new();
        for (id, sensor) in &mut self.sensors {
            let now = self
                .capsule
                .touches_sphere(feet, sensor.center, sensor.radius);
            if now && !sensor.intersected {
                tracing::trace!(%id, "sensor entered");
                entered.push(*id);
            }
            sensor.intersected = now;
        }
        entered
    }
}
