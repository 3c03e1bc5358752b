//! Host hook for snapping points onto walkable ground.

use glam::Vec3;

/// Projection of an arbitrary point onto the level's navigation surface.
/// Implemented by the host; the simulation never inspects level geometry.
pub trait NavMesh: Send {
    /// Walkable point near `point`, searching at most `radius` away.
    fn project(&self, point: Vec3, radius: f32) -> Vec3;
}

/// Every point is walkable. Used for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl NavMesh for OpenGround {
    fn project(&self, point: Vec3, _radius: f32) -> Vec3 {
        point
    }
}

/// Flattens every point onto a horizontal floor at `height`.
#[derive(Debug, Clone, Copy)]
pub struct FlatFloor {
    pub height: f32,
}

impl NavMesh for FlatFloor {
    fn project(&self, point: Vec3, _radius: f32) -> Vec3 {
        Vec3::new(point.x, self.height, point.z)
    }
}
