//! Walkable surface: проекция случайных точек на navmesh (NavMesh.SamplePosition)

use bevy::prelude::*;

/// Интерфейс к navmesh для семплирования точек
pub trait WalkableSurface: Send + Sync {
    /// Ближайшая walkable точка в радиусе `max_distance` от `near`
    fn sample_walkable_point(&self, near: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Service handle, устанавливается composition root (plugin / engine layer)
#[derive(Resource)]
pub struct WalkableSurfaceService(pub Box<dyn WalkableSurface>);

impl WalkableSurfaceService {
    pub fn new(surface: impl WalkableSurface + 'static) -> Self {
        Self(Box::new(surface))
    }

    pub fn sample(&self, near: Vec3, max_distance: f32) -> Option<Vec3> {
        self.0.sample_walkable_point(near, max_distance)
    }
}

impl Default for WalkableSurfaceService {
    fn default() -> Self {
        Self::new(FlatGround::default())
    }
}

/// Плоский пол на высоте `height`, опционально ограниченный прямоугольником (XZ)
#[derive(Debug, Clone, Default)]
pub struct FlatGround {
    pub height: f32,
    pub bounds: Option<Rect>,
}

impl FlatGround {
    pub fn bounded(min: Vec2, max: Vec2) -> Self {
        Self {
            height: 0.0,
            bounds: Some(Rect::from_corners(min, max)),
        }
    }
}

impl WalkableSurface for FlatGround {
    fn sample_walkable_point(&self, near: Vec3, max_distance: f32) -> Option<Vec3> {
        let point = Vec2::new(near.x, near.z);
        let projected = match self.bounds {
            None => point,
            Some(bounds) => point.clamp(bounds.min, bounds.max),
        };

        if projected.distance(point) > max_distance {
            return None;
        }
        Some(Vec3::new(projected.x, self.height, projected.y))
    }
}

/// Navmesh без единой walkable точки (агент "висит" вне карты)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWalkableSurface;

impl WalkableSurface for NoWalkableSurface {
    fn sample_walkable_point(&self, _near: Vec3, _max_distance: f32) -> Option<Vec3> {
        None
    }
}
