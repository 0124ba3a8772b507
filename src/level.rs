//! Static level geometry
//!
//! A level is the world size plus the solid rectangles extracted from the
//! map's collision layer. It is immutable for the whole session: the
//! simulation only ever borrows it.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Rect;

/// Errors raised while loading level geometry
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Invalid(String),
}

/// One solid rectangle as written in level files
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ObstacleData {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// On-disk level descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LevelData {
    width: f32,
    height: f32,
    #[serde(default)]
    obstacles: Vec<ObstacleData>,
    #[serde(default)]
    spawn_point: Option<Vec2>,
}

/// World bounds and static obstacles for one level
#[derive(Debug, Clone)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Rect>,
    /// Designated safe position used when random sampling gives up
    pub spawn_point: Option<Vec2>,
}

impl Level {
    /// Build a level from parts, validating the geometry
    pub fn new(
        width: f32,
        height: f32,
        obstacles: Vec<Rect>,
        spawn_point: Option<Vec2>,
    ) -> Result<Self, LevelError> {
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(LevelError::Invalid(format!("world size {width}x{height} must be positive")));
        }
        for (i, o) in obstacles.iter().enumerate() {
            let finite = o.min.is_finite() && o.max.is_finite();
            if !finite || o.width() < 0.0 || o.height() < 0.0 {
                return Err(LevelError::Invalid(format!("obstacle {i} has invalid extent {o:?}")));
            }
        }
        if let Some(p) = spawn_point {
            if !(p.x >= 0.0 && p.x <= width && p.y >= 0.0 && p.y <= height) {
                return Err(LevelError::Invalid(format!("spawn point {p} lies outside the world")));
            }
        }
        Ok(Self {
            width,
            height,
            obstacles,
            spawn_point,
        })
    }

    /// Parse a JSON level descriptor
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let data: LevelData = serde_json::from_str(json)?;
        let obstacles = data
            .obstacles
            .iter()
            .map(|o| Rect::new(o.x, o.y, o.width, o.height))
            .collect();
        Self::new(data.width, data.height, obstacles, data.spawn_point)
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!("[Level] Loaded {} colliders from {}", level.obstacles.len(), path.display());
        Ok(level)
    }

    /// Built-in arena: a walled 960x640 clearing with a few tree clumps
    pub fn demo() -> Self {
        let (w, h) = (960.0, 640.0);
        let wall = 16.0;
        let obstacles = vec![
            // Border
            Rect::new(0.0, 0.0, w, wall),
            Rect::new(0.0, h - wall, w, wall),
            Rect::new(0.0, 0.0, wall, h),
            Rect::new(w - wall, 0.0, wall, h),
            // Tree clumps
            Rect::new(200.0, 140.0, 96.0, 64.0),
            Rect::new(620.0, 120.0, 64.0, 128.0),
            Rect::new(420.0, 300.0, 128.0, 48.0),
            Rect::new(160.0, 440.0, 64.0, 96.0),
            Rect::new(700.0, 430.0, 112.0, 64.0),
        ];
        Self {
            width: w,
            height: h,
            obstacles,
            spawn_point: Some(Vec2::new(w / 2.0, 250.0)),
        }
    }

    /// Whole-world rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Position used when no random safe position could be found
    pub fn fallback_spawn(&self) -> Vec2 {
        self.spawn_point
            .unwrap_or_else(|| Vec2::new(self.width / 2.0, self.height / 2.0))
    }

    /// True if `probe` overlaps no obstacle
    pub fn is_clear(&self, probe: &Rect) -> bool {
        !self.obstacles.iter().any(|o| o.overlaps(probe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let json = r#"{
            "width": 320, "height": 240,
            "obstacles": [ { "x": 10, "y": 20, "width": 30, "height": 40 } ],
            "spawn_point": [100, 100]
        }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level.width, 320.0);
        assert_eq!(level.obstacles.len(), 1);
        assert_eq!(level.obstacles[0], Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(level.fallback_spawn(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_fallback_defaults_to_center() {
        let level = Level::from_json(r#"{ "width": 200, "height": 100 }"#).unwrap();
        assert!(level.obstacles.is_empty());
        assert_eq!(level.fallback_spawn(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert!(matches!(
            Level::from_json(r#"{ "width": 0, "height": 100 }"#),
            Err(LevelError::Invalid(_))
        ));
        assert!(matches!(
            Level::from_json(
                r#"{ "width": 100, "height": 100, "obstacles": [{ "x": 0, "y": 0, "width": -5, "height": 5 }] }"#
            ),
            Err(LevelError::Invalid(_))
        ));
        assert!(matches!(
            Level::from_json(r#"{ "width": 100, "height": 100, "spawn_point": [500, 5] }"#),
            Err(LevelError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Level::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_demo_spawn_is_clear() {
        let level = Level::demo();
        let probe = Rect::from_center(level.fallback_spawn(), Vec2::splat(32.0));
        assert!(level.is_clear(&probe));
    }
}
