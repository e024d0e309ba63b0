//! Horizontal scrolling camera
//!
//! Keeps the player a third of the way into the view and only ever scrolls
//! forward, clamped to the level bounds.

use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::{VIEW_HEIGHT, VIEW_WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
        }
    }
}

impl Camera {
    pub fn follow(&mut self, target: &Body, level_width_px: f32) {
        let target_x = target.pos.x - self.width / 3.0;
        if target_x > self.x {
            self.x = target_x;
        }
        let max_x = (level_width_px - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn body_at(x: f32) -> Body {
        Body::new(Vec2::new(x, 100.0), Vec2::new(28.0, 32.0))
    }

    #[test]
    fn test_no_scroll_near_start() {
        let mut camera = Camera::default();
        camera.follow(&body_at(100.0), 6400.0);
        assert_eq!(camera.x, 0.0);
    }

    #[test]
    fn test_scrolls_forward_only() {
        let mut camera = Camera::default();
        camera.follow(&body_at(1000.0), 6400.0);
        let scrolled = 1000.0 - 1024.0 / 3.0;
        assert!((camera.x - scrolled).abs() < 1e-3);

        camera.follow(&body_at(500.0), 6400.0);
        assert!((camera.x - scrolled).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_to_level_end() {
        let mut camera = Camera::default();
        camera.follow(&body_at(6390.0), 6400.0);
        assert_eq!(camera.x, 6400.0 - 1024.0);
    }

    #[test]
    fn test_narrow_level_never_scrolls() {
        let mut camera = Camera::default();
        camera.follow(&body_at(900.0), 640.0);
        assert_eq!(camera.x, 0.0);
    }
}
