//! Scene configuration
//!
//! Plain structs with sensible defaults. The binary starts from
//! [`SceneConfig::default`] and overrides individual fields.

use std::path::PathBuf;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_deg: 50.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

/// Starting pose and movement tuning of the first-person camera
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub at: [f32; 3],
    pub up: [f32; 3],
    /// Distance covered by one forward/back/strafe step
    pub move_speed: f32,
    /// Degrees turned by one pan step
    pub pan_degrees: f32,
    /// Degrees of rotation per pixel of mouse drag
    pub drag_sensitivity: f32,
    /// Eye height restored when fly mode is switched off
    pub ground_level: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 3.0],
            at: [0.0, 0.0, -100.0],
            up: [0.0, 1.0, 0.0],
            move_speed: 0.2,
            pan_degrees: 5.0,
            drag_sensitivity: 0.2,
            ground_level: 1.0,
        }
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub enabled: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.0, 2.0],
            enabled: true,
        }
    }
}

/// Cone-restricted spotlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotlightConfig {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    /// Half-angle of the cone in degrees; uploaded as its cosine
    pub cutoff_deg: f32,
    /// Falloff exponent applied to the cosine inside the cone
    pub exponent: f32,
    pub enabled: bool,
}

impl SpotlightConfig {
    pub fn cosine_cutoff(&self) -> f32 {
        self.cutoff_deg.to_radians().cos()
    }
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 0.0],
            direction: [0.0, -1.0, 0.0],
            cutoff_deg: 20.0,
            exponent: 10.0,
            enabled: true,
        }
    }
}

/// Everything the demo needs to build its first frame
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub window_size: (u32, u32),
    pub clear_color: [f64; 4],
    pub projection: ProjectionConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub spotlight: SpotlightConfig,
    /// Triangle mesh loaded in the background at startup
    pub model_path: PathBuf,
    /// World-space position and uniform scale of the loaded model
    pub model_offset: [f32; 3],
    pub model_scale: f32,
    /// World-space translation of the figure's root part
    pub figure_origin: [f32; 3],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_size: (1200, 800),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            projection: ProjectionConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            spotlight: SpotlightConfig::default(),
            model_path: PathBuf::from("assets/octahedron.obj"),
            model_offset: [1.5, -0.25, -1.0],
            model_scale: 0.5,
            figure_origin: [-0.3, -0.6, 0.0],
        }
    }
}

impl SceneConfig {
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.window_size;
        width as f32 / height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotlight_cosine_cutoff() {
        let spot = SpotlightConfig {
            cutoff_deg: 60.0,
            ..Default::default()
        };
        assert!((spot.cosine_cutoff() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_aspect_guards_zero_height() {
        let config = SceneConfig {
            window_size: (800, 0),
            ..Default::default()
        };
        assert_eq!(config.aspect(), 800.0);
    }
}
