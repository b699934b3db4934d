//! # Animation Driver
//!
//! Turns elapsed time and two user triggers into [`PoseParameters`]:
//!
//! - **Walking** (toggle): every leg, body segment, the head and the tail
//!   follow sinusoids of `4 * seconds`. Diagonal leg pairs share a phase,
//!   front and back legs run opposite, knees lag their shoulders by π/3.
//!   Switching walking off freezes the pose where it was.
//! - **Poke** (one-shot, 0.8 s): the tongue eases out, holds with a small
//!   wiggle, then eases back in, while the head tilts with it.
//!
//! Both modes write the head angle. Poke is evaluated after walking, so it
//! wins while active.

use std::f64::consts::PI;

use log::debug;

use super::joints::{Joint, PoseParameters};

/// Walking phase advances at this multiple of wall-clock seconds
pub const WALK_FREQUENCY: f64 = 4.0;

/// Poke phase boundaries in seconds since the trigger: extend over
/// `[0, 0.25)`, hold over `[0.25, 0.55]`, retract until 0.8
pub const POKE_OUT_END: f64 = 0.25;
pub const POKE_HOLD_END: f64 = 0.55;
pub const POKE_TOTAL_SECONDS: f64 = 0.80;

/// Head tilt in degrees at full tongue extension
const POKE_HEAD_TILT: f64 = -8.0;
const WIGGLE_AMPLITUDE: f64 = 0.02;
const WIGGLE_FREQUENCY: f64 = 30.0;

/// Cubic ease, 0 at 0 and 1 at 1 with flat ends
pub fn smoothstep(x: f64) -> f64 {
    x * x * (3.0 - 2.0 * x)
}

#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    walking: bool,
    poke_start: Option<f64>,
    elapsed: f64,
    params: PoseParameters,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn walking(&self) -> bool {
        self.walking
    }

    pub fn set_walking(&mut self, walking: bool) {
        if walking != self.walking {
            debug!("walking {}", if walking { "on" } else { "off" });
        }
        self.walking = walking;
    }

    /// Starts (or restarts) the poke gesture at `seconds`
    pub fn poke(&mut self, seconds: f64) {
        debug!("poke at {:.3}s", seconds);
        self.poke_start = Some(seconds);
    }

    pub fn poke_active(&self) -> bool {
        self.poke_start.is_some()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn params(&self) -> &PoseParameters {
        &self.params
    }

    /// Advances to `seconds` since the session started
    pub fn update(&mut self, seconds: f64) -> &PoseParameters {
        self.elapsed = seconds;
        if self.walking {
            self.apply_walk(seconds);
        }
        if let Some(start) = self.poke_start {
            self.apply_poke(seconds, seconds - start);
        }
        &self.params
    }

    fn apply_walk(&mut self, seconds: f64) {
        let t = seconds * WALK_FREQUENCY;
        let knee_lag = PI / 3.0;
        let sway = 2.0 * (t * 1.3).sin();
        let sway_lead = 2.0 * (t * 1.3 + PI / 6.0).sin();
        let shoulder = 10.0 * t.sin();
        let knee = 20.0 * (t + knee_lag).sin();
        let knee_opposite = 20.0 * (t + knee_lag + PI).sin();

        let p = &mut self.params;
        p[Joint::Head] = (10.0 * (t * 1.2).sin()) as f32;

        p[Joint::LeftFrontShoulder] = shoulder as f32;
        p[Joint::RightBackShoulder] = shoulder as f32;
        p[Joint::RightFrontShoulder] = -shoulder as f32;
        p[Joint::LeftBackShoulder] = -shoulder as f32;

        p[Joint::LeftFrontKnee] = knee as f32;
        p[Joint::RightBackKnee] = knee as f32;
        p[Joint::RightFrontKnee] = knee_opposite as f32;
        p[Joint::LeftBackKnee] = knee_opposite as f32;

        p[Joint::MiddleBody] = sway as f32;
        p[Joint::FrontBody] = sway_lead as f32;
        p[Joint::BackBody] = sway_lead as f32;
        p[Joint::Tail] = (30.0 * (t * 1.3).sin()) as f32;
    }

    fn apply_poke(&mut self, seconds: f64, since_start: f64) {
        let (out, wiggle, head) = if since_start < 0.0 {
            (0.0, 0.0, None)
        } else if since_start < POKE_OUT_END {
            let out = smoothstep(since_start / POKE_OUT_END);
            (out, 0.0, Some(POKE_HEAD_TILT * out))
        } else if since_start <= POKE_HOLD_END {
            let wiggle = WIGGLE_AMPLITUDE * (seconds * WIGGLE_FREQUENCY).sin();
            (1.0, wiggle, Some(POKE_HEAD_TILT))
        } else if since_start < POKE_TOTAL_SECONDS {
            let u = (since_start - POKE_HOLD_END) / (POKE_TOTAL_SECONDS - POKE_HOLD_END);
            let out = 1.0 - smoothstep(u);
            (out, 0.0, Some(POKE_HEAD_TILT * out))
        } else {
            debug!("poke finished");
            self.poke_start = None;
            (0.0, 0.0, None)
        };

        self.params[Joint::TongueOut] = out as f32;
        self.params[Joint::TongueWiggle] = wiggle as f32;
        if let Some(head) = head {
            self.params[Joint::Head] = head as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn walking() -> AnimationDriver {
        let mut driver = AnimationDriver::new();
        driver.set_walking(true);
        driver
    }

    #[test]
    fn test_walk_starts_from_zero() {
        let mut driver = walking();
        let params = *driver.update(0.0);
        for joint in [
            Joint::Head,
            Joint::Tail,
            Joint::MiddleBody,
            Joint::LeftFrontShoulder,
            Joint::RightFrontShoulder,
            Joint::LeftBackShoulder,
            Joint::RightBackShoulder,
        ] {
            assert_close(params[joint], 0.0);
        }
        // Knees lag by π/3, so they start part way through their cycle
        assert_close(params[Joint::LeftFrontKnee], 20.0 * (PI / 3.0).sin() as f32);
    }

    #[test]
    fn test_front_shoulders_in_opposite_phase() {
        let mut driver = walking();
        // Scaled phase 4t = π/2
        let params = *driver.update(PI / 8.0);
        assert_close(params[Joint::LeftFrontShoulder], 10.0);
        assert_close(params[Joint::RightFrontShoulder], -10.0);
        assert_close(params[Joint::RightBackShoulder], 10.0);
        assert_close(params[Joint::LeftBackShoulder], -10.0);
    }

    #[test]
    fn test_knees_lag_shoulders() {
        let mut driver = walking();
        for seconds in [0.1, 0.37, 1.9] {
            let params = *driver.update(seconds);
            let t = seconds * WALK_FREQUENCY;
            assert_close(params[Joint::LeftFrontKnee], (20.0 * (t + PI / 3.0).sin()) as f32);
            assert_close(params[Joint::RightFrontKnee], -params[Joint::LeftFrontKnee]);
            assert_close(params[Joint::RightBackKnee], params[Joint::LeftFrontKnee]);
        }
    }

    #[test]
    fn test_disabling_walk_freezes_pose() {
        let mut driver = walking();
        let moving = *driver.update(0.3);
        driver.set_walking(false);
        let frozen = *driver.update(2.0);
        assert_eq!(moving, frozen);
    }

    #[test]
    fn test_idle_driver_stays_at_rest() {
        let mut driver = AnimationDriver::new();
        assert_eq!(*driver.update(12.5), PoseParameters::rest());
    }

    #[test]
    fn test_poke_timeline() {
        let mut driver = AnimationDriver::new();
        let start = 0.0;
        driver.poke(start);

        let params = *driver.update(start);
        assert_close(params[Joint::TongueOut], 0.0);
        assert!(driver.poke_active());

        let params = *driver.update(start + 0.25);
        assert_close(params[Joint::TongueOut], 1.0);

        let params = *driver.update(start + 0.55);
        assert_close(params[Joint::TongueOut], 1.0);
        assert!(params[Joint::TongueWiggle].abs() > 0.0);
        assert_close(params[Joint::Head], -8.0);

        let params = *driver.update(start + 0.8 + 1e-3);
        assert_close(params[Joint::TongueOut], 0.0);
        assert_close(params[Joint::TongueWiggle], 0.0);
        assert!(!driver.poke_active());
    }

    #[test]
    fn test_poke_eases_out_and_in() {
        let mut driver = AnimationDriver::new();
        driver.poke(0.0);
        let half_out = driver.update(0.125)[Joint::TongueOut];
        assert_close(half_out, 0.5);
        let retracting = *driver.update(0.55 + 0.0625);
        assert_close(retracting[Joint::TongueOut], 1.0 - smoothstep(0.25) as f32);
        assert_close(retracting[Joint::Head], -8.0 * retracting[Joint::TongueOut]);
    }

    #[test]
    fn test_poke_before_start_is_inactive() {
        let mut driver = AnimationDriver::new();
        driver.poke(5.0);
        let params = *driver.update(4.0);
        assert_close(params[Joint::TongueOut], 0.0);
        assert!(driver.poke_active());
    }

    #[test]
    fn test_poke_overrides_walking_head() {
        let mut driver = walking();
        driver.poke(1.0);
        let params = *driver.update(1.4);
        assert_close(params[Joint::Head], -8.0);
        // The legs keep walking underneath
        let t = 1.4 * WALK_FREQUENCY;
        assert_close(params[Joint::LeftFrontShoulder], (10.0 * t.sin()) as f32);
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-12);
    }
}
