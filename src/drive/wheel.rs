// Per-wheel drive unit
//
// Holds the last computed magnitude for one wheel and owns that wheel's motor.
// Calculation (`update`) and actuation (`commit`) are separate calls so the
// caller can inspect or override the magnitude before it reaches the motor.

use std::fmt;

use tracing::{debug, info};

use super::kinematics::{WheelPosition, compute};
use super::motor::VelocityMotor;

/// Mutable per-wheel record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelState {
    pub position: WheelPosition,
    /// Last computed command, always within [-1, 1]
    pub magnitude: f64,
}

impl WheelState {
    pub fn new(position: WheelPosition) -> Self {
        Self {
            position,
            magnitude: 0.0,
        }
    }
}

/// One Meccanum wheel bound to its motor for its whole lifetime
pub struct WheelDriveUnit<M: VelocityMotor> {
    state: WheelState,
    motor: M,
}

impl<M: VelocityMotor> WheelDriveUnit<M> {
    pub fn new(position: WheelPosition, motor: M) -> Self {
        Self {
            state: WheelState::new(position),
            motor,
        }
    }

    /// Recompute and store this wheel's magnitude; the motor is not touched
    pub fn update(&mut self, forward: f64, strafe: f64, clockwise: f64) -> f64 {
        self.state.magnitude = compute(self.state.position, forward, strafe, clockwise);
        self.state.magnitude
    }

    /// Send `magnitude` to the motor as its target and run one control step
    pub fn commit(&mut self, magnitude: f64) {
        debug!("Commit {}: {:.3}", self.state.position, magnitude);
        self.motor.set_target_velocity(magnitude);
        self.motor.update();
    }

    /// Commit the last value stored by `update`
    pub fn commit_current(&mut self) {
        self.commit(self.state.magnitude);
    }

    pub fn enable(&mut self) {
        info!("Enabling {} wheel", self.state.position);
        self.motor.enable();
    }

    pub fn disable(&mut self) {
        info!("Disabling {} wheel", self.state.position);
        self.motor.disable();
    }

    pub fn is_enabled(&self) -> bool {
        self.motor.is_enabled()
    }

    pub fn current_magnitude(&self) -> f64 {
        self.state.magnitude
    }

    /// Measured motor speed as text, for diagnostics
    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn position(&self) -> WheelPosition {
        self.state.position
    }

    pub fn state(&self) -> WheelState {
        self.state
    }

    pub(crate) fn set_magnitude(&mut self, magnitude: f64) {
        self.state.magnitude = magnitude;
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn motor_mut(&mut self) -> &mut M {
        &mut self.motor
    }
}

impl<M: VelocityMotor> fmt::Display for WheelDriveUnit<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.motor.encoder_speed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::motor::SimulatedMotor;

    /// Records every call made on it, in order
    #[derive(Default)]
    struct RecordingMotor {
        calls: Vec<String>,
        enabled: bool,
        speed: f64,
    }

    impl VelocityMotor for RecordingMotor {
        fn set_target_velocity(&mut self, value: f64) {
            self.calls.push(format!("target {}", value));
        }

        fn update(&mut self) {
            self.calls.push("update".to_string());
        }

        fn enable(&mut self) {
            self.enabled = true;
            self.calls.push("enable".to_string());
        }

        fn disable(&mut self) {
            self.enabled = false;
            self.calls.push("disable".to_string());
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn encoder_speed(&self) -> f64 {
            self.speed
        }
    }

    #[test]
    fn test_new_unit_has_zero_magnitude() {
        let unit = WheelDriveUnit::new(WheelPosition::BackLeft, SimulatedMotor::new());
        assert_eq!(unit.current_magnitude(), 0.0);
        assert_eq!(unit.position(), WheelPosition::BackLeft);
        assert!(!unit.is_enabled());
    }

    #[test]
    fn test_update_stores_computed_magnitude() {
        for position in WheelPosition::ALL {
            let mut unit = WheelDriveUnit::new(position, SimulatedMotor::new());
            let returned = unit.update(0.4, -0.3, 0.2);
            assert_eq!(returned, compute(position, 0.4, -0.3, 0.2));
            assert_eq!(unit.current_magnitude(), returned);
        }
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontLeft, SimulatedMotor::new());
        unit.update(-0.9, 0.9, 0.9);
        let first = unit.update(0.25, 0.5, -0.125);
        let second = unit.update(0.25, 0.5, -0.125);
        assert_eq!(first, second);
        assert_eq!(first, 0.625);
    }

    #[test]
    fn test_update_does_not_command_motor() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontRight, RecordingMotor::default());
        unit.update(1.0, 0.0, 0.0);
        assert!(unit.motor().calls.is_empty());
    }

    #[test]
    fn test_commit_sets_target_then_steps() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontRight, RecordingMotor::default());
        unit.commit(0.5);
        assert_eq!(unit.motor().calls, vec!["target 0.5", "update"]);
    }

    #[test]
    fn test_commit_current_uses_stored_magnitude() {
        let mut unit = WheelDriveUnit::new(WheelPosition::BackRight, RecordingMotor::default());
        unit.update(0.0, 0.0, 1.0);
        unit.commit_current();
        assert_eq!(unit.motor().calls, vec!["target -1", "update"]);
    }

    #[test]
    fn test_enable_disable_pass_through() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontLeft, RecordingMotor::default());
        unit.enable();
        assert!(unit.is_enabled());
        unit.disable();
        assert!(!unit.is_enabled());
        assert_eq!(unit.motor().calls, vec!["enable", "disable"]);
    }

    #[test]
    fn test_describe_renders_encoder_speed() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontLeft, RecordingMotor::default());
        unit.motor_mut().speed = 0.25;
        assert_eq!(unit.describe(), "0.25");
        assert_eq!(unit.to_string(), unit.describe());
    }

    #[test]
    fn test_commit_moves_simulated_motor() {
        let mut unit = WheelDriveUnit::new(WheelPosition::FrontRight, SimulatedMotor::with_gain(1.0));
        unit.enable();
        let magnitude = unit.update(0.5, 0.0, 0.0);
        unit.commit(magnitude);
        assert_eq!(unit.motor().encoder_speed(), 0.5);
    }
}
