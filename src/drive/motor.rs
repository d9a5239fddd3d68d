// Velocity-controlled motor collaborator
//
// The drive core never talks to hardware directly. Anything that can take a
// velocity setpoint, run one control step and report encoder speed can sit
// behind a wheel.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SIM_MOTOR_GAIN;

/// A motor + encoder pair with its own closed-loop controller
pub trait VelocityMotor {
    /// Set the desired velocity setpoint
    fn set_target_velocity(&mut self, value: f64);

    /// Advance the motor's control loop by one step
    fn update(&mut self);

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Measured speed, used for diagnostics only
    fn encoder_speed(&self) -> f64;
}

/// Actuation state of a motor (initial state is Disabled)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorState {
    #[default]
    Disabled,
    Enabled,
}

impl fmt::Display for MotorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorState::Disabled => f.write_str("disabled"),
            MotorState::Enabled => f.write_str("enabled"),
        }
    }
}

/// In-process stand-in for a PID velocity motor
///
/// Each `update` moves the measured speed a fixed fraction (`gain`) of the way
/// towards the target while enabled, and decays it towards zero while disabled.
#[derive(Debug, Clone)]
pub struct SimulatedMotor {
    state: MotorState,
    target: f64,
    speed: f64,
    gain: f64,
}

impl SimulatedMotor {
    pub fn new() -> Self {
        Self::with_gain(SIM_MOTOR_GAIN)
    }

    /// Create with a custom response gain, clamped to (0, 1]
    pub fn with_gain(gain: f64) -> Self {
        let gain = if gain.is_finite() && gain > 0.0 {
            gain.min(1.0)
        } else {
            SIM_MOTOR_GAIN
        };
        Self {
            state: MotorState::Disabled,
            target: 0.0,
            speed: 0.0,
            gain,
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn target_velocity(&self) -> f64 {
        self.target
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }
}

impl Default for SimulatedMotor {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityMotor for SimulatedMotor {
    fn set_target_velocity(&mut self, value: f64) {
        self.target = value;
    }

    fn update(&mut self) {
        let goal = match self.state {
            MotorState::Enabled => self.target,
            MotorState::Disabled => 0.0,
        };
        self.speed += self.gain * (goal - self.speed);
        debug!(
            "Sim motor step: state={}, target={:.3}, speed={:.3}",
            self.state, self.target, self.speed
        );
    }

    fn enable(&mut self) {
        self.state = MotorState::Enabled;
    }

    fn disable(&mut self) {
        self.state = MotorState::Disabled;
    }

    fn is_enabled(&self) -> bool {
        self.state == MotorState::Enabled
    }

    fn encoder_speed(&self) -> f64 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disabled_and_still() {
        let motor = SimulatedMotor::new();
        assert_eq!(motor.state(), MotorState::Disabled);
        assert!(!motor.is_enabled());
        assert_eq!(motor.encoder_speed(), 0.0);
    }

    #[test]
    fn test_enabled_motor_tracks_target() {
        let mut motor = SimulatedMotor::with_gain(0.5);
        motor.enable();
        motor.set_target_velocity(1.0);
        motor.update();
        assert_eq!(motor.encoder_speed(), 0.5);
        motor.update();
        assert_eq!(motor.encoder_speed(), 0.75);
    }

    #[test]
    fn test_disabled_motor_ignores_target() {
        let mut motor = SimulatedMotor::with_gain(1.0);
        motor.set_target_velocity(1.0);
        motor.update();
        assert_eq!(motor.encoder_speed(), 0.0);

        motor.enable();
        motor.update();
        assert_eq!(motor.encoder_speed(), 1.0);

        // Disabling keeps the setpoint but the motor coasts down
        motor.disable();
        motor.update();
        assert_eq!(motor.encoder_speed(), 0.0);
        assert_eq!(motor.target_velocity(), 1.0);
    }

    #[test]
    fn test_gain_is_sanitized() {
        assert_eq!(SimulatedMotor::with_gain(3.0).gain(), 1.0);
        assert_eq!(SimulatedMotor::with_gain(-1.0).gain(), SIM_MOTOR_GAIN);
        assert_eq!(SimulatedMotor::with_gain(f64::NAN).gain(), SIM_MOTOR_GAIN);
    }
}
