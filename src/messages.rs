// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::drive::WheelPosition;

// Command from teleop/scripts -> runtime
// All three axes are normalized to [-1, 1]; larger values are clamped per wheel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub forward: f64,
    pub strafe: f64,
    pub clockwise: f64,
}

impl DriveCommand {
    pub fn new(forward: f64, strafe: f64, clockwise: f64) -> Self {
        Self {
            forward,
            strafe,
            clockwise,
        }
    }

    pub fn stop() -> Self {
        Self::default()
    }
}

// Single-wheel command -> runtime
// `wheel` is the raw position code (1 = front right .. 4 = back right), so it
// can arrive out of range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelCommand {
    pub wheel: i64,
    pub forward: f64,
    pub strafe: f64,
    pub clockwise: f64,
}

/// Per-wheel entry in the telemetry published by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelReport {
    pub position: WheelPosition,
    pub magnitude: f64,
    pub encoder_speed: f64,
}

/// Drivetrain telemetry published by runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveTelemetry {
    pub enabled: bool,
    pub wheels: [WheelReport; 4],
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}
