// Timeouts, topics, drive configuration
use std::time::Duration;

use crate::drive::InvalidWheelPolicy;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Command timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_DRIVE: &str = "meccanum/cmd/drive"; // whole-base commands
pub const TOPIC_CMD_WHEEL: &str = "meccanum/cmd/wheel"; // single-wheel commands
pub const TOPIC_WHEELS: &str = "meccanum/state/wheels"; // telemetry
pub const TOPIC_HEALTH: &str = "meccanum/state/health"; // health status

// Simulated motor response per control step (fraction of the error closed)
pub const SIM_MOTOR_GAIN: f64 = 0.5;

// What to do with a wheel command naming a position that doesn't exist
pub const DEFAULT_INVALID_WHEEL_POLICY: InvalidWheelPolicy = InvalidWheelPolicy::FailOpen;
