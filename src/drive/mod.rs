// Drive control module for the four-wheel Meccanum base
//
// Provides:
// - Meccanum wheel kinematics (drive axes -> clamped per-wheel magnitudes)
// - The velocity-motor collaborator trait and a simulated motor
// - Per-wheel drive units and the four-wheel drivetrain

mod drivetrain;
pub mod kinematics;
pub mod motor;
mod wheel;

pub use drivetrain::{Drivetrain, InvalidWheelPolicy};
pub use kinematics::{
    DriveError, MAX_MAGNITUDE, WheelMagnitudes, WheelPosition, clamp_magnitude, compute,
    compute_for_code,
};
pub use motor::{MotorState, SimulatedMotor, VelocityMotor};
pub use wheel::{WheelDriveUnit, WheelState};
