// Four-wheel Meccanum drivetrain
//
// Owns one drive unit per wheel and runs a full tick (update every wheel,
// then commit every wheel) from a single drive command.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::kinematics::{Result, WheelMagnitudes, WheelPosition};
use super::motor::VelocityMotor;
use super::wheel::WheelDriveUnit;
use crate::messages::{DriveCommand, DriveTelemetry, WheelCommand, WheelReport};

/// Handling of a wheel command whose position code names no wheel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidWheelPolicy {
    /// Log it and treat the command as a zero magnitude
    #[default]
    FailOpen,
    /// Return `DriveError::InvalidWheelPosition` to the caller
    Reject,
}

pub struct Drivetrain<M: VelocityMotor> {
    wheels: [WheelDriveUnit<M>; 4], // code order: FR, FL, BL, BR
}

impl<M: VelocityMotor> Drivetrain<M> {
    pub fn new(front_right: M, front_left: M, back_left: M, back_right: M) -> Self {
        Self {
            wheels: [
                WheelDriveUnit::new(WheelPosition::FrontRight, front_right),
                WheelDriveUnit::new(WheelPosition::FrontLeft, front_left),
                WheelDriveUnit::new(WheelPosition::BackLeft, back_left),
                WheelDriveUnit::new(WheelPosition::BackRight, back_right),
            ],
        }
    }

    /// Build a drivetrain with one motor per wheel from a constructor
    pub fn from_fn(mut make_motor: impl FnMut(WheelPosition) -> M) -> Self {
        Self {
            wheels: WheelPosition::ALL.map(|p| WheelDriveUnit::new(p, make_motor(p))),
        }
    }

    /// Compute every wheel's magnitude for `cmd`, then commit them all
    pub fn drive(&mut self, cmd: &DriveCommand) -> WheelMagnitudes {
        for unit in &mut self.wheels {
            unit.update(cmd.forward, cmd.strafe, cmd.clockwise);
        }
        for unit in &mut self.wheels {
            unit.commit_current();
        }

        let magnitudes = self.magnitudes();
        debug!(
            "Drive: fr={:.3}, fl={:.3}, bl={:.3}, br={:.3}",
            magnitudes.front_right, magnitudes.front_left, magnitudes.back_left, magnitudes.back_right
        );
        magnitudes
    }

    /// Update one wheel identified by its raw position code
    ///
    /// An unknown code never modifies a stored magnitude. Under
    /// `InvalidWheelPolicy::FailOpen` it yields `Ok(0.0)`; under `Reject` it
    /// yields the error.
    pub fn update_wheel(
        &mut self,
        code: i64,
        forward: f64,
        strafe: f64,
        clockwise: f64,
        policy: InvalidWheelPolicy,
    ) -> Result<f64> {
        match WheelPosition::try_from(code) {
            Ok(position) => Ok(self.wheel_mut(position).update(forward, strafe, clockwise)),
            Err(e) => match policy {
                InvalidWheelPolicy::FailOpen => {
                    warn!("{}, using zero magnitude", e);
                    Ok(0.0)
                }
                InvalidWheelPolicy::Reject => Err(e),
            },
        }
    }

    /// Drive a single wheel from `cmd` and hold the other three at zero
    ///
    /// With a fail-open unknown code every wheel is committed at zero.
    pub fn drive_single(
        &mut self,
        cmd: &WheelCommand,
        policy: InvalidWheelPolicy,
    ) -> Result<WheelMagnitudes> {
        self.update_wheel(cmd.wheel, cmd.forward, cmd.strafe, cmd.clockwise, policy)?;
        let target = WheelPosition::try_from(cmd.wheel).ok();

        for unit in &mut self.wheels {
            if Some(unit.position()) != target {
                unit.set_magnitude(0.0);
            }
            unit.commit_current();
        }
        Ok(self.magnitudes())
    }

    /// Command zero on every wheel
    pub fn stop(&mut self) {
        for unit in &mut self.wheels {
            unit.set_magnitude(0.0);
            unit.commit(0.0);
        }
    }

    pub fn enable_all(&mut self) {
        info!("Enabling all wheels");
        for unit in &mut self.wheels {
            unit.enable();
        }
    }

    pub fn disable_all(&mut self) {
        info!("Disabling all wheels");
        for unit in &mut self.wheels {
            unit.disable();
        }
    }

    /// True only when every wheel's motor is enabled
    pub fn is_enabled(&self) -> bool {
        self.wheels.iter().all(|unit| unit.is_enabled())
    }

    pub fn wheel(&self, position: WheelPosition) -> &WheelDriveUnit<M> {
        &self.wheels[position.index()]
    }

    pub fn wheel_mut(&mut self, position: WheelPosition) -> &mut WheelDriveUnit<M> {
        &mut self.wheels[position.index()]
    }

    /// Last stored magnitude of every wheel
    pub fn magnitudes(&self) -> WheelMagnitudes {
        let m = |p| self.wheel(p).current_magnitude();
        WheelMagnitudes {
            front_right: m(WheelPosition::FrontRight),
            front_left: m(WheelPosition::FrontLeft),
            back_left: m(WheelPosition::BackLeft),
            back_right: m(WheelPosition::BackRight),
        }
    }

    pub fn telemetry(&self) -> DriveTelemetry {
        DriveTelemetry {
            enabled: self.is_enabled(),
            wheels: WheelPosition::ALL.map(|p| {
                let unit = self.wheel(p);
                WheelReport {
                    position: p,
                    magnitude: unit.current_magnitude(),
                    encoder_speed: unit.motor().encoder_speed(),
                }
            }),
        }
    }
}
