// Meccanum wheel kinematics for a four-wheel base
// Converts the three drive axes (forward, strafe, clockwise) into a signed
// motor magnitude per wheel, clamped to the actuator range [-1, 1].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Actuator input limit: motor controllers only accept [-MAX_MAGNITUDE, MAX_MAGNITUDE]
pub const MAX_MAGNITUDE: f64 = 1.0;

/// Error types for the drive core
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DriveError {
    #[error("Invalid wheel position code {code} (expected 1..=4)")]
    InvalidWheelPosition { code: i64 },
}

pub type Result<T> = std::result::Result<T, DriveError>;

/// Physical position of a wheel on the base
///
/// The numeric codes (1 = front right .. 4 = back right) are the ones used
/// on the wire by `WheelCommand`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelPosition {
    FrontRight = 1,
    FrontLeft = 2,
    BackLeft = 3,
    BackRight = 4,
}

impl WheelPosition {
    /// All wheels, in code order
    pub const ALL: [WheelPosition; 4] = [
        WheelPosition::FrontRight,
        WheelPosition::FrontLeft,
        WheelPosition::BackLeft,
        WheelPosition::BackRight,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Index into arrays laid out in code order
    pub fn index(self) -> usize {
        self as usize - 1
    }

    fn label(self) -> &'static str {
        match self {
            WheelPosition::FrontRight => "front_right",
            WheelPosition::FrontLeft => "front_left",
            WheelPosition::BackLeft => "back_left",
            WheelPosition::BackRight => "back_right",
        }
    }
}

impl TryFrom<i64> for WheelPosition {
    type Error = DriveError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(WheelPosition::FrontRight),
            2 => Ok(WheelPosition::FrontLeft),
            3 => Ok(WheelPosition::BackLeft),
            4 => Ok(WheelPosition::BackRight),
            _ => Err(DriveError::InvalidWheelPosition { code }),
        }
    }
}

impl fmt::Display for WheelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clamp a raw magnitude to the actuator range
///
/// NaN maps to 0.0 so the output is always a valid command.
pub fn clamp_magnitude(raw: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(-MAX_MAGNITUDE, MAX_MAGNITUDE)
    }
}

/// Compute the clamped motor magnitude for one wheel
///
/// # Arguments
/// * `forward` - Longitudinal input, nominally [-1, 1] (positive = forward)
/// * `strafe` - Lateral input, nominally [-1, 1] (positive = right)
/// * `clockwise` - Rotational input, nominally [-1, 1] (positive = clockwise)
///
/// Inputs outside the nominal range are accepted; only the output is clamped.
pub fn compute(position: WheelPosition, forward: f64, strafe: f64, clockwise: f64) -> f64 {
    // Each diagonal pair shares roller orientation, so strafe and rotation
    // flip sign between front/back and left/right.
    let raw = match position {
        WheelPosition::FrontRight => forward - strafe - clockwise,
        WheelPosition::FrontLeft => forward + strafe + clockwise,
        WheelPosition::BackLeft => forward - strafe + clockwise,
        WheelPosition::BackRight => forward + strafe - clockwise,
    };
    clamp_magnitude(raw)
}

/// Same as [`compute`], for a wheel identified by its wire code
pub fn compute_for_code(code: i64, forward: f64, strafe: f64, clockwise: f64) -> Result<f64> {
    let position = WheelPosition::try_from(code)?;
    Ok(compute(position, forward, strafe, clockwise))
}

/// Clamped magnitudes for all four wheels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelMagnitudes {
    pub front_right: f64,
    pub front_left: f64,
    pub back_left: f64,
    pub back_right: f64,
}

impl WheelMagnitudes {
    pub fn from_axes(forward: f64, strafe: f64, clockwise: f64) -> Self {
        let m = |p| compute(p, forward, strafe, clockwise);
        Self {
            front_right: m(WheelPosition::FrontRight),
            front_left: m(WheelPosition::FrontLeft),
            back_left: m(WheelPosition::BackLeft),
            back_right: m(WheelPosition::BackRight),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, position: WheelPosition) -> f64 {
        match position {
            WheelPosition::FrontRight => self.front_right,
            WheelPosition::FrontLeft => self.front_left,
            WheelPosition::BackLeft => self.back_left,
            WheelPosition::BackRight => self.back_right,
        }
    }

    /// Returns magnitudes as array [front_right, front_left, back_left, back_right]
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.front_right,
            self.front_left,
            self.back_left,
            self.back_right,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_grid() -> Vec<f64> {
        (0..=8).map(|i| -1.0 + 0.25 * i as f64).collect()
    }

    #[test]
    fn test_zero_input_is_zero_for_every_wheel() {
        for position in WheelPosition::ALL {
            assert_eq!(compute(position, 0.0, 0.0, 0.0), 0.0, "{}", position);
        }
    }

    #[test]
    fn test_sign_table() {
        assert_eq!(compute(WheelPosition::FrontRight, 1.0, 0.0, 0.0), 1.0);
        assert_eq!(compute(WheelPosition::FrontRight, 0.0, 1.0, 0.0), -1.0);
        assert_eq!(compute(WheelPosition::FrontLeft, 0.0, 1.0, 0.0), 1.0);
        assert_eq!(compute(WheelPosition::BackLeft, 0.0, 0.0, 1.0), 1.0);
        assert_eq!(compute(WheelPosition::BackRight, 0.0, 0.0, 1.0), -1.0);
    }

    #[test]
    fn test_partial_inputs_pass_through_unclamped() {
        // 0.5 - 0.25 + 0.125
        assert_eq!(compute(WheelPosition::BackLeft, 0.5, 0.25, 0.125), 0.375);
        // 0.5 + 0.25 - 0.125
        assert_eq!(compute(WheelPosition::BackRight, 0.5, 0.25, 0.125), 0.625);
    }

    #[test]
    fn test_clamp_boundaries() {
        // raw +3
        assert_eq!(compute(WheelPosition::FrontLeft, 1.0, 1.0, 1.0), 1.0);
        // raw -3
        assert_eq!(compute(WheelPosition::FrontRight, -1.0, 1.0, 1.0), -1.0);
    }

    #[test]
    fn test_output_always_in_range() {
        let grid = axis_grid();
        for position in WheelPosition::ALL {
            for &f in &grid {
                for &s in &grid {
                    for &c in &grid {
                        let m = compute(position, f, s, c);
                        assert!(
                            (-1.0..=1.0).contains(&m),
                            "{} ({}, {}, {}) -> {}",
                            position,
                            f,
                            s,
                            c,
                            m
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        for position in WheelPosition::ALL {
            assert_eq!(compute(position, 5.0, 0.0, 0.0), 1.0);
            assert_eq!(compute(position, -5.0, 0.0, 0.0), -1.0);
            assert_eq!(compute(position, 0.0, 0.0, f64::NAN), 0.0);
        }
    }

    #[test]
    fn test_wheel_codes() {
        for position in WheelPosition::ALL {
            assert_eq!(WheelPosition::try_from(position.code()), Ok(position));
        }
        assert_eq!(
            WheelPosition::try_from(0),
            Err(DriveError::InvalidWheelPosition { code: 0 })
        );
        assert_eq!(
            WheelPosition::try_from(5),
            Err(DriveError::InvalidWheelPosition { code: 5 })
        );
        // Codes beyond a byte or below zero are still just unknown wheels
        assert_eq!(
            WheelPosition::try_from(256),
            Err(DriveError::InvalidWheelPosition { code: 256 })
        );
        assert_eq!(
            WheelPosition::try_from(-1),
            Err(DriveError::InvalidWheelPosition { code: -1 })
        );
    }

    #[test]
    fn test_compute_for_code() {
        assert_eq!(compute_for_code(2, 0.0, 1.0, 0.0), Ok(1.0));
        assert_eq!(
            compute_for_code(9, 1.0, 0.0, 0.0),
            Err(DriveError::InvalidWheelPosition { code: 9 })
        );
    }

    #[test]
    fn test_wheel_magnitudes_match_per_wheel_compute() {
        let (f, s, c) = (0.3, -0.2, 0.4);
        let all = WheelMagnitudes::from_axes(f, s, c);
        for position in WheelPosition::ALL {
            assert_eq!(all.get(position), compute(position, f, s, c));
            assert_eq!(all.as_array()[position.index()], all.get(position));
        }
    }

    #[test]
    fn test_pure_strafe_pattern() {
        // Strafing right: front-left and back-right forward, the other diagonal backward
        let all = WheelMagnitudes::from_axes(0.0, 0.5, 0.0);
        assert_eq!(all.as_array(), [-0.5, 0.5, -0.5, 0.5]);
    }

    #[test]
    fn test_position_serde_names() {
        let json = serde_json::to_string(&WheelPosition::BackLeft).unwrap();
        assert_eq!(json, "\"back_left\"");
        assert_eq!(WheelPosition::BackLeft.to_string(), "back_left");
    }
}
