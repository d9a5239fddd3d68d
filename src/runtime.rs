// Control loop with watchdog
// Note: the watchdog drives every wheel at zero when commands stop arriving,
// e.g. when teleop crashes, instead of replaying the last command forever

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

// local imports
use crate::config::{
    CMD_TIMEOUT, DEFAULT_INVALID_WHEEL_POLICY, LOOP_HZ, TOPIC_CMD_DRIVE, TOPIC_CMD_WHEEL,
    TOPIC_HEALTH, TOPIC_WHEELS,
};
use crate::drive::{
    Drivetrain, InvalidWheelPolicy, SimulatedMotor, VelocityMotor, WheelMagnitudes, WheelPosition,
};
use crate::messages::{DriveCommand, DriveTelemetry, RuntimeHealth, WheelCommand};

/// Runtime settings, defaulting to the values in `config`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeOptions {
    pub loop_hz: u64,
    pub cmd_timeout: Duration,
    pub invalid_wheel_policy: InvalidWheelPolicy,
    pub enable_on_start: bool,
}

impl RuntimeOptions {
    /// Loop rate actually used, limited to 1..=1_000_000 Hz
    pub fn effective_loop_hz(&self) -> u64 {
        self.loop_hz.clamp(1, 1_000_000)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.effective_loop_hz())
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            loop_hz: LOOP_HZ,
            cmd_timeout: CMD_TIMEOUT,
            invalid_wheel_policy: DEFAULT_INVALID_WHEEL_POLICY,
            enable_on_start: true,
        }
    }
}

/// Most recent command accepted by the runtime
#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveCommand {
    Drive(DriveCommand),
    Wheel(WheelCommand),
}

pub struct Runtime<M: VelocityMotor> {
    drivetrain: Drivetrain<M>,
    options: RuntimeOptions,
    latest_cmd: Option<ActiveCommand>,
    cmd_received_at: Instant,
    health: RuntimeHealth,
}

impl<M: VelocityMotor> Runtime<M> {
    pub fn new(mut drivetrain: Drivetrain<M>, options: RuntimeOptions) -> Self {
        if options.enable_on_start {
            drivetrain.enable_all();
        }
        Self {
            drivetrain,
            options,
            latest_cmd: None,
            cmd_received_at: Instant::now(),
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    /// Process incoming whole-base command
    pub fn on_drive_command(&mut self, cmd: DriveCommand, now: Instant) {
        debug!("Received drive command: {:?}", &cmd);
        self.latest_cmd = Some(ActiveCommand::Drive(cmd));
        self.cmd_received_at = now;
    }

    /// Process incoming single-wheel command
    ///
    /// Under `InvalidWheelPolicy::Reject` an unknown wheel code is dropped
    /// here and does not feed the watchdog.
    pub fn on_wheel_command(&mut self, cmd: WheelCommand, now: Instant) {
        debug!("Received wheel command: {:?}", &cmd);
        if self.options.invalid_wheel_policy == InvalidWheelPolicy::Reject {
            if let Err(e) = WheelPosition::try_from(cmd.wheel) {
                warn!("Dropping wheel command: {}", e);
                return;
            }
        }
        self.latest_cmd = Some(ActiveCommand::Wheel(cmd));
        self.cmd_received_at = now;
    }

    /// Run one control tick: pick the command (or zero, if stale) and drive
    pub fn step(&mut self, now: Instant) -> WheelMagnitudes {
        let cmd_age = now.saturating_duration_since(self.cmd_received_at);

        match self.latest_cmd {
            Some(cmd) if cmd_age <= self.options.cmd_timeout => {
                self.health = RuntimeHealth::Ok;
                match cmd {
                    ActiveCommand::Drive(cmd) => self.drivetrain.drive(&cmd),
                    ActiveCommand::Wheel(cmd) => {
                        match self
                            .drivetrain
                            .drive_single(&cmd, self.options.invalid_wheel_policy)
                        {
                            Ok(magnitudes) => magnitudes,
                            Err(e) => {
                                warn!("Wheel command failed: {}, stopping", e);
                                self.drivetrain.stop();
                                WheelMagnitudes::zero()
                            }
                        }
                    }
                }
            }
            Some(_) => {
                // Watchdog triggered - stop the robot
                if self.health != RuntimeHealth::CmdStale {
                    warn!("Command stale ({:?} old), stopping robot", cmd_age);
                }
                self.health = RuntimeHealth::CmdStale;
                self.drivetrain.stop();
                WheelMagnitudes::zero()
            }
            None => {
                // No command ever received
                self.health = RuntimeHealth::CmdStale;
                self.drivetrain.stop();
                WheelMagnitudes::zero()
            }
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn telemetry(&self) -> DriveTelemetry {
        self.drivetrain.telemetry()
    }

    pub fn drivetrain(&self) -> &Drivetrain<M> {
        &self.drivetrain
    }
}

pub async fn run(options: RuntimeOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_drive = session.declare_subscriber(TOPIC_CMD_DRIVE).await?;
    let sub_wheel = session.declare_subscriber(TOPIC_CMD_WHEEL).await?;
    let pub_wheels = session.declare_publisher(TOPIC_WHEELS).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let drivetrain = Drivetrain::from_fn(|_| SimulatedMotor::new());
    let mut runtime = Runtime::new(drivetrain, options);
    let mut tick = interval(options.tick_period());

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout, invalid wheel policy {:?}",
        options.effective_loop_hz(),
        options.cmd_timeout.as_millis(),
        options.invalid_wheel_policy
    );
    info!("Subscribed to: {}, {}", TOPIC_CMD_DRIVE, TOPIC_CMD_WHEEL);
    info!("Publishing to: {}, {}", TOPIC_WHEELS, TOPIC_HEALTH);

    loop {
        tick.tick().await;

        // 1. Drain all pending commands (non-blocking), keep latest
        while let Ok(Some(sample)) = sub_drive.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<DriveCommand>(&payload) {
                Ok(cmd) => runtime.on_drive_command(cmd, Instant::now()),
                Err(e) => warn!("Failed to parse drive command: {}", e),
            }
        }
        while let Ok(Some(sample)) = sub_wheel.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<WheelCommand>(&payload) {
                Ok(cmd) => runtime.on_wheel_command(cmd, Instant::now()),
                Err(e) => warn!("Failed to parse wheel command: {}", e),
            }
        }

        // 2. Drive the wheels (includes watchdog logic)
        runtime.step(Instant::now());

        // 3. Publish telemetry
        let telemetry_json = serde_json::to_string(&runtime.telemetry())?;
        pub_wheels.put(telemetry_json).await?;

        // 4. Publish health
        let health_json = serde_json::to_string(&runtime.health())?;
        pub_health.put(health_json).await?;
    }
}
