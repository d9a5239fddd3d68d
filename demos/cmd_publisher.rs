// Scripted command publisher: holds one drive (or single-wheel) command for a
// while, then sends a stop
//
// Usage: cargo run --example cmd_publisher -- --forward 0.3 --seconds 2
//        cargo run --example cmd_publisher -- --wheel 2 --forward 0.5
use clap::Parser;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use meccanum_drive::config::{LOOP_HZ, TOPIC_CMD_DRIVE, TOPIC_CMD_WHEEL};
use meccanum_drive::messages::{DriveCommand, WheelCommand};

#[derive(Debug, Parser)]
#[command(about = "Publish drive commands to the meccanum runtime")]
struct Args {
    /// Forward axis, [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    forward: f64,

    /// Strafe axis (positive = right), [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    strafe: f64,

    /// Clockwise rotation axis, [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    clockwise: f64,

    /// Drive only this wheel code (1 = front right .. 4 = back right)
    #[arg(long, allow_negative_numbers = true)]
    wheel: Option<i64>,

    /// How long to hold the command
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    /// Publish rate; keep it above the runtime's watchdog rate
    #[arg(long, default_value_t = LOOP_HZ)]
    hz: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_drive = session.declare_publisher(TOPIC_CMD_DRIVE).await?;
    let pub_wheel = session.declare_publisher(TOPIC_CMD_WHEEL).await?;

    let payload = match args.wheel {
        Some(wheel) => serde_json::to_string(&WheelCommand {
            wheel,
            forward: args.forward,
            strafe: args.strafe,
            clockwise: args.clockwise,
        })?,
        None => serde_json::to_string(&DriveCommand::new(
            args.forward,
            args.strafe,
            args.clockwise,
        ))?,
    };
    let publisher = if args.wheel.is_some() {
        &pub_wheel
    } else {
        &pub_drive
    };

    let hold = Duration::from_secs_f64(args.seconds.max(0.0).min(3600.0));
    let mut tick = interval(Duration::from_micros(1_000_000 / args.hz.clamp(1, 1_000_000)));
    info!("Publishing {} for {:?}", payload, hold);

    let started = Instant::now();
    while started.elapsed() < hold {
        tick.tick().await;
        publisher.put(payload.clone()).await?;
    }

    // Don't rely on the watchdog to stop the base
    let stop = serde_json::to_string(&DriveCommand::stop())?;
    pub_drive.put(stop).await?;
    info!("Sent stop");

    Ok(())
}
