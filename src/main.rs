use clap::Parser;
use tracing_subscriber::EnvFilter;

use meccanum_drive::config::LOOP_HZ;
use meccanum_drive::drive::InvalidWheelPolicy;
use meccanum_drive::runtime::RuntimeOptions;

/// Meccanum drive control loop (simulated motors)
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Control loop frequency in Hz
    #[arg(long, default_value_t = LOOP_HZ)]
    loop_hz: u64,

    /// Drop wheel commands with an unknown wheel code instead of driving zero
    #[arg(long)]
    reject_invalid_wheel: bool,

    /// Leave the motors disabled at startup
    #[arg(long)]
    start_disabled: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let options = RuntimeOptions {
        loop_hz: args.loop_hz,
        invalid_wheel_policy: if args.reject_invalid_wheel {
            InvalidWheelPolicy::Reject
        } else {
            InvalidWheelPolicy::FailOpen
        },
        enable_on_start: !args.start_disabled,
        ..RuntimeOptions::default()
    };

    if let Err(e) = meccanum_drive::runtime::run(options).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
