//! pick: on-screen color picker.
//!
//! `--mode=0` (default) runs a picker session: a floating preview follows
//! the cursor and the confirmed center color is printed to stdout as
//! `#RRGGBB`. Other modes are diagnostics around the platform layer:
//! `--mode=1` probes the screen-capture permission, `--mode=2` runs the
//! permission grant flow, `--mode=3` runs self tests (`--what=`,
//! `--time=`).

mod grid;
mod host;

use host::PickerHost;
use pick_core::{
    arg_value, reporter, CaptureRegion, CursorTracker, PickerConfig, PixelBuffer, Point,
    ScreenSampler, Session, WindowExclusionSet,
};
use pick_platform::{SystemCursor, SystemSampler};
use std::process::ExitCode;
use tracing::{error, info, warn};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pick=info".into()),
        )
        .try_init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode: i32 = arg_value(&args, "--mode=").unwrap_or(0);

    match mode {
        0 => run_picker(&args),
        1 => run_permission_probe(),
        2 => run_permission_prompt(),
        3 => run_self_test(&args),
        other => {
            warn!(mode = other, "unrecognized mode, nothing to do");
            ExitCode::SUCCESS
        }
    }
}

fn run_picker(args: &[String]) -> ExitCode {
    pick_platform::set_dpi_aware();

    if !pick_platform::screen_capture_allowed() {
        warn!("screen capture permission not granted, captures will fail until it is");
    }

    let config = PickerConfig::from_args(args);
    let session = match Session::new(config.clone()) {
        Ok(session) => session,
        Err(error) => {
            error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        refresh_frequency = config.refresh_frequency,
        capture_ratio = config.capture_ratio,
        bound_width = config.bound_width,
        bound_height = config.bound_height,
        scale_factor = pick_platform::get_primary_scale_factor(),
        "starting picker session"
    );

    let mut window = match PickerHost::new(&config) {
        Ok(window) => window,
        Err(error) => {
            error!(%error, "host window creation failed");
            return ExitCode::FAILURE;
        }
    };
    let mut cursor = SystemCursor::new();
    let mut sampler = SystemSampler::new();

    match pick_core::run_session(session, &mut cursor, &mut sampler, &mut window) {
        Some(color) => println!("{color}"),
        None => info!("session cancelled, no color reported"),
    }
    ExitCode::SUCCESS
}

fn run_permission_probe() -> ExitCode {
    let granted = pick_platform::screen_capture_allowed();
    println!(
        "Screen Record Permission Granted: {}",
        if granted { "YES" } else { "NO" }
    );
    ExitCode::SUCCESS
}

fn run_permission_prompt() -> ExitCode {
    let granted = pick_platform::request_screen_capture_access();

    // A throwaway capture makes the OS register the request immediately.
    let mut probe = PixelBuffer::new(4, 4);
    let region = CaptureRegion::centered(Point::new(100, 100), 4, 4);
    let captured =
        SystemSampler::new().capture(&region, &WindowExclusionSet::new(), &mut probe);
    info!(captured, "permission prompt probe capture");

    println!(
        "Screen Record Permission Granted: {}",
        if granted { "YES" } else { "NO" }
    );
    ExitCode::SUCCESS
}

fn run_self_test(args: &[String]) -> ExitCode {
    let iterations: u32 = arg_value(args, "--time=").unwrap_or(1);
    let what: i32 = arg_value(args, "--what=").unwrap_or(0);

    match what {
        1 => {
            let mut sampler = SystemSampler::new();
            let excluded = WindowExclusionSet::new();
            let mut buffer = PixelBuffer::new(4, 4);
            let region = CaptureRegion::centered(Point::new(200, 200), 4, 4);
            for index in 0..iterations {
                let ok = sampler.capture(&region, &excluded, &mut buffer);
                info!(
                    index,
                    ok,
                    color = %reporter::center_color(&buffer),
                    "self-test capture"
                );
            }
        }
        2 => {
            let mut cursor = SystemCursor::new();
            for index in 0..iterations {
                let position = cursor.position();
                info!(index, x = position.x, y = position.y, "self-test cursor poll");
            }
        }
        _ => {}
    }
    ExitCode::SUCCESS
}
