use std::time::Duration;

use clap::Parser;
use colored::*;

mod args;

use args::Args;
use spectrocam::camera::{CameraProperty, CameraSource, FrameSource, SyntheticSource};
use spectrocam::config::AppConfig;
use spectrocam::display::{SpectrumWindow, UiAction};
use spectrocam::{CalibrationModel, CalibrationPoint, RenderLoop, TickOutcome};

fn open_source(args: &Args, config: &AppConfig) -> anyhow::Result<Box<dyn FrameSource>> {
    if args.synthetic {
        println!("{}", "Using synthetic spectrum source (no camera)".yellow());
        return Ok(Box::new(SyntheticSource::new(640, 480)));
    }

    let mut camera = CameraSource::new(args.cam_index as usize)?;
    let startup_props = [
        (CameraProperty::Exposure, config.camera.exposure),
        (CameraProperty::Gain, config.camera.gain),
        (CameraProperty::Brightness, config.camera.brightness),
        (CameraProperty::Contrast, config.camera.contrast),
    ];
    for (prop, value) in startup_props {
        if let Some(v) = value {
            camera.set_property(prop, v);
        }
    }
    Ok(Box::new(camera))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        let cameras = nokhwa::query(nokhwa::utils::ApiBackend::Auto)?;
        println!("Available Cameras:");
        println!("{:<5} | {:<30} | {:<10}", "Index", "Name", "Misc");
        println!("{}", "-".repeat(60));
        for cam in cameras {
            println!("{:<5} | {:<30} | {:?}", cam.index(), cam.human_name(), cam.misc());
        }
        return Ok(());
    }

    // 0. Load Config
    let config = AppConfig::load()?;

    // 1. Setup Frame Source
    let mut source = open_source(&args, &config)?;
    let mut flip_h = config.defaults.flip_h;
    let mut flip_v = config.defaults.flip_v;
    source.set_flip(flip_h, flip_v);
    let (width, height) = source.dimensions();

    // 2. Setup Display
    let mut window = SpectrumWindow::new(
        "spectrocam - Pixel",
        width as usize,
        height as usize,
        config.region(),
    )?;
    println!("Window created successfully.");

    // 3. Setup Pipeline
    let mut model = CalibrationModel::default();
    let period = Duration::from_millis(args.tick_ms.unwrap_or(config.defaults.tick_ms).max(1));
    let mut render = RenderLoop::new(source, period, config.failure_cutoff());

    println!("Starting render loop...");
    println!(
        "Controls: [Arrows] Move ROI [WASD] Resize ROI [Q/E] Cursor 1 [U/O] Cursor 2 [H/V] Flip [C] Calibrate [Esc] Quit"
    );

    // 4. Loop
    while window.is_open() {
        // Operator input lands between ticks, never during one.
        for action in window.handle_input() {
            match action {
                UiAction::ToggleFlipH => {
                    flip_h = !flip_h;
                    render.source_mut().set_flip(flip_h, flip_v);
                }
                UiAction::ToggleFlipV => {
                    flip_v = !flip_v;
                    render.source_mut().set_flip(flip_h, flip_v);
                }
                UiAction::ApplyCalibration => {
                    let [c1, c2] = window.cursors();
                    let p1 = CalibrationPoint::new(c1, config.calibration.lambda1_nm);
                    let p2 = CalibrationPoint::new(c2, config.calibration.lambda2_nm);
                    match model.apply(p1, p2) {
                        Ok(fit) => println!(
                            "{}",
                            format!(
                                "Calibration applied: {:.4} nm/px, intercept {:.2} nm",
                                fit.slope, fit.intercept
                            )
                            .green()
                        ),
                        Err(e) => println!("{}", format!("Calibration rejected: {}", e).red()),
                    }
                }
                UiAction::Quit => render.stop(),
            }
        }

        match render.tick(&mut window, &model)? {
            TickOutcome::Presented => {}
            // Keep the previous curve on screen but stay responsive.
            TickOutcome::SkippedEmptyRegion | TickOutcome::SkippedAcquisition => window.idle()?,
            TickOutcome::Faulted => {
                println!("{}", "Camera unreachable; render loop faulted.".red());
                break;
            }
            TickOutcome::Stopped => break,
        }

        render.wait_for_next_tick();
    }

    Ok(())
}
