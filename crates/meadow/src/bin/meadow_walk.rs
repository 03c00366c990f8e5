//! # Meadow Walk
//!
//! Headless scripted walk over the meadow. No window: draw calls go to a
//! counting renderer, and the run ends with frame and world statistics.
//!
//! ```text
//! meadow_walk [--config PATH] [--preset NAME] [--frames N] [--print-config]
//! ```
//!
//! The script walks forward the whole time, sprints in alternating
//! two-second stretches and turns slowly once the pointer is captured.

use std::process::ExitCode;

use meadow::{AppConfig, AppError, AppResult, DrawTally, FrameLoop, InputSnapshot};

/// Parsed command line.
struct Args {
    config: Option<String>,
    preset: Option<String>,
    frames: u64,
    print_config: bool,
}

fn parse_args() -> AppResult<Args> {
    let mut args = Args {
        config: None,
        preset: None,
        frames: 600,
        print_config: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| AppError::Usage(format!("{flag} needs a value")))
        };
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?),
            "--preset" => args.preset = Some(value("--preset")?),
            "--frames" => {
                let raw = value("--frames")?;
                args.frames = raw
                    .parse()
                    .map_err(|_| AppError::Usage(format!("--frames: not a number: {raw}")))?;
            }
            "--print-config" => args.print_config = true,
            other => return Err(AppError::Usage(format!("unknown argument: {other}"))),
        }
    }
    Ok(args)
}

/// Input for scripted frame `frame`.
fn scripted_input(frame: u64) -> InputSnapshot {
    InputSnapshot {
        forward: true,
        sprint: (frame / 120) % 2 == 1,
        mouse_dx: 2.0,
        capture_requested: frame == 0,
        ..InputSnapshot::default()
    }
}

fn run() -> AppResult<()> {
    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(name) = &args.preset {
        config.world = AppConfig::with_preset(name)?.world;
    }

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                        MEADOW WALK                               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("Cell size:      {}", config.world.cell_size);
    println!("Render radius:  {}", config.world.render_radius);
    println!("Draw distance:  {:.0}", config.world.draw_distance());
    println!("Frames:         {}", args.frames);
    println!();

    let mut frame_loop = FrameLoop::from_config(config)?;
    let mut tally = DrawTally::new();

    for frame in 0..args.frames {
        frame_loop.tick(&scripted_input(frame), &mut tally);
    }

    let camera = frame_loop.camera();
    let world = frame_loop.world().stats();
    frame_loop.stats().print_summary();
    println!();
    println!("┌─ WORLD ────────────────────────────────────────────────────────┐");
    println!("│ Final Position:     ({:.0}, {:.0})", camera.x, camera.z);
    println!("│ Cells Cached:       {}", world.cells_generated);
    println!("│ Objects Generated:  {}", world.objects_generated);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ DRAW CALLS ───────────────────────────────────────────────────┐");
    println!("│ Ground:             {}", tally.ground);
    println!("│ Trees:              {}", tally.trees);
    println!("│ Flowers:            {}", tally.flowers);
    println!("│ Animals:            {}", tally.animals);
    println!("│ Paths:              {}", tally.paths);
    println!("└──────────────────────────────────────────────────────────────────┘");

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("meadow_walk: {err}");
            ExitCode::FAILURE
        }
    }
}
