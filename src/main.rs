use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use thiserror::Error;

use latte::config::{self, Config};
use latte::cup::{Cup, CupError};
use latte::input::{Brush, Pointer};
use latte::overlay::{self, OverlayState};
use latte::renderer::{self, RenderConfig, VizMode};
use latte::solver::diagnostics::CupStats;
use latte::solver::{BoundaryConfig, CUP_RADIUS_FRAC};
use latte::state::Grid;

struct Defaults;

impl Defaults {
    const HEADLESS_FRAMES: u64 = 300;
    /// Headless stir circle radius as a fraction of the canvas.
    const STIR_RADIUS: f64 = 0.2;
    /// Frames per headless stir revolution.
    const STIR_PERIOD: f64 = 60.0;
    const LOG_EVERY: u64 = 10;
}

const USAGE: &str = "usage: latte [--headless] [--frames <n>] [--seed <u32>]";

#[derive(Debug, Error)]
enum AppError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid value `{value}` for {flag}")]
    BadValue { flag: &'static str, value: String },
    #[error("unknown argument `{0}`")]
    UnknownArg(String),
    #[error(transparent)]
    Cup(#[from] CupError),
    #[error("cup went non-finite at frame {0}")]
    NonFinite(u64),
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

#[derive(Debug, PartialEq)]
struct Args {
    headless: bool,
    frames: u64,
    seed: Option<u32>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args, AppError> {
    let mut parsed = Args { headless: false, frames: Defaults::HEADLESS_FRAMES, seed: None };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--headless" => parsed.headless = true,
            "--frames" => parsed.frames = parse_value(&mut it, "--frames")?,
            "--seed" => parsed.seed = Some(parse_value(&mut it, "--seed")?),
            _ => return Err(AppError::UnknownArg(arg)),
        }
    }
    Ok(parsed)
}

fn parse_value<T: std::str::FromStr>(
    it: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<T, AppError> {
    let value = it.next().ok_or(AppError::MissingValue(flag))?;
    value.parse().map_err(|_| AppError::BadValue { flag, value })
}

fn build_cup(cfg: &Config, seed: Option<u32>) -> Result<Cup, AppError> {
    let cup = Cup::try_new(cfg.grid.n, cfg.solver_params(), seed)?;
    let frac = cfg.grid.cup_radius_frac;
    let frac = if frac.is_finite() && frac > 0.0 && frac <= 0.5 {
        frac
    } else {
        log::warn!("cup_radius_frac {frac} out of (0, 0.5]; using {CUP_RADIUS_FRAC}");
        CUP_RADIUS_FRAC
    };
    Ok(cup.with_boundary(BoundaryConfig::cup_with_frac(Grid::new(cfg.grid.n), frac)))
}

fn install_ctrlc() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }
    running
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let cfg = config::load();
    let result = build_cup(&cfg, args.seed.or(cfg.seed)).and_then(|cup| {
        log::info!(
            "latte: {}x{} cup, {} mode",
            cup.grid().n,
            cup.grid().n,
            if args.headless { "headless" } else { "window" }
        );
        if args.headless {
            run_headless(cup, &cfg, args.frames)
        } else {
            run_gui(cup, &cfg)
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_gui(mut cup: Cup, cfg: &Config) -> Result<(), AppError> {
    let render_cfg = RenderConfig::new(cfg.display.width, cfg.display.height);
    let (w, h) = (render_cfg.width, render_cfg.height);
    let steps_per_frame = cfg.display.steps_per_frame.max(1);
    let brush = Brush::new(cfg.brush.radius);

    let mut window = Window::new("latte", w, h, WindowOptions::default())?;
    window.set_target_fps(cfg.display.target_fps);

    let running = install_ctrlc();

    let mut overlay_state = OverlayState::new();
    let mut viz_mode = VizMode::Latte;
    let mut pointer = Pointer::default();

    let mut framebuf: Vec<u32> = Vec::with_capacity(w * h);
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut display_fps = 0u32;
    let mut last_fps_time = Instant::now();
    let mut title_dirty = true;

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }

        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            overlay_state.navigate(-1);
            title_dirty = true;
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            overlay_state.navigate(1);
            title_dirty = true;
        }

        // Left/Right: normal step, Comma/Period: fine step
        let adjustments = [
            (Key::Left, -1, false),
            (Key::Right, 1, false),
            (Key::Comma, -1, true),
            (Key::Period, 1, true),
        ];
        for (key, delta, fine) in adjustments {
            if window.is_key_pressed(key, KeyRepeat::Yes)
                && overlay::adjust_param(cup.params_mut(), overlay_state.selected, delta, fine)
            {
                title_dirty = true;
            }
        }

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            overlay::reset_param(cup.params_mut(), overlay_state.selected);
            title_dirty = true;
        }

        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            cup.reset(None);
            title_dirty = true;
        }

        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            viz_mode = viz_mode.next();
            title_dirty = true;
        }

        // --- Pointer: pour and stir while the left button is held ---
        let pos = window.get_mouse_pos(MouseMode::Discard);
        match pos {
            Some((mx, my)) if window.get_mouse_down(MouseButton::Left) => {
                let (mx, my) = (mx as f64, my as f64);
                if !pointer.down {
                    pointer.press(mx, my);
                } else if (mx, my) != (pointer.x, pointer.y) {
                    pointer.move_to(mx, my);
                    brush.stroke(&mut cup, &pointer, w, h);
                }
            }
            _ => pointer.release(),
        }

        for _ in 0..steps_per_frame {
            cup.advance_frame();
        }

        renderer::render_into(&mut rgba_buf, &cup, &render_cfg, viz_mode);
        renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            display_fps = frame_count;
            frame_count = 0;
            last_fps_time = now;
            title_dirty = true;
        }
        if title_dirty {
            let status = overlay::status_line(&overlay_state, cup.params(), viz_mode.label(), cup.frame());
            window.set_title(&format!("{status}  {display_fps} fps"));
            title_dirty = false;
        }
    }

    log::info!("window closed after {} frames", cup.frame());
    Ok(())
}

/// Canvas position of the headless stirrer at `frame`: a circle around the
/// canvas centre, one revolution every `STIR_PERIOD` frames.
fn stir_point(frame: u64, width: usize, height: usize) -> (f64, f64) {
    let theta = frame as f64 * std::f64::consts::TAU / Defaults::STIR_PERIOD;
    let r = Defaults::STIR_RADIUS * width.min(height) as f64;
    (
        width as f64 / 2.0 + r * theta.cos(),
        height as f64 / 2.0 + r * theta.sin(),
    )
}

/// Stir the cup for `frames` frames (or until `running` drops), returning
/// the final diagnostics.
fn run_frames(
    cup: &mut Cup,
    brush: &Brush,
    canvas: &RenderConfig,
    frames: u64,
    running: &AtomicBool,
) -> Result<CupStats, AppError> {
    let mut pointer = Pointer::default();
    let (x0, y0) = stir_point(0, canvas.width, canvas.height);
    pointer.press(x0, y0);

    for frame in 1..=frames {
        if !running.load(Ordering::SeqCst) {
            log::info!("interrupted at frame {frame}");
            break;
        }
        let (x, y) = stir_point(frame, canvas.width, canvas.height);
        pointer.move_to(x, y);
        brush.stroke(cup, &pointer, canvas.width, canvas.height);
        cup.advance_frame();

        if !cup.is_finite() {
            return Err(AppError::NonFinite(cup.frame()));
        }
        if frame % Defaults::LOG_EVERY == 0 {
            let s = cup.stats();
            log::debug!(
                "frame {:>5}  milk={:.3e}  ke={:.3e}  vmax={:.3}  div={:.2e}",
                cup.frame(), s.total_density, s.kinetic_energy, s.max_speed, s.max_divergence,
            );
        }
    }
    Ok(cup.stats())
}

fn run_headless(mut cup: Cup, cfg: &Config, frames: u64) -> Result<(), AppError> {
    let canvas = RenderConfig::new(cfg.display.width, cfg.display.height);
    let brush = Brush::new(cfg.brush.radius);
    let running = install_ctrlc();

    let start = Instant::now();
    let stats = run_frames(&mut cup, &brush, &canvas, frames, &running)?;
    let elapsed = start.elapsed();

    log::info!("headless run finished in {:.2?}", elapsed);
    println!(
        "frames={} milk={:.3} ke={:.4e} vmax={:.4} div={:.3e} fps={:.1}",
        cup.frame(),
        stats.total_density,
        stats.kinetic_energy,
        stats.max_speed,
        stats.max_divergence,
        cup.frame() as f64 / elapsed.as_secs_f64().max(1e-9),
    );
    Ok(())
}
