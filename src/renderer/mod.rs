mod color;

// Re-export public API
pub use color::{latte_rgba, map_to_rgba};

use color::BACKGROUND;
use crate::cup::Cup;
use crate::solver::{diagnostics, BoundaryConfig, CUP_RADIUS_FRAC};

/// What the cup shows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VizMode {
    /// Coffee with milk: density blended over the tint.
    Latte,
    /// Flow speed on the crema palette.
    Speed,
}

impl VizMode {
    /// Cycle to the next visualization mode.
    pub fn next(self) -> Self {
        match self {
            VizMode::Latte => VizMode::Speed,
            VizMode::Speed => VizMode::Latte,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VizMode::Latte => "latte",
            VizMode::Speed => "speed",
        }
    }
}

/// Canvas size in pixels. The grid is stretched over the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
}

impl RenderConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width: width.max(1), height: height.max(1) }
    }

    /// Horizontal scale: canvas pixels per grid cell.
    pub fn scale_x(&self, n: usize) -> f64 {
        self.width as f64 / n as f64
    }

    /// Vertical scale: canvas pixels per grid cell.
    pub fn scale_y(&self, n: usize) -> f64 {
        self.height as f64 / n as f64
    }

    /// Whether a pixel lies on the canvas's inscribed circle.
    fn in_rim(&self, x: usize, y: usize) -> bool {
        let dx = x as f64 - self.width as f64 / 2.0;
        let dy = y as f64 - self.height as f64 / 2.0;
        let r = self.width.min(self.height) as f64 / 2.0;
        dx * dx + dy * dy <= r * r
    }
}

/// Render the cup into a pre-allocated RGBA buffer.
/// The buffer is resized as needed and every pixel is written.
pub fn render_into(buf: &mut Vec<u8>, cup: &Cup, cfg: &RenderConfig, viz_mode: VizMode) {
    let grid = cup.grid();
    let n = grid.n;
    let w = cfg.width;
    let h = cfg.height;

    buf.resize(w * h * 4, 0);
    for px in buf.chunks_exact_mut(4) {
        px.copy_from_slice(&BACKGROUND);
    }

    let bc = cup.boundary();
    let radius = match bc {
        BoundaryConfig::Cup { radius } => *radius,
        BoundaryConfig::Box => CUP_RADIUS_FRAC * n as f64,
    };
    let peak_speed = if viz_mode == VizMode::Speed {
        let s = cup.state();
        diagnostics::max_speed(&s.u, &s.v, grid)
    } else {
        0.0
    };

    // Colour per cell first, then splat onto pixels.
    let mut cells: Vec<Option<[u8; 4]>> = vec![None; n * n];
    for j in 1..=n {
        for i in 1..=n {
            if bc.is_outside(grid, i, j) {
                continue;
            }
            let rgba = match viz_mode {
                VizMode::Latte => {
                    let rim = (grid.dist_from_center(i, j) / radius).min(1.0);
                    latte_rgba(cup.read_density(i, j), cup.read_tint(i, j), rim)
                }
                VizMode::Speed => {
                    let (u, v) = cup.read_velocity(i, j);
                    let t = if peak_speed > 0.0 { (u * u + v * v).sqrt() / peak_speed } else { 0.0 };
                    map_to_rgba(t.powf(0.5))
                }
            };
            cells[(i - 1) + n * (j - 1)] = Some(rgba);
        }
    }

    let sx = cfg.scale_x(n);
    let sy = cfg.scale_y(n);
    for y in 0..h {
        let cj = ((y as f64 / sy) as usize).min(n - 1);
        for x in 0..w {
            if !cfg.in_rim(x, y) {
                continue;
            }
            let ci = ((x as f64 / sx) as usize).min(n - 1);
            if let Some(rgba) = cells[ci + n * cj] {
                let offset = (y * w + x) * 4;
                buf[offset..offset + 4].copy_from_slice(&rgba);
            }
        }
    }
}

/// Render the cup to a new RGBA buffer (test convenience wrapper).
#[cfg(test)]
pub fn render(cup: &Cup, cfg: &RenderConfig, viz_mode: VizMode) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, cup, cfg, viz_mode);
    buf
}

/// Pack RGBA bytes into the 0RGB words a framebuffer window expects.
pub fn rgba_to_argb(rgba: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        rgba.chunks_exact(4)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32),
    );
}
