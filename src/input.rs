use crate::cup::Cup;

/// Default brush radius in grid cells.
pub const BRUSH_RADIUS: i32 = 3;

/// Largest brush radius accepted from configuration.
pub const MAX_BRUSH_RADIUS: i32 = 32;

/// Pointer (mouse / touch) state in canvas pixel coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pointer {
    pub down: bool,
    pub x: f64,
    pub y: f64,
    pub prev_x: f64,
    pub prev_y: f64,
}

impl Pointer {
    /// Button pressed: start a stroke with no drag.
    pub fn press(&mut self, x: f64, y: f64) {
        self.down = true;
        self.x = x;
        self.y = y;
        self.prev_x = x;
        self.prev_y = y;
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.prev_x = self.x;
        self.prev_y = self.y;
        self.x = x;
        self.y = y;
    }

    /// Button released or pointer left the canvas.
    pub fn release(&mut self) {
        self.down = false;
    }

    /// Pixel movement since the previous sample.
    pub fn drag(&self) -> (f64, f64) {
        (self.x - self.prev_x, self.y - self.prev_y)
    }
}

/// Round brush with linear falloff that pours milk and pushes the coffee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub radius: i32,
}

impl Default for Brush {
    fn default() -> Self {
        Self { radius: BRUSH_RADIUS }
    }
}

impl Brush {
    /// Brush of `radius` cells, clamped to `1..=MAX_BRUSH_RADIUS`.
    pub fn new(radius: i32) -> Self {
        let clamped = radius.clamp(1, MAX_BRUSH_RADIUS);
        if clamped != radius {
            log::warn!("brush radius {radius} out of range; using {clamped}");
        }
        Self { radius: clamped }
    }

    /// Map a canvas pixel to the grid cell under it (1-based interior coordinates).
    pub fn cell_at(px: f64, py: f64, canvas_w: usize, canvas_h: usize, n: usize) -> (i32, i32) {
        let i = (px / canvas_w as f64 * n as f64).floor() as i32 + 1;
        let j = (py / canvas_h as f64 * n as f64).floor() as i32 + 1;
        (i, j)
    }

    /// Apply one stroke at the pointer's position. The drag becomes force and
    /// every dab deposits `density_amount` scaled by the falloff.
    ///
    /// Returns false (and injects nothing) when the pointer is off the grid.
    pub fn stroke(&self, cup: &mut Cup, pointer: &Pointer, canvas_w: usize, canvas_h: usize) -> bool {
        let grid = cup.grid();
        let (ci, cj) = Self::cell_at(pointer.x, pointer.y, canvas_w, canvas_h, grid.n);
        if !grid.is_interior(ci, cj) {
            return false;
        }
        let (dx, dy) = pointer.drag();
        let amount = cup.params().density_amount;
        let r = self.radius;
        for di in -r..=r {
            for dj in -r..=r {
                let factor = self.falloff(di, dj);
                if factor <= 0.0 {
                    continue;
                }
                let (ni, nj) = (ci + di, cj + dj);
                cup.inject_force(ni, nj, dx * factor, dy * factor);
                cup.inject_density(ni, nj, amount * factor);
            }
        }
        true
    }

    /// Linear falloff: 1 at the centre, 0 at (and beyond) the radius.
    pub fn falloff(&self, di: i32, dj: i32) -> f64 {
        let (di, dj) = (di as f64, dj as f64);
        let dist = (di * di + dj * dj).sqrt();
        let r = self.radius as f64;
        if dist > r { 0.0 } else { 1.0 - dist / r }
    }
}
