/// Default interior resolution (cells per side).
pub const N: usize = 128;

/// Upper bound (exclusive) of the random coffee tint per cell.
pub const TINT_MAX: f64 = 20.0;

/// Square grid of `n` x `n` interior cells wrapped in a one-cell ghost border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub n: usize,
}

impl Grid {
    pub const fn new(n: usize) -> Self {
        Self { n }
    }

    /// Row stride of the backing array, including both ghost columns.
    #[inline(always)]
    pub const fn stride(self) -> usize {
        self.n + 2
    }

    /// Number of cells in one field, ghosts included.
    pub const fn size(self) -> usize {
        self.stride() * self.stride()
    }

    /// Linear index of cell (i, j); both coordinates must lie in `0..=n+1`.
    #[inline(always)]
    pub const fn idx(self, i: usize, j: usize) -> usize {
        i + self.stride() * j
    }

    /// Allocate a zeroed field.
    pub fn alloc(self) -> Vec<f64> {
        vec![0.0; self.size()]
    }

    /// Whether signed coordinates name an interior (non-ghost) cell.
    pub fn is_interior(self, i: i32, j: i32) -> bool {
        let n = self.n as i32;
        i >= 1 && i <= n && j >= 1 && j <= n
    }

    /// Geometric centre used by the cup wall.
    pub fn center(self) -> f64 {
        self.stride() as f64 / 2.0
    }

    /// Distance of cell (i, j) from the grid centre.
    pub fn dist_from_center(self, i: usize, j: usize) -> f64 {
        let c = self.center();
        let dx = i as f64 - c;
        let dy = j as f64 - c;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(N)
    }
}

/// Multiply every cell of a field by `k`.
pub fn scale(field: &mut [f64], k: f64) {
    for x in field.iter_mut() {
        *x *= k;
    }
}

pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xor128 {
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: seed.wrapping_mul(1812433253).wrapping_add(1),
            z: seed.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: seed.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3),
        }
    }

    /// Seed from the wall clock; used when no explicit seed is supplied.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(42);
        Self::new(nanos)
    }

    pub fn next(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Returns a float in [0.0, 1.0).
    pub fn next_unit(&mut self) -> f64 {
        self.next() as f64 / (u32::MAX as f64 + 1.0)
    }
}

/// Every field buffer of the cup, all sized by the same [`Grid`].
///
/// `u_src`, `v_src` and `d_src` collect external forcing between frames.
/// During a step the solver also reuses them as the "previous" scratch state,
/// so their contents are only meaningful as forcing until `advance_frame` runs.
pub struct SimState {
    pub grid: Grid,
    /// Horizontal velocity.
    pub u: Vec<f64>,
    /// Vertical velocity.
    pub v: Vec<f64>,
    pub u_src: Vec<f64>,
    pub v_src: Vec<f64>,
    /// Milk density.
    pub d: Vec<f64>,
    pub d_src: Vec<f64>,
    /// Static coffee tint in [0, TINT_MAX).
    pub coffee: Vec<f64>,
}

impl SimState {
    pub fn new(grid: Grid, rng: &mut Xor128) -> Self {
        let mut state = Self {
            grid,
            u: grid.alloc(),
            v: grid.alloc(),
            u_src: grid.alloc(),
            v_src: grid.alloc(),
            d: grid.alloc(),
            d_src: grid.alloc(),
            coffee: grid.alloc(),
        };
        state.randomize_tint(rng);
        state
    }

    /// Zero every dynamic field and draw a fresh tint, keeping allocations.
    pub fn reset(&mut self, rng: &mut Xor128) {
        for field in [
            &mut self.u,
            &mut self.v,
            &mut self.u_src,
            &mut self.v_src,
            &mut self.d,
            &mut self.d_src,
        ] {
            field.fill(0.0);
        }
        self.randomize_tint(rng);
    }

    fn randomize_tint(&mut self, rng: &mut Xor128) {
        for c in self.coffee.iter_mut() {
            *c = rng.next_unit() * TINT_MAX;
        }
    }

    /// Clear the per-frame forcing accumulators.
    pub fn clear_sources(&mut self) {
        self.u_src.fill(0.0);
        self.v_src.fill(0.0);
        self.d_src.fill(0.0);
    }
}
