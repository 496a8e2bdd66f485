use thiserror::Error;

use crate::solver::{self, diagnostics, BoundaryConfig, SolverParams};
use crate::solver::diagnostics::CupStats;
use crate::state::{Grid, SimState, Xor128, N};

/// Smallest grid the cup accepts; below this the wall swallows the interior.
pub const MIN_GRID: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum CupError {
    #[error("grid resolution {0} is too small (minimum {min})", min = MIN_GRID)]
    GridTooSmall(usize),
    #[error("parameter `{0}` must be finite and non-negative")]
    InvalidParam(&'static str),
}

/// A cup of coffee: the simulation state plus everything needed to advance it.
///
/// Input collaborators only ever write forcing through `inject_*`; renderers
/// only read through `read_*`.
pub struct Cup {
    state: SimState,
    params: SolverParams,
    bc: BoundaryConfig,
    rng: Xor128,
    frame: u64,
    reported_non_finite: bool,
}

impl Cup {
    /// Default 128x128 cup with default parameters and a clock-seeded tint.
    pub fn new() -> Self {
        Self::with_grid(Grid::new(N), SolverParams::default(), None)
    }

    /// Validate inputs and build a cup of `n` x `n` interior cells.
    pub fn try_new(n: usize, params: SolverParams, seed: Option<u32>) -> Result<Self, CupError> {
        if n < MIN_GRID {
            return Err(CupError::GridTooSmall(n));
        }
        check_params(&params)?;
        Ok(Self::with_grid(Grid::new(n), params, seed))
    }

    fn with_grid(grid: Grid, params: SolverParams, seed: Option<u32>) -> Self {
        let mut rng = seed.map(Xor128::new).unwrap_or_else(Xor128::from_clock);
        let state = SimState::new(grid, &mut rng);
        Self {
            state,
            params,
            bc: BoundaryConfig::cup(grid),
            rng,
            frame: 0,
            reported_non_finite: false,
        }
    }

    /// Replace the cup wall (e.g. a different radius, or a square box).
    pub fn with_boundary(mut self, bc: BoundaryConfig) -> Self {
        self.bc = bc;
        self
    }

    pub fn grid(&self) -> Grid {
        self.state.grid
    }

    pub fn boundary(&self) -> &BoundaryConfig {
        &self.bc
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// Mutable access for live tuning; values are not validated.
    pub fn params_mut(&mut self) -> &mut SolverParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: SolverParams) -> Result<(), CupError> {
        check_params(&params)?;
        self.params = params;
        Ok(())
    }

    /// Frames advanced since construction or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Add a velocity impulse at interior cell (i, j), scaled by `force_scale`.
    /// Cells outside `1..=n` are ignored.
    pub fn inject_force(&mut self, i: i32, j: i32, du: f64, dv: f64) {
        let grid = self.state.grid;
        if !grid.is_interior(i, j) {
            return;
        }
        let ii = grid.idx(i as usize, j as usize);
        self.state.u_src[ii] += du * self.params.force_scale;
        self.state.v_src[ii] += dv * self.params.force_scale;
    }

    /// Add milk at interior cell (i, j). Cells outside `1..=n` are ignored.
    pub fn inject_density(&mut self, i: i32, j: i32, amount: f64) {
        let grid = self.state.grid;
        if !grid.is_interior(i, j) {
            return;
        }
        self.state.d_src[grid.idx(i as usize, j as usize)] += amount;
    }

    /// Run one simulated frame with the current parameters.
    pub fn advance_frame(&mut self) {
        solver::advance_frame(&mut self.state, &self.params, &self.bc);
        self.frame += 1;

        let finite = self.is_finite();
        if !finite && !self.reported_non_finite {
            log::error!(
                "non-finite value in cup after frame {} (viscosity={}, force_scale={})",
                self.frame, self.params.viscosity, self.params.force_scale,
            );
            self.reported_non_finite = true;
        }
        debug_assert!(finite, "non-finite value in cup after frame {}", self.frame);
    }

    pub fn read_density(&self, i: usize, j: usize) -> f64 {
        self.state.d[self.state.grid.idx(i, j)]
    }

    pub fn read_tint(&self, i: usize, j: usize) -> f64 {
        self.state.coffee[self.state.grid.idx(i, j)]
    }

    pub fn read_velocity(&self, i: usize, j: usize) -> (f64, f64) {
        let ii = self.state.grid.idx(i, j);
        (self.state.u[ii], self.state.v[ii])
    }

    /// Empty the cup and pour fresh coffee. A seed makes the tint repeatable.
    pub fn reset(&mut self, seed: Option<u32>) {
        if let Some(seed) = seed {
            self.rng = Xor128::new(seed);
        }
        self.state.reset(&mut self.rng);
        self.frame = 0;
        self.reported_non_finite = false;
        log::info!("cup reset (seed={:?})", seed);
    }

    pub fn is_finite(&self) -> bool {
        [&self.state.u, &self.state.v, &self.state.d]
            .into_iter()
            .all(|f| diagnostics::all_finite(f))
    }

    pub fn stats(&self) -> CupStats {
        CupStats::measure(&self.state)
    }

    /// Read-only view of every buffer, for renderers and diagnostics.
    pub fn state(&self) -> &SimState {
        &self.state
    }
}

impl Default for Cup {
    fn default() -> Self {
        Self::new()
    }
}

fn check_params(params: &SolverParams) -> Result<(), CupError> {
    match params.invalid_field() {
        Some(name) => Err(CupError::InvalidParam(name)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::diagnostics::{interior_sum, total_abs_velocity};
    use crate::state::TINT_MAX;

    fn small_cup() -> Cup {
        Cup::try_new(8, SolverParams::default(), Some(1)).unwrap()
    }

    fn sources(cup: &Cup) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let s = cup.state();
        (s.u_src.clone(), s.v_src.clone(), s.d_src.clone())
    }

    #[test]
    fn test_try_new_rejects_tiny_grid() {
        let err = Cup::try_new(2, SolverParams::default(), None).err();
        assert_eq!(err, Some(CupError::GridTooSmall(2)));
    }

    #[test]
    fn test_try_new_rejects_bad_params() {
        let params = SolverParams { diffusion: -1.0, ..SolverParams::default() };
        let err = Cup::try_new(16, params, None).err();
        assert_eq!(err, Some(CupError::InvalidParam("diffusion")));
    }

    #[test]
    fn test_set_params_keeps_old_on_error() {
        let mut cup = small_cup();
        let bad = SolverParams { dt: f64::INFINITY, ..SolverParams::default() };
        assert!(cup.set_params(bad).is_err());
        assert_eq!(cup.params().dt, 0.1);
    }

    #[test]
    fn test_default_cup_dimensions() {
        let cup = Cup::new();
        assert_eq!(cup.grid().n, 128);
        assert_eq!(cup.boundary(), &BoundaryConfig::Cup { radius: 0.45 * 128.0 });
    }

    #[test]
    fn test_inject_force_scales_by_force_scale() {
        let mut cup = small_cup();
        cup.inject_force(4, 5, 1.0, -2.0);
        let g = cup.grid();
        assert_eq!(cup.state().u_src[g.idx(4, 5)], 5.0);
        assert_eq!(cup.state().v_src[g.idx(4, 5)], -10.0);
    }

    #[test]
    fn test_inject_accumulates() {
        let mut cup = small_cup();
        cup.inject_density(3, 3, 10.0);
        cup.inject_density(3, 3, 15.0);
        assert_eq!(cup.state().d_src[cup.grid().idx(3, 3)], 25.0);
    }

    #[test]
    fn test_injection_out_of_range_is_noop() {
        let mut cup = small_cup();
        let before = sources(&cup);
        for (i, j) in [(0, 4), (9, 4), (4, 0), (4, 9), (-1, -1), (100, 3), (i32::MIN, i32::MAX)] {
            cup.inject_force(i, j, 1.0, 1.0);
            cup.inject_density(i, j, 50.0);
        }
        assert_eq!(sources(&cup), before);
    }

    #[test]
    fn test_injection_does_not_touch_current_fields() {
        let mut cup = small_cup();
        cup.inject_force(4, 4, 1.0, 1.0);
        cup.inject_density(4, 4, 1.0);
        assert!(cup.state().u.iter().all(|&x| x == 0.0));
        assert!(cup.state().d.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reset_zeroes_and_retints() {
        let mut cup = small_cup();
        cup.inject_density(4, 4, 100.0);
        cup.inject_force(4, 4, 2.0, 0.0);
        cup.advance_frame();
        let old_tint = cup.state().coffee.clone();

        cup.reset(Some(77));

        let s = cup.state();
        for f in [&s.u, &s.v, &s.u_src, &s.v_src, &s.d, &s.d_src] {
            assert!(f.iter().all(|&x| x == 0.0));
        }
        assert!(s.coffee.iter().all(|&c| (0.0..TINT_MAX).contains(&c)));
        assert_ne!(s.coffee, old_tint);
        assert_eq!(cup.frame(), 0);
    }

    #[test]
    fn test_reset_with_seed_is_repeatable() {
        let mut a = small_cup();
        let mut b = Cup::try_new(8, SolverParams::default(), Some(999)).unwrap();
        a.reset(Some(5));
        b.reset(Some(5));
        assert_eq!(a.state().coffee, b.state().coffee);
        assert_eq!(a.read_tint(4, 4), b.read_tint(4, 4));
    }

    #[test]
    fn test_end_to_end_pour_and_settle() {
        let mut cup = small_cup();
        cup.inject_density(4, 4, 100.0);
        cup.advance_frame();

        let centre = cup.read_density(4, 4);
        assert!(centre > 0.0, "milk should appear where it was poured");
        let n = cup.grid().n;
        for j in 1..=n {
            for i in 1..=n {
                let cheb = (i as i64 - 4).abs().max((j as i64 - 4).abs());
                if cheb >= 3 {
                    assert!(
                        centre > cup.read_density(i, j),
                        "({},{}) should hold less milk than the pour point",
                        i, j
                    );
                }
            }
        }

        let g = cup.grid();
        let mass_after_first = interior_sum(&cup.state().d, g);
        for _ in 0..50 {
            cup.advance_frame();
        }
        let mass_after = interior_sum(&cup.state().d, g);
        let decay_only = mass_after_first * cup.params().density_decay.powi(50);

        assert!(
            (mass_after - decay_only).abs() <= 0.01 * decay_only,
            "milk should only fade by the density decay: {} -> {} (expected ~{})",
            mass_after_first, mass_after, decay_only
        );
        assert!(mass_after > 0.95 * mass_after_first);
        assert_eq!(cup.frame(), 51);
    }

    #[test]
    fn test_stirred_motion_dies_out() {
        let mut cup = small_cup();
        cup.inject_density(4, 4, 100.0);
        cup.inject_force(4, 4, 1.0, 0.5);
        cup.advance_frame();

        let g = cup.grid();
        let mut peak = total_abs_velocity(&cup.state().u, &cup.state().v, g);
        assert!(peak > 0.0, "the push should start the fluid moving");
        for _ in 0..200 {
            cup.advance_frame();
            let s = cup.state();
            peak = peak.max(total_abs_velocity(&s.u, &s.v, g));
        }
        let last = total_abs_velocity(&cup.state().u, &cup.state().v, g);
        assert!(last < 0.01 * peak, "motion should settle: peak={}, last={}", peak, last);
        assert!(cup.read_density(4, 4) > 0.0);
    }

    #[test]
    fn test_stirring_moves_milk() {
        let mut cup = Cup::try_new(32, SolverParams::default(), Some(3)).unwrap();
        cup.inject_density(16, 16, 300.0);
        cup.advance_frame();
        let before = cup.read_density(20, 16);
        for _ in 0..5 {
            for j in 14..=18 {
                cup.inject_force(14, j, 2.0, 0.0);
            }
            cup.advance_frame();
        }
        let s = cup.stats();
        assert!(s.max_speed > 0.0);
        assert!(cup.read_density(20, 16) > before, "rightward push should carry milk to the right");
        assert!(cup.is_finite());
    }
}
