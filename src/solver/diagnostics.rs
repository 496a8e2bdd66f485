use crate::state::{Grid, SimState};
use super::core::divergence_at;

/// Sum of a field over interior cells.
pub fn interior_sum(field: &[f64], grid: Grid) -> f64 {
    let mut sum = 0.0;
    for j in 1..=grid.n {
        for i in 1..=grid.n {
            sum += field[grid.idx(i, j)];
        }
    }
    sum
}

/// Sum of |u| + |v| over interior cells.
pub fn total_abs_velocity(u: &[f64], v: &[f64], grid: Grid) -> f64 {
    let mut sum = 0.0;
    for j in 1..=grid.n {
        for i in 1..=grid.n {
            let ii = grid.idx(i, j);
            sum += u[ii].abs() + v[ii].abs();
        }
    }
    sum
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <u² + v²>.
pub fn compute_kinetic_energy(u: &[f64], v: &[f64], grid: Grid) -> f64 {
    let mut sum = 0.0;
    for j in 1..=grid.n {
        for i in 1..=grid.n {
            let ii = grid.idx(i, j);
            sum += u[ii] * u[ii] + v[ii] * v[ii];
        }
    }
    let count = grid.n * grid.n;
    if count > 0 { 0.5 * sum / count as f64 } else { 0.0 }
}

/// Largest interior speed.
pub fn max_speed(u: &[f64], v: &[f64], grid: Grid) -> f64 {
    let mut max = 0.0_f64;
    for j in 1..=grid.n {
        for i in 1..=grid.n {
            let ii = grid.idx(i, j);
            max = max.max((u[ii] * u[ii] + v[ii] * v[ii]).sqrt());
        }
    }
    max
}

/// Largest |divergence| over interior cells.
pub fn max_divergence(u: &[f64], v: &[f64], grid: Grid) -> f64 {
    let mut max = 0.0_f64;
    for j in 1..=grid.n {
        for i in 1..=grid.n {
            max = max.max(divergence_at(u, v, i, j, grid).abs());
        }
    }
    max
}

/// True when no cell holds NaN or infinity.
pub fn all_finite(field: &[f64]) -> bool {
    field.iter().all(|x| x.is_finite())
}

/// Snapshot of the scalar health indicators of a cup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CupStats {
    pub total_density: f64,
    pub kinetic_energy: f64,
    pub max_speed: f64,
    pub max_divergence: f64,
}

impl CupStats {
    pub fn measure(state: &SimState) -> Self {
        let g = state.grid;
        Self {
            total_density: interior_sum(&state.d, g),
            kinetic_energy: compute_kinetic_energy(&state.u, &state.v, g),
            max_speed: max_speed(&state.u, &state.v, g),
            max_divergence: max_divergence(&state.u, &state.v, g),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_sum_ignores_ghosts() {
        let g = Grid::new(4);
        let mut f = vec![100.0; g.size()];
        for j in 1..=4 {
            for i in 1..=4 {
                f[g.idx(i, j)] = 1.0;
            }
        }
        assert_eq!(interior_sum(&f, g), 16.0);
    }

    #[test]
    fn test_kinetic_energy_zero() {
        let g = Grid::new(8);
        let u = g.alloc();
        let v = g.alloc();
        assert_eq!(compute_kinetic_energy(&u, &v, g), 0.0);
    }

    #[test]
    fn test_kinetic_energy_uniform_flow() {
        let g = Grid::new(8);
        let u = vec![1.0; g.size()];
        let v = g.alloc();
        let ke = compute_kinetic_energy(&u, &v, g);
        assert!((ke - 0.5).abs() < 1e-12, "KE should be 0.5, got {}", ke);
    }

    #[test]
    fn test_max_speed_and_abs_velocity() {
        let g = Grid::new(8);
        let mut u = g.alloc();
        let mut v = g.alloc();
        u[g.idx(3, 3)] = 3.0;
        v[g.idx(3, 3)] = -4.0;
        assert_eq!(max_speed(&u, &v, g), 5.0);
        assert_eq!(total_abs_velocity(&u, &v, g), 7.0);
    }

    #[test]
    fn test_uniform_flow_has_no_divergence() {
        let g = Grid::new(8);
        let u = vec![0.7; g.size()];
        let v = vec![-0.2; g.size()];
        assert_eq!(max_divergence(&u, &v, g), 0.0);
    }

    #[test]
    fn test_all_finite() {
        assert!(all_finite(&[0.0, 1.0, -3.5]));
        assert!(!all_finite(&[0.0, f64::NAN]));
        assert!(!all_finite(&[f64::INFINITY]));
    }
}
