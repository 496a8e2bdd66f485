use crate::state::Grid;
use super::boundary::{BoundaryConfig, FieldType, set_bnd};

/// Gauss-Seidel iterative linear solver.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
///
/// Runs exactly `iter` in-place sweeps with no convergence test; boundaries
/// are re-enforced after every sweep so edge stencils see fresh ghost values.
pub fn lin_solve(field_type: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, bc: &BoundaryConfig, grid: Grid) {
    let c_inv = 1.0 / c;
    let n = grid.n;
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let neighbors = x[grid.idx(i - 1, j)]
                    + x[grid.idx(i + 1, j)]
                    + x[grid.idx(i, j - 1)]
                    + x[grid.idx(i, j + 1)];
                let ii = grid.idx(i, j);
                x[ii] = (x0[ii] + a * neighbors) * c_inv;
            }
        }
        set_bnd(field_type, x, bc, grid);
    }
}

/// Diffusion step: spreads the field over time.
/// a = dt * diff * N^2, c = 1 + 4a
///
/// Whatever `x` holds on entry is the initial guess for the relaxation.
pub fn diffuse(field_type: FieldType, x: &mut [f64], x0: &[f64], diff: f64, dt: f64, iter: usize, bc: &BoundaryConfig, grid: Grid) {
    let n = grid.n as f64;
    let a = dt * diff * n * n;
    let c = 1.0 + 4.0 * a;
    lin_solve(field_type, x, x0, a, c, iter, bc, grid);
}

/// Semi-Lagrangian advection: traces particles backwards through velocity field.
pub fn advect(field_type: FieldType, d: &mut [f64], d0: &[f64], vx: &[f64], vy: &[f64], dt: f64, bc: &BoundaryConfig, grid: Grid) {
    let n = grid.n;
    let dt0 = dt * n as f64;
    let lo = 0.5;
    let hi = n as f64 + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx(i, j);
            // Trace backwards, staying inside the interpolation stencil
            let x = (i as f64 - dt0 * vx[ii]).clamp(lo, hi);
            let y = (j as f64 - dt0 * vy[ii]).clamp(lo, hi);

            let i0 = x.floor() as usize;
            let i1 = i0 + 1;
            let j0 = y.floor() as usize;
            let j1 = j0 + 1;
            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[grid.idx(i0, j0)] + t1 * d0[grid.idx(i0, j1)])
                + s1 * (t0 * d0[grid.idx(i1, j0)] + t1 * d0[grid.idx(i1, j1)]);
        }
    }
    set_bnd(field_type, d, bc, grid);
}

/// Discrete divergence at interior cell (i, j), scaled like the `div` buffer
/// built inside [`project`] (which stores its negation).
#[inline]
pub fn divergence_at(vx: &[f64], vy: &[f64], i: usize, j: usize, grid: Grid) -> f64 {
    0.5 / grid.n as f64
        * (vx[grid.idx(i + 1, j)] - vx[grid.idx(i - 1, j)]
            + vy[grid.idx(i, j + 1)] - vy[grid.idx(i, j - 1)])
}

/// Pressure projection: enforces incompressibility (divergence-free velocity field).
///
/// `p` and `div` are scratch; their prior contents are discarded.
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, bc: &BoundaryConfig, grid: Grid) {
    let n = grid.n;
    let h = 1.0 / n as f64;

    // Calculate divergence
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx(i, j);
            div[ii] = -0.5
                * h
                * (vx[grid.idx(i + 1, j)] - vx[grid.idx(i - 1, j)]
                    + vy[grid.idx(i, j + 1)] - vy[grid.idx(i, j - 1)]);
            p[ii] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, bc, grid);
    set_bnd(FieldType::Scalar, p, bc, grid);

    // Solve for pressure
    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0, iter, bc, grid);

    // Subtract pressure gradient from velocity
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx(i, j);
            vx[ii] -= 0.5 * (p[grid.idx(i + 1, j)] - p[grid.idx(i - 1, j)]) / h;
            vy[ii] -= 0.5 * (p[grid.idx(i, j + 1)] - p[grid.idx(i, j - 1)]) / h;
        }
    }
    set_bnd(FieldType::Vx, vx, bc, grid);
    set_bnd(FieldType::Vy, vy, bc, grid);
}
