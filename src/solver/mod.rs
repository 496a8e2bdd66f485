mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{BoundaryConfig, FieldType, CUP_RADIUS_FRAC, WALL_ABSORPTION, set_bnd};
pub use self::core::{advect, diffuse, divergence_at, lin_solve, project};
pub use params::SolverParams;

use crate::state::{scale, Grid, SimState};

/// Advance the velocity field by one step.
///
/// Buffer roles change between sub-steps and the order matters:
///   1. forcing in `u_src`/`v_src` is added to `u`/`v`
///   2. `u`/`v` are diffused *into* `u_src`/`v_src`, which from here on hold
///      the previous-state scratch rather than forcing
///   3. the scratch pair is projected, borrowing `u`/`v` as pressure and
///      divergence storage (step 4 overwrites them anyway)
///   4. `u`/`v` are advected from the scratch pair, carried by itself
///   5. `u`/`v` are projected, borrowing `u_src`/`v_src` as storage
///
/// On return `u_src`/`v_src` hold solver leftovers and must be cleared
/// before new forcing is accumulated.
#[allow(clippy::too_many_arguments)]
pub fn velocity_step(
    u: &mut [f64],
    v: &mut [f64],
    u_src: &mut [f64],
    v_src: &mut [f64],
    visc: f64,
    dt: f64,
    iter: usize,
    bc: &BoundaryConfig,
    grid: Grid,
) {
    add_source(u, u_src, dt);
    add_source(v, v_src, dt);

    diffuse(FieldType::Vx, u_src, u, visc, dt, iter, bc, grid);
    diffuse(FieldType::Vy, v_src, v, visc, dt, iter, bc, grid);

    project(u_src, v_src, u, v, iter, bc, grid);

    advect(FieldType::Vx, u, u_src, u_src, v_src, dt, bc, grid);
    advect(FieldType::Vy, v, v_src, u_src, v_src, dt, bc, grid);

    project(u, v, u_src, v_src, iter, bc, grid);
}

/// Advance a passive scalar by one step: add source, diffuse into the
/// source buffer, advect back along `(u, v)`. No projection.
#[allow(clippy::too_many_arguments)]
pub fn density_step(
    x: &mut [f64],
    x0: &mut [f64],
    u: &[f64],
    v: &[f64],
    diff: f64,
    dt: f64,
    iter: usize,
    bc: &BoundaryConfig,
    grid: Grid,
) {
    add_source(x, x0, dt);
    diffuse(FieldType::Scalar, x0, x, diff, dt, iter, bc, grid);
    advect(FieldType::Scalar, x, x0, u, v, dt, bc, grid);
}

/// One simulated frame: velocity step, density step, then the epilogue
/// (clear forcing, decay velocity fast and density slowly).
pub fn advance_frame(state: &mut SimState, params: &SolverParams, bc: &BoundaryConfig) {
    let grid = state.grid;
    let dt = params.dt;
    let iter = params.relax_iter;

    velocity_step(
        &mut state.u,
        &mut state.v,
        &mut state.u_src,
        &mut state.v_src,
        params.viscosity,
        dt,
        iter,
        bc,
        grid,
    );
    density_step(
        &mut state.d,
        &mut state.d_src,
        &state.u,
        &state.v,
        params.diffusion,
        dt,
        iter,
        bc,
        grid,
    );

    state.clear_sources();
    scale(&mut state.u, params.velocity_decay);
    scale(&mut state.v, params.velocity_decay);
    scale(&mut state.d, params.density_decay);
}

fn add_source(x: &mut [f64], s: &[f64], dt: f64) {
    for (xi, si) in x.iter_mut().zip(s) {
        *xi += dt * si;
    }
}
