use crate::state::Grid;

/// Cup wall radius as a fraction of the interior resolution.
pub const CUP_RADIUS_FRAC: f64 = 0.45;

/// Factor applied to scalar fields outside the cup wall on every pass.
pub const WALL_ABSORPTION: f64 = 0.5;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar,
    Vx,
    Vy,
}

/// Boundary configuration for the vessel shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryConfig {
    /// Square container: ghost-cell mirroring only.
    Box,
    /// Round cup of `radius` cells centred on the grid.
    Cup { radius: f64 },
}

impl BoundaryConfig {
    /// Round cup with the standard `0.45 * n` radius.
    pub fn cup(grid: Grid) -> Self {
        Self::cup_with_frac(grid, CUP_RADIUS_FRAC)
    }

    pub fn cup_with_frac(grid: Grid, frac: f64) -> Self {
        BoundaryConfig::Cup { radius: frac * grid.n as f64 }
    }

    /// Whether interior cell (i, j) lies beyond the cup wall.
    pub fn is_outside(&self, grid: Grid, i: usize, j: usize) -> bool {
        match self {
            BoundaryConfig::Box => false,
            BoundaryConfig::Cup { radius } => grid.dist_from_center(i, j) > *radius,
        }
    }
}

/// Boundary condition handler.
///
/// Ghost cells mirror the interior as it was handed in, then the cup wall is
/// applied to the interior, then the corners are averaged. After every call:
///   - `FieldType::Vx`: edge ghosts negated at left/right, copied at top/bottom
///   - `FieldType::Vy`: edge ghosts negated at top/bottom, copied at left/right
///   - `FieldType::Scalar`: edge ghosts copied (Neumann) at all edges
///   - corners hold the mean of their two edge neighbours
///
/// Edge ghosts therefore see the pre-wall values of their neighbours. Under a
/// cup the wall cells are masked after mirroring, so the relation holds
/// against the input rather than the output interior.
pub fn set_bnd(field_type: FieldType, x: &mut [f64], bc: &BoundaryConfig, grid: Grid) {
    mirror_edges(field_type, x, grid);
    if let BoundaryConfig::Cup { .. } = bc {
        apply_cup_wall(field_type, x, bc, grid);
    }
    average_corners(x, grid);
}

/// No-slip wall for velocity, partial absorption for scalars.
fn apply_cup_wall(field_type: FieldType, x: &mut [f64], bc: &BoundaryConfig, grid: Grid) {
    let n = grid.n;
    for j in 1..=n {
        for i in 1..=n {
            if !bc.is_outside(grid, i, j) {
                continue;
            }
            let ii = grid.idx(i, j);
            match field_type {
                FieldType::Vx | FieldType::Vy => x[ii] = 0.0,
                FieldType::Scalar => x[ii] *= WALL_ABSORPTION,
            }
        }
    }
}

fn mirror_edges(field_type: FieldType, x: &mut [f64], grid: Grid) {
    let n = grid.n;
    let flip_x = if field_type == FieldType::Vx { -1.0 } else { 1.0 };
    let flip_y = if field_type == FieldType::Vy { -1.0 } else { 1.0 };

    for k in 1..=n {
        x[grid.idx(0, k)] = flip_x * x[grid.idx(1, k)];
        x[grid.idx(n + 1, k)] = flip_x * x[grid.idx(n, k)];
        x[grid.idx(k, 0)] = flip_y * x[grid.idx(k, 1)];
        x[grid.idx(k, n + 1)] = flip_y * x[grid.idx(k, n)];
    }
}

fn average_corners(x: &mut [f64], grid: Grid) {
    let n = grid.n;
    x[grid.idx(0, 0)] = 0.5 * (x[grid.idx(1, 0)] + x[grid.idx(0, 1)]);
    x[grid.idx(0, n + 1)] = 0.5 * (x[grid.idx(1, n + 1)] + x[grid.idx(0, n)]);
    x[grid.idx(n + 1, 0)] = 0.5 * (x[grid.idx(n, 0)] + x[grid.idx(n + 1, 1)]);
    x[grid.idx(n + 1, n + 1)] = 0.5 * (x[grid.idx(n, n + 1)] + x[grid.idx(n + 1, n)]);
}
