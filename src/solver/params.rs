/// Solver parameters for the coffee cup.
///
/// Every field may be changed between frames; the next `advance_frame` picks
/// the new values up.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Kinematic viscosity of the velocity field.
    pub viscosity: f64,
    /// Molecular diffusion rate of the milk density.
    pub diffusion: f64,
    pub dt: f64,
    /// Gauss-Seidel sweeps per relaxation.
    pub relax_iter: usize,
    /// Multiplier applied to velocity deltas when they are injected.
    pub force_scale: f64,
    /// Density a full-strength brush dab deposits.
    pub density_amount: f64,
    /// Per-frame multiplier applied to `u` and `v`.
    pub velocity_decay: f64,
    /// Per-frame multiplier applied to the milk density.
    pub density_decay: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            viscosity: 0.005,
            diffusion: 0.000001,
            dt: 0.1,
            relax_iter: 20,
            force_scale: 5.0,
            density_amount: 300.0,
            velocity_decay: 0.97,
            density_decay: 0.9995,
        }
    }
}

impl SolverParams {
    /// Name of the first parameter that is negative or non-finite, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let checks = [
            ("viscosity", self.viscosity),
            ("diffusion", self.diffusion),
            ("dt", self.dt),
            ("force_scale", self.force_scale),
            ("density_amount", self.density_amount),
            ("velocity_decay", self.velocity_decay),
            ("density_decay", self.density_decay),
        ];
        checks
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
            .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = SolverParams::default();
        assert_eq!(params.viscosity, 0.005);
        assert_eq!(params.diffusion, 0.000001);
        assert_eq!(params.dt, 0.1);
        assert_eq!(params.relax_iter, 20);
        assert_eq!(params.force_scale, 5.0);
        assert_eq!(params.density_amount, 300.0);
        assert_eq!(params.velocity_decay, 0.97);
        assert_eq!(params.density_decay, 0.9995);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SolverParams::default().invalid_field(), None);
    }

    #[test]
    fn test_negative_viscosity_rejected() {
        let params = SolverParams { viscosity: -0.1, ..SolverParams::default() };
        assert_eq!(params.invalid_field(), Some("viscosity"));
    }

    #[test]
    fn test_nan_force_rejected() {
        let params = SolverParams { force_scale: f64::NAN, ..SolverParams::default() };
        assert_eq!(params.invalid_field(), Some("force_scale"));
    }
}
