use crate::solver::SolverParams;

/// Number of adjustable parameters.
const PARAM_COUNT: usize = 4;

/// Parameter panel state. The panel lives in the window title.
pub struct OverlayState {
    pub selected: usize,
}

impl OverlayState {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn navigate(&mut self, delta: isize) {
        let count = PARAM_COUNT as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(count)) as usize;
    }

    pub fn selected_def(&self) -> &'static ParamDef {
        &PARAM_DEFS[self.selected]
    }
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new()
    }
}

/// Definition of an adjustable parameter.
pub struct ParamDef {
    pub name: &'static str,
    pub desc: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub fine_step: f64,
    pub default: f64,
    pub get: fn(&SolverParams) -> f64,
    pub set: fn(&mut SolverParams, f64),
}

/// The four sliders of the cup.
pub const PARAM_DEFS: [ParamDef; PARAM_COUNT] = [
    ParamDef {
        name: "visc",
        desc: "coffee viscosity",
        min: 0.0,
        max: 0.01,
        step: 0.0005,
        fine_step: 0.00001,
        default: 0.005,
        get: |p| p.viscosity,
        set: |p, v| p.viscosity = v,
    },
    ParamDef {
        name: "diff",
        desc: "milk diffusion rate",
        min: 0.0,
        max: 0.0001,
        step: 0.000005,
        fine_step: 0.000001,
        default: 0.000001,
        get: |p| p.diffusion,
        set: |p, v| p.diffusion = v,
    },
    ParamDef {
        name: "force",
        desc: "stirring force multiplier",
        min: 1.0,
        max: 20.0,
        step: 1.0,
        fine_step: 0.5,
        default: 5.0,
        get: |p| p.force_scale,
        set: |p, v| p.force_scale = v,
    },
    ParamDef {
        name: "milk",
        desc: "milk poured per brush dab",
        min: 50.0,
        max: 1000.0,
        step: 50.0,
        fine_step: 10.0,
        default: 300.0,
        get: |p| p.density_amount,
        set: |p, v| p.density_amount = v,
    },
];

/// Adjust a parameter by delta steps (positive = increase, negative = decrease).
/// If `fine` is true, use fine_step instead of step.
/// Returns true if the value actually changed.
pub fn adjust_param(params: &mut SolverParams, selected: usize, delta: i32, fine: bool) -> bool {
    let def = &PARAM_DEFS[selected];
    let old = (def.get)(params);
    let step = if fine { def.fine_step } else { def.step };
    let new_val = (old + delta as f64 * step).clamp(def.min, def.max);
    (def.set)(params, new_val);
    (new_val - old).abs() > f64::EPSILON * def.step
}

/// Reset a parameter to its default value.
pub fn reset_param(params: &mut SolverParams, selected: usize) {
    let def = &PARAM_DEFS[selected];
    (def.set)(params, def.default);
}

/// Value formatted with as many decimals as its fine step needs.
pub fn format_value(def: &ParamDef, val: f64) -> String {
    if def.fine_step >= 0.5 {
        format!("{:.1}", val)
    } else {
        format!("{:.6}", val)
    }
}

/// One-line summary for the window title: the selected parameter is
/// bracketed and its description trails the line.
pub fn status_line(state: &OverlayState, params: &SolverParams, viz_label: &str, frame: u64) -> String {
    let mut line = format!("latte [{}] f{}", viz_label, frame);
    for (i, def) in PARAM_DEFS.iter().enumerate() {
        let val = format_value(def, (def.get)(params));
        if i == state.selected {
            line.push_str(&format!("  >{}={}<", def.name, val));
        } else {
            line.push_str(&format!("  {}={}", def.name, val));
        }
    }
    line.push_str(&format!("  ({})", state.selected_def().desc));
    line
}
