use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::solver::SolverParams;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "latte.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub grid: GridConfig,
    pub display: DisplayConfig,
    pub brush: BrushConfig,
    /// Fixed seed for the coffee tint; random when absent.
    pub seed: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub viscosity: f64,
    pub diffusion: f64,
    pub dt: f64,
    pub relax_iter: usize,
    pub force: f64,
    pub density_amount: f64,
    pub velocity_decay: f64,
    pub density_decay: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub n: usize,
    pub cup_radius_frac: f64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    pub radius: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            grid: GridConfig::default(),
            display: DisplayConfig::default(),
            brush: BrushConfig::default(),
            seed: None,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            viscosity: p.viscosity,
            diffusion: p.diffusion,
            dt: p.dt,
            relax_iter: p.relax_iter,
            force: p.force_scale,
            density_amount: p.density_amount,
            velocity_decay: p.velocity_decay,
            density_decay: p.density_decay,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n: crate::state::N,
            cup_radius_frac: crate::solver::CUP_RADIUS_FRAC,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            target_fps: 60,
            steps_per_frame: 1,
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { radius: crate::input::BRUSH_RADIUS }
    }
}

impl Config {
    pub fn solver_params(&self) -> SolverParams {
        let p = &self.physics;
        SolverParams {
            viscosity: p.viscosity,
            diffusion: p.diffusion,
            dt: p.dt,
            relax_iter: p.relax_iter,
            force_scale: p.force,
            density_amount: p.density_amount,
            velocity_decay: p.velocity_decay,
            density_decay: p.density_decay,
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `latte.yaml`, falling back to defaults when it is absent or broken.
pub fn load() -> Config {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        log::info!("no {CONFIG_FILE} found; using defaults");
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => {
            log::info!("loaded {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_yaml(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("latte-{}-{}.yaml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.physics.viscosity, 0.005);
        assert_eq!(cfg.physics.diffusion, 0.000001);
        assert_eq!(cfg.physics.dt, 0.1);
        assert_eq!(cfg.physics.relax_iter, 20);
        assert_eq!(cfg.physics.force, 5.0);
        assert_eq!(cfg.physics.density_amount, 300.0);
        assert_eq!(cfg.physics.velocity_decay, 0.97);
        assert_eq!(cfg.physics.density_decay, 0.9995);
        assert_eq!(cfg.grid.n, 128);
        assert_eq!(cfg.grid.cup_radius_frac, 0.45);
        assert_eq!(cfg.display.width, 512);
        assert_eq!(cfg.display.height, 512);
        assert_eq!(cfg.display.target_fps, 60);
        assert_eq!(cfg.display.steps_per_frame, 1);
        assert_eq!(cfg.brush.radius, 3);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_defaults_round_trip_to_solver_params() {
        assert_eq!(Config::default().solver_params(), SolverParams::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "physics:\n  viscosity: 0.001\nseed: 7\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.physics.viscosity, 0.001);
        assert_eq!(cfg.physics.diffusion, 0.000001); // default
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.display.width, 512); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
physics:
  viscosity: 0.002
  diffusion: 0.00001
  dt: 0.05
  relax_iter: 30
  force: 8.0
  density_amount: 500.0
  velocity_decay: 0.95
  density_decay: 0.999
grid:
  n: 64
  cup_radius_frac: 0.4
display:
  width: 640
  height: 640
  target_fps: 30
  steps_per_frame: 2
brush:
  radius: 5
seed: 1234
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.physics.viscosity, 0.002);
        assert_eq!(cfg.physics.diffusion, 0.00001);
        assert_eq!(cfg.physics.dt, 0.05);
        assert_eq!(cfg.physics.relax_iter, 30);
        assert_eq!(cfg.grid.n, 64);
        assert_eq!(cfg.grid.cup_radius_frac, 0.4);
        assert_eq!(cfg.display.target_fps, 30);
        assert_eq!(cfg.display.steps_per_frame, 2);
        assert_eq!(cfg.brush.radius, 5);
        assert_eq!(cfg.seed, Some(1234));

        let p = cfg.solver_params();
        assert_eq!(p.force_scale, 8.0);
        assert_eq!(p.density_amount, 500.0);
        assert_eq!(p.velocity_decay, 0.95);
        assert_eq!(p.density_decay, 0.999);
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_yaml("ok", "grid:\n  n: 32\n");
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.grid.n, 32);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("latte-definitely-missing.yaml");
        assert!(matches!(load_from(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_bad_yaml_is_parse_error() {
        let path = temp_yaml("bad", "physics: [not, a, map\n");
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_missing_file() {
        // When no latte.yaml exists, load() should return defaults
        let cfg = load();
        assert_eq!(cfg.physics.viscosity, 0.005);
        assert_eq!(cfg.grid.n, 128);
    }
}
