//! Build fully-initialized recoil scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with the black hole and disk at t = 0)
//! - active force set (`AccelSet`)
//! - the kick vector and resolved output options
//!
//! The disk places one massless test particle per semi-major axis on a
//! uniform grid over `[a_min, a_max]` (endpoints included), each with a
//! uniformly random true anomaly in `[0, 2π)`.

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::orbit::{cartesian_from_elements, OrbitalElements};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, System};
use crate::simulation::forces::{AccelSet, NewtonianGravity};

/// Resolved output options (config `Option`s replaced by their defaults)
#[derive(Debug, Clone)]
pub struct Output {
    pub frames: usize,           // number of output frames
    pub directory: PathBuf,      // output directory for images, archive and CSVs
    pub archive_path: PathBuf,   // archive file inside `directory`
    pub render_frames: bool,     // write per-frame images
    pub export_csv: bool,        // run the archive exporter after the drive loop
    pub merged_csv: bool,        // also write the merged THE.csv
    pub color_by_velocity: bool, // color scatter points by out-of-plane velocity
}

/// Fully-initialized runtime scenario
///
/// This is the main runtime bundle constructed from a [`ScenarioConfig`]:
/// engine settings, parameters, current system state, the set of active
/// force laws, the kick vector, and the resolved output options. It is
/// consumed by the kick driver.
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
    pub forces: AccelSet,
    pub kick: NVec3,
    pub output: Output,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            h0: p_cfg.h0,
            post_kick_h: p_cfg.post_kick_h,
            seed: p_cfg.seed,
            eps2: p_cfg.eps2,
            g: p_cfg.g,
        };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            integrator: cfg.engine.integrator,
        };

        // Central body at the origin at rest
        let mut bodies = vec![Body {
            x: NVec3::zeros(),
            v: NVec3::zeros(),
            m: cfg.central.m,
            radius: cfg.central.radius,
        }];

        // Seeded draws for the true anomalies. A null seed means each run
        // draws a fresh disk.
        let mut rng = match parameters.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        // Test particles: one per semi-major axis on the uniform grid
        let gm = parameters.g * cfg.central.m;
        for a in linspace(cfg.disk.a_min, cfg.disk.a_max, cfg.disk.n_particles) {
            let f = rng.gen::<f64>() * 2.0 * PI;
            let (x, v) = cartesian_from_elements(gm, &OrbitalElements::circular(a, f))
                .with_context(|| format!("placing test particle at a = {a}"))?;
            bodies.push(Body {
                x,
                v,
                m: 0.0,
                radius: 0.0,
            });
        }

        // Initial system state: bodies at t = 0
        let system = System {
            bodies,
            t: 0.0,
        };

        // Forces: construct an AccelSet and register Newtonian gravity
        let forces = AccelSet::new().with(NewtonianGravity {
            g: parameters.g,
            eps2: parameters.eps2,
        });

        // Kick vector from config, code units
        let kick = NVec3::new(cfg.kick.vx, cfg.kick.vy, cfg.kick.vz);

        // Output options with config defaults resolved
        let o_cfg = cfg.output;
        let directory = PathBuf::from(&o_cfg.directory);
        let archive_path = directory.join(&o_cfg.archive);
        let output = Output {
            frames: o_cfg.frames,
            directory,
            archive_path,
            render_frames: o_cfg.render_frames.unwrap_or(true),
            export_csv: o_cfg.export_csv.unwrap_or(true),
            merged_csv: o_cfg.merged_csv.unwrap_or(true),
            color_by_velocity: o_cfg.color_by_velocity.unwrap_or(true),
        };

        Ok(Self {
            engine,
            parameters,
            system,
            forces,
            kick,
            output,
        })
    }
}

/// `n` uniformly spaced values over `[start, stop]`, endpoints included
/// (matching `np.linspace`). A single point lands on `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
