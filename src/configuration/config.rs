//! Configuration types for loading recoil scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – engine options (integrator choice)
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`CentralConfig`]    – the central black hole
//! - [`DiskConfig`]       – the disk of massless test particles
//! - [`KickConfig`]       – the recoil velocity applied at frame 1
//! - [`OutputConfig`]     – frames, paths, rendering and export switches
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   integrator: "verlet"    # or "leapfrog"
//!
//! parameters:
//!   h0: 2.5                 # step size (yr/2pi)
//!   post_kick_h: null       # optional step size change at the kick
//!   seed: 42                # deterministic seed, null -> entropy
//!   eps2: 0.0               # softening epsilon^2
//!   G: 1.0                  # gravitational constant
//!
//! central:
//!   m: 1.7e8                # black hole mass (solar masses)
//!   radius: 0.0
//!
//! disk:
//!   n_particles: 1500
//!   a_min: 3.3              # semi-major axis range (AU)
//!   a_max: 8.0
//!
//! kick:
//!   vx: 0.0                 # recoil velocity (code units, 1 = 29.79 km/s)
//!   vy: 0.0
//!   vz: 50.0
//!
//! output:
//!   frames: 10
//!   directory: "out"
//!   archive: "archive.bin"
//!   render_frames: true
//!   export_csv: true
//!   merged_csv: true
//!   color_by_velocity: true
//! ```
//!
//! The engine then maps this configuration into its internal runtime scenario
//! representation via `Scenario::build_scenario`.

use serde::Deserialize;

/// Which integrator method is used by the engine
/// integrator: "verlet" or integrator: "leapfrog"
#[derive(Deserialize, Debug, Clone)]
pub enum IntegratorConfig {
    #[serde(rename = "verlet")] // Velocity Verlet, two force evaluations per step
    Verlet,

    #[serde(rename = "leapfrog")] // Drift-kick-drift leapfrog, one force evaluation per step
    Leapfrog,
}

/// High-level engine configuration
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig, // Time integrator used for advancing the system state
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64,                  // time step size
    pub post_kick_h: Option<f64>, // step size after the kick fires, None keeps h0
    pub seed: Option<u64>,        // deterministic seed, None -> non-reproducible draws
    pub eps2: f64,                // softening - prevent singular forces at very small separations
    #[serde(rename = "G")]
    pub g: f64,                   // gravitational constant
}

/// Configuration for the central black hole
#[derive(Deserialize, Debug)]
pub struct CentralConfig {
    pub m: f64,      // Mass of the black hole in solar masses
    pub radius: f64, // Radius, only contributes to softening
}

/// Configuration for the test-particle disk
#[derive(Deserialize, Debug)]
pub struct DiskConfig {
    pub n_particles: usize, // Number of massless test particles
    pub a_min: f64,         // Smallest initial semi-major axis
    pub a_max: f64,         // Largest initial semi-major axis
}

/// Recoil velocity applied to the central body at frame 1, in code units
#[derive(Deserialize, Debug, Clone)]
pub struct KickConfig {
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

/// Output options: frame count, paths, and per-stage switches
#[derive(Deserialize, Debug)]
pub struct OutputConfig {
    pub frames: usize,                  // Number of output frames (one image + one snapshot each)
    pub directory: String,              // Output directory for images, archive and CSVs
    pub archive: String,                // Archive file name inside `directory`
    pub render_frames: Option<bool>,    // Write per-frame images, default true
    pub export_csv: Option<bool>,       // Run the archive exporter after the drive loop, default true
    pub merged_csv: Option<bool>,       // Also write the merged THE.csv, default true
    pub color_by_velocity: Option<bool>, // Color scatter points by out-of-plane velocity, default true
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // Engine-level configuration (integrator)
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub central: CentralConfig,       // Central black hole
    pub disk: DiskConfig,             // Test-particle disk
    pub kick: KickConfig,             // Recoil kick vector
    pub output: OutputConfig,         // Frames, paths, rendering/export switches
}
