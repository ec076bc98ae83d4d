//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size (and the optional post-kick step size),
//! - softening and gravitational constant (`eps2`, `G`),
//! - optional random seed
//!
//! Code units: distances in AU, time in yr/2π, masses in solar masses,
//! G = 1.

/// One code-unit velocity (AU per yr/2π) in km/s.
pub const KMS_PER_CODE_VELOCITY: f64 = 29.7858905;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64, // step size
    pub post_kick_h: Option<f64>, // step size after the kick, if different
    pub seed: Option<u64>, // deterministic seed, None = entropy
    pub eps2: f64, // softening
    pub g: f64, // gravitational constant
}
