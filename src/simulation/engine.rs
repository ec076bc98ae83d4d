//! High-level runtime engine settings
//!
//! Selects the time integrator used when running a `Scenario`

use crate::configuration::config::IntegratorConfig;

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // verlet or leapfrog
}
