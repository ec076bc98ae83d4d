//! Drive loop for the recoil simulation
//!
//! Sequences the engine through a fixed number of output frames:
//! - frame 0 renders the initial disk, then advances one step and archives
//!   the result,
//! - the kick fires exactly once, at the boundary between frame 0 and
//!   frame 1: shift into the central-body frame, overwrite the central
//!   velocity with the kick vector, and optionally switch the step size,
//! - every later frame advances one step, recenters on the central body,
//!   archives the snapshot, and renders it.
//!
//! Any render or archive failure aborts the run.

use std::fs;

use anyhow::{Context, Result};

use crate::archive::archive::{ArchiveWriter, Snapshot};
use crate::configuration::config::IntegratorConfig;
use crate::simulation::integrator::{leapfrog_integrator, verlet_integrator};
use crate::simulation::params::{Parameters, KMS_PER_CODE_VELOCITY};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{NVec3, System};
use crate::visualization::frame_plot::{render_frame, FrameStyle};

/// Which side of the kick the drive loop is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickPhase {
    PreKick,
    PostKick,
}

/// The one-time velocity kick applied to the central body.
#[derive(Debug, Clone)]
pub struct KickEvent {
    pub dv: NVec3, // recoil velocity, code units
}

impl KickEvent {
    /// Apply the kick: move into the central-body rest frame, overwrite the
    /// central velocity with the kick vector, and switch to the post-kick
    /// step size when one is configured. Positions are untouched.
    pub fn apply(&self, sys: &mut System, params: &mut Parameters) {
        sys.move_to_central_frame();
        if let Some(b0) = sys.bodies.first_mut() {
            b0.v = self.dv;
        }
        if let Some(h) = params.post_kick_h {
            params.h0 = h;
        }
    }
}

/// Run the simulation phase: integrate, kick once, archive every frame,
/// render every frame.
pub fn run_driver(scenario: &mut Scenario) -> Result<()> {
    let out = scenario.output.clone();
    fs::create_dir_all(&out.directory)
        .with_context(|| format!("creating output directory {}", out.directory.display()))?;

    let kick = KickEvent { dv: scenario.kick };
    log_parameters(scenario, &kick);

    let style = FrameStyle {
        kick: kick.dv,
        color_by_velocity: out.color_by_velocity,
    };

    let mut archive = ArchiveWriter::create(&out.archive_path)?;
    let mut phase = KickPhase::PreKick;

    for frame in 0..out.frames {
        if frame == 0 {
            // The first image shows the untouched disk; the first archive
            // record is the state after one pre-kick step.
            let snap = Snapshot::from_system(&scenario.system);
            if out.render_frames {
                render_frame(&snap, frame, &out.directory, &style)?;
            }
            advance(scenario);
            archive.append(&Snapshot::from_system(&scenario.system))?;
            continue;
        }

        if phase == KickPhase::PreKick {
            kick.apply(&mut scenario.system, &mut scenario.parameters);
            phase = KickPhase::PostKick;
            log::info!(
                "kick applied at t = {}: central velocity set to ({}, {}, {})",
                scenario.system.t,
                kick.dv.x,
                kick.dv.y,
                kick.dv.z
            );
        }

        advance(scenario);
        scenario.system.recenter_on_central();

        let snap = Snapshot::from_system(&scenario.system);
        archive.append(&snap)?;
        if out.render_frames {
            render_frame(&snap, frame, &out.directory, &style)?;
        }
    }

    Ok(())
}

/// Advance the system by one step with the configured integrator.
fn advance(scenario: &mut Scenario) {
    // Split &mut Scenario into &mut fields in one destructuring step
    let Scenario {
        system,
        parameters,
        forces,
        engine,
        ..
    } = scenario;

    match engine.integrator {
        IntegratorConfig::Verlet => verlet_integrator(system, forces, parameters),
        IntegratorConfig::Leapfrog => leapfrog_integrator(system, forces, parameters),
    }
}

/// Echo the run parameters, kick velocity converted to km/s.
fn log_parameters(scenario: &Scenario, kick: &KickEvent) {
    log::info!("recoil x velocity in km/s: {}", kick.dv.x * KMS_PER_CODE_VELOCITY);
    log::info!("recoil y velocity in km/s: {}", kick.dv.y * KMS_PER_CODE_VELOCITY);
    log::info!("recoil z velocity in km/s: {}", kick.dv.z * KMS_PER_CODE_VELOCITY);
    log::info!("black hole mass: {}", scenario.system.central().m);
    log::info!("number of test particles: {}", scenario.system.bodies.len() - 1);
    match scenario.parameters.seed {
        Some(s) => log::info!("random seed: {s}"),
        None => log::info!("random seed: none (non-reproducible run)"),
    }
    log::info!("number of frames to generate: {}", scenario.output.frames);
}
