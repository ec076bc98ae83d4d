use std::time::Instant;
use crate::simulation::states::{Body, System, NVec3};
use crate::simulation::params::Parameters;
use crate::simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
use crate::simulation::integrator::{verlet_integrator, leapfrog_integrator};

/// Helper to build a central body plus `n - 1` massless test bodies
fn make_system(n: usize) -> System {
    let mut bodies = Vec::with_capacity(n);

    bodies.push(Body {
        x: NVec3::zeros(),
        v: NVec3::zeros(),
        m: 1.0e6,
        radius: 0.0,
    });

    for i in 1..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );

        bodies.push(Body {
            x,
            v: NVec3::zeros(),
            m: 0.0,
            radius: 0.0,
        });
    }

    System { bodies, t: 0.0 }
}

fn make_params() -> Parameters {
    Parameters {
        h0: 0.001,
        post_kick_h: None,
        seed: Some(42),
        eps2: 1e-4,
        g: 1.0,
    }
}

/// Time one force evaluation of the massive-source gravity kernel for a
/// range of disk sizes. Scaling should be linear in N with a single
/// massive body.
pub fn bench_gravity() {
    let ns = [200, 400, 800, 1600, 3200, 6400, 12800];

    for n in ns {
        let sys = make_system(n);
        let params = make_params();

        let gravity = NewtonianGravity {
            g: params.g,
            eps2: params.eps2,
        };

        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        gravity.acceleration(0.0, &sys, &mut out);

        let t0 = Instant::now();
        gravity.acceleration(0.0, &sys, &mut out);
        let dt = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, gravity eval = {dt:8.6} s");
    }
}

/// Time one step of each integrator for a range of disk sizes
pub fn bench_step() {
    let ns = [200, 400, 800, 1600, 3200, 6400, 12800];
    let steps = 5; // steps to average over

    for n in ns {
        let sys_template = make_system(n);

        // Verlet (two force evaluations per step)
        let mut sys_verlet = sys_template.clone();
        let mut params_verlet = make_params();
        let mut forces_verlet = AccelSet::new().with(NewtonianGravity {
            g: params_verlet.g,
            eps2: params_verlet.eps2,
        });

        // Warm-up
        verlet_integrator(&mut sys_verlet, &mut forces_verlet, &mut params_verlet);

        let t0 = Instant::now();
        for _ in 0..steps {
            verlet_integrator(&mut sys_verlet, &mut forces_verlet, &mut params_verlet);
        }
        let verlet_per_step = t0.elapsed().as_secs_f64() / steps as f64;

        // Leapfrog (one force evaluation per step)
        let mut sys_leap = sys_template.clone();
        let mut params_leap = make_params();
        let mut forces_leap = AccelSet::new().with(NewtonianGravity {
            g: params_leap.g,
            eps2: params_leap.eps2,
        });

        // Warm-up
        leapfrog_integrator(&mut sys_leap, &mut forces_leap, &mut params_leap);

        let t1 = Instant::now();
        for _ in 0..steps {
            leapfrog_integrator(&mut sys_leap, &mut forces_leap, &mut params_leap);
        }
        let leap_per_step = t1.elapsed().as_secs_f64() / steps as f64;

        println!(
            "N = {:5}, verlet step = {:8.6} s,   leapfrog step = {:8.6} s",
            n, verlet_per_step, leap_per_step
        );
    }
}
