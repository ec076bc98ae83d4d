use recoilsim::simulation::states::{Body, NVec3, System};
use recoilsim::simulation::params::Parameters;
use recoilsim::simulation::forces::{AccelSet, NewtonianGravity};
use recoilsim::simulation::orbit::{cartesian_from_elements, OrbitalElements};
use recoilsim::simulation::scenario::{linspace, Scenario};
use recoilsim::configuration::config::{
    CentralConfig, DiskConfig, EngineConfig, IntegratorConfig, KickConfig, OutputConfig,
    ParametersConfig, ScenarioConfig,
};
use recoilsim::archive::archive::{ArchiveReader, ArchiveWriter, Snapshot};
use recoilsim::driver::driver::{run_driver, KickEvent};
use recoilsim::export::export::{export_archive, write_merged_table, AxisTables};
use recoilsim::verlet_integrator;

use std::fs;
use std::path::PathBuf;

/// Build a central body plus a few massless test bodies on the x-axis
pub fn disk_system(n_test: usize, m_central: f64) -> System {
    let mut bodies = vec![Body {
        x: [0.0, 0.0, 0.0].into(),
        v: [0.0, 0.0, 0.0].into(),
        m: m_central,
        radius: 0.0,
    }];
    for i in 0..n_test {
        bodies.push(Body {
            x: [2.0 + i as f64, 0.0, 0.0].into(),
            v: [0.0, 1.0, 0.0].into(),
            m: 0.0,
            radius: 0.0,
        });
    }
    System {
        bodies,
        t: 0.0,
    }
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        h0: 0.01,
        post_kick_h: None,
        seed: Some(42),
        eps2: 0.0,
        g: 1.0,
    }
}

/// Build a gravity term + AccelSet
pub fn gravity_set(p: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity {
        g: p.g,
        eps2: p.eps2,
    })
}

/// A small scenario config for driver tests
pub fn test_config(seed: Option<u64>, n_particles: usize, out_name: &str) -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            integrator: IntegratorConfig::Verlet,
        },
        parameters: ParametersConfig {
            h0: 0.1,
            post_kick_h: None,
            seed,
            eps2: 0.0,
            g: 1.0,
        },
        central: CentralConfig {
            m: 1.7e8,
            radius: 0.0,
        },
        disk: DiskConfig {
            n_particles,
            a_min: 3.3,
            a_max: 8.0,
        },
        kick: KickConfig {
            vx: 0.0,
            vy: 0.0,
            vz: 50.0,
        },
        output: OutputConfig {
            frames: 4,
            directory: temp_dir(out_name).to_string_lossy().into_owned(),
            archive: "archive.bin".to_string(),
            render_frames: Some(false),
            export_csv: Some(false),
            merged_csv: Some(false),
            color_by_velocity: Some(false),
        },
    }
}

/// Unique-ish scratch directory per test
fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("recoilsim_test_{}_{}", std::process::id(), name))
}

fn read_csv(path: &std::path::Path) -> Vec<Vec<f64>> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
        .lines()
        .map(|line| {
            line.split(',')
                .map(|f| f.parse::<f64>().expect("numeric CSV field"))
                .collect()
        })
        .collect()
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_pulls_test_particle_toward_central() {
    let sys = disk_system(1, 1.0e6);
    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    let toward_central = sys.bodies[0].x - sys.bodies[1].x;
    assert!(
        acc[1].dot(&toward_central) > 0.0,
        "Test particle not pulled toward the central body"
    );
}

#[test]
fn gravity_massless_disk_exerts_nothing() {
    let sys = disk_system(5, 1.0e6);
    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc = vec![NVec3::zeros(); 6];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    // Massless particles are not sources, so the central body coasts
    assert_eq!(acc[0], NVec3::zeros(), "Central body accelerated by massless disk");
}

#[test]
fn gravity_inverse_square_law() {
    let mut sys_r = disk_system(1, 1.0e6);
    sys_r.bodies[1].x = [1.0, 0.0, 0.0].into();
    let mut sys_2r = disk_system(1, 1.0e6);
    sys_2r.bodies[1].x = [2.0, 0.0, 0.0].into();

    let p = test_params();
    let forces = gravity_set(&p);

    let mut acc_r = vec![NVec3::zeros(); 2];
    let mut acc_2r = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(sys_r.t, &sys_r, &mut acc_r);
    forces.accumulate_accels(sys_2r.t, &sys_2r, &mut acc_2r);

    let ratio = acc_r[1].norm() / acc_2r[1].norm();
    assert!((ratio - 4.0).abs() < 1e-9, "Expected ~4x, got {}", ratio);
}

#[test]
fn gravity_softening_prevents_blowup() {
    let mut p = test_params();
    p.eps2 = 0.1;

    let mut sys = disk_system(1, 1.0);
    sys.bodies[1].x = [1e-9, 0.0, 0.0].into();
    let forces = gravity_set(&p);

    let mut acc = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    assert!(acc[1].norm() < 1e9, "Softening failed; acceleration too large");
}

// ==================================================================================
// Orbit tests
// ==================================================================================

#[test]
fn circular_orbit_speed_and_radius() {
    let gm = 1.7e8;
    let a = 5.0;
    let (x, v) = cartesian_from_elements(gm, &OrbitalElements::circular(a, 1.234)).unwrap();

    assert!((x.norm() - a).abs() < 1e-9 * a, "Circular orbit radius != a");
    let v_circ = (gm / a).sqrt();
    assert!(
        (v.norm() - v_circ).abs() < 1e-9 * v_circ,
        "Circular orbit speed != sqrt(GM/a)"
    );
    assert!(
        x.dot(&v).abs() < 1e-6 * a * v_circ,
        "Circular orbit velocity not perpendicular to radius"
    );
}

#[test]
fn orbit_at_zero_anomaly_lies_on_x_axis() {
    let (x, _v) = cartesian_from_elements(1.0, &OrbitalElements::circular(3.0, 0.0)).unwrap();
    assert!((x - NVec3::new(3.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn degenerate_elements_rejected() {
    assert!(cartesian_from_elements(1.0, &OrbitalElements::circular(0.0, 0.0)).is_err());
    assert!(cartesian_from_elements(1.0, &OrbitalElements::circular(-2.0, 0.0)).is_err());

    let mut hyperbolic = OrbitalElements::circular(2.0, 0.0);
    hyperbolic.e = 1.0;
    assert!(cartesian_from_elements(1.0, &hyperbolic).is_err());
}

#[test]
fn linspace_includes_both_endpoints() {
    let grid = linspace(3.3, 8.0, 1500);
    assert_eq!(grid.len(), 1500);
    assert_eq!(grid[0], 3.3);
    assert!((grid[1499] - 8.0).abs() < 1e-12);
    assert_eq!(linspace(5.0, 9.0, 1), vec![5.0]);
    assert!(linspace(0.0, 1.0, 0).is_empty());
}

// ==================================================================================
// Frame-transform tests
// ==================================================================================

#[test]
fn move_to_com_zeroes_total_momentum() {
    let mut sys = disk_system(2, 1.0e3);
    sys.bodies[0].v = [0.5, -0.25, 1.0].into();
    sys.bodies.push(Body {
        x: [10.0, 0.0, 0.0].into(),
        v: [-1.0, 0.0, 0.0].into(),
        m: 2.0e3,
        radius: 0.0,
    });

    sys.move_to_com();

    let mut momentum = NVec3::zeros();
    for b in &sys.bodies {
        momentum += b.m * b.v;
    }
    assert!(momentum.norm() < 1e-9, "Net momentum not zero: {:?}", momentum);
}

#[test]
fn move_to_central_frame_pins_body_zero() {
    let mut sys = disk_system(3, 1.0e6);
    sys.bodies[0].x = [1.0, 2.0, 3.0].into();
    sys.bodies[0].v = [0.1, 0.2, 0.3].into();
    let rel_before = sys.bodies[2].x - sys.bodies[0].x;

    sys.move_to_central_frame();

    assert_eq!(sys.bodies[0].x, NVec3::zeros());
    assert_eq!(sys.bodies[0].v, NVec3::zeros());
    // Relative separations untouched
    assert!((sys.bodies[2].x - rel_before).norm() < 1e-12);
}

#[test]
fn recenter_on_central_leaves_velocities() {
    let mut sys = disk_system(2, 1.0e6);
    sys.bodies[0].x = [4.0, 0.0, 0.0].into();
    sys.bodies[0].v = [0.0, 0.0, 50.0].into();
    let v1_before = sys.bodies[1].v;

    sys.recenter_on_central();

    assert_eq!(sys.bodies[0].x, NVec3::zeros());
    assert_eq!(sys.bodies[0].v, NVec3::new(0.0, 0.0, 50.0));
    assert_eq!(sys.bodies[1].v, v1_before);
}

// ==================================================================================
// Scenario / initializer tests
// ==================================================================================

#[test]
fn fiducial_disk_builds_1501_bodies() {
    let scenario = Scenario::build_scenario(test_config(Some(7), 1500, "init")).unwrap();
    let sys = &scenario.system;

    assert_eq!(sys.bodies.len(), 1501);
    assert_eq!(sys.bodies[0].x, NVec3::zeros(), "Central body not at the origin");
    assert_eq!(sys.bodies[0].v, NVec3::zeros(), "Central body not at rest");
    assert_eq!(sys.bodies[0].m, 1.7e8);

    // Circular orbits: |x| = a, inside the configured disk range
    for b in &sys.bodies[1..] {
        assert_eq!(b.m, 0.0);
        let r = b.x.norm();
        assert!(
            (3.3 - 1e-9..=8.0 + 1e-9).contains(&r),
            "Particle radius {} outside the disk range",
            r
        );
    }
}

#[test]
fn seeded_disks_are_reproducible() {
    let a = Scenario::build_scenario(test_config(Some(42), 200, "seed_a")).unwrap();
    let b = Scenario::build_scenario(test_config(Some(42), 200, "seed_b")).unwrap();
    let c = Scenario::build_scenario(test_config(Some(43), 200, "seed_c")).unwrap();

    for (ba, bb) in a.system.bodies.iter().zip(b.system.bodies.iter()) {
        assert_eq!(ba.x, bb.x);
        assert_eq!(ba.v, bb.v);
    }

    let same = a
        .system
        .bodies
        .iter()
        .zip(c.system.bodies.iter())
        .all(|(ba, bc)| ba.x == bc.x);
    assert!(!same, "Different seeds produced identical disks");
}

#[test]
fn degenerate_disk_range_is_rejected() {
    let mut cfg = test_config(Some(1), 10, "degenerate");
    cfg.disk.a_min = -1.0;
    cfg.disk.a_max = 1.0;
    assert!(Scenario::build_scenario(cfg).is_err());
}

// ==================================================================================
// Kick driver tests
// ==================================================================================

#[test]
fn kick_overwrites_central_velocity_exactly() {
    let mut sys = disk_system(3, 1.0e6);
    let mut params = test_params();
    let kick = KickEvent {
        dv: [0.0, 0.0, 50.0].into(),
    };

    kick.apply(&mut sys, &mut params);

    assert_eq!(sys.bodies[0].v, NVec3::new(0.0, 0.0, 50.0));
    assert_eq!(sys.bodies[0].x, NVec3::zeros());
}

#[test]
fn kick_switches_step_size_when_configured() {
    let mut sys = disk_system(1, 1.0e6);
    let mut params = test_params();
    params.post_kick_h = Some(2.0);

    KickEvent {
        dv: [0.0, 0.0, 1.0].into(),
    }
    .apply(&mut sys, &mut params);

    assert_eq!(params.h0, 2.0);
}

#[test]
fn central_velocity_survives_integration_after_kick() {
    // The disk is massless, so nothing ever accelerates the central body
    let mut sys = disk_system(4, 1.0e6);
    let mut params = test_params();
    let mut forces = gravity_set(&params);

    KickEvent {
        dv: [0.0, 0.0, 50.0].into(),
    }
    .apply(&mut sys, &mut params);

    for _ in 0..10 {
        verlet_integrator(&mut sys, &mut forces, &mut params);
    }
    assert_eq!(sys.bodies[0].v, NVec3::new(0.0, 0.0, 50.0));
}

#[test]
fn driver_archives_one_snapshot_per_frame_with_kick_at_frame_one() {
    let cfg = test_config(Some(11), 20, "driver");
    let mut scenario = Scenario::build_scenario(cfg).unwrap();
    let archive_path = scenario.output.archive_path.clone();
    let frames = scenario.output.frames;

    run_driver(&mut scenario).unwrap();

    let snapshots = ArchiveReader::open(&archive_path).unwrap().read_all().unwrap();
    assert_eq!(snapshots.len(), frames);

    for (i, snap) in snapshots.iter().enumerate() {
        assert_eq!(snap.bodies.len(), 21);
        // Central body pinned to the origin in every archived frame
        assert_eq!(snap.bodies[0].x, NVec3::zeros(), "frame {i} central body moved");
        if i == 0 {
            assert_eq!(snap.bodies[0].v, NVec3::zeros(), "pre-kick central body not at rest");
        } else {
            assert_eq!(
                snap.bodies[0].v,
                NVec3::new(0.0, 0.0, 50.0),
                "frame {i} central velocity is not the kick vector"
            );
        }
    }

    // Snapshot times strictly increasing
    for w in snapshots.windows(2) {
        assert!(w[1].t > w[0].t);
    }
}

// ==================================================================================
// Archive tests
// ==================================================================================

#[test]
fn archive_round_trip_is_exact() {
    let dir = temp_dir("roundtrip");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("archive.bin");

    let mut sys = disk_system(3, 1.7e8);
    let mut params = test_params();
    let mut forces = gravity_set(&params);

    let mut written = Vec::new();
    {
        let mut writer = ArchiveWriter::create(&path).unwrap();
        for _ in 0..5 {
            verlet_integrator(&mut sys, &mut forces, &mut params);
            let snap = Snapshot::from_system(&sys);
            writer.append(&snap).unwrap();
            written.push(snap);
        }
    }

    let read = ArchiveReader::open(&path).unwrap().read_all().unwrap();
    assert_eq!(read, written, "Archive read-back differs from what was written");
}

#[test]
fn truncated_archive_is_an_error() {
    let dir = temp_dir("truncated");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("archive.bin");

    let sys = disk_system(2, 1.0e6);
    {
        let mut writer = ArchiveWriter::create(&path).unwrap();
        writer.append(&Snapshot::from_system(&sys)).unwrap();
        writer.append(&Snapshot::from_system(&sys)).unwrap();
    }

    let len = fs::metadata(&path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 4).unwrap();

    assert!(ArchiveReader::open(&path).unwrap().read_all().is_err());
}

// ==================================================================================
// Exporter tests
// ==================================================================================

#[test]
fn axis_tables_match_archive_values() {
    let mut sys = disk_system(3, 1.0e6);
    let mut params = test_params();
    let mut forces = gravity_set(&params);

    let mut snapshots = Vec::new();
    for _ in 0..4 {
        verlet_integrator(&mut sys, &mut forces, &mut params);
        snapshots.push(Snapshot::from_system(&sys));
    }

    let tables = AxisTables::from_snapshots(&snapshots).unwrap();
    assert_eq!(tables.n_snapshots(), 4);
    assert_eq!(tables.n_particles(), 4);

    for (s, snap) in snapshots.iter().enumerate() {
        assert_eq!(tables.times[s], snap.t);
        for (p, b) in snap.bodies.iter().enumerate().skip(1) {
            assert_eq!(tables.x[s][p], b.x.x);
            assert_eq!(tables.y[s][p], b.x.y);
            assert_eq!(tables.z[s][p], b.x.z);
            assert_eq!(tables.vx[s][p], b.v.x);
            assert_eq!(tables.vy[s][p], b.v.y);
            assert_eq!(tables.vz[s][p], b.v.z);
        }
        // Central body's column stays zero
        assert_eq!(tables.x[s][0], 0.0);
        assert_eq!(tables.vz[s][0], 0.0);
    }
}

#[test]
fn exported_csvs_are_consistent() {
    let cfg = test_config(Some(5), 6, "export");
    let mut scenario = Scenario::build_scenario(cfg).unwrap();
    let out_dir = scenario.output.directory.clone();
    let archive_path = scenario.output.archive_path.clone();
    let frames = scenario.output.frames;

    run_driver(&mut scenario).unwrap();
    export_archive(&archive_path, &out_dir, true).unwrap();

    // Axis tables: times row + one row per particle (disk + central body)
    let x_table = read_csv(&out_dir.join("simXdata.csv"));
    assert_eq!(x_table.len(), 1 + 7, "times row + n_testparticles + 1 rows");
    for row in &x_table {
        assert_eq!(row.len(), frames);
    }

    let axis_tables: Vec<Vec<Vec<f64>>> = ["X", "Y", "Z", "VX", "VY", "VZ"]
        .iter()
        .map(|axis| read_csv(&out_dir.join(format!("sim{axis}data.csv"))))
        .collect();

    // Per-timestep tables reshape column s of each axis table
    for s in 0..frames {
        let raw = fs::read_to_string(out_dir.join(format!("TimestepData/t{s}.csv"))).unwrap();
        assert!(raw.starts_with("X,Y,Z,Vx,Vy,Vz"));
        let rows: Vec<Vec<f64>> = raw
            .lines()
            .skip(1)
            .map(|l| l.split(',').map(|f| f.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 7);
        for (p, row) in rows.iter().enumerate() {
            for (a, table) in axis_tables.iter().enumerate() {
                assert_eq!(row[a], table[p + 1][s], "frame {s} particle {p} axis {a}");
            }
        }
    }

    // Merged table: header + one row per particle, none dropped here
    let raw = fs::read_to_string(out_dir.join("THE.csv")).unwrap();
    assert_eq!(raw.lines().count(), 1 + 7);
}

#[test]
fn merged_table_drops_non_finite_rows() {
    let dir = temp_dir("merged");
    fs::create_dir_all(&dir).unwrap();

    let mut sys = disk_system(3, 1.0e6);
    let mut snapshots = vec![Snapshot::from_system(&sys)];
    // Particle 2 leaves the domain of validity at the second frame
    sys.bodies[2].x.x = f64::NAN;
    sys.t = 1.0;
    snapshots.push(Snapshot::from_system(&sys));

    let tables = AxisTables::from_snapshots(&snapshots).unwrap();
    let path = dir.join("THE.csv");
    write_merged_table(&tables, &path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let rows: Vec<&str> = raw.lines().collect();
    // header + 4 particles - 1 dropped
    assert_eq!(rows.len(), 1 + 3);
    assert!(
        !rows.iter().skip(1).any(|r| r.starts_with("2,")),
        "Row with non-finite values was not dropped"
    );
}
