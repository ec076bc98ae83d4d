pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod archive;
pub mod driver;
pub mod export;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::params::{Parameters, KMS_PER_CODE_VELOCITY};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::{verlet_integrator, leapfrog_integrator};
pub use simulation::orbit::{cartesian_from_elements, OrbitalElements};
pub use simulation::scenario::{linspace, Output, Scenario};

pub use configuration::config::{
    CentralConfig, DiskConfig, EngineConfig, IntegratorConfig, KickConfig, OutputConfig,
    ParametersConfig, ScenarioConfig,
};

pub use archive::archive::{ArchiveReader, ArchiveWriter, BodyState, Snapshot};

pub use driver::driver::{run_driver, KickEvent, KickPhase};

pub use export::export::{export_archive, AxisTables};

pub use visualization::frame_plot::{render_frame, FrameStyle};

pub use benchmark::benchmark::{bench_gravity, bench_step};
