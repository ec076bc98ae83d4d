use recoilsim::{Scenario, ScenarioConfig};
use recoilsim::{export_archive, run_driver};
use recoilsim::{bench_gravity, bench_step};

use clap::Parser;
use anyhow::Result;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "recoil_fiducial.yaml")]
    file_name: String,

    /// Run the throughput benchmarks instead of a scenario
    #[arg(long, default_value_t = false)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.bench {
        bench_gravity();
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    run_driver(&mut scenario)?;

    if scenario.output.export_csv {
        export_archive(
            &scenario.output.archive_path,
            &scenario.output.directory,
            scenario.output.merged_csv,
        )?;
    }

    Ok(())
}
