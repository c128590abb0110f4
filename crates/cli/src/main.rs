pub(crate) mod args;
pub(crate) mod error;
pub(crate) mod log_args;
pub(crate) mod output;

use args::{Arguments, RunArgs, Subcommands};
use clap::Parser;
use error::Error;
use output::{ec_mul_failure, ec_mul_summary, summary, verdict};
use tracing::{info, warn};

use mimir_config::{config, Configuration};
use mimir_core::{
    ec_mul_config, mimir_precompile::EcMulArgs, mimir_vm::Backend, Fixture, Harness,
};

fn main() -> eyre::Result<()> {
    let args = Arguments::parse();

    // setup logging; the guard flushes the log file when dropped
    let _guard = args.logs.init_tracing()?;

    let mut configuration = Configuration::load()
        .map_err(|e| Error::Generic(format!("failed to load configuration: {}", e)))?;
    if let Some(command) = args.vm_command {
        configuration.vm_command = command;
    }

    match args.sub {
        Subcommands::Run(cmd) => run(cmd, configuration)?,
        Subcommands::EcMul(cmd) => ec_mul(cmd, &configuration)?,
        Subcommands::Config(cmd) => {
            config(cmd)
                .map_err(|e| Error::Generic(format!("failed to configure mimir: {}", e)))?;
        }
    }

    Ok(())
}

/// Runs every scenario, reporting each verdict. A failing scenario does not stop the others
/// unless `--fail-fast` is set.
fn run(cmd: RunArgs, mut configuration: Configuration) -> Result<(), Error> {
    if let Some(timeout_ms) = cmd.timeout_ms {
        configuration.timeout_ms = timeout_ms;
    }
    let harness = Harness::from_configuration(&configuration);

    let scenarios: Vec<(String, Result<Fixture, mimir_core::Error>)> = if cmd.fixtures.is_empty() {
        info!("no fixtures given, running the built-in scenarios");
        Fixture::builtins()?
            .into_iter()
            .map(|(name, fixture)| (format!("builtin:{name}"), Ok(fixture)))
            .collect()
    } else {
        cmd.fixtures.iter().map(|path| (path.display().to_string(), Fixture::load(path))).collect()
    };

    let total = scenarios.len();
    let mut passed = 0;
    for (name, fixture) in scenarios {
        let outcome = fixture.and_then(|fixture| harness.run_fixture(&fixture));
        println!("{}", verdict(&name, &outcome));

        match outcome {
            Ok(()) => passed += 1,
            Err(e) => {
                warn!(scenario = %name, error = %e, "scenario failed");
                if cmd.fail_fast {
                    break;
                }
            }
        }
    }

    println!("{}", summary(passed, total));
    if passed == total {
        Ok(())
    } else {
        Err(Error::ScenariosFailed { failed: total - passed, total })
    }
}

/// Runs the differential EC multiplication test, or replays a single trial.
fn ec_mul(cmd: EcMulArgs, configuration: &Configuration) -> Result<(), Error> {
    let config = cmd.apply(ec_mul_config(configuration)?);
    let harness = Harness::from_configuration(configuration);
    if let Backend::Loopback(_) = harness.invoker() {
        warn!("no vm command configured, testing the loopback vm");
    }

    if let Some(seed) = cmd.replay {
        let trial = harness.ec_mul_replay(config, seed)?;
        let name = format!("seed {}: {:#x} * {}", trial.seed, trial.scalar, trial.point);
        println!("{}", verdict::<Error>(&name, &Ok(())));
        return Ok(());
    }

    let report = harness.ec_mul_report(config);
    for record in report.failures() {
        println!("{}", ec_mul_failure(record));
    }
    println!("{}", ec_mul_summary(&report));

    report.into_result().map_err(mimir_core::Error::from)?;
    Ok(())
}
