//! Run a diagrammatic Monte Carlo simulation of the Holstein polaron
//! described by a configuration file.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use holstein_diagmc::{
    config::Config,
    diagram::Diagram,
    output::DataRecord,
    plot::{plot_phonon_histogram, render_text_histogram},
    rng::rng_from_optional_seed,
    simulation::{run_production_with, run_thermalization_with, DiagrammaticMonteCarlo},
    statistics::{Estimates, PhononHistogram},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Template of the progress bars.
const PROGRESS_BAR_TEMPLATE: &str =
    "{prefix:14} [{elapsed_precise}] [{bar:40.white/cyan}] {pos:>7}/{len:7} [ETA {eta_precise}]";

/// Width of the console histogram.
const TEXT_HISTOGRAM_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "holstein-diagmc")]
#[command(about = "Diagrammatic Monte Carlo for the single site Holstein polaron", long_about = None)]
#[command(version)]
struct Cli {
    /// Path of the TOML configuration file
    config: PathBuf,

    /// Do not show the progress bars
    #[arg(long)]
    no_progress: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "holstein_diagmc=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn progress_bar(
    len: usize,
    prefix: &'static str,
    hidden: bool,
) -> Result<ProgressBar, Box<dyn Error>> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(ProgressStyle::with_template(PROGRESS_BAR_TEMPLATE)?.progress_chars("=>-"));
    pb.set_prefix(prefix);
    pb.enable_steady_tick(Duration::from_millis(200));
    Ok(pb)
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&cli.config)?;
    config.ensure_storage_directories_exist()?;
    let settings = *config.settings();
    let parameters = config.model_parameters()?;

    let rng = rng_from_optional_seed(config.seed());
    let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
    let mut diagram = Diagram::new(parameters.time());

    if settings.number_of_burn_steps() > 0 {
        let pb = progress_bar(
            settings.number_of_burn_steps(),
            "Thermalisation",
            cli.no_progress,
        )?;
        diagram = run_thermalization_with(
            diagram,
            &mut mc,
            settings.number_of_burn_steps(),
            |_| pb.inc(1),
        )?;
        pb.finish_and_clear();
    }

    let pb = progress_bar(settings.number_of_steps(), "Production", cli.no_progress)?;
    let (_diagram, statistics) = run_production_with(
        diagram,
        &mut mc,
        settings.number_of_steps(),
        parameters.frequency(),
        |_| pb.inc(1),
    )?;
    pb.finish();
    debug!(
        acceptance_rate_insert = ?mc.acceptance_rate_insert(),
        acceptance_rate_remove = ?mc.acceptance_rate_remove(),
        "acceptance rates"
    );

    let estimates = Estimates::from_statistics(&statistics, &parameters)?;
    let histogram = PhononHistogram::from_orders(statistics.order_sequence());
    let fitted_mean = histogram.fit_poisson();
    info!(
        energy = estimates.energy(),
        energy_error = estimates.energy_error(),
        theoretical_energy = parameters.theoretical_energy(),
        "ground state energy"
    );
    info!(
        phonon_number = estimates.phonon_number(),
        phonons_per_unit_time = estimates.phonons_per_unit_time(),
        theoretical_phonon_number = parameters.theoretical_phonon_number(),
        "mean phonon number"
    );

    DataRecord::new(&settings, &estimates)
        .write_to_file(config.data_file_path(), config.path_data().append())?;
    plot_phonon_histogram(
        config.phonon_plot_path(),
        &histogram,
        &settings,
        &estimates,
        fitted_mean,
    )?;
    if settings.interactive() {
        print!("{}", render_text_histogram(&histogram, TEXT_HISTOGRAM_WIDTH));
    }
    Ok(())
}
