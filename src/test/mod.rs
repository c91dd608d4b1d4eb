//! Module for tests of whole runs.

use std::error::Error;

use approx::*;
use rand::{rngs::StdRng, SeedableRng};

use super::{
    config::*,
    diagram::Diagram,
    model::ModelParameters,
    output::*,
    plot::*,
    rng::*,
    simulation::*,
    statistics::*,
};

const SEED_RNG: u64 = 0x45_78_93_f4_4a_b0_67_f0;

/// Thermalize then produce `number_of_steps` steps and reduce the result.
fn simulate<Rng: rand::Rng>(
    parameters: ModelParameters,
    rng: Rng,
    number_of_burn_steps: usize,
    number_of_steps: usize,
) -> Result<(RunStatistics, Estimates), Box<dyn Error>> {
    let mut mc = DiagrammaticMonteCarlo::new(parameters, rng);
    let diagram = run_thermalization(
        Diagram::new(parameters.time()),
        &mut mc,
        number_of_burn_steps,
    )?;
    let (_, statistics) =
        run_production(diagram, &mut mc, number_of_steps, parameters.frequency())?;
    let estimates = Estimates::from_statistics(&statistics, &parameters)?;
    Ok((statistics, estimates))
}

#[test]
/// G = 0.3, OMEGA = 1, TIME = 50 with the seed 1 reproduces the ground state
/// energy and the phonon cloud of the polaron.
fn convergence() -> Result<(), Box<dyn Error>> {
    let parameters = ModelParameters::new(0.3_f64, 1_f64, 50_f64)?;
    let (_, estimates) = simulate(parameters, rng_from_seed(1), 5_000, 150_000)?;

    assert_relative_eq!(estimates.energy(), -0.09_f64, max_relative = 0.1_f64);
    assert_relative_eq!(
        estimates.phonons_per_unit_time(),
        0.09_f64,
        max_relative = 0.1_f64
    );
    assert_relative_eq!(
        estimates.phonon_number(),
        parameters.exact_mean_line_number(),
        max_relative = 0.1_f64
    );
    Ok(())
}

#[test]
/// With a zero coupling no phonon is ever inserted.
fn zero_coupling() -> Result<(), Box<dyn Error>> {
    let parameters = ModelParameters::new(0_f64, 1_f64, 50_f64)?;
    let (statistics, estimates) =
        simulate(parameters, StdRng::seed_from_u64(SEED_RNG), 100, 10_000)?;
    assert!(statistics.order_sequence().iter().all(|order| *order == 0));
    assert_eq!(estimates.energy(), 0_f64);
    assert_eq!(estimates.phonon_number(), 0_f64);
    Ok(())
}

#[test]
/// The sampled phonon number follows the exact Poisson distribution of the one
/// site model at finite propagation time.
fn poisson_distribution() -> Result<(), Box<dyn Error>> {
    let parameters = ModelParameters::new(1_f64, 1_f64, 3_f64)?;
    let (statistics, estimates) =
        simulate(parameters, StdRng::seed_from_u64(SEED_RNG), 1_000, 300_000)?;
    let exact_mean = parameters.exact_mean_line_number();
    assert_relative_eq!(estimates.phonon_number(), exact_mean, max_relative = 0.05_f64);
    assert_relative_eq!(
        estimates.energy(),
        parameters.exact_energy_estimator(),
        max_relative = 0.05_f64
    );

    let histogram = PhononHistogram::from_orders(statistics.order_sequence());
    for (n, frequency) in histogram.frequencies().iter().enumerate().take(4) {
        assert_relative_eq!(
            *frequency,
            poisson_pmf(n, exact_mean),
            max_relative = 0.1_f64
        );
    }
    let fitted = histogram.fit_poisson().unwrap();
    assert_relative_eq!(fitted, exact_mean, max_relative = 0.05_f64);
    Ok(())
}

#[test]
/// Two runs with the same seed are bit identical.
fn reproducibility() -> Result<(), Box<dyn Error>> {
    let parameters = ModelParameters::new(0.5_f64, 1_f64, 10_f64)?;
    let (statistics_1, _) = simulate(parameters, rng_from_seed(7), 500, 5_000)?;
    let (statistics_2, _) = simulate(parameters, rng_from_seed(7), 500, 5_000)?;
    assert_eq!(statistics_1.order_sequence(), statistics_2.order_sequence());
    let bits = |statistics: &RunStatistics| {
        statistics
            .energy_sequence()
            .iter()
            .map(|energy| energy.to_bits())
            .collect::<Vec<u64>>()
    };
    assert_eq!(bits(&statistics_1), bits(&statistics_2));

    let (statistics_3, _) = simulate(parameters, rng_from_seed(8), 500, 5_000)?;
    assert_ne!(statistics_1.order_sequence(), statistics_3.order_sequence());
    Ok(())
}

#[test]
/// The order is twice the number of phonons after every step and every phonon
/// stays inside the propagation time.
fn invariant_every_step() -> Result<(), Box<dyn Error>> {
    let parameters = ModelParameters::new(0.8_f64, 0.5_f64, 7_f64)?;
    let mut mc = DiagrammaticMonteCarlo::new(parameters, StdRng::seed_from_u64(SEED_RNG));
    let mut steps = 0_usize;
    let check = |diagram: &Diagram| {
        assert_eq!(diagram.order(), 2 * diagram.phonon_list().len());
        for phonon in diagram.phonon_list() {
            assert!(0_f64 <= phonon.t_start());
            assert!(phonon.t_start() < phonon.t_end());
            assert!(phonon.t_end() <= diagram.total_time());
        }
    };
    let diagram = run_thermalization_with(
        Diagram::new(parameters.time()),
        &mut mc,
        2_000,
        |diagram| {
            check(diagram);
            steps += 1;
        },
    )?;
    let (_, statistics) = run_production_with(
        diagram,
        &mut mc,
        20_000,
        parameters.frequency(),
        |diagram| {
            check(diagram);
            steps += 1;
        },
    )?;
    assert_eq!(steps, 22_000);
    assert_eq!(statistics.len(), 20_000);
    assert!(mc.acceptance_rate_insert().unwrap() > 0_f64);
    assert!(mc.acceptance_rate_remove().unwrap() > 0_f64);
    Ok(())
}

#[test]
/// From a configuration to the data record and the plot.
fn full_run() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().display().to_string();
    let config = Config::new(
        Settings::new(2_000, 200, 1_f64, 0.3_f64, 5_f64, true),
        SeedSettings::new(Some(SEED_RNG)),
        PlotPaths::new(
            format!("{}/plots", root),
            format!("{}/plots/phonons_g{{G}}_omega{{OMEGA}}_time{{TIME}}.svg", root),
        ),
        DataPaths::new(
            format!("{}/data", root),
            format!("{}/data/energy_phonons.txt", root),
            true,
        ),
    );
    config.validate()?;
    config.ensure_storage_directories_exist()?;
    let settings = *config.settings();
    let parameters = config.model_parameters()?;

    let (statistics, estimates) = simulate(
        parameters,
        rng_from_optional_seed(config.seed()),
        settings.number_of_burn_steps(),
        settings.number_of_steps(),
    )?;
    let histogram = PhononHistogram::from_orders(statistics.order_sequence());
    DataRecord::new(&settings, &estimates)
        .write_to_file(config.data_file_path(), config.path_data().append())?;
    plot_phonon_histogram(
        config.phonon_plot_path(),
        &histogram,
        &settings,
        &estimates,
        histogram.fit_poisson(),
    )?;
    assert!(!render_text_histogram(&histogram, 40).is_empty());

    assert!(dir.path().join("plots/phonons_g0.3_omega1_time5.svg").is_file());
    let record = std::fs::read_to_string(dir.path().join("data/energy_phonons.txt"))?;
    let lines = record.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], DATA_RECORD_HEADER);
    assert!(lines[1].starts_with("0.3 1 5 200 2000 "));
    Ok(())
}

#[test]
fn test_readme_deps() {
    version_sync::assert_markdown_deps_updated!("README.md");
}
