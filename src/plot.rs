//! Plot of the phonon number distribution.

use std::fmt::Write as _;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use super::{
    config::Settings,
    error::OutputError,
    statistics::{poisson_pmf, Estimates, PhononHistogram},
    Real,
};

/// Number of phonon numbers drawn beyond the largest sampled one.
const TAIL: usize = 5;

fn plot_error<E: std::fmt::Display>(error: E) -> OutputError {
    OutputError::Plot(error.to_string())
}

/// Draw the normalised histogram `P(n)` as an SVG at `path`, with bins centred
/// on the integers, overlaid with the Poisson distribution of parameter
/// `fitted_mean` (red, if any) and the one of the sampled mean (yellow).
///
/// The legend shows the phonon numbers divided by `ω τ`, comparable to `g²/ω²`.
///
/// # Errors
/// [`OutputError::Plot`] if the backend fails to draw or to write the file.
pub fn plot_phonon_histogram(
    path: impl AsRef<Path>,
    histogram: &PhononHistogram,
    settings: &Settings,
    estimates: &Estimates,
    fitted_mean: Option<Real>,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    let frequencies = histogram.frequencies();
    let max_phonon_number = histogram.max_phonon_number().unwrap_or(0) + TAIL;
    let omega_tau = settings.frequency() * settings.time();

    let sampled_mean = estimates.phonon_number();
    let max_frequency = (0..=max_phonon_number)
        .map(|n| {
            let overlay = fitted_mean.map_or(0_f64, |mean| poisson_pmf(n, mean));
            frequencies
                .get(n)
                .copied()
                .unwrap_or(0_f64)
                .max(overlay)
                .max(poisson_pmf(n, sampled_mean))
        })
        .fold(1E-3_f64, Real::max);

    let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    #[allow(clippy::cast_precision_loss)]
    let x_max = max_phonon_number as Real + 0.5_f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!(
                "g = {} ω = {} nsteps_burn = {} nsteps = {} τ = {}",
                settings.coupling(),
                settings.frequency(),
                settings.number_of_burn_steps(),
                settings.number_of_steps(),
                settings.time()
            ),
            ("sans-serif", 18),
        )
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5_f64..x_max, 0_f64..max_frequency * 1.1_f64)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("N_phonons")
        .y_desc("P(N_phonons)")
        .axis_desc_style(("sans-serif", 15))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(frequencies.iter().enumerate().map(|(n, frequency)| {
            #[allow(clippy::cast_precision_loss)]
            let center = n as Real;
            Rectangle::new(
                [(center - 0.5_f64, 0_f64), (center + 0.5_f64, *frequency)],
                BLUE.mix(0.8).filled(),
            )
        }))
        .map_err(plot_error)?
        .label(format!(
            "DiagMC: N_pho/ωτ = {:.4}",
            estimates.phonons_per_unit_time()
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    if let Some(mean) = fitted_mean {
        chart
            .draw_series(LineSeries::new(
                (0..=max_phonon_number).map(|n| {
                    #[allow(clippy::cast_precision_loss)]
                    let x = n as Real;
                    (x, poisson_pmf(n, mean))
                }),
                RED,
            ))
            .map_err(plot_error)?
            .label(format!("Poisson fit: N_pho/ωτ = {:.4}", mean / omega_tau))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    chart
        .draw_series(LineSeries::new(
            (0..=max_phonon_number).map(|n| {
                #[allow(clippy::cast_precision_loss)]
                let x = n as Real;
                (x, poisson_pmf(n, sampled_mean))
            }),
            YELLOW,
        ))
        .map_err(plot_error)?
        .label(format!(
            "Theory: N_pho = g²/ω² = {:.4}",
            (settings.coupling() / settings.frequency()).powi(2)
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], YELLOW));

    chart
        .draw_series(std::iter::empty::<Circle<(Real, Real), i32>>())
        .map_err(plot_error)?
        .label(format!("E_GS = {:.3}", estimates.energy()))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    info!(path = %path.display(), "phonon histogram plotted");
    Ok(())
}

/// Render the normalised histogram as horizontal text bars, one line per phonon
/// number, the longest bar having `width` characters.
///
/// # Example
/// ```
/// use holstein_diagmc::plot::render_text_histogram;
/// use holstein_diagmc::statistics::PhononHistogram;
///
/// let histogram = PhononHistogram::from_orders(&[0, 0, 0, 2]);
/// let text = render_text_histogram(&histogram, 6);
/// assert_eq!(text, "  0 | ###### 0.7500\n  1 | ## 0.2500\n");
/// ```
pub fn render_text_histogram(histogram: &PhononHistogram, width: usize) -> String {
    let frequencies = histogram.frequencies();
    let max_frequency = frequencies.iter().copied().fold(0_f64, Real::max);
    let mut text = String::new();
    for (n, frequency) in frequencies.iter().enumerate() {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let bar_length = if max_frequency > 0_f64 {
            (frequency / max_frequency * width as Real).round() as usize
        }
        else {
            0
        };
        // writing into a String cannot fail
        let _ = writeln!(
            text,
            "{:>3} | {} {:.4}",
            n,
            "#".repeat(bar_length),
            frequency
        );
    }
    text
}
