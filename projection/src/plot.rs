use std::{fmt::Display, ops::Range, path::Path};

use log::info;
use movielens::MovieTable;
use ndarray::{ArrayView2, Axis};
use plotters::prelude::*;

use crate::{ProjectionErr, Result, project};

const SIZE: (u32, u32) = (1024, 768);
const FONT: &str = "sans-serif";
const MARGIN: f64 = 0.15;

/// Renders the `indices` rows of the `items x 2` matrix `points` as a scatter
/// plot, labeling each point with its movie title, and writes it as SVG.
///
/// # Arguments
/// * `points` - One `(x, y)` row per movie, as returned by `project`.
/// * `movies` - Where titles are looked up, movies missing from it are labeled by index.
/// * `indices` - The zero-based movies to plot.
/// * `title` - The caption of the plot.
/// * `output` - Where the SVG is written.
///
/// # Errors
/// `IndexOutOfRange` if any index is not a row of `points` and `Plot` if drawing
/// or writing fails.
pub fn plot(
    points: ArrayView2<f64>,
    movies: &MovieTable,
    indices: &[usize],
    title: &str,
    output: &Path,
) -> Result<()> {
    let bound = points.nrows();
    let labeled = indices
        .iter()
        .map(|&index| {
            if index >= bound || points.ncols() < 2 {
                return Err(ProjectionErr::IndexOutOfRange { index, bound });
            }

            let row = points.index_axis(Axis(0), index);
            let label = movies
                .title(index)
                .map_or_else(|| format!("#{index}"), str::to_string);

            Ok((row[0], row[1], label))
        })
        .collect::<Result<Vec<_>>>()?;

    let x_range = padded_range(labeled.iter().map(|p| p.0));
    let y_range = padded_range(labeled.iter().map(|p| p.1));

    let root = SVGBackend::new(output, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("first component")
        .y_desc("second component")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(labeled.iter().map(|(x, y, label)| {
            EmptyElement::at((*x, *y))
                + Circle::new((0, 0), 4, BLUE.filled())
                + Text::new(label.clone(), (6, -6), (FONT, 12).into_font())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!("wrote '{title}' ({} movies) to {}", labeled.len(), output.display());

    Ok(())
}

/// Projects `items` with `project` and plots the `indices` rows, see `plot`.
pub fn plot_projection(
    items: ArrayView2<f64>,
    movies: &MovieTable,
    indices: &[usize],
    title: &str,
    output: &Path,
) -> Result<()> {
    let points = project(items)?;
    plot(points.view(), movies, indices, title, output)
}

/// The span of `values` widened by `MARGIN` on each side so labels fit.
fn padded_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if lo > hi {
        return -1.0..1.0;
    }

    let pad = if hi - lo > 0.0 {
        (hi - lo) * MARGIN
    } else {
        1.0
    };

    (lo - pad)..(hi + pad)
}

fn plot_err<E: Display>(e: E) -> ProjectionErr {
    ProjectionErr::Plot(e.to_string())
}
