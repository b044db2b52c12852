//! SVG charts for survey analysis
//!
//! Rendering is the only side-effecting part of the crate and consumes
//! results the analyzer has already computed:
//! - Correlation heatmap of the numeric columns
//! - Bar chart of point-biserial coefficients
//! - Per-column boxplots split by an outcome

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

use survey_io::{Dataset, NumericColumn, Outcome};

use crate::analyzer::{Analysis, CorrelationMatrix, PointBiserialResults};
use crate::colormap::{coolwarm, needs_light_text, Color as MapColor};
use crate::config::{ChartConfig, MAX_CHART_DIMENSION, MIN_CHART_DIMENSION};
use crate::error::{ChartError, ChartResult};

pub const HEATMAP_FILE: &str = "correlation_matrix.svg";
pub const COEFFICIENTS_FILE: &str = "point_biserial.svg";

const FONT: &str = "sans-serif";

/// File name of the boxplot for one column
pub fn boxplot_file(column: NumericColumn) -> String {
    format!("boxplot_{}.svg", column.name())
}

/// Render every chart into `config.output_dir`, returning the files written
pub fn render_all(
    analysis: &Analysis,
    dataset: &Dataset,
    config: &ChartConfig,
) -> ChartResult<Vec<PathBuf>> {
    let dir = &config.output_dir;
    std::fs::create_dir_all(dir).map_err(|source| ChartError::OutputDir {
        path: dir.clone(),
        source,
    })?;

    let mut written = Vec::new();

    let heatmap = dir.join(HEATMAP_FILE);
    render_heatmap(&analysis.correlation_matrix, &heatmap, config)?;
    written.push(heatmap);

    let bars = dir.join(COEFFICIENTS_FILE);
    render_coefficient_bars(&analysis.point_biserial, analysis.outcome, &bars, config)?;
    written.push(bars);

    written.extend(render_boxplots(
        dataset,
        analysis.group_means.group,
        dir,
        config,
    )?);

    tracing::info!(dir = %dir.display(), files = written.len(), "Rendered charts");
    Ok(written)
}

/// Annotated correlation heatmap; row 0 is drawn at the top
pub fn render_heatmap(
    matrix: &CorrelationMatrix,
    path: &Path,
    config: &ChartConfig,
) -> ChartResult<()> {
    check_dimensions(config)?;
    let n = matrix.len();
    if n == 0 {
        return Err(ChartError::NoData("correlation matrix is empty".to_string()));
    }

    let cmap = coolwarm();
    let labels: Vec<&str> = matrix.columns.iter().map(|c| c.label()).collect();
    let row_labels: Vec<&str> = labels.iter().rev().copied().collect();

    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix", (FONT, 22))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(segments(n).into_segmented(), segments(n).into_segmented())
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n + 1)
        .y_labels(n + 1)
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_label_formatter(&|v| segment_label(v, &row_labels))
        .draw()
        .map_err(drawing_error)?;

    // (x, y, r) with matrix row i drawn at y = n - 1 - i
    let cells: Vec<(usize, usize, f64)> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| (j, n - 1 - i, matrix.values[i][j]))
        .collect();

    chart
        .draw_series(cells.iter().map(|&(x, y, r)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                to_rgb(cmap.sample_coefficient(r)).filled(),
            )
        }))
        .map_err(drawing_error)?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    chart
        .draw_series(cells.iter().map(|&(x, y, r)| {
            let color = if needs_light_text(r) { &WHITE } else { &BLACK };
            Text::new(
                format!("{:.2}", r),
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                (FONT, 14).into_font().color(color).pos(centered),
            )
        }))
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;
    tracing::debug!(path = %path.display(), "Rendered correlation heatmap");
    Ok(())
}

/// Bar chart of point-biserial coefficients against `outcome`
pub fn render_coefficient_bars(
    results: &PointBiserialResults,
    outcome: Outcome,
    path: &Path,
    config: &ChartConfig,
) -> ChartResult<()> {
    check_dimensions(config)?;
    if results.is_empty() {
        return Err(ChartError::NoData("no coefficients to plot".to_string()));
    }

    let cmap = coolwarm();
    let entries: Vec<(NumericColumn, f64)> = results.iter().map(|(c, corr)| (*c, corr.r)).collect();
    let labels: Vec<&str> = entries.iter().map(|(c, _)| c.label()).collect();
    let n = entries.len();

    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Point-biserial correlation with {}", outcome.name()),
            (FONT, 20),
        )
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(segments(n).into_segmented(), -1f64..1f64)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n + 1)
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_desc("r")
        .draw()
        .map_err(drawing_error)?;

    chart
        .draw_series(entries.iter().enumerate().map(|(i, &(_, r))| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), r)],
                to_rgb(cmap.sample_coefficient(r)).filled(),
            );
            bar.set_margin(0, 0, 12, 12);
            bar
        }))
        .map_err(drawing_error)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(SegmentValue::Exact(0), 0.0), (SegmentValue::Exact(n), 0.0)],
            &BLACK,
        )))
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;
    tracing::debug!(path = %path.display(), "Rendered coefficient bars");
    Ok(())
}

/// One boxplot per numeric column, one box per value of `group`
pub fn render_boxplots(
    dataset: &Dataset,
    group: Outcome,
    dir: &Path,
    config: &ChartConfig,
) -> ChartResult<Vec<PathBuf>> {
    check_dimensions(config)?;
    if dataset.is_empty() {
        return Err(ChartError::NoData("dataset is empty".to_string()));
    }

    let mut written = Vec::new();
    for column in NumericColumn::ALL {
        let path = dir.join(boxplot_file(column));
        render_boxplot(dataset, column, group, &path, config)?;
        written.push(path);
    }
    Ok(written)
}

fn render_boxplot(
    dataset: &Dataset,
    column: NumericColumn,
    group: Outcome,
    path: &Path,
    config: &ChartConfig,
) -> ChartResult<()> {
    let boxes: Vec<(&str, Quartiles)> = [false, true]
        .into_iter()
        .filter_map(|value| {
            let values: Vec<f64> = dataset
                .iter()
                .filter(|r| r.outcome(group) == value)
                .map(|r| r.value(column))
                .collect();
            (!values.is_empty()).then(|| (group.value_label(value), Quartiles::new(&values)))
        })
        .collect();
    let labels: Vec<&str> = boxes.iter().map(|(label, _)| *label).collect();

    let values = dataset.column(column);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min) as f32;
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) as f32;
    let pad = ((hi - lo) * 0.1).max(0.5);

    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} by {}", column.label(), group.name()),
            (FONT, 20),
        )
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(segments(boxes.len()).into_segmented(), (lo - pad)..(hi + pad))
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(boxes.len() + 1)
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_desc(column.label())
        .draw()
        .map_err(drawing_error)?;

    let fill = to_rgb(coolwarm().sample(0.25));
    chart
        .draw_series(boxes.iter().enumerate().map(|(i, (_, quartiles))| {
            Boxplot::new_vertical(SegmentValue::CenterOf(i), quartiles)
                .width(40)
                .whisker_width(0.5)
                .style(fill.stroke_width(2))
        }))
        .map_err(drawing_error)?;

    root.present().map_err(drawing_error)?;
    tracing::debug!(path = %path.display(), column = column.name(), "Rendered boxplot");
    Ok(())
}

// Discrete ranges include their end, so `n` segments span `0..n - 1`
fn segments(n: usize) -> std::ops::Range<usize> {
    0..n.saturating_sub(1)
}

fn segment_label(value: &SegmentValue<usize>, labels: &[&str]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).map(|s| s.to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

fn to_rgb(color: MapColor) -> RGBColor {
    let (r, g, b) = color.to_rgb8();
    RGBColor(r, g, b)
}

fn check_dimensions(config: &ChartConfig) -> ChartResult<()> {
    let valid = MIN_CHART_DIMENSION..=MAX_CHART_DIMENSION;
    if !valid.contains(&config.width) || !valid.contains(&config.height) {
        return Err(ChartError::InvalidDimensions {
            width: config.width,
            height: config.height,
            min: MIN_CHART_DIMENSION,
            max: MAX_CHART_DIMENSION,
        });
    }
    Ok(())
}

fn drawing_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyze, correlation_matrix};
    use crate::config::AnalysisConfig;
    use survey_io::Record;

    fn dataset() -> Dataset {
        let rows = [
            (2, 3, 1, 2.0, true),
            (5, 4, 4, 8.0, false),
            (4, 5, 3, 5.0, false),
            (1, 2, 2, 1.0, true),
            (3, 3, 5, 6.5, false),
        ];
        Dataset::new(
            rows.iter()
                .enumerate()
                .map(|(i, &(sp, te, pc, hours, clicked))| Record {
                    employee_id: format!("E{:03}", i),
                    strong_passwords: sp,
                    team_expectation: te,
                    phishing_confidence: pc,
                    training_hours: hours,
                    clicked_suspicious_link: clicked,
                })
                .collect(),
        )
    }

    #[test]
    fn test_render_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AnalysisConfig::default();
        config.charts.output_dir = dir.path().join("charts");

        let data = dataset();
        let analysis = analyze(&data, &config).unwrap();
        let files = render_all(&analysis, &data, &config.charts).unwrap();

        assert_eq!(files.len(), 2 + NumericColumn::ALL.len());
        for file in &files {
            let svg = std::fs::read_to_string(file).unwrap();
            assert!(svg.contains("<svg"), "{} is not an SVG", file.display());
        }
        assert!(config.charts.output_dir.join(HEATMAP_FILE).exists());
        assert!(config
            .charts
            .output_dir
            .join(boxplot_file(NumericColumn::TrainingHours))
            .exists());
    }

    #[test]
    fn test_heatmap_contains_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HEATMAP_FILE);
        let matrix = correlation_matrix(&dataset()).unwrap();

        render_heatmap(&matrix, &path, &ChartConfig::default()).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("1.00"));
        assert!(svg.contains("Correlation Matrix"));
    }

    #[test]
    fn test_invalid_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let config = ChartConfig {
            width: 0,
            ..ChartConfig::default()
        };
        let matrix = correlation_matrix(&dataset()).unwrap();
        assert!(matches!(
            render_heatmap(&matrix, &dir.path().join("x.svg"), &config),
            Err(ChartError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn test_empty_coefficients() {
        let dir = tempfile::tempdir().unwrap();
        let result = render_coefficient_bars(
            &PointBiserialResults::new(),
            Outcome::Passed,
            &dir.path().join("bars.svg"),
            &ChartConfig::default(),
        );
        assert!(matches!(result, Err(ChartError::NoData(_))));
    }
}
