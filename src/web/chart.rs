//! Simulated per-class accuracy chart.
//!
//! The values are random placeholders regenerated on every render. They are
//! not measured and the chart always carries a disclaimer saying so.

use crate::constants::accuracy;
use crate::error::{Error, Result};
use plotters::prelude::*;
use rand::Rng;

const LABEL_AREA: u32 = 190;
const AXIS_AREA: u32 = 45;
const BAR_GAP: u32 = 4;

/// Illustrative accuracy value per class, uniform in [0.70, 0.95].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAccuracy {
    values: Vec<f64>,
}

impl SimulatedAccuracy {
    /// Draw one value per class.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, classes: usize) -> Self {
        let values = (0..classes)
            .map(|_| rng.gen_range(accuracy::MIN..=accuracy::MAX))
            .collect();
        Self { values }
    }

    /// Values in class order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Render a horizontal bar chart as an SVG document.
    ///
    /// `labels` are paired with values by position.
    pub fn render_svg(&self, labels: &[&str]) -> Result<String> {
        let rows = i32::try_from(self.values.len()).map_err(|e| chart_error(&e))?;
        let (r, g, b) = accuracy::BAR_RGB;
        let bar_color = RGBColor(r, g, b);
        let label_for = |value: &SegmentValue<i32>| match value {
            SegmentValue::Exact(row) | SegmentValue::CenterOf(row) => usize::try_from(*row)
                .ok()
                .and_then(|row| labels.get(row))
                .map_or_else(String::new, |label| (*label).to_string()),
            SegmentValue::Last => String::new(),
        };

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, accuracy::SIZE).into_drawing_area();
            root.fill(&WHITE).map_err(|e| chart_error(&e))?;

            let mut chart = ChartBuilder::on(&root)
                .caption(accuracy::TITLE, ("sans-serif", 18))
                .margin(10)
                .x_label_area_size(AXIS_AREA)
                .y_label_area_size(LABEL_AREA)
                .build_cartesian_2d(0.0..1.0, (0..rows).into_segmented())
                .map_err(|e| chart_error(&e))?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .x_desc(accuracy::X_LABEL)
                .x_labels(6)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_labels(self.values.len() + 1)
                .y_label_formatter(&label_for)
                .draw()
                .map_err(|e| chart_error(&e))?;

            chart
                .draw_series(self.values.iter().zip(0..).map(|(value, row)| {
                    let mut bar = Rectangle::new(
                        [
                            (0.0, SegmentValue::Exact(row)),
                            (value.clamp(0.0, 1.0), SegmentValue::Exact(row + 1)),
                        ],
                        bar_color.filled(),
                    );
                    bar.set_margin(BAR_GAP, BAR_GAP, 0, 0);
                    bar
                }))
                .map_err(|e| chart_error(&e))?;

            root.present().map_err(|e| chart_error(&e))?;
        }
        Ok(svg)
    }
}

fn chart_error(e: &dyn std::fmt::Display) -> Error {
    Error::Render {
        what: "accuracy chart",
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let sample = SimulatedAccuracy::sample(&mut rng, 10);
            assert_eq!(sample.values().len(), 10);
            assert!(
                sample
                    .values()
                    .iter()
                    .all(|v| (accuracy::MIN..=accuracy::MAX).contains(v))
            );
        }
    }

    #[test]
    fn test_values_change_between_renders() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = SimulatedAccuracy::sample(&mut rng, 10);
        let second = SimulatedAccuracy::sample(&mut rng, 10);
        assert_ne!(first, second);
    }

    #[test]
    fn test_svg_has_title_axis_and_one_bar_per_class() {
        let mut rng = StdRng::seed_from_u64(3);
        let labels: Vec<&str> = catalog::names().collect();
        let svg = SimulatedAccuracy::sample(&mut rng, labels.len())
            .render_svg(&labels)
            .expect("render chart");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Precisión estimada por clase"));
        assert!(svg.matches("Precisión").count() >= 2);
        assert!(svg.to_ascii_lowercase().matches("#6e8efb").count() >= labels.len());
        for label in labels {
            assert!(svg.contains(label), "missing label {label}");
        }
    }
}
