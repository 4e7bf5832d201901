//! Chart model: what a risk trend chart shows, independent of how it is drawn.

use crate::api::HourlyMeasurement;

/// Decision threshold communicated by the prediction model, in percent
pub const RISK_THRESHOLD_PERCENT: f64 = 17.99;

/// Message drawn instead of a chart when there is no history
pub const EMPTY_CHART_MESSAGE: &str = "Veri bekleniyor...";

pub const RISK_SERIES_LABEL: &str = "Sepsis Riski (%)";
pub const THRESHOLD_SERIES_LABEL: &str = "Eşik Değeri (17.99%)";

/// One plotted line
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color: &'static str,
    pub values: Vec<f64>,
    pub dashed: bool,
    pub filled: bool,
    pub show_points: bool,
}

/// Fixed percentage y-axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 20.0,
        }
    }
}

impl YAxis {
    /// Tick values from min to max inclusive
    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    pub fn tick_label(value: f64) -> String {
        format!("{}%", value)
    }

    /// Map a value to [0, 1] along the axis, clamped
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Everything needed to draw the risk trend of one patient
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub hours: Vec<u32>,
    pub labels: Vec<String>,
    pub risk: Series,
    pub threshold: Series,
    pub y_axis: YAxis,
}

impl ChartSpec {
    /// Build the chart for a history; `None` when there is nothing to plot
    pub fn from_history(history: &[HourlyMeasurement]) -> Option<Self> {
        if history.is_empty() {
            return None;
        }

        let hours: Vec<u32> = history.iter().map(|h| h.hour).collect();
        let labels = hours.iter().map(|h| format!("Saat {}", h)).collect();
        let values = history.iter().map(|h| h.prediction * 100.0).collect();

        Some(Self {
            labels,
            risk: Series {
                label: RISK_SERIES_LABEL.to_string(),
                color: "#3b82f6",
                values,
                dashed: false,
                filled: true,
                show_points: true,
            },
            threshold: Series {
                label: THRESHOLD_SERIES_LABEL.to_string(),
                color: "#ef4444",
                values: vec![RISK_THRESHOLD_PERCENT; hours.len()],
                dashed: true,
                filled: false,
                show_points: false,
            },
            hours,
            y_axis: YAxis::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn series(&self) -> [&Series; 2] {
        [&self.risk, &self.threshold]
    }

    /// Tooltip lines for the point at `index`, one per series
    pub fn tooltip(&self, index: usize) -> Option<Vec<String>> {
        let label = self.labels.get(index)?;
        let mut lines = vec![label.clone()];
        for series in self.series() {
            let value = series.values.get(index)?;
            lines.push(format!("{}: {:.1}%", series.label, value));
        }
        Some(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::VitalSigns;

    fn hour(hour: u32, prediction: f64) -> HourlyMeasurement {
        HourlyMeasurement {
            id: None,
            hour,
            vital_signs: VitalSigns::new(),
            prediction,
            risk_level: "Düşük".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_empty_history_has_no_chart() {
        assert!(ChartSpec::from_history(&[]).is_none());
    }

    #[test]
    fn test_series_from_history() {
        let spec = ChartSpec::from_history(&[hour(1, 0.05), hour(2, 0.234)]).unwrap();

        assert_eq!(spec.labels, vec!["Saat 1", "Saat 2"]);
        assert!((spec.risk.values[1] - 23.4).abs() < 1e-9);
        assert_eq!(spec.threshold.values, vec![17.99, 17.99]);
        assert!(spec.threshold.dashed);
    }

    #[test]
    fn test_tooltip_one_decimal() {
        let spec = ChartSpec::from_history(&[hour(3, 0.23456)]).unwrap();

        assert_eq!(
            spec.tooltip(0).unwrap(),
            vec![
                "Saat 3".to_string(),
                "Sepsis Riski (%): 23.5%".to_string(),
                "Eşik Değeri (17.99%): 18.0%".to_string(),
            ]
        );
        assert!(spec.tooltip(1).is_none());
    }

    #[test]
    fn test_y_axis_ticks() {
        let axis = YAxis::default();
        let labels: Vec<_> = axis.ticks().into_iter().map(YAxis::tick_label).collect();

        assert_eq!(labels, vec!["0%", "20%", "40%", "60%", "80%", "100%"]);
        assert_eq!(axis.normalize(150.0), 1.0);
    }
}
