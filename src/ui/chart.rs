//! Grouped horizontal bar chart rendered as text.

const BAR: char = '█';

/// One named series with a value per category.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

pub struct BarChart {
    title: String,
    categories: Vec<String>,
    series: Vec<Series>,
    width: usize,
    unit: String,
}

impl BarChart {
    pub fn new(title: &str, categories: Vec<String>) -> BarChart {
        BarChart {
            title: title.to_string(),
            categories,
            series: vec![],
            width: 40,
            unit: String::new(),
        }
    }

    pub fn with_width(mut self, width: usize) -> BarChart {
        self.width = width;
        self
    }

    pub fn with_unit(mut self, unit: &str) -> BarChart {
        self.unit = unit.to_string();
        self
    }

    pub fn add_series(&mut self, name: &str, values: Vec<f64>) {
        self.series.push(Series {
            name: name.to_string(),
            values,
        });
    }

    fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|series| series.values.iter().copied())
            .fold(0.0, f64::max)
    }

    /// One block per category, one bar per series, all scaled to the
    /// largest value.
    ///
    pub fn render(&self) -> String {
        let max = self.max_value();
        let label_width = self
            .series
            .iter()
            .map(|series| series.name.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec![self.title.clone()];
        for (index, category) in self.categories.iter().enumerate() {
            lines.push(String::new());
            lines.push(category.clone());
            for series in &self.series {
                let value = series.values.get(index).copied().unwrap_or(0.0);
                let bar: String = std::iter::repeat(BAR)
                    .take(bar_len(value, max, self.width))
                    .collect();
                let label = format!("{:<width$}", series.name, width = label_width);
                let amount = if self.unit.is_empty() {
                    format!("{:.1}", value)
                } else {
                    format!("{:.1} {}", value, self.unit)
                };
                lines.push(format!("  {}  {} {}", label, bar, amount));
            }
        }
        lines.join("\n")
    }
}

/// Bar length for `value` when `max` fills `width` cells. Any positive value
/// gets at least one cell.
///
pub fn bar_len(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let len = (value / max * width as f64).round() as usize;
    len.clamp(1, width.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_len() {
        assert_eq!(bar_len(10.0, 10.0, 20), 20);
        assert_eq!(bar_len(5.0, 10.0, 20), 10);
        assert_eq!(bar_len(0.1, 100.0, 20), 1);
        assert_eq!(bar_len(0.0, 10.0, 20), 0);
        assert_eq!(bar_len(3.0, 0.0, 20), 0);
    }

    #[test]
    fn test_render() {
        let mut chart = BarChart::new(
            "Sprint hours",
            vec!["Sprint 1".to_string(), "Sprint 2".to_string()],
        )
        .with_width(4)
        .with_unit("h");
        chart.add_series("Ada", vec![8.0, 2.0]);
        chart.add_series("Al", vec![4.0, 0.0]);

        let expected = [
            "Sprint hours",
            "",
            "Sprint 1",
            "  Ada  ████ 8.0 h",
            "  Al   ██ 4.0 h",
            "",
            "Sprint 2",
            "  Ada  █ 2.0 h",
            "  Al    0.0 h",
        ]
        .join("\n");
        assert_eq!(chart.render(), expected);
    }

    #[test]
    fn test_missing_values_render_as_zero() {
        let mut chart = BarChart::new("t", vec!["a".to_string(), "b".to_string()]);
        chart.add_series("x", vec![1.0]);
        assert!(chart.render().ends_with("  x   0.0"));
    }
}
