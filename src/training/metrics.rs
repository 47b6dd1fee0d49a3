//! Classification evaluation: confusion matrix, accuracy, Cohen's Kappa.

use std::fmt;

use serde::Serialize;

// =============================================================================
// MetricValue
// =============================================================================

/// A computed metric value with metadata.
///
/// Wraps a metric value with its name and direction information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    /// Name of the metric (e.g. "test-accuracy", "oob-error").
    pub name: String,
    /// The computed value.
    pub value: f64,
    /// Whether higher values are better (true for accuracy, false for error).
    pub higher_is_better: bool,
}

impl MetricValue {
    /// Create a new metric value.
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self {
            name: name.into(),
            value,
            higher_is_better,
        }
    }

    /// Returns true if this value is better than another.
    pub fn is_better_than(&self, other: &Self) -> bool {
        if self.higher_is_better {
            self.value > other.value
        } else {
            self.value < other.value
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

// =============================================================================
// ConfusionMatrix
// =============================================================================

/// Class-by-class prediction counts.
///
/// Rows index the true class, columns the predicted class. Accuracy, Kappa,
/// and the per-class rates all derive from these counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    n_classes: usize,
    /// Row-major `[truth, predicted]` counts.
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    /// Create an empty matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Tally (truth, predicted) pairs.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or contain out-of-range classes.
    pub fn from_predictions(n_classes: usize, truth: &[u32], predicted: &[u32]) -> Self {
        assert_eq!(truth.len(), predicted.len(), "truth/prediction length mismatch");
        let mut matrix = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            matrix.add(t, p);
        }
        matrix
    }

    /// Record one observation.
    #[inline]
    pub fn add(&mut self, truth: u32, predicted: u32) {
        assert!((truth as usize) < self.n_classes && (predicted as usize) < self.n_classes);
        self.counts[truth as usize * self.n_classes + predicted as usize] += 1;
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count for a (truth, predicted) cell.
    #[inline]
    pub fn count(&self, truth: usize, predicted: usize) -> u64 {
        self.counts[truth * self.n_classes + predicted]
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Observations of one true class.
    pub fn truth_total(&self, class: usize) -> u64 {
        (0..self.n_classes).map(|p| self.count(class, p)).sum()
    }

    /// Observations predicted as one class.
    pub fn predicted_total(&self, class: usize) -> u64 {
        (0..self.n_classes).map(|t| self.count(t, class)).sum()
    }

    /// Fraction of correct predictions. 0 for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u64 = (0..self.n_classes).map(|c| self.count(c, c)).sum();
        correct as f64 / total as f64
    }

    /// Cohen's Kappa: chance-corrected agreement `(p_o - p_e) / (1 - p_e)`.
    ///
    /// Defined as 0 when expected agreement is 1 (a degenerate single-cell
    /// matrix).
    pub fn kappa(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;

        let p_o = self.accuracy();
        let p_e: f64 = (0..self.n_classes)
            .map(|c| {
                (self.truth_total(c) as f64 / total) * (self.predicted_total(c) as f64 / total)
            })
            .sum();

        if (1.0 - p_e).abs() < 1e-12 {
            return 0.0;
        }
        (p_o - p_e) / (1.0 - p_e)
    }

    /// Per-class recall (sensitivity). NaN when the class never occurs.
    pub fn recall(&self, class: usize) -> f64 {
        let truths = self.truth_total(class);
        if truths == 0 {
            return f64::NAN;
        }
        self.count(class, class) as f64 / truths as f64
    }

    /// Per-class precision. NaN when the class is never predicted.
    pub fn precision(&self, class: usize) -> f64 {
        let predicted = self.predicted_total(class);
        if predicted == 0 {
            return f64::NAN;
        }
        self.count(class, class) as f64 / predicted as f64
    }

    /// Render an aligned count table with class names on both axes.
    ///
    /// The `Display` impl uses positional names; reports pass the real
    /// class labels here instead.
    pub fn render(&self, labels: &[String]) -> String {
        assert_eq!(labels.len(), self.n_classes, "one label per class");
        let width = labels
            .iter()
            .map(|l| l.len())
            .chain(self.counts.iter().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(5);
        let row_width = width.max("truth\\pred".len());

        let mut out = String::new();
        out.push_str(&format!("{:>row_width$} |", "truth\\pred"));
        for label in labels {
            out.push_str(&format!(" {label:>width$}"));
        }
        out.push('\n');

        for (t, label) in labels.iter().enumerate() {
            out.push_str(&format!("{label:>row_width$} |"));
            for p in 0..self.n_classes {
                out.push_str(&format!(" {:>width$}", self.count(t, p)));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = (0..self.n_classes).map(|c| format!("c{c}")).collect();
        f.write_str(&self.render(&labels))
    }
}
