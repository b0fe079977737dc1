//! Performance measures for a model over a labelled dataset
//!
//! An [`Evaluator`] accumulates `(actual, predicted)` pairs one at a time and
//! reports a single score where higher is better. Labels are compared
//! exactly, as they are read from the data and the model.

use crate::core::{Dataset, Result, SVMError};
use crate::model::Model;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Incremental performance measure
pub trait Evaluator {
    /// Record one prediction against its true label
    fn add_result(&mut self, actual: f64, predicted: f64);

    /// Current score; 0 before any result has been recorded
    fn value(&self) -> f64;

    /// Short name used in reports
    fn name(&self) -> String;

    /// Whether this score beats `other`; anything beats no result at all
    fn better_than(&self, other: Option<&dyn Evaluator>) -> bool {
        match other {
            Some(other) => self.value() > other.value(),
            None => true,
        }
    }
}

/// Percentage of correct predictions
#[derive(Debug, Clone, Default)]
pub struct OverallAccuracy {
    correct: usize,
    total: usize,
}

impl OverallAccuracy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for OverallAccuracy {
    fn add_result(&mut self, actual: f64, predicted: f64) {
        self.total += 1;
        if actual == predicted {
            self.correct += 1;
        }
    }

    fn value(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.correct as f64 / self.total as f64
        }
    }

    fn name(&self) -> String {
        "accuracy (%)".to_string()
    }
}

/// Geometric mean of the per-class recall over every class seen as a true label
#[derive(Debug, Clone, Default)]
pub struct GeometricMean {
    // (label, seen, correct)
    classes: Vec<(f64, usize, usize)>,
}

impl GeometricMean {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for GeometricMean {
    fn add_result(&mut self, actual: f64, predicted: f64) {
        let correct = usize::from(actual == predicted);
        match self.classes.iter_mut().find(|(label, _, _)| *label == actual) {
            Some((_, seen, hits)) => {
                *seen += 1;
                *hits += correct;
            }
            None => self.classes.push((actual, 1, correct)),
        }
    }

    fn value(&self) -> f64 {
        if self.classes.is_empty() {
            return 0.0;
        }
        let product: f64 = self
            .classes
            .iter()
            .map(|&(_, seen, hits)| hits as f64 / seen as f64)
            .product();
        product.powf(1.0 / self.classes.len() as f64)
    }

    fn name(&self) -> String {
        "geometric mean".to_string()
    }
}

/// Fraction of predictions of one class that were correct
///
/// This is TP / (TP + FP). svm_toolkit's `ClassPrecision` reports
/// TP / (TP + FN) under this name, which is [`ClassRecall`] here, so
/// numbers carried over from it swap between the two evaluators.
#[derive(Debug, Clone)]
pub struct ClassPrecision {
    label: f64,
    predicted: usize,
    correct: usize,
}

impl ClassPrecision {
    pub fn new(label: f64) -> Self {
        Self {
            label,
            predicted: 0,
            correct: 0,
        }
    }
}

impl Evaluator for ClassPrecision {
    fn add_result(&mut self, actual: f64, predicted: f64) {
        if predicted == self.label {
            self.predicted += 1;
            if actual == self.label {
                self.correct += 1;
            }
        }
    }

    fn value(&self) -> f64 {
        if self.predicted == 0 {
            0.0
        } else {
            self.correct as f64 / self.predicted as f64
        }
    }

    fn name(&self) -> String {
        format!("precision of class {}", self.label)
    }
}

/// Fraction of instances of one class that were predicted as that class
///
/// This is TP / (TP + FN), reported by svm_toolkit as `ClassPrecision`.
/// See [`ClassPrecision`].
#[derive(Debug, Clone)]
pub struct ClassRecall {
    label: f64,
    actual: usize,
    correct: usize,
}

impl ClassRecall {
    pub fn new(label: f64) -> Self {
        Self {
            label,
            actual: 0,
            correct: 0,
        }
    }
}

impl Evaluator for ClassRecall {
    fn add_result(&mut self, actual: f64, predicted: f64) {
        if actual == self.label {
            self.actual += 1;
            if predicted == self.label {
                self.correct += 1;
            }
        }
    }

    fn value(&self) -> f64 {
        if self.actual == 0 {
            0.0
        } else {
            self.correct as f64 / self.actual as f64
        }
    }

    fn name(&self) -> String {
        format!("recall of class {}", self.label)
    }
}

/// Evaluator families selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Accuracy,
    GeometricMean,
    Precision,
    Recall,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::GeometricMean => "geometric-mean",
            Metric::Precision => "precision",
            Metric::Recall => "recall",
        }
    }

    /// Fresh evaluator; precision and recall need the class they score
    pub fn evaluator(&self, class: Option<f64>) -> Result<Box<dyn Evaluator>> {
        let needs_class = || {
            class.ok_or_else(|| {
                SVMError::InvalidParameter(format!("the {} metric needs a class label", self.name()))
            })
        };
        let evaluator: Box<dyn Evaluator> = match self {
            Metric::Accuracy => Box::new(OverallAccuracy::new()),
            Metric::GeometricMean => Box::new(GeometricMean::new()),
            Metric::Precision => Box::new(ClassPrecision::new(needs_class()?)),
            Metric::Recall => Box::new(ClassRecall::new(needs_class()?)),
        };
        Ok(evaluator)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = SVMError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "accuracy" => Ok(Metric::Accuracy),
            "geometric-mean" | "gmean" => Ok(Metric::GeometricMean),
            "precision" => Ok(Metric::Precision),
            "recall" => Ok(Metric::Recall),
            other => Err(SVMError::InvalidParameter(format!("unknown metric: {other}"))),
        }
    }
}

impl Model {
    /// Predict every sample of `dataset` and feed the results to `evaluator`
    pub fn evaluate_dataset<D, E>(&self, dataset: &D, evaluator: &mut E) -> Result<()>
    where
        D: Dataset + ?Sized,
        E: Evaluator + ?Sized,
    {
        self.evaluate_dataset_with(dataset, evaluator, |_, _, _| {})
    }

    /// Like [`Model::evaluate_dataset`], also reporting each
    /// `(index, predicted, actual)` as it is scored
    pub fn evaluate_dataset_with<D, E, F>(
        &self,
        dataset: &D,
        evaluator: &mut E,
        mut on_result: F,
    ) -> Result<()>
    where
        D: Dataset + ?Sized,
        E: Evaluator + ?Sized,
        F: FnMut(usize, f64, f64),
    {
        for i in 0..dataset.len() {
            let sample = dataset.get_sample(i);
            let predicted = self.predict(&sample.features)?;
            evaluator.add_result(sample.label, predicted);
            on_result(i, predicted, sample.label);
        }
        debug!(
            "evaluated {} samples: {} = {}",
            dataset.len(),
            evaluator.name(),
            evaluator.value()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // (actual, predicted)
    const MIXED: [(f64, f64); 7] = [
        (0.0, 0.0),
        (0.0, 0.0),
        (0.0, 0.0),
        (0.0, 1.0),
        (1.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
    ];

    fn score<E: Evaluator>(mut evaluator: E, results: &[(f64, f64)]) -> f64 {
        for &(actual, predicted) in results {
            evaluator.add_result(actual, predicted);
        }
        evaluator.value()
    }

    #[test]
    fn test_overall_accuracy() {
        let mut performance = OverallAccuracy::new();
        assert_eq!(performance.value(), 0.0);
        performance.add_result(0.0, 0.0);
        assert_eq!(performance.value(), 100.0);
        performance.add_result(1.0, 0.0);
        assert_eq!(performance.value(), 50.0);

        let mut other = OverallAccuracy::new();
        assert!(performance.better_than(Some(&other)));
        assert!(performance.better_than(None));
        other.add_result(1.0, 1.0);
        other.add_result(1.0, 1.0);
        assert!(!performance.better_than(Some(&other)));
    }

    #[test]
    fn test_geometric_mean() {
        let mut performance = GeometricMean::new();
        assert_eq!(performance.value(), 0.0);
        performance.add_result(0.0, 0.0);
        assert_eq!(performance.value(), 1.0);
        performance.add_result(0.0, 1.0);
        performance.add_result(1.0, 1.0);
        assert!((0.707 - performance.value()).abs() < 0.01);
        performance.add_result(1.0, 1.0);
        performance.add_result(1.0, 0.0);
        assert!((0.577 - performance.value()).abs() < 0.01);
    }

    #[test]
    fn test_class_precision() {
        // 3 of the 5 predicted 0s are right, 1 of the 2 predicted 1s
        assert_relative_eq!(score(ClassPrecision::new(0.0), &MIXED), 0.6);
        assert_relative_eq!(score(ClassPrecision::new(1.0), &MIXED), 0.5);
        assert_eq!(score(ClassPrecision::new(2.0), &MIXED), 0.0);
    }

    #[test]
    fn test_class_recall() {
        // 3 of the 4 actual 0s are found, 1 of the 3 actual 1s
        assert_relative_eq!(score(ClassRecall::new(0.0), &MIXED), 0.75);
        assert_relative_eq!(score(ClassRecall::new(1.0), &MIXED), 1.0 / 3.0);
    }

    #[test]
    fn test_metric_selection() {
        assert_eq!("geometric-mean".parse::<Metric>().unwrap(), Metric::GeometricMean);
        assert!("f1".parse::<Metric>().is_err());

        assert!(Metric::Accuracy.evaluator(None).is_ok());
        assert!(matches!(
            Metric::Precision.evaluator(None),
            Err(SVMError::InvalidParameter(_))
        ));
        let recall = Metric::Recall.evaluator(Some(1.0)).unwrap();
        assert_eq!(recall.name(), "recall of class 1");
    }
}
