//! Calibrated class probabilities
//!
//! Each pairwise decision value is mapped through its Platt sigmoid to an
//! estimate of P(first class | first or second class). With more than two
//! classes the pairwise estimates are reconciled by the coupling method of
//! Wu, Lin and Weng (2004), which minimises `p' Q p` subject to `sum(p) = 1`.

use crate::core::{InferenceConfig, Result, SVMError, SparseVector, SvmType};
use crate::model::voting;
use crate::model::Model;
use log::{trace, warn};

/// Platt sigmoid `1 / (1 + exp(A * f + B))`, evaluated without overflow
pub fn sigmoid_predict(decision_value: f64, a: f64, b: f64) -> f64 {
    let f = a * decision_value + b;
    if f >= 0.0 {
        (-f).exp() / (1.0 + (-f).exp())
    } else {
        1.0 / (1.0 + f.exp())
    }
}

/// Reconcile pairwise estimates `r[i][j] = P(i | i or j)` into one distribution
///
/// `r` is a square matrix with `r[i][j] + r[j][i] = 1` off the diagonal; the
/// diagonal is ignored. The loop runs at most `max(max_iterations, k)` times
/// and stops once every `|(Qp)_t - p'Qp|` is below `tolerance / k`.
pub fn couple_pairwise(r: &[Vec<f64>], max_iterations: usize, tolerance: f64) -> Vec<f64> {
    let k = r.len();
    if k == 0 {
        return Vec::new();
    }
    if k == 1 {
        return vec![1.0];
    }

    let mut q = vec![vec![0.0; k]; k];
    for t in 0..k {
        for j in 0..k {
            if j != t {
                q[t][t] += r[j][t] * r[j][t];
                q[t][j] = -r[j][t] * r[t][j];
            }
        }
    }

    let mut p = vec![1.0 / k as f64; k];
    let mut qp = vec![0.0; k];
    let max_iter = max_iterations.max(k);
    let eps = tolerance / k as f64;

    let mut converged = false;
    for _ in 0..max_iter {
        let mut pqp = 0.0;
        for t in 0..k {
            qp[t] = (0..k).map(|j| q[t][j] * p[j]).sum();
            pqp += p[t] * qp[t];
        }

        let max_error = qp
            .iter()
            .map(|&v| (v - pqp).abs())
            .fold(0.0, f64::max);
        if max_error < eps {
            converged = true;
            break;
        }

        for t in 0..k {
            if q[t][t] <= 0.0 {
                continue;
            }
            let diff = ((pqp - qp[t]) / q[t][t]).max(-p[t]);
            let scale = 1.0 + diff;
            if scale <= f64::EPSILON {
                continue;
            }
            p[t] += diff;
            pqp = (pqp + diff * (diff * q[t][t] + 2.0 * qp[t])) / scale / scale;
            for j in 0..k {
                qp[j] = (qp[j] + diff * q[t][j]) / scale;
                p[j] /= scale;
            }
        }
    }

    if !converged {
        warn!("pairwise coupling stopped after {max_iter} iterations without converging");
    }

    for value in p.iter_mut() {
        if value.is_nan() || *value < 0.0 {
            *value = 0.0;
        }
    }
    let total: f64 = p.iter().sum();
    if total > 0.0 && total.is_finite() {
        p.iter_mut().for_each(|v| *v /= total);
    } else {
        p = vec![1.0 / k as f64; k];
    }
    p
}

impl Model {
    /// Whether the model carries Platt parameters for its classifier pairs
    pub fn has_probability_model(&self) -> bool {
        self.svm_type.is_classification() && self.prob_a.is_some() && self.prob_b.is_some()
    }

    /// Probability of each class, in internal class order
    pub fn predict_probabilities(&self, query: &SparseVector) -> Result<Vec<f64>> {
        self.ensure_probability_model()?;
        let decision_values = self.decision_values(query)?;
        self.probabilities_from_decision_values(&decision_values)
    }

    /// Most probable label together with the full distribution
    pub fn predict_with_probabilities(&self, query: &SparseVector) -> Result<(f64, Vec<f64>)> {
        let probabilities = self.predict_probabilities(query)?;
        let label = self.class_labels[voting::most_probable(&probabilities)];
        Ok((label, probabilities))
    }

    /// Laplace scale of the residual distribution of a calibrated regression model
    pub fn svr_probability(&self) -> Result<f64> {
        match (self.svm_type, self.prob_a.as_deref()) {
            (SvmType::EpsilonSvr | SvmType::NuSvr, Some([scale, ..])) => Ok(*scale),
            _ => Err(SVMError::ProbabilityUnavailable),
        }
    }

    pub(crate) fn probabilities_from_decision_values(&self, decision_values: &[f64]) -> Result<Vec<f64>> {
        let (prob_a, prob_b) = self.ensure_probability_model()?;
        let k = self.class_count;
        let r = pairwise_probabilities(self, decision_values, prob_a, prob_b, &self.config);

        let probabilities = if k == 2 {
            vec![r[0][1], r[1][0]]
        } else {
            couple_pairwise(
                &r,
                self.config.max_coupling_iterations,
                self.config.coupling_tolerance,
            )
        };
        trace!("class probabilities {probabilities:?}");
        Ok(probabilities)
    }

    fn ensure_probability_model(&self) -> Result<(&[f64], &[f64])> {
        if !self.svm_type.is_classification() {
            return Err(SVMError::ProbabilityUnavailable);
        }
        match (self.prob_a.as_deref(), self.prob_b.as_deref()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(SVMError::ProbabilityUnavailable),
        }
    }
}

fn pairwise_probabilities(
    model: &Model,
    decision_values: &[f64],
    prob_a: &[f64],
    prob_b: &[f64],
    config: &InferenceConfig,
) -> Vec<Vec<f64>> {
    let k = model.class_count;
    let min_prob = config.min_probability;
    let mut r = vec![vec![0.0; k]; k];
    for (p, pair) in model.layout.pairs().iter().enumerate() {
        let mut estimate = sigmoid_predict(decision_values[p], prob_a[p], prob_b[p]);
        // an undefined decision value (inf - inf from kernel overflow) favours neither class
        if estimate.is_nan() {
            estimate = 0.5;
        }
        let estimate = estimate.clamp(min_prob, 1.0 - min_prob);
        r[pair.first][pair.second] = estimate;
        r[pair.second][pair.first] = 1.0 - estimate;
    }
    r
}
