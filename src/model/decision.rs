//! Pairwise decision values
//!
//! For a query x the kernel column K(x, sv_v) is computed once for every
//! support vector and shared by all decision functions. Decision value p of
//! the pair (i, j) is
//!
//! ```text
//! sum_{v in class i} coef[j-1][v] * K(x, sv_v) + sum_{v in class j} coef[i][v] * K(x, sv_v) - rho[p]
//! ```

use crate::core::{Result, SVMError, SparseVector};
use crate::kernel::Kernel;
use crate::model::layout::PairSlice;
use crate::model::Model;

impl Model {
    /// Kernel value between the query and every stored support vector
    pub fn kernel_column(&self, query: &SparseVector) -> Result<Vec<f64>> {
        query.check_well_formed()?;
        Ok(self
            .support_vectors
            .iter()
            .map(|sv| self.kernel.compute(query, sv))
            .collect())
    }

    /// One decision value per class pair, in canonical pair order
    ///
    /// Regression and one-class models yield a single value. A one-class
    /// classifier (a single label) yields none.
    pub fn decision_values(&self, query: &SparseVector) -> Result<Vec<f64>> {
        let column = self.kernel_column(query)?;
        Ok(self
            .layout
            .pairs()
            .iter()
            .zip(&self.rho)
            .map(|(pair, rho)| self.pair_sum(pair, |v| column[v]) - rho)
            .collect())
    }

    /// Decision value of a single pair, evaluating only the kernels it needs
    pub fn pair_decision_value(&self, pair_index: usize, query: &SparseVector) -> Result<f64> {
        let pair = self.layout.pairs().get(pair_index).ok_or_else(|| {
            SVMError::InvalidParameter(format!(
                "pair index {pair_index} out of range ({} pairs)",
                self.layout.pairs().len()
            ))
        })?;
        query.check_well_formed()?;
        let sum = self.pair_sum(pair, |v| self.kernel.compute(query, &self.support_vectors[v]));
        Ok(sum - self.rho[pair_index])
    }

    fn pair_sum<F: Fn(usize) -> f64>(&self, pair: &PairSlice, kernel_value: F) -> f64 {
        pair.members()
            .map(|(v, row)| self.dual_coefficients[row][v] * kernel_value(v))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{SVMError, SparseVector, SvmType};
    use crate::kernel::KernelConfig;
    use crate::model::{Model, ModelBuilder};
    use approx::assert_relative_eq;

    fn two_class() -> Model {
        ModelBuilder::new(SvmType::CSvc, KernelConfig::linear())
            .class_labels(vec![1.0, 2.0])
            .support_vector_counts(vec![1, 1])
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![0], vec![-1.0]),
            ])
            .dual_coefficients(vec![vec![1.0, 1.0]])
            .rho(vec![0.0])
            .build()
            .unwrap()
    }

    fn three_class() -> Model {
        ModelBuilder::new(SvmType::CSvc, KernelConfig::rbf(0.5))
            .class_labels(vec![10.0, 20.0, 30.0])
            .support_vector_counts(vec![2, 1, 2])
            .support_vectors(vec![
                SparseVector::new(vec![1, 2], vec![1.0, 0.0]),
                SparseVector::new(vec![1, 2], vec![1.2, 0.3]),
                SparseVector::new(vec![1, 2], vec![-1.0, 1.0]),
                SparseVector::new(vec![1, 2], vec![0.0, -1.0]),
                SparseVector::new(vec![2], vec![-1.5]),
            ])
            .dual_coefficients(vec![
                vec![0.7, 0.3, -1.0, 0.4, 0.2],
                vec![0.5, 0.1, 0.6, -0.3, -0.3],
            ])
            .rho(vec![0.1, -0.2, 0.05])
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_class_zero_decision_value() {
        // K(x, sv0) = 0, K(x, sv1) = 0 for the zero query
        let model = two_class();
        let dv = model.decision_values(&SparseVector::empty()).unwrap();
        assert_eq!(dv, vec![0.0]);
    }

    #[test]
    fn test_two_class_decision_value() {
        let model = two_class();
        let dv = model
            .decision_values(&SparseVector::new(vec![0], vec![2.0]))
            .unwrap();
        // 1 * 2 + 1 * (-2) - 0
        assert_relative_eq!(dv[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_three_class_manual_sum() {
        let model = three_class();
        let query = SparseVector::new(vec![1, 2], vec![0.5, 0.5]);
        let column = model.kernel_column(&query).unwrap();
        let coef = model.dual_coefficients();
        let dv = model.decision_values(&query).unwrap();

        // (0,1): class 0 uses row 0, class 1 uses row 0
        let expected01 = coef[0][0] * column[0] + coef[0][1] * column[1] + coef[0][2] * column[2] - 0.1;
        // (0,2): class 0 uses row 1, class 2 uses row 0
        let expected02 = coef[1][0] * column[0]
            + coef[1][1] * column[1]
            + coef[0][3] * column[3]
            + coef[0][4] * column[4]
            + 0.2;
        // (1,2): class 1 uses row 1, class 2 uses row 1
        let expected12 = coef[1][2] * column[2] + coef[1][3] * column[3] + coef[1][4] * column[4] - 0.05;

        assert_eq!(dv.len(), 3);
        assert_relative_eq!(dv[0], expected01, epsilon = 1e-12);
        assert_relative_eq!(dv[1], expected02, epsilon = 1e-12);
        assert_relative_eq!(dv[2], expected12, epsilon = 1e-12);
    }

    #[test]
    fn test_pair_recompute_matches_shared_column() {
        let model = three_class();
        let query = SparseVector::new(vec![1, 2], vec![-0.3, 0.8]);
        let dv = model.decision_values(&query).unwrap();
        for (p, &value) in dv.iter().enumerate() {
            let single = model.pair_decision_value(p, &query).unwrap();
            assert!((single - value).abs() <= 1e-9);
        }
        assert!(matches!(
            model.pair_decision_value(3, &query),
            Err(SVMError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_regression_single_value() {
        let model = ModelBuilder::new(SvmType::EpsilonSvr, KernelConfig::linear())
            .support_vectors(vec![
                SparseVector::new(vec![0], vec![1.0]),
                SparseVector::new(vec![1], vec![1.0]),
            ])
            .dual_coefficients(vec![vec![2.0, -1.0]])
            .rho(vec![0.5])
            .build()
            .unwrap();
        let dv = model
            .decision_values(&SparseVector::new(vec![0, 1], vec![1.0, 3.0]))
            .unwrap();
        // 2 * 1 - 1 * 3 - 0.5
        assert_eq!(dv, vec![-1.5]);
    }

    #[test]
    fn test_malformed_query_rejected() {
        let model = two_class();
        let query = SparseVector {
            indices: vec![2, 2],
            values: vec![1.0, 1.0],
        };
        assert!(matches!(
            model.decision_values(&query),
            Err(SVMError::InvalidParameter(_))
        ));

        let query = SparseVector {
            indices: vec![1],
            values: vec![f64::NAN],
        };
        assert!(matches!(
            model.pair_decision_value(0, &query),
            Err(SVMError::InvalidParameter(_))
        ));
    }
}
