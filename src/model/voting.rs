//! One-vs-one majority voting

use crate::model::layout::PairSlice;

/// Votes received by each class
///
/// A strictly positive decision value votes for the pair's first class,
/// anything else (including exactly zero) for the second.
pub fn tally(class_count: usize, pairs: &[PairSlice], decision_values: &[f64]) -> Vec<usize> {
    let mut votes = vec![0; class_count];
    for (pair, &value) in pairs.iter().zip(decision_values) {
        if value > 0.0 {
            votes[pair.first] += 1;
        } else {
            votes[pair.second] += 1;
        }
    }
    votes
}

/// Internal index of the class with the most votes, lowest index on ties
pub fn one_vs_one_winner(class_count: usize, pairs: &[PairSlice], decision_values: &[f64]) -> usize {
    let votes = tally(class_count, pairs, decision_values);
    first_max_by(&votes, |a, b| a > b)
}

/// Index of the largest probability, lowest index on ties
pub fn most_probable(probabilities: &[f64]) -> usize {
    first_max_by(probabilities, |a, b| a > b)
}

fn first_max_by<T: Copy, F: Fn(T, T) -> bool>(values: &[T], greater: F) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if greater(value, values[best]) {
            best = i;
        }
    }
    best
}
