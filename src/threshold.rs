//! Discrimination-threshold search over training-set probabilities.
//!
//! Given each training document's predicted probability and true class, the
//! optimizer picks the probability cut-point minimizing misclassifications,
//! or fixes it at 0.5 when locked. Within this module a probability equal to
//! the candidate threshold counts as predicted-positive.

use crate::metrics;

/// A chosen threshold and the confusion counts of the resulting split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSearch {
    /// Chosen probability cut-point.
    pub threshold: f64,
    /// Documents positive in truth and in prediction.
    pub both_pos: usize,
    /// Documents negative in truth and in prediction.
    pub both_neg: usize,
    /// Documents positive in truth.
    pub actual_pos: usize,
    /// Documents predicted positive.
    pub predicted_pos: usize,
}

impl ThresholdSearch {
    /// Misclassified document count for this split, given `n` documents.
    #[must_use]
    pub fn discrepancies(&self, n: usize) -> usize {
        n - self.both_pos - self.both_neg
    }

    /// Training-set accuracy of this split.
    #[must_use]
    pub fn accuracy(&self, n: usize) -> f64 {
        metrics::accuracy_from_counts(n, self.both_pos, self.both_neg)
    }

    /// Cohen's kappa of this split.
    #[must_use]
    pub fn kappa(&self, n: usize) -> f64 {
        metrics::cohen_kappa(
            n,
            self.both_pos,
            self.both_neg,
            self.actual_pos,
            self.predicted_pos,
        )
    }
}

/// Pick the threshold minimizing misclassifications over `outcomes`, each a
/// `(probability, is_positive)` pair from the training set.
///
/// With `lock` set the threshold is exactly 0.5 and the counts are taken
/// directly from that split. Otherwise candidates are the positive-class
/// probabilities scanned in ascending order; at sorted position `i` the
/// discrepancy count is `i` (positives below the candidate) plus the number
/// of negative-class probabilities at or above it. Ties resolve to the first
/// (lowest) minimal candidate of the scan.
///
/// When the positive and negative probability ranges do not overlap at all,
/// the threshold is the midpoint of the gap and the split is perfect; this
/// case is handled before the scan.
///
/// # Examples
///
/// ```
/// use clasificar::threshold::optimize_threshold;
///
/// let outcomes = vec![
///     (0.6, true), (0.7, true), (0.9, true),
///     (0.1, false), (0.3, false), (0.65, false),
/// ];
/// let search = optimize_threshold(&outcomes, false);
/// assert_eq!(search.threshold, 0.6);
/// assert_eq!(search.discrepancies(6), 1);
/// ```
#[must_use]
pub fn optimize_threshold(outcomes: &[(f64, bool)], lock: bool) -> ThresholdSearch {
    let mut positives: Vec<f64> = outcomes
        .iter()
        .filter(|(_, is_pos)| *is_pos)
        .map(|(p, _)| *p)
        .collect();
    let mut negatives: Vec<f64> = outcomes
        .iter()
        .filter(|(_, is_pos)| !*is_pos)
        .map(|(p, _)| *p)
        .collect();
    positives.sort_by(f64::total_cmp);
    negatives.sort_by(f64::total_cmp);

    if lock || positives.is_empty() || negatives.is_empty() {
        return counts_at(0.5, &positives, &negatives);
    }

    // Non-overlapping ranges: the general scan cannot see the gap, so the
    // midpoint case is handled explicitly.
    let max_neg = negatives[negatives.len() - 1];
    let min_pos = positives[0];
    if max_neg < min_pos {
        return ThresholdSearch {
            threshold: (max_neg + min_pos) / 2.0,
            both_pos: positives.len(),
            both_neg: negatives.len(),
            actual_pos: positives.len(),
            predicted_pos: positives.len(),
        };
    }

    let mut best_threshold = positives[0];
    let mut best_discrepancies = usize::MAX;
    for (i, &candidate) in positives.iter().enumerate() {
        let wrongly_positive =
            negatives.len() - negatives.partition_point(|&p| p < candidate);
        let discrepancies = i + wrongly_positive;
        if discrepancies < best_discrepancies {
            best_discrepancies = discrepancies;
            best_threshold = candidate;
        }
    }

    counts_at(best_threshold, &positives, &negatives)
}

/// Confusion counts for the split at `threshold`, treating a probability
/// equal to the threshold as predicted-positive.
fn counts_at(threshold: f64, positives: &[f64], negatives: &[f64]) -> ThresholdSearch {
    let true_pos = positives.iter().filter(|&&p| p >= threshold).count();
    let false_pos = negatives.iter().filter(|&&p| p >= threshold).count();
    ThresholdSearch {
        threshold,
        both_pos: true_pos,
        both_neg: negatives.len() - false_pos,
        actual_pos: positives.len(),
        predicted_pos: true_pos + false_pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(pos: &[f64], neg: &[f64]) -> Vec<(f64, bool)> {
        pos.iter()
            .map(|&p| (p, true))
            .chain(neg.iter().map(|&p| (p, false)))
            .collect()
    }

    #[test]
    fn picks_lowest_of_tied_candidates() {
        // Candidates 0.6 and 0.7 both leave one discrepancy; the ascending
        // scan must keep the first.
        let data = outcomes(&[0.6, 0.7, 0.9], &[0.1, 0.3, 0.65]);
        let search = optimize_threshold(&data, false);
        assert_eq!(search.threshold, 0.6);
        assert_eq!(search.discrepancies(6), 1);
        assert_eq!(search.both_pos, 3);
        assert_eq!(search.both_neg, 2);
        assert_eq!(search.actual_pos, 3);
        assert_eq!(search.predicted_pos, 4);
    }

    #[test]
    fn locked_threshold_is_half() {
        let data = outcomes(&[0.9, 0.4], &[0.2, 0.6]);
        let search = optimize_threshold(&data, true);
        assert_eq!(search.threshold, 0.5);
        assert_eq!(search.both_pos, 1);
        assert_eq!(search.both_neg, 1);
        assert_eq!(search.predicted_pos, 2);
        assert_eq!(search.discrepancies(4), 2);
    }

    #[test]
    fn non_overlapping_ranges_use_the_midpoint() {
        let data = outcomes(&[0.8, 0.9], &[0.1, 0.2]);
        let search = optimize_threshold(&data, false);
        assert!((search.threshold - 0.5).abs() < 1e-12);
        assert_eq!(search.discrepancies(4), 0);
        assert_eq!(search.both_pos, 2);
        assert_eq!(search.both_neg, 2);
    }

    #[test]
    fn midpoint_sits_between_the_ranges() {
        let data = outcomes(&[0.7], &[0.3, 0.4]);
        let search = optimize_threshold(&data, false);
        assert!((search.threshold - 0.55).abs() < 1e-12);
        assert_eq!(search.discrepancies(3), 0);
    }

    #[test]
    fn strictly_best_candidate_wins() {
        let data = outcomes(&[0.3, 0.7, 0.9], &[0.35, 0.5]);
        let search = optimize_threshold(&data, false);
        assert_eq!(search.threshold, 0.7);
        assert_eq!(search.discrepancies(5), 1);
    }

    #[test]
    fn duplicate_probabilities_do_not_break_the_scan() {
        let data = outcomes(&[0.5, 0.5, 0.5], &[0.5, 0.2]);
        let search = optimize_threshold(&data, false);
        assert_eq!(search.threshold, 0.5);
        assert_eq!(search.both_pos, 3);
        assert_eq!(search.both_neg, 1);
    }

    #[test]
    fn single_class_input_falls_back_to_half() {
        let data = outcomes(&[0.9, 0.8], &[]);
        let search = optimize_threshold(&data, false);
        assert_eq!(search.threshold, 0.5);
        assert_eq!(search.both_pos, 2);
    }

    #[test]
    fn accuracy_and_kappa_helpers_agree_with_counts() {
        let data = outcomes(&[0.8, 0.9], &[0.1, 0.2]);
        let search = optimize_threshold(&data, false);
        assert!((search.accuracy(4) - 1.0).abs() < 1e-12);
        assert!((search.kappa(4) - 1.0).abs() < 1e-12);
    }
}
