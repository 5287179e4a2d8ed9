//! Game accuracy from the win-percentage trajectory.
//!
//! Each move scores by how much winning chance it gave up. A side's accuracy
//! is the mean of a volatility-weighted average and a harmonic average of
//! its move scores, so calm stretches count less and single disasters count
//! more.

use shakmaty::Color;

use crate::evaluation::{Accuracy, EvaluationError, PositionEvaluation};
use crate::win_probability::position_win_percentage;

/// Accuracy per side, assuming White made the first move.
pub fn compute_accuracy(positions: &[PositionEvaluation]) -> Result<Accuracy, EvaluationError> {
    compute_accuracy_from(positions, Color::White)
}

/// Accuracy per side when `first_mover` plays the move from `positions[0]`.
pub fn compute_accuracy_from(
    positions: &[PositionEvaluation],
    first_mover: Color,
) -> Result<Accuracy, EvaluationError> {
    let win_percentages = positions
        .iter()
        .enumerate()
        .map(|(i, p)| position_win_percentage(p).ok_or(EvaluationError::MissingLines(i)))
        .collect::<Result<Vec<f64>, _>>()?;

    let accuracies = move_accuracies(&win_percentages);
    let weights = volatility_weights(&win_percentages);

    let white_parity = match first_mover {
        Color::White => 0,
        Color::Black => 1,
    };

    Ok(Accuracy {
        white: side_accuracy(&accuracies, &weights, white_parity),
        black: side_accuracy(&accuracies, &weights, 1 - white_parity),
    })
}

fn move_accuracies(win_percentages: &[f64]) -> Vec<f64> {
    win_percentages
        .windows(2)
        .map(|w| {
            let loss = (w[0] - w[1]).abs();
            let score = 103.1668 * (-0.04354 * loss).exp() - 3.1669;
            (score + 1.0).clamp(0.0, 100.0)
        })
        .collect()
}

/// Standard deviation of the win percentage around each position.
fn volatility_weights(win_percentages: &[f64]) -> Vec<f64> {
    let n = win_percentages.len();
    let window_size = n.div_ceil(10).clamp(2, 8);
    let half = (window_size + 1) / 2;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half).min(n);
            std_dev(&win_percentages[start..end]).clamp(0.5, 12.0)
        })
        .collect()
}

fn side_accuracy(accuracies: &[f64], weights: &[f64], parity: usize) -> f64 {
    let (values, value_weights): (Vec<f64>, Vec<f64>) = accuracies
        .iter()
        .zip(weights)
        .enumerate()
        .filter(|(i, _)| i % 2 == parity)
        .map(|(_, (&a, &w))| (a, w))
        .unzip();

    if values.is_empty() {
        return 100.0;
    }
    (weighted_mean(&values, &value_weights) + harmonic_mean(&values)) / 2.0
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total
}

/// A zero anywhere pulls the mean to zero.
fn harmonic_mean(values: &[f64]) -> f64 {
    let reciprocal: f64 = values.iter().map(|v| 1.0 / v).sum();
    values.len() as f64 / reciprocal
}
