use crate::image_classifier::interface::Prediction;
use crate::image_classifier::labels::Labels;

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|v| v / sum).collect()
}

/// True when the scores already look like a probability distribution.
fn is_distribution(scores: &[f32]) -> bool {
    let sum: f32 = scores.iter().sum();
    scores.iter().all(|&v| (0.0..=1.0).contains(&v)) && (sum - 1.0).abs() < 1e-3
}

/// Turns raw model output into the `top_k` most probable classes.
pub fn rank(scores: &[f32], labels: &Labels, top_k: usize) -> Vec<Prediction> {
    let probabilities = if is_distribution(scores) {
        scores.to_vec()
    } else {
        softmax(scores)
    };

    let mut indexed: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(top_k);

    indexed
        .into_iter()
        .map(|(index, probability)| Prediction {
            class_name: labels.name(index, scores.len()),
            probability: probability.clamp(0.0, 1.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probabilities = softmax(&[2.0, 1.0, 0.1, -3.0]);

        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probabilities[0] > probabilities[1]);
    }

    #[test]
    fn test_softmax_large_logits_stay_finite() {
        let probabilities = softmax(&[1000.0, 999.0]);

        assert!(probabilities.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_rank_sorted_and_truncated() {
        let labels = Labels::parse("cat\ndog\ncar\ncup");

        let predictions = rank(&[0.5, 3.0, -1.0, 1.0], &labels, 3);

        let names: Vec<&str> = predictions.iter().map(|p| p.class_name.as_str()).collect();
        assert_eq!(names, vec!["dog", "cup", "cat"]);
        assert!(predictions
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability));
        assert!(predictions
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.probability)));
    }

    #[test]
    fn test_rank_keeps_existing_distribution() {
        let labels = Labels::parse("cat\ndog");

        let predictions = rank(&[0.25, 0.75], &labels, 5);

        assert_eq!(predictions[0].class_name, "dog");
        assert_eq!(predictions[0].probability, 0.75);
        assert_eq!(predictions.len(), 2);
    }
}
