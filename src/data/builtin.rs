use crate::data::dataset::Dataset;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Built-in toy datasets
// ---------------------------------------------------------------------------

/// The XOR dataset: 4 samples, 2 inputs, 2 one-hot classes.
pub fn builtin_xor() -> Result<Dataset> {
    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let labels = vec![
        vec![1.0, 0.0], // XOR = 0
        vec![0.0, 1.0], // XOR = 1
        vec![0.0, 1.0], // XOR = 1
        vec![1.0, 0.0], // XOR = 0
    ];
    Dataset::from_rows(inputs, labels)
}

/// `n` samples of 2D data in `n_classes` blobs placed evenly on a circle
/// inside the unit square. Fully deterministic.
pub fn builtin_blobs(n: usize, n_classes: usize) -> Result<Dataset> {
    use std::f64::consts::PI;
    let n_classes = n_classes.max(1);
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % n_classes;
        let theta = 2.0 * PI * class as f64 / n_classes as f64;
        let (cx, cy) = (0.5 + 0.3 * theta.cos(), 0.5 + 0.3 * theta.sin());
        // Deterministic spread from the sample index.
        let angle = i as f64 * 2.399;
        let r = 0.08 * (i as f64 * 0.31).sin().abs();
        inputs.push(vec![
            (cx + r * angle.cos()).clamp(0.0, 1.0),
            (cy + r * angle.sin()).clamp(0.0, 1.0),
        ]);
        let mut one_hot = vec![0.0; n_classes];
        one_hot[class] = 1.0;
        labels.push(one_hot);
    }
    Dataset::from_rows(inputs, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_cycle_through_classes() {
        let ds = builtin_blobs(9, 3).unwrap();
        assert_eq!(ds.len(), 9);
        assert_eq!(ds.class_count(), 3);
        assert_eq!(ds.labels.data[4], vec![0.0, 1.0, 0.0]);
        assert!(ds.inputs.data.iter().flatten().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn xor_has_four_samples() {
        let ds = builtin_xor().unwrap();
        assert_eq!((ds.len(), ds.feature_count(), ds.class_count()), (4, 2, 2));
    }
}
