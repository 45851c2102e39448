/// Model output → prediction → display text.

use std::fmt;

use crate::error::{PipelineError, Result};

/// Number of digit classes (0-9)
pub const NUM_CLASSES: usize = 10;

/// Tolerance for treating an output vector as already normalized
const SUM_TOLERANCE: f32 = 1e-3;

/// Probability distribution over the ten digits plus its argmax
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    distribution: [f32; NUM_CLASSES],
    predicted_class: usize,
    confidence: f32,
}

impl PredictionResult {
    /// Build a prediction from a raw output vector.
    ///
    /// Probabilities are kept as they are, non-negative scores are divided
    /// by their sum and anything else is treated as logits (softmax).
    pub fn from_raw(raw: &[f32]) -> Result<Self> {
        let values: [f32; NUM_CLASSES] = raw.try_into().map_err(|_| {
            PipelineError::Inference(format!(
                "model returned {} values, expected {}",
                raw.len(),
                NUM_CLASSES
            ))
        })?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::Inference("model output contains non-finite values".to_string()));
        }

        Ok(Self::from_distribution(normalize(values)))
    }

    fn from_distribution(distribution: [f32; NUM_CLASSES]) -> Self {
        // First maximum wins on ties
        let mut predicted_class = 0;
        for (i, &p) in distribution.iter().enumerate() {
            if p > distribution[predicted_class] {
                predicted_class = i;
            }
        }

        Self {
            distribution,
            predicted_class,
            confidence: distribution[predicted_class],
        }
    }

    pub fn distribution(&self) -> &[f32; NUM_CLASSES] {
        &self.distribution
    }

    /// Predicted digit, 0-9
    pub fn predicted_class(&self) -> usize {
        self.predicted_class
    }

    /// Probability of the predicted digit, 0.0-1.0
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

fn normalize(values: [f32; NUM_CLASSES]) -> [f32; NUM_CLASSES] {
    let sum: f32 = values.iter().sum();
    let non_negative = values.iter().all(|v| *v >= 0.0);

    if non_negative && values.iter().all(|v| *v <= 1.0) && (sum - 1.0).abs() <= SUM_TOLERANCE {
        values
    } else if non_negative && sum > 0.0 {
        // Scale by the maximum first; a raw f32 sum of huge scores overflows to inf
        let max = values.iter().copied().fold(0.0f32, f32::max);
        let scaled = values.map(|v| v / max);
        let scaled_sum: f32 = scaled.iter().sum();
        scaled.map(|v| v / scaled_sum)
    } else {
        softmax(values)
    }
}

fn softmax(values: [f32; NUM_CLASSES]) -> [f32; NUM_CLASSES] {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps = values.map(|v| (v - max).exp());
    let sum: f32 = exps.iter().sum();
    exps.map(|e| e / sum)
}

/// Two-line result text for the result banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    pub digit_line: String,
    pub confidence_line: String,
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.digit_line, self.confidence_line)
    }
}

/// Render a prediction, e.g. `Predicted digit: 7` / `Confidence: 87.35%`
pub fn format(result: &PredictionResult) -> DisplayText {
    DisplayText {
        digit_line: format!("Predicted digit: {}", result.predicted_class()),
        confidence_line: format!("Confidence: {:.2}%", result.confidence() as f64 * 100.0),
    }
}
