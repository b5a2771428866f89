use crate::library::cancel_token::CancelToken;
use crate::upload::image_meta::UploadedImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisClass {
    Normal,
    Pneumonia,
    Tuberculosis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: DiagnosisClass,
    /// Percent, 0 to 100.
    pub confidence: f32,
}

/// Per-class confidences plus the class the classifier settled on. The
/// diagnosis is reported by the classifier; it is not recomputed from the
/// confidences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub predictions: Vec<Prediction>,
    pub diagnosis: DiagnosisClass,
}

impl PredictionSet {
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }

    pub fn confidence_of(&self, class: DiagnosisClass) -> Option<f32> {
        self.predictions
            .iter()
            .find(|p| p.class == class)
            .map(|p| p.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictError {
    #[error("prediction cancelled")]
    Cancelled,
    #[error("prediction failed: {0}")]
    Failed(String),
}

pub trait Predictor {
    /// Runs one prediction. Implementations must return `PredictError::Cancelled`
    /// promptly once `cancel` is raised.
    fn predict(
        &self,
        image: &UploadedImage,
        cancel: &CancelToken,
    ) -> Result<PredictionSet, PredictError>;
}
