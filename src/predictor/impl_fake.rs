use crate::library::cancel_token::CancelToken;
use crate::library::logger::interface::Logger;
use crate::predictor::interface::{
    DiagnosisClass, PredictError, Prediction, PredictionSet, Predictor,
};
use crate::upload::image_meta::UploadedImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;
use std::time::Duration;

/// Stand-in classifier: waits a fixed latency, then returns one of three
/// canned results at random.
pub struct PredictorFake {
    logger: Arc<dyn Logger + Send + Sync>,
    latency: Duration,
}

impl PredictorFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, latency: Duration) -> Self {
        Self {
            logger: logger.with_namespace("predictor").with_namespace("fake"),
            latency,
        }
    }
}

impl Predictor for PredictorFake {
    fn predict(
        &self,
        image: &UploadedImage,
        cancel: &CancelToken,
    ) -> Result<PredictionSet, PredictError> {
        let _ = self
            .logger
            .info(&format!("Classifying {} with fake predictor...", image.meta.name));

        if !cancel.sleep(self.latency) {
            let _ = self.logger.info("Prediction cancelled");
            return Err(PredictError::Cancelled);
        }

        let table = canned_predictions();
        let index_dist =
            Uniform::new(0, table.len()).map_err(|e| PredictError::Failed(e.to_string()))?;
        let index = index_dist.sample(&mut rand::rng());

        let _ = self
            .logger
            .info(&format!("Picked canned result #{}", index));

        Ok(table[index].clone())
    }
}

/// The fixed result table. The diagnosis of each entry is kept as-is, it is
/// not derived from the confidences.
pub fn canned_predictions() -> [PredictionSet; 3] {
    [
        canned(12.5, 78.3, 9.2, DiagnosisClass::Pneumonia),
        canned(85.7, 8.1, 6.2, DiagnosisClass::Normal),
        canned(15.3, 18.4, 66.3, DiagnosisClass::Tuberculosis),
    ]
}

fn canned(normal: f32, pneumonia: f32, tuberculosis: f32, diagnosis: DiagnosisClass) -> PredictionSet {
    PredictionSet {
        predictions: vec![
            Prediction {
                class: DiagnosisClass::Normal,
                confidence: normal,
            },
            Prediction {
                class: DiagnosisClass::Pneumonia,
                confidence: pneumonia,
            },
            Prediction {
                class: DiagnosisClass::Tuberculosis,
                confidence: tuberculosis,
            },
        ],
        diagnosis,
    }
}
