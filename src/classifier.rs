use std::path::Path;

use image::DynamicImage;
use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::ServiceError;
use crate::labels::LabelTable;
use crate::preprocessing::{self, Normalization};

/// Forward pass over a preprocessed batch of one image, one score per class.
pub trait Predictor: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, ServiceError>;
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

pub struct OnnxPredictor {
    model: OnnxPlan,
}

impl OnnxPredictor {
    pub fn load(path: &Path, input_shape: [usize; 4]) -> TractResult<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact(input_shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(OnnxPredictor { model })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, ServiceError> {
        let shape = input.shape().to_vec();
        let data = input.into_raw_vec();
        let tensor = Tensor::from_shape(&shape, &data)
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let result = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let output = result
            .first()
            .ok_or_else(|| ServiceError::Inference("model produced no outputs".into()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        Ok(scores.iter().copied().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }

    pub fn message(&self) -> String {
        format!(
            "Clase predicha: {}, Porcentaje de confianza: {:.2}%",
            self.label,
            self.confidence_percent()
        )
    }
}

/// Index of the highest score. Ties keep the first index; NaN never wins.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .fold(None, |best, (index, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((index, score)),
        })
}

/// The model handle: weights, label table and the preprocessing they expect.
pub struct Classifier {
    predictor: Box<dyn Predictor>,
    labels: LabelTable,
    normalization: Normalization,
}

impl Classifier {
    pub fn new(
        predictor: Box<dyn Predictor>,
        labels: LabelTable,
        normalization: Normalization,
    ) -> Self {
        Classifier {
            predictor,
            labels,
            normalization,
        }
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn classify_file(&self, path: &Path) -> Result<Prediction, ServiceError> {
        let img = image::open(path).map_err(ServiceError::InvalidImage)?;
        self.classify(&img)
    }

    pub fn classify(&self, img: &DynamicImage) -> Result<Prediction, ServiceError> {
        let input = preprocessing::to_input_tensor(img, self.normalization);
        let scores = self.predictor.predict(input)?;

        let (index, confidence) = argmax(&scores)
            .ok_or_else(|| ServiceError::Inference("model returned no scores".into()))?;
        let label = self.labels.get(index).ok_or_else(|| {
            ServiceError::Internal(format!(
                "class index {} outside label table of {} entries",
                index,
                self.labels.len()
            ))
        })?;

        Ok(Prediction {
            index,
            label: label.to_string(),
            confidence,
        })
    }
}
