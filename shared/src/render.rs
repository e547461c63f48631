use crate::error::ClassifyError;
use crate::models::ClassificationResult;

pub const LOADING_MESSAGE: &str = "Classifying image...";

/// What the result area currently shows. Each new view replaces the previous
/// one entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultView {
    #[default]
    Empty,
    Loading,
    Failure(String),
    Prediction(PredictionView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub class_name: String,
    pub confidence: String,
    pub probabilities: Option<Vec<ProbabilityLine>>,
    pub input_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityLine {
    pub name: String,
    pub value: String,
}

/// `0.873` -> `"87.3%"`.
pub fn format_percentage(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

impl ResultView {
    pub fn failure(err: &ClassifyError) -> Self {
        ResultView::Failure(err.to_string())
    }

    /// Builds the view for a successfully decoded reply. A server supplied
    /// `error` wins over everything else.
    pub fn from_result(result: &ClassificationResult) -> Self {
        if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
            return ResultView::Failure(error.to_string());
        }

        let class_name = result.predicted_class.as_deref().filter(|c| !c.is_empty());
        let confidence = result.confidence.filter(|c| *c != 0.0 && !c.is_nan());
        let (Some(class_name), Some(confidence)) = (class_name, confidence) else {
            return ResultView::failure(&ClassifyError::MalformedResult);
        };

        let probabilities = result.class_probabilities.as_ref().map(|probs| {
            probs
                .iter()
                .map(|(name, prob)| ProbabilityLine {
                    name: name.to_string(),
                    value: format_percentage(prob),
                })
                .collect()
        });

        ResultView::Prediction(PredictionView {
            class_name: class_name.to_string(),
            confidence: format!("Confidence: {}", format_percentage(confidence)),
            probabilities,
            input_type: result
                .input_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| format!("Input type: {}", t)),
        })
    }

    /// Flattens the view into the lines a user would read, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        match self {
            ResultView::Empty => Vec::new(),
            ResultView::Loading => vec![LOADING_MESSAGE.to_string()],
            ResultView::Failure(message) => vec![message.clone()],
            ResultView::Prediction(prediction) => {
                let mut lines = vec![prediction.class_name.clone(), prediction.confidence.clone()];
                if let Some(probabilities) = &prediction.probabilities {
                    lines.extend(probabilities.iter().map(|p| format!("{} {}", p.name, p.value)));
                }
                lines.extend(prediction.input_type.iter().cloned());
                lines
            }
        }
    }
}
