pub mod data_url;
pub mod error;
pub mod models;
pub mod render;
pub mod upload;
pub mod workflow;

pub use error::ClassifyError;
pub use models::{ClassProbabilities, ClassificationRequest, ClassificationResult};
pub use render::{PredictionView, ProbabilityLine, ResultView};
pub use upload::{UploadId, UploadSource};
pub use workflow::{Classifier, Outcome, ResultSurface, Stage};
