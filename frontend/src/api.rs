use async_trait::async_trait;
use gloo_net::http::Request;
use shared::workflow::Classifier;
use shared::{ClassificationRequest, ClassificationResult, ClassifyError};

/// Posts uploads as JSON to the classification endpoint.
pub struct HttpClassifier {
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpClassifier { endpoint: endpoint.into() }
    }
}

fn network_error(err: gloo_net::Error) -> ClassifyError {
    ClassifyError::NetworkError(err.to_string())
}

#[async_trait(?Send)]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifyError> {
        let body = serde_json::to_string(request)?;

        let response = Request::post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;

        if !response.ok() {
            return Err(ClassifyError::ServerError(response.status()));
        }

        response.json::<ClassificationResult>().await.map_err(network_error)
    }
}
