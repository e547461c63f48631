//! One upload from the moment a file is handed over until the result area
//! shows something: validate, read, submit, render. Every suspension point
//! is an `.await`, and the uploading flag is held by a guard so that every
//! exit path clears it.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use strum_macros::Display;

use crate::data_url;
use crate::error::ClassifyError;
use crate::models::{ClassificationRequest, ClassificationResult};
use crate::render::ResultView;
use crate::upload::{self, UploadId, UploadSource};

#[async_trait(?Send)]
pub trait Classifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifyError>;
}

/// The visible parts the workflow drives: the uploading mark on the drop
/// target and the result area.
pub trait ResultSurface {
    fn set_uploading(&self, uploading: bool);
    fn show(&self, view: ResultView);
}

pub struct UploadingGuard<'a, V: ResultSurface + ?Sized> {
    surface: &'a V,
}

impl<'a, V: ResultSurface + ?Sized> UploadingGuard<'a, V> {
    pub fn acquire(surface: &'a V) -> Self {
        surface.set_uploading(true);
        UploadingGuard { surface }
    }
}

impl<V: ResultSurface + ?Sized> Drop for UploadingGuard<'_, V> {
    fn drop(&mut self) {
        self.surface.set_uploading(false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Idle,
    Validating,
    Rejected,
    Reading,
    ReadFailed,
    Submitting,
    ServerRejected,
    NetworkFailed,
    Rendered,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::Rejected
                | Stage::ReadFailed
                | Stage::ServerRejected
                | Stage::NetworkFailed
                | Stage::Rendered
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected(ClassifyError),
    ReadFailed(ClassifyError),
    ServerRejected(u16),
    NetworkFailed(ClassifyError),
    Rendered(ResultView),
}

impl Outcome {
    pub fn stage(&self) -> Stage {
        match self {
            Outcome::Rejected(_) => Stage::Rejected,
            Outcome::ReadFailed(_) => Stage::ReadFailed,
            Outcome::ServerRejected(_) => Stage::ServerRejected,
            Outcome::NetworkFailed(_) => Stage::NetworkFailed,
            Outcome::Rendered(_) => Stage::Rendered,
        }
    }

    pub fn error(&self) -> Option<ClassifyError> {
        match self {
            Outcome::Rejected(err) | Outcome::ReadFailed(err) | Outcome::NetworkFailed(err) => {
                Some(err.clone())
            }
            Outcome::ServerRejected(status) => Some(ClassifyError::ServerError(*status)),
            Outcome::Rendered(_) => None,
        }
    }
}

struct StageTracker {
    id: UploadId,
    stage: Stage,
}

impl StageTracker {
    fn new(id: UploadId) -> Self {
        StageTracker { id, stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        debug!("upload {}: {} -> {}", self.id, self.stage, next);
        self.stage = next;
    }

    fn finish(mut self, outcome: Outcome) -> Outcome {
        let stage = outcome.stage();
        debug_assert!(stage.is_terminal(), "{} is not a terminal stage", stage);
        self.advance(stage);
        outcome
    }
}

/// Takes the first file of a drop or picker event and runs it through the
/// workflow. Further files are ignored; an empty list does nothing.
pub async fn accept_input<I, S, C, V>(files: I, classifier: &C, surface: &V) -> Option<Outcome>
where
    I: IntoIterator<Item = S>,
    S: UploadSource,
    C: Classifier + ?Sized,
    V: ResultSurface + ?Sized,
{
    let source = files.into_iter().next()?;
    Some(classify_upload(&source, classifier, surface).await)
}

pub async fn classify_upload<S, C, V>(source: &S, classifier: &C, surface: &V) -> Outcome
where
    S: UploadSource + ?Sized,
    C: Classifier + ?Sized,
    V: ResultSurface + ?Sized,
{
    let mut tracker = StageTracker::new(UploadId::new());

    tracker.advance(Stage::Validating);
    if let Err(err) = upload::validate(source) {
        warn!("upload {}: rejected {}: {:?}", tracker.id, source.name(), err);
        surface.show(ResultView::failure(&err));
        return tracker.finish(Outcome::Rejected(err));
    }

    surface.show(ResultView::Loading);
    let _uploading = UploadingGuard::acquire(surface);

    tracker.advance(Stage::Reading);
    let payload = match source.read_bytes().await {
        Ok(bytes) => data_url::encode(&source.mime_type(), &bytes),
        Err(err) => {
            error!("upload {}: failed to read {}: {:?}", tracker.id, source.name(), err);
            surface.show(ResultView::failure(&err));
            return tracker.finish(Outcome::ReadFailed(err));
        }
    };

    tracker.advance(Stage::Submitting);
    info!(
        "upload {}: submitting {} ({} bytes, {} encoded)",
        tracker.id,
        source.name(),
        source.size(),
        payload.len()
    );
    let request = ClassificationRequest { image: payload };

    let outcome = match classifier.classify(&request).await {
        Ok(result) => Outcome::Rendered(ResultView::from_result(&result)),
        Err(ClassifyError::ServerError(status)) => Outcome::ServerRejected(status),
        Err(err) => Outcome::NetworkFailed(err),
    };

    match &outcome {
        Outcome::Rendered(view) => surface.show(view.clone()),
        other => {
            if let Some(err) = other.error() {
                error!("upload {}: classification error: {}", tracker.id, err);
                surface.show(ResultView::failure(&err));
            }
        }
    }

    tracker.finish(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct MockFile {
        mime: &'static str,
        size: u64,
        contents: Result<Vec<u8>, String>,
    }

    impl MockFile {
        fn png(size: u64) -> Self {
            MockFile { mime: "image/png", size, contents: Ok(vec![0x89, b'P', b'N', b'G']) }
        }
    }

    #[async_trait(?Send)]
    impl UploadSource for MockFile {
        fn name(&self) -> String {
            "mock.png".into()
        }

        fn mime_type(&self) -> String {
            self.mime.into()
        }

        fn size(&self) -> u64 {
            self.size
        }

        async fn read_bytes(&self) -> Result<Vec<u8>, ClassifyError> {
            self.contents.clone().map_err(ClassifyError::ReadError)
        }
    }

    struct MockServer {
        reply: Result<&'static str, ClassifyError>,
        requests: RefCell<Vec<ClassificationRequest>>,
    }

    impl MockServer {
        fn replying(body: &'static str) -> Self {
            MockServer { reply: Ok(body), requests: RefCell::new(Vec::new()) }
        }

        fn failing(err: ClassifyError) -> Self {
            MockServer { reply: Err(err), requests: RefCell::new(Vec::new()) }
        }

        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl Classifier for MockServer {
        async fn classify(
            &self,
            request: &ClassificationRequest,
        ) -> Result<ClassificationResult, ClassifyError> {
            self.requests.borrow_mut().push(request.clone());
            let body = self.reply.clone()?;
            Ok(serde_json::from_str(body)?)
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        uploading: Cell<bool>,
        uploading_changes: RefCell<Vec<bool>>,
        shown: RefCell<Vec<ResultView>>,
    }

    impl RecordingSurface {
        fn last_view(&self) -> ResultView {
            self.shown.borrow().last().cloned().unwrap_or_default()
        }
    }

    impl ResultSurface for RecordingSurface {
        fn set_uploading(&self, uploading: bool) {
            self.uploading.set(uploading);
            self.uploading_changes.borrow_mut().push(uploading);
        }

        fn show(&self, view: ResultView) {
            self.shown.borrow_mut().push(view);
        }
    }

    #[test]
    fn end_to_end_png_is_classified() {
        let file = MockFile::png(2 * 1024 * 1024);
        let server = MockServer::replying(r#"{"predicted_class": "X", "confidence": 0.95}"#);
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome.stage(), Stage::Rendered);
        assert_eq!(server.calls(), 1);
        assert_eq!(server.requests.borrow()[0].image, "data:image/png;base64,iVBORw==");
        assert_eq!(surface.shown.borrow()[0], ResultView::Loading);
        assert_eq!(*surface.uploading_changes.borrow(), vec![true, false]);
        assert!(!surface.uploading.get());

        let lines = surface.last_view().lines();
        assert!(lines.contains(&"X".to_string()));
        assert!(lines.contains(&"Confidence: 95.0%".to_string()));
    }

    #[test]
    fn invalid_type_never_reaches_server() {
        let file = MockFile { mime: "image/gif", size: 100, contents: Ok(vec![1]) };
        let server = MockServer::replying("{}");
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert!(matches!(outcome, Outcome::Rejected(ClassifyError::InvalidType { .. })));
        assert_eq!(server.calls(), 0);
        assert!(surface.uploading_changes.borrow().is_empty());
        assert_eq!(
            surface.last_view(),
            ResultView::Failure(
                "Invalid file type. Please upload PNG, JPG, or JPEG images only.".into()
            )
        );
    }

    #[test]
    fn oversized_file_never_reaches_server() {
        let file = MockFile::png(5_242_881);
        let server = MockServer::replying("{}");
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert!(matches!(outcome, Outcome::Rejected(ClassifyError::TooLarge { .. })));
        assert_eq!(server.calls(), 0);
        assert!(!surface.uploading.get());
    }

    #[test]
    fn read_failure_clears_uploading() {
        let file = MockFile { mime: "image/jpeg", size: 10, contents: Err("locked".into()) };
        let server = MockServer::replying("{}");
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome.stage(), Stage::ReadFailed);
        assert_eq!(server.calls(), 0);
        assert_eq!(*surface.uploading_changes.borrow(), vec![true, false]);
        assert_eq!(
            surface.last_view(),
            ResultView::Failure("Error reading file. Please try again.".into())
        );
    }

    #[test]
    fn server_error_status_is_reported() {
        let file = MockFile::png(10);
        let server = MockServer::failing(ClassifyError::ServerError(500));
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome, Outcome::ServerRejected(500));
        assert!(!surface.uploading.get());
        assert_eq!(
            surface.last_view(),
            ResultView::Failure("Classification failed: Server error: 500".into())
        );
    }

    #[test]
    fn network_failure_is_reported() {
        let file = MockFile::png(10);
        let server = MockServer::failing(ClassifyError::NetworkError("Failed to fetch".into()));
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome.stage(), Stage::NetworkFailed);
        assert!(!surface.uploading.get());
        assert_eq!(
            surface.last_view(),
            ResultView::Failure("Classification failed: Failed to fetch".into())
        );
    }

    #[test]
    fn malformed_body_is_a_network_failure() {
        let file = MockFile::png(10);
        let server = MockServer::replying("<html>oops</html>");
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome.stage(), Stage::NetworkFailed);
        assert!(!surface.uploading.get());
        let ResultView::Failure(message) = surface.last_view() else {
            panic!("expected a failure view");
        };
        assert!(message.starts_with("Classification failed: "));
    }

    #[test]
    fn server_reported_error_renders_alone() {
        let file = MockFile::png(10);
        let server = MockServer::replying(r#"{"error": "bad image", "predicted_class": "X"}"#);
        let surface = RecordingSurface::default();

        let outcome = block_on(classify_upload(&file, &server, &surface));

        assert_eq!(outcome, Outcome::Rendered(ResultView::Failure("bad image".into())));
        assert_eq!(surface.last_view().lines(), vec!["bad image".to_string()]);
        assert!(!surface.uploading.get());
    }

    #[test]
    fn only_first_file_is_submitted() {
        let files = vec![MockFile::png(10), MockFile::png(20), MockFile::png(30)];
        let server = MockServer::replying(r#"{"predicted_class": "X", "confidence": 0.5}"#);
        let surface = RecordingSurface::default();

        let outcome = block_on(accept_input(files, &server, &surface));

        assert_eq!(outcome.map(|o| o.stage()), Some(Stage::Rendered));
        assert_eq!(server.calls(), 1);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let server = MockServer::replying("{}");
        let surface = RecordingSurface::default();

        let outcome = block_on(accept_input(Vec::<MockFile>::new(), &server, &surface));

        assert!(outcome.is_none());
        assert_eq!(server.calls(), 0);
        assert!(surface.shown.borrow().is_empty());
    }

    #[test]
    fn surface_is_reusable_after_failure() {
        let server = MockServer::replying(r#"{"predicted_class": "Y", "confidence": 0.25}"#);
        let surface = RecordingSurface::default();

        block_on(classify_upload(&MockFile::png(u64::MAX), &server, &surface));
        let outcome = block_on(classify_upload(&MockFile::png(10), &server, &surface));

        assert_eq!(outcome.stage(), Stage::Rendered);
        assert_eq!(surface.last_view().lines()[1], "Confidence: 25.0%");
        assert!(!surface.uploading.get());
    }

    struct HeldServer {
        pending: RefCell<Vec<oneshot::Sender<&'static str>>>,
    }

    #[async_trait(?Send)]
    impl Classifier for HeldServer {
        async fn classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<ClassificationResult, ClassifyError> {
            let (reply, body) = oneshot::channel();
            self.pending.borrow_mut().push(reply);
            let body = body.await.map_err(|e| ClassifyError::NetworkError(e.to_string()))?;
            Ok(serde_json::from_str(body)?)
        }
    }

    #[test]
    fn overlapping_uploads_each_clear_uploading() {
        let server = Rc::new(HeldServer { pending: RefCell::new(Vec::new()) });
        let surface = Rc::new(RecordingSurface::default());
        let finished = Rc::new(Cell::new(0));

        let mut pool = LocalPool::new();
        for size in [10, 20] {
            let (server, surface, finished) = (server.clone(), surface.clone(), finished.clone());
            pool.spawner()
                .spawn_local(async move {
                    classify_upload(&MockFile::png(size), &*server, &*surface).await;
                    finished.set(finished.get() + 1);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(server.pending.borrow().len(), 2);
        assert!(surface.uploading.get());

        let first = server.pending.borrow_mut().remove(0);
        first.send(r#"{"predicted_class": "A", "confidence": 0.5}"#).unwrap();
        pool.run_until_stalled();

        assert_eq!(finished.get(), 1);
        assert!(!surface.uploading.get());

        let second = server.pending.borrow_mut().remove(0);
        second.send(r#"{"predicted_class": "B", "confidence": 0.75}"#).unwrap();
        pool.run_until_stalled();

        assert_eq!(finished.get(), 2);
        assert!(!surface.uploading.get());
        assert_eq!(*surface.uploading_changes.borrow(), vec![true, true, false, false]);
        assert_eq!(surface.last_view().lines()[0], "B");
    }

    #[test]
    fn terminal_stages() {
        assert!(!Stage::Idle.is_terminal());
        assert!(!Stage::Submitting.is_terminal());
        assert!(Stage::Rendered.is_terminal());
        assert!(Stage::ReadFailed.is_terminal());
        assert_eq!(Stage::ServerRejected.to_string(), "server_rejected");
    }
}
