//! Background request handling
//!
//! Each [`Request`] runs as its own tokio task against the [`Backend`] and
//! reports exactly one [`Outcome`] over the channel. Tasks never touch the
//! session; the event loop applies outcomes in [`drain_messages`].
//!
//! Channel sends use `let _ =`: the only way a send fails is the receiver
//! being dropped during shutdown, when nobody is listening anyway.

use crate::api::{Backend, Flavor, TransportError, UploadFile};
use crate::app::RuntimeContext;
use crate::session::{Outcome, Request, RequestKind};
use crate::ui::App;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

/// Apply every finished request. Returns true if anything arrived.
pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<Outcome>, ctx: &RuntimeContext) -> bool {
    let mut received = false;
    while let Ok(outcome) = rx.try_recv() {
        received = true;
        if let Some(follow_up) = app.session.apply(outcome) {
            dispatch(follow_up, ctx);
        }
    }
    if received {
        app.clamp_selection();
        app.flush_notices();
    }
    received
}

pub fn dispatch(request: Request, ctx: &RuntimeContext) {
    spawn_request(request, Arc::clone(ctx.backend), ctx.tx.clone());
}

pub fn spawn_request(request: Request, backend: Arc<dyn Backend>, tx: mpsc::Sender<Outcome>) {
    let kind = request.kind();
    let reply = tx.clone();
    spawn_background(tx, kind, async move {
        let outcome = execute(request, backend.as_ref()).await;
        let _ = reply.send(outcome);
    });
}

/// Run one request to completion.
pub async fn execute(request: Request, backend: &dyn Backend) -> Outcome {
    match request {
        Request::SendChat { text } => Outcome::ChatReply(backend.send_message(&text).await),
        Request::FetchHistory => Outcome::History(backend.get_history().await),
        Request::ClearHistory => Outcome::HistoryCleared(backend.clear_history().await),
        Request::AnalyzeRepository { url } => {
            Outcome::Analysis(backend.analyze_repository(&url).await)
        }
        Request::UploadFiles { paths } => {
            let result = match read_upload_files(&paths).await {
                Ok(files) => backend.upload_files(files).await,
                Err(e) => Err(e),
            };
            Outcome::Analysis(result)
        }
        Request::FetchCurrentAnalysis => {
            Outcome::CurrentAnalysis(backend.current_analysis().await)
        }
        Request::FetchSuggestions => Outcome::Suggestions(backend.get_suggestions().await),
        Request::GenerateTests(flavor) => Outcome::Generated {
            flavor: Flavor::Test(flavor),
            result: backend.generate_test_scripts(flavor).await,
        },
        Request::GenerateMonitoring(flavor) => Outcome::Generated {
            flavor: Flavor::Monitoring(flavor),
            result: backend.generate_monitoring_config(flavor).await,
        },
        Request::HealthCheck => Outcome::Health(backend.health().await),
    }
}

/// Read the selected files, in order. A file that can't be read fails the
/// whole upload before anything is sent.
async fn read_upload_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>, TransportError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            TransportError::network(format!("could not read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        files.push(UploadFile::new(name, bytes));
    }
    Ok(files)
}

/// Spawn a task and turn a panic into an [`Outcome::TaskCrashed`] for `kind`,
/// so the matching in-flight flag is always cleared.
pub fn spawn_background<F>(tx: mpsc::Sender<Outcome>, kind: RequestKind, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            tracing::error!(request = kind.label(), %detail, "background task panicked");
            let _ = tx.send(Outcome::TaskCrashed {
                kind,
                detail: format!("task crashed unexpectedly: {}", detail),
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        BackendFuture, ChatMessage, GeneratedArtifact, HealthStatus, MonitoringFlavor,
        RepositoryAnalysis, Sender, Suggestion, TestFlavor,
    };
    use crate::session::Session;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory backend that records uploads and echoes chat
    #[derive(Default)]
    struct FakeBackend {
        fail_chat: bool,
        uploaded: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl Backend for FakeBackend {
        fn send_message<'a>(&'a self, text: &'a str) -> BackendFuture<'a, ChatMessage> {
            Box::pin(async move {
                if self.fail_chat {
                    return Err(TransportError::new(Some(500), "Chat error"));
                }
                Ok::<_, TransportError>(ChatMessage::local(Sender::Bot, format!("echo: {}", text)))
            })
        }

        fn get_history(&self) -> BackendFuture<'_, Vec<ChatMessage>> {
            Box::pin(async { Ok::<_, TransportError>(Vec::new()) })
        }

        fn clear_history(&self) -> BackendFuture<'_, ()> {
            Box::pin(async { Ok::<_, TransportError>(()) })
        }

        fn analyze_repository<'a>(&'a self, url: &'a str) -> BackendFuture<'a, RepositoryAnalysis> {
            Box::pin(async move {
                Ok::<_, TransportError>(RepositoryAnalysis {
                    repository_url: url.to_string(),
                    ..Default::default()
                })
            })
        }

        fn upload_files(&self, files: Vec<UploadFile>) -> BackendFuture<'_, RepositoryAnalysis> {
            Box::pin(async move {
                let mut uploaded = self.uploaded.lock().unwrap();
                for file in files {
                    uploaded.push((file.file_name, file.bytes));
                }
                Ok::<_, TransportError>(RepositoryAnalysis {
                    repository_url: "upload".into(),
                    ..Default::default()
                })
            })
        }

        fn current_analysis(&self) -> BackendFuture<'_, Option<RepositoryAnalysis>> {
            Box::pin(async { Ok::<_, TransportError>(None) })
        }

        fn get_suggestions(&self) -> BackendFuture<'_, Vec<Suggestion>> {
            Box::pin(async { Ok::<_, TransportError>(Vec::new()) })
        }

        fn generate_test_scripts(&self, flavor: TestFlavor) -> BackendFuture<'_, GeneratedArtifact> {
            Box::pin(async move {
                Ok::<_, TransportError>(GeneratedArtifact {
                    content: format!("# {} tests", flavor.as_str()),
                    ..Default::default()
                })
            })
        }

        fn generate_monitoring_config(
            &self,
            _flavor: MonitoringFlavor,
        ) -> BackendFuture<'_, GeneratedArtifact> {
            Box::pin(explode())
        }

        fn health(&self) -> BackendFuture<'_, HealthStatus> {
            Box::pin(async {
                Ok::<_, TransportError>(HealthStatus {
                    status: "healthy".into(),
                    service: None,
                })
            })
        }
    }

    async fn explode() -> Result<GeneratedArtifact, TransportError> {
        panic!("monitoring backend exploded")
    }

    async fn next_outcome(rx: &mpsc::Receiver<Outcome>) -> Outcome {
        for _ in 0..200 {
            if let Ok(outcome) = rx.try_recv() {
                return outcome;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no outcome received");
    }

    #[tokio::test]
    async fn test_chat_scenario_through_fake_backend() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        session.chat_input = "hello".into();

        let request = session.submit_chat().unwrap();
        assert_eq!(session.transcript().len(), 2);
        assert!(session.pending_request());

        let outcome = execute(request, &backend).await;
        session.apply(outcome);
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[2].text, "echo: hello");
        assert!(!session.pending_request());
    }

    #[tokio::test]
    async fn test_chat_failure_through_fake_backend() {
        let backend = FakeBackend {
            fail_chat: true,
            ..Default::default()
        };
        let mut session = Session::new();
        session.chat_input = "hello".into();

        let request = session.submit_chat().unwrap();
        session.apply(execute(request, &backend).await);
        assert_eq!(session.transcript().len(), 2);
        assert!(!session.pending_request());
        assert!(session.last_error().is_some());
    }

    #[tokio::test]
    async fn test_restore_with_nothing_stored_leaves_session_idle() {
        let backend = FakeBackend::default();
        let mut session = Session::new();
        let request = session.request_current_analysis().unwrap();

        let outcome = execute(request, &backend).await;
        assert!(matches!(outcome, Outcome::CurrentAnalysis(Ok(None))));
        assert!(session.apply(outcome).is_none());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_upload_reads_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("app.zip");
        let second = dir.path().join("infra.tar.gz");
        std::fs::write(&first, b"zip-bytes").unwrap();
        std::fs::write(&second, b"tar-bytes").unwrap();

        let backend = FakeBackend::default();
        let outcome = execute(
            Request::UploadFiles {
                paths: vec![first, second],
            },
            &backend,
        )
        .await;
        assert!(matches!(outcome, Outcome::Analysis(Ok(_))));

        let uploaded = backend.uploaded.lock().unwrap();
        assert_eq!(uploaded[0], ("app.zip".to_string(), b"zip-bytes".to_vec()));
        assert_eq!(uploaded[1].0, "infra.tar.gz");
    }

    #[tokio::test]
    async fn test_unreadable_upload_fails_without_sending() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FakeBackend::default();
        let outcome = execute(
            Request::UploadFiles {
                paths: vec![dir.path().join("missing.zip")],
            },
            &backend,
        )
        .await;

        match outcome {
            Outcome::Analysis(Err(err)) => {
                assert_eq!(err.status, None);
                assert!(err.message.contains("missing.zip"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(backend.uploaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_request_reports_outcome() {
        let (tx, rx) = mpsc::channel();
        let backend: Arc<dyn Backend> = Arc::new(FakeBackend::default());
        spawn_request(Request::GenerateTests(TestFlavor::Testng), backend, tx);

        match next_outcome(&rx).await {
            Outcome::Generated { flavor, result } => {
                assert_eq!(flavor, Flavor::Test(TestFlavor::Testng));
                assert_eq!(result.unwrap().content, "# testng tests");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panicking_task_reports_crash_for_its_kind() {
        let (tx, rx) = mpsc::channel();
        let backend: Arc<dyn Backend> = Arc::new(FakeBackend::default());
        let mut session = Session::new();
        let request = session
            .request_monitoring_config(MonitoringFlavor::Grafana)
            .unwrap();
        spawn_request(request, backend, tx);

        let outcome = next_outcome(&rx).await;
        assert_eq!(outcome.kind(), RequestKind::MonitoringGeneration);
        assert!(matches!(outcome, Outcome::TaskCrashed { .. }));

        session.apply(outcome);
        assert!(!session.pending_request());
        assert!(session
            .last_error()
            .unwrap()
            .contains("monitoring backend exploded"));
    }
}
