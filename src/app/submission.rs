use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

use crate::domain::{GenerationOutcome, ProviderId, SettingsStore, TransformFailure};

use super::TransformService;

pub const COMPLETED_NOTICE: &str = "Conversion complete.";
pub const BUSY_NOTICE: &str = "A conversion is already in progress.";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("editor I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cursor {cursor} is not a character boundary in a {len}-byte document")]
    InvalidCursor { cursor: usize, len: usize },
}

/// Destination for the finished study text.
pub trait EditorSink {
    fn insert_at_cursor(&mut self, text: &str) -> Result<(), HostError>;
}

/// Short user-facing notices.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Caller-owned single-flight flag for submissions.
///
/// Clones share the same flag, so every trigger for one editor can consult it.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<AtomicBool>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another submission holds the ticket.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission; dropping it re-enables submission.
#[derive(Debug)]
pub struct SubmissionTicket {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub enum SubmissionReport {
    /// The text was produced and inserted into the editor.
    Completed { chars: usize },
    /// The transform or the editor insertion failed; the user may resubmit.
    Failed(SubmissionFailure),
    /// Another submission was still running.
    Busy,
}

#[derive(Debug)]
pub enum SubmissionFailure {
    Transform(TransformFailure),
    Editor(HostError),
}

impl SubmissionReport {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Sequences a user submission: guard, transform, insert, notify.
pub struct SubmissionController<E, N> {
    service: TransformService,
    guard: SubmissionGuard,
    editor: E,
    notifier: N,
}

impl<E, N> SubmissionController<E, N>
where
    E: EditorSink,
    N: Notifier,
{
    pub fn new(service: TransformService, guard: SubmissionGuard, editor: E, notifier: N) -> Self {
        Self {
            service,
            guard,
            editor,
            notifier,
        }
    }

    pub fn guard(&self) -> &SubmissionGuard {
        &self.guard
    }

    pub fn submit(
        &mut self,
        source_text: &str,
        provider: ProviderId,
        settings: &dyn SettingsStore,
    ) -> SubmissionReport {
        let Some(_ticket) = self.guard.try_begin() else {
            self.notifier.notify(BUSY_NOTICE);
            return SubmissionReport::Busy;
        };

        match self
            .service
            .transform_with_settings(source_text, provider, settings)
        {
            GenerationOutcome::Success(text) => match self.editor.insert_at_cursor(&text) {
                Ok(()) => {
                    self.notifier.notify(COMPLETED_NOTICE);
                    SubmissionReport::Completed {
                        chars: text.chars().count(),
                    }
                }
                Err(error) => {
                    tracing::error!(%error, "failed to insert generated text");
                    self.notifier.notify(&format!("Error: {error}"));
                    SubmissionReport::Failed(SubmissionFailure::Editor(error))
                }
            },
            GenerationOutcome::Failure(failure) => {
                self.notifier
                    .notify(&format!("Error: {}", failure.user_message()));
                SubmissionReport::Failed(SubmissionFailure::Transform(failure))
            }
        }
    }

    pub fn into_parts(self) -> (E, N) {
        (self.editor, self.notifier)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::{
        BUSY_NOTICE, COMPLETED_NOTICE, EditorSink, HostError, Notifier, SubmissionController,
        SubmissionFailure, SubmissionGuard, SubmissionReport,
    };
    use crate::app::TransformService;
    use crate::domain::{Credential, ErrorKind, ProviderId, RemoteError, SettingsKey};
    use crate::infra::llm::{LlmProvider, ProviderRegistry};
    use crate::infra::settings::MemorySettingsStore;

    #[derive(Default)]
    struct RecordingEditor {
        inserted: Vec<String>,
        fail: bool,
    }

    impl EditorSink for RecordingEditor {
        fn insert_at_cursor(&mut self, text: &str) -> Result<(), HostError> {
            if self.fail {
                return Err(HostError::InvalidCursor { cursor: 9, len: 0 });
            }
            self.inserted.push(text.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Vec<String>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str) {
            self.notices.push(message.to_string());
        }
    }

    struct StaticProvider {
        provider_id: ProviderId,
        result: Result<String, RemoteError>,
    }

    impl LlmProvider for StaticProvider {
        fn provider_id(&self) -> ProviderId {
            self.provider_id
        }

        fn generate(&self, _prompt: &str, _credential: &Credential) -> Result<String, RemoteError> {
            self.result.clone()
        }
    }

    fn service(groq_result: Result<String, RemoteError>) -> TransformService {
        let registry = ProviderRegistry::new(
            StaticProvider {
                provider_id: ProviderId::Gemini,
                result: Ok("The cat /\nThe cat sat. /\n\n고양이가 앉았다.".to_string()),
            },
            StaticProvider {
                provider_id: ProviderId::Groq,
                result: groq_result,
            },
        )
        .expect("registry should build");
        TransformService::new(registry)
    }

    fn settings() -> MemorySettingsStore {
        MemorySettingsStore::new()
            .with(SettingsKey::GeminiCredential, "gemini-key")
            .with(SettingsKey::GroqCredential, "groq-key")
    }

    #[test]
    fn guard_allows_one_submission_at_a_time() {
        let guard = SubmissionGuard::new();

        let ticket = guard.try_begin().expect("first submission should start");
        assert!(guard.is_in_flight());
        assert!(guard.clone().try_begin().is_none());

        drop(ticket);
        assert!(!guard.is_in_flight());
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn guard_admits_exactly_one_concurrent_caller() {
        let guard = SubmissionGuard::new();
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles = (0..8)
            .map(|_| {
                let guard = guard.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let ticket = guard.try_begin();
                    barrier.wait();
                    ticket.is_some()
                })
            })
            .collect::<Vec<_>>();

        let admitted = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread should not panic"))
            .filter(|admitted| *admitted)
            .count();
        assert_eq!(admitted, 1);
    }

    #[test]
    fn submit_inserts_text_and_notifies_on_success() {
        let mut controller = SubmissionController::new(
            service(Ok(String::new())),
            SubmissionGuard::new(),
            RecordingEditor::default(),
            RecordingNotifier::default(),
        );

        let report = controller.submit("The cat sat.", ProviderId::Gemini, &settings());

        assert!(report.is_completed());
        assert!(!controller.guard().is_in_flight());
        let (editor, notifier) = controller.into_parts();
        assert_eq!(editor.inserted.len(), 1);
        assert!(editor.inserted[0].contains("The cat sat. /"));
        assert_eq!(notifier.notices, vec![COMPLETED_NOTICE.to_string()]);
    }

    #[test]
    fn submit_reports_failure_and_releases_guard() {
        let mut controller = SubmissionController::new(
            service(Err(RemoteError::HttpStatus {
                provider: ProviderId::Groq,
                status: 401,
                body: "invalid api key".to_string(),
            })),
            SubmissionGuard::new(),
            RecordingEditor::default(),
            RecordingNotifier::default(),
        );

        let report = controller.submit("The cat sat.", ProviderId::Groq, &settings());

        assert!(matches!(
            report,
            SubmissionReport::Failed(SubmissionFailure::Transform(ref failure))
            if failure.kind == ErrorKind::HttpStatus(401)
        ));
        assert!(!controller.guard().is_in_flight());
        let (editor, notifier) = controller.into_parts();
        assert!(editor.inserted.is_empty());
        assert_eq!(notifier.notices, vec!["Error: Groq Error: 401".to_string()]);
    }

    #[test]
    fn submit_reports_missing_credential_notice() {
        let mut controller = SubmissionController::new(
            service(Ok(String::new())),
            SubmissionGuard::new(),
            RecordingEditor::default(),
            RecordingNotifier::default(),
        );

        let report = controller.submit("Text", ProviderId::Gemini, &MemorySettingsStore::new());

        assert!(!report.is_completed());
        let (_, notifier) = controller.into_parts();
        assert_eq!(
            notifier.notices,
            vec!["Error: Enter your Gemini API key in settings.".to_string()]
        );
    }

    #[test]
    fn submit_is_rejected_while_another_is_in_flight() {
        let guard = SubmissionGuard::new();
        let mut controller = SubmissionController::new(
            service(Ok(String::new())),
            guard.clone(),
            RecordingEditor::default(),
            RecordingNotifier::default(),
        );

        let _outstanding = guard.try_begin().expect("outer submission should start");
        let report = controller.submit("Text", ProviderId::Gemini, &settings());

        assert!(matches!(report, SubmissionReport::Busy));
        let (editor, notifier) = controller.into_parts();
        assert!(editor.inserted.is_empty());
        assert_eq!(notifier.notices, vec![BUSY_NOTICE.to_string()]);
    }

    #[test]
    fn submit_surfaces_editor_failure() {
        let mut controller = SubmissionController::new(
            service(Ok(String::new())),
            SubmissionGuard::new(),
            RecordingEditor {
                fail: true,
                ..RecordingEditor::default()
            },
            RecordingNotifier::default(),
        );

        let report = controller.submit("Text", ProviderId::Gemini, &settings());

        assert!(matches!(
            report,
            SubmissionReport::Failed(SubmissionFailure::Editor(HostError::InvalidCursor { .. }))
        ));
        assert!(!controller.guard().is_in_flight());
    }
}
