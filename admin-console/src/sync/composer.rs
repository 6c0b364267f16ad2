//! Message submission for a conversation.
//!
//! A [`MessageComposer`] owns the question form, the optimistic pending echo
//! and the submission lifecycle (`Idle -> Submitting -> Idle`). Submitting runs,
//! in order: publish the pending echo, write to the backend, clear the form,
//! refetch the collaborator, confirm the echo. A failed write rolls the echo
//! back and keeps the form content; the error is recorded for display and
//! returned. Dropping an in-flight submission runs the same rollback.

use super::form::FormState;
use super::pending::PendingValue;
use super::query::Refetch;
use crate::auth::AuthContext;
use crate::models::{ConversationId, MessageInput};
use crate::services::metrics;
use async_trait::async_trait;
use console_core::AppError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Message shown when a submission was abandoned before the backend answered.
pub const INTERRUPTED_MESSAGE: &str = "Sending was interrupted; the message may not have been delivered";

/// Message shown when a new draft arrives while the previous one is being sent.
pub const IN_FLIGHT_MESSAGE: &str = "Wait for the previous message to be sent";

/// Backend write used by the composer.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(
        &self,
        access_token: &str,
        conversation_id: ConversationId,
        message: &MessageInput,
    ) -> Result<(), AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle { last_error: Option<String> },
    Submitting,
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::Idle { last_error: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// The send control was disabled (empty content or a submission in flight).
    Disabled,
}

#[derive(Debug, Default)]
struct ComposerState {
    form: FormState,
    pending: PendingValue<String>,
    submission: SubmissionState,
}

impl ComposerState {
    fn can_submit(&self) -> bool {
        !self.form.is_empty() && self.submission != SubmissionState::Submitting
    }
}

pub struct MessageComposer {
    conversation_id: ConversationId,
    sink: Arc<dyn MessageSink>,
    state: Mutex<ComposerState>,
}

impl MessageComposer {
    pub fn new(conversation_id: ConversationId, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            conversation_id,
            sink,
            state: Mutex::new(ComposerState::default()),
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    fn lock(&self) -> MutexGuard<'_, ComposerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn content(&self) -> String {
        self.lock().form.value().to_string()
    }

    /// Replace the draft. Refused (returns `false`) while a submission is in
    /// flight, since the successful send clears the form.
    pub fn set_content(&self, value: impl Into<String>) -> bool {
        let mut state = self.lock();
        if state.submission == SubmissionState::Submitting {
            return false;
        }
        state.form.set_value(value);
        true
    }

    /// Whether the send control is enabled.
    pub fn submit_enabled(&self) -> bool {
        self.lock().can_submit()
    }

    /// The optimistic echo to show under the conversation, if any.
    pub fn pending(&self) -> Option<String> {
        self.lock().pending.visible().cloned()
    }

    pub fn pending_state(&self) -> PendingValue<String> {
        self.lock().pending.clone()
    }

    pub fn submission(&self) -> SubmissionState {
        self.lock().submission.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        match &self.lock().submission {
            SubmissionState::Idle { last_error } => last_error.clone(),
            SubmissionState::Submitting => None,
        }
    }

    pub async fn submit(
        &self,
        auth: &AuthContext,
        collaborator: &dyn Refetch,
    ) -> Result<SubmitOutcome, AppError> {
        let access_token = auth.require_token()?;

        let content = {
            let mut state = self.lock();
            if !state.can_submit() {
                return Ok(SubmitOutcome::Disabled);
            }
            let content = state.form.value().to_string();
            state.pending.publish(content.clone());
            state.submission = SubmissionState::Submitting;
            content
        };
        let mut in_flight = InFlight::new(self);

        let message = MessageInput { content };
        let delivered = self
            .sink
            .deliver(access_token, self.conversation_id, &message)
            .await;

        match delivered {
            Ok(()) => {
                self.lock().form.reset();

                if let Err(err) = collaborator.refetch().await {
                    tracing::warn!(
                        conversation_id = %self.conversation_id,
                        error = %err,
                        "Refetch after message submission failed"
                    );
                }

                {
                    let mut state = self.lock();
                    state.pending.confirm();
                    state.submission = SubmissionState::Idle { last_error: None };
                }
                in_flight.disarm();

                metrics::record_submission("sent");
                tracing::info!(conversation_id = %self.conversation_id, "Message sent");
                Ok(SubmitOutcome::Sent)
            }
            Err(err) => {
                {
                    let mut state = self.lock();
                    state.pending.rollback();
                    state.submission = SubmissionState::Idle {
                        last_error: Some(err.user_message()),
                    };
                }
                in_flight.disarm();

                metrics::record_submission("failed");
                tracing::warn!(
                    conversation_id = %self.conversation_id,
                    error = %err,
                    "Message submission failed"
                );
                Err(err)
            }
        }
    }
}

/// Rolls the composer back to `Idle` if a submission is dropped mid-flight.
struct InFlight<'a> {
    composer: &'a MessageComposer,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(composer: &'a MessageComposer) -> Self {
        Self {
            composer,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = self.composer.lock();
        state.pending.rollback();
        state.submission = SubmissionState::Idle {
            last_error: Some(INTERRUPTED_MESSAGE.to_string()),
        };
        metrics::record_submission("interrupted");
        tracing::warn!(
            conversation_id = %self.composer.conversation_id,
            "Message submission dropped before completion"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(String, ConversationId, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn deliver(
            &self,
            access_token: &str,
            conversation_id: ConversationId,
            message: &MessageInput,
        ) -> Result<(), AppError> {
            self.sent.lock().unwrap().push((
                access_token.to_string(),
                conversation_id,
                message.content.clone(),
            ));
            if self.fail {
                Err(AppError::Network("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct CountingRefetch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Refetch for CountingRefetch {
        async fn refetch(&self) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Snapshots the form content and pending echo at refetch time.
    struct ObservingRefetch {
        composer: Arc<MessageComposer>,
        seen: Mutex<Option<(String, Option<String>)>>,
    }

    #[async_trait]
    impl Refetch for ObservingRefetch {
        async fn refetch(&self) -> Result<(), AppError> {
            *self.seen.lock().unwrap() =
                Some((self.composer.content(), self.composer.pending()));
            Ok(())
        }
    }

    struct HangingSink;

    #[async_trait]
    impl MessageSink for HangingSink {
        async fn deliver(
            &self,
            _access_token: &str,
            _conversation_id: ConversationId,
            _message: &MessageInput,
        ) -> Result<(), AppError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    fn composer_with(sink: Arc<dyn MessageSink>) -> MessageComposer {
        MessageComposer::new(ConversationId(42), sink)
    }

    #[tokio::test]
    async fn successful_submit_clears_form_and_refetches_once() {
        let sink = Arc::new(RecordingSink::default());
        let composer = composer_with(sink.clone());
        let refetch = CountingRefetch::default();
        composer.set_content("Hello");

        let outcome = composer
            .submit(&AuthContext::with_token("abc"), &refetch)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(composer.content(), "");
        assert_eq!(refetch.calls.load(Ordering::SeqCst), 1);
        assert_eq!(composer.pending_state(), PendingValue::Confirmed);
        assert_eq!(composer.submission(), SubmissionState::default());
        assert_eq!(
            sink.sent.lock().unwrap().as_slice(),
            &[("abc".to_string(), ConversationId(42), "Hello".to_string())]
        );
    }

    #[tokio::test]
    async fn refetch_runs_after_form_reset_while_echo_is_visible() {
        let composer = Arc::new(composer_with(Arc::new(RecordingSink::default())));
        let refetch = ObservingRefetch {
            composer: composer.clone(),
            seen: Mutex::new(None),
        };
        composer.set_content("Hello");

        composer
            .submit(&AuthContext::with_token("abc"), &refetch)
            .await
            .unwrap();

        assert_eq!(
            refetch.seen.lock().unwrap().clone(),
            Some((String::new(), Some("Hello".to_string())))
        );
    }

    #[tokio::test]
    async fn empty_content_is_disabled_and_sends_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let composer = composer_with(sink.clone());
        let refetch = CountingRefetch::default();

        assert!(!composer.submit_enabled());
        let outcome = composer
            .submit(&AuthContext::with_token("abc"), &refetch)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Disabled);
        assert!(sink.sent.lock().unwrap().is_empty());
        assert_eq!(refetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_state_change() {
        let sink = Arc::new(RecordingSink::default());
        let composer = composer_with(sink.clone());
        composer.set_content("Hello");

        let err = composer
            .submit(&AuthContext::anonymous(), &CountingRefetch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthRequired));
        assert!(sink.sent.lock().unwrap().is_empty());
        assert_eq!(composer.pending_state(), PendingValue::Absent);
        assert_eq!(composer.content(), "Hello");
    }

    #[tokio::test]
    async fn failed_write_rolls_back_pending_and_keeps_content() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let composer = composer_with(sink);
        let refetch = CountingRefetch::default();
        composer.set_content("Hello");

        let err = composer
            .submit(&AuthContext::with_token("abc"), &refetch)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
        assert_eq!(composer.content(), "Hello");
        assert_eq!(composer.pending_state(), PendingValue::Absent);
        assert_eq!(
            composer.last_error().as_deref(),
            Some("Network error: connection reset")
        );
        assert_eq!(refetch.calls.load(Ordering::SeqCst), 0);
        assert!(composer.submit_enabled());
    }

    #[tokio::test]
    async fn in_flight_submission_disables_control_and_cancel_cleans_up() {
        let composer = Arc::new(composer_with(Arc::new(HangingSink)));
        composer.set_content("Hello");

        let task = tokio::spawn({
            let composer = composer.clone();
            async move {
                composer
                    .submit(&AuthContext::with_token("abc"), &CountingRefetch::default())
                    .await
            }
        });
        while composer.submission() != SubmissionState::Submitting {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        assert!(!composer.submit_enabled());
        assert_eq!(composer.pending().as_deref(), Some("Hello"));
        let second = composer
            .submit(&AuthContext::with_token("abc"), &CountingRefetch::default())
            .await
            .unwrap();
        assert_eq!(second, SubmitOutcome::Disabled);
        assert!(!composer.set_content("Second"));
        assert_eq!(composer.content(), "Hello");

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(composer.pending_state(), PendingValue::Absent);
        assert_eq!(composer.content(), "Hello");
        assert_eq!(composer.last_error().as_deref(), Some(INTERRUPTED_MESSAGE));
    }
}
