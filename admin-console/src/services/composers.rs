//! Per-session message composers.
//!
//! The feed and the submit request are separate HTTP requests, so the
//! composer (and with it the pending echo) has to outlive a single request.

use crate::models::ConversationId;
use crate::sync::{MessageComposer, MessageSink, SubmissionState};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct Slot {
    composer: Arc<MessageComposer>,
    touched: Instant,
}

impl Slot {
    /// In-flight submissions are never evicted.
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.touched) > idle_timeout
            && self.composer.submission() != SubmissionState::Submitting
    }
}

pub struct ComposerRegistry {
    sink: Arc<dyn MessageSink>,
    idle_timeout: Duration,
    composers: DashMap<(String, ConversationId), Slot>,
}

impl ComposerRegistry {
    /// Composers untouched for longer than `idle_timeout` are dropped. Use the
    /// session inactivity window, since their session has expired by then.
    pub fn new(sink: Arc<dyn MessageSink>, idle_timeout: Duration) -> Self {
        Self {
            sink,
            idle_timeout,
            composers: DashMap::new(),
        }
    }

    /// Composer for this session and conversation. Requests without a session
    /// id get a throwaway composer.
    pub fn composer(
        &self,
        session_key: Option<&str>,
        conversation_id: ConversationId,
    ) -> Arc<MessageComposer> {
        let now = Instant::now();
        self.evict_idle(now);

        match session_key {
            Some(key) => {
                let mut slot = self
                    .composers
                    .entry((key.to_string(), conversation_id))
                    .or_insert_with(|| Slot {
                        composer: Arc::new(MessageComposer::new(
                            conversation_id,
                            self.sink.clone(),
                        )),
                        touched: now,
                    });
                slot.touched = now;
                slot.composer.clone()
            }
            None => Arc::new(MessageComposer::new(conversation_id, self.sink.clone())),
        }
    }

    /// Drop composers of expired, abandoned or cycled sessions.
    fn evict_idle(&self, now: Instant) {
        let before = self.composers.len();
        self.composers
            .retain(|_, slot| !slot.is_idle(now, self.idle_timeout));

        let evicted = before.saturating_sub(self.composers.len());
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted idle composers");
        }
    }

    /// Drop every composer belonging to a session (logout).
    pub fn release_session(&self, session_key: &str) {
        self.composers.retain(|(key, _), _| key != session_key);
    }

    pub fn len(&self) -> usize {
        self.composers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composers.is_empty()
    }
}
