//! Optimistic echo of a value that is being written to the backend.

/// Lifecycle of an optimistic value: published before the write, confirmed
/// once the authoritative data has been re-fetched, or rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingValue<T> {
    Absent,
    Pending(T),
    Confirmed,
}

impl<T> Default for PendingValue<T> {
    fn default() -> Self {
        PendingValue::Absent
    }
}

impl<T> PendingValue<T> {
    pub fn publish(&mut self, value: T) {
        *self = PendingValue::Pending(value);
    }

    /// Only a pending value can be confirmed.
    pub fn confirm(&mut self) {
        if self.is_pending() {
            *self = PendingValue::Confirmed;
        }
    }

    /// Withdraw a pending value, returning it.
    pub fn rollback(&mut self) -> Option<T> {
        match std::mem::take(self) {
            PendingValue::Pending(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PendingValue::Pending(_))
    }

    /// The value to echo, if any.
    pub fn visible(&self) -> Option<&T> {
        match self {
            PendingValue::Pending(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_then_confirm_hides_value() {
        let mut pending = PendingValue::default();
        pending.publish("Hello".to_string());
        assert_eq!(pending.visible().map(String::as_str), Some("Hello"));

        pending.confirm();
        assert_eq!(pending, PendingValue::Confirmed);
        assert!(pending.visible().is_none());
    }

    #[test]
    fn rollback_returns_pending_value() {
        let mut pending = PendingValue::default();
        pending.publish(7);
        assert_eq!(pending.rollback(), Some(7));
        assert_eq!(pending, PendingValue::Absent);
    }

    #[test]
    fn rollback_and_confirm_leave_other_states_alone() {
        let mut pending: PendingValue<u8> = PendingValue::Confirmed;
        assert_eq!(pending.rollback(), None);
        assert_eq!(pending, PendingValue::Confirmed);

        let mut absent: PendingValue<u8> = PendingValue::Absent;
        absent.confirm();
        assert_eq!(absent, PendingValue::Absent);
    }
}
