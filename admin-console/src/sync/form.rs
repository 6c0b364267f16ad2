/// Single-field form backing the question input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    content: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.content = value.into();
    }

    pub fn reset(&mut self) {
        self.content.clear();
    }

    /// Empty content disables submission. Whitespace counts as content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_reset() {
        let mut form = FormState::new();
        assert!(form.is_empty());

        form.set_value("Hello");
        assert_eq!(form.value(), "Hello");

        form.reset();
        assert_eq!(form.value(), "");
    }

    #[test]
    fn whitespace_is_not_empty() {
        let mut form = FormState::new();
        form.set_value(" ");
        assert!(!form.is_empty());
    }
}
