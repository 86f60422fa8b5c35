#![forbid(unsafe_code)]

//! Contact-form validation.
//!
//! Submission is purely local: the host suppresses the browser's submit,
//! hands the named fields to [`validate`], shows the resulting notice, and
//! resets the form only when the verdict is [`Verdict::Accepted`].
//!
//! ```
//! use autonome_core::PageConfig;
//! use autonome_core::form::{FormFields, Verdict, validate};
//!
//! let config = PageConfig::default();
//! let fields: FormFields = [("name", "Ada"), ("email", "a@b.com"), ("message", "Hi")]
//!     .into_iter()
//!     .collect();
//! assert_eq!(validate(&fields, &config), Verdict::Accepted);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::PageConfig;
use crate::config::Messages;

/// What a browser's `\s` matches. The `regex` crate's `\s` is the Unicode
/// `White_Space` property, which adds U+0085 and drops U+FEFF.
const BROWSER_WHITESPACE: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^@{BROWSER_WHITESPACE}]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern is a valid regex")
});

/// Named values read from a form, in document order.
///
/// A name that appears more than once keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    entries: Vec<(String, String)>,
}

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field value, replacing any earlier value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when `name` is absent or empty. Whitespace counts as content.
    #[must_use]
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).is_none_or(str::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// Why a submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingFields,
    InvalidEmail,
}

/// Outcome of validating one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Rejected(Rejection),
    Accepted,
}

impl Verdict {
    /// The notice to show the visitor.
    #[must_use]
    pub fn notice(self, messages: &Messages) -> &str {
        match self {
            Self::Rejected(Rejection::MissingFields) => &messages.missing_fields,
            Self::Rejected(Rejection::InvalidEmail) => &messages.invalid_email,
            Self::Accepted => &messages.success,
        }
    }

    /// Only an accepted submission clears the form.
    #[must_use]
    pub const fn should_reset(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// `local@domain.tld` shape check: no whitespace, exactly one `@`, and a dot
/// with at least one character on each side somewhere after it.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Validate a submission. Missing fields are reported before the email shape.
#[must_use]
pub fn validate(fields: &FormFields, config: &PageConfig) -> Verdict {
    if config.required_fields.iter().any(|name| fields.is_blank(name)) {
        return Verdict::Rejected(Rejection::MissingFields);
    }
    let email = fields.get(&config.email_field).unwrap_or_default();
    if !is_valid_email(email) {
        return Verdict::Rejected(Rejection::InvalidEmail);
    }
    Verdict::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, message: &str) -> FormFields {
        [("name", name), ("email", email), ("message", message)]
            .into_iter()
            .collect()
    }

    #[test]
    fn email_without_tld_rejected() {
        let config = PageConfig::default();
        assert_eq!(
            validate(&submission("Ada", "a@b", "Hello"), &config),
            Verdict::Rejected(Rejection::InvalidEmail)
        );
    }

    #[test]
    fn well_formed_submission_accepted() {
        let config = PageConfig::default();
        let verdict = validate(&submission("Ada", "a@b.com", "Hello"), &config);
        assert_eq!(verdict, Verdict::Accepted);
        assert!(verdict.should_reset());
        assert_eq!(
            verdict.notice(&config.messages),
            "Thank you for your message! We will get back to you soon."
        );
    }

    #[test]
    fn empty_field_reported_before_bad_email() {
        let config = PageConfig::default();
        let verdict = validate(&submission("", "not-an-email", "Hello"), &config);
        assert_eq!(verdict, Verdict::Rejected(Rejection::MissingFields));
        assert!(!verdict.should_reset());
        assert_eq!(verdict.notice(&config.messages), "Please fill in all fields.");
    }

    #[test]
    fn absent_field_counts_as_missing() {
        let config = PageConfig::default();
        let fields: FormFields = [("name", "Ada"), ("email", "a@b.com")].into_iter().collect();
        assert_eq!(
            validate(&fields, &config),
            Verdict::Rejected(Rejection::MissingFields)
        );
    }

    #[test]
    fn whitespace_only_is_content() {
        let config = PageConfig::default();
        assert_eq!(
            validate(&submission("  ", "a@b.co", " "), &config),
            Verdict::Accepted
        );
    }

    #[test]
    fn email_shapes() {
        for ok in ["a@b.com", "first.last@sub.example.org", "x@y.z", "a@b.c.d"] {
            assert!(is_valid_email(ok), "{ok} should pass");
        }
        for bad in [
            "a@b",
            "@b.com",
            "a@.com",
            "a@b.",
            "a b@c.com",
            "a@b@c.com",
            "a@b .com",
            "",
        ] {
            assert!(!is_valid_email(bad), "{bad:?} should fail");
        }
    }

    #[test]
    fn whitespace_matches_browser_class() {
        for bad in [
            "a\u{FEFF}@b.com",
            "a@b\u{A0}.com",
            "a@b.c\u{3000}m",
            "a\u{2028}@b.com",
            "a\t@b.com",
        ] {
            assert!(!is_valid_email(bad), "{bad:?} should fail");
        }
        // Not whitespace to a browser.
        for ok in ["a\u{85}@b.com", "a@b\u{180E}.com"] {
            assert!(is_valid_email(ok), "{ok:?} should pass");
        }
    }

    #[test]
    fn repeated_name_keeps_last_value() {
        let fields: FormFields = [("email", "first"), ("email", "a@b.com")].into_iter().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("email"), Some("a@b.com"));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let config = PageConfig::default();
        let mut fields = submission("Ada", "a@b.com", "Hi");
        fields.insert("company", "");
        assert_eq!(validate(&fields, &config), Verdict::Accepted);
    }
}
