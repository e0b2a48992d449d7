//! crates/medisearch_core/src/validation.rs
//!
//! Boundary checks applied to inbound proxy requests before anything is sent to
//! the backend. Payloads keep required fields optional so that a missing field
//! is reported as a rejection rather than a decoding failure.

use crate::domain::{CitationFormat, SearchFilters};
use serde::Deserialize;
use utoipa::ToSchema;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MIN_FULL_NAME_CHARS: usize = 2;
pub const MIN_QUERY_CHARS: usize = 3;
pub const MIN_COMPARE_IDS: usize = 2;

/// Why a request was refused without contacting the backend.
/// The `Display` text is the `detail` sent to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Missing email or password")]
    MissingCredentials,
    #[error("Missing required fields")]
    MissingRegistrationFields,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Full name must be at least 2 characters")]
    FullNameTooShort,
    #[error("Query must be at least 3 characters")]
    QueryTooShort,
    #[error("At least 2 search IDs required")]
    TooFewSearchIds,
    #[error("At least one paper ID required")]
    NoPaperIds,
    #[error("Invalid format. Must be bibtex, apa, or json")]
    InvalidCitationFormat,
    #[error("Missing authorization header")]
    MissingAuthorization,
}

/// A field counts as present only when it is non-empty.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Length in UTF-16 code units, the unit browsers report for `value.length`.
fn char_len(value: &str) -> usize {
    value.encode_utf16().count()
}

//=========================================================================================
// Inbound Payloads
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginPayload {
    pub fn validate(&self) -> Result<(), Rejection> {
        match (present(&self.email), present(&self.password)) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(Rejection::MissingCredentials),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

impl RegisterPayload {
    pub fn validate(&self) -> Result<(), Rejection> {
        let (Some(_), Some(password), Some(full_name)) = (
            present(&self.email),
            present(&self.password),
            present(&self.full_name),
        ) else {
            return Err(Rejection::MissingRegistrationFields);
        };

        if char_len(password) < MIN_PASSWORD_CHARS {
            return Err(Rejection::PasswordTooShort);
        }
        if char_len(full_name) < MIN_FULL_NAME_CHARS {
            return Err(Rejection::FullNameTooShort);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SearchPayload {
    pub query: Option<String>,
    pub top_k: Option<u32>,
    pub filters: Option<SearchFilters>,
}

impl SearchPayload {
    pub fn validate(&self) -> Result<(), Rejection> {
        match present(&self.query) {
            Some(query) if char_len(query) >= MIN_QUERY_CHARS => Ok(()),
            _ => Err(Rejection::QueryTooShort),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ComparePayload {
    pub search_ids: Option<Vec<String>>,
}

impl ComparePayload {
    pub fn validate(&self) -> Result<(), Rejection> {
        match &self.search_ids {
            Some(ids) if ids.len() >= MIN_COMPARE_IDS => Ok(()),
            _ => Err(Rejection::TooFewSearchIds),
        }
    }
}

/// `format` stays a string here: an unknown format is a 400, not a decoding failure.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CitationPayload {
    pub paper_ids: Option<Vec<String>>,
    pub format: Option<String>,
}

impl CitationPayload {
    pub fn validate(&self) -> Result<CitationFormat, Rejection> {
        match &self.paper_ids {
            Some(ids) if !ids.is_empty() => {}
            _ => return Err(Rejection::NoPaperIds),
        }
        self.format
            .as_deref()
            .and_then(|format| format.parse().ok())
            .ok_or(Rejection::InvalidCitationFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn login_requires_both_fields() {
        let ok = LoginPayload { email: s("a@b.com"), password: s("x") };
        assert_eq!(ok.validate(), Ok(()));

        let no_password = LoginPayload { email: s("a@b.com"), password: None };
        assert_eq!(no_password.validate(), Err(Rejection::MissingCredentials));

        let empty_email = LoginPayload { email: s(""), password: s("pw") };
        assert_eq!(empty_email.validate(), Err(Rejection::MissingCredentials));
    }

    #[test]
    fn register_checks_presence_before_lengths() {
        let missing = RegisterPayload { email: s("a@b.com"), password: s("short"), full_name: None };
        assert_eq!(missing.validate(), Err(Rejection::MissingRegistrationFields));

        let short_password = RegisterPayload {
            email: s("a@b.com"),
            password: s("1234567"),
            full_name: s("Ada"),
        };
        assert_eq!(short_password.validate(), Err(Rejection::PasswordTooShort));

        let short_name = RegisterPayload {
            email: s("a@b.com"),
            password: s("12345678"),
            full_name: s("A"),
        };
        assert_eq!(short_name.validate(), Err(Rejection::FullNameTooShort));

        let ok = RegisterPayload {
            email: s("a@b.com"),
            password: s("12345678"),
            full_name: s("Al"),
        };
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let name = RegisterPayload {
            email: s("a@b.com"),
            password: s("pässwört"),
            full_name: s("Ö"),
        };
        assert_eq!(name.validate(), Err(Rejection::FullNameTooShort));

        let query = SearchPayload { query: s("ßü"), ..Default::default() };
        assert_eq!(query.validate(), Err(Rejection::QueryTooShort));
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let account = RegisterPayload {
            email: s("a@b.com"),
            password: s("\u{1F600}\u{1F601}\u{1F602}\u{1F603}"),
            full_name: s("\u{1D538}"),
        };
        assert_eq!(account.validate(), Ok(()));

        let too_short = RegisterPayload {
            password: s("\u{1F600}\u{1F601}\u{1F602}"),
            ..account
        };
        assert_eq!(too_short.validate(), Err(Rejection::PasswordTooShort));
    }

    #[test]
    fn search_query_needs_three_characters() {
        assert_eq!(
            SearchPayload { query: s("ab"), ..Default::default() }.validate(),
            Err(Rejection::QueryTooShort)
        );
        assert_eq!(SearchPayload::default().validate(), Err(Rejection::QueryTooShort));
        assert_eq!(SearchPayload { query: s("abc"), ..Default::default() }.validate(), Ok(()));
    }

    #[test]
    fn compare_needs_two_ids() {
        let one = ComparePayload { search_ids: Some(vec!["1".into()]) };
        assert_eq!(one.validate(), Err(Rejection::TooFewSearchIds));
        assert_eq!(ComparePayload::default().validate(), Err(Rejection::TooFewSearchIds));

        let two = ComparePayload { search_ids: Some(vec!["1".into(), "2".into()]) };
        assert_eq!(two.validate(), Ok(()));
    }

    #[test]
    fn citations_need_ids_then_a_known_format() {
        let none = CitationPayload { paper_ids: Some(vec![]), format: s("apa") };
        assert_eq!(none.validate(), Err(Rejection::NoPaperIds));

        let bad_format = CitationPayload { paper_ids: Some(vec!["s:p".into()]), format: s("mla") };
        assert_eq!(bad_format.validate(), Err(Rejection::InvalidCitationFormat));

        let missing_format = CitationPayload { paper_ids: Some(vec!["s:p".into()]), format: None };
        assert_eq!(missing_format.validate(), Err(Rejection::InvalidCitationFormat));

        let ok = CitationPayload { paper_ids: Some(vec!["s:p".into()]), format: s("bibtex") };
        assert_eq!(ok.validate(), Ok(CitationFormat::Bibtex));
    }

    #[test]
    fn rejection_text_is_the_wire_detail() {
        assert_eq!(
            Rejection::QueryTooShort.to_string(),
            "Query must be at least 3 characters"
        );
        assert_eq!(
            Rejection::MissingAuthorization.to_string(),
            "Missing authorization header"
        );
    }
}
