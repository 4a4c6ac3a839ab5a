//! Classification terms attached to media items (many-to-many).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::media::{slugify, validate_slug};
use crate::types::{define_text_enum, DbId, Timestamp};

pub const MAX_LABEL_LEN: usize = 120;

define_text_enum! {
    TaxonomyKind {
        Domain = "domain",
        Stage = "stage",
        Format = "format",
        Tag = "tag",
    }
}

/// A row from the `taxonomy_terms` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: DbId,
    pub kind: TaxonomyKind,
    pub label: String,
    pub key: String,
    pub created_at: Timestamp,
}

/// Request body for creating a term.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTerm {
    pub kind: TaxonomyKind,
    pub label: String,
    /// Derived from the label when omitted.
    pub key: Option<String>,
}

/// Validated term ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTerm {
    pub kind: TaxonomyKind,
    pub label: String,
    pub key: String,
}

impl CreateTerm {
    pub fn validate(self) -> Result<NewTerm, CoreError> {
        let label = self.label.trim().to_string();
        if label.is_empty() || label.chars().count() > MAX_LABEL_LEN {
            return Err(CoreError::Validation(format!(
                "Label must be between 1 and {MAX_LABEL_LEN} characters"
            )));
        }
        let key = self.key.unwrap_or_else(|| slugify(&label));
        validate_slug(&key)?;
        Ok(NewTerm {
            kind: self.kind,
            label,
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_derived_from_label() {
        let term = CreateTerm {
            kind: TaxonomyKind::Domain,
            label: "  Tax & Compliance ".into(),
            key: None,
        }
        .validate()
        .unwrap();
        assert_eq!(term.label, "Tax & Compliance");
        assert_eq!(term.key, "tax-compliance");
    }

    #[test]
    fn explicit_key_must_be_a_slug() {
        let result = CreateTerm {
            kind: TaxonomyKind::Tag,
            label: "Payroll".into(),
            key: Some("Pay Roll".into()),
        }
        .validate();
        assert!(result.is_err());
    }

    #[test]
    fn blank_label_rejected() {
        let result = CreateTerm {
            kind: TaxonomyKind::Stage,
            label: " ".into(),
            key: None,
        }
        .validate();
        assert!(result.is_err());
    }
}
