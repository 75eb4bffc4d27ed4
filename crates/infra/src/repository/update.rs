//! Partial update parameters and the validation shared by every backend.
//!
//! Callers describe an update as a map of attribute name to new value holding
//! only the attributes being changed. Validation splits it into the typed
//! [`MoviePatch`] for the known attributes plus whatever keys are left over.

use serde_json::{Map, Value};

use movietrack_core::MoviePatch;

use super::r#trait::RepositoryError;

pub const FIELD_ID: &str = "id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_RELEASE_YEAR: &str = "release_year";
pub const FIELD_WATCHED: &str = "watched";

/// Raw partial update: attribute name -> new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieUpdate {
    fields: Map<String, Value>,
}

/// Outcome of [`MovieUpdate::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedUpdate {
    /// Typed changes to the known attributes.
    pub patch: MoviePatch,
    /// Keys that are not movie attributes, in insertion order.
    pub extra: Map<String, Value>,
}

impl MovieUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Check the parameters and split them into typed and leftover parts.
    ///
    /// An `id` key is rejected whatever else is present.
    pub fn validate(self) -> Result<ValidatedUpdate, RepositoryError> {
        if self.fields.contains_key(FIELD_ID) {
            return Err(RepositoryError::IdentityChange);
        }

        let mut validated = ValidatedUpdate::default();
        for (field, value) in self.fields {
            match field.as_str() {
                FIELD_TITLE => {
                    let title = expect_string(&field, value)?;
                    if title.is_empty() {
                        return Err(RepositoryError::invalid_field(field, "must not be empty"));
                    }
                    validated.patch.title = Some(title);
                }
                FIELD_DESCRIPTION => {
                    validated.patch.description = Some(expect_string(&field, value)?);
                }
                FIELD_RELEASE_YEAR => {
                    let year = value
                        .as_i64()
                        .and_then(|v| i32::try_from(v).ok())
                        .ok_or_else(|| RepositoryError::invalid_field(&field, "expected a 32-bit integer"))?;
                    validated.patch.release_year = Some(year);
                }
                FIELD_WATCHED => {
                    let watched = value
                        .as_bool()
                        .ok_or_else(|| RepositoryError::invalid_field(&field, "expected a boolean"))?;
                    validated.patch.watched = Some(watched);
                }
                _ => {
                    validated.extra.insert(field, value);
                }
            }
        }

        Ok(validated)
    }
}

fn expect_string(field: &str, value: Value) -> Result<String, RepositoryError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(RepositoryError::invalid_field(field, "expected a string")),
    }
}

impl From<Map<String, Value>> for MovieUpdate {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<MoviePatch> for MovieUpdate {
    fn from(patch: MoviePatch) -> Self {
        let mut update = MovieUpdate::new();
        if let Some(title) = patch.title {
            update = update.set(FIELD_TITLE, title);
        }
        if let Some(description) = patch.description {
            update = update.set(FIELD_DESCRIPTION, description);
        }
        if let Some(release_year) = patch.release_year {
            update = update.set(FIELD_RELEASE_YEAR, release_year);
        }
        if let Some(watched) = patch.watched {
            update = update.set(FIELD_WATCHED, watched);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_rejected_even_with_valid_fields() {
        let err = MovieUpdate::new()
            .set("title", "New Title")
            .set("id", "other")
            .validate()
            .unwrap_err();
        assert!(matches!(err, RepositoryError::IdentityChange));
    }

    #[test]
    fn known_fields_become_typed_patch() {
        let v = MovieUpdate::new()
            .set("title", "Test Title")
            .set("description", "Test Description")
            .set("release_year", 2000)
            .set("watched", true)
            .validate()
            .unwrap();

        assert_eq!(
            v.patch,
            MoviePatch {
                title: Some("Test Title".into()),
                description: Some("Test Description".into()),
                release_year: Some(2000),
                watched: Some(true),
            }
        );
        assert!(v.extra.is_empty());
    }

    #[test]
    fn unknown_fields_are_kept_aside() {
        let v = MovieUpdate::new()
            .set("watched", true)
            .set("rating", 5)
            .validate()
            .unwrap();

        assert_eq!(v.patch.watched, Some(true));
        assert_eq!(v.extra.get("rating"), Some(&json!(5)));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let cases = [
            ("title", json!(12)),
            ("description", json!(false)),
            ("release_year", json!("2000")),
            ("release_year", json!(1.5)),
            ("release_year", json!(i64::MAX)),
            ("watched", json!("yes")),
        ];

        for (field, value) in cases {
            let err = MovieUpdate::new().set(field, value).validate().unwrap_err();
            match err {
                RepositoryError::InvalidField { field: f, .. } => assert_eq!(f, field),
                other => panic!("expected InvalidField for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        let err = MovieUpdate::new().set("title", "").validate().unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn empty_update_validates_to_empty() {
        let v = MovieUpdate::new().validate().unwrap();
        assert!(v.patch.is_empty());
        assert!(v.extra.is_empty());
    }

    #[test]
    fn patch_converts_only_present_fields() {
        let update = MovieUpdate::from(MoviePatch {
            release_year: Some(1999),
            ..Default::default()
        });
        assert_eq!(update.len(), 1);
        assert!(update.contains("release_year"));
        assert!(!update.contains("title"));
    }
}
