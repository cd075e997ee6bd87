//! Recipe records and the text forms they are edited in
//!
//! A [`Recipe`] is what gets stored. A [`Draft`] is the three free text
//! fields a user types. The conversion between them must round-trip for
//! well formed data: ingredients are split on `,` and joined back with
//! `", "`, and the time gets a `" MIN"` suffix that is stripped again when
//! editing.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Suffix appended to the time value of every stored recipe
pub const TIME_SUFFIX: &str = " MIN";

/// Separator used to join ingredients back into a single line
pub const INGREDIENT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub time: String,
}

impl Recipe {
    /// Validates the draft and builds the stored form of it
    pub fn from_draft(draft: &Draft) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            title: draft.title.clone(),
            ingredients: split_ingredients(&draft.ingredients),
            time: format_time(&draft.time),
        })
    }

    /// The draft a user would have typed to get this recipe
    pub fn to_draft(&self) -> Draft {
        Draft {
            title: self.title.clone(),
            ingredients: join_ingredients(&self.ingredients),
            time: strip_time(&self.time).to_string(),
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        self.matches_lowercase(&query.to_lowercase())
    }

    /// Same as [`matches`](Self::matches) for a query that is already lowercase
    pub(crate) fn matches_lowercase(&self, query: &str) -> bool {
        query.is_empty() || self.title.to_lowercase().contains(query)
    }
}

/// Text fields of the add/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    /// Comma separated list
    pub ingredients: String,
    /// Number of minutes, as typed
    pub time: String,
}

impl Draft {
    pub fn new(
        title: impl Into<String>,
        ingredients: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            ingredients: ingredients.into(),
            time: time.into(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Ingredients => &self.ingredients,
            Field::Time => &self.time,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Ingredients => &mut self.ingredients,
            Field::Time => &mut self.time,
        }
    }

    pub fn blank_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = self.blank_fields();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(blank))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Title,
    Ingredients,
    Time,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Ingredients, Field::Time];
}

/// Splits a comma separated line and trims every token.
///
/// Empty tokens are kept in place.
pub fn split_ingredients(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn join_ingredients(ingredients: &[String]) -> String {
    ingredients.join(INGREDIENT_SEPARATOR)
}

pub fn format_time(time: &str) -> String {
    format!("{time}{TIME_SUFFIX}")
}

/// Removes the [`TIME_SUFFIX`], if any.
pub fn strip_time(time: &str) -> &str {
    time.strip_suffix(TIME_SUFFIX).unwrap_or(time)
}
