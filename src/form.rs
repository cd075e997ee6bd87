//! Interactive add/edit form

use anyhow::Result;
use inquire::Text;
use recipe_store::{Draft, Field};

pub fn label(field: Field) -> &'static str {
    match field {
        Field::Title => "Recipe title:",
        Field::Ingredients => "Ingredients (comma separated):",
        Field::Time => "Time (in minutes):",
    }
}

fn help(field: Field) -> Option<&'static str> {
    match field {
        Field::Title => None,
        Field::Ingredients => Some("e.g. flour, sugar, eggs"),
        Field::Time => Some("Just the number, \" MIN\" is added for you"),
    }
}

/// Asks for every field, starting from the current values.
///
/// Returns `false` if the user skipped the form with ESC.
pub fn prompt_draft(draft: &mut Draft) -> Result<bool> {
    prompt_fields(draft, &Field::ALL)
}

/// Asks only for the fields that are still blank
pub fn prompt_missing(draft: &mut Draft) -> Result<bool> {
    let blank = draft.blank_fields();
    prompt_fields(draft, &blank)
}

fn prompt_fields(draft: &mut Draft, fields: &[Field]) -> Result<bool> {
    for &field in fields {
        let current = draft.field(field).to_string();
        let mut prompt = Text::new(label(field)).with_initial_value(&current);
        if let Some(help) = help(field) {
            prompt = prompt.with_help_message(help);
        }
        match prompt.prompt_skippable()? {
            Some(value) => *draft.field_mut(field) = value,
            None => return Ok(false),
        }
    }
    Ok(true)
}
