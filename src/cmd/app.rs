use std::{fmt, io::Write};

use anstream::eprintln;
use anyhow::Result;
use clap::Args;
use inquire::{Select, Text};
use recipe_store::{Deletion, EditSession, RecipeStore};
use strum::IntoEnumIterator;

use crate::{cmd::delete::delete_confirmed, form, render, Context};

#[derive(Debug, Args)]
pub struct AppArgs {
    /// Start with this search
    #[arg(long, default_value = "")]
    search: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
enum Action {
    #[strum(to_string = "+ New recipe")]
    New,
    #[strum(to_string = "Search")]
    Search,
    #[strum(to_string = "Edit")]
    Edit,
    #[strum(to_string = "Delete")]
    Delete,
    #[strum(to_string = "Quit")]
    Quit,
}

/// A recipe in the current view, pointing back to the whole book
struct Choice {
    index: usize,
    title: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\u{2665} {}", self.title)
    }
}

pub fn run(ctx: &Context, args: AppArgs) -> Result<()> {
    ctx.with_store(|store| {
        let mut session = EditSession::new();
        let mut query = args.search;

        loop {
            print_view(store, &query)?;

            let action = Select::new("What now?", actions(store))
                .with_vim_mode(true)
                .prompt_skippable()?;
            match action.unwrap_or(Action::Quit) {
                Action::Quit => break,
                Action::New => {
                    session.start_new()?;
                    compose(store, &mut session)?;
                }
                Action::Search => {
                    query = Text::new("Search recipe:")
                        .with_initial_value(&query)
                        .with_help_message("Empty to show every recipe")
                        .prompt_skippable()?
                        .unwrap_or(query);
                }
                Action::Edit => {
                    if let Some(index) = pick(store, &query, "Edit which recipe?")? {
                        session.start_edit(store, index)?;
                        compose(store, &mut session)?;
                    }
                }
                Action::Delete => {
                    if let Some(index) = pick(store, &query, "Delete which recipe?")? {
                        if let Deletion::Deleted(recipe) = delete_confirmed(store, index)? {
                            eprintln!("Deleted '{}'", recipe.title);
                        }
                    }
                }
            }
            ctx.report_failures(store);
        }
        Ok(())
    })
}

fn actions(store: &RecipeStore) -> Vec<Action> {
    Action::iter()
        .filter(|a| !store.is_empty() || !matches!(a, Action::Edit | Action::Delete))
        .collect()
}

fn print_view(store: &RecipeStore, query: &str) -> Result<()> {
    let mut out = anstream::stdout().lock();
    writeln!(out)?;
    render::print_header(&mut out, "RECIPE BOOK")?;
    if !query.is_empty() {
        writeln!(out, "Search: {query}")?;
        writeln!(out)?;
    }
    let hits = store.search(query);
    if hits.is_empty() {
        writeln!(out, "No recipes to show")?;
    }
    for hit in hits {
        render::print_card(&mut out, hit.recipe)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Lets the user pick from the recipes in view and returns its index in the book
fn pick(store: &RecipeStore, query: &str, message: &str) -> Result<Option<usize>> {
    let choices = store
        .search(query)
        .into_iter()
        .map(|hit| Choice {
            index: hit.index,
            title: hit.recipe.title.clone(),
        })
        .collect::<Vec<_>>();
    if choices.is_empty() {
        eprintln!("No recipes to choose from");
        return Ok(None);
    }
    let choice = Select::new(message, choices).prompt_skippable()?;
    Ok(choice.map(|c| c.index))
}

/// Runs the form until the recipe is saved or the user gives up
fn compose(store: &mut RecipeStore, session: &mut EditSession) -> Result<()> {
    loop {
        let save = if session.target().is_some() {
            "Save changes"
        } else {
            "Save"
        };
        let Some(draft) = session.draft_mut() else {
            return Ok(());
        };
        if !form::prompt_draft(draft)? {
            session.cancel()?;
            return Ok(());
        }

        let choice = Select::new("Done?", vec![save, "Cancel"]).prompt_skippable()?;
        if choice != Some(save) {
            session.cancel()?;
            return Ok(());
        }

        match session.save(store) {
            Ok(index) => {
                eprintln!("Saved '{}'", store.get(index)?.title);
                return Ok(());
            }
            // the draft is kept so the user can fix it
            Err(e) if e.is_validation() => render::error(&e),
            Err(e) => {
                session.cancel()?;
                return Err(e.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_store::{Draft, MemoryStorage};

    #[test]
    fn test_actions() {
        let mut store = RecipeStore::load(MemoryStorage::new()).unwrap();
        assert_eq!(
            actions(&store),
            [Action::New, Action::Search, Action::Quit]
        );
        store.create(&Draft::new("Cake", "flour", "45")).unwrap();
        assert_eq!(actions(&store).len(), 5);
    }

    #[test]
    fn test_choice_display() {
        let choice = Choice {
            index: 3,
            title: "Bread".into(),
        };
        assert_eq!(choice.to_string(), "\u{2665} Bread");
    }
}
