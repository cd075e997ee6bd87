use anstream::eprintln;
use anyhow::{Context as _, Result};
use clap::Args;
use inquire::InquireError;
use recipe_store::{Deletion, Recipe, RecipeStore};

use crate::Context;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Recipe index, as shown by `list`
    index: usize,
}

pub fn run(ctx: &Context, args: DeleteArgs) -> Result<()> {
    ctx.with_store(|store| {
        match delete_confirmed(store, args.index)? {
            Deletion::Deleted(recipe) => eprintln!("Deleted '{}'", recipe.title),
            Deletion::Cancelled => eprintln!("Nothing deleted"),
        }
        Ok(())
    })
}

/// Deletes the recipe at `index` only if the user says yes
pub fn delete_confirmed(store: &mut RecipeStore, index: usize) -> Result<Deletion> {
    delete_with(store, index, confirm)
}

fn delete_with(
    store: &mut RecipeStore,
    index: usize,
    ask: impl FnOnce(&Recipe) -> Result<bool, InquireError>,
) -> Result<Deletion> {
    let mut prompt_error = None;
    let deletion = store.delete(index, |recipe| match ask(recipe) {
        Ok(yes) => yes,
        Err(e) => {
            prompt_error = Some(e);
            false
        }
    })?;
    if let Some(e) = prompt_error {
        return Err(e).context("Could not confirm the deletion");
    }
    Ok(deletion)
}

fn confirm(recipe: &Recipe) -> Result<bool, InquireError> {
    inquire::Confirm::new(&format!("Delete recipe '{}'?", recipe.title))
        .with_help_message("Are you sure you want to delete this recipe?")
        .with_default(false)
        .prompt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_store::{Draft, MemoryStorage};

    fn book() -> RecipeStore {
        let mut store = RecipeStore::load(MemoryStorage::new()).unwrap();
        store.create(&Draft::new("Cake", "flour", "45")).unwrap();
        store.create(&Draft::new("Bread", "flour, water", "180")).unwrap();
        store
    }

    #[test]
    fn test_delete_answers() {
        let mut store = book();
        let deletion = delete_with(&mut store, 1, |r| Ok(r.title == "Bread")).unwrap();
        assert!(matches!(deletion, Deletion::Deleted(r) if r.title == "Bread"));

        let deletion = delete_with(&mut store, 0, |_| Ok(false)).unwrap();
        assert_eq!(deletion, Deletion::Cancelled);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_prompt_error() {
        let mut store = book();
        let err = delete_with(&mut store, 0, |_| Err(InquireError::OperationCanceled));
        assert!(err.is_err());
        assert_eq!(store.len(), 2);
    }
}
