use camino::{Utf8Path, Utf8PathBuf};

use crate::{
    error::{Error, PersistenceError, Result},
    model::{Draft, Recipe},
    storage::{Storage, RECIPES_KEY},
    writer::Writer,
};

/// The recipe book
///
/// Holds the ordered collection in memory and mirrors it to a [`Storage`].
/// Every successful mutation queues a full snapshot for the background
/// writer before returning. Recipes are identified by their position.
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    writer: Writer,
    location: Option<Utf8PathBuf>,
}

/// A recipe matched by [`RecipeStore::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// Position in the whole collection
    pub index: usize,
    pub recipe: &'a Recipe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Deleted(Recipe),
    Cancelled,
}

impl RecipeStore {
    /// Loads the book and starts the background writer.
    ///
    /// Stored data never makes this fail. A missing value starts an empty
    /// book, and so does a value that cannot be read or decoded; those
    /// problems are logged and available from
    /// [`take_persist_failures`](Self::take_persist_failures).
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn load(storage: impl Storage) -> Result<Self> {
        let (recipes, load_error) = match read_recipes(&storage) {
            Ok(recipes) => (recipes, None),
            Err(err) => {
                tracing::warn!(error = %err, "starting with an empty book");
                (Vec::new(), Some(err))
            }
        };
        tracing::debug!(count = recipes.len(), "recipes loaded");

        let location = storage.location().map(Utf8Path::to_path_buf);
        let writer = Writer::spawn(Box::new(storage))?;
        if let Some(err) = load_error {
            writer.record(err);
        }

        Ok(Self {
            recipes,
            writer,
            location,
        })
    }

    /// Queues the whole collection to be written.
    ///
    /// Called after every mutation. Returns right away.
    pub fn persist(&self) {
        match serde_json::to_string(&self.recipes) {
            Ok(value) => self.writer.send(RECIPES_KEY, value),
            Err(e) => {
                let err = PersistenceError::Encode(e);
                tracing::warn!(error = %err, "could not save recipes");
                self.writer.record(err);
            }
        }
    }

    /// Appends a recipe built from `draft` and returns its index
    pub fn create(&mut self, draft: &Draft) -> Result<usize> {
        let recipe = Recipe::from_draft(draft)?;
        tracing::debug!(title = %recipe.title, "recipe created");
        self.recipes.push(recipe);
        self.persist();
        Ok(self.recipes.len() - 1)
    }

    /// Replaces the recipe at `index` with one built from `draft`
    pub fn update(&mut self, index: usize, draft: &Draft) -> Result<&Recipe> {
        self.check_index(index)?;
        let recipe = Recipe::from_draft(draft)?;
        tracing::debug!(index, title = %recipe.title, "recipe updated");
        self.recipes[index] = recipe;
        self.persist();
        Ok(&self.recipes[index])
    }

    /// Removes the recipe at `index` if `confirm` agrees.
    ///
    /// `confirm` is asked with the recipe about to be deleted and nothing
    /// changes unless it returns `true`.
    pub fn delete(
        &mut self,
        index: usize,
        confirm: impl FnOnce(&Recipe) -> bool,
    ) -> Result<Deletion> {
        self.check_index(index)?;
        if !confirm(&self.recipes[index]) {
            return Ok(Deletion::Cancelled);
        }
        let recipe = self.recipes.remove(index);
        tracing::debug!(index, title = %recipe.title, "recipe deleted");
        self.persist();
        Ok(Deletion::Deleted(recipe))
    }

    /// Recipes whose title contains `query`, ignoring case, in book order.
    ///
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.to_lowercase();
        self.recipes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.matches_lowercase(&query))
            .map(|(index, recipe)| SearchHit { index, recipe })
            .collect()
    }

    /// The draft to edit the recipe at `index` with
    pub fn begin_edit(&self, index: usize) -> Result<Draft> {
        self.get(index).map(Recipe::to_draft)
    }

    pub fn get(&self, index: usize) -> Result<&Recipe> {
        self.recipes.get(index).ok_or(Error::Index {
            index,
            len: self.recipes.len(),
        })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Directory the book is saved to, if it is on disk
    pub fn location(&self) -> Option<&Utf8Path> {
        self.location.as_deref()
    }

    /// Waits for every queued write
    pub fn flush(&self) {
        self.writer.flush();
    }

    /// Load and save problems since the last call, the most recent ones
    /// if there were many
    pub fn take_persist_failures(&self) -> Vec<PersistenceError> {
        self.writer.take_failures()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        self.get(index).map(|_| ())
    }
}

impl std::fmt::Debug for RecipeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeStore")
            .field("recipes", &self.recipes)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

fn read_recipes(storage: &impl Storage) -> Result<Vec<Recipe>, PersistenceError> {
    let Some(content) = storage.get(RECIPES_KEY)? else {
        tracing::debug!("no saved recipes");
        return Ok(Vec::new());
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(PersistenceError::Decode)
}
