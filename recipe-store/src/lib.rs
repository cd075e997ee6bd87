//! A personal recipe book kept in local storage
//!
//! [`RecipeStore`] owns the ordered list of recipes and writes the whole of
//! it under a single key after every change. Writes happen in the
//! background, in order, and never block the caller.
//!
//! ```no_run
//! use recipe_store::{Draft, FileStorage, RecipeStore};
//!
//! # fn main() -> recipe_store::Result<()> {
//! let mut store = RecipeStore::load(FileStorage::new("recipes"))?;
//! let index = store.create(&Draft::new("Cake", "flour, sugar, eggs", "45"))?;
//! assert_eq!(store.get(index)?.time, "45 MIN");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod session;
pub mod storage;
pub mod store;
mod writer;

pub use error::{Error, PersistenceError, Result, ValidationError};
pub use model::{Draft, Field, Recipe};
pub use session::EditSession;
pub use storage::{FileStorage, MemoryStorage, Storage, RECIPES_KEY};
pub use store::{Deletion, RecipeStore, SearchHit};
