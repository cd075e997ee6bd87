//! The add/edit form as a state machine
//!
//! ```text
//! Idle --start_new--> Composing(empty, None)
//! Idle --start_edit(i)--> Composing(prefilled, Some(i))
//! Composing --cancel--> Idle
//! Composing --save ok--> Idle
//! ```
//!
//! A failed save leaves the session composing with the same draft.

use crate::{
    error::{Error, Result},
    model::Draft,
    store::RecipeStore,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Composing {
        draft: Draft,
        /// Recipe being edited, `None` for a new one
        target: Option<usize>,
    },
}

impl EditSession {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn start_new(&mut self) -> Result<()> {
        self.ensure_idle()?;
        *self = Self::Composing {
            draft: Draft::default(),
            target: None,
        };
        Ok(())
    }

    pub fn start_edit(&mut self, store: &RecipeStore, index: usize) -> Result<()> {
        self.ensure_idle()?;
        let draft = store.begin_edit(index)?;
        *self = Self::Composing {
            draft,
            target: Some(index),
        };
        Ok(())
    }

    /// Drops the draft and goes back to idle
    pub fn cancel(&mut self) -> Result<()> {
        if !self.is_composing() {
            return Err(Error::NotComposing);
        }
        *self = Self::Idle;
        Ok(())
    }

    /// Creates or updates the recipe and goes back to idle.
    ///
    /// Returns the index of the saved recipe.
    pub fn save(&mut self, store: &mut RecipeStore) -> Result<usize> {
        let Self::Composing { draft, target } = self else {
            return Err(Error::NotComposing);
        };
        let index = match *target {
            Some(index) => store.update(index, draft).map(|_| index),
            None => store.create(draft),
        }?;
        *self = Self::Idle;
        Ok(index)
    }

    pub fn is_composing(&self) -> bool {
        matches!(self, Self::Composing { .. })
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Idle => None,
            Self::Composing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Self::Idle => None,
            Self::Composing { draft, .. } => Some(draft),
        }
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Composing { target, .. } => *target,
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_composing() {
            Err(Error::AlreadyComposing)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> RecipeStore {
        let mut store = RecipeStore::load(MemoryStorage::new()).unwrap();
        store
            .create(&Draft::new("Cake", "flour, sugar", "45"))
            .unwrap();
        store
    }

    #[test]
    fn test_new_recipe() {
        let mut store = store();
        let mut session = EditSession::new();
        session.start_new().unwrap();
        assert_eq!(session.draft(), Some(&Draft::default()));
        assert_eq!(session.target(), None);

        *session.draft_mut().unwrap() = Draft::new("Bread", "flour, water", "60");
        assert_eq!(session.save(&mut store).unwrap(), 1);
        assert_eq!(session, EditSession::Idle);
        assert_eq!(store.get(1).unwrap().title, "Bread");
    }

    #[test]
    fn test_edit_recipe() {
        let mut store = store();
        let mut session = EditSession::new();
        session.start_edit(&store, 0).unwrap();
        assert_eq!(session.target(), Some(0));
        let draft = session.draft_mut().unwrap();
        assert_eq!(draft, &Draft::new("Cake", "flour, sugar", "45"));

        draft.time = "50".into();
        assert_eq!(session.save(&mut store).unwrap(), 0);
        assert!(!session.is_composing());
        assert_eq!(store.get(0).unwrap().time, "50 MIN");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_save_keeps_composing() {
        let mut store = store();
        let mut session = EditSession::new();
        session.start_new().unwrap();
        session.draft_mut().unwrap().title = "Only a title".into();

        let err = session.save(&mut store).unwrap_err();
        assert!(err.is_validation());
        assert!(session.is_composing());
        assert_eq!(session.draft().unwrap().title, "Only a title");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut store = store();
        let mut session = EditSession::new();
        session.start_edit(&store, 0).unwrap();
        session.draft_mut().unwrap().title = "Changed".into();
        session.cancel().unwrap();
        assert_eq!(session, EditSession::Idle);
        assert_eq!(store.get(0).unwrap().title, "Cake");

        assert!(matches!(session.cancel(), Err(Error::NotComposing)));
        assert!(matches!(session.save(&mut store), Err(Error::NotComposing)));
    }

    #[test]
    fn test_no_other_transitions() {
        let store = store();
        let mut session = EditSession::new();
        assert!(session.start_edit(&store, 3).unwrap_err().is_index());
        assert_eq!(session, EditSession::Idle);

        session.start_new().unwrap();
        assert!(matches!(session.start_new(), Err(Error::AlreadyComposing)));
        assert!(matches!(
            session.start_edit(&store, 0),
            Err(Error::AlreadyComposing)
        ));
        assert_eq!(session.target(), None);
    }
}
