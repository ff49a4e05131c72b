//! Local state file for anonymous shoppers.
//!
//! Without a session the cart and favorites live in a small JSON file next
//! to the shopper, mirroring what the storefront would keep server-side. The
//! file is read in full and written in full on every change; it stays small
//! enough that this is never a concern.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tuckshop::plans::PlanKind;

use crate::selections::{SavedSelection, SelectionStore, SelectionStoreError};

/// Error reading or writing the local state file.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// The file could not be read or written.
    #[error("state file error: {0}")]
    Io(#[from] io::Error),

    /// The file exists but does not hold valid state.
    #[error("state file did not parse: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Everything persisted for an anonymous shopper.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalState {
    /// Saved cart selections, in saved order.
    #[serde(default)]
    pub cart: Vec<SavedSelection>,

    /// Favorited product ids, in saved order.
    #[serde(default)]
    pub favorites: Vec<String>,
}

/// JSON state file holding an anonymous shopper's cart and favorites.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Open a store backed by the given file path.
    ///
    /// The file does not need to exist yet; a missing file reads as empty
    /// state.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current state.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or does not parse. A
    /// missing file is not an error.
    pub fn load(&self) -> Result<LocalState, LocalStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(LocalState::default());
            }
            Err(error) => return Err(error.into()),
        };

        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the state back, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, state: &LocalState) -> Result<(), LocalStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;

        Ok(())
    }

    /// Favorited product ids, in saved order.
    ///
    /// # Errors
    ///
    /// Returns an error when the state file cannot be read.
    pub fn favorites(&self) -> Result<Vec<String>, LocalStoreError> {
        Ok(self.load()?.favorites)
    }

    /// Flip whether a product is favorited, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns an error when the state file cannot be read or written.
    pub fn toggle_favorite(&self, product_id: &str) -> Result<bool, LocalStoreError> {
        let mut state = self.load()?;

        let favorited = if state.favorites.iter().any(|id| id == product_id) {
            state.favorites.retain(|id| id != product_id);
            false
        } else {
            state.favorites.push(product_id.to_string());
            true
        };

        self.save(&state)?;

        Ok(favorited)
    }
}

#[async_trait]
impl SelectionStore for LocalStore {
    async fn selections(&self) -> Result<Vec<SavedSelection>, SelectionStoreError> {
        Ok(self.load().map_err(SelectionStoreError::Local)?.cart)
    }

    async fn add(&self, selection: SavedSelection) -> Result<(), SelectionStoreError> {
        let mut state = self.load().map_err(SelectionStoreError::Local)?;

        // Re-adding a carted product just moves it to the new cadence.
        if let Some(existing) = state
            .cart
            .iter_mut()
            .find(|saved| saved.product_id == selection.product_id)
        {
            existing.plan = selection.plan;
        } else {
            state.cart.push(selection);
        }

        self.save(&state).map_err(SelectionStoreError::Local)?;

        Ok(())
    }

    async fn set_plan(&self, product_id: &str, plan: PlanKind) -> Result<(), SelectionStoreError> {
        let mut state = self.load().map_err(SelectionStoreError::Local)?;

        let Some(saved) = state
            .cart
            .iter_mut()
            .find(|saved| saved.product_id == product_id)
        else {
            return Err(SelectionStoreError::NotFound);
        };

        saved.plan = plan;
        self.save(&state).map_err(SelectionStoreError::Local)?;

        Ok(())
    }

    async fn remove(&self, product_id: &str) -> Result<(), SelectionStoreError> {
        let mut state = self.load().map_err(SelectionStoreError::Local)?;

        let before = state.cart.len();
        state.cart.retain(|saved| saved.product_id != product_id);

        if state.cart.len() == before {
            return Err(SelectionStoreError::NotFound);
        }

        self.save(&state).map_err(SelectionStoreError::Local)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalStore {
        LocalStore::new(dir.path().join("state.json"))
    }

    #[test]
    fn missing_file_reads_as_empty_state() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        assert_eq!(store.load()?, LocalState::default());

        Ok(())
    }

    #[test]
    fn state_round_trips_through_the_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        let state = LocalState {
            cart: vec![SavedSelection::new("prod_1", PlanKind::Monthly)],
            favorites: vec!["prod_2".into()],
        };

        store.save(&state)?;

        assert_eq!(store.load()?, state);

        Ok(())
    }

    #[test]
    fn save_creates_missing_parent_directories() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalStore::new(dir.path().join("nested/deeper/state.json"));

        store.save(&LocalState::default())?;

        assert_eq!(store.load()?, LocalState::default());

        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_wipe() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        fs::write(store.path(), "not json at all")?;

        let result = store.load();

        assert!(matches!(result, Err(LocalStoreError::Serde(_))));

        Ok(())
    }

    #[test]
    fn toggle_favorite_flips_membership() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        assert!(store.toggle_favorite("prod_1")?);
        assert_eq!(store.favorites()?, vec!["prod_1".to_string()]);

        assert!(!store.toggle_favorite("prod_1")?);
        assert!(store.favorites()?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn adding_a_carted_product_changes_its_cadence() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        store
            .add(SavedSelection::new("prod_1", PlanKind::Monthly))
            .await?;
        store
            .add(SavedSelection::new("prod_1", PlanKind::Yearly))
            .await?;

        let selections = store.selections().await?;

        assert_eq!(
            selections,
            vec![SavedSelection::new("prod_1", PlanKind::Yearly)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_plan_and_remove_require_the_product_to_be_carted() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        let result = store.set_plan("prod_1", PlanKind::Yearly).await;
        assert!(matches!(result, Err(SelectionStoreError::NotFound)));

        let result = store.remove("prod_1").await;
        assert!(matches!(result, Err(SelectionStoreError::NotFound)));

        store
            .add(SavedSelection::new("prod_1", PlanKind::Monthly))
            .await?;
        store.set_plan("prod_1", PlanKind::Yearly).await?;
        store.remove("prod_1").await?;

        assert!(store.selections().await?.is_empty());

        Ok(())
    }
}
