//! Reset persisted shop state.
//!
//! Each record is removed individually so a reset of one collection never
//! touches the others. Removing a record that does not exist is a no-op.

use std::path::Path;

use mono_storefront::storage::{LocalStore, keys};

/// Which persisted records to remove.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    Cart,
    Wishlist,
    Address,
    All,
}

/// Remove the selected records from the data directory.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or a record cannot be
/// removed.
pub fn run(data_dir: &Path, target: Target) -> Result<(), Box<dyn std::error::Error>> {
    let store = LocalStore::open(data_dir)?;

    let selected: &[&str] = match target {
        Target::Cart => &[keys::CART],
        Target::Wishlist => &[keys::WISHLIST],
        Target::Address => &[keys::SAVED_ADDRESS],
        Target::All => &[keys::CART, keys::WISHLIST, keys::SAVED_ADDRESS],
    };

    for key in selected {
        store.remove(key)?;
        tracing::info!(key, "removed persisted record");
    }
    Ok(())
}
