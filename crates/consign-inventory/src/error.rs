use thiserror::Error;

/// A read or update named a record that was never added.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("{collection} #{id} not found")]
    NotFound { collection: &'static str, id: u64 },
}
