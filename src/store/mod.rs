pub mod base;
pub mod memory;
pub mod postgres;

// Re-export the primary store items so code outside can do
// "use crate::store::{UserStore, TodoStore, create_store};"
pub use base::{create_store, TodoStore, UserStore};
