//! Repository modules for database operations
//!
//! Provides repository pattern implementations for todo mutations and
//! listings, encapsulating database queries.

mod filter;
mod pagination;
mod todo;
pub mod validation;

pub use filter::{DEFAULT_PATH, DEFAULT_PER_PAGE, TodoLister, TodoQuery};
pub use pagination::{PageLink, PageUrl, PagedResult};
pub use todo::{TodoRepository, TodoUpdate};
