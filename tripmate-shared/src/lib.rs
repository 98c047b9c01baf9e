pub mod models;
pub mod pagination;

pub use pagination::{Page, PageMeta, PageOptions, SortOrder};
