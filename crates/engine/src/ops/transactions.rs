mod helpers;
mod list;
mod write;

pub use list::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, SortField, SortOrder, TransactionFilter,
    TransactionPage, TransactionSort,
};
