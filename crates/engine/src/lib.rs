pub use categories::Category;
pub use commands::{NewCategoryCmd, NewTransactionCmd, UpdateCategoryCmd, UpdateTransactionCmd};
pub use error::EngineError;
pub use ops::{
    CategoryFilter, CategoryPage, CategorySpending, DEFAULT_PAGE_SIZE, DEFAULT_SPENDING_LIMIT,
    DEFAULT_TREND_MONTHS, Engine, EngineBuilder, MAX_PAGE_SIZE, MonthKey, MonthlyTrend, Page,
    SortField, SortOrder, TransactionFilter, TransactionPage, TransactionSort,
};
pub use transactions::{PaymentMethod, Transaction, TransactionType};

mod categories;
mod commands;
mod error;
mod ops;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
