//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction CRUD endpoints and the reports built on them

mod analysis;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod query;

pub use analysis::{
    CategoryTotal, MonthTypeTotal, MonthlyTotal, category_totals_endpoint,
    densify_monthly_totals, get_category_totals, get_month_type_totals, monthly_totals_endpoint,
};
pub use core::{
    Transaction, TransactionBuilder, TransactionChanges, TransactionId, TransactionWithCategory,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transactions_in_range, get_transactions_page, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use form::TransactionForm;
pub use query::{
    TransactionQuery, TransactionState, get_transaction_endpoint, list_transactions_endpoint,
};
