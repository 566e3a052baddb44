//! Income and expense categories that transactions are grouped by.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::{CategoryForm, create_category_endpoint};
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryType};
pub use edit::update_category_endpoint;
pub use list::{CategoryFilter, get_category_endpoint, list_categories_endpoint};
