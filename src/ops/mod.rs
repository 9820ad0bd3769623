pub mod controller;
pub mod filter;
pub mod list_store;
