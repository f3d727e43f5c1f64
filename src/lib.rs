//! foodtrack: food-delivery order history sync and spending dashboard

pub mod collector;
pub mod services;
pub mod tui;
pub mod types;
