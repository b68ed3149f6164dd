//! SQLite storage implementation for products and orders.

mod model;
mod repository;

pub use model::{NewOrderDB, NewProductDB, OrderDB, OrderItemDB, ProductDB};
pub use repository::{OrderRepository, ProductRepository};

// Re-export traits from core for convenience
pub use faction_core::orders::{OrderRepositoryTrait, ProductRepositoryTrait};
