//! Orders module - product catalog and order fulfillment workflow.

mod draft_store;
mod orders_constants;
mod orders_model;
mod orders_service;
mod orders_traits;

#[cfg(test)]
mod orders_service_tests;

pub use draft_store::{OrderDraft, OrderDraftStore};
pub use orders_constants::*;
pub use orders_model::{
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, OrderWithItems, Product,
};
pub use orders_service::OrderService;
pub use orders_traits::{OrderRepositoryTrait, OrderServiceTrait, ProductRepositoryTrait};
