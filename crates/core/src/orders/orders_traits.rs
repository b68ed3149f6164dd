use async_trait::async_trait;

use crate::errors::Result;
use crate::orders::orders_model::{
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, OrderWithItems, Product,
};

/// Trait for product catalog repository operations
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<Product>;
    fn list_products(&self, active_only: bool) -> Result<Vec<Product>>;
    async fn create_product(&self, new_product: NewProduct) -> Result<Product>;
    async fn set_product_active(&self, product_id: &str, active: bool) -> Result<Product>;
}

/// Trait for order repository operations
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    fn get_order(&self, order_id: &str) -> Result<Order>;
    fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderItem>>;
    fn list_orders(&self, status_filter: Option<OrderStatus>) -> Result<Vec<Order>>;

    /// Persists the order and all of its lines in a single transaction.
    async fn insert_order(
        &self,
        new_order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderWithItems>;

    /// Conditional status transition (`... WHERE status = from`). Returns
    /// whether the row was transitioned; `false` means it was no longer in
    /// the expected state.
    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool>;
}

/// Trait for order workflow service operations
#[async_trait]
pub trait OrderServiceTrait: Send + Sync {
    /// Opens an order draft session; returns its id.
    fn open_draft(
        &self,
        attendant_id: &str,
        customer_name: &str,
        notes: Option<String>,
    ) -> Result<String>;

    /// Sets a product quantity on a draft; zero removes the line.
    fn set_draft_item(&self, draft_id: &str, product_id: &str, quantity: i64) -> Result<()>;

    /// Converts a draft into a persisted pending order, pricing each line
    /// from the current catalog. Empty drafts are rejected.
    async fn place_order(&self, draft_id: &str) -> Result<OrderWithItems>;

    async fn finalize_order(&self, order_id: &str, actor_id: &str) -> Result<Order>;
    async fn cancel_order(&self, order_id: &str, actor_id: &str) -> Result<Order>;

    fn get_order_with_items(&self, order_id: &str) -> Result<OrderWithItems>;
    fn list_orders(&self, status_filter: Option<OrderStatus>) -> Result<Vec<Order>>;
    fn list_products(&self) -> Result<Vec<Product>>;

    /// Drops expired draft sessions; hosts call this on a timer.
    fn purge_expired_drafts(&self) -> usize;
}
