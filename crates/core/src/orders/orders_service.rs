use log::{debug, info};
use std::sync::Arc;

use super::draft_store::OrderDraftStore;
use super::orders_model::{
    NewOrder, NewOrderItem, Order, OrderStatus, OrderWithItems, Product,
};
use super::orders_traits::{OrderRepositoryTrait, OrderServiceTrait, ProductRepositoryTrait};
use crate::errors::{Error, Result, ValidationError};

/// Service for the order fulfillment workflow: draft assembly, placement,
/// finalize/cancel transitions.
pub struct OrderService {
    order_repository: Arc<dyn OrderRepositoryTrait>,
    product_repository: Arc<dyn ProductRepositoryTrait>,
    drafts: OrderDraftStore,
}

impl OrderService {
    /// Creates a new OrderService instance
    pub fn new(
        order_repository: Arc<dyn OrderRepositoryTrait>,
        product_repository: Arc<dyn ProductRepositoryTrait>,
        drafts: OrderDraftStore,
    ) -> Self {
        OrderService {
            order_repository,
            product_repository,
            drafts,
        }
    }

    /// Explains a failed conditional transition with the order's actual state.
    fn transition_conflict(&self, order_id: &str, attempted: OrderStatus) -> Result<Order> {
        let order = self.order_repository.get_order(order_id)?;
        let reason = match (order.status, attempted) {
            (OrderStatus::Finalized, OrderStatus::Finalized) => {
                format!("Order {} is already finalized", order_id)
            }
            (OrderStatus::Cancelled, OrderStatus::Cancelled) => {
                format!("Order {} is already cancelled", order_id)
            }
            (OrderStatus::Cancelled, _) => {
                format!("Order {} was cancelled and cannot be finalized", order_id)
            }
            (OrderStatus::Finalized, _) => {
                format!("Order {} was finalized and cannot be cancelled", order_id)
            }
            (OrderStatus::Pending, _) => {
                format!("Order {} transition raced and should be retried", order_id)
            }
        };
        Err(Error::Conflict(reason))
    }
}

#[async_trait::async_trait]
impl OrderServiceTrait for OrderService {
    fn open_draft(
        &self,
        attendant_id: &str,
        customer_name: &str,
        notes: Option<String>,
    ) -> Result<String> {
        if customer_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "customerName".to_string(),
            )));
        }
        self.drafts.purge_expired();
        let draft_id = self.drafts.open(attendant_id, customer_name, notes);
        debug!("Opened order draft {} for '{}'", draft_id, customer_name);
        Ok(draft_id)
    }

    fn set_draft_item(&self, draft_id: &str, product_id: &str, quantity: i64) -> Result<()> {
        if quantity < 0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Item quantity cannot be negative: {}",
                quantity
            ))));
        }
        // Reject unknown and retired products up front, before placement.
        let product = self.product_repository.get_product(product_id)?;
        if !product.active {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Product '{}' is no longer available",
                product.name
            ))));
        }
        self.drafts.set_item(draft_id, product_id, quantity)
    }

    async fn place_order(&self, draft_id: &str) -> Result<OrderWithItems> {
        let draft = self.drafts.take(draft_id)?;

        let selected: Vec<(&String, &i64)> =
            draft.items.iter().filter(|(_, qty)| **qty > 0).collect();
        if selected.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "No products selected".to_string(),
            )));
        }

        // Price every line from the catalog as it stands at placement time.
        let mut items = Vec::with_capacity(selected.len());
        for (product_id, quantity) in selected {
            let product = self.product_repository.get_product(product_id)?;
            items.push(NewOrderItem {
                product_id: product.id,
                quantity: *quantity,
                unit_price: product.unit_price,
                total: product.unit_price * quantity,
            });
        }
        items.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        let total = items.iter().map(|i| i.total).sum();

        let new_order = NewOrder {
            customer_name: draft.customer_name,
            attendant_id: draft.attendant_id,
            notes: draft.notes,
            total,
        };
        new_order.validate()?;

        let placed = self.order_repository.insert_order(new_order, items).await?;
        info!(
            "Order {} placed for '{}': {} lines, {} total",
            placed.order.id,
            placed.order.customer_name,
            placed.items.len(),
            placed.order.total
        );
        Ok(placed)
    }

    async fn finalize_order(&self, order_id: &str, actor_id: &str) -> Result<Order> {
        let transitioned = self
            .order_repository
            .transition_status(order_id, OrderStatus::Pending, OrderStatus::Finalized)
            .await?;
        if !transitioned {
            return self.transition_conflict(order_id, OrderStatus::Finalized);
        }
        info!("Order {} finalized by {}", order_id, actor_id);
        self.order_repository.get_order(order_id)
    }

    async fn cancel_order(&self, order_id: &str, actor_id: &str) -> Result<Order> {
        let transitioned = self
            .order_repository
            .transition_status(order_id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?;
        if !transitioned {
            return self.transition_conflict(order_id, OrderStatus::Cancelled);
        }
        info!("Order {} cancelled by {}", order_id, actor_id);
        self.order_repository.get_order(order_id)
    }

    fn get_order_with_items(&self, order_id: &str) -> Result<OrderWithItems> {
        let order = self.order_repository.get_order(order_id)?;
        let items = self.order_repository.get_order_items(order_id)?;
        Ok(OrderWithItems { order, items })
    }

    fn list_orders(&self, status_filter: Option<OrderStatus>) -> Result<Vec<Order>> {
        self.order_repository.list_orders(status_filter)
    }

    fn list_products(&self) -> Result<Vec<Product>> {
        self.product_repository.list_products(true)
    }

    fn purge_expired_drafts(&self) -> usize {
        self.drafts.purge_expired()
    }
}
