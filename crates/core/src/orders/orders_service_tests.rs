use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::draft_store::OrderDraftStore;
use super::orders_model::{
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, OrderWithItems, Product,
};
use super::orders_service::OrderService;
use super::orders_traits::{OrderRepositoryTrait, OrderServiceTrait, ProductRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};

// ============== Mock Repositories ==============

struct MockProductRepository {
    products: Vec<Product>,
}

impl MockProductRepository {
    fn with_catalog() -> Self {
        let now = Utc::now().naive_utc();
        let product = |id: &str, name: &str, unit_price: i64, active: bool| Product {
            id: id.to_string(),
            name: name.to_string(),
            unit_price,
            active,
            created_at: now,
        };
        Self {
            products: vec![
                product("chip", "Chip", 1_500, true),
                product("jammer", "Jammer", 2_500, true),
                product("crypto-card", "Encrypted Card", 100_000, true),
                product("legacy", "Legacy Gadget", 50, false),
            ],
        }
    }
}

#[async_trait]
impl ProductRepositoryTrait for MockProductRepository {
    fn get_product(&self, product_id: &str) -> Result<Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(product_id.to_string())))
    }

    fn list_products(&self, active_only: bool) -> Result<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| !active_only || p.active)
            .cloned()
            .collect())
    }

    async fn create_product(&self, _: NewProduct) -> Result<Product> {
        unimplemented!()
    }

    async fn set_product_active(&self, _: &str, _: bool) -> Result<Product> {
        unimplemented!()
    }
}

struct MockOrderRepository {
    orders: RwLock<Vec<Order>>,
    items: RwLock<Vec<OrderItem>>,
    next_id: RwLock<u64>,
}

impl MockOrderRepository {
    fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            items: RwLock::new(Vec::new()),
            next_id: RwLock::new(1),
        }
    }
}

#[async_trait]
impl OrderRepositoryTrait for MockOrderRepository {
    fn get_order(&self, order_id: &str) -> Result<Order> {
        self.orders
            .read()
            .unwrap()
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(order_id.to_string())))
    }

    fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderItem>> {
        Ok(self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    fn list_orders(&self, status_filter: Option<OrderStatus>) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .unwrap()
            .iter()
            .filter(|o| status_filter.map_or(true, |status| o.status == status))
            .cloned()
            .collect())
    }

    async fn insert_order(
        &self,
        new_order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderWithItems> {
        let now = Utc::now().naive_utc();
        let mut next_id = self.next_id.write().unwrap();
        let order = Order {
            id: format!("order-{}", *next_id),
            customer_name: new_order.customer_name,
            status: OrderStatus::Pending,
            total: new_order.total,
            attendant_id: new_order.attendant_id,
            notes: new_order.notes,
            created_at: now,
            updated_at: now,
        };
        *next_id += 1;

        let order_items: Vec<OrderItem> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| OrderItem {
                id: format!("{}-item-{}", order.id, index),
                order_id: order.id.clone(),
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total,
            })
            .collect();

        self.orders.write().unwrap().push(order.clone());
        self.items.write().unwrap().extend(order_items.clone());
        Ok(OrderWithItems {
            order,
            items: order_items,
        })
    }

    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool> {
        let mut orders = self.orders.write().unwrap();
        let order = orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(order_id.to_string())))?;
        if order.status != from {
            return Ok(false);
        }
        order.status = to;
        order.updated_at = Utc::now().naive_utc();
        Ok(true)
    }
}

// ============== Helper Functions ==============

fn make_service() -> OrderService {
    OrderService::new(
        Arc::new(MockOrderRepository::new()),
        Arc::new(MockProductRepository::with_catalog()),
        OrderDraftStore::default(),
    )
}

async fn place_simple_order(service: &OrderService) -> OrderWithItems {
    let draft = service
        .open_draft("m1", "John Doe", Some("for tonight".to_string()))
        .unwrap();
    service.set_draft_item(&draft, "chip", 2).unwrap();
    service.place_order(&draft).await.unwrap()
}

// ============== Tests ==============

#[tokio::test]
async fn test_place_order_prices_lines_from_catalog() {
    let service = make_service();

    let draft = service.open_draft("m1", "John Doe", None).unwrap();
    service.set_draft_item(&draft, "chip", 2).unwrap();
    service.set_draft_item(&draft, "crypto-card", 1).unwrap();

    let placed = service.place_order(&draft).await.unwrap();
    assert_eq!(placed.order.status, OrderStatus::Pending);
    assert_eq!(placed.order.total, 2 * 1_500 + 100_000);
    assert_eq!(placed.items.len(), 2);

    let chip_line = placed
        .items
        .iter()
        .find(|i| i.product_id == "chip")
        .unwrap();
    assert_eq!(chip_line.unit_price, 1_500);
    assert_eq!(chip_line.total, 3_000);
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let service = make_service();

    let draft = service.open_draft("m1", "John Doe", None).unwrap();
    service.set_draft_item(&draft, "chip", 2).unwrap();
    service.set_draft_item(&draft, "jammer", 1).unwrap();
    service.set_draft_item(&draft, "jammer", 0).unwrap();

    let placed = service.place_order(&draft).await.unwrap();
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.items[0].product_id, "chip");
}

#[tokio::test]
async fn test_empty_draft_rejected() {
    let service = make_service();

    let draft = service.open_draft("m1", "John Doe", None).unwrap();
    let result = service.place_order(&draft).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_unknown_and_retired_products_rejected() {
    let service = make_service();
    let draft = service.open_draft("m1", "John Doe", None).unwrap();

    assert!(matches!(
        service.set_draft_item(&draft, "no-such-thing", 1),
        Err(Error::Database(DatabaseError::NotFound(_)))
    ));
    assert!(matches!(
        service.set_draft_item(&draft, "legacy", 1),
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_draft_is_consumed_on_placement() {
    let service = make_service();

    let draft = service.open_draft("m1", "John Doe", None).unwrap();
    service.set_draft_item(&draft, "chip", 1).unwrap();
    service.place_order(&draft).await.unwrap();

    // The session is gone; placing again must fail.
    assert!(matches!(
        service.place_order(&draft).await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_expired_draft_cannot_be_used() {
    let service = OrderService::new(
        Arc::new(MockOrderRepository::new()),
        Arc::new(MockProductRepository::with_catalog()),
        OrderDraftStore::new(Duration::ZERO),
    );

    let draft = service.open_draft("m1", "John Doe", None).unwrap();
    assert!(matches!(
        service.set_draft_item(&draft, "chip", 1),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        service.place_order(&draft).await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_finalize_transitions_pending_order() {
    let service = make_service();
    let placed = place_simple_order(&service).await;

    let finalized = service
        .finalize_order(&placed.order.id, "manager-1")
        .await
        .unwrap();
    assert_eq!(finalized.status, OrderStatus::Finalized);
}

#[tokio::test]
async fn test_finalize_twice_conflicts() {
    let service = make_service();
    let placed = place_simple_order(&service).await;

    service
        .finalize_order(&placed.order.id, "manager-1")
        .await
        .unwrap();
    let result = service.finalize_order(&placed.order.id, "manager-2").await;
    assert!(matches!(result, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_finalized() {
    let service = make_service();
    let placed = place_simple_order(&service).await;

    service
        .cancel_order(&placed.order.id, "manager-1")
        .await
        .unwrap();
    let result = service.finalize_order(&placed.order.id, "manager-1").await;
    assert!(matches!(result, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_finalized_order_cannot_be_cancelled() {
    let service = make_service();
    let placed = place_simple_order(&service).await;

    service
        .finalize_order(&placed.order.id, "manager-1")
        .await
        .unwrap();
    let result = service.cancel_order(&placed.order.id, "manager-1").await;
    assert!(matches!(result, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_list_orders_filters_by_status() {
    let service = make_service();
    let first = place_simple_order(&service).await;
    let second = place_simple_order(&service).await;

    service
        .finalize_order(&first.order.id, "manager-1")
        .await
        .unwrap();

    let pending = service.list_orders(Some(OrderStatus::Pending)).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.order.id);

    let all = service.list_orders(None).unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_list_products_returns_active_catalog() {
    let service = make_service();
    let products = service.list_products().unwrap();
    assert_eq!(products.len(), 3);
    assert!(products.iter().all(|p| p.active));
}
