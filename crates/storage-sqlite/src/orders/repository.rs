use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use faction_core::orders::{
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderRepositoryTrait, OrderStatus,
    OrderWithItems, Product, ProductRepositoryTrait,
};
use faction_core::Result;

use super::model::{NewOrderDB, NewProductDB, OrderDB, OrderItemDB, ProductDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{order_items, orders, products};

/// Repository for the product catalog.
pub struct ProductRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProductRepository { pool, writer }
    }
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn get_product(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)?;
        let product_db = products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Product::from(product_db))
    }

    fn list_products(&self, active_only: bool) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = products::table
            .select(ProductDB::as_select())
            .into_boxed();
        if active_only {
            query = query.filter(products::active.eq(true));
        }
        let products_db = query
            .order(products::name.asc())
            .load::<ProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(products_db.into_iter().map(Product::from).collect())
    }

    async fn create_product(&self, new_product: NewProduct) -> Result<Product> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Product> {
                let mut new_product_db: NewProductDB = new_product.into();
                if new_product_db.id.is_none() {
                    new_product_db.id = Some(Uuid::new_v4().to_string());
                }

                let result_db = diesel::insert_into(products::table)
                    .values(&new_product_db)
                    .returning(ProductDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Product::from(result_db))
            })
            .await
    }

    async fn set_product_active(&self, product_id: &str, active: bool) -> Result<Product> {
        let product_id = product_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Product> {
                let result_db = diesel::update(products::table.find(&product_id))
                    .set(products::active.eq(active))
                    .returning(ProductDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Product::from(result_db))
            })
            .await
    }
}

/// Repository for orders and their lines.
pub struct OrderRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl OrderRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        OrderRepository { pool, writer }
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    fn get_order(&self, order_id: &str) -> Result<Order> {
        let mut conn = get_connection(&self.pool)?;
        let order_db = orders::table
            .find(order_id)
            .select(OrderDB::as_select())
            .first::<OrderDB>(&mut conn)
            .map_err(StorageError::from)?;
        order_db.into_domain()
    }

    fn get_order_items(&self, order_id: &str) -> Result<Vec<OrderItem>> {
        let mut conn = get_connection(&self.pool)?;
        let items_db = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .select(OrderItemDB::as_select())
            .order(order_items::product_id.asc())
            .load::<OrderItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(items_db.into_iter().map(OrderItem::from).collect())
    }

    fn list_orders(&self, status_filter: Option<OrderStatus>) -> Result<Vec<Order>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = orders::table
            .select(OrderDB::as_select())
            .into_boxed();
        if let Some(status) = status_filter {
            query = query.filter(orders::status.eq(status.as_str()));
        }
        let orders_db = query
            .order(orders::created_at.desc())
            .load::<OrderDB>(&mut conn)
            .map_err(StorageError::from)?;
        orders_db.into_iter().map(OrderDB::into_domain).collect()
    }

    async fn insert_order(
        &self,
        new_order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderWithItems> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OrderWithItems> {
                // Order and all lines land in the writer's transaction.
                let order_row = NewOrderDB::from_domain(Uuid::new_v4().to_string(), &new_order);
                let order_db = diesel::insert_into(orders::table)
                    .values(&order_row)
                    .returning(OrderDB::as_returning())
                    .get_result::<OrderDB>(conn)
                    .map_err(StorageError::from)?;

                let item_rows: Vec<OrderItemDB> = items
                    .iter()
                    .map(|item| {
                        OrderItemDB::from_domain(
                            Uuid::new_v4().to_string(),
                            order_db.id.clone(),
                            item,
                        )
                    })
                    .collect();
                diesel::insert_into(order_items::table)
                    .values(&item_rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(OrderWithItems {
                    order: order_db.into_domain()?,
                    items: item_rows.into_iter().map(OrderItem::from).collect(),
                })
            })
            .await
    }

    async fn transition_status(
        &self,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool> {
        let order_id = order_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                // Conditional update keyed on the expected current status;
                // zero affected rows means the transition lost the race or
                // the order moved on already.
                let affected = diesel::update(
                    orders::table
                        .find(&order_id)
                        .filter(orders::status.eq(from.as_str())),
                )
                .set((
                    orders::status.eq(to.as_str()),
                    orders::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(affected > 0)
            })
            .await
    }
}
