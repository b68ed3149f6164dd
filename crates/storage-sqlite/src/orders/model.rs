//! Database models for products and orders.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use faction_core::orders::{
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, Product,
};
use faction_core::Result;

/// Database model for catalog products
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ProductDB {
    pub id: String,
    pub name: String,
    pub unit_price: i64,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

/// Database model for adding a product
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDB {
    pub id: Option<String>,
    pub name: String,
    pub unit_price: i64,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            unit_price: db.unit_price,
            active: db.active,
            created_at: db.created_at,
        }
    }
}

impl From<NewProduct> for NewProductDB {
    fn from(domain: NewProduct) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            unit_price: domain.unit_price,
            active: true,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Database model for orders
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrderDB {
    pub id: String,
    pub customer_name: String,
    pub status: String,
    pub total: i64,
    pub attendant_id: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl OrderDB {
    pub fn into_domain(self) -> Result<Order> {
        Ok(Order {
            status: OrderStatus::from_str(&self.status)?,
            id: self.id,
            customer_name: self.customer_name,
            total: self.total,
            attendant_id: self.attendant_id,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database model for inserting an order
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderDB {
    pub id: String,
    pub customer_name: String,
    pub status: String,
    pub total: i64,
    pub attendant_id: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewOrderDB {
    pub fn from_domain(id: String, domain: &NewOrder) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id,
            customer_name: domain.customer_name.clone(),
            status: OrderStatus::Pending.as_str().to_string(),
            total: domain.total,
            attendant_id: domain.attendant_id.clone(),
            notes: domain.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Database model for order lines
#[derive(
    Queryable,
    Identifiable,
    Associations,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(OrderDB, foreign_key = order_id))]
#[diesel(belongs_to(ProductDB, foreign_key = product_id))]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDB {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub total: i64,
}

impl From<OrderItemDB> for OrderItem {
    fn from(db: OrderItemDB) -> Self {
        Self {
            id: db.id,
            order_id: db.order_id,
            product_id: db.product_id,
            quantity: db.quantity,
            unit_price: db.unit_price,
            total: db.total,
        }
    }
}

impl OrderItemDB {
    pub fn from_domain(id: String, order_id: String, domain: &NewOrderItem) -> Self {
        Self {
            id,
            order_id,
            product_id: domain.product_id.clone(),
            quantity: domain.quantity,
            unit_price: domain.unit_price,
            total: domain.total,
        }
    }
}
