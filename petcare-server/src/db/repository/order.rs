//! Order Repository
//!
//! Reads and status transitions for persisted orders. Order creation never
//! happens here: it rides the placement transaction in `orders::store`.

use super::{parse_record_id, BaseRepository, RepoResult};
use crate::db::models::Order;
use chrono::{DateTime, Utc};
use shared::order::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

pub const ORDER_TABLE: &str = "shop_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Look an order up by its external code (customer support path).
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM shop_order WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders, most recent first.
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM shop_order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    pub async fn find_by_status(&self, status: OrderStatus) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM shop_order WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Conditional status update: applies only while the stored status still
    /// equals `from`, stamping the transition timestamp in the same
    /// statement. Returns None when the guard fails (lost race) or the
    /// record is missing.
    pub async fn update_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Order>> {
        let rid = parse_record_id(ORDER_TABLE, id)?;
        let stamp = match to {
            OrderStatus::Accepted => Some("accepted_at"),
            OrderStatus::Completed => Some("completed_at"),
            OrderStatus::Cancelled => Some("cancelled_at"),
            OrderStatus::Pending => None,
        };
        let query_str = match stamp {
            Some(field) => format!(
                "UPDATE $id SET status = $to, {field} = $at WHERE status = $from RETURN AFTER"
            ),
            None => "UPDATE $id SET status = $to WHERE status = $from RETURN AFTER".to_string(),
        };
        let mut result = self
            .base
            .db()
            .query(query_str)
            .bind(("id", rid))
            .bind(("to", to))
            .bind(("from", from))
            .bind(("at", at))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }
}
