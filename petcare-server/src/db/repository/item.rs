//! Inventory Item Repository
//!
//! Owns the authoritative stock counts. Every quantity mutation is a single
//! conditional statement so that concurrent callers can never drive
//! `quantity_on_hand` negative.

use super::{parse_record_id, BaseRepository, RepoError, RepoResult};
use crate::db::models::{InventoryItem, ItemCreate, ItemUpdate};
use rust_decimal::Decimal;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

pub const ITEM_TABLE: &str = "item";

/// Outcome of a conditional stock decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Stock was sufficient; carries the quantity left after the update.
    Applied { remaining: i64 },
    /// Stock was insufficient; the record is unchanged. An expected outcome,
    /// not an error.
    InsufficientStock,
}

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query("SELECT * FROM item ORDER BY category, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<InventoryItem>> {
        let rid = parse_record_id(ITEM_TABLE, id)?;
        let item: Option<InventoryItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Multi-key lookup. Missing ids are simply absent from the result; the
    /// caller decides whether that is an error.
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<InventoryItem>> {
        let mut rids = Vec::with_capacity(ids.len());
        for id in ids {
            rids.push(parse_record_id(ITEM_TABLE, id)?);
        }
        let items: Vec<InventoryItem> = self
            .base
            .db()
            .query("SELECT * FROM item WHERE id IN $ids")
            .bind(("ids", rids))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn create(&self, data: ItemCreate) -> RepoResult<InventoryItem> {
        if data.unit_price < Decimal::ZERO {
            return Err(RepoError::Validation("unit_price must be non-negative".into()));
        }
        if data.quantity_on_hand.unwrap_or(0) < 0 {
            return Err(RepoError::Validation(
                "quantity_on_hand must be non-negative".into(),
            ));
        }

        let item = InventoryItem {
            id: None,
            name: data.name,
            category: data.category,
            description: data.description.unwrap_or_default(),
            unit: data.unit,
            quantity_on_hand: data.quantity_on_hand.unwrap_or(0),
            unit_price: data.unit_price,
            image: data.image.unwrap_or_default(),
        };

        let created: Option<InventoryItem> =
            self.base.db().create(ITEM_TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create item".to_string()))
    }

    /// Update descriptive fields. Quantity is deliberately absent here; it
    /// only moves through the conditional operations below.
    pub async fn update(&self, id: &str, data: ItemUpdate) -> RepoResult<InventoryItem> {
        let rid = parse_record_id(ITEM_TABLE, id)?;

        if let Some(price) = data.unit_price
            && price < Decimal::ZERO
        {
            return Err(RepoError::Validation("unit_price must be non-negative".into()));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.unit.is_some() {
            set_parts.push("unit = $unit");
        }
        if data.unit_price.is_some() {
            set_parts.push("unit_price = $unit_price");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Item {} not found", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("id", rid));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.unit {
            query = query.bind(("unit", v));
        }
        if let Some(v) = data.unit_price {
            query = query.bind(("unit_price", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }

        let mut result = query.await?;
        let items: Vec<InventoryItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = parse_record_id(ITEM_TABLE, id)?;
        let deleted: Option<InventoryItem> = self.base.db().delete(rid).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }

    /// Conditional decrement: subtracts only while the result stays
    /// non-negative, in one statement. Insufficient stock is reported as an
    /// outcome, not an error; infrastructure failures propagate.
    pub async fn try_decrement(&self, id: &str, amount: i64) -> RepoResult<DecrementOutcome> {
        if amount <= 0 {
            return Err(RepoError::Validation("decrement amount must be positive".into()));
        }
        let rid = parse_record_id(ITEM_TABLE, id)?;
        let updated: Vec<InventoryItem> = self
            .base
            .db()
            .query("UPDATE $id SET quantity_on_hand -= $amount WHERE quantity_on_hand >= $amount RETURN AFTER")
            .bind(("id", rid.clone()))
            .bind(("amount", amount))
            .await?
            .take(0)?;

        match updated.into_iter().next() {
            Some(item) => Ok(DecrementOutcome::Applied {
                remaining: item.quantity_on_hand,
            }),
            None => {
                // Distinguish a missing item from a failed stock guard
                let exists: Option<InventoryItem> = self.base.db().select(rid).await?;
                match exists {
                    Some(_) => Ok(DecrementOutcome::InsufficientStock),
                    None => Err(RepoError::NotFound(format!("Item {} not found", id))),
                }
            }
        }
    }

    /// Administrative restock: conditional on the item existing, additive so
    /// it composes with concurrent sales.
    pub async fn restock(&self, id: &str, amount: i64) -> RepoResult<InventoryItem> {
        if amount <= 0 {
            return Err(RepoError::Validation("restock amount must be positive".into()));
        }
        let rid = parse_record_id(ITEM_TABLE, id)?;
        let updated: Vec<InventoryItem> = self
            .base
            .db()
            .query("UPDATE $id SET quantity_on_hand += $amount RETURN AFTER")
            .bind(("id", rid))
            .bind(("amount", amount))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {} not found", id)))
    }

    /// Administrative direct set (stocktake correction).
    pub async fn set_quantity(&self, id: &str, quantity: i64) -> RepoResult<InventoryItem> {
        if quantity < 0 {
            return Err(RepoError::Validation(
                "quantity_on_hand must be non-negative".into(),
            ));
        }
        let rid = parse_record_id(ITEM_TABLE, id)?;
        let updated: Vec<InventoryItem> = self
            .base
            .db()
            .query("UPDATE $id SET quantity_on_hand = $quantity RETURN AFTER")
            .bind(("id", rid))
            .bind(("quantity", quantity))
            .await?
            .take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Item {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use surrealdb::engine::local::Mem;

    async fn setup() -> ItemRepository {
        let db = Surreal::new::<Mem>(()).await.expect("open in-memory db");
        db.use_ns("petcare").use_db("shop").await.expect("select ns/db");
        DbService::define_schema(&db).await.expect("schema bootstrap");
        ItemRepository::new(db)
    }

    fn kibble(quantity: i64) -> ItemCreate {
        ItemCreate {
            name: "Puppy Kibble 2kg".into(),
            category: "food".into(),
            description: None,
            unit: "bag".into(),
            quantity_on_hand: Some(quantity),
            unit_price: "12.50".parse().expect("decimal literal"),
            image: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let repo = setup().await;
        let created = repo.create(kibble(5)).await.expect("create");
        let id = created.id.expect("assigned id").to_string();
        assert!(id.starts_with("item:"));
        assert_eq!(created.quantity_on_hand, 5);
        assert_eq!(created.description, "");

        let found = repo.find_by_id(&id).await.expect("find").expect("exists");
        assert_eq!(found.name, "Puppy Kibble 2kg");
    }

    #[tokio::test]
    async fn create_rejects_negative_values() {
        let repo = setup().await;
        let mut data = kibble(1);
        data.unit_price = "-1".parse().expect("decimal literal");
        assert!(matches!(
            repo.create(data).await,
            Err(RepoError::Validation(_))
        ));

        let mut data = kibble(1);
        data.quantity_on_hand = Some(-3);
        assert!(matches!(
            repo.create(data).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn find_by_ids_skips_missing_records() {
        let repo = setup().await;
        let a = repo.create(kibble(1)).await.expect("create");
        let a_id = a.id.expect("id").to_string();
        let items = repo
            .find_by_ids(&[a_id.clone(), "item:missing".into()])
            .await
            .expect("lookup");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_ref().expect("id").to_string(), a_id);
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() {
        let repo = setup().await;
        let created = repo.create(kibble(5)).await.expect("create");
        let id = created.id.expect("id").to_string();

        let updated = repo
            .update(
                &id,
                ItemUpdate {
                    unit_price: Some("13.75".parse().expect("decimal literal")),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.unit_price, "13.75".parse().expect("decimal literal"));
        assert_eq!(updated.name, "Puppy Kibble 2kg");
        assert_eq!(updated.quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn update_missing_item_is_not_found() {
        let repo = setup().await;
        let result = repo
            .update(
                "item:missing",
                ItemUpdate {
                    name: Some("x".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = setup().await;
        let created = repo.create(kibble(1)).await.expect("create");
        let id = created.id.expect("id").to_string();
        repo.delete(&id).await.expect("delete");
        assert!(repo.find_by_id(&id).await.expect("find").is_none());
        assert!(matches!(
            repo.delete(&id).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn try_decrement_applies_while_stock_suffices() {
        let repo = setup().await;
        let created = repo.create(kibble(5)).await.expect("create");
        let id = created.id.expect("id").to_string();

        let outcome = repo.try_decrement(&id, 3).await.expect("decrement");
        assert_eq!(outcome, DecrementOutcome::Applied { remaining: 2 });

        let outcome = repo.try_decrement(&id, 3).await.expect("decrement");
        assert_eq!(outcome, DecrementOutcome::InsufficientStock);

        // The failed guard left the record unchanged
        let item = repo.find_by_id(&id).await.expect("find").expect("exists");
        assert_eq!(item.quantity_on_hand, 2);
    }

    #[tokio::test]
    async fn try_decrement_distinguishes_missing_items() {
        let repo = setup().await;
        assert!(matches!(
            repo.try_decrement("item:missing", 1).await,
            Err(RepoError::NotFound(_))
        ));
        assert!(matches!(
            repo.try_decrement("item:missing", 0).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn restock_and_set_quantity() {
        let repo = setup().await;
        let created = repo.create(kibble(2)).await.expect("create");
        let id = created.id.expect("id").to_string();

        let item = repo.restock(&id, 10).await.expect("restock");
        assert_eq!(item.quantity_on_hand, 12);

        let item = repo.set_quantity(&id, 7).await.expect("set");
        assert_eq!(item.quantity_on_hand, 7);

        assert!(matches!(
            repo.restock(&id, 0).await,
            Err(RepoError::Validation(_))
        ));
        assert!(matches!(
            repo.set_quantity(&id, -1).await,
            Err(RepoError::Validation(_))
        ));
    }
}
