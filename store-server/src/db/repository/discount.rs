//! Discount Repository
//!
//! CRUD plus the paged back-office listing. Redemption (the conditional
//! quantity decrement) lives in the order repository where it runs
//! inside the settlement transaction.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Discount, DiscountCreate, DiscountQuery, DiscountUpdate};
use crate::utils::now_millis;
use shared::PageResult;

const TABLE: &str = "discount";

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct DiscountRepository {
    base: BaseRepository,
}

impl DiscountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_paged(&self, q: &DiscountQuery) -> RepoResult<PageResult<Discount>> {
        let mut conditions = Vec::new();

        if q.keyword.is_some() {
            conditions.push("string::lowercase(code) CONTAINS string::lowercase($keyword)");
        }
        if q.active.is_some() {
            conditions.push("active = $active");
        }
        if q.kind.is_some() {
            conditions.push("kind = $kind");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() AS total FROM discount{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM discount{} ORDER BY create_date DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.base.db().query(sql);
        if let Some(ref keyword) = q.keyword {
            qb = qb.bind(("keyword", keyword.clone()));
        }
        if let Some(active) = q.active {
            qb = qb.bind(("active", active));
        }
        if let Some(kind) = q.kind {
            qb = qb.bind(("kind", kind.as_str()));
        }

        let mut result = qb.await?;
        let counts: Vec<CountRow> = result.take(0)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        let items: Vec<Discount> = result.take(1)?;

        Ok(PageResult::new(items, total))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Discount>> {
        let record_id = parse_record_id(TABLE, id)?;
        let discount: Option<Discount> = self.base.db().select(record_id).await?;
        Ok(discount)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Discount>> {
        let rows: Vec<Discount> = self
            .base
            .db()
            .query("SELECT * FROM discount WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    async fn code_taken(&self, code: &str, exclude: Option<&RecordId>) -> RepoResult<bool> {
        let owners: Vec<RecordId> = self
            .base
            .db()
            .query("SELECT VALUE id FROM discount WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(owners.iter().any(|owner| Some(owner) != exclude))
    }

    pub async fn create(&self, data: DiscountCreate) -> RepoResult<Discount> {
        if self.code_taken(&data.code, None).await? {
            return Err(RepoError::Duplicate(format!(
                "Discount code '{}' already exists",
                data.code
            )));
        }

        let discount = Discount {
            id: None,
            code: data.code,
            kind: data.kind,
            amount: data.amount,
            min_price: data.min_price,
            quantity: data.quantity,
            active: data.active,
            create_date: now_millis(),
            expiry_date: data.expiry_date,
        };

        let created: Option<Discount> = self.base.db().create(TABLE).content(discount).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create discount".to_string()))
    }

    /// Full replace; `create_date` survives the edit
    pub async fn update(&self, id: &str, data: DiscountUpdate) -> RepoResult<Discount> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

        if self.code_taken(&data.code, Some(&record_id)).await? {
            return Err(RepoError::Duplicate(format!(
                "Discount code '{}' already exists",
                data.code
            )));
        }

        let updated = Discount {
            id: None,
            code: data.code,
            kind: data.kind,
            amount: data.amount,
            min_price: data.min_price,
            quantity: data.quantity,
            active: data.active,
            create_date: existing.create_date,
            expiry_date: data.expiry_date,
        };

        let rows: Vec<Discount> = self
            .base
            .db()
            .query("UPDATE $thing CONTENT $data RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("data", updated))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
    }

    /// Flip the redeemability flag
    pub async fn toggle_active(&self, id: &str) -> RepoResult<Discount> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

        let rows: Vec<Discount> = self
            .base
            .db()
            .query("UPDATE $thing SET active = $value RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("value", !existing.active))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
    }

    /// Hard delete, refused while any order still references the code
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM order WHERE discount = $discount GROUP ALL")
            .bind(("discount", record_id.clone()))
            .await?
            .take(0)?;
        let in_use = counts.first().map(|row| row.total).unwrap_or(0);
        if in_use > 0 {
            return Err(RepoError::State(format!(
                "Discount is referenced by {in_use} order(s) and cannot be deleted"
            )));
        }

        let _deleted: Option<Discount> = self.base.db().delete(record_id).await?;
        Ok(())
    }
}
