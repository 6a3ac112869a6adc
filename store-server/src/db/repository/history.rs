//! Product History Repository
//!
//! Append-only change log for the catalog. Entries are written alongside
//! product mutations and the only removal path is the explicit bulk
//! purge by id list.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{HistoryAction, HistoryQuery, Product, ProductHistory};
use crate::utils::now_millis;
use shared::PageResult;

const TABLE: &str = "product_history";

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct HistoryRepository {
    base: BaseRepository,
}

impl HistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record one action against a product. The product name is
    /// snapshotted so the entry stays readable after the product is
    /// purged.
    pub async fn append(
        &self,
        product: &Product,
        user_id: &str,
        action: HistoryAction,
        reason: &str,
    ) -> RepoResult<ProductHistory> {
        let Some(product_id) = product.id.clone() else {
            return Err(RepoError::Validation(
                "Cannot record history for an unsaved product".to_string(),
            ));
        };

        let entry = ProductHistory {
            id: None,
            product: product_id,
            product_name: product.name.clone(),
            user_id: user_id.to_string(),
            action,
            reason: reason.to_string(),
            action_time: now_millis(),
        };

        let created: Option<ProductHistory> = self.base.db().create(TABLE).content(entry).await?;
        created.ok_or_else(|| RepoError::Database("Failed to record product history".to_string()))
    }

    /// Filtered page over the log, newest first. The date parts are
    /// independent predicates over the action timestamp.
    pub async fn find_paged(&self, q: &HistoryQuery) -> RepoResult<PageResult<ProductHistory>> {
        let product = q
            .product_id
            .as_deref()
            .map(|id| parse_record_id("product", id))
            .transpose()?;

        let mut conditions = Vec::new();
        if product.is_some() {
            conditions.push("product = $product");
        }
        if q.user_id.is_some() {
            conditions.push("user_id = $user_id");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.year.is_some() {
            conditions.push("time::year(time::from::unix(action_time / 1000)) = $year");
        }
        if q.month.is_some() {
            conditions.push("time::month(time::from::unix(action_time / 1000)) = $month");
        }
        if q.day.is_some() {
            conditions.push("time::day(time::from::unix(action_time / 1000)) = $day");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() AS total FROM product_history{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM product_history{} ORDER BY action_time DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.base.db().query(sql);
        if let Some(product) = product {
            qb = qb.bind(("product", product));
        }
        if let Some(ref user_id) = q.user_id {
            qb = qb.bind(("user_id", user_id.clone()));
        }
        if let Some(action) = q.action {
            qb = qb.bind(("action", action.as_str()));
        }
        if let Some(year) = q.year {
            qb = qb.bind(("year", year));
        }
        if let Some(month) = q.month {
            qb = qb.bind(("month", month));
        }
        if let Some(day) = q.day {
            qb = qb.bind(("day", day));
        }

        let mut result = qb.await?;
        let counts: Vec<CountRow> = result.take(0)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        let items: Vec<ProductHistory> = result.take(1)?;

        Ok(PageResult::new(items, total))
    }

    /// Bulk purge by id list. Unknown ids are skipped; returns how many
    /// entries were actually removed.
    pub async fn purge(&self, ids: &[String]) -> RepoResult<u64> {
        let record_ids: Vec<RecordId> = ids
            .iter()
            .map(|id| parse_record_id(TABLE, id))
            .collect::<RepoResult<_>>()?;

        let removed: Vec<ProductHistory> = self
            .base
            .db()
            .query("DELETE product_history WHERE id IN $ids RETURN BEFORE")
            .bind(("ids", record_ids))
            .await?
            .take(0)?;

        Ok(removed.len() as u64)
    }
}
