//! Order Repository
//!
//! Settlement happens in steps: create the shell, attach a discount
//! code, add line items. Each step is one multi-statement transaction;
//! stock and discount quantities are consumed with conditional updates
//! so a lost race rolls the whole step back instead of oversubscribing.
//!
//! A process-wide write lock serializes the settlement transactions.
//! The embedded engine aborts concurrent transactions that touch the
//! same records; holding the lock turns those aborts into an ordered
//! winner-then-loser sequence while the conditional updates stay the
//! source of truth.

use std::sync::Arc;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::checkout::code::generate_order_code;
use crate::checkout::money;
use crate::checkout::policy::{self, Applicability};
use crate::db::models::{
    Discount, DiscountBrief, Order, OrderCreate, OrderDetail, OrderItemRequest, OrderListItem,
    OrderListRow, OrderQuery, OrderStatus, OrderView, Product, StockReport,
};
use crate::utils::now_millis;
use shared::PageResult;

const TABLE: &str = "order";

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    write_lock: Arc<Mutex<()>>,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, write_lock: Arc<Mutex<()>>) -> Self {
        Self {
            base: BaseRepository::new(db),
            write_lock,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_record_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// Full view with the attached discount resolved and totals derived
    /// from the stored line snapshots
    pub async fn find_view(&self, id: &str) -> RepoResult<Option<OrderView>> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let discount = match order.discount.clone() {
            Some(link) => self.base.db().select::<Option<Discount>>(link).await?,
            None => None,
        };
        Ok(Some(assemble_view(order, discount)))
    }

    pub async fn find_paged(&self, q: &OrderQuery) -> RepoResult<PageResult<OrderListItem>> {
        let mut conditions = Vec::new();
        if q.keyword.is_some() {
            conditions.push(
                "(string::lowercase(name) CONTAINS string::lowercase($keyword) \
                 OR string::lowercase(email) CONTAINS string::lowercase($keyword) \
                 OR phone CONTAINS $keyword \
                 OR string::lowercase(ship_address) CONTAINS string::lowercase($keyword))",
            );
        }
        if q.status.is_some() {
            conditions.push("status = $status");
        }
        if q.year.is_some() {
            conditions.push("time::year(time::from::unix(order_date / 1000)) = $year");
        }
        if q.month.is_some() {
            conditions.push("time::month(time::from::unix(order_date / 1000)) = $month");
        }
        if q.day.is_some() {
            conditions.push("time::day(time::from::unix(order_date / 1000)) = $day");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT count() AS total FROM order{} GROUP ALL", where_clause);
        let select_sql = format!(
            "SELECT id, code, name, email, status, order_date, \
             array::len(details) AS item_count, \
             math::sum(details.line_total) AS subtotal, \
             discount.kind AS discount_kind, discount.amount AS discount_amount \
             FROM order{} ORDER BY order_date DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.base.db().query(sql);
        if let Some(ref keyword) = q.keyword {
            qb = qb.bind(("keyword", keyword.clone()));
        }
        if let Some(status) = q.status {
            qb = qb.bind(("status", status.as_str()));
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
        let rows: Vec<OrderListRow> = result.take(1)?;

        let items = rows
            .into_iter()
            .map(|row| {
                let reduction = match (row.discount_kind, row.discount_amount) {
                    (Some(kind), Some(amount)) => {
                        money::discount_reduction(row.subtotal, kind, amount)
                    }
                    _ => 0.0,
                };
                OrderListItem {
                    id: row.id.to_string(),
                    code: row.code,
                    name: row.name,
                    email: row.email,
                    status: row.status,
                    order_date: row.order_date,
                    item_count: row.item_count,
                    total: money::after_reduction(row.subtotal, reduction),
                }
            })
            .collect();

        Ok(PageResult::new(items, total))
    }

    /// Open an order shell: contact snapshot, generated code, no lines
    pub async fn create(&self, data: OrderCreate, user_id: &str) -> RepoResult<Order> {
        let order = Order {
            id: None,
            code: generate_order_code(),
            user_id: user_id.to_string(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            ship_address: data.ship_address,
            note: data.note,
            status: OrderStatus::New,
            discount: None,
            details: Vec::new(),
            order_date: now_millis(),
            updated_at: now_millis(),
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Redeem `code` against the order: re-check the policy, then consume
    /// one unit and link the discount in a single transaction. The
    /// conditional update repeats every policy term, so of two racing
    /// redemptions of a last unit exactly one can succeed.
    pub async fn attach_discount(&self, order_id: &str, code: &str) -> RepoResult<Order> {
        let _guard = self.write_lock.lock().await;

        let record_id = parse_record_id(TABLE, order_id)?;
        let order = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
        if order.status != OrderStatus::New {
            return Err(RepoError::State(
                "Only new orders can be modified".to_string(),
            ));
        }
        if order.discount.is_some() {
            return Err(RepoError::State(
                "Order already has a discount code".to_string(),
            ));
        }

        let subtotal = money::total_of(order.details.iter().map(|d| d.line_total));
        let now = now_millis();

        let discount = self
            .find_discount_by_code(code)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount code '{code}' not found")))?;
        if let Applicability::NotApplicable(reason) = policy::evaluate(&discount, subtotal, now) {
            return Err(RepoError::State(reason.message().to_string()));
        }

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 LET $updated = (UPDATE discount SET quantity -= 1 \
                     WHERE code = $code AND active = true AND expiry_date >= $now \
                     AND quantity > 0 AND min_price <= $total RETURN AFTER); \
                 UPDATE $order SET discount = $updated[0].id, updated_at = $now \
                     WHERE array::len($updated) > 0; \
                 COMMIT TRANSACTION;",
            )
            .bind(("order", record_id))
            .bind(("code", code.to_string()))
            .bind(("now", now))
            .bind(("total", subtotal))
            .await?
            .check()?;

        let settled = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
        if settled.discount.is_none() {
            // Lost the race; re-read the code for the current refusal reason
            let reason = match self.find_discount_by_code(code).await? {
                Some(fresh) => match policy::evaluate(&fresh, subtotal, now_millis()) {
                    Applicability::NotApplicable(reason) => reason.message().to_string(),
                    Applicability::Redeemable => {
                        format!("Discount code '{code}' is no longer redeemable")
                    }
                },
                None => format!("Discount code '{code}' not found"),
            };
            return Err(RepoError::State(reason));
        }
        Ok(settled)
    }

    /// Add line items: snapshot prices, decrement stock and append the
    /// lines in one transaction. Any line failing its stock condition
    /// aborts the whole step.
    pub async fn add_line_items(
        &self,
        order_id: &str,
        items: &[OrderItemRequest],
    ) -> RepoResult<Order> {
        if items.is_empty() {
            return Err(RepoError::Validation(
                "At least one line item is required".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;

        let record_id = parse_record_id(TABLE, order_id)?;
        let order = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
        if order.status != OrderStatus::New {
            return Err(RepoError::State(
                "Only new orders can be modified".to_string(),
            ));
        }

        // Merge repeated products into one line each
        let mut merged: Vec<(RecordId, i64)> = Vec::new();
        for item in items {
            let product_id = parse_record_id("product", &item.product_id)?;
            match merged.iter_mut().find(|(id, _)| *id == product_id) {
                Some((_, quantity)) => *quantity += item.quantity,
                None => merged.push((product_id, item.quantity)),
            }
        }
        for (product_id, quantity) in &merged {
            if *quantity > money::MAX_LINE_QUANTITY {
                return Err(RepoError::Validation(format!(
                    "Combined quantity {quantity} for {product_id} exceeds the per-line limit of {}",
                    money::MAX_LINE_QUANTITY
                )));
            }
        }

        // Snapshot prices and give precise stock errors up front; the
        // conditional updates below remain the authority under races
        let mut lines = Vec::with_capacity(merged.len());
        for (product_id, quantity) in &merged {
            let product: Option<Product> = self.base.db().select(product_id.clone()).await?;
            let product = product.ok_or_else(|| {
                RepoError::NotFound(format!("Product {product_id} not found"))
            })?;
            if product.lifecycle.is_deleted() || !product.active {
                return Err(RepoError::State(format!(
                    "Product '{}' is not available",
                    product.name
                )));
            }
            if product.quantity < *quantity {
                return Err(RepoError::State(format!(
                    "Insufficient stock for '{}': requested {}, available {}",
                    product.name, quantity, product.quantity
                )));
            }

            let unit_price = money::unit_price_after_discount(product.price, product.discount);
            lines.push(OrderDetail {
                product: product_id.clone(),
                product_name: product.name,
                unit_price,
                quantity: *quantity,
                line_total: money::line_total(unit_price, *quantity),
            });
        }

        let mut sql = String::from("BEGIN TRANSACTION; ");
        for i in 0..merged.len() {
            sql.push_str(&format!(
                "LET $u{i} = (UPDATE $p{i} SET quantity -= $q{i} \
                 WHERE quantity >= $q{i} RETURN AFTER); \
                 IF array::len($u{i}) = 0 {{ THROW 'insufficient stock' }}; "
            ));
        }
        sql.push_str("UPDATE $order SET details += $lines, updated_at = $now; COMMIT TRANSACTION;");

        let mut qb = self
            .base
            .db()
            .query(sql)
            .bind(("order", record_id))
            .bind(("lines", lines))
            .bind(("now", now_millis()));
        for (i, (product_id, quantity)) in merged.iter().enumerate() {
            qb = qb
                .bind((format!("p{i}"), product_id.clone()))
                .bind((format!("q{i}"), *quantity));
        }

        qb.await?.check().map_err(|err| {
            let msg = err.to_string();
            if msg.contains("insufficient stock") {
                RepoError::State("Stock changed while settling the order".to_string())
            } else {
                RepoError::Database(msg)
            }
        })?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
    }

    pub async fn approve(&self, order_id: &str) -> RepoResult<Order> {
        self.transition(order_id, OrderStatus::Approved).await
    }

    pub async fn cancel(&self, order_id: &str) -> RepoResult<Order> {
        self.transition(order_id, OrderStatus::Cancelled).await
    }

    async fn transition(&self, order_id: &str, next: OrderStatus) -> RepoResult<Order> {
        let _guard = self.write_lock.lock().await;

        let record_id = parse_record_id(TABLE, order_id)?;
        let order = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))?;
        if !order.status.can_transition_to(next) {
            return Err(RepoError::State(format!(
                "Order cannot move from {} to {}",
                order.status, next
            )));
        }

        let rows: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = $next, updated_at = $now \
                 WHERE status = $expected RETURN AFTER",
            )
            .bind(("thing", record_id))
            .bind(("next", next.as_str()))
            .bind(("expected", order.status.as_str()))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        rows.into_iter().next().ok_or_else(|| {
            RepoError::State("Order status changed concurrently, retry".to_string())
        })
    }

    /// Advisory stock report; settlement re-checks everything anyway
    pub async fn check_stock(&self, items: &[OrderItemRequest]) -> RepoResult<Vec<StockReport>> {
        let mut reports = Vec::with_capacity(items.len());
        for item in items {
            let product_id = parse_record_id("product", &item.product_id)?;
            let product: Option<Product> = self.base.db().select(product_id).await?;
            let product = product.ok_or_else(|| {
                RepoError::NotFound(format!("Product {} not found", item.product_id))
            })?;

            let purchasable = product.active && !product.lifecycle.is_deleted();
            reports.push(StockReport {
                product_id: item.product_id.clone(),
                product_name: product.name,
                requested: item.quantity,
                available: product.quantity,
                sufficient: purchasable && product.quantity >= item.quantity,
            });
        }
        Ok(reports)
    }

    async fn find_discount_by_code(&self, code: &str) -> RepoResult<Option<Discount>> {
        let rows: Vec<Discount> = self
            .base
            .db()
            .query("SELECT * FROM discount WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }
}

/// Derive the wire view: totals come from the stored line snapshots,
/// then the attached code is applied.
pub fn assemble_view(order: Order, discount: Option<Discount>) -> OrderView {
    let subtotal = money::total_of(order.details.iter().map(|d| d.line_total));
    let (brief, reduction) = match discount {
        Some(d) => {
            let cut = money::discount_reduction(subtotal, d.kind, d.amount);
            (
                Some(DiscountBrief {
                    code: d.code,
                    kind: d.kind,
                    amount: d.amount,
                }),
                cut,
            )
        }
        None => (None, 0.0),
    };

    OrderView {
        id: order.id.map(|id| id.to_string()).unwrap_or_default(),
        code: order.code,
        user_id: order.user_id,
        name: order.name,
        email: order.email,
        phone: order.phone,
        ship_address: order.ship_address,
        note: order.note,
        status: order.status,
        discount: brief,
        details: order.details.into_iter().map(Into::into).collect(),
        subtotal,
        discount_amount: reduction,
        total: money::after_reduction(subtotal, reduction),
        order_date: order.order_date,
        updated_at: order.updated_at,
    }
}
