//! Storage models and wire shapes
//!
//! Entity structs mirror the stored rows (snake_case fields). The
//! `*Create` / `*Update` payloads and `*View` projections are the wire
//! shapes, all camelCase. Record ids cross the wire as "table:id"
//! strings via [`serde_helpers`].

pub mod serde_helpers;

pub mod lifecycle;

pub mod category;
pub mod discount;
pub mod history;
pub mod order;
pub mod product;
pub mod supplier;

pub use lifecycle::Lifecycle;

pub use category::{Category, CategoryBrief, CategoryCreate, CategoryUpdate, CategoryView};
pub use discount::{
    Discount, DiscountCreate, DiscountKind, DiscountQuery, DiscountUpdate, DiscountValidation,
    DiscountView,
};
pub use history::{HistoryAction, HistoryPurgeRequest, HistoryQuery, HistoryView, ProductHistory};
pub use order::{
    AttachDiscountRequest, DiscountBrief, Order, OrderCreate, OrderDetail, OrderDetailView,
    OrderItemRequest, OrderListItem, OrderListRow, OrderQuery, OrderStatus, OrderView, StockReport,
};
pub use product::{
    Picture, Product, ProductCreate, ProductDetail, ProductListItem, ProductQuery, ProductUpdate,
    TopSaleItem,
};
pub use supplier::{Supplier, SupplierBrief, SupplierCreate, SupplierUpdate, SupplierView};
