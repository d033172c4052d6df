//! Concrete portal pages wired through the navigation core. Each page
//! supplies its facet definitions, reads its own parameters off the URL
//! before every rebuild and, where plain URL rewrites are not enough,
//! handles clicks itself.

mod catalog;
mod purchase_orders;

pub use catalog::CATALOG_BASE_PATH;
pub use catalog::ProductCatalogPage;
pub use purchase_orders::PURCHASE_ORDERS_BASE_PATH;
pub use purchase_orders::PurchaseOrdersPage;
