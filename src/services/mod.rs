pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod draft_service;
pub mod inventory_service;
pub mod procurement_service;

pub use cart_service::CartError;
pub use catalog_service::CatalogError;
pub use checkout_service::CheckoutError;
pub use customer_service::CustomerError;
pub use dashboard_service::DashboardSummary;
pub use draft_service::DraftError;
pub use inventory_service::InventoryError;
pub use procurement_service::ProcurementError;
