pub mod alert_service;
pub mod alert_service_impl;
pub use alert_service::AlertService;
pub use alert_service_impl::SeaOrmAlertService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod collection_service;
pub mod collection_service_impl;
pub use collection_service::CollectionService;
pub use collection_service_impl::SeaOrmCollectionService;

pub mod display_service;
pub mod display_service_impl;
pub use display_service::DisplayService;
pub use display_service_impl::SeaOrmDisplayService;
