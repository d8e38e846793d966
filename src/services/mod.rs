pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::DefaultCatalogService;

pub mod personalization_service;
pub mod personalization_service_impl;
pub use personalization_service::{PersonalizationError, PersonalizationService};
pub use personalization_service_impl::SeaOrmPersonalizationService;

pub mod device_service;
pub use device_service::{DeviceService, SeaOrmDeviceService};
