//! Per-screen state built on the listing engine and the optimistic editor.
//!
//! Screens own their collections. They talk to the backend only through
//! [`VendorApiClient`](crate::gateway::VendorApiClient) and surface failures
//! as flashes.

mod attributes;
mod collection;
mod orders;
mod reviews;

pub use collection::{
    AttributesScreen, CollectionScreen, CouponsScreen, KycDocumentsScreen, PoliciesScreen,
    ShippingMethodsScreen, ShippingZonesScreen, StaffScreen, WarehousesScreen,
};
pub use orders::OrdersScreen;
pub use reviews::ReviewsScreen;
