//! Typed helpers for each vendor collection and the one-off endpoints.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;
use vendor_desk_core::listing::BulkAction;
use vendor_desk_core::types::{
    Attribute, AttributeId, Category, CategoryId, Coupon, KycDocument, Order, OrderId, Policy,
    Review, ReviewId, ReviewStatus, ShippingMethod, ShippingZone, ShippingZoneId, StaffMember,
    VendorProfile, Warehouse, WarehouseId,
};

use super::{GatewayError, ResourceClient, VendorApiClient};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRequest<'a> {
    #[serde(rename = "type")]
    action: BulkAction,
    order_ids: &'a [OrderId],
}

#[derive(Serialize)]
struct ModerationRequest {
    status: ReviewStatus,
}

#[derive(Serialize)]
struct ReplyRequest<'a> {
    reply: &'a str,
}

impl VendorApiClient {
    // =========================================================================
    // Orders
    // =========================================================================

    #[must_use]
    pub fn orders(&self) -> ResourceClient<'_, Order> {
        self.resource()
    }

    /// Ask the backend to generate documents (invoices, packing slips,
    /// shipping labels) for a batch of orders.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, order_ids), fields(action = %action, count = order_ids.len()))]
    pub async fn request_documents(
        &self,
        action: BulkAction,
        order_ids: &[OrderId],
    ) -> Result<(), GatewayError> {
        let body = DocumentRequest { action, order_ids };
        self.acknowledge(Method::POST, "/orders/documents", Some(&body))
            .await?;
        tracing::info!("Requested order documents");
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[must_use]
    pub fn attributes(&self) -> ResourceClient<'_, Attribute> {
        self.resource()
    }

    #[must_use]
    pub fn categories(&self) -> ResourceClient<'_, Category> {
        self.resource()
    }

    /// Link categories to an attribute.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    pub async fn link_attribute_categories(
        &self,
        attribute_id: &AttributeId,
        category_ids: &[CategoryId],
    ) -> Result<(), GatewayError> {
        self.attributes()
            .link(attribute_id, "categories", category_ids)
            .await
    }

    // =========================================================================
    // Store settings
    // =========================================================================

    #[must_use]
    pub fn staff(&self) -> ResourceClient<'_, StaffMember> {
        self.resource()
    }

    #[must_use]
    pub fn shipping_zones(&self) -> ResourceClient<'_, ShippingZone> {
        self.resource()
    }

    /// Shipping methods of one zone.
    #[must_use]
    pub fn zone_methods(&self, zone_id: &ShippingZoneId) -> ResourceClient<'_, ShippingMethod> {
        self.resource_at(zone_methods_path(zone_id))
    }

    #[must_use]
    pub fn warehouses(&self) -> ResourceClient<'_, Warehouse> {
        self.resource()
    }

    /// Make one warehouse the default. The backend clears the flag on the
    /// others.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn set_default_warehouse(&self, id: &WarehouseId) -> Result<(), GatewayError> {
        let path = format!("{}/{id}/default", self.warehouses().path());
        self.acknowledge(Method::PUT, &path, None::<&()>).await
    }

    #[must_use]
    pub fn coupons(&self) -> ResourceClient<'_, Coupon> {
        self.resource()
    }

    #[must_use]
    pub fn kyc_documents(&self) -> ResourceClient<'_, KycDocument> {
        self.resource()
    }

    #[must_use]
    pub fn policies(&self) -> ResourceClient<'_, Policy> {
        self.resource()
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    #[must_use]
    pub fn reviews(&self) -> ResourceClient<'_, Review> {
        self.resource()
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn moderate_review(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
    ) -> Result<Review, GatewayError> {
        let path = format!("{}/{id}/status", self.reviews().path());
        self.fetch_entity(Method::PATCH, &path, Some(&ModerationRequest { status }))
            .await
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, reply), fields(id = %id))]
    pub async fn reply_to_review(&self, id: &ReviewId, reply: &str) -> Result<Review, GatewayError> {
        let path = format!("{}/{id}/reply", self.reviews().path());
        self.fetch_entity(Method::POST, &path, Some(&ReplyRequest { reply }))
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<VendorProfile, GatewayError> {
        self.fetch_entity(Method::GET, "/profile", None::<&()>).await
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, profile), fields(store_name = %profile.store_name))]
    pub async fn update_profile(
        &self,
        profile: &VendorProfile,
    ) -> Result<VendorProfile, GatewayError> {
        let saved = self
            .fetch_entity(Method::PUT, "/profile", Some(profile))
            .await?;
        tracing::info!("Updated store profile");
        Ok(saved)
    }
}

pub(crate) fn zone_methods_path(zone_id: &ShippingZoneId) -> String {
    format!("/shipping-zones/{zone_id}/methods")
}
