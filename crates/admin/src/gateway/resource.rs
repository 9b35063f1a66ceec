//! Generic CRUD over a REST collection.

use std::fmt::Display;
use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::instrument;
use vendor_desk_core::types::{
    Attribute, Category, Coupon, Entity, KycDocument, Order, Policy, Review, ShippingMethod,
    ShippingZone, StaffMember, Warehouse,
};

use super::{GatewayError, Listing, VendorApiClient};

/// Page size used when fetching a whole collection.
const LIST_ALL_PAGE_SIZE: u32 = 100;

/// Hard stop for [`ResourceClient::list_all`] against a backend whose
/// metadata never ends.
const LIST_ALL_MAX_PAGES: u32 = 500;

/// An entity type backed by a REST collection.
pub trait Resource: Entity + Serialize + DeserializeOwned {
    /// Collection path relative to the API base URL, e.g. `/variations`.
    const PATH: &'static str;
}

impl Resource for Order {
    const PATH: &'static str = "/orders";
}

impl Resource for Attribute {
    const PATH: &'static str = "/variations";
}

impl Resource for Category {
    const PATH: &'static str = "/categories";
}

impl Resource for StaffMember {
    const PATH: &'static str = "/staff";
}

impl Resource for ShippingZone {
    const PATH: &'static str = "/shipping-zones";
}

/// Top-level path; methods are normally reached through their zone.
impl Resource for ShippingMethod {
    const PATH: &'static str = "/shipping-methods";
}

impl Resource for Warehouse {
    const PATH: &'static str = "/warehouses";
}

impl Resource for Coupon {
    const PATH: &'static str = "/coupons";
}

impl Resource for KycDocument {
    const PATH: &'static str = "/kyc-documents";
}

impl Resource for Policy {
    const PATH: &'static str = "/policies";
}

impl Resource for Review {
    const PATH: &'static str = "/reviews";
}

/// CRUD operations on one collection.
///
/// Built by [`VendorApiClient::resource`] for top-level collections or
/// [`VendorApiClient::resource_at`] for nested ones.
pub struct ResourceClient<'a, T> {
    client: &'a VendorApiClient,
    path: String,
    entity: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for ResourceClient<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl VendorApiClient {
    /// Client for `T`'s top-level collection.
    #[must_use]
    pub fn resource<T: Resource>(&self) -> ResourceClient<'_, T> {
        self.resource_at(T::PATH)
    }

    /// Client for a collection of `T` at an explicit path.
    #[must_use]
    pub fn resource_at<T: Resource>(&self, path: impl Into<String>) -> ResourceClient<'_, T> {
        ResourceClient {
            client: self,
            path: path.into(),
            entity: PhantomData,
        }
    }
}

impl<T: Resource> ResourceClient<'_, T> {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_path(&self, id: &impl Display) -> String {
        format!("{}/{id}", self.path)
    }

    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the envelope does not
    /// decode.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn list(&self, page: u32, limit: u32) -> Result<Listing<T>, GatewayError> {
        let path = format!("{}?page={}&limit={}", self.path, page.max(1), limit.max(1));
        self.client.fetch_list(&path).await
    }

    /// Fetch every page and concatenate.
    ///
    /// Stops after the first page when the backend sends no pagination
    /// metadata, and as soon as the metadata reports a page earlier than the
    /// one requested.
    ///
    /// # Errors
    ///
    /// Returns the first `GatewayError` encountered.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn list_all(&self) -> Result<Vec<T>, GatewayError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let listing = self.list(page, LIST_ALL_PAGE_SIZE).await?;
            // A backend that ignores `page` keeps echoing an earlier page.
            if listing.meta.is_some_and(|meta| meta.page < page) {
                tracing::warn!(page, "Backend ignored page parameter");
                break;
            }
            let more = listing.has_more() && !listing.items.is_empty();
            items.extend(listing.items);
            if !more || page >= LIST_ALL_MAX_PAGES {
                break;
            }
            page += 1;
        }
        tracing::debug!(count = items.len(), "Fetched collection");
        Ok(items)
    }

    /// # Errors
    ///
    /// Returns `GatewayError::Status` with 404 if the entity does not exist.
    #[instrument(skip(self), fields(path = %self.path, id = %id))]
    pub async fn get(&self, id: &T::Id) -> Result<T, GatewayError> {
        self.client
            .fetch_entity(Method::GET, &self.item_path(id), None::<&()>)
            .await
    }

    /// Create an entity and return the server's copy, with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, draft), fields(path = %self.path))]
    pub async fn create(&self, draft: &T) -> Result<T, GatewayError> {
        let created: T = self
            .client
            .fetch_entity(Method::POST, &self.path, Some(draft))
            .await?;
        if let Some(id) = created.id() {
            tracing::info!(id = %id, "Created entity");
        }
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, draft), fields(path = %self.path, id = %id))]
    pub async fn update(&self, id: &T::Id, draft: &T) -> Result<T, GatewayError> {
        let updated = self
            .client
            .fetch_entity(Method::PUT, &self.item_path(id), Some(draft))
            .await?;
        tracing::info!("Updated entity");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self), fields(path = %self.path, id = %id))]
    pub async fn delete(&self, id: &T::Id) -> Result<(), GatewayError> {
        self.client
            .acknowledge(Method::DELETE, &self.item_path(id), None::<&()>)
            .await?;
        tracing::info!("Deleted entity");
        Ok(())
    }

    /// Link child records to an entity, e.g. categories to an attribute.
    ///
    /// Sends `POST {path}/{id}/{relation}` with `{ "ids": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend refuses or the request fails.
    #[instrument(skip(self, child_ids), fields(path = %self.path, id = %id, count = child_ids.len()))]
    pub async fn link<C: Serialize + Sync>(
        &self,
        id: &T::Id,
        relation: &str,
        child_ids: &[C],
    ) -> Result<(), GatewayError> {
        let path = format!("{}/{relation}", self.item_path(id));
        self.client
            .acknowledge(Method::POST, &path, Some(&json!({ "ids": child_ids })))
            .await?;
        tracing::info!(relation, "Linked entities");
        Ok(())
    }
}
