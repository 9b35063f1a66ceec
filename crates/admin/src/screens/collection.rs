//! The generic settings screen.

use tracing::instrument;
use vendor_desk_core::types::{
    Attribute, Coupon, KycDocument, Policy, ShippingMethod, ShippingZone, ShippingZoneId,
    StaffMember, Validate, Warehouse, WarehouseId, warehouse::make_default,
};

use crate::editor::{
    EditorController, EditorError, EditorSettings, SubmitRequest, raise_remote_error, with_timeout,
};
use crate::gateway::{Resource, VendorApiClient, zone_methods_path};

pub type AttributesScreen = CollectionScreen<Attribute>;
pub type StaffScreen = CollectionScreen<StaffMember>;
pub type ShippingZonesScreen = CollectionScreen<ShippingZone>;
pub type ShippingMethodsScreen = CollectionScreen<ShippingMethod>;
pub type WarehousesScreen = CollectionScreen<Warehouse>;
pub type CouponsScreen = CollectionScreen<Coupon>;
pub type KycDocumentsScreen = CollectionScreen<KycDocument>;
pub type PoliciesScreen = CollectionScreen<Policy>;

/// A list of one entity type with a create/edit form, backed by one REST
/// collection.
#[derive(Debug)]
pub struct CollectionScreen<T: Resource> {
    editor: EditorController<T>,
    path: String,
}

impl<T: Resource> CollectionScreen<T> {
    /// Screen over `T`'s top-level collection.
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self::at_path(T::PATH, settings)
    }

    /// Screen over a nested collection such as a zone's methods.
    #[must_use]
    pub fn at_path(path: impl Into<String>, settings: EditorSettings) -> Self {
        Self {
            editor: EditorController::new(settings),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn editor(&self) -> &EditorController<T> {
        &self.editor
    }

    pub const fn editor_mut(&mut self) -> &mut EditorController<T> {
        &mut self.editor
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.editor.items()
    }

    /// Replace the list with the backend's collection.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Remote` if the fetch fails (the old list stays
    /// and an error flash is raised), or `EditorError::AlreadySubmitting`.
    #[instrument(skip(self, client), fields(path = %self.path))]
    pub async fn load(&mut self, client: &VendorApiClient) -> Result<usize, EditorError> {
        let resource = client.resource_at::<T>(self.path.clone());
        match with_timeout(self.editor.settings().request_timeout, resource.list_all()).await {
            Ok(items) => {
                let count = items.len();
                self.editor.load(items)?;
                Ok(count)
            }
            Err(err) => {
                raise_remote_error(self.editor.flash_mut(), &err);
                Err(err.into())
            }
        }
    }

    /// Delete one entity optimistically.
    ///
    /// # Errors
    ///
    /// As [`EditorController::delete_with`].
    #[instrument(skip(self, client), fields(path = %self.path, id = %id))]
    pub async fn delete(&mut self, client: &VendorApiClient, id: &T::Id) -> Result<(), EditorError> {
        let resource = client.resource_at::<T>(self.path.clone());
        self.editor
            .delete_with(id, |id| async move { resource.delete(&id).await })
            .await
    }
}

impl<T: Resource + Validate> CollectionScreen<T> {
    /// Submit the open form: POST for a new entity, PUT for an existing one.
    ///
    /// # Errors
    ///
    /// As [`EditorController::submit_with`].
    #[instrument(skip(self, client), fields(path = %self.path))]
    pub async fn submit(&mut self, client: &VendorApiClient) -> Result<Option<T>, EditorError> {
        let resource = client.resource_at::<T>(self.path.clone());
        self.editor
            .submit_with(|request| async move {
                match request {
                    SubmitRequest::Create(draft) => resource.create(&draft).await.map(Some),
                    SubmitRequest::Update(id, draft) => resource.update(&id, &draft).await.map(Some),
                }
            })
            .await
    }
}

impl ShippingMethodsScreen {
    /// Methods screen for one shipping zone.
    #[must_use]
    pub fn for_zone(zone_id: &ShippingZoneId, settings: EditorSettings) -> Self {
        Self::at_path(zone_methods_path(zone_id), settings)
    }
}

impl WarehousesScreen {
    /// Make `id` the default warehouse.
    ///
    /// The flag moves locally first and moves back if the backend refuses.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEntity` for an id not in the list,
    /// `EditorError::AlreadySubmitting` while a form submission is in flight,
    /// or `EditorError::Remote` after restoring the old default.
    #[instrument(skip(self, client), fields(id = %id))]
    pub async fn set_default(
        &mut self,
        client: &VendorApiClient,
        id: &WarehouseId,
    ) -> Result<(), EditorError> {
        if self.editor.find(id).is_none() {
            return Err(EditorError::UnknownEntity(id.to_string()));
        }
        let snapshot = self.editor.items().to_vec();
        let mut updated = snapshot.clone();
        make_default(&mut updated, id);
        self.editor.load(updated)?;

        let call = client.set_default_warehouse(id);
        match with_timeout(self.editor.settings().request_timeout, call).await {
            Ok(()) => {
                tracing::info!("Changed default warehouse");
                Ok(())
            }
            Err(err) => {
                self.editor.load(snapshot)?;
                raise_remote_error(self.editor.flash_mut(), &err);
                Err(err.into())
            }
        }
    }
}
