//! Attribute (variation) screen extras.

use tracing::instrument;
use vendor_desk_core::types::{Attribute, CategoryId};

use super::collection::AttributesScreen;
use crate::editor::{EditorError, with_timeout};
use crate::error::ConsoleError;
use crate::gateway::VendorApiClient;

impl AttributesScreen {
    /// Save the open attribute form, then link it to `category_ids`.
    ///
    /// A failed link does not undo the save: the attribute stays in the list
    /// and a warning flash names what went wrong.
    ///
    /// # Errors
    ///
    /// As [`Self::submit`]. Link failures are not errors.
    #[instrument(skip(self, client, category_ids), fields(categories = category_ids.len()))]
    pub async fn create_with_categories(
        &mut self,
        client: &VendorApiClient,
        category_ids: &[CategoryId],
    ) -> Result<Option<Attribute>, EditorError> {
        self.editor_mut()
            .edit(|draft| draft.category_ids = category_ids.to_vec())?;

        let saved = self.submit(client).await?;
        let Some(attribute) = saved else {
            return Ok(None);
        };
        if category_ids.is_empty() {
            return Ok(Some(attribute));
        }

        let Some(id) = attribute.id.clone() else {
            self.editor_mut().warn(format!(
                "Attribute \"{}\" was saved without an id, so its categories were not linked",
                attribute.name
            ));
            return Ok(Some(attribute));
        };

        let timeout = self.editor().settings().request_timeout;
        let link = client.link_attribute_categories(&id, category_ids);
        match with_timeout(timeout, link).await {
            Ok(()) => tracing::info!(id = %id, "Linked attribute categories"),
            Err(err) => {
                let reason = ConsoleError::from(err).user_message();
                self.editor_mut().warn(format!(
                    "Attribute \"{}\" was saved, but its categories could not be linked: {reason}",
                    attribute.name
                ));
            }
        }
        Ok(Some(attribute))
    }
}
