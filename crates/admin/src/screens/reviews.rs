//! Product reviews: filtering and moderation.

use std::future::Future;

use tracing::instrument;
use vendor_desk_core::types::{Review, ReviewId, ReviewStatus, average_rating, require};

use crate::editor::{
    EditorError, EditorSettings, FlashSlot, Mutation, OptimisticCollection, raise_remote_error,
    with_timeout,
};
use crate::gateway::{GatewayError, VendorApiClient};

/// Reviews list with rating and status filters.
///
/// Moderation and replies change the list before the backend answers and
/// roll back if it refuses.
#[derive(Debug)]
pub struct ReviewsScreen {
    reviews: OptimisticCollection<Review>,
    rating: Option<u8>,
    status: Option<ReviewStatus>,
    flash: FlashSlot,
    settings: EditorSettings,
}

impl ReviewsScreen {
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            reviews: OptimisticCollection::new(Vec::new()),
            rating: None,
            status: None,
            flash: FlashSlot::new(settings.flash_window),
            settings,
        }
    }

    /// # Errors
    ///
    /// Returns `EditorError::Remote` if the fetch fails; the old list stays.
    #[instrument(skip(self, client))]
    pub async fn load(&mut self, client: &VendorApiClient) -> Result<usize, EditorError> {
        match with_timeout(self.settings.request_timeout, client.reviews().list_all()).await {
            Ok(reviews) => {
                let count = reviews.len();
                self.reviews.replace_all(reviews);
                Ok(count)
            }
            Err(err) => {
                raise_remote_error(&mut self.flash, &err);
                Err(err.into())
            }
        }
    }

    pub fn set_reviews(&mut self, reviews: Vec<Review>) {
        self.reviews.replace_all(reviews);
    }

    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.reviews.items()
    }

    /// Show only reviews with this many stars. `None` shows every rating.
    pub fn set_rating_filter(&mut self, rating: Option<u8>) {
        self.rating = rating;
    }

    pub fn set_status_filter(&mut self, status: Option<ReviewStatus>) {
        self.status = status;
    }

    /// Reviews passing both filters, in list order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Review> {
        self.reviews
            .items()
            .iter()
            .filter(|r| self.rating.is_none_or(|stars| r.stars() == stars))
            .filter(|r| self.status.is_none_or(|status| r.status == status))
            .collect()
    }

    /// Average over every loaded review, ignoring filters.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        average_rating(self.reviews.items())
    }

    #[must_use]
    pub const fn flash(&self) -> &FlashSlot {
        &self.flash
    }

    /// Approve or hide a review.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEntity` for an id not in the list, or
    /// `EditorError::Remote` after rolling back.
    #[instrument(skip(self, client), fields(id = %id, status = ?status))]
    pub async fn moderate(
        &mut self,
        client: &VendorApiClient,
        id: &ReviewId,
        status: ReviewStatus,
    ) -> Result<Review, EditorError> {
        let updated = Review {
            status,
            ..self.existing(id)?.clone()
        };
        self.apply(updated, client.moderate_review(id, status)).await
    }

    /// Post the vendor's public reply to a review.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Validation` for a blank reply, otherwise as
    /// [`Self::moderate`].
    #[instrument(skip(self, client, reply), fields(id = %id))]
    pub async fn reply(
        &mut self,
        client: &VendorApiClient,
        id: &ReviewId,
        reply: &str,
    ) -> Result<Review, EditorError> {
        require("reply", reply)?;
        let updated = Review {
            reply: Some(reply.trim().to_string()),
            ..self.existing(id)?.clone()
        };
        self.apply(updated, client.reply_to_review(id, reply.trim())).await
    }

    fn existing(&self, id: &ReviewId) -> Result<&Review, EditorError> {
        self.reviews
            .find(id)
            .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))
    }

    async fn apply<F>(&mut self, updated: Review, call: F) -> Result<Review, EditorError>
    where
        F: Future<Output = Result<Review, GatewayError>>,
    {
        let pending = self.reviews.begin(Mutation::Update(updated))?;
        match with_timeout(self.settings.request_timeout, call).await {
            Ok(server) => {
                let id = server.id.clone();
                let saved = self
                    .reviews
                    .commit(pending, Some(server))
                    .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
                tracing::info!(id = %id, "Updated review");
                Ok(saved)
            }
            Err(err) => {
                self.reviews.rollback(pending);
                tracing::warn!("Rolled back review change");
                raise_remote_error(&mut self.flash, &err);
                Err(err.into())
            }
        }
    }
}
