//! The create/edit/delete form state machine.

use std::future::Future;

use vendor_desk_core::types::{Entity, Validate};

use super::collection::{Mutation, OptimisticCollection, PendingMutation};
use super::flash::{FlashLevel, FlashSlot};
use super::{EditorError, EditorSettings, raise_remote_error, with_timeout};
use crate::gateway::GatewayError;

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    /// No form open.
    #[default]
    Idle,
    /// Form open with a draft.
    Editing,
    /// A remote call is in flight; the submit control is disabled.
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode<Id> {
    Create,
    Edit(Id),
}

/// The remote call a submission needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest<T: Entity> {
    Create(T),
    Update(T::Id, T),
}

/// A submission that has been applied locally and awaits the remote result.
#[derive(Debug)]
#[must_use = "pass the ticket to finish_submit"]
pub struct SubmitTicket<T: Entity> {
    pending: PendingMutation<T>,
    request: SubmitRequest<T>,
}

impl<T: Entity> SubmitTicket<T> {
    #[must_use]
    pub const fn request(&self) -> &SubmitRequest<T> {
        &self.request
    }
}

/// A deletion that has been applied locally and awaits the remote result.
#[derive(Debug)]
#[must_use = "pass the ticket to finish_delete"]
pub struct DeleteTicket<T: Entity> {
    pending: PendingMutation<T>,
    id: T::Id,
}

impl<T: Entity> DeleteTicket<T> {
    #[must_use]
    pub const fn id(&self) -> &T::Id {
        &self.id
    }
}

/// Form controller over one entity collection.
///
/// Edits happen on a copy of the entity, so the list only changes when the
/// draft is submitted. Only one submission may be in flight at a time.
#[derive(Debug)]
pub struct EditorController<T: Entity> {
    collection: OptimisticCollection<T>,
    state: EditorState,
    draft: Option<T>,
    mode: Option<Mode<T::Id>>,
    flash: FlashSlot,
    settings: EditorSettings,
}

impl<T: Entity> EditorController<T> {
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_items(Vec::new(), settings)
    }

    #[must_use]
    pub fn with_items(items: Vec<T>, settings: EditorSettings) -> Self {
        Self {
            collection: OptimisticCollection::new(items),
            state: EditorState::Idle,
            draft: None,
            mode: None,
            flash: FlashSlot::new(settings.flash_window),
            settings,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.collection.items()
    }

    #[must_use]
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.collection.find(id)
    }

    #[must_use]
    pub const fn state(&self) -> EditorState {
        self.state
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state == EditorState::Submitting
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&T> {
        self.draft.as_ref()
    }

    /// Whether the open form creates a new entity rather than editing one.
    #[must_use]
    pub fn is_creating(&self) -> bool {
        self.mode == Some(Mode::Create)
    }

    #[must_use]
    pub const fn flash(&self) -> &FlashSlot {
        &self.flash
    }

    pub const fn flash_mut(&mut self) -> &mut FlashSlot {
        &mut self.flash
    }

    #[must_use]
    pub const fn settings(&self) -> EditorSettings {
        self.settings
    }

    /// Replace the collection with freshly loaded entities.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AlreadySubmitting`] while a submission is in
    /// flight; its rollback would otherwise clobber the new data.
    pub fn load(&mut self, items: Vec<T>) -> Result<(), EditorError> {
        self.ensure_not_submitting()?;
        self.collection.replace_all(items);
        Ok(())
    }

    /// Open the form on a blank template.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AlreadySubmitting`] while a submission is in
    /// flight.
    pub fn open_create(&mut self, template: T) -> Result<(), EditorError> {
        self.ensure_not_submitting()?;
        self.draft = Some(template);
        self.mode = Some(Mode::Create);
        self.state = EditorState::Editing;
        Ok(())
    }

    /// Open the form on a copy of an existing entity.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownEntity`] if `id` is not in the list, or
    /// [`EditorError::AlreadySubmitting`] while a submission is in flight.
    pub fn open_edit(&mut self, id: &T::Id) -> Result<(), EditorError> {
        self.ensure_not_submitting()?;
        let entity = self
            .collection
            .find(id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
        self.draft = Some(entity);
        self.mode = Some(Mode::Edit(id.clone()));
        self.state = EditorState::Editing;
        Ok(())
    }

    /// Change the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotEditing`] unless the form is open and idle.
    pub fn edit(&mut self, change: impl FnOnce(&mut T)) -> Result<(), EditorError> {
        if self.state != EditorState::Editing {
            return Err(self.not_editable());
        }
        let draft = self.draft.as_mut().ok_or(EditorError::NotEditing)?;
        change(draft);
        Ok(())
    }

    /// Close the form and drop the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AlreadySubmitting`] while a submission is in
    /// flight.
    pub fn cancel(&mut self) -> Result<(), EditorError> {
        self.ensure_not_submitting()?;
        self.close();
        Ok(())
    }

    /// Raise a non-blocking warning. Used when the main change succeeded but
    /// a follow-up call did not; nothing is rolled back.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(message = %message, "Partial success");
        self.flash.raise(FlashLevel::Warning, message);
    }

    /// Start deleting an entity: it disappears from the list immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::AlreadySubmitting`] while a submission is in
    /// flight, or [`EditorError::UnknownEntity`] if `id` is not in the list.
    pub fn begin_delete(&mut self, id: &T::Id) -> Result<DeleteTicket<T>, EditorError> {
        self.ensure_not_submitting()?;
        let pending = self.collection.begin(Mutation::Delete(id.clone()))?;
        self.close();
        self.state = EditorState::Submitting;
        Ok(DeleteTicket {
            pending,
            id: id.clone(),
        })
    }

    /// Settle a deletion. Either way the controller ends up idle.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Remote`] after restoring the list if the remote
    /// call failed.
    pub fn finish_delete(
        &mut self,
        ticket: DeleteTicket<T>,
        outcome: Result<(), GatewayError>,
    ) -> Result<(), EditorError> {
        self.state = EditorState::Idle;
        match outcome {
            Ok(()) => {
                let _ = self.collection.commit(ticket.pending, None);
                tracing::info!(id = %ticket.id, "Deleted");
                Ok(())
            }
            Err(err) => {
                self.collection.rollback(ticket.pending);
                self.report_failure(&err);
                Err(EditorError::Remote(err))
            }
        }
    }

    /// Delete `id` optimistically, calling `remote` to confirm.
    ///
    /// # Errors
    ///
    /// As [`Self::begin_delete`] and [`Self::finish_delete`]. A call that does
    /// not finish within the request timeout counts as failed.
    pub async fn delete_with<F, Fut>(&mut self, id: &T::Id, remote: F) -> Result<(), EditorError>
    where
        F: FnOnce(T::Id) -> Fut,
        Fut: Future<Output = Result<(), GatewayError>>,
    {
        let ticket = self.begin_delete(id)?;
        let outcome = with_timeout(self.settings.request_timeout, remote(id.clone())).await;
        self.finish_delete(ticket, outcome)
    }

    fn ensure_not_submitting(&self) -> Result<(), EditorError> {
        if self.is_submitting() {
            return Err(EditorError::AlreadySubmitting);
        }
        Ok(())
    }

    fn not_editable(&self) -> EditorError {
        if self.is_submitting() {
            EditorError::AlreadySubmitting
        } else {
            EditorError::NotEditing
        }
    }

    fn close(&mut self) {
        self.draft = None;
        self.mode = None;
        self.state = EditorState::Idle;
    }

    fn report_failure(&mut self, err: &GatewayError) {
        tracing::warn!("Rolled back optimistic change");
        raise_remote_error(&mut self.flash, err);
    }
}

impl<T: Entity + Validate> EditorController<T> {
    /// Validate the draft and apply it to the list.
    ///
    /// # Errors
    ///
    /// - [`EditorError::AlreadySubmitting`] while a submission is in flight
    /// - [`EditorError::NotEditing`] when no form is open
    /// - [`EditorError::Validation`] when the draft breaks a rule; the form
    ///   stays open and nothing is sent
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<T>, EditorError> {
        if self.state != EditorState::Editing {
            return Err(self.not_editable());
        }
        let draft = self.draft.clone().ok_or(EditorError::NotEditing)?;
        draft.validate()?;

        let (mutation, request) = match &self.mode {
            Some(Mode::Edit(id)) => (
                Mutation::Update(draft.clone()),
                SubmitRequest::Update(id.clone(), draft),
            ),
            Some(Mode::Create) | None => {
                (Mutation::Create(draft.clone()), SubmitRequest::Create(draft))
            }
        };
        let pending = self.collection.begin(mutation)?;
        self.state = EditorState::Submitting;
        Ok(SubmitTicket { pending, request })
    }

    /// Settle a submission.
    ///
    /// On success the server's copy (if any) replaces the optimistic entry
    /// and the form closes. On failure the list is restored exactly, the form
    /// stays open with the draft, and an error banner is raised.
    ///
    /// Returns the entry as it now stands in the list.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Remote`] if the remote call failed.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket<T>,
        outcome: Result<Option<T>, GatewayError>,
    ) -> Result<Option<T>, EditorError> {
        match outcome {
            Ok(server) => {
                let entry = self.collection.commit(ticket.pending, server);
                self.close();
                match entry.as_ref().and_then(Entity::id) {
                    Some(id) => tracing::info!(id = %id, "Saved"),
                    None => tracing::info!("Saved"),
                }
                Ok(entry)
            }
            Err(err) => {
                self.collection.rollback(ticket.pending);
                self.state = EditorState::Editing;
                self.report_failure(&err);
                Err(EditorError::Remote(err))
            }
        }
    }

    /// Submit the draft, calling `remote` to persist it.
    ///
    /// # Errors
    ///
    /// As [`Self::begin_submit`] and [`Self::finish_submit`]. A call that
    /// does not finish within the request timeout counts as failed.
    pub async fn submit_with<F, Fut>(&mut self, remote: F) -> Result<Option<T>, EditorError>
    where
        F: FnOnce(SubmitRequest<T>) -> Fut,
        Fut: Future<Output = Result<Option<T>, GatewayError>>,
    {
        let ticket = self.begin_submit()?;
        let outcome =
            with_timeout(self.settings.request_timeout, remote(ticket.request.clone())).await;
        self.finish_submit(ticket, outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use vendor_desk_core::types::{Attribute, AttributeId, ValidationError};

    use super::*;
    use crate::editor::FlashLevel;

    fn attribute(id: &str, name: &str) -> Attribute {
        Attribute {
            id: Some(AttributeId::new(id)),
            ..Attribute::draft(name, "General")
        }
    }

    fn editor() -> EditorController<Attribute> {
        EditorController::with_items(
            vec![attribute("1", "Size"), attribute("2", "Material")],
            EditorSettings {
                request_timeout: Duration::from_millis(50),
                flash_window: Duration::from_secs(3),
            },
        )
    }

    fn network_error() -> GatewayError {
        GatewayError::Request("connection reset".to_string())
    }

    // =========================================================================
    // Create
    // =========================================================================

    #[tokio::test]
    async fn test_failed_create_restores_collection_exactly() {
        let mut editor = editor();
        let before = editor.items().to_vec();

        editor.open_create(Attribute::draft("Color", "General")).unwrap();
        let result = editor
            .submit_with(|_| async { Err(network_error()) })
            .await;

        assert_eq!(result, Err(EditorError::Remote(network_error())));
        assert_eq!(editor.items(), before.as_slice());
        assert!(!editor.is_submitting());
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.draft().unwrap().name, "Color");

        let flash = editor.flash().current().unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert!(!flash.message.is_empty());
    }

    #[tokio::test]
    async fn test_successful_create_takes_server_id() {
        let mut editor = editor();
        editor.open_create(Attribute::draft("Color", "General")).unwrap();

        let saved = editor
            .submit_with(|request| async move {
                let SubmitRequest::Create(draft) = request else {
                    return Err(GatewayError::Decode("expected create".to_string()));
                };
                Ok(Some(Attribute {
                    id: Some(AttributeId::new("3")),
                    ..draft
                }))
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(saved.id, Some(AttributeId::new("3")));
        assert_eq!(editor.items().len(), 3);
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.draft().is_none());
        assert!(editor.flash().current().is_none());
    }

    #[test]
    fn test_optimistic_entry_visible_while_submitting() {
        let mut editor = editor();
        editor.open_create(Attribute::draft("Color", "General")).unwrap();
        let ticket = editor.begin_submit().unwrap();

        assert!(editor.is_submitting());
        assert_eq!(editor.items().len(), 3);
        assert_eq!(editor.begin_submit().unwrap_err(), EditorError::AlreadySubmitting);
        assert_eq!(editor.cancel(), Err(EditorError::AlreadySubmitting));

        editor.finish_submit(ticket, Ok(None)).unwrap();
        assert_eq!(editor.items().len(), 3);
        assert_eq!(editor.items()[2].name, "Color");
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[tokio::test]
    async fn test_validation_failure_never_calls_remote() {
        let mut editor = editor();
        editor.open_create(Attribute::draft("", "General")).unwrap();
        let called = Cell::new(false);

        let result = editor
            .submit_with(|_| {
                called.set(true);
                async { Ok(None) }
            })
            .await;

        assert_eq!(
            result,
            Err(EditorError::Validation(ValidationError::Required { field: "name" }))
        );
        assert!(!called.get());
        assert_eq!(editor.state(), EditorState::Editing);
        assert_eq!(editor.items().len(), 2);
    }

    // =========================================================================
    // Edit
    // =========================================================================

    #[test]
    fn test_edit_works_on_a_copy() {
        let mut editor = editor();
        editor.open_edit(&AttributeId::new("1")).unwrap();
        editor.edit(|draft| draft.name = "Shoe size".to_string()).unwrap();

        assert_eq!(editor.items()[0].name, "Size");
        assert_eq!(editor.draft().unwrap().name, "Shoe size");

        editor.cancel().unwrap();
        assert_eq!(editor.items()[0].name, "Size");
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[tokio::test]
    async fn test_failed_update_reverts_in_place() {
        let mut editor = editor();
        let before = editor.items().to_vec();
        editor.open_edit(&AttributeId::new("2")).unwrap();
        editor.edit(|draft| draft.set_values_from_input("Cotton, Wool")).unwrap();

        let result = editor
            .submit_with(|request| async move {
                assert!(matches!(request, SubmitRequest::Update(ref id, _) if id.as_str() == "2"));
                Err(GatewayError::Status {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(editor.items(), before.as_slice());
        assert_eq!(editor.draft().unwrap().values, vec!["Cotton", "Wool"]);
    }

    #[test]
    fn test_edit_requires_open_form() {
        let mut editor = editor();
        assert_eq!(editor.edit(|_| {}), Err(EditorError::NotEditing));
        assert_eq!(editor.begin_submit().unwrap_err(), EditorError::NotEditing);
        assert_eq!(
            editor.open_edit(&AttributeId::new("404")),
            Err(EditorError::UnknownEntity("404".to_string()))
        );
    }

    // =========================================================================
    // Delete
    // =========================================================================

    #[tokio::test]
    async fn test_failed_delete_restores_and_goes_idle() {
        let mut editor = editor();
        let before = editor.items().to_vec();

        let result = editor
            .delete_with(&AttributeId::new("1"), |_| async { Err(network_error()) })
            .await;

        assert!(matches!(result, Err(EditorError::Remote(_))));
        assert_eq!(editor.items(), before.as_slice());
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.flash().current().is_some());
    }

    #[tokio::test]
    async fn test_successful_delete() {
        let mut editor = editor();
        editor
            .delete_with(&AttributeId::new("1"), |_| async { Ok(()) })
            .await
            .unwrap();
        assert_eq!(editor.items(), &[attribute("2", "Material")]);
    }

    // =========================================================================
    // Timeout
    // =========================================================================

    #[tokio::test]
    async fn test_hung_request_times_out_and_rolls_back() {
        let mut editor = editor();
        let before = editor.items().to_vec();
        editor.open_create(Attribute::draft("Color", "General")).unwrap();

        let result = editor
            .submit_with(|_| std::future::pending::<Result<Option<Attribute>, GatewayError>>())
            .await;

        assert_eq!(
            result,
            Err(EditorError::Remote(GatewayError::Timeout(Duration::from_millis(50))))
        );
        assert_eq!(editor.items(), before.as_slice());
        assert!(!editor.is_submitting());
    }

    #[test]
    fn test_warn_raises_warning_without_touching_items() {
        let mut editor = editor();
        let before = editor.items().to_vec();
        editor.warn("Attribute saved, but categories could not be linked");
        assert_eq!(editor.flash().current().unwrap().level, FlashLevel::Warning);
        assert_eq!(editor.items(), before.as_slice());
    }
}
