//! Snapshot-and-restore mutations over an in-memory entity list.

use vendor_desk_core::types::Entity;

use super::EditorError;

/// A change to apply optimistically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T: Entity> {
    /// Append a new entity.
    Create(T),
    /// Replace the entity with the same id in place.
    Update(T),
    /// Remove the entity with this id.
    Delete(T::Id),
}

/// An applied but unconfirmed mutation.
///
/// Hand it back to [`OptimisticCollection::commit`] or
/// [`OptimisticCollection::rollback`].
#[derive(Debug)]
#[must_use = "a pending mutation must be committed or rolled back"]
pub struct PendingMutation<T: Entity> {
    snapshot: Vec<T>,
    target: Target<T>,
}

#[derive(Debug)]
enum Target<T: Entity> {
    /// Index of the appended entry.
    Created(usize),
    Updated(T::Id),
    Deleted,
}

impl<T: Entity> PendingMutation<T> {
    /// The collection as it was before the mutation.
    #[must_use]
    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }
}

/// An entity list whose changes show immediately and can be undone exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticCollection<T: Entity> {
    items: Vec<T>,
}

impl<T: Entity> Default for OptimisticCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> OptimisticCollection<T> {
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the whole list, e.g. after a reload.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    #[must_use]
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == Some(id))
    }

    /// Snapshot the list, then apply `mutation`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::MissingId`] for an update whose draft has no
    /// id and [`EditorError::UnknownEntity`] when the target is not in the
    /// list. Nothing is changed in either case.
    pub fn begin(&mut self, mutation: Mutation<T>) -> Result<PendingMutation<T>, EditorError> {
        let snapshot = self.items.clone();
        let target = match mutation {
            Mutation::Create(draft) => {
                self.items.push(draft);
                Target::Created(self.items.len() - 1)
            }
            Mutation::Update(draft) => {
                let id = draft.id().cloned().ok_or(EditorError::MissingId)?;
                let slot = self
                    .items
                    .iter_mut()
                    .find(|item| item.id() == Some(&id))
                    .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
                *slot = draft;
                Target::Updated(id)
            }
            Mutation::Delete(id) => {
                let index = self
                    .position(&id)
                    .ok_or_else(|| EditorError::UnknownEntity(id.to_string()))?;
                self.items.remove(index);
                Target::Deleted
            }
        };
        Ok(PendingMutation { snapshot, target })
    }

    /// Keep the mutation, folding in the server's copy of the entity when
    /// there is one (a newly assigned id, normalized fields).
    ///
    /// Returns the entry as it now stands in the list.
    pub fn commit(&mut self, pending: PendingMutation<T>, server: Option<T>) -> Option<T> {
        let slot = match pending.target {
            Target::Created(index) => self.items.get_mut(index),
            Target::Updated(id) => self.items.iter_mut().find(|item| item.id() == Some(&id)),
            Target::Deleted => return None,
        }?;
        if let Some(server) = server {
            *slot = server;
        }
        Some(slot.clone())
    }

    /// Restore the list exactly as it was before the mutation.
    pub fn rollback(&mut self, pending: PendingMutation<T>) {
        self.items = pending.snapshot;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use vendor_desk_core::types::{Attribute, AttributeId};

    use super::*;

    fn attribute(id: &str, name: &str) -> Attribute {
        Attribute {
            id: Some(AttributeId::new(id)),
            ..Attribute::draft(name, "General")
        }
    }

    fn sample() -> OptimisticCollection<Attribute> {
        OptimisticCollection::new(vec![attribute("1", "Size"), attribute("2", "Material")])
    }

    #[test]
    fn test_create_commit_reconciles_server_id() {
        let mut collection = sample();
        let pending = collection
            .begin(Mutation::Create(Attribute::draft("Color", "General")))
            .unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.items()[2].id, None);

        let committed = collection.commit(pending, Some(attribute("9", "Color"))).unwrap();
        assert_eq!(committed.id, Some(AttributeId::new("9")));
        assert_eq!(collection.items()[2], attribute("9", "Color"));
    }

    #[test]
    fn test_update_applies_in_place() {
        let mut collection = sample();
        let pending = collection
            .begin(Mutation::Update(attribute("1", "Shoe size")))
            .unwrap();
        assert_eq!(collection.items()[0].name, "Shoe size");
        assert_eq!(collection.items()[1].name, "Material");

        let committed = collection.commit(pending, None).unwrap();
        assert_eq!(committed.name, "Shoe size");
    }

    #[test]
    fn test_delete_filters_out() {
        let mut collection = sample();
        let pending = collection
            .begin(Mutation::Delete(AttributeId::new("1")))
            .unwrap();
        assert_eq!(collection.items(), &[attribute("2", "Material")]);
        assert_eq!(collection.commit(pending, None), None);
    }

    #[test]
    fn test_rollback_is_exact_for_every_mutation() {
        let mutations = vec![
            Mutation::Create(Attribute::draft("Color", "General")),
            Mutation::Update(attribute("2", "Fabric")),
            Mutation::Delete(AttributeId::new("1")),
        ];
        for mutation in mutations {
            let mut collection = sample();
            let before = collection.clone();
            let pending = collection.begin(mutation).unwrap();
            assert_ne!(collection, before);
            assert_eq!(pending.snapshot(), before.items());
            collection.rollback(pending);
            assert_eq!(collection, before);
        }
    }

    #[test]
    fn test_unknown_targets_change_nothing() {
        let mut collection = sample();
        let before = collection.clone();

        let err = collection
            .begin(Mutation::Update(attribute("42", "Ghost")))
            .unwrap_err();
        assert_eq!(err, EditorError::UnknownEntity("42".to_string()));

        let err = collection
            .begin(Mutation::Update(Attribute::draft("No id", "General")))
            .unwrap_err();
        assert_eq!(err, EditorError::MissingId);

        assert!(collection.begin(Mutation::Delete(AttributeId::new("42"))).is_err());
        assert_eq!(collection, before);
    }
}
