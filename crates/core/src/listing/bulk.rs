//! Bulk actions applied to the current multi-row selection.

use serde::{Deserialize, Serialize};

use super::selection::SelectionSet;

/// Document-generating actions offered in the orders bulk dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulkAction {
    Invoice,
    PackingSlip,
    ShippingLabel,
}

impl BulkAction {
    pub const ALL: [Self; 3] = [Self::Invoice, Self::PackingSlip, Self::ShippingLabel];

    /// Key used in the dropdown and on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::PackingSlip => "packing-slip",
            Self::ShippingLabel => "shipping-label",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Invoice => "Generate invoices",
            Self::PackingSlip => "Generate packing slips",
            Self::ShippingLabel => "Generate shipping labels",
        }
    }
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for BulkAction {
    type Err = BulkActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.key() == s.trim())
            .ok_or_else(|| BulkActionError::Unknown(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BulkActionError {
    #[error("unknown bulk action: {0}")]
    Unknown(String),
}

/// Receives the selected ids when a bulk action fires.
///
/// Document generation itself happens outside the console.
pub trait BulkActionHandler<K> {
    fn handle(&mut self, action: BulkAction, ids: &[K]);
}

impl<K, F> BulkActionHandler<K> for F
where
    F: FnMut(BulkAction, &[K]),
{
    fn handle(&mut self, action: BulkAction, ids: &[K]) {
        self(action, ids);
    }
}

/// The bulk action dropdown: remembers the pending choice and fires it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkActionDispatcher {
    pending: Option<BulkAction>,
}

impl BulkActionDispatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Action currently chosen in the dropdown.
    #[must_use]
    pub const fn pending(&self) -> Option<BulkAction> {
        self.pending
    }

    /// Choose an action in the dropdown. An empty key clears the choice.
    ///
    /// # Errors
    ///
    /// Returns [`BulkActionError::Unknown`] for keys outside the fixed set;
    /// the pending choice is left unchanged.
    pub fn select(&mut self, key: &str) -> Result<Option<BulkAction>, BulkActionError> {
        if key.trim().is_empty() {
            self.pending = None;
            return Ok(None);
        }
        let action = key.parse()?;
        self.pending = Some(action);
        Ok(self.pending)
    }

    /// Fire `key` against `selection`.
    ///
    /// An empty key or an empty selection is inert: the handler is not
    /// called. The pending choice is always reset afterwards; the selection
    /// is never touched.
    ///
    /// Returns the action that reached the handler, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BulkActionError::Unknown`] for keys outside the fixed set.
    pub fn apply<K, H>(
        &mut self,
        key: &str,
        selection: &SelectionSet<K>,
        handler: &mut H,
    ) -> Result<Option<BulkAction>, BulkActionError>
    where
        K: Ord + Clone,
        H: BulkActionHandler<K> + ?Sized,
    {
        self.pending = None;
        if key.trim().is_empty() {
            return Ok(None);
        }
        let action: BulkAction = key.parse()?;
        if selection.is_empty() {
            return Ok(None);
        }
        handler.handle(action, &selection.ids());
        Ok(Some(action))
    }

    /// Fire the pending choice, if any.
    ///
    /// # Errors
    ///
    /// Never fails for a pending choice, which is always a known action.
    pub fn apply_pending<K, H>(
        &mut self,
        selection: &SelectionSet<K>,
        handler: &mut H,
    ) -> Result<Option<BulkAction>, BulkActionError>
    where
        K: Ord + Clone,
        H: BulkActionHandler<K> + ?Sized,
    {
        let key = self.pending.map(BulkAction::key).unwrap_or_default();
        self.apply(key, selection, handler)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn selection(ids: &[&str]) -> SelectionSet<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_apply_calls_handler_with_selected_ids() {
        let mut dispatcher = BulkActionDispatcher::new();
        dispatcher.select("invoice").unwrap();
        let mut calls = vec![];
        let mut handler = |action: BulkAction, ids: &[String]| calls.push((action, ids.to_vec()));

        let fired = dispatcher
            .apply("invoice", &selection(&["1002", "1001"]), &mut handler)
            .unwrap();

        assert_eq!(fired, Some(BulkAction::Invoice));
        assert_eq!(
            calls,
            vec![(
                BulkAction::Invoice,
                vec!["1001".to_string(), "1002".to_string()]
            )]
        );
        assert_eq!(dispatcher.pending(), None);
    }

    #[test]
    fn test_empty_selection_is_inert() {
        let mut dispatcher = BulkActionDispatcher::new();
        let mut called = false;
        let mut handler = |_: BulkAction, _: &[String]| called = true;
        let fired = dispatcher
            .apply("packing-slip", &selection(&[]), &mut handler)
            .unwrap();
        assert_eq!(fired, None);
        assert!(!called);
    }

    #[test]
    fn test_empty_key_is_noop() {
        let mut dispatcher = BulkActionDispatcher::new();
        let mut called = false;
        let mut handler = |_: BulkAction, _: &[String]| called = true;
        assert_eq!(dispatcher.apply("", &selection(&["1"]), &mut handler), Ok(None));
        assert!(!called);
    }

    #[test]
    fn test_unknown_key_rejected_and_pending_reset() {
        let mut dispatcher = BulkActionDispatcher::new();
        dispatcher.select("shipping-label").unwrap();
        let mut handler = |_: BulkAction, _: &[String]| {};
        let result = dispatcher.apply("shred", &selection(&["1"]), &mut handler);
        assert_eq!(result, Err(BulkActionError::Unknown("shred".to_string())));
        assert_eq!(dispatcher.pending(), None);
    }

    #[test]
    fn test_apply_does_not_clear_selection() {
        let mut dispatcher = BulkActionDispatcher::new();
        let chosen = selection(&["1", "2"]);
        let mut handler = |_: BulkAction, _: &[String]| {};
        dispatcher.apply("invoice", &chosen, &mut handler).unwrap();
        assert_eq!(chosen.len(), 2);
    }

    #[test]
    fn test_apply_pending() {
        let mut dispatcher = BulkActionDispatcher::new();
        let mut count = 0;
        let mut handler = |_: BulkAction, ids: &[String]| count += ids.len();
        assert_eq!(dispatcher.apply_pending(&selection(&["1"]), &mut handler), Ok(None));

        dispatcher.select("packing-slip").unwrap();
        let fired = dispatcher.apply_pending(&selection(&["1", "2"]), &mut handler);
        assert_eq!(fired, Ok(Some(BulkAction::PackingSlip)));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_select_empty_clears() {
        let mut dispatcher = BulkActionDispatcher::new();
        dispatcher.select("invoice").unwrap();
        assert_eq!(dispatcher.select(""), Ok(None));
        assert_eq!(dispatcher.pending(), None);
        assert!(dispatcher.select("nope").is_err());
    }

    #[test]
    fn test_wire_keys() {
        for action in BulkAction::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.key()));
        }
    }
}
