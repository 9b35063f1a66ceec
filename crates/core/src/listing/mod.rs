//! List-view logic: filtering, tab counts, selection, bulk actions and
//! pagination.
//!
//! Everything here is derived state computed from an in-memory list. No I/O.

pub mod bulk;
pub mod filter;
pub mod page;
pub mod selection;

pub use bulk::{BulkAction, BulkActionDispatcher, BulkActionError, BulkActionHandler};
pub use filter::{
    FilterOutcome, OrderFilter, StatusCounts, base_filtered, count_by_status, displayed,
    parse_timestamp,
};
pub use page::{PageMeta, paginate};
pub use selection::{HeaderCheckbox, SelectionSet};
