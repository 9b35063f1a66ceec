//! Order list filtering and per-status aggregation.
//!
//! Three derived views are computed from the full collection:
//!
//! 1. the *base* set: search text plus date range,
//! 2. per-status counts over the base set (the tab never affects them),
//! 3. the *displayed* set: the base set narrowed by the active tab.
//!
//! Everything is recomputed from scratch on each call. Collections are
//! hundreds of rows, not millions.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{Order, OrderStatus, StatusTab};

/// Datetime layouts accepted for order dates and filter bounds, besides
/// RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a backend or form timestamp.
///
/// Date-only input means midnight. Offsets are normalized to UTC.
/// Returns `None` for anything unparseable.
///
/// ```
/// use vendor_desk_core::listing::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-05").is_some());
/// assert!(parse_timestamp("2024-01-05T10:30:00Z").is_some());
/// assert!(parse_timestamp("2024-01-05 10:30:00").is_some());
/// assert!(parse_timestamp("last tuesday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Filter state of the orders list. Holds no entity data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFilter {
    /// Free text matched against order id, customer name and email.
    pub search: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tab: StatusTab,
}

impl OrderFilter {
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        search.clone_into(&mut self.search);
        self
    }

    #[must_use]
    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = start.map(ToString::to_string);
        self.end_date = end.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn with_tab(mut self, tab: impl Into<StatusTab>) -> Self {
        self.tab = tab.into();
        self
    }

    /// Whether `order` belongs to the base set (search and dates only).
    #[must_use]
    pub fn admits(&self, order: &Order) -> bool {
        Compiled::new(self).admits(order)
    }
}

/// A date bound after parsing.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Absent,
    At(NaiveDateTime),
    /// Present but unparseable. Every comparison against it is false.
    Invalid,
}

impl Bound {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Absent,
            Some(s) => parse_timestamp(s).map_or(Self::Invalid, Self::At),
        }
    }
}

/// Filter state with the search lowercased and bounds parsed once.
struct Compiled {
    needle: String,
    start: Bound,
    end: Bound,
}

impl Compiled {
    fn new(filter: &OrderFilter) -> Self {
        Self {
            needle: filter.search.to_lowercase(),
            start: Bound::parse(filter.start_date.as_deref()),
            end: Bound::parse(filter.end_date.as_deref()),
        }
    }

    fn matches_search(&self, order: &Order) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        [
            order.id.as_str(),
            order.customer_name.as_str(),
            order.customer_email.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }

    fn matches_dates(&self, order: &Order) -> bool {
        if matches!((self.start, self.end), (Bound::Absent, Bound::Absent)) {
            return true;
        }
        let date = parse_timestamp(&order.date);
        let after_start = match self.start {
            Bound::Absent => true,
            Bound::At(start) => date.is_some_and(|d| d >= start),
            Bound::Invalid => false,
        };
        let before_end = match self.end {
            Bound::Absent => true,
            Bound::At(end) => date.is_some_and(|d| d <= end),
            Bound::Invalid => false,
        };
        after_start && before_end
    }

    fn admits(&self, order: &Order) -> bool {
        self.matches_search(order) && self.matches_dates(order)
    }
}

/// Orders matching the search text and date range, ignoring the tab.
#[must_use]
pub fn base_filtered<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    let compiled = Compiled::new(filter);
    orders.iter().filter(|o| compiled.admits(o)).collect()
}

/// The base set narrowed by the active tab.
#[must_use]
pub fn displayed<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    let tab = filter.tab;
    base_filtered(orders, filter)
        .into_iter()
        .filter(|o| tab.admits(o.status))
        .collect()
}

/// Number of base-filtered orders with `status`. Independent of the tab.
#[must_use]
pub fn count_by_status(orders: &[Order], filter: &OrderFilter, status: OrderStatus) -> usize {
    StatusCounts::tally(base_filtered(orders, filter)).get(status)
}

/// Per-status counts shown on the list tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    by_status: [usize; OrderStatus::ALL.len()],
    total: usize,
}

impl StatusCounts {
    /// Count every order once under its status.
    pub fn tally<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut counts = Self::default();
        for order in orders {
            if let Some(slot) = counts.by_status.get_mut(order.status.index()) {
                *slot += 1;
            }
            counts.total += 1;
        }
        counts
    }

    #[must_use]
    pub fn get(&self, status: OrderStatus) -> usize {
        self.by_status.get(status.index()).copied().unwrap_or(0)
    }

    /// Count for a tab: the total for `All`, the status count otherwise.
    #[must_use]
    pub fn for_tab(&self, tab: StatusTab) -> usize {
        match tab {
            StatusTab::All => self.total,
            StatusTab::Status(status) => self.get(status),
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// `(status, count)` pairs in tab order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderStatus, usize)> + '_ {
        OrderStatus::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// All derived views for one filter state.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub base: Vec<&'a Order>,
    pub counts: StatusCounts,
    pub displayed: Vec<&'a Order>,
}

impl<'a> FilterOutcome<'a> {
    #[must_use]
    pub fn evaluate(orders: &'a [Order], filter: &OrderFilter) -> Self {
        let base = base_filtered(orders, filter);
        let counts = StatusCounts::tally(base.iter().copied());
        let displayed = base
            .iter()
            .copied()
            .filter(|o| filter.tab.admits(o.status))
            .collect();
        Self {
            base,
            counts,
            displayed,
        }
    }

    /// Ids of the displayed orders, in display order.
    #[must_use]
    pub fn displayed_ids(&self) -> Vec<crate::types::OrderId> {
        self.displayed.iter().map(|o| o.id.clone()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn orders() -> Vec<Order> {
        vec![
            Order::new("1001", OrderStatus::Pending, "2024-01-05")
                .with_customer("Alice", "alice@example.com"),
            Order::new("1002", OrderStatus::Delivered, "2024-02-10")
                .with_customer("Bob", "bob@example.com"),
        ]
    }

    fn ids(list: &[&Order]) -> Vec<String> {
        list.iter().map(|o| o.id.to_string()).collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    #[test]
    fn test_unfiltered_shows_everything() {
        let orders = orders();
        let outcome = FilterOutcome::evaluate(&orders, &OrderFilter::default());
        assert_eq!(ids(&outcome.displayed), vec!["1001", "1002"]);
        assert_eq!(outcome.counts.get(OrderStatus::Pending), 1);
        assert_eq!(outcome.counts.get(OrderStatus::Delivered), 1);
        assert_eq!(outcome.counts.total(), 2);
    }

    #[test]
    fn test_search_narrows_base_and_counts() {
        let orders = orders();
        let filter = OrderFilter::default().with_search("bob");
        assert_eq!(ids(&base_filtered(&orders, &filter)), vec!["1002"]);
        assert_eq!(count_by_status(&orders, &filter, OrderStatus::Pending), 0);
    }

    #[test]
    fn test_tab_does_not_change_counts() {
        let orders = orders();
        let filter = OrderFilter::default().with_tab(OrderStatus::Pending);
        let outcome = FilterOutcome::evaluate(&orders, &filter);
        assert_eq!(ids(&outcome.displayed), vec!["1001"]);
        assert_eq!(outcome.counts.get(OrderStatus::Delivered), 1);
    }

    // =========================================================================
    // Search
    // =========================================================================

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let orders = orders();
        let by_email = OrderFilter::default().with_search("ALICE@EXAMPLE");
        assert_eq!(ids(&base_filtered(&orders, &by_email)), vec!["1001"]);
        let by_id = OrderFilter::default().with_search("100");
        assert_eq!(base_filtered(&orders, &by_id).len(), 2);
        let none = OrderFilter::default().with_search("zed");
        assert!(base_filtered(&orders, &none).is_empty());
    }

    // =========================================================================
    // Dates
    // =========================================================================

    #[test]
    fn test_date_bounds_are_inclusive() {
        let orders = orders();
        let filter = OrderFilter::default().with_dates(Some("2024-01-05"), Some("2024-01-05"));
        assert_eq!(ids(&base_filtered(&orders, &filter)), vec!["1001"]);

        let from_feb = OrderFilter::default().with_dates(Some("2024-02-01"), None);
        assert_eq!(ids(&base_filtered(&orders, &from_feb)), vec!["1002"]);

        let until_jan = OrderFilter::default().with_dates(None, Some("2024-01-31"));
        assert_eq!(ids(&base_filtered(&orders, &until_jan)), vec!["1001"]);
    }

    #[test]
    fn test_inverted_range_is_empty_not_an_error() {
        let orders = orders();
        let filter = OrderFilter::default().with_dates(Some("2024-03-01"), Some("2024-01-01"));
        assert!(base_filtered(&orders, &filter).is_empty());
    }

    #[test]
    fn test_malformed_bound_matches_nothing() {
        let orders = orders();
        let filter = OrderFilter::default().with_dates(Some("not a date"), None);
        assert!(base_filtered(&orders, &filter).is_empty());
        let counts = StatusCounts::tally(base_filtered(&orders, &filter));
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_blank_bounds_are_absent() {
        let orders = orders();
        let filter = OrderFilter::default().with_dates(Some(""), Some("  "));
        assert_eq!(base_filtered(&orders, &filter).len(), 2);
    }

    #[test]
    fn test_malformed_order_date_only_fails_when_bounded() {
        let mut orders = orders();
        orders[0].date = "sometime".to_string();
        assert_eq!(base_filtered(&orders, &OrderFilter::default()).len(), 2);
        let bounded = OrderFilter::default().with_dates(Some("2000-01-01"), None);
        assert_eq!(ids(&base_filtered(&orders, &bounded)), vec!["1002"]);
    }

    #[test]
    fn test_datetime_orders_compare_against_date_bounds() {
        let orders = vec![Order::new("7", OrderStatus::Shipped, "2024-02-10T15:00:00Z")];
        let same_day_end = OrderFilter::default().with_dates(None, Some("2024-02-10"));
        assert!(base_filtered(&orders, &same_day_end).is_empty());
        let next_day_end = OrderFilter::default().with_dates(None, Some("2024-02-11"));
        assert_eq!(base_filtered(&orders, &next_day_end).len(), 1);
    }

    #[test]
    fn test_parse_timestamp_normalizes_offsets() {
        let a = parse_timestamp("2024-01-05T10:00:00+02:00").unwrap();
        let b = parse_timestamp("2024-01-05 08:00:00").unwrap();
        assert_eq!(a, b);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn mixed_orders() -> Vec<Order> {
        OrderStatus::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, status)| {
                (0..=i).map(move |j| {
                    Order::new(
                        format!("{i}{j}").as_str(),
                        *status,
                        &format!("2024-0{}-1{}", (j % 9) + 1, i % 10),
                    )
                    .with_customer(&format!("customer {j}"), "c@example.com")
                })
            })
            .collect()
    }

    fn filters() -> Vec<OrderFilter> {
        let searches = ["", "customer 1", "3", "nobody"];
        let ranges = [
            (None, None),
            (Some("2024-02-01"), None),
            (Some("2024-01-01"), Some("2024-03-31")),
            (Some("garbage"), None),
        ];
        let mut all = vec![];
        for search in searches {
            for (start, end) in ranges {
                all.push(OrderFilter::default().with_search(search).with_dates(start, end));
            }
        }
        all
    }

    #[test]
    fn test_displayed_subset_of_base_subset_of_all() {
        let orders = mixed_orders();
        for filter in filters() {
            for tab in std::iter::once(StatusTab::All).chain(OrderStatus::ALL.map(StatusTab::from)) {
                let filter = filter.clone().with_tab(tab);
                let outcome = FilterOutcome::evaluate(&orders, &filter);
                assert!(outcome.base.len() <= orders.len());
                for order in &outcome.displayed {
                    assert!(outcome.base.iter().any(|b| b.id == order.id));
                    assert!(tab.admits(order.status));
                }
            }
        }
    }

    #[test]
    fn test_counts_identical_under_every_tab() {
        let orders = mixed_orders();
        for filter in filters() {
            let reference = FilterOutcome::evaluate(&orders, &filter).counts;
            for status in OrderStatus::ALL {
                let tabbed = filter.clone().with_tab(status);
                assert_eq!(FilterOutcome::evaluate(&orders, &tabbed).counts, reference);
            }
        }
    }

    #[test]
    fn test_counts_sum_to_total() {
        let orders = mixed_orders();
        let counts = StatusCounts::tally(&orders);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), counts.total());
        assert_eq!(counts.for_tab(StatusTab::All), orders.len());
        assert_eq!(counts.for_tab(StatusTab::Status(OrderStatus::Refund)), 7);
    }
}
