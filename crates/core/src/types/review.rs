//! Product reviews left by customers.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::id::ReviewId;

/// Moderation state of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub customer_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub date: String,
}

impl Review {
    /// Rating clamped into 1..=5 for star rendering.
    #[must_use]
    pub fn stars(&self) -> u8 {
        self.rating.clamp(1, 5)
    }
}

impl Entity for Review {
    type Id = ReviewId;

    fn id(&self) -> Option<&ReviewId> {
        Some(&self.id)
    }
}

/// Average star rating, `None` for an empty slice.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.stars())).sum();
    #[allow(clippy::cast_precision_loss)] // review counts stay far below f64 precision
    Some(f64::from(sum) / reviews.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, rating: u8) -> Review {
        Review {
            id: ReviewId::new(id),
            product_name: "Mug".to_string(),
            customer_name: "Ann".to_string(),
            rating,
            comment: String::new(),
            status: ReviewStatus::Pending,
            reply: None,
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        let avg = average_rating(&[review("1", 5), review("2", 2)]).unwrap_or_default();
        assert!((avg - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stars_clamped() {
        assert_eq!(review("1", 0).stars(), 1);
        assert_eq!(review("1", 9).stars(), 5);
    }
}
