//! Rating submission and statistics

use shared::{RatingRecord, RatingSubmission, RatingSummary};
use validator::Validate;

use crate::error::AppResult;
use crate::external::SensorApiClient;

/// Ratings listed when the caller gives no limit
pub const DEFAULT_RECENT_LIMIT: u32 = 50;
/// Upper bound on a single listing
pub const MAX_RECENT_LIMIT: u32 = 500;

#[derive(Clone)]
pub struct RatingService {
    client: SensorApiClient,
}

impl RatingService {
    pub fn new(client: SensorApiClient) -> Self {
        Self { client }
    }

    /// Validate and forward a rating. One attempt only; the error is returned
    /// to the caller as-is.
    pub async fn submit(&self, submission: &RatingSubmission) -> AppResult<()> {
        submission.validate()?;

        self.client.submit_rating(submission).await.map_err(|e| {
            tracing::warn!("Rating submission failed: {}", e);
            e
        })?;

        tracing::info!(
            "Rating {} submitted for crop {:?} on device {:?}",
            submission.rating,
            submission.crop,
            submission.device
        );
        Ok(())
    }

    /// Statistics over every stored rating
    pub async fn summary(&self) -> AppResult<RatingSummary> {
        self.client.rating_statistics().await
    }

    /// Newest ratings first, at most `limit` of them (clamped to 1-500)
    pub async fn recent(&self, limit: Option<u32>) -> AppResult<Vec<RatingRecord>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.client.list_ratings(limit).await
    }
}
