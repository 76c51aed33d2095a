//! HTTP handlers for user ratings

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{validate_rating, DeviceId, Medium, RatingRecord, RatingSubmission, RatingSummary};

use crate::error::{AppError, AppResult};
use crate::services::RatingService;
use crate::AppState;

/// Rating body; selection fields default to the dashboard session
#[derive(Debug, Deserialize)]
pub struct SubmitRatingInput {
    pub rating: i64,
    pub device: Option<DeviceId>,
    pub crop: Option<String>,
    pub medium: Option<Medium>,
}

#[derive(Debug, Deserialize)]
pub struct RecentRatingsQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct SubmitRatingResponse {
    pub message: String,
    pub rating: RatingSubmission,
}

/// Submit a rating to the sensor service
pub async fn submit_rating(
    State(state): State<AppState>,
    Json(input): Json<SubmitRatingInput>,
) -> AppResult<(StatusCode, Json<SubmitRatingResponse>)> {
    let rating = validate_rating(input.rating).map_err(|msg| AppError::Validation {
        field: "rating".to_string(),
        message: msg.to_string(),
        message_es: "La calificación debe estar entre 1 y 5".to_string(),
    })?;

    let submission = {
        let mut session = state.session.lock().await;
        session.set_pending_rating(rating);
        RatingSubmission {
            rating,
            device: input.device.or(session.device()),
            crop: input.crop.or_else(|| session.crop().map(str::to_string)),
            medium: input.medium.or(session.medium()),
        }
    };

    let service = RatingService::new(state.client.as_ref().clone());
    let outcome = service.submit(&submission).await;

    // The pending value is discarded whether or not the service accepted it
    state.session.lock().await.clear_pending_rating();
    outcome?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitRatingResponse {
            message: "Rating submitted".to_string(),
            rating: submission,
        }),
    ))
}

/// Most recent ratings, newest first
pub async fn list_ratings(
    State(state): State<AppState>,
    Query(query): Query<RecentRatingsQuery>,
) -> AppResult<Json<Vec<RatingRecord>>> {
    let service = RatingService::new(state.client.as_ref().clone());
    let ratings = service.recent(query.limit).await?;
    Ok(Json(ratings))
}

/// Statistics over all stored ratings
pub async fn get_rating_summary(State(state): State<AppState>) -> AppResult<Json<RatingSummary>> {
    let service = RatingService::new(state.client.as_ref().clone());
    let summary = service.summary().await?;
    Ok(Json(summary))
}
