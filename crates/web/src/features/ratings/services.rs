use storage::{
    ResortStore,
    dto::rating::{ResortAggregates, SubmitRatingRequest, SubmitRatingResponse},
    error::Result,
};
use uuid::Uuid;

/// Store a validated rating and return it with the refreshed resort aggregates
pub async fn submit_rating(
    store: &dyn ResortStore,
    resort_id: Uuid,
    req: &SubmitRatingRequest,
) -> Result<SubmitRatingResponse> {
    let (rating, resort) = store
        .submit_rating(resort_id, req.user_id, req.scores())
        .await?;

    Ok(SubmitRatingResponse {
        resort: ResortAggregates::from(&resort),
        rating,
    })
}
