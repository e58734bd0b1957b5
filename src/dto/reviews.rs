use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct SubmitReviewRequest {
    pub user_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}
