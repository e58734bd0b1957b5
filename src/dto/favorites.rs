use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Default, ToSchema)]
pub struct FavoriteRequest {
    pub user_id: Option<Uuid>,
    pub menu_id: Option<Uuid>,
}
