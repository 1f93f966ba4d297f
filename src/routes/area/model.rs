use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateAreaRequest {
    pub household_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAreaRequest {
    pub area_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteAreaResponse {
    pub area_id: String,
    pub removed_associations: u64,
}
