use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub household_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNameRequest {
    pub household_id: String,
    pub name: String,
}
