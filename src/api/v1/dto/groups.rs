use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}
