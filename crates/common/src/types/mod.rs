use serde::Serialize;

/// Body of `GET /health`.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub service: String,
}
