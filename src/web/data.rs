use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The name/number pair a client submits to create or overwrite a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PersonPayload {
    pub name: String,
    pub number: String,
}
