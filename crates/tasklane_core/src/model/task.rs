use crate::due::Due;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub due: Due,
    pub reminder: Option<String>,
    /// Id of the list this task is filed under, resolved on read.
    pub list_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub completed: bool,
}
