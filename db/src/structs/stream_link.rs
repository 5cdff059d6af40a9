use chrono::{DateTime, Utc};

/// A stored link to a recorded lecture stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamLink {
    pub id: i64,
    // always stored lowercased
    pub subject: String,
    pub link: String,
    pub member_name: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    // upload date of the stream, not the time the row was inserted
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert a `StreamLink`, the id is assigned by sqlite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStreamLink {
    pub subject: String,
    pub link: String,
    pub member_name: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub upload_date: DateTime<Utc>,
}
