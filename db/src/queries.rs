use crate::structs::StreamLink;
use rusqlite::{Connection, Result, Row};

#[inline(always)]
pub fn get_version(conn: &Connection) -> Result<u32> {
    conn.query_row("SELECT user_version FROM pragma_user_version;", [], |row| {
        row.get(0)
    })
}

#[inline(always)]
pub fn set_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", &version)
}

/// Column order every `stream_link` select is expected to use.
pub const STREAM_LINK_COLUMNS: &str =
    "id, subject, link, member_name, description, thumbnail_url, created_at";

#[inline(always)]
pub fn stream_link_from_row(row: &Row<'_>) -> Result<StreamLink> {
    Ok(StreamLink {
        id: row.get(0)?,
        subject: row.get(1)?,
        link: row.get(2)?,
        member_name: row.get(3)?,
        description: row.get(4)?,
        thumbnail_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}
