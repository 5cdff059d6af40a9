use crate::connections::GetConnectionImmutable;
use crate::queries::{self, STREAM_LINK_COLUMNS};
use crate::structs::StreamLink;

use rusqlite::{OptionalExtension, Result};

pub trait ReadOnlyDb: GetConnectionImmutable {
    /// All links of a subject, oldest upload first. Pagination relies on
    /// this order being stable between calls.
    #[inline]
    fn get_streamlinks_of_subject(&self, subject: &str) -> Result<Vec<StreamLink>> {
        let mut stmt = self.get_connection().prepare(&format!(
            "SELECT {STREAM_LINK_COLUMNS}
            FROM stream_link
            WHERE subject = lower(?1)
            ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map([subject], queries::stream_link_from_row)?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row?)
        }
        Ok(links)
    }

    #[inline]
    fn count_streamlinks_of_subject(&self, subject: &str) -> Result<usize> {
        let count: i64 = self.get_connection().query_row(
            "SELECT COUNT(*) FROM stream_link WHERE subject = lower(?1)",
            [subject],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    #[inline]
    fn exists_link(&self, link: &str) -> Result<bool> {
        self.get_connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM stream_link WHERE link = (?1))",
            [link],
            |row| row.get(0),
        )
    }

    /// The link at `index` (0 based) of the ordering used by
    /// `get_streamlinks_of_subject`.
    #[inline]
    fn get_streamlink_of_subject_at(
        &self,
        subject: &str,
        index: usize,
    ) -> Result<Option<StreamLink>> {
        self.get_connection()
            .query_row(
                &format!(
                    "SELECT {STREAM_LINK_COLUMNS}
                    FROM stream_link
                    WHERE subject = lower(?1)
                    ORDER BY created_at, id
                    LIMIT 1 OFFSET ?2"
                ),
                (subject, index as i64),
                queries::stream_link_from_row,
            )
            .optional()
    }
}
