use crate::structs::NewStreamLink;
use crate::ReadOnlyDb;

use log::debug;
use rusqlite::Result;

pub trait WriteableDb: ReadOnlyDb {
    /// Inserts a new link. The subject is lowercased here so callers can't
    /// store a row the subject lookup would never find.
    #[inline]
    fn create_streamlink(&self, new: &NewStreamLink) -> Result<i64> {
        debug!(
            "Inserting streamlink {:?} for subject {:?}",
            new.link, new.subject
        );

        let conn = self.get_connection();
        conn.execute(
            "INSERT INTO stream_link
                (subject, link, member_name, description, thumbnail_url, created_at)
            VALUES ( lower(?1), ?2, ?3, ?4, ?5, ?6 )",
            (
                &new.subject,
                &new.link,
                &new.member_name,
                &new.description,
                &new.thumbnail_url,
                new.upload_date,
            ),
        )?;

        Ok(conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use crate::structs::NewStreamLink;
    use crate::{ReadOnlyDb, WriteableConn, WriteableDb};

    use chrono::{TimeZone, Utc};
    use rusqlite::Result;

    fn new_link(subject: &str, link: &str, day: u32) -> NewStreamLink {
        NewStreamLink {
            subject: subject.to_string(),
            link: link.to_string(),
            member_name: "Tester".to_string(),
            description: "lecture".to_string(),
            thumbnail_url: None,
            upload_date: Utc.with_ymd_and_hms(2023, 5, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_create_and_fetch() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        let mut link = new_link("IZP", "https://youtu.be/a", 1);
        link.thumbnail_url = Some("https://img/a.jpg".to_string());
        db.create_streamlink(&link)?;

        let links = db.get_streamlinks_of_subject("izp")?;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].subject, "izp");
        assert_eq!(links[0].link, "https://youtu.be/a");
        assert_eq!(links[0].thumbnail_url.as_deref(), Some("https://img/a.jpg"));
        assert_eq!(links[0].created_at, link.upload_date);
        Ok(())
    }

    #[test]
    fn test_subject_lookup_ignores_case() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/a", 1))?;

        assert_eq!(db.get_streamlinks_of_subject("IAS")?.len(), 1);
        assert_eq!(db.count_streamlinks_of_subject("Ias")?, 1);
        assert_eq!(db.count_streamlinks_of_subject("other")?, 0);
        Ok(())
    }

    #[test]
    fn test_links_ordered_by_upload_date() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/c", 20))?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/a", 1))?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/b", 10))?;

        let links: Vec<String> = db
            .get_streamlinks_of_subject("ias")?
            .into_iter()
            .map(|l| l.link)
            .collect();
        assert_eq!(
            links,
            vec![
                "https://youtu.be/a",
                "https://youtu.be/b",
                "https://youtu.be/c"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_exists_link() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        assert!(!db.exists_link("https://youtu.be/a")?);
        db.create_streamlink(&new_link("ias", "https://youtu.be/a", 1))?;
        assert!(db.exists_link("https://youtu.be/a")?);
        assert!(!db.exists_link("https://youtu.be/b")?);
        Ok(())
    }

    #[test]
    fn test_streamlink_at_position() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/c", 20))?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/a", 1))?;
        db.create_streamlink(&new_link("izp", "https://youtu.be/x", 5))?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/b", 10))?;

        let at = |index| -> Result<Option<String>> {
            Ok(db
                .get_streamlink_of_subject_at("IAS", index)?
                .map(|l| l.link))
        };
        assert_eq!(at(0)?.as_deref(), Some("https://youtu.be/a"));
        assert_eq!(at(1)?.as_deref(), Some("https://youtu.be/b"));
        assert_eq!(at(2)?.as_deref(), Some("https://youtu.be/c"));
        assert_eq!(at(3)?, None);
        Ok(())
    }

    #[test]
    fn test_duplicate_link_rejected() -> Result<()> {
        let db = WriteableConn::in_memory()?;
        db.create_streamlink(&new_link("ias", "https://youtu.be/a", 1))?;
        assert!(db
            .create_streamlink(&new_link("izp", "https://youtu.be/a", 2))
            .is_err());
        assert_eq!(db.count_streamlinks_of_subject("ias")?, 1);
        assert_eq!(db.count_streamlinks_of_subject("izp")?, 0);
        Ok(())
    }
}
