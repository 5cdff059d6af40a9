mod migrations;
mod queries;
mod read_only_db;
pub mod structs;
mod writeable_db;

pub use read_only_db::ReadOnlyDb;
pub use writeable_db::WriteableDb;

use lazy_static::lazy_static;
use log::debug;
use rusqlite::{Connection, OpenFlags, Result};
use std::env;

pub(crate) mod connections {
    use rusqlite::Connection;

    pub trait GetConnectionImmutable {
        fn get_connection(&self) -> &Connection;
    }
}

pub struct ReadOnlyConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for ReadOnlyConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReadOnlyDb for ReadOnlyConn {}

pub struct WriteableConn {
    conn: Connection,
}

impl connections::GetConnectionImmutable for WriteableConn {
    #[inline]
    fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReadOnlyDb for WriteableConn {}

impl WriteableDb for WriteableConn {}

const DEFAULT_DB_PATH: &str = "./streamlinks.db3";

lazy_static! {
    static ref DB_PATH: String = env::var("STREAMLINKS_DB").unwrap_or_else(|_| {
        debug!("STREAMLINKS_DB not set, using {DEFAULT_DB_PATH}");
        String::from(DEFAULT_DB_PATH)
    });
}

/// Location of the sqlite file, `STREAMLINKS_DB` or `./streamlinks.db3`.
pub fn db_path() -> &'static str {
    DB_PATH.as_str()
}

#[inline(always)]
fn open_database(read_only: bool) -> Result<Connection> {
    if read_only {
        Connection::open_with_flags(db_path(), OpenFlags::SQLITE_OPEN_READ_ONLY)
    } else {
        Connection::open(db_path())
    }
}

impl ReadOnlyConn {
    #[inline(always)]
    fn new() -> Result<ReadOnlyConn> {
        Ok(ReadOnlyConn {
            conn: open_database(true)?,
        })
    }
}

impl WriteableConn {
    #[inline(always)]
    fn new() -> Result<WriteableConn> {
        Ok(WriteableConn {
            conn: open_database(false)?,
        })
    }

    /// A fresh, fully migrated database that lives only as long as the
    /// returned connection. Used by tests in this crate and downstream.
    pub fn in_memory() -> Result<WriteableConn> {
        let mut conn = Connection::open_in_memory()?;
        migrations::migrate(&mut conn)?;
        Ok(WriteableConn { conn })
    }
}

#[inline]
pub fn migrate() -> Result<()> {
    migrations::migrate(&mut open_database(false)?)
}

#[inline]
pub fn writable_db_call<F, T>(f: F) -> Result<T>
where
    F: FnOnce(WriteableConn) -> Result<T>,
{
    f(WriteableConn::new()?)
}

#[inline]
pub fn read_only_db_call<F, T>(f: F) -> Result<T>
where
    F: FnOnce(ReadOnlyConn) -> Result<T>,
{
    f(ReadOnlyConn::new()?)
}
