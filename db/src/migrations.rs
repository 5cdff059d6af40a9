use super::queries;
use log::{info, trace};

use rusqlite::{Connection, Result};

macro_rules! migration {
    ( $n:literal, $( $x:literal ),* ) => {
        paste::item! {
            fn [< migration_$n >] (conn: &Connection) -> Result<()> {
                trace!("running migration {}", $n);

                $(
                    conn.execute($x, [])?;
                )*
                queries::set_version(conn, $n)?;
                trace!("finished migration {}", $n);
                Ok(())
            }
        }
    };
}

migration![
    1,
    "CREATE TABLE stream_link (
        id INTEGER PRIMARY KEY,
        subject TEXT NOT NULL,
        link TEXT NOT NULL UNIQUE,
        member_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        thumbnail_url TEXT DEFAULT NULL,
        created_at NUMERIC NOT NULL
    );",
    "CREATE INDEX idx_stream_link_subject ON stream_link (subject, created_at);"
];

pub fn migrate(conn: &mut Connection) -> Result<()> {
    // be sure to increment this everytime a new migration is added
    const FINAL_VER: u32 = 1;

    let ver = queries::get_version(conn)?;
    info!("database version is currently: {ver} with target ver {FINAL_VER}");
    if ver == FINAL_VER {
        return Ok(());
    }

    let tx = conn.transaction()?;
    trace!("starting migration transaction");

    if ver < 1 {
        migration_1(&tx)?;
    }

    trace!("commiting migration transaction");
    tx.commit()?;
    info!("migration successful");
    Ok(())
}
