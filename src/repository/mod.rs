use std::path::Path;

use rusqlite::{Connection, OpenFlags, Result};

pub mod metadata_repository;

/// the schema version created by `init.sql`
pub const SCHEMA_VERSION: u64 = 1;

/// opens a connection to the sqlite database at `location`, creating the file if needed
pub fn open_connection(location: &str) -> Result<Connection> {
    let con = Connection::open_with_flags(Path::new(location), OpenFlags::default())?;
    con.pragma_update(None, "foreign_keys", true)?;
    Ok(con)
}

/// runs init.sql on the database
fn create_db(con: &Connection) -> Result<()> {
    let sql = include_str!("../assets/init.sql");
    con.execute_batch(sql)
}

/// handles checking if the database exists and is at a version this build understands.
/// If the tables haven't been created yet, they are created here
pub fn initialize_db(con: &Connection) -> Result<()> {
    let table_version = match metadata_repository::get_version(con) {
        Ok(value) => value.parse::<u64>().unwrap_or(0),
        Err(_) => {
            log::info!("No schema found, creating tables...");
            create_db(con)?;
            SCHEMA_VERSION
        }
    };
    if table_version > SCHEMA_VERSION {
        log::error!(
            "Database schema version {table_version} is newer than the supported version {SCHEMA_VERSION}"
        );
        return Err(rusqlite::Error::InvalidQuery);
    }
    if table_version < SCHEMA_VERSION {
        metadata_repository::set_version(SCHEMA_VERSION, con)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::repository::{initialize_db, metadata_repository, SCHEMA_VERSION};
    use crate::test::{cleanup, init_db_folder, open_test_connection};

    #[test]
    fn initialize_db_creates_schema_once() {
        init_db_folder();
        let con = open_test_connection();
        // second call must not try to re-create the tables
        initialize_db(&con).unwrap();
        let version = metadata_repository::get_version(&con).unwrap();
        con.close().unwrap();
        assert_eq!(SCHEMA_VERSION.to_string(), version);
        cleanup();
    }

    #[test]
    fn initialize_db_refuses_newer_schema() {
        init_db_folder();
        let con = open_test_connection();
        metadata_repository::set_version(SCHEMA_VERSION + 1, &con).unwrap();
        let res = initialize_db(&con);
        con.close().unwrap();
        assert!(res.is_err());
        cleanup();
    }
}
