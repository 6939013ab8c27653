//! SQLite schema for the library database.

use anyhow::Result;
use rusqlite::{params, Connection};

/// Offset applied to PRAGMA user_version, so a fresh database (version 0)
/// is distinguishable from schema version 0.
pub const BASE_DB_VERSION: usize = 52000;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when
            // optional field assignments are passed to the macro
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                is_unique: false,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub is_unique: bool,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub unique_constraints: &'static [&'static [&'static str]],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let mut create_sql = format!("CREATE TABLE {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!(
                "{} {}",
                column.name,
                match column.sql_type {
                    SqlType::Text => "TEXT",
                    SqlType::Integer => "INTEGER",
                }
            ));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if column.is_unique {
                create_sql.push_str(" UNIQUE");
            }
        }
        for unique_constraint in self.unique_constraints {
            create_sql.push_str(&format!(", UNIQUE ({})", unique_constraint.join(", ")));
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.execute(
            &format!("PRAGMA user_version = {}", BASE_DB_VERSION + self.version),
            [],
        )?;
        Ok(())
    }
}

/// Corpus iteration order is the id order of this table.
const SONG_TABLE: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        // JSON: either a string or an array of line strings
        sqlite_column!("lyrics", &SqlType::Text, non_null = true),
        // JSON array of genre tags
        sqlite_column!("genres", &SqlType::Text, non_null = true),
        sqlite_column!("release_year", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Text),
        sqlite_column!("media_url", &SqlType::Text),
    ],
    unique_constraints: &[],
    indices: &[("idx_song_title", "title")],
};

const LIKED_SONG_TABLE: Table = Table {
    name: "liked_song",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("user_id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
    ],
    unique_constraints: &[&["user_id", "title"]],
    indices: &[("idx_liked_song_user_id", "user_id")],
};

/// Users are rows here even before their first like, so a registered user
/// with an empty liked list is not mistaken for an unknown one.
const APP_USER_TABLE: Table = Table {
    name: "app_user",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            is_unique = true
        ),
        sqlite_column!("user_id", &SqlType::Text, non_null = true, is_unique = true),
    ],
    unique_constraints: &[],
    indices: &[],
};

pub const LIBRARY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONG_TABLE, LIKED_SONG_TABLE, APP_USER_TABLE],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_latest_schema_on_blank_db() {
        let conn = Connection::open_in_memory().unwrap();
        LIBRARY_VERSIONED_SCHEMAS
            .last()
            .unwrap()
            .create(&conn)
            .unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(tables, vec!["app_user", "liked_song", "song"]);

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version as usize, BASE_DB_VERSION);
    }

    #[test]
    fn liked_song_rejects_duplicate_user_title_pair() {
        let conn = Connection::open_in_memory().unwrap();
        LIBRARY_VERSIONED_SCHEMAS
            .last()
            .unwrap()
            .create(&conn)
            .unwrap();

        conn.execute(
            "INSERT INTO liked_song (user_id, title) VALUES ('nina', 'Vento')",
            [],
        )
        .unwrap();
        let second = conn.execute(
            "INSERT INTO liked_song (user_id, title) VALUES ('nina', 'Vento')",
            [],
        );
        assert!(second.is_err());
    }
}
