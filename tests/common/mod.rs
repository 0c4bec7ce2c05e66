#![allow(dead_code)]

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use editable_fields::db::{DbPool, establish_connection_pool};
use editable_fields::models::metadata::{
    FieldDefinition as FieldDefinitionRow, RecordType as RecordTypeRow,
};
use editable_fields::schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database in a temporary directory, removed with the test.
pub struct TestDb {
    pool: DbPool,
    _dir: tempfile::TempDir,
}

impl TestDb {
    pub fn new(file_name: &str) -> Self {
        let dir = tempfile::tempdir().expect("Cannot create a temporary directory");
        let path = dir.path().join(file_name);
        let pool = establish_connection_pool(path.to_str().expect("Database path is not UTF-8"))
            .expect("Cannot create a connection pool");
        let mut conn = pool.get().expect("Cannot get a connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Cannot run migrations");
        drop(conn);
        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

/// Inserts a record type row; `versioned` also opts it into revisions on
/// every save.
pub fn seed_record_type(pool: &DbPool, name: &str, label: &str, versioned: bool) {
    let row = RecordTypeRow {
        name: name.to_string(),
        label: label.to_string(),
        versioned,
        new_revision_by_default: versioned,
    };
    let mut conn = pool.get().expect("Cannot get a connection");
    diesel::insert_into(schema::record_types::table)
        .values(&row)
        .execute(&mut conn)
        .expect("Cannot seed a record type");
}

/// Inserts a field definition row.
pub fn seed_field(
    pool: &DbPool,
    record_type: &str,
    name: &str,
    label: &str,
    kind: &str,
    required: bool,
    max_length: Option<i32>,
    weight: i32,
) {
    let row = FieldDefinitionRow {
        record_type: record_type.to_string(),
        name: name.to_string(),
        label: label.to_string(),
        kind: kind.to_string(),
        required,
        max_length,
        protected: false,
        weight,
    };
    let mut conn = pool.get().expect("Cannot get a connection");
    diesel::insert_into(schema::field_definitions::table)
        .values(&row)
        .execute(&mut conn)
        .expect("Cannot seed a field definition");
}
