//! Schema migrations. The applied version lives in SQLite's `user_version`
//! pragma; migration `n` in [`MIGRATIONS`] moves the schema to version `n + 1`.

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

const MIGRATIONS: &[(&str, &str)] = &[("initial", include_str!("migrations/001_initial.sql"))];

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn)?;
    if current > MIGRATIONS.len() {
        bail!(
            "Database schema version {} is newer than this build supports ({})",
            current,
            MIGRATIONS.len()
        );
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(current) {
        let version = index + 1;
        tracing::info!("Applying migration {:03}: {}", version, name);

        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .with_context(|| format!("Failed to apply migration {:03}: {}", version, name))?;
        tx.pragma_update(None, "user_version", version as i64)?;
        tx.commit()?;
    }

    Ok(())
}

fn schema_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_count(conn: &Connection) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM pragma_table_info('journal_entries')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn fresh_db_gets_the_full_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(column_count(&conn), 11);
    }

    #[test]
    fn rerunning_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len());
    }

    #[test]
    fn refuses_a_newer_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", 99i64).unwrap();

        let err = run_migrations(&mut conn).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }
}
