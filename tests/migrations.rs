#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use tempus::db::db::Db;
    use tempus::db::error::DbError;
    use tempus::db::migrations::{get_db_version, needs_migration, Migration, MigrationManager, MIGRATIONS};
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        conn: Connection,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                conn: Connection::open_in_memory().unwrap(),
            }
        }
    }

    const STEP_A: Migration = Migration::new(1, "create_a", "CREATE TABLE a (id INTEGER PRIMARY KEY)");
    const STEP_B: Migration = Migration::new(2, "create_b", "CREATE TABLE b (id INTEGER PRIMARY KEY)");
    const STEP_C: Migration = Migration::new(5, "add_a_note", "ALTER TABLE a ADD COLUMN note TEXT");
    const STEP_BROKEN: Migration = Migration::new(5, "broken", "ALTER TABLE missing ADD COLUMN note TEXT");

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1", [name], |row| {
            row.get::<_, i64>(0)
        })
        .unwrap()
            > 0
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_reads_as_version_zero(ctx: &mut MigrationTestContext) {
        assert_eq!(get_db_version(&ctx.conn), 0);
        assert!(needs_migration(&ctx.conn));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_application_schema_reaches_latest_version(ctx: &mut MigrationTestContext) {
        let manager = MigrationManager::new();
        let applied = manager.run_migrations(&mut ctx.conn).unwrap();

        assert_eq!(applied, MIGRATIONS.len());
        assert_eq!(get_db_version(&ctx.conn), 4);
        assert_eq!(manager.latest_version(), 4);
        assert!(!needs_migration(&ctx.conn));
        assert!(table_exists(&ctx.conn, "projects"));
        assert!(table_exists(&ctx.conn, "time_logs"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_rerun_applies_nothing(ctx: &mut MigrationTestContext) {
        let manager = MigrationManager::new();
        manager.run_migrations(&mut ctx.conn).unwrap();
        let version1 = get_db_version(&ctx.conn);

        let applied = manager.run_migrations(&mut ctx.conn).unwrap();
        let version2 = get_db_version(&ctx.conn);

        assert_eq!(applied, 0);
        assert_eq!(version1, version2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_only_steps_above_stored_version_run(ctx: &mut MigrationTestContext) {
        MigrationManager::with_migrations(vec![STEP_A]).run_migrations(&mut ctx.conn).unwrap();
        assert_eq!(get_db_version(&ctx.conn), 1);

        // Declared out of order; STEP_A must not run again (it would fail)
        let manager = MigrationManager::with_migrations(vec![STEP_C, STEP_A, STEP_B]);
        assert_eq!(manager.pending(1).iter().map(|m| m.version).collect::<Vec<_>>(), vec![2, 5]);

        let applied = manager.run_migrations(&mut ctx.conn).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(get_db_version(&ctx.conn), 5);
        assert!(table_exists(&ctx.conn, "b"));

        let rows: i64 = ctx.conn.query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0)).unwrap();
        assert_eq!(rows, 1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_failed_step_keeps_marker_at_last_success(ctx: &mut MigrationTestContext) {
        let broken = MigrationManager::with_migrations(vec![STEP_A, STEP_B, STEP_BROKEN]);
        let err = broken.run_migrations(&mut ctx.conn).unwrap_err();

        assert!(matches!(err, DbError::Migration { version: 5, name: "broken", .. }));
        assert_eq!(get_db_version(&ctx.conn), 2);
        assert!(table_exists(&ctx.conn, "b"));

        // A retry with the fixed list resumes after step 2
        let fixed = MigrationManager::with_migrations(vec![STEP_A, STEP_B, STEP_C]);
        assert_eq!(fixed.run_migrations(&mut ctx.conn).unwrap(), 1);
        assert_eq!(get_db_version(&ctx.conn), 5);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_empty_list_leaves_version_at_zero(ctx: &mut MigrationTestContext) {
        let manager = MigrationManager::with_migrations(Vec::new());
        assert_eq!(manager.run_migrations(&mut ctx.conn).unwrap(), 0);
        assert_eq!(manager.latest_version(), 0);
        assert_eq!(get_db_version(&ctx.conn), 0);
    }

    #[tokio::test]
    async fn test_store_initialize_is_idempotent() {
        let db = Db::in_memory();
        assert_eq!(db.initialize().await.unwrap(), MIGRATIONS.len());
        assert_eq!(db.initialize().await.unwrap(), 0);
        assert_eq!(db.schema_version().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_store_uses_custom_migration_list() {
        let db = Db::in_memory().with_migrations(MigrationManager::with_migrations(vec![STEP_B, STEP_A]));
        assert_eq!(db.initialize().await.unwrap(), 2);
        assert_eq!(db.schema_version().await.unwrap(), 2);
    }
}
