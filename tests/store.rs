#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tempus::db::db::{Db, DbLocation};
    use tempus::db::error::DbError;
    use tempus::db::migrations::MIGRATIONS;
    use tempus::db::time_logs::NewTimeLog;
    use test_context::{test_context, AsyncTestContext};

    struct StoreTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl AsyncTestContext for StoreTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("data").join("projects.db"));
            StoreTestContext { _temp_dir: temp_dir, db }
        }
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_operations_before_initialize_fail(ctx: &mut StoreTestContext) {
        assert!(!ctx.db.is_initialized());
        assert!(matches!(ctx.db.get_projects(true).await, Err(DbError::Uninitialized)));
        assert!(matches!(ctx.db.add_project("Early").await, Err(DbError::Uninitialized)));
        assert!(matches!(ctx.db.schema_version().await, Err(DbError::Uninitialized)));
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_initialize_creates_file_and_parent_dir(ctx: &mut StoreTestContext) {
        let DbLocation::File(path) = ctx.db.location().clone() else {
            panic!("expected a file location");
        };
        assert!(!path.exists());

        assert_eq!(ctx.db.initialize().await.unwrap(), MIGRATIONS.len());
        assert!(ctx.db.is_initialized());
        assert!(path.exists());
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_data_survives_reopen(ctx: &mut StoreTestContext) {
        ctx.db.initialize().await.unwrap();
        let id = ctx.db.add_project("Website").await.unwrap();
        ctx.db
            .create_time_log(NewTimeLog {
                project_id: id,
                start_time: 0,
                end_time: 3_000,
            })
            .await
            .unwrap();
        ctx.db.close();
        assert!(matches!(ctx.db.get_project(id).await, Err(DbError::Uninitialized)));

        let DbLocation::File(path) = ctx.db.location().clone() else {
            panic!("expected a file location");
        };
        let reopened = Db::open(path);
        assert_eq!(reopened.initialize().await.unwrap(), 0);
        assert_eq!(reopened.schema_version().await.unwrap(), 4);
        assert_eq!(reopened.get_project(id).await.unwrap().unwrap().name, "Website");
        assert_eq!(reopened.get_project_elapsed_time(id).await.unwrap(), 3);
    }

    #[test_context(StoreTestContext)]
    #[tokio::test]
    async fn test_clones_share_the_connection(ctx: &mut StoreTestContext) {
        let clone = ctx.db.clone();
        ctx.db.initialize().await.unwrap();
        assert!(clone.is_initialized());

        let id = clone.add_project("Shared").await.unwrap();
        assert!(ctx.db.get_project(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_serialized() {
        let db = Db::in_memory();
        db.initialize().await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move { db.add_project(&format!("Project {i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(db.get_projects(false).await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_in_memory_handles_are_private() {
        let first = Db::in_memory();
        let second = Db::in_memory();
        first.initialize().await.unwrap();
        second.initialize().await.unwrap();

        first.add_project("Only here").await.unwrap();
        assert!(second.get_projects(true).await.unwrap().is_empty());
    }
}
