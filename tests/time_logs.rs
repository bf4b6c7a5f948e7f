#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempus::db::db::Db;
    use tempus::db::error::DbError;
    use tempus::db::time_logs::{NewTimeLog, ProjectTime};
    use tempus::libs::clock::{local_day_bounds, ManualClock};
    use test_context::{test_context, AsyncTestContext};

    const HOUR: i64 = 3_600_000;

    struct TimeLogTestContext {
        db: Db,
        clock: Arc<ManualClock>,
        project: i64,
    }

    impl AsyncTestContext for TimeLogTestContext {
        async fn setup() -> Self {
            let clock = Arc::new(ManualClock::new(1_000));
            let db = Db::in_memory().with_clock(clock.clone());
            db.initialize().await.unwrap();
            let project = db.add_project("Website").await.unwrap();
            TimeLogTestContext { db, clock, project }
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    async fn closed(db: &Db, project_id: i64, start_time: i64, end_time: i64) -> i64 {
        db.create_time_log(NewTimeLog {
            project_id,
            start_time,
            end_time,
        })
        .await
        .unwrap()
        .id
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_start_and_stop_tracking(ctx: &mut TimeLogTestContext) {
        let log_id = ctx.db.start_tracking(ctx.project).await.unwrap();

        let active = ctx.db.get_active_log(ctx.project).await.unwrap().unwrap();
        assert_eq!(active.id, log_id);
        assert_eq!(active.start_time, 1_000);
        assert!(active.is_open());
        assert!(ctx.db.has_open_time_log(ctx.project).await.unwrap());

        ctx.clock.set(26_000);
        ctx.db.stop_tracking(log_id).await.unwrap();

        assert!(ctx.db.get_active_log(ctx.project).await.unwrap().is_none());
        assert!(!ctx.db.has_open_time_log(ctx.project).await.unwrap());
        let log = ctx.db.get_time_log(log_id).await.unwrap().unwrap();
        assert_eq!(log.end_time, Some(26_000));
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_stop_is_silent_for_missing_or_closed_logs(ctx: &mut TimeLogTestContext) {
        ctx.db.stop_tracking(9_999).await.unwrap();

        let log_id = ctx.db.start_tracking(ctx.project).await.unwrap();
        ctx.clock.set(5_000);
        ctx.db.stop_tracking(log_id).await.unwrap();

        // A second stop must not move the recorded end
        ctx.clock.set(90_000);
        ctx.db.stop_tracking(log_id).await.unwrap();
        assert_eq!(ctx.db.get_time_log(log_id).await.unwrap().unwrap().end_time, Some(5_000));
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_second_start_on_running_project_is_rejected(ctx: &mut TimeLogTestContext) {
        let first = ctx.db.start_tracking(ctx.project).await.unwrap();

        let err = ctx.db.start_tracking(ctx.project).await.unwrap_err();
        assert!(matches!(err, DbError::AlreadyTracking { log_id, .. } if log_id == first));
        assert_eq!(ctx.db.get_project_logs(ctx.project).await.unwrap().len(), 1);

        // Other projects are independent
        let other = ctx.db.add_project("Other").await.unwrap();
        ctx.db.start_tracking(other).await.unwrap();
        assert_eq!(ctx.db.get_active_logs().await.unwrap().len(), 2);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_unknown_project_violates_foreign_key(ctx: &mut TimeLogTestContext) {
        let err = ctx.db.start_tracking(12_345).await.unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");

        let err = ctx
            .db
            .create_time_log(NewTimeLog {
                project_id: 12_345,
                start_time: 0,
                end_time: 1,
            })
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_manual_log_is_returned_as_stored(ctx: &mut TimeLogTestContext) {
        let log = ctx
            .db
            .create_time_log(NewTimeLog {
                project_id: ctx.project,
                start_time: 10_000,
                end_time: 70_000,
            })
            .await
            .unwrap();

        assert!(log.id > 0);
        assert_eq!(log.project_id, ctx.project);
        assert_eq!((log.start_time, log.end_time), (10_000, Some(70_000)));
        assert_eq!(ctx.db.get_time_log(log.id).await.unwrap(), Some(log));
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_manual_log_must_not_end_before_it_starts(ctx: &mut TimeLogTestContext) {
        let err = ctx
            .db
            .create_time_log(NewTimeLog {
                project_id: ctx.project,
                start_time: 5_000,
                end_time: 4_000,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidTimeRange { .. }));
        assert!(ctx.db.get_project_logs(ctx.project).await.unwrap().is_empty());
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_manual_log_outside_date_range_is_rejected(ctx: &mut TimeLogTestContext) {
        closed(&ctx.db, ctx.project, 0, 2_000).await;

        let err = ctx
            .db
            .create_time_log(NewTimeLog {
                project_id: ctx.project,
                start_time: i64::MIN / 2 - 10,
                end_time: i64::MAX / 2 + 10,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidTimeRange { .. }));

        // Totals keep reading as integers
        assert_eq!(ctx.db.get_project_logs(ctx.project).await.unwrap().len(), 1);
        assert_eq!(ctx.db.get_project_elapsed_time(ctx.project).await.unwrap(), 2);
        assert_eq!(ctx.db.get_project_time_for_date(ctx.project, day()).await.unwrap(), 0);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_delete_missing_time_log_is_noop(ctx: &mut TimeLogTestContext) {
        let log_id = closed(&ctx.db, ctx.project, 0, 1_000).await;

        ctx.db.delete_time_log(log_id + 100).await.unwrap();
        assert!(ctx.db.get_time_log(log_id).await.unwrap().is_some());
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_delete_time_log(ctx: &mut TimeLogTestContext) {
        let keep = closed(&ctx.db, ctx.project, 0, 1_000).await;
        let drop = closed(&ctx.db, ctx.project, 2_000, 3_000).await;

        ctx.db.delete_time_log(drop).await.unwrap();

        let logs = ctx.db.get_project_logs(ctx.project).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, keep);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_project_logs_newest_first(ctx: &mut TimeLogTestContext) {
        let middle = closed(&ctx.db, ctx.project, 5_000, 6_000).await;
        let oldest = closed(&ctx.db, ctx.project, 1_000, 2_000).await;
        let newest = closed(&ctx.db, ctx.project, 9_000, 9_500).await;

        let ids: Vec<i64> = ctx.db.get_project_logs(ctx.project).await.unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![newest, middle, oldest]);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_elapsed_time_counts_running_log_up_to_now(ctx: &mut TimeLogTestContext) {
        closed(&ctx.db, ctx.project, 1_000, 5_000).await;
        ctx.clock.set(2_000);
        ctx.db.start_tracking(ctx.project).await.unwrap();

        ctx.clock.set(12_000);
        // (5000 - 1000) / 1000 + (12000 - 2000) / 1000
        assert_eq!(ctx.db.get_project_elapsed_time(ctx.project).await.unwrap(), 14);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_elapsed_time_rounds_down_and_defaults_to_zero(ctx: &mut TimeLogTestContext) {
        assert_eq!(ctx.db.get_project_elapsed_time(ctx.project).await.unwrap(), 0);

        closed(&ctx.db, ctx.project, 0, 1_999).await;
        closed(&ctx.db, ctx.project, 10_000, 10_999).await;
        assert_eq!(ctx.db.get_project_elapsed_time(ctx.project).await.unwrap(), 1);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_time_for_date_only_counts_logs_started_that_day(ctx: &mut TimeLogTestContext) {
        let (start, end) = local_day_bounds(day());

        closed(&ctx.db, ctx.project, start, start + HOUR).await;
        closed(&ctx.db, ctx.project, end - 30_000, end + HOUR).await; // starts late, ends next day
        closed(&ctx.db, ctx.project, start - HOUR, start - 1).await; // previous day
        closed(&ctx.db, ctx.project, end + 1, end + 1 + HOUR).await; // next day

        let seconds = ctx.db.get_project_time_for_date(ctx.project, day()).await.unwrap();
        assert_eq!(seconds, 3_600 + 3_630);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_time_for_date_includes_both_day_edges(ctx: &mut TimeLogTestContext) {
        let (start, end) = local_day_bounds(day());

        closed(&ctx.db, ctx.project, start, start + 2_000).await;
        closed(&ctx.db, ctx.project, end, end + 5_000).await;

        assert_eq!(ctx.db.get_project_time_for_date(ctx.project, day()).await.unwrap(), 7);
        let times = ctx.db.get_project_times_for_date(day()).await.unwrap();
        assert_eq!(times, vec![ProjectTime { project_id: ctx.project, seconds: 7 }]);

        // The log starting on the last millisecond belongs to this day only
        let next = day().succ_opt().unwrap();
        assert_eq!(ctx.db.get_project_time_for_date(ctx.project, next).await.unwrap(), 0);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_time_for_date_includes_running_log(ctx: &mut TimeLogTestContext) {
        let (start, _) = local_day_bounds(day());
        ctx.clock.set(start + HOUR);
        ctx.db.start_tracking(ctx.project).await.unwrap();

        ctx.clock.set(start + 3 * HOUR);
        assert_eq!(ctx.db.get_project_time_for_date(ctx.project, day()).await.unwrap(), 7_200);
    }

    #[test_context(TimeLogTestContext)]
    #[tokio::test]
    async fn test_times_for_date_grouped_by_project(ctx: &mut TimeLogTestContext) {
        let (start, _) = local_day_bounds(day());
        let other = ctx.db.add_project("Other").await.unwrap();
        let idle = ctx.db.add_project("Idle").await.unwrap();

        closed(&ctx.db, other, start + HOUR, start + 2 * HOUR).await;
        closed(&ctx.db, ctx.project, start, start + 60_000).await;
        closed(&ctx.db, ctx.project, start + 3 * HOUR, start + 3 * HOUR + 30_000).await;
        closed(&ctx.db, idle, start - 2 * HOUR, start - HOUR).await;

        let times = ctx.db.get_project_times_for_date(day()).await.unwrap();
        assert_eq!(
            times,
            vec![
                ProjectTime {
                    project_id: ctx.project,
                    seconds: 90
                },
                ProjectTime {
                    project_id: other,
                    seconds: 3_600
                },
            ]
        );

        let empty = ctx.db.get_project_times_for_date(day().succ_opt().unwrap()).await.unwrap();
        assert!(empty.is_empty());
    }
}
