use super::formatter::{format_seconds, format_timestamp};
use crate::db::projects::Project;
use crate::db::time_logs::TimeLog;
use prettytable::{row, Table};
use std::collections::HashMap;

pub struct View {}

impl View {
    /// Projects with their total tracked time (`totals` keyed by project id).
    pub fn projects(projects: &[Project], totals: &HashMap<i64, i64>, active: Option<i64>) {
        let mut table = Table::new();

        table.add_row(row!["", "ID", "NAME", "STATUS", "TOTAL"]);
        for project in projects {
            let marker = if active == Some(project.id) { "*" } else { "" };
            let status = if project.archived { "archived" } else { "active" };
            table.add_row(row![
                marker,
                project.id,
                project.name,
                status,
                format_seconds(totals.get(&project.id).copied().unwrap_or(0))
            ]);
        }
        table.printstd();
    }

    pub fn logs(logs: &[TimeLog], now: i64) {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "DURATION"]);
        for log in logs {
            let end = log.end_time.map(format_timestamp).unwrap_or_else(|| "running".to_string());
            table.add_row(row![
                log.id,
                format_timestamp(log.start_time),
                end,
                format_seconds(log.elapsed_seconds(now))
            ]);
        }
        table.printstd();
    }

    /// Per-project totals for one day, with a grand total row.
    pub fn day(rows: &[(String, i64)]) {
        let mut table = Table::new();

        table.add_row(row!["PROJECT", "TIME"]);
        for (name, seconds) in rows {
            table.add_row(row![name, format_seconds(*seconds)]);
        }
        let total: i64 = rows.iter().map(|(_, seconds)| seconds).sum();
        table.add_row(row!["TOTAL", format_seconds(total)]);
        table.printstd();
    }
}
