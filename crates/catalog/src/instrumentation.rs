//! Per-statement observation for a `sea-orm` connection.
//!
//! Observers are attached to the connection itself through
//! `DatabaseConnection::set_metric_callback`, so every statement is seen,
//! including those issued inside transactions, regardless of which store
//! runs it.

use std::sync::Arc;
use std::time::Duration;

use common::metrics::{DB_QUERIES_TOTAL, DB_QUERY_DURATION};
use sea_orm::DatabaseConnection;
use tracing::warn;

/// One executed statement.
#[derive(Debug, Clone, Copy)]
pub struct QueryEvent<'a> {
    pub sql: &'a str,
    pub elapsed: Duration,
    pub failed: bool,
}

pub trait QueryObserver: Send + Sync + 'static {
    fn on_query(&self, event: &QueryEvent<'_>);
}

/// Install `observer` on `db`. Replaces any previously attached observer;
/// use [`ObserverChain`] to combine several.
pub fn attach(db: &mut DatabaseConnection, observer: Arc<dyn QueryObserver>) {
    db.set_metric_callback(move |info| {
        observer.on_query(&QueryEvent {
            sql: &info.statement.sql,
            elapsed: info.elapsed,
            failed: info.failed,
        })
    });
}

/// Records `db_queries_total` and `db_query_duration_seconds`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusObserver;

impl QueryObserver for PrometheusObserver {
    fn on_query(&self, event: &QueryEvent<'_>) {
        let (operation, table) = parse_query(event.sql);
        let status = if event.failed { "error" } else { "success" };
        DB_QUERIES_TOTAL.with_label_values(&[operation.as_str(), table.as_str(), status]).inc();
        DB_QUERY_DURATION
            .with_label_values(&[operation.as_str(), table.as_str()])
            .observe(event.elapsed.as_secs_f64());
    }
}

/// Logs statements slower than `threshold` (and all failed ones) at WARN.
#[derive(Debug, Clone, Copy)]
pub struct SlowQueryLogger {
    threshold: Duration,
}

impl SlowQueryLogger {
    pub fn new(threshold: Duration) -> Self { Self { threshold } }
}

impl QueryObserver for SlowQueryLogger {
    fn on_query(&self, event: &QueryEvent<'_>) {
        if event.failed {
            let (operation, table) = parse_query(event.sql);
            warn!(%operation, %table, elapsed_ms = event.elapsed.as_millis() as u64, "query failed");
        } else if event.elapsed >= self.threshold {
            let (operation, table) = parse_query(event.sql);
            warn!(%operation, %table, elapsed_ms = event.elapsed.as_millis() as u64, sql = event.sql, "slow query");
        }
    }
}

/// Fans an event out to several observers in order.
#[derive(Default, Clone)]
pub struct ObserverChain {
    observers: Vec<Arc<dyn QueryObserver>>,
}

impl ObserverChain {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, observer: Arc<dyn QueryObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize { self.observers.len() }

    pub fn is_empty(&self) -> bool { self.observers.is_empty() }
}

impl QueryObserver for ObserverChain {
    fn on_query(&self, event: &QueryEvent<'_>) {
        for o in &self.observers {
            o.on_query(event);
        }
    }
}

/// Classify a statement into `(operation, table)`, both lowercase.
/// Unknown shapes yield `"other"` / `"unknown"`.
pub fn parse_query(sql: &str) -> (String, String) {
    let mut words = sql.split_whitespace();
    let Some(first) = words.next() else {
        return ("other".into(), "unknown".into());
    };
    let operation = first.to_ascii_lowercase();
    let table = match operation.as_str() {
        "select" | "delete" => table_after(sql, "from"),
        "insert" => table_after(sql, "into"),
        "update" => words.next().map(clean_table),
        "begin" | "commit" | "rollback" | "savepoint" | "release" => Some("none".to_string()),
        _ => return ("other".into(), "unknown".into()),
    };
    (operation, table.unwrap_or_else(|| "unknown".into()))
}

fn table_after(sql: &str, keyword: &str) -> Option<String> {
    sql.split_whitespace()
        .skip_while(|w| !w.eq_ignore_ascii_case(keyword))
        .nth(1)
        .map(clean_table)
}

fn clean_table(raw: &str) -> String {
    let raw = raw.split('(').next().unwrap_or(raw);
    let unqualified = raw.rsplit('.').next().unwrap_or(raw);
    unqualified
        .trim_matches(|c: char| c == '"' || c == '`' || c == ',' || c == ';')
        .to_ascii_lowercase()
}
