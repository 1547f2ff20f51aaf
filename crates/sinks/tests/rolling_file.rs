//! End-to-end tests: runner, channel, sink and rotation together

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rollover_metrics::SinkMetricsProvider;
use rollover_sinks::path_manager::{NamingOptions, PathManagerKind, RollingPathManager};
use rollover_sinks::rolling_file::{BackoffPolicy, RollingFileConfig, RollingFileSink, SinkRunner};
use rollover_sinks::serializer::{SerializerKind, SerializerOptions};
use rollover_sinks::{Event, MemoryChannel};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy {
        increment: Duration::from_millis(5),
        max: Duration::from_millis(20),
    }
}

fn naming() -> NamingOptions {
    NamingOptions {
        prefix: "events-".into(),
        extension: "log".into(),
        ..Default::default()
    }
}

fn sorted_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

async fn wait_until_empty(channel: &MemoryChannel) {
    for _ in 0..200 {
        if channel.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("channel was not drained");
}

#[tokio::test]
async fn test_runner_drains_and_finalizes_on_cancel() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested").join("out");
    let channel = Arc::new(MemoryChannel::new("input"));
    let sink = RollingFileSink::new(
        "files",
        RollingFileConfig::new(&out)
            .with_batch_size(4)
            .with_roll_interval(None),
        channel.clone(),
        Box::new(RollingPathManager::with_series_timestamp(naming(), 42).unwrap()),
        SerializerKind::Text.factory(SerializerOptions::default()),
    );
    let handle = sink.metrics_handle();

    for i in 0..10 {
        channel.put(Event::from(format!("event {i}"))).unwrap();
    }

    let cancel = CancellationToken::new();
    let task = tokio::spawn(SinkRunner::new(sink, fast_backoff()).run(cancel.clone()));

    wait_until_empty(&channel).await;
    cancel.cancel();
    let snapshot = task.await.unwrap().unwrap();

    assert_eq!(snapshot.event_drain_success, 10);
    assert_eq!(snapshot.connection_created, 1);
    assert_eq!(snapshot.connection_closed, 1);
    assert_eq!(handle.snapshot(), snapshot);

    assert_eq!(sorted_files(&out), vec!["events-42-1.log"]);
    let content = std::fs::read_to_string(out.join("events-42-1.log")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "event 0");
    assert_eq!(lines[9], "event 9");
}

#[tokio::test]
async fn test_runner_rotates_on_interval() {
    let dir = TempDir::new().unwrap();
    let channel = Arc::new(MemoryChannel::new("input"));
    let sink = RollingFileSink::new(
        "files",
        RollingFileConfig::new(dir.path()).with_roll_interval(Some(Duration::from_millis(60))),
        channel.clone(),
        Box::new(RollingPathManager::with_series_timestamp(naming(), 7).unwrap()),
        SerializerKind::Text.factory(SerializerOptions::default()),
    );

    let cancel = CancellationToken::new();
    let task = tokio::spawn(SinkRunner::new(sink, fast_backoff()).run(cancel.clone()));

    channel.put(Event::from("first")).unwrap();
    wait_until_empty(&channel).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    channel.put(Event::from("second")).unwrap();
    wait_until_empty(&channel).await;

    cancel.cancel();
    let snapshot = task.await.unwrap().unwrap();
    assert_eq!(snapshot.event_drain_success, 2);

    // no in-use files survive a clean stop
    let files = sorted_files(dir.path());
    assert!(files.len() >= 2);
    assert!(files.iter().all(|name| !name.ends_with(".tmp")));

    let contents: Vec<String> = files
        .iter()
        .map(|name| std::fs::read_to_string(dir.path().join(name)).unwrap())
        .filter(|content| !content.is_empty())
        .collect();
    assert_eq!(contents, vec!["first\n", "second\n"]);
}

#[tokio::test]
async fn test_runner_plain_naming_with_json() {
    let dir = TempDir::new().unwrap();
    let channel = Arc::new(MemoryChannel::new("input"));
    let sink = RollingFileSink::new(
        "files",
        RollingFileConfig::new(dir.path()).with_roll_interval(None),
        channel.clone(),
        PathManagerKind::Plain.build(naming()).unwrap(),
        SerializerKind::Json.factory(SerializerOptions::default()),
    );

    channel
        .put(Event::new("hello").with_header("source", "test"))
        .unwrap();

    let cancel = CancellationToken::new();
    let task = tokio::spawn(SinkRunner::new(sink, fast_backoff()).run(cancel.clone()));
    wait_until_empty(&channel).await;
    cancel.cancel();
    task.await.unwrap().unwrap();

    let files = sorted_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("events-"));
    assert!(files[0].ends_with("-1.log"));

    let line = std::fs::read_to_string(dir.path().join(&files[0])).unwrap();
    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["body"], "hello");
    assert_eq!(value["headers"]["source"], "test");
}

#[tokio::test]
async fn test_runner_start_failure() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let sink = RollingFileSink::new(
        "files",
        RollingFileConfig::new(blocker.join("out")),
        Arc::new(MemoryChannel::new("input")),
        PathManagerKind::Rolling.build(naming()).unwrap(),
        SerializerKind::Text.factory(SerializerOptions::default()),
    );

    let result = SinkRunner::new(sink, fast_backoff())
        .run(CancellationToken::new())
        .await;
    assert!(result.is_err());
}
