use anyhow::Result;
use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use onthisday::{
    BlueskyPublisher, BotEngine, BotError, ConsolePublisher, DailyPipeline, LocalCalendar,
    Settings,
};
use std::time::Duration;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(5);

const CALENDAR: &str = "date,event,year\n\
01-01,New Year's Day\n\
02-10,Fire extinguisher patented,1863\n\
02-10,\"Second, quoted event\",\n\
06-21,Summer Solstice\n";

fn write_calendar(dir: &TempDir) -> Result<String> {
    let path = dir.path().join("events.csv");
    std::fs::write(&path, CALENDAR)?;
    Ok(path.to_string_lossy().into_owned())
}

fn settings(calendar_path: String, year: i32, month: u32, day: u32) -> Settings {
    Settings {
        calendar_path,
        reference_instant: Some(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()),
        ..Settings::default()
    }
}

fn mock_session(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/xrpc/com.atproto.server.createSession")
            .json_body(serde_json::json!({
                "identifier": "history.bsky.social",
                "password": "app-pass"
            }));
        then.status(200).json_body(serde_json::json!({
            "accessJwt": "jwt-token",
            "refreshJwt": "refresh-token",
            "handle": "history.bsky.social",
            "did": "did:plc:history"
        }));
    })
}

#[tokio::test]
async fn test_publishes_each_event_of_the_day() -> Result<()> {
    let dir = TempDir::new()?;
    let calendar = write_calendar(&dir)?;

    let server = MockServer::start();
    let session = mock_session(&server);
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/xrpc/com.atproto.repo.createRecord")
            .header("authorization", "Bearer jwt-token")
            .body_contains("\"repo\":\"did:plc:history\"")
            .body_contains("app.bsky.richtext.facet#tag")
            .body_contains("#OnThisDay");
        then.status(200).json_body(serde_json::json!({
            "uri": "at://did:plc:history/app.bsky.feed.post/3k",
            "cid": "bafy"
        }));
    });

    let publisher = BlueskyPublisher::new(
        server.base_url(),
        "history.bsky.social",
        "app-pass",
        TIMEOUT,
    )?;
    let pipeline = DailyPipeline::new(
        LocalCalendar::new(calendar.clone()),
        publisher,
        settings(calendar, 2025, 2, 10),
    );

    let summary = BotEngine::new(pipeline).run().await?;

    assert_eq!(summary.today_key, "02-10");
    assert_eq!(summary.loaded, 4);
    assert_eq!(summary.matched, 2);
    assert_eq!(summary.published, 2);
    session.assert_hits(1);
    create.assert_hits(2);
    Ok(())
}

#[tokio::test]
async fn test_no_events_today_skips_publishing() -> Result<()> {
    let dir = TempDir::new()?;
    let calendar = write_calendar(&dir)?;

    let server = MockServer::start();
    let session = mock_session(&server);

    let publisher = BlueskyPublisher::new(
        server.base_url(),
        "history.bsky.social",
        "app-pass",
        TIMEOUT,
    )?;
    let pipeline = DailyPipeline::new(
        LocalCalendar::new(calendar.clone()),
        publisher,
        settings(calendar, 2025, 3, 3),
    );

    let summary = BotEngine::new(pipeline).run().await?;

    assert_eq!(summary.matched, 0);
    assert_eq!(summary.published, 0);
    session.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_missing_calendar_fails_before_publishing() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("missing.csv").to_string_lossy().into_owned();

    let server = MockServer::start();
    let session = mock_session(&server);

    let publisher = BlueskyPublisher::new(
        server.base_url(),
        "history.bsky.social",
        "app-pass",
        TIMEOUT,
    )?;
    let pipeline = DailyPipeline::new(
        LocalCalendar::new(missing.clone()),
        publisher,
        settings(missing, 2025, 2, 10),
    );

    let result = BotEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(BotError::Io(_))));
    session.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_rejected_login_is_a_publish_error() -> Result<()> {
    let dir = TempDir::new()?;
    let calendar = write_calendar(&dir)?;

    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST).path("/xrpc/com.atproto.server.createSession");
        then.status(401).json_body(serde_json::json!({
            "error": "AuthenticationRequired",
            "message": "Invalid identifier or password"
        }));
    });

    let publisher = BlueskyPublisher::new(
        server.base_url(),
        "history.bsky.social",
        "wrong",
        TIMEOUT,
    )?;
    let pipeline = DailyPipeline::new(
        LocalCalendar::new(calendar.clone()),
        publisher,
        settings(calendar, 2025, 6, 21),
    );

    match BotEngine::new(pipeline).run().await {
        Err(BotError::PublishError { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid identifier or password");
        }
        other => panic!("expected publish error, got {:?}", other),
    }
    login.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn test_slow_service_times_out() -> Result<()> {
    let dir = TempDir::new()?;
    let calendar = write_calendar(&dir)?;

    let server = MockServer::start();
    let _login = server.mock(|when, then| {
        when.method(POST).path("/xrpc/com.atproto.server.createSession");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({
                "accessJwt": "jwt-token",
                "did": "did:plc:history"
            }));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/xrpc/com.atproto.repo.createRecord");
        then.status(200)
            .json_body(serde_json::json!({ "uri": "at://did:plc:history/app.bsky.feed.post/3k" }));
    });

    let publisher = BlueskyPublisher::new(
        server.base_url(),
        "history.bsky.social",
        "app-pass",
        Duration::from_millis(200),
    )?;
    let pipeline = DailyPipeline::new(
        LocalCalendar::new(calendar.clone()),
        publisher,
        settings(calendar, 2025, 1, 1),
    );

    match BotEngine::new(pipeline).run().await {
        Err(BotError::ApiError(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
    create.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_dry_run_with_console_publisher() -> Result<()> {
    let dir = TempDir::new()?;
    let calendar = write_calendar(&dir)?;

    let mut settings = settings(calendar.clone(), 2025, 1, 1);
    settings.dry_run = true;
    let pipeline = DailyPipeline::new(LocalCalendar::new(calendar), ConsolePublisher::new(), settings);

    let summary = BotEngine::new(pipeline).run().await?;
    assert_eq!(summary.published, 1);
    Ok(())
}
