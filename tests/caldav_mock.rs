use chrono::{TimeZone, Utc};
use lichbot::components::{CalDavClient, CalendarSource, TimeWindow};
use lichbot::error::Error;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn window() -> TimeWindow {
    TimeWindow::lookahead(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(), 7)
}

fn multistatus(calendars: &[&str]) -> String {
    let responses: String = calendars
        .iter()
        .enumerate()
        .map(|(i, calendar)| {
            format!(
                "<d:response><d:href>/cal/{i}.ics</d:href><d:propstat><d:prop>\
                 <d:getetag>\"{i}\"</d:getetag>\
                 <cal:calendar-data>{calendar}</cal:calendar-data>\
                 </d:prop><d:status>HTTP/1.1 200 OK</d:status></d:propstat></d:response>"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <d:multistatus xmlns:d=\"DAV:\" xmlns:cal=\"urn:ietf:params:xml:ns:caldav\">{responses}</d:multistatus>"
    )
}

const MEETING: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:E1\r\n\
DTSTAMP:20250601T000000Z\r\n\
DTSTART:20250602T020000Z\r\n\
DTEND:20250602T040000Z\r\n\
SUMMARY:Họp R&amp;D\r\n\
LOCATION:Phòng 2\r\n\
DESCRIPTION:1. Nội dung: Giao ban\\n4. Chủ trì: Ông A\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

const TRAINING: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:E2\r\n\
DTSTAMP:20250601T000000Z\r\n\
DTSTART;TZID=Asia/Ho_Chi_Minh:20250603T140000\r\n\
DTEND;TZID=Asia/Ho_Chi_Minh:20250603T170000\r\n\
SUMMARY:Tập huấn\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

/// Fetching parses every calendar object in the multistatus body
#[tokio::test]
async fn test_fetch_raw_events() {
    let server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .and(path("/cal/"))
        .and(header("depth", "1"))
        .and(header("authorization", "Basic YWxpY2U6c2VjcmV0"))
        .and(body_string_contains(
            r#"<cal:time-range start="20250601T000000Z" end="20250608T000000Z"/>"#,
        ))
        .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[MEETING, TRAINING])))
        .expect(1)
        .mount(&server)
        .await;

    let client = CalDavClient::new(&format!("{}/cal/", server.uri()), "alice", "secret");
    let events = client.fetch_raw_events(window()).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].uid, "E1");
    assert_eq!(events[0].summary, "Họp R&D");
    assert_eq!(events[0].start, "2025-06-02T02:00:00+00:00");
    assert_eq!(events[0].description, "1. Nội dung: Giao ban\n4. Chủ trì: Ông A");
    assert_eq!(events[1].uid, "E2");
    assert_eq!(events[1].start, "2025-06-03T14:00:00+07:00");
    assert_eq!(events[1].end, "2025-06-03T17:00:00+07:00");
}

/// An empty calendar is a valid, empty result
#[tokio::test]
async fn test_fetch_empty_calendar() {
    let server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .respond_with(ResponseTemplate::new(207).set_body_string(multistatus(&[])))
        .mount(&server)
        .await;

    let client = CalDavClient::new(&server.uri(), "alice", "secret");
    assert!(client.fetch_raw_events(window()).await.unwrap().is_empty());
}

/// Anything but 207 is a fetch failure
#[tokio::test]
async fn test_fetch_rejects_non_multistatus() {
    let server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = CalDavClient::new(&server.uri(), "alice", "wrong");
    let err = client.fetch_raw_events(window()).await.unwrap_err();

    assert!(matches!(err, Error::CalDav(_)));
    assert!(err.to_string().contains("401"));
}

/// A 207 with a broken body is a fetch failure too
#[tokio::test]
async fn test_fetch_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("REPORT"))
        .respond_with(ResponseTemplate::new(207).set_body_string("<d:multistatus><d:response></d:multistatus>"))
        .mount(&server)
        .await;

    let client = CalDavClient::new(&server.uri(), "alice", "secret");
    assert!(client.fetch_raw_events(window()).await.is_err());
}
