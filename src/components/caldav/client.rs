use super::ical::parse_calendar;
use super::multistatus::extract_calendar_data;
use crate::components::{CalendarSource, TimeWindow};
use crate::config::Config;
use crate::digest::RawEvent;
use crate::error::{caldav_error, BotResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, info};

/// Time format used in CalDAV time-range filters
const CALDAV_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Minimal CalDAV client issuing calendar-query REPORTs
#[derive(Clone)]
pub struct CalDavClient {
    url: String,
    username: String,
    password: String,
    client: Client,
}

impl CalDavClient {
    /// Create a client for a calendar collection URL
    pub fn new(url: &str, username: &str, password: &str) -> Self {
        Self {
            url: url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            client: Client::new(),
        }
    }

    /// Create a client from the run configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.caldav_url, &config.caldav_username, &config.caldav_password)
    }

    /// Run the REPORT query and return the raw `calendar-data` payloads
    pub async fn fetch_calendar_data(&self, window: TimeWindow) -> BotResult<Vec<String>> {
        let start = format_caldav_time(window.start);
        let end = format_caldav_time(window.end);
        info!("Querying CalDAV from {} to {}", start, end);

        let method = Method::from_bytes(b"REPORT")
            .map_err(|e| caldav_error(&format!("Invalid HTTP method: {}", e)))?;

        let response = self
            .client
            .request(method, &self.url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Depth", "1")
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(calendar_query(&start, &end))
            .send()
            .await
            .map_err(|e| caldav_error(&format!("Failed to query calendar: {}", e)))?;

        let status = response.status();
        if status != StatusCode::MULTI_STATUS {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(caldav_error(&format!(
                "Unexpected CalDAV response: HTTP {} - {}",
                status, error_body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| caldav_error(&format!("Failed to read calendar response: {}", e)))?;

        let payloads = extract_calendar_data(&body)?;
        debug!("Received {} calendar objects", payloads.len());
        Ok(payloads)
    }
}

#[async_trait]
impl CalendarSource for CalDavClient {
    async fn fetch_raw_events(&self, window: TimeWindow) -> BotResult<Vec<RawEvent>> {
        let mut events = Vec::new();
        for payload in self.fetch_calendar_data(window).await? {
            events.extend(parse_calendar(&payload)?);
        }
        info!("Fetched {} calendar events", events.len());
        Ok(events)
    }
}

fn format_caldav_time(time: DateTime<Utc>) -> String {
    time.format(CALDAV_TIME_FORMAT).to_string()
}

/// calendar-query body selecting VEVENTs inside the time range
pub fn calendar_query(start: &str, end: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<cal:calendar-query xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <d:getetag/>
    <cal:calendar-data/>
  </d:prop>
  <cal:filter>
    <cal:comp-filter name="VCALENDAR">
      <cal:comp-filter name="VEVENT">
        <cal:time-range start="{start}" end="{end}"/>
      </cal:comp-filter>
    </cal:comp-filter>
  </cal:filter>
</cal:calendar-query>"#
    )
}
