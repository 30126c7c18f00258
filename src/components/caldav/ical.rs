use crate::digest::RawEvent;
use crate::error::{caldav_error, BotResult};
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarComponent, Component, Property};

const ICAL_DATETIME: &str = "%Y%m%dT%H%M%S";
const ICAL_DATE: &str = "%Y%m%d";

/// Parse one iCalendar payload into raw events, one per VEVENT
pub fn parse_calendar(payload: &str) -> BotResult<Vec<RawEvent>> {
    let calendar: Calendar = payload
        .parse()
        .map_err(|e| caldav_error(&format!("Failed to parse iCalendar data: {}", e)))?;

    let events = calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(event) => Some(raw_event(event)),
            _ => None,
        })
        .collect();

    Ok(events)
}

fn raw_event(event: &icalendar::Event) -> RawEvent {
    let text = |key: &str| {
        event
            .property_value(key)
            .map(str::to_string)
            .unwrap_or_default()
    };
    let properties = event.properties();

    RawEvent {
        uid: text("UID"),
        start: instant_text(properties.get("DTSTART")),
        end: instant_text(properties.get("DTEND")),
        summary: text("SUMMARY"),
        location: text("LOCATION"),
        description: text("DESCRIPTION"),
    }
}

fn instant_text(property: Option<&Property>) -> String {
    let Some(property) = property else {
        return String::new();
    };
    let tzid = property.params().get("TZID").map(|param| param.value());
    convert_instant(property.value(), tzid)
}

/// Convert an iCalendar DATE or DATE-TIME value to ISO text.
///
/// UTC and TZID values become RFC 3339 with an offset, floating times stay
/// naive and dates stay dates. Anything unrecognized is returned trimmed.
pub fn convert_instant(value: &str, tzid: Option<&str>) -> String {
    let value = value.trim();

    if let Some(utc_value) = value.strip_suffix('Z') {
        if let Ok(naive) = NaiveDateTime::parse_from_str(utc_value, ICAL_DATETIME) {
            return Utc
                .from_utc_datetime(&naive)
                .fixed_offset()
                .to_rfc3339_opts(SecondsFormat::Secs, false);
        }
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, ICAL_DATETIME) {
        let zoned = tzid
            .and_then(|id| id.trim_matches('"').parse::<Tz>().ok())
            .and_then(|tz| tz.from_local_datetime(&naive).earliest());
        return match zoned {
            Some(dt) => dt.fixed_offset().to_rfc3339_opts(SecondsFormat::Secs, false),
            None => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
        };
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, ICAL_DATE) {
        return date.format("%Y-%m-%d").to_string();
    }

    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_instant() {
        assert_eq!(convert_instant("20250602T020000Z", None), "2025-06-02T02:00:00+00:00");
        assert_eq!(
            convert_instant("20250602T090000", Some("Asia/Ho_Chi_Minh")),
            "2025-06-02T09:00:00+07:00"
        );
        assert_eq!(
            convert_instant("20250602T090000", Some("\"Europe/Helsinki\"")),
            "2025-06-02T09:00:00+03:00"
        );
        assert_eq!(convert_instant("20250602T090000", None), "2025-06-02T09:00:00");
        assert_eq!(convert_instant("20250602T090000", Some("Mars/Olympus")), "2025-06-02T09:00:00");
        assert_eq!(convert_instant("20250602", None), "2025-06-02");
        assert_eq!(convert_instant(" garbage ", None), "garbage");
    }

    #[test]
    fn test_parse_calendar_events() {
        let payload = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:E1\r\n\
DTSTAMP:20250601T000000Z\r\n\
DTSTART;TZID=Asia/Ho_Chi_Minh:20250602T090000\r\n\
DTEND;TZID=Asia/Ho_Chi_Minh:20250602T110000\r\n\
SUMMARY:Họp giao ban\r\n\
LOCATION:Phòng 2\r\n\
DESCRIPTION:1. Nội dung: Giao ban\\n4. Chủ trì: Ông A\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:E2\r\n\
DTSTAMP:20250601T000000Z\r\n\
DTSTART;VALUE=DATE:20250603\r\n\
SUMMARY:Nghỉ lễ\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = parse_calendar(payload).unwrap();
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].uid, "E1");
        assert_eq!(events[0].start, "2025-06-02T09:00:00+07:00");
        assert_eq!(events[0].end, "2025-06-02T11:00:00+07:00");
        assert_eq!(events[0].summary, "Họp giao ban");
        assert_eq!(events[0].location, "Phòng 2");
        assert_eq!(events[0].description, "1. Nội dung: Giao ban\n4. Chủ trì: Ông A");

        assert_eq!(events[1].uid, "E2");
        assert_eq!(events[1].start, "2025-06-03");
        assert_eq!(events[1].end, "");
        assert_eq!(events[1].location, "");
    }

    #[test]
    fn test_text_values_unescaped_once() {
        let payload = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:E3\r\n\
DTSTAMP:20250601T000000Z\r\n\
DTSTART:20250602T020000Z\r\n\
SUMMARY:Sao lưu C:\\\\temp\r\n\
LOCATION:Phòng 2\\, tầng 3\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let events = parse_calendar(payload).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Sao lưu C:\\temp");
        assert_eq!(events[0].location, "Phòng 2, tầng 3");
    }
}
