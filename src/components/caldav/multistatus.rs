use crate::error::{caldav_error, BotResult};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;

/// Local name of the element holding iCalendar payloads
const CALENDAR_DATA: &[u8] = b"calendar-data";

/// Collect every `calendar-data` payload from a `207 Multi-Status` body.
///
/// Namespace prefixes are ignored, so `cal:calendar-data` and
/// `C:calendar-data` both match.
pub fn extract_calendar_data(xml: &str) -> BotResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut payloads = Vec::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Start(e)) if e.local_name().as_ref() == CALENDAR_DATA => {
                current = Some(String::new());
            }
            Ok(XmlEvent::Text(text)) => {
                if let Some(buffer) = current.as_mut() {
                    let text = text.unescape().map_err(|e| {
                        caldav_error(&format!("Failed to decode calendar-data text: {}", e))
                    })?;
                    buffer.push_str(&text);
                }
            }
            Ok(XmlEvent::CData(data)) => {
                if let Some(buffer) = current.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(XmlEvent::End(e)) if e.local_name().as_ref() == CALENDAR_DATA => {
                if let Some(buffer) = current.take() {
                    if !buffer.trim().is_empty() {
                        payloads.push(buffer);
                    }
                }
            }
            Ok(XmlEvent::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(caldav_error(&format!(
                    "Failed to parse multistatus response at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_payloads_with_entities() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/cal/e1.ics</d:href>
    <d:propstat>
      <d:prop>
        <d:getetag>"1"</d:getetag>
        <cal:calendar-data>BEGIN:VCALENDAR
SUMMARY:R&amp;D &lt;review&gt;
END:VCALENDAR</cal:calendar-data>
      </d:prop>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/cal/e2.ics</d:href>
    <d:propstat>
      <d:prop>
        <C:calendar-data xmlns:C="urn:ietf:params:xml:ns:caldav"><![CDATA[BEGIN:VCALENDAR
END:VCALENDAR]]></C:calendar-data>
      </d:prop>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

        let payloads = extract_calendar_data(xml).unwrap();
        assert_eq!(payloads.len(), 2);
        assert!(payloads[0].contains("SUMMARY:R&D <review>"));
        assert!(payloads[1].starts_with("BEGIN:VCALENDAR"));
    }

    #[test]
    fn test_empty_multistatus() {
        let xml = r#"<d:multistatus xmlns:d="DAV:"></d:multistatus>"#;
        assert!(extract_calendar_data(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = r#"<d:multistatus xmlns:d="DAV:"><d:response></d:multistatus>"#;
        assert!(extract_calendar_data(xml).is_err());
    }
}
