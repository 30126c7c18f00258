use super::escape::{bold, escape};
use super::models::Event;
use super::outline::parse_outline;
use super::time::format_time_range;
use crate::config::DEFAULT_LOCALE;

/// Separator line between events
const SEPARATOR: &str = "---";

/// Which change category a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
}

/// Renders the three-section MarkdownV2 digest
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    locale: String,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl ReportBuilder {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    /// Build the full report: upcoming listing, changes, detailed outline
    pub fn build(&self, events: &[Event], added: &[Event], changed: &[Event], removed: &[Event]) -> String {
        [
            self.upcoming_section(events),
            self.changes_section(added, changed, removed),
            self.details_section(events),
        ]
        .join("\n\n")
    }

    fn time_range(&self, event: &Event) -> String {
        // unparseable instants come through as raw text
        single_line(&format_time_range(&event.start, &event.end, &self.locale))
    }

    fn upcoming_section(&self, events: &[Event]) -> String {
        let locale = self.locale.as_str();
        let mut lines = vec![bold(&t!("upcoming_heading", locale = locale))];

        for (i, event) in events.iter().enumerate() {
            lines.push(bold(&t!(
                "upcoming_item",
                locale = locale,
                index = i + 1,
                time = self.time_range(event)
            )));
            lines.push(escape(&t!(
                "content_line",
                locale = locale,
                summary = single_line(&event.summary)
            )));
            lines.push(escape(&t!(
                "location_line",
                locale = locale,
                location = single_line(&event.location)
            )));
            lines.push(escape(&t!(
                "chair_line",
                locale = locale,
                chair = single_line(&event.chair)
            )));
            lines.push(escape(SEPARATOR));
        }

        lines.join("\n")
    }

    fn changes_section(&self, added: &[Event], changed: &[Event], removed: &[Event]) -> String {
        let locale = self.locale.as_str();
        let mut lines = vec![bold(&t!("changes_heading", locale = locale))];

        let rows = added
            .iter()
            .map(|e| (ChangeKind::Added, e))
            .chain(changed.iter().map(|e| (ChangeKind::Changed, e)))
            .chain(removed.iter().map(|e| (ChangeKind::Removed, e)));

        for (i, (kind, event)) in rows.enumerate() {
            lines.push(escape(&self.change_row(i + 1, kind, event)));
        }

        if lines.len() == 1 {
            lines.push(escape(&t!("no_changes", locale = locale)));
        }

        lines.join("\n")
    }

    fn change_row(&self, index: usize, kind: ChangeKind, event: &Event) -> String {
        let locale = self.locale.as_str();
        let time = self.time_range(event);
        let summary = single_line(&event.summary);
        let row = match kind {
            ChangeKind::Added => {
                t!("change_added", locale = locale, index = index, time = time, summary = summary)
            }
            ChangeKind::Changed => {
                t!("change_changed", locale = locale, index = index, time = time, summary = summary)
            }
            ChangeKind::Removed => {
                t!("change_removed", locale = locale, index = index, time = time, summary = summary)
            }
        };
        row.to_string()
    }

    fn details_section(&self, events: &[Event]) -> String {
        let locale = self.locale.as_str();
        let mut lines = vec![bold(&t!("details_heading", locale = locale))];

        for event in events {
            lines.push(bold(&t!(
                "details_item",
                locale = locale,
                time = self.time_range(event),
                title = single_line(&event.summary)
            )));
            lines.extend(parse_outline(&event.description));
            lines.push(escape(SEPARATOR));
        }

        lines.join("\n")
    }
}

/// Build the report with the default locale
pub fn build_report(events: &[Event], added: &[Event], changed: &[Event], removed: &[Event]) -> String {
    ReportBuilder::default().build(events, added, changed, removed)
}

/// Collapse line breaks so a field renders on one line
fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::models::RawEvent;
    use crate::digest::normalize::normalize;

    fn meeting() -> Event {
        normalize(&RawEvent {
            uid: "E1".to_string(),
            start: "2025-06-02T09:00:00+07:00".to_string(),
            end: "2025-06-02T11:00:00+07:00".to_string(),
            summary: "Họp giao ban".to_string(),
            location: "Phòng 2.1".to_string(),
            description: "1. Nội dung: Giao ban\n   tuần 23\n4. Chủ trì: Ông A".to_string(),
        })
    }

    fn sections(report: &str) -> Vec<&str> {
        report.split("\n\n").collect()
    }

    #[test]
    fn test_three_sections_when_nothing_changed() {
        let report = build_report(&[], &[], &[], &[]);
        let parts = sections(&report);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "*📋 Tất cả lịch sắp tới:*");
        assert_eq!(parts[1], "*🔄 Thay đổi so với lần trước:*\n\\(không có thay đổi\\)");
        assert_eq!(parts[2], "*📝 Chi tiết các lịch sắp tới:*");
    }

    #[test]
    fn test_upcoming_section_lines() {
        let event = meeting();
        let report = build_report(&[event.clone()], &[event], &[], &[]);
        let parts = sections(&report);
        assert_eq!(parts.len(), 3);

        let upcoming: Vec<&str> = parts[0].lines().collect();
        assert_eq!(
            upcoming,
            vec![
                "*📋 Tất cả lịch sắp tới:*",
                "*1\\. 🕐 Thứ 2, 2025\\-06\\-02 09:00\\-11:00*",
                "   📌 Nội dung: Họp giao ban",
                "   📍 Địa điểm: Phòng 2\\.1",
                "   👤 Chủ trì: Ông A",
                "\\-\\-\\-",
            ]
        );
    }

    #[test]
    fn test_change_rows_share_one_index() {
        let added = meeting();
        let mut changed = meeting();
        changed.uid = "E2".to_string();
        changed.summary = "Họp chi bộ".to_string();
        let mut removed = meeting();
        removed.uid = "E3".to_string();
        removed.summary = "Tập huấn".to_string();

        let report = build_report(&[], &[added], &[changed], &[removed]);
        let changes: Vec<&str> = sections(&report)[1].lines().collect();
        assert_eq!(
            changes,
            vec![
                "*🔄 Thay đổi so với lần trước:*",
                "1\\. 🆕 \\[Thêm\\] Thứ 2, 2025\\-06\\-02 09:00\\-11:00 – Họp giao ban",
                "2\\. ✏️ \\[Sửa\\] Thứ 2, 2025\\-06\\-02 09:00\\-11:00 – Họp chi bộ",
                "3\\. ❌ \\[Xoá\\] Thứ 2, 2025\\-06\\-02 09:00\\-11:00 – Tập huấn",
            ]
        );
    }

    #[test]
    fn test_details_section_uses_outline() {
        let report = build_report(&[meeting()], &[], &[], &[]);
        let details: Vec<&str> = sections(&report)[2].lines().collect();
        assert_eq!(
            details,
            vec![
                "*📝 Chi tiết các lịch sắp tới:*",
                "*\\[Thứ 2, 2025\\-06\\-02 09:00\\-11:00\\] Họp giao ban*",
                "1\\. Nội dung: Giao ban tuần 23",
                "4\\. Chủ trì: Ông A",
                "\\-\\-\\-",
            ]
        );
    }

    #[test]
    fn test_multiline_fields_never_break_sections() {
        let mut event = meeting();
        event.summary = "Dòng 1\n\nDòng 2".to_string();
        event.location = "A\r\n\r\nB".to_string();
        let report = build_report(&[event.clone()], &[], &[event], &[]);
        assert_eq!(sections(&report).len(), 3);
        assert!(report.contains("Nội dung: Dòng 1 Dòng 2"));
        assert!(report.contains("Địa điểm: A B"));
    }

    #[test]
    fn test_unparseable_times_never_break_sections() {
        let mut event = meeting();
        event.start = "soon\n\nlater".to_string();
        event.end = "\nthen\n\n".to_string();
        let report = build_report(&[event.clone()], &[event.clone()], &[], &[event]);
        assert_eq!(sections(&report).len(), 3);
        assert!(report.contains("soon later\\-then"));
    }

    #[test]
    fn test_english_locale() {
        let report = ReportBuilder::new("en").build(&[], &[], &[], &[]);
        let parts = sections(&report);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], "*🔄 Changes since last run:*\n\\(no changes\\)");
    }
}
