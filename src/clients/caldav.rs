use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::{debug, warn};
use uuid::Uuid;

use crate::error::SkillError;
use crate::models::calendar::{CalendarEvent, CalendarId, ListedEvent, TimeInterval};

const ICAL_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// The narrow calendar-backend seam: create one event, list events in a
/// window. Retry, timeout and auth policy live behind this trait, not in
/// front of it.
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    async fn create_event(
        &self,
        calendar: &CalendarId,
        event: &CalendarEvent,
    ) -> Result<(), SkillError>;

    /// Returns events newest-first, matching the server's ordering.
    async fn list_events(
        &self,
        calendar: &CalendarId,
        window: &TimeInterval,
    ) -> Result<Vec<ListedEvent>, SkillError>;
}

pub struct CaldavClient {
    base_url: String,
    user: String,
    password: String,
    http: reqwest::Client,
}

impl CaldavClient {
    pub fn new(host: &str, user: &str, password: &str) -> Self {
        Self {
            base_url: format!("https://{}/remote.php/dav/calendars/{}", host, user),
            user: user.to_string(),
            password: password.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn calendar_url(&self, calendar: &CalendarId) -> String {
        format!("{}/{}", self.base_url, calendar)
    }
}

#[async_trait]
impl CalendarBackend for CaldavClient {
    async fn create_event(
        &self,
        calendar: &CalendarId,
        event: &CalendarEvent,
    ) -> Result<(), SkillError> {
        let uid = Uuid::new_v4().to_string();
        let body = make_event_body(event, &uid, Utc::now());
        let url = format!("{}/{}.ics", self.calendar_url(calendar), uid);
        debug!("creating event at {}", url);

        let response = self
            .http
            .put(&url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Content-Type", "text/calendar; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| SkillError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("event creation failed with status {}", status);
            return Err(SkillError::Backend(format!(
                "event creation failed with status {}",
                status
            )));
        }
        Ok(())
    }

    async fn list_events(
        &self,
        calendar: &CalendarId,
        window: &TimeInterval,
    ) -> Result<Vec<ListedEvent>, SkillError> {
        let url = self.calendar_url(calendar);
        debug!("calendar url: {}", url);

        let report = reqwest::Method::from_bytes(b"REPORT")
            .map_err(|e| SkillError::Backend(e.to_string()))?;
        let response = self
            .http
            .request(report, &url)
            .basic_auth(&self.user, Some(&self.password))
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", "1")
            .body(calendar_query_body(window))
            .send()
            .await
            .map_err(|e| SkillError::Backend(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SkillError::Backend(e.to_string()))?;
        if !status.is_success() {
            warn!("event listing failed with status {}: {}", status, text);
            return Err(SkillError::Backend(format!(
                "event listing failed with status {}",
                status
            )));
        }

        Ok(parse_listing(&text))
    }
}

/// Renders one event as a VCALENDAR body for a CalDAV PUT.
pub fn make_event_body(event: &CalendarEvent, uid: &str, stamp: DateTime<Utc>) -> String {
    let rrule = match event.repetition_rule {
        Some(rule) => format!("RRULE:FREQ={}\n", rule.freq_tag()),
        None => String::new(),
    };
    format!(
        "BEGIN:VCALENDAR\n\
         VERSION:2.0\n\
         PRODID:-//calendarBot//EN\n\
         BEGIN:VEVENT\n\
         UID:{uid}\n\
         DTSTAMP:{stamp}\n\
         DTSTART:{start}\n\
         DTEND:{end}\n\
         {rrule}SUMMARY:{name}\n\
         END:VEVENT\n\
         END:VCALENDAR\n",
        uid = uid,
        stamp = stamp.format(ICAL_STAMP),
        start = event.interval.start().format(ICAL_STAMP),
        end = event.interval.end().format(ICAL_STAMP),
        rrule = rrule,
        name = event.name,
    )
}

fn calendar_query_body(window: &TimeInterval) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<c:calendar-query xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop><c:calendar-data/></d:prop>
  <c:filter>
    <c:comp-filter name="VCALENDAR">
      <c:comp-filter name="VEVENT">
        <c:time-range start="{start}" end="{end}"/>
      </c:comp-filter>
    </c:comp-filter>
  </c:filter>
</c:calendar-query>"#,
        start = window.start().format(ICAL_STAMP),
        end = window.end().format(ICAL_STAMP),
    )
}

/// Pulls SUMMARY/DTSTART/DTEND out of the VEVENT blocks in a REPORT
/// response, tolerating both timed and all-day stamps, and orders the
/// result newest-first. Blocks missing any of the three fields are skipped.
pub fn parse_listing(body: &str) -> Vec<ListedEvent> {
    let mut events = Vec::new();
    let mut in_event = false;
    let mut name: Option<String> = None;
    let mut start: Option<DateTime<Utc>> = None;
    let mut end: Option<DateTime<Utc>> = None;

    for raw in body.lines() {
        let line = raw.trim();
        if line == "BEGIN:VEVENT" {
            in_event = true;
            name = None;
            start = None;
            end = None;
            continue;
        }
        if line == "END:VEVENT" {
            if let (Some(name), Some(start), Some(end)) = (name.take(), start.take(), end.take()) {
                events.push(ListedEvent { name, start, end });
            }
            in_event = false;
            continue;
        }
        if !in_event {
            continue;
        }
        if let Some(value) = property_value(line, "SUMMARY") {
            name = Some(value.to_string());
        } else if let Some(value) = property_value(line, "DTSTART") {
            start = parse_stamp(value);
        } else if let Some(value) = property_value(line, "DTEND") {
            end = parse_stamp(value);
        }
    }

    events.sort_by(|a, b| b.start.cmp(&a.start));
    events
}

fn property_value<'a>(line: &'a str, property: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(property)?;
    let (params, value) = rest.split_once(':')?;
    if params.is_empty() || params.starts_with(';') {
        Some(value.trim())
    } else {
        None
    }
}

fn parse_stamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}
