use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{Tz, UTC};

use calendarBot::clients::caldav::CalendarBackend;
use calendarBot::config::NamesConfig;
use calendarBot::error::SkillError;
use calendarBot::handlers::intent::{
    handle_add_event, handle_list_events, present_events, AddReply, ListReply, SkillContext,
};
use calendarBot::models::calendar::{CalendarEvent, CalendarId, ListedEvent, TimeInterval};

struct FakeBackend {
    created: Mutex<Vec<(CalendarId, CalendarEvent)>>,
    listing: Vec<ListedEvent>,
}

impl FakeBackend {
    fn new(listing: Vec<ListedEvent>) -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            listing,
        }
    }
}

#[async_trait]
impl CalendarBackend for FakeBackend {
    async fn create_event(
        &self,
        calendar: &CalendarId,
        event: &CalendarEvent,
    ) -> Result<(), SkillError> {
        self.created
            .lock()
            .unwrap()
            .push((calendar.clone(), event.clone()));
        Ok(())
    }

    async fn list_events(
        &self,
        _calendar: &CalendarId,
        _window: &TimeInterval,
    ) -> Result<Vec<ListedEvent>, SkillError> {
        Ok(self.listing.clone())
    }
}

fn ctx() -> SkillContext {
    SkillContext::new(&NamesConfig::reference(), UTC).unwrap()
}

fn noon_tuesday() -> DateTime<Tz> {
    // 2026-01-06 is a Tuesday.
    UTC.with_ymd_and_hms(2026, 1, 6, 12, 0, 0).unwrap()
}

fn listed(name: &str, day: u32, hour: u32) -> ListedEvent {
    ListedEvent {
        name: name.to_string(),
        start: Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 1, day, hour + 1, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn add_event_flows_through_to_the_backend() {
    let ctx = ctx();
    let backend = FakeBackend::new(Vec::new());

    let reply = handle_add_event(
        &ctx,
        "put something on madison's calendar tomorrow",
        None,
        "Dentist",
        noon_tuesday(),
    )
    .unwrap();

    let AddReply::Create {
        calendar, event, ..
    } = reply
    else {
        panic!("expected create reply");
    };
    backend.create_event(&calendar, &event).await.unwrap();

    let created = backend.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, CalendarId::new("madison-1"));
    assert_eq!(created[0].1.name, "Dentist");
    assert_eq!(
        created[0].1.interval.start(),
        Utc.with_ymd_and_hms(2026, 1, 7, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn listed_events_are_presented_chronologically() {
    let ctx = ctx();
    // Newest-first, as the backend delivers them.
    let backend = FakeBackend::new(vec![
        listed("Retro", 9, 16),
        listed("Standup", 9, 9),
        listed("Planning", 8, 10),
    ]);

    let reply = handle_list_events(&ctx, "what is on my schedule this week", None, noon_tuesday())
        .unwrap();
    let ListReply::Query { calendar, window } = reply else {
        panic!("expected query reply");
    };
    assert_eq!(calendar, CalendarId::new("personal"));

    let events = backend.list_events(&calendar, &window).await.unwrap();
    let lines = present_events(events, ctx.timezone());
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Planning"), "first line: {}", lines[0]);
    assert!(lines[1].starts_with("Standup"), "second line: {}", lines[1]);
    assert!(lines[2].starts_with("Retro"), "third line: {}", lines[2]);
    assert_eq!(
        lines[1],
        "Standup on friday January 9th from 09:00am to 10:00am"
    );
}

#[test]
fn impossible_date_surfaces_as_unrecognized_time_frame() {
    let err = handle_list_events(
        &ctx(),
        "what is on my schedule on february 30th",
        None,
        noon_tuesday(),
    )
    .unwrap_err();
    assert!(matches!(err, SkillError::UnrecognizedTimeFrame(_)));
}

#[test]
fn malformed_records_fall_back_to_the_event_name() {
    let broken = ListedEvent {
        name: "Broken".to_string(),
        start: Utc.with_ymd_and_hms(2026, 1, 9, 10, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 1, 9, 9, 0, 0).unwrap(),
    };
    let lines = present_events(vec![broken], UTC);
    assert_eq!(lines, vec!["Broken".to_string()]);
}
