use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::NamesConfig;
use crate::error::SkillError;
use crate::models::calendar::{CalendarEvent, CalendarId, ListedEvent, TimeInterval};
use crate::models::slots::MissingSlot;
use crate::service::confirmation;
use crate::service::grammar;
use crate::service::names::NameResolver;
use crate::service::temporal;

/// Immutable per-process context: the name tables and the deployment
/// timezone. Constructed once from configuration and passed by reference
/// into the stateless request handlers.
pub struct SkillContext {
    names: NameResolver,
    tz: Tz,
}

impl SkillContext {
    pub fn new(names_config: &NamesConfig, tz: Tz) -> Result<Self, SkillError> {
        Ok(Self {
            names: NameResolver::from_config(names_config)?,
            tz,
        })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }
}

/// Reply for a listing request. `NeedSlot` asks the framework to re-prompt
/// the user; it is not a failure.
#[derive(Debug)]
pub enum ListReply {
    NeedSlot(MissingSlot),
    Query {
        calendar: CalendarId,
        window: TimeInterval,
    },
}

/// Reply for an event-creation request.
#[derive(Debug)]
pub enum AddReply {
    NeedSlot(MissingSlot),
    Create {
        calendar: CalendarId,
        owner_possessive: String,
        event: CalendarEvent,
        confirmation: String,
    },
}

fn resolve_slots(
    ctx: &SkillContext,
    utterance: &str,
    prefilled_owner: Option<&str>,
    now: DateTime<Tz>,
) -> Result<Result<(CalendarId, TimeInterval), MissingSlot>, SkillError> {
    let slots = grammar::parse_slots(utterance)?;
    let Some(owner) = prefilled_owner
        .map(str::to_string)
        .or(slots.calendar_owner)
    else {
        return Ok(Err(MissingSlot::CalendarOwner));
    };
    let calendar = ctx.names.resolve_owner(&owner)?;
    let Some(frame) = slots.time_frame else {
        return Ok(Err(MissingSlot::TimeFrame));
    };
    let window = temporal::resolve(&frame, now)?;
    Ok(Ok((calendar, window)))
}

/// "what's on milo's calendar this weekend" -> a calendar query.
pub fn handle_list_events(
    ctx: &SkillContext,
    utterance: &str,
    prefilled_owner: Option<&str>,
    now: DateTime<Tz>,
) -> Result<ListReply, SkillError> {
    match resolve_slots(ctx, utterance, prefilled_owner, now)? {
        Err(missing) => Ok(ListReply::NeedSlot(missing)),
        Ok((calendar, window)) => Ok(ListReply::Query { calendar, window }),
    }
}

/// "put something on madison's calendar tomorrow" -> an event ready for the
/// backend, plus the spoken confirmation for it.
pub fn handle_add_event(
    ctx: &SkillContext,
    utterance: &str,
    prefilled_owner: Option<&str>,
    event_name: &str,
    now: DateTime<Tz>,
) -> Result<AddReply, SkillError> {
    let (calendar, window) = match resolve_slots(ctx, utterance, prefilled_owner, now)? {
        Err(missing) => return Ok(AddReply::NeedSlot(missing)),
        Ok(resolved) => resolved,
    };
    let confirmation = format!(
        "{} {}",
        event_name,
        confirmation::confirm_interval(&window, ctx.tz)
    );
    let event = CalendarEvent {
        name: event_name.to_string(),
        interval: window,
        repetition_rule: None,
    };
    let owner_possessive = ctx.names.possessive_of(&calendar).to_string();
    Ok(AddReply::Create {
        calendar,
        owner_possessive,
        event,
        confirmation,
    })
}

/// Backend listings arrive newest-first; presentation is oldest-first, one
/// spoken line per event. Records whose bounds do not form a valid interval
/// are reported by name alone.
pub fn present_events(mut events: Vec<ListedEvent>, tz: Tz) -> Vec<String> {
    events.reverse();
    events
        .into_iter()
        .map(|e| match TimeInterval::new(e.start, e.end) {
            Ok(interval) => {
                format!("{} {}", e.name, confirmation::confirm_interval(&interval, tz))
            }
            Err(_) => e.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn ctx() -> SkillContext {
        SkillContext::new(&NamesConfig::reference(), UTC).unwrap()
    }

    fn noon_tuesday() -> DateTime<Tz> {
        // 2026-01-06 is a Tuesday.
        UTC.with_ymd_and_hms(2026, 1, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn list_without_owner_asks_for_owner() {
        let reply =
            handle_list_events(&ctx(), "what is happening today", None, noon_tuesday()).unwrap();
        assert!(matches!(
            reply,
            ListReply::NeedSlot(MissingSlot::CalendarOwner)
        ));
    }

    #[test]
    fn list_without_time_frame_asks_for_time_frame() {
        let reply =
            handle_list_events(&ctx(), "what does madison have going on", None, noon_tuesday())
                .unwrap();
        assert!(matches!(reply, ListReply::NeedSlot(MissingSlot::TimeFrame)));
    }

    #[test]
    fn prefilled_owner_beats_parsed_owner() {
        let reply = handle_list_events(
            &ctx(),
            "what is on my schedule today",
            Some("madison"),
            noon_tuesday(),
        )
        .unwrap();
        match reply {
            ListReply::Query { calendar, .. } => {
                assert_eq!(calendar, CalendarId::new("madison-1"))
            }
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[test]
    fn unknown_owner_is_a_typed_error() {
        let err = handle_list_events(
            &ctx(),
            "what is on gertrude's schedule today",
            None,
            noon_tuesday(),
        )
        .unwrap_err();
        assert!(matches!(err, SkillError::UnknownOwner(_)));
    }

    #[test]
    fn add_event_builds_confirmation_with_event_name() {
        let reply = handle_add_event(
            &ctx(),
            "put something on milo's calendar tomorrow",
            None,
            "Vet Visit",
            noon_tuesday(),
        )
        .unwrap();
        match reply {
            AddReply::Create {
                calendar,
                owner_possessive,
                event,
                confirmation,
            } => {
                assert_eq!(calendar, CalendarId::new("milo"));
                assert_eq!(owner_possessive, "milo's");
                assert_eq!(event.name, "Vet Visit");
                assert_eq!(event.repetition_rule, None);
                assert_eq!(
                    confirmation,
                    "Vet Visit on wednesday January 7th from 12:00am to 11:59pm"
                );
            }
            other => panic!("expected create, got {:?}", other),
        }
    }
}
