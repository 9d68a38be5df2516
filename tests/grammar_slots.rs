use calendarBot::models::slots::SlotSet;
use calendarBot::service::grammar::parse_slots;

fn slots(utterance: &str) -> SlotSet {
    parse_slots(utterance).unwrap_or_else(|e| panic!("'{utterance}' failed to parse: {e}"))
}

fn assert_slots(utterance: &str, owner: Option<&str>, time_frame: Option<&str>) {
    let parsed = slots(utterance);
    assert_eq!(parsed.calendar_owner.as_deref(), owner, "owner in '{utterance}'");
    assert_eq!(parsed.time_frame.as_deref(), time_frame, "time frame in '{utterance}'");
}

#[test]
fn recognizes_the_reference_utterances() {
    assert_slots(
        "create an event on my calendar on wednesday at 4pm",
        Some("my"),
        Some("wednesday"),
    );
    assert_slots(
        "schedule an appointment on madison's schedule tomorrow at noon",
        Some("madison"),
        Some("tomorrow"),
    );
    assert_slots(
        "put something on milo's calendar on friday at 11 am",
        Some("milo"),
        Some("friday"),
    );
    assert_slots("what am i up to this week", Some("i"), Some("this week"));
    assert_slots(
        "what does madison have going on today",
        Some("madison"),
        Some("today"),
    );
    assert_slots("what is on my schedule today", Some("my"), Some("today"));
    assert_slots("how busy am i today", Some("i"), Some("today"));
    assert_slots("what is milo up to this week", Some("milo"), Some("this week"));
    assert_slots(
        "what is on my schedule next week",
        Some("my"),
        Some("next week"),
    );
    assert_slots(
        "what are madison's events tomorrow",
        Some("madison"),
        Some("tomorrow"),
    );
    assert_slots("tell me my schedule tomorrow", Some("my"), Some("tomorrow"));
    assert_slots(
        "tell me my lowe schedule next week",
        Some("my lowe"),
        Some("next week"),
    );
    assert_slots(
        "add an event to my calendar on march 3rd at 3pm",
        Some("my"),
        Some("march 3rd"),
    );
}

#[test]
fn slots_parse_in_either_order() {
    assert_slots(
        "this weekend what does madison have planned",
        Some("madison"),
        Some("this weekend"),
    );
}

#[test]
fn owner_only_utterance_leaves_time_frame_absent() {
    assert_slots("what does madison have going on", Some("madison"), None);
}

#[test]
fn time_only_utterance_leaves_owner_absent() {
    assert_slots("anything happening tomorrow", None, Some("tomorrow"));
}

#[test]
fn unrelated_utterance_leaves_both_slots_absent() {
    assert_slots("please play some music", None, None);
}

#[test]
fn empty_utterance_is_malformed() {
    assert!(parse_slots("").is_err());
    assert!(parse_slots(" !? ").is_err());
}
