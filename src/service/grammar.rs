use crate::error::SkillError;
use crate::models::slots::SlotSet;

const PRONOUNS: [&str; 5] = ["me", "my", "i", "mine", "myself"];

// Nouns that the owner phrase attaches to: "madison's schedule", "my calendar".
const ANCHORS: [&str; 3] = ["calendar", "schedule", "events"];

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const PARTS_OF_DAY: [&str; 5] = ["morning", "afternoon", "evening", "noon", "night"];

// Filler around the owner phrase that must never be captured as a name.
const STOPWORDS: [&str; 30] = [
    "a",
    "an",
    "the",
    "on",
    "to",
    "of",
    "in",
    "at",
    "for",
    "from",
    "that",
    "what",
    "how",
    "is",
    "are",
    "am",
    "does",
    "do",
    "have",
    "has",
    "up",
    "going",
    "busy",
    "tell",
    "put",
    "create",
    "add",
    "event",
    "appointment",
    "something",
];

/// Lower-cases, strips possessive suffixes, and drops punctuation, leaving a
/// single-space token stream. Matches the preprocessing the grammar expects:
/// "madison's" and "madison" tokenize identically.
pub fn normalize(utterance: &str) -> String {
    let stripped = utterance.to_lowercase().replace("'s", "");
    let cleaned: String = stripped
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a raw utterance into a `SlotSet`. Total over the input alphabet:
/// any token stream parses, at worst with both slots absent. Only input with
/// no word tokens at all is malformed.
pub fn parse_slots(utterance: &str) -> Result<SlotSet, SkillError> {
    let normalized = normalize(utterance);
    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return Err(SkillError::MalformedUtterance);
    }
    Ok(SlotSet {
        calendar_owner: find_owner(&tokens),
        time_frame: find_time_frame(&tokens),
    })
}

fn is_pronoun(token: &str) -> bool {
    PRONOUNS.contains(&token)
}

fn is_weekday(token: &str) -> bool {
    WEEKDAYS.contains(&token)
}

fn is_month(token: &str) -> bool {
    MONTHS.contains(&token)
}

fn is_part_of_day(token: &str) -> bool {
    PARTS_OF_DAY.contains(&token)
}

fn is_time_keyword(token: &str) -> bool {
    is_weekday(token)
        || is_month(token)
        || is_part_of_day(token)
        || matches!(token, "today" | "tomorrow" | "this" | "next" | "week" | "weekend" | "day")
}

fn is_name_like(token: &str) -> bool {
    !is_pronoun(token)
        && !ANCHORS.contains(&token)
        && !STOPWORDS.contains(&token)
        && !is_time_keyword(token)
}

/// Day numbers may arrive as "3", "3rd", "21st".
fn is_day_number(token: &str) -> bool {
    let digits = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))
        .unwrap_or(token);
    matches!(digits.parse::<u32>(), Ok(1..=31))
}

fn find_owner(tokens: &[&str]) -> Option<String> {
    // Owner phrase directly before an anchor noun. A non-pronoun name
    // preceded by "my" is kept as one two-token phrase so misrecognitions
    // like "my lowe schedule" (for "milo's schedule") survive intact.
    for i in 1..tokens.len() {
        if !ANCHORS.contains(&tokens[i]) {
            continue;
        }
        let prev = tokens[i - 1];
        if is_pronoun(prev) {
            return Some(prev.to_string());
        }
        if is_name_like(prev) {
            if i >= 2 && tokens[i - 2] == "my" {
                return Some(format!("my {prev}"));
            }
            return Some(prev.to_string());
        }
    }

    // Subject position: "what does madison have ...", "what is milo up to".
    for i in 0..tokens.len().saturating_sub(2) {
        if tokens[i] != "does" && tokens[i] != "is" {
            continue;
        }
        let subject = tokens[i + 1];
        let follow = tokens[i + 2];
        if (follow == "have" || follow == "up") && (is_pronoun(subject) || is_name_like(subject)) {
            return Some(subject.to_string());
        }
    }

    // First-person pronoun anywhere: "how busy am i today".
    tokens
        .iter()
        .copied()
        .find(|&t| is_pronoun(t))
        .map(str::to_string)
}

fn find_time_frame(tokens: &[&str]) -> Option<String> {
    for (i, &tok) in tokens.iter().enumerate() {
        let next = tokens.get(i + 1).copied();
        if tok == "this" || tok == "next" {
            if let Some(n) = next {
                if matches!(n, "week" | "weekend" | "day") || is_weekday(n) {
                    return Some(format!("{tok} {n}"));
                }
            }
            continue;
        }
        if is_month(tok) {
            if let Some(n) = next {
                if is_day_number(n) {
                    return Some(format!("{tok} {n}"));
                }
            }
            continue;
        }
        if tok == "today" || tok == "tomorrow" || is_weekday(tok) || is_part_of_day(tok) {
            return Some(tok.to_string());
        }
    }
    None
}
