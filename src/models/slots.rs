/// Slots extracted from one utterance. Absence of either entry is a valid
/// parse result, not an error; the caller decides whether to re-prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotSet {
    pub calendar_owner: Option<String>,
    pub time_frame: Option<String>,
}

/// Which slot the framework should re-prompt the user for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSlot {
    CalendarOwner,
    TimeFrame,
}
