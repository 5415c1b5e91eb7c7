#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
    Failed(Failure),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    ModifierHeld,
    NotPrintable,
    NoScriptSignal,
    AlreadyCurrent,
    Throttled,
    NoContact,
    SameContact,
    ContactUnknown,
    ContactsDisabled,
    BufferTooShort,
    AlreadyRemembered,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::ModifierHeld => "modifier_held",
            SkipReason::NotPrintable => "not_printable",
            SkipReason::NoScriptSignal => "no_script_signal",
            SkipReason::AlreadyCurrent => "already_current",
            SkipReason::Throttled => "throttled",
            SkipReason::NoContact => "no_contact",
            SkipReason::SameContact => "same_contact",
            SkipReason::ContactUnknown => "contact_unknown",
            SkipReason::ContactsDisabled => "contacts_disabled",
            SkipReason::BufferTooShort => "buffer_too_short",
            SkipReason::AlreadyRemembered => "already_remembered",
        }
    }
}

/// Failures are logged and swallowed by the caller; they only show up here
/// so tests and traces can tell a dropped message from a skipped one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Failure {
    ChannelError,
    PersistenceError,
    HandoffError,
}
