//! Timer command interpretation for inbound chat text.
//!
//! Commands are matched against the exact literal text; anything else is an
//! ordinary chat message. Matching is independent of who sent the text; the
//! privilege check happens at the usecase layer.

/// A recognized timer control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    Resume,
    Stop,
}

impl TimerCommand {
    /// Parse a chat message as a timer command.
    ///
    /// Only the exact literals `timer start` / `timer pause` / `timer resume`
    /// / `timer stop` are recognized. No trimming, no case folding.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "timer start" => Some(Self::Start),
            "timer pause" => Some(Self::Pause),
            "timer resume" => Some(Self::Resume),
            "timer stop" => Some(Self::Stop),
            _ => None,
        }
    }
}
