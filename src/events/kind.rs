use std::str::FromStr;

/// Recognized game client message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    GameStarted,
    GameEnded,
    DraftPack,
    DraftCardPicked,
    Collection,
    SaveDeck,
    Logout,
}

/// Wire tag -> kind. The client has shipped `DaraftCardPicked` for draft picks,
/// so it stays as an alias.
const TAGS: &[(&str, EventKind)] = &[
    ("GameStarted", EventKind::GameStarted),
    ("GameEnded", EventKind::GameEnded),
    ("DraftPack", EventKind::DraftPack),
    ("DraftCardPicked", EventKind::DraftCardPicked),
    ("DaraftCardPicked", EventKind::DraftCardPicked),
    ("Collection", EventKind::Collection),
    ("SaveDeck", EventKind::SaveDeck),
    ("Logout", EventKind::Logout),
];

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::GameStarted,
        EventKind::GameEnded,
        EventKind::DraftPack,
        EventKind::DraftCardPicked,
        EventKind::Collection,
        EventKind::SaveDeck,
        EventKind::Logout,
    ];

    /// Exact, case-sensitive tag match
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.iter()
            .find(|(wire, _)| *wire == tag)
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::GameStarted => "GameStarted",
            EventKind::GameEnded => "GameEnded",
            EventKind::DraftPack => "DraftPack",
            EventKind::DraftCardPicked => "DraftCardPicked",
            EventKind::Collection => "Collection",
            EventKind::SaveDeck => "SaveDeck",
            EventKind::Logout => "Logout",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_tag(raw).ok_or_else(|| format!("unknown event type: {}", raw))
    }
}
