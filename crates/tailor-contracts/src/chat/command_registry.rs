#[derive(Clone, Copy, Debug)]
pub(crate) struct KeywordSpec {
    pub keyword: &'static str,
    pub action: KeywordAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeywordAction {
    Quit,
    Restore,
    Help,
}

pub(crate) const KEYWORDS: &[KeywordSpec] = &[
    KeywordSpec {
        keyword: "quit",
        action: KeywordAction::Quit,
    },
    KeywordSpec {
        keyword: "exit",
        action: KeywordAction::Quit,
    },
    KeywordSpec {
        keyword: "restore",
        action: KeywordAction::Restore,
    },
    KeywordSpec {
        keyword: "help",
        action: KeywordAction::Help,
    },
];

pub const CHAT_HELP_LINES: &[&str] = &[
    "1. Upload clothing photo: enter the file path of a real clothing image",
    "   e.g. /path/to/your/tshirt.jpg",
    "2. Text description: enter the clothing description directly",
    "   e.g. red hoodie with white logo on front",
    "3. Restore original: enter 'restore'",
    "4. Quit: enter 'quit'",
];
