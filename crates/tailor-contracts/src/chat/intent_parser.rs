use std::path::{Path, PathBuf};

use super::command_registry::{KeywordAction, KEYWORDS};

/// One line of interactive input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Noop,
    Quit,
    Restore,
    Help,
    Image(PathBuf),
    Text(String),
}

fn find_keyword(word: &str) -> Option<KeywordAction> {
    KEYWORDS
        .iter()
        .find(|spec| spec.keyword.eq_ignore_ascii_case(word))
        .map(|spec| spec.action)
}

/// Quoted or escaped paths (drag and drop from a file manager) collapse to one word.
fn unquoted_single_path(raw: &str) -> Option<String> {
    let parts = shell_words::split(raw).ok()?;
    match parts.as_slice() {
        [only] if !only.is_empty() => Some(only.clone()),
        _ => None,
    }
}

/// Classifies input. `is_file` decides whether a candidate path names an upload; the
/// shell passes `Path::is_file`, tests pass a fixture.
pub fn parse_intent(text: &str, is_file: impl Fn(&Path) -> bool) -> Intent {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Intent::Noop;
    }

    if let Some(action) = find_keyword(trimmed) {
        return match action {
            KeywordAction::Quit => Intent::Quit,
            KeywordAction::Restore => Intent::Restore,
            KeywordAction::Help => Intent::Help,
        };
    }

    if is_file(Path::new(trimmed)) {
        return Intent::Image(PathBuf::from(trimmed));
    }
    if let Some(unquoted) = unquoted_single_path(trimmed) {
        if unquoted != trimmed && is_file(Path::new(&unquoted)) {
            return Intent::Image(PathBuf::from(unquoted));
        }
    }

    Intent::Text(trimmed.to_string())
}
