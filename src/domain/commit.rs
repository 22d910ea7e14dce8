//! Conventional commit classification.
//!
//! Grammar: `type(scope)!: description`, where `(scope)` and `!` are
//! optional. Messages that do not match are classified as [`NO_CHANGE_TYPE`]
//! instead of failing.

use regex::Regex;
use std::sync::LazyLock;

/// Change type given to commits that do not follow the grammar
pub const NO_CHANGE_TYPE: &str = "none";

/// Footer tokens that mark a breaking change
pub const BREAKING_CHANGE_TOKENS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Maximum length of [`ParsedCommit::short_message`], ellipsis included
pub const SHORT_MESSAGE_LENGTH: usize = 50;

const ELLIPSIS: &str = "...";

static CONVENTIONAL_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-zA-Z]+)(?:\((?P<scope>[^()\r\n]+)\))?(?P<bang>!)?:\s*(?P<description>.*)$")
        .expect("conventional commit grammar is valid")
});

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
    /// Subject line cut to [`SHORT_MESSAGE_LENGTH`] for display
    pub short_message: String,
}

impl ParsedCommit {
    /// Classify a commit from its subject line and body
    pub fn classify(subject: &str, body: &str) -> Self {
        let subject = subject.trim_end();
        let short_message = shorten_message(subject);

        let Some(captures) = CONVENTIONAL_COMMIT.captures(subject) else {
            return ParsedCommit {
                r#type: NO_CHANGE_TYPE.to_string(),
                scope: None,
                description: subject.to_string(),
                is_breaking_change: false,
                short_message,
            };
        };

        let has_bang = captures.name("bang").is_some();
        let breaking_in_subject = subject.contains(BREAKING_CHANGE_TOKENS[0]);

        ParsedCommit {
            r#type: captures["type"].to_string(),
            scope: captures.name("scope").map(|m| m.as_str().to_string()),
            description: captures["description"].to_string(),
            is_breaking_change: has_bang || breaking_in_subject || has_breaking_footer(body),
            short_message,
        }
    }

    /// Classify a full commit message (subject, blank line, body)
    pub fn parse(message: &str) -> Self {
        let (subject, body) = split_message(message);
        Self::classify(subject, body)
    }

    /// True when the message did not follow the grammar
    pub fn is_unconventional(&self) -> bool {
        self.r#type == NO_CHANGE_TYPE
    }
}

/// Pure classification entry point, usable without a repository
pub fn classify_commit(subject: &str, body: &str) -> ParsedCommit {
    ParsedCommit::classify(subject, body)
}

/// Split a raw commit message into its first line and the remainder
pub fn split_message(message: &str) -> (&str, &str) {
    match message.split_once('\n') {
        Some((subject, body)) => (subject.trim_end_matches('\r'), body),
        None => (message, ""),
    }
}

fn has_breaking_footer(body: &str) -> bool {
    body.lines().any(|line| {
        BREAKING_CHANGE_TOKENS
            .iter()
            .any(|token| line.trim_start().starts_with(token))
    })
}

/// Cut a message to [`SHORT_MESSAGE_LENGTH`] characters, ending with `...`
/// when it had to be shortened. Cuts on character boundaries.
pub fn shorten_message(message: &str) -> String {
    if message.chars().count() <= SHORT_MESSAGE_LENGTH {
        return message.to_string();
    }

    let keep = SHORT_MESSAGE_LENGTH - ELLIPSIS.len();
    let mut short: String = message.chars().take(keep).collect();
    short.push_str(ELLIPSIS);
    short
}
