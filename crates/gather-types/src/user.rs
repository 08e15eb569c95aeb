//! User profiles keyed by identity subject.

use serde::{Deserialize, Serialize};

use crate::{Subject, UserId};

/// Profile created lazily on first authenticated access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct UserProfile {
    #[ts(type = "string")]
    pub id: UserId,
    pub subject: Subject,
    pub display_name: String,
    pub initials: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl UserProfile {
    /// Initials of a display name: first letters of the first and last
    /// words, or of the only word, upper-cased.
    pub fn initials_of(display_name: &str) -> String {
        let parts: Vec<&str> = display_name.split_whitespace().collect();
        let first = |s: &str| s.chars().next();
        let letters: Vec<char> = match parts.as_slice() {
            [] => Vec::new(),
            [only] => first(only).into_iter().collect(),
            [head, .., tail] => first(head).into_iter().chain(first(tail)).collect(),
        };
        letters.into_iter().flat_map(char::to_uppercase).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: String,
}
