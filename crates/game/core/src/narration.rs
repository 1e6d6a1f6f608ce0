//! Person-aware phrasing for narrated lines.
//!
//! The player's familiar is addressed in the second person ("You hit"),
//! every other unit in the third person ("Goblin hits").

use crate::battle::Side;

/// Paragraph boundary sentinel inside a response list.
pub const PARAGRAPH_BREAK: &str = "";

/// Grammatical subject of a narrated line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subject {
    name: String,
    player: bool,
}

impl Subject {
    pub fn new(name: impl Into<String>, side: Side) -> Self {
        Self {
            name: name.into(),
            player: side == Side::Player,
        }
    }

    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, Side::Player)
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(name, Side::Enemy)
    }

    pub fn is_player(&self) -> bool {
        self.player
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// "You" or the unit's name, for the start of a sentence.
    pub fn nominative(&self) -> &str {
        if self.player { "You" } else { &self.name }
    }

    /// "you" or the unit's name, for the object position.
    pub fn object(&self) -> &str {
        if self.player { "you" } else { &self.name }
    }

    /// "Your" or "Goblin's".
    pub fn possessive(&self) -> String {
        if self.player {
            "Your".to_owned()
        } else {
            format!("{}'s", self.name)
        }
    }

    /// "your" or "Goblin's".
    pub fn possessive_lower(&self) -> String {
        if self.player {
            "your".to_owned()
        } else {
            format!("{}'s", self.name)
        }
    }

    /// Picks the second-person or third-person verb form.
    pub fn verb<'a>(&self, second_person: &'a str, third_person: &'a str) -> &'a str {
        if self.player {
            second_person
        } else {
            third_person
        }
    }

    /// Subject followed by the conjugated verb, e.g. "You don't have".
    pub fn says(&self, second_person: &str, third_person: &str) -> String {
        format!(
            "{} {}",
            self.nominative(),
            self.verb(second_person, third_person)
        )
    }

    /// "You are" or "Goblin is".
    pub fn is(&self) -> String {
        self.says("are", "is")
    }
}

/// Splits a flat response list into paragraphs at [`PARAGRAPH_BREAK`].
///
/// Empty paragraphs (leading, trailing or doubled breaks) are dropped.
pub fn group_paragraphs(lines: &[String]) -> Vec<Vec<String>> {
    lines
        .split(|line| line == PARAGRAPH_BREAK)
        .filter(|chunk| !chunk.is_empty())
        .map(<[String]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conjugates_by_person() {
        let you = Subject::player("Ember");
        let goblin = Subject::other("Goblin");
        assert_eq!(you.says("don't have", "doesn't have"), "You don't have");
        assert_eq!(goblin.says("don't have", "doesn't have"), "Goblin doesn't have");
        assert_eq!(you.possessive(), "Your");
        assert_eq!(goblin.possessive_lower(), "Goblin's");
        assert_eq!(goblin.is(), "Goblin is");
    }

    #[test]
    fn groups_on_sentinel() {
        let lines: Vec<String> = ["a", "", "b", "c", "", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let grouped = group_paragraphs(&lines);
        assert_eq!(grouped, vec![vec!["a".to_string()], vec!["b".into(), "c".into()]]);
    }
}
