use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {raw}")]
pub struct TopicParseError {
    pub raw: String,
}

/// A lesson topic the child can pick from the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Topic {
    Numbers,
    Alphabet,
    Colors,
    Fruits,
    Vegetables,
    FarmAnimals,
    WildAnimals,
    Shapes,
    Objects,
}

impl Topic {
    /// All topics in home-screen order.
    pub const ALL: [Topic; 9] = [
        Topic::Numbers,
        Topic::Alphabet,
        Topic::Colors,
        Topic::Fruits,
        Topic::Vegetables,
        Topic::FarmAnimals,
        Topic::WildAnimals,
        Topic::Shapes,
        Topic::Objects,
    ];

    /// Human-readable label, also sent to the generator as the general topic.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::Numbers => "Numbers (1-20)",
            Topic::Alphabet => "Alphabet Letters",
            Topic::Colors => "Natural Colors",
            Topic::Fruits => "Real Fruits",
            Topic::Vegetables => "Real Vegetables",
            Topic::FarmAnimals => "Farm Animals",
            Topic::WildAnimals => "Wild Animals",
            Topic::Shapes => "Shapes",
            Topic::Objects => "Everyday Objects",
        }
    }

    /// Short lowercase identifier used on the command line.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Topic::Numbers => "numbers",
            Topic::Alphabet => "alphabet",
            Topic::Colors => "colors",
            Topic::Fruits => "fruits",
            Topic::Vegetables => "vegetables",
            Topic::FarmAnimals => "farm",
            Topic::WildAnimals => "wild",
            Topic::Shapes => "shapes",
            Topic::Objects => "objects",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Topic::ALL
            .into_iter()
            .find(|topic| {
                topic.slug().eq_ignore_ascii_case(needle)
                    || topic.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| TopicParseError {
                raw: s.to_string(),
            })
    }
}
