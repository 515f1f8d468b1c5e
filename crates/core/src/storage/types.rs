use std::fmt;
use std::str::FromStr;

/// How a delete locates the row it removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMatch {
    /// Match on the primary key alone.
    #[default]
    Id,
    /// Match on the primary key and the title currently stored for it.
    IdAndTitle,
}

impl DeleteMatch {
    /// Returns the title guard to pass to the store for this strategy.
    pub fn title_guard<'a>(&self, current_title: &'a str) -> Option<&'a str> {
        match self {
            DeleteMatch::Id => None,
            DeleteMatch::IdAndTitle => Some(current_title),
        }
    }
}

impl FromStr for DeleteMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(DeleteMatch::Id),
            "id-and-title" | "id_and_title" => Ok(DeleteMatch::IdAndTitle),
            other => Err(format!("unknown delete match strategy: {other}")),
        }
    }
}

impl fmt::Display for DeleteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteMatch::Id => write!(f, "id"),
            DeleteMatch::IdAndTitle => write!(f, "id-and-title"),
        }
    }
}
