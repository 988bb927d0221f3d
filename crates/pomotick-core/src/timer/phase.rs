use serde::{Deserialize, Serialize};

/// The current countdown category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_work(self) -> bool {
        matches!(self, Phase::Work)
    }

    /// Human-readable label, used by notifiers and the CLI.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Work
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_wire_names() {
        assert_eq!(serde_json::to_string(&Phase::Work).unwrap(), "\"work\"");
        assert_eq!(
            serde_json::to_string(&Phase::ShortBreak).unwrap(),
            "\"shortBreak\""
        );
        assert_eq!(
            serde_json::to_string(&Phase::LongBreak).unwrap(),
            "\"longBreak\""
        );
    }
}
