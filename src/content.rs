//! Static content tables
//!
//! Mood options and the quest list ship as JSON inside the binary and are
//! parsed once at startup. Nothing here is regenerated per frame.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

const BUILTIN_JSON: &str = include_str!("../assets/content.json");

/// Toast shown after submitting a mood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodResponse {
    pub title: String,
    pub description: String,
}

/// One button on the mood check-in card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodOption {
    pub emoji: String,
    pub label: String,
    /// 5 = Great down to 1 = Struggling
    pub value: u8,
    pub description: String,
    pub response: MoodResponse,
}

impl MoodOption {
    /// Low moods get an extra supportive note
    pub fn needs_support(&self) -> bool {
        self.value <= 2
    }
}

/// What a quest launches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Breathing,
    Meditation,
    Mindfulness,
    Reflection,
    Sanctuary,
}

impl QuestKind {
    pub fn icon(&self) -> &'static str {
        match self {
            QuestKind::Breathing => "🫁",
            QuestKind::Meditation => "🧘‍♀️",
            QuestKind::Mindfulness => "🌸",
            QuestKind::Reflection => "🪞",
            QuestKind::Sanctuary => "🐦",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestDifficulty {
    Easy,
    Medium,
    Hard,
}

/// Percent-of-map position of a quest node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: f32,
    pub y: f32,
}

/// A node on the adventure map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestNode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: QuestKind,
    pub difficulty: QuestDifficulty,
    #[serde(default)]
    pub completed: bool,
    pub unlocked: bool,
    pub position: MapPosition,
    #[serde(default)]
    pub reward: Option<String>,
    /// Quests opened up by completing this one
    #[serde(default)]
    pub unlocks: Vec<String>,
}

/// All static content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub moods: Vec<MoodOption>,
    pub quests: Vec<QuestNode>,
}

impl Content {
    /// The tables compiled into the binary
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_JSON)
    }

    /// Parse and validate a content table
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        log::info!(
            "Loaded content: {} moods, {} quests",
            content.moods.len(),
            content.quests.len()
        );
        Ok(content)
    }

    fn validate(&self) -> Result<(), ContentError> {
        let mut values = HashSet::new();
        for mood in &self.moods {
            if !(1..=5).contains(&mood.value) {
                return Err(ContentError::MoodValueOutOfRange {
                    label: mood.label.clone(),
                    value: mood.value,
                });
            }
            if !values.insert(mood.value) {
                return Err(ContentError::DuplicateMood(mood.value));
            }
        }
        if let Some(missing) = (1..=5u8).find(|v| !values.contains(v)) {
            return Err(ContentError::MissingResponse(missing));
        }

        let mut ids = HashSet::new();
        for quest in &self.quests {
            if !ids.insert(quest.id.as_str()) {
                return Err(ContentError::DuplicateQuest(quest.id.clone()));
            }
        }
        for quest in &self.quests {
            if let Some(target) = quest.unlocks.iter().find(|t| !ids.contains(t.as_str())) {
                return Err(ContentError::UnknownUnlock {
                    quest: quest.id.clone(),
                    target: target.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn mood(&self, value: u8) -> Option<&MoodOption> {
        self.moods.iter().find(|m| m.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_content_loads() {
        let content = Content::builtin().unwrap();
        assert_eq!(content.moods.len(), 5);
        assert_eq!(content.quests.len(), 5);
        assert_eq!(content.mood(1).map(|m| m.label.as_str()), Some("Struggling"));
        assert!(content.mood(2).unwrap().needs_support());
        assert!(!content.mood(3).unwrap().needs_support());

        let sanctuary = content.quests.iter().find(|q| q.id == "5").unwrap();
        assert_eq!(sanctuary.kind, QuestKind::Sanctuary);
        assert!(sanctuary.unlocked);
        assert!(!sanctuary.completed);
    }

    #[test]
    fn test_rejects_unknown_unlock() {
        let mut content = Content::builtin().unwrap();
        content.quests[0].unlocks.push("99".into());
        let json = serde_json::to_string(&content).unwrap();
        let err = Content::from_json(&json).unwrap_err();
        assert!(matches!(err, ContentError::UnknownUnlock { ref target, .. } if target == "99"));
    }

    #[test]
    fn test_rejects_duplicate_quest() {
        let mut content = Content::builtin().unwrap();
        content.quests[1].id = "1".into();
        let json = serde_json::to_string(&content).unwrap();
        assert!(matches!(
            Content::from_json(&json),
            Err(ContentError::DuplicateQuest(_))
        ));
    }

    #[test]
    fn test_rejects_bad_mood_values() {
        let mut content = Content::builtin().unwrap();
        content.moods[0].value = 9;
        let json = serde_json::to_string(&content).unwrap();
        assert!(matches!(
            Content::from_json(&json),
            Err(ContentError::MoodValueOutOfRange { value: 9, .. })
        ));

        assert!(matches!(
            Content::from_json("{"),
            Err(ContentError::Parse(_))
        ));
    }

    #[test]
    fn test_quest_icons() {
        assert_eq!(QuestKind::Sanctuary.icon(), "🐦");
        assert_eq!(QuestKind::Breathing.icon(), "🫁");
    }
}
