//! Adventure map

use crate::content::QuestNode;

/// Quest nodes plus the player's in-session progress
#[derive(Debug, Clone)]
pub struct AdventureMap {
    pub quests: Vec<QuestNode>,
    selected: Option<String>,
}

impl AdventureMap {
    pub fn new(quests: Vec<QuestNode>) -> Self {
        Self {
            quests,
            selected: None,
        }
    }

    pub fn quest(&self, id: &str) -> Option<&QuestNode> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn selected(&self) -> Option<&QuestNode> {
        self.selected.as_deref().and_then(|id| self.quest(id))
    }

    /// Select an unlocked quest. Locked or unknown quests are ignored.
    pub fn select(&mut self, id: &str) -> Option<&QuestNode> {
        let quest = self.quests.iter().find(|q| q.id == id)?;
        if !quest.unlocked {
            log::debug!("Quest {} is locked", id);
            return None;
        }
        self.selected = Some(quest.id.clone());
        Some(quest)
    }

    /// Mark a quest done and unlock what it opens. Returns the unlocked ids.
    pub fn complete(&mut self, id: &str) -> Vec<String> {
        let Some(quest) = self.quests.iter_mut().find(|q| q.id == id) else {
            return Vec::new();
        };
        if quest.completed {
            return Vec::new();
        }
        quest.completed = true;
        log::info!("Quest completed: {}", quest.title);
        let unlocks = quest.unlocks.clone();

        let mut opened = Vec::new();
        for target in unlocks {
            if let Some(next) = self.quests.iter_mut().find(|q| q.id == target) {
                if !next.unlocked {
                    next.unlocked = true;
                    opened.push(next.id.clone());
                }
            }
        }
        opened
    }

    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|q| q.completed).count()
    }

    /// Completed share of all quests, 0..=100
    pub fn progress_percent(&self) -> f32 {
        if self.quests.is_empty() {
            return 0.0;
        }
        self.completed_count() as f32 / self.quests.len() as f32 * 100.0
    }
}
