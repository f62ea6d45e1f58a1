//! Mood check-in card

use crate::content::{Content, MoodOption};
use crate::sim::Toast;

/// Seconds the thank-you card stays up before the form resets
pub const SUBMITTED_CARD_SECS: f32 = 3.0;

/// Mood check-in form state
#[derive(Debug, Clone, Default)]
pub struct MoodCheckin {
    selected: Option<u8>,
    /// Seconds left on the thank-you card, None while the form is shown
    submitted_for: Option<f32>,
}

impl MoodCheckin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<u8> {
        self.selected
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_for.is_some()
    }

    /// Pick a mood. Unknown values and picks on the thank-you card are ignored.
    pub fn select(&mut self, content: &Content, value: u8) -> bool {
        if self.is_submitted() || content.mood(value).is_none() {
            return false;
        }
        self.selected = Some(value);
        true
    }

    /// Submit the selected mood. Returns the mood and its response toast,
    /// or None if nothing is selected.
    pub fn submit(&mut self, content: &Content) -> Option<(MoodOption, Toast)> {
        if self.is_submitted() {
            return None;
        }
        let mood = content.mood(self.selected?)?.clone();
        self.submitted_for = Some(SUBMITTED_CARD_SECS);
        log::info!("Mood submitted: {} ({})", mood.label, mood.value);
        let toast = Toast::new(&mood.response.title, &mood.response.description);
        Some((mood, toast))
    }

    /// Count down the thank-you card
    pub fn tick(&mut self, dt: f32) {
        let Some(remaining) = self.submitted_for.as_mut() else {
            return;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.submitted_for = None;
            self.selected = None;
        }
    }
}
