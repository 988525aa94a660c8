use crate::core::preferences::{Preferences, MODEL_CATALOG};

/// Draft state behind the settings overlay.
///
/// Edits accumulate here and hit the store in a single `set` when applied;
/// closing the overlay without applying discards them. Temperature stepping
/// is clamped to [0.0, 1.0], but that is a property of these controls only.
/// A model that is not in the catalog stays untouched until the user moves
/// the selection.
pub struct SettingsOverlay {
    pub draft: Preferences,
    selected: usize,
}

impl SettingsOverlay {
    pub fn new(current: Preferences) -> Self {
        let selected = MODEL_CATALOG
            .iter()
            .position(|option| option.id == current.model)
            .unwrap_or(0);
        SettingsOverlay {
            draft: current,
            selected,
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.draft.model = MODEL_CATALOG[self.selected].id.to_string();
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < MODEL_CATALOG.len() {
            self.selected += 1;
        }
        self.draft.model = MODEL_CATALOG[self.selected].id.to_string();
    }

    pub fn raise_temperature(&mut self) {
        self.draft.temperature = step(self.draft.temperature, 0.1);
    }

    pub fn lower_temperature(&mut self) {
        self.draft.temperature = step(self.draft.temperature, -0.1);
    }

    /// Whether the catalog row at `index` is the highlighted one. No row is
    /// highlighted while the draft names a model outside the catalog.
    pub fn marks(&self, index: usize) -> bool {
        index == self.selected && MODEL_CATALOG[index].id == self.draft.model
    }
}

fn step(current: f64, delta: f64) -> f64 {
    (((current + delta) * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Preferences {
        Preferences::default()
    }

    #[test]
    fn opens_with_the_current_model_highlighted() {
        let overlay = SettingsOverlay::new(defaults());
        let expected = MODEL_CATALOG
            .iter()
            .position(|option| option.id == "claude-3.7-sonnet")
            .unwrap();
        assert!(overlay.marks(expected));
    }

    #[test]
    fn selection_moves_through_the_catalog_and_saturates() {
        let mut overlay = SettingsOverlay::new(defaults());

        for _ in 0..MODEL_CATALOG.len() * 2 {
            overlay.select_next();
        }
        assert_eq!(overlay.draft.model, MODEL_CATALOG.last().unwrap().id);

        for _ in 0..MODEL_CATALOG.len() * 2 {
            overlay.select_previous();
        }
        assert_eq!(overlay.draft.model, MODEL_CATALOG[0].id);
    }

    #[test]
    fn temperature_steps_by_tenths() {
        let mut overlay = SettingsOverlay::new(defaults());

        overlay.raise_temperature();
        assert_eq!(overlay.draft.temperature, 0.4);
        overlay.lower_temperature();
        overlay.lower_temperature();
        assert_eq!(overlay.draft.temperature, 0.2);
    }

    #[test]
    fn temperature_clamps_at_the_ends() {
        let mut overlay = SettingsOverlay::new(defaults());

        for _ in 0..20 {
            overlay.raise_temperature();
        }
        assert_eq!(overlay.draft.temperature, 1.0);

        for _ in 0..20 {
            overlay.lower_temperature();
        }
        assert_eq!(overlay.draft.temperature, 0.0);
    }

    #[test]
    fn out_of_range_temperature_snaps_into_range_on_first_step() {
        let mut overlay = SettingsOverlay::new(Preferences {
            model: "gpt-4o".to_string(),
            temperature: 7.2,
        });

        overlay.lower_temperature();
        assert_eq!(overlay.draft.temperature, 1.0);
    }

    #[test]
    fn custom_model_survives_temperature_edits() {
        let mut overlay = SettingsOverlay::new(Preferences {
            model: "my-homegrown-llm".to_string(),
            temperature: 0.3,
        });

        overlay.raise_temperature();
        assert_eq!(overlay.draft.model, "my-homegrown-llm");
        assert!((0..MODEL_CATALOG.len()).all(|index| !overlay.marks(index)));
    }

    #[test]
    fn moving_the_selection_replaces_a_custom_model() {
        let mut overlay = SettingsOverlay::new(Preferences {
            model: "my-homegrown-llm".to_string(),
            temperature: 0.3,
        });

        overlay.select_next();
        assert_eq!(overlay.draft.model, MODEL_CATALOG[1].id);
        assert!(overlay.marks(1));
    }
}
