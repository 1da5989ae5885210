//! Player context attached to feedback requests.

use serde::{Deserialize, Serialize};

/// Optional details about the player being coached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachingContext {
    pub jersey_number: Option<String>,
    pub position: Option<String>,
    pub notes: Option<String>,
}

impl CoachingContext {
    /// Render as newline-separated lines, skipping blank fields.
    ///
    /// Returns an empty string when nothing is set.
    pub fn render(&self) -> String {
        let fields = [
            ("Player jersey number", &self.jersey_number),
            ("Player role/position", &self.position),
            ("Focus areas", &self.notes),
        ];

        fields
            .iter()
            .filter_map(|(name, value)| {
                let value = value.as_deref()?.trim();
                (!value.is_empty()).then(|| format!("{name}: {value}"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.render().is_empty()
    }
}
