//! Nonprofits

use slotmap::new_key_type;

new_key_type! {
    /// Nonprofit Key
    pub struct NonprofitKey;
}

/// A partner nonprofit.
///
/// Reference data: donations point at a nonprofit, but this layer never
/// mutates one.
#[derive(Debug, Clone)]
pub struct Nonprofit {
    /// Nonprofit name
    pub name: String,

    /// Mission statement
    pub mission: String,

    /// Employer identification number
    pub ein: String,

    /// Whether the platform has verified the nonprofit
    pub is_verified: bool,

    /// Cause categories (e.g. "oceans", "reforestation")
    pub categories: Vec<String>,
}

impl Nonprofit {
    /// Creates a verified nonprofit with the given name and mission.
    pub fn new(name: impl Into<String>, mission: impl Into<String>, ein: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mission: mission.into(),
            ein: ein.into(),
            is_verified: true,
            categories: Vec::new(),
        }
    }

    /// Adds cause categories.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }
}
