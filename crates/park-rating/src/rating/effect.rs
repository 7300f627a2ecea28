use serde::{Deserialize, Serialize};

/// Persisted state of a single influence on the park rating.
///
/// A record stays in the rating after it has been deactivated so it can be
/// revived without being rebuilt. While `active` is false the impact carries
/// no meaning and must not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub active: bool,
    pub name: String,
    /// Current value, formatted for display.
    pub value: String,
    /// Signed contribution to the park rating.
    pub impact: i32,
    /// What causes the impact.
    pub note: String,
    /// Largest impact this effect can reach, if capped.
    pub maximum: Option<i32>,
    /// Last-seen key derived from the snapshot fields this effect reads.
    pub cache: u64,
    /// Position of the owning influence in the rule set.
    pub order: usize,
}

impl Effect {
    /// Blank, inactive record for the influence at `order`.
    pub fn new(order: usize) -> Self {
        Self {
            active: false,
            name: String::new(),
            value: String::new(),
            impact: 0,
            note: String::new(),
            maximum: None,
            cache: 0,
            order,
        }
    }

    /// Contribution to the total: the impact when active, zero otherwise.
    pub fn contribution(&self) -> i32 {
        if self.active {
            self.impact
        } else {
            0
        }
    }

    pub fn is_at_maximum(&self) -> bool {
        self.maximum == Some(self.impact)
    }
}
