use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of categories an expense can belong to.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[default]
    Food,
    Travel,
    Bills,
    Shopping,
    Health,
    Other,
}

serde_plain::derive_display_from_serialize!(Category);

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Travel,
        Category::Bills,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    /// The user-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    /// Case-insensitive, so `food` and `FOOD` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
        {
            Some(category) => Ok(*category),
            None => bail!(
                "Invalid category '{s}', expected one of: {}",
                Category::ALL.map(|c| c.label()).join(", ")
            ),
        }
    }
}
