//! Product category enum.

use serde::{Deserialize, Serialize};

/// Marketplace product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Tools,
    Seeds,
    Fertilizers,
    Pesticides,
}

impl ProductCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [
        Self::Tools,
        Self::Seeds,
        Self::Fertilizers,
        Self::Pesticides,
    ];

    /// Machine-readable key (matches the serde representation).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Seeds => "seeds",
            Self::Fertilizers => "fertilizers",
            Self::Pesticides => "pesticides",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tools => "Tools",
            Self::Seeds => "Seeds",
            Self::Fertilizers => "Fertilizers",
            Self::Pesticides => "Pesticides",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| format!("invalid product category: {s}"))
    }
}
