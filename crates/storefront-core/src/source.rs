use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One of the two upstream catalog backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// GraphQL-shaped backend: global ids, `priceRange`, image edges, `handle`.
    Shopify,
    /// REST-shaped backend: plain ids, `sku`, `imageGroups`.
    Salesforce,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Shopify, Source::Salesforce];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Shopify => "shopify",
            Source::Salesforce => "salesforce",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = CoreError;

    /// Exact, case-sensitive match against the allow-list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(Source::Shopify),
            "salesforce" => Ok(Source::Salesforce),
            other => Err(CoreError::InvalidSource(other.to_string())),
        }
    }
}
