use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Maximum number of summary bullet points kept on an article.
pub const MAX_SUMMARY_POINTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub category: Category,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub importance: Importance,
}

impl Article {
    /// Drops summary points past [`MAX_SUMMARY_POINTS`].
    pub fn normalized(mut self) -> Self {
        self.summary.truncate(MAX_SUMMARY_POINTS);
        self
    }
}

/// The fixed set of sector tags. `General` is the unfiltered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Farming,
    Tech,
    Politics,
    Hospitality,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Farming,
        Category::Tech,
        Category::Politics,
        Category::Hospitality,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Farming => "farming",
            Category::Tech => "tech",
            Category::Politics => "politics",
            Category::Hospitality => "hospitality",
            Category::General => "general",
        }
    }

    /// `general` applies no category filter.
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, Category::General)
    }

    /// Whether an article tagged `other` belongs in a listing for `self`.
    pub fn admits(&self, other: Category) -> bool {
        self.is_unfiltered() || *self == other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farming" => Ok(Category::Farming),
            "tech" => Ok(Category::Tech),
            "politics" => Ok(Category::Politics),
            "hospitality" => Ok(Category::Hospitality),
            "general" => Ok(Category::General),
            other => Err(Error::InvalidCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(Error::InvalidValue(format!("unknown sentiment: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

impl FromStr for Importance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Importance::Low),
            "medium" => Ok(Importance::Medium),
            "high" => Ok(Importance::High),
            other => Err(Error::InvalidValue(format!("unknown importance: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("tech".parse::<Category>().unwrap(), Category::Tech);
        assert_eq!(" Farming ".parse::<Category>().unwrap(), Category::Farming);
        assert!("sports".parse::<Category>().is_err());
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_general_admits_everything() {
        assert!(Category::General.admits(Category::Politics));
        assert!(Category::Tech.admits(Category::Tech));
        assert!(!Category::Tech.admits(Category::Farming));
    }

    #[test]
    fn test_article_wire_format() {
        let json = serde_json::json!({
            "id": "1",
            "title": "Drip irrigation startup raises seed round",
            "url": "https://example.com/a",
            "publishedAt": "2024-03-01T10:00:00Z",
            "source": "Example",
            "category": "farming",
            "summary": ["one", "two", "three", "four"],
            "sentiment": "positive"
        });
        let article: Article = serde_json::from_value(json).unwrap();
        assert_eq!(article.importance, Importance::Medium);
        assert_eq!(article.normalized().summary.len(), MAX_SUMMARY_POINTS);
    }
}
