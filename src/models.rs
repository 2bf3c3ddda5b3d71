//! Data models for hot-search topics and the product ideas derived from them.
//!
//! This module defines the core data structures used throughout the application:
//! - [`TopicRecord`]: One entry of the hot-search list (name + popularity)
//! - [`BackgroundRecord`]: Canned context attached to a topic
//! - [`IdeaRecord`]: The scored product concept produced for one topic
//! - [`Rating`] and [`RatingSummary`]: The three-tier verdict and its tallies
//!
//! All records are created once, passed down the pipeline and dropped after the
//! report has been written.

use serde::{Deserialize, Serialize};

/// Upper bound for the interest component of the score.
pub const MAX_INTERESTING_SCORE: u32 = 80;

/// Upper bound for the usefulness component of the score.
pub const MAX_USEFULNESS_SCORE: u32 = 20;

/// A single hot-search entry as delivered by the topic source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// The hot-search keyword as displayed on Weibo.
    pub name: String,
    /// Search heat; malformed upstream values are normalized to 0.
    pub popularity: u64,
}

impl TopicRecord {
    pub fn new(name: impl Into<String>, popularity: u64) -> Self {
        Self {
            name: name.into(),
            popularity,
        }
    }
}

/// Contextual narrative attached to a topic.
///
/// Produced by [`crate::background::resolve`]; every field is canned text
/// selected by keyword, never fetched from the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundRecord {
    /// One-paragraph description of the event.
    pub summary: String,
    /// Ordered milestones of the story so far.
    pub timeline: Vec<String>,
    /// Where the story currently stands.
    pub status: String,
    /// What people are arguing about.
    pub discussion_focus: Vec<String>,
    /// People and organizations involved.
    pub related_parties: Vec<String>,
}

/// Three-tier verdict derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Normal,
}

impl Rating {
    /// Map a total score to its tier.
    ///
    /// - `> 80` is [`Rating::Excellent`]
    /// - `60..=80` is [`Rating::Good`]
    /// - anything lower is [`Rating::Normal`]
    pub fn from_total(total: u32) -> Self {
        if total > 80 {
            Rating::Excellent
        } else if total >= 60 {
            Rating::Good
        } else {
            Rating::Normal
        }
    }

    /// Label shown in the report and the console.
    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "优秀",
            Rating::Good => "良好",
            Rating::Normal => "普通",
        }
    }

    /// CSS class used for the card border of this tier.
    pub fn css_class(self) -> &'static str {
        match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Normal => "normal",
        }
    }
}

/// A fully scored product idea for one hot-search topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub topic: String,
    pub popularity: u64,
    pub background: BackgroundRecord,
    pub product_name: String,
    pub core_features: Vec<String>,
    pub target_users: String,
    /// Interest score after the heat bonus, capped at [`MAX_INTERESTING_SCORE`].
    pub interesting_score: u32,
    pub usefulness_score: u32,
    /// Always `interesting_score + usefulness_score`.
    pub total_score: u32,
    pub rating: Rating,
    pub reason: String,
    pub monetization: Vec<String>,
}

/// Per-tier counts over a list of ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatingSummary {
    pub excellent: usize,
    pub good: usize,
    pub normal: usize,
}

impl RatingSummary {
    pub fn from_ideas(ideas: &[IdeaRecord]) -> Self {
        ideas
            .iter()
            .fold(RatingSummary::default(), |mut acc, idea| {
                match idea.rating {
                    Rating::Excellent => acc.excellent += 1,
                    Rating::Good => acc.good += 1,
                    Rating::Normal => acc.normal += 1,
                }
                acc
            })
    }

    pub fn total(&self) -> usize {
        self.excellent + self.good + self.normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(Rating::from_total(100), Rating::Excellent);
        assert_eq!(Rating::from_total(81), Rating::Excellent);
        assert_eq!(Rating::from_total(80), Rating::Good);
        assert_eq!(Rating::from_total(60), Rating::Good);
        assert_eq!(Rating::from_total(59), Rating::Normal);
        assert_eq!(Rating::from_total(0), Rating::Normal);
    }

    #[test]
    fn test_rating_labels() {
        assert_eq!(Rating::Excellent.label(), "优秀");
        assert_eq!(Rating::Good.label(), "良好");
        assert_eq!(Rating::Normal.label(), "普通");
        assert_eq!(Rating::Good.css_class(), "good");
    }

    #[test]
    fn test_topic_record_serialization() {
        let topic = TopicRecord::new("国考成绩查询", 500_000);
        let json = serde_json::to_string(&topic).unwrap();
        assert!(json.contains("国考成绩查询"));

        let back: TopicRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, topic);
    }

    #[test]
    fn test_rating_summary_counts() {
        let mk = |rating: Rating| IdeaRecord {
            topic: "t".to_string(),
            popularity: 0,
            background: BackgroundRecord {
                summary: String::new(),
                timeline: vec![],
                status: String::new(),
                discussion_focus: vec![],
                related_parties: vec![],
            },
            product_name: "p".to_string(),
            core_features: vec![],
            target_users: String::new(),
            interesting_score: 0,
            usefulness_score: 0,
            total_score: 0,
            rating,
            reason: String::new(),
            monetization: vec![],
        };
        let ideas = vec![
            mk(Rating::Excellent),
            mk(Rating::Good),
            mk(Rating::Good),
            mk(Rating::Normal),
        ];

        let summary = RatingSummary::from_ideas(&ideas);
        assert_eq!(summary.excellent, 1);
        assert_eq!(summary.good, 2);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.total(), ideas.len());
    }
}
