//! Ordered keyword rule tables.
//!
//! Both the background resolver and the idea scorer classify a topic by
//! walking a fixed list of rules top to bottom. The first rule with a keyword
//! contained in the topic name wins, even when a later rule would also match.
//! Matching is case-insensitive: the topic is lowercased once per lookup and
//! table keywords are written in lowercase.

/// One entry of a rule table: a keyword set and the payload it selects.
///
/// Keywords must be lowercase.
#[derive(Debug)]
pub struct KeywordRule<P> {
    pub keywords: &'static [&'static str],
    pub payload: P,
}

impl<P> KeywordRule<P> {
    /// True if any keyword is a substring of the already-lowercased topic.
    pub fn matches(&self, lowered_topic: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| lowered_topic.contains(k))
    }
}

/// Return the payload of the first matching rule, or `None` if nothing matches.
pub fn first_match<'a, P>(rules: &'a [KeywordRule<P>], topic: &str) -> Option<&'a P> {
    let lowered = topic.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| &rule.payload)
}
