//! Two-level navigation index built from H1/H2 headings
//!
//! Every level-1 heading opens a [`TopicEntry`]; level-2 headings are appended
//! to the most recent one. The index feeds both the sidebar table of contents
//! and the search list.

use thiserror::Error;

/// One level-1 heading and the level-2 headings that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    /// Plain-text title of the level-1 heading
    pub title: String,
    /// Labels of the level-2 headings, in document order
    pub subtopics: Vec<String>,
}

/// Errors raised while appending to the navigation index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// A level-2 heading appeared before any level-1 heading
    #[error("Level-2 heading '{subtopic}' has no preceding level-1 heading")]
    Underflow {
        /// Label of the heading that could not be placed
        subtopic: String,
    },
}

/// Ordered index of topics for one render session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationIndex {
    entries: Vec<TopicEntry>,
}

impl NavigationIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new top-level entry with no subtopics
    pub fn push_topic(&mut self, title: impl Into<String>) {
        self.entries.push(TopicEntry {
            title: title.into(),
            subtopics: Vec::new(),
        });
    }

    /// Append a subtopic to the most recently pushed topic
    ///
    /// # Returns
    /// * `Ok(())` - The subtopic was recorded
    /// * `Err(NavigationError::Underflow)` - No topic exists yet; the index is unchanged
    pub fn push_subtopic(&mut self, subtopic: impl Into<String>) -> Result<(), NavigationError> {
        let subtopic = subtopic.into();
        match self.entries.last_mut() {
            Some(entry) => {
                entry.subtopics.push(subtopic);
                Ok(())
            }
            None => Err(NavigationError::Underflow { subtopic }),
        }
    }

    /// Entries in document order
    pub fn entries(&self) -> &[TopicEntry] {
        &self.entries
    }

    /// Whether no topic has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Anchor slug for a level-1 topic
///
/// The title is lower-cased. Route-style titles (`/users/{id}`) drop the
/// leading `/` and join the remaining segments with `-`.
pub fn topic_slug(title: &str) -> String {
    collapse_route(title.to_lowercase())
}

/// Anchor slug for a level-2 subtopic
///
/// Like [`topic_slug`], with spaces turned into `-` as well.
pub fn subtopic_slug(subtopic: &str) -> String {
    collapse_route(subtopic.to_lowercase().replace(' ', "-"))
}

fn collapse_route(slug: String) -> String {
    match slug.strip_prefix('/') {
        Some(rest) => rest.replace('/', "-"),
        None => slug,
    }
}
