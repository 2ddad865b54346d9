//! The indexed unit: an identifier, free-text content, a tag set and a
//! popularity counter.

use crate::error::{Result, SearchError};
use crate::types::DocId;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};

/// Maximum identifier length, in characters.
pub const MAX_ID_LEN: usize = 256;
/// Maximum tag length, in characters.
pub const MAX_TAG_LEN: usize = 100;

/// A searchable document.
///
/// A `Document` validates itself on construction and on every mutation, so a
/// value that exists is always valid. The click counter is atomic and can be
/// bumped through a shared reference, which is how popularity is recorded for
/// documents already owned by an index.
///
/// # Examples
///
/// ```
/// use tagdex::document::Document;
///
/// let doc = Document::new("a", "red fox", ["animal"]).unwrap();
/// doc.increment_click_count();
/// assert_eq!(doc.click_count(), 1);
/// assert!(Document::new("", "content", Vec::<String>::new()).is_err());
/// ```
#[derive(Debug)]
pub struct Document {
  id: DocId,
  content: String,
  tags: BTreeSet<String>,
  click_count: AtomicU32,
}

impl Document {
  /// Creates a validated document.
  ///
  /// Fails with [`SearchError::Validation`] if the id or content is empty,
  /// the id exceeds [`MAX_ID_LEN`] characters, or any tag is empty or exceeds
  /// [`MAX_TAG_LEN`] characters.
  pub fn new<I, S>(id: impl Into<DocId>, content: impl Into<String>, tags: I) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let doc = Self {
      id: id.into(),
      content: content.into(),
      tags: tags.into_iter().map(Into::into).collect(),
      click_count: AtomicU32::new(0),
    };
    doc.validate()?;
    Ok(doc)
  }

  /// Checks every field.
  pub fn validate(&self) -> Result<()> {
    validate_id(&self.id)?;
    validate_content(&self.content)?;
    self.tags.iter().try_for_each(|tag| validate_tag(tag))
  }

  /// The immutable identifier.
  pub fn id(&self) -> &str {
    &self.id
  }

  /// The free-text content.
  pub fn content(&self) -> &str {
    &self.content
  }

  /// The tag set.
  pub fn tags(&self) -> &BTreeSet<String> {
    &self.tags
  }

  /// Whether the document carries `tag` (exact, case-sensitive).
  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.contains(tag)
  }

  /// Current popularity counter.
  pub fn click_count(&self) -> u32 {
    self.click_count.load(Ordering::Relaxed)
  }

  /// Replaces the content. Rejects empty content.
  pub fn set_content(&mut self, content: impl Into<String>) -> Result<()> {
    let content = content.into();
    validate_content(&content)?;
    self.content = content;
    Ok(())
  }

  /// Adds a tag. Rejects empty or over-long tags.
  pub fn add_tag(&mut self, tag: impl Into<String>) -> Result<()> {
    let tag = tag.into();
    validate_tag(&tag)?;
    self.tags.insert(tag);
    Ok(())
  }

  /// Removes a tag, returning whether it was present.
  pub fn remove_tag(&mut self, tag: &str) -> bool {
    self.tags.remove(tag)
  }

  pub fn increment_click_count(&self) {
    self.click_count.fetch_add(1, Ordering::Relaxed);
  }

  pub fn reset_click_count(&self) {
    self.click_count.store(0, Ordering::Relaxed);
  }

  /// Overwrites the counter, for hosts that track popularity out of band.
  pub fn set_click_count(&self, count: u32) {
    self.click_count.store(count, Ordering::Relaxed);
  }
}

impl Clone for Document {
  /// Clones the fields and snapshots the current click count.
  fn clone(&self) -> Self {
    Self {
      id: self.id.clone(),
      content: self.content.clone(),
      tags: self.tags.clone(),
      click_count: AtomicU32::new(self.click_count()),
    }
  }
}

impl PartialEq for Document {
  /// Documents compare by id, content and tags. Popularity is not identity.
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id && self.content == other.content && self.tags == other.tags
  }
}

impl Eq for Document {}

fn validate_id(id: &str) -> Result<()> {
  if id.is_empty() {
    return Err(SearchError::validation("document id cannot be empty"));
  }
  if id.chars().count() > MAX_ID_LEN {
    return Err(SearchError::validation(format!(
      "document id too long (max {MAX_ID_LEN} chars)"
    )));
  }
  Ok(())
}

fn validate_content(content: &str) -> Result<()> {
  if content.is_empty() {
    return Err(SearchError::validation("document content cannot be empty"));
  }
  Ok(())
}

fn validate_tag(tag: &str) -> Result<()> {
  if tag.is_empty() {
    return Err(SearchError::validation("tags cannot be empty"));
  }
  if tag.chars().count() > MAX_TAG_LEN {
    return Err(SearchError::validation(format!(
      "tag too long (max {MAX_TAG_LEN} chars): {tag}"
    )));
  }
  Ok(())
}
