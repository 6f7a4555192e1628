use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Set of names that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
  items: Vec<String>,
  seen: HashSet<String>,
}

impl OrderedSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert a name; returns false if it was already present.
  pub fn insert(&mut self, name: impl Into<String>) -> bool {
    let name = name.into();
    if self.seen.contains(&name) {
      return false;
    }
    self.seen.insert(name.clone());
    self.items.push(name);
    true
  }

  pub fn contains(&self, name: &str) -> bool {
    self.seen.contains(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.items.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn into_vec(self) -> Vec<String> {
    self.items
  }
}

impl<S: Into<String>> Extend<S> for OrderedSet {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    for name in iter {
      self.insert(name);
    }
  }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    let mut set = Self::new();
    set.extend(iter);
    set
  }
}

impl Serialize for OrderedSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.items.serialize(serializer)
  }
}
