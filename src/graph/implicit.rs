//! Implicit-dependency table
//!
//! Two kinds of entries come out of the workspace config:
//!
//! - **Global** entries: a file path (`nx.json`, `package.json`) whose change
//!   affects every project.
//! - **Keyed fan-out** entries: a key (normally a project name) and the set
//!   of projects that declared it in their `implicitDependencies`.
//!
//! The keyed entries also form a directed graph (`key → declaring project`)
//! used when fan-out is followed transitively.

use super::ordered_set::OrderedSet;
use crate::core::config::WorkspaceConfig;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// One implicit-dependency entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImplicitDependencyEntry {
  /// Changing this exact file affects every app and lib
  Global { file: String },
  /// Touching project `key` also affects every project in `projects`
  Keyed { key: String, projects: OrderedSet },
}

/// Global files plus the keyed fan-out table. Built once per run.
#[derive(Debug, Clone, Default)]
pub struct ImplicitDependencies {
  global: OrderedSet,
  keys: Vec<String>,
  fan_out: HashMap<String, OrderedSet>,

  /// `key → declaring project`, nodes indexed in first-seen order
  graph: DiGraph<String, ()>,
  name_to_node: HashMap<String, NodeIndex>,
}

impl ImplicitDependencies {
  /// Build the table from a loaded workspace config.
  ///
  /// Every project's declared keys are grouped by key; the declaring
  /// projects accumulate in declaration order.
  pub fn from_config(config: &WorkspaceConfig) -> Self {
    let mut deps = Self::default();
    for file in config.global_files() {
      deps.add_global(file);
    }
    for (project, settings) in &config.projects {
      for key in &settings.implicit_dependencies {
        deps.add_dependent(key, project);
      }
    }
    deps
  }

  /// Register a global trigger file.
  pub fn add_global(&mut self, file: impl Into<String>) {
    self.global.insert(file);
  }

  /// Record that `project` is affected whenever `key` is touched.
  pub fn add_dependent(&mut self, key: &str, project: &str) {
    if !self.fan_out.contains_key(key) {
      self.keys.push(key.to_string());
    }
    self.fan_out.entry(key.to_string()).or_default().insert(project);

    let from = self.node(key);
    let to = self.node(project);
    if !self.graph.contains_edge(from, to) {
      self.graph.add_edge(from, to, ());
    }
  }

  fn node(&mut self, name: &str) -> NodeIndex {
    if let Some(idx) = self.name_to_node.get(name) {
      return *idx;
    }
    let idx = self.graph.add_node(name.to_string());
    self.name_to_node.insert(name.to_string(), idx);
    idx
  }

  /// True if `file` is exactly a global implicit-dependency path.
  pub fn is_global(&self, file: &str) -> bool {
    self.global.contains(file)
  }

  /// Projects that declared `key` directly (single hop).
  pub fn dependents(&self, key: &str) -> Vec<String> {
    self
      .fan_out
      .get(key)
      .map(|set| set.iter().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// Every project reachable from `key` through fan-out edges, excluding
  /// `key` itself. Ordered by first appearance in the table.
  ///
  /// `key` is always expanded; any other reached node only passes fan-out
  /// on when `expand(name)` holds.
  pub fn transitive_dependents(&self, key: &str, expand: impl Fn(&str) -> bool) -> Vec<String> {
    let Some(&start) = self.name_to_node.get(key) else {
      return Vec::new();
    };

    let mut reached: HashSet<NodeIndex> = HashSet::new();
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
      if node != start && !expand(&self.graph[node]) {
        continue;
      }
      for next in self.graph.neighbors(node) {
        if next != start && reached.insert(next) {
          queue.push_back(next);
        }
      }
    }

    let mut nodes: Vec<_> = reached.into_iter().collect();
    nodes.sort();
    nodes.into_iter().map(|idx| self.graph[idx].clone()).collect()
  }

  /// All entries: globals first, then keyed entries in first-seen key order.
  pub fn entries(&self) -> Vec<ImplicitDependencyEntry> {
    let globals = self
      .global
      .iter()
      .map(|file| ImplicitDependencyEntry::Global { file: file.to_string() });
    let keyed = self.keys.iter().map(|key| ImplicitDependencyEntry::Keyed {
      key: key.clone(),
      projects: self.fan_out.get(key).cloned().unwrap_or_default(),
    });
    globals.chain(keyed).collect()
  }
}
