//! Revision resolution
//!
//! Turns the trigger context of a CI run into the concrete `(base, head)`
//! pair to diff. Pull requests and pushes carry their own commit ids in the
//! event payload and always win over explicit input; every other trigger
//! (manual dispatch, schedules, local runs) must pass `--base`/`--head`.

use crate::core::error::{RailError, RailResult, RefsError, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Kind of change event that started the run, with the refs it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
  /// `pull_request` / `pull_request_target`: base and head commit of the PR
  PullRequest { base: Option<String>, head: Option<String> },
  /// `push`: commit before and after the push
  Push { before: Option<String>, after: Option<String> },
  /// Anything else; refs must be supplied explicitly
  Manual { name: String },
}

/// Subset of the GitHub event payload we read.
#[derive(Debug, Default, Deserialize)]
struct EventPayload {
  #[serde(default)]
  pull_request: Option<PullRequestPayload>,
  #[serde(default)]
  before: Option<String>,
  #[serde(default)]
  after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
  base: CommitRef,
  head: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
  #[serde(default)]
  sha: Option<String>,
}

impl ChangeEvent {
  /// Build an event from a trigger name and an optional JSON payload file.
  ///
  /// The payload is only read for pull request and push events.
  pub fn from_trigger(event_name: &str, payload_path: Option<&Path>) -> RailResult<Self> {
    match (event_name, payload_path) {
      ("pull_request" | "pull_request_target" | "push", Some(path)) => {
        let content = fs::read_to_string(path)
          .with_context(|| format!("Failed to read event payload from {}", path.display()))?;
        Self::from_payload_str(event_name, &content).with_context(|| format!("Invalid event payload in {}", path.display()))
      }
      ("pull_request" | "pull_request_target" | "push", None) => Ok(Self::from_payload(event_name, EventPayload::default())),
      (other, _) => Ok(ChangeEvent::Manual { name: other.to_string() }),
    }
  }

  /// Build an event from a trigger name and an in-memory JSON payload.
  pub fn from_payload_str(event_name: &str, payload: &str) -> RailResult<Self> {
    match event_name {
      "pull_request" | "pull_request_target" | "push" => Ok(Self::from_payload(event_name, Self::parse_payload(payload)?)),
      other => Ok(ChangeEvent::Manual { name: other.to_string() }),
    }
  }

  fn parse_payload(content: &str) -> RailResult<EventPayload> {
    Ok(serde_json::from_str(content)?)
  }

  fn from_payload(event_name: &str, payload: EventPayload) -> Self {
    if event_name == "push" {
      return ChangeEvent::Push {
        before: payload.before,
        after: payload.after,
      };
    }

    let (base, head) = match payload.pull_request {
      Some(pr) => (pr.base.sha, pr.head.sha),
      None => (None, None),
    };
    ChangeEvent::PullRequest { base, head }
  }

  /// Trigger name used in messages
  pub fn name(&self) -> &str {
    match self {
      ChangeEvent::PullRequest { .. } => "pull_request",
      ChangeEvent::Push { .. } => "push",
      ChangeEvent::Manual { name } => name,
    }
  }
}

/// Resolved revisions plus the normalized ignore list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Refs {
  pub base: String,
  pub head: String,
  pub ignore: Vec<String>,
}

/// Resolve the `(base, head)` pair for an event.
///
/// Fails with `MissingRefs` when the event needs explicit refs and one is
/// absent, or when any resolved ref is empty. The ignore list never fails:
/// see [`parse_ignore`].
pub fn resolve(
  event: &ChangeEvent,
  explicit_base: Option<&str>,
  explicit_head: Option<&str>,
  raw_ignore: Option<&str>,
) -> RailResult<Refs> {
  let missing = || {
    RailError::Refs(RefsError::MissingRefs {
      event: event.name().to_string(),
    })
  };

  let (base, head) = match event {
    ChangeEvent::PullRequest { base, head } => (base.clone(), head.clone()),
    ChangeEvent::Push { before, after } => (before.clone(), after.clone()),
    ChangeEvent::Manual { .. } => match (explicit_base, explicit_head) {
      (Some(base), Some(head)) => (Some(base.to_string()), Some(head.to_string())),
      _ => return Err(missing()),
    },
  };

  let base = base.map(|s| s.trim().to_string()).unwrap_or_default();
  let head = head.map(|s| s.trim().to_string()).unwrap_or_default();
  if base.is_empty() || head.is_empty() {
    return Err(missing());
  }

  let ignore = parse_ignore(raw_ignore);

  tracing::info!("Base: {}", base);
  tracing::info!("Head: {}", head);
  tracing::info!("Ignore: {:?}", ignore);

  Ok(Refs { base, head, ignore })
}

/// Parse a JSON array of project names, best effort.
///
/// Anything that is not a JSON array yields an empty list; non-string
/// elements are skipped. Never fails.
pub fn parse_ignore(raw: Option<&str>) -> Vec<String> {
  let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return Vec::new();
  };

  match serde_json::from_str::<serde_json::Value>(raw) {
    Ok(serde_json::Value::Array(items)) => items
      .into_iter()
      .filter_map(|item| match item {
        serde_json::Value::String(name) => Some(name),
        other => {
          tracing::warn!("Ignoring non-string entry in ignore list: {}", other);
          None
        }
      })
      .collect(),
    Ok(other) => {
      tracing::warn!("Ignore list is not a JSON array ({}), using empty list", other);
      Vec::new()
    }
    Err(e) => {
      tracing::warn!("Failed to parse ignore list '{}': {}, using empty list", raw, e);
      Vec::new()
    }
  }
}
