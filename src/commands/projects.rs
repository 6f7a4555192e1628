//! `affected-projects projects` - Show what the workspace looks like
//!
//! Lists the discovered apps and libs plus every implicit-dependency entry,
//! i.e. exactly the inputs the affected analysis will work with.

use crate::core::context::WorkspaceContext;
use crate::core::error::RailResult;
use crate::graph::ImplicitDependencyEntry;
use serde_json::json;

/// Run the projects command
pub fn run_projects(ctx: &WorkspaceContext, json: bool) -> RailResult<()> {
  if json {
    println!("{}", render_json(ctx)?);
  } else {
    print!("{}", render_text(ctx));
  }
  Ok(())
}

fn render_json(ctx: &WorkspaceContext) -> RailResult<String> {
  let layout = ctx.layout();
  let output = json!({
      "workspace_layout": {
          "apps_dir": layout.apps_dir,
          "libs_dir": layout.libs_dir
      },
      "apps": ctx.catalog.apps,
      "libs": ctx.catalog.libs,
      "implicit_dependencies": ctx.implicit.entries()
  });
  Ok(serde_json::to_string_pretty(&output)?)
}

fn render_text(ctx: &WorkspaceContext) -> String {
  let layout = ctx.layout();
  let mut out = String::new();

  out.push_str(&format!("Apps ({}/): {}\n", layout.apps_dir, ctx.catalog.apps.len()));
  for app in ctx.catalog.apps.iter() {
    out.push_str(&format!("  📦 {}\n", app));
  }
  out.push('\n');

  out.push_str(&format!("Libs ({}/): {}\n", layout.libs_dir, ctx.catalog.libs.len()));
  for lib in ctx.catalog.libs.iter() {
    out.push_str(&format!("  📚 {}\n", lib));
  }
  out.push('\n');

  out.push_str("Implicit dependencies:\n");
  let entries = ctx.implicit.entries();
  if entries.is_empty() {
    out.push_str("  (none)\n");
  }
  for entry in entries {
    match entry {
      ImplicitDependencyEntry::Global { file } => out.push_str(&format!("  ⚙  {} → all projects\n", file)),
      ImplicitDependencyEntry::Keyed { key, projects } => {
        let projects: Vec<_> = projects.iter().collect();
        out.push_str(&format!("  ⬆  {} → {}\n", key, projects.join(", ")));
      }
    }
  }

  out
}
