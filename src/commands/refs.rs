//! `affected-projects refs` - Show the base/head pair a run would diff

use super::affected::RefsInput;
use crate::core::error::RailResult;

/// Run the refs command
pub fn run_refs(input: RefsInput, json: bool) -> RailResult<()> {
  let refs = input.resolve()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&refs)?);
  } else {
    println!("base: {}", refs.base);
    println!("head: {}", refs.head);
    println!("ignore: {}", refs.ignore.join(" "));
  }

  Ok(())
}
