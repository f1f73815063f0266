use anyhow::Result;

use crate::cli::{GlobalOpts, LsOpts};
use crate::commands::CommandSetup;
use crate::engine;

/// Run the ls command: print the links recorded for this repository.
///
/// # Errors
///
/// Returns an error if the repository cannot be located or the output
/// cannot be serialized.
pub fn run(global: &GlobalOpts, opts: &LsOpts) -> Result<()> {
    let setup = CommandSetup::init(global)?;
    let mut links = engine::recorded_links(
        &setup.cache_path,
        &setup.root,
        &setup.config.target_dir,
    );
    links.sort();

    if opts.json {
        let map: serde_json::Map<String, serde_json::Value> = links
            .into_iter()
            .map(|l| (l.path, serde_json::Value::String(l.content)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(map))?);
    } else {
        for link in links {
            println!("{} -> {}", link.path, link.content);
        }
    }
    Ok(())
}
