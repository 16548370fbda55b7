//! `schemalint passes` command: list the registered analysis passes

use anyhow::Result;
use sl_analysis::PassManager;

/// Execute the passes command
pub fn execute() -> Result<()> {
    let manager = PassManager::with_defaults();
    let entries = manager.describe();
    let name_w = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(4).max(4);

    println!("{:<name_w$}  DESCRIPTION", "PASS");
    for (name, description) in entries {
        println!("{name:<name_w$}  {description}");
    }
    Ok(())
}
