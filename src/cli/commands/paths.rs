//! paths command - List discovered definition files

use anyhow::Result;

use crate::cli::Context;
use crate::core::paths::find_aov_files;
use crate::ui::output;

/// Print definition files in merge order.
pub fn paths(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    let files = find_aov_files(&config.search());

    if files.is_empty() {
        output::warn(
            format!(
                "no definition files found (set ${} or pass --path)",
                config.path_env()
            ),
            ctx.verbosity(),
        );
    }

    for file in files {
        output::result(file.display());
    }

    Ok(())
}
