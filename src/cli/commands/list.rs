//! list command - List merged AOVs or groups

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

use super::loaded_session;

fn source(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

/// List AOVs (variable, type, channel, source) or groups (name, members, source).
pub fn list(ctx: &Context, groups: bool) -> Result<()> {
    let mut session = loaded_session(ctx)?;
    let manager = session.manager();

    let rows: Vec<Vec<String>> = if groups {
        manager
            .groups()
            .map(|group| {
                vec![
                    format!("@{}", group.name()),
                    group.includes().join(" "),
                    source(group.path()),
                ]
            })
            .collect()
    } else {
        manager
            .aovs()
            .map(|aov| {
                vec![
                    aov.variable().to_string(),
                    aov.vextype().to_string(),
                    aov.channel().to_string(),
                    source(aov.path()),
                ]
            })
            .collect()
    };

    if rows.is_empty() {
        output::print(
            if groups { "No groups defined." } else { "No AOVs defined." },
            ctx.verbosity(),
        );
        return Ok(());
    }

    output::result(output::format_columns(&rows));
    Ok(())
}
