//! resolve command - Resolve a compact AOV string

use anyhow::Result;

use crate::cli::Context;
use crate::manager::flatten_list;
use crate::ui::output;

use super::loaded_session;

/// Print the unique AOV variables a compact string stands for.
pub fn resolve(ctx: &Context, tokens: &str) -> Result<()> {
    let mut session = loaded_session(ctx)?;
    let manager = session.manager();

    let elements = manager.get_aovs_from_string(tokens);
    let requested = tokens.replace(',', " ").split_whitespace().count();
    if elements.len() < requested {
        output::warn(
            format!("{} unknown name(s) ignored", requested - elements.len()),
            ctx.verbosity(),
        );
    }

    let variables: Vec<&str> = flatten_list(&elements)
        .into_iter()
        .map(|aov| aov.variable())
        .collect();
    if !variables.is_empty() {
        output::result(output::format_list(&variables, ""));
    }

    Ok(())
}
