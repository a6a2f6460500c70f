//! info command - Show one AOV or group as JSON

use anyhow::{bail, Context as _, Result};
use serde_json::Value;

use crate::cli::Context;
use crate::manager::GROUP_PREFIX;
use crate::ui::output;

use super::loaded_session;

/// Print the definition of `name`, or of the group `@name`.
pub fn info(ctx: &Context, name: &str) -> Result<()> {
    let mut session = loaded_session(ctx)?;
    let manager = session.manager();

    let data = match name.strip_prefix(GROUP_PREFIX) {
        Some(group_name) => {
            let Some(group) = manager.get_group(group_name) else {
                bail!("No group named '{}'", group_name);
            };
            let mut data = group.to_data();
            data.insert("name".into(), group.name().into());
            if let Some(path) = group.path() {
                data.insert("path".into(), path.display().to_string().into());
            }
            data
        }
        None => {
            let Some(aov) = manager.get_aov(name) else {
                bail!("No aov named '{}'", name);
            };
            let mut data = aov.to_data();
            if let Some(path) = aov.path() {
                data.insert("path".into(), path.display().to_string().into());
            }
            data
        }
    };

    let text = serde_json::to_string_pretty(&Value::Object(data)).context("Failed to format")?;
    output::result(text);
    Ok(())
}
