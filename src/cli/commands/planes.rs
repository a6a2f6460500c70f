//! planes command - Emit plane blocks as IFD text

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::ifd::{add_aovs_to_ifd, IfdTextWriter, IfdWriter, LogReporter, NoHooks, StaticScene};

use super::loaded_session;

/// Expand `tokens` (or the scene's `auto_aovs`) and print the planes.
pub fn planes(
    ctx: &Context,
    tokens: Option<&str>,
    auto: bool,
    scene: Option<&Path>,
    time: f64,
) -> Result<()> {
    let camera = match scene {
        Some(path) => StaticScene::from_file(path)?,
        None => StaticScene::default(),
    };

    let mut session = loaded_session(ctx)?;
    let defaults = session.config().default_components().to_vec();
    let manager = session.manager();

    let stdout = std::io::stdout();
    let mut stream = IfdTextWriter::new(stdout.lock());
    let mut hooks = NoHooks;
    let mut reporter = LogReporter;
    let mut writer =
        IfdWriter::new(&mut stream, &mut hooks, &mut reporter).with_default_components(&defaults);

    let written = if auto {
        add_aovs_to_ifd(manager, &mut writer, &camera, time)
    } else {
        let elements = manager.get_aovs_from_string(tokens.unwrap_or_default());
        elements.iter().try_fold(0, |total, element| {
            writer
                .write_element(element, &camera, time)
                .map(|n| total + n)
        })
    }
    .context("Failed to write planes")?;

    tracing::info!(planes = written, "emitted planes");
    Ok(())
}
