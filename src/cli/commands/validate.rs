//! validate command - Check definition files for errors

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::reader::read_file;
use crate::ui::output;

/// Read each file and report whether it loads.
///
/// Fails if any file does not.
pub fn validate(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;

    for path in files {
        match read_file(path) {
            Ok(contents) => output::print(
                format!(
                    "ok: {} ({} aovs, {} groups)",
                    path.display(),
                    contents.aovs.len(),
                    contents.groups.len()
                ),
                ctx.verbosity(),
            ),
            Err(e) => {
                failed += 1;
                output::error(e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) failed validation", failed, files.len());
    }
    Ok(())
}
