//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Loads a session or reads files through the library
//! 3. Formats and displays output
//!
//! Handlers that merge definitions report skipped files as warnings; other
//! merge diagnostics are logged at debug level by the manager.

mod add;
mod completion;
mod info;
mod list;
mod paths;
mod planes;
mod resolve;
mod validate;

pub use add::{add_aov, add_group};
pub use completion::completion;
pub use info::info;
pub use list::list;
pub use paths::paths;
pub use planes::planes;
pub use resolve::resolve;
pub use validate::validate;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;
use crate::manager::{Diagnostic, Session};
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Paths => paths::paths(ctx),
        Command::List { groups } => list::list(ctx, groups),
        Command::Info { name } => info::info(ctx, &name),
        Command::Resolve { tokens } => resolve::resolve(ctx, &tokens),
        Command::Validate { files } => validate::validate(ctx, &files),
        Command::Planes {
            tokens,
            auto,
            scene,
            time,
        } => planes::planes(ctx, tokens.as_deref(), auto, scene.as_deref(), time),
        Command::AddAov(args) => add::add_aov(ctx, &args),
        Command::AddGroup(args) => add::add_group(ctx, &args),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load a session and warn about files that were skipped.
fn loaded_session(ctx: &Context) -> Result<Session> {
    let mut session = ctx.session()?;
    let report = session.reload();

    for diagnostic in &report.diagnostics {
        if let Diagnostic::FileSkipped { .. } = diagnostic {
            output::warn(diagnostic, ctx.verbosity());
        }
    }

    Ok(session)
}
