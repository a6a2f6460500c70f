//! add-aov / add-group commands - Write new definitions to a file

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::cli::args::{AddAovArgs, AddGroupArgs};
use crate::cli::Context;
use crate::core::aov::Aov;
use crate::core::group::AovGroup;
use crate::core::naming::{is_valid_file_path, is_valid_name};
use crate::core::writer::AovWriter;
use crate::ui::output;

fn check_target(name: &str, file: &Path) -> Result<()> {
    if !is_valid_name(name) {
        bail!(
            "Invalid name '{}': use letters, digits and underscores only",
            name
        );
    }
    if !is_valid_file_path(file) {
        bail!(
            "Invalid file path '{}': expected a directory, a file name and an extension",
            file.display()
        );
    }
    Ok(())
}

/// Build the AOV described by `args`.
pub fn build_aov(args: &AddAovArgs) -> Aov {
    let mut builder = Aov::builder(args.variable.clone(), args.vextype)
        .componentexport(args.componentexport)
        .components(args.components.iter().cloned());

    if let Some(channel) = &args.channel {
        builder = builder.channel(channel.clone());
    }
    if let Some(quantize) = args.quantize {
        builder = builder.quantize(quantize);
    }
    if let Some(sfilter) = args.sfilter {
        builder = builder.sfilter(sfilter);
    }
    if let Some(pfilter) = &args.pfilter {
        builder = builder.pfilter(pfilter.clone());
    }
    if let Some(planefile) = &args.planefile {
        builder = builder.planefile(planefile.clone());
    }
    if let Some(lightexport) = args.lightexport {
        builder = builder.lightexport(lightexport);
    }
    if let Some(scope) = &args.lightexport_scope {
        builder = builder.lightexport_scope(scope.clone());
    }
    if let Some(select) = &args.lightexport_select {
        builder = builder.lightexport_select(select.clone());
    }
    if let Some(comment) = &args.comment {
        builder = builder.comment(comment.clone());
    }
    if let Some(priority) = args.priority {
        builder = builder.priority(priority);
    }

    builder.build()
}

/// Add an AOV definition to a file.
pub fn add_aov(ctx: &Context, args: &AddAovArgs) -> Result<()> {
    check_target(&args.variable, &args.file)?;

    let mut writer = AovWriter::new();
    writer.add_aov(&build_aov(args));
    writer
        .write_to_file(&args.file)
        .context("Failed to write definition")?;

    output::print(
        format!("Added aov '{}' to {}", args.variable, args.file.display()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Build the group described by `args`.
pub fn build_group(args: &AddGroupArgs) -> Result<AovGroup> {
    if let Some(bad) = args.includes.iter().find(|name| !is_valid_name(name)) {
        bail!("Invalid include '{}'", bad);
    }

    let mut group = AovGroup::new(args.name.clone());
    group.set_includes(args.includes.iter().cloned());
    if let Some(comment) = &args.comment {
        group.set_comment(comment.clone());
    }
    if let Some(icon) = &args.icon {
        group.set_icon(icon.clone());
    }
    if let Some(priority) = args.priority {
        group.set_priority(priority);
    }
    Ok(group)
}

/// Add a group definition to a file.
pub fn add_group(ctx: &Context, args: &AddGroupArgs) -> Result<()> {
    check_target(&args.name, &args.file)?;

    let mut writer = AovWriter::new();
    writer.add_group(&build_group(args)?);
    writer
        .write_to_file(&args.file)
        .context("Failed to write group")?;

    output::print(
        format!("Added group '@{}' to {}", args.name, args.file.display()),
        ctx.verbosity(),
    );
    Ok(())
}
