//! completion command - Generate shell completion scripts

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::cli::args::{Cli, Shell};

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &bin, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &bin, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, &bin, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &bin, out),
    }
}

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    write_completion(shell, &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_names_subcommands() {
        let mut buf = Vec::new();
        write_completion(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).expect("utf8");
        assert!(script.contains("add-aov"));
        assert!(script.contains("planes"));
    }
}
