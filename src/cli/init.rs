//! CLI command for scaffolding a playbooks directory.

use crate::config::BrieferConfig;
use crate::setup::{self, InitReport};
use std::io::{self, Write};
use std::path::Path;

/// Writes the scaffolding report as human-readable output.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_report<W: Write>(writer: &mut W, dir: &Path, report: &InitReport) -> io::Result<()> {
    writeln!(writer, "Initialized playbooks directory: {}", dir.display())?;

    for path in &report.created {
        let name = path.strip_prefix(dir).unwrap_or(path);
        writeln!(writer, "  created {}", name.display())?;
    }
    for path in &report.skipped {
        let name = path.strip_prefix(dir).unwrap_or(path);
        writeln!(writer, "  skipped {} (exists, use --force to overwrite)", name.display())?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Run 'briefer list' to see the available playbooks."
    )?;
    Ok(())
}

/// Executes the init command.
///
/// # Errors
///
/// Returns an error if the directory or starter files cannot be written.
pub fn cmd_init(config: &BrieferConfig, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let dir = config.playbooks_path(&cwd);
    let report = setup::init(&dir, force)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, &dir, &report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_write_report_relative_paths() {
        let report = InitReport {
            created: vec![PathBuf::from("/work/playbooks/README.md")],
            skipped: vec![PathBuf::from("/work/playbooks/system/base-directives.yml")],
        };

        let mut buffer = Vec::new();
        write_report(&mut buffer, Path::new("/work/playbooks"), &report).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("Initialized playbooks directory: /work/playbooks"));
        assert!(output.contains("  created README.md"));
        assert!(output.contains(
            "  skipped system/base-directives.yml (exists, use --force to overwrite)"
        ));
    }
}
