use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use labelscope::format;

#[derive(Args)]
pub struct CheckArgs {
    /// Label files to check
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Fail if any line was skipped
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let mut skipped_total = 0;

    for path in &args.files {
        let text = std::fs::read_to_string(path)?;
        let report = format::parse_report(&text);
        skipped_total += report.skipped_lines.len();

        println!(
            "{}: {} labels, {} skipped",
            path.display(),
            report.labels.len(),
            report.skipped_lines.len()
        );
        for line in &report.skipped_lines {
            println!("  line {}: {}", line, text.lines().nth(line - 1).unwrap_or(""));
        }
    }

    if args.strict && skipped_total > 0 {
        bail!("{} malformed lines", skipped_total);
    }
    Ok(())
}
