use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::{
    analysis::{resolver::SetResolver, sets::analyze_sets},
    export::source::{CsvSessionSource, SessionSource},
};

use super::output::set_report::{print_set_report, print_set_report_json};

pub const DEFAULT_CATEGORY: &str = "civil 総則";

#[derive(Debug, Parser)]
pub struct SetsCommand {
    #[arg(help = "Path to the time tracking CSV export")]
    csv_file: PathBuf,
    #[arg(
        long,
        short,
        default_value = DEFAULT_CATEGORY,
        help = "Category whose sessions are split into study sets"
    )]
    category: String,
    #[arg(
        long,
        help = "Leave sessions before the first numbered lecture unassigned instead of putting them into set 1"
    )]
    strict_start: bool,
    #[arg(long, help = "Print the report as JSON")]
    json: bool,
}

/// Command to process `sets` command. Splits sessions of a single category into study sets and
/// prints how much time every set took.
pub async fn process_sets_command(command: SetsCommand) -> Result<()> {
    let source = CsvSessionSource::new(command.csv_file.clone());
    let mut out = std::io::stdout().lock();
    run_sets(&command, &source, &mut out).await
}

async fn run_sets(
    SetsCommand {
        csv_file,
        category,
        strict_start,
        json,
    }: &SetsCommand,
    source: &impl SessionSource,
    out: &mut impl Write,
) -> Result<()> {
    let records = source.load().await?;

    let resolver = if *strict_start {
        SetResolver::strict()
    } else {
        SetResolver::new()
    };
    let report = analyze_sets(records, category, resolver);

    if *json {
        print_set_report_json(out, &report)
    } else {
        print_set_report(out, &csv_file.display().to_string(), &report)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::{run_sets, SetsCommand};
    use crate::{export::source::CsvSessionSource, utils::logging::TEST_LOGGING};

    const EXPORT: &str = "\
Category,Duration,Start,Notes
civil 総則,20 min,2025-02-03 08:00:00,Anki
civil 総則,1 hr 30 min,2025-02-03 09:00:00,4
civil 総則,45 min,2025-02-04 09:00:00,短答
constitution basic,2 hrs,2025-02-04 11:00:00,1
";

    async fn run(args: &[&str]) -> Result<String> {
        *TEST_LOGGING;
        let mut file = NamedTempFile::new()?;
        file.write_all(EXPORT.as_bytes())?;
        let path = file.path().to_string_lossy().to_string();

        let mut argv = vec!["sets", path.as_str()];
        argv.extend_from_slice(args);
        let command = SetsCommand::try_parse_from(argv)?;

        let mut out = vec![];
        run_sets(&command, &CsvSessionSource::new(file.path().into()), &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[tokio::test]
    async fn prints_report_for_default_category() -> Result<()> {
        let text = run(&[]).await?;
        assert!(text.contains("Category: civil 総則"));
        assert!(text.contains("Total:      3"));
        assert!(text.contains("Set 1 (units 1-3):"));
        assert!(text.contains("Set 2 (units 4-6):"));
        Ok(())
    }

    #[tokio::test]
    async fn strict_start_leaves_first_review_unassigned() -> Result<()> {
        let text = run(&["--strict-start"]).await?;
        assert!(text.contains("Unassigned: 1"));
        assert!(!text.contains("Set 1 (units 1-3):"));
        Ok(())
    }

    #[tokio::test]
    async fn other_category() -> Result<()> {
        let text = run(&["--category", "constitution basic", "--json"]).await?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value["total_sessions"], 1);
        assert_eq!(value["sets"][0]["lecture"], 2.0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_error() -> Result<()> {
        let command = SetsCommand::try_parse_from(["sets", "missing.csv"])?;
        let mut out = vec![];
        let result = run_sets(
            &command,
            &CsvSessionSource::new("missing.csv".into()),
            &mut out,
        )
        .await;
        assert!(result.is_err());
        Ok(())
    }
}
