use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use recurrence_core::config::RecurrenceConfig;

use crate::dates::parse_date;

pub fn run(
    data_path: &Path,
    config: &RecurrenceConfig,
    id: &str,
    date: &str,
    cleared: bool,
) -> Result<()> {
    let date = parse_date(date)?;

    let mut snapshot = super::require_snapshot(data_path)?;
    snapshot.set_cleared(id, date, cleared, config.day_overflow)?;
    super::save_snapshot(data_path, &snapshot)?;

    let description = snapshot
        .definition(id)
        .map(|d| d.to_string())
        .unwrap_or_default();
    let verb = if cleared { "Cleared" } else { "Uncleared" };
    println!("{}", format!("  {}: {} on {}", verb, description, date).green());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use recurrence_core::storage;

    const DATA: &str = "#version = 1\nEventDefinition\trent\tPay rent\t2024-01-01\tmonthly\t\n";

    #[test]
    fn clear_then_unclear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders");
        std::fs::write(&path, DATA).unwrap();
        let config = RecurrenceConfig::default();

        run(&path, &config, "rent", "2024-02-01", true).unwrap();
        let snapshot = storage::load(&path).unwrap();
        assert_eq!(snapshot.occurrences.len(), 1);
        assert!(snapshot.occurrences[0].cleared);

        run(&path, &config, "rent", "2024-02-01", false).unwrap();
        let snapshot = storage::load(&path).unwrap();
        assert_eq!(snapshot.occurrences.len(), 1);
        assert_eq!(
            snapshot.past_due(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).len(),
            1
        );
    }

    #[test]
    fn clearing_off_sequence_date_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reminders");
        std::fs::write(&path, DATA).unwrap();

        assert!(run(&path, &RecurrenceConfig::default(), "rent", "2024-02-02", true).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DATA);
    }

    #[test]
    fn clearing_without_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        assert!(run(&path, &RecurrenceConfig::default(), "rent", "2024-02-01", true).is_err());
        assert!(!path.exists());
    }
}
