use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use recurrence_core::{EventDefinition, Period, Recurrence};

use crate::dates::parse_date;
use crate::render::Render;

pub fn run(
    data_path: &Path,
    description: String,
    start: &str,
    every: Option<&str>,
    until: Option<&str>,
) -> Result<()> {
    let definition = build_definition(description, start, every, until)?;

    let mut snapshot = super::load_or_default(data_path)?;
    let definition = snapshot.add_definition(definition)?;
    super::save_snapshot(data_path, &snapshot)?;

    println!("{}", "  Added:".green());
    println!("  {}", definition.render());

    Ok(())
}

fn build_definition(
    description: String,
    start: &str,
    every: Option<&str>,
    until: Option<&str>,
) -> Result<EventDefinition> {
    if description.trim().is_empty() {
        anyhow::bail!("Description cannot be empty");
    }

    let start_date = parse_date(start)?;

    let recurrence = match every {
        Some(period) => {
            let period: Period = period.parse()?;
            let until = until.map(parse_date).transpose()?;
            if let Some(until) = until.filter(|u| *u < start_date) {
                anyhow::bail!("--until {} is before the start date {}", until, start_date);
            }
            Some(Recurrence::new(period, until))
        }
        None => None,
    };

    Ok(EventDefinition::new(
        uuid::Uuid::new_v4().to_string(),
        description,
        start_date,
        recurrence,
    ))
}
