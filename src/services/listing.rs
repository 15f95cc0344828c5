use crate::domain::{Container, RegistryError};
use chrono::DateTime;
use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Layout of the engine's `CreatedAt` field, e.g. `2024-03-05 14:07:09 +0100 CET`.
const CREATED_AT_LAYOUT: &str = "%Y-%m-%d %H:%M:%S %z %Z";
const DISPLAY_LAYOUT: &str = "%Y-%m-%d %H:%M";

const HEADERS: [&str; 5] = ["Container name", "Project", "Service", "State", "Created at"];

/// Parses every record before anything is rendered; one bad record fails the batch.
pub fn parse_containers<S: AsRef<str>>(records: &[S]) -> Result<Vec<Container>, RegistryError> {
    records
        .iter()
        .map(|record| {
            let record = record.as_ref();
            Container::from_json(record).map_err(|source| RegistryError::Parse {
                record: record.to_string(),
                source,
            })
        })
        .collect()
}

/// Reformats `CreatedAt` to minute precision, returning the input untouched
/// when it does not match the engine layout.
pub fn format_created_at(raw: &str) -> String {
    match DateTime::parse_from_str(raw.trim(), CREATED_AT_LAYOUT) {
        Ok(parsed) => parsed.format(DISPLAY_LAYOUT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn state_cell(state: &str, color: bool) -> String {
    if color && state == "running" {
        state.green().to_string()
    } else {
        state.to_string()
    }
}

fn header_cell(title: &str, color: bool) -> String {
    if color {
        title.bold().to_string()
    } else {
        title.to_string()
    }
}

/// Renders a left-aligned table, one row per container, with a header row.
pub fn render_containers(containers: &[Container], color: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(HEADERS.map(|title| header_cell(title, color)));

    for c in containers {
        builder.push_record([
            c.name.clone(),
            c.project_name().to_string(),
            c.service_name().to_string(),
            state_cell(&c.state, color),
            format_created_at(&c.created_at),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::blank());
    table.to_string()
}
