//! Terminal stand-ins for the form, its error slots and the confirm dialog.

use anyhow::{Context, Result};
use inquire::{Confirm, Select, Text};
use weather_cards_core::{Field, FormInput, Validation};

const UNITS: [&str; 2] = ["C", "F"];

/// Print one line per failing field, in form order.
pub fn print_errors(validation: &Validation) {
    for (field, err) in validation.errors() {
        eprintln!("  {field}: {err}");
    }
}

/// Prompt for every field, pre-filled with `previous`.
///
/// Fields that failed the last validation pass show their message in the
/// prompt help line.
pub fn prompt_form(previous: &FormInput, errors: Option<&Validation>) -> Result<FormInput> {
    let help = |field: Field| errors.and_then(|v| v.error(field)).map(|e| e.to_string());

    let text = |label: &str, field: Field| -> Result<String> {
        let message = help(field);
        let mut prompt = Text::new(label).with_initial_value(previous.get(field));
        if let Some(message) = message.as_deref() {
            prompt = prompt.with_help_message(message);
        }
        prompt.prompt().with_context(|| format!("Failed to read {field}"))
    };

    let city = text("City:", Field::City)?;
    let country = text("Country:", Field::Country)?;

    let cursor = UNITS.iter().position(|u| *u == previous.unit.trim()).unwrap_or(0);
    let unit = Select::new("Unit:", UNITS.to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read unit")?
        .to_string();

    Ok(FormInput {
        city,
        country,
        unit,
        temperature: text("Temperature:", Field::Temperature)?,
        feels: text("Feels like:", Field::Feels)?,
        condition: text("Condition:", Field::Condition)?,
        humidity: text("Humidity (%):", Field::Humidity)?,
        wind: text("Wind:", Field::Wind)?,
    })
}

/// Yes/no question defaulting to "no". A failed prompt counts as "no".
pub fn ask(message: &str) -> bool {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "confirmation prompt failed");
            false
        }
    }
}
