use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use weather_cards_core::{
    Board, ClearOutcome, Config, DeleteTrigger, FileSlot, FormInput, RepositoryError, StoreError,
    SubmitError, Validation,
};

use crate::form;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-cards", version, about = "Record weather observations as cards")]
pub struct Cli {
    /// Directory holding the card data, overriding the configured one.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a card from command-line fields.
    Add(CardArgs),

    /// Add cards through an interactive form.
    New,

    /// Show all cards, newest first.
    List {
        /// Print an HTML fragment instead of terminal text.
        #[arg(long)]
        html: bool,
    },

    /// Delete one card by id.
    Delete {
        /// Card id as shown by `list`.
        id: String,
    },

    /// Delete every card.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Keep the board on screen, refreshing relative times periodically.
    Watch {
        /// Refresh interval in seconds; defaults to the configured value.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Show or change the configuration.
    Configure {
        /// Print the current configuration and exit.
        #[arg(long)]
        show: bool,

        /// Default refresh interval for `watch`, in seconds.
        #[arg(long)]
        refresh_interval: Option<u64>,

        /// Whether `clear` asks before deleting.
        #[arg(long)]
        confirm_clear: Option<bool>,

        /// Directory holding the card data.
        #[arg(long = "set-data-dir")]
        set_data_dir: Option<PathBuf>,
    },
}

/// Raw form fields. Values are validated, not parsed, by clap.
#[derive(Debug, Args)]
pub struct CardArgs {
    #[arg(long)]
    pub city: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, default_value = "C")]
    pub unit: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub temperature: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub feels: String,
    #[arg(long, default_value = "")]
    pub condition: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub humidity: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub wind: String,
}

impl From<CardArgs> for FormInput {
    fn from(args: CardArgs) -> Self {
        FormInput {
            city: args.city,
            country: args.country,
            unit: args.unit,
            temperature: args.temperature,
            feels: args.feels,
            condition: args.condition,
            humidity: args.humidity,
            wind: args.wind,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        // `--data-dir` applies to this run only and is never saved.
        let session = match &self.data_dir {
            Some(dir) => {
                let mut session = config.clone();
                session.set_data_dir(dir);
                session
            }
            None => config.clone(),
        };

        match self.command {
            Command::Add(args) => {
                let mut board = open_board(&session)?;
                if submit(&mut board, &args.into())?.is_some() {
                    bail!("Submission rejected.");
                }
                print!("{}", board.render(Utc::now()));
            }
            Command::New => {
                let mut board = open_board(&session)?;
                run_form(&mut board)?;
            }
            Command::List { html } => {
                let board = open_board(&session)?;
                let view = board.render(Utc::now());
                if html {
                    print!("{}", view.to_html());
                } else {
                    print!("{view}");
                }
            }
            Command::Delete { id } => {
                let mut board = open_board(&session)?;
                let before = board.cards().len();
                let view = match DeleteTrigger::new(id.as_str()).fire(&mut board, Utc::now()) {
                    Ok(view) => view,
                    Err(e) => {
                        warn_not_saved(&e);
                        board.render(Utc::now())
                    }
                };
                if board.cards().len() == before {
                    eprintln!("No card with id '{id}'.");
                }
                print!("{view}");
            }
            Command::Clear { yes } => {
                let mut board = open_board(&session)?;
                let skip_prompt = yes || !session.confirm_clear;
                let outcome = board.clear(&mut |message: &str| skip_prompt || form::ask(message));
                match outcome {
                    Ok(ClearOutcome::NothingToClear) => println!("No cards to clear."),
                    Ok(ClearOutcome::Declined) => println!("Kept all cards."),
                    Ok(ClearOutcome::Cleared(n)) => println!("Cleared {n} card(s)."),
                    Err(e) => warn_not_saved(&e),
                }
            }
            Command::Watch { interval } => {
                let board = open_board(&session)?;
                let secs = interval.unwrap_or(session.refresh_interval_secs);
                if secs == 0 {
                    bail!("Refresh interval must be at least one second.");
                }
                watch(&board, Duration::from_secs(secs)).await?;
            }
            Command::Configure { show, refresh_interval, confirm_clear, set_data_dir } => {
                if !show {
                    if let Some(secs) = refresh_interval {
                        config.set_refresh_interval_secs(secs)?;
                    }
                    if let Some(confirm) = confirm_clear {
                        config.confirm_clear = confirm;
                    }
                    if let Some(dir) = set_data_dir {
                        config.set_data_dir(dir);
                    }
                    config.save()?;
                    println!("Saved {}", Config::config_file_path()?.display());
                }

                println!("data_dir = {}", config.data_dir()?.display());
                println!("refresh_interval_secs = {}", config.refresh_interval_secs);
                println!("confirm_clear = {}", config.confirm_clear);
            }
        }

        Ok(())
    }
}

fn open_board(config: &Config) -> Result<Board<FileSlot>> {
    let store = config.open_store().context("Failed to locate card storage")?;
    Ok(Board::open(store))
}

/// Submit one form. Returns the failed validation when it was rejected.
fn submit(board: &mut Board<FileSlot>, input: &FormInput) -> Result<Option<Validation>> {
    match board.submit(input, Utc::now()) {
        Ok(_) => Ok(None),
        Err(SubmitError::Invalid(validation)) => {
            eprintln!("Please fix the following:");
            form::print_errors(&validation);
            Ok(Some(validation))
        }
        Err(SubmitError::Repository(RepositoryError::Store(e))) => {
            warn_not_saved(&e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Interactive form loop. A rejected form is shown again with its values and
/// messages; an accepted one resets the form for the next card.
fn run_form(board: &mut Board<FileSlot>) -> Result<()> {
    let mut input = FormInput::default();
    let mut errors = None;

    loop {
        input = form::prompt_form(&input, errors.as_ref())?;

        errors = submit(board, &input)?;
        if errors.is_some() {
            continue;
        }

        println!();
        print!("{}", board.render(Utc::now()));

        if !form::ask("Add another card?") {
            return Ok(());
        }
        input = FormInput::default();
    }
}

async fn watch(board: &Board<FileSlot>, interval: Duration) -> Result<()> {
    redraw(&board.render(Utc::now()).to_string());

    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(view) = board.refresh(Utc::now()) {
                    redraw(&view.to_string());
                }
            }
            res = tokio::signal::ctrl_c() => {
                res.context("Failed to listen for Ctrl-C")?;
                return Ok(());
            }
        }
    }
}

fn redraw(text: &str) {
    // Clear screen and home the cursor.
    print!("\x1B[2J\x1B[H{text}");
}

fn warn_not_saved(err: &StoreError) {
    eprintln!("warning: changes apply to this session but could not be saved: {err}");
}
