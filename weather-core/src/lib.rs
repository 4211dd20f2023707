//! Core library for the weather cards board.
//!
//! This crate defines:
//! - The card model and form validation
//! - Persistence of the card collection in a key-value slot
//! - The newest-first card repository
//! - Formatting and rendering of cards as HTML or terminal text
//! - Configuration handling
//!
//! It is used by `weather-cards-cli`, but can also be embedded by other front-ends.

pub mod board;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod render;
pub mod repository;
pub mod store;
pub mod validate;

pub use board::{Board, SubmitError};
pub use config::Config;
pub use error::{FieldError, RepositoryError, StoreError};
pub use format::{Icon, escape_html, format_wind, pick_icon, time_ago};
pub use model::{Card, Unit};
pub use render::{BoardView, CardView, DeleteTrigger, render};
pub use repository::{CLEAR_PROMPT, CardRepository, ClearOutcome, Confirm};
pub use store::{CARDS_KEY, CardStore, FileSlot, MemorySlot, Slot};
pub use validate::{Field, FormInput, Validation, validate};
