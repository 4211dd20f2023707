//! Projection of the card collection into a presentation tree.
//!
//! A [`BoardView`] is always derived from the full collection; there is no
//! incremental update. It can be written out as HTML or as terminal text.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::format::{
    DASH, Icon, escape_html, format_feels, format_humidity, format_temperature, format_wind,
    pick_icon, time_ago,
};
use crate::model::{Card, Unit};

pub const EMPTY_STATE: &str = "No weather cards yet. Add one to get started.";

/// Deletion control bound to one card's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTrigger {
    id: String,
}

impl DeleteTrigger {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Display strings for one card. Text is unescaped; escaping happens on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub icon: Icon,
    pub city: String,
    pub country: String,
    pub temperature: String,
    pub unit: Unit,
    pub feels: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
    pub last_updated: String,
    pub delete: DeleteTrigger,
}

impl CardView {
    pub fn new(card: &Card, now: DateTime<Utc>) -> Self {
        let wind = format_wind(card.unit, card.wind);

        Self {
            icon: pick_icon(&card.condition),
            city: card.city.clone(),
            country: card.country.clone(),
            temperature: format_temperature(card.temperature),
            unit: card.unit,
            feels: format_feels(card.unit, card.feels),
            condition: card.condition.clone(),
            humidity: format_humidity(card.humidity),
            wind: if wind.is_empty() { DASH.to_string() } else { wind },
            last_updated: time_ago(card.updated_at, now),
            delete: DeleteTrigger::new(card.id.clone()),
        }
    }

    pub fn id(&self) -> &str {
        self.delete.id()
    }
}

/// Full redraw of the card list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    Empty,
    Cards(Vec<CardView>),
}

impl BoardView {
    pub fn is_empty(&self) -> bool {
        matches!(self, BoardView::Empty)
    }

    pub fn cards(&self) -> &[CardView] {
        match self {
            BoardView::Empty => &[],
            BoardView::Cards(cards) => cards,
        }
    }

    /// HTML fragment for the card list.
    pub fn to_html(&self) -> String {
        Html(self).to_string()
    }
}

/// Build the view for `cards` as of `now`.
pub fn render(cards: &[Card], now: DateTime<Utc>) -> BoardView {
    if cards.is_empty() {
        return BoardView::Empty;
    }
    BoardView::Cards(cards.iter().map(|card| CardView::new(card, now)).collect())
}

struct Html<'a>(&'a BoardView);

impl fmt::Display for Html<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = match self.0 {
            BoardView::Empty => {
                return writeln!(
                    f,
                    r#"<p id="empty-state" class="empty-state">{}</p>"#,
                    escape_html(EMPTY_STATE)
                );
            }
            BoardView::Cards(cards) => cards,
        };

        writeln!(f, r#"<section id="cards" class="cards">"#)?;
        for card in cards {
            let id = escape_html(card.id());
            writeln!(f, r#"  <article class="card" data-id="{id}">"#)?;
            writeln!(f, r#"    <div class="card-left">"#)?;
            writeln!(
                f,
                r#"      <div class="icon-wrap" data-icon="{}">{}</div>"#,
                card.icon,
                card.icon.svg()
            )?;
            writeln!(f, r#"      <div class="card-main">"#)?;
            writeln!(f, r#"        <div class="city">{}</div>"#, escape_html(&card.city))?;
            writeln!(f, r#"        <div class="country">{}</div>"#, escape_html(&card.country))?;
            writeln!(f, "      </div>")?;
            writeln!(f, "    </div>")?;
            writeln!(f, r#"    <div class="card-right">"#)?;
            writeln!(
                f,
                r#"      <div class="temp">{}<span class="temp-unit">°{}</span></div>"#,
                escape_html(&card.temperature),
                card.unit
            )?;
            writeln!(f, r#"      <div class="metrics">"#)?;
            writeln!(f, r#"        <div class="metric">Feels: {}</div>"#, escape_html(&card.feels))?;
            writeln!(f, r#"        <div class="metric">{}</div>"#, escape_html(&card.condition))?;
            writeln!(
                f,
                r#"        <div class="metric">Humidity: {}</div>"#,
                escape_html(&card.humidity)
            )?;
            writeln!(f, r#"        <div class="metric">Wind: {}</div>"#, escape_html(&card.wind))?;
            writeln!(f, "      </div>")?;
            writeln!(f, r#"      <div class="card-controls">"#)?;
            writeln!(
                f,
                r#"        <div class="last-updated">Last updated: {}</div>"#,
                escape_html(&card.last_updated)
            )?;
            writeln!(f, r#"        <button class="delete-btn" data-id="{id}">Delete</button>"#)?;
            writeln!(f, "      </div>")?;
            writeln!(f, "    </div>")?;
            writeln!(f, "  </article>")?;
        }
        writeln!(f, "</section>")
    }
}

/// Plain terminal rendering.
impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = match self {
            BoardView::Empty => return writeln!(f, "{EMPTY_STATE}"),
            BoardView::Cards(cards) => cards,
        };

        for (i, card) in cards.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            let place = if card.country.is_empty() {
                card.city.clone()
            } else {
                format!("{}, {}", card.city, card.country)
            };
            writeln!(f, "[{}] {}  {}°{}", card.icon, place, card.temperature, card.unit)?;

            let mut metrics = vec![format!("Feels: {}", card.feels)];
            if !card.condition.is_empty() {
                metrics.push(card.condition.clone());
            }
            metrics.push(format!("Humidity: {}", card.humidity));
            metrics.push(format!("Wind: {}", card.wind));
            writeln!(f, "    {}", metrics.join(" | "))?;

            writeln!(f, "    Last updated: {}  (id: {})", card.last_updated, card.id())?;
        }
        Ok(())
    }
}
