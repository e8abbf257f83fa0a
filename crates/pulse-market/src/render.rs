//! Dashboard rendering
//!
//! Everything here is derived from a [`ViewState`]; nothing performs I/O.

use crate::gauge::{Band, DEFAULT_METER_WIDTH, Gauge};
use crate::model::AnalysisResult;
use crate::view::ViewState;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

pub const LOADING_TITLE: &str = "Gathering Intelligence...";
pub const LOADING_SUBTITLE: &str = "Scanning global news & financial reports via Gemini AI";
pub const OUTLOOK_PLACEHOLDER: &str =
    "Markets are reacting to today's news cycles. Please wait while we process details.";
pub const NO_SOURCES: &str = "No source links found for this query.";
pub const DISCLAIMER: &str = "Sentiment scores are generated from real-time search results \
    across global news and data. Not financial advice.";

/// Rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Emit ANSI colours for bands
    pub styled: bool,
    /// Table width in columns
    pub width: u16,
    /// Maximum number of sources listed
    pub max_sources: usize,
    /// Cells per gauge meter
    pub meter_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            styled: false,
            width: 100,
            max_sources: 10,
            meter_width: DEFAULT_METER_WIDTH,
        }
    }
}

/// Renders the dashboard as text
#[derive(Debug, Clone, Default)]
pub struct DashboardRenderer {
    options: RenderOptions,
}

impl DashboardRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Full screen for `state`
    pub fn render(&self, title: &str, state: &ViewState) -> String {
        if state.is_initial_loading() {
            return self.render_loading();
        }

        let mut sections = vec![self.render_header(title, state), Self::render_outlook(state)];

        if let Some(result) = &state.result {
            if !result.sentiments.is_empty() {
                sections.push(self.render_gauges(result));
                sections.push(self.render_details(result));
            }
            sections.push(self.render_sources(result));
        }

        sections.push(DISCLAIMER.to_string());

        if let Some(error) = &state.error {
            sections.push(Self::render_error(error));
        }

        sections.join("\n\n")
    }

    pub fn render_loading(&self) -> String {
        format!("⏳ {LOADING_TITLE}\n   {LOADING_SUBTITLE}")
    }

    fn render_header(&self, title: &str, state: &ViewState) -> String {
        let mut header = format!("📊 {title}");
        if !state.search_text.is_empty() {
            header.push_str(&format!("  |  🔍 {}", state.search_text));
        }
        if state.refreshing {
            header.push_str("  |  ⟳ refreshing...");
        }
        header
    }

    fn render_outlook(state: &ViewState) -> String {
        let Some(result) = &state.result else {
            return format!("🌐 LIVE GLOBAL OUTLOOK\n\"{OUTLOOK_PLACEHOLDER}\"");
        };

        let outlook = if result.global_outlook.trim().is_empty() {
            OUTLOOK_PLACEHOLDER
        } else {
            result.global_outlook.as_str()
        };

        let mut text = format!("🌐 LIVE GLOBAL OUTLOOK\n\"{outlook}\"\n");
        if let Some(query) = &result.query {
            text.push_str(&format!("Query: {query}  ·  "));
        }
        text.push_str(&format!(
            "🕒 Updated at {}  ·  Grounded Analysis",
            result.time_label()
        ));
        text
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(self.options.width);
        if self.options.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }

    fn band_cell(&self, text: String, band: Band) -> Cell {
        let cell = Cell::new(text);
        if self.options.styled {
            cell.fg(band.color()).add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }

    /// One gauge per sentiment, in result order
    pub fn render_gauges(&self, result: &AnalysisResult) -> String {
        let mut table = self.table();
        let row: Vec<Cell> = result
            .sentiments
            .iter()
            .map(|entry| {
                let gauge = Gauge::new(&entry.category, entry.score);
                self.band_cell(gauge.render(self.options.meter_width), gauge.band())
            })
            .collect();
        table.add_row(row);
        table.to_string()
    }

    /// Per-sector detail cards
    pub fn render_details(&self, result: &AnalysisResult) -> String {
        let mut table = self.table();
        table.set_header(vec!["Sector", "Confidence", "Summary", "Key Market Drivers"]);

        for entry in &result.sentiments {
            let band = Band::from_score(entry.score);
            let badge = match band.trend_icon() {
                Some(icon) => format!("{icon} {}% Confidence", entry.score),
                None => format!("{}% Confidence", entry.score),
            };
            let drivers = entry
                .key_drivers
                .iter()
                .map(|d| format!("[{d}]"))
                .collect::<Vec<_>>()
                .join(" ");

            table.add_row(vec![
                Cell::new(&entry.category).add_attribute(Attribute::Bold),
                self.band_cell(badge, band),
                Cell::new(&entry.summary),
                Cell::new(drivers),
            ]);
        }

        format!("▶ IN-DEPTH SECTOR ANALYSIS\n{table}")
    }

    /// Up to `max_sources` sources, or a single placeholder line
    pub fn render_sources(&self, result: &AnalysisResult) -> String {
        let mut text = String::from("▶ VERIFIED SOURCES");
        let sources = result.display_sources(self.options.max_sources);

        if sources.is_empty() {
            text.push('\n');
            text.push_str(NO_SOURCES);
            return text;
        }

        for (i, source) in sources.iter().enumerate() {
            text.push_str(&format!(
                "\n{:>2}. {}\n    ↗ {}  {}",
                i + 1,
                source.title,
                source.hostname(),
                source.uri
            ));
        }
        text
    }

    fn render_error(message: &str) -> String {
        format!("⚠ ANALYSIS ERROR: {message}\n  (type /dismiss to close)")
    }
}
