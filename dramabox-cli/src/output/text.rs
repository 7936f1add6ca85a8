//! Text output formatting with colors.

use dramabox_core::{CatalogItem, Episode, StreamKind, StreamTarget};

use super::RelayProbe;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Maximum summary length shown under an item.
const SUMMARY_WIDTH: usize = 96;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    show_summaries: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            show_summaries: true,
        }
    }

    /// Hides item summaries.
    pub fn without_summaries(mut self) -> Self {
        self.show_summaries = false;
        self
    }

    /// Formats a listing header: "Global Ranking (2 pages, more available)".
    pub fn format_listing_header(&self, title: &str, pages: u32, has_more: bool) -> String {
        let pages = if pages == 1 {
            "1 page".to_string()
        } else {
            format!("{pages} pages")
        };
        let more = if has_more {
            self.dim(", more available")
        } else {
            String::new()
        };
        format!("{} ({pages}{more})", self.bold(title))
    }

    /// Formats one catalog item with its position in the listing.
    pub fn format_item(&self, position: usize, item: &CatalogItem) -> String {
        let mut lines = vec![format!(
            "{position:>3}. {}  {}",
            self.bold(&item.title),
            self.dim(&item.id)
        )];

        let mut facts = Vec::new();
        if let Some(count) = item.episode_count {
            facts.push(format!("{count} eps"));
        }
        if let Some(plays) = &item.play_count_display {
            facts.push(format!("{plays} plays"));
        }
        if let Some(score) = item.score {
            facts.push(self.yellow(&format!("★ {score:.1}")));
        }
        if !item.tags.is_empty() {
            facts.push(self.cyan(&item.tags.join(", ")));
        }
        if !facts.is_empty() {
            lines.push(format!("     {}", facts.join(" · ")));
        }

        if self.show_summaries {
            if let Some(summary) = item.summary.as_deref().filter(|s| !s.trim().is_empty()) {
                lines.push(format!("     {}", self.dim(&truncate(summary.trim(), SUMMARY_WIDTH))));
            }
        }

        lines.join("\n")
    }

    /// Formats a full item list, or a placeholder when it is empty.
    pub fn format_items(&self, items: &[CatalogItem]) -> String {
        if items.is_empty() {
            return self.dim("No results.");
        }
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.format_item(i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats one episode line: "EP   3  ch-3  720p*, 540p  [premium]".
    pub fn format_episode(&self, episode: &Episode) -> String {
        let qualities = if episode.quality_variants.is_empty() {
            self.dim("no variants")
        } else {
            episode
                .quality_variants
                .iter()
                .map(|v| {
                    if v.is_default {
                        format!("{}p*", v.quality)
                    } else {
                        format!("{}p", v.quality)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        let premium = if episode.is_premium {
            format!("  {}", self.yellow("[premium]"))
        } else {
            String::new()
        };

        format!(
            "EP {:>3}  {}  {qualities}{premium}",
            episode.number(),
            self.dim(&episode.id)
        )
    }

    /// Formats a resolved stream.
    pub fn format_stream(&self, target: &StreamTarget) -> String {
        let kind = match target.kind {
            StreamKind::Hls => self.green("HLS"),
            StreamKind::Progressive => self.cyan("Progressive"),
        };

        let mut lines = vec![
            format!(
                "{} {} episode {}",
                self.bold("Series"),
                target.series_id,
                target.episode_index + 1
            ),
            format!("Stream: {}", target.stream_url),
            format!("Kind:   {kind}"),
        ];
        if let Some(poster) = &target.poster_url {
            lines.push(format!("Poster: {}", self.dim(poster)));
        }
        lines.join("\n")
    }

    /// Formats one relay probe line.
    pub fn format_relay(&self, probe: &RelayProbe) -> String {
        let status = if probe.ok {
            self.green("✓")
        } else {
            self.red("✗")
        };
        let mut line = format!(
            "{status} {:<10} {:<17} {:>6}ms",
            probe.id,
            probe.kind.display_name(),
            probe.duration.as_millis()
        );
        if let Some(error) = &probe.error {
            line.push_str(&format!("  {}", self.red(error)));
        }
        line
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Shortens `text` to at most `width` characters, ending with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ============================================================================
// Tests
// ============================================================================
