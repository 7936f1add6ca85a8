//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::RelayProbe;
    use super::super::text::TextFormatter;
    use dramabox_core::{CatalogItem, Episode, QualityVariant, StreamTarget};
    use dramabox_fetch::RelayKind;
    use std::time::Duration;

    fn item() -> CatalogItem {
        let mut item = CatalogItem::new("41000102", "The CEO's Secret Wife", "https://img/c.jpg")
            .with_tags(vec!["Romance".to_string(), "CEO".to_string()])
            .with_summary("She married him for a contract.");
        item.episode_count = Some(80);
        item.play_count_display = Some("18.3M".to_string());
        item
    }

    #[test]
    fn test_item_lines_without_colors() {
        let formatter = TextFormatter::new(false);
        let text = formatter.format_item(1, &item());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  1. The CEO's Secret Wife  41000102");
        assert_eq!(lines[1], "     80 eps · 18.3M plays · Romance, CEO");
        assert_eq!(lines[2], "     She married him for a contract.");
    }

    #[test]
    fn test_item_without_summaries() {
        let formatter = TextFormatter::new(false).without_summaries();
        assert_eq!(formatter.format_item(1, &item()).lines().count(), 2);
    }

    #[test]
    fn test_empty_listing_placeholder() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_items(&[]), "No results.");
    }

    #[test]
    fn test_listing_header() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_listing_header("Global Ranking", 2, true),
            "Global Ranking (2 pages, more available)"
        );
        assert_eq!(
            formatter.format_listing_header("Search", 1, false),
            "Search (1 page)"
        );
    }

    #[test]
    fn test_episode_line_marks_default_and_premium() {
        let mut episode = Episode::new("ch-3", 2, true);
        episode.quality_variants = vec![
            QualityVariant {
                quality: 720,
                stream_url: "https://v/720.mp4".to_string(),
                is_default: true,
            },
            QualityVariant {
                quality: 540,
                stream_url: "https://v/540.mp4".to_string(),
                is_default: false,
            },
        ];

        let line = TextFormatter::new(false).format_episode(&episode);
        assert_eq!(line, "EP   3  ch-3  720p*, 540p  [premium]");
    }

    #[test]
    fn test_stream_shows_one_based_episode() {
        let target = StreamTarget::new("41000102", 0, "https://v/master.m3u8")
            .with_poster(Some("https://img/p.jpg".to_string()));
        let text = TextFormatter::new(false).format_stream(&target);

        assert!(text.contains("episode 1"));
        assert!(text.contains("Kind:   HLS"));
        assert!(text.contains("Poster: https://img/p.jpg"));
    }

    #[test]
    fn test_relay_failure_in_red() {
        let probe = RelayProbe {
            id: "allorigins".to_string(),
            kind: RelayKind::Wrapped,
            ok: false,
            duration: Duration::from_millis(42),
            error: Some("HTTP 503".to_string()),
        };
        let line = TextFormatter::new(true).format_relay(&probe);
        assert!(line.contains("\x1b[31m✗"));
        assert!(line.contains("HTTP 503"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::RelayProbe;
    use super::super::json::JsonFormatter;
    use dramabox_core::{CatalogItem, Episode, StreamTarget};
    use dramabox_fetch::RelayKind;
    use serde_json::Value;
    use std::time::Duration;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_listing_fields() {
        let items = vec![CatalogItem::new("1", "A", "https://img/a.jpg")];
        let json = JsonFormatter::new(false)
            .format_listing("search", Some("ceo"), 2, false, &items)
            .unwrap();
        let value = parse(&json);

        assert_eq!(value["source"], "search");
        assert_eq!(value["keyword"], "ceo");
        assert_eq!(value["pages"], 2);
        assert_eq!(value["hasMore"], false);
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["coverUrl"], "https://img/a.jpg");
        assert!(value["fetchedAt"].is_string());
    }

    #[test]
    fn test_feed_listing_omits_keyword() {
        let json = JsonFormatter::new(false)
            .format_listing("trending", None, 1, true, &[])
            .unwrap();
        assert!(parse(&json).get("keyword").is_none());
    }

    #[test]
    fn test_stream_is_flattened() {
        let target = StreamTarget::new("41000102", 4, "https://v/e5.mp4");
        let value = parse(&JsonFormatter::new(true).format_stream(&target).unwrap());

        assert_eq!(value["seriesId"], "41000102");
        assert_eq!(value["episodeIndex"], 4);
        assert_eq!(value["episodeNumber"], 5);
        assert_eq!(value["kind"], "progressive");
    }

    #[test]
    fn test_episodes_count() {
        let episodes = vec![Episode::new("a", 0, false), Episode::new("b", 1, true)];
        let value = parse(
            &JsonFormatter::new(false)
                .format_episodes("s1", &episodes)
                .unwrap(),
        );
        assert_eq!(value["count"], 2);
        assert_eq!(value["episodes"][1]["isPremium"], true);
    }

    #[test]
    fn test_relay_probe_output() {
        let probes = vec![RelayProbe {
            id: "corsproxy".to_string(),
            kind: RelayKind::Direct,
            ok: true,
            duration: Duration::from_millis(120),
            error: None,
        }];
        let value = parse(&JsonFormatter::new(false).format_relays(&probes).unwrap());

        assert_eq!(value[0]["id"], "corsproxy");
        assert_eq!(value[0]["kind"], "Direct");
        assert_eq!(value[0]["durationMs"], 120);
        assert!(value[0].get("error").is_none());
    }
}
