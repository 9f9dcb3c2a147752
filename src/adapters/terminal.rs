use crate::core::{MapWidget, MessageKind, Renderer};
use crate::domain::model::{Instruction, KitItem, NewsArticle, Organization, Shelter};
use chrono::DateTime;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};

const MAX_NEWS: usize = 5;
const MAX_LOCATION_NEWS: usize = 3;
const DESCRIPTION_PREVIEW: usize = 120;

/// Groups by key, keeping groups in first-seen order.
fn group_by<'a, T>(items: &'a [T], key: impl Fn(&T) -> String) -> Vec<(String, Vec<&'a T>)> {
    let mut groups: Vec<(String, Vec<&T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(name, _)| *name == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(DESCRIPTION_PREVIEW).collect();
    format!("{}...", head)
}

fn format_articles(articles: &[NewsArticle], limit: usize, with_description: bool) -> String {
    let mut out = String::new();
    for article in articles.iter().take(limit) {
        let _ = writeln!(out, "  ⚠ {}", article.title.trim());
        let _ = writeln!(
            out,
            "    {} - {}",
            format_timestamp(&article.published_at),
            article.source.name
        );
        if with_description {
            if let Some(description) = article.description.as_deref().filter(|d| !d.is_empty()) {
                let _ = writeln!(out, "    {}", preview(description));
            }
        }
        let _ = writeln!(out, "    {}", article.url);
    }
    out
}

pub fn format_news(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "  No recent news alerts found.\n".to_string();
    }
    format_articles(articles, MAX_NEWS, true)
}

pub fn format_location_news(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "  No recent alerts found for this location.\n".to_string();
    }
    format_articles(articles, MAX_LOCATION_NEWS, false)
}

pub fn format_kit_items(items: &[KitItem]) -> String {
    if items.is_empty() {
        return "  No kit items available.\n".to_string();
    }

    let mut out = String::new();
    for (category, members) in group_by(items, |i| {
        i.category.clone().unwrap_or_else(|| "General".to_string())
    }) {
        let _ = writeln!(out, "  {}", category);
        for item in members {
            let _ = writeln!(out, "    ✓ {}", item.item_name);
            if let Some(description) = &item.description {
                let _ = writeln!(out, "      {}", description);
            }
        }
    }
    out
}

pub fn format_instructions(instructions: &[Instruction]) -> String {
    if instructions.is_empty() {
        return "  No instructions available.\n".to_string();
    }

    let mut out = String::new();
    for (disaster_type, members) in group_by(instructions, |i| {
        i.disaster_type.clone().unwrap_or_else(|| "General".to_string())
    }) {
        let _ = writeln!(out, "  {}", capitalize(&disaster_type));
        for instruction in members {
            let _ = writeln!(out, "    ▸ {}", instruction.title);
            let _ = writeln!(out, "      {}", instruction.content);
        }
    }
    out
}

pub fn format_organizations(organizations: &[Organization]) -> String {
    if organizations.is_empty() {
        return "  No organizations found.\n".to_string();
    }

    let mut out = String::new();
    for (org_type, members) in group_by(organizations, |o| {
        o.org_type.clone().unwrap_or_else(|| "Other".to_string())
    }) {
        let _ = writeln!(out, "  {} Organizations", capitalize(&org_type));
        for org in members {
            let _ = writeln!(out, "    ● {}", org.name);
            if let Some(description) = &org.description {
                let _ = writeln!(out, "      {}", description);
            }
            let contacts = [
                ("phone", &org.contact),
                ("email", &org.email),
                ("web", &org.website),
                ("address", &org.address),
            ];
            for (label, value) in contacts {
                if let Some(value) = value {
                    let _ = writeln!(out, "      {}: {}", label, value);
                }
            }
        }
    }
    out
}

pub fn format_shelters(shelters: &[Shelter]) -> String {
    if shelters.is_empty() {
        return "  No shelters to show on the map.\n".to_string();
    }

    let mut out = String::new();
    for shelter in shelters {
        let _ = writeln!(
            out,
            "  📍 {} ({:.4}, {:.4}) [{}] capacity {} people",
            shelter.name,
            shelter.latitude,
            shelter.longitude,
            if shelter.is_open { "Open" } else { "Closed" },
            shelter.capacity
        );
    }
    out
}

/// Prints each section to stdout; notifications go to stderr.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TerminalRenderer {
    fn render_news(&self, articles: &[NewsArticle]) {
        println!("📰 Latest alerts\n{}", format_news(articles));
    }

    fn render_location_news(&self, articles: &[NewsArticle]) {
        println!("📍 Local alerts\n{}", format_location_news(articles));
    }

    fn render_kit_items(&self, items: &[KitItem]) {
        println!("🎒 Emergency kit\n{}", format_kit_items(items));
    }

    fn render_instructions(&self, instructions: &[Instruction]) {
        println!("📋 Safety instructions\n{}", format_instructions(instructions));
    }

    fn render_organizations(&self, organizations: &[Organization]) {
        println!("🤝 Recovery organizations\n{}", format_organizations(organizations));
    }

    fn show_message(&self, message: &str, kind: MessageKind) {
        match kind {
            MessageKind::Success => eprintln!("✅ {}", message),
            MessageKind::Error => eprintln!("❌ {}", message),
        }
    }

    fn set_loading(&self, loading: bool) {
        if loading {
            eprintln!("⏳ Loading...");
        }
    }
}

/// Text stand-in for the shelter map.
#[derive(Debug, Default)]
pub struct TerminalMap {
    markers: Mutex<Vec<Shelter>>,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_count(&self) -> usize {
        self.markers().len()
    }

    fn markers(&self) -> MutexGuard<'_, Vec<Shelter>> {
        self.markers.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Marker list lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl MapWidget for TerminalMap {
    fn init_map(&self) {
        tracing::debug!("Map initialized");
    }

    fn add_shelter_markers(&self, shelters: &[Shelter]) {
        {
            let mut markers = self.markers();
            markers.clear();
            markers.extend_from_slice(shelters);
        }
        println!("🗺️ Shelters\n{}", format_shelters(shelters));
    }

    fn invalidate_map_size(&self) {
        tracing::debug!("Map size invalidated ({} markers)", self.marker_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NewsSource;

    fn article(title: &str, description: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: format!("https://example.com/{}", title),
            published_at: "2024-05-24T10:30:00Z".to_string(),
            source: NewsSource {
                name: "Example Times".to_string(),
            },
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_news_capped_at_five() {
        let articles: Vec<_> = (0..8).map(|i| article(&format!("a{}", i), None)).collect();
        let out = format_news(&articles);
        assert!(out.contains("a4"));
        assert!(!out.contains("a5"));
        assert!(out.contains("2024-05-24 10:30 - Example Times"));
    }

    #[test]
    fn test_location_news_capped_at_three() {
        let articles: Vec<_> = (0..5).map(|i| article(&format!("l{}", i), None)).collect();
        let out = format_location_news(&articles);
        assert!(out.contains("l2"));
        assert!(!out.contains("l3"));
    }

    #[test]
    fn test_description_preview_truncated() {
        let long = "x".repeat(300);
        let out = format_news(&[article("storm", Some(&long))]);
        assert!(out.contains(&format!("{}...", "x".repeat(120))));
        assert!(!out.contains(&"x".repeat(121)));
    }

    #[test]
    fn test_empty_states() {
        assert_eq!(format_news(&[]), "  No recent news alerts found.\n");
        assert_eq!(format_kit_items(&[]), "  No kit items available.\n");
        assert_eq!(format_organizations(&[]), "  No organizations found.\n");
    }

    #[test]
    fn test_kit_items_grouped_in_first_seen_order() {
        let items = vec![
            KitItem {
                item_name: "Torch".to_string(),
                category: Some("Tools".to_string()),
                description: None,
            },
            KitItem {
                item_name: "Water".to_string(),
                category: None,
                description: Some("4 litres per person".to_string()),
            },
            KitItem {
                item_name: "Radio".to_string(),
                category: Some("Tools".to_string()),
                description: None,
            },
        ];

        let out = format_kit_items(&items);
        let tools = out.find("Tools").unwrap();
        let general = out.find("General").unwrap();
        assert!(tools < general);
        assert!(out.find("Radio").unwrap() < general);
    }

    #[test]
    fn test_instruction_types_capitalized() {
        let out = format_instructions(&[Instruction {
            title: "Move to higher ground".to_string(),
            content: "Avoid walking through moving water".to_string(),
            disaster_type: Some("flood".to_string()),
        }]);
        assert!(out.starts_with("  Flood\n"));
    }

    #[test]
    fn test_map_replaces_markers() {
        let map = TerminalMap::new();
        let shelter = Shelter {
            name: "School".to_string(),
            latitude: 20.3,
            longitude: 85.8,
            capacity: 150,
            is_open: false,
        };

        map.add_shelter_markers(&[shelter.clone(), shelter.clone()]);
        map.add_shelter_markers(&[shelter]);
        assert_eq!(map.marker_count(), 1);
        assert!(format_shelters(&[]).contains("No shelters"));
    }

    #[test]
    fn test_map_recovers_from_poisoned_lock() {
        let map = std::sync::Arc::new(TerminalMap::new());
        let shelter = Shelter {
            name: "Stadium".to_string(),
            latitude: 20.28,
            longitude: 85.81,
            capacity: 800,
            is_open: true,
        };
        map.add_shelter_markers(&[shelter.clone()]);

        let poisoner = map.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.markers.lock().unwrap();
            panic!("poison the marker lock");
        })
        .join();
        assert!(map.markers.is_poisoned());

        assert_eq!(map.marker_count(), 1);
        map.add_shelter_markers(&[shelter.clone(), shelter]);
        assert_eq!(map.marker_count(), 2);
    }
}
