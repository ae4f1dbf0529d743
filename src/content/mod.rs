//! Content Registry
//!
//! Static, human-authored text and settings for the family site: titles,
//! paragraphs, notices, modal copy, navigation buttons and tree settings.
//! Everything here is immutable for a page session.

mod contact;

pub use contact::{contact_message, ContactAction, ContactMessage, CONTACT_HEADER};

use serde::{Deserialize, Serialize};

/// Name of the tree module operation that expands a node
pub const LOAD_NEW_NODE: &str = "loadNewNode";

/// Name of the tree module operation that resets the view to the root
pub const RESET_VIEW_AND_ROOT: &str = "resetViewAndRoot";

/// Text projected into the home section and the two modals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    pub home_title: String,
    #[serde(default)]
    pub home_description: Vec<String>,
    #[serde(default)]
    pub recent_updates: Vec<String>,
    #[serde(default)]
    pub attention: Vec<String>,
    pub about: ModalContent,
    pub how_to_use: ModalContent,
}

/// Title and paragraphs of an informational modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalContent {
    pub title: String,
    #[serde(default)]
    pub paragraphs: Vec<String>,
}

impl ModalContent {
    pub fn new(title: &str, paragraphs: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            home_title: "Welcome to the Pasag Family Tree".to_string(),
            home_description: vec![
                "Explore your family lineage, connect with relatives, and discover your heritage through our interactive family tree.".to_string(),
                "If you find any discrepancies, please send an email to webmaster.pasag@yahoo.com.".to_string(),
            ],
            recent_updates: vec![
                "New members: Ciriaco Pasag and siblings added on Nov 2025.".to_string(),
                "New members: Ciriaco Pasag and family added on Nov 2025.".to_string(),
            ],
            attention: vec![
                "Please be encouraged to design and develop software or webpages to preserve our family data, and make it accessible to our future generations.".to_string(),
            ],
            about: ModalContent::new(
                "Pasag Family Tree",
                &[
                    "This family tree lets you explore relationships interactively, but it is still in the development stage.",
                    "Click nodes to expand, drag to pan, or scroll to zoom.",
                    "Developed by Jojo C. Pasag [Baguio City] (2025) - Source data: Family Records and Emails.",
                ],
            ),
            // Paragraphs here are trusted markup; inline emphasis is kept.
            how_to_use: ModalContent::new(
                "How To Use",
                &[
                    "<strong>Using computer browser:</strong>",
                    "• Expand/Collapse: Use the mouse to click on a <strong>(name)</strong> to expand or collapse a node.",
                    "• Pan: Click and hold the mouse button on a <strong>(name)</strong>, then drag it to pan across the interface.",
                    "• Zoom: Click the mouse (or a specific button) and use the scroll wheel to zoom in or out.",
                    "<strong>Using iPad: (NOT RECOMMENDED in iPhone):</strong>",
                    "• Expand or Collapse: Tap on a <strong>(name)</strong> to expand or collapse.",
                    "• Pan: Tap and hold on a <strong>(name)</strong>, then drag with your fingers to pan across the screen or move the item.",
                    "• Scroll and Zoom: Tap anywhere on the screen and use two fingers to scroll or pinch to zoom in and out",
                ],
            ),
        }
    }
}

/// A navigation button bound to a tree module operation by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlButtonSpec {
    pub label: String,
    pub action: String,
    pub node_id: String,
}

impl ControlButtonSpec {
    pub fn new(label: &str, action: &str, node_id: &str) -> Self {
        Self {
            label: label.to_string(),
            action: action.to_string(),
            node_id: node_id.to_string(),
        }
    }
}

/// The navigation buttons shown in the control bar
pub fn default_controls() -> Vec<ControlButtonSpec> {
    vec![
        ControlButtonSpec::new("Reset View", RESET_VIEW_AND_ROOT, "1"),
        ControlButtonSpec::new("Grandfather", LOAD_NEW_NODE, "2"),
        ControlButtonSpec::new("Ciriaco Pasag", LOAD_NEW_NODE, "3"),
        ControlButtonSpec::new("Eugenio Pasag", LOAD_NEW_NODE, "5"),
        ControlButtonSpec::new("Benito Pasag", LOAD_NEW_NODE, "4"),
        ControlButtonSpec::new("Valeriana Pasag", LOAD_NEW_NODE, "6"),
        ControlButtonSpec::new("Pedro Pasag", LOAD_NEW_NODE, "7"),
    ]
}

/// Settings shared by the loader, the synchronizers and the tree hand-off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Path or URL of the family dataset
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Directory member documents are served from
    #[serde(default = "default_pdf_dir")]
    pub pdf_dir: String,

    /// Number of generations shown in the stats block
    #[serde(default = "default_generations")]
    pub generations: u32,

    /// Node the tree is started on
    #[serde(default = "default_root")]
    pub default_root: String,

    /// Initial expansion depth handed to the tree module
    #[serde(default = "default_expansion_depth")]
    pub expansion_depth: u32,

    /// Tree node names the tree module should not draw
    #[serde(default = "default_hidden_nodes")]
    pub hidden_nodes: Vec<String>,
}

fn default_dataset() -> String {
    "pasagFamily.json".to_string()
}

fn default_pdf_dir() -> String {
    "pdfs".to_string()
}

fn default_generations() -> u32 {
    5
}

fn default_root() -> String {
    "1".to_string()
}

fn default_expansion_depth() -> u32 {
    1
}

fn default_hidden_nodes() -> Vec<String> {
    [
        "Folks",
        "Forefather II",
        "Forefather III",
        "Grandfather I",
        "Grandfather II",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            pdf_dir: default_pdf_dir(),
            generations: default_generations(),
            default_root: default_root(),
            expansion_depth: default_expansion_depth(),
            hidden_nodes: default_hidden_nodes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_controls() {
        let controls = default_controls();
        assert_eq!(controls.len(), 7);
        assert_eq!(controls[0].action, RESET_VIEW_AND_ROOT);
        assert_eq!(controls[0].node_id, "1");
        assert!(controls[1..].iter().all(|c| c.action == LOAD_NEW_NODE));
    }

    #[test]
    fn test_default_settings() {
        let settings = SiteSettings::default();
        assert_eq!(settings.dataset, "pasagFamily.json");
        assert_eq!(settings.generations, 5);
        assert_eq!(settings.default_root, "1");
        assert_eq!(settings.hidden_nodes.len(), 5);
    }

    #[test]
    fn test_content_partial_override() {
        let json = r#"{
            "home_title": "Hello",
            "about": { "title": "About" },
            "how_to_use": { "title": "Help", "paragraphs": ["<em>x</em>"] }
        }"#;
        let content: SiteContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.home_title, "Hello");
        assert!(content.attention.is_empty());
        assert!(content.about.paragraphs.is_empty());
        assert_eq!(content.how_to_use.paragraphs, vec!["<em>x</em>"]);
    }
}
