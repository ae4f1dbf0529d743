//! In-memory view target
//!
//! Mirrors the page skeleton closely enough for the synchronizers to run
//! without a browser: regions can be removed to simulate missing markup,
//! buttons can be clicked and the dropdown can be selected. Also renders the
//! synchronised page as HTML for previews.

use std::collections::BTreeMap;

use super::{html_escape, Markup, Node, Region, ViewError, ViewResult, ViewTarget};
use crate::actions::{ActionRegistry, DispatchError};

#[derive(Debug, Clone, Default, PartialEq)]
struct RegionState {
    text: Option<String>,
    children: Vec<Node>,
    markers: BTreeMap<String, String>,
    selection: Option<String>,
}

/// A page held in memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    regions: BTreeMap<Region, RegionState>,
}

impl MemoryDocument {
    /// A document with no regions at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// A document with every region of the page skeleton
    pub fn page() -> Self {
        let regions = Region::ALL
            .iter()
            .map(|r| (*r, RegionState::default()))
            .collect();
        Self { regions }
    }

    /// Remove a region (and with it everything nested inside)
    pub fn without(mut self, region: Region) -> Self {
        self.regions.remove(&region);
        self
    }

    fn state(&self, region: Region) -> Option<&RegionState> {
        if self.exists(region) {
            self.regions.get(&region)
        } else {
            None
        }
    }

    fn state_mut(&mut self, region: Region) -> ViewResult<&mut RegionState> {
        if !self.exists(region) {
            return Err(ViewError::MissingRegion(region));
        }
        self.regions
            .get_mut(&region)
            .ok_or(ViewError::MissingRegion(region))
    }

    /// Text content set on a region
    pub fn text(&self, region: Region) -> Option<&str> {
        self.state(region).and_then(|s| s.text.as_deref())
    }

    /// Children placed in a region
    pub fn children(&self, region: Region) -> &[Node] {
        self.state(region)
            .map(|s| s.children.as_slice())
            .unwrap_or_default()
    }

    /// Click the `index`-th button of a region, dispatching its command
    pub fn click(
        &self,
        region: Region,
        index: usize,
        registry: &ActionRegistry,
    ) -> Result<(), DispatchError> {
        let command = self
            .children(region)
            .iter()
            .filter_map(|node| match node {
                Node::Button { command, .. } => Some(command),
                _ => None,
            })
            .nth(index)
            .ok_or(DispatchError::NoSuchButton(index))?;

        registry.dispatch(&command.action, &command.argument)
    }

    /// Pick an option of a select region by value
    pub fn select(&mut self, region: Region, value: &str) -> ViewResult<()> {
        self.state_mut(region)?.selection = Some(value.to_string());
        Ok(())
    }

    /// Current value of a select region, as the browser would report it
    pub fn selected_value(&self, region: Region) -> Option<String> {
        let state = self.state(region)?;
        if let Some(value) = &state.selection {
            return Some(value.clone());
        }

        state
            .children
            .iter()
            .find_map(|node| match node {
                Node::Choice {
                    value,
                    selected: true,
                    ..
                } => Some(value.clone()),
                _ => None,
            })
            .or_else(|| {
                state.children.iter().find_map(|node| match node {
                    Node::Choice { value, .. } => Some(value.clone()),
                    _ => None,
                })
            })
    }

    /// HTML of one region, including the regions nested inside it
    pub fn render_region(&self, region: Region) -> String {
        let Some(state) = self.state(region) else {
            return String::new();
        };

        let (open, close) = wrapper(region);
        let mut out = String::new();
        out.push_str(open.trim_end_matches('>'));
        for (key, value) in &state.markers {
            out.push_str(&format!(" data-{}=\"{}\"", key, html_escape(value)));
        }
        out.push('>');

        if let Some(text) = &state.text {
            out.push_str(&html_escape(text));
        }
        for nested in Region::ALL.iter().filter(|r| r.parent() == Some(region)) {
            out.push_str(&self.render_region(*nested));
        }
        for node in &state.children {
            render_node(node, &mut out);
        }

        out.push_str(close);
        out
    }

    /// HTML of every top-level region present in the document
    pub fn render_html(&self) -> String {
        Region::ALL
            .iter()
            .filter(|r| r.parent().is_none() && self.exists(**r))
            .map(|r| self.render_region(*r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn wrapper(region: Region) -> (&'static str, &'static str) {
    match region {
        Region::Home => ("<section id=\"home\">", "</section>"),
        Region::HomeTitle => ("<h1>", "</h1>"),
        Region::HomeDescription => ("<p>", "</p>"),
        Region::HomeStats => ("<div class=\"stats\">", "</div>"),
        Region::RecentUpdates => ("<div class=\"recent-updates\"><ul>", "</ul></div>"),
        Region::AboutModal => ("<div id=\"aboutModal\" class=\"modal\">", "</div>"),
        Region::AboutTitle | Region::HowToUseTitle => ("<h2>", "</h2>"),
        Region::AboutMessage | Region::HowToUseMessage => {
            ("<div class=\"modal-message\">", "</div>")
        }
        Region::HowToUseModal => ("<div id=\"howToUseModal\" class=\"modal\">", "</div>"),
        Region::ControlBar => (
            "<div id=\"controls\"><div class=\"control-buttons\">",
            "</div></div>",
        ),
        Region::MemberDropdown => ("<select id=\"searchDropdown\">", "</select>"),
    }
}

fn class_attr(class: Option<&str>) -> String {
    class
        .map(|c| format!(" class=\"{}\"", html_escape(c)))
        .unwrap_or_default()
}

fn render_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&html_escape(text)),
        Node::LineBreak => out.push_str("<br>"),
        Node::Paragraph { text, class } => {
            out.push_str(&format!("<p{}>", class_attr(*class)));
            match text {
                Markup::Plain(t) => out.push_str(&html_escape(t)),
                Markup::Trusted(t) => out.push_str(t),
            }
            out.push_str("</p>");
        }
        Node::Heading { level, text, class } => {
            out.push_str(&format!(
                "<h{level}{}>{}</h{level}>",
                class_attr(*class),
                html_escape(text)
            ));
        }
        Node::ListItem(text) => out.push_str(&format!("<li>{}</li>", html_escape(text))),
        Node::Button {
            label,
            class,
            command,
        } => {
            out.push_str(&format!(
                "<button{} data-action=\"{}\" data-node-id=\"{}\">{}</button>",
                class_attr(Some(class)),
                html_escape(&command.action),
                html_escape(&command.argument),
                html_escape(label)
            ));
        }
        Node::Choice {
            value,
            label,
            disabled,
            selected,
        } => {
            out.push_str(&format!("<option value=\"{}\"", html_escape(value)));
            if *disabled {
                out.push_str(" disabled");
            }
            if *selected {
                out.push_str(" selected");
            }
            out.push_str(&format!(">{}</option>", html_escape(label)));
        }
    }
}

impl ViewTarget for MemoryDocument {
    fn exists(&self, region: Region) -> bool {
        let present = self.regions.contains_key(&region);
        match region.parent() {
            Some(parent) => present && self.exists(parent),
            None => present,
        }
    }

    fn set_text(&mut self, region: Region, text: &str) -> ViewResult<()> {
        let state = self.state_mut(region)?;
        state.text = Some(text.to_string());
        state.children.clear();
        Ok(())
    }

    fn replace_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()> {
        let state = self.state_mut(region)?;
        state.text = None;
        state.selection = None;
        state.children = nodes.to_vec();
        Ok(())
    }

    fn append_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()> {
        self.state_mut(region)?.children.extend_from_slice(nodes);
        Ok(())
    }

    fn contains_class(&self, region: Region, class: &str) -> bool {
        if !self.exists(region) {
            return false;
        }

        let own = self.children(region).iter().any(|n| n.class() == Some(class));
        own || Region::ALL
            .iter()
            .filter(|r| r.parent() == Some(region))
            .any(|r| self.contains_class(*r, class))
    }

    fn marker(&self, region: Region, key: &str) -> Option<String> {
        self.state(region)?.markers.get(key).cloned()
    }

    fn set_marker(&mut self, region: Region, key: &str, value: &str) -> ViewResult<()> {
        self.state_mut(region)?
            .markers
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn selection(&self, region: Region) -> Option<String> {
        self.selected_value(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_regions_follow_parent() {
        let doc = MemoryDocument::page().without(Region::Home);
        assert!(!doc.exists(Region::Home));
        assert!(!doc.exists(Region::HomeStats));
        assert!(doc.exists(Region::AboutModal));
    }

    #[test]
    fn test_missing_region_errors() {
        let mut doc = MemoryDocument::empty();
        assert!(matches!(
            doc.set_text(Region::HomeTitle, "x"),
            Err(ViewError::MissingRegion(Region::HomeTitle))
        ));
    }

    #[test]
    fn test_text_and_children() {
        let mut doc = MemoryDocument::page();
        doc.set_text(Region::HomeTitle, "Title").unwrap();
        assert_eq!(doc.text(Region::HomeTitle), Some("Title"));

        doc.replace_children(Region::RecentUpdates, &[Node::ListItem("a".into())])
            .unwrap();
        doc.append_children(Region::RecentUpdates, &[Node::ListItem("b".into())])
            .unwrap();
        assert_eq!(doc.children(Region::RecentUpdates).len(), 2);
    }

    #[test]
    fn test_contains_class_searches_nested() {
        let mut doc = MemoryDocument::page();
        let heading = Node::Heading {
            level: 3,
            text: "Attention".into(),
            class: Some("attention-heading"),
        };
        doc.append_children(Region::HomeStats, &[heading]).unwrap();
        assert!(doc.contains_class(Region::Home, "attention-heading"));
        assert!(!doc.contains_class(Region::AboutModal, "attention-heading"));
    }

    #[test]
    fn test_render_escapes_plain_text() {
        let mut doc = MemoryDocument::page();
        doc.replace_children(
            Region::AboutMessage,
            &[
                Node::paragraph("<script>x</script>"),
                Node::trusted_paragraph("<strong>ok</strong>"),
            ],
        )
        .unwrap();

        let html = doc.render_region(Region::AboutMessage);
        assert_eq!(
            html,
            "<div class=\"modal-message\"><p>&lt;script&gt;x&lt;/script&gt;</p><p><strong>ok</strong></p></div>"
        );
    }

    #[test]
    fn test_render_markers() {
        let mut doc = MemoryDocument::page();
        doc.set_marker(Region::MemberDropdown, "populated", "true")
            .unwrap();
        assert_eq!(
            doc.render_region(Region::MemberDropdown),
            "<select id=\"searchDropdown\" data-populated=\"true\"></select>"
        );
    }

    #[test]
    fn test_selected_value() {
        let mut doc = MemoryDocument::page();
        let choices = [
            Node::Choice {
                value: String::new(),
                label: "Pick".into(),
                disabled: true,
                selected: true,
            },
            Node::Choice {
                value: "a.pdf".into(),
                label: "a".into(),
                disabled: false,
                selected: false,
            },
        ];
        doc.replace_children(Region::MemberDropdown, &choices).unwrap();
        assert_eq!(doc.selected_value(Region::MemberDropdown), Some(String::new()));

        doc.select(Region::MemberDropdown, "a.pdf").unwrap();
        assert_eq!(
            doc.selected_value(Region::MemberDropdown),
            Some("a.pdf".to_string())
        );
    }
}
