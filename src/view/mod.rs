//! View targets
//!
//! The page's presentation surfaces are reached through the [`ViewTarget`]
//! trait so the projections in [`sync`] can run against the browser DOM or
//! against the in-memory [`MemoryDocument`].

mod memory;
pub mod sync;

pub use memory::MemoryDocument;

use thiserror::Error;

use crate::content::ControlButtonSpec;

/// A named region of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Home,
    HomeTitle,
    HomeDescription,
    HomeStats,
    RecentUpdates,
    AboutModal,
    AboutTitle,
    AboutMessage,
    HowToUseModal,
    HowToUseTitle,
    HowToUseMessage,
    ControlBar,
    MemberDropdown,
}

impl Region {
    pub const ALL: [Region; 13] = [
        Region::Home,
        Region::HomeTitle,
        Region::HomeDescription,
        Region::HomeStats,
        Region::RecentUpdates,
        Region::AboutModal,
        Region::AboutTitle,
        Region::AboutMessage,
        Region::HowToUseModal,
        Region::HowToUseTitle,
        Region::HowToUseMessage,
        Region::ControlBar,
        Region::MemberDropdown,
    ];

    /// CSS selector locating the region in the page
    pub fn selector(self) -> &'static str {
        match self {
            Region::Home => "#home",
            Region::HomeTitle => "#home h1",
            Region::HomeDescription => "#home p",
            Region::HomeStats => "#home .stats",
            Region::RecentUpdates => ".recent-updates ul",
            Region::AboutModal => "#aboutModal",
            Region::AboutTitle => "#aboutModal h2",
            Region::AboutMessage => "#aboutModal .modal-message",
            Region::HowToUseModal => "#howToUseModal",
            Region::HowToUseTitle => "#howToUseModal h2",
            Region::HowToUseMessage => "#howToUseModal .modal-message",
            Region::ControlBar => "#controls .control-buttons",
            Region::MemberDropdown => "#searchDropdown",
        }
    }

    /// Enclosing region, if this one lives inside another
    pub fn parent(self) -> Option<Region> {
        match self {
            Region::HomeTitle | Region::HomeDescription | Region::HomeStats => Some(Region::Home),
            Region::AboutTitle | Region::AboutMessage => Some(Region::AboutModal),
            Region::HowToUseTitle | Region::HowToUseMessage => Some(Region::HowToUseModal),
            _ => None,
        }
    }
}

/// Paragraph text, either escaped or inserted as markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Plain text; never interpreted as markup
    Plain(String),
    /// Authored markup from the content registry
    Trusted(String),
}

/// A click command carried by a control button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: String,
    pub argument: String,
}

impl From<&ControlButtonSpec> for Command {
    fn from(spec: &ControlButtonSpec) -> Self {
        Self {
            action: spec.action.clone(),
            argument: spec.node_id.clone(),
        }
    }
}

/// Content nodes a synchronizer can place in a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Paragraph {
        text: Markup,
        class: Option<&'static str>,
    },
    Heading {
        level: u8,
        text: String,
        class: Option<&'static str>,
    },
    ListItem(String),
    Button {
        label: String,
        class: &'static str,
        command: Command,
    },
    Choice {
        value: String,
        label: String,
        disabled: bool,
        selected: bool,
    },
}

impl Node {
    pub fn paragraph(text: &str) -> Self {
        Node::Paragraph {
            text: Markup::Plain(text.to_string()),
            class: None,
        }
    }

    pub fn trusted_paragraph(markup: &str) -> Self {
        Node::Paragraph {
            text: Markup::Trusted(markup.to_string()),
            class: None,
        }
    }

    /// CSS class of the node, if it carries one
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Node::Paragraph { class, .. } | Node::Heading { class, .. } => *class,
            Node::Button { class, .. } => Some(*class),
            _ => None,
        }
    }
}

/// Errors raised by a view target
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Region not found: {0:?}")]
    MissingRegion(Region),

    #[error("Render failed: {0}")]
    Render(String),
}

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;

/// Capability interface over a rendering surface
pub trait ViewTarget {
    /// Whether the region is present in the page
    fn exists(&self, region: Region) -> bool;

    /// Replace the region's content with plain text
    fn set_text(&mut self, region: Region, text: &str) -> ViewResult<()>;

    /// Replace the region's children with `nodes`
    fn replace_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()>;

    /// Append `nodes` after the region's existing children
    fn append_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()>;

    /// Whether any element inside the region carries `class`
    fn contains_class(&self, region: Region, class: &str) -> bool;

    /// Read a data marker stored on the region's element
    fn marker(&self, region: Region, key: &str) -> Option<String>;

    /// Store a data marker on the region's element
    fn set_marker(&mut self, region: Region, key: &str, value: &str) -> ViewResult<()>;

    /// Value currently chosen in a select region
    fn selection(&self, region: Region) -> Option<String>;
}

/// Escape text for inclusion in HTML
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
