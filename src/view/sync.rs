//! View Synchronizers
//!
//! One projection per page surface. Each is idempotent: running it again
//! with unchanged inputs leaves the region exactly as the first run left it.
//! A missing region is a no-op, and render failures are logged and contained
//! here rather than returned to the caller.

use thiserror::Error;

use super::{Command, Markup, Node, Region, ViewError, ViewResult, ViewTarget};
use crate::content::{ControlButtonSpec, SiteContent};
use crate::dataset::{display_name, DerivedStats};

/// Class on the attention heading; its presence means the banner is rendered
pub const ATTENTION_HEADING_CLASS: &str = "attention-heading";

/// Class on each attention paragraph
pub const ATTENTION_CLASS: &str = "attention";

/// Class on control bar buttons
pub const CONTROL_BUTTON_CLASS: &str = "button-gradient";

/// Marker set on the dropdown once it has been filled
pub const POPULATED_MARKER: &str = "populated";

/// Label of the dropdown's placeholder option
pub const DROPDOWN_PLACEHOLDER: &str = "Select member PDF…";

/// What a synchronizer did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The region was (re)rendered
    Applied,
    /// Nothing to do; the region is left as it was
    Skipped(SkipReason),
    /// Rendering failed part way; the error was logged
    Failed(String),
}

/// Why a synchronizer left its region untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingRegion(Region),
    AlreadyRendered,
    NoData,
}

impl SyncOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied)
    }
}

fn contain(name: &str, result: ViewResult<()>) -> SyncOutcome {
    match result {
        Ok(()) => SyncOutcome::Applied,
        Err(ViewError::MissingRegion(region)) => {
            tracing::debug!(synchronizer = name, ?region, "Region missing, skipped");
            SyncOutcome::Skipped(SkipReason::MissingRegion(region))
        }
        Err(e) => {
            tracing::warn!(synchronizer = name, "View update failed: {}", e);
            SyncOutcome::Failed(e.to_string())
        }
    }
}

fn missing(name: &str, region: Region) -> SyncOutcome {
    tracing::debug!(synchronizer = name, ?region, "Region missing, skipped");
    SyncOutcome::Skipped(SkipReason::MissingRegion(region))
}

/// Nodes of the stats block
pub fn stats_nodes(stats: &DerivedStats) -> Vec<Node> {
    vec![
        Node::Text(format!("{} Family Members", stats.total_members)),
        Node::LineBreak,
        Node::Text(format!("{} Generations", stats.generations)),
        Node::LineBreak,
        Node::Text(format!("{} New Members This Year", stats.new_members)),
        Node::LineBreak,
    ]
}

/// Home section: title, description paragraphs and stats block
pub fn sync_home<V: ViewTarget + ?Sized>(
    view: &mut V,
    content: &SiteContent,
    stats: &DerivedStats,
) -> SyncOutcome {
    if !view.exists(Region::Home) {
        return missing("home", Region::Home);
    }

    let result = render_home(view, content, stats);
    contain("home", result)
}

fn render_home<V: ViewTarget + ?Sized>(
    view: &mut V,
    content: &SiteContent,
    stats: &DerivedStats,
) -> ViewResult<()> {
    if view.exists(Region::HomeTitle) {
        view.set_text(Region::HomeTitle, &content.home_title)?;
    }
    if view.exists(Region::HomeDescription) {
        let paragraphs: Vec<Node> = content
            .home_description
            .iter()
            .map(|text| Node::paragraph(text))
            .collect();
        view.replace_children(Region::HomeDescription, &paragraphs)?;
    }
    if view.exists(Region::HomeStats) {
        view.replace_children(Region::HomeStats, &stats_nodes(stats))?;
    }
    Ok(())
}

/// Attention banner appended to the home section, rendered at most once
pub fn sync_attention<V: ViewTarget + ?Sized>(view: &mut V, content: &SiteContent) -> SyncOutcome {
    if !view.exists(Region::Home) {
        return missing("attention", Region::Home);
    }
    if content.attention.is_empty() {
        return SyncOutcome::Skipped(SkipReason::NoData);
    }
    if view.contains_class(Region::Home, ATTENTION_HEADING_CLASS) {
        return SyncOutcome::Skipped(SkipReason::AlreadyRendered);
    }

    let mut nodes = Vec::with_capacity(content.attention.len() + 1);
    nodes.push(Node::Heading {
        level: 3,
        text: "Attention".to_string(),
        class: Some(ATTENTION_HEADING_CLASS),
    });
    nodes.extend(content.attention.iter().map(|text| Node::Paragraph {
        text: Markup::Plain(text.clone()),
        class: Some(ATTENTION_CLASS),
    }));

    contain("attention", view.append_children(Region::Home, &nodes))
}

/// Recent updates list, fully replaced on every call
pub fn sync_recent_updates<V: ViewTarget + ?Sized>(
    view: &mut V,
    content: &SiteContent,
) -> SyncOutcome {
    if !view.exists(Region::RecentUpdates) {
        return missing("recent_updates", Region::RecentUpdates);
    }

    let items: Vec<Node> = content
        .recent_updates
        .iter()
        .map(|update| Node::ListItem(update.clone()))
        .collect();

    contain(
        "recent_updates",
        view.replace_children(Region::RecentUpdates, &items),
    )
}

/// About modal: title and plain-text paragraphs
pub fn sync_about<V: ViewTarget + ?Sized>(view: &mut V, content: &SiteContent) -> SyncOutcome {
    if !view.exists(Region::AboutModal) {
        return missing("about", Region::AboutModal);
    }

    if view.exists(Region::AboutTitle) {
        if let Err(e) = view.set_text(Region::AboutTitle, &content.about.title) {
            return contain("about", Err(e));
        }
    }

    if !view.exists(Region::AboutMessage) {
        return missing("about", Region::AboutMessage);
    }

    let paragraphs: Vec<Node> = content
        .about
        .paragraphs
        .iter()
        .map(|text| Node::paragraph(text))
        .collect();

    contain(
        "about",
        view.replace_children(Region::AboutMessage, &paragraphs),
    )
}

/// How-to-use modal; paragraphs are trusted markup
pub fn sync_how_to_use<V: ViewTarget + ?Sized>(
    view: &mut V,
    content: &SiteContent,
) -> SyncOutcome {
    if !view.exists(Region::HowToUseModal) {
        return missing("how_to_use", Region::HowToUseModal);
    }

    if view.exists(Region::HowToUseTitle) {
        if let Err(e) = view.set_text(Region::HowToUseTitle, &content.how_to_use.title) {
            return contain("how_to_use", Err(e));
        }
    }

    if !view.exists(Region::HowToUseMessage) {
        return missing("how_to_use", Region::HowToUseMessage);
    }

    let paragraphs: Vec<Node> = content
        .how_to_use
        .paragraphs
        .iter()
        .map(|markup| Node::trusted_paragraph(markup))
        .collect();

    contain(
        "how_to_use",
        view.replace_children(Region::HowToUseMessage, &paragraphs),
    )
}

/// Control bar buttons, fully replaced on every call
///
/// Each button carries its action by name; the target resolves it through the
/// action registry when clicked.
pub fn sync_control_buttons<V: ViewTarget + ?Sized>(
    view: &mut V,
    controls: &[ControlButtonSpec],
) -> SyncOutcome {
    if !view.exists(Region::ControlBar) {
        return missing("control_buttons", Region::ControlBar);
    }

    let buttons: Vec<Node> = controls
        .iter()
        .map(|spec| Node::Button {
            label: spec.label.clone(),
            class: CONTROL_BUTTON_CLASS,
            command: Command::from(spec),
        })
        .collect();

    contain(
        "control_buttons",
        view.replace_children(Region::ControlBar, &buttons),
    )
}

/// Options of the member dropdown: placeholder first, then one per file
pub fn member_options(member_files: &[String]) -> Vec<Node> {
    let mut options = Vec::with_capacity(member_files.len() + 1);
    options.push(Node::Choice {
        value: String::new(),
        label: DROPDOWN_PLACEHOLDER.to_string(),
        disabled: true,
        selected: true,
    });
    options.extend(member_files.iter().map(|file| Node::Choice {
        value: file.clone(),
        label: display_name(file),
        disabled: false,
        selected: false,
    }));
    options
}

/// Member dropdown, populated at most once per page session
pub fn sync_member_dropdown<V: ViewTarget + ?Sized>(
    view: &mut V,
    member_files: &[String],
) -> SyncOutcome {
    if !view.exists(Region::MemberDropdown) {
        return missing("member_dropdown", Region::MemberDropdown);
    }
    if member_files.is_empty() {
        return SyncOutcome::Skipped(SkipReason::NoData);
    }
    if view.marker(Region::MemberDropdown, POPULATED_MARKER).as_deref() == Some("true") {
        return SyncOutcome::Skipped(SkipReason::AlreadyRendered);
    }

    let result = view
        .replace_children(Region::MemberDropdown, &member_options(member_files))
        .and_then(|()| view.set_marker(Region::MemberDropdown, POPULATED_MARKER, "true"));

    contain("member_dropdown", result)
}

/// Errors opening the selected member's document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("Dropdown not found")]
    DropdownMissing,

    #[error("Please select a member.")]
    NoSelection,
}

/// Link to a member's document inside `pdf_dir`
pub fn member_document_url(pdf_dir: &str, selection: Option<&str>) -> Result<String, OpenError> {
    let file = selection
        .filter(|s| !s.is_empty())
        .ok_or(OpenError::NoSelection)?;

    let dir = pdf_dir.trim_end_matches('/');
    let encoded = urlencoding::encode(file);
    if dir.is_empty() {
        Ok(encoded.into_owned())
    } else {
        Ok(format!("{}/{}", dir, encoded))
    }
}

/// Link for the document chosen in the member dropdown
pub fn selected_member_url<V: ViewTarget + ?Sized>(
    view: &V,
    pdf_dir: &str,
) -> Result<String, OpenError> {
    if !view.exists(Region::MemberDropdown) {
        return Err(OpenError::DropdownMissing);
    }
    member_document_url(pdf_dir, view.selection(Region::MemberDropdown).as_deref())
}
