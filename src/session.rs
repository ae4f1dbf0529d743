//! Page Session
//!
//! Owns everything one page load needs: the content registry, the site
//! settings, the write-once dataset snapshot, the action registry and the tree
//! bootstrap coordinator. The page pipeline is:
//!
//! 1. [`PageSession::render_static`] projects the content registry.
//! 2. [`PageSession::load_dataset`] fetches, parses, derives and publishes the
//!    snapshot, then refreshes the home stats and recent updates.
//! 3. [`PageSession::populate_member_dropdown`] and
//!    [`PageSession::dataset_ready`] run once the load has resolved.
//!
//! [`PageSession::start`] runs steps 2 and 3 in order.

use std::rc::Rc;

use crate::actions::ActionRegistry;
use crate::bootstrap::{BootstrapState, TreeBootstrap};
use crate::content::{default_controls, ControlButtonSpec, SiteContent, SiteSettings};
use crate::dataset::{
    self, current_year, DatasetSnapshot, DatasetSource, DerivedStats, FamilyMember, LoadError,
    SnapshotStore,
};
use crate::view::sync::{self, member_document_url, OpenError, SyncOutcome};
use crate::view::ViewTarget;

/// Result of a dataset load; never an error for the caller to handle
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot published with these stats
    Loaded(DerivedStats),
    /// A snapshot was already published; it is left untouched
    AlreadyLoaded,
    /// Fetch or parse failed; the error has been logged
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Outcomes of the static projection pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRender {
    pub home: SyncOutcome,
    pub attention: SyncOutcome,
    pub about: SyncOutcome,
    pub how_to_use: SyncOutcome,
    pub control_buttons: SyncOutcome,
}

/// State and pipeline for one page load
#[derive(Debug)]
pub struct PageSession {
    content: SiteContent,
    settings: SiteSettings,
    controls: Vec<ControlButtonSpec>,
    snapshot: SnapshotStore,
    registry: Rc<ActionRegistry>,
    bootstrap: TreeBootstrap,
}

impl Default for PageSession {
    fn default() -> Self {
        Self::new(SiteContent::default(), SiteSettings::default())
    }
}

impl PageSession {
    pub fn new(content: SiteContent, settings: SiteSettings) -> Self {
        let bootstrap = TreeBootstrap::new(settings.default_root.clone());
        Self {
            content,
            settings,
            controls: default_controls(),
            snapshot: SnapshotStore::new(),
            registry: Rc::new(ActionRegistry::new()),
            bootstrap,
        }
    }

    /// Replace the control bar buttons
    pub fn with_controls(mut self, controls: Vec<ControlButtonSpec>) -> Self {
        self.controls = controls;
        self
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn controls(&self) -> &[ControlButtonSpec] {
        &self.controls
    }

    /// Action registry shared with view targets that wire click handlers
    pub fn registry(&self) -> &Rc<ActionRegistry> {
        &self.registry
    }

    pub fn snapshot(&self) -> Option<&DatasetSnapshot> {
        self.snapshot.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_loaded()
    }

    pub fn member_files(&self) -> &[String] {
        self.snapshot.member_files()
    }

    pub fn bootstrap_state(&self) -> BootstrapState {
        self.bootstrap.state()
    }

    /// Stats for the home block: loaded values or placeholder zeros
    pub fn stats(&self) -> DerivedStats {
        self.snapshot
            .get()
            .map(|s| s.stats)
            .unwrap_or_else(|| DerivedStats::placeholder(self.settings.generations))
    }

    /// Project everything that does not depend on the dataset
    pub fn render_static<V: ViewTarget + ?Sized>(&self, view: &mut V) -> StaticRender {
        StaticRender {
            home: sync::sync_home(view, &self.content, &self.stats()),
            attention: sync::sync_attention(view, &self.content),
            about: sync::sync_about(view, &self.content),
            how_to_use: sync::sync_how_to_use(view, &self.content),
            control_buttons: sync::sync_control_buttons(view, &self.controls),
        }
    }

    /// Publish parsed entries and refresh the views that observe the snapshot
    pub fn publish<V: ViewTarget + ?Sized>(
        &self,
        entries: Vec<FamilyMember>,
        year: i32,
        view: &mut V,
    ) -> LoadOutcome {
        let snapshot = DatasetSnapshot::new(entries, self.settings.generations, year);

        let published = match self.snapshot.publish(snapshot) {
            Ok(published) => published,
            Err(_) => {
                tracing::warn!("Dataset already loaded, ignoring new data");
                return LoadOutcome::AlreadyLoaded;
            }
        };

        tracing::info!(
            total_members = published.stats.total_members,
            new_members = published.stats.new_members,
            member_files = published.member_files.len(),
            "Family dataset loaded"
        );

        sync::sync_home(view, &self.content, &published.stats);
        sync::sync_attention(view, &self.content);
        sync::sync_recent_updates(view, &self.content);

        LoadOutcome::Loaded(published.stats)
    }

    /// Load the configured dataset, counting new members against this year
    pub async fn load_dataset<S, V>(&self, source: &S, view: &mut V) -> LoadOutcome
    where
        S: DatasetSource + ?Sized,
        V: ViewTarget + ?Sized,
    {
        let path = self.settings.dataset.clone();
        self.load_dataset_at(source, &path, current_year(), view)
            .await
    }

    /// Load the dataset at `path`; failures are logged and returned as a value
    pub async fn load_dataset_at<S, V>(
        &self,
        source: &S,
        path: &str,
        year: i32,
        view: &mut V,
    ) -> LoadOutcome
    where
        S: DatasetSource + ?Sized,
        V: ViewTarget + ?Sized,
    {
        if self.is_loaded() {
            return LoadOutcome::AlreadyLoaded;
        }

        match dataset::load(source, path).await {
            Ok(entries) => self.publish(entries, year, view),
            Err(e) => {
                tracing::error!(path, "Error loading family dataset: {}", e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fill the member dropdown from the snapshot (no-op before loading)
    pub fn populate_member_dropdown<V: ViewTarget + ?Sized>(&self, view: &mut V) -> SyncOutcome {
        sync::sync_member_dropdown(view, self.member_files())
    }

    /// Tell the coordinator the dataset is ready, if it is
    pub fn dataset_ready(&self) -> BootstrapState {
        if self.is_loaded() {
            self.bootstrap.dataset_ready(&self.registry)
        } else {
            self.bootstrap.state()
        }
    }

    /// Tell the coordinator the tree module has loaded
    pub fn tree_module_ready(&self) -> BootstrapState {
        self.bootstrap.tree_module_ready(&self.registry)
    }

    /// Load the dataset, then run the steps that depend on it
    pub async fn start<S, V>(&self, source: &S, view: &mut V) -> LoadOutcome
    where
        S: DatasetSource + ?Sized,
        V: ViewTarget + ?Sized,
    {
        let outcome = self.load_dataset(source, view).await;
        self.populate_member_dropdown(view);
        self.dataset_ready();
        outcome
    }

    /// Link for the selected member's document
    pub fn member_document_url(&self, selection: Option<&str>) -> Result<String, OpenError> {
        member_document_url(&self.settings.pdf_dir, selection)
    }

    /// Link for the document chosen in the view's member dropdown
    pub fn selected_member_url<V: ViewTarget + ?Sized>(&self, view: &V) -> Result<String, OpenError> {
        sync::selected_member_url(view, &self.settings.pdf_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::LOAD_NEW_NODE;
    use crate::dataset::{LoadResult, StaticSource};
    use crate::view::sync::{SkipReason, POPULATED_MARKER};
    use crate::view::{MemoryDocument, Node, Region};
    use async_trait::async_trait;
    use std::cell::RefCell;

    struct FailingSource;

    #[async_trait(?Send)]
    impl DatasetSource for FailingSource {
        async fn fetch(&self, _path: &str) -> LoadResult<String> {
            Err(LoadError::Network("connection refused".to_string()))
        }
    }

    const SCENARIO: &str = r#"[
        {"pdfFilename": "a.pdf"},
        {"pdfFilename": null},
        {"pdfFilename": "b.pdf", "dateSubmitted": "2026-01-01"}
    ]"#;

    fn record_starts(session: &PageSession) -> Rc<RefCell<Vec<String>>> {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        session
            .registry()
            .register(LOAD_NEW_NODE, move |id| sink.borrow_mut().push(id.to_string()));
        calls
    }

    #[test]
    fn test_static_render_before_load() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();

        let report = session.render_static(&mut doc);
        assert!(report.home.is_applied());
        assert!(report.attention.is_applied());
        assert!(report.about.is_applied());
        assert!(report.how_to_use.is_applied());
        assert!(report.control_buttons.is_applied());

        assert!(doc
            .render_region(Region::HomeStats)
            .contains("0 Family Members<br>5 Generations<br>0 New Members This Year"));

        // Dataset-dependent view is a documented no-op before load
        assert_eq!(
            session.populate_member_dropdown(&mut doc),
            SyncOutcome::Skipped(SkipReason::NoData)
        );
        assert_eq!(session.dataset_ready(), BootstrapState::WaitingBoth);
    }

    #[test]
    fn test_static_render_on_empty_document() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::empty();

        let report = session.render_static(&mut doc);
        assert!(!report.home.is_applied());
        assert!(!report.control_buttons.is_applied());
        assert_eq!(doc, MemoryDocument::empty());
    }

    #[tokio::test]
    async fn test_load_scenario() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();
        session.render_static(&mut doc);

        let outcome = session
            .load_dataset_at(&StaticSource::new(SCENARIO), "pasagFamily.json", 2026, &mut doc)
            .await;

        let stats = match outcome {
            LoadOutcome::Loaded(stats) => stats,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(stats.total_members, 3);
        assert_eq!(stats.new_members, 1);
        assert!(session.is_loaded());
        assert_eq!(session.member_files(), ["a.pdf".to_string(), "b.pdf".to_string()]);

        assert!(doc
            .render_region(Region::HomeStats)
            .contains("3 Family Members<br>5 Generations<br>1 New Members This Year"));
        assert_eq!(
            doc.children(Region::RecentUpdates).len(),
            session.content().recent_updates.len()
        );
        // Attention banner still rendered exactly once
        assert_eq!(doc.children(Region::Home).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_page_untouched() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();
        session.render_static(&mut doc);
        let before = doc.clone();

        let outcome = session.start(&FailingSource, &mut doc).await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Network(_))));
        assert!(!session.is_loaded());
        assert_eq!(doc, before);
        assert!(doc.marker(Region::MemberDropdown, POPULATED_MARKER).is_none());
    }

    #[tokio::test]
    async fn test_parse_failure_is_contained() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();

        let outcome = session
            .load_dataset_at(&StaticSource::new("{oops"), "x.json", 2026, &mut doc)
            .await;
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::Parse(_))));
        assert!(!session.is_loaded());
    }

    #[tokio::test]
    async fn test_second_load_is_ignored() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();

        session
            .load_dataset_at(&StaticSource::new(SCENARIO), "x.json", 2026, &mut doc)
            .await;
        let outcome = session
            .load_dataset_at(&StaticSource::new("[]"), "x.json", 2026, &mut doc)
            .await;

        assert!(matches!(outcome, LoadOutcome::AlreadyLoaded));
        assert_eq!(session.stats().total_members, 3);
    }

    #[tokio::test]
    async fn test_start_with_tree_module_present() {
        let session = PageSession::default();
        let calls = record_starts(&session);
        let mut doc = MemoryDocument::page();
        session.render_static(&mut doc);

        let outcome = session.start(&StaticSource::new(SCENARIO), &mut doc).await;
        assert!(outcome.is_loaded());
        assert_eq!(*calls.borrow(), vec!["1"]);
        assert_eq!(session.bootstrap_state(), BootstrapState::Started);

        // Dropdown: placeholder plus two members
        assert_eq!(doc.children(Region::MemberDropdown).len(), 3);
        assert_eq!(
            session.populate_member_dropdown(&mut doc),
            SyncOutcome::Skipped(SkipReason::AlreadyRendered)
        );
        assert_eq!(doc.children(Region::MemberDropdown).len(), 3);
    }

    #[tokio::test]
    async fn test_tree_signal_before_load() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();

        // Module loads first and registers its operation
        let calls = record_starts(&session);
        assert_eq!(session.tree_module_ready(), BootstrapState::WaitingData);
        assert!(calls.borrow().is_empty());

        session.start(&StaticSource::new(SCENARIO), &mut doc).await;
        assert_eq!(*calls.borrow(), vec!["1"]);

        session.tree_module_ready();
        session.dataset_ready();
        assert_eq!(calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_tree_module_after_load() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();

        session.start(&StaticSource::new(SCENARIO), &mut doc).await;
        assert_eq!(session.bootstrap_state(), BootstrapState::WaitingTreeModule);

        let calls = record_starts(&session);
        assert_eq!(session.tree_module_ready(), BootstrapState::Started);
        assert_eq!(*calls.borrow(), vec!["1"]);
    }

    #[tokio::test]
    async fn test_no_tree_start_when_load_fails() {
        let session = PageSession::default();
        let calls = record_starts(&session);
        let mut doc = MemoryDocument::page();

        session.start(&FailingSource, &mut doc).await;
        session.tree_module_ready();
        assert!(calls.borrow().is_empty());
        assert_eq!(session.bootstrap_state(), BootstrapState::WaitingData);
    }

    #[tokio::test]
    async fn test_select_and_open_member() {
        let session = PageSession::default();
        let mut doc = MemoryDocument::page();
        session.start(&StaticSource::new(SCENARIO), &mut doc).await;

        let selection = doc.selected_value(Region::MemberDropdown);
        assert_eq!(
            session.member_document_url(selection.as_deref()),
            Err(OpenError::NoSelection)
        );

        doc.select(Region::MemberDropdown, "b.pdf").unwrap();
        let selection = doc.selected_value(Region::MemberDropdown);
        assert_eq!(
            session.member_document_url(selection.as_deref()),
            Ok("pdfs/b.pdf".to_string())
        );
        assert_eq!(session.selected_member_url(&doc), Ok("pdfs/b.pdf".to_string()));

        let doc = MemoryDocument::page().without(Region::MemberDropdown);
        assert_eq!(
            session.selected_member_url(&doc),
            Err(OpenError::DropdownMissing)
        );
    }

    #[test]
    fn test_custom_controls() {
        let controls = vec![ControlButtonSpec::new("Root", "resetViewAndRoot", "1")];
        let session = PageSession::default().with_controls(controls);
        let mut doc = MemoryDocument::page();
        session.render_static(&mut doc);

        assert!(matches!(
            &doc.children(Region::ControlBar)[0],
            Node::Button { label, .. } if label == "Root"
        ));
    }
}
