//! Pasag Family Tree front-end
//!
//! WebAssembly entry point for the genealogy site. Runs the page pipeline
//! against the live DOM:
//!
//! - Static text, notices and control buttons as soon as the DOM is ready
//! - The family dataset, fetched once, then stats, updates and member dropdown
//! - The tree view, started once both the dataset and the tree module are ready
//!
//! # Architecture
//!
//! The pipeline itself lives in the `pasag-tree` library; this crate supplies
//! the DOM view target, the fetch-based dataset source and the bridge to the
//! tree module's window globals and `treeJSLoaded` event.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

use pasag_tree::session::{LoadOutcome, PageSession};
use pasag_tree::BootstrapState;

mod bridge;
mod dom;
mod fetch;

/// Event the tree module fires once its script has loaded
const TREE_LOADED_EVENT: &str = "treeJSLoaded";

thread_local! {
    static SESSION: Rc<PageSession> = Rc::new(PageSession::default());
}

/// The page session shared by the pipeline, event listeners and exports
pub fn session() -> Rc<PageSession> {
    SESSION.with(Rc::clone)
}

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        console::error_1(&"No document available".into());
        return;
    };

    listen_for_tree_module(&window);

    if document.ready_state() == "loading" {
        let on_ready = Closure::once(move |_: web_sys::Event| run_pipeline());
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        {
            console::error_1(&format!("Failed to wait for DOM: {:?}", e).into());
        }
        on_ready.forget();
    } else {
        run_pipeline();
    }
}

fn listen_for_tree_module(window: &web_sys::Window) {
    let on_loaded = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let session = session();
        bridge::bind_tree_actions(session.registry());
        let state = session.tree_module_ready();
        console::log_1(&format!("Tree module loaded ({:?})", state).into());
    }) as Box<dyn FnMut(web_sys::Event)>);

    if let Err(e) = window
        .add_event_listener_with_callback(TREE_LOADED_EVENT, on_loaded.as_ref().unchecked_ref())
    {
        console::error_1(&format!("Failed to listen for {}: {:?}", TREE_LOADED_EVENT, e).into());
    }
    on_loaded.forget();
}

fn run_pipeline() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let session = session();
    let mut view = dom::DomView::new(document, Rc::clone(session.registry()));

    // The tree script may already have defined its globals
    bridge::bind_tree_actions(session.registry());
    session.render_static(&mut view);

    wasm_bindgen_futures::spawn_local(async move {
        match session.load_dataset(&fetch::FetchSource, &mut view).await {
            LoadOutcome::Loaded(stats) => {
                console::log_1(
                    &format!(
                        "Family dataset loaded: {} members, {} new this year",
                        stats.total_members, stats.new_members
                    )
                    .into(),
                );
            }
            LoadOutcome::Failed(e) => {
                console::error_1(&format!("Error loading family dataset: {}", e).into());
            }
            LoadOutcome::AlreadyLoaded => {}
        }

        session.populate_member_dropdown(&mut view);

        if session.is_loaded() {
            if let Err(e) = bridge::publish_tree_globals(session.settings(), session.member_files()) {
                console::error_1(&format!("Failed to publish tree globals: {:?}", e).into());
            }
        }

        bridge::bind_tree_actions(session.registry());
        if session.dataset_ready() == BootstrapState::Started {
            console::log_1(&"Family tree initialized".into());
        }
    });
}
