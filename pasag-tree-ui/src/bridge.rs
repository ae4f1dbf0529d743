//! Window bridge
//!
//! Connects the page session to the external tree module, which lives on the
//! `window` object: its global operations are bound into the action registry,
//! the data it reads is published as globals, and a few helpers are exported
//! for the page's inline handlers.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

use pasag_tree::content::{contact_message, SiteSettings, LOAD_NEW_NODE, RESET_VIEW_AND_ROOT};
use pasag_tree::dataset::normalize_name;
use pasag_tree::ActionRegistry;

use crate::dom::DomView;

/// Tree module operations the control buttons and the bootstrap call
pub const TREE_ACTIONS: [&str; 2] = [LOAD_NEW_NODE, RESET_VIEW_AND_ROOT];

fn window_function(name: &str) -> Option<Function> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn register_function(registry: &ActionRegistry, name: &str, function: Function) {
    let action = name.to_string();
    registry.register(name, move |argument| {
        if let Err(e) = function.call1(&JsValue::NULL, &JsValue::from_str(argument)) {
            console::error_1(&format!("{} failed: {:?}", action, e).into());
        }
    });
}

/// Bind `window[name]` into the registry unless the name already resolves
pub fn bind_window_action(registry: &ActionRegistry, name: &str) -> bool {
    if registry.contains(name) {
        return true;
    }

    match window_function(name) {
        Some(function) => {
            register_function(registry, name, function);
            true
        }
        None => false,
    }
}

pub fn bind_tree_actions(registry: &ActionRegistry) {
    for name in TREE_ACTIONS {
        bind_window_action(registry, name);
    }
}

fn strings(values: &[String]) -> Array {
    values.iter().map(|v| JsValue::from_str(v)).collect()
}

/// Globals the tree module reads: member list, hidden nodes and depth
pub fn publish_tree_globals(settings: &SiteSettings, member_files: &[String]) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    Reflect::set(&window, &"members".into(), &strings(member_files))?;
    Reflect::set(
        &window,
        &"GLOBAL_DEPTH".into(),
        &JsValue::from(settings.expansion_depth),
    )?;

    let mut config = Reflect::get(&window, &"GlobalConfig".into())?;
    if !config.is_object() {
        config = Object::new().into();
        Reflect::set(&window, &"GlobalConfig".into(), &config)?;
    }
    Reflect::set(
        &config,
        &"unwantedNodes".into(),
        &strings(&settings.hidden_nodes),
    )?;

    Ok(())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Register a tree operation explicitly instead of through a window global
#[wasm_bindgen(js_name = registerTreeAction)]
pub fn register_tree_action(name: String, handler: Function) {
    let session = crate::session();
    register_function(session.registry(), &name, handler);

    if name == LOAD_NEW_NODE {
        session.tree_module_ready();
    }
}

/// Open the member document picked in the dropdown in a new tab
#[wasm_bindgen(js_name = openSelectedMember)]
pub fn open_selected_member() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let session = crate::session();
    let view = DomView::new(document, Rc::clone(session.registry()));
    match session.selected_member_url(&view) {
        Ok(url) => {
            if let Some(window) = web_sys::window() {
                let _ = window.open_with_url_and_target(&url, "_blank");
            }
        }
        Err(e) => alert(&e.to_string()),
    }
}

/// Contact template as `{ header, body }`
#[wasm_bindgen(js_name = getContactMessage)]
pub fn get_contact_message(action: String) -> JsValue {
    serde_json::to_string(&contact_message(&action))
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::NULL)
}

#[wasm_bindgen(js_name = normalizeName)]
pub fn normalize(name: String) -> String {
    normalize_name(&name)
}
