//! Browser DOM view target
//!
//! Implements [`ViewTarget`] over `web_sys`. Regions are located with their
//! CSS selectors on every call, so markup added or removed after start-up is
//! seen as it is.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, HtmlOptionElement, HtmlSelectElement};

use pasag_tree::view::{Command, Markup, Node, Region, ViewError, ViewResult, ViewTarget};
use pasag_tree::ActionRegistry;

use crate::bridge;

fn js_err(e: JsValue) -> ViewError {
    ViewError::Render(format!("{:?}", e))
}

/// The live page
pub struct DomView {
    document: Document,
    registry: Rc<ActionRegistry>,
}

impl DomView {
    pub fn new(document: Document, registry: Rc<ActionRegistry>) -> Self {
        Self { document, registry }
    }

    fn element(&self, region: Region) -> Option<Element> {
        self.document.query_selector(region.selector()).ok().flatten()
    }

    fn require(&self, region: Region) -> ViewResult<Element> {
        self.element(region).ok_or(ViewError::MissingRegion(region))
    }

    fn create(&self, tag: &str, class: Option<&str>) -> ViewResult<Element> {
        let element = self.document.create_element(tag).map_err(js_err)?;
        if let Some(class) = class {
            element.set_class_name(class);
        }
        Ok(element)
    }

    fn build(&self, node: &Node) -> ViewResult<web_sys::Node> {
        let built: web_sys::Node = match node {
            Node::Text(text) => self.document.create_text_node(text).into(),
            Node::LineBreak => self.create("br", None)?.into(),
            Node::Paragraph { text, class } => {
                let p = self.create("p", *class)?;
                match text {
                    Markup::Plain(text) => p.set_text_content(Some(text)),
                    Markup::Trusted(markup) => p.set_inner_html(markup),
                }
                p.into()
            }
            Node::Heading { level, text, class } => {
                let heading = self.create(&format!("h{}", level), *class)?;
                heading.set_text_content(Some(text));
                heading.into()
            }
            Node::ListItem(text) => {
                let li = self.create("li", None)?;
                li.set_text_content(Some(text));
                li.into()
            }
            Node::Button {
                label,
                class,
                command,
            } => self.button(label, class, command)?.into(),
            Node::Choice {
                value,
                label,
                disabled,
                selected,
            } => {
                let option: HtmlOptionElement = self
                    .create("option", None)?
                    .dyn_into()
                    .map_err(|_| ViewError::Render("option element".to_string()))?;
                option.set_value(value);
                option.set_text_content(Some(label));
                option.set_disabled(*disabled);
                option.set_selected(*selected);
                option.into()
            }
        };
        Ok(built)
    }

    fn button(&self, label: &str, class: &str, command: &Command) -> ViewResult<Element> {
        let button = self.create("button", Some(class))?;
        button.set_text_content(Some(label));
        button
            .set_attribute("data-action", &command.action)
            .map_err(js_err)?;
        button
            .set_attribute("data-node-id", &command.argument)
            .map_err(js_err)?;

        // Resolved when clicked, so operations the tree module defines later still work
        let registry = Rc::clone(&self.registry);
        let command = command.clone();
        let on_click = Closure::wrap(Box::new(move |_: web_sys::Event| {
            bridge::bind_window_action(&registry, &command.action);
            if let Err(e) = registry.dispatch(&command.action, &command.argument) {
                console::warn_1(&e.to_string().into());
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(js_err)?;
        on_click.forget();

        Ok(button)
    }

    fn append(&self, parent: &Element, nodes: &[Node]) -> ViewResult<()> {
        for node in nodes {
            let child = self.build(node)?;
            parent.append_child(&child).map_err(js_err)?;
        }
        Ok(())
    }
}

impl ViewTarget for DomView {
    fn exists(&self, region: Region) -> bool {
        self.element(region).is_some()
    }

    fn set_text(&mut self, region: Region, text: &str) -> ViewResult<()> {
        self.require(region)?.set_text_content(Some(text));
        Ok(())
    }

    fn replace_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()> {
        let element = self.require(region)?;
        element.set_inner_html("");
        self.append(&element, nodes)
    }

    fn append_children(&mut self, region: Region, nodes: &[Node]) -> ViewResult<()> {
        let element = self.require(region)?;
        self.append(&element, nodes)
    }

    fn contains_class(&self, region: Region, class: &str) -> bool {
        self.element(region)
            .and_then(|el| el.query_selector(&format!(".{}", class)).ok().flatten())
            .is_some()
    }

    fn marker(&self, region: Region, key: &str) -> Option<String> {
        self.element(region)?.get_attribute(&format!("data-{}", key))
    }

    fn set_marker(&mut self, region: Region, key: &str, value: &str) -> ViewResult<()> {
        self.require(region)?
            .set_attribute(&format!("data-{}", key), value)
            .map_err(js_err)
    }

    fn selection(&self, region: Region) -> Option<String> {
        self.element(region)?
            .dyn_into::<HtmlSelectElement>()
            .ok()
            .map(|select| select.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasag_tree::view::sync;
    use pasag_tree::{default_controls, SiteContent};
    use std::cell::RefCell;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fixture(html: &str) -> DomView {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(html);
        DomView::new(document, Rc::new(ActionRegistry::new()))
    }

    #[wasm_bindgen_test]
    fn test_attention_rendered_once() {
        let mut view = fixture("<section id=\"home\"><h1></h1><p></p><div class=\"stats\"></div></section>");
        let content = SiteContent::default();

        sync::sync_attention(&mut view, &content);
        sync::sync_attention(&mut view, &content);

        let headings = view
            .document
            .query_selector_all(".attention-heading")
            .unwrap();
        assert_eq!(headings.length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_button_dispatches_on_click() {
        let mut view = fixture("<div id=\"controls\"><div class=\"control-buttons\"></div></div>");
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        view.registry
            .register("loadNewNode", move |id| sink.borrow_mut().push(id.to_string()));

        sync::sync_control_buttons(&mut view, &default_controls());

        let button: web_sys::HtmlElement = view
            .document
            .query_selector("#controls .control-buttons button:nth-child(2)")
            .unwrap()
            .unwrap()
            .dyn_into()
            .unwrap();
        button.click();
        assert_eq!(*clicked.borrow(), vec!["2"]);
    }

    #[wasm_bindgen_test]
    fn test_selection_reads_dropdown() {
        let mut view = fixture("<select id=\"searchDropdown\"></select>");
        assert_eq!(view.selection(Region::MemberDropdown).as_deref(), Some(""));

        sync::sync_member_dropdown(&mut view, &["Ana_Pasag.pdf".to_string()]);
        let select: HtmlSelectElement = view.element(Region::MemberDropdown).unwrap().dyn_into().unwrap();
        select.set_value("Ana_Pasag.pdf");
        assert_eq!(
            view.selection(Region::MemberDropdown).as_deref(),
            Some("Ana_Pasag.pdf")
        );
    }

    #[wasm_bindgen_test]
    fn test_missing_region() {
        let mut view = fixture("");
        assert!(!view.exists(Region::MemberDropdown));
        assert!(matches!(
            view.set_marker(Region::MemberDropdown, "populated", "true"),
            Err(ViewError::MissingRegion(Region::MemberDropdown))
        ));
    }
}
