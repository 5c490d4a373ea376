//! Browser exports.
//!
//! The host page awaits the module's `init()`, calls `init_storage()`, and
//! only then wires its inputs to the other functions. Option values live in
//! `window.localStorage` under their key ids, so they survive reloads.

use std::{cell::RefCell, sync::Arc};

use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Storage, Window};

use crate::{
    error::{Error, Result},
    evaluator::{EvaluationResult, EvaluatorConfig},
    options::{Backing, OptionKey, OptionStore},
    render::{verdict, Render, Selection},
    session::{Session, TruthTester},
};

const OUTPUT_ID: &str = "data-output";
const INIT_MARKER: &str = "init";

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(value: Error) -> Self {
        JsValue::from_str(&value.to_string())
    }
}

fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| Error::Host("no window found".into()))
}

fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| Error::Host("no document found".into()))
}

/// Option values persisted in the browser's local storage.
struct LocalStorage(Storage);

impl LocalStorage {
    fn open() -> Result<Self> {
        window()?
            .local_storage()?
            .map(Self)
            .ok_or_else(|| Error::Host("no local storage found".into()))
    }
}

impl Backing for LocalStorage {
    fn load(&self, key: OptionKey) -> Result<Option<String>> {
        if self.0.get_item(INIT_MARKER)?.is_none() {
            return Ok(None);
        }
        Ok(self.0.get_item(key.id())?)
    }

    fn save(&self, key: OptionKey, value: &str) -> Result<()> {
        self.0.set_item(key.id(), value)?;
        self.0.set_item(INIT_MARKER, "true")?;
        Ok(())
    }
}

/// Writes tables into the `data-output` element.
struct DomRenderer;

impl DomRenderer {
    fn append(document: &Document, parent: &Element, tag: &str, text: &str) -> Result<Element> {
        let elem = document.create_element(tag)?;
        elem.set_text_content(Some(text));
        parent.append_child(&elem)?;
        Ok(elem)
    }

    fn bool_cell(document: &Document, row: &Element, value: bool) -> Result<()> {
        let (text, class) = if value { ("T", "true") } else { ("F", "false") };
        Self::append(document, row, "td", text)?.set_class_name(class);
        Ok(())
    }
}

impl Render for DomRenderer {
    fn render(&mut self, result: &EvaluationResult, selection: Selection) -> Result<()> {
        let document = document()?;
        let output = document
            .get_element_by_id(OUTPUT_ID)
            .ok_or_else(|| Error::Host(format!("element `{OUTPUT_ID}` not found")))?;
        output.set_inner_html("");

        let table = document.create_element("table")?;
        let header = Self::append(&document, &table, "tr", "")?;
        for name in result.variables.iter() {
            Self::append(&document, &header, "th", name)?;
        }
        Self::append(&document, &header, "th", &result.title())?;

        for entry in selection.rows(result) {
            let row = Self::append(&document, &table, "tr", "")?;
            for (_, value) in entry.assignment.iter() {
                Self::bool_cell(&document, &row, value)?;
            }
            Self::bool_cell(&document, &row, entry.value)?;
        }

        output.append_child(&table)?;
        Self::append(&document, &output, "p", &verdict(result, selection))?;
        Ok(())
    }
}

thread_local! {
    static SESSION: RefCell<Option<Session<DomRenderer>>> = const { RefCell::new(None) };
}

fn with_session<T>(f: impl FnOnce(&mut Session<DomRenderer>) -> Result<T>) -> Result<T> {
    SESSION.with(|session| match session.borrow_mut().as_mut() {
        Some(session) => f(session),
        None => Err(Error::NotInitialized),
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

#[wasm_bindgen]
pub fn init_storage() -> Result<(), JsValue> {
    SESSION.with(|session| {
        let mut session = session.borrow_mut();
        if session.is_none() {
            info!("creating session");
            let created = Session::new(
                Arc::new(OptionStore::new()),
                EvaluatorConfig::default(),
                DomRenderer,
            )
            .with_backing(LocalStorage::open()?);
            *session = Some(created);
        }
        match session.as_mut() {
            Some(session) => session.init_storage(),
            None => Err(Error::NotInitialized),
        }
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn render_all(input: &str) -> Result<(), JsValue> {
    Ok(with_session(|s| s.render_all(input))?)
}

#[wasm_bindgen]
pub fn render_successes(input: &str) -> Result<(), JsValue> {
    Ok(with_session(|s| s.render_successes(input))?)
}

#[wasm_bindgen]
pub fn render_failures(input: &str) -> Result<(), JsValue> {
    Ok(with_session(|s| s.render_failures(input))?)
}

#[wasm_bindgen]
pub fn change_value(id: &str, value: &str) -> Result<(), JsValue> {
    Ok(with_session(|s| s.change_value(id, value))?)
}

#[wasm_bindgen]
pub fn get_value(id: &str) -> Result<String, JsValue> {
    Ok(with_session(|s| s.get_value(id))?)
}
