//! In-memory browser for exercising the web steps without a WebDriver.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use stepweave_core::{StepConfig, Table, TestContext};
use stepweave_web::{
    Browser, BrowserCookie, By, ElementHandle, Result, ScriptArg, WebConfig, WebError, WebSession,
};

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub id: String,
    pub tag: String,
    pub parent: Option<String>,
    /// Frame element whose document holds this element.
    pub frame: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub value: String,
    pub displayed: bool,
    pub enabled: bool,
    pub selected: bool,
    /// Still returned by searches, but every command on it fails as stale.
    pub detached: bool,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            parent: None,
            frame: None,
            attributes: BTreeMap::new(),
            text: String::new(),
            value: String::new(),
            displayed: true,
            enabled: true,
            selected: false,
            detached: false,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child_of(mut self, parent: &ElementHandle) -> Self {
        self.parent = Some(parent.id().to_string());
        self
    }

    pub fn in_frame(mut self, frame: &ElementHandle) -> Self {
        self.frame = Some(frame.id().to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn detached(mut self) -> Self {
        self.detached = true;
        self
    }

    fn classes(&self) -> Vec<&str> {
        self.attributes
            .get("class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub handle: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub elements: Vec<FakeElement>,
    pub windows: Vec<FakeWindow>,
    pub current_window: Option<String>,
    pub frames: Vec<String>,
    pub cookies: Vec<BrowserCookie>,
    pub history: Vec<String>,
    pub history_position: usize,
    pub refreshes: usize,
    pub clicks: Vec<String>,
    pub scripts: Vec<(String, Vec<ScriptArg>)>,
    pub async_scripts: Vec<String>,
    pub script_results: VecDeque<Value>,
    /// Elements whose next interaction (click, typing, text) fails as stale.
    pub stale_once: HashSet<String>,
    pub next_id: usize,
    pub quit: bool,
}

impl FakeState {
    /// Element targeted by an interaction, honouring `stale_once`.
    fn target(&mut self, handle: &ElementHandle) -> Result<&mut FakeElement> {
        if self.stale_once.remove(handle.id()) {
            return Err(WebError::StaleElement);
        }
        self.element(handle)
    }

    fn element(&mut self, handle: &ElementHandle) -> Result<&mut FakeElement> {
        let element = self
            .elements
            .iter_mut()
            .find(|element| element.id == handle.id())
            .ok_or_else(|| WebError::NoSuchElement(handle.to_string()))?;
        if element.detached {
            return Err(WebError::StaleElement);
        }
        Ok(element)
    }

    fn window(&mut self) -> Result<&mut FakeWindow> {
        let current = self
            .current_window
            .clone()
            .ok_or_else(|| WebError::NoSuchWindow("no current window".to_string()))?;
        self.windows
            .iter_mut()
            .find(|window| window.handle == current)
            .ok_or(WebError::NoSuchWindow(current))
    }

    fn is_descendant(&self, element: &FakeElement, root: &str) -> bool {
        let mut parent = element.parent.clone();
        while let Some(id) = parent {
            if id == root {
                return true;
            }
            parent = self
                .elements
                .iter()
                .find(|candidate| candidate.id == id)
                .and_then(|candidate| candidate.parent.clone());
        }
        false
    }
}

pub struct FakeBrowser {
    state: Mutex<FakeState>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        let state = FakeState {
            windows: vec![FakeWindow {
                handle: "w1".to_string(),
                title: "Home".to_string(),
                url: "about:blank".to_string(),
            }],
            current_window: Some("w1".to_string()),
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake browser state")
    }

    pub fn add(&self, mut element: FakeElement) -> ElementHandle {
        let mut state = self.state();
        state.next_id += 1;
        element.id = format!("e{}", state.next_id);
        let handle = ElementHandle::new(&element.id);
        state.elements.push(element);
        handle
    }

    pub fn element(&self, handle: &ElementHandle) -> FakeElement {
        self.state()
            .elements
            .iter()
            .find(|element| element.id == handle.id())
            .cloned()
            .expect("element exists")
    }

    pub fn open_window(&self, handle: &str, title: &str) {
        self.state().windows.push(FakeWindow {
            handle: handle.to_string(),
            title: title.to_string(),
            url: "about:blank".to_string(),
        });
    }

    pub fn set_title(&self, title: &str) {
        self.state().window().unwrap().title = title.to_string();
    }

    pub fn push_script_result(&self, value: Value) {
        self.state().script_results.push_back(value);
    }

    pub fn last_script(&self) -> (String, Vec<ScriptArg>) {
        self.state().scripts.last().cloned().expect("a script was executed")
    }
}

/// Minimal selector support: `tag`, `#id`, `.class`, `[name="value"]` and
/// compounds of those without combinators.
fn matches_css(element: &FakeElement, selector: &str) -> bool {
    let selector = selector.trim();
    let tag_end = selector.find(['#', '.', '[']).unwrap_or(selector.len());
    let tag = &selector[..tag_end];
    if !tag.is_empty() && tag != "*" && !tag.eq_ignore_ascii_case(&element.tag) {
        return false;
    }

    let mut rest = &selector[tag_end..];
    while let Some(first) = rest.chars().next() {
        let body = &rest[1..];
        match first {
            '[' => {
                let end = body.find(']').expect("closed attribute selector");
                let (name, value) = body[..end].split_once('=').expect("attribute value");
                let value = value.trim_matches('"');
                if element.attributes.get(name).map(String::as_str) != Some(value) {
                    return false;
                }
                rest = &body[end + 1..];
            }
            '#' | '.' => {
                let end = body.find(['#', '.', '[']).unwrap_or(body.len());
                let name = &body[..end];
                let accepted = if first == '#' {
                    element.attributes.get("id").map(String::as_str) == Some(name)
                } else {
                    element.classes().contains(&name)
                };
                if !accepted {
                    return false;
                }
                rest = &body[end..];
            }
            _ => return false,
        }
    }
    true
}

fn matches_by(element: &FakeElement, by: &By) -> Result<bool> {
    Ok(match by {
        By::Css(selector) => matches_css(element, selector),
        By::Id(id) => element.attributes.get("id") == Some(id),
        By::LinkText(text) => element.tag == "a" && element.text.trim() == text,
        By::XPath(xpath) => match xpath.strip_prefix("//") {
            Some(tag) if tag.chars().all(|c| c.is_ascii_alphanumeric()) => element.tag == tag,
            _ => return Err(WebError::Driver(format!("unsupported xpath {xpath}"))),
        },
    })
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state();
        let position = state.history_position;
        state.history.truncate(position);
        state.history.push(url.to_string());
        state.history_position = state.history.len();
        state.window()?.url = url.to_string();
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.state().refreshes += 1;
        Ok(())
    }

    async fn back(&self) -> Result<()> {
        let mut state = self.state();
        if state.history_position > 1 {
            state.history_position -= 1;
            let url = state.history[state.history_position - 1].clone();
            state.window()?.url = url;
        }
        Ok(())
    }

    async fn forward(&self) -> Result<()> {
        let mut state = self.state();
        if state.history_position < state.history.len() {
            state.history_position += 1;
            let url = state.history[state.history_position - 1].clone();
            state.window()?.url = url;
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state().window()?.url.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.state().window()?.title.clone())
    }

    async fn find_elements(
        &self,
        root: Option<&ElementHandle>,
        by: &By,
    ) -> Result<Vec<ElementHandle>> {
        let state = self.state();
        let frame = state.frames.last().cloned();
        let mut found = Vec::new();
        for element in &state.elements {
            if element.frame != frame {
                continue;
            }
            if let Some(root) = root {
                if !state.is_descendant(element, root.id()) {
                    continue;
                }
            }
            if matches_by(element, by)? {
                found.push(ElementHandle::new(&element.id));
            }
        }
        Ok(found)
    }

    async fn click(&self, element: &ElementHandle) -> Result<()> {
        let mut state = self.state();
        state.target(element)?;
        state.clicks.push(element.id().to_string());
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<()> {
        self.state().target(element)?.value.push_str(text);
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> Result<()> {
        self.state().target(element)?.value.clear();
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> Result<String> {
        Ok(self.state().target(element)?.text.clone())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> Result<Option<String>> {
        let mut state = self.state();
        let element = state.element(element)?;
        if name == "value" {
            return Ok(Some(element.value.clone()));
        }
        Ok(element.attributes.get(name).cloned())
    }

    async fn css_value(&self, element: &ElementHandle, property: &str) -> Result<String> {
        let mut state = self.state();
        let element = state.element(element)?;
        Ok(element
            .attributes
            .get(&format!("style:{property}"))
            .cloned()
            .unwrap_or_default())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool> {
        Ok(self.state().element(element)?.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool> {
        Ok(self.state().element(element)?.enabled)
    }

    async fn is_selected(&self, element: &ElementHandle) -> Result<bool> {
        Ok(self.state().element(element)?.selected)
    }

    async fn tag_name(&self, element: &ElementHandle) -> Result<String> {
        Ok(self.state().element(element)?.tag.clone())
    }

    async fn execute_script(&self, script: &str, args: Vec<ScriptArg>) -> Result<Value> {
        let mut state = self.state();
        state.scripts.push((script.to_string(), args));
        Ok(state.script_results.pop_front().unwrap_or(Value::Null))
    }

    async fn execute_async_script(&self, script: &str, _args: Vec<ScriptArg>) -> Result<Value> {
        let mut state = self.state();
        state.async_scripts.push(script.to_string());
        Ok(state.script_results.pop_front().unwrap_or(Value::Null))
    }

    async fn add_cookie(&self, cookie: BrowserCookie) -> Result<()> {
        let mut state = self.state();
        state.cookies.retain(|existing| existing.name != cookie.name);
        state.cookies.push(cookie);
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        Ok(self.state().cookies.clone())
    }

    async fn delete_cookie(&self, name: &str) -> Result<()> {
        self.state().cookies.retain(|cookie| cookie.name != name);
        Ok(())
    }

    async fn delete_all_cookies(&self) -> Result<()> {
        self.state().cookies.clear();
        Ok(())
    }

    async fn window_handles(&self) -> Result<Vec<String>> {
        Ok(self
            .state()
            .windows
            .iter()
            .map(|window| window.handle.clone())
            .collect())
    }

    async fn current_window(&self) -> Result<String> {
        Ok(self.state().window()?.handle.clone())
    }

    async fn switch_to_window(&self, handle: &str) -> Result<()> {
        let mut state = self.state();
        if !state.windows.iter().any(|window| window.handle == handle) {
            return Err(WebError::NoSuchWindow(handle.to_string()));
        }
        state.current_window = Some(handle.to_string());
        state.frames.clear();
        Ok(())
    }

    async fn new_tab(&self) -> Result<String> {
        let mut state = self.state();
        let handle = format!("w{}", state.windows.len() + 1);
        state.windows.push(FakeWindow {
            handle: handle.clone(),
            title: String::new(),
            url: "about:blank".to_string(),
        });
        Ok(handle)
    }

    async fn close_window(&self) -> Result<()> {
        let mut state = self.state();
        let current = state.window()?.handle.clone();
        state.windows.retain(|window| window.handle != current);
        state.current_window = None;
        Ok(())
    }

    async fn switch_to_frame(&self, frame: &ElementHandle) -> Result<()> {
        let mut state = self.state();
        let element = state.element(frame)?;
        if element.tag != "iframe" {
            return Err(WebError::Driver(format!("{frame} is not a frame")));
        }
        let id = element.id.clone();
        state.frames.push(id);
        Ok(())
    }

    async fn switch_to_parent_frame(&self) -> Result<()> {
        self.state().frames.pop();
        Ok(())
    }

    async fn switch_to_default_content(&self) -> Result<()> {
        self.state().frames.clear();
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.state().quit = true;
        Ok(())
    }
}

/// Session over `browser`, resolving relative URLs against `https://shop.example/`.
pub fn session_with(browser: &Arc<FakeBrowser>) -> WebSession {
    let config = WebConfig::new()
        .with_base_url("https://shop.example/")
        .unwrap();
    WebSession::new(browser.clone(), config)
}

pub fn context() -> TestContext {
    TestContext::new(StepConfig::new())
}

pub fn table(rows: &[&[&str]]) -> Table {
    Table::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
    .unwrap()
}

pub fn failures(context: &TestContext) -> Vec<String> {
    context
        .assertions()
        .failures()
        .map(|failure| failure.to_string())
        .collect()
}
