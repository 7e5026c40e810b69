//! Given step definitions
//!
//! Page content, windows, variables and navigation.

use cucumber::{gherkin::Step, given};
use stepweave_core::VariableScope;
use stepweave_web::steps::NavigationSteps;
use stepweave_web::ElementHandle;

use crate::common::FakeElement;
use crate::world::{step_table, WebWorld};

/// Add elements to the page.
///
/// Columns: `tag`, `id`, `class`, `text`, `parent` (id of an element added
/// earlier) and `state` (`hidden`, `disabled` or `selected`). Empty cells are
/// ignored.
#[given("a page with elements:")]
fn page_with_elements(world: &mut WebWorld, step: &Step) {
    let table = step_table(step);
    for row in 0..table.len() {
        let cell = |header: &str| table.cell(row, header).filter(|v| !v.is_empty());

        let mut element = FakeElement::new(table.required(row, "tag").expect("tag column"));
        if let Some(id) = cell("id") {
            element = element.attr("id", id);
        }
        if let Some(class) = cell("class") {
            element = element.attr("class", class);
        }
        if let Some(text) = cell("text") {
            element = element.text(text);
        }
        if let Some(parent) = cell("parent") {
            let parent = world
                .browser
                .state()
                .elements
                .iter()
                .find(|e| e.attributes.get("id").map(String::as_str) == Some(parent))
                .map(|e| ElementHandle::new(&e.id))
                .unwrap_or_else(|| panic!("no parent element with id '{parent}'"));
            element = element.child_of(&parent);
        }
        element = match cell("state") {
            Some("hidden") => element.hidden(),
            Some("disabled") => element.disabled(),
            Some("selected") => element.selected(),
            Some(other) => panic!("unknown element state '{other}'"),
            None => element,
        };
        world.browser.add(element);
    }
}

#[given(regex = r"^a window titled `([^`]+)`$")]
fn window_titled(world: &mut WebWorld, title: String) {
    let handle = format!("w-{}", title.to_lowercase().replace(' ', "-"));
    world.browser.open_window(&handle, &title);
}

#[given(regex = r"^I initialize (.+) variable `([^`]+)` with value `([^`]*)`$")]
fn initialize_variable(world: &mut WebWorld, scopes: String, name: String, value: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    world
        .context
        .variables_mut()
        .put_string(&scopes, &name, value)
        .expect("variable stored");
}

#[given(regex = r"^I am on page with URL `([^`]+)`$")]
async fn open_page(world: &mut WebWorld, url: String) {
    NavigationSteps::new(&mut world.session, &mut world.context)
        .open_page(&url)
        .await
        .expect("page opened");
}
