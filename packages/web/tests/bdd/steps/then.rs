//! Then step definitions
//!
//! Assertions are recorded softly; the last steps of a scenario check what
//! was collected.

use cucumber::then;
use stepweave_core::{ComparisonRule, StringComparisonRule};
use stepweave_web::steps::{ElementState, ElementSteps, NavigationSteps, WebCookieSteps, WindowSteps};

use crate::world::WebWorld;

fn comparison(rule: &str) -> ComparisonRule {
    rule.parse().expect("known comparison rule")
}

fn string_rule(rule: &str) -> StringComparisonRule {
    rule.parse().expect("known string comparison rule")
}

// =============================================================================
// Page and elements
// =============================================================================

#[then(regex = r"^page URL (.+) `([^`]+)`$")]
async fn page_url(world: &mut WebWorld, rule: String, url: String) {
    NavigationSteps::new(&mut world.session, &mut world.context)
        .page_url_is(string_rule(&rule), &url)
        .await
        .expect("page URL read");
}

#[then(regex = r"^text of element located by `([^`]+)` (.+) `([^`]*)`$")]
async fn element_text(world: &mut WebWorld, locator: String, rule: String, text: String) {
    ElementSteps::new(&mut world.session, &mut world.context)
        .text_is(&locator, string_rule(&rule), &text)
        .await
        .expect("text read");
}

#[then(regex = r"^element located by `([^`]+)` has attribute `([^`]+)` with value (.+) `([^`]*)`$")]
async fn element_attribute(
    world: &mut WebWorld,
    locator: String,
    name: String,
    rule: String,
    value: String,
) {
    ElementSteps::new(&mut world.session, &mut world.context)
        .attribute_is(&locator, &name, string_rule(&rule), &value)
        .await
        .expect("attribute read");
}

#[then(regex = r"^element located by `([^`]+)` is ([A-Za-z_]+)$")]
async fn element_state(world: &mut WebWorld, locator: String, state: String) {
    let state = ElementState::parse(&state).expect("known element state");
    ElementSteps::new(&mut world.session, &mut world.context)
        .element_state_is(&locator, state)
        .await
        .expect("element state read");
}

#[then(regex = r"^number of elements found by `([^`]+)` is (.+) `(\d+)`$")]
async fn number_of_elements(world: &mut WebWorld, locator: String, rule: String, count: usize) {
    ElementSteps::new(&mut world.session, &mut world.context)
        .number_of_elements(&locator, comparison(&rule), count)
        .await
        .expect("elements counted");
}

#[then(regex = r"^element located by `([^`]+)` does not exist$")]
async fn element_does_not_exist(world: &mut WebWorld, locator: String) {
    ElementSteps::new(&mut world.session, &mut world.context)
        .element_does_not_exist(&locator)
        .await
        .expect("elements searched");
}

// =============================================================================
// Windows and cookies
// =============================================================================

#[then(regex = r"^number of opened windows is (.+) `(\d+)`$")]
async fn number_of_windows(world: &mut WebWorld, rule: String, count: usize) {
    WindowSteps::new(&mut world.session, &mut world.context)
        .number_of_windows(comparison(&rule), count)
        .await
        .expect("windows counted");
}

#[then(regex = r"^cookie with name `([^`]+)` is set$")]
async fn cookie_is_set(world: &mut WebWorld, name: String) {
    WebCookieSteps::new(&mut world.session, &mut world.context)
        .cookie_is_set(&name)
        .await
        .expect("cookies read");
}

#[then(regex = r"^cookie with name `([^`]+)` is not set$")]
async fn cookie_is_not_set(world: &mut WebWorld, name: String) {
    WebCookieSteps::new(&mut world.session, &mut world.context)
        .cookie_is_not_set(&name)
        .await
        .expect("cookies read");
}

// =============================================================================
// Browser state, variables and soft assertions
// =============================================================================

#[then(regex = r"^the browser received (\d+) page refreshes?$")]
fn refreshes(world: &mut WebWorld, count: usize) {
    assert_eq!(world.browser.state().refreshes, count);
}

#[then(regex = r"^the last script received (\d+) arguments?$")]
fn script_arguments(world: &mut WebWorld, count: usize) {
    let (_, args) = world.browser.last_script();
    assert_eq!(args.len(), count, "{args:?}");
}

#[then(regex = r"^variable `([^`]+)` is equal to `([^`]*)`$")]
fn variable_equals(world: &mut WebWorld, name: String, expected: String) {
    let actual = world.context.variables().get_string(&name);
    assert_eq!(actual.as_deref(), Some(expected.as_str()), "variable `{name}`");
}

#[then("there are no assertion failures")]
fn no_assertion_failures(world: &mut WebWorld) {
    if let Err(e) = world.context.assertions().verify() {
        panic!("{e}");
    }
}

#[then(regex = r"^assertion failures include `([^`]+)`$")]
fn assertion_failures_include(world: &mut WebWorld, text: String) {
    let failures: Vec<String> = world
        .context
        .assertions()
        .failures()
        .map(|failure| failure.to_string())
        .collect();
    assert!(
        failures.iter().any(|failure| failure.contains(&text)),
        "no failure contains '{text}': {failures:#?}"
    );
    // Expected failures must not fail the scenario
    world.context.soft_assert().clear();
}

#[then(regex = r"^finishing the scenario reports `([^`]+)`$")]
async fn finishing_scenario_reports(world: &mut WebWorld, text: String) {
    let failures = world
        .finish_scenario()
        .await
        .expect_err("pending assertion failures");
    assert!(failures.contains(&text), "{failures}");
}

#[then(regex = r"^variable `([^`]+)` is not set$")]
fn variable_not_set(world: &mut WebWorld, name: String) {
    let value = world.context.variables().get(&name);
    assert!(value.is_none(), "variable `{name}` still holds {value:?}");
}
