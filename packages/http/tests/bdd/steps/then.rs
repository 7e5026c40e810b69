//! Then step definitions
//!
//! Assertions are recorded softly; the last steps of a scenario check what
//! was collected.

use cucumber::then;
use stepweave_core::{ComparisonRule, StringComparisonRule};
use stepweave_http::steps::{HttpCookieSteps, HttpResponseSteps, JsonSteps};

use crate::world::HttpWorld;

fn comparison(rule: &str) -> ComparisonRule {
    rule.parse().expect("known comparison rule")
}

fn string_rule(rule: &str) -> StringComparisonRule {
    rule.parse().expect("known string comparison rule")
}

// =============================================================================
// Response
// =============================================================================

#[then(regex = r"^response code is ([^`]+) `(\d+)`$")]
fn response_code(world: &mut HttpWorld, rule: String, code: u16) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .response_code_is(comparison(&rule), code);
}

#[then(regex = r"^response time is ([^`]+) `(\d+)` milliseconds$")]
fn response_time(world: &mut HttpWorld, rule: String, millis: u64) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .response_time_is(comparison(&rule), millis);
}

#[then(regex = r"^number of response headers with name `([^`]+)` is ([^`]+) `(\d+)`$")]
fn number_of_headers(world: &mut HttpWorld, name: String, rule: String, count: usize) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .number_of_response_headers(&name, comparison(&rule), count);
}

#[then(regex = r"^value of response header `([^`]+)` ([^`]+) `([^`]*)`$")]
fn response_header_value(world: &mut HttpWorld, name: String, rule: String, value: String) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .response_header_value(&name, string_rule(&rule), &value);
}

#[then(regex = r"^response body ([^`]+) `([^`]*)`$")]
fn response_body(world: &mut HttpWorld, rule: String, value: String) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .response_body(string_rule(&rule), &value);
}

#[then("response does not contain body")]
fn response_without_body(world: &mut HttpWorld) {
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .response_does_not_contain_body();
}

// =============================================================================
// JSON
// =============================================================================

#[then(regex = r"^JSON element value from context by JSON path `([^`]+)` ([^`]+) `([^`]*)`$")]
fn json_element_value(world: &mut HttpWorld, path: String, rule: String, value: String) {
    JsonSteps::new(&mut world.session, &mut world.context)
        .json_element_value(&path, string_rule(&rule), &value)
        .expect("valid JSON path");
}

#[then(regex = r"^number of JSON elements by JSON path `([^`]+)` is ([^`]+) `(\d+)`$")]
fn number_of_json_elements(world: &mut HttpWorld, path: String, rule: String, count: usize) {
    JsonSteps::new(&mut world.session, &mut world.context)
        .number_of_json_elements(&path, comparison(&rule), count)
        .expect("valid JSON path");
}

// =============================================================================
// Cookies and variables
// =============================================================================

#[then(regex = r"^HTTP cookie with name `([^`]+)` is set$")]
fn cookie_is_set(world: &mut HttpWorld, name: String) {
    HttpCookieSteps::new(&mut world.session, &mut world.context).cookie_is_set(&name);
}

#[then(regex = r"^variable `([^`]+)` is equal to `([^`]*)`$")]
fn variable_equals(world: &mut HttpWorld, name: String, expected: String) {
    let actual = world.context.variables().get_string(&name);
    assert_eq!(
        actual.as_deref(),
        Some(world.context.resolve(&expected).as_str()),
        "variable '{name}'"
    );
}

#[then(regex = r"^variable `([^`]+)` contains `([^`]*)`$")]
fn variable_contains(world: &mut HttpWorld, name: String, expected: String) {
    let actual = world
        .context
        .variables()
        .get_string(&name)
        .unwrap_or_else(|| panic!("variable '{name}' is not set"));
    assert!(actual.contains(&expected), "'{actual}' does not contain '{expected}'");
}

// =============================================================================
// Soft assertions
// =============================================================================

#[then("there are no assertion failures")]
fn no_assertion_failures(world: &mut HttpWorld) {
    if let Err(e) = world.context.assertions().verify() {
        panic!("{e}");
    }
}

/// Check an expected failure was recorded, then forget it so the scenario passes.
#[then(regex = r"^assertion failures include `([^`]+)`$")]
fn assertion_failures_include(world: &mut HttpWorld, text: String) {
    let found = world
        .context
        .assertions()
        .failures()
        .any(|failure| failure.to_string().contains(&text));
    assert!(
        found,
        "no failure mentions '{text}': {:?}",
        world.context.assertions().records()
    );
    world.context.soft_assert().clear();
}

#[then(regex = r"^finishing the scenario reports `([^`]+)`$")]
fn finishing_scenario_reports(world: &mut HttpWorld, text: String) {
    let failures = world
        .finish_scenario()
        .expect_err("pending assertion failures");
    assert!(failures.contains(&text), "{failures}");
}

#[then(regex = r"^variable `([^`]+)` is not set$")]
fn variable_not_set(world: &mut HttpWorld, name: String) {
    let value = world.context.variables().get(&name);
    assert!(value.is_none(), "variable `{name}` still holds {value:?}");
}
