//! When step definitions
//!
//! Steps that send requests, move the JSON context and save values.

use cucumber::{gherkin::Step, when};
use stepweave_core::VariableScope;
use stepweave_http::steps::{HttpCookieSteps, HttpRequestSteps, HttpResponseSteps, JsonSteps};

use crate::world::{step_table, HttpWorld};

// =============================================================================
// Request
// =============================================================================

#[when("I set request headers:")]
fn set_request_headers(world: &mut HttpWorld, step: &Step) {
    let table = step_table(step);
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .set_request_headers(&table)
        .expect("headers set");
}

#[when("I add request headers:")]
fn add_request_headers(world: &mut HttpWorld, step: &Step) {
    let table = step_table(step);
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .add_request_headers(&table)
        .expect("headers added");
}

#[when(regex = r"^I set HTTP request timeout to `([^`]+)`$")]
fn set_request_timeout(world: &mut HttpWorld, duration: String) {
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .set_request_timeout(&duration)
        .expect("valid duration");
}

#[when(regex = r"^I execute HTTP (\w+) request for resource with URL `([^`]+)`$")]
async fn execute_request(world: &mut HttpWorld, method: String, url: String) {
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .execute_request(&method, &url)
        .await
        .expect("HTTP request executed");
}

// =============================================================================
// Saving response data
// =============================================================================

#[when(regex = r"^I save response header `([^`]+)` value to (.+) variable `([^`]+)`$")]
fn save_response_header(world: &mut HttpWorld, name: String, scopes: String, variable: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .save_response_header(&name, &scopes, &variable)
        .expect("header saved");
}

#[when(regex = r"^I save response body to (.+) variable `([^`]+)`$")]
fn save_response_body(world: &mut HttpWorld, scopes: String, variable: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .save_response_body(&scopes, &variable)
        .expect("body saved");
}

#[when(regex = r"^I save cURL command of last request to (.+) variable `([^`]+)`$")]
fn save_curl_command(world: &mut HttpWorld, scopes: String, variable: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    HttpResponseSteps::new(&mut world.session, &mut world.context)
        .save_curl_command(&scopes, &variable)
        .expect("cURL command saved");
}

// =============================================================================
// JSON
// =============================================================================

#[when(regex = r"^I change JSON context to element by JSON path `([^`]+)`$")]
fn change_json_context(world: &mut HttpWorld, path: String) {
    JsonSteps::new(&mut world.session, &mut world.context)
        .change_json_context(&path)
        .expect("valid JSON path");
}

#[when("I reset JSON context")]
fn reset_json_context(world: &mut HttpWorld) {
    JsonSteps::new(&mut world.session, &mut world.context).reset_json_context();
}

#[when(regex = r"^I save JSON element value from context by JSON path `([^`]+)` to (.+) variable `([^`]+)`$")]
fn save_json_element(world: &mut HttpWorld, path: String, scopes: String, variable: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    JsonSteps::new(&mut world.session, &mut world.context)
        .save_json_element(&path, &scopes, &variable)
        .expect("JSON element saved");
}

// =============================================================================
// Cookies
// =============================================================================

#[when(regex = r"^I save value of HTTP cookie with name `([^`]+)` to (.+) variable `([^`]+)`$")]
fn save_cookie_value(world: &mut HttpWorld, name: String, scopes: String, variable: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    HttpCookieSteps::new(&mut world.session, &mut world.context)
        .save_cookie_value(&name, &scopes, &variable)
        .expect("cookie value saved");
}

#[when(regex = r"^I remove HTTP cookie with name `([^`]+)`$")]
fn remove_cookie(world: &mut HttpWorld, name: String) {
    HttpCookieSteps::new(&mut world.session, &mut world.context).remove_cookie(&name);
}

#[when("I clear HTTP cookies")]
fn clear_cookies(world: &mut HttpWorld) {
    HttpCookieSteps::new(&mut world.session, &mut world.context).clear_cookies();
}
