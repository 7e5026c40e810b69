//! Given step definitions
//!
//! Mock server setup, variables and pending request data.

use cucumber::{gherkin::Step, given};
use stepweave_core::VariableScope;
use stepweave_http::steps::HttpRequestSteps;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::world::{step_table, HttpWorld};

// =============================================================================
// Mock server
// =============================================================================

#[given("a mock HTTP server")]
async fn start_mock_server(world: &mut HttpWorld) {
    world.start_server().await;
}

#[given(regex = r#"^the server responds to (\w+) "([^"]+)" with status (\d+)$"#)]
async fn mock_response(world: &mut HttpWorld, verb: String, route: String, status: u16, step: &Step) {
    let mut template = ResponseTemplate::new(status);
    if let Some(body) = &step.docstring {
        template = template.set_body_string(body.trim());
    }
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(template)
        .mount(world.server())
        .await;
}

#[given(regex = r#"^the server responds to (\w+) "([^"]+)" with status (\d+) and header "([^"]+)" set to "([^"]*)"$"#)]
async fn mock_response_with_header(
    world: &mut HttpWorld,
    verb: String,
    route: String,
    status: u16,
    name: String,
    value: String,
) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(ResponseTemplate::new(status).insert_header(name.as_str(), value.as_str()))
        .mount(world.server())
        .await;
}

#[given(regex = r#"^the server responds to (\w+) "([^"]+)" with status (\d+) only when header "([^"]+)" is "([^"]*)"$"#)]
async fn mock_response_requiring_header(
    world: &mut HttpWorld,
    verb: String,
    route: String,
    status: u16,
    name: String,
    value: String,
) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .and(header(name.as_str(), value.as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(world.server())
        .await;
}

// =============================================================================
// Variables
// =============================================================================

#[given(regex = r"^I initialize (.+) variable `([^`]+)` with value `([^`]*)`$")]
fn initialize_variable(world: &mut HttpWorld, scopes: String, name: String, value: String) {
    let scopes = VariableScope::parse_set(&scopes).expect("valid scopes");
    let value = world.context.resolve(&value);
    world
        .context
        .variables_mut()
        .put_string(&scopes, &name, value)
        .expect("variable saved");
}

// =============================================================================
// Request data
// =============================================================================

#[given(regex = r"^request body: (.+)$")]
fn inline_request_body(world: &mut HttpWorld, content: String) {
    HttpRequestSteps::new(&mut world.session, &mut world.context).request_body(&content);
}

#[given("request body:")]
fn request_body(world: &mut HttpWorld, step: &Step) {
    let content = step.docstring.as_deref().expect("step requires a doc string");
    HttpRequestSteps::new(&mut world.session, &mut world.context).request_body(content.trim());
}

#[given("form data:")]
fn form_data(world: &mut HttpWorld, step: &Step) {
    let table = step_table(step);
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .form_data(&table)
        .expect("form data set");
}

#[given("multipart request:")]
fn multipart_request(world: &mut HttpWorld, step: &Step) {
    let table = step_table(step);
    HttpRequestSteps::new(&mut world.session, &mut world.context)
        .multipart_request(&table)
        .expect("multipart body set");
}
