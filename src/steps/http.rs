//! Step definitions for HTTP client exchange scenarios.
//!
//! Given/when steps accumulate the pending request, `send` freezes and
//! dispatches it; then steps accumulate the expected response, `receive`
//! freezes and dispatches the verification. Header steps accept both
//! `name="value"` and `name is "value"`; response steps accept both the
//! `expect` and `verify` prefixes.

use cucumber::{gherkin::Step, given, then, when};

use crate::{
    error::{StepError, StepResult},
    exchange::HttpMethod,
    table,
    world::HttpWorld,
};

#[given(regex = r#"^http-client "([^"\s]+)"$"#)]
fn select_client(world: &mut HttpWorld, id: String) -> StepResult {
    world.select_client(&id)
}

#[given(regex = r"^(?:URL|url): (\S+)$")]
fn target_url(world: &mut HttpWorld, url: String) -> StepResult {
    world.set_url(&url)
}

#[given(regex = r#"^HTTP request header (\S+)(?:=| is )"(.+)"$"#)]
fn request_header(world: &mut HttpWorld, name: String, value: String) {
    world.exchange_mut().add_request_header(name, value);
}

#[given("HTTP request headers")]
fn request_headers(world: &mut HttpWorld, step: &Step) -> StepResult {
    for (name, value) in table::from_step(step)? {
        world.exchange_mut().add_request_header(name, value);
    }
    Ok(())
}

#[given(regex = r"^HTTP request body: (.+)$")]
fn request_body(world: &mut HttpWorld, body: String) {
    world.exchange_mut().set_request_body(body);
}

#[given("HTTP request body")]
fn request_body_block(world: &mut HttpWorld, step: &Step) -> StepResult {
    world.exchange_mut().set_request_body(docstring(step)?);
    Ok(())
}

#[when(regex = r"^send (GET|HEAD|POST|PUT|PATCH|DELETE|OPTIONS|TRACE)$")]
async fn send_method(world: &mut HttpWorld, method: HttpMethod) -> StepResult {
    world.send(Some(method), None).await
}

#[when(regex = r#"^send (GET|HEAD|POST|PUT|PATCH|DELETE|OPTIONS|TRACE) ([^"\s]+)$"#)]
async fn send_method_path(world: &mut HttpWorld, method: HttpMethod, path: String) -> StepResult {
    world.send(Some(method), Some(path)).await
}

#[when("send HTTP request")]
async fn send_raw(world: &mut HttpWorld, step: &Step) -> StepResult {
    world.send_raw(&docstring(step)?).await
}

#[then(regex = r#"^(?:expect|verify) HTTP response header (\S+)(?:=| is )"(.+)"$"#)]
fn response_header(world: &mut HttpWorld, name: String, value: String) {
    world.exchange_mut().add_response_header(name, value);
}

#[then(regex = r"^(?:expect|verify) HTTP response headers$")]
fn response_headers(world: &mut HttpWorld, step: &Step) -> StepResult {
    for (name, value) in table::from_step(step)? {
        world.exchange_mut().add_response_header(name, value);
    }
    Ok(())
}

#[then(regex = r#"^(?:expect|verify) HTTP response expression: (\S+)(?:=| is )"(.+)"$"#)]
fn response_expression(world: &mut HttpWorld, path: String, value: String) {
    world.exchange_mut().add_expression(path, value);
}

#[then(regex = r"^(?:expect|verify) HTTP response expressions$")]
fn response_expressions(world: &mut HttpWorld, step: &Step) -> StepResult {
    for (path, value) in table::from_step(step)? {
        world.exchange_mut().add_expression(path, value);
    }
    Ok(())
}

#[then(regex = r"^(?:expect|verify) HTTP response body: (.+)$")]
fn response_body(world: &mut HttpWorld, body: String) {
    world.exchange_mut().set_response_body(body);
}

#[then(regex = r"^(?:expect|verify) HTTP response body$")]
fn response_body_block(world: &mut HttpWorld, step: &Step) -> StepResult {
    world.exchange_mut().set_response_body(docstring(step)?);
    Ok(())
}

#[then(regex = r"^receive HTTP (\d+)(?: \S+)?$")]
async fn receive_status(world: &mut HttpWorld, status: u16) -> StepResult {
    world.receive(status).await
}

#[then("receive HTTP response")]
async fn receive_raw(world: &mut HttpWorld, step: &Step) -> StepResult {
    world.receive_raw(&docstring(step)?).await
}

/// The step's doc-string payload, without the leading separator newline.
fn docstring(step: &Step) -> Result<String, StepError> {
    step.docstring
        .as_ref()
        .map(|text| text.strip_prefix('\n').unwrap_or(text).to_string())
        .ok_or(StepError::MissingDocString)
}
