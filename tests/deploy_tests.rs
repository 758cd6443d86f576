//! Deployment tests with an in-memory system and a recording API

#![expect(clippy::unwrap_used, reason = "This is a test module")]

use anyhow::Result;
use lambda_hooks::config::Environment;
use lambda_hooks::error::HookError;
use lambda_hooks::operations::{
    ApiResponse, Credential, DeployOperation, DeployOptions, DeployOutcome, LambdaApi,
    PatchRequest,
};
use lambda_hooks::system::MockSystem;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Mutex;

const CONFIG: &str = r#"
development:
  host: dev.example.com
  account: "1001"
  object:
    id: 11
staging:
  host: staging.example.com
  account: "1002"
  object:
    id: LAM-12
    name: email-extractor
    code: "placeholder"
production:
  host: api.example.com
  account: 1003
  object:
    id: 13
    code: ~
"#;

const SCRIPT: &str = "exports.handler = async (event, context) => {\n  console.log('hi');\n};\n";

/// Records every request instead of sending it
struct RecordingApi {
    status: u16,
    calls: Mutex<Vec<(PatchRequest, Credential)>>,
}

impl RecordingApi {
    fn responding(status: u16) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(PatchRequest, Credential)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LambdaApi for RecordingApi {
    fn patch_lambda(&self, request: &PatchRequest, credential: &Credential) -> Result<ApiResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), credential.clone()));
        Ok(ApiResponse {
            status: self.status,
            body: "{\"error\":\"denied\"}".to_owned(),
        })
    }
}

fn options(dry_run: bool) -> DeployOptions {
    DeployOptions {
        config_path: PathBuf::from("config.yml"),
        script_path: PathBuf::from("code.js"),
        dry_run,
    }
}

fn system() -> MockSystem {
    MockSystem::new()
        .with_file("config.yml", CONFIG.as_bytes())
        .unwrap()
        .with_file("code.js", SCRIPT.as_bytes())
        .unwrap()
        .with_secret("key:secret")
        .unwrap()
}

#[test]
fn staging_release_inlines_code_and_patches_once() {
    let system = system();
    let api = RecordingApi::responding(200);

    let outcome = DeployOperation::new(options(false), &system, &api)
        .execute("release-staging")
        .unwrap();

    assert!(matches!(
        outcome,
        DeployOutcome::Deployed {
            environment: Environment::Staging,
            status: 200,
            ..
        }
    ));
    assert_eq!(
        system.prompts(),
        vec!["Enter your API key for branch release-staging".to_owned()]
    );

    let calls = api.calls();
    assert_eq!(calls.len(), 1);

    let (request, credential) = &calls[0];
    assert_eq!(
        request.url(),
        "https://staging.example.com/api/v1/accounts/1002/lambdas/LAM-12"
    );
    assert_eq!(
        serde_json::to_value(request.body()).unwrap(),
        json!({
            "lambda_action": {
                "id": "LAM-12",
                "name": "email-extractor",
                "code": SCRIPT,
            }
        })
    );
    assert_eq!(credential.username(), "key");
    assert_eq!(credential.password(), Some("secret"));
}

#[test]
fn null_code_placeholder_is_filled() {
    let system = system();
    let api = RecordingApi::responding(204);

    DeployOperation::new(options(false), &system, &api)
        .execute("release-production")
        .unwrap();

    let (request, _) = &api.calls()[0];
    assert_eq!(
        request.url(),
        "https://api.example.com/api/v1/accounts/1003/lambdas/13"
    );
    assert_eq!(request.object().get("code"), Some(&json!(SCRIPT)));
}

#[test]
fn object_without_code_is_sent_as_written() {
    let system = MockSystem::new()
        .with_file("config.yml", CONFIG.as_bytes())
        .unwrap()
        .with_secret("token")
        .unwrap();
    let api = RecordingApi::responding(200);

    DeployOperation::new(options(false), &system, &api)
        .execute("release-development")
        .unwrap();

    let (request, credential) = &api.calls()[0];
    assert_eq!(
        serde_json::to_value(request.body()).unwrap(),
        json!({"lambda_action": {"id": 11}})
    );
    assert_eq!(credential.password(), None);
}

#[test]
fn other_branches_do_nothing() {
    // No config or script exists: a no-op must not touch either
    let system = MockSystem::new();
    let api = RecordingApi::responding(200);

    for branch in ["main", "HEAD", "release-qa", "release-staging-hotfix"] {
        let outcome = DeployOperation::new(options(false), &system, &api)
            .execute(branch)
            .unwrap();
        assert_eq!(outcome, DeployOutcome::Skipped);
    }

    assert!(system.prompts().is_empty());
    assert!(api.calls().is_empty());
}

#[test]
fn dry_run_skips_prompt_and_request() {
    let system = system();
    let api = RecordingApi::responding(200);

    let outcome = DeployOperation::new(options(true), &system, &api)
        .execute("release-staging")
        .unwrap();

    let DeployOutcome::DryRun { request, .. } = &outcome else {
        panic!("expected a dry run, got {outcome:?}");
    };
    assert_eq!(request.object().get("code"), Some(&json!(SCRIPT)));
    assert!(system.prompts().is_empty());
    assert!(api.calls().is_empty());
}

#[test]
fn rejected_request_is_deploy_error() {
    let system = system();
    let api = RecordingApi::responding(401);

    let err = DeployOperation::new(options(false), &system, &api)
        .execute("release-staging")
        .unwrap_err();

    assert_eq!(err.downcast_ref::<HookError>().unwrap().exit_code(), 5);
    assert!(err.to_string().contains("HTTP 401"));
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn missing_script_fails_before_prompt() {
    let system = MockSystem::new()
        .with_file("config.yml", CONFIG.as_bytes())
        .unwrap()
        .with_secret("key")
        .unwrap();
    let api = RecordingApi::responding(200);

    let err = DeployOperation::new(options(false), &system, &api)
        .execute("release-staging")
        .unwrap_err();

    assert_eq!(err.downcast_ref::<HookError>().unwrap().exit_code(), 2);
    assert!(system.prompts().is_empty());
    assert!(api.calls().is_empty());
}

#[test]
fn missing_environment_is_configuration_error() {
    let config = CONFIG.replace("production:", "prod:");
    let system = MockSystem::new()
        .with_file("config.yml", config.as_bytes())
        .unwrap();
    let api = RecordingApi::responding(200);

    let err = DeployOperation::new(options(false), &system, &api)
        .execute("release-production")
        .unwrap_err();

    assert_eq!(err.downcast_ref::<HookError>().unwrap().exit_code(), 1);
    assert!(err.to_string().contains("Missing 'production' key in config.yml"));
}

#[test]
fn empty_api_key_is_rejected() {
    let system = MockSystem::new()
        .with_file("config.yml", CONFIG.as_bytes())
        .unwrap()
        .with_secret("")
        .unwrap();
    let api = RecordingApi::responding(200);

    let err = DeployOperation::new(options(false), &system, &api)
        .execute("release-development")
        .unwrap_err();

    assert!(err.to_string().contains("No API key entered"));
    assert!(api.calls().is_empty());
}

#[test]
fn anchored_environment_is_deployed() {
    let config = r#"
base: &base
  host: shared.example.com
  account: 77
development:
  <<: *base
  object: { id: 1 }
staging:
  <<: *base
  object:
    id: 2
    code: ~
    404: missing
production:
  <<: *base
  object: { id: 3 }
"#;
    let system = MockSystem::new()
        .with_file("config.yml", config.as_bytes())
        .unwrap()
        .with_file("code.js", SCRIPT.as_bytes())
        .unwrap()
        .with_secret("key:secret")
        .unwrap();
    let api = RecordingApi::responding(200);

    DeployOperation::new(options(false), &system, &api)
        .execute("release-staging")
        .unwrap();

    let (request, _) = &api.calls()[0];
    assert_eq!(
        request.url(),
        "https://shared.example.com/api/v1/accounts/77/lambdas/2"
    );
    assert_eq!(
        serde_json::to_value(request.body()).unwrap(),
        json!({"lambda_action": {"id": 2, "code": SCRIPT, "404": "missing"}})
    );
}
