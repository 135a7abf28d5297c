//! End-to-end integration tests for the acceptance harness
//!
//! These tests run the `uitest` binary against the `mock-app` automation
//! agent: scenarios are written to a scratch directory with the mock-app
//! path injected, then executed and checked for verdicts and exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Test context with scratch paths and environment isolation
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("runtime")).expect("runtime dir");
        Self { temp_dir }
    }

    fn scenario_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a scenario file with the mock-app binary path injected
    fn write_scenario(&self, name: &str, body: &str) -> PathBuf {
        let yaml = body.replace("__MOCK_APP__", mock_app_bin());
        let path = self.scenario_dir().join(name);
        fs::write(&path, yaml).expect("failed to write scenario");
        path
    }

    /// Create a fixture file relative to the scenario directory
    fn write_fixture(&self, relative: &str) {
        let path = self.scenario_dir().join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("fixture dir");
        fs::write(&path, "").expect("fixture file");
    }

    /// Run the harness binary with isolated runtime/config dirs
    fn run_uitest(&self, args: &[&str]) -> Output {
        self.run_uitest_with_env(args, &[])
    }

    fn run_uitest_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_uitest"));
        cmd.args(args)
            .env("XDG_RUNTIME_DIR", self.temp_dir.path().join("runtime"))
            .env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"))
            .env("NO_COLOR", "1");
        for (k, v) in env {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run uitest")
    }
}

fn mock_app_bin() -> &'static str {
    env!("CARGO_BIN_EXE_mock-app")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const WELCOME_SCENARIO: &str = r#"
name: welcome-page-recent-projects
description: Welcome screen updates its sessions and recent projects
fixtures:
  - property-animation/propertyanimation.pro
application:
  program: __MOCK_APP__
settings:
  step_timeout_ms: 10000
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Button
      scope: welcome.scroll_view
      properties: { text: Get Started Now, id: gettingStartedButton }
    message: "Welcome page displays the Get Started Now button"
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: Sessions, id: sessionsTitle }
    message: "Welcome page displays the Sessions section"
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: default, id: text }
    message: "Welcome page lists the default session"
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: Recent Projects, id: recentProjectsTitle }
    message: "Welcome page displays the Recent Projects section"
  - action: perform
    name: create_project
    args: { name: SampleApp }
  - action: assert_exists
    query:
      type: TreeItem
      scope: edit.navigation
      properties:
        text: { pattern: "SampleApp( \\(.*\\))?" }
    message: "The created project is opened in the navigation tree"
  - action: switch_view
    view: welcome
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: default (current session), id: text }
    message: "Welcome page lists the default session as current"
  - action: assert_exists
    query:
      type: LinkedText
      scope: welcome.scroll_view
      properties: { text: SampleApp, id: projectNameText }
    message: "Welcome page lists the created project under Recent Projects"
  - action: perform
    name: open_project
    args: { path: property-animation/propertyanimation.pro }
  - action: assert_exists
    query:
      type: TreeItem
      scope: edit.navigation
      properties:
        text: { pattern: "propertyanimation( \\(.*\\))?" }
    message: "The opened project appears in the navigation tree"
  - action: switch_view
    view: welcome
  - action: assert_exists
    query:
      type: LinkedText
      scope: welcome.scroll_view
      properties: { text: propertyanimation, id: projectNameText }
    message: "Welcome page lists the opened project under Recent Projects"
  - action: assert_exists
    query:
      type: LinkedText
      scope: welcome.scroll_view
      properties: { text: SampleApp, id: projectNameText }
    message: "Welcome page still lists the created project"
  - action: exit
"#;

// ============== Tests ==============

#[test]
fn validate_accepts_wellformed_scenario() {
    let ctx = TestContext::new();
    let path = ctx.write_scenario("welcome.yaml", WELCOME_SCENARIO);

    let output = ctx.run_uitest(&["validate", path.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "validate failed:\nstdout: {}\nstderr: {}",
        stdout_of(&output),
        stderr_of(&output)
    );
    assert!(stdout_of(&output).contains("structurally valid"));
}

#[test]
fn validate_rejects_scenario_without_launch() {
    let ctx = TestContext::new();
    let path = ctx.write_scenario(
        "no_launch.yaml",
        r#"
name: no-launch
application: { program: __MOCK_APP__ }
steps:
  - action: switch_view
    view: welcome
"#,
    );

    let output = ctx.run_uitest(&["validate", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(
        stderr_of(&output).contains("first step must be 'launch'"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
}

#[test]
fn welcome_scenario_passes_end_to_end() {
    let ctx = TestContext::new();
    ctx.write_fixture("property-animation/propertyanimation.pro");
    let path = ctx.write_scenario("welcome.yaml", WELCOME_SCENARIO);

    let output = ctx.run_uitest(&["run", path.to_str().unwrap()]);
    let stdout = stdout_of(&output);
    assert!(
        output.status.success(),
        "run failed:\nstdout: {}\nstderr: {}",
        stdout,
        stderr_of(&output)
    );
    assert!(stdout.contains("Scenario Passed"), "stdout: {}", stdout);
    assert!(!stdout.contains("✗"), "unexpected failures in: {}", stdout);
}

#[test]
fn missing_fixture_marks_run_inconclusive() {
    let ctx = TestContext::new();
    // No fixture written: the preflight must abort before launching.
    let path = ctx.write_scenario("welcome.yaml", WELCOME_SCENARIO);

    let output = ctx.run_uitest(&["run", path.to_str().unwrap()]);
    let stdout = stdout_of(&output);
    assert!(
        output.status.success(),
        "inconclusive run must exit zero:\nstdout: {}\nstderr: {}",
        stdout,
        stderr_of(&output)
    );
    assert!(stdout.contains("Scenario Inconclusive"), "stdout: {}", stdout);
    assert!(
        !stdout.contains("Step 1"),
        "no step should have run: {}",
        stdout
    );
}

#[test]
fn failed_assertion_fails_run_but_later_steps_execute() {
    let ctx = TestContext::new();
    let path = ctx.write_scenario(
        "partial.yaml",
        r#"
name: partial-failure
application: { program: __MOCK_APP__ }
settings: { step_timeout_ms: 10000 }
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Button
      scope: welcome.scroll_view
      properties: { text: Open Project }
    message: "Welcome page displays the Open Project button"
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: Sessions }
    message: "Welcome page displays the Sessions section"
  - action: exit
"#,
    );

    let output = ctx.run_uitest(&["run", path.to_str().unwrap()]);
    let stdout = stdout_of(&output);
    assert!(
        !output.status.success(),
        "failed scenario must exit non-zero: {}",
        stdout
    );
    assert!(stdout.contains("Scenario Failed"), "stdout: {}", stdout);
    // Assertions are independent: the run continued past the failure.
    assert!(
        stdout.contains("Welcome page displays the Sessions section"),
        "later assertion did not run: {}",
        stdout
    );
}

#[test]
fn plugin_error_marks_run_inconclusive() {
    let ctx = TestContext::new();
    let path = ctx.write_scenario(
        "plugin_error.yaml",
        r#"
name: plugin-error
application: { program: __MOCK_APP__ }
settings: { step_timeout_ms: 10000 }
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Text
      scope: welcome.scroll_view
      properties: { text: Sessions }
    message: "never evaluated"
"#,
    );

    let output = ctx.run_uitest_with_env(
        &["run", path.to_str().unwrap()],
        &[("MOCK_APP_PLUGIN_ERROR", "plugin 'Welcome' failed to load")],
    );
    let stdout = stdout_of(&output);
    assert!(
        output.status.success(),
        "inconclusive run must exit zero: {}",
        stdout
    );
    assert!(stdout.contains("Scenario Inconclusive"), "stdout: {}", stdout);
    assert!(
        !stdout.contains("never evaluated"),
        "assertion should have been skipped: {}",
        stdout
    );
}

#[test]
fn unresolvable_scope_is_a_hard_error() {
    let ctx = TestContext::new();
    let path = ctx.write_scenario(
        "broken_scope.yaml",
        r#"
name: broken-scope
application: { program: __MOCK_APP__ }
settings: { step_timeout_ms: 10000 }
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Text
      scope: welcome.sidebar
      properties: { text: Sessions }
    message: "never evaluated"
"#,
    );

    let output = ctx.run_uitest(&["run", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(
        stderr_of(&output).contains("could not be resolved"),
        "unexpected stderr: {}",
        stderr_of(&output)
    );
}
