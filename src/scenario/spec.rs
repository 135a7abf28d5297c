//! Scenario file types
//!
//! Defines the data structures for deserializing YAML scenarios and the
//! structural validation applied before anything is launched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::{Error, Result};
use crate::query::UiQuery;
use crate::session::LaunchSpec;

/// A complete scenario loaded from a YAML file
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Fixture files/directories that must exist before the run
    #[serde(default)]
    pub fixtures: Vec<PathBuf>,
    /// How to launch the application under test
    pub application: LaunchSpec,
    /// Per-scenario overrides
    #[serde(default)]
    pub settings: Settings,
    /// The ordered steps to execute
    pub steps: Vec<ScenarioStep>,
}

/// Per-scenario settings
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Bounded wait per step, overriding the harness config
    pub step_timeout_ms: Option<u64>,
}

/// A single step in the execution flow
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Readiness gate; must be the first step
    Launch,
    /// Perform a named UI action
    Perform {
        /// Action name understood by the automation agent
        /// (e.g. "create_project", "open_project")
        name: String,
        #[serde(default)]
        args: BTreeMap<String, String>,
    },
    /// Assert an element exists in the live object tree
    AssertExists {
        query: UiQuery,
        /// Human-readable message recorded with the outcome
        message: String,
    },
    /// Switch the application's top-level view/mode
    SwitchView { view: String },
    /// Orderly application shutdown; terminal step
    Exit,
}

impl Scenario {
    /// Load and validate a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let scenario: Scenario = serde_yaml::from_str(&content)
            .map_err(|e| Error::Scenario(format!("failed to parse scenario: {}", e)))?;

        scenario.validate()?;
        Ok(scenario)
    }

    /// Structural validation
    ///
    /// A scenario must open with `launch`, may close with `exit`, and every
    /// query must be well-formed. Violations are structural errors, never
    /// assertion failures.
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::Scenario("scenario has no steps".to_string()));
        }

        if !matches!(self.steps[0], ScenarioStep::Launch) {
            return Err(Error::Scenario(
                "first step must be 'launch'".to_string(),
            ));
        }

        for (i, step) in self.steps.iter().enumerate() {
            match step {
                ScenarioStep::Launch if i != 0 => {
                    return Err(Error::Scenario(format!(
                        "step {}: 'launch' is only valid as the first step",
                        i + 1
                    )));
                }
                ScenarioStep::Exit if i + 1 != self.steps.len() => {
                    return Err(Error::Scenario(format!(
                        "step {}: 'exit' is terminal and must be the last step",
                        i + 1
                    )));
                }
                ScenarioStep::Perform { name, .. } if name.is_empty() => {
                    return Err(Error::Scenario(format!(
                        "step {}: perform action has an empty name",
                        i + 1
                    )));
                }
                ScenarioStep::SwitchView { view } if view.is_empty() => {
                    return Err(Error::Scenario(format!(
                        "step {}: switch_view has an empty view id",
                        i + 1
                    )));
                }
                ScenarioStep::AssertExists { query, .. } => {
                    query.validate()?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Verify all fixtures exist, resolving relative paths
    ///
    /// Relative fixtures are tried next to the scenario file first, then
    /// under each configured fixture root. A fixture that resolves nowhere
    /// makes the run a setup failure.
    pub fn check_fixtures(&self, scenario_dir: &Path, roots: &[PathBuf]) -> Result<()> {
        for fixture in &self.fixtures {
            if resolve_fixture(fixture, scenario_dir, roots).is_none() {
                return Err(Error::FixtureMissing(fixture.clone()));
            }
        }
        Ok(())
    }
}

/// Resolve a fixture path to an existing location, if any
pub fn resolve_fixture(
    fixture: &Path,
    scenario_dir: &Path,
    roots: &[PathBuf],
) -> Option<PathBuf> {
    if fixture.is_absolute() {
        return fixture.exists().then(|| fixture.to_path_buf());
    }

    let local = scenario_dir.join(fixture);
    if local.exists() {
        return Some(local);
    }

    roots.iter().map(|root| root.join(fixture)).find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Scenario {
        serde_yaml::from_str(yaml).expect("scenario should parse")
    }

    const MINIMAL: &str = r#"
name: minimal
application:
  program: mock-app
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Button
      scope: welcome.scroll_view
      properties:
        text: Get Started Now
    message: "Welcome page shows the Get Started Now button"
  - action: exit
"#;

    #[test]
    fn minimal_scenario_parses_and_validates() {
        let scenario = parse(MINIMAL);
        scenario.validate().unwrap();
        assert_eq!(scenario.name, "minimal");
        assert_eq!(scenario.steps.len(), 3);
    }

    #[test]
    fn first_step_must_be_launch() {
        let scenario = parse(
            r#"
name: bad
application: { program: mock-app }
steps:
  - action: exit
"#,
        );
        assert!(matches!(scenario.validate(), Err(Error::Scenario(_))));
    }

    #[test]
    fn launch_is_only_valid_first() {
        let scenario = parse(
            r#"
name: bad
application: { program: mock-app }
steps:
  - action: launch
  - action: launch
"#,
        );
        assert!(matches!(scenario.validate(), Err(Error::Scenario(_))));
    }

    #[test]
    fn exit_must_be_last() {
        let scenario = parse(
            r#"
name: bad
application: { program: mock-app }
steps:
  - action: launch
  - action: exit
  - action: switch_view
    view: welcome
"#,
        );
        assert!(matches!(scenario.validate(), Err(Error::Scenario(_))));
    }

    #[test]
    fn empty_steps_are_rejected() {
        let scenario = parse(
            r#"
name: bad
application: { program: mock-app }
steps: []
"#,
        );
        assert!(matches!(scenario.validate(), Err(Error::Scenario(_))));
    }

    #[test]
    fn bad_query_pattern_fails_validation() {
        let scenario = parse(
            r#"
name: bad
application: { program: mock-app }
steps:
  - action: launch
  - action: assert_exists
    query:
      type: Text
      properties:
        text: { pattern: "(unclosed" }
    message: "broken"
"#,
        );
        assert!(matches!(
            scenario.validate(),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn unknown_action_fails_to_parse() {
        let result: std::result::Result<Scenario, _> = serde_yaml::from_str(
            r#"
name: bad
application: { program: mock-app }
steps:
  - action: teleport
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn fixture_resolution_prefers_scenario_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scenario_dir = dir.path().join("scenarios");
        let root = dir.path().join("sdk");
        std::fs::create_dir_all(scenario_dir.join("data")).unwrap();
        std::fs::create_dir_all(root.join("data")).unwrap();
        std::fs::write(scenario_dir.join("data/project.pro"), "").unwrap();
        std::fs::write(root.join("data/project.pro"), "").unwrap();

        let resolved = resolve_fixture(
            Path::new("data/project.pro"),
            &scenario_dir,
            &[root.clone()],
        )
        .unwrap();
        assert!(resolved.starts_with(&scenario_dir));
    }

    #[test]
    fn missing_fixture_is_setup_failure() {
        let scenario = parse(
            r#"
name: needs-fixture
application: { program: mock-app }
fixtures:
  - examples/animation/property-animation
steps:
  - action: launch
"#,
        );
        let err = scenario
            .check_fixtures(Path::new("/nonexistent"), &[])
            .expect_err("fixture should be missing");
        assert!(err.is_setup_failure());
    }
}
