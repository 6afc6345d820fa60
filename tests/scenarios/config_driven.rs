//! Test: Config Driven - chains loaded from YAML run end to end

use crate::helpers::*;
use prompt_chain::core::config::ChainConfig;

#[tokio::test]
async fn test_yaml_chain_runs_in_order() {
    let yaml = r#"
name: "Translate and shorten"
description: "Two-hop rewrite"
steps:
  - name: "Translate"
    template: "Translate to French: {input}"
  - name: "Shorten"
    template: "Make this shorter: {input}"
"#;

    let config = ChainConfig::from_yaml(yaml).unwrap();
    let result = run_chain_with_mock(
        "Good morning, how are you today?",
        &config.step_definitions(),
        vec![text("Bonjour, comment allez-vous aujourd'hui ?"), text("Bonjour !")],
    )
    .await;

    assert_run_completed(&result);
    assert_eq!(
        result.generator.prompts(),
        vec![
            "Translate to French: Good morning, how are you today?".to_string(),
            "Make this shorter: Bonjour, comment allez-vous aujourd'hui ?".to_string(),
        ]
    );
    assert_eq!(result.run.steps[0].name, "Translate");
    assert_eq!(result.run.final_output(), Some("Bonjour !"));
}

#[tokio::test]
async fn test_default_chain_runs_three_steps() {
    let config = ChainConfig::default_chain();
    let result = run_chain_with_mock(
        "A long report about quarterly sales.",
        &config.step_definitions(),
        vec![text("Sales grew."), text("1. growth 2. margin 3. churn"), text("Hire more reps.")],
    )
    .await;

    assert_run_completed(&result);
    assert_eq!(result.run.steps.len(), 3);

    let prompts = result.generator.prompts();
    assert!(prompts[0].ends_with("\n\nA long report about quarterly sales."));
    assert!(prompts[1].ends_with("\n\nSales grew."));
    assert!(prompts[2].ends_with("\n\n1. growth 2. margin 3. churn"));
    assert_eq!(result.run.final_output(), Some("Hire more reps."));
}

/// Template edits made before the run are what the service receives
#[tokio::test]
async fn test_template_override_applies() {
    let mut config = ChainConfig::default_chain();
    config
        .set_template(2, "List risks in: {input}".to_string())
        .unwrap();

    let result = run_chain_with_mock(
        "text",
        &config.step_definitions(),
        vec![text("summary"), text("risks"), text("plan")],
    )
    .await;

    assert_run_completed(&result);
    assert_eq!(result.generator.prompts()[1], "List risks in: summary");
}

/// Failure halts a config-driven chain the same way
#[tokio::test]
async fn test_yaml_chain_failure() {
    let yaml = r#"
name: "Two steps"
steps:
  - name: "First"
    template: "{input}"
  - name: "Second"
    template: "again: {input}"
"#;

    let config = ChainConfig::from_yaml(yaml).unwrap();
    let result = run_chain_with_mock(
        "Hello",
        &config.step_definitions(),
        vec![fail("invalid api key")],
    )
    .await;

    assert_run_failed(&result);
    assert_step_errored(&result, 1, "invalid api key");
    assert_step_pending(&result, 2);
}
