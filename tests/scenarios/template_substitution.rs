//! Test: Template Substitution - how templates are filled inside a run

use crate::helpers::*;

/// A template without the placeholder is sent unchanged and still gets the carry as input
#[tokio::test]
async fn test_template_without_placeholder() {
    let result = run_chain_with_mock(
        "Hello",
        &steps(&[("Fixed", "Write a haiku about autumn")]),
        vec![text("leaves fall")],
    )
    .await;

    assert_run_completed(&result);
    assert_step_completed(&result, 1, "Hello", "leaves fall");
    assert_eq!(result.generator.prompts(), vec!["Write a haiku about autumn".to_string()]);
}

/// Only the first placeholder is filled
#[tokio::test]
async fn test_only_first_placeholder_filled() {
    let result = run_chain_with_mock(
        "X",
        &steps(&[("Twice", "A{input}B{input}")]),
        vec![text("ok")],
    )
    .await;

    assert_eq!(result.generator.prompts(), vec!["AXB{input}".to_string()]);
}

/// Generated text containing the placeholder is inserted literally downstream
#[tokio::test]
async fn test_output_with_placeholder_not_expanded() {
    let result = run_chain_with_mock(
        "Hello",
        &steps(&[("Echo", "{input}"), ("Wrap", "<{input}>")]),
        vec![text("say {input}"), text("done")],
    )
    .await;

    assert_run_completed(&result);
    assert_eq!(
        result.generator.prompts(),
        vec!["Hello".to_string(), "<say {input}>".to_string()]
    );
    assert_step_completed(&result, 2, "say {input}", "done");
}

/// Multi-line inputs keep their layout
#[tokio::test]
async fn test_multiline_input() {
    let input = "line one\nline two\n\n  indented";
    let result = run_chain_with_mock(
        input,
        &steps(&[("Summarize", "Summarize the following text concisely:\n\n{input}")]),
        vec![text("short")],
    )
    .await;

    assert_eq!(
        result.generator.prompts()[0],
        format!("Summarize the following text concisely:\n\n{}", input)
    );
}
