use codejudge_core::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn valid_form() -> TaskForm {
    TaskForm {
        title: "Square".to_string(),
        description: "Print the square of n".to_string(),
        input_format: "A single integer n".to_string(),
        output_format: "n squared".to_string(),
        difficulty: "Medium".to_string(),
        time_limit: "2".to_string(),
        memory_limit: "256".to_string(),
        test_cases: r#"[{"input_data":"2","expected_output":"4"}]"#.to_string(),
        tags: "Math".to_string(),
    }
}

fn error_fields(form: &TaskForm) -> Vec<String> {
    validate_task(form)
        .unwrap_err()
        .field_errors()
        .fields()
        .map(str::to_string)
        .collect()
}

// ===== Successful normalization =====

#[test]
fn test_single_test_case_payload() {
    let payload = validate_task(&valid_form()).unwrap();

    assert_eq!(
        payload.testcases,
        vec![NewTestCase {
            input_data: "2".to_string(),
            expected_output: "4".to_string(),
        }]
    );
}

#[test]
fn test_payload_wire_shape() {
    let payload = validate_task(&valid_form()).unwrap();
    let value = serde_json::to_value(&payload).unwrap();

    assert_eq!(
        value,
        json!({
            "title": "Square",
            "description": "Print the square of n",
            "input_format": "A single integer n",
            "output_format": "n squared",
            "difficulty": {"name": "Medium"},
            "time_limit": 2,
            "memory_limit": 256,
            "testcases": [{"input_data": "2", "expected_output": "4"}],
            "tags": [{"name": "Math"}]
        })
    );
}

#[test]
fn test_tags_drop_empty_entries() {
    let form = TaskForm {
        tags: "Math, , Geometry".to_string(),
        ..valid_form()
    };
    let payload = validate_task(&form).unwrap();

    assert_eq!(payload.tags, vec![Tag::named("Math"), Tag::named("Geometry")]);
}

#[test]
fn test_extra_test_case_fields_are_dropped() {
    let form = TaskForm {
        test_cases: r#"[{"input_data":"1","expected_output":"1","is_public":true,"note":"x"}]"#
            .to_string(),
        ..valid_form()
    };
    let payload = validate_task(&form).unwrap();
    let value = serde_json::to_value(&payload.testcases).unwrap();

    assert_eq!(value, json!([{"input_data": "1", "expected_output": "1"}]));
}

#[test]
fn test_numeric_limits_are_parsed() {
    let form = TaskForm {
        time_limit: " 5 ".to_string(),
        memory_limit: "512".to_string(),
        ..valid_form()
    };
    let payload = validate_task(&form).unwrap();

    assert_eq!(payload.time_limit, 5);
    assert_eq!(payload.memory_limit, 512);
}

// ===== Field errors =====

#[rstest]
#[case::fraction("1.5")]
#[case::zero("0")]
#[case::negative("-3")]
fn test_limit_message_asks_for_whole_number(#[case] raw: &str) {
    let form = TaskForm {
        time_limit: raw.to_string(),
        memory_limit: raw.to_string(),
        ..valid_form()
    };
    let error = validate_task(&form).unwrap_err();

    assert_eq!(
        error.field_errors().get("timeLimit"),
        Some("Time limit must be a whole number greater than 0")
    );
    assert_eq!(
        error.field_errors().get("memoryLimit"),
        Some("Memory limit must be a whole number greater than 0")
    );
}

#[test]
fn test_empty_form_reports_every_required_field() {
    let form = TaskForm {
        time_limit: "0".to_string(),
        memory_limit: "-1".to_string(),
        ..TaskForm::default()
    };

    assert_eq!(
        error_fields(&form),
        vec![
            "description",
            "difficulty",
            "memoryLimit",
            "tags",
            "testCases",
            "timeLimit",
            "title",
        ]
    );
}

#[rstest]
#[case::blank_title(TaskForm { title: "   ".to_string(), ..valid_form() }, "title")]
#[case::blank_description(TaskForm { description: "\n".to_string(), ..valid_form() }, "description")]
#[case::no_difficulty(TaskForm { difficulty: String::new(), ..valid_form() }, "difficulty")]
#[case::zero_time(TaskForm { time_limit: "0".to_string(), ..valid_form() }, "timeLimit")]
#[case::text_time(TaskForm { time_limit: "fast".to_string(), ..valid_form() }, "timeLimit")]
#[case::zero_memory(TaskForm { memory_limit: "0".to_string(), ..valid_form() }, "memoryLimit")]
#[case::only_commas(TaskForm { tags: " , ,".to_string(), ..valid_form() }, "tags")]
#[case::empty_cases(TaskForm { test_cases: "[]".to_string(), ..valid_form() }, "testCases")]
fn test_single_violation_reports_only_that_field(#[case] form: TaskForm, #[case] field: &str) {
    assert_eq!(error_fields(&form), vec![field.to_string()]);
}

#[test]
fn test_validation_is_idempotent() {
    let form = TaskForm {
        title: String::new(),
        tags: String::new(),
        ..valid_form()
    };

    let first = validate_task(&form).unwrap_err();
    let second = validate_task(&form).unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_json_is_blocking() {
    let form = TaskForm {
        test_cases: "not json".to_string(),
        ..valid_form()
    };
    let error = validate_task(&form).unwrap_err();

    assert!(error.is_blocking());
    let errors = error.field_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("testCases"), Some("Test cases must be valid JSON"));
}

#[test]
fn test_invalid_json_still_reports_other_fields() {
    let form = TaskForm {
        title: String::new(),
        test_cases: "[{".to_string(),
        ..valid_form()
    };
    let error = validate_task(&form).unwrap_err();

    assert!(error.is_blocking());
    assert!(error.field_errors().contains("title"));
    assert!(error.field_errors().contains("testCases"));
}

#[test]
fn test_last_test_case_violation_wins() {
    let form = TaskForm {
        test_cases: r#"[
            {"input_data":"","expected_output":"1"},
            {"input_data":"1","expected_output":"1"},
            {"input_data":"3"}
        ]"#
        .to_string(),
        ..valid_form()
    };
    let error = validate_task(&form).unwrap_err();

    assert!(!error.is_blocking());
    assert_eq!(
        error.field_errors().get("testCases"),
        Some("Test case 3 must have both input_data and expected_output")
    );
}

// ===== Account forms =====

#[test]
fn test_register_form_rejects_bad_email() {
    let form = RegisterForm::new("bob", "not-an-email", "pw", "pw");
    let errors = form.check().unwrap_err();

    assert_eq!(errors.get("email"), Some("Enter a valid email address"));
}

// ===== Clipboard codec =====

#[test]
fn test_clipboard_text_two_public_cases_in_order() {
    let cases = vec![
        TestCase::new("1 2", "3").public(),
        TestCase::new("secret", "hidden"),
        TestCase::new("5 5", "10").public(),
    ];

    assert_eq!(
        to_clipboard_text(&cases),
        "Input:\n1 2\nExpected Output:\n3\n\nInput:\n5 5\nExpected Output:\n10"
    );
}

#[test]
fn test_clipboard_text_from_task() {
    let task: Task = serde_json::from_value(json!({
        "id": 1,
        "title": "Echo",
        "testcases": [
            {"input_data": "a", "expected_output": "a", "is_public": false}
        ]
    }))
    .unwrap();

    assert_eq!(to_clipboard_text(&task.testcases), "");
    assert_eq!(task.public_test_cases().count(), 0);
}
