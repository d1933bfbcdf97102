//! Plain-text rendering of public test cases for the clipboard.

use crate::domain::task::TestCase;

/// Renders every public test case as an `Input:` / `Expected Output:` block,
/// blocks separated by one blank line. Hidden cases are skipped.
pub fn to_clipboard_text(test_cases: &[TestCase]) -> String {
    test_cases
        .iter()
        .filter(|tc| tc.is_public)
        .map(|tc| {
            format!(
                "Input:\n{}\nExpected Output:\n{}",
                tc.input_data, tc.expected_output
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
