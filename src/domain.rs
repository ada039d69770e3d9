//! Domain models for the documents this tool touches: judge problems and
//! their test cases.
//!
//! The store owns the schema; these models only need to be faithful enough
//! to write `hiddenTestCases` and read a problem back. Wire names are
//! camelCase, as the backend stores them.

use serde::{Deserialize, Serialize};

/// One hidden test case: a program input paired with the output the judge
/// expects, graded out of view of the end user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
  #[serde(default)]
  pub input: String,
  /// Older seed data spells this field `output`; accept both on read.
  #[serde(alias = "output")]
  pub expected_output: String,
}

/// Sample (user-visible) test case, with an optional explanation.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleTestCase {
  pub input: String,
  pub output: String,
  pub explanation: Option<String>,
}

/// Problem document as the judge backend stores it. Every field is
/// defaulted and unknown fields are ignored: this tool reads documents it
/// did not write.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Problem {
  pub title: String,
  pub description: String,
  pub difficulty: String,
  pub constraints: String,
  pub sample_test_cases: Vec<SampleTestCase>,
  pub hidden_test_cases: Vec<TestCase>,
  pub allowed_languages: Vec<String>,
  pub time_limit: Option<i64>,
  pub memory_limit: Option<i64>,
  pub tags: Vec<String>,
  pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use mongodb::bson::{self, doc};

  #[test]
  fn test_case_serializes_with_wire_names() {
    let case = TestCase { input: "abc".into(), expected_output: "cba".into() };
    let d = bson::to_document(&case).expect("document");
    assert_eq!(d.get_str("input").unwrap(), "abc");
    assert_eq!(d.get_str("expectedOutput").unwrap(), "cba");
  }

  #[test]
  fn legacy_output_field_still_deserializes() {
    let case: TestCase =
      bson::from_document(doc! { "input": "", "output": "Hello World" }).expect("case");
    assert_eq!(case.expected_output, "Hello World");
    assert!(case.input.is_empty());
  }

  #[test]
  fn partial_problem_documents_deserialize() {
    let d = doc! {
      "_id": "irrelevant",
      "title": "Hello world",
      "hiddenTestCases": [ { "input": "", "expectedOutput": "Hello World" } ],
    };
    let problem: Problem = bson::from_document(d).expect("problem");
    assert_eq!(problem.title, "Hello world");
    assert_eq!(problem.hidden_test_cases.len(), 1);
    assert_eq!(problem.hidden_test_cases[0].expected_output, "Hello World");
    assert!(problem.description.is_empty());
    assert!(problem.is_active.is_none());
  }
}
