//! Rule documents built on top of schema enforcement.
//!
//! A rule lines up `input_conditions` against `output_assertions`; both are
//! tables of conditions, and each condition carries one entry per case. Case
//! ids are spreadsheet-style letters shared by every condition.
use once_cell::sync::Lazy;
use serde_json::{Value, json};

use crate::error::{Error, Result, row_path};
use crate::kind::{Shape, shape_of};
use crate::schema::{EnforceOptions, enforce_schema_with, enforce_schema_with_tables};

pub const INPUT_CONDITIONS: &str = "input_conditions";
pub const OUTPUT_ASSERTIONS: &str = "output_assertions";
const CONDITION_LISTS: [&str; 2] = [INPUT_CONDITIONS, OUTPUT_ASSERTIONS];

pub static RULE_SCHEMA: Lazy<Value> = Lazy::new(|| json!({
    "__metadata": "Non-computational information about the creation and ownership of the rule",
    "metadata": {
        "__rule": "Information about the rule",
        "rule": {
            "title": "Simple Rule",
            "__title": "The title of the rule",
            "description": "This is a simple rule that determines the required xyz for a given abc.",
            "__description": "A brief description of the rule",
            "__authors": "An array of author information, including name and contact info",
            "authors": [{
                "name": "Ryan Fleck",
                "__name": "The author's full plaintext name",
                "email": "Ryan.Fleck@protonmail.com",
                "__email": "The author's email address",
                "solid_profile": "https://ryanfleck.solid.community/profile/card#me",
                "__solid_profile": "Full address to personal solid profile",
            }],
        },
    },
    "__input_conditions": "Conditions read from the pathified input document",
    "input_conditions": [{
        "parameter": "business.address.city",
        "__parameter": "Dotted path of the input value this condition reads",
        "description": "City the business operates in",
        "__description": "A brief description of the condition",
        "__cases": "The value this condition takes in each case, in case order",
        "cases": [{
            "case": "A",
            "__case": "Case identifier shared by every condition and assertion",
            "value": "Ottawa",
            "__value": "Value the parameter must hold for this case to apply",
        }],
    }],
    "__output_assertions": "Values asserted on the output document when a case applies",
    "output_assertions": [{
        "parameter": "tax.rate",
        "__parameter": "Dotted path of the output value this assertion sets",
        "description": "Applicable tax rate",
        "__description": "A brief description of the assertion",
        "__cases": "The value asserted in each case, in case order",
        "cases": [{
            "case": "A",
            "__case": "Case identifier shared by every condition and assertion",
            "value": "0.13",
            "__value": "Value asserted when this case applies",
        }],
    }],
}));

/// Bijective base-26 letters: 0 → `A`, 25 → `Z`, 26 → `AA`.
pub fn generate_case_value(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// A blank rule with one condition, one assertion and case `A` in both.
pub fn generate_new_rule() -> Result<Value> {
    let mut rule = enforce_schema_with_tables(&RULE_SCHEMA, &json!({}))?;
    for list in CONDITION_LISTS {
        if let Some(case) = rule.pointer_mut(&format!("/{list}/0/cases/0/case")) {
            *case = Value::String(generate_case_value(0));
        }
    }
    Ok(rule)
}

/// Append one blank case to every condition and assertion.
pub fn add_new_case(rule: &Value) -> Result<Value> {
    let mut rule = conform(rule)?;
    let current = case_count(&rule);
    let case_id = generate_case_value(current);
    tracing::debug!(case = %case_id, "adding case");

    for list in CONDITION_LISTS {
        let blank = blank_case(list, current)?;
        for (i, condition) in conditions_mut(&mut rule, list)?.iter_mut().enumerate() {
            let cases = cases_mut(condition, &row_path(list, i))?;
            if cases.len() != current {
                return Err(Error::ConditionCaseCountMismatch {
                    list: list.to_string(),
                    path: format!("{}.cases", row_path(list, i)),
                    expected: current,
                    found: cases.len(),
                });
            }
            cases.push(blank.clone());
        }
    }
    Ok(rule)
}

pub fn add_new_input_condition(rule: &Value) -> Result<Value> {
    add_new_condition(rule, INPUT_CONDITIONS)
}

pub fn add_new_output_assertion(rule: &Value) -> Result<Value> {
    add_new_condition(rule, OUTPUT_ASSERTIONS)
}

fn add_new_condition(rule: &Value, list: &str) -> Result<Value> {
    let mut rule = conform(rule)?;
    let cases = (0..case_count(&rule))
        .map(|i| blank_case(list, i))
        .collect::<Result<Vec<_>>>()?;

    let mut condition = enforce_schema_with_tables(&RULE_SCHEMA[list][0], &json!({}))?;
    condition["cases"] = Value::Array(cases);
    conditions_mut(&mut rule, list)?.push(condition);
    Ok(rule)
}

// ------------------------------- Helpers ---------------------------------- //

/// Copy of `rule` completed against the rule schema. Empty tables stay empty
/// so case counts are taken from what the caller actually holds.
fn conform(rule: &Value) -> Result<Value> {
    enforce_schema_with(&RULE_SCHEMA, rule, EnforceOptions::default())
}

/// Cases of the first input condition decide how many cases the rule has;
/// a rule without input conditions has none.
fn case_count(rule: &Value) -> usize {
    rule.pointer(&format!("/{INPUT_CONDITIONS}/0/cases"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn blank_case(list: &str, index: usize) -> Result<Value> {
    let mut case = enforce_schema_with_tables(&RULE_SCHEMA[list][0]["cases"][0], &json!({}))?;
    case["case"] = Value::String(generate_case_value(index));
    Ok(case)
}

fn conditions_mut<'a>(rule: &'a mut Value, list: &str) -> Result<&'a mut Vec<Value>> {
    let found = rule.get(list).map_or(Shape::Null, shape_of);
    rule.get_mut(list)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::InvalidDocument { path: list.to_string(), found })
}

fn cases_mut<'a>(condition: &'a mut Value, path: &str) -> Result<&'a mut Vec<Value>> {
    let found = condition.get("cases").map_or(Shape::Null, shape_of);
    condition.get_mut("cases")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| Error::InvalidDocument { path: format!("{path}.cases"), found })
}

// ------------------------------- Tests ------------------------------------ //
