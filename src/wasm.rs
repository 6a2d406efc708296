//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::error::ValidatorError;
use crate::options::RepairOptions;
use crate::report::Report;

/// Validate (and by default repair) a workflow JSON document.
/// `options_json` may be empty for the defaults.
/// Returns a JSON object with either `report` (success) or `errors`.
#[wasm_bindgen]
pub fn validate_workflow(json: &str, options_json: &str) -> JsValue {
    let result = validate_workflow_inner(json, options_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Rule results only, no repair.
#[wasm_bindgen]
pub fn check_workflow(json: &str) -> JsValue {
    let result = validate_workflow_inner(json, r#"{"validateOnly":true}"#);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_workflow_inner(json: &str, options_json: &str) -> ValidateResult {
    let options = if options_json.trim().is_empty() {
        RepairOptions::default()
    } else {
        match RepairOptions::from_json(options_json) {
            Ok(o) => o,
            Err(e) => {
                return ValidateResult::Errors {
                    errors: vec![ErrorDto {
                        code: "P001".into(),
                        phase: "Parse".into(),
                        classification: "malformed-input".into(),
                        message: format!("Failed to parse options JSON: {}", e),
                        node_id: None,
                    }],
                };
            }
        }
    };

    match crate::validate_json(json, &options) {
        Ok(report) => ValidateResult::Success {
            report: Box::new(report),
        },
        Err(e) => ValidateResult::Errors {
            errors: vec![ErrorDto::from(e)],
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize, serde::Deserialize)]
struct ErrorDto {
    code: String,
    phase: String,
    classification: String,
    message: String,
    node_id: Option<String>,
}

impl From<ValidatorError> for ErrorDto {
    fn from(e: ValidatorError) -> Self {
        ErrorDto {
            code: e.code.to_string(),
            phase: e.phase.to_string(),
            classification: e.classification().to_string(),
            message: e.message,
            node_id: e.node_id,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(tag = "status")]
enum ValidateResult {
    #[serde(rename = "success")]
    Success { report: Box<Report> },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
