use serde::Serialize;

use sf_core::responses::ActionResult;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print an `ActionResult` and turn a failure into a non-zero exit.
pub fn output_action<T: Serialize>(result: &ActionResult<T>, format: OutputFormat) -> anyhow::Result<()> {
    output(result, format)?;
    if result.success {
        return Ok(());
    }
    anyhow::bail!(
        "{}",
        result.code.as_deref().unwrap_or("internal_error")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::errors::{Locale, WorkflowError};

    #[test]
    fn raw_is_single_line() {
        let rendered = render(&serde_json::json!({"a": [1, 2]}), OutputFormat::Raw).unwrap();
        assert_eq!(rendered, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn json_is_pretty() {
        let rendered = render(&serde_json::json!({"a": 1}), OutputFormat::Json).unwrap();
        assert!(rendered.contains('\n'));
    }

    #[test]
    fn failed_action_becomes_error_with_code() {
        let result: ActionResult<u32> =
            ActionResult::failure(&WorkflowError::Validation("x".into()), Locale::En);
        let err = output_action(&result, OutputFormat::Raw).unwrap_err();
        assert_eq!(err.to_string(), "validation_error");
    }
}
