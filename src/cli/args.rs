//! Argument parsing helpers shared by the binary.

use super::output::{ColorChoice, OutputFormat};

/// Parse output format from string.
///
/// Accepts various format specifiers:
/// - "json" -> Json
/// - "json-pretty", "pretty" -> JsonPretty
/// - "human", "text" -> Human
///
/// # Errors
///
/// Returns an error message if the format is not recognized.
pub fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "json-pretty" | "jsonpretty" | "pretty" => Ok(OutputFormat::JsonPretty),
        "human" | "text" | "plain" => Ok(OutputFormat::Human),
        other => Err(format!(
            "Unknown output format '{other}'. Valid formats: human, json, json-pretty"
        )),
    }
}

/// Parse color choice from string.
///
/// # Errors
///
/// Returns an error message if the choice is not recognized.
pub fn parse_color_choice(s: &str) -> Result<ColorChoice, String> {
    match s.to_lowercase().as_str() {
        "auto" | "automatic" => Ok(ColorChoice::Auto),
        "always" | "on" | "yes" | "true" => Ok(ColorChoice::Always),
        "never" | "off" | "no" | "false" => Ok(ColorChoice::Never),
        other => Err(format!(
            "Unknown color choice '{other}'. Valid choices: auto, always, never"
        )),
    }
}

/// Default `tracing` filter for the given `-v` count and `-q` flag.
///
/// `-q` wins over any number of `-v`.
#[must_use]
pub const fn log_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test(name: &str) {
        crate::test_utils::init_test_logging();
        crate::test_phase!(name);
    }

    #[test]
    fn parse_output_format_valid() {
        init_test("parse_output_format_valid");
        let json = parse_output_format("JSON").unwrap();
        crate::assert_with_log!(json == OutputFormat::Json, "JSON", OutputFormat::Json, json);
        let pretty = parse_output_format("json-pretty").unwrap();
        crate::assert_with_log!(
            pretty == OutputFormat::JsonPretty,
            "json-pretty",
            OutputFormat::JsonPretty,
            pretty
        );
        let text = parse_output_format("text").unwrap();
        crate::assert_with_log!(
            text == OutputFormat::Human,
            "text",
            OutputFormat::Human,
            text
        );
        crate::test_complete!("parse_output_format_valid");
    }

    #[test]
    fn parse_output_format_invalid() {
        init_test("parse_output_format_invalid");
        let err = parse_output_format("xml").unwrap_err();
        let unknown = err.contains("Unknown output format") && err.contains("xml");
        crate::assert_with_log!(unknown, "unknown format", true, unknown);
        crate::test_complete!("parse_output_format_invalid");
    }

    #[test]
    fn parse_color_choice_values() {
        init_test("parse_color_choice_values");
        assert_eq!(parse_color_choice("AUTO"), Ok(ColorChoice::Auto));
        assert_eq!(parse_color_choice("on"), Ok(ColorChoice::Always));
        assert_eq!(parse_color_choice("false"), Ok(ColorChoice::Never));
        assert!(parse_color_choice("rainbow").is_err());
        crate::test_complete!("parse_color_choice_values");
    }

    #[test]
    fn verbosity_levels() {
        init_test("verbosity_levels");
        assert_eq!(log_directive(0, false), "warn");
        assert_eq!(log_directive(1, false), "info");
        assert_eq!(log_directive(2, false), "debug");
        assert_eq!(log_directive(7, false), "trace");
        assert_eq!(log_directive(3, true), "error");
        crate::test_complete!("verbosity_levels");
    }
}
