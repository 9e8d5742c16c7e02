//! The weather tool exposed to the chat agent.

use serde::Deserialize;

use crate::chat::{FunctionDefinition, Tool};
use crate::error::{AgentError, AgentResult};

/// Function name advertised to the model.
pub const WEATHER_TOOL_NAME: &str = "get_weather";

const CONDITIONS: [&str; 4] = ["sunny", "cloudy", "rainy", "stormy"];

/// Synthesize a weather report for `location`.
///
/// The condition and temperature are randomized; the temperature is always
/// in 10..=30 °C.
pub fn get_weather(location: &str) -> String {
    let condition = CONDITIONS[fastrand::usize(0..CONDITIONS.len())];
    let high = fastrand::i32(10..=30);
    format!("The weather in {location} is {condition} with a high of {high}°C.")
}

/// The function-tool definition for [`get_weather`].
pub fn weather_tool() -> Tool {
    Tool::function(FunctionDefinition {
        name: WEATHER_TOOL_NAME.into(),
        description: Some("Get the weather for a given location.".into()),
        parameters: Some(serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The location to get the weather for."
                }
            },
            "required": ["location"]
        })),
    })
}

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
}

/// Dispatch a tool call by function name with JSON-encoded arguments.
pub fn dispatch(name: &str, arguments: &str) -> AgentResult<String> {
    match name {
        WEATHER_TOOL_NAME => {
            let args: WeatherArgs = serde_json::from_str(arguments)?;
            Ok(get_weather(&args.location))
        }
        other => Err(AgentError::Tool(format!("unknown tool: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_contains_location_condition_and_temperature() {
        for _ in 0..50 {
            let report = get_weather("Seattle");

            assert!(report.contains("Seattle"));
            assert!(
                CONDITIONS.iter().any(|c| report.contains(c)),
                "unexpected condition in {report:?}"
            );

            let temp: i32 = report
                .split("high of ")
                .nth(1)
                .and_then(|rest| rest.split("°C").next())
                .and_then(|t| t.parse().ok())
                .expect("report should contain a temperature");
            assert!((10..=30).contains(&temp), "temperature out of range: {temp}");
        }
    }

    #[test]
    fn weather_report_shape() {
        let report = get_weather("Paris");
        assert!(report.starts_with("The weather in Paris is "));
        assert!(report.ends_with("°C."));
    }

    #[test]
    fn dispatch_parses_arguments() {
        let output = dispatch(WEATHER_TOOL_NAME, r#"{"location": "Oslo"}"#)
            .expect("should dispatch");
        assert!(output.contains("Oslo"));
    }

    #[test]
    fn dispatch_rejects_unknown_tool() {
        let err = dispatch("get_stock_price", "{}").unwrap_err();
        assert!(matches!(err, AgentError::Tool(_)));
    }

    #[test]
    fn dispatch_rejects_malformed_arguments() {
        let err = dispatch(WEATHER_TOOL_NAME, "not json").unwrap_err();
        assert!(matches!(err, AgentError::Serialization(_)));
    }

    #[test]
    fn weather_tool_definition() {
        let tool = weather_tool();
        assert_eq!(tool.tool_type, "function");
        assert_eq!(tool.function.name, WEATHER_TOOL_NAME);

        let params = tool.function.parameters.expect("should have parameters");
        assert_eq!(params["required"][0], "location");
    }
}
