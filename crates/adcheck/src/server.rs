//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the validators as tools to an agent host over stdio. The tool
//! names and the default text output match what workflow steps expect, so an
//! agent can call `check_text_length` before adding copy to an ad, and
//! `validate_google_ads` or `validate_pmax` before handing the ad off.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer: it wraps the same core library that
//! the CLI commands use. Each `#[tool]` method delegates to `adcheck_core`.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Serialize;

use adcheck_core::{
    AdsInput, AssetReport, DEFAULT_LIMIT, LengthInput, PmaxInput, validate_ads, validate_pmax,
};

/// Shape of a tool's text output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report (the format workflow steps consume).
    #[default]
    Text,
    /// Structured report as pretty-printed JSON.
    Json,
}

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

/// Parameters for the `check_text_length` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CheckTextLengthParams {
    /// The text to check and its limit.
    #[serde(flatten)]
    pub input: LengthInput,
    /// Output format: "text" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

/// Parameters for the `validate_google_ads` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ValidateGoogleAdsParams {
    /// The ad bundle, at the top level or nested under `ads`.
    #[serde(flatten)]
    pub input: AdsInput,
    /// Output format: "text" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

/// Parameters for the `validate_pmax` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ValidatePmaxParams {
    /// The asset group, at the top level or nested under `ads`.
    #[serde(flatten)]
    pub input: PmaxInput,
    /// Output format: "text" or "json"
    #[serde(default)]
    pub format: OutputFormat,
}

/// MCP server exposing the validators to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    default_limit: Option<usize>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a report in the requested format.
fn render<T: Serialize + std::fmt::Display>(
    report: &T,
    format: OutputFormat,
) -> Result<String, McpError> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None)),
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server instance.
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
            default_limit: None,
        }
    }

    /// Create a server whose `check_text_length` falls back to `limit`
    /// instead of 30 when the caller gives none.
    pub fn with_default_limit(limit: Option<usize>) -> Self {
        Self {
            default_limit: limit,
            ..Self::new()
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = ?params.format, "executing MCP tool");

        let text = match params.format {
            OutputFormat::Json => {
                let info = serde_json::json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "description": env!("CARGO_PKG_DESCRIPTION"),
                    "default_limit": self.default_limit.unwrap_or(DEFAULT_LIMIT),
                });
                serde_json::to_string_pretty(&info).map_err(|e| {
                    McpError::internal_error(format!("serialization error: {e}"), None)
                })?
            }
            OutputFormat::Text => format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            ),
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Check text length against a limit.
    #[tool(
        description = "Check text length against a limit (default 30). Use before adding text to ads. Returns length, validity, and remaining characters."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn check_text_length(
        &self,
        Parameters(params): Parameters<CheckTextLengthParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "check_text_length", limit = ?params.input.limit, "executing MCP tool");

        let report = params.input.check_with_default(self.default_limit);
        let text = render(&report, params.format)?;

        tracing::info!(
            tool = "check_text_length",
            length = report.length,
            valid = report.valid,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Validate a Google Ads bundle.
    #[tool(
        description = "Validate Google Ads headlines (max 30 chars, 3-15), descriptions (max 90 chars, 2-4) and paths (max 15 chars, exactly 2). Accepts the bundle directly or nested under `ads`. Returns the issues to fix."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn validate_google_ads(
        &self,
        Parameters(params): Parameters<ValidateGoogleAdsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "validate_google_ads",
            nested = params.input.ads.is_some(),
            "executing MCP tool"
        );

        let report = validate_ads(&params.input.into_bundle());
        let text = render(&report, params.format)?;

        tracing::info!(
            tool = "validate_google_ads",
            valid = report.valid,
            count_errors = report.count_errors.len(),
            length_issues = report.length_issues.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Validate a Performance Max asset group.
    #[tool(
        description = "Validate a Google Ads Performance Max asset group: headlines (max 30 chars, 3-15, at least one of 15 chars or fewer for mobile), long_headlines (max 90 chars, 1-5), descriptions (max 90 chars, 3-5) and paths (max 15 chars, exactly 2). Accepts the group directly or nested under `ads`. Returns the issues to fix."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn validate_pmax(
        &self,
        Parameters(params): Parameters<ValidatePmaxParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "validate_pmax",
            nested = params.input.ads.is_some(),
            "executing MCP tool"
        );

        let report = validate_pmax(&params.input.into_bundle());
        let text = render(&report, params.format)?;

        tracing::info!(
            tool = "validate_pmax",
            valid = report.valid,
            problems = report.problem_count(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Call check_text_length before adding text to an ad, then \
                 validate_google_ads (search ads) or validate_pmax (Performance Max) on the \
                 finished ad.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn server_info_has_correct_name() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn server_has_tools_capability() {
        let server = ProjectServer::new();
        let info = ServerHandler::get_info(&server);

        assert!(info.capabilities.tools.is_some());
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn length_params(json: serde_json::Value) -> Parameters<CheckTextLengthParams> {
        Parameters(serde_json::from_value(json).expect("valid params"))
    }

    fn ads_params(json: serde_json::Value) -> Parameters<ValidateGoogleAdsParams> {
        Parameters(serde_json::from_value(json).expect("valid params"))
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = ProjectServer::new();
        let params = Parameters(GetInfoParams {
            format: OutputFormat::Json,
        });

        let result = server.get_info(params).expect("get_info should succeed");
        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value =
            serde_json::from_str(text).expect("output should be valid JSON");

        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["default_limit"], 30);
    }

    #[test]
    fn check_text_length_returns_four_line_report() {
        let server = ProjectServer::new();
        let result = server
            .check_text_length(length_params(serde_json::json!({"text": "Buy Now"})))
            .expect("check_text_length should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        assert_eq!(
            text,
            "Text: \"Buy Now\"\nLength: 7/30\nValid: true\nStatus: OK (23 chars remaining)"
        );
    }

    #[test]
    fn check_text_length_with_no_arguments() {
        let server = ProjectServer::new();
        let result = server
            .check_text_length(length_params(serde_json::json!({})))
            .expect("check_text_length should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.starts_with("Text: \"\"\nLength: 0/30"));
    }

    #[test]
    fn check_text_length_uses_configured_default() {
        let server = ProjectServer::with_default_limit(Some(5));
        let result = server
            .check_text_length(length_params(
                serde_json::json!({"text": "abcdefg", "format": "json"}),
            ))
            .expect("check_text_length should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert_eq!(json["limit"], 5);
        assert_eq!(json["remaining"], -2);
        assert!(!json["valid"].as_bool().unwrap());
    }

    #[test]
    fn validate_google_ads_accepts_nested_bundle() {
        let server = ProjectServer::new();
        let result = server
            .validate_google_ads(ads_params(serde_json::json!({
                "ads": {
                    "headlines": ["a", "b", "c"],
                    "descriptions": ["d1", "d2"],
                    "paths": ["p1", "p2"]
                }
            })))
            .expect("validate_google_ads should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.starts_with("VALID: All ads pass validation!"));
    }

    #[test]
    fn validate_google_ads_accepts_direct_bundle() {
        let server = ProjectServer::new();
        let result = server
            .validate_google_ads(ads_params(serde_json::json!({
                "headlines": ["a"],
                "descriptions": [],
                "paths": ["p1"]
            })))
            .expect("validate_google_ads should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        assert!(text.starts_with("INVALID: Fix the following issues:"));
        assert!(text.contains("- Headlines: minimum 3 required, got 1"));
        assert!(text.contains("- Descriptions: minimum 2 required, got 0"));
        assert!(text.contains("- Paths: exactly 2 required, got 1"));
        assert!(!text.contains("LENGTH ISSUES"));
    }

    #[test]
    fn validate_google_ads_json_format() {
        let server = ProjectServer::new();
        let result = server
            .validate_google_ads(ads_params(serde_json::json!({
                "headlines": ["a", "b", "c"],
                "descriptions": ["d1", "d2"],
                "paths": ["p1", "this-path-is-too-long"],
                "format": "json"
            })))
            .expect("validate_google_ads should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert!(!json["valid"].as_bool().unwrap());
        assert_eq!(json["length_issues"][0]["kind"], "path");
        assert_eq!(json["length_issues"][0]["overflow"], 6);
    }

    #[test]
    fn check_text_length_accepts_negative_limit() {
        let server = ProjectServer::new();
        let result = server
            .check_text_length(length_params(serde_json::json!({"text": "abc", "limit": -5})))
            .expect("check_text_length should succeed");
        assert!(!result.is_error.unwrap_or(false));

        let text = extract_text(&result).expect("should have text content");
        assert_eq!(
            text,
            "Text: \"abc\"\nLength: 3/-5\nValid: false\nStatus: TOO LONG by 8 chars"
        );
    }

    #[test]
    fn check_text_length_accepts_float_limit() {
        let server = ProjectServer::new();
        let result = server
            .check_text_length(length_params(serde_json::json!({"text": "abc", "limit": 20.0})))
            .expect("check_text_length should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains("Length: 3/20\n"));
        assert!(text.ends_with("Status: OK (17 chars remaining)"));
    }

    #[test]
    fn check_text_length_explicit_limit_beats_configured_default() {
        let server = ProjectServer::with_default_limit(Some(5));
        let result = server
            .check_text_length(length_params(serde_json::json!({"text": "abcdefg", "limit": 10})))
            .expect("check_text_length should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.contains("Length: 7/10"));
    }

    fn pmax_params(json: serde_json::Value) -> Parameters<ValidatePmaxParams> {
        Parameters(serde_json::from_value(json).expect("valid params"))
    }

    #[test]
    fn validate_pmax_reports_missing_mobile_headline() {
        let server = ProjectServer::new();
        let result = server
            .validate_pmax(pmax_params(serde_json::json!({
                "ads": {
                    "headlines": [
                        "Lightweight Trail Shoes",
                        "Free Returns On All Orders",
                        "Shop the Spring Range"
                    ],
                    "long_headlines": ["Trail shoes for every season"],
                    "descriptions": ["d1", "d2", "d3"],
                    "paths": ["shoes", "trail"]
                }
            })))
            .expect("validate_pmax should succeed");

        let text = extract_text(&result).expect("should have text content");
        assert!(text.starts_with("INVALID: Fix the following issues:"));
        assert!(text.contains("MOBILE:\n- Headlines: at least 1 of 15 chars or fewer"));
    }

    #[test]
    fn validate_pmax_json_lists_long_headline_counts() {
        let server = ProjectServer::new();
        let result = server
            .validate_pmax(pmax_params(serde_json::json!({
                "headlines": ["Trail Shoes", "b", "c"],
                "descriptions": ["d1", "d2", "d3"],
                "paths": ["p1", "p2"],
                "format": "json"
            })))
            .expect("validate_pmax should succeed");

        let text = extract_text(&result).expect("should have text content");
        let json: serde_json::Value = serde_json::from_str(text).expect("valid JSON");
        assert!(!json["valid"].as_bool().unwrap());
        assert_eq!(json["count_errors"][0]["kind"], "long_headline");
        assert_eq!(json["count_errors"][0]["violation"], "minimum");
        assert_eq!(json["mobile"]["found"], 3);
    }
}
