//! HavWtr MCP Server Implementation
//!
//! Implements the MCP server with the person-info and conversion tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::api::{ApiClient, Endpoint};
use crate::config::Config;
use crate::db::Database;
use crate::tools::conversion;
use crate::tools::person_info::{self, PersonInfoInput};
use crate::tools::profile;
use crate::tools::status::StatusTracker;

/// HavWtr MCP Service
#[derive(Clone)]
pub struct HavWtrService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: Arc<Config>,
    api: Option<ApiClient>,
    tool_router: ToolRouter<HavWtrService>,
}

impl HavWtrService {
    pub fn new(config: Config, database: Database, api: Option<ApiClient>) -> Self {
        let tracker = StatusTracker::new(
            config.database_path.clone(),
            api.is_some(),
            config.measurement,
        );
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            config: Arc::new(config),
            api,
            tool_router: Self::tool_router(),
        }
    }

    fn api(&self) -> Result<&ApiClient, McpError> {
        self.api.as_ref().ok_or_else(|| {
            McpError::internal_error("HAVWTR_API_BASE_URL is not set; network tools are disabled", None)
        })
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertWeightParams {
    pub value: f64,
    /// Unit the value is in: "kg" or "lbs"
    pub from: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertHeightToFeetInchesParams {
    pub centimeters: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertFeetInchesToHeightParams {
    pub feet: u32,
    pub inches: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleMeasurementParams {
    /// Current system: "imperial" or "metric"
    pub from: String,
    pub weight: Option<f64>,
    /// Height field text, e.g. "5' 6''", "5.6" or "167.64"
    pub height: Option<String>,
    pub to_metric: bool,
}

// ============================================================================
// Person Info Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SavePersonInfoParams {
    /// Family member id; omit for the account owner
    pub family_id: Option<String>,
    /// "imperial" or "metric"
    pub measurement: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub female_state: Option<String>,
    /// Birth date in milliseconds since the Unix epoch
    pub birth: Option<i64>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    /// Weight in lbs (imperial) or kg (metric)
    pub weight: Option<f64>,
    /// Height field text, e.g. "5' 6''" (imperial) or "170" (metric)
    pub height: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FamilyIdParams {
    /// Family member id; omit for the account owner
    pub family_id: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFamilyMemberParams {
    /// Family member id
    pub family_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetPersonInfoParams {
    pub family_id: Option<String>,
    /// Display system; defaults to the session system
    pub measurement: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitPersonInfoParams {
    pub family_id: Option<String>,
    /// Send through the intake form instead of the personal-information update
    #[serde(default)]
    pub intake: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    /// "imperial" or "metric"
    pub measurement: String,
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    success: bool,
    measurement: &'static str,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl HavWtrService {
    // --- Status ---

    #[tool(description = "Get the current status of the HavWtr service including build info, database status, and process information")]
    async fn havwtr_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get instructions for converting measurements and managing person info. Call this when unsure which units a tool expects.")]
    fn person_info_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::PERSON_INFO_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(PERSON_INFO_INSTRUCTIONS)]))
    }

    // --- Conversion ---

    #[tool(description = "Convert a weight between kg and lbs using the fixed 2.2 factor")]
    fn convert_weight(&self, Parameters(p): Parameters<ConvertWeightParams>) -> Result<CallToolResult, McpError> {
        let result = conversion::convert_weight_value(p.value, &p.from)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Convert centimeters to feet and rounded inches. 12 inches after rounding is reported, not rolled over.")]
    fn convert_height_to_feet_inches(&self, Parameters(p): Parameters<ConvertHeightToFeetInchesParams>) -> Result<CallToolResult, McpError> {
        json_result(&conversion::centimeters_to_feet_inches(p.centimeters))
    }

    #[tool(description = "Convert feet and inches to centimeters")]
    fn convert_feet_inches_to_height(&self, Parameters(p): Parameters<ConvertFeetInchesToHeightParams>) -> Result<CallToolResult, McpError> {
        json_result(&conversion::feet_inches_to_centimeters(p.feet, p.inches))
    }

    #[tool(description = "Preview the person-info form after flipping the imperial/metric toggle")]
    fn toggle_measurement(&self, Parameters(p): Parameters<ToggleMeasurementParams>) -> Result<CallToolResult, McpError> {
        let result = conversion::toggle_measurement(&p.from, p.weight, p.height.as_deref(), p.to_metric)
            .map_err(|e| McpError::invalid_params(e, None))?;
        json_result(&result)
    }

    // --- Person Info ---

    #[tool(description = "Validate person info and cache it locally for the account owner or a family member")]
    fn save_person_info(&self, Parameters(p): Parameters<SavePersonInfoParams>) -> Result<CallToolResult, McpError> {
        let input = PersonInfoInput {
            measurement: p.measurement,
            first_name: p.first_name, last_name: p.last_name, email: p.email,
            gender: p.gender, female_state: p.female_state, birth: p.birth,
            climate: p.climate, activity: p.activity, activity_duration: p.activity_duration,
            weight: p.weight, height: p.height,
        };
        let result = person_info::save_person_info(&self.database, p.family_id.as_deref(), input)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get cached person info, shown in the session measurement system unless another is given")]
    fn get_person_info(&self, Parameters(p): Parameters<GetPersonInfoParams>) -> Result<CallToolResult, McpError> {
        let system = match p.measurement.as_deref() {
            Some(s) => crate::measurement::MeasurementSystem::from_str(s).ok_or_else(|| {
                McpError::invalid_params(format!("Invalid measurement system: '{}'", s), None)
            })?,
            None => self.config.measurement,
        };
        let result = person_info::get_person_info(&self.database, p.family_id.as_deref(), system)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => json_result(&detail),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Person info not found", "family_id": {}}}"#,
                serde_json::to_string(&p.family_id).unwrap_or_else(|_| "null".to_string())
            ))])),
        }
    }

    #[tool(description = "List all cached person info rows, account owner first")]
    fn list_person_info(&self) -> Result<CallToolResult, McpError> {
        let result = person_info::list_person_info(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete cached person info for the account owner or a family member")]
    fn delete_person_info(&self, Parameters(p): Parameters<FamilyIdParams>) -> Result<CallToolResult, McpError> {
        let result = person_info::delete_person_info(&self.database, p.family_id.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Server Sync ---

    #[tool(description = "Submit cached person info to the server (personal information, intake form, or family member update)")]
    async fn submit_person_info(&self, Parameters(p): Parameters<SubmitPersonInfoParams>) -> Result<CallToolResult, McpError> {
        let api = self.api()?;
        let result = profile::submit_person_info(&self.database, api, p.family_id.as_deref(), p.intake)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Fetch the signed-in user's profile from the server and cache it")]
    async fn fetch_user_profile(&self) -> Result<CallToolResult, McpError> {
        let api = self.api()?;
        let result = profile::fetch_user_profile(&self.database, api)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the signed-in user's family members from the server")]
    async fn get_family_members(&self) -> Result<CallToolResult, McpError> {
        let api = self.api()?;
        let result = profile::get_family_members(api)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove a family member on the server and drop its cached info")]
    async fn delete_family_member(&self, Parameters(p): Parameters<DeleteFamilyMemberParams>) -> Result<CallToolResult, McpError> {
        let api = self.api()?;
        let result = profile::delete_family_member(&self.database, api, &p.family_id)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update the account's measurement system on the server")]
    async fn update_user_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let measurement = crate::measurement::MeasurementSystem::from_str(&p.measurement)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid measurement system: '{}'", p.measurement), None))?;
        let api = self.api()?;
        api.send(&Endpoint::UpdateUserSettings { measurement })
            .await
            .map_err(|e| McpError::internal_error(format!("Failed to update settings: {}", e), None))?;
        json_result(&SettingsResponse { success: true, measurement: measurement.api_value() })
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for HavWtrService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "havwtr".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("HavWtr Person Info".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "HavWtr person info - imperial/metric height and weight conversion and profile sync. \
                 Call person_info_instructions for unit conventions. \
                 Conversion: convert_weight, convert_height_to_feet_inches, convert_feet_inches_to_height, toggle_measurement. \
                 Local cache: save/get/list/delete_person_info. \
                 Server: submit_person_info, fetch_user_profile, get_family_members, delete_family_member, update_user_settings."
                    .into(),
            ),
        }
    }
}
