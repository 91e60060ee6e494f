//! FoodDB MCP Server Implementation
//!
//! Implements the MCP server with all food database tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::foods::{self, AddFoodRequest, CombineFoodsRequest, ScaleFoodRequest};
use crate::tools::status::StatusTracker;

/// FoodDB MCP Service
#[derive(Clone)]
pub struct FoodDbService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<FoodDbService>,
}

impl FoodDbService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodParams {
    /// Food ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    /// Food name
    pub name: String,
    /// Weight in grams that the nutrients below refer to
    pub weight: f64,
    /// Energy in kcal (takes precedence over kj)
    pub kcal: Option<f64>,
    /// Energy in kJ, used when kcal is not given
    pub kj: Option<f64>,
    /// Total fat in grams
    #[serde(default)]
    pub fat_total: f64,
    /// Saturated fat in grams
    #[serde(default)]
    pub fat_saturated: f64,
    /// Total carbohydrates in grams
    #[serde(default)]
    pub carbs_total: f64,
    /// Sugars in grams
    #[serde(default)]
    pub carbs_sugar: f64,
    /// Protein in grams
    #[serde(default)]
    pub protein: f64,
    /// Salt in grams
    #[serde(default)]
    pub salt: f64,
    /// Free-text description (max 10000 characters)
    pub description: Option<String>,
    /// IDs of stored foods this food is made of
    #[serde(default)]
    pub ingredient_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CombineFoodsParams {
    /// ID of the first food
    pub first_id: i64,
    /// ID of the second food
    pub second_id: i64,
    /// Name for the combined food (default: name of the first food)
    pub name: Option<String>,
    /// Description for the combined food
    pub description: Option<String>,
    /// Store the combined food (default false: preview only)
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleFoodParams {
    /// Food ID
    pub id: i64,
    /// Factor to multiply weight and nutrients by (e.g., 0.5 for half)
    pub factor: f64,
    /// Name for the scaled food (default: unchanged)
    pub name: Option<String>,
    /// Store the scaled food as a new food (default false: preview only)
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseFoodRowParams {
    /// Row fields: id, name, weight, kcal, kJ, fat, saturated fat, carbs, sugars, protein, salt, description, [contains]
    pub fields: Vec<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl FoodDbService {
    // --- Status ---

    #[tool(description = "Get the current status of the food database service including build info, database status, and process information")]
    async fn fooddb_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for recording and composing foods. Call this when unsure how to use the food tools.")]
    fn food_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::FOOD_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(FOOD_INSTRUCTIONS)]))
    }

    // --- Foods ---

    #[tool(description = "List all foods as table rows: id, name, weight, kcal, kJ, fat, saturated fat, carbs, sugars, protein, salt, description, contains")]
    fn list_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get full details for a food including nutrients and ingredients")]
    fn get_food(&self, Parameters(p): Parameters<GetFoodParams>) -> Result<CallToolResult, McpError> {
        let result = foods::get_food(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(food) => serde_json::to_string_pretty(&food),
            None => Ok(format!(r#"{{"error": "Food not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Create a new food with nutrients for its whole weight, optionally made of stored foods")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = AddFoodRequest {
            name: p.name, weight: p.weight, kcal: p.kcal, kj: p.kj,
            fat_total: p.fat_total, fat_saturated: p.fat_saturated,
            carbs_total: p.carbs_total, carbs_sugar: p.carbs_sugar,
            protein: p.protein, salt: p.salt,
            description: p.description.unwrap_or_default(),
            ingredient_ids: p.ingredient_ids,
        };
        let result = foods::add_food(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Combine two stored foods by adding their weights and nutrients. Set save=true to store the result.")]
    fn combine_foods(&self, Parameters(p): Parameters<CombineFoodsParams>) -> Result<CallToolResult, McpError> {
        let data = CombineFoodsRequest {
            first_id: p.first_id, second_id: p.second_id,
            name: p.name, description: p.description, save: p.save,
        };
        let result = foods::combine_foods(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Scale a stored food's weight and nutrients by a factor. Set save=true to store the result as a new food.")]
    fn scale_food(&self, Parameters(p): Parameters<ScaleFoodParams>) -> Result<CallToolResult, McpError> {
        let data = ScaleFoodRequest { id: p.id, factor: p.factor, name: p.name, save: p.save };
        let result = foods::scale_food(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Parse a food table row (as returned by list_foods) without storing it")]
    fn parse_food_row(&self, Parameters(p): Parameters<ParseFoodRowParams>) -> Result<CallToolResult, McpError> {
        let result = foods::parse_food_row(&p.fields).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FoodDbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fooddb".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Food Database".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Food Database (FoodDB) - Foods, their nutrients and what they are made of. \
                 Call food_instructions before adding foods. \
                 Foods: list_foods, get_food, add_food. \
                 Composition: combine_foods, scale_food (preview unless save=true). \
                 Rows: parse_food_row reads a row in list_foods format. \
                 Status: fooddb_status."
                    .into(),
            ),
        }
    }
}
