// crates/fusion-manifest/src/lib.rs
// ============================================================================
// Module: Manifest Resource
// Description: Server capability manifest served to MCP clients.
// Purpose: Project capabilities into the snake_case manifest wire form with
//          per-request clone independence.
// Dependencies: fusion-contract, serde, serde_json
// ============================================================================

//! ## Overview
//! The manifest is the read-only resource describing a server's tools and
//! presenters to clients. It serializes with snake_case keys per the
//! external resource contract. Every RBAC filter call returns a fresh deep
//! copy, so mutation by one request can never leak into another.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use fusion_contract::SystemRuleSet;
use fusion_contract::ToolCapability;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Architecture label recorded in every manifest.
pub const MANIFEST_ARCHITECTURE: &str = "MVA (Model-View-Agent)";

// ============================================================================
// SECTION: Manifest Types
// ============================================================================

/// Server capability manifest served to clients.
///
/// # Invariants
/// - Tools and presenters are keyed and sorted by name.
/// - The manifest owns all of its data; it never borrows from the registry
///   it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerManifest {
    /// Server name.
    pub server: String,
    /// Generator version.
    pub mcp_fusion_version: String,
    /// Architecture label; see [`MANIFEST_ARCHITECTURE`].
    pub architecture: String,
    /// Capability sections.
    pub capabilities: ManifestCapabilities,
}

/// Capability sections of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestCapabilities {
    /// Tools keyed by name.
    pub tools: BTreeMap<String, ManifestTool>,
    /// Presenters keyed by name.
    pub presenters: BTreeMap<String, ManifestPresenter>,
}

/// One tool entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestTool {
    /// Tool description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sorted tag set.
    pub tags: Vec<String>,
    /// Actions keyed by action name.
    pub actions: BTreeMap<String, ManifestAction>,
    /// Tool input schema.
    pub input_schema: Value,
}

/// One action entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestAction {
    /// Action description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Action may destroy data.
    pub destructive: bool,
    /// Action is idempotent.
    pub idempotent: bool,
    /// Action never mutates state.
    pub read_only: bool,
    /// Sorted list of required input fields.
    pub required_fields: Vec<String>,
}

/// One presenter entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPresenter {
    /// Sorted top-level keys of the presenter egress schema.
    pub schema_keys: Vec<String>,
    /// Presenter declares an egress schema for UI blocks.
    pub ui_blocks_supported: bool,
    /// Presenter carries contextual system rules.
    pub has_contextual_rules: bool,
}

// ============================================================================
// SECTION: Manifest Construction
// ============================================================================

/// Builds the manifest from the server's capabilities.
#[must_use]
pub fn build_manifest(
    server_name: &str,
    fusion_version: &str,
    capabilities: &[&dyn ToolCapability],
) -> ServerManifest {
    let mut tools = BTreeMap::new();
    let mut presenters = BTreeMap::new();

    for capability in capabilities {
        let definition = capability.tool_definition();
        let mut tags = capability.tags();
        tags.sort();
        tags.dedup();

        let mut actions = BTreeMap::new();
        for metadata in capability.action_metadata() {
            let mut required_fields = metadata.required_fields;
            required_fields.sort();
            required_fields.dedup();
            actions.insert(metadata.key, ManifestAction {
                description: metadata.description,
                destructive: metadata.destructive,
                idempotent: metadata.idempotent,
                read_only: metadata.read_only,
                required_fields,
            });
        }

        for presenter in capability.behavior_surface().presenters {
            let schema_keys: BTreeSet<String> = presenter
                .egress_schema
                .as_ref()
                .and_then(|schema| schema.get("properties"))
                .and_then(Value::as_object)
                .map(|properties| properties.keys().cloned().collect())
                .unwrap_or_default();
            let has_contextual_rules = match &presenter.system_rules {
                SystemRuleSet::Static(rules) => !rules.is_empty(),
                SystemRuleSet::Dynamic(_) => true,
            };
            presenters.insert(presenter.name.clone(), ManifestPresenter {
                schema_keys: schema_keys.into_iter().collect(),
                ui_blocks_supported: presenter.egress_schema.is_some(),
                has_contextual_rules,
            });
        }

        tools.insert(capability.name(), ManifestTool {
            description: capability.description(),
            tags,
            actions,
            input_schema: definition.input_schema,
        });
    }

    ServerManifest {
        server: server_name.to_string(),
        mcp_fusion_version: fusion_version.to_string(),
        architecture: MANIFEST_ARCHITECTURE.to_string(),
        capabilities: ManifestCapabilities {
            tools,
            presenters,
        },
    }
}

// ============================================================================
// SECTION: RBAC Filtering
// ============================================================================

/// Returns a fresh manifest restricted to the allowed tool names.
///
/// Each call produces an independent deep copy; mutating one filtered
/// manifest cannot observably change another.
#[must_use]
pub fn filter_tools(manifest: &ServerManifest, allowed: &BTreeSet<String>) -> ServerManifest {
    let mut filtered = manifest.clone();
    filtered.capabilities.tools.retain(|name, _| allowed.contains(name));
    filtered
}
