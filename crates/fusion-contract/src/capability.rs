// crates/fusion-contract/src/capability.rs
// ============================================================================
// Module: Capability Interfaces
// Description: Introspection traits satisfied by tool and prompt builders.
// Purpose: Decouple materialization from any concrete builder framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The governance core depends on exactly two interfaces: [`ToolCapability`]
//! for tools and [`PromptCapability`] for prompts. Builder frameworks
//! implement them; the core never reaches past them. [`StaticToolCapability`]
//! and [`StaticPromptCapability`] are record-backed implementations for
//! hosts that assemble capabilities from data rather than builders.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Definition Records
// ============================================================================

/// Wire-facing tool definition exposed to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool input shape.
    pub input_schema: Value,
}

/// Introspection record for one action on a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMetadata {
    /// Action key, unique per tool.
    pub key: String,
    /// Action description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Action may destroy data.
    pub destructive: bool,
    /// Action is idempotent.
    pub idempotent: bool,
    /// Action never mutates state.
    pub read_only: bool,
    /// Required input fields in declaration order.
    pub required_fields: Vec<String>,
    /// Presenter rendering the action's egress when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenter_name: Option<String>,
    /// Per-action input schema when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    /// Action has middleware attached.
    pub has_middleware: bool,
}

// ============================================================================
// SECTION: Behavior Surface
// ============================================================================

/// Presenter system rules as declared by the builder.
///
/// Any rule set that passes through a function application is dynamic; only
/// literal rule lists qualify as static.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SystemRuleSet {
    /// Rules are constant string literals.
    Static(Vec<String>),
    /// Rules are produced at runtime; the string is a provenance label.
    Dynamic(String),
}

/// Introspection record for one presenter attached to a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenterSurface {
    /// Presenter name.
    pub name: String,
    /// Egress JSON Schema when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egress_schema: Option<Value>,
    /// System rules declared on the presenter.
    pub system_rules: SystemRuleSet,
    /// Tool names suggested as next actions.
    pub suggested_tools: Vec<String>,
    /// Presenter is embedded inside another presenter's egress.
    pub embedded: bool,
    /// Presenter emits a collection without a declared bound.
    pub unbounded_collection: bool,
}

/// Egress-volume guardrails as declared by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailSurface {
    /// Maximum records surfaced to agents, when capped.
    pub agent_limit_max: Option<u32>,
    /// Maximum egress bytes, when capped.
    pub egress_max_bytes: Option<u64>,
}

/// Full behavioral surface a builder exposes for materialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorSurface {
    /// Presenters in declaration order.
    pub presenters: Vec<PresenterSurface>,
    /// Declared guardrails.
    pub guardrails: GuardrailSurface,
    /// Middleware chain in declaration order.
    pub middleware_chain: Vec<String>,
    /// State-sync descriptor when the tool synchronizes shared state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_sync_descriptor: Option<Value>,
    /// Concurrency descriptor when the tool declares a concurrency model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_descriptor: Option<Value>,
}

// ============================================================================
// SECTION: Tool Capability
// ============================================================================

/// Introspection interface satisfied by tool builders.
///
/// # Invariants
/// - Implementations are pure: repeated calls return equal values, so two
///   materialization runs over the same builder produce byte-equal
///   contracts.
pub trait ToolCapability {
    /// Returns the tool name, unique per server.
    fn name(&self) -> String;

    /// Returns the tool description when declared.
    fn description(&self) -> Option<String>;

    /// Returns the declared tags in declaration order.
    fn tags(&self) -> Vec<String>;

    /// Builds the wire-facing tool definition.
    fn tool_definition(&self) -> ToolDefinition;

    /// Returns introspection metadata for every action.
    fn action_metadata(&self) -> Vec<ActionMetadata>;

    /// Returns the action keys in declaration order.
    fn action_names(&self) -> Vec<String> {
        self.action_metadata().into_iter().map(|metadata| metadata.key).collect()
    }

    /// Returns the behavioral surface used for fingerprinting.
    fn behavior_surface(&self) -> BehaviorSurface;

    /// Returns the handler source text when available for scanning.
    fn handler_source(&self) -> Option<String> {
        None
    }
}

// ============================================================================
// SECTION: Prompt Capability
// ============================================================================

/// Wire-facing prompt definition exposed to MCP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDefinition {
    /// Prompt name.
    pub name: String,
    /// Human-facing title when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Prompt description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prompt arguments in declaration order.
    pub arguments: Vec<PromptArgument>,
}

/// One prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Argument description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Argument must be supplied.
    pub required: bool,
}

/// Introspection interface satisfied by prompt builders.
pub trait PromptCapability {
    /// Returns the prompt name, unique per server.
    fn name(&self) -> String;

    /// Returns the prompt description when declared.
    fn description(&self) -> Option<String>;

    /// Returns the declared tags in declaration order.
    fn tags(&self) -> Vec<String>;

    /// Builds the wire-facing prompt definition.
    fn prompt_definition(&self) -> PromptDefinition;

    /// Returns `true` when the prompt has middleware attached.
    fn has_middleware(&self) -> bool;

    /// Returns the hydration timeout in milliseconds when declared.
    fn hydration_timeout(&self) -> Option<u64>;
}

// ============================================================================
// SECTION: Static Implementations
// ============================================================================

/// Record-backed [`ToolCapability`] for hosts that assemble tools from data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticToolCapability {
    /// Tool name.
    pub name: String,
    /// Tool description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared tags.
    pub tags: Vec<String>,
    /// Tool input schema.
    pub input_schema: Value,
    /// Action metadata in declaration order.
    pub actions: Vec<ActionMetadata>,
    /// Behavioral surface.
    pub behavior: BehaviorSurface,
    /// Handler source text when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler_source: Option<String>,
}

impl ToolCapability for StaticToolCapability {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }

    fn action_metadata(&self) -> Vec<ActionMetadata> {
        self.actions.clone()
    }

    fn behavior_surface(&self) -> BehaviorSurface {
        self.behavior.clone()
    }

    fn handler_source(&self) -> Option<String> {
        self.handler_source.clone()
    }
}

/// Record-backed [`PromptCapability`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPromptCapability {
    /// Prompt name.
    pub name: String,
    /// Human-facing title when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Prompt description when declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared tags.
    pub tags: Vec<String>,
    /// Prompt arguments in declaration order.
    pub arguments: Vec<PromptArgument>,
    /// Prompt has middleware attached.
    pub has_middleware: bool,
    /// Hydration timeout in milliseconds when declared.
    pub hydration_timeout: Option<u64>,
}

impl PromptCapability for StaticPromptCapability {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn prompt_definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            arguments: self.arguments.clone(),
        }
    }

    fn has_middleware(&self) -> bool {
        self.has_middleware
    }

    fn hydration_timeout(&self) -> Option<u64> {
        self.hydration_timeout
    }
}
