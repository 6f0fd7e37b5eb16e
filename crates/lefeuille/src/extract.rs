// Roadmap extraction from free-form model output
//
// The model is an untrusted producer. Nothing downstream sees a roadmap that
// has not passed every check in this module.

use crate::error::{ExtractError, StructureError};
use crate::roadmap::{GraphEdge, LearningPath, LearningResource, Roadmap};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Pulls the JSON roadmap out of raw generated text and validates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadmapExtractor;

impl RoadmapExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract a roadmap from raw text.
    ///
    /// Takes the span from the first `{` to the last `}`, so surrounding
    /// prose and code fences are ignored. Text without any `{` is
    /// [`ExtractError::NoJson`]; an object that is opened but never closed is
    /// [`ExtractError::MalformedJson`].
    pub fn extract(&self, raw: &str) -> Result<Roadmap, ExtractError> {
        let payload = Self::json_span(raw).ok_or_else(|| {
            warn!("No JSON object in generated text ({} bytes)", raw.len());
            ExtractError::NoJson {
                raw: raw.to_string(),
            }
        })?;

        let value: Value = serde_json::from_str(payload).map_err(|source| {
            warn!("Generated JSON is malformed: {}", source);
            ExtractError::MalformedJson {
                payload: payload.to_string(),
                source,
            }
        })?;

        let roadmap = Self::from_value(&value).map_err(|err| {
            warn!("Generated roadmap rejected: {}", err);
            err
        })?;

        debug!(
            "Extracted roadmap for '{}' ({} nodes, {} edges)",
            roadmap.primary_role,
            roadmap.graph_nodes.len(),
            roadmap.graph_edges.len()
        );
        Ok(roadmap)
    }

    /// Substring from the first `{` through the last `}`.
    ///
    /// With no `}` after the first `{`, the rest of the text is returned and
    /// left for the parser to reject.
    pub fn json_span(raw: &str) -> Option<&str> {
        let start = raw.find('{')?;
        match raw.rfind('}') {
            Some(end) if end > start => Some(&raw[start..=end]),
            _ => Some(&raw[start..]),
        }
    }

    /// Validate a parsed JSON value against the roadmap shape
    pub fn from_value(value: &Value) -> Result<Roadmap, StructureError> {
        let obj = value.as_object().ok_or(StructureError::NotAnObject)?;

        let path = required(obj, "learning_path")?;
        let path = path.as_object().ok_or_else(|| StructureError::WrongType {
            field: "learning_path".to_string(),
            expected: "an object",
        })?;
        let learning_path = LearningPath {
            beginner: string_list(required_in(path, "learning_path", "beginner")?, "learning_path.beginner")?,
            intermediate: string_list(
                required_in(path, "learning_path", "intermediate")?,
                "learning_path.intermediate",
            )?,
            advanced: string_list(required_in(path, "learning_path", "advanced")?, "learning_path.advanced")?,
        };

        let learning_resources = match obj.get("learning_resources") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => resources(value)?,
        };

        let roadmap = Roadmap {
            primary_role: string(required(obj, "primary_role")?, "primary_role")?,
            why_suited: string(required(obj, "why_suited")?, "why_suited")?,
            learning_path,
            learning_resources,
            recommended_certifications: string_list(
                required(obj, "recommended_certifications")?,
                "recommended_certifications",
            )?,
            recommended_projects: string_list(
                required(obj, "recommended_projects")?,
                "recommended_projects",
            )?,
            graph_nodes: string_list(required(obj, "graph_nodes")?, "graph_nodes")?,
            graph_edges: edges(required(obj, "graph_edges")?)?,
        };

        roadmap.validate()?;
        Ok(roadmap)
    }
}

fn required<'v>(obj: &'v Map<String, Value>, key: &str) -> Result<&'v Value, StructureError> {
    obj.get(key)
        .ok_or_else(|| StructureError::MissingField(key.to_string()))
}

fn required_in<'v>(
    obj: &'v Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'v Value, StructureError> {
    obj.get(key)
        .ok_or_else(|| StructureError::MissingField(format!("{parent}.{key}")))
}

fn string(value: &Value, field: &str) -> Result<String, StructureError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| StructureError::WrongType {
            field: field.to_string(),
            expected: "a string",
        })
}

fn string_list(value: &Value, field: &str) -> Result<Vec<String>, StructureError> {
    let wrong = || StructureError::WrongType {
        field: field.to_string(),
        expected: "an array of strings",
    };
    value
        .as_array()
        .ok_or_else(wrong)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(wrong))
        .collect()
}

fn resources(value: &Value) -> Result<Vec<LearningResource>, StructureError> {
    let items = value.as_array().ok_or_else(|| StructureError::WrongType {
        field: "learning_resources".to_string(),
        expected: "an array of {skill, links} objects",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let field = format!("learning_resources[{idx}]");
            let entry = item.as_object().ok_or_else(|| StructureError::WrongType {
                field: field.clone(),
                expected: "an object",
            })?;
            Ok(LearningResource {
                skill: string(required_in(entry, &field, "skill")?, &format!("{field}.skill"))?,
                links: string_list(required_in(entry, &field, "links")?, &format!("{field}.links"))?,
            })
        })
        .collect()
}

fn edges(value: &Value) -> Result<Vec<GraphEdge>, StructureError> {
    let items = value.as_array().ok_or_else(|| StructureError::WrongType {
        field: "graph_edges".to_string(),
        expected: "an array of [source, target] pairs",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item.as_array().map(Vec::as_slice) {
            Some([Value::String(source), Value::String(target)]) => {
                Ok(GraphEdge::new(source.clone(), target.clone()))
            }
            _ => Err(StructureError::WrongType {
                field: format!("graph_edges[{idx}]"),
                expected: "a [source, target] pair of strings",
            }),
        })
        .collect()
}
