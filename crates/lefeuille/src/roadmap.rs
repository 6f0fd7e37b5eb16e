// Roadmap data model

use crate::error::StructureError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Three-tier ordered learning path
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LearningPath {
    /// Entry-level skills
    pub beginner: Vec<String>,
    /// Core skills
    pub intermediate: Vec<String>,
    /// Specialisation skills
    pub advanced: Vec<String>,
}

impl LearningPath {
    /// Tiers with their names, in learning order
    pub fn tiers(&self) -> [(&'static str, &[String]); 3] {
        [
            ("beginner", &self.beginner),
            ("intermediate", &self.intermediate),
            ("advanced", &self.advanced),
        ]
    }
}

/// Links for studying one skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningResource {
    /// Skill the links cover
    pub skill: String,
    /// Resource URLs
    pub links: Vec<String>,
}

/// Directed "leads to" edge, serialized as `[source, target]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphEdge(pub String, pub String);

impl GraphEdge {
    /// Create an edge
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self(source.into(), target.into())
    }

    /// Prerequisite skill
    pub fn source(&self) -> &str {
        &self.0
    }

    /// Skill it leads to
    pub fn target(&self) -> &str {
        &self.1
    }
}

/// Learning plan plus skill graph produced by the generative model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    /// Recommended role
    pub primary_role: String,
    /// Why the role fits the respondent
    pub why_suited: String,
    /// Tiered skills
    pub learning_path: LearningPath,
    /// Optional study links
    #[serde(default)]
    pub learning_resources: Vec<LearningResource>,
    /// Certifications worth pursuing
    pub recommended_certifications: Vec<String>,
    /// Practice projects
    pub recommended_projects: Vec<String>,
    /// Skill names in the graph (duplicates collapse)
    pub graph_nodes: Vec<String>,
    /// Prerequisite edges
    pub graph_edges: Vec<GraphEdge>,
}

impl Roadmap {
    /// Distinct node names
    pub fn node_set(&self) -> BTreeSet<&str> {
        self.graph_nodes.iter().map(String::as_str).collect()
    }

    /// Check cross-references between path, nodes and edges.
    ///
    /// Every learning-path skill must be a node and every edge endpoint must
    /// be a node.
    pub fn validate(&self) -> Result<(), StructureError> {
        let nodes = self.node_set();

        for (tier, skills) in self.learning_path.tiers() {
            if let Some(skill) = skills.iter().find(|s| !nodes.contains(s.as_str())) {
                return Err(StructureError::UndeclaredSkill {
                    tier,
                    skill: skill.clone(),
                });
            }
        }

        for (index, edge) in self.graph_edges.iter().enumerate() {
            for endpoint in [edge.source(), edge.target()] {
                if !nodes.contains(endpoint) {
                    return Err(StructureError::UndeclaredEndpoint {
                        index,
                        source_name: edge.source().to_string(),
                        target: edge.target().to_string(),
                        missing: endpoint.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}
