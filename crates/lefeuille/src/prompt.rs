// Roadmap prompt construction

use leprofil::{Label, RankedLabel};
use std::fmt::Write;

/// Human-readable role name for a label
pub fn role_title(label: Label) -> &'static str {
    match label {
        Label::Offensive => "Offensive Security / Penetration Tester",
        Label::BlueTeam => "Blue Team / SOC Analyst",
        Label::Malware => "Malware Analyst / Reverse Engineer",
        Label::Forensics => "Digital Forensics & Incident Response",
        Label::Network => "Network Security Engineer",
        Label::Cloud => "Cloud Security Engineer",
        Label::Appsec => "Application Security Engineer",
        Label::ThreatIntel => "Threat Intelligence Analyst",
        Label::Grc => "Governance, Risk & Compliance",
    }
}

const OUTPUT_SHAPE: &str = r#"{
  "primary_role": "string",
  "why_suited": "string",
  "learning_path": {
    "beginner": ["string"],
    "intermediate": ["string"],
    "advanced": ["string"]
  },
  "learning_resources": [
    { "skill": "string", "links": ["https://..."] }
  ],
  "recommended_certifications": ["string"],
  "recommended_projects": ["string"],
  "graph_nodes": ["string"],
  "graph_edges": [["skill A", "skill B"]]
}"#;

/// Builds the instruction text for a ranked set of roles
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    min_edges: usize,
    max_edges: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            min_edges: 40,
            max_edges: 70,
        }
    }
}

impl PromptBuilder {
    /// Builder with default graph-size guidance
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the requested edge range
    pub fn with_edge_range(mut self, min_edges: usize, max_edges: usize) -> Self {
        self.min_edges = min_edges;
        self.max_edges = max_edges.max(min_edges);
        self
    }

    /// Fewest edges requested
    pub fn min_edges(&self) -> usize {
        self.min_edges
    }

    /// Most edges requested
    pub fn max_edges(&self) -> usize {
        self.max_edges
    }

    /// Render the prompt. The first entry of `ranked` is the primary role.
    pub fn build(&self, ranked: &[RankedLabel]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut out, ranked);
        out
    }

    fn render(&self, out: &mut String, ranked: &[RankedLabel]) -> std::fmt::Result {
        writeln!(
            out,
            "You are a career consultant, curriculum designer and roadmap planner for cybersecurity."
        )?;
        writeln!(out)?;

        match ranked.first() {
            Some(top) => {
                writeln!(out, "PRIMARY ROLE: {} ({})", role_title(top.label), top.label)?;
                writeln!(out, "MODEL MATCH SCORE: {:.3}", top.probability)?;
            }
            None => writeln!(out, "PRIMARY ROLE: choose the best fit for a beginner")?,
        }

        writeln!(out)?;
        writeln!(out, "CANDIDATE ROLES (ranked by model score):")?;
        for entry in ranked {
            writeln!(
                out,
                "{}. {} ({}): {:.3}",
                entry.rank,
                role_title(entry.label),
                entry.label,
                entry.probability
            )?;
        }

        writeln!(out)?;
        writeln!(out, "GRAPH REQUIREMENTS:")?;
        writeln!(
            out,
            "1. At least {} edges, ideally {}-{}.",
            self.min_edges, self.min_edges, self.max_edges
        )?;
        writeln!(out, "2. Every beginner skill has 2-4 sub-skills in graph_nodes and leads to 1-2 intermediate skills.")?;
        writeln!(out, "3. Every intermediate skill has 2-4 sub-skills and leads to 1-2 advanced skills.")?;
        writeln!(out, "4. Every advanced skill has expert-level sub-skills.")?;
        writeln!(out, "5. Edges follow Beginner -> Intermediate -> Advanced -> Mastery.")?;
        writeln!(out)?;

        writeln!(out, "OUTPUT RULES:")?;
        writeln!(out, "1. The ENTIRE response is a single valid JSON object. No prose before or after it.")?;
        writeln!(out, "2. No markdown, no code fences, no backticks.")?;
        writeln!(out, "3. Every skill in learning_path MUST also appear in graph_nodes.")?;
        writeln!(out, "4. Every graph_edges endpoint MUST appear in graph_nodes.")?;
        writeln!(out, "5. learning_resources covers at least 15 skills with study links.")?;
        writeln!(out, "6. recommended_projects has 3-5 items ordered beginner to advanced.")?;
        writeln!(out)?;

        writeln!(out, "REQUIRED KEYS AND TYPES:")?;
        writeln!(out, "- primary_role: string")?;
        writeln!(out, "- why_suited: string")?;
        writeln!(out, "- learning_path: object with beginner, intermediate, advanced (arrays of strings)")?;
        writeln!(out, "- learning_resources: array of objects {{skill: string, links: array of strings}}")?;
        writeln!(out, "- recommended_certifications: array of strings")?;
        writeln!(out, "- recommended_projects: array of strings")?;
        writeln!(out, "- graph_nodes: array of strings")?;
        writeln!(out, "- graph_edges: array of [source, target] string pairs")?;
        writeln!(out)?;
        writeln!(out, "EXACT FORMAT:")?;
        writeln!(out, "{OUTPUT_SHAPE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leprofil::ScoreSource;

    fn ranked() -> Vec<RankedLabel> {
        [(Label::Cloud, 0.91), (Label::Network, 0.62), (Label::Grc, 0.4)]
            .into_iter()
            .enumerate()
            .map(|(idx, (label, probability))| RankedLabel {
                rank: idx + 1,
                label,
                probability,
                source: ScoreSource::Calibrated,
            })
            .collect()
    }

    #[test]
    fn test_states_every_candidate_with_score() {
        let prompt = PromptBuilder::new().build(&ranked());
        assert!(prompt.contains("PRIMARY ROLE: Cloud Security Engineer (cloud)"));
        assert!(prompt.contains("1. Cloud Security Engineer (cloud): 0.910"));
        assert!(prompt.contains("2. Network Security Engineer (network): 0.620"));
        assert!(prompt.contains("3. Governance, Risk & Compliance (grc): 0.400"));
    }

    #[test]
    fn test_mandates_bare_json_and_lists_keys() {
        let prompt = PromptBuilder::new().build(&ranked());
        assert!(prompt.contains("single valid JSON object"));
        assert!(prompt.contains("no code fences"));
        for key in [
            "primary_role",
            "why_suited",
            "learning_path",
            "recommended_certifications",
            "recommended_projects",
            "graph_nodes",
            "graph_edges",
        ] {
            assert!(prompt.contains(&format!("- {key}:")), "missing {key}");
        }
    }

    #[test]
    fn test_edge_range_override() {
        let prompt = PromptBuilder::new().with_edge_range(5, 3).build(&ranked());
        assert!(prompt.contains("At least 5 edges, ideally 5-5."));
    }
}
