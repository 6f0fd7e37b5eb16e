// Career label set

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cybersecurity specialty predicted by the scoring stage.
///
/// Declaration order is significant: it breaks ties when ranking and fixes
/// the order in which classifiers are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Penetration testing and red teaming
    Offensive,
    /// Security operations and detection
    BlueTeam,
    /// Malware analysis and reverse engineering
    Malware,
    /// Digital forensics and incident response
    Forensics,
    /// Network security
    Network,
    /// Cloud security
    Cloud,
    /// Application security
    Appsec,
    /// Threat intelligence
    #[serde(rename = "threatintel")]
    ThreatIntel,
    /// Governance, risk and compliance
    Grc,
}

impl Label {
    /// All labels in declaration order.
    pub const ALL: [Label; 9] = [
        Label::Offensive,
        Label::BlueTeam,
        Label::Malware,
        Label::Forensics,
        Label::Network,
        Label::Cloud,
        Label::Appsec,
        Label::ThreatIntel,
        Label::Grc,
    ];

    /// Return the wire identifier of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Offensive => "offensive",
            Label::BlueTeam => "blue_team",
            Label::Malware => "malware",
            Label::Forensics => "forensics",
            Label::Network => "network",
            Label::Cloud => "cloud",
            Label::Appsec => "appsec",
            Label::ThreatIntel => "threatintel",
            Label::Grc => "grc",
        }
    }

    /// Create a label from its wire identifier.
    pub fn from_str_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|label| label.as_str() == s)
    }

    /// Position of the label in declaration order.
    pub fn declaration_index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for label in Label::ALL {
            assert_eq!(Label::from_str_name(label.as_str()), Some(label));
        }
        assert_eq!(Label::from_str_name("red_team"), None);
    }

    #[test]
    fn test_declaration_index_matches_all() {
        for (idx, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.declaration_index(), idx);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Label::ThreatIntel).unwrap();
        assert_eq!(json, "\"threatintel\"");
        let back: Label = serde_json::from_str("\"blue_team\"").unwrap();
        assert_eq!(back, Label::BlueTeam);
    }
}
