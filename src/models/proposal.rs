use std::fmt;

use serde::{Deserialize, Serialize};

use super::*;

/// A complete proposal: everything needed to build the deck.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProposalData {
    pub cover: CoverData,
    pub challenge: ChallengeData,
    pub solution: SolutionData,
    pub scope: ScopeData,
    pub team: TeamData,
    #[serde(alias = "timeline")]
    pub gantt: Timeline,
    #[serde(alias = "hierarchy")]
    pub risk: Hierarchy,
}

impl ProposalData {
    /// File name offered for downloads: `proposal-<client>.<ext>`.
    ///
    /// Characters outside `[A-Za-z0-9 ._-]` become `_` so the name is safe in
    /// a `Content-Disposition` header.
    pub fn download_name(&self, format: OutputFormat) -> String {
        let client = self.cover.client_name.trim();
        let client: String = if client.is_empty() {
            "draft".to_string()
        } else {
            client
                .chars()
                .map(|c| match c {
                    'A'..='Z' | 'a'..='z' | '0'..='9' | ' ' | '.' | '_' | '-' => c,
                    _ => '_',
                })
                .collect()
        };
        format!("proposal-{}.{}", client, format.extension())
    }

    /// Document title stored in the exported package metadata.
    pub fn document_title(&self) -> String {
        format!("{} - {}", self.cover.title, self.cover.client_name)
    }

    /// A fully populated demonstration proposal.
    ///
    /// The timeline matches the editor's starting state: Discovery over weeks
    /// 1-4 and an MVP over weeks 5-16 of a 20-week plan.
    pub fn sample() -> Self {
        let sponsor = EscalationNode::new("Executive Sponsor", "Dana Reyes");
        let delivery = EscalationNode::new("Delivery Manager", "Sam Patel");
        let tech_lead = EscalationNode::new("Tech Lead", "");
        let design_lead = EscalationNode::new("Design Lead", "Kim Novak");

        let links = vec![
            EscalationLink::new(&delivery.id, &sponsor.id, "Escalates to"),
            EscalationLink::new(&tech_lead.id, &delivery.id, "Reports to"),
            EscalationLink::new(&design_lead.id, &delivery.id, "Reports to"),
        ];

        Self {
            cover: CoverData {
                title: "Customer Portal Modernization".to_string(),
                description: "Discovery, MVP delivery and ongoing evolution".to_string(),
                client_name: "Northwind".to_string(),
                client_logo_base64: None,
            },
            challenge: ChallengeData {
                items: vec![
                    ChallengeItem::new(
                        "Legacy stack",
                        "The portal runs on an unsupported framework that slows every release.",
                    ),
                    ChallengeItem::new(
                        "Fragmented data",
                        "Customer records live in three systems with no single source of truth.",
                    ),
                    ChallengeItem::new(
                        "Mobile experience",
                        "Over half of traffic is mobile, yet key flows are desktop-only.",
                    ),
                ],
                additional_statement: "We need a partner who can modernize without pausing the business."
                    .to_string(),
            },
            solution: SolutionData {
                points: vec![
                    "Incremental migration behind a routing facade".to_string(),
                    "Unified customer API over existing systems".to_string(),
                    "Responsive design system shared across products".to_string(),
                    "Automated test and release pipeline".to_string(),
                    "Observability from day one".to_string(),
                ],
            },
            scope: ScopeData {
                features: vec![
                    ScopeFeature::new("Account dashboard", "Balances, orders and notifications in one view."),
                    ScopeFeature::new("Self-service billing", "Invoices, payment methods and history."),
                    ScopeFeature::new("Support center", "Ticketing integrated with the CRM."),
                    ScopeFeature::new("Single sign-on", "OIDC login shared with the mobile apps."),
                    ScopeFeature::new("Admin console", "Role-based tools for internal staff."),
                ],
            },
            team: TeamData {
                members: vec![
                    TeamMember::new(RoleType::ProjectManager, Some(Seniority::Senior), 1),
                    TeamMember::new(RoleType::Engineer, Some(Seniority::Lead), 1),
                    TeamMember::new(RoleType::Engineer, Some(Seniority::Senior), 3),
                    TeamMember::new(RoleType::Designer, Some(Seniority::Middle), 1),
                ],
            },
            gantt: Timeline {
                total_weeks: DEFAULT_TOTAL_WEEKS,
                phases: vec![Phase::new("Discovery", 1, 4), Phase::new("MVP", 5, 16)],
            },
            risk: Hierarchy {
                nodes: vec![sponsor, delivery, tech_lead, design_lead],
                links,
            },
        }
    }
}

/// Requested export artifact type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Pptx,
    Pdf,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pptx" => Some(Self::Pptx),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deck sections in presentation order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Cover,
    Challenge,
    Solution,
    Scope,
    Team,
    Timeline,
    Risk,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Self::Cover,
        Self::Challenge,
        Self::Solution,
        Self::Scope,
        Self::Team,
        Self::Timeline,
        Self::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Challenge => "challenge",
            Self::Solution => "solution",
            Self::Scope => "scope",
            Self::Team => "team",
            Self::Timeline => "timeline",
            Self::Risk => "risk",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == s)
    }

    /// Human-facing slide label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cover => "Cover",
            Self::Challenge => "Challenge Overview",
            Self::Solution => "Solution Overview",
            Self::Scope => "Scope & Features",
            Self::Team => "Team Composition",
            Self::Timeline => "Project Timeline",
            Self::Risk => "Risk Escalation & Management",
        }
    }

    /// Hint shown by the preview when the section has nothing to draw yet.
    pub fn empty_hint(&self) -> &'static str {
        match self {
            Self::Cover => "Add a title to see preview",
            Self::Challenge => "Add challenges to see preview",
            Self::Solution => "Add solution points to see preview",
            Self::Scope => "Add features to see preview",
            Self::Team => "Add team members to see preview",
            Self::Timeline => "Add phases to see preview",
            Self::Risk => "Add team roles to see preview",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
