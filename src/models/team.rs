use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::new_id;

/// The discipline a team member belongs to. Drives grouping on the team slide.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RoleType {
    Designer,
    #[default]
    Engineer,
    #[serde(rename = "Project Manager")]
    ProjectManager,
}

impl RoleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Designer => "Designer",
            Self::Engineer => "Engineer",
            Self::ProjectManager => "Project Manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Designer" => Some(Self::Designer),
            "Engineer" => Some(Self::Engineer),
            "Project Manager" => Some(Self::ProjectManager),
            _ => None,
        }
    }

    /// Pictogram shown on role headers and member cards.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Designer => "\u{1F3A8}",
            Self::Engineer => "\u{1F4BB}",
            Self::ProjectManager => "\u{1F4CB}",
        }
    }
}

/// Seniority level of a team member.
///
/// An empty string in JSON means "unspecified" and maps to `None` on
/// [`TeamMember::seniority`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Seniority {
    Lead,
    Senior,
    Middle,
}

impl Seniority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Senior => "Senior",
            Self::Middle => "Middle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Lead" => Some(Self::Lead),
            "Senior" => Some(Self::Senior),
            "Middle" => Some(Self::Middle),
            _ => None,
        }
    }
}

/// A staffing line on the team slide: `count` people of one role and seniority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub id: String,
    pub role_type: RoleType,
    #[serde(
        serialize_with = "serialize_seniority",
        deserialize_with = "deserialize_seniority"
    )]
    pub seniority: Option<Seniority>,
    pub count: u32,
}

impl Default for TeamMember {
    fn default() -> Self {
        Self {
            id: String::new(),
            role_type: RoleType::default(),
            seniority: None,
            count: 1,
        }
    }
}

impl TeamMember {
    pub fn new(role_type: RoleType, seniority: Option<Seniority>, count: u32) -> Self {
        Self {
            id: new_id(),
            role_type,
            seniority,
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamData {
    pub members: Vec<TeamMember>,
}

fn serialize_seniority<S>(value: &Option<Seniority>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.map(|s| s.as_str()).unwrap_or(""))
}

fn deserialize_seniority<'de, D>(deserializer: D) -> Result<Option<Seniority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Seniority::from_str(s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown seniority: {}", s))),
    }
}
