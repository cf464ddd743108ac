use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Conference {
    Eastern,
    Western,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Division {
    Atlantic,
    Metropolitan,
    Central,
    Pacific,
}

impl Division {
    /// The conference this division plays in
    pub fn conference(self) -> Conference {
        match self {
            Division::Atlantic | Division::Metropolitan => Conference::Eastern,
            Division::Central | Division::Pacific => Conference::Western,
        }
    }
}

/// Database model for the teams table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamModel {
    pub id: i64,
    pub name: String,
    pub short_code: String, // Upper-case, unique
    pub conference: Conference,
    pub division: Division,
    pub logo_url: Option<String>,
    pub is_active: bool,
}

/// Fields supplied when creating a team
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub short_code: String,
    pub conference: Conference,
    pub division: Division,
    pub logo_url: Option<String>,
}
