use serde::{Deserialize, Serialize};

use super::models::{Conference, Division, TeamModel};

/// Request payload for creating or replacing a team
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    pub name: String,
    pub short_code: String,
    pub conference: Conference,
    pub division: Division,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub short_code: String,
    pub conference: Conference,
    pub division: Division,
    pub logo_url: Option<String>,
    pub is_active: bool,
}

impl From<TeamModel> for TeamResponse {
    fn from(team: TeamModel) -> Self {
        Self {
            id: team.id,
            name: team.name,
            short_code: team.short_code,
            conference: team.conference,
            division: team.division,
            logo_url: team.logo_url,
            is_active: team.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedResponse {
    pub created: usize,
    pub skipped: usize,
}
