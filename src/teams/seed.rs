use super::models::{Conference, Division, NewTeam};

/// (name, short code, division)
const NHL_TEAMS: [(&str, &str, Division); 32] = [
    ("Boston Bruins", "BOS", Division::Atlantic),
    ("Buffalo Sabres", "BUF", Division::Atlantic),
    ("Detroit Red Wings", "DET", Division::Atlantic),
    ("Florida Panthers", "FLA", Division::Atlantic),
    ("Montreal Canadiens", "MTL", Division::Atlantic),
    ("Ottawa Senators", "OTT", Division::Atlantic),
    ("Tampa Bay Lightning", "TBL", Division::Atlantic),
    ("Toronto Maple Leafs", "TOR", Division::Atlantic),
    ("Carolina Hurricanes", "CAR", Division::Metropolitan),
    ("Columbus Blue Jackets", "CBJ", Division::Metropolitan),
    ("New Jersey Devils", "NJD", Division::Metropolitan),
    ("New York Islanders", "NYI", Division::Metropolitan),
    ("New York Rangers", "NYR", Division::Metropolitan),
    ("Philadelphia Flyers", "PHI", Division::Metropolitan),
    ("Pittsburgh Penguins", "PIT", Division::Metropolitan),
    ("Washington Capitals", "WSH", Division::Metropolitan),
    ("Chicago Blackhawks", "CHI", Division::Central),
    ("Colorado Avalanche", "COL", Division::Central),
    ("Dallas Stars", "DAL", Division::Central),
    ("Minnesota Wild", "MIN", Division::Central),
    ("Nashville Predators", "NSH", Division::Central),
    ("St. Louis Blues", "STL", Division::Central),
    ("Utah Hockey Club", "UTA", Division::Central),
    ("Winnipeg Jets", "WPG", Division::Central),
    ("Anaheim Ducks", "ANA", Division::Pacific),
    ("Calgary Flames", "CGY", Division::Pacific),
    ("Edmonton Oilers", "EDM", Division::Pacific),
    ("Los Angeles Kings", "LAK", Division::Pacific),
    ("San Jose Sharks", "SJS", Division::Pacific),
    ("Seattle Kraken", "SEA", Division::Pacific),
    ("Vancouver Canucks", "VAN", Division::Pacific),
    ("Vegas Golden Knights", "VGK", Division::Pacific),
];

/// The current league, ready to insert
pub fn nhl_teams() -> Vec<NewTeam> {
    NHL_TEAMS
        .iter()
        .map(|(name, code, division)| NewTeam {
            name: name.to_string(),
            short_code: code.to_string(),
            conference: division.conference(),
            division: *division,
            logo_url: Some(format!("/logos/{}.svg", code.to_lowercase())),
        })
        .collect()
}
