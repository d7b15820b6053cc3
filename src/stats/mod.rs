/// Player statistics: persisted records, the read repository and the
/// lookup service composing identity resolution with it.

pub mod repository;
pub mod service;

pub use repository::{MySqlStatsRepository, SqliteStatsRepository, StatsRepository};
pub use service::StatsService;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `pvpstats` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Canonical (hyphenated) player identifier
    pub uuid: String,
    pub kills: i32,
    pub deaths: i32,
    pub coins: i32,
    pub killstreak: i32,
}

/// Stats as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerStats {
    pub uuid: String,
    pub username: String,
    pub kills: i32,
    pub deaths: i32,
    pub coins: i32,
    pub killstreak: i32,
}

impl PlayerStats {
    pub fn from_record(record: StatsRecord, username: impl Into<String>) -> Self {
        Self {
            uuid: record.uuid,
            username: username.into(),
            kills: record.kills,
            deaths: record.deaths,
            coins: record.coins,
            killstreak: record.killstreak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_stats_wire_format() {
        let stats = PlayerStats::from_record(
            StatsRecord {
                uuid: "01234567-89ab-cdef-0123-456789abcdef".to_string(),
                kills: 10,
                deaths: 2,
                coins: 500,
                killstreak: 3,
            },
            "alice",
        );

        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "Uuid": "01234567-89ab-cdef-0123-456789abcdef",
                "Username": "alice",
                "Kills": 10,
                "Deaths": 2,
                "Coins": 500,
                "Killstreak": 3
            })
        );
    }
}
