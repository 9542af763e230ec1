//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Everything the terminal client needs to assemble one battle.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Seed shared by every client in the encounter.
    pub seed: u64,
    pub poll_interval: Duration,
    /// Directory holding `battle.toml`, `moves.ron`, and `roster.ron`.
    pub data_dir: PathBuf,
    /// Shared directory for the file-backed move exchange. Setting it turns
    /// the battle into a duel between two clients.
    pub exchange_dir: Option<PathBuf>,
    pub player_id: u32,
    /// Roster ids fighting against the player.
    pub opponents: Vec<String>,
    /// Roster ids fighting alongside the player.
    pub allies: Vec<String>,
    /// Let the CPU heuristic pick the player's moves.
    pub autoplay: bool,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            poll_interval: Duration::from_millis(500),
            data_dir: PathBuf::from("data"),
            exchange_dir: None,
            player_id: 0,
            opponents: vec!["cave_brute".to_string()],
            allies: Vec::new(),
            autoplay: false,
            log_dir: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - Shared battle seed (default: current unix time)
    /// - `BATTLE_POLL_MS` - Move-exchange poll interval in ms (default: 500)
    /// - `BATTLE_DATA_DIR` - Content directory (default: `data`, embedded content when missing)
    /// - `BATTLE_EXCHANGE_DIR` - Shared exchange directory for a two-client duel
    /// - `BATTLE_PLAYER_ID` - Local participant id (default: 0)
    /// - `BATTLE_OPPONENTS` - Comma-separated roster ids (default: `cave_brute`)
    /// - `BATTLE_ALLIES` - Comma-separated roster ids (default: none)
    /// - `BATTLE_AUTOPLAY` - Let the CPU heuristic play the local participant
    /// - `BATTLE_LOG_DIR` - Also write logs to `<dir>/<session>/client.log`
    /// - `BATTLE_SESSION_ID` - Session name for the log directory (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("BATTLE_SEED").unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default()
        });

        if let Some(millis) = read_env::<u64>("BATTLE_POLL_MS") {
            config.poll_interval = Duration::from_millis(millis.max(1));
        }

        if let Ok(dir) = env::var("BATTLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.exchange_dir = env::var("BATTLE_EXCHANGE_DIR").ok().map(PathBuf::from);

        if let Some(id) = read_env::<u32>("BATTLE_PLAYER_ID") {
            config.player_id = id;
        }
        if let Ok(list) = env::var("BATTLE_OPPONENTS") {
            config.opponents = split_ids(&list);
        }
        if let Ok(list) = env::var("BATTLE_ALLIES") {
            config.allies = split_ids(&list);
        }

        if let Some(enable) = read_env::<bool>("BATTLE_AUTOPLAY") {
            config.autoplay = enable;
        } else if env::var("BATTLE_AUTOPLAY").is_ok() {
            // Accept a bare variable as "true"
            config.autoplay = true;
        }

        config.log_dir = env::var("BATTLE_LOG_DIR").ok().map(PathBuf::from);
        config.session_id = env::var("BATTLE_SESSION_ID").ok();

        config
    }

    /// True when the battle is shared with another client.
    pub fn is_networked(&self) -> bool {
        self.exchange_dir.is_some()
    }
}

fn split_ids(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_lists_ignore_blanks() {
        assert_eq!(split_ids(" cave_brute, ,hex_weaver,"), vec!["cave_brute", "hex_weaver"]);
        assert!(split_ids("").is_empty());
    }

    #[test]
    fn defaults_fight_one_brute_locally() {
        let config = ClientConfig::default();
        assert_eq!(config.opponents, vec!["cave_brute"]);
        assert!(!config.is_networked());
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }
}
