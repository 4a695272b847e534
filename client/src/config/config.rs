use common::config::{ConfigManager, Validate};
use common::game::GameMode;
use common::session::MAX_PLAYER_NAME_LEN;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "tictactoe_client_config.yaml";

fn get_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

pub fn get_config_manager(path_override: Option<&str>) -> ConfigManager<Config> {
    match path_override {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(get_config_path()),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub player_x_name: String,
    pub player_o_name: String,
    pub last_mode: Option<GameMode>,
    /// Pause in milliseconds before the computer places its mark.
    #[serde(default = "default_bot_delay_ms")]
    pub bot_delay_ms: u64,
}

fn default_bot_delay_ms() -> u64 {
    500
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        for name in [&self.player_x_name, &self.player_o_name] {
            if name.trim().is_empty() {
                return Err("Player names must not be empty".to_string());
            }
            if name.chars().count() > MAX_PLAYER_NAME_LEN {
                return Err(format!(
                    "Player names must be at most {} characters",
                    MAX_PLAYER_NAME_LEN
                ));
            }
        }
        if self.bot_delay_ms > 10_000 {
            return Err("bot_delay_ms must not exceed 10000".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_x_name: "Player 1".to_string(),
            player_o_name: "Player 2".to_string(),
            last_mode: None,
            bot_delay_ms: default_bot_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> String {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_tictactoe_client_config_{}.yaml", random_number));
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_round_trips_through_the_manager() {
        let config = Config {
            last_mode: Some(GameMode::PlayerVsComputer),
            ..Config::default()
        };
        let manager: ConfigManager<Config> = ConfigManager::from_yaml_file(get_temp_file_path());

        manager.set_config(&config).unwrap();

        assert_eq!(manager.get_config().unwrap(), config);
        // Cached read returns the same value again.
        assert_eq!(manager.get_config().unwrap(), config);
    }

    #[test]
    fn test_missing_config_file_returns_default_config() {
        let manager: ConfigManager<Config> =
            ConfigManager::from_yaml_file("this_file_does_not_exist.yaml");
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config_cannot_be_read() {
        let invalid_config_content = r#"
            player_x_name: ""
            player_o_name: "Player 2"
            last_mode: null
        "#;

        let file_path = get_temp_file_path();
        std::fs::write(&file_path, invalid_config_content).unwrap();

        let manager: ConfigManager<Config> = ConfigManager::from_yaml_file(file_path);
        assert!(manager.get_config().is_err());
    }

    #[test]
    fn test_invalid_config_cannot_be_saved() {
        let config = Config {
            bot_delay_ms: 60_000,
            ..Config::default()
        };
        let manager: ConfigManager<Config> = ConfigManager::from_yaml_file(get_temp_file_path());
        assert!(manager.set_config(&config).is_err());
    }
}
