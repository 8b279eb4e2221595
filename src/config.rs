//! Which characters' jobs are interesting, and whom to alert about them.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::{fs, io};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading character config: {0}")]
    Io(#[from] io::Error),

    #[error("parsing character config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(
        "character {character:?} is listed under both {first:?} and {second:?}"
    )]
    DuplicateCharacter {
        character: String,
        first: String,
        second: String,
    },
}

pub trait CharacterConfig: Send + Sync {
    /// Whether jobs installed by this character should be tracked.
    fn is_known(&self, installer: &str) -> bool;

    /// The username to alert about a character's jobs.
    fn alert_destination(&self, installer: &str) -> Option<&str>;
}

/// Character configuration read from a YAML mapping of username to the list of
/// characters that user should be alerted about:
///
/// ```yaml
/// agrakari:
///   - Maaya Saraki
///   - Indy Drone 4
/// ```
///
/// JSON documents of the same shape are accepted too.
#[derive(Clone, Debug, Default)]
pub struct YamlCharacterConfig {
    /// character => username
    destinations: HashMap<String, String>,
}

impl YamlCharacterConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        fs::read_to_string(path)?.parse()
    }

    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.destinations.keys().map(String::as_str)
    }
}

impl std::str::FromStr for YamlCharacterConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let by_username: BTreeMap<String, Vec<String>> =
            serde_yaml::from_str(s)?;

        let mut destinations: HashMap<String, String> = HashMap::new();
        for (username, characters) in by_username {
            for character in characters {
                if let Some(first) = destinations.get(&character) {
                    if first != &username {
                        return Err(ConfigError::DuplicateCharacter {
                            first: first.clone(),
                            second: username,
                            character,
                        });
                    }
                }
                destinations.insert(character, username.clone());
            }
        }

        Ok(Self { destinations })
    }
}

impl CharacterConfig for YamlCharacterConfig {
    fn is_known(&self, installer: &str) -> bool {
        self.destinations.contains_key(installer)
    }

    fn alert_destination(&self, installer: &str) -> Option<&str> {
        self.destinations.get(installer).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use itertools::Itertools;

    const CONFIG: &str = "
agrakari:
  - Maaya Saraki
  - Indy Drone 4
fake_user:
  - Fake Character
";

    #[test]
    fn test_yaml_config() {
        let config: YamlCharacterConfig = CONFIG.parse().unwrap();

        assert_eq!(
            config.characters().sorted().collect::<Vec<_>>(),
            ["Fake Character", "Indy Drone 4", "Maaya Saraki"]
        );
        assert!(config.is_known("Maaya Saraki"));
        assert!(!config.is_known("Someone Else"));
        assert_eq!(config.alert_destination("Maaya Saraki"), Some("agrakari"));
        assert_eq!(config.alert_destination("Indy Drone 4"), Some("agrakari"));
        assert_eq!(
            config.alert_destination("Fake Character"),
            Some("fake_user")
        );
        assert_eq!(config.alert_destination("Someone Else"), None);
    }

    #[test]
    fn test_json_config() {
        let config: YamlCharacterConfig =
            r#"{"agrakari": ["Maaya Saraki"], "fake_user": ["Fake Character"]}"#
                .parse()
                .unwrap();

        assert_eq!(
            config.alert_destination("Fake Character"),
            Some("fake_user")
        );
    }

    #[test]
    fn test_duplicate_character() {
        let err = "a: [Maaya Saraki]\nb: [Maaya Saraki]\n"
            .parse::<YamlCharacterConfig>()
            .unwrap_err();

        match err {
            ConfigError::DuplicateCharacter {
                character,
                first,
                second,
            } => {
                assert_eq!(character, "Maaya Saraki");
                assert_eq!(first, "a");
                assert_eq!(second, "b");
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            YamlCharacterConfig::load("/nonexistent/characters.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
