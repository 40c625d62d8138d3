use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::repositories::{PlayerRecord, PlayerRoster, RosterError};

/// JSON file implementation of PlayerRoster
///
/// Expects a top-level array of `{ "id", "name", "role", "base_price" }`
/// objects; array order is nomination order.
pub struct JsonPlayerRoster {
    path: PathBuf,
}

impl JsonPlayerRoster {
    /// Creates a roster backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PlayerRoster for JsonPlayerRoster {
    async fn load_records(&self) -> Result<Vec<PlayerRecord>, RosterError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RosterError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let records: Vec<PlayerRecord> = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), players = records.len(), "roster loaded");

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auction::PlayerRole;
    use std::io::Write;

    fn roster_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn loads_players_in_file_order() {
        let file = roster_file(
            r#"[
                {"id": 2, "name": "Keeper", "role": "Wicket-Keeper", "base_price": 40},
                {"id": 1, "name": "Opener", "role": "batsman", "base_price": "25.5"}
            ]"#,
        );

        let players = JsonPlayerRoster::new(file.path()).load_players().await.unwrap();

        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name(), "Keeper");
        assert_eq!(players[0].role(), PlayerRole::WicketKeeper);
        assert_eq!(players[1].base_price().to_string(), "25.5");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let roster = JsonPlayerRoster::new("/definitely/not/here.json");

        assert!(matches!(roster.load_records().await, Err(RosterError::Io { .. })));
    }

    #[tokio::test]
    async fn malformed_file_is_a_json_error() {
        let file = roster_file("{ not json");

        let result = JsonPlayerRoster::new(file.path()).load_records().await;

        assert!(matches!(result, Err(RosterError::Json(_))));
    }
}
