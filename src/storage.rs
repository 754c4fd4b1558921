use crate::engine::GenerateResult;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Dépôt fichiers des semaines générées : un `rota-<lundi>.json` par
/// semaine, écriture atomique, au plus une rota stockée par semaine.
#[derive(Debug, Clone)]
pub struct RotaStore {
    base_dir: PathBuf,
}

impl RotaStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, week_start: NaiveDate) -> PathBuf {
        self.base_dir.join(format!("rota-{week_start}.json"))
    }

    /// Sauvegarde atomique ; refuse une semaine déjà stockée (le contrôle
    /// d'unicité se fait ici, avant toute invocation du moteur côté CLI).
    pub fn save(&self, result: &GenerateResult) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating rota directory {}", self.base_dir.display()))?;
        let path = self.path_for(result.week_start);
        if path.exists() {
            bail!(
                "a rota is already stored for week {} ({})",
                result.week_start,
                path.display()
            );
        }
        let json = serde_json::to_vec_pretty(result)?;
        let mut tmp =
            NamedTempFile::new_in(&self.base_dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).with_context(|| "atomic rename")?;
        Ok(path)
    }

    pub fn exists(&self, week_start: NaiveDate) -> bool {
        self.path_for(week_start).exists()
    }

    pub fn load(&self, week_start: NaiveDate) -> anyhow::Result<GenerateResult> {
        let path = self.path_for(week_start);
        let data =
            fs::read(&path).with_context(|| format!("reading rota {}", path.display()))?;
        let result: GenerateResult = serde_json::from_slice(&data)
            .with_context(|| format!("parsing rota {}", path.display()))?;
        Ok(result)
    }

    /// Semaines stockées, triées chronologiquement.
    pub fn list(&self) -> anyhow::Result<Vec<NaiveDate>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut weeks = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(date_part) = name
                .strip_prefix("rota-")
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            if let Ok(date) = date_part.parse::<NaiveDate>() {
                weeks.push(date);
            }
        }
        weeks.sort();
        Ok(weeks)
    }
}
