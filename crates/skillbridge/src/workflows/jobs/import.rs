//! Candidate pools loaded from CSV exports.
//!
//! Expected header: `candidate_id,skills,points,certificates`, with skills
//! separated by `;`. Blank points or certificate cells count as zero.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{CandidateId, CandidateProfile};

#[derive(Debug)]
pub enum CandidateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingId { line: u64 },
    DuplicateId(String),
}

impl std::fmt::Display for CandidateImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateImportError::Io(err) => write!(f, "failed to read candidate export: {}", err),
            CandidateImportError::Csv(err) => write!(f, "invalid candidate CSV data: {}", err),
            CandidateImportError::MissingId { line } => {
                write!(f, "candidate on line {} has no candidate_id", line)
            }
            CandidateImportError::DuplicateId(id) => {
                write!(f, "candidate {} appears more than once", id)
            }
        }
    }
}

impl std::error::Error for CandidateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CandidateImportError::Io(err) => Some(err),
            CandidateImportError::Csv(err) => Some(err),
            CandidateImportError::MissingId { .. } | CandidateImportError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for CandidateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CandidateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct CandidateImporter;

impl CandidateImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateProfile>, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateProfile>, CandidateImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = BTreeSet::new();
        let mut candidates = Vec::new();

        for (index, record) in csv_reader.deserialize::<CandidateRow>().enumerate() {
            let row = record?;
            let candidate_id = row.candidate_id.trim().to_string();
            if candidate_id.is_empty() {
                // header is line 1
                return Err(CandidateImportError::MissingId {
                    line: index as u64 + 2,
                });
            }
            if !seen.insert(candidate_id.clone()) {
                return Err(CandidateImportError::DuplicateId(candidate_id));
            }

            candidates.push(CandidateProfile {
                candidate_id: CandidateId(candidate_id),
                skills: split_skills(row.skills.as_deref()),
                points: row.points.unwrap_or(0),
                certificates: row.certificates.unwrap_or(0),
            });
        }

        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    candidate_id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skills: Option<String>,
    #[serde(default, deserialize_with = "empty_count_as_none")]
    points: Option<u32>,
    #[serde(default, deserialize_with = "empty_count_as_none")]
    certificates: Option<u32>,
}

fn split_skills(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_count_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match empty_string_as_none(deserializer)? {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
