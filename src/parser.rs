//! implements a parser for the EVE Online XML API `IndustryJobs` response.
use std::str;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::types::job::{Job, DATE_FORMAT};

#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("response is not valid UTF-8: {0}")]
    Encoding(#[from] str::Utf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("response contains neither a result nor an error")]
    MissingResult,

    #[error("job {job_id} has an invalid end date {value:?}: {source}")]
    Timestamp {
        job_id: u64,
        value: String,
        source: chrono::ParseError,
    },
}

/// The `<eveapi>` root element. Everything besides the job rows (and an error,
/// if the API reports one) is ignored.
#[derive(Debug, Deserialize)]
struct EveApi {
    result: Option<ResultElement>,
    error: Option<ErrorElement>,
}

#[derive(Debug, Deserialize)]
struct ResultElement {
    rowset: Rowset,
}

#[derive(Debug, Deserialize)]
struct Rowset {
    #[serde(rename = "row", default)]
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "@jobID")]
    job_id: u64,
    #[serde(rename = "@blueprintTypeName")]
    blueprint: String,
    #[serde(rename = "@installerName")]
    installer: String,
    #[serde(rename = "@endDate")]
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct ErrorElement {
    #[serde(rename = "@code")]
    code: u32,
    #[serde(rename = "$text", default)]
    message: String,
}

impl TryFrom<Row> for Job {
    type Error = ParsingError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        let end_date = NaiveDateTime::parse_from_str(&row.end_date, DATE_FORMAT)
            .map_err(|source| ParsingError::Timestamp {
                job_id: row.job_id,
                value: row.end_date.clone(),
                source,
            })?
            .and_utc();

        Ok(Job {
            id: row.job_id,
            blueprint: row.blueprint,
            installer: row.installer,
            end_date,
        })
    }
}

/// Decodes a complete snapshot of jobs. A single malformed row fails the whole
/// snapshot rather than being skipped.
pub fn parse_jobs(body: &[u8]) -> Result<Vec<Job>, ParsingError> {
    let doc: EveApi = quick_xml::de::from_str(str::from_utf8(body)?)?;

    match (doc.result, doc.error) {
        (_, Some(ErrorElement { code, message })) => Err(ParsingError::Api {
            code,
            message: message.trim().to_owned(),
        }),
        (Some(result), None) => {
            result.rowset.rows.into_iter().map(Job::try_from).collect()
        },
        (None, None) => Err(ParsingError::MissingResult),
    }
}
