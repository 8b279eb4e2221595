use std::fmt;

use chrono::{DateTime, Utc};

/// Textual format of timestamps in the XML API, always in UTC.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An industry job as reported by one feed snapshot.
///
/// Identity is the whole value: a job whose end date is corrected upstream is
/// a different job as far as tracking is concerned.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Job {
    pub id: u64,
    /// Blueprint type name, e.g. `Test Item Blueprint I`.
    pub blueprint: String,
    /// Name of the character that installed the job.
    pub installer: String,
    pub end_date: DateTime<Utc>,
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (job {}) installed by {} completes at {} UTC",
            self.blueprint,
            self.id,
            self.installer,
            self.end_date.format(DATE_FORMAT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;

    fn job(id: u64, end_date: &str) -> Job {
        Job {
            id,
            blueprint: "Test Item Blueprint I".into(),
            installer: "Fake Character".into(),
            end_date: NaiveDateTime::parse_from_str(end_date, DATE_FORMAT)
                .unwrap()
                .and_utc(),
        }
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(job(1, "2020-01-01 01:01:01"), job(1, "2020-01-01 01:01:01"));
        assert_ne!(job(1, "2020-01-01 01:01:01"), job(1, "2020-01-01 01:01:02"));
        assert_ne!(job(1, "2020-01-01 01:01:01"), job(2, "2020-01-01 01:01:01"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            job(7, "2020-01-01 01:01:01").to_string(),
            "Test Item Blueprint I (job 7) installed by Fake Character \
             completes at 2020-01-01 01:01:01 UTC"
        );
    }
}
