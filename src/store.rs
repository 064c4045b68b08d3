//! Append-only persistence for contact form submissions.
//!
//! Two on-disk formats live side by side in the data directory:
//!
//! | Format | File | Record |
//! |---|---|---|
//! | [`StoreFormat::Text`] | `database.txt` | `\n` then `email,subject,message`, unescaped |
//! | [`StoreFormat::Csv`]  | `database.csv` | `email,subject,message\r\n`, minimally quoted |
//!
//! Every append opens the file in append mode, writes the whole record with a
//! single `write_all`, and drops the handle on the way out. There is no lock
//! across requests: concurrent appends are ordered by the OS.
//!
//! With both formats enabled the text file is written first and the CSV file
//! last, so a submission reaches the CSV file only once every other format
//! holds it.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::form::Submission;

pub const TEXT_FILE: &str = "database.txt";
pub const CSV_FILE: &str = "database.csv";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreFormat {
    Text,
    Csv,
}

impl StoreFormat {
    fn file_name(self) -> &'static str {
        match self {
            Self::Text => TEXT_FILE,
            Self::Csv => CSV_FILE,
        }
    }

    /// Serializes one submission as a complete record for this format.
    pub fn encode(self, s: &Submission) -> String {
        match self {
            Self::Text => format!("\n{},{},{}", s.email, s.subject, s.message),
            Self::Csv => format!(
                "{},{},{}\r\n",
                csv_field(&s.email),
                csv_field(&s.subject),
                csv_field(&s.message),
            ),
        }
    }
}

/// Which formats an append writes to, in write order. Parsed from `csv`,
/// `text` or `both`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoreFormats(Vec<StoreFormat>);

impl StoreFormats {
    pub fn as_slice(&self) -> &[StoreFormat] {
        &self.0
    }
}

impl Default for StoreFormats {
    fn default() -> Self {
        Self(vec![StoreFormat::Csv])
    }
}

impl FromStr for StoreFormats {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self(vec![StoreFormat::Csv])),
            "text" | "txt" => Ok(Self(vec![StoreFormat::Text])),
            "both" => Ok(Self(vec![StoreFormat::Text, StoreFormat::Csv])),
            other => Err(format!("unknown store format `{other}` (expected csv, text or both)")),
        }
    }
}

/// The contact submission store.
#[derive(Clone, Debug)]
pub struct ContactStore {
    dir: PathBuf,
    formats: StoreFormats,
}

impl ContactStore {
    pub fn new(dir: impl Into<PathBuf>, formats: StoreFormats) -> Self {
        Self { dir: dir.into(), formats }
    }

    pub fn path(&self, format: StoreFormat) -> PathBuf {
        self.dir.join(format.file_name())
    }

    /// Appends `submission` to every enabled format. Stops at the first
    /// failure; earlier formats keep what they already wrote.
    pub async fn append(&self, submission: &Submission) -> io::Result<()> {
        for &format in self.formats.as_slice() {
            let path = self.path(format);
            append_record(&path, format.encode(submission).as_bytes()).await?;
            debug!(path = %path.display(), "contact submission stored");
        }
        Ok(())
    }
}

async fn append_record(path: &Path, record: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(record).await?;
    file.flush().await
}

/// Quotes a field only when it holds the delimiter, the quote character or a
/// line break. Embedded quotes are doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(email: &str, subject: &str, message: &str) -> Submission {
        Submission {
            email: email.to_owned(),
            subject: subject.to_owned(),
            message: message.to_owned(),
        }
    }

    #[test]
    fn csv_quotes_only_when_needed() {
        let row = StoreFormat::Csv.encode(&submission("a@b.com", "Hi, you", "say \"hey\"\nbye"));
        assert_eq!(row, "a@b.com,\"Hi, you\",\"say \"\"hey\"\"\nbye\"\r\n");
    }

    #[test]
    fn text_record_is_newline_prefixed_and_unescaped() {
        let line = StoreFormat::Text.encode(&submission("a@b.com", "Hi, you", "Hello"));
        assert_eq!(line, "\na@b.com,Hi, you,Hello");
    }

    #[test]
    fn parses_format_selection() {
        assert_eq!("CSV".parse::<StoreFormats>().unwrap().as_slice(), [StoreFormat::Csv]);
        assert_eq!("text".parse::<StoreFormats>().unwrap().as_slice(), [StoreFormat::Text]);
        assert_eq!(
            "both".parse::<StoreFormats>().unwrap().as_slice(),
            [StoreFormat::Text, StoreFormat::Csv]
        );
        assert!("sqlite".parse::<StoreFormats>().is_err());
    }

    #[tokio::test]
    async fn appends_accumulate_in_arrival_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::new(dir.path(), StoreFormats::default());

        store.append(&submission("a@b.com", "Hi", "Hello")).await.unwrap();
        store.append(&submission("a@b.com", "Hi", "Hello")).await.unwrap();
        store.append(&submission("c@d.com", "", "Later")).await.unwrap();

        let csv = std::fs::read_to_string(store.path(StoreFormat::Csv)).unwrap();
        assert_eq!(csv, "a@b.com,Hi,Hello\r\na@b.com,Hi,Hello\r\nc@d.com,,Later\r\n");
        assert!(!store.path(StoreFormat::Text).exists());
    }

    #[tokio::test]
    async fn both_formats_receive_the_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::new(dir.path(), "both".parse().unwrap());

        store.append(&submission("a@b.com", "Hi", "Hello")).await.unwrap();

        let csv = std::fs::read_to_string(dir.path().join(CSV_FILE)).unwrap();
        let txt = std::fs::read_to_string(dir.path().join(TEXT_FILE)).unwrap();
        assert_eq!(csv, "a@b.com,Hi,Hello\r\n");
        assert_eq!(txt, "\na@b.com,Hi,Hello");
    }

    #[tokio::test]
    async fn failed_text_write_leaves_csv_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(TEXT_FILE)).unwrap();
        let store = ContactStore::new(dir.path(), "both".parse().unwrap());

        assert!(store.append(&submission("a@b.com", "Hi", "Hello")).await.is_err());
        assert!(!dir.path().join(CSV_FILE).exists());
    }

    #[tokio::test]
    async fn missing_directory_surfaces_the_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ContactStore::new(dir.path().join("absent"), StoreFormats::default());
        let err = store.append(&submission("a@b.com", "Hi", "Hello")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
