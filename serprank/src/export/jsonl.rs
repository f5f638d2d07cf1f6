//! JSON-Lines file helpers

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{Formatter, Serializer};

use super::errors::{ExportError, ExportResult};

/// Create the parent directory of `path` if needed
pub fn ensure_parent_dir(path: &Path) -> ExportResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    Ok(())
}

/// Single-line JSON with `", "` and `": "` separators
///
/// Matches the layout of existing training files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> std::io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> std::io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Serialize `value` as one JSON line with spaced separators
pub fn to_jsonl_line<T: Serialize + ?Sized>(value: &T) -> ExportResult<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write one JSON object per line, returning the number of records written
///
/// Non-ASCII text is written as UTF-8, not escaped. Struct records keep their
/// field order; map-backed documents are written with sorted keys.
pub fn write_jsonl<T, I>(path: &Path, records: I) -> ExportResult<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    for record in records {
        let mut serializer = Serializer::with_formatter(&mut writer, SpacedFormatter);
        record.serialize(&mut serializer)?;
        writer
            .write_all(b"\n")
            .map_err(|e| ExportError::io(path, e))?;
        written += 1;
    }
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    Ok(written)
}

/// Read every non-empty line of a JSON-Lines file
///
/// Fails on the first line that does not parse as `T`.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> ExportResult<Vec<T>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ExportError::InputNotFound(path.to_path_buf()),
        _ => ExportError::io(path, e),
    })?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| ExportError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| ExportError::InvalidLine {
            line: index + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_directories_and_keeps_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.jsonl");
        let docs = vec![
            Document::new().with("title", "Café ☕"),
            Document::new().with("title", "Plain"),
        ];

        assert_eq!(write_jsonl(&path, &docs).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Café ☕"));
        assert_eq!(text.lines().count(), 2);

        let back: Vec<Document> = read_jsonl(&path).unwrap();
        assert_eq!(back, docs);
    }

    #[test]
    fn test_lines_use_spaced_separators() {
        let doc = Document::new()
            .with("rank", 2)
            .with("tags", vec!["a", "b"])
            .with("title", "Ownership");
        assert_eq!(
            to_jsonl_line(&doc).unwrap(),
            r#"{"rank": 2, "tags": ["a", "b"], "title": "Ownership"}"#
        );

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spaced.jsonl");
        write_jsonl(&path, [&doc]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"rank\": 2, \"tags\": [\"a\", \"b\"], \"title\": \"Ownership\"}\n"
        );
    }

    #[test]
    fn test_read_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"a\": 1}\n\nnot json\n").unwrap();

        match read_jsonl::<Document>(&path) {
            Err(ExportError::InvalidLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_jsonl::<Document>(Path::new("/no/such/file.jsonl"));
        assert!(matches!(result, Err(ExportError::InputNotFound(_))));
    }
}
