use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub fn save_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }

    Ok(records)
}

/// Like [`load_jsonl`], but a store that was never written loads as empty.
pub fn load_jsonl_or_default<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_jsonl(path)
}

pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    file.write_all(&line)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HelpRequest, RequestStatus};
    use chrono::Utc;

    fn mk_request(id: &str) -> HelpRequest {
        HelpRequest {
            id: id.to_string(),
            customer_name: "Dana".to_string(),
            question: "Can I bring my dog?".to_string(),
            status: RequestStatus::Pending,
            answer: None,
            created_at: Utc::now(),
            resolved_at: None,
            supervisor_id: None,
            is_timeout_resolved: false,
        }
    }

    #[test]
    fn missing_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded: Vec<HelpRequest> =
            load_jsonl_or_default(&dir.path().join("tickets.jsonl")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn save_creates_parent_dirs_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tickets.jsonl");

        save_jsonl(&path, &[mk_request("t1"), mk_request("t2")]).unwrap();
        let loaded: Vec<HelpRequest> = load_jsonl(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].id, "t2");
    }

    #[test]
    fn blank_lines_are_skipped_and_bad_lines_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.jsonl");

        append_jsonl(&path, &mk_request("t1")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"\n   \n")
            .unwrap();
        append_jsonl(&path, &mk_request("t2")).unwrap();

        let loaded: Vec<HelpRequest> = load_jsonl(&path).unwrap();
        assert_eq!(loaded.len(), 2);

        std::fs::write(&path, "{not json}\n").unwrap();
        assert!(load_jsonl::<HelpRequest>(&path).is_err());
    }
}
