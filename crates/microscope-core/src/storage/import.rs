use crate::model::Record;
use anyhow::Context;
use std::io::BufRead;
use std::path::Path;

/// Parse a JSON-lines file of records. Blank lines are skipped.
pub fn read_jsonl(path: &Path) -> anyhow::Result<Vec<Record>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_jsonl(std::io::BufReader::new(file))
        .with_context(|| format!("failed to import {}", path.display()))
}

pub fn parse_jsonl<R: BufRead>(reader: R) -> anyhow::Result<Vec<Record>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = serde_json::from_str(&line)
            .with_context(|| format!("line {}: invalid record", idx + 1))?;
        out.push(record);
    }
    Ok(out)
}
