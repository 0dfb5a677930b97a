use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{Record, SeqType};
use crate::error::SeqDbError;

pub const HEADER_MARKER: char = '>';
pub const COMPOSITE_SEPARATOR: &str = "~~~";
pub const LINE_WIDTH: usize = 60;

pub fn read_file(path: &Path, seq_type: SeqType) -> Result<Vec<Record>, SeqDbError> {
    let file = File::open(path)
        .map_err(|err| SeqDbError::Filesystem(format!("open {}: {err}", path.display())))?;
    read_records(
        BufReader::new(file),
        seq_type,
        &path.display().to_string(),
    )
}

pub fn parse_str(text: &str, seq_type: SeqType, origin: &str) -> Result<Vec<Record>, SeqDbError> {
    read_records(text.as_bytes(), seq_type, origin)
}

/// Parses every record from `reader`.
///
/// Repeated identifiers get a `_N` suffix (N counting prior occurrences,
/// bumped past any name already in use) and a warning. An empty identifier
/// aborts the whole load.
pub fn read_records<R: BufRead>(
    reader: R,
    seq_type: SeqType,
    origin: &str,
) -> Result<Vec<Record>, SeqDbError> {
    let mut records = Vec::new();
    let mut current: Option<(String, String, String)> = None;

    for line in reader.lines() {
        let line = line.map_err(|err| SeqDbError::Filesystem(format!("read {origin}: {err}")))?;
        let line = line.trim_end_matches('\r');
        if let Some(header) = line.strip_prefix(HEADER_MARKER) {
            if let Some((id, desc, seq)) = current.take() {
                records.push(finish(id, desc, &seq, seq_type));
            }
            let header = header.trim();
            let (id, desc) = match header.split_once(char::is_whitespace) {
                Some((id, desc)) => (id.to_string(), desc.trim().to_string()),
                None => (header.to_string(), String::new()),
            };
            current = Some((id, desc, String::new()));
        } else if let Some((_, _, seq)) = current.as_mut() {
            seq.extend(line.split_whitespace());
        } else if !line.trim().is_empty() {
            warn!("{origin}: ignoring sequence data before the first header");
        }
    }
    if let Some((id, desc, seq)) = current.take() {
        records.push(finish(id, desc, &seq, seq_type));
    }

    let mut occurrences = HashMap::<String, usize>::new();
    let mut taken = HashSet::<String>::new();
    for (index, record) in records.iter_mut().enumerate() {
        if record.id.is_empty() {
            return Err(SeqDbError::EmptyIdentifier {
                origin: origin.to_string(),
                index: index + 1,
            });
        }
        let count = occurrences.entry(record.id.clone()).or_insert(0);
        *count += 1;
        if taken.contains(&record.id) {
            let mut suffix = (*count - 1).max(1);
            let renamed = loop {
                let candidate = format!("{}_{suffix}", record.id);
                if !taken.contains(&candidate) {
                    break candidate;
                }
                suffix += 1;
            };
            warn!("{origin}: duplicate ID '{}' renamed to '{renamed}'", record.id);
            record.id = renamed;
        }
        taken.insert(record.id.clone());
    }

    info!("loaded {} sequences from {origin}", records.len());
    Ok(records)
}

fn finish(id: String, desc: String, seq: &str, seq_type: SeqType) -> Record {
    Record::new(id, seq_type.sanitize(seq), seq_type).with_desc(desc)
}

pub fn composite_id(db_name: &str, record: &Record) -> String {
    [db_name, record.id.as_str(), record.acc.as_str()].join(COMPOSITE_SEPARATOR)
}

pub fn decode_composite(value: &str) -> Option<(&str, &str, &str)> {
    let mut parts = value.splitn(3, COMPOSITE_SEPARATOR);
    let db = parts.next()?;
    let id = parts.next()?;
    let acc = parts.next()?;
    Some((db, id, acc))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub written: usize,
    pub repeated_ids: usize,
}

pub fn write_records<W: Write>(
    mut writer: W,
    records: &[Record],
    db_name: &str,
) -> Result<WriteStats, SeqDbError> {
    let io_err = |err: std::io::Error| SeqDbError::Filesystem(format!("write records: {err}"));
    let mut seen = HashMap::<&str, usize>::new();
    let mut stats = WriteStats::default();

    for record in records {
        let freq = seen.entry(record.id.as_str()).or_insert(0);
        *freq += 1;
        if *freq > 1 {
            warn!("seen {freq} copies of {}", record.id);
            stats.repeated_ids += 1;
        }
        writeln!(
            writer,
            "{HEADER_MARKER}{} {}",
            composite_id(db_name, record),
            record.display_desc()
        )
        .map_err(io_err)?;
        for chunk in record.seq.as_bytes().chunks(LINE_WIDTH) {
            writer.write_all(chunk).map_err(io_err)?;
            writer.write_all(b"\n").map_err(io_err)?;
        }
        stats.written += 1;
    }
    writer.flush().map_err(io_err)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_headers_and_wrapped_sequence() {
        let text = ">gene1 first gene\nacgt\nACGT\r\n>gene2\nTTTT\n";
        let records = parse_str(text, SeqType::Nucl, "test").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "gene1");
        assert_eq!(records[0].desc, "first gene");
        assert_eq!(records[0].seq, "ACGTACGT");
        assert_eq!(records[0].acc, "");
        assert_eq!(records[1].desc, "");
    }

    #[test]
    fn renames_duplicate_ids() {
        let text = ">a\nAC\n>a\nGT\n>a\nTT\n";
        let records = parse_str(text, SeqType::Nucl, "test").unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a_1", "a_2"]);
    }

    #[test]
    fn renamed_ids_do_not_collide_with_later_headers() {
        let text = ">a\nAC\n>a\nGT\n>a_1\nTT\n>a\nCC\n";
        let records = parse_str(text, SeqType::Nucl, "test").unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a_1", "a_1_1", "a_2"]);
    }

    #[test]
    fn empty_identifier_is_fatal() {
        let err = parse_str(">ok\nAC\n> \nGT\n", SeqType::Nucl, "test").unwrap_err();
        assert_matches!(err, SeqDbError::EmptyIdentifier { index: 2, .. });
    }

    #[test]
    fn wraps_sequences_and_falls_back_to_id() {
        let record = Record::new("geneA", "A".repeat(130), SeqType::Nucl).with_acc("X1");
        let mut out = Vec::new();
        write_records(&mut out, &[record], "testdb").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], ">testdb~~~geneA~~~X1 geneA");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2].len(), 60);
        assert_eq!(lines[3].len(), 10);
    }

    #[test]
    fn counts_repeated_ids() {
        let records = vec![
            Record::new("dup", "AAA", SeqType::Nucl),
            Record::new("dup", "CCC", SeqType::Nucl),
        ];
        let stats = write_records(std::io::sink(), &records, "db").unwrap();
        assert_eq!(stats.written, 2);
        assert_eq!(stats.repeated_ids, 1);
    }

    #[test]
    fn decodes_composite_identifier() {
        assert_eq!(
            decode_composite("card~~~NDM-1~~~FN396876.1:2-814"),
            Some(("card", "NDM-1", "FN396876.1:2-814"))
        );
        assert_eq!(decode_composite("plain"), None);
    }
}
