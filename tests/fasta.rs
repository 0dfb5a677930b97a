use seqdb_normalize::domain::{Record, SeqType};
use seqdb_normalize::fasta::{self, decode_composite};

#[test]
fn written_file_reads_back_after_decoding() {
    let records = vec![
        Record::new("blaTEM-1B_1", "ATG".repeat(50), SeqType::Nucl)
            .with_acc("AY458016")
            .with_desc("beta-lactamase"),
        Record::new("tetA", "ATGCCC", SeqType::Nucl).with_acc("X00006"),
    ];

    let mut out = Vec::new();
    let stats = fasta::write_records(&mut out, &records, "resfinder").unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(stats.repeated_ids, 0);

    let text = String::from_utf8(out).unwrap();
    assert!(text.lines().all(|line| line.len() <= fasta::LINE_WIDTH || line.starts_with('>')));
    // Empty descriptions fall back to the plain ID.
    assert!(text.contains(">resfinder~~~tetA~~~X00006 tetA\n"));

    let loaded = fasta::parse_str(&text, SeqType::Nucl, "roundtrip").unwrap();
    let decoded: Vec<_> = loaded
        .iter()
        .map(|record| {
            let (db, id, acc) = decode_composite(&record.id).unwrap();
            assert_eq!(db, "resfinder");
            (id.to_string(), acc.to_string(), record.seq.clone())
        })
        .collect();
    let expected: Vec<_> = records
        .iter()
        .map(|record| (record.id.clone(), record.acc.clone(), record.seq.clone()))
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn repeated_ids_are_counted_not_dropped() {
    let records = vec![
        Record::new("sul1", "ATGAAA", SeqType::Nucl),
        Record::new("sul1", "ATGCCC", SeqType::Nucl),
    ];
    let mut out = Vec::new();
    let stats = fasta::write_records(&mut out, &records, "ncbi").unwrap();
    assert_eq!(stats.written, 2);
    assert_eq!(stats.repeated_ids, 1);
}
