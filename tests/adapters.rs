use std::collections::HashMap;

use seqdb_normalize::adapters::{AdapterRegistry, bacmet2, ecoh, plasmidfinder, resfinder};
use seqdb_normalize::domain::{SeqType, SourceName};
use seqdb_normalize::fasta;

#[test]
fn resfinder_header_with_notes() {
    let notes = resfinder::parse_notes("# comment\r\naac(6')-Ib:some:Aminoglycoside resistance\r\n");
    let records = fasta::parse_str(">aac(6')-Ib_1_AB098234\nATGAAATAA\n", SeqType::Nucl, "t").unwrap();
    let records = resfinder::normalize(records, &notes).unwrap();
    assert_eq!(records[0].id, "aac(6')-Ib_1");
    assert_eq!(records[0].acc, "AB098234");
    assert_eq!(records[0].desc, "Aminoglycoside resistance");
}

#[test]
fn resfinder_missing_note_leaves_empty_desc() {
    let records = fasta::parse_str(">blaTEM-1B_1_AY458016\nATG\n", SeqType::Nucl, "t").unwrap();
    let records = resfinder::normalize(records, &HashMap::new()).unwrap();
    assert_eq!(records[0].id, "blaTEM-1B_1");
    assert_eq!(records[0].desc, "");
}

#[test]
fn plasmidfinder_trailing_accession() {
    let records = fasta::parse_str(">IncFIB_AP001918.1\nATG\n", SeqType::Nucl, "t").unwrap();
    let records = plasmidfinder::normalize(records);
    assert_eq!(records[0].id, "IncFIB");
    assert_eq!(records[0].acc, "AP001918.1");
    assert_eq!(records[0].desc, "IncFIB_AP001918.1");
}

#[test]
fn ecoh_serotype_allele() {
    let records = fasta::parse_str(
        ">1__fliC__fliC-H1__1 AB028471.1;flagellin;H1\nATG\n",
        SeqType::Nucl,
        "t",
    )
    .unwrap();
    let records = ecoh::normalize(records).unwrap();
    assert_eq!(records[0].id, "fliC-H1");
    assert_eq!(records[0].acc, "AB028471.1");
    assert_eq!(records[0].desc, "flagellin H1");
}

#[test]
fn bacmet2_pipe_fields() {
    let records = fasta::parse_str(
        ">BAC0098|ctpC|sp|P0A502|CTPC_MYCTU Probable cation-transporting ATPase\nMAKLV\n",
        SeqType::Prot,
        "t",
    )
    .unwrap();
    let records = bacmet2::normalize(records).unwrap();
    assert_eq!(records[0].id, "ctpC-BAC0098");
    assert_eq!(records[0].acc, "sp:P0A502");
}

#[test]
fn registry_covers_every_source() {
    let registry = AdapterRegistry::default();
    for name in SourceName::ALL {
        let adapter = registry.get(name).unwrap();
        assert_eq!(adapter.name(), name);
    }
    assert_eq!(
        registry.get(SourceName::Bacmet2).unwrap().seq_type(),
        SeqType::Prot
    );
    assert_eq!(registry.names().len(), 9);
}

#[test]
fn loaded_sequences_use_restricted_alphabet() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("argannot.fasta"),
        ">(AGly)AadA1:M95287:3320-4111:792 aadA1\natgrygkxtaa\n",
    )
    .unwrap();
    let registry = AdapterRegistry::default();
    let records = registry
        .get(SourceName::Argannot)
        .unwrap()
        .load(dir.path())
        .unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].seq.chars().all(|c| "AGCTN".contains(c)));
}
