use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Record, SeqType};

// Standard genetic code, codons ordered by TCAG at each position.
const CODON_TABLE: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrfOutcome {
    Accepted { len: usize },
    Repaired { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrfRejection {
    LengthNotTriplet { len: usize },
    AmbiguousBases,
    InternalStop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrfReport {
    pub checked: usize,
    pub passed: usize,
    pub repaired: usize,
    pub failed: usize,
}

fn base_index(base: u8) -> Option<usize> {
    match base {
        b'T' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

pub fn translate(seq: &str) -> String {
    seq.as_bytes()
        .chunks_exact(3)
        .map(|codon| {
            let index = codon.iter().try_fold(0usize, |acc, &base| {
                base_index(base.to_ascii_uppercase()).map(|value| acc * 4 + value)
            });
            index.map_or('X', |index| char::from(CODON_TABLE[index]))
        })
        .collect()
}

pub fn reverse_complement(seq: &str) -> String {
    seq.bytes()
        .rev()
        .map(|base| match base {
            b'A' => 'T',
            b'T' => 'A',
            b'G' => 'C',
            b'C' => 'G',
            b'a' => 't',
            b't' => 'a',
            b'g' => 'c',
            b'c' => 'g',
            other => char::from(other),
        })
        .collect()
}

fn has_internal_stop(seq: &str) -> bool {
    let protein = translate(seq);
    let body = protein.strip_suffix('*').unwrap_or(protein.as_str());
    body.contains('*')
}

/// Checks that `record` is a complete gene, repairing reversed entries.
///
/// `record.seq` is only ever replaced by its reverse complement, and only when
/// that orientation translates without an internal stop.
pub fn check_orf(record: &mut Record) -> Result<OrfOutcome, OrfRejection> {
    let len = record.seq.len();
    if len % 3 != 0 {
        warn!("{}: length {len} is not a multiple of 3", record.id);
        return Err(OrfRejection::LengthNotTriplet { len });
    }
    if record
        .seq
        .bytes()
        .any(|base| !matches!(base, b'A' | b'G' | b'C' | b'T'))
    {
        warn!("{}: has non-AGTC bases", record.id);
        return Err(OrfRejection::AmbiguousBases);
    }
    if !has_internal_stop(&record.seq) {
        return Ok(OrfOutcome::Accepted { len });
    }

    let revcomp = reverse_complement(&record.seq);
    if has_internal_stop(&revcomp) {
        warn!("{}: has internal stop codons in both orientations", record.id);
        return Err(OrfRejection::InternalStop);
    }
    warn!("{}: internal stop codon fixed by reverse complement", record.id);
    record.seq = revcomp;
    Ok(OrfOutcome::Repaired { len })
}

/// Runs [`check_orf`] over every nucleotide record. Failures are counted,
/// never removed.
pub fn check_all(records: &mut [Record]) -> OrfReport {
    let mut report = OrfReport::default();
    for record in records.iter_mut().filter(|r| r.seq_type == SeqType::Nucl) {
        report.checked += 1;
        match check_orf(record) {
            Ok(OrfOutcome::Accepted { .. }) => report.passed += 1,
            Ok(OrfOutcome::Repaired { .. }) => {
                report.passed += 1;
                report.repaired += 1;
            }
            Err(reason) => {
                debug!("{}: kept despite failed ORF check ({reason:?})", record.id);
                report.failed += 1;
            }
        }
    }
    report
}
