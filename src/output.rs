use std::io::{self, Write};

use serde::Serialize;

use crate::pipeline::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct SummaryOutput;

impl SummaryOutput {
    pub fn print(summary: &RunSummary, mode: OutputMode) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        match mode {
            OutputMode::Json => Self::write_json(&mut stdout, summary),
            OutputMode::Human => Self::write_human(&mut stdout, summary),
        }
    }

    pub fn print_sources(names: &[&str]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for name in names {
            writeln!(stdout, "{name}")?;
        }
        Ok(())
    }

    pub fn write_human<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
        writeln!(out, "database:    {} ({})", summary.source, summary.seq_type)?;
        writeln!(out, "loaded:      {}", summary.loaded)?;
        if summary.orf.checked > 0 {
            writeln!(
                out,
                "full genes:  {}/{} ({} repaired, {} kept despite failing)",
                summary.orf.passed, summary.orf.checked, summary.orf.repaired, summary.orf.failed
            )?;
        }
        writeln!(out, "duplicates:  {} removed", summary.duplicates_removed)?;
        writeln!(out, "written:     {}", summary.written)?;
        writeln!(out, "output:      {}", summary.output)?;
        writeln!(
            out,
            "index:       {}",
            if summary.indexed { "built" } else { "skipped" }
        )?;
        Ok(())
    }

    pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeqType;
    use crate::validate::OrfReport;

    fn summary() -> RunSummary {
        RunSummary {
            source: "resfinder".to_string(),
            seq_type: SeqType::Nucl,
            loaded: 10,
            orf: OrfReport {
                checked: 10,
                passed: 9,
                repaired: 1,
                failed: 1,
            },
            duplicates_removed: 2,
            repeated_ids: 0,
            written: 8,
            output: "/db/resfinder/sequences".to_string(),
            indexed: false,
            elapsed_ms: 5,
        }
    }

    #[test]
    fn human_summary() {
        let mut out = Vec::new();
        SummaryOutput::write_human(&mut out, &summary()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("database:    resfinder (nucl)"));
        assert!(text.contains("full genes:  9/10 (1 repaired, 1 kept despite failing)"));
        assert!(text.contains("index:       skipped"));
    }

    #[test]
    fn json_summary() {
        let mut out = Vec::new();
        SummaryOutput::write_json(&mut out, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["seq_type"], "nucl");
        assert_eq!(value["orf"]["repaired"], 1);
        assert_eq!(value["written"], 8);
    }
}
