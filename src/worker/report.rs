//! Global improvement reports and where they go.

use std::io::{self, Write};

use crate::crypto::Address;
use crate::source::Candidate;

/// A candidate that improved the global best for at least one criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The improving candidate
    pub candidate: Candidate,
    /// The worker that found it
    pub worker_id: usize,
    /// Names of the criteria it improved, with their integer score if any
    pub improved: Vec<(&'static str, Option<u32>)>,
}

impl Report {
    pub fn address(&self) -> &Address {
        &self.candidate.address
    }

    /// Checksummed address with 0x prefix.
    pub fn identifier_hex(&self) -> String {
        self.candidate.address.to_checksum()
    }

    pub fn nonce(&self) -> u64 {
        self.candidate.nonce
    }

    pub fn private_key_hex(&self) -> String {
        self.candidate.keypair.private_key_hex()
    }

    pub fn improved_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.improved.iter().map(|(name, _)| *name)
    }

    /// Tab-separated `address, nonce, private key`, plus the improved
    /// criteria when `with_criteria` is set.
    pub fn to_line(&self, with_criteria: bool) -> String {
        let mut line = format!(
            "{}\t{}\t{}",
            self.identifier_hex(),
            self.nonce(),
            self.private_key_hex()
        );
        if with_criteria {
            let names: Vec<String> = self
                .improved
                .iter()
                .map(|(name, score)| match score {
                    Some(score) => format!("{}={}", name, score),
                    None => name.to_string(),
                })
                .collect();
            line.push('\t');
            line.push_str(&names.join(","));
        }
        line
    }
}

/// Receives every global improvement, in order.
pub trait ReportSink {
    fn emit(&mut self, report: &Report) -> io::Result<()>;
}

/// Collects reports in memory.
impl ReportSink for Vec<Report> {
    fn emit(&mut self, report: &Report) -> io::Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

/// Writes one line per report to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink {
    with_criteria: bool,
}

impl StdoutSink {
    /// `with_criteria` adds a column naming the improved criteria.
    pub fn new(with_criteria: bool) -> Self {
        Self { with_criteria }
    }
}

impl ReportSink for StdoutSink {
    fn emit(&mut self, report: &Report) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", report.to_line(self.with_criteria))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    fn report() -> Report {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let keypair = Keypair::from_secret_key(secret).unwrap();
        let candidate = Candidate::new(*keypair.address(), keypair, 3);
        Report {
            candidate,
            worker_id: 0,
            improved: vec![("least", None), ("ascending", Some(2))],
        }
    }

    #[test]
    fn test_line_format() {
        let r = report();
        assert_eq!(
            r.to_line(false),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\t3\t\
             0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert!(r.to_line(true).ends_with("\tleast,ascending=2"));
    }

    #[test]
    fn test_vec_sink() {
        let mut sink: Vec<Report> = Vec::new();
        sink.emit(&report()).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].improved_names().collect::<Vec<_>>(), vec!["least", "ascending"]);
    }
}
