//! Render-ready view over the tally results. Both forms serialize every
//! numeric value as a decimal string so output round-trips exactly.

use crate::spell::DecodedAction;
use crate::Error;
use chief_replay::{Address, CandidateTally, Weight};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

pub struct Report {
    pub hat: Option<Address>,
    pub tallies: Vec<CandidateTally>,
    pub spells: HashMap<Address, DecodedAction>,
}

impl Report {
    /// Text form: `rank. candidate weight`, the hat marked, a description
    /// line for recognized spells, then one line per contributing voter.
    pub fn write_text(&self, out: &mut impl Write) -> io::Result<()> {
        for (rank, tally) in self.tallies.iter().enumerate() {
            let marker = if Some(tally.candidate) == self.hat {
                " [hat]"
            } else {
                ""
            };
            writeln!(out, "{}. {} {}{}", rank + 1, tally.candidate, tally.weight, marker)?;
            if let Some(line) = self.spells.get(&tally.candidate).and_then(describe) {
                writeln!(out, "{}", line)?;
            }
            for (voter, weight) in ordered_voters(tally) {
                writeln!(out, "  {} {}", voter, weight)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut *out, &self.as_json())?;
        writeln!(out)?;
        Ok(())
    }

    fn as_json(&self) -> JsonReport<'_> {
        JsonReport {
            hat: self.hat,
            proposals: self
                .tallies
                .iter()
                .map(|tally| JsonProposal {
                    candidate: tally.candidate,
                    total: tally.weight.to_string(),
                    hat: Some(tally.candidate) == self.hat,
                    voters: ordered_voters(tally)
                        .map(|(voter, weight)| JsonVoter {
                            address: *voter,
                            weight: weight.to_string(),
                        })
                        .collect(),
                    spell: self.spells.get(&tally.candidate),
                })
                .collect(),
        }
    }
}

// voters render by weight descending, address ascending, like the tallies
fn ordered_voters(tally: &CandidateTally) -> impl Iterator<Item = (&Address, &Weight)> + '_ {
    tally
        .voters
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)))
}

fn describe(action: &DecodedAction) -> Option<String> {
    match action {
        DecodedAction::Recognized {
            target,
            function,
            formatted_args,
            ..
        } => Some(format!(
            "spell: {}({}) on {}",
            function,
            formatted_args
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .join(", "),
            target,
        )),
        DecodedAction::Unrecognized { .. } => None,
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    hat: Option<Address>,
    proposals: Vec<JsonProposal<'a>>,
}

#[derive(Serialize)]
struct JsonProposal<'a> {
    candidate: Address,
    total: String,
    hat: bool,
    voters: Vec<JsonVoter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spell: Option<&'a DecodedAction>,
}

#[derive(Serialize)]
struct JsonVoter {
    address: Address,
    weight: String,
}
