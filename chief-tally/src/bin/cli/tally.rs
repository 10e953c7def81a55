use chief_replay::{normalize, replay, tallies};
use chief_tally::report::Report;
use chief_tally::source::{EventSource, JsonEventFile, JsonSpellFile, SpellMetaSource};
use chief_tally::spell;
use chief_tally::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
pub struct Tally {
    /// Event dump (JSON) with every etch and vote for the chief
    #[structopt(long)]
    events: PathBuf,

    /// Candidate spell metadata dump (JSON); omit to skip decoding
    #[structopt(long)]
    spells: Option<PathBuf>,

    /// Emit the structured report instead of text
    #[structopt(long)]
    json: bool,
}

impl Tally {
    pub fn exec(self) -> Result<(), Error> {
        let raw = JsonEventFile::new(&self.events).events()?;
        let events = normalize(raw)?;
        let state = replay(&events)?;
        let tallies = tallies(&state);

        let metadata = self.spells.as_deref().map(JsonSpellFile::load).transpose()?;
        let mut spells = HashMap::new();
        if let Some(source) = &metadata {
            for tally in &tallies {
                if let Some(meta) = source.spell_meta(&tally.candidate)? {
                    spells.insert(tally.candidate, spell::decode(&meta));
                }
            }
        }

        let report = Report {
            hat: state.hat,
            tallies,
            spells,
        };
        let mut stdout = std::io::stdout();
        if self.json {
            report.write_json(&mut stdout)?;
        } else {
            report.write_text(&mut stdout)?;
        }
        Ok(())
    }
}
