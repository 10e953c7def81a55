mod tally;

use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "chief-tally", rename_all = "kebab-case")]
struct Cli {
    #[structopt(flatten)]
    tally: tally::Tally,
}

fn main() {
    let cli = Cli::from_args();
    if let Err(error) = cli.tally.exec() {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
