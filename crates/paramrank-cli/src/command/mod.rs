use clap::Parser;

use self::aggregate::AggregateArg;

mod aggregate;

/// Report the best-scoring runs of a learning experiment
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    aggregate: AggregateArg,

    /// Log more details to stderr (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init(args.verbose);
    aggregate::run(&args.aggregate)
}
