mod commands;
mod terminal;

use commands::{CommandLine, inventory};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    let cfg = commands.config();
    let credentials = commands.credentials();

    inventory::inventory(commands.target(), commands.output, &cfg, &credentials).await
}
