use clap::Parser;

use backoffice_console::{Cli, Command, Console, ConsoleConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ConsoleConfig::from_env()?;
    backoffice_observability::init_with(&config.log);

    let console = Console::new(config)?;
    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Shell => console.shell(std::io::stdin().lock(), &mut out).await,
        command => console.run(command, &mut out).await,
    }
}
