mod commands;
mod terminal;

use commands::{CommandLine, Commands, list, probe, run};
use terminal::{print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    spinner::init_logging();
    if commands.no_color {
        colored::control::set_override(false);
    }
    print::banner(commands.quiet);

    match commands.command {
        Commands::Run(args) => {
            print::header("preparing checks", commands.quiet);
            let cfg = run::build_config(args, commands.quiet, commands.no_color).await?;
            run::run(&cfg).await
        }
        Commands::List => {
            print::header("available checks", commands.quiet);
            list::list();
            Ok(())
        }
        Commands::Probe => {
            print::header("probing host capabilities", commands.quiet);
            probe::probe().await;
            Ok(())
        }
    }
}
