//! Command line arguments.
//!
//! Only the flags below are recognised. Anything else on the command line is
//! dropped before parsing, so stray arguments never stop the bot.

use clap::Parser;
use tracing::info;

/// Command line flags of the bot.
#[derive(Parser, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[command(name = "chatbridge-bot", about = "Discord bot with a Minecraft chat relay")]
pub struct Args {
    /// Skip deploying commands on the Discord API.
    #[arg(short = 's', long)]
    pub skip_deploy: bool,

    /// Deploy an empty set of commands, effectively removing all commands.
    #[arg(short = 'e', long)]
    pub empty_deploy: bool,

    /// Run the bot without connecting to Discord. Useful for testing things like command deployment.
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

const FLAGS: &[(&str, &str)] = &[
    ("--help", "-h"),
    ("--skip-deploy", "-s"),
    ("--empty-deploy", "-e"),
    ("--dry-run", "-d"),
];

fn canonical(arg: &str) -> Option<&'static str> {
    FLAGS
        .iter()
        .find(|(long, short)| *long == arg || *short == arg)
        .map(|(long, _)| *long)
}

impl Args {
    /// Parses the process arguments.
    pub fn from_env() -> Self {
        Self::parse_lenient(std::env::args())
    }

    /// Parses `args`, whose first item is the program name. `--help` prints
    /// usage and exits.
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().unwrap_or_else(|| "chatbridge-bot".to_string());

        let mut known: Vec<&'static str> = Vec::new();
        for flag in args.filter_map(|arg| canonical(&arg)) {
            if !known.contains(&flag) {
                known.push(flag);
            }
        }

        let parsed = Self::parse_from(std::iter::once(program).chain(known.into_iter().map(str::to_string)));
        parsed.normalized()
    }

    fn normalized(mut self) -> Self {
        if self.empty_deploy && self.skip_deploy {
            info!(
                tag = "process",
                "Ignoring --skip-deploy (-s) flag due to the presence of the --empty-deploy (-e) flag..."
            );
            self.skip_deploy = false;
        }

        if self.dry_run {
            info!(tag = "process", "Dry-running! Not connecting to Discord...");
        }

        self
    }
}
