use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "passkeep")]
#[command(version)]
#[command(about = "Per-user site password storage over HTTP", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the web server (default).
    Serve,
    /// Create the tables if they do not exist.
    InitDb,
    /// Drop every table and vacuum the database file.
    ClearDb,
}

impl Cli {
    pub fn selected_command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
