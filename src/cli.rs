use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use foodie::users::Role;

#[derive(Parser)]
#[command(name = "foodie")]
#[command(author, version, about = "Food-ordering data store and account image tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply pending migrations
    Migrate,

    /// Create an account with a customer or operator record
    CreateUser {
        /// Email address (domain part is lowercased)
        email: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Role record to attach
        #[arg(long, value_enum, default_value_t = RoleArg::Customer)]
        role: RoleArg,
    },

    /// Upload an image for a user and regenerate the thumbnail
    SetImage {
        /// Email of the user
        email: String,

        /// Image file to upload
        #[arg(required = true)]
        path: PathBuf,
    },

    /// Show the first upcoming menu
    CurrentMenu {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RoleArg {
    Customer,
    Operator,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Customer => Role::Customer,
            RoleArg::Operator => Role::Operator,
        }
    }
}
