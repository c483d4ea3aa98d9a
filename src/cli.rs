// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "webbundle")]
#[command(about = "Live theme deployment to a running portal over its Gogo shell")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new webbundle.yml configuration file
    Init {
        /// Bundle name (defaults to the directory name)
        #[arg(short, long)]
        bundle: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Deploy the theme's web bundle directory, replacing any previous bundle
    Deploy {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Break an existing deploy lock
        #[arg(long)]
        force: bool,
    },

    /// Remove the theme's artifacts and uninstall its bundle
    Uninstall {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,

        /// Break an existing deploy lock
        #[arg(long)]
        force: bool,
    },

    /// Show the bundle the console currently lists for this theme
    Status {
        /// Target destination (defined in config)
        #[arg(short, long)]
        destination: Option<String>,
    },
}
