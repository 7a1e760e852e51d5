//! Command type definitions shared between main.rs and the commands.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration after all overrides
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where configuration files are looked up
    Path,

    /// Write a configuration file filled with the defaults
    Init {
        /// Write the global file instead of ./.wecreaterc
        #[arg(long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
