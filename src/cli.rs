//! CLI definitions for chatlens
//!
//! This module contains the clap CLI structure definitions, separated from main.rs
//! so they can be accessed by xtask for documentation generation (man pages, markdown).

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use clap_complete::Shell as CompletionShell;
use std::path::PathBuf;

/// Version string: clean for release builds, with the commit hash otherwise.
#[cfg(feature = "release")]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

/// Build clap styles.
///
/// - Green: headers, usage, command names (accent color)
/// - White: descriptions, placeholders (renders as light gray on dark terminals)
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default()) // Light gray for descriptions
        .valid(AnsiColor::White.on_default()) // Light gray for valid values
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(about = "[ chatlens ] - turn a chat transcript into a report, a timeline, a song or a picture")]
#[command(
    long_about = "chatlens - Analyze chat conversation transcripts with a language model.

A transcript goes in, a kind of analysis is chosen, and chatlens returns the
result: a relationship report, an emotion survey, a memory timeline, a story,
song lyrics, an anniversary list, or an illustration with its prompt.

QUICK START:
    chatlens kinds                       List available analysis kinds
    chatlens analyze report chat.txt     Write a report for chat.txt
    chatlens prepare memory chat.txt     Show what would be sent (no network)
    cat chat.txt | chatlens analyze lyric

CREDENTIALS:
    Text kinds use OPENAI_API_KEY, the image kind uses ANTHROPIC_API_KEY
    and REPLICATE_API_TOKEN. Backends and variable names are configurable
    in ~/.config/chatlens/config.toml."
)]
#[command(version = VERSION)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,

    /// Use this config file instead of ~/.config/chatlens/config.toml
    #[arg(long, global = true, value_name = "PATH", help = "Path to an alternative config file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a transcript
    #[command(long_about = "Analyze a chat transcript with the chosen kind of analysis.

The transcript is read from FILE, or from stdin when FILE is omitted or '-'.
Lines such as '2024/08/10 23:03, Alice : hello' are normalized to
'Alice : hello' before sending. Long transcripts are truncated to their most
recent part; long memory timelines are split and analyzed in two halves.

Exit status is 0 on success, 2 for invalid input (unknown kind, empty or
oversized transcript) and 1 for any other failure.

EXAMPLES:
    chatlens analyze report chat.txt             Relationship report
    chatlens analyze memory chat.txt --json      Timeline as a JSON envelope
    chatlens analyze image chat.txt              Illustration prompt and image
    chatlens analyze x --request req.json        Read {\"kind\", \"transcript\"} JSON

KINDS:
    basic (report), emotion, memory, past (narrative), rap (lyric),
    anniversary, image (image-prompt)")]
    Analyze {
        /// Analysis kind (canonical name or alias)
        #[arg(help = "Analysis kind (see 'chatlens kinds')")]
        kind: String,
        /// Transcript file; stdin when omitted or '-'
        #[arg(help = "Transcript file (stdin when omitted or '-')")]
        file: Option<PathBuf>,
        /// Print the result as a JSON envelope
        #[arg(long, help = "Print {\"result\"} / {\"error\"} JSON instead of plain text")]
        json: bool,
        /// Treat the input as a JSON request; KIND is ignored
        #[arg(long, help = "Read a JSON request ({\"kind\", \"transcript\", \"part\"}) instead of a transcript")]
        request: bool,
    },

    /// Show how a transcript would be prepared (no network)
    #[command(long_about = "Dry run: route the kind and prepare the transcript without
calling any backend.

Prints the backend role, the output token budget, and the shape of the
prepared input (whole or split, character counts, truncation).

EXAMPLES:
    chatlens prepare memory chat.txt
    chatlens prepare basic chat.txt --output prepared.txt")]
    Prepare {
        /// Analysis kind (canonical name or alias)
        #[arg(help = "Analysis kind (see 'chatlens kinds')")]
        kind: String,
        /// Transcript file; stdin when omitted or '-'
        #[arg(help = "Transcript file (stdin when omitted or '-')")]
        file: Option<PathBuf>,
        /// Write the prepared text here
        #[arg(long, short, help = "Write the prepared text to this file")]
        output: Option<PathBuf>,
    },

    /// List analysis kinds
    #[command(long_about = "List every analysis kind with its alias, backend role and description.

EXAMPLE:
    chatlens kinds")]
    Kinds,

    /// Configuration management
    #[command(
        subcommand,
        long_about = "View the chatlens configuration.

Configuration is stored in ~/.config/chatlens/config.toml and includes
length limits, the retry policy, backend providers and the image generator.

EXAMPLES:
    chatlens config show          Display current configuration
    chatlens config path          Print the config file location"
    )]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(long_about = "Generate a shell completion script on stdout.

EXAMPLES:
    chatlens completions bash > ~/.local/share/bash-completion/completions/chatlens
    chatlens completions zsh > ~/.zfunc/_chatlens")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, help = "Target shell")]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    #[command(long_about = "Display the effective configuration in TOML format.

Values missing from the file are shown with their defaults.

EXAMPLE:
    chatlens config show")]
    Show,
    /// Print the configuration file path
    #[command(long_about = "Print the path of the configuration file in use.

EXAMPLE:
    chatlens config path")]
    Path,
}
