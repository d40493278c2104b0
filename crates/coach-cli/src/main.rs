mod cmd;
mod output;
mod root;
mod session;

use clap::{Parser, Subcommand};
use cmd::{
    block::BlockSubcommand, day::DaySubcommand, edit::HeaderSubcommand,
    record::RecordSubcommand, session::SessionSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coach",
    about = "Author fitness, nutrition and mental-health programs step by step",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .coach/)
    #[arg(long, global = true, env = "COACH_ROOT")]
    root: Option<PathBuf>,

    /// Wizard session to act on (default: the active session)
    #[arg(long, global = true, env = "COACH_SESSION")]
    session: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a coach workspace in the current directory
    Init,

    /// Start a new authoring session
    New {
        /// fitness, nutrition or mental
        #[arg(long)]
        category: Option<String>,
    },

    /// Open a stored record for editing
    Resume {
        record: String,
        /// Jump ahead to this step (stops at the first incomplete step)
        #[arg(long)]
        step: Option<String>,
    },

    /// Show the active session
    Show,

    /// Set draft metadata
    Set {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Header image URL ("" clears it)
        #[arg(long)]
        header_image: Option<String>,
    },

    /// Toggle a tag on or off
    Tag { tag: String },

    /// Stage, confirm or discard a header image
    Header {
        #[command(subcommand)]
        subcommand: HeaderSubcommand,
    },

    /// Manage content blocks
    Block {
        #[command(subcommand)]
        subcommand: BlockSubcommand,
    },

    /// Schedule blocks on program days
    Day {
        #[command(subcommand)]
        subcommand: DaySubcommand,
    },

    /// Advance to the next step
    Next,

    /// Go back one step
    Prev,

    /// Save the draft without publishing
    Save,

    /// Publish from the review step
    Publish,

    /// Start a new draft after publishing
    Reset,

    /// Dismiss the last save/publish failure notice
    Dismiss,

    /// Inspect stored records
    Record {
        #[command(subcommand)]
        subcommand: RecordSubcommand,
    },

    /// List, switch or drop wizard sessions
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },

    /// Validate the project configuration
    Check,

    /// Serve the HTTP authoring API
    Serve {
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let sel = cli.session.as_deref();
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::New { category } => cmd::open::new(&root, category.as_deref(), json),
        Commands::Resume { record, step } => {
            cmd::open::resume(&root, &record, step.as_deref(), json)
        }
        Commands::Show => cmd::show::run(&root, sel, json),
        Commands::Set {
            title,
            description,
            category,
            header_image,
        } => cmd::edit::set(&root, sel, title, description, category, header_image, json),
        Commands::Tag { tag } => cmd::edit::tag(&root, sel, &tag, json),
        Commands::Header { subcommand } => cmd::edit::header(&root, sel, subcommand, json),
        Commands::Block { subcommand } => cmd::block::run(&root, sel, subcommand, json),
        Commands::Day { subcommand } => cmd::day::run(&root, sel, subcommand, json),
        Commands::Next => cmd::nav::next(&root, sel, json),
        Commands::Prev => cmd::nav::prev(&root, sel, json),
        Commands::Save => cmd::save::save_draft(&root, sel, json),
        Commands::Publish => cmd::save::publish(&root, sel, json),
        Commands::Reset => cmd::nav::reset(&root, sel, json),
        Commands::Dismiss => cmd::nav::dismiss(&root, sel, json),
        Commands::Record { subcommand } => cmd::record::run(&root, subcommand, json),
        Commands::Session { subcommand } => cmd::session::run(&root, subcommand, json),
        Commands::Check => cmd::check::run(&root, json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
