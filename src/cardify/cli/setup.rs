use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cardify",
    bin_name = "cardify",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Business card template designer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Operate on global templates
    #[arg(short, long, global = true, help_heading = "Options")]
    pub global: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Core,
    Template,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Core => "Core Commands:",
            CommandGroup::Template => "Per-Template Commands:",
            CommandGroup::Data => "Data Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "create" | "list" | "view" => Some(CommandGroup::Core),
            "edit" | "layout" | "rename" | "delete" | "path" => Some(CommandGroup::Template),
            "validate" | "export" | "import" => Some(CommandGroup::Data),
            "doctor" | "config" | "init" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Core,
            CommandGroup::Template,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("cardify {version}\n"));
    output.push_str("Business card template designer\n");
    output.push('\n');
    output.push_str("Usage: cardify [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -g, --global     Operate on global templates\n");
    output.push_str("  -v, --verbose    Verbose output (debug logs on stderr)\n");
    output.push_str("  -h, --help       Print help\n");
    output.push_str("  -V, --version    Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

pub fn print_subcommand_help(command: &Option<Commands>) {
    match command {
        Some(cmd) => print_help_for_command(cmd.name()),
        None => print_grouped_help(),
    }
}

/// Prints help for a command by name, falling back to the grouped help.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Template(TemplateCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Core(c) => match c {
                CoreCommands::Create { .. } => "create",
                CoreCommands::List { .. } => "list",
                CoreCommands::View { .. } => "view",
            },
            Commands::Template(c) => match c {
                TemplateCommands::Edit { .. } => "edit",
                TemplateCommands::Layout { .. } => "layout",
                TemplateCommands::Rename { .. } => "rename",
                TemplateCommands::Delete { .. } => "delete",
                TemplateCommands::Path { .. } => "path",
            },
            Commands::Data(c) => match c {
                DataCommands::Validate { .. } => "validate",
                DataCommands::Export { .. } => "export",
                DataCommands::Import { .. } => "import",
            },
            Commands::Misc(c) => match c {
                MiscCommands::Doctor => "doctor",
                MiscCommands::Config { .. } => "config",
                MiscCommands::Init => "init",
                MiscCommands::Help { .. } => "help",
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CoreCommands {
    /// Create an empty template
    #[command(alias = "n", display_order = 1)]
    Create {
        /// Surface width in pixels (defaults to config default-width)
        #[arg(long)]
        width: Option<f64>,

        /// Surface height in pixels (defaults to config default-height)
        #[arg(long)]
        height: Option<f64>,

        /// Store node geometry as percent of the surface
        #[arg(long)]
        relative: bool,

        /// Name words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// List templates
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only show templates whose name contains this
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one or more templates with their nodes
    #[command(alias = "v", display_order = 3)]
    View {
        /// Indexes, ids or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Apply a script of edit operations (JSON lines) to a template
    #[command(alias = "e", display_order = 10)]
    Edit {
        /// Index, id or name of the template
        selector: String,

        /// File with one JSON op per line, or - for stdin
        #[arg(short, long, value_name = "FILE")]
        script: Option<PathBuf>,

        /// A single JSON op; may be repeated, runs after the script
        #[arg(long = "op", value_name = "JSON")]
        ops: Vec<String>,

        /// Apply and validate without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Show node boxes resolved to pixels
    #[command(display_order = 11)]
    Layout {
        /// Index, id or name of the template
        selector: String,
    },

    /// Rename a template
    #[command(display_order = 12)]
    Rename {
        /// Index, id or name of the template
        selector: String,

        /// New name words (joined with spaces)
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },

    /// Delete one or more templates
    #[command(alias = "rm", display_order = 13)]
    Delete {
        /// Indexes, ids or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Print the file path of one or more templates
    #[command(display_order = 14)]
    Path {
        /// Indexes, ids or a name
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Check templates against the schema
    #[command(display_order = 20)]
    Validate {
        /// Validate a JSON file instead of stored templates
        #[arg(long, value_name = "PATH", conflicts_with = "selectors")]
        file: Option<PathBuf>,

        /// Indexes, ids or a name - if omitted, validates every template
        #[arg(required = false, num_args = 0..)]
        selectors: Vec<String>,
    },

    /// Export templates to a tar.gz bundle
    #[command(display_order = 21)]
    Export {
        /// Bundle path (defaults to cardify-<timestamp>.tar.gz)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Indexes, ids or a name - if omitted, exports every template
        #[arg(required = false, num_args = 0..)]
        selectors: Vec<String>,
    },

    /// Import template JSON files, directories or export bundles
    #[command(display_order = 22)]
    Import {
        /// Paths to files or directories to import
        #[arg(required = true, num_args = 1..)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Check and fix store inconsistencies
    #[command(display_order = 30)]
    Doctor,

    /// Get or set configuration
    #[command(display_order = 31)]
    Config {
        /// Configuration key (e.g., history-limit)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Initialize the store
    #[command(display_order = 32)]
    Init,

    /// Print help for cardify or a subcommand
    #[command(display_order = 33)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}
