use super::logging;
use super::render::{
    print_messages, render_config, render_full_templates, render_layout, render_template_list,
    render_text_list, render_validations,
};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands,
    CoreCommands, DataCommands, MiscCommands, TemplateCommands,
};
use cardify::api::{CardifyApi, CmdResult, ConfigAction};
use cardify::config::CardifyConfig;
use cardify::edit::{parse_script, EditOp};
use cardify::error::{CardifyError, Result};
use cardify::init::initialize;
use cardify::model::Scope;
use cardify::store::fs::FileStore;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

struct AppContext {
    api: CardifyApi<FileStore>,
    scope: Scope,
    config: CardifyConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(());
    }

    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(cmd) => print_help_for_command(cmd),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Create {
                width,
                height,
                relative,
                name,
            } => handle_create(&mut ctx, name.join(" "), width, height, relative),
            CoreCommands::List { search } => handle_list(&ctx, search),
            CoreCommands::View { selectors } => handle_view(&ctx, selectors),
        },
        Some(Commands::Template(cmd)) => match cmd {
            TemplateCommands::Edit {
                selector,
                script,
                ops,
                dry_run,
            } => handle_edit(&mut ctx, selector, script, ops, dry_run),
            TemplateCommands::Layout { selector } => handle_layout(&ctx, selector),
            TemplateCommands::Rename { selector, name } => {
                handle_rename(&mut ctx, selector, name.join(" "))
            }
            TemplateCommands::Delete { selectors } => handle_delete(&mut ctx, selectors),
            TemplateCommands::Path { selectors } => handle_paths(&ctx, selectors),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Validate { file, selectors } => handle_validate(&ctx, file, selectors),
            DataCommands::Export { output, selectors } => handle_export(&ctx, selectors, output),
            DataCommands::Import { paths } => handle_import(&mut ctx, paths),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Doctor => handle_doctor(&mut ctx),
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Init => handle_init(&ctx),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_list(&ctx, None),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = initialize(&cwd, cli.global)?;

    Ok(AppContext {
        api: ctx.api,
        scope: ctx.scope,
        config: ctx.config,
    })
}

/// Messages go out first; a result carrying errors becomes a failing exit.
fn finish(result: &CmdResult) -> Result<()> {
    print_messages(&result.messages);
    if result.has_errors() {
        return Err(CardifyError::Api("command reported errors".to_string()));
    }
    Ok(())
}

fn handle_create(
    ctx: &mut AppContext,
    name: String,
    width: Option<f64>,
    height: Option<f64>,
    relative: bool,
) -> Result<()> {
    let result = ctx.api.create_template(
        ctx.scope,
        name,
        width.unwrap_or(ctx.config.default_width),
        height.unwrap_or(ctx.config.default_height),
        relative || ctx.config.relative,
    )?;
    finish(&result)
}

fn handle_list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let result = ctx.api.list_templates(ctx.scope, search.as_deref())?;
    print!("{}", render_template_list(&result.listed_templates, true));
    finish(&result)
}

fn handle_view(ctx: &AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.view_templates(ctx.scope, &selectors)?;
    print!("{}", render_full_templates(&result.listed_templates, true));
    finish(&result)
}

fn handle_edit(
    ctx: &mut AppContext,
    selector: String,
    script: Option<PathBuf>,
    inline: Vec<String>,
    dry_run: bool,
) -> Result<()> {
    let mut ops: Vec<EditOp> = match script {
        Some(path) => parse_script(&read_script(&path)?)?,
        None => Vec::new(),
    };
    for (i, raw) in inline.iter().enumerate() {
        let op = serde_json::from_str(raw)
            .map_err(|e| CardifyError::Api(format!("--op #{}: {}", i + 1, e)))?;
        ops.push(op);
    }
    if ops.is_empty() {
        return Err(CardifyError::Api(
            "No edit operations given (use --script or --op)".to_string(),
        ));
    }

    let result = ctx.api.edit_template(
        ctx.scope,
        &selector,
        &ops,
        ctx.config.history_limit,
        dry_run,
    )?;
    finish(&result)
}

fn read_script(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(CardifyError::Io)?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).map_err(CardifyError::Io)
}

fn handle_layout(ctx: &AppContext, selector: String) -> Result<()> {
    let result = ctx.api.layout(ctx.scope, &selector)?;
    print!("{}", render_layout(&result.layout, true));
    finish(&result)
}

fn handle_rename(ctx: &mut AppContext, selector: String, name: String) -> Result<()> {
    let result = ctx.api.rename_template(ctx.scope, &selector, name)?;
    finish(&result)
}

fn handle_delete(ctx: &mut AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.delete_templates(ctx.scope, &selectors)?;
    finish(&result)
}

fn handle_paths(ctx: &AppContext, selectors: Vec<String>) -> Result<()> {
    let result = ctx.api.template_paths(ctx.scope, &selectors)?;
    let lines: Vec<String> = result
        .template_paths
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    print!("{}", render_text_list(&lines, "No template paths found."));
    finish(&result)
}

fn handle_validate(ctx: &AppContext, file: Option<PathBuf>, selectors: Vec<String>) -> Result<()> {
    let result = match file {
        Some(path) => ctx.api.validate_file(&path)?,
        None => ctx.api.validate_templates(ctx.scope, &selectors)?,
    };
    print!("{}", render_validations(&result.validations, true));
    finish(&result)
}

fn handle_export(ctx: &AppContext, selectors: Vec<String>, output: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export_templates(ctx.scope, &selectors, output)?;
    finish(&result)
}

fn handle_import(ctx: &mut AppContext, paths: Vec<PathBuf>) -> Result<()> {
    let result = ctx
        .api
        .import_templates(ctx.scope, paths, &ctx.config.import_extensions)?;
    finish(&result)
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor(ctx.scope)?;
    finish(&result)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(ctx.scope, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    finish(&result)
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init(ctx.scope)?;
    finish(&result)
}
