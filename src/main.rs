use anyhow::{Context, Result, anyhow, bail};
use chatview_core::config::constants::files::CONFIG_FILE_NAME;
use chatview_core::ui::theme::{available_themes, resolve_theme, theme_label};
use chatview_core::{
    ChatViewConfig, ConfigManager, MarkdownRenderer, SelectionEngine, Theme, colorize_diff,
};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chatview",
    version,
    about = "Render chat markdown to width-bounded ANSI terminal output"
)]
struct Cli {
    /// Path to a chatview.toml; defaults to the one in the current directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Theme id, overrides the configured theme
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a markdown message
    Render {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Target width in columns; 0 disables wrapping
        #[arg(long, short, default_value_t = 80)]
        width: usize,
    },

    /// Colorize a unified diff
    Diff {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },

    /// Render a message and print the text between two cells, as a mouse drag would select it
    Select {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Drag start as COL:LINE
        #[arg(long)]
        from: String,

        /// Drag end as COL:LINE
        #[arg(long)]
        to: String,

        /// Target width in columns
        #[arg(long, short, default_value_t = 80)]
        width: usize,
    },

    /// List available themes
    Themes,

    /// Write a sample configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = CONFIG_FILE_NAME)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    args.color.write_global();
    if !anstyle_query::truecolor() {
        debug!("terminal does not advertise 24-bit color, theme colors may be approximated");
    }

    match &args.command {
        Commands::Render { input, width } => {
            let (theme, config) = load_context(&args)?;
            let renderer = MarkdownRenderer::new(&theme, &config);
            let document = renderer.render(&read_input(input)?, *width);
            emit(&document.to_string())
        }
        Commands::Diff { input } => {
            let (theme, _) = load_context(&args)?;
            emit(&colorize_diff(&read_input(input)?, theme.styles()))
        }
        Commands::Select {
            input,
            from,
            to,
            width,
        } => {
            let (theme, config) = load_context(&args)?;
            select(&theme, &config, input, (from, to), *width)
        }
        Commands::Themes => list_themes(),
        Commands::InitConfig { output } => {
            ChatViewConfig::create_sample_config(output)?;
            println!("Wrote sample configuration to {}", output.display());
            Ok(())
        }
    }
}

fn load_context(args: &Cli) -> Result<(Theme, ChatViewConfig)> {
    let manager = match &args.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load()?,
    };
    if let Some(path) = manager.config_path() {
        debug!(path = %path.display(), "loaded configuration");
    }
    let config = manager.config().clone();
    let theme = match &args.theme {
        Some(id) => Theme::from_id(id)?,
        None => {
            let resolved = resolve_theme(Some(config.ui.theme.clone()));
            if !resolved.eq_ignore_ascii_case(config.ui.theme.trim()) {
                warn!(configured = %config.ui.theme, fallback = %resolved, "unknown theme in configuration");
            }
            Theme::from_id(&resolved)?
        }
    };
    Ok((theme, config))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = anstream::stdout().lock();
    writeln!(stdout, "{text}").context("Failed to write output")?;
    stdout.flush().context("Failed to flush output")
}

fn parse_cell(value: &str) -> Result<(i32, i32)> {
    let (col, line) = value
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected COL:LINE, got '{value}'"))?;
    let col = col
        .trim()
        .parse()
        .with_context(|| format!("Invalid column in '{value}'"))?;
    let line = line
        .trim()
        .parse()
        .with_context(|| format!("Invalid line in '{value}'"))?;
    Ok((col, line))
}

fn select(
    theme: &Theme,
    config: &ChatViewConfig,
    input: &Path,
    (from, to): (&String, &String),
    width: usize,
) -> Result<()> {
    let (start_col, start_line) = parse_cell(from)?;
    let (end_col, end_line) = parse_cell(to)?;

    let renderer = MarkdownRenderer::new(theme, config);
    let document = renderer.render(&read_input(input)?, width);
    let mut engine = SelectionEngine::new(theme, &config.selection);
    engine.set_content(document.lines());

    engine.start_selection(start_col, start_line);
    engine.end_selection(end_col, end_line);
    engine.selection_stop();

    let view_width = u16::try_from(document.max_width().max(1)).unwrap_or(u16::MAX);
    let view_height = u16::try_from(document.len()).unwrap_or(u16::MAX);
    emit(&engine.selection_view(&document.to_string(), view_width, view_height))?;

    let Some(copy) = engine.copy_selected_text() else {
        bail!("Selection is empty");
    };
    eprintln!("--- selected text ---");
    emit(copy.text())
}

fn list_themes() -> Result<()> {
    let mut stdout = anstream::stdout().lock();
    for id in available_themes() {
        let label = theme_label(id).unwrap_or(id);
        let theme = Theme::from_id(id)?;
        let accent = theme.styles().heading(1);
        writeln!(
            stdout,
            "{accent}{id:<18}{accent:#} {label} (syntax: {})",
            theme.syntax_theme()
        )?;
    }
    Ok(())
}
