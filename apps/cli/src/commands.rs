//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use kaicanvas_core::{
    RouteClient, RoutePath, RouteResponse, render_component, render_rich_text_parameter,
};
use kaicanvas_enhancers::{EnhancementContext, EnhancementReport, EnhancerRegistry, enhance};
use kaicanvas_richtext::{RichTextDocument, RichTextRenderer};
use kaicanvas_shared::{AppConfig, ComponentInstance, init_config, load_config};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// KaiCanvas: render CMS rich text and enhance compositions.
#[derive(Parser)]
#[command(
    name = "kaicanvas",
    version,
    about = "Render Kontent.ai rich text to HTML and enhance Canvas compositions.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render a rich-text document (JSON) to HTML.
    Render {
        /// Path to the JSON file.
        file: PathBuf,

        /// Treat the file as a component and render this parameter of it.
        #[arg(long, conflicts_with = "component")]
        component_parameter: Option<String>,

        /// Treat the file as a component and render it by its type.
        #[arg(long)]
        component: bool,

        /// Maximum nesting depth (overrides config).
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Run the enhancement pass over a composition (JSON) and print it.
    Enhance {
        /// Path to the composition JSON file.
        file: PathBuf,

        /// Enhance as a preview request.
        #[arg(long)]
        preview: bool,
    },

    /// Fetch and enhance a route from the route API.
    Route {
        /// Route path, e.g. `about/team`.
        path: Option<String>,

        /// Locale prefix (defaults to the configured default locale).
        #[arg(short, long)]
        locale: Option<String>,

        /// Project ID (overrides config).
        #[arg(long, env = "KAICANVAS_PROJECT_ID")]
        project_id: Option<String>,

        /// Route API base URL (overrides config).
        #[arg(long, env = "KAICANVAS_API_BASE_URL")]
        api_base_url: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "kaicanvas=info",
        1 => "kaicanvas=debug",
        _ => "kaicanvas=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // stdout carries rendered output, so logs go to stderr
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            file,
            component_parameter,
            component,
            max_depth,
        } => cmd_render(&file, component_parameter.as_deref(), component, max_depth),
        Command::Enhance { file, preview } => cmd_enhance(&file, preview),
        Command::Route {
            path,
            locale,
            project_id,
            api_base_url,
        } => cmd_route(path, locale.as_deref(), project_id, api_base_url).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_render(
    file: &Path,
    component_parameter: Option<&str>,
    component: bool,
    max_depth: Option<usize>,
) -> Result<()> {
    let config = load_config()?;
    let mut renderer = RichTextRenderer::from_config(&config.render);
    if let Some(depth) = max_depth {
        renderer = renderer.max_depth(depth);
    }

    let html = match component_parameter {
        Some(parameter) => {
            let component: ComponentInstance = read_json(file)?;
            info!(component = %component.component_type, parameter, "rendering component rich text");
            render_rich_text_parameter(&component, parameter, &renderer)
        }
        None if component => {
            let component: ComponentInstance = read_json(file)?;
            info!(component = %component.component_type, "rendering component");
            render_component(&component, &renderer).ok_or_else(|| {
                eyre!(
                    "component type '{}' has nothing to render",
                    component.component_type
                )
            })?
        }
        None => {
            let document: RichTextDocument = read_json(file)?;
            info!(file = %file.display(), "rendering rich text document");
            renderer.render(&document)
        }
    };

    println!("{html}");
    Ok(())
}

fn cmd_enhance(file: &Path, preview: bool) -> Result<()> {
    let config = load_config()?;
    let registry = EnhancerRegistry::from_config(&config.enhancers);
    let mut composition: ComponentInstance = read_json(file)?;

    info!(
        file = %file.display(),
        components = composition.component_count(),
        enhancers = ?registry.parameter_names(),
        "enhancing composition"
    );
    let report = enhance(&mut composition, &registry, &EnhancementContext { preview });

    println!("{}", serde_json::to_string_pretty(&composition)?);
    print_report(&report);
    Ok(())
}

async fn cmd_route(
    path: Option<String>,
    locale: Option<&str>,
    project_id: Option<String>,
    api_base_url: Option<String>,
) -> Result<()> {
    let mut config = load_config()?;
    if let Some(project_id) = project_id {
        config.route.project_id = project_id;
    }
    if let Some(api_base_url) = api_base_url {
        config.route.api_base_url = api_base_url;
    }
    if config.route.project_id.is_empty() {
        return Err(eyre!(
            "no project ID configured. Set [route].project_id, KAICANVAS_PROJECT_ID, or pass --project-id"
        ));
    }

    let registry = EnhancerRegistry::from_config(&config.enhancers);
    let client = RouteClient::new(&config.route, registry)?;
    let retrieved = client
        .retrieve_route(path.as_deref().map(RoutePath::from), locale)
        .await?;

    match &retrieved.route {
        RouteResponse::NotFound => eprintln!("  Route not found"),
        RouteResponse::Redirect { .. } => eprintln!("  Route redirects"),
        RouteResponse::Composition { .. } => {}
    }
    println!("{}", serde_json::to_string_pretty(&retrieved.route)?);
    if let Some(report) = &retrieved.enhancement {
        print_report(report);
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_json<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T> {
    let content = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("cannot read '{}'", file.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("invalid JSON in '{}'", file.display()))
}

/// Enhancement summary on stderr, keeping stdout parseable.
fn print_report(report: &EnhancementReport) {
    eprintln!();
    eprintln!("  Components: {}", report.components_visited);
    eprintln!("  Enhanced:   {}", report.applied);
    eprintln!("  Failed:     {}", report.failures.len());
    for failure in &report.failures {
        eprintln!(
            "    {} ({}) `{}`: {}",
            failure.component_type,
            failure.component_id.as_deref().unwrap_or("-"),
            failure.parameter,
            failure.error
        );
    }
}
