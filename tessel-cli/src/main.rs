//! Tessel CLI - stylesheet parsing and cascade debugging tool
//!
//! Parses a stylesheet, reports its errors and rule sets, and resolves the
//! declarations that apply to one synthetic element.

mod report;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tessel_common::logging::init_logging;
use tessel_css::stylesheet::Orientation;
use tessel_css::{Origin, StyleConfig, StyleResolver, StylesheetRegistry};
use tessel_dom::{ElementData, NodeId, StyleTree};
use tracing::debug;

/// Tessel - inspect how a stylesheet parses and cascades
#[derive(Parser, Debug)]
#[command(name = "tessel")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show parse errors and rule sets
    tessel theme.css

    # Resolve the styles of a Label with id "title"
    tessel theme.css --element Label --id title

    # Resolve a pressed Button and parse its color
    tessel theme.css --element Button --state pressed --value color=color

    # Dump everything as JSON
    tessel theme.css --element Label --class primary --json
"#)]
struct Cli {
    /// Stylesheet file to load
    #[arg(value_name = "STYLESHEET")]
    path: PathBuf,

    /// Origin to install the stylesheet under
    #[arg(long, value_enum, default_value = "application")]
    origin: OriginArg,

    /// Print the lexemes of the stylesheet
    #[arg(short = 'l', long)]
    lexemes: bool,

    /// Print a JSON report instead of text
    #[arg(short = 'j', long)]
    json: bool,

    /// Element name to resolve styles for
    #[arg(short = 'e', long, value_name = "NAME")]
    element: Option<String>,

    /// Name of the element's parent
    #[arg(long, value_name = "NAME")]
    parent: Option<String>,

    /// Style id of the element
    #[arg(long, value_name = "ID")]
    id: Option<String>,

    /// Style class of the element (repeatable)
    #[arg(short = 'c', long = "class", value_name = "CLASS")]
    classes: Vec<String>,

    /// Pseudo-class state to resolve in
    #[arg(short = 's', long, value_name = "STATE")]
    state: Option<String>,

    /// Pseudo-element to resolve
    #[arg(long, value_name = "NAME")]
    pseudo_element: Option<String>,

    /// Parse a resolved property with a named value parser (repeatable)
    #[arg(short = 'v', long = "value", value_name = "PROPERTY=PARSER")]
    values: Vec<String>,

    /// Media type to evaluate `@media` queries against
    #[arg(long, value_name = "TYPE")]
    media_type: Option<String>,

    /// Evaluate `@media` queries in landscape orientation
    #[arg(long)]
    landscape: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep running and report again whenever the stylesheet changes.
    /// Also enabled by `watch-files` in the configuration.
    #[cfg(feature = "watch")]
    #[arg(short = 'w', long)]
    watch: bool,

    /// Log filter, e.g. `debug` or `tessel_css=trace`
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OriginArg {
    Application,
    User,
    View,
}

impl From<OriginArg> for Origin {
    fn from(origin: OriginArg) -> Self {
        match origin {
            OriginArg::Application => Self::Application,
            OriginArg::User => Self::User,
            OriginArg::View => Self::View,
        }
    }
}

impl Cli {
    fn style_config(&self) -> Result<StyleConfig> {
        let mut config = match &self.config {
            Some(path) => StyleConfig::from_json_file(path)
                .with_context(|| format!("reading configuration '{}'", path.display()))?,
            None => StyleConfig::default(),
        };
        if let Some(media_type) = &self.media_type {
            config.media.media_type.clone_from(media_type);
        }
        if self.landscape {
            config.media.orientation = Orientation::Landscape;
        }
        Ok(config)
    }

    /// Parsed `PROPERTY=PARSER` requests. A bare property uses the parser of
    /// the same name.
    fn value_requests(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|request| match request.split_once('=') {
                Some((property, parser)) => (property.trim().to_string(), parser.trim().to_string()),
                None => (request.trim().to_string(), request.trim().to_string()),
            })
            .collect()
    }

    /// A tree holding the requested element, below its parent if one was
    /// named.
    fn element_tree(&self, name: &str) -> (StyleTree, NodeId) {
        let mut data = ElementData::new(name).with_classes(&self.classes.join(" "));
        if let Some(id) = &self.id {
            data = data.with_id(id);
        }
        if let Some(pseudo_element) = &self.pseudo_element {
            data = data.with_pseudo_elements(pseudo_element);
        }
        let mut tree = StyleTree::new();
        let node = match &self.parent {
            Some(parent) => {
                let parent = tree.alloc(ElementData::new(parent));
                tree.add_child(parent, data)
            }
            None => tree.alloc(data),
        };
        (tree, node)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let config = cli.style_config()?;
    let registry = Arc::new(
        StylesheetRegistry::new().with_error_destination(config.parse_error_destination),
    );
    let _ = registry
        .load_file(&cli.path, cli.origin.into())
        .with_context(|| format!("loading '{}'", cli.path.display()))?;
    debug!(path = %cli.path.display(), "stylesheet loaded");

    let resolver = StyleResolver::new(Arc::clone(&registry), config);
    run(&cli, &resolver)?;

    #[cfg(feature = "watch")]
    if cli.watch || resolver.configuration().watch_files {
        watch(&cli, &resolver)?;
    }
    Ok(())
}

/// Print one report for the current registry contents.
fn run(cli: &Cli, resolver: &StyleResolver) -> Result<()> {
    let origin = cli.origin.into();
    let Some(sheet) = resolver.registry().stylesheet(origin) else {
        anyhow::bail!("no stylesheet installed for {origin}");
    };

    let lexemes = if cli.lexemes {
        let source = fs::read_to_string(&cli.path)
            .with_context(|| format!("reading '{}'", cli.path.display()))?;
        Some(report::lex(&source))
    } else {
        None
    };

    let resolved = cli.element.as_deref().map(|name| {
        let (tree, node) = cli.element_tree(name);
        let node = tree.node(node);
        let merged = match &cli.pseudo_element {
            Some(element) => resolver.resolve_pseudo_element(&node, cli.state.as_deref(), element),
            None => resolver.resolve(&node, cli.state.as_deref()),
        };
        (name.to_string(), merged)
    });

    let report = report::Report {
        path: &cli.path,
        sheet: &sheet,
        lexemes: lexemes.as_deref(),
        resolved: resolved.as_ref().map(|(name, merged)| (name.as_str(), merged.as_ref())),
        values: cli.value_requests(),
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        report.print();
    }
    Ok(())
}

#[cfg(feature = "watch")]
fn watch(cli: &Cli, resolver: &StyleResolver) -> Result<()> {
    use std::time::Duration;

    use owo_colors::OwoColorize;
    use tessel_css::StylesheetWatcher;

    let mut watcher = StylesheetWatcher::new(Arc::clone(resolver.registry()))
        .context("starting the stylesheet watcher")?;
    eprintln!(
        "{}",
        format!("watching {} file(s), press Ctrl-C to stop", watcher.watched_paths().len()).dimmed()
    );
    loop {
        if watcher.wait(Duration::from_millis(500)) > 0 {
            println!();
            run(cli, resolver)?;
        }
    }
}
