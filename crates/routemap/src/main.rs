//! routemap CLI
//!
//! Command-line tool for inspecting route files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use routemap::{RouteListing, Router, RouterError};

/// Inspect and test route definition files.
#[derive(Parser)]
#[command(name = "routemap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding an array of route maps.
    #[arg(short, long, env = "ROUTEMAP_ROUTES", default_value = "routes.json")]
    routes: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered routes.
    #[command(name = "debug:router")]
    DebugRouter {
        /// Show the controller of each route.
        #[arg(long)]
        show_controllers: bool,
    },

    /// Resolve a path against the routes.
    Match {
        /// The request path.
        path: String,

        /// The HTTP method.
        #[arg(short, long, default_value = "GET")]
        method: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router: Router<Value> = Router::load_route_file(&cli.routes)?;
    debug!(routes = router.len(), file = %cli.routes.display(), "loaded routes");

    match cli.command {
        Commands::DebugRouter { show_controllers } => {
            let listing = RouteListing::new(&router);
            if show_controllers {
                print!("{}", listing.show_handlers(describe_handler));
            } else {
                print!("{listing}");
            }
        }

        Commands::Match { path, method } => match router.parse_route(&path, &method) {
            Ok(resolved) => {
                println!("Controller: {}", describe_handler(&resolved.handler));
                if resolved.variables.is_empty() {
                    println!("Variables:  (none)");
                } else {
                    println!("Variables:");
                    for (name, value) in resolved.variables.iter() {
                        println!("  {name} = {value}");
                    }
                }
            }
            Err(err @ RouterError::MethodNotAllowed { .. }) => {
                let allowed = err
                    .allowed_methods()
                    .unwrap_or_default()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("Allowed methods: {allowed}");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        },
    }

    Ok(())
}

/// Renders a handler without assuming its shape: strings print bare,
/// anything else as compact JSON.
fn describe_handler(handler: &Value) -> String {
    match handler {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}
