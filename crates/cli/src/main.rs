//! Vendor Desk CLI - the console's screens from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Pending orders matching "alice", second page
//! vd-cli orders list --search alice --status pending --page 2
//!
//! # Request invoices for two orders
//! vd-cli orders bulk invoice 1001 1002
//!
//! # Create a variation and link it to categories
//! vd-cli attributes create --name Size --group Apparel --values "S, M, L" --category 12
//!
//! # Update the store profile
//! vd-cli profile set --store-name "Pineapple Goods" --email shop@example.com
//! ```
//!
//! # Environment Variables
//!
//! See [`vendor_desk_admin::ConsoleConfig::from_env`]. `RUST_LOG` overrides
//! the default log filter and `VENDOR_DESK_LOG_JSON` switches to JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vendor_desk_admin::{ConsoleConfig, ConsoleError, ConsoleState};
use vendor_desk_core::listing::BulkAction;
use vendor_desk_core::types::{AttributeId, CategoryId, OrderId, StatusTab};

mod commands;

#[derive(Parser)]
#[command(name = "vd-cli")]
#[command(author, version, about = "Vendor Desk console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse orders and request order documents
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage product variations
    Attributes {
        #[command(subcommand)]
        action: AttributesAction,
    },
    /// Show or change the store profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders with tab counts
    List {
        /// Match order id, customer name or email
        #[arg(short, long, default_value = "")]
        search: String,

        /// Earliest order date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest order date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Status tab (`all`, `pending`, `processing`, ...)
        #[arg(long, default_value = "all")]
        status: StatusTab,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Request documents for a set of orders
    Bulk {
        /// `invoice`, `packing-slip` or `shipping-label`
        action: BulkAction,

        #[arg(required = true)]
        ids: Vec<OrderId>,
    },
}

#[derive(Subcommand)]
enum AttributesAction {
    /// List variations
    List,
    /// Create a variation
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        group: String,

        /// Comma-separated values
        #[arg(short, long, default_value = "")]
        values: String,

        /// Category to link (repeatable)
        #[arg(short, long = "category")]
        categories: Vec<CategoryId>,
    },
    /// Delete a variation
    Delete { id: AttributeId },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the store profile
    Show {
        /// Fetch from the backend instead of the local mirror
        #[arg(long)]
        refresh: bool,
    },
    /// Change profile fields
    Set(commands::profile::ProfileChanges),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Errors and warnings become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vendor_desk_admin=info,vd_cli=info".into());

    let json = std::env::var_os("VENDOR_DESK_LOG_JSON").is_some();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        e.report();
        tracing::error!("Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), ConsoleError> {
    let state = ConsoleState::new(config)?;

    match cli.command {
        Commands::Orders { action } => match action {
            OrdersAction::List {
                search,
                from,
                to,
                status,
                page,
            } => {
                let query = commands::orders::ListQuery {
                    search,
                    from,
                    to,
                    tab: status,
                    page,
                };
                commands::orders::list(&state, &query).await?;
            }
            OrdersAction::Bulk { action, ids } => {
                commands::orders::bulk(&state, action, ids).await?;
            }
        },
        Commands::Attributes { action } => match action {
            AttributesAction::List => commands::attributes::list(&state).await?,
            AttributesAction::Create {
                name,
                group,
                values,
                categories,
            } => {
                commands::attributes::create(&state, &name, &group, &values, &categories).await?;
            }
            AttributesAction::Delete { id } => commands::attributes::delete(&state, &id).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Show { refresh } => commands::profile::show(&state, refresh).await?,
            ProfileAction::Set(changes) => commands::profile::set(&state, changes).await?,
        },
    }
    Ok(())
}
