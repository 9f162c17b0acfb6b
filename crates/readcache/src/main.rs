use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use readcache::cache::{locate, CachedRepository};
use readcache::config::{Config, LogFormat, StorageBackend};
use readcache::domain::todo::{events::TODO_LIST, setup_domain, TodoCommand, TodoList};
use readcache::eventing::{InMemoryEventBus, InMemoryEventStore};
use readcache::storage::{DocumentRepository, InMemoryRepository, InstrumentedRepository};
use readcache_core::aggregate::Command;
use readcache_core::context::{namespace_of, Context};
use readcache_core::event::{EventBus, EventMatcher};
use readcache_core::storage::ReadWriteRepository;

/// readcache - Event-invalidated caching for CQRS read models
#[derive(Parser, Debug)]
#[command(name = "readcache")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Read-model backend (overrides READCACHE_STORAGE)
    #[arg(long, value_enum, global = true)]
    storage: Option<StorageBackend>,

    /// Read straight from the backend (overrides READCACHE_CACHE_ENABLED)
    #[arg(long, global = true)]
    no_cache: bool,

    /// Namespace to run in (overrides READCACHE_NAMESPACE)
    #[arg(long, short, global = true)]
    namespace: Option<String>,

    /// Log output format (overrides READCACHE_LOG_FORMAT)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted todo list scenario and print the read model
    Demo {
        /// Reads of the read model after every command
        #[arg(long, short, default_value = "3")]
        reads: usize,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if self.no_cache {
            config.cache_enabled = false;
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(log_format) = self.log_format {
            config.log_format = log_format;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    init_tracing(config.log_format);

    match cli.command {
        Commands::Demo { reads } => run_demo(&config, reads).await,
    }
}

/// Logs go to stderr so stdout only carries the demo report.
fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "readcache=debug".into()),
    );

    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run_demo(config: &Config, reads: usize) -> Result<()> {
    let ctx = Context::new().with_namespace(config.namespace.as_str());
    let event_store = Arc::new(InMemoryEventStore::new());
    let event_bus = Arc::new(InMemoryEventBus::new());

    let name = config.storage.as_str();
    let backend = match config.storage {
        StorageBackend::Memory => {
            let base = Arc::new(InMemoryRepository::<TodoList>::new());
            InstrumentedRepository::<TodoList>::new(name, base)
        }
        StorageBackend::Document => {
            let base = Arc::new(DocumentRepository::<TodoList>::new());
            InstrumentedRepository::<TodoList>::new(name, base)
        }
    };
    let backend = Arc::new(backend);

    let repo: Arc<dyn ReadWriteRepository<TodoList>> = if config.cache_enabled {
        let cached = Arc::new(CachedRepository::<TodoList>::new(backend.clone()));
        event_bus
            .add_handler(
                &ctx,
                EventMatcher::Aggregates(vec![TODO_LIST]),
                cached.clone(),
            )
            .await?;
        cached
    } else {
        backend.clone()
    };

    let commands = setup_domain(&ctx, event_store, event_bus.clone(), repo.clone()).await?;

    tracing::info!(
        namespace = %namespace_of(&ctx),
        storage = name,
        cache_enabled = config.cache_enabled,
        "Running todo list demo"
    );

    let id = Uuid::new_v4();
    for command in script(id) {
        tracing::info!(command = command.command_type(), "Handling command");
        commands.handle_command(&ctx, command).await?;

        for _ in 0..reads {
            repo.find(&ctx, id).await?;
        }
    }

    let todo_list = repo.find(&ctx, id).await?;
    let cached_entries = match locate::<TodoList>(repo.as_ref()) {
        Some(cache) => Some(cache.cache().len(&namespace_of(&ctx)).await),
        None => None,
    };

    let report = serde_json::json!({
        "namespace": namespace_of(&ctx),
        "storage": name,
        "cache_enabled": config.cache_enabled,
        "todo_list": todo_list,
        "underlying_calls": backend.calls(),
        "cached_entries": cached_entries,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn script(id: Uuid) -> Vec<TodoCommand> {
    vec![
        TodoCommand::Create { id },
        TodoCommand::AddItem {
            id,
            description: "Buy milk".to_string(),
        },
        TodoCommand::AddItem {
            id,
            description: "Buy eggs".to_string(),
        },
        TodoCommand::AddItem {
            id,
            description: "Bake bread".to_string(),
        },
        TodoCommand::CheckItem {
            id,
            item_id: 0,
            checked: true,
        },
        TodoCommand::SetItemDescription {
            id,
            item_id: 1,
            description: "Buy free-range eggs".to_string(),
        },
        TodoCommand::RemoveCompleted { id },
    ]
}
