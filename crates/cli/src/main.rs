//! `bookstall`: build, export and browse the storefront catalog.

use bookstall_catalog::{
    CatalogReader, CategoryFilter, HydrateOptions, IndexEvent, IndexOptions, clamp_page, filter, hydrate, index_stream,
    page_count, page_slice, write_catalog,
};
use bookstall_config::{Config, StoreBackend};
use bookstall_storage::backend::LocalBackend;
#[cfg(feature = "s3")]
use bookstall_storage::backend::S3Backend;
use bookstall_storage::{EntryId, StoreHandle};
use clap::{Parser, Subcommand};
use futures::TryStreamExt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookstall", version, about = "Ebook storefront catalog tools")]
struct Cli {
    /// Path to a TOML configuration file (defaults to the platform config
    /// directory; environment variables override both)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index the configured store and print (or export) the catalog
    Index {
        /// Write the result as a paginated catalog into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Read a precomputed catalog and print one page
    List {
        /// Catalog directory (defaults to `catalog.catalog_dir`)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Category to show; "all" disables category filtering
        #[arg(long, default_value = "all")]
        category: String,
        /// Case-insensitive search over title and description
        #[arg(long, default_value = "")]
        search: String,
        /// 1-based page number (clamped into range)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

/// Flatten structured errors into something `main` can print. The `Debug`
/// rendering of an `exn` tree includes every frame and location.
trait OrBail<T> {
    fn or_bail(self) -> Result<T, String>;
}
impl<T, K: std::fmt::Debug + std::error::Error + Send + Sync + 'static> OrBail<T> for Result<T, exn::Exn<K>> {
    fn or_bail(self) -> Result<T, String> {
        self.map_err(|error| format!("{error:?}"))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = Config::load(cli.config.as_deref()).or_bail()?;
    match cli.command {
        Command::Index { export } => cmd_index(&config, export).await,
        Command::List {
            dir,
            category,
            search,
            page,
        } => cmd_list(&config, dir, &category, &search, page).await,
    }
}

fn build_store(config: &Config) -> Result<StoreHandle, String> {
    match &config.store.backend {
        StoreBackend::Local { root } => Ok(Arc::new(LocalBackend::new("local", root).or_bail()?)),
        #[cfg(feature = "s3")]
        StoreBackend::S3 {
            bucket,
            region,
            prefix,
            endpoint,
            key_id,
            key_secret,
        } => Ok(Arc::new(
            S3Backend::new(
                "s3",
                bucket,
                prefix.clone(),
                region,
                endpoint.clone(),
                key_id.clone().unwrap_or_default(),
                key_secret.clone().unwrap_or_default(),
            )
            .or_bail()?,
        )),
        #[cfg(not(feature = "s3"))]
        StoreBackend::S3 { .. } => Err("this build has no S3 support; rebuild with `--features s3`".to_string()),
    }
}

async fn cmd_index(config: &Config, export: Option<PathBuf>) -> Result<(), String> {
    let store = build_store(config)?;
    let options = IndexOptions {
        document_suffix: config.catalog.document_suffix.clone(),
    };
    let root = EntryId::from(config.store.root_folder.as_str());

    let events = index_stream(store.as_ref(), root, &options);
    futures::pin_mut!(events);
    let mut result = None;
    while let Some(event) = events.try_next().await.or_bail()? {
        match event {
            IndexEvent::Started => tracing::info!(store = store.name(), "indexing started"),
            IndexEvent::FolderVisited { folder, books } if books > 0 => {
                tracing::info!(folder = %folder, books, "indexed folder");
            },
            IndexEvent::FolderVisited { .. } => {},
            IndexEvent::Complete(index) => result = Some(index),
        }
    }
    let index = result.ok_or_else(|| "indexing ended without a result".to_string())?;

    let records = hydrate(
        store.as_ref(),
        &index,
        &HydrateOptions {
            price_minor: config.catalog.price_minor,
            category: config.catalog.category.clone(),
            ..HydrateOptions::default()
        },
    )
    .await;

    match export {
        Some(dir) => {
            let manifest = write_catalog(&dir, &records, config.catalog.page_size).await.or_bail()?;
            println!("wrote {} books across {} pages to {}", manifest.total_books, manifest.total_pages, dir.display());
        },
        None => {
            for record in &records {
                let cover = if record.cover.is_some() { "cover" } else { "no cover" };
                println!("{:<44} {:>10}  [{}]", record.title, format_price(record.price_minor, &config.checkout.currency), cover);
            }
            println!("{} books indexed", records.len());
        },
    }
    Ok(())
}

async fn cmd_list(config: &Config, dir: Option<PathBuf>, category: &str, search: &str, page: usize) -> Result<(), String> {
    let dir = dir
        .or_else(|| config.catalog.catalog_dir.clone())
        .ok_or_else(|| "no catalog directory: pass --dir or set catalog.catalog_dir".to_string())?;
    let reader = CatalogReader::new(dir);
    let records = reader.all().await.or_bail()?;

    let category = CategoryFilter::parse(category);
    let hits = filter(&records, &category, search);
    let page_size = config.catalog.page_size;
    let current = clamp_page(page, hits.len(), page_size);
    for record in page_slice(&hits, current, page_size) {
        println!(
            "{:<44} {:>10}  {}",
            record.title,
            format_price(record.price_minor, &config.checkout.currency),
            record.category
        );
    }
    println!("page {current}/{}, {} matching books", page_count(hits.len(), page_size), hits.len());
    Ok(())
}

fn format_price(minor: u64, currency: &str) -> String {
    format!("{}.{:02} {}", minor / 100, minor % 100, currency)
}
