//! # Rusty-Board Binary
//!
//! The entry point that assembles the board based on compile-time features
//! and drives it from the terminal: each line is one user action, and every
//! rendered view is written to the configured output file.

mod commands;
mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rb_api::{navigate, open_catalog_item, submit_reply, submit_thread, Board, Page, Submission, View};
use rb_core::error::AppError;
use rb_core::models::ImageUpload;
use rb_core::store::PostStore;
use rb_core::traits::KeyValueStore;
use rb_storage_local::SessionImageStore;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{Command, HELP};
use crate::config::Config;

// Feature-gated imports: This is the "Compiled-to-Order" magic
#[cfg(feature = "db-sqlite")]
use rb_db_sqlite::SqliteKvStore;

#[cfg(all(feature = "storage-local", not(feature = "db-sqlite")))]
use rb_storage_local::LocalKvStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let kv = open_kv_store(&config).await?;
    let store = PostStore::with_key(kv, config.storage_key.clone());
    let mut board = Board::open(store, Arc::new(SessionImageStore::new())).await;

    log::info!("🚀 Rusty-Board ready, pages are written to {}", config.output.display());
    println!("{HELP}");

    let page = board.show_view(View::Threads, None).await?;
    publish(&config, &page).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        match run(&mut board, command).await {
            Ok(Some(page)) => publish(&config, &page).await?,
            Ok(None) => {}
            // The notice is the whole message the user needs.
            Err(AppError::ValidationError(notice)) => eprintln!("{notice}"),
            Err(err) => eprintln!("error: {err}"),
        }
    }

    board.close();
    Ok(())
}

/// Applies one command. Returns the page to publish, if anything on it changed.
async fn run(board: &mut Board, command: Command) -> rb_core::Result<Option<Page>> {
    match command {
        Command::Thread { text, image } => {
            let submission = Submission { text, image: read_image(image.as_deref()).await? };
            let id = submit_thread(board, submission).await?;
            println!("thread {id} created");
            board.refresh().await.map(Some)
        }
        Command::Reply { thread_id, text, image } => {
            let submission = Submission { text, image: read_image(image.as_deref()).await? };
            let id = submit_reply(board, &thread_id, submission).await?;
            println!("reply {id} added to {thread_id}");
            board.render(board.current_view(), None).map(Some)
        }
        Command::Threads => navigate(board, View::Threads).await.map(Some),
        Command::Catalog => navigate(board, View::Catalog).await.map(Some),
        Command::Open(id) => open_catalog_item(board, &id).await.map(Some),
        Command::List => {
            for thread in board.threads().iter().rev() {
                println!(
                    "{}  [{} views, {} replies]  {}",
                    thread.id,
                    thread.views,
                    thread.replies.len(),
                    rb_core::format_timestamp(&thread.timestamp)
                );
            }
            Ok(None)
        }
        Command::Help => {
            println!("{HELP}");
            Ok(None)
        }
        Command::Quit => Ok(None),
    }
}

async fn read_image(path: Option<&Path>) -> rb_core::Result<Option<ImageUpload>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading image {}", path.display()))?;

    Ok(Some(ImageUpload {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        content_type: mime_guess::from_path(path).first_or_octet_stream().to_string(),
        bytes,
    }))
}

async fn publish(config: &Config, page: &Page) -> anyhow::Result<()> {
    if let Some(parent) = config.output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&config.output, &page.html)
        .await
        .with_context(|| format!("writing {}", config.output.display()))?;
    println!("{:?} view written to {}", page.view, config.output.display());
    Ok(())
}

#[cfg(feature = "db-sqlite")]
async fn open_kv_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let kv = SqliteKvStore::new(&config.database_url)
        .await
        .context("Failed to init SQLite")?;
    Ok(Arc::new(kv))
}

#[cfg(all(feature = "storage-local", not(feature = "db-sqlite")))]
async fn open_kv_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(LocalKvStore::new(config.data_dir.clone())))
}

#[cfg(not(any(feature = "storage-local", feature = "db-sqlite")))]
async fn open_kv_store(_config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    log::warn!("no storage backend compiled in, posts last for this session only");
    Ok(Arc::new(rb_core::MemoryKvStore::new()))
}
