use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, AuthOrchestrator, CollaboratorError, FileCatalog, HttpCollaborator,
    PageEffect, SelectedFile, UploadOrchestrator, UploadPhase, UploadRequest,
};
use shared::protocol::FileSearchQuery;
use tracing_subscriber::EnvFilter;
use url::Url;

mod render;

#[derive(Parser, Debug)]
#[command(name = "juststore", about = "Store files as videos on your YouTube account")]
struct Cli {
    /// Settings file; defaults to ./juststore.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the YouTube connection, optionally consuming an OAuth callback address.
    Status {
        #[arg(long)]
        page_url: Option<Url>,
    },
    /// Print the address that connects a YouTube account.
    Login,
    /// Disconnect the YouTube account.
    Logout,
    /// Upload a file; giving a secret key encrypts it before storage.
    Upload {
        path: PathBuf,
        #[arg(long)]
        encrypt: bool,
        #[arg(long)]
        secret_key: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List stored files, or search them when a filter is given.
    Files {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    let backend = Arc::new(HttpCollaborator::new(&settings)?);
    tracing::debug!(api_url = backend.api_url(), "using storage service");
    let auth = AuthOrchestrator::new(backend.clone());
    let home = Url::parse(&settings.frontend_url)
        .with_context(|| format!("invalid frontend url '{}'", settings.frontend_url))?;

    match cli.command {
        Command::Status { page_url } => {
            let page = page_url.unwrap_or(home);
            if let Some(PageEffect::ReplaceAddress(address)) = auth.initialize(&page).await {
                println!("Address: {address}");
            }
            println!("{}", render::session_line(&auth.state()));
        }
        Command::Login => match auth.login().await {
            Ok(PageEffect::Navigate(auth_url)) => {
                println!("Open this address to connect YouTube:\n{auth_url}");
            }
            Ok(other) => bail!("unexpected page effect from login: {other:?}"),
            Err(err) => return Err(explain(err)),
        },
        Command::Logout => {
            auth.initialize(&home).await;
            if auth.state().is_authenticated() {
                auth.logout().await;
            }
            let state = auth.state();
            println!("{}", render::session_line(&state));
            if let Some(error) = state.error() {
                bail!("{error}");
            }
        }
        Command::Upload {
            path,
            encrypt,
            secret_key,
            tags,
        } => {
            auth.initialize(&home).await;
            let file = read_selected_file(&path).await?;
            println!("{}", render::file_line(&file));

            let uploads = UploadOrchestrator::new(backend.clone());
            uploads.select_file()?;
            tokio::spawn(render::follow_uploads(uploads.subscribe()));

            let request = upload_request(file, encrypt, secret_key, tags);
            let state = uploads.submit(&request, auth.status()).await?;
            match state.phase() {
                UploadPhase::Succeeded => {
                    println!("Upload successful. Your file has been converted to video.");
                    if let Some(result_path) = state.result_path() {
                        println!("Storage path: {result_path}");
                    }
                }
                _ => bail!(
                    "Error: {}",
                    state.error().unwrap_or("upload did not complete")
                ),
            }
        }
        Command::Files {
            name,
            tag,
            from,
            to,
        } => {
            let query = FileSearchQuery {
                file_name: name,
                tag,
                start_date: from,
                end_date: to,
            };
            let files = if query.is_empty() {
                backend.list_files().await.map_err(explain)?
            } else {
                backend.search_files(&query).await.map_err(explain)?
            };
            if files.is_empty() {
                println!("No files found.");
            }
            for file in &files {
                println!("{}", render::file_summary_line(file));
            }
        }
    }

    Ok(())
}

async fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("'{}' does not name a file", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let file = SelectedFile::new(name, bytes);
    Ok(match mime_guess::from_path(path).first_raw() {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}

/// A secret key implies encryption; `--encrypt` alone still demands one.
fn upload_request(
    file: SelectedFile,
    encrypt: bool,
    secret_key: Option<String>,
    tags: Vec<String>,
) -> UploadRequest {
    UploadRequest {
        file: Some(file),
        encrypt: encrypt || secret_key.is_some(),
        secret_key,
        tags,
    }
}

fn explain(err: CollaboratorError) -> anyhow::Error {
    tracing::debug!(operation = %err.operation(), error = %err, "storage service call failed");
    if err.requires_reauth() {
        anyhow!("{err}\nRun `juststore login` to connect YouTube.")
    } else {
        anyhow::Error::new(err)
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
