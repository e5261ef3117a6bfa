use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use bsv_crypto::BlockHasher;
use bsv_service::{BlockService, LoopbackExchange, ServiceError};
use bsv_store::FsBlockStore;
use bsv_types::{Block, Codec, HashCode};

use crate::cli::*;
use crate::config::CliConfig;

type Service = BlockService<FsBlockStore>;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let service = open_service(&cli).await?;
    let format = cli.format;
    match cli.command {
        Command::Put(args) => cmd_put(&service, args, &format).await,
        Command::Get(args) => cmd_get(&service, args, &format).await,
        Command::Rm(args) => cmd_rm(&service, args, &format).await,
        Command::Has(args) => cmd_has(&service, args, &format).await,
        Command::Import(args) => cmd_import(&service, args, &format).await,
    }
}

/// Open the repository and, with `--peer`, attach a loopback exchange over
/// the peer repository.
async fn open_service(cli: &Cli) -> anyhow::Result<Service> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let store = FsBlockStore::open(&cli.repo, config.store.clone())
        .await
        .with_context(|| format!("opening repository {}", cli.repo.display()))?;
    let service = BlockService::with_config(store, config.service);

    if let Some(peer) = &cli.peer {
        let peer_store = FsBlockStore::open(peer, config.store)
            .await
            .with_context(|| format!("opening peer repository {}", peer.display()))?;
        let name = format!("peer:{}", peer.display());
        service.set_exchange(Arc::new(LoopbackExchange::new(name, peer_store)));
    }
    Ok(service)
}

async fn cmd_put(service: &Service, args: PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let block = BlockHasher::new(args.hash).block(args.codec, data);
    service.put(&block).await?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "cid": block.cid().to_string(), "size": block.len() })
        ),
        OutputFormat::Text => println!("{}", block.cid().to_string().yellow()),
    }
    Ok(())
}

async fn cmd_get(service: &Service, args: GetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let block = match service.get(&args.cid).await {
        Ok(block) => block,
        Err(err @ ServiceError::NotFound { .. }) => {
            if let Some(cause) = err.exchange_cause() {
                debug!(%cause, "exchange could not supply block");
            }
            anyhow::bail!("{err}");
        }
        Err(err) => return Err(err.into()),
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, block.data())
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({
                        "cid": args.cid.to_string(),
                        "size": block.len(),
                        "output": path.display().to_string(),
                    })
                ),
                OutputFormat::Text => println!(
                    "{} Wrote {} bytes to {}",
                    "✓".green().bold(),
                    block.len(),
                    path.display().to_string().bold()
                ),
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(block.data())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn cmd_rm(service: &Service, args: CidArgs, format: &OutputFormat) -> anyhow::Result<()> {
    service.delete(&args.cid).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "cid": args.cid.to_string(), "removed": true })),
        OutputFormat::Text => println!("{} Removed {}", "✓".green().bold(), args.cid.short().yellow()),
    }
    Ok(())
}

async fn cmd_has(service: &Service, args: CidArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let present = service.has(&args.cid).await?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "cid": args.cid.to_string(), "present": present })),
        OutputFormat::Text if present => println!("{} {}", "✓".green().bold(), args.cid.short().yellow()),
        OutputFormat::Text => println!("{} {}", "✗".red().bold(), args.cid.short().yellow()),
    }
    Ok(())
}

async fn cmd_import(service: &Service, args: ImportArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let blocks = read_dir_blocks(&args.dir, args.codec, args.hash).await?;
    let (names, blocks): (Vec<PathBuf>, Vec<Block>) = blocks.into_iter().unzip();

    match service.put_many(&blocks).await {
        Ok(stored) => {
            match format {
                OutputFormat::Json => {
                    let entries: Vec<_> = names
                        .iter()
                        .zip(&stored)
                        .map(|(name, cid)| json!({ "file": name.display().to_string(), "cid": cid.to_string() }))
                        .collect();
                    println!("{}", json!({ "stored": entries }));
                }
                OutputFormat::Text => {
                    for (name, cid) in names.iter().zip(&stored) {
                        println!("  {} {}", cid.to_string().yellow(), name.display());
                    }
                    println!("{} Imported {} blocks", "✓".green().bold(), stored.len());
                }
            }
            Ok(())
        }
        Err(ServiceError::Batch { stored, failed }) => {
            for failure in &failed {
                let name = names.get(failure.index).map(|n| n.display().to_string()).unwrap_or_default();
                eprintln!("  {} {} {}", "failed:".red(), name, failure.error);
            }
            anyhow::bail!("imported {} of {} blocks", stored.len(), blocks.len())
        }
        Err(err) => Err(err.into()),
    }
}

/// Every regular file directly under `dir`, sorted by name, as a block.
async fn read_dir_blocks(dir: &Path, codec: Codec, hash: HashCode) -> anyhow::Result<Vec<(PathBuf, Block)>> {
    let hasher = BlockHasher::new(hash);
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut blocks = Vec::with_capacity(files.len());
    for path in files {
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        if data.is_empty() {
            debug!(path = %path.display(), "skipping empty file");
            continue;
        }
        let name = path.file_name().map(PathBuf::from).unwrap_or_else(|| path.clone());
        blocks.push((name, hasher.block(codec, data)));
    }
    Ok(blocks)
}
