use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use tryon::{
    AppState, Catalog, Command, FsImageStore, PlacementParams, Reply, StorageLayout,
    TryOnService, read_request,
};

#[derive(Parser, Debug)]
#[command(name = "tryon", version)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Root holding `uploads/`, `outputs/` and `products/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Catalog JSON (array of products). Defaults to the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Product width as a fraction of the person width.
    #[arg(long, global = true, default_value_t = tryon::DEFAULT_WIDTH_FRACTION)]
    width_fraction: f64,

    /// Product top edge at person_height / divisor.
    #[arg(long, global = true, default_value_t = tryon::DEFAULT_VERTICAL_DIVISOR)]
    vertical_divisor: u32,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Overlay a product onto one photo and print the JSON reply.
    TryOn(TryOnArgs),
    /// Print the catalog as JSON.
    Products {
        /// Restrict to an audience (unisex products are always listed).
        #[arg(long)]
        gender: Option<String>,
    },
    /// Read JSON commands from stdin, one per line, and answer each on stdout.
    Session,
    /// Run a JSON manifest of try-on requests in parallel.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct TryOnArgs {
    /// Person photo to upload.
    #[arg(long)]
    photo: PathBuf,

    #[arg(long)]
    product_id: u32,

    #[arg(long)]
    gender: String,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON array of `{photo_path, product_id, gender}` objects.
    #[arg(long)]
    manifest: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct BatchEntry {
    photo_path: PathBuf,
    product_id: u32,
    gender: String,
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let app = build_state(&cli.store)?;
    match cli.cmd {
        Cmd::TryOn(args) => cmd_try_on(&app, args),
        Cmd::Products { gender } => {
            let reply = app.respond(Command::ListProducts { gender })?;
            print_json(&reply)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Session => cmd_session(&app),
        Cmd::Batch(args) => cmd_batch(&app, args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_state(args: &StoreArgs) -> anyhow::Result<AppState> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::seeded(),
    };
    let placement = PlacementParams::new(args.width_fraction, args.vertical_divisor)?;
    let store = FsImageStore::open(StorageLayout::under(&args.root))?;
    let service = TryOnService::new(Arc::new(catalog), Arc::new(store)).with_placement(placement);
    Ok(AppState::new(service))
}

fn cmd_try_on(app: &AppState, args: TryOnArgs) -> anyhow::Result<ExitCode> {
    let reply = app.respond(Command::TryOn {
        photo_path: args.photo,
        product_id: args.product_id,
        gender: args.gender,
    })?;
    print_json(&reply)?;
    Ok(if reply.is_error() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_session(app: &AppState) -> anyhow::Result<ExitCode> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read command from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match Command::parse(&line) {
            Ok(cmd) => app.respond(cmd)?,
            Err(e) => Reply::from_error(e)?,
        };
        print_json(&reply)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_batch(app: &AppState, args: BatchArgs) -> anyhow::Result<ExitCode> {
    let f = std::fs::File::open(&args.manifest)
        .with_context(|| format!("open manifest '{}'", args.manifest.display()))?;
    let entries: Vec<BatchEntry> = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse manifest '{}'", args.manifest.display()))?;

    let mut replies = vec![None; entries.len()];
    let mut requests = Vec::with_capacity(entries.len());
    let mut slots = Vec::with_capacity(entries.len());
    for (idx, e) in entries.into_iter().enumerate() {
        match read_request(&e.photo_path, e.product_id, e.gender) {
            Ok(req) => {
                requests.push(req);
                slots.push(idx);
            }
            Err(err) => replies[idx] = Some(Reply::from_error(err)?),
        }
    }

    let results = app.service().try_on_batch(&requests, args.threads)?;
    for (idx, result) in slots.into_iter().zip(results) {
        replies[idx] = Some(match result {
            Ok(resp) => Reply::TryOn(resp),
            Err(err) => Reply::from_error(err)?,
        });
    }

    let replies: Vec<Reply> = replies.into_iter().flatten().collect();
    print_json(&replies)?;
    Ok(if replies.iter().any(Reply::is_error) {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, value).context("serialize reply")?;
    writeln!(out).context("write reply")?;
    Ok(())
}
