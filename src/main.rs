//! Command-line front-end for the image store.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use imgstore::imaging::{ImageBackend, JpegBackend};
use imgstore::layout::{Resolution, STORE_TAG};
use imgstore::store::gc::gc;
use imgstore::store::ImageStore;

const DEFAULT_MAX_FILES: u32 = 10;
const DEFAULT_THUMB: [u16; 2] = [64, 64];
const DEFAULT_SMALL: [u16; 2] = [256, 256];

#[derive(Parser)]
#[command(name = "imgstore", about = "Single-file content-addressed JPEG store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the subcommand summary.
    Help,
    /// List the header and every image in a store.
    List { store: PathBuf },
    /// Create a new, empty store.
    Create {
        store: PathBuf,
        #[arg(long = "max-files", default_value_t = DEFAULT_MAX_FILES)]
        max_files: u32,
        #[arg(long = "thumb-res", num_args = 2, value_names = ["W", "H"])]
        thumb_res: Option<Vec<u16>>,
        #[arg(long = "small-res", num_args = 2, value_names = ["W", "H"])]
        small_res: Option<Vec<u16>>,
    },
    /// Read an image out of a store, writing `<img_id>_<suffix>.jpg`.
    Read {
        store: PathBuf,
        img_id: String,
        #[arg(default_value = "orig")]
        resolution: String,
    },
    /// Insert a JPEG file into a store under the given id.
    Insert {
        store: PathBuf,
        img_id: String,
        file: PathBuf,
    },
    /// Delete an image from a store.
    Delete { store: PathBuf, img_id: String },
    /// Compact a store into a fresh file and swap it in.
    Gc { store: PathBuf, tmp_store: PathBuf },
    /// Serve a store over HTTP.
    Serve {
        store: PathBuf,
        #[arg(long, default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
        #[arg(long = "doc-root", default_value = ".")]
        doc_root: PathBuf,
    },
}

fn backend() -> Arc<dyn ImageBackend> {
    Arc::new(JpegBackend)
}

fn run(command: Command) -> imgstore::error::Result<()> {
    match command {
        Command::Help => {
            println!("{}", help_text());
            Ok(())
        }
        Command::List { store } => {
            let store = ImageStore::open(&store, backend())?;
            print!("{}", store.list_textual());
            Ok(())
        }
        Command::Create {
            store,
            max_files,
            thumb_res,
            small_res,
        } => {
            let thumb = thumb_res.map(to_pair).unwrap_or(DEFAULT_THUMB);
            let small = small_res.map(to_pair).unwrap_or(DEFAULT_SMALL);
            ImageStore::create(
                &store,
                STORE_TAG,
                max_files,
                [thumb[0], thumb[1], small[0], small[1]],
                backend(),
            )?;
            Ok(())
        }
        Command::Read {
            store,
            img_id,
            resolution,
        } => {
            let res = Resolution::parse(&resolution)?;
            let mut store = ImageStore::open(&store, backend())?;
            let bytes = store.read(&img_id, res)?;
            let out_path = format!("{img_id}_{}.jpg", res.suffix());
            fs::write(&out_path, &bytes)?;
            println!("wrote {out_path}");
            Ok(())
        }
        Command::Insert {
            store,
            img_id,
            file,
        } => {
            let bytes = fs::read(&file)?;
            let mut store = ImageStore::open(&store, backend())?;
            store.insert(&bytes, &img_id)?;
            Ok(())
        }
        Command::Delete { store, img_id } => {
            let mut store = ImageStore::open(&store, backend())?;
            store.delete(&img_id)?;
            Ok(())
        }
        Command::Gc { store, tmp_store } => {
            let report = gc(&store, &tmp_store, backend())?;
            println!(
                "compacted {} slots, {} -> {} bytes",
                report.slots_compacted, report.bytes_before, report.bytes_after
            );
            Ok(())
        }
        Command::Serve {
            store,
            addr,
            doc_root,
        } => {
            let store = ImageStore::open(&store, backend())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(imgstore::http::serve(store, addr, doc_root))
        }
    }
}

/// Maps a clap parse failure onto the core error enum so malformed CLI
/// invocations render through the same `ERROR: <message>` path as every
/// other failure, instead of clap's own usage-text format.
fn classify_parse_error(e: &clap::Error) -> imgstore::error::StoreError {
    use clap::error::ErrorKind;
    use imgstore::error::StoreError;

    match e.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => StoreError::NotEnoughArguments,
        _ => StoreError::InvalidCommand(e.to_string()),
    }
}

fn to_pair(v: Vec<u16>) -> [u16; 2] {
    [v[0], v[1]]
}

fn help_text() -> &'static str {
    "\
imgstore <command> [args]

Commands:
  help
  list <store>
  create <store> [--max-files N] [--thumb-res W H] [--small-res W H]
  read <store> <img_id> [thumb|thumbnail|small|orig|original]
  insert <store> <img_id> <file>
  delete <store> <img_id>
  gc <store> <tmp_store>
  serve <store> [--addr HOST:PORT] [--doc-root DIR]"
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| tracing_subscriber::EnvFilter::new("info"),
        ))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                e.exit();
            }
            eprintln!("ERROR: {}", classify_parse_error(&e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
    Ok(())
}
