use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod sink;
mod source;

/// Decodes serialtrace output captured from a device.
#[derive(Parser, Debug)]
struct Args {
    /// Capture file, or `-` for stdin. Ignored with `--tcp`.
    #[arg(default_value = "-")]
    source: String,

    /// Read from a TCP serial bridge (e.g. ser2net) at host:port instead
    #[arg(long)]
    tcp: Option<String>,

    #[arg(long, value_enum, default_value_t = sink::Format::Text)]
    format: sink::Format,

    /// Only keep error-marker records
    #[arg(long)]
    errors_only: bool,

    /// Keep lines that are not trace records
    #[arg(long)]
    keep_text: bool,

    /// Store records as a JSON array in this file instead of printing them
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let reader = source::open(args.tcp.as_deref(), &args.source).await?;
    let (tx, rx) = mpsc::channel(1024);

    let filter = sink::Filter {
        errors_only: args.errors_only,
        keep_text: args.keep_text,
    };
    let format = args.format;
    let output = args.output;

    let writer = tokio::spawn(async move {
        match output {
            Some(path) => sink::store_json(path, rx, filter).await,
            None => sink::print(rx, format, filter).await,
        }
    });

    let read_result = source::pump(reader, tx).await;
    let write_result = writer.await?;

    read_result?;
    write_result
}
