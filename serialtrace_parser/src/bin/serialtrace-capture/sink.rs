use anyhow::{Context, Result};
use clap::ValueEnum;
use serialtrace_parser::StreamItem;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::Receiver;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// The trace lines as the device printed them
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Clone, Copy, Debug)]
pub struct Filter {
    pub errors_only: bool,
    pub keep_text: bool,
}

impl Filter {
    pub fn accepts(&self, item: &StreamItem) -> bool {
        match item {
            StreamItem::Trace(tl) => !self.errors_only || tl.is_error(),
            StreamItem::Text { .. } => self.keep_text && !self.errors_only,
        }
    }
}

fn render(item: &StreamItem, format: Format) -> Result<String> {
    Ok(match (format, item) {
        (Format::Text, StreamItem::Trace(tl)) => tl.to_string(),
        (Format::Text, StreamItem::Text { text }) => text.clone(),
        (Format::Json, item) => serde_json::to_string(item)?,
    })
}

pub async fn print(mut rx: Receiver<StreamItem>, format: Format, filter: Filter) -> Result<()> {
    let mut stdout = tokio::io::stdout();

    while let Some(item) = rx.recv().await {
        if !filter.accepts(&item) {
            continue;
        }
        let mut line = render(&item, format)?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}

pub async fn store_json(path: PathBuf, mut rx: Receiver<StreamItem>, filter: Filter) -> Result<()> {
    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("Cannot open file {} for writing", path.display()))?;

    file.write_all(b"[\n").await?;

    let mut count = 0usize;
    while let Some(item) = rx.recv().await {
        if !filter.accepts(&item) {
            continue;
        }
        if count > 0 {
            file.write_all(b",\n").await?;
        }
        file.write_all(render(&item, Format::Json)?.as_bytes())
            .await?;
        count += 1;
    }

    file.write_all(b"\n]\n").await?;
    file.flush().await?;

    info!("Stored {} records in {}", count, path.display());
    Ok(())
}
