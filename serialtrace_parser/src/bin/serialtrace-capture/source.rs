use anyhow::{Context, Result};
use serialtrace_parser::{StreamItem, StreamParser};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info};

pub type Reader = Box<dyn AsyncRead + Unpin + Send>;

pub async fn open(tcp: Option<&str>, path: &str) -> Result<Reader> {
    if let Some(addr) = tcp {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Unable to connect to serial bridge {}", addr))?;
        info!("Connected to {}", addr);
        return Ok(Box::new(stream));
    }

    if path == "-" {
        return Ok(Box::new(tokio::io::stdin()));
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Unable to open capture file {}", path))?;
    Ok(Box::new(file))
}

/// Reads `reader` to the end, forwarding every parsed line to `tx`.
pub async fn pump(mut reader: Reader, tx: Sender<StreamItem>) -> Result<()> {
    let mut parser = StreamParser::new();
    let mut buf = vec![0u8; 4096];

    loop {
        let n = reader
            .read(&mut buf)
            .await
            .context("Reading from capture source failed")?;
        if n == 0 {
            break;
        }

        for item in parser.push_and_parse(&buf[..n]) {
            if tx.send(item).await.is_err() {
                debug!("Writer stopped, ending capture");
                return Ok(());
            }
        }
    }

    if let Some(item) = parser.finish() {
        let _ = tx.send(item).await;
    }

    Ok(())
}
