//! HTTP utilities for downloading release assets.

use crate::bundler::error::{Error, ErrorExt, Result};
use futures_lite::StreamExt;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

/// User agent sent with every request; the GitHub API rejects requests without one.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds the shared HTTP client.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Downloads `url` into `dest`, streaming the body chunk by chunk.
///
/// Anything other than `200 OK` is an error. A partially written file is
/// removed when the transfer fails midway.
///
/// Returns the number of bytes written.
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    log::info!("Downloading {}", url);

    let response = client.get(url).send().await?;
    if response.status() != StatusCode::OK {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let file = File::create(dest).await.fs_context("creating", dest)?;
    let mut writer = BufWriter::new(file);

    match stream_body(response, &mut writer, dest).await {
        Ok(written) => Ok(written),
        Err(e) => {
            drop(writer);
            if let Err(cleanup) = tokio::fs::remove_file(dest).await {
                log::warn!("Failed to remove partial download {}: {}", dest.display(), cleanup);
            }
            Err(e)
        }
    }
}

async fn stream_body(
    response: reqwest::Response,
    writer: &mut BufWriter<File>,
    dest: &Path,
) -> Result<u64> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await.fs_context("writing", dest)?;
        written += chunk.len() as u64;
    }

    writer.flush().await.fs_context("flushing", dest)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn writes_body_to_disk() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/asset.tar.gz")
            .with_status(200)
            .with_body(vec![7u8; 4096])
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("asset.tar.gz");
        let client = build_client(Duration::from_secs(10)).unwrap();

        let written = download_to_file(&client, &format!("{}/asset.tar.gz", server.url()), &dest)
            .await
            .unwrap();

        assert_eq!(written, 4096);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![7u8; 4096]);
    }

    #[tokio::test]
    async fn non_200_creates_no_file() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.zip")
            .with_status(404)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("missing.zip");
        let client = build_client(Duration::from_secs(10)).unwrap();

        let err = download_to_file(&client, &format!("{}/missing.zip", server.url()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
        assert!(!dest.exists());
    }
}
