//! Download sink: streams chosen clips to disk one after another.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clipfetch_core::{Config, SoundSelection};
use colored::Colorize;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::output::plural;

/// Tally of a download batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub completed: usize,
    pub failed: Vec<String>,
}

impl DownloadReport {
    pub fn print_summary(&self) {
        if self.failed.is_empty() {
            println!(
                "{} Download complete! All {} downloaded successfully.",
                "✅".green(),
                plural(self.completed, "file")
            );
            return;
        }
        println!(
            "{}  Download partially complete: {} successful, {} failed.",
            "⚠️".yellow(),
            self.completed,
            self.failed.len()
        );
        println!("\nFailed files:");
        for label in &self.failed {
            println!("  - {label}");
        }
    }
}

/// Writes clips into one output directory.
pub struct DownloadSink {
    client: Client,
    output_dir: PathBuf,
}

impl DownloadSink {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;
        let output_dir = config
            .download
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::with_client(client, output_dir))
    }

    pub const fn with_client(client: Client, output_dir: PathBuf) -> Self {
        Self { client, output_dir }
    }

    /// Download every selection in order, tallying failures instead of stopping.
    pub async fn download_all(
        &self,
        selections: &[SoundSelection],
        progress: &ProgressBar,
    ) -> DownloadReport {
        let total = selections.len();
        let mut report = DownloadReport::default();
        progress.set_message(format!("Preparing to download {}...", plural(total, "file")));

        for (index, selection) in selections.iter().enumerate() {
            progress.set_message(format!(
                "Downloading {} ({}/{total})...",
                selection.label,
                index + 1
            ));
            match self.download(selection).await {
                Ok(path) => {
                    report.completed += 1;
                    debug!("Saved {} to {}", selection.label, path.display());
                    progress.set_message(format!("Downloaded {}/{total} files...", report.completed));
                },
                Err(e) => {
                    warn!("Failed to download {}: {:#}", selection.label, e);
                    progress.suspend(|| {
                        eprintln!("\nFailed to download {}: {e:#}", selection.label);
                    });
                    report.failed.push(selection.label.clone());
                },
            }
        }
        report
    }

    /// Stream one clip into `<output_dir>/<last URL segment>`.
    pub async fn download(&self, selection: &SoundSelection) -> Result<PathBuf> {
        let file_name = selection.file_name()?;
        fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let destination = self.output_dir.join(file_name);

        let response = self
            .client
            .get(&selection.download_url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", selection.download_url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} for {}", status.as_u16(), selection.download_url);
        }

        if let Err(e) = write_body(response, &destination).await {
            let _ = fs::remove_file(&destination).await;
            return Err(e);
        }
        Ok(destination)
    }
}

async fn write_body(response: reqwest::Response, destination: &Path) -> Result<()> {
    let mut file = File::create(destination)
        .await
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
