//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::{Client, ScanOptions, SearchOptions, WaitOptions};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::pro::{HostnameOptions, Pro};
use crate::types::JsonValue;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> Result<()> {
        let mut stdout = std::io::stdout();
        self.run_with(&mut stdout).await
    }

    /// Run the CLI command, writing results to `out`
    pub async fn run_with<W: Write>(&self, out: &mut W) -> Result<()> {
        let config = self.client_config()?;

        match &self.cli.command {
            Commands::Search {
                query,
                size,
                limit,
                search_after,
                datasource,
                collapse,
            } => {
                let options = SearchOptions {
                    q: query.clone(),
                    size: *size,
                    limit: *limit,
                    search_after: search_after.clone(),
                    datasource: *datasource,
                    collapse: collapse.clone(),
                };
                self.search(Client::with_config(config)?, options, out).await
            }
            Commands::Scan {
                urls,
                visibility,
                tags,
                country,
                customagent,
                referer,
                wait,
                timeout,
            } => {
                let mut options = ScanOptions::new(*visibility);
                if !tags.is_empty() {
                    options = options.tags(tags.iter().cloned());
                }
                options.country.clone_from(country);
                options.customagent.clone_from(customagent);
                options.referer.clone_from(referer);

                let wait = wait.then(|| WaitOptions {
                    timeout: Duration::from_secs(*timeout),
                    ..WaitOptions::default()
                });
                self.scan(Client::with_config(config)?, urls, &options, wait, out)
                    .await
            }
            Commands::Result { uuid } => {
                let result = Client::with_config(config)?.get_result(uuid).await?;
                self.output_message(out, &result)
            }
            Commands::Screenshot { uuid, output } => {
                self.screenshot(Client::with_config(config)?, uuid, output.clone(), out)
                    .await
            }
            Commands::Dom { uuid } => {
                let dom = Client::with_config(config)?.get_dom(uuid).await?;
                out.write_all(dom.as_bytes())?;
                Ok(())
            }
            Commands::Quotas => {
                let quotas = Client::with_config(config)?.get_quotas().await?;
                self.output_message(out, &quotas)
            }
            Commands::Hostname {
                hostname,
                size,
                limit,
                page_state,
            } => {
                let options = HostnameOptions {
                    size: *size,
                    limit: *limit,
                    page_state: page_state.clone(),
                };
                let mut cursor = Pro::with_config(config)?.hostname(hostname, options);
                while let Some(item) = cursor.next().await? {
                    self.output_message(out, &item)?;
                }
                info!("Fetched {} observations in {} requests", cursor.emitted(), cursor.requests());
                Ok(())
            }
        }
    }

    /// Build the client config from the config file and command-line overrides
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(api_key) = &self.cli.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(retry) = self.cli.retry {
            config.retry = retry;
        }

        Ok(config)
    }

    async fn search<W: Write>(
        &self,
        client: Client,
        options: SearchOptions,
        out: &mut W,
    ) -> Result<()> {
        let mut cursor = client.search(options);
        while let Some(item) = cursor.next().await? {
            self.output_message(out, &item)?;
        }

        info!(
            "Fetched {} of {} results in {} requests",
            cursor.emitted(),
            cursor.total().map_or_else(|| "?".to_string(), |t| t.to_string()),
            cursor.requests()
        );
        Ok(())
    }

    async fn scan<W: Write>(
        &self,
        client: Client,
        urls: &[String],
        options: &ScanOptions,
        wait: Option<WaitOptions>,
        out: &mut W,
    ) -> Result<()> {
        let outcomes = match &wait {
            Some(wait) => {
                client
                    .bulk_scan_and_get_results(urls.iter().cloned(), options, wait)
                    .await
            }
            None => client.bulk_scan(urls.iter().cloned(), options).await,
        };

        let mut failure = None;
        for (url, outcome) in outcomes {
            match outcome {
                Ok(value) => self.output_message(out, &value)?,
                Err(e) => {
                    warn!("Scan of {} failed: {}", url, e);
                    self.output_message(out, &json!({ "url": url, "error": e.to_string() }))?;
                    failure = Some(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn screenshot<W: Write>(
        &self,
        client: Client,
        uuid: &str,
        output: Option<PathBuf>,
        out: &mut W,
    ) -> Result<()> {
        let screenshot = client.get_screenshot(uuid).await?;
        let path = output.unwrap_or_else(|| PathBuf::from(&screenshot.name));

        tokio::fs::write(&path, &screenshot.data).await?;

        self.output_message(
            out,
            &json!({
                "uuid": uuid,
                "file": path.display().to_string(),
                "bytes": screenshot.data.len(),
            }),
        )
    }

    /// Output a message
    fn output_message<W: Write>(&self, out: &mut W, msg: &JsonValue) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, msg)?,
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, msg)?,
        }
        writeln!(out)?;
        Ok(())
    }
}
