//! CLI runner
//!
//! Plays the host locally: builds the capability bundle, feeds the
//! continuation back in and prints records as JSON lines on stdout.

use crate::auth::{authorization_url, AuthConfig};
use crate::cli::commands::{Cli, Commands};
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::host::{BlobStorage, HttpFetcher, ObjectStoreBlobStorage, SyncContext};
use crate::pagination::Continuation;
use crate::query::DateRange;
use crate::sync::{CustomerSyncParams, InvoiceSyncParams, QboConnector, SyncPage};
use serde::Serialize;
use serde_json::json;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
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

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        self.run_with(&mut std::io::stdout().lock(), &mut std::io::stderr())
            .await
    }

    /// Records go to `out`; notices for the operator go to `notices`
    async fn run_with(&self, out: &mut impl Write, notices: &mut impl Write) -> Result<()> {
        match &self.cli.command {
            Commands::AuthUrl {
                redirect_uri,
                state,
            } => self.auth_url(redirect_uri, state, out),
            Commands::Customers { active_only } => {
                let params = CustomerSyncParams::new(self.company_id()?).active_only(*active_only);
                self.sync(out, notices, |connector, ctx| {
                    let params = params.clone();
                    async move { connector.sync_customers(&ctx, &params).await }
                })
                .await
            }
            Commands::Invoices {
                from,
                to,
                include_pdfs,
            } => {
                let range = from.zip(*to).map(|(start, end)| DateRange::new(start, end));
                let params = InvoiceSyncParams::new(self.company_id()?)
                    .date_range(range)
                    .include_pdfs(*include_pdfs);
                if *include_pdfs && self.cli.blob_dir.is_none() {
                    warn!("PDFs are kept in memory; pass --blob-dir to keep them after exit");
                }
                self.sync(out, notices, |connector, ctx| {
                    let params = params.clone();
                    async move { connector.sync_invoices(&ctx, &params).await }
                })
                .await
            }
        }
    }

    fn auth_url(&self, redirect_uri: &str, state: &str, out: &mut impl Write) -> Result<()> {
        let client_id = self
            .cli
            .client_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("client_id"))?;
        writeln!(out, "{}", authorization_url(client_id, redirect_uri, state)?)?;
        Ok(())
    }

    fn company_id(&self) -> Result<String> {
        self.cli
            .company_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::missing_field("company_id"))
    }

    /// Load configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        match &self.cli.config {
            Some(path) => ConnectorConfig::from_file(path),
            None => Ok(ConnectorConfig::default()),
        }
    }

    /// Bearer token wins over refresh credentials
    fn auth_config(&self) -> Result<AuthConfig> {
        if let Some(token) = &self.cli.access_token {
            return Ok(AuthConfig::Bearer {
                token: token.clone(),
            });
        }
        match (
            &self.cli.client_id,
            &self.cli.client_secret,
            &self.cli.refresh_token,
        ) {
            (Some(id), Some(secret), Some(refresh)) => {
                let auth = AuthConfig::refresh(id.clone(), secret.clone(), refresh.clone());
                Ok(match &self.cli.token_url {
                    Some(url) => auth.with_token_url(url.clone()),
                    None => auth,
                })
            }
            _ => Err(Error::auth(
                "Provide --access-token, or --client-id, --client-secret and --refresh-token",
            )),
        }
    }

    fn blob_storage(&self) -> Result<Arc<dyn BlobStorage>> {
        Ok(match &self.cli.blob_dir {
            Some(dir) => Arc::new(ObjectStoreBlobStorage::local(dir)?),
            None => Arc::new(ObjectStoreBlobStorage::in_memory()),
        })
    }

    fn initial_continuation(&self) -> Result<Option<Continuation>> {
        match &self.cli.continuation {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| Error::invalid_value("continuation", e.to_string())),
        }
    }

    /// Re-enter `fetch_page` until exhausted (or once, without `--all`)
    ///
    /// A rotated refresh token is reported even when a page fails.
    async fn sync<T, F, Fut>(
        &self,
        out: &mut impl Write,
        notices: &mut impl Write,
        fetch_page: F,
    ) -> Result<()>
    where
        T: Serialize,
        F: FnMut(Arc<QboConnector>, SyncContext) -> Fut,
        Fut: Future<Output = Result<SyncPage<T>>>,
    {
        let config = self.load_config()?;
        let fetcher = Arc::new(HttpFetcher::from_config(&config, self.auth_config()?)?);

        let result = self.write_pages(config, fetcher.clone(), out, fetch_page).await;
        let reported = self.report_rotated_refresh_token(&fetcher, notices).await;
        result.and(reported)
    }

    async fn write_pages<T, F, Fut>(
        &self,
        config: ConnectorConfig,
        fetcher: Arc<HttpFetcher>,
        out: &mut impl Write,
        mut fetch_page: F,
    ) -> Result<()>
    where
        T: Serialize,
        F: FnMut(Arc<QboConnector>, SyncContext) -> Fut,
        Fut: Future<Output = Result<SyncPage<T>>>,
    {
        let connector = Arc::new(QboConnector::new(config));
        let mut ctx = SyncContext::new(fetcher, self.blob_storage()?)
            .with_continuation(self.initial_continuation()?);

        let mut pages = 0usize;
        let mut records = 0usize;

        let continuation = loop {
            let page = fetch_page(connector.clone(), ctx.clone()).await?;
            pages += 1;
            records += page.result.len();

            for record in &page.result {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }

            match page.continuation {
                Some(next) if self.cli.all => ctx = ctx.with_continuation(Some(next)),
                other => break other,
            }
        };

        writeln!(out, "{}", json!({ "continuation": continuation }))?;
        out.flush()?;
        info!("Done: {records} records in {pages} page(s)");
        Ok(())
    }

    /// Intuit may rotate the refresh token; the old one stops working eventually
    async fn report_rotated_refresh_token(
        &self,
        fetcher: &HttpFetcher,
        notices: &mut impl Write,
    ) -> Result<()> {
        let Some(auth) = fetcher.client().authenticator() else {
            return Ok(());
        };
        let current = auth.current_refresh_token().await;
        if let Some(token) = current.filter(|token| Some(token) != self.cli.refresh_token.as_ref()) {
            warn!("Refresh token was rotated by the provider");
            writeln!(notices, "New refresh token: {token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["qbo-sync"];
        argv.extend_from_slice(args);
        Runner::new(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_bearer_wins_over_refresh() {
        let runner = runner(&[
            "--access-token",
            "tok",
            "--client-id",
            "id",
            "--client-secret",
            "s",
            "--refresh-token",
            "rt",
            "customers",
        ]);
        assert!(matches!(runner.auth_config().unwrap(), AuthConfig::Bearer { .. }));
    }

    #[test]
    fn test_incomplete_refresh_credentials() {
        let runner = runner(&["--client-id", "id", "customers"]);
        let err = runner.auth_config().unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_initial_continuation() {
        assert_eq!(runner(&["customers"]).initial_continuation().unwrap(), None);
        assert_eq!(
            runner(&["--continuation", r#"{"startPosition":201}"#, "customers"])
                .initial_continuation()
                .unwrap(),
            Some(Continuation::at(201))
        );
        assert_eq!(
            runner(&["--continuation", "null", "customers"])
                .initial_continuation()
                .unwrap(),
            None
        );
        assert!(runner(&["--continuation", "{oops", "customers"])
            .initial_continuation()
            .is_err());
    }

    #[test]
    fn test_missing_company_id() {
        let err = runner(&["customers"]).company_id().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "company_id"));
    }

    /// Config file pointing the connector at `server`, plus refresh-flow args
    fn refresh_runner(server: &MockServer, config_file: &tempfile::NamedTempFile) -> Runner {
        let token_url = format!("{}/oauth2/v1/tokens/bearer", server.uri());
        runner(&[
            "-C",
            config_file.path().to_str().unwrap(),
            "--company-id",
            "4620816365",
            "--client-id",
            "client",
            "--client-secret",
            "secret",
            "--refresh-token",
            "rt-1",
            "--token-url",
            token_url.as_str(),
            "customers",
        ])
    }

    fn config_file(server: &MockServer) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "base_url: {}/v3/company\nhttp:\n  max_retries: 0\n  requests_per_minute: 0\n",
            server.uri()
        )
        .unwrap();
        file
    }

    async fn mount_token(server: &MockServer, refresh_token: &str) {
        Mock::given(method("POST"))
            .and(path("/oauth2/v1/tokens/bearer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "at-1",
                "refresh_token": refresh_token,
                "expires_in": 3600
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_reported_when_page_fails() {
        let server = MockServer::start().await;
        mount_token(&server, "rt-2").await;
        Mock::given(method("GET"))
            .and(path("/v3/company/4620816365/query"))
            .and(header("Authorization", "Bearer at-1"))
            .respond_with(ResponseTemplate::new(400).set_body_string("QueryParserError"))
            .mount(&server)
            .await;

        let file = config_file(&server);
        let (mut out, mut notices) = (Vec::new(), Vec::new());
        let err = refresh_runner(&server, &file)
            .run_with(&mut out, &mut notices)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(notices).unwrap(), "New refresh token: rt-2\n");
    }

    #[tokio::test]
    async fn test_unrotated_refresh_token_not_reported() {
        let server = MockServer::start().await;
        mount_token(&server, "rt-1").await;
        Mock::given(method("GET"))
            .and(path("/v3/company/4620816365/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "QueryResponse": {"Customer": [{"Id": "1", "DisplayName": "Amy's Bird Sanctuary"}]}
            })))
            .mount(&server)
            .await;

        let file = config_file(&server);
        let (mut out, mut notices) = (Vec::new(), Vec::new());
        refresh_runner(&server, &file)
            .run_with(&mut out, &mut notices)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Amy's Bird Sanctuary"));
        assert_eq!(lines[1], r#"{"continuation":null}"#);
        assert!(notices.is_empty());
    }
}
