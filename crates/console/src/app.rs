//! Wiring of session, transport, fault handling and list views.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::json;

use backoffice_auth::{Access, AccessGuard, GuardOptions, explain_access};
use backoffice_core::{FieldErrors, MemoryNavigator, Navigator, Role};
use backoffice_query::{
    FetchStatus, FilterReconciler, FilterSet, Payments, Resource, ResourceQueryController, Tickets,
};
use backoffice_session::{FileStorage, MemoryStorage, SessionStore};
use backoffice_transport::auth_api::{self, Credentials};
use backoffice_transport::{ApiClient, FaultClassifier, ReqwestTransport, Transport};

use crate::cli::{Cli, Command, LoginArgs, WhoamiArgs};
use crate::config::ConsoleConfig;

const TICKETS_ROUTE: &str = "/tickets";
const PAYMENTS_ROUTE: &str = "/payments";
const WHOAMI_ROUTE: &str = "/whoami";

/// One console process: a session, a navigator standing in for the router,
/// and an API client whose failures pass through the fault classifier.
pub struct Console {
    config: ConsoleConfig,
    session: Arc<SessionStore>,
    navigator: Arc<MemoryNavigator>,
    client: ApiClient,
}

#[derive(Debug, Serialize)]
struct ListReport<'a, T> {
    resource: &'static str,
    page: u32,
    per_page: i64,
    page_count: u64,
    total: u64,
    items: &'a [T],
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    reset_filters: &'a FieldErrors,
}

impl Console {
    /// Production wiring: reqwest transport and the durable session file.
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.http_timeout).context("building HTTP client")?;

        let session = match config.session_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "durable session file");
                SessionStore::hydrate(MemoryStorage::new(), FileStorage::new(path))
            }
            None => {
                tracing::warn!("no data directory; remembered logins will not survive this process");
                SessionStore::hydrate(MemoryStorage::new(), MemoryStorage::new())
            }
        };

        Ok(Self::assemble(config, transport, Arc::new(session)))
    }

    pub fn assemble(config: ConsoleConfig, transport: impl Transport + 'static, session: Arc<SessionStore>) -> Self {
        let navigator = Arc::new(MemoryNavigator::default());
        let classifier = FaultClassifier::new(session.clone(), navigator.clone())
            .with_public_paths(config.public_paths())
            .with_login_path(config.login_path.clone())
            .with_unauthorized_path(config.unauthorized_path.clone());
        let client = ApiClient::builder(transport)
            .base_url(config.api_base())
            .interceptor(classifier)
            .build();

        Self {
            config,
            session,
            navigator,
            client,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &MemoryNavigator {
        &self.navigator
    }

    pub async fn run(&self, command: Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::Login(args) => self.login(args, out).await,
            Command::Logout => self.logout(out).await,
            Command::Whoami(args) => self.whoami(args, out).await,
            Command::Tickets(args) => self.list::<Tickets>(TICKETS_ROUTE, None, args.into(), out).await,
            Command::Payments(args) => {
                self.list::<Payments>(PAYMENTS_ROUTE, Some(Role::Admin), args.into(), out)
                    .await
            }
            Command::Shell => bail!("already in a shell"),
        }
    }

    /// Read commands line by line until EOF or `exit`.
    ///
    /// Words are split on whitespace; there is no quoting.
    pub async fn shell(&self, input: impl BufRead, out: &mut dyn Write) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.first() {
                None => continue,
                Some(&"exit" | &"quit") => break,
                Some(_) => {}
            }

            let command = match Cli::try_parse_from(std::iter::once("backoffice").chain(words)) {
                Ok(cli) => cli.command,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            };
            if let Err(err) = self.run(command, out).await {
                writeln!(out, "error: {err:#}")?;
            }
        }
        Ok(())
    }

    fn guard_options(&self, required_role: Option<Role>) -> GuardOptions {
        GuardOptions {
            required_role,
            ..GuardOptions::default()
        }
        .with_login_path(self.config.login_path.clone())
        .with_unauthorized_path(self.config.unauthorized_path.clone())
    }

    async fn login(&self, args: LoginArgs, out: &mut dyn Write) -> Result<()> {
        let password = match args.password {
            Some(password) => password,
            None => rpassword::prompt_password("Password: ").context("reading password")?,
        };
        let credentials = Credentials {
            email: args.email,
            password,
        };

        match auth_api::sign_in(&self.client, &self.session, &credentials, args.remember).await {
            Ok(role) => {
                tracing::info!(%role, remember = args.remember, "signed in");
                write_json(out, &json!({ "role": role, "remember": args.remember }))
            }
            Err(err) if err.status() == Some(401) => bail!("invalid credentials"),
            Err(err) => Err(anyhow::Error::new(err).context("login failed")),
        }
    }

    async fn logout(&self, out: &mut dyn Write) -> Result<()> {
        let was_authenticated = self.session.is_authenticated();
        auth_api::sign_out(&self.client, &self.session).await;
        tracing::info!(was_authenticated, "signed out");
        write_json(out, &json!({ "signed_out": was_authenticated }))
    }

    async fn whoami(&self, args: WhoamiArgs, out: &mut dyn Write) -> Result<()> {
        let session = self.session.snapshot();
        let access = explain_access(&session, &self.guard_options(args.require), WHOAMI_ROUTE);

        let profile = match session.token.as_deref() {
            Some(token) if session.is_authenticated() => match auth_api::me(&self.client, token).await {
                Ok(profile) => Some(profile),
                Err(err) => {
                    tracing::warn!(%err, "could not load profile");
                    None
                }
            },
            _ => None,
        };

        write_json(
            out,
            &json!({
                "authenticated": self.session.is_authenticated(),
                "role": self.session.role(),
                "remember": self.session.remember(),
                "access": access,
                "profile": profile,
            }),
        )
    }

    async fn list<R>(
        &self,
        route: &str,
        required_role: Option<Role>,
        filters: R::Filters,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        R: Resource,
        R::Item: Serialize,
    {
        self.navigator.visit(route);
        let guard = AccessGuard::new(self.guard_options(required_role));
        if let Access::Redirect(redirect) = guard.check(&self.session.snapshot(), route) {
            let to = redirect.to.clone();
            self.navigator.navigate(redirect);
            bail!("access denied, redirected to {to}");
        }

        let controller = ResourceQueryController::<R>::new(self.client.clone());
        let mut view = FilterReconciler::new(controller, self.session.clone(), filters);
        let status = view.load().await;
        let result = view.result();

        if self.navigator.current_path() != route {
            bail!(
                "{} request failed ({}), redirected to {}",
                R::NAME,
                result.error.unwrap_or_default(),
                self.navigator.current_path()
            );
        }

        match status {
            FetchStatus::Failed => bail!("{} request failed: {}", R::NAME, result.error.unwrap_or_default()),
            FetchStatus::Invalid => bail!(
                "{} filters rejected: {}",
                R::NAME,
                describe_field_errors(result.field_errors.as_ref())
            ),
            FetchStatus::Loaded | FetchStatus::NotFound | FetchStatus::Superseded => {}
        }

        let filters = view.filters();
        write_json(
            out,
            &ListReport {
                resource: R::NAME,
                page: filters.page(),
                per_page: filters.per_page(),
                page_count: view.page_count(),
                total: result.total,
                items: &result.items,
                reset_filters: view.corrections(),
            },
        )
    }
}

fn describe_field_errors(errors: Option<&FieldErrors>) -> String {
    errors
        .into_iter()
        .flatten()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_json(out: &mut dyn Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
