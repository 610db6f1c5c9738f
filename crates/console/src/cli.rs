//! Command-line surface.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use backoffice_core::Role;
use backoffice_query::resources::payments::PaymentFilters;
use backoffice_query::resources::tickets::{TicketFilters, TicketPriority, TicketStatus};
use backoffice_query::resources::DEFAULT_PER_PAGE;

/// Back-office console for tickets and payments.
#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the credential
    Login(LoginArgs),
    /// Sign out and forget the credential
    Logout,
    /// Show the current session and whether a route would admit it
    Whoami(WhoamiArgs),
    /// List support tickets
    Tickets(TicketArgs),
    /// List payments (admins only)
    Payments(PaymentArgs),
    /// Run commands from stdin in one process; logins without --remember last until exit
    Shell,
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub email: String,

    /// Prompted for when absent
    #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Keep the credential across restarts
    #[arg(long)]
    pub remember: bool,
}

#[derive(Debug, Clone, Args)]
pub struct WhoamiArgs {
    /// Check against a route that requires this role
    #[arg(long)]
    pub require: Option<Role>,
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Pages start at 1; 0 is treated as 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_PER_PAGE, allow_negative_numbers = true)]
    pub per_page: i64,
}

#[derive(Debug, Clone, Args)]
pub struct TicketArgs {
    #[arg(long, default_value = "")]
    pub search: String,

    #[arg(long)]
    pub status: Option<TicketStatus>,

    #[arg(long)]
    pub priority: Option<TicketPriority>,

    #[arg(long)]
    pub user_id: Option<i64>,

    #[command(flatten)]
    pub paging: PageArgs,
}

impl From<TicketArgs> for TicketFilters {
    fn from(args: TicketArgs) -> Self {
        Self {
            search: args.search,
            status: args.status,
            priority: args.priority,
            user_id: args.user_id,
            page: args.paging.page.max(1),
            per_page: args.paging.per_page,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PaymentArgs {
    #[arg(long, default_value = "")]
    pub status: String,

    #[arg(long, default_value = "")]
    pub method: String,

    #[arg(long)]
    pub user_id: Option<i64>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub date_from: Option<NaiveDate>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub date_to: Option<NaiveDate>,

    #[command(flatten)]
    pub paging: PageArgs,
}

impl From<PaymentArgs> for PaymentFilters {
    fn from(args: PaymentArgs) -> Self {
        Self {
            status: args.status,
            method: args.method,
            user_id: args.user_id,
            date_from: args.date_from,
            date_to: args.date_to,
            page: args.paging.page.max(1),
            per_page: args.paging.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ticket_filters_come_from_flags() {
        let cli = Cli::try_parse_from([
            "backoffice",
            "tickets",
            "--status",
            "in_progress",
            "--user-id",
            "7",
            "--per-page",
            "0",
        ])
        .unwrap();

        let Command::Tickets(args) = cli.command else {
            panic!("expected tickets command");
        };
        let filters = TicketFilters::from(args);
        assert_eq!(filters.status, Some(TicketStatus::InProgress));
        assert_eq!(filters.user_id, Some(7));
        assert_eq!(filters.page, 1);
        assert_eq!(filters.per_page, 0);
    }

    #[test]
    fn payment_dates_are_parsed() {
        let cli = Cli::try_parse_from(["backoffice", "payments", "--date-from", "2024-03-01"]).unwrap();
        let Command::Payments(args) = cli.command else {
            panic!("expected payments command");
        };
        assert_eq!(args.date_from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(Cli::try_parse_from(["backoffice", "payments", "--date-from", "March"]).is_err());
    }

    #[test]
    fn whoami_accepts_role_names() {
        let cli = Cli::try_parse_from(["backoffice", "whoami", "--require", "Admin"]).unwrap();
        assert!(matches!(cli.command, Command::Whoami(WhoamiArgs { require: Some(Role::Admin) })));
    }
}
