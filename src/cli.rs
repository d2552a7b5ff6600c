use clap::{Parser, Subcommand};

use crate::auth::Role;

#[derive(Parser, Debug)]
#[command(name = "job-board", about = "Job board API server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print a signed identity token for local testing.
    ///
    /// The user row must already exist in `users`; writes made with a token
    /// for an unknown id are answered with 404 "User not found".
    Token {
        #[arg(long)]
        user_id: i32,
        #[arg(long, value_enum)]
        role: Role,
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["job-board"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_token_arguments() {
        let cli = Cli::try_parse_from([
            "job-board", "token", "--user-id", "4", "--role", "jobseeker",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Token { user_id, role, ttl_hours }) => {
                assert_eq!(user_id, 4);
                assert_eq!(role, Role::Jobseeker);
                assert_eq!(ttl_hours, 24);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
