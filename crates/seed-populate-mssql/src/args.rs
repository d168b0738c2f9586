//! CLI argument definitions for the SQL Server sink.

use clap::Args;
use seed_populate::CommonPopulateArgs;
use std::fmt;
use tiberius::{AuthMethod, Config};

/// SQL Server connection arguments.
#[derive(Args, Clone)]
pub struct MssqlConnectionArgs {
    /// SQL Server host
    #[arg(long = "mssql-host", env = "MSSQL_HOST", default_value = "localhost")]
    pub host: String,

    /// SQL Server port
    #[arg(long = "mssql-port", env = "MSSQL_PORT", default_value_t = 1433)]
    pub port: u16,

    /// Database the tables are created in
    #[arg(long = "mssql-database", env = "MSSQL_DATABASE", default_value = "master")]
    pub database: String,

    /// SQL login
    #[arg(long = "mssql-user", env = "MSSQL_USER", default_value = "sa")]
    pub user: String,

    /// SQL login password
    #[arg(
        long = "mssql-password",
        env = "MSSQL_PASSWORD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,

    /// Accept the server certificate without validation
    #[arg(long = "mssql-trust-cert", env = "MSSQL_TRUST_CERT")]
    pub trust_cert: bool,
}

impl MssqlConnectionArgs {
    /// Build the driver configuration.
    pub fn config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.database(&self.database);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        config.application_name("biz-seed");
        if self.trust_cert {
            config.trust_cert();
        }
        config
    }
}

// Keeps the password out of logs.
impl fmt::Debug for MssqlConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MssqlConnectionArgs")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"********")
            .field("trust_cert", &self.trust_cert)
            .finish()
    }
}

impl fmt::Display for MssqlConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

/// SQL Server populate arguments.
#[derive(Args, Clone, Debug)]
pub struct MssqlPopulateArgs {
    #[command(flatten)]
    pub connection: MssqlConnectionArgs,

    #[command(flatten)]
    pub common: CommonPopulateArgs,

    /// Dry-run mode: generate and load into memory, never connect to the database
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: MssqlPopulateArgs,
    }

    fn args() -> MssqlConnectionArgs {
        MssqlConnectionArgs {
            host: "db.internal".to_string(),
            port: 1433,
            database: "estrutura".to_string(),
            user: "seeder".to_string(),
            password: "s3cret!".to_string(),
            trust_cert: true,
        }
    }

    #[test]
    fn test_password_is_masked() {
        let args = args();
        assert!(!format!("{args:?}").contains("s3cret!"));
        assert_eq!(args.to_string(), "seeder@db.internal:1433/estrutura");
    }

    #[test]
    fn test_config_address() {
        assert_eq!(args().config().get_addr(), "db.internal:1433");
    }

    #[test]
    fn test_dry_run_flag() {
        let cli = Cli::try_parse_from(["biz-seed", "--dry-run", "--seed", "7"]).unwrap();
        assert!(cli.args.dry_run);
        assert_eq!(cli.args.common.seed, 7);

        let cli = Cli::try_parse_from(["biz-seed"]).unwrap();
        assert!(!cli.args.dry_run);
    }
}
