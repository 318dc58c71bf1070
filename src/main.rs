use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tempestive_dashboard::cli;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Tempestive internal dashboard backend")]
#[command(long_about = "Tempestive dashboard backend

Serves the SPA's REST API (auth, users, Alfa report generation) and offers
offline commands for operations work.

COMMANDS:
  serve      - Run the API server
  generate   - Build a monthly Alfa report from a local timesheet export
  add-user   - Add a user to the registry

EXAMPLES:
  dashboard serve --config config.json
  dashboard generate timesheet.xlsx -m 2 -y 2024 -e \"Anna Rossi\"
  dashboard add-user --first-name Anna --last-name Rossi \\
      --email anna@example.com --password segreta --admin")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Path to a JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Build a monthly Alfa report from a local timesheet export
    Generate {
        /// Path to the timesheet export (.xlsx)
        input: PathBuf,

        /// Report month (1-12)
        #[arg(short, long)]
        month: u32,

        /// Report year
        #[arg(short, long)]
        year: i32,

        /// Employee name written into the report header
        #[arg(short, long)]
        employee: String,

        /// Output path (defaults to the report's own file name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding the report template assets
        #[arg(long, default_value = "Templates")]
        templates_dir: PathBuf,
    },

    /// Add a user to the registry
    AddUser {
        /// Path to a JSON config file (locates the user store)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long, default_value = "")]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Grant admin rights
        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, host, port } => cli::serve(config, host, port).await,

        Commands::Generate {
            input,
            month,
            year,
            employee,
            output,
            templates_dir,
        } => Ok(cli::generate(input, month, year, employee, output, templates_dir)?),

        Commands::AddUser {
            config,
            first_name,
            last_name,
            username,
            email,
            password,
            admin,
        } => Ok(cli::add_user(
            config, first_name, last_name, username, email, password, admin,
        )?),
    }
}
