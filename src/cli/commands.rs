use std::fs;
use std::path::PathBuf;

use colored::Colorize;

use crate::api::run_server;
use crate::config::Config;
use crate::error::DashboardResult;
use crate::report::{self, TEMPLATE_FILE_NAME};
use crate::users::{NewUser, UserStore};

/// Execute the serve command: load config, apply overrides, run the API.
pub async fn serve(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    run_server(config).await
}

/// Execute the generate command: run the report pipeline against a local
/// timesheet export, without going through the HTTP boundary.
pub fn generate(
    input: PathBuf,
    month: u32,
    year: i32,
    employee: String,
    output: Option<PathBuf>,
    templates_dir: PathBuf,
) -> DashboardResult<()> {
    println!("{}", "Generating Alfa report".bold().green());
    println!("   Input: {}", input.display());
    println!("   Period: {}/{}", month, year);

    let upload = fs::read(&input)?;
    let template_path = templates_dir.join(TEMPLATE_FILE_NAME);
    let generated = report::generate_report(&template_path, &upload, month, year, &employee)?;

    let output = output.unwrap_or_else(|| PathBuf::from(&generated.file_name));
    fs::write(&output, &generated.bytes)?;

    println!("{} {}", "✅ Saved:".green(), output.display());
    Ok(())
}

/// Execute the add-user command against the configured user store.
#[allow(clippy::too_many_arguments)]
pub fn add_user(
    config_path: Option<PathBuf>,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password: String,
    admin: bool,
) -> DashboardResult<()> {
    let config = Config::load(config_path.as_deref())?;
    let store = UserStore::open(&config.users_file)?;
    let user = store.create(NewUser {
        first_name,
        last_name,
        username,
        email,
        password,
        is_admin: admin,
    })?;

    println!(
        "{} {} (id {})",
        "✅ Created user".green(),
        user.email,
        user.id
    );
    if user.is_admin {
        println!("   {}", "Admin rights granted".yellow());
    }
    Ok(())
}
