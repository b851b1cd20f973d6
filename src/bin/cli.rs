//! CardDB - CLI entry point

use carddb::catalog::Catalog;
use carddb::config::ConnectionConfig;
use carddb::session::Session;
use carddb::shell::Shell;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ConnectionConfig::new();
    let catalog = Catalog::standard();

    // a connection failure ends the process before the menu loop starts
    let session = match Session::connect(&config, &catalog) {
        Ok(session) => {
            println!("Database Connected");
            session
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut shell = Shell::new(&session, &catalog)?;
    shell.run()?;
    Ok(())
}
