use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use site_serve::ServerBuilder;

const PORT: u16 = 8000;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let source = base_dir()?;

    let mut builder = ServerBuilder::new(&source);
    builder.hostname("0.0.0.0");
    builder.port(PORT);
    let server = Arc::new(builder.build());

    server.start()?;

    let handle = Arc::clone(&server);
    ctrlc::set_handler(move || handle.close())
        .context("failed to install the interrupt handler")?;

    log::info!("Serving {}", source.display());
    println!("Server started at http://localhost:{}", PORT);
    println!("Press Ctrl+C to stop the server");

    server.serve()?;

    println!("Shutting down server...");
    Ok(())
}

/// The directory holding the running executable, as an absolute path
fn base_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    dunce::canonicalize(dir)
        .with_context(|| format!("failed to resolve base directory `{}`", dir.display()))
}
