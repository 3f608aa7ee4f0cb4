use clap::Parser;

/// Boardsync - real-time collaborative kanban board server
#[derive(Parser, Debug)]
#[command(name = "boardsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the server to
    #[arg(long, default_value = "5000", env = "BOARDSYNC_PORT")]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0", env = "BOARDSYNC_BIND")]
    bind: String,

    /// Allowed CORS origin (repeatable). Omit for permissive CORS.
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    // Create the tokio runtime
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        // Initialize shutdown state
        let shutdown_state = boardsync::shutdown::ShutdownState::new();
        if let Err(e) = boardsync::shutdown::register_signal_handlers(shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        // Create server state
        let state = boardsync::server::AppState::new(shutdown_state);

        let cors_origins = if cli.cors_origins.is_empty() {
            None
        } else {
            Some(cli.cors_origins)
        };

        if let Err(e) = boardsync::server::run_server(cli.port, &cli.bind, state, cors_origins).await
        {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
    });
}
