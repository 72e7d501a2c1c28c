use clap::Parser;
use layers::Category;
use station_viewer::{Args, LogEngine, LogSurface, MapSession, OperatorAction, ROUTE_FEED, publish_file};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let actions = args
        .actions
        .iter()
        .map(|a| a.parse::<OperatorAction>())
        .collect::<Result<Vec<_>, _>>()?;

    // Single-threaded event loop; feeds are the only concurrent producers.
    let event_loop = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    event_loop.block_on(run(args, actions))
}

async fn run(args: Args, actions: Vec<OperatorAction>) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = MapSession::new(args.session_config());
    let mut surface = LogSurface::new();
    let mut engine = LogEngine::new();

    let mut producers = Vec::new();
    for (category, path) in args.station_files() {
        let (tx, rx) = runtime::channel(category.slug());
        session.subscribe_stations(category, rx);
        producers.push(tokio::spawn(publish_file(path, tx)));
    }
    if let Some(path) = args.routes.clone() {
        let (tx, rx) = runtime::channel(ROUTE_FEED);
        session.subscribe_routes(rx);
        producers.push(tokio::spawn(publish_file(path, tx)));
    }

    session.on_surface_ready(&mut surface);
    let handled = session.drain().await;
    for producer in producers {
        producer.await?;
    }
    info!(deliveries = handled, "feeds drained");
    log_events(&mut session);

    for category in Category::ALL {
        info!(
            %category,
            markers = session.registry().markers(category).len(),
            "loaded"
        );
    }

    for action in actions {
        if let Err(e) = session.handle(action, &mut surface, &mut engine) {
            println!("alert: {e}");
        }
        log_events(&mut session);
    }

    session.teardown(&mut surface);
    Ok(())
}

fn log_events(session: &mut MapSession) {
    for event in session.drain_events() {
        debug!(seq = event.seq, kind = event.kind, "{}", event.message);
    }
}
