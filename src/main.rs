//! Lasso Feast entry point
//!
//! Native builds run a headless attract-mode game: the autopilot plays for a
//! fixed number of ticks, the result is saved to a JSON score file and the
//! leaderboard is printed. The browser build starts from `platform::web`.
//!
//! Usage: `lasso-feast [username] [ticks] [score-file]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use lasso_feast::audio::SilentAudio;
    use lasso_feast::consts::SIM_DT;
    use lasso_feast::persistence::JsonFileStore;
    use lasso_feast::platform::FixedStep;
    use lasso_feast::sim::{TickInput, Viewport};
    use lasso_feast::{SaveStatus, Session, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "demo".to_string());
    let ticks: u64 = match args.next().map(|s| s.parse()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("ticks must be a whole number: {e}");
            std::process::exit(2);
        }
        None => 3600,
    };
    let score_file = PathBuf::from(args.next().unwrap_or_else(|| "scores.json".to_string()));

    let settings_file = score_file.with_file_name("settings.json");
    let settings = Settings::load_from(&settings_file);

    log::info!("Lasso Feast (native) starting...");
    let mut session = Session::new(
        settings,
        Box::new(SilentAudio),
        Box::new(JsonFileStore::new(&score_file)),
    );

    let viewport = Viewport::new(1280, 720);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    session.start_game(&username, viewport, seed);

    // Feed the fixed-step driver steady 60 Hz frames until the budget is spent
    let input = TickInput {
        demo: true,
        ..Default::default()
    };
    let mut clock = FixedStep::default();
    let mut ran = 0;
    while ran < ticks {
        for _ in 0..clock.advance(SIM_DT) {
            if ran == ticks {
                break;
            }
            session.tick(&input, viewport);
            ran += 1;
        }
    }

    println!(
        "{} finished: score {} with {} catches",
        username,
        session.score(),
        session.count()
    );
    match session.stop_game_and_save() {
        SaveStatus::Saved => println!("Saved to {}", score_file.display()),
        SaveStatus::Skipped => println!("Nothing to save"),
        SaveStatus::Deferred => {
            if session.retry_save() == SaveStatus::Deferred {
                eprintln!("Could not save to {}", score_file.display());
            }
        }
    }

    if let Some(rank) = session.player_rank() {
        println!("{} is ranked #{}", username, rank);
    }
    if let Some(top) = session.top_score() {
        println!("Top score: {}", top);
    }

    println!("\n{:>4}  {:<16} {:>7} {:>6}", "#", "name", "score", "count");
    for (rank, record) in session.leaderboard().iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>7} {:>6}",
            rank + 1,
            record.username,
            record.score,
            record.count
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
