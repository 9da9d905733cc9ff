use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use pandemic_rs::cli::{GameStats, PlayerInstance, parse_players, print_player_help};
use pandemic_rs::game::{Game, GameConfig, GameError};

#[derive(Debug, Parser, Clone)]
#[command(name = "pandemic-sim")]
#[command(about = "Pandemic Bot Simulator - Simulate cooperative games between bot strategies")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes, one per seat (e.g., D,D,D,D or D,R,D,R)
    #[arg(long, default_value = "D,D,D,D")]
    players: String,

    /// Random seed for reproducibility; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let players = parse_players(&args.players).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    });
    if players.len() != 4 {
        eprintln!("Error: Must specify exactly 4 players");
        std::process::exit(1);
    }

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).unwrap_or_else(|err| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }),
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let result = if args.workers > 1 {
        run_parallel_simulations(&args, &config, &players)
    } else {
        run_simulations(&args, &config, &players, 0, args.num)
    };
    match result {
        Ok(stats) if !args.quiet => print_summary(&stats),
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn run_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
    first_game: u32,
    num_games: u32,
) -> Result<GameStats, GameError> {
    let mut stats = GameStats::new();
    for game_idx in first_game..first_game + num_games {
        let config = config.clone().with_seed(config.seed + u64::from(game_idx));

        let start = Instant::now();
        let mut game = Game::new(config)?;
        let status = game.play(players)?;
        let duration = start.elapsed();
        stats.record_game(&game, duration);

        if !args.quiet && args.workers <= 1 {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                println!(
                    "Game {:>4}: Result={:<30} Turns={:>4}, Incidents={}, Duration={:?}",
                    game_idx + 1,
                    status.to_string(),
                    game.state.turn,
                    game.state.incidents.count(),
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        }
    }
    Ok(stats)
}

fn run_parallel_simulations(
    args: &Args,
    config: &GameConfig,
    players: &[PlayerInstance],
) -> Result<GameStats, GameError> {
    use std::thread;

    let games_per_worker = args.num / args.workers as u32;
    let remainder = args.num % args.workers as u32;

    let mut stats = GameStats::new();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..args.workers as u32)
            .map(|worker_id| {
                let num_games = games_per_worker + u32::from(worker_id < remainder);
                let first_game = worker_id * games_per_worker + worker_id.min(remainder);
                scope.spawn(move || run_simulations(args, config, players, first_game, num_games))
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(worker_stats) => stats.merge(worker_stats?),
                Err(_) => {
                    eprintln!("Error: a simulation worker panicked");
                    std::process::exit(1);
                }
            }
        }
        Ok(stats)
    })
}

fn print_summary(stats: &GameStats) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    let rate = |count: u32| {
        if stats.games > 0 {
            count as f64 / stats.games as f64 * 100.0
        } else {
            0.0
        }
    };

    println!("\nOutcomes:");
    println!("{:<30} {:<10} {:<10}", "Result", "Games", "Rate");
    println!("{}", "-".repeat(50));
    println!("{:<30} {:<10} {:<9.1}%", "won", stats.wins, rate(stats.wins));
    let mut losses: Vec<_> = stats.losses.iter().collect();
    losses.sort_by_key(|(cause, _)| cause.to_string());
    for (cause, count) in losses {
        println!(
            "{:<30} {:<10} {:<9.1}%",
            format!("lost ({cause})"),
            count,
            rate(*count)
        );
    }
    println!(
        "{:<30} {:<10} {:<9.1}%",
        "unfinished",
        stats.unfinished,
        rate(stats.unfinished)
    );

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.games);
    println!("  Avg Turns: {:.2}", stats.get_avg_turns());
    println!("  Avg Steps: {:.2}", stats.get_avg_steps());
    println!("  Avg Incidents: {:.2}", stats.get_avg_incidents());
    println!("  Avg Duration: {:.2?}", stats.get_avg_duration());
}
