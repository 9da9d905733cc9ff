use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pandemic_rs::game::{GameConfig, GameState, Step, StepResult, acting_player};
use pandemic_rs::save::{JsonFileRepository, Repository, SaveError, SaveGame, apply_saved_step};

#[derive(Debug, Parser)]
#[command(name = "pandemic-step")]
#[command(about = "Apply single steps to saved games")]
struct Args {
    /// Directory holding the saved games
    #[arg(long, default_value = "saves")]
    saves: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a new saved game
    New {
        name: String,
        /// JSON file with a game configuration
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Apply one JSON-encoded step, e.g. '{"player":"Ana","payload":{"type":"check_for_exposure"}}'
    Step { name: String, step: String },
    /// Print a summary of a saved game
    Show {
        name: String,
        /// Also print the full game log
        #[arg(long)]
        log: bool,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SaveError> {
    let repo = JsonFileRepository::new(&args.saves)?;
    match args.command {
        Command::New { name, config, seed } => {
            let mut config = match config {
                Some(path) => GameConfig::load(&path)?,
                None => GameConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let state = GameState::new(config)?;
            repo.save_game(&name, &SaveGame::from_state(&state))?;
            print_state(&state, false);
        }
        Command::Step { name, step } => {
            let step: Step = serde_json::from_str(&step)?;
            match apply_saved_step(&repo, &name, step, |line: &str| println!("{line}"))? {
                StepResult::NoEffect { cause } => println!("No effect: {cause}"),
                StepResult::StateChanged {
                    next_turn_flow: Some(flow),
                    ..
                } => println!("Next: {flow}"),
                StepResult::StateChanged { .. } => println!("Turn flow unchanged"),
            }
        }
        Command::Show { name, log } => {
            let state = repo.load_game(&name)?.into_state()?;
            print_state(&state, log);
        }
    }
    Ok(())
}

fn print_state(state: &GameState, with_log: bool) {
    println!("Status: {}  Turn: {}", state.status, state.turn);
    println!(
        "Turn flow: {} for {} (next to act: {})",
        state.turn_flow,
        state.active_player().name,
        state.players[acting_player(state)].name
    );
    println!(
        "Infection rate: {} ({} cards)  Incidents: {}",
        state.infection_rate.position(),
        state.infection_rate.cards(),
        state.incidents.count()
    );
    println!(
        "Player deck: {} to draw, {} discarded  Infection deck: {} to draw, {} discarded",
        state.player_deck.draw_pile().len(),
        state.player_deck.discard_pile().len(),
        state.infection_deck.draw_pile().len(),
        state.infection_deck.discard_pile().len()
    );

    println!("\nPlayers:");
    for player in &state.players {
        let hand: Vec<String> = player.hand.iter().map(|card| state.card_label(*card)).collect();
        println!(
            "  {}. {:<8} in {:<22} supplies {}  hand [{}]",
            player.turn_order,
            player.name,
            state.map.name(player.location),
            player.supply_cubes,
            hand.join(", ")
        );
    }

    println!("\nLocations:");
    for location in state.map.locations() {
        println!(
            "  {:<22} {:<7} {:<6} supplies {:>2}  plague {}{}",
            location.name,
            location.color.to_string(),
            location.kind.to_string(),
            location.supply_cubes,
            location.plague_cubes,
            if location.has_supply_centre { "  [centre]" } else { "" }
        );
    }

    println!("\nObjectives:");
    for objective in &state.objectives {
        println!("  {objective}");
    }

    if with_log {
        println!("\nLog:");
        for line in &state.log {
            println!("  {line}");
        }
    }
}
