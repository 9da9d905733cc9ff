use crate::game::action::Step;
use crate::game::state::GameState;
use crate::players::{BasePlayer, DumbPlayer, RandomPlayer};

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "D",
        name: "DumbPlayer",
        description: "Builds supply centres when it can, otherwise carries supplies \
                      to the most infected neighbour.",
    },
    CliPlayer {
        code: "R",
        name: "RandomPlayer",
        description: "Takes a random action shape each time.",
    },
];

#[derive(Debug, Clone, Copy)]
pub enum PlayerInstance {
    Dumb(DumbPlayer),
    Random(RandomPlayer),
}

impl BasePlayer for PlayerInstance {
    fn decide(&self, state: &GameState) -> Step {
        match self {
            PlayerInstance::Dumb(p) => p.decide(state),
            PlayerInstance::Random(p) => p.decide(state),
        }
    }
}

pub fn create_player(code: &str) -> Option<PlayerInstance> {
    match code.trim().to_uppercase().as_str() {
        "D" => Some(PlayerInstance::Dumb(DumbPlayer)),
        "R" => Some(PlayerInstance::Random(RandomPlayer)),
        _ => None,
    }
}

/// Parses a comma separated list of bot codes, e.g. `D,D,R,D`.
pub fn parse_players(codes: &str) -> Result<Vec<PlayerInstance>, String> {
    codes
        .split(',')
        .map(|code| create_player(code).ok_or_else(|| format!("unknown player code {code:?}")))
        .collect()
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}
