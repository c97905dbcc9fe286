use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lottery_core::{
    derive_hash_hex, GameSettings, LotteryGame, ProvablyFairRng, RandomSource, SeededRandom,
    DEFAULT_HUMAN_NAME,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleUi;

#[derive(Parser)]
#[command(name = "lottery", about = "Repeated-round lottery simulation", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// JSON settings file; built-in defaults when omitted
    #[arg(long, global = true, env = "LOTTERY_SETTINGS")]
    settings: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(flatten)]
    play: PlayArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective settings as JSON
    ShowSettings,
    /// Check a revealed server seed against the hash published before play
    VerifySeed {
        server_seed: String,
        server_seed_hash: String,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// Name of the human player
    #[arg(long, env = "LOTTERY_PLAYER_NAME", default_value = DEFAULT_HUMAN_NAME)]
    player_name: String,
    /// Seed for a reproducible game
    #[arg(long, env = "LOTTERY_SEED", conflicts_with = "server_seed")]
    seed: Option<u64>,
    /// Secret seed for a provably fair game; its hash is printed before play
    #[arg(long, env = "LOTTERY_SERVER_SEED")]
    server_seed: Option<String>,
    #[arg(long, env = "LOTTERY_CLIENT_SEED", default_value = "lottery")]
    client_seed: String,
    #[arg(long, env = "LOTTERY_NONCE", default_value_t = 1)]
    nonce: u64,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<GameSettings> {
    match path {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(GameSettings::default()),
    }
}

fn play(settings: GameSettings, args: PlayArgs) -> anyhow::Result<()> {
    let (rng, server_seed): (Box<dyn RandomSource>, Option<String>) =
        match (args.server_seed, args.seed) {
            (Some(server_seed), _) => {
                let rng = ProvablyFairRng::new(server_seed.clone(), args.client_seed, args.nonce);
                println!(
                    "Server seed hash: {} (client seed {}, nonce {})",
                    rng.server_seed_hash_hex(),
                    rng.client_seed(),
                    rng.nonce()
                );
                (Box::new(rng), Some(server_seed))
            }
            (None, Some(seed)) => {
                info!(seed, "using seeded random source");
                (Box::new(SeededRandom::new(seed)), None)
            }
            (None, None) => (Box::new(SeededRandom::from_entropy()), None),
        };

    let mut game = LotteryGame::new(settings, ConsoleUi, rng)?.with_human_name(args.player_name);
    game.initialize_game()?;
    let summary = game.run_game_loop()?;

    if let Some(server_seed) = server_seed {
        println!("Revealed server seed: {server_seed}");
    }
    info!(
        rounds = summary.rounds_played,
        profit = %summary.lottery_profit,
        "session finished"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Some(Commands::ShowSettings) => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Some(Commands::VerifySeed {
            server_seed,
            server_seed_hash,
        }) => {
            let actual = derive_hash_hex(server_seed.as_bytes());
            if !actual.eq_ignore_ascii_case(server_seed_hash.trim()) {
                anyhow::bail!("server seed hashes to {actual}, not {server_seed_hash}");
            }
            println!("Server seed matches hash {actual}");
        }
        None => play(settings, cli.play)?,
    }

    Ok(())
}
