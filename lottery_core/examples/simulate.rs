use lottery_core::{GameSettings, LotteryGame, ProvablyFairRng, ScriptedUi};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example end-to-end game with a scripted human player
    let server_seed = "example-server-seed";
    let client_seed = "example-client-seed";
    let rng = ProvablyFairRng::new(server_seed, client_seed, 1);
    let commitment = rng.server_seed_hash_hex();

    let ui = ScriptedUi::new(["3", "y", "5", "y", "1", "n"]);
    let mut game = LotteryGame::new(GameSettings::default(), ui, rng)?.with_human_name("Demo Player");
    game.initialize_game()?;
    let summary = game.run_game_loop()?;

    for line in game.ui().outputs() {
        println!("{line}");
    }
    println!(
        "server_seed_hash={} server_seed={} draws={} rounds={} profit={}",
        commitment,
        server_seed,
        game.rng().cursor(),
        summary.rounds_played,
        summary.lottery_profit
    );
    Ok(())
}
