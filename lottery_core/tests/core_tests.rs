use std::collections::HashSet;

use lottery_core::{
    draw_prizes, DrawOutcome, DrawParams, GameSettings, LotteryGame, Participant, ParticipantKind,
    PrizeDistribution, ProvablyFairRng, RandomSource, ScriptedRandom, ScriptedUi, SeededRandom,
    HOUSE_CUT,
};
use rust_decimal::Decimal;

fn dollars(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

fn game_with(rng: ScriptedRandom) -> LotteryGame<ScriptedUi, ScriptedRandom> {
    LotteryGame::new(GameSettings::default(), ScriptedUi::default(), rng).unwrap()
}

#[test]
fn draw_distributes_prizes_by_tier() {
    // pool: [0,0,0,0,0,1,1,1,2,2]; grand -> 0, second -> 1, third -> 2
    let mut game = game_with(ScriptedRandom::new([0, 5, 8]).with_fallback(0));
    game.participants_mut().extend([
        Participant::human("Player1", dollars(10)).with_tickets(5),
        Participant::automated("Player2", dollars(10)).with_tickets(3),
        Participant::automated("Player3", dollars(10)).with_tickets(2),
    ]);

    let DrawOutcome::Drawn(result) = game.draw_prizes().unwrap() else {
        panic!("expected a draw");
    };

    let revenue = dollars(10);
    let balances: Vec<Decimal> = game.participants().iter().map(|p| p.balance).collect();
    assert_eq!(
        balances,
        vec![
            dollars(10) + revenue * Decimal::new(5, 1),
            dollars(10) + revenue * Decimal::new(3, 1),
            dollars(10) + revenue * Decimal::new(1, 1),
        ]
    );
    assert_eq!(result.second_tier_target, 1);
    assert_eq!(result.third_tier_target, 2);
    assert_eq!(result.total_awarded(), revenue * Decimal::new(9, 1));
    assert_eq!(game.ui().count_containing("Prizes distributed"), 1);
    assert!(game.ui().contains("(Winner: Player1)"));
    assert!(game.ui().contains("Third - $1.00 shared by 1 winners"));
}

#[test]
fn house_earns_ten_percent() {
    let mut game = game_with(ScriptedRandom::default().with_fallback(0));
    game.participants_mut().extend([
        Participant::human("Player1", dollars(10)).with_tickets(4),
        Participant::automated("Player2", dollars(10)).with_tickets(6),
    ]);

    game.draw_prizes().unwrap();

    assert_eq!(game.lottery_profit(), Decimal::ONE);
    assert!(game.ui().contains("Lottery profit for this round: $1.00"));
}

#[test]
fn lifetime_profit_accumulates_and_resets() {
    // every slot belongs to player 0, and 1 is also a valid player count
    let mut game = game_with(ScriptedRandom::default().with_fallback(1));
    game.initialize_game().unwrap();
    for tickets in [10, 20, 5] {
        for p in game.participants_mut().iter_mut() {
            p.tickets_purchased = 0;
        }
        game.participants_mut()[0].tickets_purchased = tickets;
        game.draw_prizes().unwrap();
    }
    assert_eq!(game.lottery_profit(), Decimal::new(35, 1));

    game.initialize_game().unwrap();
    assert_eq!(game.lottery_profit(), Decimal::ZERO);
}

#[test]
fn no_tickets_shows_message_once() {
    let mut game = game_with(ScriptedRandom::new([2]));
    game.initialize_game().unwrap();
    let before = game.participants().to_vec();

    let outcome = game.draw_prizes().unwrap();

    assert_eq!(outcome, DrawOutcome::NoTickets);
    assert_eq!(game.ui().count_containing("No tickets purchased this round."), 1);
    assert_eq!(game.participants(), before.as_slice());
    assert_eq!(game.lottery_profit(), Decimal::ZERO);
}

#[test]
fn initialize_game_seats_human_and_automated_players() {
    let mut game = game_with(ScriptedRandom::new([2]));

    game.initialize_game().unwrap();

    assert_eq!(game.rng().calls(), &[(1, 4)]);
    let players = game.participants();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].kind, ParticipantKind::Human);
    assert_eq!(players[0].name, "Human Player");
    assert!(players[1..].iter().all(|p| p.kind == ParticipantKind::Automated));
    assert_eq!(players[2].name, "CPU Player 2");
    assert!(players.iter().all(|p| p.balance == dollars(10)));
}

/// Random ticket holdings, some of them empty.
fn random_players(rng: &mut SeededRandom) -> Vec<Participant> {
    let count = rng.next(1, 8).unwrap();
    (0..count)
        .map(|i| {
            let tickets = rng.next(0, 12).unwrap() as u32;
            Participant::automated(format!("P{i}"), dollars(100)).with_tickets(tickets)
        })
        .collect()
}

#[test]
fn draw_invariants_hold_across_seeds() {
    let mut setup = SeededRandom::new(2024);
    let params = DrawParams {
        ticket_price: Decimal::new(250, 2),
        prize_distribution: PrizeDistribution::default(),
    };

    for seed in 0..300u64 {
        let mut players = random_players(&mut setup);
        let before = players.clone();
        let outcome = draw_prizes(&mut players, &params, &mut SeededRandom::new(seed)).unwrap();

        let DrawOutcome::Drawn(result) = outcome else {
            assert!(before.iter().all(|p| p.tickets_purchased == 0));
            assert_eq!(players, before);
            continue;
        };

        // credits match the recorded awards exactly
        let delta: Decimal = players
            .iter()
            .zip(&before)
            .map(|(after, before)| after.balance - before.balance)
            .sum();
        assert_eq!(delta, result.total_awarded());
        assert!(result.total_awarded() <= result.revenue);

        // at most one award per participant, never to an empty holder
        let mut seen = HashSet::new();
        for award in &result.awards {
            assert!(seen.insert(award.participant), "seed {seed}: repeat winner");
            assert!(before[award.participant].tickets_purchased > 0);
        }

        assert_eq!(result.round_profit, result.revenue * HOUSE_CUT);
        assert!(result.second_tier_winners.len() <= result.second_tier_target);
        assert!(result.third_tier_winners.len() <= result.third_tier_target);

        let all_tiers_paid = result.grand_winner.is_some()
            && (!result.second_tier_winners.is_empty())
            && (!result.third_tier_winners.is_empty());
        if all_tiers_paid {
            assert_eq!(
                result.total_awarded(),
                result.grand_prize_amount
                    + result.second_tier_pool_amount
                    + result.third_tier_pool_amount
            );
        }
    }
}

fn grand_win_rate(players: &[Participant], heavy: usize) -> f64 {
    let params = DrawParams::from(&GameSettings::default());
    let mut rng = SeededRandom::new(77);
    let rounds = 2000;
    let mut wins = 0;
    for _ in 0..rounds {
        let mut ps = players.to_vec();
        if let DrawOutcome::Drawn(result) = draw_prizes(&mut ps, &params, &mut rng).unwrap() {
            if result.grand_winner == Some(heavy) {
                wins += 1;
            }
        }
    }
    f64::from(wins) / f64::from(rounds)
}

#[test]
fn grand_prize_is_weighted_by_tickets_in_any_order() {
    let heavy = Participant::automated("heavy", dollars(10)).with_tickets(9);
    let light = Participant::automated("light", dollars(10)).with_tickets(1);

    let forward = grand_win_rate(&[heavy.clone(), light.clone()], 0);
    let reversed = grand_win_rate(&[light, heavy], 1);

    // very loose bounds around the expected 0.9
    assert!((0.85..=0.95).contains(&forward), "forward {forward}");
    assert!((0.85..=0.95).contains(&reversed), "reversed {reversed}");
}

#[test]
fn scripted_game_runs_until_declined() {
    let ui = ScriptedUi::new(["3", "y", "2", "n"]);
    let mut game = LotteryGame::new(GameSettings::default(), ui, SeededRandom::new(5))
        .unwrap()
        .with_human_name("Alice");
    game.initialize_game().unwrap();

    let summary = game.run_game_loop().unwrap();

    assert_eq!(summary.rounds_played, 2);
    assert_eq!(game.rounds_played(), 2);
    assert_eq!(game.settings().max_tickets_per_round, 10);
    assert_eq!(summary.lottery_profit, game.lottery_profit());
    assert!(summary.lottery_profit > Decimal::ZERO);
    let ui = game.ui();
    assert_eq!(ui.count_containing("Welcome to the Lottery Game!"), 1);
    assert_eq!(ui.count_containing("Do you want to play another round?"), 2);
    assert!(ui.contains("Alice purchased 3 tickets"));
    assert!(ui.contains("Alice purchased 2 tickets"));
    assert!(ui.contains("Alice has a balance of"));
    assert!(ui.contains("Thanks for playing! Rounds played: 2."));
}

#[test]
fn game_stops_when_everyone_is_broke() {
    let settings = GameSettings {
        starting_balance: Decimal::ONE,
        min_automated_players: 1,
        max_automated_players: 1,
        prize_distribution: PrizeDistribution {
            grand_prize_fraction: Decimal::ZERO,
            second_tier_fraction: Decimal::ZERO,
            third_tier_fraction: Decimal::ZERO,
        },
        ..GameSettings::default()
    };
    // one automated player, it wants one ticket, grand draw hits slot 0
    let rng = ScriptedRandom::new([1, 1, 0]);
    let mut game = LotteryGame::new(settings, ScriptedUi::new(["1", "y"]), rng).unwrap();
    game.initialize_game().unwrap();

    let summary = game.run_game_loop().unwrap();

    assert_eq!(summary.rounds_played, 1);
    assert_eq!(summary.lottery_profit, Decimal::new(2, 1));
    assert!(game.ui().contains("Nobody can afford another ticket"));
    assert!(!game.ui().contains("Do you want to play another round?"));
}

#[test]
fn provably_fair_games_replay_identically() {
    let play = || {
        let ui = ScriptedUi::new(["4", "y", "1", "n"]);
        let rng = ProvablyFairRng::new("server-secret", "client", 1);
        let mut game = LotteryGame::new(GameSettings::default(), ui, rng).unwrap();
        game.initialize_game().unwrap();
        game.run_game_loop().unwrap();
        let (ui, rng) = game.into_parts();
        (ui.outputs().to_vec(), rng.cursor())
    };
    assert_eq!(play(), play());
}

#[test]
fn invalid_settings_are_rejected() {
    let settings = GameSettings {
        ticket_price: Decimal::ZERO,
        ..GameSettings::default()
    };
    assert!(LotteryGame::new(settings, ScriptedUi::default(), ScriptedRandom::default()).is_err());
}
