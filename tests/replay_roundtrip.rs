// Replay round-trip tests
//
// Records a short synthetic game the way the live server would (evaluate,
// then log the chosen move), writes it out as JSONL, and checks that the
// replay tool reproduces every decision.

use std::path::PathBuf;

use gradient_snake::config::Config;
use gradient_snake::decision_log::DecisionRecord;
use gradient_snake::replay::ReplayEngine;
use gradient_snake::strategy;
use gradient_snake::types::{Battlesnake, Board, Coord};

fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health: 90,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

fn board(snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
    Board {
        width: 7,
        height: 7,
        food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
        snakes,
        hazards: vec![],
    }
}

/// A few consecutive positions of one game, head first in each body.
fn game_positions() -> Vec<Board> {
    vec![
        board(
            vec![
                snake("you", &[(3, 3), (3, 2), (3, 1)]),
                snake("rival", &[(5, 5), (5, 4), (5, 3)]),
            ],
            &[(1, 3)],
        ),
        board(
            vec![
                snake("you", &[(3, 4), (3, 3), (3, 2)]),
                snake("rival", &[(5, 6), (5, 5), (5, 4)]),
            ],
            &[(1, 3)],
        ),
        board(
            vec![
                snake("you", &[(2, 4), (3, 4), (3, 3)]),
                snake("rival", &[(4, 6), (5, 6), (5, 5)]),
            ],
            &[(1, 3)],
        ),
        board(
            vec![
                snake("you", &[(2, 3), (2, 4), (3, 4)]),
                snake("rival", &[(4, 5), (4, 6), (5, 6)]),
            ],
            &[(1, 3)],
        ),
    ]
}

/// Evaluates every position live and serializes the records, one JSON
/// object per line, the exact format the decision log writes.
fn record_game(config: &Config, path: &PathBuf) {
    let mut lines = String::new();
    for (turn, position) in game_positions().iter().enumerate() {
        let you = position.snakes[0].clone();
        let mut strategy = strategy::build(&config.engine.strategy, config).unwrap();
        let chosen = strategy.evaluate(position, &you).unwrap();

        let record = DecisionRecord {
            game_id: "roundtrip".to_string(),
            turn: turn as i32,
            you_id: you.id.clone(),
            chosen_move: chosen.as_str().to_string(),
            board: position.clone(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        };
        lines.push_str(&serde_json::to_string(&record).unwrap());
        lines.push('\n');
    }
    std::fs::write(path, lines).unwrap();
}

fn temp_log(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!("roundtrip_{}_{}_{}.jsonl", tag, std::process::id(), nanos))
}

#[test]
fn test_influence_log_replays_with_full_agreement() {
    let config = Config::default_hardcoded();
    let path = temp_log("influence");
    record_game(&config, &path);

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    assert_eq!(entries.len(), 4);

    let results = engine.replay_all(&entries).unwrap();
    assert_eq!(results.len(), 4);
    for result in &results {
        assert!(
            result.matches,
            "turn {} replayed {} instead of {}",
            result.turn,
            result.replayed_move.as_str(),
            result.original_move.as_str()
        );
    }

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.mismatches, 0);
    assert!((stats.match_rate - 100.0).abs() < 1e-9);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_greedy_log_replays_with_full_agreement() {
    let mut config = Config::default_hardcoded();
    config.engine.strategy = "greedy".to_string();
    let path = temp_log("greedy");
    record_game(&config, &path);

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    let results = engine.replay_all(&entries).unwrap();
    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_turns, 4);
    assert_eq!(stats.mismatches, 0);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_selected_turns_replay_in_given_order() {
    let config = Config::default_hardcoded();
    let path = temp_log("turns");
    record_game(&config, &path);

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();

    let results = engine.replay_turns(&entries, &[2, 0]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].turn, 2);
    assert_eq!(results[1].turn, 0);
    assert!(results.iter().all(|r| r.matches));

    std::fs::remove_file(&path).ok();
}
