//! End-to-end selection scenarios for the influence engine
//!
//! Each test drives the public Strategy surface with a hand-built board
//! and checks the chosen direction, the way a live /move request would.

use rand::Rng;

use gradient_snake::config::Config;
use gradient_snake::engine::InfluenceEngine;
use gradient_snake::strategy::Strategy;
use gradient_snake::types::{Battlesnake, Board, Coord, Direction};

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

fn board(width: i32, height: i32, snakes: Vec<Battlesnake>, food: &[(i32, i32)]) -> Board {
    Board {
        width,
        height,
        food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
        snakes,
        hazards: vec![],
    }
}

fn engine() -> InfluenceEngine {
    InfluenceEngine::new(&Config::default_hardcoded())
}

#[test]
fn test_symmetric_board_breaks_ties_up() {
    // A lone single-segment snake at the center of an empty 7x7 board sees
    // four identical candidates; the fixed tie-break order must pick up
    let you = snake("you", &[(3, 3)]);
    let b = board(7, 7, vec![you.clone()], &[]);

    let mut engine = engine();
    assert_eq!(engine.evaluate(&b, &you).unwrap(), Direction::Up);
}

#[test]
fn test_starving_snake_turns_toward_food() {
    let mut you = snake("you", &[(3, 3), (3, 2), (3, 1)]);
    you.health = 20;
    let b = board(7, 7, vec![you.clone()], &[(4, 3)]);

    let mut engine = engine();
    assert_eq!(engine.evaluate(&b, &you).unwrap(), Direction::Right);
}

#[test]
fn test_cramped_corridor_is_not_entered() {
    // Head at (3,0). Left leads into a three-cell pocket under the rival,
    // less than half our body length; up leads into the open middle
    let you = snake(
        "you",
        &[(3, 0), (4, 0), (4, 1), (4, 2), (4, 3), (4, 4), (3, 4), (2, 4)],
    );
    let rival = snake("rival", &[(0, 1), (1, 1), (2, 1)]);
    let b = board(7, 7, vec![you.clone(), rival], &[]);

    let mut engine = engine();
    let chosen = engine.evaluate(&b, &you).unwrap();
    assert_ne!(chosen, Direction::Left, "must not enter the pocket");
    assert_eq!(chosen, Direction::Up);
}

#[test]
fn test_neither_snake_races_for_contested_food() {
    // Equal-length snakes, heads two cells apart, food in the middle: the
    // race is a losing head-to-head for both, so neither steps into it
    let you = snake("you", &[(2, 2), (1, 2), (0, 2)]);
    let rival = snake("rival", &[(4, 2), (5, 2), (6, 2)]);
    let b = board(7, 7, vec![you.clone(), rival.clone()], &[(3, 2)]);

    let mut ours = engine();
    assert_ne!(ours.evaluate(&b, &you).unwrap(), Direction::Right);

    let mut theirs = engine();
    assert_ne!(theirs.evaluate(&b, &rival).unwrap(), Direction::Left);
}

#[test]
fn test_repeated_evaluation_is_stable() {
    // The same instance must keep giving the same answer: every turn
    // rebuilds both grids and the space probe restores what it touches
    let you = snake("you", &[(2, 2), (2, 1), (3, 1), (4, 1)]);
    let rival = snake("rival", &[(4, 4), (4, 5), (3, 5)]);
    let b = board(7, 7, vec![you.clone(), rival], &[(0, 6), (6, 0)]);

    let mut engine = engine();
    let first = engine.evaluate(&b, &you).unwrap();
    for _ in 0..10 {
        assert_eq!(engine.evaluate(&b, &you).unwrap(), first);
    }
}

#[test]
fn test_fresh_engines_agree_on_random_boards() {
    let mut rng = rand::rng();

    for round in 0..50 {
        let (b, you) = random_board(&mut rng);

        let mut first = engine();
        let mut second = engine();
        let a = first.evaluate(&b, &you).unwrap();
        let c = second.evaluate(&b, &you).unwrap();
        assert_eq!(a, c, "round {} diverged on {:?}", round, b);

        // And a second pass on a used instance matches the fresh one
        assert_eq!(first.evaluate(&b, &you).unwrap(), a, "round {} drifted", round);
    }
}

/// Random but always valid position: snakes are in-bounds random walks
/// (self-overlap allowed), food never lands on a snake.
fn random_board(rng: &mut impl Rng) -> (Board, Battlesnake) {
    let mut occupied = std::collections::HashSet::new();
    let mut snakes = Vec::new();
    for id in 0..rng.random_range(1..=3) {
        let len = rng.random_range(1..=6);
        let mut body = Vec::new();
        let mut cell = Coord { x: rng.random_range(0..7), y: rng.random_range(0..7) };
        for _ in 0..len {
            body.push(cell);
            occupied.insert(cell);
            let next = Direction::all()[rng.random_range(0..4)].apply(&cell);
            if next.x >= 0 && next.x < 7 && next.y >= 0 && next.y < 7 {
                cell = next;
            }
        }
        let body: Vec<(i32, i32)> = body.iter().map(|c| (c.x, c.y)).collect();
        snakes.push(snake(&format!("s{}", id), &body));
    }
    let mut food = Vec::new();
    for _ in 0..rng.random_range(0..4) {
        let cell = Coord { x: rng.random_range(0..7), y: rng.random_range(0..7) };
        if !occupied.contains(&cell) {
            food.push((cell.x, cell.y));
        }
    }
    let you = snakes[0].clone();
    (board(7, 7, snakes, &food), you)
}
