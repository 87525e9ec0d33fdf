//! The influence-map move engine.
//!
//! Each turn is a single pass over a padded copy of the board: classify
//! every cell, spread a decaying score mask from each cell that carries a
//! feature, then pick the best-scoring cell next to our head. Cells that
//! kill us outright are pinned to negative infinity so no amount of nearby
//! food can make them attractive, and a short flood probe behind each
//! candidate discounts corridors we would not fit in.
//!
//! The engine never mutates the wire types. All work happens on two grids
//! sized `(width + 2) x (height + 2)` whose outer ring is `Wall`, with
//! every coordinate shifted by (+1, +1) on the way in.

use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::config::{Config, DecayModel, Feature, FeaturesConfig, HungerConfig};
use crate::error::BoardError;
use crate::grid::Grid;
use crate::strategy::Strategy;
use crate::types::{validate_board, Battlesnake, Board, Coord, Direction};

/// Offset from wire coordinates onto the padded grid.
const REBASE: Coord = Coord { x: 1, y: 1 };

/// Slightly above sqrt(2) so the corners of a square window sit inside the
/// straight-line cutoff instead of exactly on it.
const DIAGONAL_REACH: f64 = 1.415;

/// Score contributions snap to multiples of 1/4096. Sums of such values
/// stay exact in an f64 at this engine's magnitudes, so mirror-image
/// candidates tie bit-for-bit no matter what order the masks land in.
const SCORE_GRAIN: f64 = 4096.0;

fn quantize(amount: f64) -> f64 {
    (amount * SCORE_GRAIN).round() / SCORE_GRAIN
}

/// What occupies a cell of the padded grid, from our snake's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Open cell
    Space,
    /// Border padding; never enterable
    Wall,
    /// Head of a rival at least as long as us; losing head-to-head
    Head,
    /// Head of a strictly shorter rival
    WeakHead,
    /// Rival body segment
    Body,
    /// Our own body, head included
    OwnBody,
    /// A body cell that will be vacated next tick
    Tail,
    /// Uncontested food
    Food,
    /// Food a losing head-to-head away from a rival head
    RaceFood,
}

impl CellKind {
    /// Entering this cell this turn means death.
    pub fn is_lethal(self) -> bool {
        matches!(
            self,
            CellKind::Wall | CellKind::Head | CellKind::WeakHead | CellKind::Body | CellKind::OwnBody
        )
    }

    pub fn is_walkable(self) -> bool {
        !self.is_lethal()
    }
}

/// Per-turn snapshot with every coordinate already shifted onto the padded
/// grid. Head is body\[0\]; rivals exclude our own entry in the snake list.
struct TurnView {
    player: Vec<Coord>,
    health: i32,
    rivals: Vec<Vec<Coord>>,
    food: Vec<Coord>,
}

fn rebase(board: &Board, you: &Battlesnake) -> TurnView {
    TurnView {
        player: you.body.iter().map(|&c| c + REBASE).collect(),
        health: you.health,
        rivals: board
            .snakes
            .iter()
            .filter(|s| s.id != you.id)
            .map(|s| s.body.iter().map(|&c| c + REBASE).collect())
            .collect(),
        food: board.food.iter().map(|&c| c + REBASE).collect(),
    }
}

/// The last body cell, if it will actually be vacated next tick. A snake
/// that just ate carries a doubled tail and frees nothing.
fn vacating_tail(body: &[Coord]) -> Option<Coord> {
    if body.len() < 3 {
        return None;
    }
    let last = body[body.len() - 1];
    if last == body[body.len() - 2] {
        None
    } else {
        Some(last)
    }
}

/// The canonical scoring engine. One instance per match; grids are
/// allocated once and reused every turn.
pub struct InfluenceEngine {
    features: FeaturesConfig,
    hunger: HungerConfig,
    decay: DecayModel,
    dead_end_penalty: f64,
    /// Padded width + padded height; the yardstick for "long enough".
    board_scale: i32,
    cells: Grid<CellKind>,
    score: Grid<f64>,
    last_move: Option<Direction>,
}

impl InfluenceEngine {
    pub fn new(config: &Config) -> Self {
        InfluenceEngine {
            features: config.features.clone(),
            hunger: config.hunger.clone(),
            decay: config.engine.decay,
            dead_end_penalty: config.safety.dead_end_penalty,
            board_scale: 0,
            cells: Grid::new(1, 1, CellKind::Space),
            score: Grid::new(1, 1, 0.0),
            last_move: None,
        }
    }

    /// (Re)allocates the grids when the board dimensions change.
    fn fit(&mut self, board: &Board) {
        let width = board.width + 2;
        let height = board.height + 2;
        if self.cells.width() != width || self.cells.height() != height {
            self.cells = Grid::new(width, height, CellKind::Space);
            self.score = Grid::new(width, height, 0.0);
            self.board_scale = width + height;
        }
    }

    /// Food attraction for this turn: stronger when hungry, multiplied
    /// while growing matters (short relative to the board, or some rival
    /// is at least our length).
    fn food_pull(&self, view: &TurnView) -> Feature {
        let base = if view.health < self.hunger.starving_below {
            self.hunger.starving
        } else if view.health < self.hunger.hungry_below {
            self.hunger.hungry
        } else {
            self.hunger.sated
        };
        let own_len = view.player.len() as i32;
        let rival_matches_us = view.rivals.iter().any(|r| r.len() >= view.player.len());
        let factor = if own_len < self.board_scale / 2 {
            self.hunger.growth_spurt_factor
        } else if own_len < self.board_scale || rival_matches_us {
            self.hunger.growth_factor
        } else {
            1.0
        };
        Feature { weight: base.weight * factor, scale: base.scale }
    }

    /// Writes the cell taxonomy for this turn: border walls, our body,
    /// rival bodies with head strength, vacating tails, then food. Later
    /// writers win on overlap.
    fn classify(&mut self, view: &TurnView) {
        self.cells.reset();
        let (w, h) = (self.cells.width(), self.cells.height());
        for x in 0..w {
            self.cells[(x, 0)] = CellKind::Wall;
            self.cells[(x, h - 1)] = CellKind::Wall;
        }
        for y in 0..h {
            self.cells[(0, y)] = CellKind::Wall;
            self.cells[(w - 1, y)] = CellKind::Wall;
        }

        for &segment in &view.player {
            self.cells[segment] = CellKind::OwnBody;
        }
        if let Some(tail) = vacating_tail(&view.player) {
            self.cells[tail] = CellKind::Tail;
        }

        for rival in &view.rivals {
            let head = match rival.first() {
                Some(&head) => head,
                None => continue,
            };
            for &segment in rival {
                self.cells[segment] = CellKind::Body;
            }
            self.cells[head] = if rival.len() >= view.player.len() {
                CellKind::Head
            } else {
                CellKind::WeakHead
            };
            if let Some(tail) = vacating_tail(rival) {
                self.cells[tail] = CellKind::Tail;
            }
        }

        for &food in &view.food {
            let kind = if self.contested(food) { CellKind::RaceFood } else { CellKind::Food };
            self.cells[food] = kind;
        }
    }

    /// Food orthogonally next to a winning rival head is a race we lose.
    fn contested(&self, at: Coord) -> bool {
        Direction::all().iter().any(|d| self.cells[d.apply(&at)] == CellKind::Head)
    }

    /// Rebuilds the score surface from the classified cells: every feature
    /// spreads its mask, every lethal cell is pinned to -inf.
    fn accumulate(&mut self, food_pull: Feature) {
        self.score.reset();
        for y in 0..self.cells.height() {
            for x in 0..self.cells.width() {
                let at = Coord { x, y };
                match self.cells[at] {
                    CellKind::Space => self.spread(at, self.features.space),
                    CellKind::Wall => self.seal(at),
                    CellKind::Head => {
                        self.spread(at, self.features.head);
                        self.seal(at);
                    }
                    CellKind::WeakHead => {
                        self.spread(at, self.features.weak_head);
                        self.seal(at);
                    }
                    CellKind::Body => {
                        self.spread(at, self.features.body);
                        self.seal(at);
                    }
                    CellKind::OwnBody => {
                        self.spread(at, self.features.own_body);
                        self.seal(at);
                    }
                    CellKind::Tail => self.spread(at, self.features.tail),
                    CellKind::Food => self.spread(at, food_pull),
                    CellKind::RaceFood => self.spread(at, self.features.race_food),
                }
            }
        }
    }

    /// Pinning beats any mask that lands later: -inf plus anything finite
    /// stays -inf.
    fn seal(&mut self, at: Coord) {
        self.score[at] = f64::NEG_INFINITY;
    }

    fn spread(&mut self, origin: Coord, feature: Feature) {
        match self.decay {
            DecayModel::Hops => self.spread_hops(origin, feature),
            DecayModel::Euclidean => self.spread_euclidean(origin, feature),
        }
    }

    /// Breadth-first mask: the contribution fades with walkable-path
    /// distance and never leaks through lethal cells. First visit is the
    /// shortest path, so each cell is deposited exactly once.
    fn spread_hops(&mut self, origin: Coord, feature: Feature) {
        let reach = feature.scale.max(0);
        let mut seen: HashMap<Coord, i32> = HashMap::new();
        let mut frontier: VecDeque<(Coord, i32)> = VecDeque::new();
        seen.insert(origin, 0);
        frontier.push_back((origin, 0));
        while let Some((at, hops)) = frontier.pop_front() {
            self.deposit(at, feature.weight, hops as f64 / (reach + 1) as f64);
            if hops == reach {
                continue;
            }
            for dir in Direction::all() {
                let next = dir.apply(&at);
                if seen.contains_key(&next) || self.cells[next].is_lethal() {
                    continue;
                }
                seen.insert(next, hops + 1);
                frontier.push_back((next, hops + 1));
            }
        }
    }

    /// Straight-line mask over a square window, obstacles ignored. The
    /// cutoff is scale * DIAGONAL_REACH so window corners still qualify.
    fn spread_euclidean(&mut self, origin: Coord, feature: Feature) {
        let reach = feature.scale.max(0);
        if reach == 0 {
            self.deposit(origin, feature.weight, 0.0);
            return;
        }
        let cap = reach as f64 * DIAGONAL_REACH;
        for x in (origin.x - reach).max(0)..=(origin.x + reach).min(self.score.width() - 1) {
            for y in (origin.y - reach).max(0)..=(origin.y + reach).min(self.score.height() - 1) {
                let dx = (origin.x - x) as f64;
                let dy = (origin.y - y) as f64;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance <= cap {
                    self.deposit(Coord { x, y }, feature.weight, distance / cap);
                }
            }
        }
    }

    /// `fade` runs 0.0 at the source to 1.0 where influence dies out.
    fn deposit(&mut self, at: Coord, weight: f64, fade: f64) {
        self.score[at] += quantize(weight * (1.0 - fade));
    }

    /// Scores the four cells next to our head, discounts the cramped ones,
    /// and takes the best. Ties go to the earliest direction in the fixed
    /// up, down, left, right order.
    fn select(&mut self, view: &TurnView) -> Direction {
        let head = view.player[0];
        let body_len = view.player.len() as i32;
        let cap = body_len / 2;
        let mut best = Direction::Up;
        let mut best_score = f64::NEG_INFINITY;
        for dir in Direction::all() {
            let target = dir.apply(&head);
            let room = crate::profile!("space", { self.probe_space(target, view) });
            if room < cap {
                let shortfall = 1.0 - room as f64 / body_len as f64;
                let discount = quantize(self.dead_end_penalty * shortfall);
                self.score[target] += discount;
                debug!(
                    "{}: room for {} of {} needed, discount {:.3}",
                    dir.as_str(),
                    room,
                    cap,
                    discount
                );
            }
            let score = self.score[target];
            if score > best_score {
                best_score = score;
                best = dir;
            }
        }
        debug!("selected {} at {:.3}", best.as_str(), best_score);
        best
    }

    /// How much room opens up behind `from`, up to half our body length.
    /// Our trailing segments count as free because they vacate while we
    /// advance; the grid is bit-for-bit restored before returning.
    fn probe_space(&mut self, from: Coord, view: &TurnView) -> i32 {
        let body = &view.player;
        let cap = body.len() as i32 / 2;
        let mut touched: Vec<(Coord, CellKind)> = Vec::new();
        if vacating_tail(body).is_some() {
            let keep = body.len().saturating_sub(cap as usize).max(1);
            for &cell in &body[keep..] {
                if body[..keep].contains(&cell) {
                    continue;
                }
                if self.cells[cell] == CellKind::OwnBody {
                    touched.push((cell, CellKind::OwnBody));
                    self.cells[cell] = CellKind::Tail;
                }
            }
        }
        let depth = self.probe(from, 0, cap);
        for (cell, kind) in touched {
            self.cells[cell] = kind;
        }
        depth
    }

    /// Depth-first crawl through walkable cells. Visited cells are marked
    /// occupied for the duration of their subtree so a loop cannot count
    /// the same cell twice, then restored on the way out.
    fn probe(&mut self, at: Coord, depth: i32, cap: i32) -> i32 {
        if self.cells[at].is_lethal() {
            return depth;
        }
        if depth >= cap {
            return depth;
        }
        let kind = self.cells[at];
        self.cells[at] = CellKind::OwnBody;
        let mut deepest = depth;
        for dir in Direction::all() {
            deepest = deepest.max(self.probe(dir.apply(&at), depth + 1, cap));
        }
        self.cells[at] = kind;
        deepest
    }
}

impl Strategy for InfluenceEngine {
    fn initialize(&mut self, board: &Board, you: &Battlesnake) -> Result<(), BoardError> {
        validate_board(board, you)?;
        self.fit(board);
        Ok(())
    }

    fn evaluate(&mut self, board: &Board, you: &Battlesnake) -> Result<Direction, BoardError> {
        validate_board(board, you)?;
        self.fit(board);
        let view = rebase(board, you);
        let food_pull = self.food_pull(&view);
        crate::profile!("classify", {
            self.classify(&view);
        });
        crate::profile!("score", {
            self.accumulate(food_pull);
        });
        let direction = crate::profile!("select", { self.select(&view) });
        debug!("moving {} (previous {:?})", direction.as_str(), self.last_move);
        self.last_move = Some(direction);
        Ok(direction)
    }
}
