//! Scenario tests for the game engine.

use std::cell::RefCell;
use std::rc::Rc;
use strictly_lines::{Cell, GameEngine, GameError, GameEvent, GameStatus, MoveLog, Player, Position};

fn recorder(engine: &mut GameEngine) -> Rc<RefCell<Vec<GameEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

fn terminal_events(events: &[GameEvent]) -> Vec<GameEvent> {
    events.iter().copied().filter(GameEvent::is_terminal).collect()
}

#[test]
fn test_top_row_win() {
    let mut engine = GameEngine::new(3).unwrap();
    let events = recorder(&mut engine);

    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(engine.make_move(row, col), Ok(GameStatus::InProgress));
    }
    assert_eq!(engine.make_move(0, 2), Ok(GameStatus::Won(Player::X)));

    assert_eq!(
        terminal_events(&events.borrow()),
        vec![GameEvent::Win {
            position: Position::new(0, 2),
            player: Player::X
        }]
    );
    assert_eq!(events.borrow().len(), 6);
}

#[test]
fn test_draw_declared_before_board_is_full() {
    let mut engine = GameEngine::new(3).unwrap();
    let events = recorder(&mut engine);

    let moves = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0)];
    for (i, (row, col)) in moves.into_iter().enumerate() {
        let status = engine.make_move(row, col).unwrap();
        if i < moves.len() - 1 {
            assert_eq!(status, GameStatus::InProgress, "move {}", i + 1);
        } else {
            assert_eq!(status, GameStatus::Draw);
        }
    }

    assert_eq!(
        terminal_events(&events.borrow()),
        vec![GameEvent::Draw {
            position: Position::new(2, 0),
            player: Player::O
        }]
    );
    assert_eq!(engine.board().get(Position::new(2, 2)), Some(Cell::Empty));
    assert!(!engine.board().is_full());
    assert_eq!(engine.make_move(2, 2), Err(GameError::GameOver));
}

#[test]
fn test_negative_coordinate_rejected() {
    let mut engine = GameEngine::new(3).unwrap();
    let events = recorder(&mut engine);
    engine.make_move(1, 1).unwrap();
    let before = engine.snapshot();

    assert_eq!(
        engine.make_move(-1, 0),
        Err(GameError::IllegalMove { row: -1, col: 0 })
    );
    assert!(!engine.try_move(-1, 0));
    assert_eq!(engine.snapshot(), before);
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn test_no_events_after_game_over() {
    let mut engine = GameEngine::new(3).unwrap();
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        engine.make_move(row, col).unwrap();
    }
    let events = recorder(&mut engine);
    let before = engine.snapshot();

    assert_eq!(engine.make_move(2, 2), Err(GameError::GameOver));
    assert_eq!(engine.make_move(2, 1), Err(GameError::GameOver));
    assert!(events.borrow().is_empty());
    assert_eq!(engine.snapshot(), before);
}

#[test]
fn test_move_made_precedes_outcome() {
    let mut engine = GameEngine::new(2).unwrap();
    let events = recorder(&mut engine);
    engine.make_move(0, 0).unwrap();
    engine.make_move(0, 1).unwrap();
    engine.make_move(1, 0).unwrap();

    let events = events.borrow();
    assert!(matches!(events[2], GameEvent::MoveMade { .. }));
    assert_eq!(
        events[3],
        GameEvent::Win {
            position: Position::new(1, 0),
            player: Player::X
        }
    );
}

#[test]
fn test_win_through_two_lines() {
    let moves = MoveLog::parse(
        "[1,0]\r\n[0,0]\r\n[1,2]\r\n[2,2]\r\n[2,0]\r\n[0,1]\r\n[0,2]\r\n[2,1]\r\n[1,1]",
    );
    assert_eq!(moves.len(), 9);

    let engine = GameEngine::replay(3, moves).unwrap();
    assert_eq!(engine.status(), GameStatus::Won(Player::X));
    assert_eq!(engine.log().last().map(|r| r.position), Some(Position::new(1, 1)));

    let center = Position::new(1, 1);
    let full_lines = engine
        .registry()
        .lines_at(center)
        .iter()
        .filter(|id| {
            engine
                .registry()
                .line(**id)
                .positions()
                .iter()
                .all(|p| engine.board().get(*p) == Some(Cell::Occupied(Player::X)))
        })
        .count();
    assert_eq!(full_lines, 2);
}

#[test]
fn test_board_printer() {
    let mut engine = GameEngine::new(3).unwrap();
    engine.make_move(0, 0).unwrap();
    engine.make_move(2, 1).unwrap();
    assert_eq!(engine.board().to_string(), "[X][_][_]\n[_][_][_]\n[_][O][_]\n");
}

#[test]
fn test_invalid_sizes() {
    for size in [0, 1, strictly_lines::Board::MAX_SIZE + 1, usize::MAX] {
        assert_eq!(
            GameEngine::new(size).err(),
            Some(GameError::InvalidSize { size })
        );
    }
}
