use std::{cell::RefCell, rc::Rc};

use blocktris_engine::{
    Block, Board, BoardConfig, BoardEvent, ConfigError, InvalidBoardSizeError, PieceKind,
    PieceSeed, Position,
};

const SEED: PieceSeed = PieceSeed::from_bytes([0x5A; 16]);

fn filled_cells(board: &Board) -> Vec<(usize, usize, Block)> {
    let mut cells = Vec::new();
    for (y, row) in board.blocks().into_iter().enumerate() {
        for (x, block) in row.into_iter().enumerate() {
            if !block.is_empty() {
                cells.push((x, y, block));
            }
        }
    }
    cells
}

#[test]
fn random_piece_freezes_into_exactly_four_cells() {
    let mut board = Board::with_seed(10, 20, [], SEED).unwrap();
    let kind = board.current_piece().kind();

    while board.move_down() {}

    let cells = filled_cells(&board);
    assert_eq!(cells.len(), 4);
    assert!(cells.iter().all(|(_, _, block)| *block == Block::Piece(kind)));
    assert!(cells.iter().any(|(_, y, _)| *y == 0));
    assert!(!board.is_game_over());
}

#[test]
fn narrow_board_is_rejected() {
    assert_eq!(
        Board::new(4, 20, []).unwrap_err(),
        InvalidBoardSizeError {
            width: 4,
            height: 20
        }
    );
    assert!(matches!(
        BoardConfig::from_json_str(r#"{ "width": 4 }"#),
        Err(ConfigError::Size(_))
    ));
}

#[test]
fn completed_row_is_cleared_and_scored() {
    let mut board = Board::with_seed(10, 20, [PieceKind::I, PieceKind::I, PieceKind::O], SEED)
        .unwrap();
    let events = board.subscribe_channel();

    while board.move_left() {}
    board.hard_drop();
    board.hard_drop();
    while board.move_right() {}
    board.hard_drop();

    // Only the top half of the O remains, shifted down to the floor.
    let o = Block::Piece(PieceKind::O);
    assert_eq!(filled_cells(&board), [(8, 0, o), (9, 0, o)]);
    assert_eq!(board.info().score(), 100);
    assert_eq!(board.info().line_count(), 1);
    assert_eq!(board.info().level(), 1);

    let cleared: Vec<_> = events
        .try_iter()
        .filter(BoardEvent::is_line_cleared)
        .collect();
    assert_eq!(cleared.len(), 1);
    assert_eq!(cleared[0].info().unwrap().score(), 100);
}

#[test]
fn piece_copies_do_not_alias_the_board() {
    let mut board = Board::with_seed(10, 20, [PieceKind::S, PieceKind::Z], SEED).unwrap();

    let mut current = board.current_piece();
    let mut next = board.next_piece();
    current.move_down();
    current.rotate();
    next.move_left();

    assert_eq!(board.current_piece().position(), Position::new(4, 20));
    assert_eq!(board.current_piece().rotation().index(), 0);
    assert_eq!(board.next_piece().position(), Position::new(4, 20));

    let mut snapshot = board.info_snapshot();
    board.level_up();
    assert_eq!(snapshot.level(), 1);
    snapshot = board.info_snapshot();
    assert_eq!(snapshot.level(), 2);
}

#[test]
fn observers_see_a_whole_turn_in_order() {
    let mut board = Board::with_seed(10, 20, [PieceKind::T, PieceKind::L], SEED).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let id = board.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    assert!(board.rotate());
    assert!(board.move_right());
    let fell = board.hard_drop();

    {
        let log = log.borrow();
        // rotate, move_right, every successful move_down, freeze, info
        assert_eq!(log.len(), 2 + fell + 2);
        assert!(log[..2 + fell].iter().all(BoardEvent::is_move_applied));
        assert!(log[2 + fell].is_piece_froze());
        let info = log[3 + fell].info().unwrap();
        assert_eq!(info.next_piece(), board.next_piece());
        assert_eq!(board.current_piece().kind(), PieceKind::L);
    }

    assert!(board.unsubscribe(id));
    board.move_left();
    assert_eq!(log.borrow().len(), 2 + fell + 2);
    assert_eq!(board.observer_count(), 0);
}

#[test]
fn config_round_trip_builds_same_game() {
    let config = BoardConfig {
        width: 8,
        height: 16,
        pieces: vec![PieceKind::J, PieceKind::T],
        seed: Some(SEED),
    };
    let json = serde_json::to_string(&config).unwrap();
    let parsed = BoardConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed, config);

    let mut a = Board::from_config(&config).unwrap();
    let mut b = Board::from_config(&parsed).unwrap();
    for _ in 0..6 {
        a.hard_drop();
        b.hard_drop();
        assert_eq!(a.current_piece(), b.current_piece());
        assert_eq!(a.blocks(), b.blocks());
    }
}
