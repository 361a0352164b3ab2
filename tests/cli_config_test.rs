//! Config files and session setup from disk.

use std::io::Write;
use strictly_lines::{GameConfig, GameMode, MatchSession, Player};

#[test]
fn test_session_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "size = 4\nmode = \"player_vs_bot\"\nbot_seed = 3").unwrap();

    let config = GameConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.mode(), GameMode::PlayerVsBot);

    let mut session = MatchSession::new(config).unwrap();
    assert_eq!(session.engine().size(), 4);
    assert_eq!(session.engine().registry().active_count(), 10);

    session.play(0, 0).unwrap();
    let reply = session.bot_turn().unwrap();
    assert!(reply.is_some());
    assert_eq!(session.engine().current_player(), Player::X);
}

#[test]
fn test_seeded_bots_are_reproducible() {
    let play = || {
        let config = GameConfig::default()
            .with_size(5)
            .with_mode(GameMode::PlayerVsBot)
            .with_bot_seed(77);
        let mut session = MatchSession::new(config).unwrap();
        let mut moves = Vec::new();
        session.play(2, 2).unwrap();
        while let Some(pos) = session.bot_turn().unwrap() {
            moves.push(pos);
            let Some(next) = session.engine().board().empty_positions().first().copied() else {
                break;
            };
            if session.engine().is_terminal() {
                break;
            }
            session.play_at(next).unwrap();
        }
        moves
    };
    assert_eq!(play(), play());
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "size = \"big\"").unwrap();
    let err = GameConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}
