//! プロパティベーステストモジュール
//! ランダムな対局で到達した局面に対して、ルールと探索の不変条件を検証する。

use proptest::prelude::*;
use proptest::sample::Index;

use reversi_engine::{
    ai::{AIStrategy, BoardEvaluator, GreedyAI, MinimaxAI},
    game::{Board, Cell, GameState, Player, Position, ReversiRules, TurnPhase},
    GameError,
};

/// 合法手のインデックス列でランダムに対局を進め、到達した局面と手番を返す
/// 手番のプレイヤーが置けなければパスする
fn play_out(choices: &[Index]) -> (Board, Player) {
    let mut board = Board::new();
    let mut player = Player::Black;

    for choice in choices {
        let moves = ReversiRules::get_valid_moves(&board, player);
        if moves.is_empty() {
            if !ReversiRules::has_valid_moves(&board, player.opposite()) {
                break;
            }
            player = player.opposite();
            continue;
        }
        let position = moves[choice.index(moves.len())];
        ReversiRules::apply_move(&mut board, position, player).unwrap();
        player = player.opposite();
    }

    (board, player)
}

/// ランダム対局の手順を生成する戦略
fn playout_strategy(max_plies: usize) -> impl Strategy<Value = Vec<Index>> {
    prop::collection::vec(any::<Index>(), 0..max_plies)
}

/// プレイヤーを生成する戦略
fn player_strategy() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::Black), Just(Player::White)]
}

proptest! {
    /// プロパティ: 合法手の一覧は「フリップが1個以上ある空マス」と一致する
    #[test]
    fn test_legal_moves_match_flips(choices in playout_strategy(70)) {
        let (board, _) = play_out(&choices);

        for player in [Player::Black, Player::White] {
            let moves = ReversiRules::get_valid_moves(&board, player);
            let expected: Vec<Position> = Position::all()
                .filter(|&p| !ReversiRules::get_flipped_positions(&board, p, player).is_empty())
                .collect();

            prop_assert_eq!(&moves, &expected);
            prop_assert_eq!(moves.is_empty(), !ReversiRules::has_valid_moves(&board, player));
            for position in moves {
                prop_assert!(board.is_empty(position));
            }
        }
    }

    /// プロパティ: 着手で石は 1 + フリップ数だけ増え、フリップされるのは直前まで相手の石だったマスだけ
    #[test]
    fn test_move_adds_one_plus_flips(choices in playout_strategy(60), player in player_strategy()) {
        let (board, _) = play_out(&choices);

        for position in ReversiRules::get_valid_moves(&board, player) {
            let mut next = board.clone();
            let game_move = ReversiRules::apply_move(&mut next, position, player).unwrap();

            prop_assert_eq!(
                next.disc_count() as usize,
                board.disc_count() as usize + 1 + game_move.flipped.len()
            );
            for flipped in &game_move.flipped {
                prop_assert_eq!(board.get_cell(*flipped), Some(player.opposite().to_cell()));
                prop_assert_eq!(next.get_cell(*flipped), Some(player.to_cell()));
            }
            for cell in Position::all() {
                if cell != position && !game_move.flipped.contains(&cell) {
                    prop_assert_eq!(board.get_cell(cell), next.get_cell(cell));
                }
            }
        }
    }

    /// プロパティ: 評価関数はゼロサム
    #[test]
    fn test_evaluation_is_zero_sum(choices in playout_strategy(60)) {
        let (board, _) = play_out(&choices);

        prop_assert_eq!(
            BoardEvaluator::evaluate_board(&board, Player::Black),
            -BoardEvaluator::evaluate_board(&board, Player::White)
        );
    }

    /// プロパティ: 貪欲AIは合法手の中で評価値が最大の手を選ぶ
    #[test]
    fn test_greedy_picks_max_evaluation(
        choices in playout_strategy(60),
        player in player_strategy()
    ) {
        let (board, _) = play_out(&choices);
        let moves = ReversiRules::get_valid_moves(&board, player);
        prop_assume!(!moves.is_empty());

        let choice = GreedyAI::new().calculate_move(&board, player).unwrap();
        let best = moves
            .iter()
            .filter_map(|&p| BoardEvaluator::evaluate_move(&board, p, player))
            .max();

        prop_assert!(moves.contains(&choice.position));
        prop_assert_eq!(choice.score, best);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// プロパティ: ミニマックスは必ず合法手を返す
    #[test]
    fn test_minimax_returns_legal_move(
        choices in playout_strategy(60),
        player in player_strategy(),
        depth in 1u8..=3
    ) {
        let (board, _) = play_out(&choices);
        let moves = ReversiRules::get_valid_moves(&board, player);
        prop_assume!(!moves.is_empty());

        let choice = MinimaxAI::new(depth).calculate_move(&board, player).unwrap();

        prop_assert!(moves.contains(&choice.position));
    }

    /// プロパティ: αβ枝刈りは結果を変えない
    #[test]
    fn test_pruning_matches_full_minimax(
        choices in playout_strategy(60),
        player in player_strategy(),
        depth in 1u8..=3
    ) {
        let (board, _) = play_out(&choices);
        prop_assume!(ReversiRules::has_valid_moves(&board, player));

        let pruned = MinimaxAI::new(depth).calculate_move(&board, player).unwrap();
        let full = MinimaxAI::without_pruning(depth).calculate_move(&board, player).unwrap();

        prop_assert_eq!(pruned.score, full.score);
        prop_assert_eq!(pruned.position, full.position);
        prop_assert!(pruned.nodes_evaluated <= full.nodes_evaluated);
    }

    /// プロパティ: 状態機械を通した対局で石数は減らず、拒否された着手は状態を変えない
    #[test]
    fn test_state_machine_invariants(
        attempts in prop::collection::vec((0usize..8, 0usize..8), 1..120)
    ) {
        let mut game = GameState::new(Player::Black);

        for (row, col) in attempts {
            match game.phase.clone() {
                TurnPhase::GameOver { .. } => {
                    prop_assert!(matches!(
                        game.attempt_human_move(Position::new(row, col).unwrap()),
                        Err(GameError::NotYourTurn)
                    ));
                    break;
                }
                TurnPhase::NotStarted => {
                    prop_assert!(false, "game was not started");
                }
                TurnPhase::Passed { .. } => {
                    game.process_turn();
                }
                TurnPhase::ComputerThinking => {
                    let position = game.valid_moves()[0];
                    let before = game.board.disc_count();
                    game.apply_computer_move(game.epoch, position).unwrap();
                    prop_assert!(game.board.disc_count() > before);
                }
                TurnPhase::AwaitingHumanMove => {
                    let before = game.clone();
                    match game.attempt_human_move(Position::new(row, col).unwrap()) {
                        Ok(game_move) => {
                            prop_assert!(game.role_locked);
                            prop_assert_eq!(
                                game.board.disc_count() as usize,
                                before.board.disc_count() as usize + 1 + game_move.flipped.len()
                            );
                        }
                        Err(err) => {
                            prop_assert!(
                                matches!(err, GameError::IllegalMove { .. }),
                                "unexpected {:?}",
                                err
                            );
                            prop_assert_eq!(&game.board, &before.board);
                            prop_assert_eq!(game.current_player, before.current_player);
                            prop_assert_eq!(&game.phase, &before.phase);
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_opening_scenario() {
    let mut board = Board::with_standard_opening();
    assert_eq!(board.get_cell(Position::new(3, 3).unwrap()), Some(Cell::White));

    let game_move =
        ReversiRules::apply_move(&mut board, Position::new(2, 3).unwrap(), Player::Black).unwrap();

    assert_eq!(game_move.flipped, vec![Position::new(3, 3).unwrap()]);
    assert_eq!(board.count_pieces(), (4, 1));
}
