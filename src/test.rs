#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};
    use std::time::Duration;

    use crate::evaluation::{evaluate, WIN_SCORE};
    use crate::move_ordering::order_columns;
    use crate::search::{alpha_beta, negascout, search_root_parallel, INFINITY};
    use crate::*;

    type SmallBoard = BitBoard<4, 4>;

    const STANDARD_POSITIONS: [&str; 6] = ["", "4", "4435", "434452", "334455", "121212"];
    const SMALL_POSITIONS: [&str; 3] = ["2323", "123421", "223314"];

    /// Plain minimax over the same move order, with no pruning
    fn minimax<P: Position>(
        position: &P,
        context: &SearchContext,
        player: Player,
        depth: usize,
    ) -> (i32, Option<usize>) {
        if position.is_terminal() || context.depth_reached(depth) {
            return (evaluate(position, context), None);
        }
        let maximizing = player == context.max_player();
        let mut best = (if maximizing { -INFINITY } else { INFINITY }, None);
        for column in order_columns(position, context) {
            let (score, _) = minimax(&position.successor(column), context, player.other(), depth + 1);
            if (maximizing && score > best.0) || (!maximizing && score < best.0) {
                best = (score, Some(column));
            }
        }
        best
    }

    fn search<P: Position>(algorithm: Algorithm, position: &P, depth: usize) -> Result<SearchOutcome> {
        Ok(search_position(algorithm, SearchConfig::default(), position, depth)?)
    }

    fn score(outcome: &SearchOutcome) -> Result<i32> {
        outcome.score.ok_or(anyhow!("search did not complete"))
    }

    #[test]
    pub fn immediate_win_at_depth_one() -> Result<()> {
        // player 1 has three tiles stacked in column 1
        let board = StandardBoard::from_moves("121212")?;

        for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
            let outcome = search(algorithm, &board, 1)?;
            assert_eq!(outcome.column, 0);
            // the win is scored as decided even though it sits on the depth bound
            assert_eq!(score(&outcome)?, WIN_SCORE - 4);
        }
        Ok(())
    }

    #[test]
    pub fn immediate_win_for_second_player() -> Result<()> {
        //  Y
        //  Y
        // RYR  RR
        let board = StandardBoard::from_moves("1232627")?;
        assert_eq!(board.next_to_move(), Player::Second);
        let outcome = search(Algorithm::NegaScout, &board, 1)?;
        assert_eq!(outcome.column, 1);
        assert_eq!(score(&outcome)?, WIN_SCORE - 4);

        // at greater depths the quickest win is still preferred
        let outcome = search(Algorithm::AlphaBeta, &board, 4)?;
        assert_eq!(outcome.column, 1);
        assert_eq!(score(&outcome)?, WIN_SCORE - 4);
        Ok(())
    }

    #[test]
    pub fn blocks_opponent_win() -> Result<()> {
        // player 2 threatens to complete column 2, player 1 must block it
        let board = StandardBoard::from_moves("123252")?;
        for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
            assert_eq!(search(algorithm, &board, 2)?.column, 1);
        }
        Ok(())
    }

    #[test]
    pub fn evaluation_is_antisymmetric() -> Result<()> {
        for moves in STANDARD_POSITIONS.iter().chain(["44444", "1234567"].iter()) {
            let board = StandardBoard::from_moves(moves)?;
            if board.is_terminal() {
                continue;
            }
            let first = SearchContext::for_player(&board, Player::First, 0)?;
            let second = SearchContext::for_player(&board, Player::Second, 0)?;
            assert_eq!(evaluate(&board, &first), -evaluate(&board, &second), "{}", moves);
        }
        Ok(())
    }

    #[test]
    pub fn terminal_scores() -> Result<()> {
        let won = StandardBoard::from_moves("1212121")?;
        let winner = SearchContext::for_player(&won, Player::First, 0)?;
        let loser = SearchContext::for_player(&won, Player::Second, 0)?;
        // player 1 won with their 4th tile
        assert_eq!(evaluate(&won, &winner), WIN_SCORE - 4);
        assert_eq!(evaluate(&won, &loser), -WIN_SCORE + 4);

        let mut drawn = BitBoard::<3, 3>::new();
        for &column in [0, 1, 2, 0, 1, 2, 0, 1, 2].iter() {
            drawn = drawn.successor(column);
        }
        let context = SearchContext::new(&drawn, 0)?;
        assert_eq!(drawn.status(), GameStatus::Draw);
        assert_eq!(evaluate(&drawn, &context), 0);
        Ok(())
    }

    #[test]
    pub fn opening_prefers_the_centre() -> Result<()> {
        let board = StandardBoard::new();
        for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
            assert_eq!(search(algorithm, &board, 4)?.column, 3);
        }
        Ok(())
    }

    #[test]
    pub fn algorithms_agree_on_standard_board() -> Result<()> {
        for moves in STANDARD_POSITIONS.iter() {
            let board = StandardBoard::from_moves(moves)?;
            for depth in 1..=5 {
                let ab = search(Algorithm::AlphaBeta, &board, depth)?;
                let ns = search(Algorithm::NegaScout, &board, depth)?;
                assert_eq!(score(&ab)?, score(&ns)?, "{} at depth {}", moves, depth);
            }
        }
        Ok(())
    }

    #[test]
    pub fn pruning_matches_minimax_on_small_board() -> Result<()> {
        for moves in SMALL_POSITIONS.iter() {
            let board = SmallBoard::from_moves(moves)?;
            let remaining = 16 - board.num_moves();

            for depth in 1..=remaining {
                let context = SearchContext::new(&board, depth)?;
                let (expected_score, expected_column) =
                    minimax(&board, &context, context.max_player(), 0);

                let ab = search(Algorithm::AlphaBeta, &board, depth)?;
                assert_eq!(Some(ab.column), expected_column, "{} at depth {}", moves, depth);
                assert_eq!(score(&ab)?, expected_score, "{} at depth {}", moves, depth);

                let ns = search(Algorithm::NegaScout, &board, depth)?;
                assert_eq!(score(&ns)?, expected_score, "{} at depth {}", moves, depth);
                // negascout may pick a different column, but it must be worth as much
                let (column_score, _) =
                    minimax(&board.successor(ns.column), &context, context.min_player(), 1);
                assert_eq!(column_score, expected_score, "{} at depth {}", moves, depth);
            }
        }
        Ok(())
    }

    #[test]
    pub fn unbounded_depth_searches_to_the_end() -> Result<()> {
        let board = SmallBoard::from_moves("123421")?;
        let full = search(Algorithm::AlphaBeta, &board, 0)?;
        let exact = search(Algorithm::AlphaBeta, &board, 16 - board.num_moves())?;
        assert_eq!(full, exact);

        let context = SearchContext::new(&board, 0)?;
        assert_eq!(context.depth_bound(), None);
        let (expected, _) = minimax(&board, &context, context.max_player(), 0);
        assert_eq!(score(&search(Algorithm::NegaScout, &board, 0)?)?, expected);
        Ok(())
    }

    #[test]
    pub fn negascout_visits_fewer_nodes() -> Result<()> {
        for moves in ["", "4435"].iter() {
            let board = StandardBoard::from_moves(moves)?;
            let ab = search(Algorithm::AlphaBeta, &board, 5)?;
            let ns = search(Algorithm::NegaScout, &board, 5)?;
            assert!(
                ns.stats.nodes < ab.stats.nodes,
                "{}: negascout {} nodes, alpha-beta {} nodes",
                moves,
                ns.stats.nodes,
                ab.stats.nodes
            );
        }
        Ok(())
    }

    #[test]
    pub fn parallel_root_matches_sequential() -> Result<()> {
        let parallel = SearchConfig {
            parallel: true,
            ..SearchConfig::default()
        };
        for moves in STANDARD_POSITIONS.iter() {
            let board = StandardBoard::from_moves(moves)?;
            for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
                let sequential = search(algorithm, &board, 4)?;
                let split = search_position(algorithm, parallel, &board, 4)?;
                assert_eq!(split.column, sequential.column, "{} with {}", moves, algorithm);
                assert_eq!(split.score, sequential.score, "{} with {}", moves, algorithm);
            }
        }
        Ok(())
    }

    #[test]
    pub fn parallel_root_scores_a_finished_game() -> Result<()> {
        let won = StandardBoard::from_moves("1212121")?;
        let context = SearchContext::for_player(&won, Player::First, 4)?;
        let mut root = SearchNode::root(won);
        let mut stats = SearchStats::default();
        let value = search_root_parallel(&mut root, &context, &mut stats, |_, _| {
            Err(SearchError::NoLegalColumns)
        })?;
        assert_eq!(value, WIN_SCORE - 4);
        assert_eq!(root.best_child, None);
        assert_eq!(stats.nodes, 1);
        Ok(())
    }

    #[test]
    pub fn search_nodes_are_recorded() -> Result<()> {
        let board = StandardBoard::from_moves("4435")?;
        let context = SearchContext::new(&board, 3)?;
        let mut root = SearchNode::root(board);
        let mut stats = SearchStats::default();
        let value = alpha_beta::search(
            &mut root,
            &context,
            context.max_player(),
            -INFINITY,
            INFINITY,
            0,
            &mut stats,
        )?;
        assert_eq!(root.column, None);
        let best = root.best_child.ok_or(anyhow!("no column chosen"))?;
        assert!(board.possible_columns().contains(&best));
        assert_eq!(root.child(best).column, Some(best));

        // negamax scores are from the player to move, the root player maximizes
        let mut root = SearchNode::root(board);
        let mut ns_stats = SearchStats::default();
        let ns_value = negascout::search(
            &mut root,
            &context,
            context.max_player(),
            -INFINITY,
            INFINITY,
            0,
            &mut ns_stats,
        )?;
        assert_eq!(value, ns_value);
        assert!(stats.nodes > 1 && ns_stats.nodes > 1);
        Ok(())
    }

    #[test]
    pub fn terminal_position_is_rejected() -> Result<()> {
        let board = StandardBoard::from_moves("1212121")?;
        for mut agent in vec![Agent::alpha_beta(), Agent::negascout(), Agent::random_seeded(1)] {
            let err = agent
                .choose_column(&board, 4)
                .expect_err("game is already over");
            assert_eq!(
                err.downcast_ref::<SearchError>(),
                Some(&SearchError::TerminalPosition)
            );
        }
        Ok(())
    }

    #[test]
    pub fn deadline_returns_a_legal_column() -> Result<()> {
        let config = SearchConfig {
            time_limit: Some(Duration::from_secs(0)),
            parallel: false,
        };
        let board = StandardBoard::new();
        for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
            let outcome = search_position(algorithm, config, &board, 0)?;
            assert_eq!(outcome.score, None);
            // nothing finished, so the first column in move order is played
            assert_eq!(outcome.column, 3);
        }

        let mut agent = Agent::search(
            Algorithm::NegaScout,
            SearchConfig {
                parallel: true,
                ..config
            },
        );
        let board = StandardBoard::from_moves("4435")?;
        assert!(board.possible_columns().contains(&agent.choose_column(&board, 0)?));
        Ok(())
    }

    #[test]
    pub fn generous_deadline_completes() -> Result<()> {
        let config = SearchConfig {
            time_limit: Some(Duration::from_secs(600)),
            parallel: false,
        };
        let board = StandardBoard::from_moves("4435")?;
        let limited = search_position(Algorithm::NegaScout, config, &board, 3)?;
        let unlimited = search(Algorithm::NegaScout, &board, 3)?;
        assert_eq!(limited, unlimited);
        Ok(())
    }

    /// Delegates to a real board but misreports its legal columns or lines
    #[derive(Clone)]
    struct BrokenBoard {
        board: StandardBoard,
        too_many_lines: bool,
    }

    impl Position for BrokenBoard {
        fn width(&self) -> usize {
            self.board.width()
        }
        fn possible_columns(&self) -> Vec<usize> {
            Vec::new()
        }
        fn successor(&self, column: usize) -> Self {
            Self {
                board: self.board.successor(column),
                ..self.clone()
            }
        }
        fn status(&self) -> GameStatus {
            self.board.status()
        }
        fn player_tokens(&self, player: Player) -> u64 {
            self.board.player_tokens(player)
        }
        fn next_to_move(&self) -> Player {
            self.board.next_to_move()
        }
        fn win_masks(&self) -> Vec<u64> {
            if self.too_many_lines {
                vec![0b1111; 1000]
            } else {
                self.board.win_masks()
            }
        }
    }

    #[test]
    pub fn collaborator_violations_propagate() -> Result<()> {
        let broken = BrokenBoard {
            board: StandardBoard::new(),
            too_many_lines: false,
        };
        for &algorithm in [Algorithm::AlphaBeta, Algorithm::NegaScout].iter() {
            assert_eq!(
                search_position(algorithm, SearchConfig::default(), &broken, 3),
                Err(SearchError::NoLegalColumns)
            );
        }
        let err = Agent::random_seeded(7)
            .choose_column(&broken, 0)
            .expect_err("no columns to choose from");
        assert_eq!(
            err.downcast_ref::<SearchError>(),
            Some(&SearchError::NoLegalColumns)
        );

        let oversized = BrokenBoard {
            too_many_lines: true,
            ..broken
        };
        assert_eq!(
            SearchContext::new(&oversized, 1).map(|_| ()),
            Err(SearchError::HeuristicOutOfRange {
                lines: 1000,
                cells: 4
            })
        );
        Ok(())
    }

    struct ScriptedInput(Vec<usize>);

    impl ColumnInput for ScriptedInput {
        fn read_column(&mut self, _legal: &[usize]) -> Result<usize> {
            if self.0.is_empty() {
                return Err(anyhow!("no more input"));
            }
            Ok(self.0.remove(0))
        }
    }

    #[test]
    pub fn human_agent_uses_input() -> Result<()> {
        let board = StandardBoard::from_moves("111111")?;
        let mut agent = Agent::human(ScriptedInput(vec![4, 0]));
        assert!(agent.is_human());
        assert_eq!(agent.choose_column(&board, 0)?, 4);
        // column 1 is full
        assert!(agent.choose_column(&board, 0).is_err());
        assert!(agent.choose_column(&board, 0).is_err());
        Ok(())
    }

    #[test]
    pub fn random_agent_plays_legal_columns() -> Result<()> {
        let mut agent = Agent::random_seeded(42);
        let mut board = StandardBoard::new();
        while !board.is_terminal() {
            let column = agent.choose_column(&board, 0)?;
            assert!(board.possible_columns().contains(&column));
            board = board.try_successor(column)?;
        }
        Ok(())
    }

    #[test]
    pub fn search_beats_random_baseline() -> Result<()> {
        let mut wins = 0;
        for seed in 0..10 {
            let mut players = [Agent::alpha_beta(), Agent::random_seeded(seed)];
            let mut board = StandardBoard::new();
            let mut turn = 0;
            while !board.is_terminal() {
                let column = players[turn % 2].choose_column(&board, 4)?;
                board = board.try_successor(column)?;
                turn += 1;
            }
            if board.status() == GameStatus::FirstPlayerWin {
                wins += 1;
            }
        }
        assert!(wins >= 9, "search won only {} of 10 games", wins);
        Ok(())
    }
}
