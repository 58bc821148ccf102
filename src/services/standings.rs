// League table computed from completed match results.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::fixture::Fixture;
use crate::models::standings::{FormResult, TeamStanding};

pub const POINTS_PER_WIN: u32 = 3;
pub const FORM_LENGTH: usize = 5;

/// Folds results, in the order given, into ranked team rows.
///
/// Every result counts toward `played` and the game tallies. Only a result with
/// unequal scores decides a match winner, so a level series awards no points
/// and adds nothing to either form guide.
pub fn compute_standings(results: &[Fixture]) -> Vec<TeamStanding> {
    let mut rows: Vec<TeamStanding> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in results {
        let blue = row_for(&mut rows, &mut index, &result.team_blue);
        record_games(&mut rows[blue], result.score_blue, result.score_red);
        let red = row_for(&mut rows, &mut index, &result.team_red);
        record_games(&mut rows[red], result.score_red, result.score_blue);

        match result.score_blue.cmp(&result.score_red) {
            Ordering::Greater => {
                record_win(&mut rows[blue]);
                record_loss(&mut rows[red]);
            }
            Ordering::Less => {
                record_win(&mut rows[red]);
                record_loss(&mut rows[blue]);
            }
            Ordering::Equal => {}
        }
    }

    rank_standings(&mut rows);
    rows
}

/// Sorts rows into table order and assigns 1-based ranks. Fully tied rows
/// still receive distinct ranks.
pub fn rank_standings(rows: &mut [TeamStanding]) {
    rows.sort_by(compare_rows);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
}

fn compare_rows(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.game_diff.cmp(&a.game_diff))
        .then_with(|| b.game_wins.cmp(&a.game_wins))
        .then_with(|| compare_team_names(&a.team, &b.team))
}

fn compare_team_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn row_for(rows: &mut Vec<TeamStanding>, index: &mut HashMap<String, usize>, team: &str) -> usize {
    if let Some(&i) = index.get(team) {
        return i;
    }
    rows.push(TeamStanding::new(team));
    index.insert(team.to_string(), rows.len() - 1);
    rows.len() - 1
}

fn record_games(row: &mut TeamStanding, won: u32, lost: u32) {
    row.played += 1;
    row.game_wins += won;
    row.game_losses += lost;
    row.game_diff = row.game_wins as i64 - row.game_losses as i64;
}

fn record_win(row: &mut TeamStanding) {
    row.match_wins += 1;
    row.points += POINTS_PER_WIN;
    push_form(row, FormResult::W);
}

fn record_loss(row: &mut TeamStanding) {
    row.match_losses += 1;
    push_form(row, FormResult::L);
}

fn push_form(row: &mut TeamStanding, result: FormResult) {
    row.form.push(result);
    if row.form.len() > FORM_LENGTH {
        let excess = row.form.len() - FORM_LENGTH;
        row.form.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixture::MatchStatus;

    fn result(day: u32, blue: &str, red: &str, score_blue: u32, score_red: u32) -> Fixture {
        let mut f = Fixture::new(day, 1, blue, red);
        f.set_score(score_blue, score_red);
        f.status = MatchStatus::Completed;
        f
    }

    fn row<'a>(rows: &'a [TeamStanding], team: &str) -> &'a TeamStanding {
        rows.iter().find(|r| r.team == team).unwrap()
    }

    #[test]
    fn two_match_example() {
        let rows = compute_standings(&[result(1, "A", "B", 2, 0), result(2, "B", "A", 2, 1)]);

        let a = row(&rows, "A");
        assert_eq!((a.played, a.match_wins, a.match_losses), (2, 1, 1));
        assert_eq!((a.game_wins, a.game_losses, a.game_diff, a.points), (3, 2, 1, 3));
        assert_eq!(a.rank, 1);

        let b = row(&rows, "B");
        assert_eq!((b.played, b.match_wins, b.match_losses), (2, 1, 1));
        assert_eq!((b.game_wins, b.game_losses, b.game_diff, b.points), (2, 3, -1, 3));
        assert_eq!(b.rank, 2);
    }

    #[test]
    fn tied_series_counts_games_but_no_result() {
        let rows = compute_standings(&[result(1, "A", "B", 1, 1)]);
        for team in ["A", "B"] {
            let r = row(&rows, team);
            assert_eq!(r.played, 1);
            assert_eq!((r.game_wins, r.game_losses), (1, 1));
            assert_eq!((r.match_wins, r.match_losses, r.points), (0, 0, 0));
            assert!(r.form.is_empty());
        }
    }

    #[test]
    fn each_decided_match_adds_three_points() {
        let results = vec![
            result(1, "A", "B", 2, 0),
            result(1, "C", "D", 1, 1),
            result(2, "A", "C", 0, 2),
            result(2, "B", "D", 2, 1),
            result(3, "D", "A", 2, 1),
        ];
        let decided = results.iter().filter(|r| r.score_blue != r.score_red).count() as u32;
        let total: u32 = compute_standings(&results).iter().map(|r| r.points).sum();
        assert_eq!(total, decided * POINTS_PER_WIN);
    }

    #[test]
    fn form_keeps_last_five_in_input_order() {
        let mut results = Vec::new();
        for day in 1..=4 {
            results.push(result(day, "A", "B", 2, 0));
        }
        results.push(result(5, "A", "B", 0, 2));
        results.push(result(6, "A", "B", 0, 2));

        let rows = compute_standings(&results);
        use FormResult::{L, W};
        assert_eq!(row(&rows, "A").form, vec![W, W, W, L, L]);
        assert_eq!(row(&rows, "B").form, vec![L, L, L, W, W]);
    }

    #[test]
    fn full_tie_orders_alphabetically_with_distinct_ranks() {
        let rows = compute_standings(&[
            result(1, "delta", "Bravo", 2, 1),
            result(1, "Charlie", "alpha", 2, 1),
            result(2, "Bravo", "delta", 2, 1),
            result(2, "alpha", "Charlie", 2, 1),
        ]);
        let order: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(order, vec!["alpha", "Bravo", "Charlie", "delta"]);
        let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn game_wins_break_equal_points_and_diff() {
        // A: 2-1 win, 1-2 loss => 3 pts, +0, 3 game wins. B: 2-0, 0-2 => 3 pts, +0, 2 game wins.
        let rows = compute_standings(&[
            result(1, "A", "X", 2, 1),
            result(2, "A", "Y", 1, 2),
            result(1, "B", "Z", 2, 0),
            result(2, "B", "W", 0, 2),
        ]);
        assert!(row(&rows, "A").rank < row(&rows, "B").rank);
    }

    #[test]
    fn no_results_no_rows() {
        assert!(compute_standings(&[]).is_empty());
    }
}
