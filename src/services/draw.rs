// Round-robin draw using the circle method.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::{AppError, Result};
use crate::models::schedule::{ScheduleDay, ScheduledMatch};

pub const MIN_DRAW_TEAMS: usize = 10;
pub const BYE: &str = "BYE";
pub const DEFAULT_DAYS_BETWEEN: u32 = 7;
pub const MAX_DAYS_BETWEEN: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRound {
    pub round: u32,
    pub matches: Vec<(String, String)>,
}

/// Shuffles `teams` with `rng` and pairs them so every team meets every other
/// team exactly once.
///
/// An odd field gets a BYE slot; whoever draws the BYE sits that round out and
/// the pairing is dropped. Produces `n - 1` rounds for even `n`, `n` rounds for
/// odd `n`.
pub fn generate_draw<R: Rng + ?Sized>(teams: &[String], rng: &mut R) -> Result<Vec<DrawRound>> {
    let mut slots = validate_teams(teams)?;
    slots.shuffle(rng);
    if slots.len() % 2 == 1 {
        slots.push(BYE.to_string());
    }

    let n = slots.len();
    let mut rounds = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut matches = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (home, away) = (&slots[i], &slots[n - 1 - i]);
            if home == BYE || away == BYE {
                continue;
            }
            // Swap the fixed team's side every other round.
            if i == 0 && round % 2 == 1 {
                matches.push((away.clone(), home.clone()));
            } else {
                matches.push((home.clone(), away.clone()));
            }
        }
        rounds.push(DrawRound {
            round: round as u32 + 1,
            matches,
        });
        slots[1..].rotate_right(1);
    }

    Ok(rounds)
}

fn validate_teams(teams: &[String]) -> Result<Vec<String>> {
    if teams.len() < MIN_DRAW_TEAMS {
        return Err(AppError::invalid_data(format!(
            "At least {} teams are required to generate a schedule (got {})",
            MIN_DRAW_TEAMS,
            teams.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(teams.len());
    for team in teams {
        let team = team.trim();
        if team.is_empty() {
            return Err(AppError::invalid_data("Team names cannot be blank"));
        }
        if team.eq_ignore_ascii_case(BYE) {
            return Err(AppError::invalid_data(format!("'{}' is a reserved team name", BYE)));
        }
        if !seen.insert(team.to_lowercase()) {
            return Err(AppError::invalid_data(format!("Duplicate team: {}", team)));
        }
        cleaned.push(team.to_string());
    }
    Ok(cleaned)
}

/// Lays draw rounds out as schedule days, `days_between` apart from `start`.
/// Dates past the calendar range are a validation error.
pub fn schedule_days(
    rounds: &[DrawRound],
    start: Option<NaiveDate>,
    days_between: u32,
) -> Result<Vec<ScheduleDay>> {
    rounds
        .iter()
        .map(|round| {
            let date = match start {
                Some(start) => round_date(start, round.round, days_between)?
                    .format("%Y-%m-%d")
                    .to_string(),
                None => String::new(),
            };
            Ok(ScheduleDay {
                day: round.round,
                date,
                matches: round
                    .matches
                    .iter()
                    .map(|(blue, red)| ScheduledMatch::new(blue.clone(), red.clone()))
                    .collect(),
            })
        })
        .collect()
}

fn round_date(start: NaiveDate, round: u32, days_between: u32) -> Result<NaiveDate> {
    let out_of_range = || AppError::invalid_data(format!("Day {} falls outside the calendar", round));
    let offset = round
        .saturating_sub(1)
        .checked_mul(days_between)
        .ok_or_else(out_of_range)?;
    start
        .checked_add_signed(Duration::days(i64::from(offset)))
        .ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn teams(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("T{}", i)).collect()
    }

    fn pair(a: &str, b: &str) -> (String, String) {
        if a < b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    #[test]
    fn ten_teams_make_nine_rounds_of_five() {
        let mut rng = StdRng::seed_from_u64(7);
        let rounds = generate_draw(&teams(10), &mut rng).unwrap();
        assert_eq!(rounds.len(), 9);
        assert!(rounds.iter().all(|r| r.matches.len() == 5));

        let mut pairs: HashMap<(String, String), usize> = HashMap::new();
        for round in &rounds {
            let mut seen = HashSet::new();
            for (blue, red) in &round.matches {
                assert!(seen.insert(blue.clone()), "{} twice in round {}", blue, round.round);
                assert!(seen.insert(red.clone()), "{} twice in round {}", red, round.round);
                *pairs.entry(pair(blue, red)).or_default() += 1;
            }
            assert_eq!(seen.len(), 10);
        }
        assert_eq!(pairs.len(), 45);
        assert!(pairs.values().all(|&count| count == 1));
    }

    #[test]
    fn odd_field_sits_each_team_out_once() {
        let field = teams(11);
        let mut rng = StdRng::seed_from_u64(42);
        let rounds = generate_draw(&field, &mut rng).unwrap();
        assert_eq!(rounds.len(), 11);

        let mut byes: HashMap<String, usize> = HashMap::new();
        let mut pairs = HashSet::new();
        for round in &rounds {
            assert_eq!(round.matches.len(), 5);
            let playing: HashSet<&String> = round.matches.iter().flat_map(|(b, r)| [b, r]).collect();
            let idle: Vec<&String> = field.iter().filter(|t| !playing.contains(t)).collect();
            assert_eq!(idle.len(), 1);
            *byes.entry(idle[0].clone()).or_default() += 1;
            for (blue, red) in &round.matches {
                assert!(pairs.insert(pair(blue, red)));
            }
        }
        assert_eq!(byes.len(), 11);
        assert!(byes.values().all(|&count| count == 1));
        assert_eq!(pairs.len(), 55);
    }

    #[test]
    fn too_few_teams_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_draw(&teams(MIN_DRAW_TEAMS - 1), &mut rng).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn duplicate_and_reserved_names_are_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = teams(10);
        field[9] = " t1 ".to_string();
        assert!(generate_draw(&field, &mut rng).is_err());

        let mut field = teams(10);
        field[0] = "bye".to_string();
        assert!(generate_draw(&field, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_draw() {
        let a = generate_draw(&teams(12), &mut StdRng::seed_from_u64(99)).unwrap();
        let b = generate_draw(&teams(12), &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn schedule_days_are_spaced_from_start() {
        let rounds = generate_draw(&teams(10), &mut StdRng::seed_from_u64(3)).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 1, 4);
        let days = schedule_days(&rounds, start, 7).unwrap();
        assert_eq!(days.len(), 9);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].date, "2025-01-04");
        assert_eq!(days[1].date, "2025-01-11");
        assert_eq!(days[8].matches.len(), 5);

        let undated = schedule_days(&rounds, None, 7).unwrap();
        assert!(undated.iter().all(|d| d.date.is_empty()));
    }

    #[test]
    fn dates_past_the_calendar_are_rejected() {
        let rounds = generate_draw(&teams(10), &mut StdRng::seed_from_u64(3)).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1);

        let err = schedule_days(&rounds, start, 200_000_000).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        // The offset multiplication itself overflows u32 here
        let err = schedule_days(&rounds, start, 4_000_000_000).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
