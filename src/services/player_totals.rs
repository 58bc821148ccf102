// Per-player aggregates over raw game stat lines.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::player_stat::{PlayerStat, PlayerTotals, RoleSummary};

/// Stats that `/top/:stat` can rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedStat {
    Kills,
    Deaths,
    Assists,
    Mvp,
    Gold,
    Damage,
    Kda,
    GoldPerMin,
}

impl RankedStat {
    pub const NAMES: [&'static str; 8] = [
        "kills", "deaths", "assists", "mvp", "gold", "damage", "kda", "goldPerMin",
    ];

    pub fn parse(name: &str) -> Option<Self> {
        let stat = match name.to_ascii_lowercase().as_str() {
            "kills" => RankedStat::Kills,
            "deaths" => RankedStat::Deaths,
            "assists" => RankedStat::Assists,
            "mvp" | "mvps" | "mvpcount" => RankedStat::Mvp,
            "gold" => RankedStat::Gold,
            "damage" => RankedStat::Damage,
            "kda" => RankedStat::Kda,
            "goldpermin" | "gpm" => RankedStat::GoldPerMin,
            _ => return None,
        };
        Some(stat)
    }

    fn value(&self, t: &PlayerTotals) -> f64 {
        match self {
            RankedStat::Kills => t.kills as f64,
            RankedStat::Deaths => t.deaths as f64,
            RankedStat::Assists => t.assists as f64,
            RankedStat::Mvp => t.mvp_count as f64,
            RankedStat::Gold => t.gold as f64,
            RankedStat::Damage => t.damage as f64,
            RankedStat::Kda => t.kda,
            RankedStat::GoldPerMin => t.gold_per_min,
        }
    }
}

/// Sums every stat line per player name, in iteration order, then derives
/// ratios. Team and role come from the last line seen for that player.
///
/// `gamesPlayed` is summed from each line's own field (one when absent), not
/// counted from lines. Zero denominators are floored to one.
pub fn aggregate_player_totals(stats: &[PlayerStat]) -> Vec<PlayerTotals> {
    let mut totals: Vec<PlayerTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for stat in stats {
        let i = *index.entry(stat.player_name.as_str()).or_insert_with(|| {
            totals.push(PlayerTotals {
                player_name: stat.player_name.clone(),
                ..Default::default()
            });
            totals.len() - 1
        });
        let t = &mut totals[i];

        t.team = stat.team_name.clone();
        t.role = stat.role.clone();
        t.games_played += stat.games_played.unwrap_or(1);
        t.kills += stat.kills;
        t.deaths += stat.deaths;
        t.assists += stat.assists;
        t.gold += stat.gold;
        t.damage += stat.damage;
        t.minutes_played += stat.game_duration as f64 / 60.0;
        if stat.mvp {
            t.mvp_count += 1;
        }
        if stat.win {
            t.wins += 1;
        }
    }

    for t in totals.iter_mut() {
        derive_ratios(t);
    }

    // Stable: equal KDA keeps first-seen order.
    totals.sort_by(|a, b| b.kda.partial_cmp(&a.kda).unwrap_or(Ordering::Equal));
    totals
}

fn derive_ratios(t: &mut PlayerTotals) {
    let games = t.games_played.max(1) as f64;
    t.kda = (t.kills + t.assists) as f64 / t.deaths.max(1) as f64;
    t.gold_per_min = t.gold as f64 / t.minutes_played.max(1.0);
    t.avg_kills = t.kills as f64 / games;
    t.avg_deaths = t.deaths as f64 / games;
    t.avg_assists = t.assists as f64 / games;
    t.avg_damage = t.damage as f64 / games;
}

/// Top `limit` players by `stat`, highest first.
pub fn top_players(mut totals: Vec<PlayerTotals>, stat: RankedStat, limit: usize) -> Vec<PlayerTotals> {
    totals.sort_by(|a, b| {
        stat.value(b)
            .partial_cmp(&stat.value(a))
            .unwrap_or(Ordering::Equal)
    });
    totals.truncate(limit);
    totals
}

/// Groups player totals by role. Players with no role land under "Unknown".
pub fn summarize_roles(totals: &[PlayerTotals]) -> Vec<RoleSummary> {
    let mut groups: Vec<(String, Vec<&PlayerTotals>)> = Vec::new();
    for t in totals {
        let role = t
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("Unknown");
        match groups.iter_mut().find(|(r, _)| r.eq_ignore_ascii_case(role)) {
            Some((_, members)) => members.push(t),
            None => groups.push((role.to_string(), vec![t])),
        }
    }

    let mut summaries: Vec<RoleSummary> = groups
        .into_iter()
        .map(|(role, members)| {
            let n = members.len() as f64;
            let top_player = members
                .iter()
                .max_by(|a, b| a.kda.partial_cmp(&b.kda).unwrap_or(Ordering::Equal))
                .map(|t| t.player_name.clone());
            RoleSummary {
                role,
                players: members.len(),
                avg_kda: members.iter().map(|t| t.kda).sum::<f64>() / n,
                avg_gold_per_min: members.iter().map(|t| t.gold_per_min).sum::<f64>() / n,
                top_player,
            }
        })
        .collect();
    summaries.sort_by(|a, b| a.role.cmp(&b.role));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(player: &str, team: &str, k: u32, d: u32, a: u32) -> PlayerStat {
        PlayerStat {
            id: None,
            match_id: "1_A_vs_B".to_string(),
            match_day: Some(1),
            game_number: 1,
            team_name: team.to_string(),
            player_name: player.to_string(),
            hero_name: "Ryoma".to_string(),
            role: None,
            kills: k,
            deaths: d,
            assists: a,
            gold: 6000,
            damage: 40000,
            mvp: false,
            game_duration: 600,
            win: true,
            games_played: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn sums_lines_and_derives_ratios() {
        let mut second = line("Shadow", "Alpha", 2, 2, 4);
        second.mvp = true;
        second.win = false;
        let totals = aggregate_player_totals(&[line("Shadow", "Alpha", 5, 1, 3), second]);

        assert_eq!(totals.len(), 1);
        let t = &totals[0];
        assert_eq!((t.kills, t.deaths, t.assists), (7, 3, 7));
        assert_eq!((t.games_played, t.wins, t.mvp_count), (2, 1, 1));
        assert_eq!(t.gold, 12000);
        assert!((t.minutes_played - 20.0).abs() < 1e-9);
        assert!((t.kda - 14.0 / 3.0).abs() < 1e-9);
        assert!((t.gold_per_min - 600.0).abs() < 1e-9);
        assert!((t.avg_kills - 3.5).abs() < 1e-9);
    }

    #[test]
    fn zero_deaths_and_minutes_floor_to_one() {
        let mut l = line("Ghost", "Bravo", 4, 0, 2);
        l.game_duration = 0;
        let t = &aggregate_player_totals(&[l])[0];
        assert!((t.kda - 6.0).abs() < 1e-9);
        assert!((t.gold_per_min - 6000.0).abs() < 1e-9);
    }

    #[test]
    fn games_played_comes_from_records() {
        let mut l = line("Shadow", "Alpha", 6, 3, 3);
        l.games_played = Some(3);
        let t = &aggregate_player_totals(&[l])[0];
        assert_eq!(t.games_played, 3);
        assert!((t.avg_kills - 2.0).abs() < 1e-9);
    }

    #[test]
    fn latest_line_wins_team_and_role() {
        let mut first = line("Shadow", "Alpha", 1, 1, 1);
        first.role = Some("Jungle".to_string());
        let mut second = line("Shadow", "Bravo", 1, 1, 1);
        second.role = Some("Mid".to_string());
        let t = &aggregate_player_totals(&[first, second])[0];
        assert_eq!(t.team, "Bravo");
        assert_eq!(t.role.as_deref(), Some("Mid"));
    }

    #[test]
    fn sorted_by_kda_stable_on_ties() {
        let totals = aggregate_player_totals(&[
            line("Low", "A", 1, 4, 1),
            line("TieFirst", "A", 2, 1, 0),
            line("High", "B", 9, 1, 3),
            line("TieSecond", "B", 1, 1, 1),
        ]);
        let names: Vec<&str> = totals.iter().map(|t| t.player_name.as_str()).collect();
        assert_eq!(names, vec!["High", "TieFirst", "TieSecond", "Low"]);
    }

    #[test]
    fn top_players_by_stat() {
        let totals = aggregate_player_totals(&[
            line("A", "X", 10, 9, 0),
            line("B", "X", 3, 1, 1),
            line("C", "Y", 7, 1, 0),
        ]);
        let top = top_players(totals, RankedStat::Kills, 2);
        let names: Vec<&str> = top.iter().map(|t| t.player_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(RankedStat::parse("goldPerMin"), Some(RankedStat::GoldPerMin));
        assert_eq!(RankedStat::parse("headshots"), None);
    }

    #[test]
    fn roles_group_case_insensitively() {
        let mut a = line("A", "X", 10, 1, 0);
        a.role = Some("Mid".to_string());
        let mut b = line("B", "X", 2, 1, 0);
        b.role = Some("mid".to_string());
        let c = line("C", "Y", 1, 1, 0);
        let roles = summarize_roles(&aggregate_player_totals(&[a, b, c]));
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].role, "Mid");
        assert_eq!(roles[0].players, 2);
        assert_eq!(roles[0].top_player.as_deref(), Some("A"));
        assert_eq!(roles[1].role, "Unknown");
    }
}
