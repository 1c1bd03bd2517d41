//! Turn-based duel simulation.
//!
//! The fighter with the greater (or equal) speed attacks first, then the
//! two alternate. Each attack rolls against the attacker's accuracy; a hit
//! deals the attacker's base damage plus a uniform spread of up to 20% in
//! either direction. The first fighter to bring the other to zero health
//! wins.
//!
//! Inputs are never rejected. Negative health is treated as zero,
//! non-positive damage deals nothing, and a NaN accuracy never hits. A
//! fight that cannot finish, because neither fighter can deal damage, is
//! cut off after [`MAX_TURNS`] turns. Any other fight runs to a knockout.

use rand::Rng;

use crate::fighter::Fighter;
use crate::outcome::{BattleOutcome, Decision};

/// Number of turns played before a duel between two harmless fighters is
/// called on remaining health.
pub const MAX_TURNS: u32 = 1000;

/// Run one duel between `first` and `second`.
///
/// `first` wins every tie: equal speed, a double forfeit, and equal
/// remaining health at the turn limit.
pub fn simulate<R: Rng + ?Sized>(
    first: &Fighter,
    second: &Fighter,
    rng: &mut R,
) -> BattleOutcome {
    let fighters = [first, second];
    let mut health = [first.health.max(0), second.health.max(0)];
    let mut log = Vec::new();

    log.push(format!(
        "Match start: {} (HP: {}) vs {} (HP: {})",
        first.name, health[0], second.name, health[1]
    ));

    let mut attacker = if first.speed >= second.speed { 0 } else { 1 };
    log.push(format!("{} is faster!", fighters[attacker].name));

    if health[0] == 0 || health[1] == 0 {
        let winner = if health[0] == 0 && health[1] > 0 { 1 } else { 0 };
        log.push(format!("{} wins by forfeit", fighters[winner].name));
        return BattleOutcome {
            winner: fighters[winner].name.clone(),
            log,
            turns: 0,
            decision: Decision::Forfeit,
        };
    }

    let can_finish = can_deal_damage(first) || can_deal_damage(second);
    let mut turn: u32 = 0;
    while can_finish || turn < MAX_TURNS {
        turn = turn.saturating_add(1);
        let defender = 1 - attacker;
        let (att, def) = (fighters[attacker], fighters[defender]);
        log.push(format!("--- Turn {} ---", turn));

        let roll: f64 = rng.gen();
        if roll <= att.accuracy {
            let dealt = roll_damage(att.damage, rng);
            health[defender] = (health[defender] - dealt).max(0);
            log.push(format!(
                "{} hits {} for {} (HP left: {})",
                att.name, def.name, dealt, health[defender]
            ));
            if health[defender] == 0 {
                return BattleOutcome {
                    winner: att.name.clone(),
                    log,
                    turns: turn,
                    decision: Decision::Knockout,
                };
            }
        } else {
            log.push(format!("{} missed!", att.name));
        }

        attacker = defender;
    }

    let winner = if health[0] >= health[1] { 0 } else { 1 };
    log.push(format!(
        "Turn limit of {} reached, {} wins on remaining health ({} vs {})",
        MAX_TURNS,
        fighters[winner].name,
        health[winner],
        health[1 - winner]
    ));
    BattleOutcome {
        winner: fighters[winner].name.clone(),
        log,
        turns: MAX_TURNS,
        decision: Decision::TurnLimit,
    }
}

/// A fighter with positive damage and accuracy lands a hit of at least 1
/// sooner or later.
fn can_deal_damage(fighter: &Fighter) -> bool {
    fighter.damage > 0 && fighter.accuracy > 0.0
}

/// Damage for one hit: `base` plus a uniform integer in
/// `[-floor(base * 0.2), +floor(base * 0.2)]`, never negative.
fn roll_damage<R: Rng + ?Sized>(base: i64, rng: &mut R) -> i64 {
    if base <= 0 {
        return 0;
    }
    // Integer division is floor(20%) for positive bases.
    let variance = base / 5;
    let spread = if variance > 0 {
        rng.gen_range(-variance..=variance)
    } else {
        0
    };
    base.saturating_add(spread).max(0)
}
