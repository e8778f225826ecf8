#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that steps every active monster along the path once per
//! tick.

use path_defence_core::{Command, Event, MonsterSnapshot, MonsterView, RandomSource};

/// Die used for stutter rolls.
const STUTTER_DIE: u32 = 100;

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Emits one `AdvanceMonster` per active monster, in priority order, when
    /// time advanced. Monsters whose kind stutters consume one roll each and
    /// stay put when the roll lands within their stutter chance.
    pub fn handle<R>(
        &mut self,
        events: &[Event],
        monster_view: &MonsterView,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: RandomSource + ?Sized,
    {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for monster in monster_view.iter() {
            if monster.reached_end || stutters(monster, rng) {
                continue;
            }
            out.push(Command::AdvanceMonster {
                monster: monster.id,
            });
        }
    }
}

fn stutters<R>(monster: &MonsterSnapshot, rng: &mut R) -> bool
where
    R: RandomSource + ?Sized,
{
    let chance = monster.kind.stats().stutter_percent;
    chance > 0 && rng.roll(STUTTER_DIE) <= chance
}
