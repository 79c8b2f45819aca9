use crate::battle::speed_order::SpeedSource;
use crate::pokemon::Combatant;
use schema::{BattlerIndex, Side};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherType {
    Rain,
    Sun,
    Sandstorm,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weather {
    pub weather_type: WeatherType,
    pub turns_remaining: u8,
}

/// Everything on the battlefield: combatants in their slots, benches and
/// field-wide effects.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Field {
    slots: BTreeMap<BattlerIndex, Combatant>,
    benches: HashMap<Side, Vec<Combatant>>,
    pub weather: Option<Weather>,
    /// Turns of Trick Room left; zero means inactive.
    pub trick_room_turns: u8,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a combatant into a battler slot, replacing whoever was there.
    pub fn send_out(&mut self, battler: BattlerIndex, mut combatant: Combatant) -> Option<Combatant> {
        combatant.on_field = true;
        combatant.switching_out = false;
        self.slots.insert(battler, combatant)
    }

    pub fn add_to_bench(&mut self, side: Side, combatant: Combatant) {
        self.benches.entry(side).or_default().push(combatant);
    }

    pub fn bench(&self, side: Side) -> &[Combatant] {
        self.benches.get(&side).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Index of the first benched combatant that can still fight.
    pub fn first_available_bench_slot(&self, side: Side) -> Option<usize> {
        self.bench(side).iter().position(|c| !c.is_fainted())
    }

    /// Swap the combatant in `battler` with the benched one at `bench_slot`.
    /// Returns false when there is nothing to swap.
    pub fn swap_with_bench(&mut self, battler: BattlerIndex, bench_slot: usize) -> bool {
        let side = battler.side();
        let Some(bench) = self.benches.get_mut(&side) else {
            return false;
        };
        if bench_slot >= bench.len() || bench[bench_slot].is_fainted() {
            return false;
        }

        let incoming = bench.remove(bench_slot);
        if let Some(mut outgoing) = self.send_out(battler, incoming) {
            outgoing.on_field = false;
            outgoing.clear_volatile();
            self.benches.entry(side).or_default().push(outgoing);
        }
        true
    }

    pub fn get(&self, battler: BattlerIndex) -> Option<&Combatant> {
        self.slots.get(&battler)
    }

    pub fn get_mut(&mut self, battler: BattlerIndex) -> Option<&mut Combatant> {
        self.slots.get_mut(&battler)
    }

    pub fn is_active(&self, battler: BattlerIndex) -> bool {
        self.get(battler).is_some_and(Combatant::is_active)
    }

    /// Active battlers in canonical slot order.
    pub fn active_battlers(&self) -> Vec<BattlerIndex> {
        self.slots
            .iter()
            .filter(|(_, c)| c.is_active())
            .map(|(battler, _)| *battler)
            .collect()
    }

    pub fn side_has_active(&self, side: Side) -> bool {
        self.active_battlers().iter().any(|b| b.side() == side)
    }

    /// Whether the side can still field anyone, counting the bench.
    pub fn side_can_battle(&self, side: Side) -> bool {
        self.side_has_active(side) || self.first_available_bench_slot(side).is_some()
    }

    pub fn is_trick_room_active(&self) -> bool {
        self.trick_room_turns > 0
    }

    /// Trick Room toggles: using it while active ends it early.
    pub fn toggle_trick_room(&mut self, turns: u8) -> bool {
        if self.is_trick_room_active() {
            self.trick_room_turns = 0;
        } else {
            self.trick_room_turns = turns;
        }
        self.is_trick_room_active()
    }

    /// Count down Trick Room at the end of a turn. Returns true when it just ended.
    pub fn lapse_trick_room(&mut self) -> bool {
        if self.trick_room_turns == 0 {
            return false;
        }
        self.trick_room_turns -= 1;
        self.trick_room_turns == 0
    }

    /// Count down the weather. Returns the weather that just ended, if any.
    pub fn lapse_weather(&mut self) -> Option<WeatherType> {
        let weather = self.weather.as_mut()?;
        weather.turns_remaining = weather.turns_remaining.saturating_sub(1);
        if weather.turns_remaining == 0 {
            let ended = weather.weather_type;
            self.weather = None;
            Some(ended)
        } else {
            None
        }
    }

    pub fn name_of(&self, battler: BattlerIndex) -> String {
        self.get(battler)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| battler.to_string())
    }
}

impl SpeedSource for Field {
    fn effective_speed(&self, battler: BattlerIndex) -> u32 {
        self.get(battler).map(Combatant::effective_speed).unwrap_or(0)
    }

    fn is_speed_reversed(&self) -> bool {
        self.is_trick_room_active()
    }
}
