//! What each phase does when it starts.

use crate::battle::commands::{default_targets, TurnCommand};
use crate::battle::state::{BattleContext, BattleEvent};
use crate::phase::manager::When;
use crate::phase::{MovePhase, Phase, PhaseStatus, TimingModifier};
use schema::{BattlerIndex, Move, MoveEffect, MoveTarget, Side, StatType};
use tracing::{debug, trace};

/// Poison and burn take this fraction of max HP at the end of each turn.
const STATUS_DAMAGE_DIVISOR: u16 = 8;

impl Phase {
    /// Run this phase against the battle. Most phases finish immediately;
    /// a phase that must wait for outside input returns
    /// [`PhaseStatus::Suspended`].
    ///
    /// # Panics
    /// On an unresolved dynamic marker; the phase tree never hands one out.
    pub fn start(&self, ctx: &mut BattleContext) -> PhaseStatus {
        match self {
            Phase::TurnInit => turn_init(ctx),
            Phase::Command { battler } => return command(ctx, *battler),
            Phase::TurnStart => turn_start(ctx),
            Phase::Move(move_phase) => use_move(ctx, move_phase),
            Phase::MoveEffect {
                user,
                targets,
                move_used,
            } => move_effect(ctx, *user, targets, *move_used),
            Phase::MoveEnd { .. } => {}
            Phase::Faint { battler } => faint(ctx, *battler),
            Phase::Recall { battler } => recall(ctx, *battler),
            Phase::Switch {
                battler,
                bench_slot,
            } => switch_in(ctx, *battler, *bench_slot),
            Phase::PostSummon(post_summon) => {
                if ctx.field.is_active(post_summon.battler) {
                    let pokemon = ctx.field.name_of(post_summon.battler);
                    ctx.emit(BattleEvent::EnteredBattle {
                        battler: post_summon.battler,
                        pokemon,
                    });
                }
            }
            Phase::AttemptRun { battler } => attempt_run(ctx, *battler),
            Phase::StatStageChange {
                battler,
                stat,
                stages,
            } => stat_stage_change(ctx, *battler, *stat, *stages),
            Phase::PokemonHeal { battler, amount } => heal(ctx, *battler, *amount),
            Phase::Message { text } => ctx.emit(BattleEvent::Message { text: text.clone() }),
            Phase::WeatherEffect => {
                if let Some(weather) = ctx.field.lapse_weather() {
                    ctx.emit(BattleEvent::WeatherEnded { weather });
                }
            }
            Phase::CheckStatusEffect => check_status_effect(ctx),
            Phase::PostTurnStatusEffect { battler } => post_turn_status_effect(ctx, *battler),
            Phase::TurnEnd { upcoming_interlude } => {
                if ctx.field.lapse_trick_room() {
                    ctx.emit(BattleEvent::TrickRoomEnded);
                }
                ctx.emit(BattleEvent::TurnEnded {
                    turn_number: ctx.turn,
                    upcoming_interlude: *upcoming_interlude,
                });
            }
            Phase::BattleEnd { winner } => {
                ctx.phases.clear_all_phases();
                ctx.battle_over = true;
                ctx.emit(BattleEvent::BattleEnded { winner: *winner });
            }
            Phase::DynamicMarker { phase_type } => {
                panic!("Unresolved {} marker reached execution", phase_type)
            }
        }
        PhaseStatus::Ended
    }
}

fn turn_init(ctx: &mut BattleContext) {
    ctx.turn += 1;
    ctx.phases.clear_turn_order();
    ctx.emit(BattleEvent::TurnStarted {
        turn_number: ctx.turn,
    });

    for battler in ctx.field.active_battlers() {
        ctx.phases.unshift_phase(Phase::Command { battler });
    }
    ctx.phases.unshift_phase(Phase::TurnStart);
}

fn command(ctx: &BattleContext, battler: BattlerIndex) -> PhaseStatus {
    if !ctx.field.is_active(battler) || ctx.commands.has(battler) {
        PhaseStatus::Ended
    } else {
        PhaseStatus::Suspended
    }
}

/// Turn the filed commands into this turn's phases: switches and escapes first,
/// then one move use per fighting battler, then the end-of-turn phases.
fn turn_start(ctx: &mut BattleContext) {
    let battlers: Vec<BattlerIndex> = ctx
        .commands
        .iter()
        .map(|(battler, _)| battler)
        .filter(|battler| ctx.field.is_active(*battler))
        .collect();
    let order = ctx.speed_order(&battlers);
    debug!("Command order for turn {}: {:?}", ctx.turn, order);

    for &battler in &order {
        match ctx.commands.get(battler) {
            Some(TurnCommand::Switch { bench_slot }) => {
                let bench_slot = *bench_slot;
                ctx.phases
                    .queue_battler_switch_out(battler, bench_slot, When::Eager);
            }
            Some(TurnCommand::Run) => ctx.phases.unshift_phase(Phase::AttemptRun { battler }),
            _ => {}
        }
    }

    for &battler in &order {
        let Some(TurnCommand::Fight { move_used, targets }) = ctx.commands.get(battler).cloned() else {
            continue;
        };
        let targets = if targets.is_empty() {
            default_targets(move_used, battler, &ctx.field)
        } else {
            targets
        };
        let timing = if ctx.field.get(battler).is_some_and(|c| c.bypass_speed) {
            TimingModifier::First
        } else {
            TimingModifier::Normal
        };
        ctx.phases
            .unshift_phase(MovePhase::new(battler, move_used, targets).with_timing(timing).into());
    }

    ctx.phases.queue_turn_end_phases();
    ctx.commands.clear();
}

fn use_move(ctx: &mut BattleContext, move_phase: &MovePhase) {
    let user = move_phase.pokemon;
    let pokemon = ctx.field.name_of(user);
    if move_phase.is_cancelled() || !ctx.field.is_active(user) {
        ctx.emit(BattleEvent::MoveCancelled {
            battler: user,
            pokemon,
            move_used: move_phase.move_used,
        });
        return;
    }

    if let Some(combatant) = ctx.field.get_mut(user) {
        combatant.last_move = Some(move_phase.move_used);
    }
    ctx.emit(BattleEvent::MoveUsed {
        battler: user,
        pokemon,
        move_used: move_phase.move_used,
    });

    let targets = match move_phase.move_used.data().target {
        MoveTarget::User => vec![user],
        MoveTarget::Field => Vec::new(),
        MoveTarget::SingleOpponent | MoveTarget::AnyOther => move_phase.targets.clone(),
    };
    ctx.phases.unshift_phase(Phase::MoveEffect {
        user,
        targets,
        move_used: move_phase.move_used,
    });
    ctx.phases.unshift_phase(Phase::MoveEnd { battler: user });
}

fn move_effect(ctx: &mut BattleContext, user: BattlerIndex, targets: &[BattlerIndex], move_used: Move) {
    if !ctx.field.is_active(user) {
        return;
    }

    let effect = move_used.data().effect;
    match effect {
        MoveEffect::None => {}
        MoveEffect::TrickRoom(turns) => {
            let active = ctx.field.toggle_trick_room(turns);
            ctx.emit(BattleEvent::TrickRoomToggled { active });
        }
        _ => {
            let live: Vec<BattlerIndex> = targets
                .iter()
                .copied()
                .filter(|t| ctx.field.is_active(*t))
                .collect();
            if live.is_empty() {
                let pokemon = ctx.field.name_of(user);
                ctx.emit(BattleEvent::NoTarget { pokemon });
            }
            for target in live {
                apply_to_target(ctx, target, move_used, effect);
            }
        }
    }
}

fn apply_to_target(ctx: &mut BattleContext, target: BattlerIndex, move_used: Move, effect: MoveEffect) {
    let targets_pending = |p: &MovePhase| p.pokemon == target && !p.is_cancelled();

    match effect {
        MoveEffect::Damage(power) => {
            let Some(combatant) = ctx.field.get_mut(target) else {
                return;
            };
            let fainted = combatant.take_damage(power);
            let event = BattleEvent::DamageDealt {
                target,
                pokemon: combatant.name.clone(),
                damage: power,
                remaining_hp: combatant.current_hp,
            };
            ctx.emit(event);
            if fainted {
                ctx.phases.queue_faint_phase(target);
            }
        }
        MoveEffect::SpeedChange(stages) => ctx.phases.unshift_phase(Phase::StatStageChange {
            battler: target,
            stat: StatType::Spe,
            stages,
        }),
        MoveEffect::Heal(percent) => {
            let max_hp = ctx.field.get(target).map_or(0, |c| c.max_hp);
            let amount = (max_hp as u32 * percent as u32 / 100) as u16;
            ctx.phases.unshift_phase(Phase::PokemonHeal {
                battler: target,
                amount,
            });
        }
        MoveEffect::ForceSwitch => match ctx.field.first_available_bench_slot(target.side()) {
            Some(slot) => ctx
                .phases
                .queue_battler_switch_out(target, slot, When::Deferred),
            None => {
                let pokemon = ctx.field.name_of(target);
                ctx.emit(BattleEvent::MoveFailed { pokemon, move_used });
            }
        },
        MoveEffect::Quash | MoveEffect::AfterYou => {
            let (timing, changed) = if effect == MoveEffect::Quash {
                (TimingModifier::Last, ctx.phases.force_move_last(targets_pending))
            } else {
                (TimingModifier::First, ctx.phases.force_move_next(targets_pending))
            };
            let pokemon = ctx.field.name_of(target);
            if changed {
                ctx.emit(BattleEvent::MoveTimingChanged { pokemon, timing });
            } else {
                ctx.emit(BattleEvent::MoveFailed { pokemon, move_used });
            }
        }
        MoveEffect::Encore => {
            let pokemon = ctx.field.name_of(target);
            let last_move = ctx.field.get(target).and_then(|c| c.last_move);
            match last_move {
                Some(last) if ctx.phases.change_phase_move(targets_pending, last) => {
                    ctx.emit(BattleEvent::MoveReplaced {
                        pokemon,
                        move_used: last,
                    });
                }
                _ => ctx.emit(BattleEvent::MoveFailed { pokemon, move_used }),
            }
        }
        MoveEffect::None | MoveEffect::TrickRoom(_) => {}
    }
}

fn faint(ctx: &mut BattleContext, battler: BattlerIndex) {
    let pokemon = ctx.field.name_of(battler);
    ctx.emit(BattleEvent::PokemonFainted { battler, pokemon });
    ctx.phases.cancel_move(|p| p.pokemon == battler);
    ctx.redirect_to_ally(battler);

    let side = battler.side();
    if let Some(slot) = ctx.field.first_available_bench_slot(side) {
        ctx.phases.queue_battler_entrance(battler, slot, When::Delayed);
    } else if !ctx.field.side_can_battle(side) {
        let winner = battle_winner(ctx, side);
        ctx.phases.unshift_phase(Phase::BattleEnd { winner });
    }
}

fn battle_winner(ctx: &BattleContext, loser: Side) -> Option<Side> {
    let other = loser.opponent();
    ctx.field.side_can_battle(other).then_some(other)
}

fn recall(ctx: &mut BattleContext, battler: BattlerIndex) {
    let Some(combatant) = ctx.field.get_mut(battler) else {
        return;
    };
    combatant.switching_out = true;
    let pokemon = combatant.name.clone();
    ctx.emit(BattleEvent::PokemonRecalled { battler, pokemon });
    // Whoever comes in must not inherit the outgoing combatant's move.
    ctx.phases.cancel_move(|p| p.pokemon == battler);
}

fn switch_in(ctx: &mut BattleContext, battler: BattlerIndex, bench_slot: usize) {
    let side = battler.side();
    let usable = ctx
        .field
        .bench(side)
        .get(bench_slot)
        .is_some_and(|c| !c.is_fainted());
    let slot = match (usable, ctx.field.first_available_bench_slot(side)) {
        (true, _) => bench_slot,
        (false, Some(fallback)) => fallback,
        (false, None) => {
            trace!("Nobody left to send into {}", battler);
            return;
        }
    };

    if ctx.field.swap_with_bench(battler, slot) {
        let pokemon = ctx.field.name_of(battler);
        ctx.emit(BattleEvent::PokemonSentOut { battler, pokemon });
    }
}

fn attempt_run(ctx: &mut BattleContext, battler: BattlerIndex) {
    let pokemon = ctx.field.name_of(battler);
    ctx.emit(BattleEvent::Fled { pokemon });
    ctx.phases.unshift_phase(Phase::BattleEnd { winner: None });
    ctx.phases.clear_all_phases_leaving_current();
}

fn stat_stage_change(ctx: &mut BattleContext, battler: BattlerIndex, stat: StatType, stages: i8) {
    if !ctx.field.is_active(battler) {
        return;
    }
    let Some(combatant) = ctx.field.get_mut(battler) else {
        return;
    };
    let (old_stage, new_stage) = combatant.modify_stat_stage(stat, stages);
    let pokemon = combatant.name.clone();
    ctx.emit(BattleEvent::StatStageChanged {
        pokemon,
        stat,
        old_stage,
        new_stage,
    });
}

fn heal(ctx: &mut BattleContext, battler: BattlerIndex, amount: u16) {
    let Some(combatant) = ctx.field.get_mut(battler) else {
        return;
    };
    let healed = combatant.heal(amount);
    let event = BattleEvent::PokemonHealed {
        pokemon: combatant.name.clone(),
        amount: healed,
        new_hp: combatant.current_hp,
    };
    ctx.emit(event);
}

fn check_status_effect(ctx: &mut BattleContext) {
    let statused: Vec<BattlerIndex> = ctx
        .field
        .active_battlers()
        .into_iter()
        .filter(|b| {
            ctx.field
                .get(*b)
                .and_then(|c| c.status)
                .is_some_and(|s| s.is_post_turn())
        })
        .collect();

    for battler in ctx.speed_order(&statused) {
        ctx.phases
            .unshift_phase(Phase::PostTurnStatusEffect { battler });
    }
}

fn post_turn_status_effect(ctx: &mut BattleContext, battler: BattlerIndex) {
    if !ctx.field.is_active(battler) {
        return;
    }
    let Some(combatant) = ctx.field.get_mut(battler) else {
        return;
    };
    let Some(status) = combatant.status.filter(|s| s.is_post_turn()) else {
        return;
    };

    let damage = (combatant.max_hp / STATUS_DAMAGE_DIVISOR).max(1);
    let fainted = combatant.take_damage(damage);
    let event = BattleEvent::StatusDamage {
        pokemon: combatant.name.clone(),
        status,
        damage,
        remaining_hp: combatant.current_hp,
    };
    ctx.emit(event);
    if fainted {
        ctx.phases.queue_faint_phase(battler);
    }
}
