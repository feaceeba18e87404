//! Scene transition orchestration.
//!
//! A transition runs: capture and persist the outgoing scene, store the
//! spawn point, ask the host to load the target scene, wait for it to settle,
//! then restore. Only one transition runs at a time and a new one may not
//! start within the cooldown of the previous one.
//!
//! The first load after entering `GameState::Playing` restores as soon as the
//! scene reports loaded, without the settle delay.

use bevy::prelude::*;
use std::fmt;

use crate::save::{restore_world_state, save_world_state, SaveStore, SPAWN_POINT_KEY};
use crate::shared::*;

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionPhase {
    Idle,
    /// Initial scene load; restore without settling.
    Booting { target: SceneId },
    /// Accepted; the outgoing scene is saved this frame.
    Saving { target: SceneId, spawn_point: String },
    AwaitingScene { target: SceneId },
    Settling { target: SceneId, timer: Timer },
    Restoring { target: SceneId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionRejected {
    InProgress,
    Cooldown { remaining: f32 },
}

impl fmt::Display for TransitionRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionRejected::InProgress => write!(f, "a transition is already in progress"),
            TransitionRejected::Cooldown { remaining } => {
                write!(f, "on cooldown for another {remaining:.2}s")
            }
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct SceneTransition {
    pub phase: TransitionPhase,
    /// `Time::elapsed_secs` when the last transition was accepted.
    pub last_transition_at: Option<f32>,
}

impl Default for SceneTransition {
    fn default() -> Self {
        Self {
            phase: TransitionPhase::Idle,
            last_transition_at: None,
        }
    }
}

impl SceneTransition {
    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    /// Accept a transition to `target` at time `now`, or say why not.
    pub fn try_begin(
        &mut self,
        now: f32,
        cooldown: f32,
        target: SceneId,
        spawn_point: &str,
    ) -> Result<(), TransitionRejected> {
        if !self.is_idle() {
            return Err(TransitionRejected::InProgress);
        }
        if let Some(last) = self.last_transition_at {
            let since = now - last;
            if since < cooldown {
                return Err(TransitionRejected::Cooldown {
                    remaining: cooldown - since,
                });
            }
        }
        self.last_transition_at = Some(now);
        self.phase = TransitionPhase::Saving {
            target,
            spawn_point: spawn_point.to_string(),
        };
        Ok(())
    }
}

/// Run condition: no transition (or boot load) is in flight. Gameplay that
/// changes persisted state waits for this.
pub fn transition_idle(transition: Option<Res<SceneTransition>>) -> bool {
    transition.map_or(true, |t| t.is_idle())
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Load the start scene when play begins.
pub fn begin_boot(
    config: Res<PersistenceConfig>,
    mut transition: ResMut<SceneTransition>,
    mut load_events: EventWriter<LoadSceneEvent>,
) {
    let target = config.start_scene;
    info!("Booting into {}", target.name());
    transition.phase = TransitionPhase::Booting { target };
    load_events.send(LoadSceneEvent { scene: target });
}

pub fn accept_scene_change_requests(
    mut requests: EventReader<SceneChangeRequest>,
    mut transition: ResMut<SceneTransition>,
    config: Res<PersistenceConfig>,
    time: Res<Time>,
) {
    for request in requests.read() {
        match transition.try_begin(
            time.elapsed_secs(),
            config.transition_cooldown_secs,
            request.scene,
            &request.spawn_point,
        ) {
            Ok(()) => info!(
                "Changing to {} at spawn point {}",
                request.scene.name(),
                request.spawn_point
            ),
            Err(reason) => info!(
                "Ignoring change to {}: {}",
                request.scene.name(),
                reason
            ),
        }
    }
}

/// Persist the outgoing scene, store the spawn point and request the load.
pub fn save_outgoing_scene(world: &mut World) {
    let Some((target, spawn_point)) = world.get_resource::<SceneTransition>().and_then(|t| {
        match &t.phase {
            TransitionPhase::Saving {
                target,
                spawn_point,
            } => Some((*target, spawn_point.clone())),
            _ => None,
        }
    }) else {
        return;
    };

    if let Err(e) = save_world_state(world) {
        warn!("Continuing transition after save failure: {}", e);
    }

    match world.get_resource_mut::<SaveStore>() {
        Some(mut store) => {
            if let Err(e) = store.set(SPAWN_POINT_KEY, &spawn_point) {
                warn!("Could not store spawn point {}: {}", spawn_point, e);
            }
        }
        None => warn!("No save store, spawn point {} not stored", spawn_point),
    }

    world.send_event(LoadSceneEvent { scene: target });
    if let Some(mut transition) = world.get_resource_mut::<SceneTransition>() {
        transition.phase = TransitionPhase::AwaitingScene { target };
    }
}

pub fn on_scene_loaded(
    mut loaded: EventReader<SceneLoadedEvent>,
    mut transition: ResMut<SceneTransition>,
    config: Res<PersistenceConfig>,
) {
    for ev in loaded.read() {
        let next = match &transition.phase {
            TransitionPhase::Booting { target } if *target == ev.scene => {
                TransitionPhase::Restoring { target: *target }
            }
            TransitionPhase::AwaitingScene { target } if *target == ev.scene => {
                TransitionPhase::Settling {
                    target: *target,
                    timer: Timer::from_seconds(config.settle_delay_secs, TimerMode::Once),
                }
            }
            _ => {
                debug!("{} loaded outside a transition", ev.scene.name());
                continue;
            }
        };
        transition.phase = next;
    }
}

pub fn tick_settle_delay(mut transition: ResMut<SceneTransition>, time: Res<Time>) {
    let TransitionPhase::Settling { target, timer } = &mut transition.phase else {
        return;
    };
    timer.tick(time.delta());
    if timer.finished() {
        let target = *target;
        transition.phase = TransitionPhase::Restoring { target };
    }
}

/// Reconcile the new scene with the snapshot and return to idle.
pub fn restore_incoming_scene(world: &mut World) {
    let Some(target) = world
        .get_resource::<SceneTransition>()
        .and_then(|t| match t.phase {
            TransitionPhase::Restoring { target } => Some(target),
            _ => None,
        })
    else {
        return;
    };

    restore_world_state(world);

    if let Some(mut transition) = world.get_resource_mut::<SceneTransition>() {
        transition.phase = TransitionPhase::Idle;
    }
    world.send_event(SceneTransitionFinished { scene: target });
    info!("Transition to {} finished", target.name());
}
