use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::format::PlayerOpts;
use crate::player::Player;
use crate::sink::SinkProvider;
use crate::synth::voice::ModulatedVoice;

/// State shared by every voice and player created within one session.
///
/// The master volume scales the output of all voices, and the kill flag stops
/// all players. Both are plain "last write wins" values.
#[derive(Debug)]
pub struct AudioSession {
    master_volume: AtomicU64,
    killed: AtomicBool,
}

impl AudioSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            master_volume: AtomicU64::new(1.0f64.to_bits()),
            killed: AtomicBool::new(false),
        })
    }

    pub fn master_volume(&self) -> f64 {
        f64::from_bits(self.master_volume.load(Ordering::Relaxed))
    }

    pub fn set_master_volume(&self, volume: f64) {
        self.master_volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    /// Forces every player in this session to stop at its next buffer boundary.
    /// There is no way to undo this.
    pub fn kill_all(&self) {
        log::info!("Kill-all requested, stopping every player");
        self.killed.store(true, Ordering::Release);
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }

    /// Creates a voice bound to this session's master volume.
    pub fn voice(self: &Arc<Self>) -> ModulatedVoice {
        ModulatedVoice::new(Arc::clone(self))
    }

    /// Creates a player bound to this session's kill flag.
    pub fn player(self: &Arc<Self>, opts: PlayerOpts, sinks: Arc<dyn SinkProvider>) -> Player {
        Player::new(Arc::clone(self), opts, sinks)
    }
}
