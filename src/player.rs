use crate::encoder::{SampleSource, SharedSource};
use crate::format::PlayerOpts;
use crate::session::AudioSession;
use crate::sink::{AudioSink, SinkProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Streams buffers from a sample source to an output sink on a dedicated thread.
///
/// Every call to [`Player::start`] spawns a new thread running one playback episode.
/// An episode opens a sink, then repeatedly pulls a buffer from the source and writes it
/// until it is stopped, the session is killed, the source runs dry or the sink fails.
/// On the way out the sink is always drained and closed.
pub struct Player {
    session: Arc<AudioSession>,
    opts: PlayerOpts,
    sinks: Arc<dyn SinkProvider>,
    source: Option<SharedSource>,
    episode: Option<Episode>,
}

struct Episode {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Player {
    pub fn new(session: Arc<AudioSession>, opts: PlayerOpts, sinks: Arc<dyn SinkProvider>) -> Self {
        Self {
            session,
            opts,
            sinks,
            source: None,
            episode: None,
        }
    }

    /// Sets the source pulled from by episodes started after this call.
    pub fn set_sample_source(&mut self, source: SharedSource) {
        self.source = Some(source);
    }

    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    /// Starts a playback episode on a new thread.
    /// Returns `false` without doing anything if no source is attached, the session has
    /// been killed or an episode is still running.
    pub fn start(&mut self) -> bool {
        let Some(source) = self.source.clone() else {
            log::debug!("Ignoring start request: no sample source attached");
            return false;
        };
        if self.session.is_killed() {
            log::warn!("Ignoring start request: the session has been killed");
            return false;
        }
        if self.is_running() {
            log::warn!("Ignoring start request: the player is already running");
            return false;
        }
        self.join();

        let stop = Arc::new(AtomicBool::new(false));
        let ctx = EpisodeContext {
            session: Arc::clone(&self.session),
            sinks: Arc::clone(&self.sinks),
            opts: self.opts,
            source,
            stop: Arc::clone(&stop),
        };
        let spawned = std::thread::Builder::new()
            .name("modsynth-player".into())
            .spawn(move || ctx.run());
        match spawned {
            Ok(handle) => {
                self.episode = Some(Episode { stop, handle });
                true
            }
            Err(err) => {
                log::error!("Could not spawn the playback thread: {}", err);
                false
            }
        }
    }

    /// Asks the current episode to finish after its in-flight buffer.
    pub fn stop(&self) {
        if let Some(episode) = &self.episode {
            episode.stop.store(true, Ordering::Release);
        }
    }

    /// Whether an episode thread is still alive, including one that is winding down.
    pub fn is_running(&self) -> bool {
        self.episode
            .as_ref()
            .is_some_and(|episode| !episode.handle.is_finished())
    }

    /// Waits for the current episode, if any, to end.
    pub fn join(&mut self) {
        if let Some(episode) = self.episode.take() {
            if episode.handle.join().is_err() {
                log::error!("The playback thread panicked");
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

struct EpisodeContext {
    session: Arc<AudioSession>,
    sinks: Arc<dyn SinkProvider>,
    opts: PlayerOpts,
    source: SharedSource,
    stop: Arc<AtomicBool>,
}

impl EpisodeContext {
    fn should_exit(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.session.is_killed()
    }

    fn run(self) {
        let sink = match self.sinks.open(&self.opts.format) {
            Ok(sink) => sink,
            Err(err) => {
                log::error!("Could not open the output sink: {}", err);
                return;
            }
        };
        let mut sink = SinkGuard(sink);
        log::info!("Playback started ({})", self.opts.format);

        let mut buffer = vec![0; self.opts.buffer_size];
        let mut buffers = 0usize;
        while !self.should_exit() {
            let written = self.source.lock().fill_buffer(&mut buffer);
            if written == 0 {
                log::debug!("Sample source produced no audio");
                break;
            }
            if let Err(err) = sink.0.write(&buffer[..written]) {
                log::error!("Could not write to the output sink: {}", err);
                break;
            }
            buffers += 1;
        }

        log::info!("Playback ended after {} buffer(s)", buffers);
    }
}

/// Drains and closes a sink when dropped, including while unwinding.
struct SinkGuard(Box<dyn AudioSink>);

impl Drop for SinkGuard {
    fn drop(&mut self) {
        if let Err(err) = self.0.drain() {
            log::error!("Could not drain the output sink: {}", err);
        }
        if let Err(err) = self.0.close() {
            log::error!("Could not close the output sink: {}", err);
        }
        log::debug!("Output sink released");
    }
}
