use clap::Parser;
use modsynth::sink::{DeviceSinks, SinkProvider, WavSinks};
use modsynth::{AudioSession, BufferEncoder, PlayerOpts, VoiceOpts, Waveshape};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Plays a frequency- and amplitude-modulated tone.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Carrier frequency in Hz
    #[arg(short, long, default_value_t = 440.0)]
    frequency: f64,
    /// Carrier waveshape (sine, square or saw)
    #[arg(short, long, default_value_t = Waveshape::Sine)]
    waveshape: Waveshape,
    /// Frequency modulator rate in Hz, 0 to disable
    #[arg(long, default_value_t = 0.0)]
    fm_frequency: f64,
    #[arg(long, default_value_t = Waveshape::Sine)]
    fm_waveshape: Waveshape,
    /// Amplitude modulator rate in Hz, 0 to disable
    #[arg(long, default_value_t = 0.0)]
    am_frequency: f64,
    #[arg(long, default_value_t = Waveshape::Sine)]
    am_waveshape: Waveshape,
    /// Volume of the voice
    #[arg(long, default_value_t = 1.0)]
    volume: f64,
    /// Volume applied to every voice
    #[arg(long, default_value_t = 1.0)]
    master_volume: f64,
    /// How long to play for
    #[arg(short, long, default_value_t = 3.0)]
    seconds: f64,
    /// Bytes per buffer handed to the output
    #[arg(long, default_value_t = modsynth::format::BUFFER_SIZE)]
    buffer_size: usize,
    /// Render into this WAV file instead of playing on the default device
    #[arg(long)]
    wav: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    anyhow::ensure!(
        args.buffer_size >= 2 && args.buffer_size % 2 == 0,
        "The buffer size must be a positive even number of bytes"
    );
    anyhow::ensure!(args.seconds >= 0.0, "The duration cannot be negative");

    let session = AudioSession::new();
    session.set_master_volume(args.master_volume);
    {
        let session = Arc::clone(&session);
        ctrlc::set_handler(move || session.kill_all())?;
    }

    let voice = session.voice();
    let source = BufferEncoder::shared(voice);
    source.lock().generator_mut().apply(VoiceOpts {
        base_frequency: args.frequency,
        base_waveshape: args.waveshape,
        fm_frequency: args.fm_frequency,
        fm_waveshape: args.fm_waveshape,
        am_frequency: args.am_frequency,
        am_waveshape: args.am_waveshape,
        volume: args.volume,
    });

    let sinks: Arc<dyn SinkProvider> = match &args.wav {
        Some(path) => Arc::new(WavSinks::new(path)),
        None => Arc::new(DeviceSinks::new()),
    };
    let opts = PlayerOpts {
        buffer_size: args.buffer_size,
        ..Default::default()
    };
    let mut player = session.player(opts, sinks);
    player.set_sample_source(source);
    anyhow::ensure!(player.start(), "Playback could not be started");

    let deadline = Instant::now() + Duration::from_secs_f64(args.seconds);
    while player.is_running() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    player.stop();
    player.join();
    Ok(())
}
