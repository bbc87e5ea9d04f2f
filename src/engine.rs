// Practice Engine - Owns the transport, pattern playback, metronome and
// hit grading, and reports to the UI through a notification channel

use crate::audio::{SharedOutput, SilentOutput, shared_output};
use crate::config::{ConfigError, EngineConfig};
use crate::messaging::{
    Notification, NotificationConsumer, NotificationProducer, create_notification_channel,
};
use crate::pads::PadId;
use crate::practice::{HitAnalyzer, HitResult, PracticeSession, PracticeStats};
use crate::sequencer::{
    ManualTransport, MetronomeEngine, Pattern, PatternScheduler, StepGrid, Tempo,
    TimeSignature, TransportClock,
};
use crate::sequencer::pattern::PatternId;
use log::{debug, info, trace};
use ringbuf::traits::Producer;
use std::cell::RefCell;
use std::rc::Rc;

type SharedNotifications = Rc<RefCell<NotificationProducer>>;

fn notify(notifications: &SharedNotifications, notification: Notification) {
    if notifications.borrow_mut().try_push(notification).is_err() {
        trace!("notification channel full, dropped {}", notification);
    }
}

/// Rhythm practice engine
///
/// One explicit instance per session. All methods run on the caller's
/// thread; tick callbacks fire from inside [`TransportClock`] calls made by
/// the host (for [`ManualTransport`], from [`advance`](PracticeEngine::advance)).
pub struct PracticeEngine<T: TransportClock = ManualTransport> {
    transport: T,
    scheduler: PatternScheduler,
    metronome: MetronomeEngine,
    analyzer: HitAnalyzer,
    session: PracticeSession,
    output: SharedOutput,
    notifications: SharedNotifications,
}

impl<T: TransportClock> PracticeEngine<T> {
    /// Create an engine and the UI end of its notification channel
    pub fn new(
        transport: T,
        output: SharedOutput,
        config: EngineConfig,
    ) -> Result<(Self, NotificationConsumer), ConfigError> {
        config.validate()?;

        let (producer, consumer) = create_notification_channel(config.notification_capacity);
        let notifications = Rc::new(RefCell::new(producer));

        let mut metronome = MetronomeEngine::new(Rc::clone(&output), config.metronome)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let beat_sink = Rc::clone(&notifications);
        metronome.on_beat(Box::new(move |beat, voice| {
            notify(&beat_sink, Notification::Beat { beat, voice });
        }));

        let mut scheduler = PatternScheduler::new();
        let step_sink = Rc::clone(&notifications);
        scheduler.on_step(Box::new(move |step, pads| {
            notify(&step_sink, Notification::pattern_step(step, pads));
        }));

        let engine = Self {
            transport,
            scheduler,
            metronome,
            analyzer: HitAnalyzer::new(config.analyzer),
            session: PracticeSession::new(config.history_len),
            output,
            notifications,
        };
        info!("practice engine created");
        Ok((engine, consumer))
    }

    // Pattern playback

    /// Load a pattern, replacing (and stopping) the current one
    pub fn load_pattern(&mut self, pattern: Pattern) {
        self.scheduler.load(pattern, &mut self.transport);
        self.analyzer.reset();
    }

    /// Remove the loaded pattern
    pub fn unload_pattern(&mut self) -> Option<Pattern> {
        let pattern = self.scheduler.unload(&mut self.transport);
        if !self.metronome.is_running() {
            self.transport.stop();
        }
        pattern
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.scheduler.pattern()
    }

    /// Start the loaded pattern and the transport
    /// With `play_audio` false the pattern only drives grading and step
    /// notifications; nothing is triggered on the output.
    pub fn start_pattern(&mut self, play_audio: bool) {
        if self.scheduler.pattern().is_none() {
            debug!("start_pattern without a pattern");
            return;
        }
        let output = if play_audio {
            Rc::clone(&self.output)
        } else {
            shared_output(SilentOutput)
        };
        self.scheduler.start(&mut self.transport, output);
        self.transport.start();
    }

    /// Stop the pattern and rewind the transport
    pub fn stop_pattern(&mut self) {
        self.scheduler.stop(&mut self.transport);
        if !self.transport.state().is_stopped() {
            self.transport.stop();
        }
        if self.metronome.is_running() {
            // Keep the metronome going from the top
            self.metronome.start(&mut self.transport);
            self.transport.start();
        }
    }

    pub fn is_pattern_running(&self) -> bool {
        self.scheduler.is_running()
    }

    // Metronome

    /// Start the metronome and the transport
    /// The transport takes the metronome tempo; a playing pattern follows it.
    pub fn start_metronome(&mut self) {
        self.metronome.start(&mut self.transport);
        self.transport.start();
        self.sync_pattern_tempo();
    }

    /// Stop the metronome; the transport stops too unless a pattern plays
    pub fn stop_metronome(&mut self) {
        self.metronome.stop(&mut self.transport);
        if !self.scheduler.is_running() && !self.transport.state().is_stopped() {
            self.transport.stop();
        }
    }

    /// Change the metronome tempo (applied to the transport when running)
    pub fn set_metronome_tempo(&mut self, tempo: Tempo) {
        self.metronome.set_tempo(tempo, &mut self.transport);
        self.sync_pattern_tempo();
    }

    /// Change the metronome meter (resets its grouping to the meter default)
    pub fn set_metronome_time_signature(&mut self, time_signature: TimeSignature) {
        self.metronome.set_time_signature(time_signature, &mut self.transport);
        self.sync_pattern_tempo();
    }

    /// Grade against the tempo the transport actually plays at
    fn sync_pattern_tempo(&mut self) {
        let tempo = self.transport.tempo();
        self.scheduler.follow_tempo(tempo);
    }

    pub fn metronome(&self) -> &MetronomeEngine {
        &self.metronome
    }

    /// Metronome settings that do not touch the transport (volume, mute,
    /// preset, grouping)
    pub fn metronome_mut(&mut self) -> &mut MetronomeEngine {
        &mut self.metronome
    }

    /// Beat index of the last metronome tick
    pub fn current_beat(&self) -> Option<u32> {
        self.metronome.current_beat()
    }

    // Pads and practice

    /// Play a pad and, while practicing against a running pattern, grade it
    pub fn trigger_pad(&mut self, pad_id: PadId) -> Option<HitResult> {
        self.output.borrow_mut().trigger(pad_id);

        if !(self.session.is_practicing() && self.scheduler.is_running()) {
            notify(&self.notifications, Notification::PadTriggered(pad_id));
            return None;
        }

        let now = self.transport.now();
        let result = self.analyzer.analyze(pad_id, now, &self.scheduler);
        self.session.record(result);

        notify(&self.notifications, Notification::Hit(result));
        notify(&self.notifications, Notification::Stats(self.session.stats()));
        Some(result)
    }

    /// Begin a practice run with fresh stats
    pub fn start_practice(&mut self) {
        self.session.start();
        self.analyzer.reset();
        info!("practice started");
    }

    pub fn stop_practice(&mut self) {
        self.session.stop();
        let stats = self.session.stats();
        info!(
            "practice stopped: {} hits, {}% accuracy, best streak {}",
            stats.total_hits, stats.accuracy_percent, stats.best_streak
        );
    }

    pub fn reset_stats(&mut self) {
        self.session.reset();
        self.analyzer.reset();
    }

    pub fn stats(&self) -> PracticeStats {
        self.session.stats()
    }

    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    // Step grid

    /// Editable grid of the loaded pattern
    pub fn step_grid(&self, pad_ids: &[PadId]) -> Option<StepGrid> {
        self.scheduler
            .pattern()
            .map(|pattern| StepGrid::from_pattern(pattern, pad_ids))
    }

    /// Turn a grid into a pattern and load it
    pub fn load_step_grid(
        &mut self,
        grid: &StepGrid,
        id: impl Into<PatternId>,
        name: impl Into<String>,
        tempo: Tempo,
    ) -> Result<(), ConfigError> {
        let pattern = grid
            .to_pattern(id, name, tempo)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.load_pattern(pattern);
        Ok(())
    }

    // Transport

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Stop everything and release the engine
    pub fn dispose(mut self) -> T {
        self.session.stop();
        self.metronome.stop(&mut self.transport);
        self.scheduler.unload(&mut self.transport);
        if !self.transport.state().is_stopped() {
            self.transport.stop();
        }
        info!("practice engine disposed");
        self.transport
    }
}

impl PracticeEngine<ManualTransport> {
    /// Engine on a manual transport with default settings
    pub fn with_output(output: SharedOutput) -> Result<(Self, NotificationConsumer), ConfigError> {
        Self::new(ManualTransport::new(), output, EngineConfig::default())
    }

    /// Advance the manual transport, firing due ticks
    pub fn advance(&mut self, delta_seconds: f64) -> usize {
        self.transport.advance(delta_seconds)
    }
}
