use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{AudioPort, FeedbackSink, InputEvent, InputKind, SessionPorts};
use crate::chart::Note;
use crate::clock::{GameClock, MonotonicClock};
use crate::config::{GameConfig, SessionConfig, TimingConfig};
use crate::error::{Error, Result};
use crate::judge::{JudgeWindows, JudgementOutcome};
use crate::lifecycle::LifecycleTracker;
use crate::score::{ScoreAccumulator, ScoreState, SessionResult};
use crate::storage::Profile;
use crate::timeline::NoteTimeline;

/// Session state machine: `Countdown(n) -> Running -> Ending -> Ended`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Countdown(u32),
    Running,
    Ending,
    Ended,
}

impl SessionPhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Ending | Self::Ended)
    }
}

/// One play of one chart.
///
/// All mutation happens on the caller's thread through [`Session::tick`]
/// and [`Session::push_input`]. Inputs are queued and applied at the start
/// of the next running tick, before the clock advances and before that
/// tick's visibility and miss sweeps.
pub struct Session<'a> {
    timeline: NoteTimeline,
    tracker: LifecycleTracker,
    windows: JudgeWindows,
    accumulator: ScoreAccumulator,
    clock: GameClock,
    real_clock: Arc<dyn MonotonicClock>,
    audio: Box<dyn AudioPort>,
    feedback: Box<dyn FeedbackSink>,
    profile: &'a mut Profile,
    config: SessionConfig,
    timing: TimingConfig,
    fall_duration_ms: f64,
    end_threshold_ms: f64,
    phase: SessionPhase,
    countdown_started_ms: u64,
    inputs: VecDeque<InputEvent>,
    result: Option<SessionResult>,
    new_record: bool,
    torn_down: bool,
}

impl<'a> Session<'a> {
    /// Build a session. Inconsistent notes or configuration are rejected
    /// with `InvalidInput` and no session starts.
    pub fn new(
        notes: Vec<Note>,
        game: &GameConfig,
        config: SessionConfig,
        profile: &'a mut Profile,
        ports: SessionPorts,
    ) -> Result<Self> {
        game.validate()?;
        let timeline = NoteTimeline::new(
            notes,
            game.timing.lane_count,
            Some(config.song_duration_ms),
        )?;

        let fall_duration_ms = config.fall_duration_ms(&game.timing);
        let end_threshold_ms = config.song_duration_ms + fall_duration_ms + game.judge.miss_ms;
        let countdown_started_ms = ports.clock.now_ms();

        info!(
            "Session ready: {} [{}], {} notes, fall {}ms",
            config.song_id,
            config.difficulty.expand_name(),
            timeline.len(),
            fall_duration_ms
        );

        Ok(Self {
            timeline,
            tracker: LifecycleTracker::new(),
            windows: game.judge,
            accumulator: ScoreAccumulator::new(game.scoring, game.fever),
            clock: GameClock::new(game.timing.tick_ms),
            real_clock: ports.clock,
            audio: ports.audio,
            feedback: ports.feedback,
            profile,
            config,
            timing: game.timing,
            fall_duration_ms,
            end_threshold_ms,
            phase: SessionPhase::Countdown(game.timing.countdown_from),
            countdown_started_ms,
            inputs: VecDeque::new(),
            result: None,
            new_record: false,
            torn_down: false,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> ScoreState {
        self.accumulator.state()
    }

    pub fn logical_ms(&self) -> u64 {
        self.clock.logical_ms()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn timeline(&self) -> &NoteTimeline {
        &self.timeline
    }

    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    pub fn fall_duration_ms(&self) -> f64 {
        self.fall_duration_ms
    }

    pub fn profile(&self) -> &Profile {
        &*self.profile
    }

    /// Final record, once the session has ended
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Whether the final score replaced the stored high score
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Notes currently on screen or held
    pub fn active_notes(&self) -> impl Iterator<Item = &Note> {
        self.timeline
            .notes()
            .iter()
            .filter(|n| self.tracker.phase(&n.id).is_active())
    }

    /// Queue an input for the next tick.
    ///
    /// Inputs outside the running phase are dropped (`Ok(false)`); a lane
    /// that does not exist is `InvalidInput`.
    pub fn push_input(&mut self, event: InputEvent) -> Result<bool> {
        if event.lane >= self.timing.lane_count {
            return Err(Error::InvalidInput(format!(
                "lane {} out of range (0..{})",
                event.lane, self.timing.lane_count
            )));
        }
        if self.torn_down || self.phase != SessionPhase::Running {
            debug!("Dropping {:?} outside of play", event.kind);
            return Ok(false);
        }
        self.inputs.push_back(event);
        Ok(true)
    }

    /// Advance the session by one tick and return the resulting phase.
    ///
    /// Never fails: per-note faults are logged and skipped.
    pub fn tick(&mut self) -> SessionPhase {
        if self.torn_down {
            return self.phase;
        }
        match self.phase {
            SessionPhase::Countdown(shown) => self.tick_countdown(shown),
            SessionPhase::Running => self.tick_running(),
            SessionPhase::Ending | SessionPhase::Ended => {}
        }
        self.phase
    }

    fn tick_countdown(&mut self, shown: u32) {
        let elapsed = self
            .real_clock
            .now_ms()
            .saturating_sub(self.countdown_started_ms);
        let steps = elapsed / self.timing.countdown_step_ms;
        let remaining = u64::from(self.timing.countdown_from).saturating_sub(steps) as u32;

        if remaining == 0 {
            self.phase = SessionPhase::Running;
            self.clock.start();
            self.audio.play();
            info!("Session running");
        } else if remaining != shown {
            debug!("Countdown {}", remaining);
            self.phase = SessionPhase::Countdown(remaining);
        }
    }

    fn tick_running(&mut self) {
        let input_ms = self.clock.logical_ms() as f64;
        while let Some(event) = self.inputs.pop_front() {
            if let Err(e) = self.handle_input(event, input_ms) {
                warn!("Input on lane {} ignored: {}", event.lane, e);
            }
        }

        let Some(now) = self.clock.tick() else {
            return;
        };
        let now = now as f64;
        self.sweep(now);
        self.accumulator.update_fever(self.real_clock.now_ms());

        if now > self.end_threshold_ms {
            self.end();
        }
    }

    /// Materialize entering notes, then force misses on expired notes and abandoned holds
    fn sweep(&mut self, now: f64) {
        let entering: Vec<Note> = self
            .timeline
            .overdue(now, &self.tracker)
            .chain(
                self.timeline
                    .visible_window(now, self.fall_duration_ms, &self.tracker),
            )
            .cloned()
            .collect();
        for note in &entering {
            if self.tracker.mark_visible(note) {
                debug!("{} visible at {}ms", note.id, now);
            }
        }

        let miss_ms = self.windows.miss_ms;
        let mut forced = self.timeline.expired(now, miss_ms, &self.tracker);
        forced.extend(self.timeline.abandoned_holds(now, miss_ms, &self.tracker));
        for id in forced {
            if let Err(e) = self.settle(JudgementOutcome::missed(id)) {
                warn!("Miss sweep skipped a note: {}", e);
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent, now: f64) -> Result<()> {
        match event.kind {
            InputKind::Press => self.handle_press(event.lane, now),
            InputKind::Release => self.handle_release(event.lane, now),
        }
    }

    /// Judge the closest pressable note in the lane. A press on an empty lane is not a miss.
    fn handle_press(&mut self, lane: u8, now: f64) -> Result<()> {
        let closest = self
            .timeline
            .pressable_in_lane(lane, &self.tracker)
            .min_by(|a, b| {
                (a.time_ms() - now)
                    .abs()
                    .total_cmp(&(b.time_ms() - now).abs())
            })
            .cloned();
        let Some(note) = closest else {
            debug!("Empty press on lane {} at {}ms", lane, now);
            return Ok(());
        };

        if note.is_long() {
            return self.tracker.start_hold(&note, now);
        }
        let outcome = self.windows.judge_press(&note, now);
        self.settle(outcome)
    }

    /// Release ends a hold in the lane, if any
    fn handle_release(&mut self, lane: u8, now: f64) -> Result<()> {
        let Some((id, _)) = self.tracker.holding_in_lane(lane) else {
            return Ok(());
        };
        let id = id.clone();
        let note = self
            .timeline
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownNote(id))?;
        let outcome = self.windows.judge_release(&note, now);
        self.settle(outcome)
    }

    /// Resolve through the tracker, then score. Nothing is scored twice.
    fn settle(&mut self, outcome: JudgementOutcome) -> Result<()> {
        let outcome = self.tracker.resolve(outcome)?;
        self.accumulator
            .apply(&outcome, self.real_clock.now_ms());
        self.feedback.on_judgement(&outcome);
        Ok(())
    }

    /// Finish the session. Idempotent: the result and the high-score write
    /// happen once, later calls return the same record.
    pub fn end(&mut self) -> Option<&SessionResult> {
        if self.phase.is_finished() || self.torn_down {
            return self.result.as_ref();
        }
        self.phase = SessionPhase::Ending;
        self.clock.stop();
        self.audio.pause();
        self.inputs.clear();

        let state = self.accumulator.state();
        let result =
            SessionResult::from_state(&state, &self.config.song_id, self.config.difficulty);
        self.new_record = self
            .profile
            .save_high_score(self.config.difficulty, result.score);

        info!(
            "Session ended: score {}, max combo {}, {}",
            result.score,
            result.max_combo,
            result.clear_label()
        );
        self.result = Some(result);
        self.phase = SessionPhase::Ended;
        self.result.as_ref()
    }

    /// Stop the clock and release audio. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.clock.stop();
        self.audio.pause();
        self.audio.release();
        self.inputs.clear();
        self.tracker.clear();
        debug!("Session torn down at {}ms", self.clock.logical_ms());
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Difficulty, FlickDirection, NoteId};
    use crate::lifecycle::NotePhase;
    use crate::clock::ManualClock;
    use crate::storage::{HIGH_SCORES_KEY, KeyValueStore, MemoryStore};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingAudio {
        plays: Arc<AtomicUsize>,
        pauses: Arc<AtomicUsize>,
        releases: Arc<AtomicUsize>,
    }

    impl AudioPort for CountingAudio {
        fn play(&mut self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
        fn pause(&mut self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }
        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
        fn seek_to(&mut self, _position_ms: u64) {}
    }

    #[derive(Clone, Default)]
    struct CountingStore {
        inner: Arc<Mutex<MemoryStore>>,
        high_score_writes: Arc<AtomicUsize>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.lock().unwrap().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if key == HIGH_SCORES_KEY {
                self.high_score_writes.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.lock().unwrap().set(key, value)
        }
    }

    fn profile() -> Profile {
        Profile::load(Box::new(MemoryStore::new()))
    }

    fn session<'a>(
        notes: Vec<Note>,
        profile: &'a mut Profile,
        clock: &ManualClock,
        audio: CountingAudio,
    ) -> Session<'a> {
        let config = SessionConfig::builder()
            .difficulty(Difficulty::Normal)
            .song_duration_ms(10_000.0)
            .build()
            .unwrap();
        let ports = SessionPorts::new(Arc::new(clock.clone())).audio(Box::new(audio));
        Session::new(notes, &GameConfig::default(), config, profile, ports).unwrap()
    }

    fn start(session: &mut Session<'_>, clock: &ManualClock) {
        clock.advance(3000);
        assert_eq!(session.tick(), SessionPhase::Running);
    }

    fn run_until(session: &mut Session<'_>, ms: u64) {
        while session.logical_ms() < ms && session.phase() == SessionPhase::Running {
            session.tick();
        }
    }

    fn press_at(session: &mut Session<'_>, ms: u64, lane: u8) {
        run_until(session, ms);
        assert_eq!(session.logical_ms(), ms);
        assert!(session.push_input(InputEvent::press(lane)).unwrap());
        session.tick();
    }

    #[test]
    fn test_countdown_starts_audio() {
        let clock = ManualClock::new();
        let audio = CountingAudio::default();
        let mut profile = profile();
        let mut session = session(vec![], &mut profile, &clock, audio.clone());

        assert_eq!(session.tick(), SessionPhase::Countdown(3));
        clock.advance(999);
        assert_eq!(session.tick(), SessionPhase::Countdown(3));
        clock.advance(1);
        assert_eq!(session.tick(), SessionPhase::Countdown(2));
        clock.advance(1000);
        assert_eq!(session.tick(), SessionPhase::Countdown(1));
        assert_eq!(session.logical_ms(), 0);
        assert_eq!(audio.plays.load(Ordering::SeqCst), 0);

        clock.advance(1000);
        assert_eq!(session.tick(), SessionPhase::Running);
        assert_eq!(audio.plays.load(Ordering::SeqCst), 1);
        session.tick();
        assert_eq!(session.logical_ms(), 16);
    }

    #[test]
    fn test_input_before_start_is_dropped() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        assert!(!session.push_input(InputEvent::press(0)).unwrap());
        assert!(matches!(
            session.push_input(InputEvent::press(4)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_press_judges_closest_note() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0), Note::normal("b", 1.4, 0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 992, 0);
        let state = session.score();
        assert_eq!(state.perfect_count, 1);
        assert_eq!(state.score, 100);
        assert_eq!(state.combo, 1);
        assert_eq!(session.active_notes().count(), 1);
    }

    #[test]
    fn test_empty_press_is_not_a_miss() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 992, 2);
        assert_eq!(session.score().judged_count(), 0);
    }

    #[test]
    fn test_hit_note_is_not_swept_again() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 992, 0);
        let after_hit = session.score();
        press_at(&mut session, 1008, 0);
        run_until(&mut session, 3000);
        assert_eq!(session.score(), after_hit);
        assert_eq!(session.tracker().resolved_len(), 1);
    }

    #[test]
    fn test_unhit_note_missed_after_threshold() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0), Note::normal("b", 0.5, 1)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 496, 1);
        assert_eq!(session.score().combo, 1);

        run_until(&mut session, 1696);
        assert_eq!(session.score().miss_count, 0);
        session.tick();
        assert_eq!(session.logical_ms(), 1712);
        let state = session.score();
        assert_eq!(state.miss_count, 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 1);
    }

    #[test]
    fn test_combo_never_exceeds_max_combo() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let notes = (0..12)
            .map(|i| Note::normal(format!("n{}", i), 1.008 + i as f64 * 0.32, (i % 4) as u8))
            .collect();
        let mut session = session(notes, &mut profile, &clock, CountingAudio::default());
        start(&mut session, &clock);

        for i in 0..12u64 {
            let ms = 1008 + i * 320;
            run_until(&mut session, ms);
            if i % 5 != 4 {
                session.push_input(InputEvent::press((i % 4) as u8)).unwrap();
            }
            let before = session.score();
            session.tick();
            let state = session.score();
            assert!(state.max_combo >= state.combo);
            if state.miss_count > before.miss_count {
                assert_eq!(state.combo, 0);
            }
        }
        run_until(&mut session, 6000);
        let state = session.score();
        assert_eq!(state.miss_count, 2);
        assert_eq!(state.perfect_count, 10);
        assert!(state.max_combo >= state.combo);
    }

    #[test]
    fn test_long_note_judged_on_release() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::long("l", 1.0, 1, 1.0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 992, 1);
        assert_eq!(session.score().judged_count(), 0);
        run_until(&mut session, 1904);
        assert_eq!(session.score().miss_count, 0);

        run_until(&mut session, 2000);
        session.push_input(InputEvent::release(1)).unwrap();
        session.tick();
        let state = session.score();
        assert_eq!(state.perfect_count, 1);
        assert_eq!(session.tracker().active_len(), 0);
    }

    #[test]
    fn test_abandoned_hold_is_missed() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::long("l", 1.0, 1, 1.0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 992, 1);
        run_until(&mut session, 2688);
        assert_eq!(session.score().miss_count, 0);
        session.tick();
        assert_eq!(session.logical_ms(), 2704);
        assert_eq!(session.score().miss_count, 1);
    }

    #[test]
    fn test_release_resolves_oldest_hold_in_lane() {
        for _ in 0..16 {
            let clock = ManualClock::new();
            let mut profile = profile();
            let mut session = session(
                vec![Note::long("a", 1.0, 0, 2.0), Note::long("b", 1.5, 0, 0.5)],
                &mut profile,
                &clock,
                CountingAudio::default(),
            );
            start(&mut session, &clock);

            press_at(&mut session, 992, 0);
            press_at(&mut session, 1504, 0);
            run_until(&mut session, 2000);
            session.push_input(InputEvent::release(0)).unwrap();
            session.tick();

            let state = session.score();
            assert_eq!((state.perfect_count, state.miss_count), (0, 1));
            assert_eq!(session.tracker().phase(&NoteId::new("a")), NotePhase::Resolved);
            assert!(matches!(
                session.tracker().phase(&NoteId::new("b")),
                NotePhase::Holding { start_ms, .. } if start_ms == 1504.0
            ));

            run_until(&mut session, 2704);
            assert_eq!(session.score().miss_count, 2);
        }
    }

    #[test]
    fn test_flick_direction_is_ignored() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::flick("f", 1.0, 3, FlickDirection::Up)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        run_until(&mut session, 1008);
        session
            .push_input(InputEvent::flick(3, FlickDirection::Down))
            .unwrap();
        session.tick();
        assert_eq!(session.score().perfect_count, 1);
    }

    #[test]
    fn test_note_at_song_start_is_not_lost() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(
            vec![Note::normal("zero", 0.0, 0)],
            &mut profile,
            &clock,
            CountingAudio::default(),
        );
        start(&mut session, &clock);

        press_at(&mut session, 16, 0);
        assert_eq!(session.score().perfect_count, 1);
    }

    #[test]
    fn test_all_perfect_session() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let times = [1008u64, 1504, 2000, 2496, 3008];
        let notes = times
            .iter()
            .enumerate()
            .map(|(i, &ms)| Note::normal(format!("n{}", i), ms as f64 / 1000.0, i as u8 % 4))
            .collect();
        let mut session = session(notes, &mut profile, &clock, CountingAudio::default());
        start(&mut session, &clock);

        for (i, &ms) in times.iter().enumerate() {
            press_at(&mut session, ms, i as u8 % 4);
        }
        while session.tick() != SessionPhase::Ended {}

        let result = session.result().unwrap().clone();
        assert!(result.all_perfect);
        assert!(result.full_combo);
        assert_eq!(result.perfect, 5);
        assert_eq!(result.score, 500);
        assert!(session.is_new_record());
        drop(session);
        assert_eq!(profile.high_score(Difficulty::Normal), 500);
    }

    #[test]
    fn test_end_fires_once_past_threshold() {
        let clock = ManualClock::new();
        let store = CountingStore::default();
        let writes = store.high_score_writes.clone();
        let mut profile = Profile::load(Box::new(store));
        let audio = CountingAudio::default();
        let mut session = session(
            vec![Note::normal("a", 1.0, 0)],
            &mut profile,
            &clock,
            audio.clone(),
        );
        start(&mut session, &clock);
        press_at(&mut session, 992, 0);

        // 10000 song + 2500 fall + 700 miss
        run_until(&mut session, 13_200);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.tick(), SessionPhase::Ended);
        assert_eq!(session.logical_ms(), 13_216);

        let first = session.result().cloned();
        assert_eq!(session.end().cloned(), first);
        assert_eq!(session.tick(), SessionPhase::Ended);
        assert_eq!(session.logical_ms(), 13_216);
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(audio.pauses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_forced_end_during_countdown() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let mut session = session(vec![], &mut profile, &clock, CountingAudio::default());
        let result = session.end().cloned().unwrap();
        assert_eq!(result.score, 0);
        assert!(!session.is_new_record());
        assert_eq!(session.tick(), SessionPhase::Ended);
    }

    #[test]
    fn test_fever_runs_on_real_time() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let notes = (0..50)
            .map(|i| Note::normal(format!("n{}", i), (1008 + i * 160) as f64 / 1000.0, (i % 4) as u8))
            .collect();
        let mut session = session(notes, &mut profile, &clock, CountingAudio::default());
        start(&mut session, &clock);

        for i in 0..50u64 {
            press_at(&mut session, 1008 + i * 160, (i % 4) as u8);
        }
        let state = session.score();
        assert_eq!(state.combo, 50);
        assert!(state.fever_active);

        clock.advance(9_999);
        session.tick();
        assert!(session.score().fever_active);
        clock.advance(1);
        session.tick();
        let state = session.score();
        assert!(!state.fever_active);
        assert_eq!(state.fever_gauge, 0.0);
    }

    #[test]
    fn test_teardown_releases_audio_once() {
        let clock = ManualClock::new();
        let audio = CountingAudio::default();
        let mut profile = profile();
        {
            let mut session = session(
                vec![Note::normal("a", 1.0, 0)],
                &mut profile,
                &clock,
                audio.clone(),
            );
            start(&mut session, &clock);
            session.tick();
            session.teardown();
            let at = session.logical_ms();
            session.tick();
            assert_eq!(session.logical_ms(), at);
            assert!(session.result().is_none());
            assert_eq!(session.tracker().active_len(), 0);
        }
        assert_eq!(audio.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_notes_rejected_at_construction() {
        let clock = ManualClock::new();
        let mut profile = profile();
        let config = SessionConfig::builder()
            .song_duration_ms(10_000.0)
            .build()
            .unwrap();

        let bad_lane = vec![Note::normal("a", 1.0, 7)];
        let err = Session::new(
            bad_lane,
            &GameConfig::default(),
            config.clone(),
            &mut profile,
            SessionPorts::new(Arc::new(clock.clone())),
        )
        .err()
        .unwrap();
        assert!(matches!(err, Error::InvalidInput(_)));

        let past_end = vec![Note::normal("a", 11.0, 0)];
        assert!(
            Session::new(
                past_end,
                &GameConfig::default(),
                config,
                &mut profile,
                SessionPorts::new(Arc::new(clock)),
            )
            .is_err()
        );
    }
}
