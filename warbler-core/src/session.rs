use std::{path::Path, time::Instant};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    HistoryLog, PlayQueue, Storage,
    audio::{AudioError, AudioOutput},
    bs::{Library, RepeatMode, Track, TrackId},
};

/// Everything needed to start a [`Session`].
pub struct SessionArgs {
    pub library: Library,
    pub history: Vec<TrackId>,
    pub output: Box<dyn AudioOutput>,
    pub storage: Storage,
    pub volume: f32,
    pub repeat_mode: RepeatMode,
    /// Seeds shuffle; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

/// The playback state machine.
///
/// Owns the library, the play queue and the history log, and drives the
/// audio output. Progress is advanced by wall-clock ticks rather than read
/// back from the device.
pub struct Session {
    library: Library,
    queue: PlayQueue,
    history: HistoryLog,
    output: Box<dyn AudioOutput>,
    storage: Storage,

    current: Option<TrackId>,
    is_playing: bool,
    progress: f64,
    progress_max: f64,
    shuffle: bool,
    repeat_mode: RepeatMode,
    volume: f32,
    seek_dragging: bool,

    clock_anchor: Option<Instant>,
    rng: StdRng,
}
impl Session {
    /// Used when the current track reports no duration.
    pub const DEFAULT_PROGRESS_MAX: f64 = 180.0;
    /// How close to the end a track must be to count as finished.
    pub const END_TOLERANCE: f64 = 0.5;
    /// Past this point, "previous" restarts the current track instead.
    pub const RESTART_THRESHOLD: f64 = 3.0;

    pub fn new(args: SessionArgs) -> Self {
        let SessionArgs {
            library,
            history,
            output,
            storage,
            volume,
            repeat_mode,
            rng_seed,
        } = args;

        let mut session = Self {
            library,
            queue: PlayQueue::default(),
            history: HistoryLog::new(history),
            output,
            storage,

            current: None,
            is_playing: false,
            progress: 0.0,
            progress_max: Self::DEFAULT_PROGRESS_MAX,
            shuffle: false,
            repeat_mode,
            volume: volume.clamp(0.0, 1.0),
            seek_dragging: false,

            clock_anchor: None,
            rng: match rng_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            },
        };
        let volume = session.volume;
        session.device("set volume", |output| output.set_volume(volume));
        session
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Swaps in a freshly scanned library. The current track keeps playing
    /// even if it is no longer part of it.
    pub fn replace_library(&mut self, library: Library) {
        self.library = library;
    }

    pub fn queue(&self) -> &PlayQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut PlayQueue {
        &mut self.queue
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn current_track_id(&self) -> Option<&TrackId> {
        self.current.as_ref()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref().and_then(|id| self.library.get(id))
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn progress_max(&self) -> f64 {
        self.progress_max
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_seek_dragging(&self) -> bool {
        self.seek_dragging
    }

    /// Starts `id` at `start_offset` seconds and records it in the history.
    ///
    /// Unknown and unplayable tracks are ignored. Returns whether playback
    /// started.
    pub fn play(&mut self, id: &TrackId, start_offset: f64) -> bool {
        let Some(track) = self.library.get(id) else {
            tracing::debug!("ignoring request to play unknown track {id}");
            return false;
        };
        let Some(path) = track.file_path.clone() else {
            tracing::debug!("{id} has no file and can't be played");
            return false;
        };
        let progress_max = if track.duration > 0 {
            track.duration as f64
        } else {
            Self::DEFAULT_PROGRESS_MAX
        };

        tracing::info!("playing {} - {}", track.artist, track.title);
        self.current = Some(id.clone());
        self.is_playing = true;
        self.progress_max = progress_max;
        self.progress = start_offset.clamp(0.0, progress_max);
        self.clock_anchor = None;

        self.start_output(&path, self.progress);

        if self.history.record(id) {
            self.storage.save_history(self.history.persisted());
        }
        true
    }

    fn start_output(&mut self, path: &Path, start_offset: f64) {
        if let Err(e) = self
            .output
            .load(path)
            .and_then(|()| self.output.play())
        {
            tracing::warn!("failed to start playback: {e}");
            return;
        }
        if start_offset <= 0.0 {
            return;
        }
        if let Err(e) = self.output.seek(start_offset) {
            tracing::warn!("couldn't start at {start_offset:.1}s, restarting from 0: {e}");
            self.progress = 0.0;
            self.device("restart", |output| output.play());
        }
    }

    /// Pauses or resumes. With nothing loaded, starts the first library
    /// track; a track stopped at its end is replayed from the start.
    pub fn toggle_play(&mut self) {
        let Some(current) = self.current.clone() else {
            if let Some(first) = self.library.first().map(|t| t.id.clone()) {
                self.play(&first, 0.0);
            }
            return;
        };
        if !self.is_playing && self.is_at_end() {
            self.play(&current, 0.0);
            return;
        }

        self.is_playing = !self.is_playing;
        self.clock_anchor = None;
        if self.is_playing {
            self.device("unpause", |output| output.unpause());
        } else {
            self.device("pause", |output| output.pause());
        }
    }

    /// Advances to the next track: the queue head first (skipping entries
    /// that are no longer in the library), then the neighbour in `active`
    /// according to the shuffle and repeat settings.
    pub fn next(&mut self, active: &[TrackId]) {
        while let Some(queued) = self.queue.dequeue_head() {
            if self.play(&queued, 0.0) {
                return;
            }
            tracing::debug!("skipping stale queue entry {queued}");
        }

        let Some(current) = self.current.clone() else {
            return;
        };
        let Some((list, index)) = self.locate(active, &current) else {
            tracing::debug!("current track {current} is not in any list, stopping");
            self.stop_at_end();
            return;
        };

        let target = if self.shuffle {
            Some(self.rng.random_range(0..list.len()))
        } else {
            match self.repeat_mode {
                RepeatMode::One => Some(index),
                RepeatMode::All => Some((index + 1) % list.len()),
                RepeatMode::Off => (index + 1 < list.len()).then_some(index + 1),
            }
        };

        match target {
            Some(target) if self.play(&list[target], 0.0) => {}
            Some(target) => {
                tracing::debug!("next track {} is unplayable, stopping", list[target]);
                self.stop_at_end();
            }
            None => {
                tracing::debug!("reached the end of the list");
                self.stop_at_end();
            }
        }
    }

    /// Restarts the current track if it is past the restart threshold,
    /// otherwise moves to the previous track in `active`, wrapping around.
    pub fn prev(&mut self, active: &[TrackId]) {
        let Some(current) = self.current.clone() else {
            return;
        };
        if self.progress > Self::RESTART_THRESHOLD {
            self.play(&current, 0.0);
            return;
        }
        let Some((list, index)) = self.locate(active, &current) else {
            return;
        };
        let target = if index == 0 { list.len() - 1 } else { index - 1 };
        self.play(&list[target], 0.0);
    }

    /// Finds `current` in `active` (or the whole library when `active` is
    /// empty or doesn't hold it).
    fn locate(&self, active: &[TrackId], current: &TrackId) -> Option<(Vec<TrackId>, usize)> {
        if let Some(index) = active.iter().position(|id| id == current) {
            return Some((active.to_vec(), index));
        }
        let index = self
            .library
            .tracks()
            .iter()
            .position(|t| &t.id == current)?;
        let list = self.library.tracks().iter().map(|t| t.id.clone()).collect();
        Some((list, index))
    }

    fn stop_at_end(&mut self) {
        self.is_playing = false;
        self.clock_anchor = None;
        self.device("stop", |output| output.stop());
    }

    fn is_at_end(&self) -> bool {
        self.progress >= self.progress_max - Self::END_TOLERANCE
    }

    /// Advances progress by `elapsed` seconds, handling the end of the track.
    pub fn tick(&mut self, elapsed: f64, active: &[TrackId]) {
        if !self.is_playing || self.seek_dragging || self.current.is_none() {
            return;
        }
        self.progress = (self.progress + elapsed.max(0.0)).min(self.progress_max);
        if !self.is_at_end() {
            return;
        }

        match (self.repeat_mode, self.current.clone()) {
            (RepeatMode::One, Some(current)) => {
                self.play(&current, 0.0);
            }
            _ => self.next(active),
        }
    }

    /// Ticks by the wall-clock time since the previous call.
    ///
    /// Time spent paused, dragging, or before the first call after a
    /// play or seek is not counted.
    pub fn advance_clock(&mut self, now: Instant, active: &[TrackId]) {
        let elapsed = self
            .clock_anchor
            .replace(now)
            .map(|anchor| now.saturating_duration_since(anchor).as_secs_f64())
            .unwrap_or(0.0);
        self.tick(elapsed, active);
    }

    /// Jumps to `offset` seconds. If the output can't seek, the track is
    /// restarted from the beginning instead.
    pub fn seek(&mut self, offset: f64) {
        if self.current_track().is_none_or(|t| !t.is_playable()) {
            return;
        }
        self.progress = offset.clamp(0.0, self.progress_max);
        self.clock_anchor = None;

        let progress = self.progress;
        match self.output.seek(progress) {
            Ok(()) => {}
            Err(e) => {
                tracing::warn!("seek failed, restarting track: {e}");
                if self.is_playing {
                    self.progress = 0.0;
                    self.device("restart", |output| output.play());
                }
            }
        }
    }

    /// Moves the playhead while the progress bar is being dragged. Seek
    /// failures are ignored until the drag ends.
    pub fn scrub_to(&mut self, offset: f64) {
        if self.current.is_none() {
            return;
        }
        self.progress = offset.clamp(0.0, self.progress_max);
        self.clock_anchor = None;
        let progress = self.progress;
        if let Err(e) = self.output.seek(progress) {
            tracing::debug!("scrub seek failed: {e}");
        }
    }

    pub fn set_seek_dragging(&mut self, dragging: bool) {
        self.seek_dragging = dragging;
        self.clock_anchor = None;
    }

    /// Sets the volume, clamped to `0.0..=1.0`, and returns the new value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            self.volume
        };
        self.volume = volume;
        self.device("set volume", |output| output.set_volume(volume));
        volume
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn set_repeat_mode(&mut self, repeat_mode: RepeatMode) {
        self.repeat_mode = repeat_mode;
    }

    pub fn cycle_repeat_mode(&mut self) -> RepeatMode {
        self.repeat_mode = self.repeat_mode.cycle();
        self.repeat_mode
    }

    /// Saves the history and stops the output.
    pub fn shutdown(&mut self) {
        self.storage.save_history(self.history.persisted());
        self.is_playing = false;
        self.device("stop", |output| output.stop());
    }

    fn device(
        &mut self,
        what: &str,
        f: impl FnOnce(&mut dyn AudioOutput) -> Result<(), AudioError>,
    ) {
        if let Err(e) = f(self.output.as_mut()) {
            tracing::warn!("failed to {what}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, Op, RecordingOutput, id, library, track};

    fn session_with(library: Library, output: RecordingOutput) -> Session {
        Session::new(SessionArgs {
            library,
            history: vec![],
            output: Box::new(output),
            storage: Storage::in_memory(),
            volume: 0.7,
            repeat_mode: RepeatMode::Off,
            rng_seed: Some(7),
        })
    }

    fn ids(names: &[&str]) -> Vec<TrackId> {
        names.iter().map(|n| id(n)).collect()
    }

    #[test]
    fn new_session_applies_volume() {
        let output = RecordingOutput::default();
        let session = session_with(library(&["a"]), output.clone());
        assert_eq!(output.calls(), [Call::SetVolume(0.7)]);
        assert_eq!(session.current_track_id(), None);
        assert!(!session.is_playing());
    }

    #[test]
    fn play_loads_and_records_history() {
        let output = RecordingOutput::default();
        let mut session = session_with(library(&["a", "b"]), output.clone());
        output.clear();

        assert!(session.play(&id("a"), 0.0));
        assert_eq!(
            output.calls(),
            [Call::Load("/music/a.mp3".into()), Call::Play]
        );
        assert!(session.is_playing());
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.progress_max(), 200.0);

        session.play(&id("a"), 0.0);
        session.play(&id("b"), 0.0);
        assert_eq!(session.history().entries(), ids(&["a", "b"]));
    }

    #[test]
    fn unknown_and_placeholder_tracks_are_ignored() {
        let output = RecordingOutput::default();
        let mut session = session_with(Library::placeholder(), output.clone());
        output.clear();

        assert!(!session.play(&TrackId::from(crate::bs::PLACEHOLDER_ID), 0.0));
        assert!(!session.play(&id("missing"), 0.0));
        session.toggle_play();
        assert!(output.calls().is_empty());
        assert_eq!(session.current_track_id(), None);
        assert!(session.history().entries().is_empty());
    }

    #[test]
    fn zero_duration_uses_default_max() {
        let mut session = session_with(
            Library::new(vec![track("short", 0)]),
            RecordingOutput::default(),
        );
        session.play(&id("short"), 0.0);
        assert_eq!(session.progress_max(), Session::DEFAULT_PROGRESS_MAX);
    }

    #[test]
    fn toggle_play_starts_first_track_then_pauses() {
        let output = RecordingOutput::default();
        let mut session = session_with(library(&["b", "a"]), output.clone());
        session.toggle_play();
        assert_eq!(session.current_track_id(), Some(&id("a")));
        assert!(session.is_playing());

        output.clear();
        session.toggle_play();
        assert!(!session.is_playing());
        session.toggle_play();
        assert!(session.is_playing());
        assert_eq!(output.calls(), [Call::Pause, Call::Unpause]);
    }

    #[test]
    fn repeat_off_stops_at_the_end_of_the_list() {
        let output = RecordingOutput::default();
        let mut session = session_with(library(&["a", "b"]), output.clone());
        let active = ids(&["a", "b"]);
        session.play(&id("b"), 0.0);
        output.clear();

        session.next(&active);
        assert!(!session.is_playing());
        assert_eq!(session.current_track_id(), Some(&id("b")));
        assert_eq!(output.calls(), [Call::Stop]);
    }

    #[test]
    fn repeat_all_wraps_and_repeat_one_replays() {
        let mut session = session_with(library(&["a", "b"]), RecordingOutput::default());
        let active = ids(&["a", "b"]);

        session.set_repeat_mode(RepeatMode::All);
        session.play(&id("b"), 0.0);
        session.next(&active);
        assert_eq!(session.current_track_id(), Some(&id("a")));

        session.set_repeat_mode(RepeatMode::One);
        session.next(&active);
        assert_eq!(session.current_track_id(), Some(&id("a")));
        assert!(session.is_playing());
    }

    #[test]
    fn queue_takes_priority_and_skips_stale_entries() {
        let mut session = session_with(library(&["a", "b", "c"]), RecordingOutput::default());
        let active = ids(&["a", "b", "c"]);
        session.play(&id("a"), 0.0);
        session.queue_mut().enqueue(id("gone"), false);
        session.queue_mut().enqueue(id("c"), false);

        session.next(&active);
        assert_eq!(session.current_track_id(), Some(&id("c")));
        assert!(session.queue().is_empty());
    }

    #[test]
    fn shuffle_stays_within_the_active_list() {
        let mut session = session_with(
            library(&["a", "b", "c", "d"]),
            RecordingOutput::default(),
        );
        let active = ids(&["b", "c"]);
        session.toggle_shuffle();
        session.play(&id("b"), 0.0);
        for _ in 0..20 {
            session.next(&active);
            let current = session.current_track_id().unwrap();
            assert!(active.contains(current));
        }
    }

    #[test]
    fn next_falls_back_to_library_order() {
        let mut session = session_with(library(&["a", "b", "c"]), RecordingOutput::default());
        session.play(&id("b"), 0.0);
        session.next(&ids(&["a"]));
        assert_eq!(session.current_track_id(), Some(&id("c")));

        session.next(&[]);
        assert!(!session.is_playing());
    }

    #[test]
    fn prev_restarts_or_wraps() {
        let mut session = session_with(library(&["a", "b"]), RecordingOutput::default());
        let active = ids(&["a", "b"]);
        session.play(&id("a"), 0.0);

        session.tick(10.0, &active);
        session.prev(&active);
        assert_eq!(session.current_track_id(), Some(&id("a")));
        assert_eq!(session.progress(), 0.0);

        session.prev(&active);
        assert_eq!(session.current_track_id(), Some(&id("b")));
    }

    #[test]
    fn tick_clamps_and_advances_near_the_end() {
        let mut session = session_with(library(&["a", "b"]), RecordingOutput::default());
        let active = ids(&["a", "b"]);
        session.play(&id("a"), 0.0);

        session.tick(199.0, &active);
        assert_eq!(session.current_track_id(), Some(&id("a")));
        assert_eq!(session.progress(), 199.0);

        session.tick(0.6, &active);
        assert_eq!(session.current_track_id(), Some(&id("b")));
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn tick_is_frozen_while_paused_or_dragging() {
        let mut session = session_with(library(&["a"]), RecordingOutput::default());
        session.play(&id("a"), 0.0);
        session.set_seek_dragging(true);
        session.tick(5.0, &[]);
        assert_eq!(session.progress(), 0.0);

        session.set_seek_dragging(false);
        session.toggle_play();
        session.tick(5.0, &[]);
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn toggle_after_stopping_at_end_replays() {
        let mut session = session_with(library(&["a"]), RecordingOutput::default());
        session.play(&id("a"), 0.0);
        session.tick(200.0, &ids(&["a"]));
        assert!(!session.is_playing());

        session.toggle_play();
        assert!(session.is_playing());
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn failed_seek_restarts_from_zero() {
        let output = RecordingOutput::rejecting_seeks();
        let mut session = session_with(library(&["a"]), output.clone());
        session.play(&id("a"), 0.0);
        output.clear();

        session.seek(50.0);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(output.calls(), [Call::Seek(50.0), Call::Play]);
    }

    #[test]
    fn play_at_offset_falls_back_when_seek_fails() {
        let output = RecordingOutput::rejecting_seeks();
        let mut session = session_with(library(&["a"]), output.clone());
        session.play(&id("a"), 30.0);
        assert_eq!(session.progress(), 0.0);
        assert!(session.is_playing());

        let output = RecordingOutput::default();
        let mut session = session_with(library(&["a"]), output);
        session.play(&id("a"), 30.0);
        assert_eq!(session.progress(), 30.0);
    }

    #[test]
    fn failed_load_still_takes_over() {
        let output = RecordingOutput::default();
        output.fail(Op::Load);
        let mut session = session_with(library(&["a", "b"]), output.clone());
        output.clear();

        assert!(session.play(&id("b"), 0.0));
        assert_eq!(session.current_track_id(), Some(&id("b")));
        assert!(session.is_playing());
        assert_eq!(session.history().recent_unique(), [&id("b")]);
        // Nothing to start once the load failed
        assert_eq!(output.calls(), [Call::Load("/music/b.mp3".into())]);
    }

    #[test]
    fn failed_pause_and_unpause_still_flip_state() {
        let output = RecordingOutput::default();
        let mut session = session_with(library(&["a"]), output.clone());
        session.play(&id("a"), 0.0);
        output.fail(Op::Pause);
        output.fail(Op::Unpause);
        output.clear();

        session.toggle_play();
        assert!(!session.is_playing());
        session.toggle_play();
        assert!(session.is_playing());
        assert_eq!(output.calls(), [Call::Pause, Call::Unpause]);
    }

    #[test]
    fn failed_play_keeps_the_track_current() {
        let output = RecordingOutput::default();
        output.fail(Op::Play);
        let mut session = session_with(library(&["a"]), output.clone());
        assert!(session.play(&id("a"), 30.0));
        assert_eq!(session.current_track_id(), Some(&id("a")));
        assert!(session.is_playing());
        assert_eq!(session.progress(), 30.0);
        assert!(!output.calls().iter().any(|c| matches!(c, Call::Seek(_))));
    }

    #[test]
    fn volume_is_clamped() {
        let output = RecordingOutput::default();
        let mut session = session_with(library(&["a"]), output.clone());
        assert_eq!(session.set_volume(1.5), 1.0);
        assert_eq!(session.set_volume(-1.0), 0.0);
        assert_eq!(session.set_volume(f32::NAN), 0.0);
        assert_eq!(output.calls().last(), Some(&Call::SetVolume(0.0)));
    }
}
