#![allow(dead_code)]

use std::{cell::RefCell, collections::HashSet, path::PathBuf, rc::Rc};

use warbler_core::{
    Session, SessionArgs, Storage,
    audio::{AudioError, AudioOutput},
    warbler_state::{Library, RepeatMode, Track, TrackId},
};

/// Records how many times each operation was requested. Clones share counts.
///
/// Operations named in `failing` are still counted, then reported as failed.
#[derive(Debug, Clone, Default)]
pub struct CountingOutput {
    pub log: Rc<RefCell<Vec<&'static str>>>,
    pub failing: Rc<RefCell<HashSet<&'static str>>>,
}
impl CountingOutput {
    pub fn count(&self, op: &str) -> usize {
        self.log.borrow().iter().filter(|o| **o == op).count()
    }

    pub fn rejecting(ops: &[&'static str]) -> Self {
        let output = Self::default();
        output.failing.borrow_mut().extend(ops.iter().copied());
        output
    }

    fn record(&self, op: &'static str) -> Result<(), AudioError> {
        self.log.borrow_mut().push(op);
        match op {
            _ if !self.failing.borrow().contains(op) => Ok(()),
            "seek" => Err(AudioError::SeekUnsupported),
            _ => Err(AudioError::Device(format!("{op} failed"))),
        }
    }
}
impl AudioOutput for CountingOutput {
    fn load(&mut self, _path: &std::path::Path) -> Result<(), AudioError> {
        self.record("load")
    }
    fn play(&mut self) -> Result<(), AudioError> {
        self.record("play")
    }
    fn pause(&mut self) -> Result<(), AudioError> {
        self.record("pause")
    }
    fn unpause(&mut self) -> Result<(), AudioError> {
        self.record("unpause")
    }
    fn stop(&mut self) -> Result<(), AudioError> {
        self.record("stop")
    }
    fn set_volume(&mut self, _volume: f32) -> Result<(), AudioError> {
        self.record("set_volume")
    }
    fn seek(&mut self, _seconds: f64) -> Result<(), AudioError> {
        self.record("seek")
    }
}

pub fn track(title: &str, duration: u32) -> Track {
    let path = PathBuf::from(format!("/music/{title}.mp3"));
    Track {
        id: TrackId::from_path(&path),
        title: title.to_string(),
        artist: "Someone".to_string(),
        duration,
        file_path: Some(path),
    }
}

pub fn session(tracks: Vec<Track>, repeat_mode: RepeatMode) -> (Session, CountingOutput) {
    let (mut session, output) = session_with_output(tracks, CountingOutput::default());
    session.set_repeat_mode(repeat_mode);
    (session, output)
}

pub fn session_with_output(tracks: Vec<Track>, output: CountingOutput) -> (Session, CountingOutput) {
    let session = Session::new(SessionArgs {
        library: Library::new(tracks),
        history: vec![],
        output: Box::new(output.clone()),
        storage: Storage::in_memory(),
        volume: 0.7,
        repeat_mode: RepeatMode::Off,
        rng_seed: Some(42),
    });
    (session, output)
}

pub fn library_ids(session: &Session) -> Vec<TrackId> {
    session
        .library()
        .tracks()
        .iter()
        .map(|t| t.id.clone())
        .collect()
}
