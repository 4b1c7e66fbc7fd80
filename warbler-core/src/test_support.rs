use std::{cell::RefCell, collections::HashSet, path::PathBuf, rc::Rc};

use crate::{
    audio::{AudioError, AudioOutput},
    bs::{Library, Track, TrackId},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Unpause,
    Stop,
    SetVolume(f32),
    Seek(f64),
}

/// An output operation, for switching individual requests to failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Load,
    Play,
    Pause,
    Unpause,
    Stop,
    SetVolume,
    Seek,
}

/// An [`AudioOutput`] that records every call. Clones share the record and
/// the set of failing operations.
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    calls: Rc<RefCell<Vec<Call>>>,
    failing: Rc<RefCell<HashSet<Op>>>,
}
impl RecordingOutput {
    pub fn rejecting_seeks() -> Self {
        let output = Self::default();
        output.fail(Op::Seek);
        output
    }

    /// Makes every later `op` request fail (after being recorded).
    pub fn fail(&self, op: Op) {
        self.failing.borrow_mut().insert(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn push(&self, op: Op, call: Call) -> Result<(), AudioError> {
        let path = match &call {
            Call::Load(path) => Some(path.clone()),
            _ => None,
        };
        self.calls.borrow_mut().push(call);
        if !self.failing.borrow().contains(&op) {
            return Ok(());
        }
        Err(match (op, path) {
            (Op::Seek, _) => AudioError::SeekUnsupported,
            (_, Some(path)) => AudioError::Load {
                path,
                message: "unreadable".to_string(),
            },
            _ => AudioError::Device(format!("{op:?} failed")),
        })
    }
}
impl AudioOutput for RecordingOutput {
    fn load(&mut self, path: &std::path::Path) -> Result<(), AudioError> {
        self.push(Op::Load, Call::Load(path.to_path_buf()))
    }
    fn play(&mut self) -> Result<(), AudioError> {
        self.push(Op::Play, Call::Play)
    }
    fn pause(&mut self) -> Result<(), AudioError> {
        self.push(Op::Pause, Call::Pause)
    }
    fn unpause(&mut self) -> Result<(), AudioError> {
        self.push(Op::Unpause, Call::Unpause)
    }
    fn stop(&mut self) -> Result<(), AudioError> {
        self.push(Op::Stop, Call::Stop)
    }
    fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.push(Op::SetVolume, Call::SetVolume(volume))
    }
    fn seek(&mut self, seconds: f64) -> Result<(), AudioError> {
        self.push(Op::Seek, Call::Seek(seconds))
    }
}

/// A playable track whose title is `name` and ID is `/music/<name>.mp3`.
pub fn track(name: &str, duration: u32) -> Track {
    let path = PathBuf::from(format!("/music/{name}.mp3"));
    Track {
        id: TrackId::from_path(&path),
        title: name.to_string(),
        artist: "Unknown".to_string(),
        duration,
        file_path: Some(path),
    }
}

pub fn id(name: &str) -> TrackId {
    TrackId(format!("/music/{name}.mp3"))
}

/// A library of 200-second tracks with the given titles.
pub fn library(names: &[&str]) -> Library {
    Library::new(names.iter().map(|name| track(name, 200)).collect())
}
