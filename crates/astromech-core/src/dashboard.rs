//! Live hardware view: servos, controllers and the audio library.
//!
//! The three inventories are fetched concurrently at start-up. A failure in
//! one leaves the others intact and only sets the dashboard's notice.

use crate::client::BackendClient;
use crate::error::{AstromechError, Result};
use crate::pagination::Pager;
use crate::types::{AudioFile, ControllerMap, Servo, ServoMap};
use serde::Serialize;
use std::collections::BTreeMap;
use std::thread;

pub const SERVO_WARNING: &str = "Warning: Servo data incomplete - Check R2 unit connection";
pub const CONTROLLER_WARNING: &str =
    "Warning: Controller data incomplete - Check R2 unit connection";
pub const AUDIO_WARNING: &str = "Warning: Audio data incomplete - Check R2 unit connection";

// ---------------------------------------------------------------------------
// ComponentStatus
// ---------------------------------------------------------------------------

/// Which start-up fetches succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub servos: bool,
    pub controllers: bool,
    pub audio: bool,
}

impl ComponentStatus {
    pub fn online(&self) -> bool {
        self.servos && self.controllers && self.audio
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub servos: ServoMap,
    pub controllers: ControllerMap,
    pub audio_files: Vec<AudioFile>,
    /// Last commanded angle per servo name.
    pub servo_angles: BTreeMap<String, f64>,
    pub status: ComponentStatus,
    /// Most recent failure; each new one replaces the previous.
    pub error: Option<String>,
    #[serde(skip)]
    pager: Pager,
}

impl Dashboard {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            servos: ServoMap::new(),
            controllers: ControllerMap::new(),
            audio_files: Vec::new(),
            servo_angles: BTreeMap::new(),
            status: ComponentStatus::default(),
            error: None,
            pager: Pager::new(items_per_page),
        }
    }

    /// Fetch servos, controllers and audio files in parallel.
    pub fn initialize(client: &BackendClient, items_per_page: usize) -> Self {
        let (servos, controllers, audio) = thread::scope(|s| {
            let servos = s.spawn(|| client.servos());
            let controllers = s.spawn(|| client.controllers());
            let audio = s.spawn(|| client.audio_files());
            (
                servos.join().unwrap_or_else(|p| std::panic::resume_unwind(p)),
                controllers.join().unwrap_or_else(|p| std::panic::resume_unwind(p)),
                audio.join().unwrap_or_else(|p| std::panic::resume_unwind(p)),
            )
        });

        let mut dash = Self::new(items_per_page);
        dash.apply_servos(servos);
        dash.apply_controllers(controllers);
        dash.apply_audio(audio);
        dash
    }

    fn apply_servos(&mut self, result: Result<ServoMap>) {
        match result {
            Ok(servos) => {
                self.servo_angles = servos
                    .values()
                    .map(|s| (s.name.clone(), s.min_angle))
                    .collect();
                self.servos = servos;
                self.status.servos = true;
            }
            Err(e) => self.fail(SERVO_WARNING, &e),
        }
    }

    fn apply_controllers(&mut self, result: Result<ControllerMap>) {
        match result {
            Ok(controllers) => {
                self.controllers = controllers;
                self.status.controllers = true;
            }
            Err(e) => self.fail(CONTROLLER_WARNING, &e),
        }
    }

    fn apply_audio(&mut self, result: Result<Vec<AudioFile>>) {
        match result {
            Ok(files) => {
                self.audio_files = files;
                self.status.audio = true;
            }
            Err(e) => self.fail(AUDIO_WARNING, &e),
        }
    }

    fn fail(&mut self, notice: impl Into<String>, cause: &AstromechError) {
        let notice = notice.into();
        tracing::warn!(error = %cause, "{notice}");
        self.error = Some(notice);
    }

    // -----------------------------------------------------------------------
    // Servos
    // -----------------------------------------------------------------------

    /// Look a servo up by its display name.
    pub fn servo(&self, name: &str) -> Option<&Servo> {
        self.servos.values().find(|s| s.name == name)
    }

    /// Current angle for `name`, falling back to the servo's minimum.
    pub fn angle(&self, name: &str) -> Option<f64> {
        self.servo_angles
            .get(name)
            .copied()
            .or_else(|| self.servo(name).map(|s| s.min_angle))
    }

    /// Command a servo to `angle`.
    ///
    /// When the servo inventory is known, the angle must lie within the
    /// servo's range. The mirrored angle only changes on success.
    pub fn move_servo(&mut self, client: &BackendClient, name: &str, angle: f64) -> Result<()> {
        if let Some(servo) = self.servo(name) {
            if !servo.accepts(angle) {
                let err = AstromechError::AngleOutOfRange {
                    servo: name.to_string(),
                    angle,
                    min: servo.min_angle,
                    max: servo.max_angle,
                };
                self.error = Some(err.to_string());
                return Err(err);
            }
        } else if self.status.servos {
            let err = AstromechError::ServoNotFound(name.to_string());
            self.error = Some(err.to_string());
            return Err(err);
        }

        match client.move_servo(name, angle) {
            Ok(()) => {
                self.servo_angles.insert(name.to_string(), angle);
                Ok(())
            }
            Err(e) => {
                self.fail(format!("Failed to move servo {name}"), &e);
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Audio
    // -----------------------------------------------------------------------

    pub fn play_audio(&mut self, client: &BackendClient, filename: &str) -> Result<()> {
        client.play_audio(filename).inspect_err(|e| {
            self.fail(format!("Failed to play audio {filename}"), e);
        })
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn audio_page(&self) -> &[AudioFile] {
        self.pager.slice(&self.audio_files)
    }

    pub fn go_to_audio_page(&mut self, page: usize) {
        self.pager.go_to(page, self.audio_files.len());
    }

    pub fn next_audio_page(&mut self) {
        self.pager.next(self.audio_files.len());
    }

    pub fn previous_audio_page(&mut self) {
        self.pager.previous();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
