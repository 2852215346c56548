//! Daily log entry with voice recording.
//!
//! The recorder moves `Idle -> Recording -> Stopped -> Transcribing` and ends
//! in `Applied` when the summary text has been written into the form, or back
//! in `Idle` when transcription fails. While a clip exists the observation
//! text can only come from the transcript.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::{ErrorKind, ScreenController, ScreenError, ScreenResult, Session};
use crate::api::{AudioObservation, ObservationPayload, ObservationSubmission, Upload};
use crate::i18n::{reading_label, Message, Reading};
use crate::models::{Animal, Collection, HealthStatus, User, UserRole};
use crate::policy::Action;
use crate::store::{StoreError, Stores};
use crate::views::users_by_role;
use zoo_ops_ai::MonitoringSummary;

const AUDIO_FILE_NAME: &str = "observation.wav";
const AUDIO_CONTENT_TYPE: &str = "audio/wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    /// A clip is waiting to be transcribed
    Stopped,
    Transcribing,
    /// The transcript summary is in the form
    Applied,
}

/// Captured audio.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Form fields of a daily log.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLogForm {
    pub health: HealthStatus,
    pub mood: u8,
    pub appetite: u8,
    pub movement: u8,
    pub injuries: String,
    general_text: String,
    pub animal_image: Option<Upload>,
    pub gate_image: Option<Upload>,
    pub video: Option<Upload>,
    /// User ids to share the log with
    pub shared_with: Vec<String>,
}

impl Default for DailyLogForm {
    fn default() -> Self {
        Self {
            health: HealthStatus::Good,
            mood: 50,
            appetite: 50,
            movement: 50,
            injuries: String::new(),
            general_text: String::new(),
            animal_image: None,
            gate_image: None,
            video: None,
            shared_with: Vec::new(),
        }
    }
}

impl DailyLogForm {
    pub fn general_text(&self) -> &str {
        &self.general_text
    }

    fn has_text(&self) -> bool {
        !self.general_text.trim().is_empty() || !self.injuries.trim().is_empty()
    }
}

pub struct DailyLogScreen {
    stores: Arc<Stores>,
    session: Session,
    animal: Animal,
    pub form: DailyLogForm,
    recorder: RecorderState,
    clip: Option<AudioClip>,
    summary: Option<MonitoringSummary>,
    /// Server response to the last successful submission
    processed: Option<Value>,
}

#[async_trait]
impl ScreenController for DailyLogScreen {
    const SOURCES: &'static [Collection] = &[Collection::Users];

    fn stores(&self) -> &Stores {
        &self.stores
    }
}

impl DailyLogScreen {
    pub fn new(stores: Arc<Stores>, session: Session, animal: Animal) -> Self {
        Self {
            stores,
            session,
            animal,
            form: DailyLogForm::default(),
            recorder: RecorderState::Idle,
            clip: None,
            summary: None,
            processed: None,
        }
    }

    pub fn animal(&self) -> &Animal {
        &self.animal
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder
    }

    pub fn has_recording(&self) -> bool {
        self.clip.is_some()
    }

    /// Manual observation text is locked once a clip exists.
    pub fn text_locked(&self) -> bool {
        self.clip.is_some()
    }

    pub fn summary(&self) -> Option<&MonitoringSummary> {
        self.summary.as_ref()
    }

    pub fn processed(&self) -> Option<&Value> {
        self.processed.as_ref()
    }

    /// Staff to share with, grouped by role.
    pub fn sharing_groups(&self) -> Vec<(UserRole, Vec<User>)> {
        let users = self.stores.users.items();
        UserRole::ALL
            .iter()
            .map(|role| (*role, users_by_role(&users, *role).into_iter().cloned().collect()))
            .collect()
    }

    pub fn toggle_share(&mut self, user_id: &str) {
        if let Some(pos) = self.form.shared_with.iter().position(|u| u == user_id) {
            self.form.shared_with.remove(pos);
        } else {
            self.form.shared_with.push(user_id.to_string());
        }
    }

    pub fn set_observation_text(&mut self, text: &str) -> ScreenResult<()> {
        if self.text_locked() {
            return Err(self.session.invalid(Message::RecordingInProgress));
        }
        self.form.general_text = text.to_string();
        Ok(())
    }

    pub fn start_recording(&mut self) -> ScreenResult<()> {
        self.session.require(Action::SubmitDailyLog)?;
        if matches!(self.recorder, RecorderState::Recording | RecorderState::Transcribing) {
            return Err(self.session.invalid(Message::RecordingInProgress));
        }
        self.clip = None;
        self.summary = None;
        self.recorder = RecorderState::Recording;
        Ok(())
    }

    pub fn stop_recording(&mut self, clip: AudioClip) -> ScreenResult<()> {
        if self.recorder != RecorderState::Recording {
            return Err(self.session.invalid(Message::NoRecording));
        }
        self.clip = Some(clip);
        self.recorder = RecorderState::Stopped;
        Ok(())
    }

    /// Drop the clip and unlock the text field; typed text is kept.
    pub fn discard_recording(&mut self) {
        self.clip = None;
        self.summary = None;
        self.recorder = RecorderState::Idle;
    }

    /// Slider readings sent ahead of the transcript.
    pub fn transcription_prefix(&self) -> String {
        let f = &self.form;
        let mut prefix = format!(
            "Overall Health Status: {}. Mood: {}%. Appetite: {}%. Movement: {}%. ",
            f.health, f.mood, f.appetite, f.movement
        );
        if !f.injuries.trim().is_empty() {
            prefix.push_str(&format!("Injuries Report: {}. ", f.injuries));
        }
        prefix
    }

    /// Send the stopped clip for transcription and apply the summary.
    ///
    /// On failure the clip is dropped and a new recording is needed.
    pub async fn transcribe(&mut self) -> ScreenResult<Message> {
        let clip = match (&self.clip, self.recorder) {
            (Some(clip), RecorderState::Stopped) => clip.clone(),
            _ => return Err(self.session.invalid(Message::NoRecording)),
        };
        self.recorder = RecorderState::Transcribing;
        let request = AudioObservation {
            audio: Upload::new(AUDIO_FILE_NAME, AUDIO_CONTENT_TYPE, clip.bytes),
            date: Utc::now().to_rfc3339(),
            prefix: self.transcription_prefix(),
            animal_id: self.animal.id.clone(),
        };

        match self.stores.api().process_audio_observation(request).await {
            Ok(summary) => {
                self.form.general_text = summary.daily_animal_health_monitoring.clone();
                self.summary = Some(summary);
                self.recorder = RecorderState::Applied;
                info!("[DailyLog] transcript applied for {}", self.animal.id);
                Ok(Message::RecordingTranscribed)
            }
            Err(e) => {
                warn!("[DailyLog] transcription failed: {}", e);
                self.clip = None;
                self.recorder = RecorderState::Idle;
                Err(ScreenError::new(ErrorKind::Action, Message::ProcessingError, self.session.language)
                    .with_detail(e.to_string()))
            }
        }
    }

    /// Combined text the server summarises.
    pub fn observation_text(&self) -> String {
        let f = &self.form;
        let lang = self.session.language;
        let mut text = format!("Overall Health Status: {}. ", f.health);
        text.push_str(&format!(
            "Mood: {}% ({}). ",
            f.mood,
            reading_label(Reading::Mood, f.mood, lang)
        ));
        text.push_str(&format!(
            "Appetite: {}% ({}). ",
            f.appetite,
            reading_label(Reading::Appetite, f.appetite, lang)
        ));
        text.push_str(&format!(
            "Movement: {}% ({}). ",
            f.movement,
            reading_label(Reading::Movement, f.movement, lang)
        ));
        if !f.injuries.trim().is_empty() {
            text.push_str(&format!("Injuries Report: {}. ", f.injuries));
        }
        if !f.general_text.trim().is_empty() {
            text.push_str(&format!("General Observation: {}. ", f.general_text));
        }
        text
    }

    fn submission(&self) -> ObservationSubmission {
        let f = &self.form;
        ObservationSubmission {
            log_data: ObservationPayload {
                animal_id: self.animal.id.clone(),
                submitted_by: self.session.user.name.clone(),
                created_at: Utc::now().to_rfc3339(),
                health_status: f.health,
                mood_percentage: f.mood,
                appetite_percentage: f.appetite,
                movement_percentage: f.movement,
                injuries_text: f.injuries.trim().to_string(),
                general_observation_text: f.general_text.trim().to_string(),
                observation_text: self.observation_text(),
                shared_with: f.shared_with.clone(),
            },
            gate_image: f.gate_image.clone(),
            animal_image: f.animal_image.clone(),
            animal_video: f.video.clone(),
        }
    }

    /// Submit the log as one multipart request.
    ///
    /// Empty text is rejected before any request. The form and recording
    /// reset only after the server accepts the log.
    pub async fn submit(&mut self) -> ScreenResult<Message> {
        self.session.require(Action::SubmitDailyLog)?;
        if matches!(self.recorder, RecorderState::Recording | RecorderState::Transcribing) {
            return Err(self.session.invalid(Message::RecordingInProgress));
        }
        if !self.form.has_text() {
            return Err(self.session.invalid(Message::EnterObservation));
        }

        let processed = self
            .stores
            .api()
            .process_text_observation(self.submission())
            .await
            .map_err(|e| self.session.failed(&StoreError::from(e)))?;
        info!("[DailyLog] log submitted for {}", self.animal.id);

        // The server may have stored the log and raised a health alert.
        self.stores.invalidate(Collection::Observations);
        self.stores.invalidate(Collection::Alerts);

        self.processed = Some(processed);
        self.reset();
        Ok(Message::ObservationProcessed)
    }

    fn reset(&mut self) {
        self.form = DailyLogForm::default();
        self.clip = None;
        self.summary = None;
        self.recorder = RecorderState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiCall;
    use crate::screens::testing;

    async fn screen_for(role: UserRole) -> (Arc<crate::api::InMemoryZooApi>, Arc<Stores>, DailyLogScreen) {
        let (api, stores) = testing::seeded();
        stores.animals.load().await.unwrap();
        let simba = stores.animals.get("A001").unwrap();
        let screen = DailyLogScreen::new(stores.clone(), testing::session(role), simba);
        screen.load().await;
        (api, stores, screen)
    }

    #[tokio::test]
    async fn test_empty_log_sends_nothing() {
        let (api, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        api.clear_calls();
        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, Message::EnterObservation.text(screen.session.language));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_observation_text_labels() {
        let (_, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        screen.form.health = HealthStatus::Fair;
        screen.form.mood = 30;
        screen.form.appetite = 70;
        screen.form.injuries = "Scratch on paw".into();
        screen.set_observation_text("Ate slowly").unwrap();
        assert_eq!(
            screen.observation_text(),
            "Overall Health Status: fair. Mood: 30% (agitated). Appetite: 70% (high). \
             Movement: 50% (active). Injuries Report: Scratch on paw. General Observation: Ate slowly. "
        );
        assert_eq!(
            screen.transcription_prefix(),
            "Overall Health Status: fair. Mood: 30%. Appetite: 70%. Movement: 50%. Injuries Report: Scratch on paw. "
        );
    }

    #[tokio::test]
    async fn test_submit_resets_and_refreshes() {
        let (api, stores, mut screen) = screen_for(UserRole::Zookeeper).await;
        stores.observations.load().await.unwrap();
        screen.form.health = HealthStatus::Poor;
        screen.form.injuries = "Deep cut on leg".into();
        screen.toggle_share("u3");
        api.clear_calls();

        assert_eq!(screen.submit().await.unwrap(), Message::ObservationProcessed);
        assert_eq!(api.calls(), vec![ApiCall::ProcessText]);
        assert_eq!(screen.form, DailyLogForm::default());
        assert!(screen.processed().is_some());

        stores.observations.ensure_loaded().await.unwrap();
        stores.alerts.ensure_loaded().await.unwrap();
        assert_eq!(stores.observations.len(), 2);
        assert!(stores.alerts.items().iter().any(|a| a.kind == "health" && a.animal_id.as_deref() == Some("A001")));
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_form() {
        let (api, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        api.fail_observation_processing(true);
        screen.set_observation_text("Calm day").unwrap();
        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Action);
        assert_eq!(screen.form.general_text(), "Calm day");
    }

    #[tokio::test]
    async fn test_recording_flow_applies_summary() {
        let (api, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        assert!(screen.transcribe().await.is_err());

        screen.start_recording().unwrap();
        assert!(screen.start_recording().is_err());
        screen.stop_recording(AudioClip::new(b"Simba ate well".to_vec())).unwrap();
        assert_eq!(screen.recorder_state(), RecorderState::Stopped);
        assert!(screen.set_observation_text("typed").is_err());

        assert_eq!(screen.transcribe().await.unwrap(), Message::RecordingTranscribed);
        assert_eq!(screen.recorder_state(), RecorderState::Applied);
        assert!(screen.form.general_text().contains("Simba ate well"));
        assert!(screen.summary().is_some());
        assert!(api.calls().contains(&ApiCall::ProcessAudio));

        screen.submit().await.unwrap();
        assert!(!screen.has_recording());
        assert_eq!(screen.recorder_state(), RecorderState::Idle);
    }

    #[tokio::test]
    async fn test_failed_transcription_needs_new_recording() {
        let (api, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        api.fail_observation_processing(true);
        screen.start_recording().unwrap();
        screen.stop_recording(AudioClip::new(b"hello".to_vec())).unwrap();

        assert!(screen.transcribe().await.is_err());
        assert_eq!(screen.recorder_state(), RecorderState::Idle);
        assert!(!screen.has_recording());
        screen.set_observation_text("typed instead").unwrap();
    }

    #[tokio::test]
    async fn test_share_toggle_and_groups() {
        let (_, _, mut screen) = screen_for(UserRole::Zookeeper).await;
        screen.toggle_share("u3");
        screen.toggle_share("u4");
        screen.toggle_share("u3");
        assert_eq!(screen.form.shared_with, vec!["u4".to_string()]);
        let vets = &screen
            .sharing_groups()
            .into_iter()
            .find(|(r, _)| *r == UserRole::Vet)
            .unwrap()
            .1;
        assert_eq!(vets[0].name, "Dr. Anjali Verma");
    }

    #[tokio::test]
    async fn test_officer_cannot_log() {
        let (_, _, mut screen) = screen_for(UserRole::Officer).await;
        assert_eq!(screen.start_recording().unwrap_err().kind, ErrorKind::Permission);
    }
}
