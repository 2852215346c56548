//! User-facing message texts in English and Hindi.

use serde::{Deserialize, Serialize};

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::En,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Messages shown as screen errors or transient notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Message {
    ProcessingError,
    FillRequiredFields,
    EnterObservation,
    SelectAnimalAndMessage,
    PermissionDenied,
    ObservationProcessed,
    RecordingTranscribed,
    RecordingInProgress,
    NoRecording,
    SosSent,
    ItemSaved,
    ItemDeleted,
    TaskCreated,
    CommentAdded,
    MedicationAdded,
    DoseLogged,
    FeedingAdded,
    UserCreated,
    AnimalCreated,
    AlertDismissed,
    EnableNotificationsFirst,
    NotificationsEnabled,
    NotificationsDisabled,
    NotificationPermissionGranted,
    NotificationPermissionDenied,
    TestNotificationSent,
    NoDataToExport,
}

impl Message {
    pub fn text(&self, language: Language) -> &'static str {
        use Message::*;
        match (self, language) {
            (ProcessingError, Language::En) => "Something went wrong while processing your request. Please try again.",
            (ProcessingError, Language::Hi) => "आपके अनुरोध को संसाधित करते समय कुछ गलत हो गया। कृपया पुनः प्रयास करें।",
            (FillRequiredFields, Language::En) => "Please fill all required fields",
            (FillRequiredFields, Language::Hi) => "कृपया सभी आवश्यक फ़ील्ड भरें",
            (EnterObservation, Language::En) => "Please enter an observation or record audio",
            (EnterObservation, Language::Hi) => "कृपया अवलोकन दर्ज करें या ऑडियो रिकॉर्ड करें",
            (SelectAnimalAndMessage, Language::En) => "Please select an animal and describe the emergency",
            (SelectAnimalAndMessage, Language::Hi) => "कृपया एक जानवर चुनें और आपातकाल का वर्णन करें",
            (PermissionDenied, Language::En) => "You do not have permission to do this",
            (PermissionDenied, Language::Hi) => "आपको यह करने की अनुमति नहीं है",
            (ObservationProcessed, Language::En) => "Observation processed successfully!",
            (ObservationProcessed, Language::Hi) => "अवलोकन सफलतापूर्वक संसाधित किया गया!",
            (RecordingTranscribed, Language::En) => "Recording transcribed",
            (RecordingTranscribed, Language::Hi) => "रिकॉर्डिंग का लिप्यंतरण हुआ",
            (RecordingInProgress, Language::En) => "A recording is already in progress",
            (RecordingInProgress, Language::Hi) => "रिकॉर्डिंग पहले से चल रही है",
            (NoRecording, Language::En) => "No recording to process",
            (NoRecording, Language::Hi) => "संसाधित करने के लिए कोई रिकॉर्डिंग नहीं",
            (SosSent, Language::En) => "SOS alert sent!",
            (SosSent, Language::Hi) => "SOS अलर्ट भेजा गया!",
            (ItemSaved, Language::En) => "Item saved successfully!",
            (ItemSaved, Language::Hi) => "आइटम सफलतापूर्वक सहेजा गया!",
            (ItemDeleted, Language::En) => "Deleted successfully!",
            (ItemDeleted, Language::Hi) => "सफलतापूर्वक हटाया गया!",
            (TaskCreated, Language::En) => "Task created successfully!",
            (TaskCreated, Language::Hi) => "कार्य सफलतापूर्वक बनाया गया!",
            (CommentAdded, Language::En) => "Comment added",
            (CommentAdded, Language::Hi) => "टिप्पणी जोड़ी गई",
            (MedicationAdded, Language::En) => "Medication added successfully!",
            (MedicationAdded, Language::Hi) => "दवा सफलतापूर्वक जोड़ी गई!",
            (DoseLogged, Language::En) => "Administration logged",
            (DoseLogged, Language::Hi) => "दवा देना दर्ज किया गया",
            (FeedingAdded, Language::En) => "Feeding record added!",
            (FeedingAdded, Language::Hi) => "भोजन रिकॉर्ड जोड़ा गया!",
            (UserCreated, Language::En) => "User created successfully!",
            (UserCreated, Language::Hi) => "उपयोगकर्ता सफलतापूर्वक बनाया गया!",
            (AnimalCreated, Language::En) => "Animal added successfully!",
            (AnimalCreated, Language::Hi) => "जानवर सफलतापूर्वक जोड़ा गया!",
            (AlertDismissed, Language::En) => "Alert dismissed",
            (AlertDismissed, Language::Hi) => "अलर्ट खारिज किया गया",
            (EnableNotificationsFirst, Language::En) => "Please enable notifications first",
            (EnableNotificationsFirst, Language::Hi) => "कृपया पहले सूचनाएं सक्षम करें",
            (NotificationsEnabled, Language::En) => "Notifications enabled",
            (NotificationsEnabled, Language::Hi) => "सूचनाएं सक्षम",
            (NotificationsDisabled, Language::En) => "Notifications disabled",
            (NotificationsDisabled, Language::Hi) => "सूचनाएं अक्षम",
            (NotificationPermissionGranted, Language::En) => "Notification permission granted!",
            (NotificationPermissionGranted, Language::Hi) => "सूचना अनुमति दी गई!",
            (NotificationPermissionDenied, Language::En) => "Notification permission denied",
            (NotificationPermissionDenied, Language::Hi) => "सूचना अनुमति अस्वीकृत",
            (TestNotificationSent, Language::En) => "Test notification sent!",
            (TestNotificationSent, Language::Hi) => "परीक्षण सूचना भेजी गई!",
            (NoDataToExport, Language::En) => "No data to export",
            (NoDataToExport, Language::Hi) => "निर्यात के लिए कोई डेटा नहीं",
        }
    }
}

/// Slider reading labels used when describing an observation.
pub fn reading_label(kind: Reading, value: u8, language: Language) -> &'static str {
    let low = value < 50;
    match (kind, low, language) {
        (Reading::Mood, true, Language::En) => "agitated",
        (Reading::Mood, false, Language::En) => "calm",
        (Reading::Appetite, true, Language::En) => "low",
        (Reading::Appetite, false, Language::En) => "high",
        (Reading::Movement, true, Language::En) => "slow",
        (Reading::Movement, false, Language::En) => "active",
        (Reading::Mood, true, Language::Hi) => "उत्तेजित",
        (Reading::Mood, false, Language::Hi) => "शांत",
        (Reading::Appetite, true, Language::Hi) => "कम",
        (Reading::Appetite, false, Language::Hi) => "अधिक",
        (Reading::Movement, true, Language::Hi) => "धीमा",
        (Reading::Movement, false, Language::Hi) => "सक्रिय",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Mood,
    Appetite,
    Movement,
}
