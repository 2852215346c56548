//! Shared application context: who is signed in, language, theme, and
//! which screen is showing.

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::models::{Animal, User, UserRole};
use crate::policy::{Action, Policy};
use crate::prefs::{PreferenceStore, PrefsResult, DARK_MODE_KEY, LANGUAGE_KEY};

/// Navigable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Login,
    /// Resolves to the dashboard of the user's role
    Dashboard,
    ZookeeperDashboard,
    VetDashboard,
    AdminDashboard,
    OfficerDashboard,
    DailyLog,
    AnimalProfile,
    UserManagement,
    Settings,
    LogHistory,
    Inventory,
    Medication,
    SharedLogs,
    Tasks,
}

impl Screen {
    pub fn dashboard_for(role: UserRole) -> Screen {
        match role {
            UserRole::Zookeeper => Screen::ZookeeperDashboard,
            UserRole::Vet => Screen::VetDashboard,
            UserRole::Admin => Screen::AdminDashboard,
            UserRole::Officer => Screen::OfficerDashboard,
        }
    }

    /// The screen actually shown when `requested` is asked for.
    ///
    /// Without a user only the login screen is reachable. Dashboards always
    /// resolve to the user's own role. Animal-specific screens need a
    /// selected animal, and user management needs admin rights; otherwise
    /// the dashboard is shown.
    pub fn resolve(requested: Screen, user: Option<&User>, has_selected_animal: bool) -> Screen {
        let Some(user) = user else {
            return Screen::Login;
        };
        let home = Screen::dashboard_for(user.role);
        match requested {
            Screen::Login
            | Screen::Dashboard
            | Screen::ZookeeperDashboard
            | Screen::VetDashboard
            | Screen::AdminDashboard
            | Screen::OfficerDashboard => home,
            Screen::DailyLog | Screen::AnimalProfile if !has_selected_animal => home,
            Screen::UserManagement if !Policy::allows(user.role, Action::ManageUsers) => home,
            other => other,
        }
    }
}

/// Light or dark theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// State shared by every screen.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub current_user: Option<User>,
    pub language: Language,
    pub theme: Theme,
    screen: Option<Screen>,
    pub selected_animal: Option<Animal>,
    pub show_sos: bool,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore language and theme from local preferences.
    pub fn from_preferences(prefs: &PreferenceStore) -> PrefsResult<Self> {
        let language: Language = prefs.get_or_default(LANGUAGE_KEY)?;
        let dark: bool = prefs.get_or_default(DARK_MODE_KEY)?;
        Ok(Self {
            language,
            theme: if dark { Theme::Dark } else { Theme::Light },
            ..Self::default()
        })
    }

    pub fn save_preferences(&self, prefs: &PreferenceStore) -> PrefsResult<()> {
        prefs.set(LANGUAGE_KEY, &self.language)?;
        prefs.set(DARK_MODE_KEY, &(self.theme == Theme::Dark))
    }

    pub fn sign_in(&mut self, user: User) {
        self.current_user = Some(user);
        self.screen = Some(Screen::Dashboard);
    }

    pub fn sign_out(&mut self) {
        self.current_user = None;
        self.selected_animal = None;
        self.show_sos = false;
        self.screen = None;
    }

    pub fn navigate(&mut self, screen: Screen) {
        self.screen = Some(screen);
    }

    /// Select an animal and open a screen about it.
    pub fn open_animal(&mut self, animal: Animal, screen: Screen) {
        self.selected_animal = Some(animal);
        self.screen = Some(screen);
    }

    /// The screen to render now.
    pub fn current_screen(&self) -> Screen {
        Screen::resolve(
            self.screen.unwrap_or(Screen::Dashboard),
            self.current_user.as_ref(),
            self.selected_animal.is_some(),
        )
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn open_sos(&mut self) {
        self.show_sos = true;
    }

    pub fn close_sos(&mut self) {
        self.show_sos = false;
    }
}
