//! Role permissions.
//!
//! Every role check made by a screen goes through [`Policy`], so the rules
//! live in one table instead of being scattered across screens.

use crate::models::UserRole;

/// Something a user may try to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// See every animal, not only those assigned to the user
    ViewAllAnimals,
    /// See every task, not only those assigned to the user
    ViewAllTasks,
    CreateAnimal,
    ManageUsers,
    ManageInventory,
    ManageFeeding,
    CreateTask,
    DeleteTask,
    UpdateTask,
    PrescribeMedication,
    ChangeMedicationStatus,
    DeleteMedication,
    LogAdministration,
    RecordTreatmentOutcome,
    SubmitDailyLog,
    SendSos,
    DismissAlert,
    ExportReports,
}

/// Central permission table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policy;

impl Policy {
    pub fn allows(role: UserRole, action: Action) -> bool {
        use Action::*;
        use UserRole::*;
        match action {
            ViewAllAnimals => role != Zookeeper,
            ViewAllTasks => role == Admin,
            CreateAnimal | ManageUsers => role == Admin,
            ManageInventory | ManageFeeding => matches!(role, Admin | Officer),
            CreateTask | DeleteTask => role == Admin,
            UpdateTask => true,
            PrescribeMedication | ChangeMedicationStatus | DeleteMedication | RecordTreatmentOutcome => {
                role == Vet
            }
            LogAdministration => matches!(role, Vet | Zookeeper),
            SubmitDailyLog => matches!(role, Zookeeper | Vet),
            SendSos | DismissAlert | ExportReports => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vet_only_prescribes() {
        assert!(Policy::allows(UserRole::Vet, Action::PrescribeMedication));
        for role in [UserRole::Admin, UserRole::Zookeeper, UserRole::Officer] {
            assert!(!Policy::allows(role, Action::PrescribeMedication));
        }
    }

    #[test]
    fn test_zookeeper_scope() {
        assert!(!Policy::allows(UserRole::Zookeeper, Action::ViewAllAnimals));
        assert!(Policy::allows(UserRole::Officer, Action::ViewAllAnimals));
        assert!(!Policy::allows(UserRole::Zookeeper, Action::ViewAllTasks));
        assert!(Policy::allows(UserRole::Zookeeper, Action::SubmitDailyLog));
    }

    #[test]
    fn test_inventory_managers() {
        assert!(Policy::allows(UserRole::Officer, Action::ManageInventory));
        assert!(Policy::allows(UserRole::Admin, Action::ManageInventory));
        assert!(!Policy::allows(UserRole::Vet, Action::ManageInventory));
    }
}
