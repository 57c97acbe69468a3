//! Shared test utilities for sf-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use sf_core::entities::{DailyReport, Site};
    use sf_core::enums::Role;
    use sf_core::identity::Actor;

    use crate::SiteDb;
    use crate::journal::AuditJournal;
    use crate::repos::report::NewReport;
    use crate::service::{WorkflowService, WorkflowSettings};

    /// In-memory service with the journal disabled and default settings.
    pub async fn test_service() -> WorkflowService {
        test_service_with(WorkflowSettings::default()).await
    }

    pub async fn test_service_with(settings: WorkflowSettings) -> WorkflowService {
        let db = SiteDb::open_local(":memory:").await.unwrap();
        WorkflowService::from_db(db, AuditJournal::disabled(), settings)
    }

    /// In-memory service with the journal writing to `journal_dir`.
    pub async fn test_service_with_journal(journal_dir: std::path::PathBuf) -> WorkflowService {
        let db = SiteDb::open_local(":memory:").await.unwrap();
        let journal = AuditJournal::new(journal_dir).unwrap();
        WorkflowService::from_db(db, journal, WorkflowSettings::default())
    }

    pub fn worker() -> Actor {
        Actor::new(Role::Worker, "usr-worker")
    }

    pub fn manager() -> Actor {
        Actor::new(Role::SiteManager, "usr-manager")
    }

    pub fn admin() -> Actor {
        Actor::new(Role::Admin, "usr-admin")
    }

    pub async fn seed_site(svc: &WorkflowService) -> Site {
        svc.create_site("Test Site", Some("1 Main St"), &admin())
            .await
            .unwrap()
    }

    pub fn new_report(site_id: &str, work_date: &str) -> NewReport {
        NewReport {
            site_id: site_id.to_string(),
            work_date: work_date.parse().unwrap(),
            content: "Poured level 3 slab".to_string(),
            weather: Some("clear".to_string()),
            headcount: Some(12),
        }
    }

    /// A site with one draft report.
    pub async fn seed_report(svc: &WorkflowService) -> (Site, DailyReport) {
        let site = seed_site(svc).await;
        let report = svc
            .create_report(&new_report(&site.id, "2026-03-02"), &worker())
            .await
            .unwrap();
        (site, report)
    }
}
