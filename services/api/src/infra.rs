use aquaaid::advisor::gateway::{
    AdvisorGateway, AdvisorGatewayError, AdvisorPrompt, AssistantReply,
};
use aquaaid::engine::quality::QualityReading;
use aquaaid::engine::reports::WaterReport;
use aquaaid::engine::store::{
    QualityReadingStore, StoreError, UsageRecordStore, WaterReportStore,
};
use aquaaid::engine::usage::{Activity, UsageRecord};
use aquaaid::onboarding::WelcomeFlagStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryQualityStore {
    readings: Arc<Mutex<Vec<QualityReading>>>,
}

impl QualityReadingStore for InMemoryQualityStore {
    fn insert(&self, reading: QualityReading) -> Result<QualityReading, StoreError> {
        let mut guard = self.readings.lock().expect("quality store mutex poisoned");
        guard.push(reading.clone());
        Ok(reading)
    }

    fn list(&self) -> Result<Vec<QualityReading>, StoreError> {
        let guard = self.readings.lock().expect("quality store mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryUsageStore {
    records: Arc<Mutex<Vec<UsageRecord>>>,
}

impl UsageRecordStore for InMemoryUsageStore {
    fn insert(&self, record: UsageRecord) -> Result<UsageRecord, StoreError> {
        let mut guard = self.records.lock().expect("usage store mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<UsageRecord>, StoreError> {
        let guard = self.records.lock().expect("usage store mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportStore {
    reports: Arc<Mutex<Vec<WaterReport>>>,
}

impl WaterReportStore for InMemoryReportStore {
    fn insert(&self, report: WaterReport) -> Result<WaterReport, StoreError> {
        let mut guard = self.reports.lock().expect("report store mutex poisoned");
        guard.push(report.clone());
        Ok(report)
    }

    fn list(&self) -> Result<Vec<WaterReport>, StoreError> {
        let guard = self.reports.lock().expect("report store mutex poisoned");
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryWelcomeStore {
    seen: Arc<Mutex<HashSet<String>>>,
}

impl WelcomeFlagStore for InMemoryWelcomeStore {
    fn has_seen(&self, device_id: &str) -> Result<bool, StoreError> {
        let guard = self.seen.lock().expect("welcome store mutex poisoned");
        Ok(guard.contains(device_id))
    }

    fn mark_seen(&self, device_id: &str) -> Result<(), StoreError> {
        let mut guard = self.seen.lock().expect("welcome store mutex poisoned");
        guard.insert(device_id.to_owned());
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct StaticAdvisorGateway {
    reply: String,
    prompts: Arc<Mutex<Vec<AdvisorPrompt>>>,
}

impl StaticAdvisorGateway {
    pub(crate) fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<AdvisorPrompt> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl AdvisorGateway for StaticAdvisorGateway {
    async fn complete(
        &self,
        prompt: &AdvisorPrompt,
    ) -> Result<AssistantReply, AdvisorGatewayError> {
        let mut guard = self.prompts.lock().expect("prompt mutex poisoned");
        guard.push(prompt.clone());
        Ok(AssistantReply {
            content: self.reply.clone(),
        })
    }
}

pub(crate) fn parse_activity(raw: &str) -> Result<Activity, String> {
    let key = raw.trim().to_ascii_lowercase();
    Activity::ordered()
        .into_iter()
        .find(|activity| activity.key() == key)
        .ok_or_else(|| {
            let known = Activity::ordered().map(Activity::key).join(", ");
            format!("unknown activity '{raw}' (expected one of: {known})")
        })
}
