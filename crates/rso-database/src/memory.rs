//! 内存存储
//!
//! 不依赖 PostgreSQL 的 `ComplianceStore` 实现，用于测试和 `--memory` 演示模式。
//! 排序、两位小数精度、自增编号和患者编号唯一约束与数据库实现保持一致。

use crate::seed::{compliance_seed, sample_patients};
use crate::store::ComplianceStore;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rso_core::models::*;
use rso_core::utils::round2;
use rso_core::error::unique_violation;
use rso_core::{Result, RsoError};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 单张表：行数据与自增编号。清空后编号继续递增，与 SERIAL 行为相同。
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    next_id: i32,
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32, NaiveDateTime) -> T) -> T {
        self.next_id += 1;
        let row = build(self.next_id, Utc::now().naive_utc());
        self.rows.push(row.clone());
        row
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    /// 按日期降序、编号降序
    fn sorted_desc<K: Ord>(&self, key: impl Fn(&T) -> (K, i32)) -> Vec<T> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| key(b).cmp(&key(a)));
        rows
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    patients: Table<Patient>,
    daily_surveys: Table<DailyAreaSurvey>,
    weekly_surveys: Table<WeeklyAreaSurvey>,
    sealed_sources: Table<SealedSource>,
    tracer_checkouts: Table<TracerCheckout>,
    dose_patient_records: Table<DosePatientInfo>,
    qc_records: Table<QcCalibratorRecord>,
    dosimeter_records: Table<DosimeterRecord>,
}

impl Tables {
    fn insert_patient(&mut self, patient: &NewPatient) -> Result<Patient> {
        if self
            .patients
            .rows
            .iter()
            .any(|p| p.patient_id == patient.patient_id)
        {
            debug!("Duplicate patient_id {}", patient.patient_id);
            return Err(unique_violation(Some("patients_patient_id_key")));
        }

        Ok(self.patients.insert_with(|id, created_at| Patient {
            id,
            patient_name: patient.patient_name.clone(),
            patient_id: patient.patient_id.clone(),
            scan_type: patient.scan_type.clone(),
            duration: patient.duration,
            insurance: patient.insurance.clone(),
            appointment_status: patient.appointment_status,
            appointment_date: patient.appointment_date,
            created_at,
        }))
    }

    fn insert_daily_survey(&mut self, survey: &NewDailyAreaSurvey) -> DailyAreaSurvey {
        self.daily_surveys.insert_with(|id, created_at| DailyAreaSurvey {
            id,
            survey_date: survey.survey_date,
            technologist: survey.technologist.clone(),
            area: survey.area.clone(),
            radiation_reading: round2(survey.radiation_reading),
            actions: survey.actions.clone(),
            status: survey.status.clone(),
            created_at,
        })
    }

    fn insert_weekly_survey(&mut self, survey: &NewWeeklyAreaSurvey) -> WeeklyAreaSurvey {
        self.weekly_surveys.insert_with(|id, created_at| WeeklyAreaSurvey {
            id,
            week_ending: survey.week_ending,
            technologist: survey.technologist.clone(),
            areas: survey.areas.clone(),
            max_reading: round2(survey.max_reading),
            avg_reading: round2(survey.avg_reading),
            comments: survey.comments.clone(),
            status: survey.status.clone(),
            created_at,
        })
    }

    fn insert_sealed_source(&mut self, source: &NewSealedSource) -> SealedSource {
        self.sealed_sources.insert_with(|id, created_at| SealedSource {
            id,
            inventory_date: source.inventory_date,
            source_id: source.source_id.clone(),
            isotope: source.isotope.clone(),
            activity: round2(source.activity),
            location: source.location.clone(),
            condition: source.condition,
            comments: source.comments.clone(),
            created_at,
        })
    }

    fn insert_tracer_checkout(&mut self, checkout: &NewTracerCheckout) -> TracerCheckout {
        self.tracer_checkouts.insert_with(|id, created_at| TracerCheckout {
            id,
            checkout_date: checkout.checkout_date,
            tracer_type: checkout.tracer_type.clone(),
            technologist: checkout.technologist.clone(),
            check_out_time: checkout.check_out_time,
            check_in_time: checkout.check_in_time,
            patient_id: checkout.patient_id.clone(),
            status: checkout.status.clone(),
            created_at,
        })
    }

    fn insert_dose_patient_info(&mut self, record: &NewDosePatientInfo) -> DosePatientInfo {
        self.dose_patient_records.insert_with(|id, created_at| DosePatientInfo {
            id,
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            dose_ordered: round2(record.dose_ordered),
            dose_delivered: record.dose_delivered.map(round2),
            scan_date: record.scan_date,
            cancellation: record.cancellation,
            credit_due: record.credit_due.map(round2),
            created_at,
        })
    }

    fn insert_qc_record(&mut self, record: &NewQcCalibratorRecord) -> QcCalibratorRecord {
        self.qc_records.insert_with(|id, created_at| QcCalibratorRecord {
            id,
            qc_date: record.qc_date,
            calibrator_id: record.calibrator_id.clone(),
            technologist: record.technologist.clone(),
            test_type: record.test_type.clone(),
            result: record.result,
            comments: record.comments.clone(),
            created_at,
        })
    }

    fn insert_dosimeter_record(&mut self, record: &NewDosimeterRecord) -> DosimeterRecord {
        self.dosimeter_records.insert_with(|id, created_at| DosimeterRecord {
            id,
            tracking_date: record.tracking_date,
            employee_name: record.employee_name.clone(),
            badge_id: record.badge_id.clone(),
            exposure: round2(record.exposure),
            monthly_total: record.monthly_total.map(round2),
            quarterly_total: record.quarterly_total.map(round2),
            yearly_total: record.yearly_total.map(round2),
            status: record.status.clone(),
            created_at,
        })
    }

    fn reseed_patients(&mut self) -> Result<SeedCounts> {
        self.patients.clear();
        let patients = sample_patients();
        for patient in &patients {
            self.insert_patient(patient)?;
        }
        Ok(SeedCounts {
            patients: patients.len(),
            ..SeedCounts::default()
        })
    }

    fn reseed_compliance(&mut self) -> SeedCounts {
        let seed = compliance_seed();

        self.daily_surveys.clear();
        self.weekly_surveys.clear();
        self.sealed_sources.clear();
        self.tracer_checkouts.clear();
        self.dose_patient_records.clear();
        self.qc_records.clear();
        self.dosimeter_records.clear();

        for survey in &seed.daily_surveys {
            self.insert_daily_survey(survey);
        }
        for survey in &seed.weekly_surveys {
            self.insert_weekly_survey(survey);
        }
        for source in &seed.sealed_sources {
            self.insert_sealed_source(source);
        }
        for checkout in &seed.tracer_checkouts {
            self.insert_tracer_checkout(checkout);
        }
        for record in &seed.dose_patient_records {
            self.insert_dose_patient_info(record);
        }
        for record in &seed.qc_records {
            self.insert_qc_record(record);
        }
        for record in &seed.dosimeter_records {
            self.insert_dosimeter_record(record);
        }

        seed.counts()
    }
}

/// 预约时间升序，无时间的排在最后，同时间按编号升序
fn compare_appointments(a: &Patient, b: &Patient) -> Ordering {
    match (a.appointment_date, b.appointment_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then(a.id.cmp(&b.id))
}

/// 内存存储，读写锁保护全部表
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComplianceStore for MemoryStore {
    async fn initialize(&self) -> Result<SeedCounts> {
        let mut tables = self.tables.write().await;

        if !tables.patients.rows.is_empty() {
            debug!("In-memory patients already populated");
            return Ok(SeedCounts::default());
        }
        let counts = tables.reseed_patients()?;
        info!("In-memory store initialized with {} patients", counts.patients);
        Ok(counts)
    }

    async fn reseed_patients(&self) -> Result<SeedCounts> {
        self.tables.write().await.reseed_patients()
    }

    async fn reseed_compliance(&self) -> Result<SeedCounts> {
        Ok(self.tables.write().await.reseed_compliance())
    }

    async fn health_check(&self) -> Result<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let tables = self.tables.read().await;
        let mut patients = tables.patients.rows.clone();
        patients.sort_by(compare_appointments);
        Ok(patients)
    }

    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient> {
        self.tables.write().await.insert_patient(patient)
    }

    async fn list_daily_surveys(&self) -> Result<Vec<DailyAreaSurvey>> {
        let tables = self.tables.read().await;
        Ok(tables.daily_surveys.sorted_desc(|s| (s.survey_date, s.id)))
    }

    async fn create_daily_survey(&self, survey: &NewDailyAreaSurvey) -> Result<DailyAreaSurvey> {
        Ok(self.tables.write().await.insert_daily_survey(survey))
    }

    async fn list_weekly_surveys(&self) -> Result<Vec<WeeklyAreaSurvey>> {
        let tables = self.tables.read().await;
        Ok(tables.weekly_surveys.sorted_desc(|s| (s.week_ending, s.id)))
    }

    async fn create_weekly_survey(&self, survey: &NewWeeklyAreaSurvey) -> Result<WeeklyAreaSurvey> {
        Ok(self.tables.write().await.insert_weekly_survey(survey))
    }

    async fn list_sealed_sources(&self) -> Result<Vec<SealedSource>> {
        let tables = self.tables.read().await;
        Ok(tables.sealed_sources.sorted_desc(|s| (s.inventory_date, s.id)))
    }

    async fn create_sealed_source(&self, source: &NewSealedSource) -> Result<SealedSource> {
        Ok(self.tables.write().await.insert_sealed_source(source))
    }

    async fn list_tracer_checkouts(&self) -> Result<Vec<TracerCheckout>> {
        let tables = self.tables.read().await;
        Ok(tables.tracer_checkouts.sorted_desc(|c| (c.checkout_date, c.id)))
    }

    async fn create_tracer_checkout(&self, checkout: &NewTracerCheckout) -> Result<TracerCheckout> {
        Ok(self.tables.write().await.insert_tracer_checkout(checkout))
    }

    async fn list_dose_patient_info(&self) -> Result<Vec<DosePatientInfo>> {
        let tables = self.tables.read().await;
        Ok(tables.dose_patient_records.sorted_desc(|r| (r.scan_date, r.id)))
    }

    async fn create_dose_patient_info(&self, record: &NewDosePatientInfo) -> Result<DosePatientInfo> {
        Ok(self.tables.write().await.insert_dose_patient_info(record))
    }

    async fn list_qc_records(&self) -> Result<Vec<QcCalibratorRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.qc_records.sorted_desc(|r| (r.qc_date, r.id)))
    }

    async fn create_qc_record(&self, record: &NewQcCalibratorRecord) -> Result<QcCalibratorRecord> {
        Ok(self.tables.write().await.insert_qc_record(record))
    }

    async fn list_dosimeter_records(&self) -> Result<Vec<DosimeterRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.dosimeter_records.sorted_desc(|r| (r.tracking_date, r.id)))
    }

    async fn create_dosimeter_record(&self, record: &NewDosimeterRecord) -> Result<DosimeterRecord> {
        Ok(self.tables.write().await.insert_dosimeter_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{compliance_snapshot, patient_snapshot};
    use rso_core::error::DUPLICATE_PATIENT_ID;
    use chrono::NaiveDate;

    fn survey(day: u32, reading: f64) -> NewDailyAreaSurvey {
        NewDailyAreaSurvey {
            survey_date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            technologist: "J. Smith".to_string(),
            area: "Hot Lab".to_string(),
            radiation_reading: reading,
            actions: None,
            status: "Pass".to_string(),
        }
    }

    #[tokio::test]
    async fn test_daily_survey_round_trip() {
        let store = MemoryStore::new();
        let created = store.create_daily_survey(&survey(15, 0.3)).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.radiation_reading, 0.3);

        let listed = store.list_daily_surveys().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_lists_newest_first() {
        let store = MemoryStore::new();
        store.create_daily_survey(&survey(13, 0.1)).await.unwrap();
        store.create_daily_survey(&survey(15, 0.2)).await.unwrap();
        store.create_daily_survey(&survey(15, 0.3)).await.unwrap();

        let readings: Vec<f64> = store
            .list_daily_surveys()
            .await
            .unwrap()
            .iter()
            .map(|s| s.radiation_reading)
            .collect();
        assert_eq!(readings, vec![0.3, 0.2, 0.1]);
    }

    #[tokio::test]
    async fn test_initialize_seeds_patients_once() {
        let store = MemoryStore::new();
        assert_eq!(store.initialize().await.unwrap().patients, 30);
        assert_eq!(store.initialize().await.unwrap().patients, 0);

        let patients = store.list_patients().await.unwrap();
        assert_eq!(patients.len(), 30);
        assert!(patients
            .windows(2)
            .all(|w| w[0].appointment_date <= w[1].appointment_date));
    }

    #[tokio::test]
    async fn test_reseed_is_idempotent() {
        let store = MemoryStore::new();
        store.create_daily_survey(&survey(1, 9.0)).await.unwrap();

        let first = store.reseed_compliance().await.unwrap();
        let first_rows = compliance_snapshot(&store).await;
        let second = store.reseed_compliance().await.unwrap();
        let second_rows = compliance_snapshot(&store).await;

        assert_eq!(first, second);
        assert_eq!(first_rows, second_rows);
        assert_eq!(first_rows.0.len(), 10);
        assert!(first_rows.0.iter().all(|s| s.survey_date != survey(1, 9.0).survey_date));
        assert_eq!(first_rows.6.len(), 7);

        store.reseed_patients().await.unwrap();
        let first_patients = patient_snapshot(&store).await;
        store.reseed_patients().await.unwrap();
        let second_patients = patient_snapshot(&store).await;
        assert_eq!(first_patients.len(), 30);
        assert_eq!(first_patients, second_patients);
    }

    #[tokio::test]
    async fn test_duplicate_patient_id_conflicts() {
        let store = MemoryStore::new();
        store.initialize().await.unwrap();

        let duplicate = sample_patients().remove(0);
        let err = store.create_patient(&duplicate).await.unwrap_err();
        assert!(matches!(&err, RsoError::Conflict(message) if message == DUPLICATE_PATIENT_ID));
        assert_eq!(store.list_patients().await.unwrap().len(), 30);
    }

    #[tokio::test]
    async fn test_patients_without_date_sort_last() {
        let store = MemoryStore::new();
        let mut undated = sample_patients().remove(0);
        undated.patient_id = "PT900".to_string();
        undated.appointment_date = None;
        store.create_patient(&undated).await.unwrap();
        store.create_patient(&sample_patients().remove(1)).await.unwrap();

        let patients = store.list_patients().await.unwrap();
        assert_eq!(patients[0].patient_id, "PT002");
        assert_eq!(patients[1].patient_id, "PT900");
    }

    #[tokio::test]
    async fn test_values_rounded_to_two_places() {
        let store = MemoryStore::new();
        let created = store.create_daily_survey(&survey(15, 0.456)).await.unwrap();
        assert_eq!(created.radiation_reading, 0.46);
    }
}
