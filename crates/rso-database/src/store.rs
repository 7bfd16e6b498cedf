//! 存储接口

use async_trait::async_trait;
use rso_core::models::*;
use rso_core::Result;

/// 合规记录存储
///
/// 每个操作对应一次存储往返。只有插入与列表，没有更新和删除；
/// 唯一的批量操作是种子数据的清空重建。
#[async_trait]
pub trait ComplianceStore: Send + Sync {
    /// 建表；患者表为空时写入示例患者
    async fn initialize(&self) -> Result<SeedCounts>;

    /// 清空并重建示例患者
    async fn reseed_patients(&self) -> Result<SeedCounts>;

    /// 清空并重建七张合规表的示例数据
    async fn reseed_compliance(&self) -> Result<SeedCounts>;

    async fn health_check(&self) -> Result<()>;

    /// 按预约时间升序
    async fn list_patients(&self) -> Result<Vec<Patient>>;
    async fn create_patient(&self, patient: &NewPatient) -> Result<Patient>;

    // 以下列表均按各自日期列降序

    async fn list_daily_surveys(&self) -> Result<Vec<DailyAreaSurvey>>;
    async fn create_daily_survey(&self, survey: &NewDailyAreaSurvey) -> Result<DailyAreaSurvey>;

    async fn list_weekly_surveys(&self) -> Result<Vec<WeeklyAreaSurvey>>;
    async fn create_weekly_survey(&self, survey: &NewWeeklyAreaSurvey) -> Result<WeeklyAreaSurvey>;

    async fn list_sealed_sources(&self) -> Result<Vec<SealedSource>>;
    async fn create_sealed_source(&self, source: &NewSealedSource) -> Result<SealedSource>;

    async fn list_tracer_checkouts(&self) -> Result<Vec<TracerCheckout>>;
    async fn create_tracer_checkout(&self, checkout: &NewTracerCheckout) -> Result<TracerCheckout>;

    async fn list_dose_patient_info(&self) -> Result<Vec<DosePatientInfo>>;
    async fn create_dose_patient_info(&self, record: &NewDosePatientInfo) -> Result<DosePatientInfo>;

    async fn list_qc_records(&self) -> Result<Vec<QcCalibratorRecord>>;
    async fn create_qc_record(&self, record: &NewQcCalibratorRecord) -> Result<QcCalibratorRecord>;

    async fn list_dosimeter_records(&self) -> Result<Vec<DosimeterRecord>>;
    async fn create_dosimeter_record(&self, record: &NewDosimeterRecord) -> Result<DosimeterRecord>;
}

/// 七张合规表的内容快照，`id` 与 `created_at` 置零，只比较数据列
#[cfg(test)]
pub(crate) type ComplianceSnapshot = (
    Vec<DailyAreaSurvey>,
    Vec<WeeklyAreaSurvey>,
    Vec<SealedSource>,
    Vec<TracerCheckout>,
    Vec<DosePatientInfo>,
    Vec<QcCalibratorRecord>,
    Vec<DosimeterRecord>,
);

#[cfg(test)]
pub(crate) async fn compliance_snapshot(store: &dyn ComplianceStore) -> ComplianceSnapshot {
    use chrono::NaiveDateTime;

    fn strip<T>(mut rows: Vec<T>, reset: impl Fn(&mut T)) -> Vec<T> {
        rows.iter_mut().for_each(reset);
        rows
    }
    let epoch = NaiveDateTime::default();

    (
        strip(store.list_daily_surveys().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_weekly_surveys().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_sealed_sources().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_tracer_checkouts().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_dose_patient_info().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_qc_records().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
        strip(store.list_dosimeter_records().await.unwrap(), |r| {
            r.id = 0;
            r.created_at = epoch;
        }),
    )
}

/// 患者快照，`id` 与 `created_at` 置零
#[cfg(test)]
pub(crate) async fn patient_snapshot(store: &dyn ComplianceStore) -> Vec<Patient> {
    let mut patients = store.list_patients().await.unwrap();
    for patient in &mut patients {
        patient.id = 0;
        patient.created_at = chrono::NaiveDateTime::default();
    }
    patients
}
