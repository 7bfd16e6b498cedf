//! 数据库模型

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rso_core::models::*;
use sqlx::FromRow;
use tracing::warn;

// 数据库表模型 - 使用FromRow trait用于SQL查询。
// NUMERIC 列在查询中统一转换为 float8。

/// 患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i32,
    pub patient_name: String,
    pub patient_id: String,
    pub scan_type: String,
    pub duration: i32,
    pub insurance: String,
    pub appointment_status: String, // 存储为字符串，转换为AppointmentStatus枚举
    pub appointment_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<DbPatient> for Patient {
    fn from(row: DbPatient) -> Self {
        Patient {
            id: row.id,
            patient_name: row.patient_name,
            patient_id: row.patient_id,
            scan_type: row.scan_type,
            duration: row.duration,
            insurance: row.insurance,
            appointment_status: AppointmentStatus::parse(&row.appointment_status).unwrap_or_else(|| {
                warn!(
                    "Unknown appointment_status '{}' on patient row {}, reading as Pending",
                    row.appointment_status, row.id
                );
                AppointmentStatus::Pending
            }),
            appointment_date: row.appointment_date,
            created_at: row.created_at,
        }
    }
}

/// 每日巡测表
#[derive(Debug, FromRow)]
pub struct DbDailyAreaSurvey {
    pub id: i32,
    pub survey_date: NaiveDate,
    pub technologist: String,
    pub area: String,
    pub radiation_reading: f64,
    pub actions: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<DbDailyAreaSurvey> for DailyAreaSurvey {
    fn from(row: DbDailyAreaSurvey) -> Self {
        DailyAreaSurvey {
            id: row.id,
            survey_date: row.survey_date,
            technologist: row.technologist,
            area: row.area,
            radiation_reading: row.radiation_reading,
            actions: row.actions,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// 每周巡测表
#[derive(Debug, FromRow)]
pub struct DbWeeklyAreaSurvey {
    pub id: i32,
    pub week_ending: NaiveDate,
    pub technologist: String,
    pub areas: String,
    pub max_reading: f64,
    pub avg_reading: f64,
    pub comments: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<DbWeeklyAreaSurvey> for WeeklyAreaSurvey {
    fn from(row: DbWeeklyAreaSurvey) -> Self {
        WeeklyAreaSurvey {
            id: row.id,
            week_ending: row.week_ending,
            technologist: row.technologist,
            areas: row.areas,
            max_reading: row.max_reading,
            avg_reading: row.avg_reading,
            comments: row.comments,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// 密封源盘点表
#[derive(Debug, FromRow)]
pub struct DbSealedSource {
    pub id: i32,
    pub inventory_date: NaiveDate,
    pub source_id: String,
    pub isotope: String,
    pub activity: f64,
    pub location: String,
    pub condition: String, // 存储为字符串，转换为SourceCondition枚举
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<DbSealedSource> for SealedSource {
    fn from(row: DbSealedSource) -> Self {
        SealedSource {
            id: row.id,
            inventory_date: row.inventory_date,
            source_id: row.source_id,
            isotope: row.isotope,
            activity: row.activity,
            location: row.location,
            condition: SourceCondition::parse(&row.condition).unwrap_or_else(|| {
                warn!(
                    "Unknown condition '{}' on sealed source row {}, reading as Good",
                    row.condition, row.id
                );
                SourceCondition::Good
            }),
            comments: row.comments,
            created_at: row.created_at,
        }
    }
}

/// 示踪剂领用表
#[derive(Debug, FromRow)]
pub struct DbTracerCheckout {
    pub id: i32,
    pub checkout_date: NaiveDate,
    pub tracer_type: String,
    pub technologist: String,
    pub check_out_time: Option<NaiveTime>,
    pub check_in_time: Option<NaiveTime>,
    pub patient_id: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<DbTracerCheckout> for TracerCheckout {
    fn from(row: DbTracerCheckout) -> Self {
        TracerCheckout {
            id: row.id,
            checkout_date: row.checkout_date,
            tracer_type: row.tracer_type,
            technologist: row.technologist,
            check_out_time: row.check_out_time,
            check_in_time: row.check_in_time,
            patient_id: row.patient_id,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// 患者剂量表
#[derive(Debug, FromRow)]
pub struct DbDosePatientInfo {
    pub id: i32,
    pub patient_id: String,
    pub patient_name: String,
    pub dose_ordered: f64,
    pub dose_delivered: Option<f64>,
    pub scan_date: NaiveDate,
    pub cancellation: bool,
    pub credit_due: Option<f64>,
    pub created_at: NaiveDateTime,
}

impl From<DbDosePatientInfo> for DosePatientInfo {
    fn from(row: DbDosePatientInfo) -> Self {
        DosePatientInfo {
            id: row.id,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            dose_ordered: row.dose_ordered,
            dose_delivered: row.dose_delivered,
            scan_date: row.scan_date,
            cancellation: row.cancellation,
            credit_due: row.credit_due,
            created_at: row.created_at,
        }
    }
}

/// 活度计质控表
#[derive(Debug, FromRow)]
pub struct DbQcCalibratorRecord {
    pub id: i32,
    pub qc_date: NaiveDate,
    pub calibrator_id: String,
    pub technologist: String,
    pub test_type: String,
    pub result: String, // 存储为字符串，转换为QcResult枚举
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<DbQcCalibratorRecord> for QcCalibratorRecord {
    fn from(row: DbQcCalibratorRecord) -> Self {
        QcCalibratorRecord {
            id: row.id,
            qc_date: row.qc_date,
            calibrator_id: row.calibrator_id,
            technologist: row.technologist,
            test_type: row.test_type,
            result: QcResult::parse(&row.result).unwrap_or_else(|| {
                warn!("Unknown result '{}' on QC row {}, reading as Fail", row.result, row.id);
                QcResult::Fail
            }),
            comments: row.comments,
            created_at: row.created_at,
        }
    }
}

/// 剂量计表
#[derive(Debug, FromRow)]
pub struct DbDosimeterRecord {
    pub id: i32,
    pub tracking_date: NaiveDate,
    pub employee_name: String,
    pub badge_id: String,
    pub exposure: f64,
    pub monthly_total: Option<f64>,
    pub quarterly_total: Option<f64>,
    pub yearly_total: Option<f64>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<DbDosimeterRecord> for DosimeterRecord {
    fn from(row: DbDosimeterRecord) -> Self {
        DosimeterRecord {
            id: row.id,
            tracking_date: row.tracking_date,
            employee_name: row.employee_name,
            badge_id: row.badge_id,
            exposure: row.exposure,
            monthly_total: row.monthly_total,
            quarterly_total: row.quarterly_total,
            yearly_total: row.yearly_total,
            status: row.status,
            created_at: row.created_at,
        }
    }
}
