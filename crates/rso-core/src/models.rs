//! 核心数据模型定义
//!
//! 每个实体对应一张表，只有插入与列表两种操作。`New*` 类型是通过校验后
//! 可直接写入存储的载荷。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// 预约状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Pending => "Pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Confirmed" => Some(AppointmentStatus::Confirmed),
            "Pending" => Some(AppointmentStatus::Pending),
            _ => None,
        }
    }
}

/// 密封源状况
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourceCondition {
    Good,
    Fair,
    Poor,
    Damaged,
}

impl SourceCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCondition::Good => "Good",
            SourceCondition::Fair => "Fair",
            SourceCondition::Poor => "Poor",
            SourceCondition::Damaged => "Damaged",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Good" => Some(SourceCondition::Good),
            "Fair" => Some(SourceCondition::Fair),
            "Poor" => Some(SourceCondition::Poor),
            "Damaged" => Some(SourceCondition::Damaged),
            _ => None,
        }
    }
}

/// 活度计质控结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum QcResult {
    Pass,
    Warning,
    Fail,
}

impl QcResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            QcResult::Pass => "Pass",
            QcResult::Warning => "Warning",
            QcResult::Fail => "Fail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pass" => Some(QcResult::Pass),
            "Warning" => Some(QcResult::Warning),
            "Fail" => Some(QcResult::Fail),
            _ => None,
        }
    }
}

// ========== 已持久化的记录 ==========

/// 预约患者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub patient_name: String,
    pub patient_id: String, // 人工分配的唯一编号
    pub scan_type: String,
    pub duration: i32, // 分钟
    pub insurance: String,
    pub appointment_status: AppointmentStatus,
    pub appointment_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// 每日区域巡测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAreaSurvey {
    pub id: i32,
    pub survey_date: NaiveDate,
    pub technologist: String,
    pub area: String,
    pub radiation_reading: f64, // mR/hr
    pub actions: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// 每周区域巡测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAreaSurvey {
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

/// 密封源盘点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealedSource {
    pub id: i32,
    pub inventory_date: NaiveDate,
    pub source_id: String,
    pub isotope: String,
    pub activity: f64, // mCi
    pub location: String,
    pub condition: SourceCondition,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

/// 示踪剂领用/归还
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerCheckout {
    pub id: i32,
    pub checkout_date: NaiveDate,
    pub tracer_type: String,
    pub technologist: String,
    pub check_out_time: Option<NaiveTime>,
    pub check_in_time: Option<NaiveTime>,
    pub patient_id: Option<String>, // 非强制关联
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// 患者剂量记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosePatientInfo {
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

/// 活度计质控记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcCalibratorRecord {
    pub id: i32,
    pub qc_date: NaiveDate,
    pub calibrator_id: String,
    pub technologist: String,
    pub test_type: String,
    pub result: QcResult,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

/// 个人剂量计记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosimeterRecord {
    pub id: i32,
    pub tracking_date: NaiveDate,
    pub employee_name: String,
    pub badge_id: String,
    pub exposure: f64, // mrem
    pub monthly_total: Option<f64>,
    pub quarterly_total: Option<f64>,
    pub yearly_total: Option<f64>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

// ========== 插入载荷 ==========

#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub patient_name: String,
    pub patient_id: String,
    pub scan_type: String,
    pub duration: i32,
    pub insurance: String,
    pub appointment_status: AppointmentStatus,
    pub appointment_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyAreaSurvey {
    pub survey_date: NaiveDate,
    pub technologist: String,
    pub area: String,
    pub radiation_reading: f64,
    pub actions: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWeeklyAreaSurvey {
    pub week_ending: NaiveDate,
    pub technologist: String,
    pub areas: String,
    pub max_reading: f64,
    pub avg_reading: f64,
    pub comments: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSealedSource {
    pub inventory_date: NaiveDate,
    pub source_id: String,
    pub isotope: String,
    pub activity: f64,
    pub location: String,
    pub condition: SourceCondition,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTracerCheckout {
    pub checkout_date: NaiveDate,
    pub tracer_type: String,
    pub technologist: String,
    pub check_out_time: Option<NaiveTime>,
    pub check_in_time: Option<NaiveTime>,
    pub patient_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDosePatientInfo {
    pub patient_id: String,
    pub patient_name: String,
    pub dose_ordered: f64,
    pub dose_delivered: Option<f64>,
    pub scan_date: NaiveDate,
    pub cancellation: bool,
    pub credit_due: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQcCalibratorRecord {
    pub qc_date: NaiveDate,
    pub calibrator_id: String,
    pub technologist: String,
    pub test_type: String,
    pub result: QcResult,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDosimeterRecord {
    pub tracking_date: NaiveDate,
    pub employee_name: String,
    pub badge_id: String,
    pub exposure: f64,
    pub monthly_total: Option<f64>,
    pub quarterly_total: Option<f64>,
    pub yearly_total: Option<f64>,
    pub status: String,
}

/// 种子数据写入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCounts {
    pub patients: usize,
    pub daily_surveys: usize,
    pub weekly_surveys: usize,
    pub sealed_sources: usize,
    pub tracer_checkouts: usize,
    pub dose_patient_records: usize,
    pub qc_records: usize,
    pub dosimeter_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_string_round_trip() {
        for status in [AppointmentStatus::Confirmed, AppointmentStatus::Pending] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        for condition in [
            SourceCondition::Good,
            SourceCondition::Fair,
            SourceCondition::Poor,
            SourceCondition::Damaged,
        ] {
            assert_eq!(SourceCondition::parse(condition.as_str()), Some(condition));
        }
        assert_eq!(QcResult::parse("Warning"), Some(QcResult::Warning));
    }

    #[test]
    fn test_enum_parse_is_exact() {
        assert_eq!(AppointmentStatus::parse("confirmed"), None);
        assert_eq!(SourceCondition::parse("Excellent"), None);
        assert_eq!(QcResult::parse(""), None);
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&AppointmentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"Confirmed\"");
    }
}
