//! 输入校验
//!
//! 每种记录的请求体先经过校验得到 `New*` 载荷，再写入存储。校验失败时一次
//! 返回所有字段错误。

use crate::classifier::{classify_area, classify_dosimeter};
use crate::error::{FieldError, Result, RsoError};
use crate::models::*;
use crate::utils::{parse_date, parse_date_time, parse_time, round2, MAX_MEASUREMENT};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 将请求体转换为可写入的载荷
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output>;
}

/// 字段错误收集器
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 必填文本，去除首尾空白
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.fail(field, "is required");
                String::new()
            }
        }
    }

    /// 可选文本，空白视为缺省
    pub fn optional_text(&mut self, value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required_date(&mut self, field: &str, value: Option<String>) -> NaiveDate {
        match value.as_deref().map(str::trim) {
            None | Some("") => {
                self.fail(field, "is required");
                NaiveDate::default()
            }
            Some(v) => parse_date(v).unwrap_or_else(|| {
                self.fail(field, format!("'{}' is not a valid date (YYYY-MM-DD)", v));
                NaiveDate::default()
            }),
        }
    }

    pub fn optional_date_time(&mut self, field: &str, value: Option<String>) -> Option<NaiveDateTime> {
        let value = self.optional_text(value)?;
        let parsed = parse_date_time(&value);
        if parsed.is_none() {
            self.fail(field, format!("'{}' is not a valid date or date-time", value));
        }
        parsed
    }

    pub fn optional_time(&mut self, field: &str, value: Option<String>) -> Option<NaiveTime> {
        let value = self.optional_text(value)?;
        let parsed = parse_time(&value);
        if parsed.is_none() {
            self.fail(field, format!("'{}' is not a valid time (HH:MM)", value));
        }
        parsed
    }

    /// 非负测量值，保留两位小数
    pub fn measurement(&mut self, field: &str, value: Option<f64>) -> f64 {
        match value {
            None => {
                self.fail(field, "is required");
                0.0
            }
            Some(v) => self.check_measurement(field, v),
        }
    }

    pub fn optional_measurement(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        value.map(|v| self.check_measurement(field, v))
    }

    /// 上界按存储后的两位小数值判断
    fn check_measurement(&mut self, field: &str, value: f64) -> f64 {
        if !value.is_finite() || value < 0.0 {
            self.fail(field, "must be a non-negative number");
            return 0.0;
        }
        let rounded = round2(value);
        if rounded >= MAX_MEASUREMENT {
            self.fail(field, format!("must be less than {}", MAX_MEASUREMENT));
            0.0
        } else {
            rounded
        }
    }

    pub fn one_of<T>(&mut self, field: &str, value: Option<String>, parse: fn(&str) -> Option<T>, allowed: &[&str]) -> Option<T> {
        let raw = self.required_text(field, value);
        if raw.is_empty() {
            return None;
        }
        let parsed = parse(&raw);
        if parsed.is_none() {
            self.fail(field, format!("must be one of: {}", allowed.join(", ")));
        }
        parsed
    }

    pub fn finish<T>(self, output: T) -> Result<T> {
        if self.errors.is_empty() {
            Ok(output)
        } else {
            debug!("Validation rejected request: {:?}", self.errors);
            Err(RsoError::Validation(self.errors))
        }
    }
}

// ========== 请求体 ==========

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientRequest {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub scan_type: Option<String>,
    pub duration: Option<i64>,
    pub insurance: Option<String>,
    pub appointment_status: Option<String>,
    pub appointment_date: Option<String>,
}

impl Validate for PatientRequest {
    type Output = NewPatient;

    fn validate(self) -> Result<NewPatient> {
        let mut v = FieldValidator::new();
        let patient_name = v.required_text("patient_name", self.patient_name);
        let patient_id = v.required_text("patient_id", self.patient_id);
        let scan_type = v.required_text("scan_type", self.scan_type);
        let duration = match self.duration {
            None => {
                v.fail("duration", "is required");
                0
            }
            Some(d) if d <= 0 || d > i32::MAX as i64 => {
                v.fail("duration", "must be a positive number of minutes");
                0
            }
            Some(d) => d as i32,
        };
        let insurance = v.required_text("insurance", self.insurance);
        let appointment_status = v.one_of(
            "appointment_status",
            self.appointment_status,
            AppointmentStatus::parse,
            &["Confirmed", "Pending"],
        );
        let appointment_date = v.optional_date_time("appointment_date", self.appointment_date);

        v.finish(NewPatient {
            patient_name,
            patient_id,
            scan_type,
            duration,
            insurance,
            appointment_status: appointment_status.unwrap_or(AppointmentStatus::Pending),
            appointment_date,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyAreaSurveyRequest {
    pub survey_date: Option<String>,
    pub technologist: Option<String>,
    pub area: Option<String>,
    pub radiation_reading: Option<f64>,
    pub actions: Option<String>,
    pub status: Option<String>,
}

impl Validate for DailyAreaSurveyRequest {
    type Output = NewDailyAreaSurvey;

    fn validate(self) -> Result<NewDailyAreaSurvey> {
        let mut v = FieldValidator::new();
        let survey_date = v.required_date("survey_date", self.survey_date);
        let technologist = v.required_text("technologist", self.technologist);
        let area = v.required_text("area", self.area);
        let radiation_reading = v.measurement("radiation_reading", self.radiation_reading);
        let actions = v.optional_text(self.actions);
        let status = v
            .optional_text(self.status)
            .unwrap_or_else(|| classify_area(radiation_reading).as_str().to_string());

        v.finish(NewDailyAreaSurvey {
            survey_date,
            technologist,
            area,
            radiation_reading,
            actions,
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyAreaSurveyRequest {
    pub week_ending: Option<String>,
    pub technologist: Option<String>,
    pub areas: Option<String>,
    pub max_reading: Option<f64>,
    pub avg_reading: Option<f64>,
    pub comments: Option<String>,
    pub status: Option<String>,
}

impl Validate for WeeklyAreaSurveyRequest {
    type Output = NewWeeklyAreaSurvey;

    fn validate(self) -> Result<NewWeeklyAreaSurvey> {
        let mut v = FieldValidator::new();
        let week_ending = v.required_date("week_ending", self.week_ending);
        let technologist = v.required_text("technologist", self.technologist);
        let areas = v.required_text("areas", self.areas);
        let max_reading = v.measurement("max_reading", self.max_reading);
        let avg_reading = v.measurement("avg_reading", self.avg_reading);
        if avg_reading > max_reading {
            v.fail("avg_reading", "cannot exceed max_reading");
        }
        let comments = v.optional_text(self.comments);
        let status = v
            .optional_text(self.status)
            .unwrap_or_else(|| classify_area(max_reading).as_str().to_string());

        v.finish(NewWeeklyAreaSurvey {
            week_ending,
            technologist,
            areas,
            max_reading,
            avg_reading,
            comments,
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SealedSourceRequest {
    pub inventory_date: Option<String>,
    pub source_id: Option<String>,
    pub isotope: Option<String>,
    pub activity: Option<f64>,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub comments: Option<String>,
}

impl Validate for SealedSourceRequest {
    type Output = NewSealedSource;

    fn validate(self) -> Result<NewSealedSource> {
        let mut v = FieldValidator::new();
        let inventory_date = v.required_date("inventory_date", self.inventory_date);
        let source_id = v.required_text("source_id", self.source_id);
        let isotope = v.required_text("isotope", self.isotope);
        let activity = v.measurement("activity", self.activity);
        let location = v.required_text("location", self.location);
        let condition = v.one_of(
            "condition",
            self.condition,
            SourceCondition::parse,
            &["Good", "Fair", "Poor", "Damaged"],
        );
        let comments = v.optional_text(self.comments);

        v.finish(NewSealedSource {
            inventory_date,
            source_id,
            isotope,
            activity,
            location,
            condition: condition.unwrap_or(SourceCondition::Good),
            comments,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracerCheckoutRequest {
    pub checkout_date: Option<String>,
    pub tracer_type: Option<String>,
    pub technologist: Option<String>,
    pub check_out_time: Option<String>,
    pub check_in_time: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<String>,
}

impl Validate for TracerCheckoutRequest {
    type Output = NewTracerCheckout;

    fn validate(self) -> Result<NewTracerCheckout> {
        let mut v = FieldValidator::new();
        let checkout_date = v.required_date("checkout_date", self.checkout_date);
        let tracer_type = v.required_text("tracer_type", self.tracer_type);
        let technologist = v.required_text("technologist", self.technologist);
        let check_out_time = v.optional_time("check_out_time", self.check_out_time);
        let check_in_time = v.optional_time("check_in_time", self.check_in_time);
        if let (Some(out), Some(back)) = (check_out_time, check_in_time) {
            if back < out {
                v.fail("check_in_time", "cannot be earlier than check_out_time");
            }
        }
        let patient_id = v.optional_text(self.patient_id);
        let status = v.required_text("status", self.status);

        v.finish(NewTracerCheckout {
            checkout_date,
            tracer_type,
            technologist,
            check_out_time,
            check_in_time,
            patient_id,
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DosePatientInfoRequest {
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub dose_ordered: Option<f64>,
    pub dose_delivered: Option<f64>,
    pub scan_date: Option<String>,
    pub cancellation: Option<bool>,
    pub credit_due: Option<f64>,
}

impl Validate for DosePatientInfoRequest {
    type Output = NewDosePatientInfo;

    fn validate(self) -> Result<NewDosePatientInfo> {
        let mut v = FieldValidator::new();
        let patient_id = v.required_text("patient_id", self.patient_id);
        let patient_name = v.required_text("patient_name", self.patient_name);
        let dose_ordered = v.measurement("dose_ordered", self.dose_ordered);
        let dose_delivered = v.optional_measurement("dose_delivered", self.dose_delivered);
        let scan_date = v.required_date("scan_date", self.scan_date);
        let credit_due = v.optional_measurement("credit_due", self.credit_due);

        v.finish(NewDosePatientInfo {
            patient_id,
            patient_name,
            dose_ordered,
            dose_delivered,
            scan_date,
            cancellation: self.cancellation.unwrap_or(false),
            credit_due,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QcCalibratorRequest {
    pub qc_date: Option<String>,
    pub calibrator_id: Option<String>,
    pub technologist: Option<String>,
    pub test_type: Option<String>,
    pub result: Option<String>,
    pub comments: Option<String>,
}

impl Validate for QcCalibratorRequest {
    type Output = NewQcCalibratorRecord;

    fn validate(self) -> Result<NewQcCalibratorRecord> {
        let mut v = FieldValidator::new();
        let qc_date = v.required_date("qc_date", self.qc_date);
        let calibrator_id = v.required_text("calibrator_id", self.calibrator_id);
        let technologist = v.required_text("technologist", self.technologist);
        let test_type = v.required_text("test_type", self.test_type);
        let result = v.one_of("result", self.result, QcResult::parse, &["Pass", "Warning", "Fail"]);
        let comments = v.optional_text(self.comments);

        v.finish(NewQcCalibratorRecord {
            qc_date,
            calibrator_id,
            technologist,
            test_type,
            result: result.unwrap_or(QcResult::Pass),
            comments,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DosimeterRequest {
    pub tracking_date: Option<String>,
    pub employee_name: Option<String>,
    pub badge_id: Option<String>,
    pub exposure: Option<f64>,
    pub monthly_total: Option<f64>,
    pub quarterly_total: Option<f64>,
    pub yearly_total: Option<f64>,
    pub status: Option<String>,
}

impl Validate for DosimeterRequest {
    type Output = NewDosimeterRecord;

    fn validate(self) -> Result<NewDosimeterRecord> {
        let mut v = FieldValidator::new();
        let tracking_date = v.required_date("tracking_date", self.tracking_date);
        let employee_name = v.required_text("employee_name", self.employee_name);
        let badge_id = v.required_text("badge_id", self.badge_id);
        let exposure = v.measurement("exposure", self.exposure);
        let monthly_total = v.optional_measurement("monthly_total", self.monthly_total);
        let quarterly_total = v.optional_measurement("quarterly_total", self.quarterly_total);
        let yearly_total = v.optional_measurement("yearly_total", self.yearly_total);
        let status = v
            .optional_text(self.status)
            .unwrap_or_else(|| classify_dosimeter(yearly_total.unwrap_or(0.0)).as_str().to_string());

        v.finish(NewDosimeterRecord {
            tracking_date,
            employee_name,
            badge_id,
            exposure,
            monthly_total,
            quarterly_total,
            yearly_total,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(err: RsoError) -> Vec<String> {
        match err {
            RsoError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_daily_survey_valid() {
        let request = DailyAreaSurveyRequest {
            survey_date: Some("2025-10-15".to_string()),
            technologist: Some(" A ".to_string()),
            area: Some("Hot Lab".to_string()),
            radiation_reading: Some(0.3),
            actions: Some("None required".to_string()),
            status: Some("Pass".to_string()),
        };
        let survey = request.validate().unwrap();
        assert_eq!(survey.technologist, "A");
        assert_eq!(survey.radiation_reading, 0.3);
        assert_eq!(survey.status, "Pass");
    }

    #[test]
    fn test_daily_survey_collects_all_errors() {
        let request = DailyAreaSurveyRequest {
            survey_date: Some("15/10/2025".to_string()),
            radiation_reading: Some(-1.0),
            ..Default::default()
        };
        let fields = field_names(request.validate().unwrap_err());
        assert_eq!(fields, vec!["survey_date", "technologist", "area", "radiation_reading"]);
    }

    #[test]
    fn test_daily_survey_status_defaults_to_band() {
        let request = DailyAreaSurveyRequest {
            survey_date: Some("2025-10-15".to_string()),
            technologist: Some("A".to_string()),
            area: Some("Hot Lab".to_string()),
            radiation_reading: Some(0.75),
            ..Default::default()
        };
        assert_eq!(request.validate().unwrap().status, "Caution");
    }

    #[test]
    fn test_patient_validation() {
        let request = PatientRequest {
            patient_name: Some("John Smith".to_string()),
            patient_id: Some("PT001".to_string()),
            scan_type: Some("PET/CT".to_string()),
            duration: Some(60),
            insurance: Some("Blue Cross".to_string()),
            appointment_status: Some("Confirmed".to_string()),
            appointment_date: Some("2025-10-16".to_string()),
        };
        let patient = request.clone().validate().unwrap();
        assert_eq!(patient.appointment_status, AppointmentStatus::Confirmed);
        assert_eq!(patient.appointment_date.unwrap().to_string(), "2025-10-16 00:00:00");

        let bad = PatientRequest {
            duration: Some(0),
            appointment_status: Some("Maybe".to_string()),
            ..request
        };
        assert_eq!(field_names(bad.validate().unwrap_err()), vec!["duration", "appointment_status"]);
    }

    #[test]
    fn test_sealed_source_condition_must_be_listed() {
        let request = SealedSourceRequest {
            inventory_date: Some("2025-10-15".to_string()),
            source_id: Some("CS-137-001".to_string()),
            isotope: Some("Cs-137".to_string()),
            activity: Some(10.0),
            location: Some("Hot Lab Cabinet A".to_string()),
            condition: Some("Excellent".to_string()),
            comments: None,
        };
        assert_eq!(field_names(request.validate().unwrap_err()), vec!["condition"]);
    }

    #[test]
    fn test_tracer_times() {
        let request = TracerCheckoutRequest {
            checkout_date: Some("2025-10-15".to_string()),
            tracer_type: Some("F-18 FDG".to_string()),
            technologist: Some("John Smith".to_string()),
            check_out_time: Some("08:00".to_string()),
            check_in_time: Some("08:30".to_string()),
            patient_id: Some("".to_string()),
            status: Some("Checked In".to_string()),
        };
        let tracer = request.clone().validate().unwrap();
        assert_eq!(tracer.check_out_time, NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(tracer.patient_id, None);

        let reversed = TracerCheckoutRequest {
            check_in_time: Some("07:45".to_string()),
            ..request
        };
        assert_eq!(field_names(reversed.validate().unwrap_err()), vec!["check_in_time"]);
    }

    #[test]
    fn test_dose_patient_defaults() {
        let request = DosePatientInfoRequest {
            patient_id: Some("PT003".to_string()),
            patient_name: Some("Robert Brown".to_string()),
            dose_ordered: Some(12.0),
            scan_date: Some("2025-10-15".to_string()),
            credit_due: Some(180.004),
            ..Default::default()
        };
        let record = request.validate().unwrap();
        assert!(!record.cancellation);
        assert_eq!(record.dose_delivered, None);
        assert_eq!(record.credit_due, Some(180.0));
    }

    #[test]
    fn test_qc_result_enum() {
        let request = QcCalibratorRequest {
            qc_date: Some("2025-10-15".to_string()),
            calibrator_id: Some("CAL-001".to_string()),
            technologist: Some("John Smith".to_string()),
            test_type: Some("Constancy".to_string()),
            result: Some("Warning".to_string()),
            comments: None,
        };
        assert_eq!(request.validate().unwrap().result, QcResult::Warning);
    }

    #[test]
    fn test_dosimeter_status_from_yearly_total() {
        let request = DosimeterRequest {
            tracking_date: Some("2025-10-15".to_string()),
            employee_name: Some("Mike Davis".to_string()),
            badge_id: Some("BADGE-003".to_string()),
            exposure: Some(18.0),
            yearly_total: Some(4600.0),
            ..Default::default()
        };
        assert_eq!(request.clone().validate().unwrap().status, "Alert");

        let explicit = DosimeterRequest {
            status: Some("Reviewed".to_string()),
            ..request
        };
        assert_eq!(explicit.validate().unwrap().status, "Reviewed");
    }

    #[test]
    fn test_measurement_bound_applies_after_rounding() {
        let request = SealedSourceRequest {
            inventory_date: Some("2025-10-15".to_string()),
            source_id: Some("CS-137-009".to_string()),
            isotope: Some("Cs-137".to_string()),
            activity: Some(99_999_999.996),
            location: Some("Hot Lab Cabinet A".to_string()),
            condition: Some("Good".to_string()),
            comments: None,
        };
        assert_eq!(field_names(request.clone().validate().unwrap_err()), vec!["activity"]);

        let largest = SealedSourceRequest {
            activity: Some(99_999_999.99),
            ..request
        };
        assert_eq!(largest.validate().unwrap().activity, 99_999_999.99);
    }

    #[test]
    fn test_weekly_average_bounded_by_max() {
        let request = WeeklyAreaSurveyRequest {
            week_ending: Some("2025-10-11".to_string()),
            technologist: Some("John Smith".to_string()),
            areas: Some("Hot Lab".to_string()),
            max_reading: Some(1.0),
            avg_reading: Some(1.5),
            ..Default::default()
        };
        assert_eq!(field_names(request.validate().unwrap_err()), vec!["avg_reading"]);
    }
}
