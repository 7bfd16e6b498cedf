//! 固定示例数据
//!
//! 初始化和重建种子数据时写入的行。数据集是静态的，先清空再写入即可重复执行。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rso_core::models::*;

fn date(value: &str) -> NaiveDate {
    // 仅用于下方的常量数据
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or_default()
}

fn midnight(value: &str) -> Option<NaiveDateTime> {
    date(value).and_hms_opt(0, 0, 0)
}

fn time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// 30 名示例预约患者 (PT001–PT030)
pub fn sample_patients() -> Vec<NewPatient> {
    use AppointmentStatus::{Confirmed, Pending};

    [
        ("John Smith", "PT001", "PET/CT", 60, "Blue Cross", Confirmed, "2025-10-16"),
        ("Mary Johnson", "PT002", "Bone Scan", 45, "Aetna", Confirmed, "2025-10-16"),
        ("Robert Williams", "PT003", "Cardiac Stress", 90, "Medicare", Pending, "2025-10-17"),
        ("Patricia Brown", "PT004", "PET/CT", 60, "United Healthcare", Confirmed, "2025-10-16"),
        ("Michael Jones", "PT005", "Thyroid Scan", 30, "Cigna", Confirmed, "2025-10-17"),
        ("Linda Garcia", "PT006", "DaT Scan", 90, "Blue Cross", Confirmed, "2025-10-16"),
        ("David Miller", "PT007", "Bone Scan", 45, "Aetna", Confirmed, "2025-10-17"),
        ("Barbara Davis", "PT008", "Renal Scan", 120, "Medicare", Pending, "2025-10-18"),
        ("William Rodriguez", "PT009", "Amyloid PET", 75, "United Healthcare", Confirmed, "2025-10-16"),
        ("Elizabeth Martinez", "PT010", "Cardiac PET", 90, "Cigna", Confirmed, "2025-10-17"),
        ("James Hernandez", "PT011", "PET/CT", 60, "Blue Cross", Confirmed, "2025-10-16"),
        ("Jennifer Lopez", "PT012", "PSMA PET", 75, "Aetna", Confirmed, "2025-10-17"),
        ("Charles Gonzalez", "PT013", "Thyroid Scan", 30, "Medicare", Confirmed, "2025-10-16"),
        ("Susan Wilson", "PT014", "PET/CT", 60, "United Healthcare", Pending, "2025-10-18"),
        ("Joseph Anderson", "PT015", "Cardiac Stress", 90, "Cigna", Confirmed, "2025-10-17"),
        ("Sarah Thomas", "PT016", "DaT Scan", 90, "Blue Cross", Confirmed, "2025-10-16"),
        ("Thomas Taylor", "PT017", "Bone Scan", 45, "Aetna", Confirmed, "2025-10-17"),
        ("Karen Moore", "PT018", "Renal Scan", 120, "Medicare", Confirmed, "2025-10-16"),
        ("Christopher Jackson", "PT019", "Amyloid PET", 75, "United Healthcare", Confirmed, "2025-10-17"),
        ("Nancy Martin", "PT020", "Cardiac PET", 90, "Cigna", Pending, "2025-10-18"),
        ("Daniel Lee", "PT021", "PSMA PET", 75, "Blue Cross", Confirmed, "2025-10-16"),
        ("Lisa Perez", "PT022", "Bone Scan", 45, "Aetna", Confirmed, "2025-10-17"),
        ("Matthew Thompson", "PT023", "Thyroid Scan", 30, "Medicare", Confirmed, "2025-10-16"),
        ("Betty White", "PT024", "PET/CT", 60, "United Healthcare", Confirmed, "2025-10-17"),
        ("Mark Harris", "PT025", "Cardiac Stress", 90, "Cigna", Confirmed, "2025-10-16"),
        ("Sandra Sanchez", "PT026", "DaT Scan", 90, "Blue Cross", Pending, "2025-10-18"),
        ("Donald Clark", "PT027", "Bone Scan", 45, "Aetna", Confirmed, "2025-10-17"),
        ("Ashley Ramirez", "PT028", "Amyloid PET", 75, "Medicare", Confirmed, "2025-10-16"),
        ("Steven Lewis", "PT029", "PSMA PET", 75, "United Healthcare", Confirmed, "2025-10-17"),
        ("Kimberly Robinson", "PT030", "Cardiac PET", 90, "Cigna", Confirmed, "2025-10-16"),
    ]
    .into_iter()
    .map(|(name, id, scan, duration, insurance, status, day)| NewPatient {
        patient_name: name.to_string(),
        patient_id: id.to_string(),
        scan_type: scan.to_string(),
        duration,
        insurance: insurance.to_string(),
        appointment_status: status,
        appointment_date: midnight(day),
    })
    .collect()
}

/// 七张合规表的示例数据
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceSeed {
    pub daily_surveys: Vec<NewDailyAreaSurvey>,
    pub weekly_surveys: Vec<NewWeeklyAreaSurvey>,
    pub sealed_sources: Vec<NewSealedSource>,
    pub tracer_checkouts: Vec<NewTracerCheckout>,
    pub dose_patient_records: Vec<NewDosePatientInfo>,
    pub qc_records: Vec<NewQcCalibratorRecord>,
    pub dosimeter_records: Vec<NewDosimeterRecord>,
}

impl ComplianceSeed {
    pub fn counts(&self) -> SeedCounts {
        SeedCounts {
            patients: 0,
            daily_surveys: self.daily_surveys.len(),
            weekly_surveys: self.weekly_surveys.len(),
            sealed_sources: self.sealed_sources.len(),
            tracer_checkouts: self.tracer_checkouts.len(),
            dose_patient_records: self.dose_patient_records.len(),
            qc_records: self.qc_records.len(),
            dosimeter_records: self.dosimeter_records.len(),
        }
    }
}

pub fn compliance_seed() -> ComplianceSeed {
    let daily_surveys = [
        ("2025-10-15", "John Smith", "Hot Lab", 0.5, "None required", "Pass"),
        ("2025-10-15", "John Smith", "Injection Room", 1.2, "None required", "Pass"),
        ("2025-10-15", "Sarah Johnson", "Scan Room 1", 0.3, "None required", "Pass"),
        ("2025-10-15", "Sarah Johnson", "Scan Room 2", 0.4, "None required", "Pass"),
        ("2025-10-14", "Mike Davis", "Hot Lab", 2.5, "Decontamination performed", "Action Taken"),
        ("2025-10-14", "Mike Davis", "Injection Room", 1.0, "None required", "Pass"),
        ("2025-10-14", "Lisa Brown", "Scan Room 1", 0.2, "None required", "Pass"),
        ("2025-10-13", "John Smith", "Hot Lab", 0.8, "None required", "Pass"),
        ("2025-10-13", "Sarah Johnson", "Injection Room", 1.5, "None required", "Pass"),
        ("2025-10-13", "Mike Davis", "Scan Room 2", 0.6, "None required", "Pass"),
    ]
    .into_iter()
    .map(|(day, tech, area, reading, actions, status)| NewDailyAreaSurvey {
        survey_date: date(day),
        technologist: tech.to_string(),
        area: area.to_string(),
        radiation_reading: reading,
        actions: text(actions),
        status: status.to_string(),
    })
    .collect();

    let all_areas = "Hot Lab, Injection Room, Scan Rooms";
    let weekly_surveys = [
        ("2025-10-11", "John Smith", 2.1, 0.8, "All areas within limits", "Pass"),
        ("2025-10-04", "Sarah Johnson", 1.8, 0.7, "Normal readings", "Pass"),
        ("2025-09-27", "Mike Davis", 2.5, 1.0, "Hot lab required cleaning", "Action Taken"),
    ]
    .into_iter()
    .map(|(day, tech, max, avg, comments, status)| NewWeeklyAreaSurvey {
        week_ending: date(day),
        technologist: tech.to_string(),
        areas: all_areas.to_string(),
        max_reading: max,
        avg_reading: avg,
        comments: text(comments),
        status: status.to_string(),
    })
    .collect();

    let sealed_sources = [
        ("2025-10-15", "CS-137-001", "Cs-137", 10.0, "Hot Lab Cabinet A", "Annual inspection completed"),
        ("2025-10-15", "CO-57-002", "Co-57", 5.0, "QC Room Shelf B", "Used for calibrator QC"),
        ("2025-10-15", "BA-133-003", "Ba-133", 8.0, "Hot Lab Cabinet A", "Routine check"),
        ("2025-10-10", "CS-137-001", "Cs-137", 10.0, "Hot Lab Cabinet A", "Weekly check"),
        ("2025-10-10", "CO-57-002", "Co-57", 5.0, "QC Room Shelf B", "Weekly check"),
    ]
    .into_iter()
    .map(|(day, source_id, isotope, activity, location, comments)| NewSealedSource {
        inventory_date: date(day),
        source_id: source_id.to_string(),
        isotope: isotope.to_string(),
        activity,
        location: location.to_string(),
        condition: SourceCondition::Good,
        comments: text(comments),
    })
    .collect();

    let tracer_checkouts = [
        ("2025-10-15", "F-18 FDG", "John Smith", "08:00", "08:30", "PT001"),
        ("2025-10-15", "Tc-99m MDP", "Sarah Johnson", "09:00", "09:25", "PT002"),
        ("2025-10-15", "F-18 FDG", "Mike Davis", "10:00", "10:35", "PT004"),
        ("2025-10-15", "I-123 Ioflupane", "Lisa Brown", "11:00", "11:40", "PT006"),
        ("2025-10-15", "Tc-99m Sestamibi", "John Smith", "13:00", "13:35", "PT025"),
        ("2025-10-14", "F-18 FDG", "Sarah Johnson", "08:15", "08:45", "PT011"),
        ("2025-10-14", "Tc-99m MDP", "Mike Davis", "09:30", "10:00", "PT007"),
    ]
    .into_iter()
    .map(|(day, tracer, tech, out, back, patient)| NewTracerCheckout {
        checkout_date: date(day),
        tracer_type: tracer.to_string(),
        technologist: tech.to_string(),
        check_out_time: time(out),
        check_in_time: time(back),
        patient_id: text(patient),
        status: "Complete".to_string(),
    })
    .collect();

    let dose_patient_records = [
        ("PT001", "John Anderson", 10.0, 9.8, "2025-10-15", 150.00, false),
        ("PT002", "Mary Wilson", 8.5, 8.3, "2025-10-15", 127.50, false),
        ("PT003", "Robert Brown", 12.0, 0.0, "2025-10-15", 180.00, true),
        ("PT004", "Patricia Davis", 9.5, 9.2, "2025-10-14", 142.50, false),
        ("PT005", "Michael Johnson", 11.0, 10.9, "2025-10-14", 165.00, false),
        ("PT006", "Jennifer Martinez", 7.5, 7.4, "2025-10-14", 112.50, false),
        ("PT007", "David Garcia", 10.5, 10.3, "2025-10-13", 157.50, false),
    ]
    .into_iter()
    .map(|(patient_id, name, ordered, delivered, day, credit, cancelled)| NewDosePatientInfo {
        patient_id: patient_id.to_string(),
        patient_name: name.to_string(),
        dose_ordered: ordered,
        dose_delivered: Some(delivered),
        scan_date: date(day),
        cancellation: cancelled,
        credit_due: Some(credit),
    })
    .collect();

    let qc_records = [
        ("2025-10-15", "CAL-001", "John Smith", "Constancy", "Within 5% tolerance"),
        ("2025-10-15", "CAL-002", "Sarah Johnson", "Constancy", "Normal operation"),
        ("2025-10-14", "CAL-001", "Mike Davis", "Linearity", "Quarterly test completed"),
        ("2025-10-14", "CAL-002", "Lisa Brown", "Constancy", "All readings normal"),
        ("2025-10-13", "CAL-001", "John Smith", "Constancy", "Within tolerance"),
        ("2025-10-13", "CAL-002", "Sarah Johnson", "Constancy", "Normal readings"),
        ("2025-10-12", "CAL-001", "Mike Davis", "Constancy", "All systems normal"),
    ]
    .into_iter()
    .map(|(day, calibrator, tech, test_type, comments)| NewQcCalibratorRecord {
        qc_date: date(day),
        calibrator_id: calibrator.to_string(),
        technologist: tech.to_string(),
        test_type: test_type.to_string(),
        result: QcResult::Pass,
        comments: text(comments),
    })
    .collect();

    let dosimeter_records = [
        ("2025-10-15", "John Smith", "BADGE-001", 15.0, 45.0, 120.0, 450.0),
        ("2025-10-15", "Sarah Johnson", "BADGE-002", 12.0, 38.0, 105.0, 380.0),
        ("2025-10-15", "Mike Davis", "BADGE-003", 18.0, 52.0, 145.0, 520.0),
        ("2025-10-15", "Lisa Brown", "BADGE-004", 10.0, 32.0, 95.0, 340.0),
        ("2025-09-15", "John Smith", "BADGE-001", 16.0, 48.0, 135.0, 480.0),
        ("2025-09-15", "Sarah Johnson", "BADGE-002", 14.0, 42.0, 115.0, 410.0),
        ("2025-08-15", "Mike Davis", "BADGE-003", 20.0, 58.0, 155.0, 550.0),
    ]
    .into_iter()
    .map(|(day, employee, badge, exposure, monthly, quarterly, yearly)| NewDosimeterRecord {
        tracking_date: date(day),
        employee_name: employee.to_string(),
        badge_id: badge.to_string(),
        exposure,
        monthly_total: Some(monthly),
        quarterly_total: Some(quarterly),
        yearly_total: Some(yearly),
        status: "Normal".to_string(),
    })
    .collect();

    ComplianceSeed {
        daily_surveys,
        weekly_surveys,
        sealed_sources,
        tracer_checkouts,
        dose_patient_records,
        qc_records,
        dosimeter_records,
    }
}
