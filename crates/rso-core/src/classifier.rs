//! 辐射读数分级
//!
//! 将单个读数映射为 Normal / Caution / Alert 三级。每个区间包含下界。

use serde::{Deserialize, Serialize};

/// 区域巡测警戒下限 (mR/hr)
pub const AREA_CAUTION_THRESHOLD: f64 = 0.5;
/// 区域巡测告警下限 (mR/hr)
pub const AREA_ALERT_THRESHOLD: f64 = 1.0;
/// 剂量计年累计警戒下限 (mrem)
pub const DOSIMETER_CAUTION_THRESHOLD: f64 = 3000.0;
/// 剂量计年累计告警下限 (mrem)，年限值为 5000 mrem
pub const DOSIMETER_ALERT_THRESHOLD: f64 = 4500.0;

/// 分级结果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExposureStatus {
    Normal,
    Caution,
    Alert,
}

impl ExposureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExposureStatus::Normal => "Normal",
            ExposureStatus::Caution => "Caution",
            ExposureStatus::Alert => "Alert",
        }
    }
}

impl std::fmt::Display for ExposureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 读数所属领域
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdDomain {
    AreaSurvey,
    DosimeterYearly,
}

impl ThresholdDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdDomain::AreaSurvey => "area-survey",
            ThresholdDomain::DosimeterYearly => "dosimeter-yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "area-survey" => Some(ThresholdDomain::AreaSurvey),
            "dosimeter-yearly" => Some(ThresholdDomain::DosimeterYearly),
            _ => None,
        }
    }

    /// (警戒下限, 告警下限)
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            ThresholdDomain::AreaSurvey => (AREA_CAUTION_THRESHOLD, AREA_ALERT_THRESHOLD),
            ThresholdDomain::DosimeterYearly => {
                (DOSIMETER_CAUTION_THRESHOLD, DOSIMETER_ALERT_THRESHOLD)
            }
        }
    }
}

pub fn classify(domain: ThresholdDomain, value: f64) -> ExposureStatus {
    let (caution, alert) = domain.bounds();
    if value >= alert {
        ExposureStatus::Alert
    } else if value >= caution {
        ExposureStatus::Caution
    } else {
        ExposureStatus::Normal
    }
}

/// 区域巡测读数分级 (mR/hr)
pub fn classify_area(reading: f64) -> ExposureStatus {
    classify(ThresholdDomain::AreaSurvey, reading)
}

/// 剂量计年累计分级 (mrem)
pub fn classify_dosimeter(yearly_total: f64) -> ExposureStatus {
    classify(ThresholdDomain::DosimeterYearly, yearly_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_bands() {
        assert_eq!(classify_area(0.0), ExposureStatus::Normal);
        assert_eq!(classify_area(0.49), ExposureStatus::Normal);
        assert_eq!(classify_area(0.5), ExposureStatus::Caution);
        assert_eq!(classify_area(0.99), ExposureStatus::Caution);
        assert_eq!(classify_area(1.0), ExposureStatus::Alert);
        assert_eq!(classify_area(2.5), ExposureStatus::Alert);
    }

    #[test]
    fn test_dosimeter_bands() {
        assert_eq!(classify_dosimeter(450.0), ExposureStatus::Normal);
        assert_eq!(classify_dosimeter(2999.99), ExposureStatus::Normal);
        assert_eq!(classify_dosimeter(3000.0), ExposureStatus::Caution);
        assert_eq!(classify_dosimeter(4499.99), ExposureStatus::Caution);
        assert_eq!(classify_dosimeter(4500.0), ExposureStatus::Alert);
    }

    #[test]
    fn test_band_equivalences_over_sweep() {
        // 0.00 .. 2.00 mR/hr，步长 0.01
        for step in 0..=200 {
            let r = step as f64 / 100.0;
            let band = classify_area(r);
            assert_eq!(band == ExposureStatus::Alert, r >= 1.0, "reading {}", r);
            assert_eq!(band == ExposureStatus::Caution, (0.5..1.0).contains(&r), "reading {}", r);
        }
        for y in (0..=6000).step_by(50) {
            let y = y as f64;
            let band = classify_dosimeter(y);
            assert_eq!(band == ExposureStatus::Alert, y >= 4500.0);
            assert_eq!(band == ExposureStatus::Caution, (3000.0..4500.0).contains(&y));
        }
    }

    #[test]
    fn test_domain_names() {
        let domain: ThresholdDomain = serde_json::from_str("\"dosimeter-yearly\"").unwrap();
        assert_eq!(domain, ThresholdDomain::DosimeterYearly);
        assert_eq!(
            serde_json::to_string(&ThresholdDomain::AreaSurvey).unwrap(),
            "\"area-survey\""
        );
        assert_eq!(ThresholdDomain::parse("area-survey"), Some(ThresholdDomain::AreaSurvey));
        assert_eq!(ThresholdDomain::parse("Area-Survey"), None);
    }

    #[test]
    fn test_status_ordering() {
        assert!(ExposureStatus::Alert > ExposureStatus::Caution);
        assert!(ExposureStatus::Caution > ExposureStatus::Normal);
    }
}
